use super::Principal;
use crate::asn1::{
    change_passwd_data::ChangePasswdData as Asn1ChangePasswdData, kerberos_string::KerberosString,
    principal_name::PrincipalName, OctetString,
};
use crate::error::KrbError;
use der::{Decode, Encode};
use std::fmt;
use tracing::error;

/// The RFC 3244 set/change password request body.
///
/// `target_realm` travels as its own element on the wire. On decode it is
/// also copied into `target_name.realm`, since a `PrincipalName` carries no
/// realm of its own.
#[derive(Clone, PartialEq, Eq)]
pub struct ChangePasswdData {
    pub new_password: Vec<u8>,
    pub target_name: Principal,
    pub target_realm: String,
}

impl fmt::Debug for ChangePasswdData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswdData")
            .field("new_password", &"<redacted>")
            .field("target_name", &self.target_name)
            .field("target_realm", &self.target_realm)
            .finish()
    }
}

impl ChangePasswdData {
    pub fn new(new_password: &[u8], target_name: Principal) -> Self {
        let target_realm = target_name.realm.clone();
        ChangePasswdData {
            new_password: new_password.to_vec(),
            target_name,
            target_realm,
        }
    }

    pub fn to_der(&self) -> Result<Vec<u8>, KrbError> {
        // A request naming nobody is useless to the kpasswd service, so refuse
        // to build it at all.
        if self.target_name.components.is_empty() {
            error!("Change password request has no target principal components");
            return Err(KrbError::ChangePasswdMissingTargetName);
        }

        if self.target_realm.is_empty() {
            error!("Change password request has no target realm");
            return Err(KrbError::ChangePasswdMissingTargetRealm);
        }

        let new_passwd = OctetString::new(self.new_password.as_slice()).map_err(|err| {
            error!(?err, "Unable to encode new password");
            KrbError::DerEncodeChangePasswdData
        })?;

        Asn1ChangePasswdData {
            new_passwd,
            targ_name: Some(PrincipalName::from(&self.target_name)),
            targ_realm: Some(KerberosString::from(self.target_realm.as_str())),
        }
        .to_der()
        .map_err(|err| {
            error!(?err, "Unable to encode ChangePasswdData");
            KrbError::DerEncodeChangePasswdData
        })
    }

    pub fn from_der(der: &[u8]) -> Result<Self, KrbError> {
        let cpd = Asn1ChangePasswdData::from_der(der).map_err(|err| {
            error!(?err, "Unable to decode ChangePasswdData");
            KrbError::DerDecodeChangePasswdData
        })?;

        let Some(targ_realm) = cpd.targ_realm else {
            error!("ChangePasswdData is missing targrealm");
            return Err(KrbError::DerDecodeChangePasswdTargetRealm);
        };

        let Some(targ_name) = cpd.targ_name else {
            error!("ChangePasswdData is missing targname");
            return Err(KrbError::DerDecodeChangePasswdTargetName);
        };

        let target_realm = targ_realm.0;

        Ok(ChangePasswdData {
            new_password: cpd.new_passwd.as_bytes().to_vec(),
            target_name: targ_name.into_principal(&target_realm),
            target_realm,
        })
    }
}
