mod change_passwd;

pub use self::change_passwd::ChangePasswdData;

use crate::asn1::{
    constants::{EncryptionType, PrincipalNameType},
    encryption_key::EncryptionKey as Asn1EncryptionKey,
    principal_name::PrincipalName,
};
use crate::error::KrbError;
use der::{Decode, Encode};
use std::fmt;
use std::str::FromStr;
use tracing::error;

/// A principal identity: an ordered list of name components within a realm.
///
/// There is deliberately no stored component count. Every encoder derives it
/// from `components`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal {
    pub name_type: i32,
    pub components: Vec<String>,
    pub realm: String,
}

impl Principal {
    pub fn new(name_type: PrincipalNameType, components: &[&str], realm: &str) -> Self {
        Principal {
            name_type: name_type.into(),
            components: components.iter().map(|c| c.to_string()).collect(),
            realm: realm.to_string(),
        }
    }

    /// A user principal, `name@REALM`.
    pub fn principal(name: &str, realm: &str) -> Self {
        Self::new(PrincipalNameType::NtPrincipal, &[name], realm)
    }

    /// A host based service principal, `service/host@REALM`.
    pub fn service_host(service: &str, host: &str, realm: &str) -> Self {
        Self::new(PrincipalNameType::NtSrvHst, &[service, host], realm)
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    /// Compare the identity while ignoring the name type, which RFC 4120 says
    /// is only a hint.
    pub fn same_identity(&self, other: &Principal) -> bool {
        self.realm == other.realm && self.components == other.components
    }

    /// DER encode the name part of this principal as a `PrincipalName`. The
    /// realm is not included, as the protocol always carries it separately.
    pub fn name_to_der(&self) -> Result<Vec<u8>, KrbError> {
        PrincipalName::from(self).to_der().map_err(|err| {
            error!(?err, "Unable to encode PrincipalName");
            KrbError::DerEncodePrincipalName
        })
    }

    pub fn name_from_der(der: &[u8], realm: &str) -> Result<Self, KrbError> {
        PrincipalName::from_der(der)
            .map(|name| name.into_principal(realm))
            .map_err(|err| {
                error!(?err, "Unable to decode PrincipalName");
                KrbError::DerDecodePrincipalName
            })
    }
}

const ESCAPED: [char; 3] = ['/', '@', '\\'];

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        if ESCAPED.contains(&c) {
            write!(f, "\\")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write_escaped(f, c)?;
        }
        write!(f, "@")?;
        write_escaped(f, &self.realm)
    }
}

impl FromStr for Principal {
    type Err = KrbError;

    /// Parse the `component/component@REALM` form. A backslash escapes the
    /// following character. A missing realm yields an empty realm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = Vec::new();
        let mut current = String::new();
        let mut realm: Option<String> = None;
        let mut chars = s.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    let Some(escaped) = chars.next() else {
                        error!("Principal name ends with a dangling escape");
                        return Err(KrbError::PrincipalNameInvalidComponents);
                    };
                    current.push(escaped);
                }
                '/' if realm.is_none() => {
                    components.push(std::mem::take(&mut current));
                }
                '@' if realm.is_none() => {
                    components.push(std::mem::take(&mut current));
                    realm = Some(String::new());
                }
                '@' => {
                    error!("Principal name contains more than one realm separator");
                    return Err(KrbError::PrincipalNameInvalidComponents);
                }
                c => current.push(c),
            }
        }

        let realm = match realm {
            Some(_) => current,
            None => {
                components.push(current);
                String::new()
            }
        };

        if components.iter().any(|c| c.is_empty()) {
            error!("Principal name contains an empty component");
            return Err(KrbError::PrincipalNameInvalidComponents);
        }

        Ok(Principal {
            name_type: PrincipalNameType::default().into(),
            components,
            realm,
        })
    }
}

/// A long term key. The key type is carried but never interpreted, and the
/// length of the key value is not checked against it.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey {
    pub key_type: i32,
    pub key_value: Vec<u8>,
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("key_type", &self.key_type)
            .field("key_len", &self.key_value.len())
            .finish()
    }
}

impl EncryptionKey {
    pub fn new(key_type: i32, key_value: &[u8]) -> Self {
        EncryptionKey {
            key_type,
            key_value: key_value.to_vec(),
        }
    }

    pub fn encryption_type(&self) -> Option<EncryptionType> {
        EncryptionType::try_from(self.key_type).ok()
    }

    pub fn to_der(&self) -> Result<Vec<u8>, KrbError> {
        Asn1EncryptionKey::try_from(self)
            .and_then(|ek| ek.to_der())
            .map_err(|err| {
                error!(?err, "Unable to encode EncryptionKey");
                KrbError::DerEncodeEncryptionKey
            })
    }

    pub fn from_der(der: &[u8]) -> Result<Self, KrbError> {
        Asn1EncryptionKey::from_der(der)
            .map(EncryptionKey::from)
            .map_err(|err| {
                error!(?err, "Unable to decode EncryptionKey");
                KrbError::DerDecodeEncryptionKey
            })
    }
}
