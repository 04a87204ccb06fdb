use super::principal_name::PrincipalName;
use super::realm::Realm;
use der::asn1::{ContextSpecific, ContextSpecificRef, OctetString};
use der::{
    AnyRef, Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Tag,
    TagMode, TagNumber, Writer,
};

const NEW_PASSWD: TagNumber = TagNumber(0);
const TARG_NAME: TagNumber = TagNumber(1);
const TARG_REALM: TagNumber = TagNumber(2);

/// ```text
/// ChangePasswdData ::=  SEQUENCE {
///         newpasswd[0]   OCTET STRING,
///         targname[1]    PrincipalName OPTIONAL,
///                 -- only present in request to change another user's password
///         targrealm[2]   Realm OPTIONAL
///                 -- only present in request to change another user's password
/// }
/// ````
///
/// Elements following `targrealm` are skipped on decode, so a peer that
/// extends the request is still understood.
#[derive(Eq, PartialEq)]
pub(crate) struct ChangePasswdData {
    pub(crate) new_passwd: OctetString,
    pub(crate) targ_name: Option<PrincipalName>,
    pub(crate) targ_realm: Option<Realm>,
}

impl ChangePasswdData {
    fn new_passwd_field(&self) -> ContextSpecificRef<'_, OctetString> {
        ContextSpecificRef {
            tag_number: NEW_PASSWD,
            tag_mode: TagMode::Explicit,
            value: &self.new_passwd,
        }
    }

    fn targ_name_field(&self) -> Option<ContextSpecificRef<'_, PrincipalName>> {
        self.targ_name.as_ref().map(|value| ContextSpecificRef {
            tag_number: TARG_NAME,
            tag_mode: TagMode::Explicit,
            value,
        })
    }

    fn targ_realm_field(&self) -> Option<ContextSpecificRef<'_, Realm>> {
        self.targ_realm.as_ref().map(|value| ContextSpecificRef {
            tag_number: TARG_REALM,
            tag_mode: TagMode::Explicit,
            value,
        })
    }
}

impl<'a> Sequence<'a> for ChangePasswdData {}

impl<'a> DecodeValue<'a> for ChangePasswdData {
    type Error = der::Error;

    fn decode_value<R: Reader<'a>>(reader: &mut R, _header: Header) -> der::Result<Self> {
        let new_passwd = ContextSpecific::<OctetString>::decode_explicit(reader, NEW_PASSWD)?
            .ok_or_else(|| {
                Tag::ContextSpecific {
                    number: NEW_PASSWD,
                    constructed: true,
                }
                .value_error()
            })?
            .value;
        let targ_name = ContextSpecific::<PrincipalName>::decode_explicit(reader, TARG_NAME)?
            .map(|field| field.value);
        let targ_realm = ContextSpecific::<Realm>::decode_explicit(reader, TARG_REALM)?
            .map(|field| field.value);

        // The reader is bounded by the sequence header, so this only walks
        // elements inside this sequence.
        while !reader.is_finished() {
            AnyRef::decode(reader)?;
        }

        Ok(ChangePasswdData {
            new_passwd,
            targ_name,
            targ_realm,
        })
    }
}

impl EncodeValue for ChangePasswdData {
    fn value_len(&self) -> der::Result<Length> {
        let len = self.new_passwd_field().encoded_len()?;
        let len = (len + self.targ_name_field().encoded_len()?)?;
        len + self.targ_realm_field().encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.new_passwd_field().encode(writer)?;
        self.targ_name_field().encode(writer)?;
        self.targ_realm_field().encode(writer)
    }
}
