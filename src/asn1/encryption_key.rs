use crate::proto::EncryptionKey as Key;
use der::asn1::OctetString;
use der::Sequence;

/// ```text
/// EncryptionKey   ::= SEQUENCE {
///         keytype         [0] Int32 -- actually encryption type --,
///         keyvalue        [1] OCTET STRING
/// }
/// ````
#[derive(Eq, PartialEq, Sequence)]
pub(crate) struct EncryptionKey {
    #[asn1(context_specific = "0")]
    pub key_type: i32,
    #[asn1(context_specific = "1")]
    pub key_value: OctetString,
}

impl TryFrom<&Key> for EncryptionKey {
    type Error = der::Error;

    fn try_from(value: &Key) -> Result<Self, Self::Error> {
        Ok(EncryptionKey {
            key_type: value.key_type,
            key_value: OctetString::new(value.key_value.as_slice())?,
        })
    }
}

impl From<EncryptionKey> for Key {
    fn from(value: EncryptionKey) -> Self {
        Key {
            key_type: value.key_type,
            key_value: value.key_value.as_bytes().to_vec(),
        }
    }
}
