use der::asn1::OctetString;
use der::DecodeValue;
use der::EncodeValue;
use der::FixedTag;
use der::Tag;
use std::fmt;

/// ```text
/// KerberosString  ::= GeneralString (IA5String)
/// ````
///
/// RFC 4120 restricts this to IA5 but notes that implementations in the wild
/// carry UTF-8. Keytabs written by MIT happily store UTF-8 principals, so we
/// keep the raw UTF-8 bytes under the GeneralString tag.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct KerberosString(pub(crate) String);

impl FixedTag for KerberosString {
    const TAG: Tag = Tag::GeneralString;
}

impl<'a> DecodeValue<'a> for KerberosString {
    type Error = der::Error;

    fn decode_value<R: der::Reader<'a>>(reader: &mut R, header: der::Header) -> der::Result<Self> {
        let raw = OctetString::decode_value(reader, header)?;
        let s = std::str::from_utf8(raw.as_bytes())?;
        Ok(Self(s.to_string()))
    }
}

impl EncodeValue for KerberosString {
    fn value_len(&self) -> der::Result<der::Length> {
        der::Length::try_from(self.0.len())
    }
    fn encode_value(&self, encoder: &mut impl der::Writer) -> der::Result<()> {
        encoder.write(self.0.as_bytes())
    }
}

impl fmt::Display for KerberosString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for KerberosString {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for KerberosString {
    fn from(value: &str) -> Self {
        KerberosString(value.to_string())
    }
}
