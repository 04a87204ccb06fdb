use super::kerberos_string::KerberosString;
use crate::proto::Principal;
use der::Sequence;

/// ```text
///   PrincipalName   ::= SEQUENCE {
///           name-type       [0] Int32,
///           name-string     [1] SEQUENCE OF KerberosString
///   }
/// ````
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct PrincipalName {
    #[asn1(context_specific = "0")]
    // This field specifies the type of name that follows.  Pre-defined
    // values for this field are specified in Section 6.2.  The name-type
    // SHOULD be treated as a hint.  Ignoring the name type, no two names
    // can be the same (i.e., at least one of the components, or the
    // realm, must be different).
    pub(crate) name_type: i32,
    #[asn1(context_specific = "1")]
    // This field encodes a sequence of components that form a name, each
    // component encoded as a KerberosString. Taken together, a
    // PrincipalName and a Realm form a principal identifier. Most
    // PrincipalNames will have only a few components (typically one or
    // two).
    pub(crate) name_string: Vec<KerberosString>,
}

impl From<&Principal> for PrincipalName {
    fn from(value: &Principal) -> Self {
        PrincipalName {
            name_type: value.name_type,
            name_string: value
                .components
                .iter()
                .map(|c| KerberosString::from(c.as_str()))
                .collect(),
        }
    }
}

impl PrincipalName {
    /// The realm is not part of the name, it always travels next to it.
    pub(crate) fn into_principal(self, realm: &str) -> Principal {
        Principal {
            name_type: self.name_type,
            components: self.name_string.into_iter().map(|c| c.0).collect(),
            realm: realm.to_string(),
        }
    }
}
