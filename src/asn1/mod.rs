pub mod change_passwd_data;
pub mod constants;
pub mod encryption_key;
pub mod kerberos_string;
pub mod principal_name;
pub mod realm;

pub use der::asn1::OctetString;
