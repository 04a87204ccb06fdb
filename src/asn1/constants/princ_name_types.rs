use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Name types from RFC 4120 section 6.2. Parsed names default to `NtPrincipal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum PrincipalNameType {
    /// Name type not known
    NtUnknown = 0,
    /// Just the name of the principal as in DCE, or for users
    #[default]
    NtPrincipal = 1,
    /// Service and other unique instance (krbtgt)
    NtSrvInst = 2,
    /// Service with host name as instance (telnet, rcommands)
    NtSrvHst = 3,
    /// Service with host as remaining components
    NtSrvXhst = 4,
    /// Unique ID
    NtUid = 5,
    /// Encoded X.509 Distinguished name (RFC 2253)
    NtX500Principal = 6,
    /// Name in form of SMTP email name (e.g., user@example.com)
    NtSmtpName = 7,
    /// Enterprise name - may be mapped to principal name
    NtEnterprise = 10,
}
