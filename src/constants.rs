/// The first byte of every keytab file, ahead of the version byte.
pub(crate) const KEYTAB_MAGIC: u8 = 0x05;

pub(crate) const DEFAULT_KEYTAB_NAME: &str = "FILE:/etc/krb5.keytab";

/// Keytabs are small, a few entries per principal. Anything this large is not
/// a keytab we want to pull into memory.
pub(crate) const DEFAULT_KEYTAB_MAX_SIZE: usize = 4 * 1024 * 1024;
