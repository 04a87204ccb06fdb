mod kt_file;

use crate::config::KeytabConfig;
use crate::error::KrbError;
use crate::proto::{EncryptionKey, Principal};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use std::time::{Duration, SystemTime};

/// The keytab file format version, the byte following the magic `0x05`.
///
/// Each version selects a record layout, see `kt_file` for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum KeytabVersion {
    /// Host byte order, the realm is counted as a component and there is no
    /// name type.
    V1 = 1,
    /// Network byte order. This is what everything has written since the 90s.
    V2 = 2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeytabEntry {
    pub principal: Principal,
    pub key: EncryptionKey,
    /// Seconds since the epoch at which the key was written to the keytab.
    pub timestamp: u32,
    /// Low byte of the key version. Older tooling only ever reads this.
    pub kvno8: u8,
    /// Full key version. Absent in records written before MIT krb5 1.14.
    ///
    /// This is kept separately from `kvno8`, they are not required to agree.
    pub kvno32: Option<u32>,
}

impl KeytabEntry {
    /// Build a new entry, with both key version fields derived from `kvno`.
    pub fn new(principal: Principal, key: EncryptionKey, timestamp: u32, kvno: u32) -> Self {
        KeytabEntry {
            principal,
            key,
            timestamp,
            kvno8: (kvno & 0xff) as u8,
            kvno32: Some(kvno),
        }
    }

    /// The effective key version. A present but zero 32 bit field defers to
    /// the 8 bit one, matching MIT.
    pub fn kvno(&self) -> u32 {
        match self.kvno32 {
            Some(kvno) if kvno != 0 => kvno,
            _ => u32::from(self.kvno8),
        }
    }

    pub fn timestamp_as_system_time(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(u64::from(self.timestamp))
    }
}

/// An ordered set of keytab entries. Order is preserved exactly as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keytab {
    pub version: KeytabVersion,
    pub entries: Vec<KeytabEntry>,
}

impl Default for Keytab {
    fn default() -> Self {
        Keytab {
            version: KeytabVersion::V2,
            entries: Vec::new(),
        }
    }
}

impl Keytab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, KrbError> {
        kt_file::read(buf)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, KrbError> {
        kt_file::write(self)
    }

    pub fn add_entry(
        &mut self,
        principal: Principal,
        key: EncryptionKey,
        timestamp: u32,
        kvno: u32,
    ) {
        self.entries.push(KeytabEntry::new(principal, key, timestamp, kvno));
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeytabEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the key of `key_type` for `principal`. Without a `kvno` the newest
    /// key wins. Returns the key and its effective key version.
    pub fn find_key(
        &self,
        principal: &Principal,
        kvno: Option<u32>,
        key_type: i32,
    ) -> Option<(&EncryptionKey, u32)> {
        self.entries
            .iter()
            .filter(|e| e.key.key_type == key_type && e.principal.same_identity(principal))
            .filter(|e| kvno.map(|k| e.kvno() == k).unwrap_or(true))
            .max_by_key(|e| e.kvno())
            .map(|e| (&e.key, e.kvno()))
    }
}

impl fmt::Display for Keytab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Keytab version: {}", u8::from(self.version))?;
        writeln!(f, "KVNO Timestamp  Principal")?;
        writeln!(f, "---- ---------- --------------------------------------------------")?;
        for e in &self.entries {
            let enctype = match e.key.encryption_type() {
                Some(et) => et.mit_name().to_string(),
                None => format!("etype {}", e.key.key_type),
            };
            writeln!(
                f,
                "{:>4} {:>10} {} ({})",
                e.kvno(),
                e.timestamp,
                e.principal,
                enctype
            )?;
        }
        Ok(())
    }
}

pub fn store(kt_name: Option<&str>, kt: &Keytab) -> Result<(), KrbError> {
    store_with_config(kt_name, kt, &KeytabConfig::default())
}

pub fn store_with_config(
    kt_name: Option<&str>,
    kt: &Keytab,
    config: &KeytabConfig,
) -> Result<(), KrbError> {
    let kt_name = config.keytab_name(kt_name);
    if kt_name.starts_with("FILE:") {
        return kt_file::store(&kt_name, kt);
    }
    Err(KrbError::UnsupportedKeytabType)
}

pub fn load(kt_name: Option<&str>) -> Result<Keytab, KrbError> {
    load_with_config(kt_name, &KeytabConfig::default())
}

pub fn load_with_config(kt_name: Option<&str>, config: &KeytabConfig) -> Result<Keytab, KrbError> {
    let kt_name = config.keytab_name(kt_name);
    if kt_name.starts_with("FILE:") {
        return kt_file::load(&kt_name, config.max_keytab_size);
    }
    Err(KrbError::UnsupportedKeytabType)
}
