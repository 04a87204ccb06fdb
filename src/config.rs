use crate::constants::{DEFAULT_KEYTAB_MAX_SIZE, DEFAULT_KEYTAB_NAME};
use crate::error::KrbError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::error;

fn default_keytab_name() -> String {
    DEFAULT_KEYTAB_NAME.to_string()
}

fn default_max_keytab_size() -> usize {
    DEFAULT_KEYTAB_MAX_SIZE
}

/// Settings used when resolving and loading keytabs from storage.
///
/// ```toml
/// default_keytab_name = "FILE:/etc/krb5.keytab"
/// max_keytab_size = 4194304
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeytabConfig {
    #[serde(default = "default_keytab_name")]
    pub default_keytab_name: String,
    #[serde(default = "default_max_keytab_size")]
    pub max_keytab_size: usize,
}

impl Default for KeytabConfig {
    fn default() -> Self {
        KeytabConfig {
            default_keytab_name: default_keytab_name(),
            max_keytab_size: default_max_keytab_size(),
        }
    }
}

impl KeytabConfig {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, KrbError> {
        let contents = fs::read_to_string(&path).map_err(|err| {
            error!(?err, path = %path.as_ref().display(), "Unable to read config");
            KrbError::ConfigParse
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, KrbError> {
        toml::from_str(contents).map_err(|err| {
            error!(?err, "toml parse failure");
            KrbError::ConfigParse
        })
    }

    /// An explicit name wins, otherwise the configured default. The process
    /// environment is never consulted.
    pub fn keytab_name(&self, kt_name: Option<&str>) -> String {
        kt_name
            .unwrap_or(self.default_keytab_name.as_str())
            .to_string()
    }
}
