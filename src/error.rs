use std::fmt;

/// Broad classes of failure. Callers that only care about *why* an operation
/// failed, rather than the exact site, should match on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input bytes do not match the keytab layout.
    Format,
    /// The value supplied can not be represented on the wire.
    Encoding,
    /// A structured protocol message is missing an element or is malformed.
    Decoding,
    Io,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KrbError {
    // =========================================================================================
    // IMPORTANT: Don't add variables to variants in this  enum - it's a potential security risk
    // as you can leak internal state in an error as these can end up in userfacing contexts!!!
    //
    // In other words, any extra information you add here is a potential CVE. This is doubly
    // true here, as the buffers we handle contain long term keys and passwords.
    //
    // If you want to debug the error, then use the error! macro at the error raise site to
    // report relevant information.
    // =========================================================================================
    KeytabTruncated,
    KeytabBadMagic,
    KeytabUnsupportedVersion,
    KeytabRecordOverrun,
    KeytabRecordLength,
    KeytabRecordMalformed,
    KeytabInvalidUtf8,
    KeytabTooLarge,

    KeytabEncodeEntry,
    KeytabKeyTypeRange,

    DerEncodePrincipalName,
    DerEncodeEncryptionKey,
    DerEncodeChangePasswdData,
    ChangePasswdMissingTargetName,
    ChangePasswdMissingTargetRealm,

    DerDecodePrincipalName,
    DerDecodeEncryptionKey,
    DerDecodeChangePasswdData,
    DerDecodeChangePasswdTargetName,
    DerDecodeChangePasswdTargetRealm,

    PrincipalNameInvalidComponents,

    UnsupportedKeytabType,
    KeytabFileError,
    IoError,

    ConfigParse,
}

impl KrbError {
    pub fn kind(self) -> ErrorKind {
        match self {
            KrbError::KeytabTruncated
            | KrbError::KeytabBadMagic
            | KrbError::KeytabUnsupportedVersion
            | KrbError::KeytabRecordOverrun
            | KrbError::KeytabRecordLength
            | KrbError::KeytabRecordMalformed
            | KrbError::KeytabInvalidUtf8
            | KrbError::KeytabTooLarge
            | KrbError::PrincipalNameInvalidComponents => ErrorKind::Format,

            KrbError::KeytabEncodeEntry
            | KrbError::KeytabKeyTypeRange
            | KrbError::DerEncodePrincipalName
            | KrbError::DerEncodeEncryptionKey
            | KrbError::DerEncodeChangePasswdData
            | KrbError::ChangePasswdMissingTargetName
            | KrbError::ChangePasswdMissingTargetRealm => ErrorKind::Encoding,

            KrbError::DerDecodePrincipalName
            | KrbError::DerDecodeEncryptionKey
            | KrbError::DerDecodeChangePasswdData
            | KrbError::DerDecodeChangePasswdTargetName
            | KrbError::DerDecodeChangePasswdTargetRealm => ErrorKind::Decoding,

            KrbError::UnsupportedKeytabType | KrbError::KeytabFileError | KrbError::IoError => {
                ErrorKind::Io
            }

            KrbError::ConfigParse => ErrorKind::Config,
        }
    }
}

impl fmt::Display for KrbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:?})", self, self.kind())
    }
}

impl std::error::Error for KrbError {}
