use num_enum::{IntoPrimitive, TryFromPrimitive};

/// IANA Kerberos encryption type numbers. The codecs never interpret these,
/// they only exist so listings can show something friendlier than a number.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum EncryptionType {
    DES_CBC_CRC = 1,
    DES_CBC_MD4 = 2,
    DES_CBC_MD5 = 3,
    DES3_CBC_MD5 = 5,
    DES3_CBC_SHA1 = 7,
    // PKINIT
    DSA_SHA1_CMS = 9,
    MD5_RSA_CMS = 10,
    SHA1_RSA_CMS = 11,
    RC2_CBC_ENV = 12,
    RSA_ENV = 13,
    RSA_ES_OAEP_ENV = 14,
    DES3_CBC_ENV = 15,

    DES3_CBC_SHA1_KD = 16,
    AES128_CTS_HMAC_SHA1_96 = 17,
    AES256_CTS_HMAC_SHA1_96 = 18,
    AES128_CTS_HMAC_SHA256_128 = 19,
    AES256_CTS_HMAC_SHA384_192 = 20,
    RC4_HMAC = 23,
    RC4_HMAC_EXP = 24,
    CAMELLIA128_CTS_CMAC = 25,
    CAMELLIA256_CTS_CMAC = 26,
}

impl EncryptionType {
    /// The name MIT tooling prints for this enctype.
    pub fn mit_name(self) -> &'static str {
        match self {
            EncryptionType::DES_CBC_CRC => "des-cbc-crc",
            EncryptionType::DES_CBC_MD4 => "des-cbc-md4",
            EncryptionType::DES_CBC_MD5 => "des-cbc-md5",
            EncryptionType::DES3_CBC_MD5 => "des3-cbc-md5",
            EncryptionType::DES3_CBC_SHA1 => "des3-cbc-sha1",
            EncryptionType::DSA_SHA1_CMS => "dsaWithSHA1-CmsOID",
            EncryptionType::MD5_RSA_CMS => "md5WithRSAEncryption-CmsOID",
            EncryptionType::SHA1_RSA_CMS => "sha1WithRSAEncryption-CmsOID",
            EncryptionType::RC2_CBC_ENV => "rc2CBC-EnvOID",
            EncryptionType::RSA_ENV => "rsaEncryption-EnvOID",
            EncryptionType::RSA_ES_OAEP_ENV => "rsaES-OAEP-ENV-OID",
            EncryptionType::DES3_CBC_ENV => "des-ede3-cbc-Env-OID",
            EncryptionType::DES3_CBC_SHA1_KD => "des3-cbc-sha1-kd",
            EncryptionType::AES128_CTS_HMAC_SHA1_96 => "aes128-cts-hmac-sha1-96",
            EncryptionType::AES256_CTS_HMAC_SHA1_96 => "aes256-cts-hmac-sha1-96",
            EncryptionType::AES128_CTS_HMAC_SHA256_128 => "aes128-cts-hmac-sha256-128",
            EncryptionType::AES256_CTS_HMAC_SHA384_192 => "aes256-cts-hmac-sha384-192",
            EncryptionType::RC4_HMAC => "arcfour-hmac",
            EncryptionType::RC4_HMAC_EXP => "arcfour-hmac-exp",
            EncryptionType::CAMELLIA128_CTS_CMAC => "camellia128-cts-cmac",
            EncryptionType::CAMELLIA256_CTS_CMAC => "camellia256-cts-cmac",
        }
    }
}
