use crate::asn1::constants::PrincipalNameType;
use crate::constants::KEYTAB_MAGIC;
use crate::error::KrbError;
use crate::keytab::{Keytab, KeytabEntry, KeytabVersion};
use crate::proto::{EncryptionKey, Principal};
use binrw::io::{Cursor, TakeSeekExt};
use binrw::{binread, binwrite, BinRead, BinWrite, Endian};
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::num::TryFromIntError;
use tracing::{error, trace};

/// Layout table for the record shape each version selects.
///
/// | version | byte order | realm in count | name type |
/// |---------|------------|----------------|-----------|
/// | 1       | host       | yes            | no        |
/// | 2       | big        | no             | yes       |
impl KeytabVersion {
    fn endian(self) -> Endian {
        match self {
            KeytabVersion::V1 if cfg!(target_endian = "little") => Endian::Little,
            KeytabVersion::V1 | KeytabVersion::V2 => Endian::Big,
        }
    }

    fn counts_realm(self) -> bool {
        matches!(self, KeytabVersion::V1)
    }

    fn has_name_type(self) -> bool {
        matches!(self, KeytabVersion::V2)
    }

    fn components_count(self, components: usize) -> Result<u16, TryFromIntError> {
        if self.counts_realm() {
            u16::try_from(components.saturating_add(1))
        } else {
            u16::try_from(components)
        }
    }

    fn components_len(self, count: u16) -> usize {
        if self.counts_realm() {
            usize::from(count.saturating_sub(1))
        } else {
            usize::from(count)
        }
    }
}

/// A 16 bit length prefixed run of bytes. Used for both strings and keys.
#[binwrite]
#[binread]
#[derive(Clone, PartialEq, Eq)]
struct Data {
    #[br(temp)]
    #[bw(try_calc(u16::try_from(value.len())))]
    value_len: u16,
    #[br(count = value_len)]
    value: Vec<u8>,
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("len", &self.value.len())
            .finish()
    }
}

impl From<&[u8]> for Data {
    fn from(value: &[u8]) -> Self {
        Data {
            value: value.to_vec(),
        }
    }
}

impl TryFrom<Data> for String {
    type Error = KrbError;

    fn try_from(value: Data) -> Result<Self, Self::Error> {
        String::from_utf8(value.value).map_err(|err| {
            error!(?err, "Keytab string is not valid UTF-8");
            KrbError::KeytabInvalidUtf8
        })
    }
}

#[binwrite]
#[binread]
#[brw(import { version: KeytabVersion })]
#[derive(Clone, PartialEq, Eq)]
struct PrincipalRecord {
    #[br(temp)]
    #[bw(try_calc(version.components_count(components.len())))]
    components_count: u16,
    realm: Data,
    // components includes the realm in version 1
    #[br(count = version.components_len(components_count))]
    components: Vec<Data>,
    #[br(if(version.has_name_type()))]
    name_type: Option<i32>,
}

impl fmt::Debug for PrincipalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c: Vec<_> = self
            .components
            .iter()
            .map(|x| String::from_utf8_lossy(x.value.as_slice()))
            .collect();
        let r = String::from_utf8_lossy(self.realm.value.as_slice());
        f.debug_struct("PrincipalRecord")
            .field("components", &c)
            .field("realm", &r)
            .field("name_type", &self.name_type)
            .finish()
    }
}

impl PrincipalRecord {
    fn from_principal(value: &Principal, version: KeytabVersion) -> Self {
        PrincipalRecord {
            realm: Data::from(value.realm.as_bytes()),
            components: value
                .components
                .iter()
                .map(|c| Data::from(c.as_bytes()))
                .collect(),
            name_type: version.has_name_type().then_some(value.name_type),
        }
    }

    fn into_principal(self) -> Result<Principal, KrbError> {
        let components = self
            .components
            .into_iter()
            .map(String::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Principal {
            // Version 1 never recorded what kind of name this is.
            name_type: self
                .name_type
                .unwrap_or_else(|| PrincipalNameType::NtUnknown.into()),
            components,
            realm: String::try_from(self.realm)?,
        })
    }
}

/// The body of a single keytab entry, following the record length.
#[binwrite]
#[binread]
#[brw(import { version: KeytabVersion })]
#[derive(Debug, Clone, PartialEq, Eq)]
struct EntryRecord {
    #[brw(args { version })]
    principal: PrincipalRecord,
    // I think this is NOT 2038 safe and requires a version change ...
    timestamp: u32,
    kvno8: u8,
    key_type: u16,
    key: Data,
    // Only if 4 bytes remaining in the record (field present from MIT 1.14)
    #[br(try)]
    kvno32: Option<u32>,
}

impl EntryRecord {
    fn from_entry(value: &KeytabEntry, version: KeytabVersion) -> Result<Self, KrbError> {
        let key_type = u16::try_from(value.key.key_type).map_err(|_| {
            error!(
                key_type = value.key.key_type,
                "Key type can not be stored in a keytab"
            );
            KrbError::KeytabKeyTypeRange
        })?;

        Ok(EntryRecord {
            principal: PrincipalRecord::from_principal(&value.principal, version),
            timestamp: value.timestamp,
            kvno8: value.kvno8,
            key_type,
            key: Data::from(value.key.key_value.as_slice()),
            kvno32: value.kvno32,
        })
    }

    fn into_entry(self) -> Result<KeytabEntry, KrbError> {
        Ok(KeytabEntry {
            principal: self.principal.into_principal()?,
            key: EncryptionKey {
                key_type: i32::from(self.key_type),
                key_value: self.key.value,
            },
            timestamp: self.timestamp,
            kvno8: self.kvno8,
            kvno32: self.kvno32,
        })
    }
}

fn read_entries(
    reader: &mut Cursor<&[u8]>,
    version: KeytabVersion,
) -> Result<Vec<KeytabEntry>, KrbError> {
    let endian = version.endian();
    let end = reader.get_ref().len() as u64;
    let mut entries = Vec::new();

    while reader.position() < end {
        let rlen = i32::read_options(reader, endian, ()).map_err(|err| {
            error!(?err, "Unable to read keytab record length");
            KrbError::KeytabTruncated
        })?;

        let start = reader.position();
        let record_len = u64::from(rlen.unsigned_abs());

        // Fail before touching the record, a corrupt length must never turn
        // into an allocation.
        if record_len > end - start {
            error!(
                rlen,
                remaining = end - start,
                "Keytab record length exceeds the remaining buffer"
            );
            return Err(KrbError::KeytabRecordOverrun);
        }

        if rlen <= 0 {
            // A negative record length represents a "hole" in the file, it is, an entry that has
            // been invalidated. The length of the hole is the inverse of the record length.
            trace!(offset = start, len = record_len, "Skipping keytab hole");
            reader.set_position(start + record_len);
            continue;
        }

        let record = {
            let mut bounded = (&mut *reader).take_seek(record_len);
            EntryRecord::read_options(&mut bounded, endian, binrw::args! { version: version })
        }
        .map_err(|err| {
            error!(?err, offset = start, "Unable to parse keytab record");
            if err.is_eof() {
                // The fields ran past the end of the declared record.
                KrbError::KeytabRecordLength
            } else {
                KrbError::KeytabRecordMalformed
            }
        })?;

        let consumed = reader.position() - start;
        if consumed != record_len {
            error!(
                consumed,
                record_len, "Keytab record length does not match its contents"
            );
            return Err(KrbError::KeytabRecordLength);
        }

        trace!(offset = start, principal = ?record.principal, "Read keytab record");
        entries.push(record.into_entry()?);
    }

    Ok(entries)
}

// Write the record with a zero length, then seek back to fill the length in.
fn write_entry(
    writer: &mut Cursor<Vec<u8>>,
    version: KeytabVersion,
    record: &EntryRecord,
) -> Result<(), KrbError> {
    let endian = version.endian();
    let start = writer.position();

    0i32.write_options(writer, endian, ())
        .and_then(|_| record.write_options(writer, endian, binrw::args! { version: version }))
        .map_err(|err| {
            error!(?err, principal = ?record.principal, "Unable to write keytab record");
            KrbError::KeytabEncodeEntry
        })?;

    let end = writer.position();
    let rlen = i32::try_from(end - start - 4).map_err(|err| {
        error!(?err, "Keytab record is too large");
        KrbError::KeytabEncodeEntry
    })?;

    writer.set_position(start);
    rlen.write_options(writer, endian, ()).map_err(|err| {
        error!(?err, "Unable to write keytab record length");
        KrbError::KeytabEncodeEntry
    })?;
    writer.set_position(end);
    Ok(())
}

pub(super) fn read(buffer: &[u8]) -> Result<Keytab, KrbError> {
    let [magic, version, ..] = buffer else {
        error!(len = buffer.len(), "Keytab buffer is too short for a header");
        return Err(KrbError::KeytabTruncated);
    };

    if *magic != KEYTAB_MAGIC {
        error!(magic, "Keytab buffer has an invalid magic byte");
        return Err(KrbError::KeytabBadMagic);
    }

    let version = KeytabVersion::try_from(*version).map_err(|_| {
        error!(version, "Unsupported keytab version");
        KrbError::KeytabUnsupportedVersion
    })?;

    let mut reader = Cursor::new(buffer);
    reader.set_position(2);
    let entries = read_entries(&mut reader, version)?;

    Ok(Keytab { version, entries })
}

pub(super) fn write(kt: &Keytab) -> Result<Vec<u8>, KrbError> {
    // Everything lands in this buffer first, so a failure part way through
    // never hands out half a keytab.
    let mut writer = Cursor::new(vec![KEYTAB_MAGIC, kt.version.into()]);
    writer.set_position(2);

    for entry in &kt.entries {
        let record = EntryRecord::from_entry(entry, kt.version)?;
        write_entry(&mut writer, kt.version, &record)?;
    }

    Ok(writer.into_inner())
}

pub(super) fn store(kt_name: &str, kt: &Keytab) -> Result<(), KrbError> {
    let path = kt_name
        .strip_prefix("FILE:")
        .ok_or(KrbError::UnsupportedKeytabType)?;

    let buffer = write(kt)?;

    let mut f = File::create(path).map_err(|io_err| {
        error!(?io_err, "Unable to create file at {}", path);
        KrbError::KeytabFileError
    })?;

    f.write_all(&buffer).map_err(|io_err| {
        error!(?io_err, "Unable to write keytab to {}", path);
        KrbError::IoError
    })?;

    Ok(())
}

// Never pulls more than `max_size + 1` bytes, whatever the file claimed when
// it was opened.
fn read_bounded<R: Read>(reader: R, max_size: usize) -> Result<Vec<u8>, KrbError> {
    let limit = u64::try_from(max_size)
        .unwrap_or(u64::MAX)
        .saturating_add(1);

    let mut buffer = Vec::new();
    reader
        .take(limit)
        .read_to_end(&mut buffer)
        .map_err(|io_err| {
            error!(?io_err, "Unable to read keytab");
            KrbError::IoError
        })?;

    if buffer.len() > max_size {
        error!(max_size, "Keytab grew past the size limit while reading");
        return Err(KrbError::KeytabTooLarge);
    }

    Ok(buffer)
}

pub(super) fn load(kt_name: &str, max_size: usize) -> Result<Keytab, KrbError> {
    let path = kt_name
        .strip_prefix("FILE:")
        .ok_or(KrbError::UnsupportedKeytabType)?;

    let f = File::open(path).map_err(|io_err| {
        error!(?io_err, "Unable to open file at {}", path);
        KrbError::KeytabFileError
    })?;

    let len = f
        .metadata()
        .map_err(|io_err| {
            error!(?io_err, "Unable to stat keytab at {}", path);
            KrbError::KeytabFileError
        })?
        .len();

    if len > max_size as u64 {
        error!(len, max_size, "Keytab at {} is too large", path);
        return Err(KrbError::KeytabTooLarge);
    }

    let buffer = read_bounded(f, max_size)?;
    read(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use assert_hex::assert_eq_hex;

    const TESTUSER1_KEYTAB: &str = "05020000003b0001000b544553542e474f4b52423500097465737475736572310000000159beb1d80100110010698c4df8e9f60e7eea5a21bf4526ad2500000001";

    fn testuser1_keytab() -> Vec<u8> {
        hex::decode(TESTUSER1_KEYTAB).expect("Failed to decode sample")
    }

    #[test]
    fn test_keytab_unmarshal() {
        let _ = tracing_subscriber::fmt::try_init();

        let kt = read(&testuser1_keytab()).expect("Failed to read from buffer");
        assert_eq!(kt.version, KeytabVersion::V2);
        assert_eq!(kt.entries.len(), 1);

        let e = &kt.entries[0];
        assert_eq!(e.kvno32, Some(1));
        assert_eq!(e.kvno8, 1);
        assert_eq!(e.timestamp, 1505669592);
        assert_eq!(e.key.key_type, 17);
        assert_eq!(
            hex::encode(&e.key.key_value),
            "698c4df8e9f60e7eea5a21bf4526ad25"
        );
        assert_eq!(e.principal.num_components(), 1);
        assert_eq!(e.principal.name_type, 1);
        assert_eq!(e.principal.realm, "TEST.GOKRB5");
        assert_eq!(e.principal.components[0], "testuser1");
    }

    #[test]
    fn test_keytab_marshal() {
        let buf = testuser1_keytab();
        let kt = read(&buf).expect("Failed to read from buffer");
        let out = write(&kt).expect("Failed to write");
        assert_eq_hex!(out, buf);

        let kt2 = read(&out).expect("Failed to read marshaled bytes");
        assert_eq!(kt, kt2);
    }

    #[test]
    fn test_keytab_read_write() {
        /*
         * This is a keytab produced by MIT's ktutil, with a mix of user and
         * host principals.
         */
        let mit_buf = "0502000000370001000a41464f524553542e41440006414e45544f240000000166ffb9ce0200110010cf8ea47a88cf230810f8ecbc9a1d4ea900000002000000470001000a41464f524553542e41440006414e45544f240000000166ffb9ce0200120020ed373e70378deac2b312e0ef95c5675091273661a2d7d001fb5dd28fb7ee007f000000020000003c0002000a41464f524553542e41440004686f73740005414e45544f0000000166ffb9ce0200110010cf8ea47a88cf230810f8ecbc9a1d4ea9000000020000004c0002000a41464f524553542e41440004686f73740005414e45544f0000000166ffb9ce0200120020ed373e70378deac2b312e0ef95c5675091273661a2d7d001fb5dd28fb7ee007f00000002000000490002000a41464f524553542e41440011526573747269637465644b7262486f73740005414e45544f0000000166ffb9ce0200110010cf8ea47a88cf230810f8ecbc9a1d4ea900000002000000590002000a41464f524553542e41440011526573747269637465644b7262486f73740005414e45544f0000000166ffb9ce0200120020ed373e70378deac2b312e0ef95c5675091273661a2d7d001fb5dd28fb7ee007f00000002";
        let mit_buf = hex::decode(mit_buf).expect("Failed to decode sample");
        let kt = read(&mit_buf).expect("Failed to read from buffer");

        assert_eq!(kt.entries.len(), 6);
        assert_eq!(kt.entries[0].principal.to_string(), "ANETO$@AFOREST.AD");
        assert_eq!(kt.entries[2].principal.to_string(), "host/ANETO@AFOREST.AD");
        assert_eq!(
            kt.entries[5].principal.to_string(),
            "RestrictedKrbHost/ANETO@AFOREST.AD"
        );

        let krime_buf = write(&kt).expect("Failed to write");
        assert_eq_hex!(krime_buf, mit_buf);
    }

    #[test]
    fn test_keytab_read_write_with_holes() {
        let mit_buf = "0502000000370001000a41464f524553542e41440006414e45544f240000000166ffb9ce0200110010cf8ea47a88cf230810f8ecbc9a1d4ea900000002ffffffb90001000a41464f524553542e41440006414e45544f240000000166ffb9ce0200120020ed373e70378deac2b312e0ef95c5675091273661a2d7d001fb5dd28fb7ee007f000000020000003c0002000a41464f524553542e41440004686f73740005414e45544f0000000166ffb9ce0200110010cf8ea47a88cf230810f8ecbc9a1d4ea9000000020000004c0002000a41464f524553542e41440004686f73740005414e45544f0000000166ffb9ce0200120020ed373e70378deac2b312e0ef95c5675091273661a2d7d001fb5dd28fb7ee007f00000002ffffffb70002000a41464f524553542e41440011526573747269637465644b7262486f73740005414e45544f0000000166ffb9ce0200110010cf8ea47a88cf230810f8ecbc9a1d4ea900000002000000590002000a41464f524553542e41440011526573747269637465644b7262486f73740005414e45544f0000000166ffb9ce0200120020ed373e70378deac2b312e0ef95c5675091273661a2d7d001fb5dd28fb7ee007f00000002";
        let mit_buf = hex::decode(mit_buf).expect("Failed to decode sample");
        let kt = read(&mit_buf).expect("Failed to read from buffer");
        assert_eq!(kt.entries.len(), 4);

        // Holes are dropped when writing, so the file shrinks by the two holes
        // and their length prefixes.
        let krime_buf = write(&kt).expect("Failed to write");
        assert_eq!(mit_buf.len() - (0x47 + 4) - (0x49 + 4), krime_buf.len());

        let kt2 = read(&krime_buf).expect("Failed to read from buffer");
        assert_eq!(kt, kt2);
    }

    #[test]
    fn test_keytab_negative_length_skips() {
        let _ = tracing_subscriber::fmt::try_init();

        let mut buf = vec![0x05, 0x02];
        buf.extend_from_slice(&(-20i32).to_be_bytes());
        buf.extend_from_slice(&[0xa5; 20]);
        buf.extend_from_slice(&testuser1_keytab()[2..]);

        let kt = read(&buf).expect("Failed to read from buffer");
        assert_eq!(kt.entries.len(), 1);
        assert_eq!(kt.entries[0].principal.components[0], "testuser1");

        assert_eq_hex!(write(&kt).expect("Failed to write"), testuser1_keytab());

        // Nothing but a hole compacts down to the bare header.
        let hole_only = &buf[..26];
        let kt = read(hole_only).expect("Failed to read from buffer");
        assert!(kt.is_empty());
        assert_eq_hex!(write(&kt).expect("Failed to write"), vec![0x05, 0x02]);
    }

    #[test]
    fn test_keytab_read_pre_1_14() {
        // No trailing 32 bit kvno on any record.
        let mit_buf = "0502000000460001000b4558414d504c452e4f524700087465737475736572000000016703af2e010012002012041af3423a7ec2002784c14dfd9c6df58b49498238a250249940b5f36f430b000000460001000b4558414d504c452e4f524700087465737475736572000000016703af2fff0012002012041af3423a7ec2002784c14dfd9c6df58b49498238a250249940b5f36f430b000000460001000b4558414d504c452e4f524700087465737475736572000000016703af2f000012002012041af3423a7ec2002784c14dfd9c6df58b49498238a250249940b5f36f430b000000460001000b4558414d504c452e4f524700087465737475736572000000016703af2fd20012002012041af3423a7ec2002784c14dfd9c6df58b49498238a250249940b5f36f430b";
        let mit_buf = hex::decode(mit_buf).expect("Failed to decode sample");
        let kt = read(&mit_buf).expect("Failed to read from buffer");

        let kvs_wrap = [1, 255, 0, 210];
        assert_eq!(kt.entries.len(), kvs_wrap.len());
        for (e, kv) in kt.entries.iter().zip(kvs_wrap) {
            assert_eq!(e.kvno8, kv);
            assert!(e.kvno32.is_none());
            assert_eq!(e.kvno(), u32::from(kv));
        }

        // Absence of the trailer survives a round trip.
        assert_eq_hex!(write(&kt).expect("Failed to write"), mit_buf);

        // Both fields present, and disagreeing once the kvno passes 255.
        let mit_buf = "05020000004a0001000b4558414d504c452e4f524700087465737475736572000000016703aeff010012002012041af3423a7ec2002784c14dfd9c6df58b49498238a250249940b5f36f430b000000010000004a0001000b4558414d504c452e4f524700087465737475736572000000016703aeffff0012002012041af3423a7ec2002784c14dfd9c6df58b49498238a250249940b5f36f430b000000ff0000004a0001000b4558414d504c452e4f524700087465737475736572000000016703aeff000012002012041af3423a7ec2002784c14dfd9c6df58b49498238a250249940b5f36f430b000001000000004a0001000b4558414d504c452e4f524700087465737475736572000000016703aeffd20012002012041af3423a7ec2002784c14dfd9c6df58b49498238a250249940b5f36f430b499602d2";
        let mit_buf = hex::decode(mit_buf).expect("Failed to decode sample");
        let kt = read(&mit_buf).expect("Failed to read from buffer");

        let kvs: [u32; 4] = [1, 255, 256, 1234567890];
        assert_eq!(kt.entries.len(), kvs.len());
        for (i, e) in kt.entries.iter().enumerate() {
            assert_eq!(e.kvno8, kvs_wrap[i]);
            assert_eq!(e.kvno32, Some(kvs[i]));
            assert_eq!(e.kvno(), kvs[i]);
        }

        assert_eq_hex!(write(&kt).expect("Failed to write"), mit_buf);
    }

    #[test]
    fn test_keytab_kvno_fields_independent() {
        let mut kt = read(&testuser1_keytab()).expect("Failed to read from buffer");
        kt.entries[0].kvno8 = 7;
        kt.entries[0].kvno32 = Some(0x1234);

        let buf = write(&kt).expect("Failed to write");
        let kt2 = read(&buf).expect("Failed to read from buffer");
        assert_eq!(kt2.entries[0].kvno8, 7);
        assert_eq!(kt2.entries[0].kvno32, Some(0x1234));
    }

    #[test]
    fn test_keytab_empty() {
        let kt = read(&[0x05, 0x02]).expect("Failed to read from buffer");
        assert_eq!(kt.version, KeytabVersion::V2);
        assert!(kt.entries.is_empty());
        assert_eq!(write(&kt).expect("Failed to write"), vec![0x05, 0x02]);
    }

    #[test]
    fn test_keytab_zero_components() {
        let mut kt = Keytab::new();
        kt.add_entry(
            Principal::new(PrincipalNameType::NtUnknown, &[], "TEST.GOKRB5"),
            EncryptionKey::new(17, &[1; 16]),
            1505669592,
            1,
        );
        let buf = write(&kt).expect("Failed to write");
        // The count is still written, as zero.
        assert_eq!(&buf[6..8], &[0x00, 0x00]);

        let kt2 = read(&buf).expect("Failed to read from buffer");
        assert_eq!(kt, kt2);
        assert!(kt2.entries[0].principal.components.is_empty());
    }

    #[test]
    fn test_keytab_v1_layout() {
        let mut kt = Keytab {
            version: KeytabVersion::V1,
            entries: Vec::new(),
        };
        kt.add_entry(
            Principal::new(PrincipalNameType::NtUnknown, &["testuser1"], "TEST.GOKRB5"),
            EncryptionKey::new(17, &[1; 16]),
            1505669592,
            1,
        );

        let buf = write(&kt).expect("Failed to write");
        assert_eq!(&buf[..2], &[0x05, 0x01]);
        // No name type, so four bytes shorter than the version 2 record.
        assert_eq!(&buf[2..6], &55i32.to_ne_bytes());
        // The realm counts as a component.
        assert_eq!(&buf[6..8], &2u16.to_ne_bytes());

        let kt2 = read(&buf).expect("Failed to read from buffer");
        assert_eq!(kt, kt2);
    }

    #[test]
    fn test_keytab_idempotent() {
        // A pre 1.14 record, a hole, then a current record.
        let pre_1_14 = "000000460001000b4558414d504c452e4f524700087465737475736572000000016703af2e010012002012041af3423a7ec2002784c14dfd9c6df58b49498238a250249940b5f36f430b";
        let mut buf = vec![0x05, 0x02];
        buf.extend_from_slice(&hex::decode(pre_1_14).expect("Failed to decode sample"));
        buf.extend_from_slice(&(-20i32).to_be_bytes());
        buf.extend_from_slice(&[0; 20]);
        buf.extend_from_slice(&testuser1_keytab()[2..]);

        let kt1 = read(&buf).expect("Failed to read from buffer");
        assert_eq!(kt1.entries.len(), 2);
        let kt2 = read(&write(&kt1).expect("Failed to write")).expect("Failed to read");
        assert_eq!(kt1, kt2);
    }

    #[test]
    fn test_keytab_bad_header() {
        assert_eq!(read(&[]), Err(KrbError::KeytabTruncated));
        assert_eq!(read(&[0x05]), Err(KrbError::KeytabTruncated));
        assert_eq!(read(&[0x06, 0x02]), Err(KrbError::KeytabBadMagic));
        assert_eq!(read(&[0x05, 0x03]), Err(KrbError::KeytabUnsupportedVersion));
        assert_eq!(KrbError::KeytabUnsupportedVersion.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_keytab_truncated_length() {
        assert_eq!(
            read(&[0x05, 0x02, 0x00, 0x00]),
            Err(KrbError::KeytabTruncated)
        );
    }

    #[test]
    fn test_keytab_length_overrun() {
        let _ = tracing_subscriber::fmt::try_init();

        let mut buf = testuser1_keytab();
        buf[2..6].copy_from_slice(&i32::MAX.to_be_bytes());
        assert_eq!(read(&buf), Err(KrbError::KeytabRecordOverrun));

        buf[2..6].copy_from_slice(&i32::MIN.to_be_bytes());
        assert_eq!(read(&buf), Err(KrbError::KeytabRecordOverrun));

        let mut buf = testuser1_keytab();
        buf.truncate(buf.len() - 1);
        assert_eq!(read(&buf), Err(KrbError::KeytabRecordOverrun));
    }

    #[test]
    fn test_keytab_length_mismatch() {
        // Declared length is shorter than the fields need.
        let mut buf = testuser1_keytab();
        buf[2..6].copy_from_slice(&0x30i32.to_be_bytes());
        let err = read(&buf).expect_err("Read a short record");
        assert_eq!(err.kind(), ErrorKind::Format);

        // Declared length leaves stray bytes after the trailing kvno.
        let mut buf = testuser1_keytab();
        buf[2..6].copy_from_slice(&0x3ei32.to_be_bytes());
        buf.extend_from_slice(&[0, 0, 0]);
        assert_eq!(read(&buf), Err(KrbError::KeytabRecordLength));

        // Two stray bytes where the trailing kvno would go.
        let mut buf = testuser1_keytab();
        buf.truncate(buf.len() - 2);
        buf[2..6].copy_from_slice(&0x39i32.to_be_bytes());
        assert_eq!(read(&buf), Err(KrbError::KeytabRecordLength));
    }

    #[test]
    fn test_keytab_component_count_mismatch() {
        for count in [0u8, 2, 5] {
            let mut buf = testuser1_keytab();
            buf[7] = count;
            let err = read(&buf).expect_err("Read a record with a bad component count");
            assert_eq!(err.kind(), ErrorKind::Format, "count {}", count);
        }
    }

    #[test]
    fn test_keytab_invalid_utf8() {
        let mut buf = testuser1_keytab();
        // First byte of "testuser1"
        buf[23] = 0xff;
        assert_eq!(read(&buf), Err(KrbError::KeytabInvalidUtf8));
    }

    #[test]
    fn test_keytab_key_type_range() {
        let mut kt = Keytab::new();
        kt.add_entry(
            Principal::principal("testuser1", "TEST.GOKRB5"),
            EncryptionKey::new(-1, &[1; 16]),
            1505669592,
            1,
        );
        assert_eq!(write(&kt), Err(KrbError::KeytabKeyTypeRange));
    }

    #[test]
    fn test_keytab_oversized_component() {
        let big = "a".repeat(usize::from(u16::MAX) + 1);
        let mut kt = Keytab::new();
        kt.add_entry(
            Principal::principal(&big, "TEST.GOKRB5"),
            EncryptionKey::new(17, &[1; 16]),
            1505669592,
            1,
        );
        let err = write(&kt).expect_err("Wrote an oversized component");
        assert_eq!(err, KrbError::KeytabEncodeEntry);
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_keytab_read_bounded() {
        let _ = tracing_subscriber::fmt::try_init();

        // A source that never ends stands in for a file that keeps growing
        // after the size check.
        assert_eq!(
            read_bounded(std::io::repeat(0x05), 64),
            Err(KrbError::KeytabTooLarge)
        );

        let kt = testuser1_keytab();
        let buf = read_bounded(kt.as_slice(), kt.len()).expect("Failed to read within limit");
        assert_eq!(buf, kt);
        assert_eq!(
            read_bounded(kt.as_slice(), kt.len() - 1),
            Err(KrbError::KeytabTooLarge)
        );
    }
}
