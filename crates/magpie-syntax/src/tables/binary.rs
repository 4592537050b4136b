//! Binary serialization of [`GrammarTables`].
//!
//! Layout: 4-byte magic, 2-byte little-endian format version, 4-byte
//! little-endian CRC32 of the payload, then the postcard-encoded tables.
//! The checksum is verified before deserialization, so a truncated or
//! bit-flipped file is rejected with a precise error instead of a decode
//! failure deep inside postcard.

use thiserror::Error;

use super::GrammarTables;

const MAGIC: [u8; 4] = *b"MGPT";
const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("not a Magpie table file (bad magic)")]
    BadMagic,
    #[error("unsupported table format version {0} (expected {FORMAT_VERSION})")]
    UnsupportedVersion(u16),
    #[error("table file shorter than its header")]
    Truncated,
    #[error("table payload checksum mismatch")]
    Checksum,
    #[error("table encoding failed: {0}")]
    Encode(#[source] postcard::Error),
    #[error("table decoding failed: {0}")]
    Decode(#[source] postcard::Error),
}

pub fn encode(tables: &GrammarTables) -> Result<Vec<u8>, CodecError> {
    let payload = postcard::to_allocvec(tables).map_err(CodecError::Encode)?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<GrammarTables, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated);
    }
    if bytes[..4] != MAGIC {
        return Err(CodecError::BadMagic);
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let expected = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
    let payload = &bytes[HEADER_LEN..];
    if crc32fast::hash(payload) != expected {
        return Err(CodecError::Checksum);
    }
    postcard::from_bytes(payload).map_err(CodecError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables;

    #[test]
    fn round_trips_the_real_tables() {
        let built = tables::magpie().unwrap();
        let bytes = encode(built).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(*built, decoded);
    }

    #[test]
    fn rejects_foreign_bytes() {
        assert!(matches!(decode(b"PNG\x00rest-of-file"), Err(CodecError::BadMagic)));
        assert!(matches!(decode(b"MGPT"), Err(CodecError::Truncated)));
    }

    #[test]
    fn rejects_corrupted_payload() {
        let built = tables::magpie().unwrap();
        let mut bytes = encode(built).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x40;
        assert!(matches!(decode(&bytes), Err(CodecError::Checksum)));
    }

    #[test]
    fn rejects_future_versions() {
        let built = tables::magpie().unwrap();
        let mut bytes = encode(built).unwrap();
        bytes[4] = 9;
        assert!(matches!(decode(&bytes), Err(CodecError::UnsupportedVersion(_))));
    }
}
