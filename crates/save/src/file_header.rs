// ---------------------------------------------------------------------------
// file_header – Save file header with magic bytes, version, and checksum
// ---------------------------------------------------------------------------
//
// Header format (28 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "RTSV"
//   [4..8]   Header format version (u32)
//   [8..12]  Flags (u32: bit 0 = LZ4-compressed payload)
//   [12..20] Timestamp (Unix epoch seconds, u64)
//   [20..24] Uncompressed payload size (u32)
//   [24..28] xxHash32 checksum of the payload (everything after the header)

use xxhash_rust::xxh32::xxh32;

use crate::save_error::SaveError;

/// Magic bytes identifying a session save file.
pub const MAGIC: [u8; 4] = *b"RTSV";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 28;

/// Header layout version. The `SaveData` version tracks the payload schema
/// separately.
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Payload is LZ4-compressed (size-prepended block format).
pub const FLAG_COMPRESSED: u32 = 1 << 0;

const XXHASH_SEED: u32 = 0;

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub flags: u32,
    pub timestamp: u64,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

impl FileHeader {
    /// Header for `payload`, stamped with the current time.
    pub fn new(payload: &[u8], flags: u32, uncompressed_size: u32) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            format_version: HEADER_FORMAT_VERSION,
            flags,
            timestamp,
            uncompressed_size,
            checksum: xxh32(payload, XXHASH_SEED),
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.format_version.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&self.checksum.to_le_bytes());
    }
}

/// Prefix `payload` with a header. Returns `[header] ++ [payload]`.
pub fn wrap_with_header(payload: &[u8], flags: u32, uncompressed_size: u32) -> Vec<u8> {
    let header = FileHeader::new(payload, flags, uncompressed_size);
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    header.write_to(&mut out);
    out.extend_from_slice(payload);
    out
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(buf)
}

fn le_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(buf)
}

/// Parse and validate the header, returning it with the payload slice.
///
/// # Errors
///
/// - `InvalidHeader` if the magic bytes are missing or the file is shorter
///   than a header
/// - `VersionMismatch` if the header comes from a newer build
/// - `ChecksumMismatch` if the payload was modified or damaged
pub fn unwrap_header(bytes: &[u8]) -> Result<(FileHeader, &[u8]), SaveError> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Err(SaveError::InvalidHeader(
            "not a session save file (missing RTSV magic)".to_string(),
        ));
    }
    if bytes.len() < HEADER_SIZE {
        return Err(SaveError::InvalidHeader(format!(
            "file is too short ({} bytes, need at least {} for header)",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let header = FileHeader {
        format_version: le_u32(bytes, 4),
        flags: le_u32(bytes, 8),
        timestamp: le_u64(bytes, 12),
        uncompressed_size: le_u32(bytes, 20),
        checksum: le_u32(bytes, 24),
    };

    if header.format_version > HEADER_FORMAT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: HEADER_FORMAT_VERSION,
            found: header.format_version,
        });
    }

    let payload = &bytes[HEADER_SIZE..];
    let computed = xxh32(payload, XXHASH_SEED);
    if computed != header.checksum {
        return Err(SaveError::ChecksumMismatch {
            expected: header.checksum,
            found: computed,
        });
    }

    Ok((header, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_and_unwrap_roundtrip() {
        let data = b"hello world save data";
        let wrapped = wrap_with_header(data, 0, data.len() as u32);

        assert_eq!(&wrapped[..4], b"RTSV");
        assert_eq!(wrapped.len(), HEADER_SIZE + data.len());

        let (header, payload) = unwrap_header(&wrapped).expect("unwrap should succeed");
        assert_eq!(header.format_version, HEADER_FORMAT_VERSION);
        assert!(!header.is_compressed());
        assert_eq!(header.uncompressed_size, data.len() as u32);
        assert_eq!(payload, data);
    }

    #[test]
    fn test_flags_survive() {
        let wrapped = wrap_with_header(b"x", FLAG_COMPRESSED, 500);
        let (header, _) = unwrap_header(&wrapped).expect("unwrap should succeed");
        assert!(header.is_compressed());
        assert_eq!(header.uncompressed_size, 500);
    }

    #[test]
    fn test_missing_magic_rejected() {
        let result = unwrap_header(b"\x00\x01\x02\x03some other data");
        assert!(matches!(result, Err(SaveError::InvalidHeader(_))));
        assert!(matches!(unwrap_header(b""), Err(SaveError::InvalidHeader(_))));
    }

    #[test]
    fn test_truncated_header_detected() {
        let err = unwrap_header(b"RTSV\x01\x00").unwrap_err();
        assert!(format!("{err}").contains("too short"), "got: {err}");
    }

    #[test]
    fn test_corrupted_payload_detected() {
        let data = b"test payload";
        let mut wrapped = wrap_with_header(data, 0, data.len() as u32);
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0xFF;

        assert!(matches!(
            unwrap_header(&wrapped),
            Err(SaveError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupted_checksum_field_detected() {
        let mut wrapped = wrap_with_header(b"payload", 0, 7);
        wrapped[24] ^= 0x01;
        assert!(matches!(
            unwrap_header(&wrapped),
            Err(SaveError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_future_header_version_rejected() {
        let mut wrapped = wrap_with_header(b"test payload", 0, 12);
        wrapped[4..8].copy_from_slice(&999u32.to_le_bytes());

        match unwrap_header(&wrapped) {
            Err(SaveError::VersionMismatch { found, .. }) => assert_eq!(found, 999),
            other => panic!("expected VersionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_payload_roundtrip() {
        let wrapped = wrap_with_header(b"", 0, 0);
        assert_eq!(wrapped.len(), HEADER_SIZE);
        let (header, payload) = unwrap_header(&wrapped).expect("unwrap should succeed");
        assert_eq!(header.uncompressed_size, 0);
        assert!(payload.is_empty());
    }
}
