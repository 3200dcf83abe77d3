// ---------------------------------------------------------------------------
// SaveError: typed errors for save/load operations
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that can occur while saving, loading or resetting a session.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// Encoding or compression failed.
    Encode(String),
    /// Decoding or decompression failed (corrupt or invalid save data).
    Decode(String),
    /// The file header is missing, truncated or not ours.
    InvalidHeader(String),
    /// The payload does not match the checksum stored in the header.
    ChecksumMismatch { expected: u32, found: u32 },
    /// Save file version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
    /// No save data was available to load.
    NoData,
    /// A required resource was missing from the ECS world.
    MissingResource(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::InvalidHeader(msg) => write!(f, "Invalid file header: {msg}"),
            SaveError::ChecksumMismatch { expected, found } => write!(
                f,
                "Save file is corrupted: checksum mismatch (expected {expected:#010X}, got {found:#010X})"
            ),
            SaveError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: save is v{found}, but this build only supports up to v{expected_max}"
            ),
            SaveError::NoData => write!(f, "No save data available to load"),
            SaveError::MissingResource(name) => {
                write!(f, "Missing required resource: {name}")
            }
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bitcode::Error> for SaveError {
    fn from(e: bitcode::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}

impl From<lz4_flex::block::DecompressError> for SaveError {
    fn from(e: lz4_flex::block::DecompressError) -> Self {
        SaveError::Decode(format!("decompression failed: {e}"))
    }
}
