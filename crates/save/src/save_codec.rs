//! Session snapshot encoding.
//!
//! A save file is `[header][payload]`, where the payload is an
//! LZ4-compressed bitcode `SaveData`: a schema version plus the extension
//! map produced by the `SaveableRegistry`.

use std::collections::BTreeMap;
use std::path::Path;

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use realtime::SaveableRegistry;

use crate::file_header::{unwrap_header, wrap_with_header, FLAG_COMPRESSED};
use crate::save_error::SaveError;

/// Payload schema version. Bump when an extension's encoding changes in a
/// way old builds cannot read.
pub const CURRENT_SAVE_VERSION: u32 = 1;

/// Everything persisted for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct SaveData {
    pub version: u32,
    pub extensions: BTreeMap<String, Vec<u8>>,
}

impl SaveData {
    pub fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bitcode::Error> {
        bitcode::decode(bytes)
    }
}

// ---------------------------------------------------------------------------
// Bytes <-> SaveData
// ---------------------------------------------------------------------------

/// Serialize `save` into file bytes (header + compressed payload).
pub fn encode_save(save: &SaveData) -> Result<Vec<u8>, SaveError> {
    let encoded = save.encode();
    let uncompressed_size = u32::try_from(encoded.len()).map_err(|_| {
        SaveError::Encode(format!("payload of {} bytes is too large", encoded.len()))
    })?;
    let compressed = lz4_flex::compress_prepend_size(&encoded);
    Ok(wrap_with_header(&compressed, FLAG_COMPRESSED, uncompressed_size))
}

/// Validate and decode file bytes written by [`encode_save`].
pub fn decode_save(bytes: &[u8]) -> Result<SaveData, SaveError> {
    let (header, payload) = unwrap_header(bytes)?;
    debug!(
        "Save header: format v{}, flags {:#X}, timestamp {}, data size {}, checksum {:#010X}",
        header.format_version,
        header.flags,
        header.timestamp,
        header.uncompressed_size,
        header.checksum,
    );

    let decoded = if header.is_compressed() {
        // The block carries its own size prefix; it must agree with the header
        // before anything is allocated for it.
        if payload.len() < 4 || payload[..4] != header.uncompressed_size.to_le_bytes() {
            return Err(SaveError::Decode(
                "compressed block size does not match header".to_string(),
            ));
        }
        lz4_flex::decompress_size_prepended(payload)?
    } else {
        payload.to_vec()
    };
    if decoded.len() != header.uncompressed_size as usize {
        return Err(SaveError::Decode(format!(
            "payload is {} bytes, header says {}",
            decoded.len(),
            header.uncompressed_size
        )));
    }

    let save = SaveData::decode(&decoded)?;
    if save.version > CURRENT_SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: CURRENT_SAVE_VERSION,
            found: save.version,
        });
    }
    Ok(save)
}

// ---------------------------------------------------------------------------
// World <-> SaveData
// ---------------------------------------------------------------------------

/// Collect every registered resource of `world` into a `SaveData`.
pub fn snapshot_world(world: &World) -> Result<SaveData, SaveError> {
    let registry = world
        .get_resource::<SaveableRegistry>()
        .ok_or_else(|| SaveError::MissingResource("SaveableRegistry".to_string()))?;
    Ok(SaveData {
        version: CURRENT_SAVE_VERSION,
        extensions: registry.save_all(world),
    })
}

/// Restore every registered resource from `save`.
pub fn restore_world(world: &mut World, save: &SaveData) -> Result<(), SaveError> {
    let registry = world
        .remove_resource::<SaveableRegistry>()
        .ok_or_else(|| SaveError::MissingResource("SaveableRegistry".to_string()))?;
    registry.load_all(world, &save.extensions);
    world.insert_resource(registry);
    Ok(())
}

/// Reset every registered resource to its default (new session).
pub fn reset_world(world: &mut World) -> Result<(), SaveError> {
    let registry = world
        .remove_resource::<SaveableRegistry>()
        .ok_or_else(|| SaveError::MissingResource("SaveableRegistry".to_string()))?;
    registry.reset_all(world);
    world.insert_resource(registry);
    Ok(())
}

/// Snapshot `world` straight to file bytes.
pub fn save_world(world: &World) -> Result<Vec<u8>, SaveError> {
    encode_save(&snapshot_world(world)?)
}

/// Restore `world` from file bytes.
pub fn load_world(world: &mut World, bytes: &[u8]) -> Result<SaveData, SaveError> {
    let save = decode_save(bytes)?;
    restore_world(world, &save)?;
    Ok(save)
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Save `world` to `path` atomically. Returns the number of bytes written.
pub fn save_to_file(world: &World, path: impl AsRef<Path>) -> Result<usize, SaveError> {
    let bytes = save_world(world)?;
    crate::atomic_write::atomic_write(path, &bytes)?;
    Ok(bytes.len())
}

/// Load `world` from the save file at `path`.
pub fn load_from_file(world: &mut World, path: impl AsRef<Path>) -> Result<SaveData, SaveError> {
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(SaveError::NoData);
    }
    load_world(world, &bytes)
}
