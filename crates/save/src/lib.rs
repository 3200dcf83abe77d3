//! Session persistence for the real-time layer.
//!
//! Snapshots every resource registered in the [`realtime::SaveableRegistry`]
//! into a versioned, LZ4-compressed, checksummed file and restores it again.
//! Requests arrive as [`SaveGameEvent`], [`LoadGameEvent`] and
//! [`NewGameEvent`] and are handled by an exclusive system outside the
//! fixed simulation tick.

pub mod atomic_write;
pub mod file_header;
pub mod save_codec;
pub mod save_error;
mod save_plugin;
pub mod saveable_ext;

#[cfg(test)]
mod save_fuzz_tests;

pub use save_codec::{
    decode_save, encode_save, load_from_file, load_world, reset_world, restore_world, save_to_file,
    save_world, snapshot_world, SaveData, CURRENT_SAVE_VERSION,
};
pub use save_error::SaveError;
pub use save_plugin::{
    LoadGameEvent, NewGameEvent, SaveFilePath, SaveGameEvent, SaveLoadStats, SavePlugin,
};
pub use saveable_ext::SaveableAppExt;
