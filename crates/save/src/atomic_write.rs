//! Crash-safe file replacement.
//!
//! Bytes go to a sibling `{path}.tmp` first, are synced to disk, and only
//! then renamed over the target, so an interrupted save leaves the previous
//! file intact.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Atomically replace the contents of `path` with `data`.
pub fn atomic_write(path: impl AsRef<Path>, data: &[u8]) -> std::io::Result<()> {
    let final_path = path.as_ref();
    let tmp_path = tmp_path_for(final_path);

    if let Some(parent) = final_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, final_path)
}
