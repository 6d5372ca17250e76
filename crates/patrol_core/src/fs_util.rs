use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Writes `content` to `path` atomically by writing to a temporary file
/// first, syncing to disk, then renaming into place.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    // Windows refuses to rename over an open handle
    drop(file);

    fs::rename(&temp_path, path)
}
