//! Atomic file replacement

use std::io::{self, Write};
use std::path::Path;

/// Write `contents` to `path` by way of a sibling temp file and a rename.
///
/// Parent directories are created as needed. A crash mid-write leaves the
/// previous file (or nothing) in place.
pub fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
