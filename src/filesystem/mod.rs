// src/filesystem/mod.rs

//! Filesystem helpers shared by every pipeline stage
//!
//! All writes map I/O failures to [`Error::Extraction`] carrying the target
//! path, so per-unit reports say which file could not be written. Archive
//! entries go through `ArchiveEntry::write_to`, which tells a failing
//! entry apart from a failing target.

pub mod path;

use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

pub use path::{safe_join, sanitize_path, strip_root_segment};

/// How to treat a target file that already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Fail the copy with `AlreadyExists`
    #[default]
    CreateNew,
    /// Truncate and replace the existing file
    Overwrite,
}

impl WriteMode {
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite { Self::Overwrite } else { Self::CreateNew }
    }
}

/// Create a directory and all of its parents (`mkdir -p`)
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|e| Error::extraction(dir, e))?;
        debug!("Created directory: {}", dir.display());
    }
    Ok(())
}

/// Stream `reader` into `target`, creating parent directories as needed
///
/// Returns the number of bytes written.
pub fn write_stream<R: Read + ?Sized>(
    reader: &mut R,
    target: &Path,
    mode: WriteMode,
) -> Result<u64> {
    if let Some(parent) = target.parent() {
        ensure_dir(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    match mode {
        WriteMode::CreateNew => options.create_new(true),
        WriteMode::Overwrite => options.create(true).truncate(true),
    };

    let mut file = options.open(target).map_err(|e| Error::extraction(target, e))?;
    let written = io::copy(reader, &mut file).map_err(|e| Error::extraction(target, e))?;
    file.flush().map_err(|e| Error::extraction(target, e))?;
    Ok(written)
}

/// Copy a file on disk to `target`
pub fn copy_file(source: &Path, target: &Path, mode: WriteMode) -> Result<u64> {
    let mut input = File::open(source).map_err(|e| Error::extraction(source, e))?;
    write_stream(&mut input, target, mode)
}

/// Write `contents` to `target` unless the file already exists
///
/// Returns `true` when the file was created. An existing file is left
/// byte-for-byte untouched.
pub fn write_if_absent(target: &Path, contents: &str) -> Result<bool> {
    if let Some(parent) = target.parent() {
        ensure_dir(parent)?;
    }

    match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(mut file) => {
            file.write_all(contents.as_bytes())
                .map_err(|e| Error::extraction(target, e))?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            debug!("Keeping existing file: {}", target.display());
            Ok(false)
        }
        Err(e) => Err(Error::extraction(target, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_stream_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a/b/c.txt");

        let written = write_stream(&mut &b"hello"[..], &target, WriteMode::CreateNew).unwrap();

        assert_eq!(written, 5);
        assert_eq!(fs::read(&target).unwrap(), b"hello");
    }

    #[test]
    fn test_write_stream_create_new_rejects_existing() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("c.txt");
        fs::write(&target, b"old").unwrap();

        let result = write_stream(&mut &b"new"[..], &target, WriteMode::CreateNew);

        assert!(matches!(result, Err(Error::Extraction { .. })));
        assert_eq!(fs::read(&target).unwrap(), b"old");
    }

    #[test]
    fn test_write_stream_overwrite_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("c.txt");
        fs::write(&target, b"old content").unwrap();

        write_stream(&mut &b"new"[..], &target, WriteMode::Overwrite).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn test_write_if_absent_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("pom.xml");

        assert!(write_if_absent(&target, "first").unwrap());
        assert!(!write_if_absent(&target, "second").unwrap());
        assert_eq!(fs::read_to_string(&target).unwrap(), "first");
    }

    #[test]
    fn test_copy_file_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let result = copy_file(
            &temp_dir.path().join("missing.java"),
            &temp_dir.path().join("out.java"),
            WriteMode::CreateNew,
        );
        assert!(result.is_err());
        assert!(!temp_dir.path().join("out.java").exists());
    }
}
