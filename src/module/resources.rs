// src/module/resources.rs

//! Resource exploding
//!
//! Every non-class file of a web archive (JSPs, HTML, `web.xml`, property
//! files, ...) is copied into the module's webapp directory at the same
//! relative path. Harness JARs are exploded whole, directories included.

use crate::archive::{ArchiveEntry, ArchiveReader};
use crate::error::Result;
use crate::filesystem::path::ends_with_ignore_case;
use crate::filesystem::{WriteMode, ensure_dir, safe_join};
use crate::module::sources::CLASS_SUFFIX;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Copies archive entries under a target directory
#[derive(Debug)]
pub struct ResourceExploder {
    target_dir: PathBuf,
    mode: WriteMode,
    written: usize,
}

impl ResourceExploder {
    pub fn new(target_dir: impl Into<PathBuf>, mode: WriteMode) -> Self {
        Self {
            target_dir: target_dir.into(),
            mode,
            written: 0,
        }
    }

    /// True for entries that belong in the webapp directory
    pub fn accepts(name: &str, is_dir: bool) -> bool {
        !is_dir && !ends_with_ignore_case(name, CLASS_SUFFIX)
    }

    /// Materialize one entry: directories are created, files are copied
    pub fn materialize(&mut self, entry: &mut ArchiveEntry<'_>) -> Result<()> {
        let target = safe_join(&self.target_dir, entry.name())?;
        if entry.is_dir() {
            return ensure_dir(&target);
        }

        let bytes = entry.write_to(&target, self.mode)?;
        debug!("Exploded {} ({} bytes)", entry.name(), bytes);
        self.written += 1;
        Ok(())
    }

    /// Number of files written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

/// Copy every entry of `archive` into `target_dir`, without filtering
pub fn explode_all(archive: &Path, target_dir: &Path, mode: WriteMode) -> Result<usize> {
    let mut reader = ArchiveReader::open(archive)?;
    let mut exploder = ResourceExploder::new(target_dir, mode);
    ensure_dir(target_dir)?;

    reader.for_each_entry(|entry| exploder.materialize(entry))?;

    Ok(exploder.written())
}
