// src/archive.rs

//! Sequential reader over zip-format archives
//!
//! Distribution zips, WARs and harness JARs are all zip files. The reader
//! hands out entries one at a time, in archive order, through a visitor:
//! an entry's byte stream is only valid inside the callback that receives
//! it, which keeps every consumer single-pass.

use crate::error::{Error, Result};
use crate::filesystem::{WriteMode, write_stream};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// One entry of an archive, borrowed for the duration of a visit
pub struct ArchiveEntry<'a> {
    name: String,
    is_dir: bool,
    read_failed: bool,
    reader: &'a mut dyn Read,
}

impl ArchiveEntry<'_> {
    /// Entry name as stored in the archive, always `/`-separated
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Stream the entry's data into `target`
    ///
    /// A failure while decoding the entry (bad compressed data, CRC
    /// mismatch) is reported as [`Error::CorruptEntry`] against the entry.
    /// Failures on the target side stay [`Error::Extraction`].
    pub fn write_to(&mut self, target: &Path, mode: WriteMode) -> Result<u64> {
        match write_stream(self, target, mode) {
            Err(Error::Extraction { source, .. }) if self.read_failed => Err(Error::CorruptEntry {
                entry: self.name.clone(),
                source,
            }),
            other => other,
        }
    }
}

impl Read for ArchiveEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let result = self.reader.read(buf);
        if result.is_err() {
            self.read_failed = true;
        }
        result
    }
}

/// Forward-only view over the entries of a zip archive
pub struct ArchiveReader<R: Read + Seek> {
    path: PathBuf,
    archive: ZipArchive<R>,
}

impl ArchiveReader<BufReader<File>> {
    /// Open an archive on disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::archive(path, e.into()))?;
        Self::from_reader(path, BufReader::new(file))
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Wrap any seekable byte source; `path` is only used for error context
    pub fn from_reader(path: impl Into<PathBuf>, reader: R) -> Result<Self> {
        let path = path.into();
        let archive = ZipArchive::new(reader).map_err(|e| Error::archive(&path, e))?;
        debug!("Opened archive {} ({} entries)", path.display(), archive.len());
        Ok(Self { path, archive })
    }

    /// Number of entries in the archive
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Visit every entry in archive order
    ///
    /// The first error returned by `visit` stops the walk and is returned.
    pub fn for_each_entry<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&mut ArchiveEntry<'_>) -> Result<()>,
    {
        for index in 0..self.archive.len() {
            let mut file = self
                .archive
                .by_index(index)
                .map_err(|e| Error::archive(&self.path, e))?;

            let mut entry = ArchiveEntry {
                name: file.name().to_string(),
                is_dir: file.is_dir(),
                read_failed: false,
                reader: &mut file,
            };
            visit(&mut entry)?;
        }
        Ok(())
    }
}
