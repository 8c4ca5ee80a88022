// src/extract.rs

//! Distribution extraction
//!
//! The distribution zip wraps everything in one top-level directory
//! (`servlet-tck/...`). Extraction drops that first path segment so the
//! working directory holds the distribution's contents directly.

use crate::archive::ArchiveReader;
use crate::error::Result;
use crate::filesystem::{WriteMode, ensure_dir, safe_join, strip_root_segment};
use std::path::Path;
use tracing::{debug, info};

/// Counts from one extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub dirs: usize,
    pub bytes: u64,
}

/// Unpack `archive` into `work_dir`, stripping the root segment of every entry
///
/// Stops at the first entry that cannot be written. Files already written
/// are left in place, so a re-run over a partial tree fails on the first
/// existing file.
pub fn extract_distribution(archive: &Path, work_dir: &Path) -> Result<ExtractSummary> {
    let mut reader = ArchiveReader::open(archive)?;
    ensure_dir(work_dir)?;
    info!(
        "Extracting {} ({} entries) into {}",
        archive.display(),
        reader.len(),
        work_dir.display()
    );

    let mut summary = ExtractSummary::default();
    reader.for_each_entry(|entry| {
        let Some(relative) = strip_root_segment(entry.name()) else {
            debug!("Skipping root entry {}", entry.name());
            return Ok(());
        };
        let target = safe_join(work_dir, relative)?;

        if entry.is_dir() {
            ensure_dir(&target)?;
            summary.dirs += 1;
        } else {
            summary.bytes += entry.write_to(&target, WriteMode::CreateNew)?;
            summary.files += 1;
        }
        Ok(())
    })?;

    info!(
        "Extracted {} files, {} directories ({} bytes)",
        summary.files, summary.dirs, summary.bytes
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::{build_zip, corrupt_zip};
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extract_strips_root() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("tck.zip");
        fs::write(
            &archive,
            build_zip(&[
                ("servlet-tck/", b""),
                ("servlet-tck/lib/", b""),
                ("servlet-tck/lib/javatest.jar", b"jar"),
                ("servlet-tck/src/com/x/Y.java", b"class Y {}"),
                ("servlet-tck/empty/", b""),
            ]),
        )
        .unwrap();
        let work = temp_dir.path().join("tck");

        let summary = extract_distribution(&archive, &work).unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.dirs, 2);
        assert_eq!(fs::read(work.join("lib/javatest.jar")).unwrap(), b"jar");
        assert!(work.join("src/com/x/Y.java").exists());
        assert!(work.join("empty").is_dir());
        assert!(!work.join("servlet-tck").exists());
    }

    #[test]
    fn test_extract_over_existing_tree_fails() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("tck.zip");
        fs::write(&archive, build_zip(&[("root/readme.txt", b"new")])).unwrap();
        let work = temp_dir.path().join("tck");
        fs::create_dir_all(&work).unwrap();
        fs::write(work.join("readme.txt"), b"old").unwrap();

        let err = extract_distribution(&archive, &work).unwrap_err();

        assert!(matches!(err, Error::Extraction { .. }));
        assert_eq!(fs::read(work.join("readme.txt")).unwrap(), b"old");
    }

    #[test]
    fn test_extract_missing_archive() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("none.zip");
        let err = extract_distribution(&missing, temp_dir.path()).unwrap_err();
        assert!(matches!(err, Error::Archive { .. }));
    }

    #[test]
    fn test_extract_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("tck.zip");
        fs::write(&archive, build_zip(&[("root/../../evil.txt", b"x")])).unwrap();
        let work = temp_dir.path().join("a/tck");

        let err = extract_distribution(&archive, &work).unwrap_err();

        assert!(matches!(err, Error::PathTraversal(_)));
        assert!(!temp_dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_extract_corrupt_entry_is_archive_error() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("tck.zip");
        fs::write(&archive, corrupt_zip("root/readme.txt", b"distribution readme")).unwrap();
        let work = temp_dir.path().join("tck");

        let err = extract_distribution(&archive, &work).unwrap_err();

        assert!(matches!(err, Error::CorruptEntry { .. }));
    }
}
