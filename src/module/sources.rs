// src/module/sources.rs

//! Mapping compiled classes back to their sources
//!
//! A web archive carries only compiled classes under `WEB-INF/classes/`.
//! The distribution ships the matching sources under `<work-dir>/src/`, so
//! `WEB-INF/classes/com/x/Y.class` maps to `src/com/x/Y.java`, which is
//! copied to `<module>/src/main/java/com/x/Y.java`.
//!
//! Nested classes (`Outer$Inner.class`) share their outer class's source
//! file and are skipped, as are the test-harness client classes, which the
//! distribution does not ship as per-archive sources.

use crate::error::{Error, Result};
use crate::filesystem::path::ends_with_ignore_case;
use crate::filesystem::{WriteMode, copy_file, safe_join};
use std::path::PathBuf;
use tracing::debug;

/// Directory inside a web archive that holds compiled classes
pub const CLASSES_ROOT: &str = "WEB-INF/classes/";

pub const CLASS_SUFFIX: &str = ".class";

pub const SOURCE_SUFFIX: &str = ".java";

/// Marks nested and anonymous classes in class file names
pub const NESTED_CLASS_MARKER: char = '$';

/// Class file name endings that never map to a module source
pub const EXCLUDED_CLASS_SUFFIXES: [&str; 2] = ["Client.class", "WebTestCase.class"];

/// True if `name` is a compiled class whose source should be resolved
pub fn is_source_candidate(name: &str, is_dir: bool) -> bool {
    !is_dir
        && ends_with_ignore_case(name, CLASS_SUFFIX)
        && !name.contains(NESTED_CLASS_MARKER)
        && !EXCLUDED_CLASS_SUFFIXES
            .iter()
            .any(|suffix| name.ends_with(suffix))
}

/// Source path, relative to the source root, of a compiled class entry
///
/// Everything up to and including the last `WEB-INF/classes/` is dropped,
/// then `.class` is replaced by `.java`.
///
/// # Examples
///
/// ```
/// use tckport::module::sources::relative_source_path;
///
/// assert_eq!(
///     relative_source_path("WEB-INF/classes/com/x/Y.class").unwrap(),
///     "com/x/Y.java"
/// );
/// assert!(relative_source_path("com/x/Y.class").is_err());
/// ```
pub fn relative_source_path(name: &str) -> Result<String> {
    let start = name
        .rfind(CLASSES_ROOT)
        .map(|idx| idx + CLASSES_ROOT.len())
        .ok_or_else(|| Error::resolution(name, format!("no {} prefix", CLASSES_ROOT)))?;

    let class_path = &name[start..];
    if !ends_with_ignore_case(class_path, CLASS_SUFFIX) {
        return Err(Error::resolution(name, "not a class file"));
    }
    let stem = &class_path[..class_path.len() - CLASS_SUFFIX.len()];
    if stem.is_empty() {
        return Err(Error::resolution(name, "empty class name"));
    }

    Ok(format!("{}{}", stem, SOURCE_SUFFIX))
}

/// Copies the source file of each matching class entry into a module
#[derive(Debug)]
pub struct SourceResolver {
    source_root: PathBuf,
    target_dir: PathBuf,
    mode: WriteMode,
    copied: usize,
}

impl SourceResolver {
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        mode: WriteMode,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            target_dir: target_dir.into(),
            mode,
            copied: 0,
        }
    }

    /// Resolve one archive entry
    ///
    /// Returns `Ok(None)` for entries that are not source candidates and the
    /// copied relative path otherwise. A candidate whose source is missing
    /// is a resolution error.
    pub fn resolve(&mut self, name: &str, is_dir: bool) -> Result<Option<String>> {
        if !is_source_candidate(name, is_dir) {
            return Ok(None);
        }

        let relative = relative_source_path(name)?;
        let source = safe_join(&self.source_root, &relative)?;
        if !source.is_file() {
            return Err(Error::resolution(
                name,
                format!("source file {} not found", source.display()),
            ));
        }

        let target = safe_join(&self.target_dir, &relative)?;
        copy_file(&source, &target, self.mode)?;
        debug!("Resolved {} -> {}", name, relative);
        self.copied += 1;
        Ok(Some(relative))
    }

    /// Number of source files copied so far
    pub fn copied(&self) -> usize {
        self.copied
    }
}
