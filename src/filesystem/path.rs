// src/filesystem/path.rs

//! Path helpers for archive entry names
//!
//! Entry names come from untrusted archives and always use `/` separators.
//! Everything that turns an entry name into a filesystem path goes through
//! [`safe_join`] so a crafted archive cannot write outside its target.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Sanitize an archive entry name into a relative path
///
/// - Rejects `..` components
/// - Skips `.` components and leading slashes
/// - Rejects names that are empty after normalization
///
/// # Examples
///
/// ```
/// use tckport::filesystem::path::sanitize_path;
/// use std::path::PathBuf;
///
/// assert_eq!(sanitize_path("WEB-INF/web.xml").unwrap(), PathBuf::from("WEB-INF/web.xml"));
/// assert_eq!(sanitize_path("/index.html").unwrap(), PathBuf::from("index.html"));
/// assert!(sanitize_path("../../etc/passwd").is_err());
/// ```
pub fn sanitize_path(name: &str) -> Result<PathBuf> {
    let relative = name.trim_start_matches('/');
    let mut normalized = PathBuf::new();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(c) => normalized.push(c),
            Component::CurDir => {}
            Component::ParentDir => return Err(Error::PathTraversal(name.to_string())),
            Component::Prefix(_) | Component::RootDir => {}
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(Error::InvalidPath(format!("Empty entry name: '{}'", name)));
    }

    Ok(normalized)
}

/// Join `root` with a sanitized entry name
pub fn safe_join(root: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
    let root = root.as_ref();
    let joined = root.join(sanitize_path(name)?);

    if !joined.starts_with(root) {
        return Err(Error::PathTraversal(format!(
            "{} escapes {}",
            name,
            root.display()
        )));
    }

    Ok(joined)
}

/// Remove the first `/`-delimited segment of an entry name
///
/// Distribution archives wrap everything in a single root directory, e.g.
/// `servlet-tck/src/Foo.java`. Returns `None` for the root entry itself
/// (`servlet-tck/`) and for names without a separator.
pub fn strip_root_segment(name: &str) -> Option<&str> {
    let (_, rest) = name.split_once('/')?;
    if rest.is_empty() { None } else { Some(rest) }
}

/// Case-insensitive ASCII suffix test
pub fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Cut `name` at the first case-insensitive occurrence of `marker`
///
/// `app.war` with marker `.war` gives `app`; `app.WAR.bak` gives `app`.
pub fn stem_before_ignore_case<'a>(name: &'a str, marker: &str) -> Option<&'a str> {
    let lower = name.to_ascii_lowercase();
    let idx = lower.find(&marker.to_ascii_lowercase())?;
    Some(&name[..idx])
}
