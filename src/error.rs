// src/error.rs

//! Error types for the conversion pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while converting a distribution
#[derive(Error, Debug)]
pub enum Error {
    /// The archive at `path` is malformed or unreadable
    #[error("Failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    /// Entry data could not be decoded (bad compression, CRC mismatch)
    #[error("Corrupt archive entry {entry}: {source}")]
    CorruptEntry { entry: String, source: io::Error },

    /// A filesystem write failed while materializing `path`
    #[error("Failed to write {path}: {source}")]
    Extraction { path: PathBuf, source: io::Error },

    /// A compiled class could not be mapped back to its source file
    #[error("Cannot resolve source for {entry}: {reason}")]
    Resolution { entry: String, reason: String },

    #[error("Path traversal detected: {0}")]
    PathTraversal(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Coarse classification used by the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Archive,
    Extraction,
    Resolution,
    Other,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Archive => write!(f, "archive"),
            Self::Extraction => write!(f, "extraction"),
            Self::Resolution => write!(f, "resolution"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl Error {
    /// Wrap a zip error with the archive it came from
    pub fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O error with the file being written
    pub fn extraction(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Extraction {
            path: path.into(),
            source,
        }
    }

    pub fn resolution(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Classify this error for reporting and exit status
    ///
    /// Unsafe entry paths count as archive errors since they come from
    /// archive content.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Archive { .. }
            | Self::CorruptEntry { .. }
            | Self::PathTraversal(_)
            | Self::InvalidPath(_) => ErrorCategory::Archive,
            Self::Extraction { .. } | Self::Io(_) => ErrorCategory::Extraction,
            Self::Resolution { .. } => ErrorCategory::Resolution,
            Self::Download(_) | Self::Config(_) => ErrorCategory::Other,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_classification() {
        let err = Error::extraction("/tmp/x", io::Error::other("disk full"));
        assert_eq!(err.category(), ErrorCategory::Extraction);

        let err = Error::resolution("WEB-INF/classes/a/B.class", "source not found");
        assert_eq!(err.category(), ErrorCategory::Resolution);

        let err = Error::CorruptEntry {
            entry: "index.html".to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, "Invalid checksum"),
        };
        assert_eq!(err.category(), ErrorCategory::Archive);

        let err = Error::PathTraversal("../etc/passwd".to_string());
        assert_eq!(err.category(), ErrorCategory::Archive);

        let err = Error::Download("HTTP 404".to_string());
        assert_eq!(err.category(), ErrorCategory::Other);
    }

    #[test]
    fn test_error_display_includes_context() {
        let err = Error::resolution("WEB-INF/classes/com/x/Y.class", "source not found");
        let msg = err.to_string();
        assert!(msg.contains("com/x/Y.class"));
        assert!(msg.contains("source not found"));
    }
}
