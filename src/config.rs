// src/config.rs

//! Run configuration
//!
//! A single [`Config`] value is built once (defaults, then an optional TOML
//! file, then command-line overrides) and passed to every pipeline stage.
//!
//! ```toml
//! [paths]
//! archive = "downloads/servlet-tck.zip"
//! url = "https://example.org/servlet-tck-5.0.0.zip"
//! work_dir = "tck"
//! deploy_dir = "webapps"
//! output_dir = "maven"
//!
//! [run]
//! overwrite = false
//! sort_modules = true
//!
//! [descriptor]
//! group_id = "tck"
//! java_release = "17"
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Input and output locations
    #[serde(default)]
    pub paths: PathsSection,

    /// Run behavior
    #[serde(default)]
    pub run: RunSection,

    /// Values substituted into generated POMs
    #[serde(default)]
    pub descriptor: DescriptorSection,
}

/// Where things are read from and written to
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Distribution zip (downloaded here when `url` is set)
    #[serde(default = "default_archive")]
    pub archive: PathBuf,

    /// Optional URL to fetch the distribution from
    #[serde(default)]
    pub url: Option<String>,

    /// Directory the distribution is extracted into
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Directory WAR files are collected into
    #[serde(default = "default_deploy_dir")]
    pub deploy_dir: PathBuf,

    /// Root of the generated Maven tree
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            archive: default_archive(),
            url: None,
            work_dir: default_work_dir(),
            deploy_dir: default_deploy_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_archive() -> PathBuf {
    PathBuf::from("tck.zip")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("tck")
}

fn default_deploy_dir() -> PathBuf {
    PathBuf::from("webapps")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("maven")
}

/// Run behavior switches
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Replace populated files that already exist instead of failing
    ///
    /// Generated POMs are never replaced, whatever this says.
    #[serde(default)]
    pub overwrite: bool,

    /// Sort module names in the aggregator POM
    #[serde(default = "default_true")]
    pub sort_modules: bool,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            overwrite: false,
            sort_modules: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Coordinates and versions written into generated POMs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorSection {
    /// Group id shared by the parent and every module
    #[serde(default = "default_group_id")]
    pub group_id: String,

    /// Artifact id of the aggregator POM
    #[serde(default = "default_parent_artifact_id")]
    pub parent_artifact_id: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Prefix of every module's display name (`<prefix> - <module>`)
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,

    /// `maven-compiler-plugin` release level
    #[serde(default = "default_java_release")]
    pub java_release: String,

    /// Version of the provided platform API dependency
    #[serde(default = "default_platform_api_version")]
    pub platform_api_version: String,
}

impl Default for DescriptorSection {
    fn default() -> Self {
        Self {
            group_id: default_group_id(),
            parent_artifact_id: default_parent_artifact_id(),
            version: default_version(),
            name_prefix: default_name_prefix(),
            java_release: default_java_release(),
            platform_api_version: default_platform_api_version(),
        }
    }
}

fn default_group_id() -> String {
    "tck".to_string()
}

fn default_parent_artifact_id() -> String {
    "project".to_string()
}

fn default_version() -> String {
    "1-SNAPSHOT".to_string()
}

fn default_name_prefix() -> String {
    "TCK".to_string()
}

fn default_java_release() -> String {
    "11".to_string()
}

fn default_platform_api_version() -> String {
    "9.1.0".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Directory holding the distribution's global source tree
    pub fn source_root(&self) -> PathBuf {
        self.paths.work_dir.join("src")
    }

    /// Config rooted at `base`: every default location becomes `base/<name>`
    pub fn rooted_at(base: &Path) -> Self {
        let mut config = Self::default();
        config.paths.archive = base.join(&config.paths.archive);
        config.paths.work_dir = base.join(&config.paths.work_dir);
        config.paths.deploy_dir = base.join(&config.paths.deploy_dir);
        config.paths.output_dir = base.join(&config.paths.output_dir);
        config
    }
}
