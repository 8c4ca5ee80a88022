// src/lib.rs

//! tckport
//!
//! Converts a compliance-test (TCK) distribution zip into a multi-module
//! Maven project: one `war` module per web archive in the distribution,
//! with resources exploded and classes mapped back to their sources, plus
//! the harness library modules and an aggregator POM.
//!
//! # Architecture
//!
//! - Single-pass archives: every zip is read once, entry by entry
//! - Explicit configuration: one `Config` value flows through every stage
//! - Resumable: directories and POMs are created only if absent
//! - Per-module reports: one broken archive never stops the run

pub mod archive;
pub mod config;
pub mod deploy;
pub mod descriptor;
mod error;
pub mod extract;
pub mod fetch;
pub mod filesystem;
pub mod module;
pub mod pipeline;
pub mod progress;

pub use archive::{ArchiveEntry, ArchiveReader};
pub use config::Config;
pub use deploy::{Collision, DeployReport};
pub use descriptor::DescriptorKind;
pub use error::{Error, ErrorCategory, Result};
pub use filesystem::WriteMode;
pub use module::ModuleLayout;
pub use pipeline::{Pipeline, RunReport, UnitReport};
pub use progress::{CliProgress, LogProgress, ProgressStyle, ProgressTracker, SilentProgress};
