// src/module/mod.rs

//! Maven module construction
//!
//! One module per deployed web archive, plus the fixed harness modules.
//! A module goes through three phases: its directory is created, its POM
//! is written (once), then it is populated from the archive. Population
//! reads each archive once and routes every entry both to the
//! [`ResourceExploder`] and the [`SourceResolver`].

pub mod harness;
pub mod resources;
pub mod sources;

use crate::archive::ArchiveReader;
use crate::config::DescriptorSection;
use crate::deploy::{deployed_units, unit_module_name};
use crate::descriptor::{
    DescriptorKind, HARNESS_MODULES, write_aggregator_descriptor, write_module_descriptor,
};
use crate::error::{Error, Result};
use crate::filesystem::{WriteMode, ensure_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use harness::{BundleContext, BundleCounts, HARNESS_BUNDLES, HarnessBundle};
pub use resources::ResourceExploder;
pub use sources::SourceResolver;

/// Web resources of a deployable module
pub const WEBAPP_DIR: &str = "src/main/webapp";
/// Resources of a library module
pub const RESOURCES_DIR: &str = "src/main/resources";
/// Java sources of any module
pub const SOURCES_DIR: &str = "src/main/java";

/// Paths inside one module directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    root: PathBuf,
}

impl ModuleLayout {
    pub fn new(output_dir: &Path, name: &str) -> Self {
        Self {
            root: output_dir.join(name),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn webapp_dir(&self) -> PathBuf {
        self.root.join(WEBAPP_DIR)
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.root.join(RESOURCES_DIR)
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.root.join(SOURCES_DIR)
    }
}

/// A deployed archive paired with the module it becomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleUnit {
    pub name: String,
    pub archive: PathBuf,
    pub layout: ModuleLayout,
}

/// Outcome of scaffolding
#[derive(Debug, Default)]
pub struct ScaffoldReport {
    /// Modules whose directory exists, in deployment order
    pub units: Vec<ModuleUnit>,
    /// Module POMs written by this run
    pub descriptors_written: usize,
    /// Module names listed in the aggregator after the harness modules
    pub listed: Vec<String>,
    /// Per-module failures as `(module, error)`
    pub errors: Vec<(String, Error)>,
}

/// Create a module and its POM for every archive in `deploy_dir`, then
/// write the aggregator POM
///
/// A module that cannot be created is recorded and skipped. Failing to list
/// the deployment directory or to write the aggregator is returned as an
/// error.
pub fn scaffold_modules(
    deploy_dir: &Path,
    output_dir: &Path,
    settings: &DescriptorSection,
    sort_modules: bool,
) -> Result<ScaffoldReport> {
    ensure_dir(output_dir)?;
    let mut report = ScaffoldReport::default();

    for archive in deployed_units(deploy_dir)? {
        let Some(name) = unit_module_name(&archive) else {
            continue;
        };
        let layout = ModuleLayout::new(output_dir, &name);

        let scaffolded = ensure_dir(layout.root()).and_then(|_| {
            write_module_descriptor(layout.root(), DescriptorKind::Deployable, settings)
        });
        match scaffolded {
            Ok(written) => {
                if written {
                    report.descriptors_written += 1;
                }
                report.units.push(ModuleUnit {
                    name,
                    archive,
                    layout,
                });
            }
            Err(e) => {
                warn!("Failed to scaffold module {}: {}", name, e);
                report.errors.push((name, e));
            }
        }
    }

    report.listed = list_module_dirs(output_dir, sort_modules)?;
    write_aggregator_descriptor(output_dir, &report.listed, settings)?;
    info!(
        "Scaffolded {} modules ({} new POMs)",
        report.units.len(),
        report.descriptors_written
    );
    Ok(report)
}

/// Subdirectory names of `output_dir`, harness modules excluded
///
/// Without `sorted` the order is whatever the filesystem returns.
pub fn list_module_dirs(output_dir: &Path, sorted: bool) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(output_dir)
        .map_err(|e| Error::extraction(output_dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| !HARNESS_MODULES.contains(&name.as_str()))
        .collect();
    if sorted {
        names.sort();
    }
    Ok(names)
}

/// Result of populating one module
#[derive(Debug, Default)]
pub struct PopulateOutcome {
    pub resources: usize,
    pub sources: usize,
    pub errors: Vec<Error>,
}

/// Fill a module from its web archive in a single read
///
/// Resources go to the webapp directory, class sources to the source
/// directory. The first failure of either side stops that side only;
/// the other keeps going to the end of the archive.
pub fn populate_module(unit: &ModuleUnit, source_root: &Path, mode: WriteMode) -> PopulateOutcome {
    let mut outcome = PopulateOutcome::default();

    let mut reader = match ArchiveReader::open(&unit.archive) {
        Ok(reader) => reader,
        Err(e) => {
            outcome.errors.push(e);
            return outcome;
        }
    };

    let mut exploder = ResourceExploder::new(unit.layout.webapp_dir(), mode);
    let mut resolver = SourceResolver::new(source_root, unit.layout.sources_dir(), mode);
    let mut resource_error: Option<Error> = None;
    let mut source_error: Option<Error> = None;

    let walked = reader.for_each_entry(|entry| {
        if resource_error.is_none()
            && ResourceExploder::accepts(entry.name(), entry.is_dir())
            && let Err(e) = exploder.materialize(entry)
        {
            debug!("Resource export stopped at {}", entry.name());
            resource_error = Some(e);
        }
        if source_error.is_none()
            && let Err(e) = resolver.resolve(entry.name(), entry.is_dir())
        {
            debug!("Source resolution stopped at {}", entry.name());
            source_error = Some(e);
        }
        Ok(())
    });

    outcome.resources = exploder.written();
    outcome.sources = resolver.copied();
    outcome.errors.extend(resource_error);
    outcome.errors.extend(source_error);
    if let Err(e) = walked {
        outcome.errors.push(e);
    }
    outcome
}
