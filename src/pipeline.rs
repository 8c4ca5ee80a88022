// src/pipeline.rs

//! Conversion pipeline
//!
//! Runs every stage in order: fetch, extract, deploy, scaffold, populate
//! each module, then build the harness modules. Failures inside one module
//! are recorded in that module's [`UnitReport`] and the run moves on; only
//! a missing distribution stops it early.

use crate::config::Config;
use crate::deploy::{Collision, deploy_units};
use crate::error::{Error, ErrorCategory, Result};
use crate::extract::extract_distribution;
use crate::fetch::{FetchOutcome, fetch_distribution};
use crate::filesystem::WriteMode;
use crate::module::{BundleContext, HARNESS_BUNDLES, populate_module, scaffold_modules};
use crate::progress::{ProgressStyle, ProgressTracker};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Errors and counts for one module
#[derive(Debug, Default)]
pub struct UnitReport {
    pub name: String,
    pub resources: usize,
    pub sources: usize,
    pub errors: Vec<Error>,
}

impl UnitReport {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Everything a run did and everything that went wrong
#[derive(Debug, Default)]
pub struct RunReport {
    /// Bytes downloaded by this run, `None` when nothing was fetched
    pub downloaded: Option<u64>,
    pub extracted_files: usize,
    pub deployed: usize,
    pub collisions: Vec<Collision>,
    /// Module POMs written by this run
    pub descriptors_written: usize,
    /// One report per web module, then one per harness module
    pub units: Vec<UnitReport>,
    /// Failures outside any module (extraction, deployment copies)
    pub errors: Vec<Error>,
}

impl RunReport {
    pub fn resources(&self) -> usize {
        self.units.iter().map(|u| u.resources).sum()
    }

    pub fn sources(&self) -> usize {
        self.units.iter().map(|u| u.sources).sum()
    }

    /// Every recorded error, run-level first
    pub fn all_errors(&self) -> impl Iterator<Item = &Error> {
        self.errors
            .iter()
            .chain(self.units.iter().flat_map(|u| u.errors.iter()))
    }

    /// Error counts per category
    pub fn error_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for err in self.all_errors() {
            *counts.entry(err.category().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// True if any archive, extraction or resolution error was recorded
    pub fn has_failures(&self) -> bool {
        self.all_errors().any(|e| {
            matches!(
                e.category(),
                ErrorCategory::Archive | ErrorCategory::Extraction | ErrorCategory::Resolution
            )
        })
    }

    /// Modules that finished with at least one error
    pub fn failed_units(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| !u.is_ok())
    }
}

/// Converts one distribution according to a [`Config`]
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run every stage and report the outcome
    ///
    /// Returns `Err` only when there is nothing to convert: the download
    /// failed, or extraction failed with no working tree left from an
    /// earlier run. Scaffolding failures at the output root are also fatal.
    pub fn run(&self, progress: &dyn ProgressTracker) -> Result<RunReport> {
        let paths = &self.config.paths;
        let mode = WriteMode::from_overwrite(self.config.run.overwrite);
        let mut report = RunReport::default();

        if let Some(url) = &paths.url {
            let download = progress.child("Downloading distribution", 0, ProgressStyle::Bytes);
            let outcome = fetch_distribution(url, &paths.archive, download.as_ref())?;
            if let FetchOutcome::Downloaded(bytes) = outcome {
                report.downloaded = Some(bytes);
            }
        }

        // extraction creates the working directory, so check before it runs
        let had_tree = paths.work_dir.is_dir();
        match extract_distribution(&paths.archive, &paths.work_dir) {
            Ok(summary) => report.extracted_files = summary.files,
            Err(e) if had_tree => {
                warn!(
                    "Extraction failed, continuing with existing tree at {}: {}",
                    paths.work_dir.display(),
                    e
                );
                report.errors.push(e);
            }
            Err(e) => return Err(e),
        }

        let deployment = deploy_units(&paths.work_dir, &paths.deploy_dir)?;
        report.deployed = deployment.deployed.len();
        report.collisions = deployment.collisions;
        report.errors.extend(deployment.errors);

        let scaffold = scaffold_modules(
            &paths.deploy_dir,
            &paths.output_dir,
            &self.config.descriptor,
            self.config.run.sort_modules,
        )?;
        report.descriptors_written = scaffold.descriptors_written;
        for (name, e) in scaffold.errors {
            let mut unit = UnitReport::new(name);
            unit.errors.push(e);
            report.units.push(unit);
        }

        let source_root = self.config.source_root();
        progress.set_length((scaffold.units.len() + HARNESS_BUNDLES.len()) as u64);
        for module in &scaffold.units {
            progress.set_message(&module.name);
            let outcome = populate_module(module, &source_root, mode);
            for e in &outcome.errors {
                warn!("Module {}: {}", module.name, e);
            }
            report.units.push(UnitReport {
                name: module.name.clone(),
                resources: outcome.resources,
                sources: outcome.sources,
                errors: outcome.errors,
            });
            progress.increment(1);
        }

        let ctx = BundleContext {
            work_dir: &paths.work_dir,
            source_root: &source_root,
            output_dir: &paths.output_dir,
            settings: &self.config.descriptor,
            mode,
        };
        for bundle in &HARNESS_BUNDLES {
            progress.set_message(bundle.name);
            let mut unit = UnitReport::new(bundle.name);
            match bundle.build(&ctx) {
                Ok(counts) => {
                    unit.resources = counts.resources;
                    unit.sources = counts.sources;
                }
                Err(e) => {
                    warn!("Harness module {}: {}", bundle.name, e);
                    unit.errors.push(e);
                }
            }
            report.units.push(unit);
            progress.increment(1);
        }

        if report.has_failures() {
            progress.finish_with_error("conversion finished with errors");
        } else {
            progress.finish_with_message("conversion complete");
        }
        info!(
            "Converted {} modules: {} resources, {} sources, {} collisions",
            report.units.len(),
            report.resources(),
            report.sources(),
            report.collisions.len()
        );
        Ok(report)
    }
}
