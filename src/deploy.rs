// src/deploy.rs

//! Web archive discovery and deployment
//!
//! Walks the extracted distribution for `.war` files and copies each one,
//! by file name, into the deployment directory. Two archives with the same
//! file name are a collision: the first one found wins, the second is
//! reported and skipped. Nothing already in the deployment directory is
//! removed or replaced.

use crate::error::{Error, Result};
use crate::filesystem::path::{ends_with_ignore_case, stem_before_ignore_case};
use crate::filesystem::{WriteMode, copy_file, ensure_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File suffix identifying a deployable unit (matched case-insensitively)
pub const DEPLOYABLE_SUFFIX: &str = ".war";

/// A web archive that was skipped because its name was already taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// File name shared by both archives
    pub file_name: String,
    /// The archive that was not copied
    pub skipped: PathBuf,
}

/// Outcome of a deployment pass
#[derive(Debug, Default)]
pub struct DeployReport {
    /// Archives copied into the deployment directory by this pass
    pub deployed: Vec<PathBuf>,
    /// Duplicate file names that were skipped
    pub collisions: Vec<Collision>,
    /// Copy failures (non-fatal, the pass continues)
    pub errors: Vec<Error>,
}

/// Find every deployable archive under `root`, in a stable order
pub fn locate_deployables(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable path during scan: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| ends_with_ignore_case(&e.file_name().to_string_lossy(), DEPLOYABLE_SUFFIX))
        .map(|e| e.into_path())
        .collect()
}

/// Copy every archive found under `work_dir` into `deploy_dir`
///
/// Fails only if `deploy_dir` cannot be created; individual copy failures
/// and collisions are recorded in the report.
pub fn deploy_units(work_dir: &Path, deploy_dir: &Path) -> Result<DeployReport> {
    ensure_dir(deploy_dir)?;

    let mut report = DeployReport::default();
    let candidates = locate_deployables(work_dir);
    info!("Found {} web archives under {}", candidates.len(), work_dir.display());

    for source in candidates {
        let Some(file_name) = source.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let target = deploy_dir.join(&file_name);

        if target.exists() {
            warn!("Duplicate filename detected: {}", source.display());
            report.collisions.push(Collision {
                file_name,
                skipped: source,
            });
            continue;
        }

        match copy_file(&source, &target, WriteMode::CreateNew) {
            Ok(bytes) => {
                debug!("Deployed {} ({} bytes)", file_name, bytes);
                report.deployed.push(target);
            }
            Err(e) => {
                warn!("Failed to deploy {}: {}", source.display(), e);
                report.errors.push(e);
            }
        }
    }

    Ok(report)
}

/// List the archives in the deployment directory, sorted by file name
pub fn deployed_units(deploy_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut units: Vec<PathBuf> = fs::read_dir(deploy_dir)
        .map_err(|e| Error::extraction(deploy_dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| unit_module_name(p).is_some())
        .collect();
    units.sort();
    Ok(units)
}

/// Module name for a deployed archive: its file name cut at the suffix
///
/// `servlet_spec_cookie_web.war` gives `servlet_spec_cookie_web`.
pub fn unit_module_name(unit: &Path) -> Option<String> {
    let file_name = unit.file_name()?.to_string_lossy();
    let stem = stem_before_ignore_case(&file_name, DEPLOYABLE_SUFFIX)?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
