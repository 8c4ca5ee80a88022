// src/module/harness.rs

//! Harness support modules
//!
//! Every converted web module depends on three libraries shipped with the
//! distribution. Two are JARs under `lib/` that are exploded whole into a
//! module's resources; the third is a pair of utility sources copied from
//! the distribution's source tree.

use crate::config::DescriptorSection;
use crate::descriptor::{DescriptorKind, write_module_descriptor};
use crate::error::{Error, Result};
use crate::filesystem::{WriteMode, copy_file, ensure_dir, safe_join};
use crate::module::ModuleLayout;
use crate::module::resources::explode_all;
use std::path::Path;
use tracing::info;
use zip::result::ZipError;

/// What a harness module is populated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleContent {
    /// JAR path relative to the working directory, exploded into resources
    Jar(&'static str),
    /// Source paths relative to the source root, copied into sources
    Sources(&'static [&'static str]),
}

/// A fixed harness module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessBundle {
    pub name: &'static str,
    pub content: BundleContent,
}

const COMMON_SOURCES: &[&str] = &[
    "com/sun/ts/tests/servlet/common/util/Data.java",
    "com/sun/ts/tests/servlet/common/util/StaticLog.java",
];

/// The harness modules, in aggregator order
pub const HARNESS_BUNDLES: [HarnessBundle; 3] = [
    HarnessBundle {
        name: "javatest",
        content: BundleContent::Jar("lib/javatest.jar"),
    },
    HarnessBundle {
        name: "tsharness",
        content: BundleContent::Jar("lib/tsharness.jar"),
    },
    HarnessBundle {
        name: "common",
        content: BundleContent::Sources(COMMON_SOURCES),
    },
];

/// Inputs shared by every harness bundle
#[derive(Debug, Clone, Copy)]
pub struct BundleContext<'a> {
    pub work_dir: &'a Path,
    pub source_root: &'a Path,
    pub output_dir: &'a Path,
    pub settings: &'a DescriptorSection,
    pub mode: WriteMode,
}

/// Files written into one harness module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleCounts {
    pub resources: usize,
    pub sources: usize,
}

impl HarnessBundle {
    /// Scaffold and populate this bundle's module
    ///
    /// A missing JAR is an archive error; a missing source file is a
    /// resolution error naming the file.
    pub fn build(&self, ctx: &BundleContext<'_>) -> Result<BundleCounts> {
        let layout = ModuleLayout::new(ctx.output_dir, self.name);
        ensure_dir(layout.root())?;
        write_module_descriptor(layout.root(), DescriptorKind::Library, ctx.settings)?;

        let mut counts = BundleCounts::default();
        match self.content {
            BundleContent::Jar(jar) => {
                let archive = ctx.work_dir.join(jar);
                if !archive.is_file() {
                    return Err(Error::archive(&archive, ZipError::FileNotFound));
                }
                counts.resources = explode_all(&archive, &layout.resources_dir(), ctx.mode)?;
            }
            BundleContent::Sources(files) => {
                let target_dir = layout.sources_dir();
                ensure_dir(&target_dir)?;
                for relative in files {
                    let source = safe_join(ctx.source_root, relative)?;
                    if !source.is_file() {
                        return Err(Error::resolution(
                            *relative,
                            format!("source file {} not found", source.display()),
                        ));
                    }
                    copy_file(&source, &safe_join(&target_dir, relative)?, ctx.mode)?;
                    counts.sources += 1;
                }
            }
        }

        info!(
            "Built harness module {} ({} resources, {} sources)",
            self.name, counts.resources, counts.sources
        );
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::build_zip;
    use crate::descriptor::{DESCRIPTOR_FILE, HARNESS_MODULES};
    use std::fs;
    use tempfile::TempDir;

    fn context<'a>(root: &'a Path, settings: &'a DescriptorSection) -> BundleContext<'a> {
        BundleContext {
            work_dir: root,
            source_root: root,
            output_dir: root,
            settings,
            mode: WriteMode::CreateNew,
        }
    }

    #[test]
    fn test_bundle_names_match_aggregator() {
        let names: Vec<_> = HARNESS_BUNDLES.iter().map(|b| b.name).collect();
        assert_eq!(names, HARNESS_MODULES);
    }

    #[test]
    fn test_build_jar_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let work = temp_dir.path().join("tck");
        let output = temp_dir.path().join("maven");
        fs::create_dir_all(work.join("lib")).unwrap();
        fs::write(
            work.join("lib/javatest.jar"),
            build_zip(&[
                ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n"),
                ("com/sun/javatest/Harness.class", b"\xca\xfe"),
            ]),
        )
        .unwrap();

        let settings = DescriptorSection::default();
        let ctx = BundleContext {
            work_dir: &work,
            output_dir: &output,
            ..context(temp_dir.path(), &settings)
        };
        let counts = HARNESS_BUNDLES[0].build(&ctx).unwrap();

        assert_eq!(counts, BundleCounts { resources: 2, sources: 0 });
        let module = output.join("javatest");
        assert!(module.join("src/main/resources/com/sun/javatest/Harness.class").exists());
        let pom = fs::read_to_string(module.join(DESCRIPTOR_FILE)).unwrap();
        assert!(pom.contains("<packaging>jar</packaging>"));
    }

    #[test]
    fn test_build_missing_jar_is_archive_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings = DescriptorSection::default();

        let ctx = context(temp_dir.path(), &settings);
        let err = HARNESS_BUNDLES[1].build(&ctx).unwrap_err();

        assert!(matches!(err, Error::Archive { .. }));
        // the module is still scaffolded
        assert!(temp_dir.path().join("tsharness").join(DESCRIPTOR_FILE).exists());
    }

    #[test]
    fn test_build_sources_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let source_root = temp_dir.path().join("tck/src");
        let util = source_root.join("com/sun/ts/tests/servlet/common/util");
        fs::create_dir_all(&util).unwrap();
        fs::write(util.join("Data.java"), b"class Data {}").unwrap();
        fs::write(util.join("StaticLog.java"), b"class StaticLog {}").unwrap();
        let output = temp_dir.path().join("maven");

        let settings = DescriptorSection::default();
        let ctx = BundleContext {
            source_root: &source_root,
            output_dir: &output,
            ..context(temp_dir.path(), &settings)
        };
        let counts = HARNESS_BUNDLES[2].build(&ctx).unwrap();

        assert_eq!(counts, BundleCounts { resources: 0, sources: 2 });
        let copied = output.join("common/src/main/java").join(COMMON_SOURCES[0]);
        assert_eq!(fs::read(copied).unwrap(), b"class Data {}");
    }

    #[test]
    fn test_build_missing_source_is_resolution_error() {
        let temp_dir = TempDir::new().unwrap();
        let source_root = temp_dir.path().join("tck/src");
        let util = source_root.join("com/sun/ts/tests/servlet/common/util");
        fs::create_dir_all(&util).unwrap();
        fs::write(util.join("StaticLog.java"), b"class StaticLog {}").unwrap();

        let settings = DescriptorSection::default();
        let ctx = BundleContext {
            source_root: &source_root,
            ..context(temp_dir.path(), &settings)
        };
        let err = HARNESS_BUNDLES[2].build(&ctx).unwrap_err();

        assert!(matches!(&err, Error::Resolution { entry, .. } if entry.ends_with("Data.java")));
        assert_eq!(err.category(), crate::error::ErrorCategory::Resolution);
    }
}
