// src/descriptor.rs

//! Maven POM generation
//!
//! Three templates: a `war` module POM for each converted web archive, a
//! `jar` module POM for the harness libraries, and the aggregator POM that
//! lists every module. POMs are written once and never overwritten, so
//! manual edits survive re-runs.

use crate::config::DescriptorSection;
use crate::error::Result;
use crate::filesystem::write_if_absent;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of every generated build descriptor
pub const DESCRIPTOR_FILE: &str = "pom.xml";

/// Module names the aggregator always lists first
pub const HARNESS_MODULES: [&str; 3] = ["javatest", "tsharness", "common"];

/// Which module template to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Deployable web application (`war` packaging, plugin config, TCK deps)
    Deployable,
    /// Plain library (`jar` packaging, no dependencies)
    Library,
}

impl DescriptorKind {
    pub fn packaging(&self) -> &'static str {
        match self {
            Self::Deployable => "war",
            Self::Library => "jar",
        }
    }
}

const POM_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>

<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
  <modelVersion>4.0.0</modelVersion>
"#;

const MODULE_PARENT: &str = r#"  <parent>
    <groupId>{{group_id}}</groupId>
    <artifactId>{{parent_artifact_id}}</artifactId>
    <version>{{version}}</version>
  </parent>
  <artifactId>{{artifact_id}}</artifactId>
  <packaging>{{packaging}}</packaging>
  <name>{{name_prefix}} - {{artifact_id}}</name>
"#;

const COMPILER_PLUGIN: &str = r#"      <plugin>
        <groupId>org.apache.maven.plugins</groupId>
        <artifactId>maven-compiler-plugin</artifactId>
        <version>3.8.1</version>
        <configuration>
          <release>{{java_release}}</release>
        </configuration>
      </plugin>
"#;

const WAR_PLUGIN: &str = r#"      <plugin>
        <groupId>org.apache.maven.plugins</groupId>
        <artifactId>maven-war-plugin</artifactId>
        <version>3.3.2</version>
      </plugin>
"#;

const DEPLOYABLE_DEPENDENCIES: &str = r#"  <dependencies>
    <dependency>
      <groupId>jakarta.platform</groupId>
      <artifactId>jakarta.jakartaee-api</artifactId>
      <version>{{platform_api_version}}</version>
      <scope>provided</scope>
    </dependency>
{{harness_dependencies}}  </dependencies>
"#;

const HARNESS_DEPENDENCY: &str = r#"    <dependency>
      <groupId>{{group_id}}</groupId>
      <artifactId>{{harness}}</artifactId>
      <version>${project.version}</version>
      <scope>compile</scope>
    </dependency>
"#;

const ENCODING_PROPERTIES: &str = r#"  <properties>
    <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
  </properties>
"#;

const AGGREGATOR_COORDINATES: &str = r#"  <groupId>{{group_id}}</groupId>
  <artifactId>{{parent_artifact_id}}</artifactId>
  <version>{{version}}</version>
  <packaging>pom</packaging>
  <name>{{name_prefix}}</name>
"#;

const POM_FOOTER: &str = "</project>\n";

/// Replace every `{{key}}` in `template`
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{}}}}}", key), value)
    })
}

fn coordinate_vars<'a>(settings: &'a DescriptorSection) -> Vec<(&'static str, &'a str)> {
    vec![
        ("group_id", settings.group_id.as_str()),
        ("parent_artifact_id", settings.parent_artifact_id.as_str()),
        ("version", settings.version.as_str()),
        ("name_prefix", settings.name_prefix.as_str()),
        ("java_release", settings.java_release.as_str()),
        ("platform_api_version", settings.platform_api_version.as_str()),
    ]
}

/// Render a module POM for `module_name`
pub fn render_module(
    kind: DescriptorKind,
    module_name: &str,
    settings: &DescriptorSection,
) -> String {
    let mut vars = coordinate_vars(settings);
    vars.push(("artifact_id", module_name));
    vars.push(("packaging", kind.packaging()));

    let mut pom = String::from(POM_HEADER);
    pom.push_str(&fill(MODULE_PARENT, &vars));

    pom.push_str("  <build>\n    <plugins>\n");
    pom.push_str(&fill(COMPILER_PLUGIN, &vars));
    if kind == DescriptorKind::Deployable {
        pom.push_str(WAR_PLUGIN);
    }
    pom.push_str("    </plugins>\n  </build>\n");

    if kind == DescriptorKind::Deployable {
        let harness: String = HARNESS_MODULES
            .iter()
            .map(|&name| {
                fill(
                    HARNESS_DEPENDENCY,
                    &[("group_id", settings.group_id.as_str()), ("harness", name)],
                )
            })
            .collect();
        pom.push_str(&fill(
            &fill(DEPLOYABLE_DEPENDENCIES, &vars),
            &[("harness_dependencies", harness.as_str())],
        ));
    }

    pom.push_str(ENCODING_PROPERTIES);
    pom.push_str(POM_FOOTER);
    pom
}

/// Render the aggregator POM listing the harness modules then `modules`
pub fn render_aggregator(modules: &[String], settings: &DescriptorSection) -> String {
    let vars = coordinate_vars(settings);

    let mut pom = String::from(POM_HEADER);
    pom.push_str(&fill(AGGREGATOR_COORDINATES, &vars));
    pom.push_str(ENCODING_PROPERTIES);
    pom.push_str("  <modules>\n");
    for name in HARNESS_MODULES.iter().copied().chain(modules.iter().map(String::as_str)) {
        pom.push_str(&format!("    <module>{}</module>\n", name));
    }
    pom.push_str("  </modules>\n");
    pom.push_str(POM_FOOTER);
    pom
}

/// Write `<module_dir>/pom.xml` unless it already exists
///
/// The artifact id is the module directory's name.
pub fn write_module_descriptor(
    module_dir: &Path,
    kind: DescriptorKind,
    settings: &DescriptorSection,
) -> Result<bool> {
    let module_name = module_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let path = module_dir.join(DESCRIPTOR_FILE);
    let written = write_if_absent(&path, &render_module(kind, &module_name, settings))?;
    if written {
        info!("Wrote {} POM for module {}", kind.packaging(), module_name);
    }
    Ok(written)
}

/// Write `<output_dir>/pom.xml` unless it already exists
pub fn write_aggregator_descriptor(
    output_dir: &Path,
    modules: &[String],
    settings: &DescriptorSection,
) -> Result<bool> {
    let path: PathBuf = output_dir.join(DESCRIPTOR_FILE);
    let written = write_if_absent(&path, &render_aggregator(modules, settings))?;
    if written {
        info!("Wrote aggregator POM with {} modules", modules.len() + HARNESS_MODULES.len());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_deployable() {
        let settings = DescriptorSection::default();
        let pom = render_module(DescriptorKind::Deployable, "servlet_api_cookie_web", &settings);

        assert!(pom.contains("<artifactId>servlet_api_cookie_web</artifactId>"));
        assert!(pom.contains("<name>TCK - servlet_api_cookie_web</name>"));
        assert!(pom.contains("<packaging>war</packaging>"));
        assert!(pom.contains("maven-war-plugin"));
        assert!(pom.contains("<release>11</release>"));
        assert!(pom.contains("<version>9.1.0</version>"));
        assert!(pom.contains("<artifactId>tsharness</artifactId>"));
        assert!(pom.contains("<version>${project.version}</version>"));
        assert!(pom.contains("<project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>"));
        assert!(!pom.contains("{{"));
    }

    #[test]
    fn test_render_library_has_no_dependencies() {
        let pom = render_module(DescriptorKind::Library, "javatest", &DescriptorSection::default());

        assert!(pom.contains("<packaging>jar</packaging>"));
        assert!(pom.contains("<name>TCK - javatest</name>"));
        assert!(!pom.contains("<dependencies>"));
        assert!(!pom.contains("maven-war-plugin"));
        assert!(!pom.contains("{{"));
    }

    #[test]
    fn test_render_uses_settings() {
        let settings = DescriptorSection {
            group_id: "org.acme".to_string(),
            java_release: "17".to_string(),
            ..Default::default()
        };
        let pom = render_module(DescriptorKind::Deployable, "app", &settings);

        assert!(pom.contains("<groupId>org.acme</groupId>"));
        assert!(pom.contains("<release>17</release>"));
    }

    #[test]
    fn test_render_aggregator_lists_modules() {
        let modules = vec!["app".to_string(), "other".to_string()];
        let pom = render_aggregator(&modules, &DescriptorSection::default());

        assert!(pom.contains("<packaging>pom</packaging>"));
        let javatest = pom.find("<module>javatest</module>").unwrap();
        let common = pom.find("<module>common</module>").unwrap();
        let app = pom.find("<module>app</module>").unwrap();
        let other = pom.find("<module>other</module>").unwrap();
        assert!(javatest < common && common < app && app < other);
    }

    #[test]
    fn test_write_module_descriptor_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let module_dir = temp_dir.path().join("app");
        let settings = DescriptorSection::default();

        let kind = DescriptorKind::Deployable;
        assert!(write_module_descriptor(&module_dir, kind, &settings).unwrap());
        let pom_path = module_dir.join(DESCRIPTOR_FILE);
        std::fs::write(&pom_path, "edited by hand").unwrap();

        assert!(!write_module_descriptor(&module_dir, kind, &settings).unwrap());
        assert_eq!(std::fs::read_to_string(&pom_path).unwrap(), "edited by hand");
    }
}
