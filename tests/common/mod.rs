// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tckport::Config;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const DATA_JAVA: &str = "com/sun/ts/tests/servlet/common/util/Data.java";
pub const STATIC_LOG_JAVA: &str = "com/sun/ts/tests/servlet/common/util/StaticLog.java";

/// Build an in-memory zip; names ending in `/` become directory entries
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(name.trim_end_matches('/'), options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }

    writer.finish().unwrap().into_inner()
}

/// A WAR with one servlet class and one page
pub fn app_war() -> Vec<u8> {
    zip_bytes(&[
        ("WEB-INF/", b""),
        ("WEB-INF/web.xml", b"<web-app/>"),
        ("WEB-INF/classes/com/x/Y.class", b"\xca\xfe\xba\xbe"),
        ("WEB-INF/classes/com/x/Y$1.class", b"\xca\xfe\xba\xbe"),
        ("WEB-INF/classes/com/x/URLClient.class", b"\xca\xfe\xba\xbe"),
        ("index.html", b"<html>app</html>"),
    ])
}

/// Entries of a small but complete distribution rooted at `servlet-tck/`
pub fn distribution_entries(wars: &[(&'static str, Vec<u8>)]) -> Vec<(String, Vec<u8>)> {
    let mut entries: Vec<(String, Vec<u8>)> = vec![
        ("servlet-tck/".to_string(), Vec::new()),
        ("servlet-tck/src/com/x/Y.java".to_string(), b"package com.x; class Y {}".to_vec()),
        (format!("servlet-tck/src/{}", DATA_JAVA), b"class Data {}".to_vec()),
        (format!("servlet-tck/src/{}", STATIC_LOG_JAVA), b"class StaticLog {}".to_vec()),
        (
            "servlet-tck/lib/javatest.jar".to_string(),
            zip_bytes(&[("com/sun/javatest/Harness.class", b"\xca\xfe")]),
        ),
        (
            "servlet-tck/lib/tsharness.jar".to_string(),
            zip_bytes(&[("com/sun/ts/lib/harness/EETest.class", b"\xca\xfe")]),
        ),
    ];
    for (path, bytes) in wars {
        entries.push((format!("servlet-tck/{}", path), bytes.clone()));
    }
    entries
}

/// Write a distribution zip with the given WARs to `path`
pub fn write_distribution(path: &Path, wars: &[(&'static str, Vec<u8>)]) {
    let entries = distribution_entries(wars);
    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, data)| (name.as_str(), data.as_slice()))
        .collect();
    fs::write(path, zip_bytes(&borrowed)).unwrap();
}

/// Temp directory with a distribution at the default archive location
///
/// Returns (TempDir, Config) - keep the TempDir alive to prevent cleanup.
pub fn setup_distribution(wars: &[(&'static str, Vec<u8>)]) -> (TempDir, Config) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::rooted_at(temp_dir.path());
    write_distribution(&config.paths.archive, wars);
    (temp_dir, config)
}
