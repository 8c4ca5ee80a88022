// src/fetch.rs

//! Distribution download
//!
//! A single blocking GET streamed to `<dest>.part`, renamed into place once
//! the body is complete so an interrupted download never looks finished.

use crate::error::{Error, Result};
use crate::filesystem::ensure_dir;
use crate::progress::ProgressTracker;
use reqwest::blocking::{Client, Response};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Connect timeout for the distribution server
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Outcome of [`fetch_distribution`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The archive was downloaded, with its size in bytes
    Downloaded(u64),
    /// The archive was already present and left untouched
    AlreadyPresent,
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Download `url` to `dest` unless `dest` already exists
pub fn fetch_distribution(
    url: &str,
    dest: &Path,
    progress: &dyn ProgressTracker,
) -> Result<FetchOutcome> {
    if dest.is_file() {
        info!("Distribution already present at {}, skipping download", dest.display());
        return Ok(FetchOutcome::AlreadyPresent);
    }
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    info!("Downloading distribution from {}", url);
    // The body of a large distribution can take minutes, so only the connect
    // phase is bounded.
    let client = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(None)
        .build()
        .map_err(|e| Error::Download(format!("Failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| Error::Download(format!("Failed to fetch {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(Error::Download(format!("HTTP {} from {url}", response.status())));
    }

    let part = partial_path(dest);
    let mut file = File::create(&part).map_err(|e| Error::extraction(&part, e))?;
    let written = match stream_response_to_file(response, &mut file, &part, progress) {
        Ok(written) => written,
        Err(e) => {
            drop(file);
            let _ = fs::remove_file(&part);
            progress.finish_with_error(&e.to_string());
            return Err(e);
        }
    };
    drop(file);

    fs::rename(&part, dest).map_err(|e| Error::extraction(dest, e))?;
    progress.finish_with_message("download complete");
    info!("Downloaded {} bytes to {}", written, dest.display());
    Ok(FetchOutcome::Downloaded(written))
}

/// Stream an HTTP response to a file, reporting bytes to `progress`
fn stream_response_to_file(
    mut response: Response,
    file: &mut File,
    path: &Path,
    progress: &dyn ProgressTracker,
) -> Result<u64> {
    if let Some(total) = response.content_length() {
        progress.set_length(total);
    }

    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];
    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::Download(format!("Failed to read response: {e}")))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::extraction(path, e))?;
        downloaded += bytes_read as u64;
        progress.set_position(downloaded);
    }
    file.flush().map_err(|e| Error::extraction(path, e))?;

    debug!("Streamed {} bytes", downloaded);
    Ok(downloaded)
}
