// src/progress.rs

//! Progress reporting for a conversion run
//!
//! The pipeline counts modules, the downloader counts bytes. Both report
//! through [`ProgressTracker`] so a run can drive a terminal bar, log
//! lines at every tenth of the work, or nothing at all.

use indicatif::ProgressBar;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// What a tracker is counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStyle {
    /// Modules converted out of the modules found
    #[default]
    Bar,
    /// Bytes received out of the announced content length
    Bytes,
}

impl ProgressStyle {
    fn format(self, value: u64) -> String {
        match self {
            Self::Bar => value.to_string(),
            Self::Bytes => format_bytes(value),
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else {
        format!("{} KiB", bytes / 1024)
    }
}

/// Receiver of progress updates
pub trait ProgressTracker: Send + Sync {
    /// Name the item being worked on (a module, a download)
    fn set_message(&self, message: &str);

    fn increment(&self, amount: u64);

    fn set_position(&self, position: u64);

    /// Total amount of work, once known
    fn set_length(&self, length: u64);

    fn finish_with_message(&self, message: &str);

    fn finish_with_error(&self, message: &str);

    /// Tracker for a nested step, such as the download before conversion
    fn child(&self, message: &str, length: u64, style: ProgressStyle) -> Box<dyn ProgressTracker>;
}

/// Tracker that reports nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl SilentProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressTracker for SilentProgress {
    fn set_message(&self, _message: &str) {}

    fn increment(&self, _amount: u64) {}

    fn set_position(&self, _position: u64) {}

    fn set_length(&self, _length: u64) {}

    fn finish_with_message(&self, _message: &str) {}

    fn finish_with_error(&self, _message: &str) {}

    fn child(
        &self,
        _message: &str,
        _length: u64,
        _style: ProgressStyle,
    ) -> Box<dyn ProgressTracker> {
        Box::new(SilentProgress)
    }
}

/// Tracker for non-interactive runs
///
/// Writes one `info` line each time another tenth of the work is done.
/// Module names go to `debug`.
#[derive(Debug)]
pub struct LogProgress {
    name: String,
    style: ProgressStyle,
    position: AtomicU64,
    length: AtomicU64,
    /// Highest tenth already logged
    logged: AtomicU64,
}

impl LogProgress {
    pub fn new(name: impl Into<String>, length: u64, style: ProgressStyle) -> Self {
        Self {
            name: name.into(),
            style,
            position: AtomicU64::new(0),
            length: AtomicU64::new(length),
            logged: AtomicU64::new(0),
        }
    }

    /// Record `position`; returns the percentage to log when a new tenth
    /// has been reached
    fn advance(&self, position: u64) -> Option<u64> {
        self.position.store(position, Ordering::Relaxed);
        let length = self.length.load(Ordering::Relaxed);
        if length == 0 {
            return None;
        }

        let tenth = position.min(length) * 10 / length;
        let previous = self.logged.fetch_max(tenth, Ordering::Relaxed);
        (tenth > previous).then_some(tenth * 10)
    }

    fn report(&self, position: u64) {
        if let Some(percent) = self.advance(position) {
            let length = self.length.load(Ordering::Relaxed);
            info!(
                "{}: {}% ({} of {})",
                self.name,
                percent,
                self.style.format(position),
                self.style.format(length)
            );
        }
    }
}

impl ProgressTracker for LogProgress {
    fn set_message(&self, message: &str) {
        debug!("{}: {}", self.name, message);
    }

    fn increment(&self, amount: u64) {
        let position = self.position.load(Ordering::Relaxed) + amount;
        self.report(position);
    }

    fn set_position(&self, position: u64) {
        self.report(position);
    }

    fn set_length(&self, length: u64) {
        self.length.store(length, Ordering::Relaxed);
        self.logged.store(0, Ordering::Relaxed);
    }

    fn finish_with_message(&self, message: &str) {
        info!("{}: {}", self.name, message);
    }

    fn finish_with_error(&self, message: &str) {
        warn!("{}: {}", self.name, message);
    }

    fn child(&self, message: &str, length: u64, style: ProgressStyle) -> Box<dyn ProgressTracker> {
        Box::new(LogProgress::new(format!("{}: {}", self.name, message), length, style))
    }
}

/// Terminal progress bar
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    pub fn new(message: &str, length: u64, style: ProgressStyle) -> Self {
        let bar = ProgressBar::new(length);
        bar.set_style(bar_style(style));
        bar.set_message(message.to_string());
        Self { bar }
    }
}

fn bar_style(style: ProgressStyle) -> indicatif::ProgressStyle {
    let template = match style {
        ProgressStyle::Bar => "{msg} {pos}/{len} modules [{bar:40.green/dim}]",
        ProgressStyle::Bytes => {
            "{msg} [{bar:40.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})"
        }
    };
    indicatif::ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
        .progress_chars("##-")
}

impl ProgressTracker for CliProgress {
    fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    fn set_position(&self, position: u64) {
        self.bar.set_position(position);
    }

    fn set_length(&self, length: u64) {
        self.bar.set_length(length);
    }

    fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    fn finish_with_error(&self, message: &str) {
        self.bar.abandon_with_message(format!("failed: {}", message));
    }

    fn child(&self, message: &str, length: u64, style: ProgressStyle) -> Box<dyn ProgressTracker> {
        Box::new(CliProgress::new(message, length, style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_reports_each_tenth_once() {
        let progress = LogProgress::new("convert", 20, ProgressStyle::Bar);

        assert_eq!(progress.advance(1), None);
        assert_eq!(progress.advance(2), Some(10));
        assert_eq!(progress.advance(3), None);
        assert_eq!(progress.advance(9), Some(40));
        assert_eq!(progress.advance(20), Some(100));
        assert_eq!(progress.advance(25), None);
    }

    #[test]
    fn test_log_progress_without_length_stays_quiet() {
        let progress = LogProgress::new("download", 0, ProgressStyle::Bytes);
        assert_eq!(progress.advance(4096), None);

        progress.set_length(8192);
        assert_eq!(progress.advance(8192), Some(100));
    }

    #[test]
    fn test_log_progress_increment_accumulates() {
        let progress = LogProgress::new("convert", 4, ProgressStyle::Bar);

        progress.increment(1);
        progress.increment(1);

        assert_eq!(progress.position.load(Ordering::Relaxed), 2);
        assert_eq!(progress.logged.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_format_amounts() {
        assert_eq!(ProgressStyle::Bar.format(12), "12");
        assert_eq!(ProgressStyle::Bytes.format(2048), "2 KiB");
        assert_eq!(ProgressStyle::Bytes.format(3 * 1024 * 1024 / 2), "1.5 MiB");
    }

    #[test]
    fn test_cli_progress_counts_modules() {
        let progress = CliProgress::new("Converting", 0, ProgressStyle::Bar);

        progress.set_length(4);
        progress.set_message("servlet_api_cookie_web");
        progress.increment(3);

        assert_eq!(progress.bar.position(), 3);
        assert_eq!(progress.bar.length(), Some(4));
        progress.finish_with_message("done");
        assert!(progress.bar.is_finished());
    }
}
