//! Tracing setup for the smart-reply binary.
//!
//! Stdout carries command output (suggested replies, verdict JSON), so log events never go
//! there. They are appended to a log file and, when the caller asks for it, mirrored to
//! stderr in a compact form.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where log events go.
#[derive(Debug, Clone)]
pub struct LogTarget {
    /// Append-mode log file; parent directories are created on demand.
    pub file: String,
    /// Also write events to stderr.
    pub stderr: bool,
}

impl LogTarget {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            file: path.into(),
            stderr: false,
        }
    }

    pub fn with_stderr(mut self, stderr: bool) -> Self {
        self.stderr = stderr;
        self
    }
}

/// Opens `path` for appending, creating missing parent directories.
pub fn open_log_file(path: impl AsRef<Path>) -> io::Result<File> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. Load `.env` before calling so `RUST_LOG` applies.
pub fn init_tracing(target: &LogTarget) -> anyhow::Result<()> {
    let file = open_log_file(&target.file)
        .with_context(|| format!("Failed to open log file {}", target.file))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_thread_ids(true);
    let stderr_layer = target.stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(io::stderr)
            .with_target(false)
            .boxed()
    });

    Registry::default()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to set global subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_log_file_creates_parents_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("smart-reply.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_log_target_builder() {
        let target = LogTarget::file("logs/x.log").with_stderr(true);
        assert_eq!(target.file, "logs/x.log");
        assert!(target.stderr);
        assert!(!LogTarget::file("logs/x.log").stderr);
    }

    #[test]
    fn test_init_tracing_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("smart-reply.log");

        // A second global subscriber in the same process fails; the file is still created.
        let _ = init_tracing(&LogTarget::file(path.display().to_string()));
        assert!(path.exists());
    }
}
