use crate::fs::open_private_append;
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamped, append-only log of failures, skips and warnings.
///
/// Writing to the trail never fails the caller: if the file cannot be written the
/// message is reported through `tracing` instead.
#[derive(Debug, Clone)]
pub struct ErrorTrail {
    path: PathBuf,
}

impl ErrorTrail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `[YYYY-mm-dd HH:MM:SS] message`.
    pub fn record(&self, message: &str) {
        if let Err(e) = self.write_line(message) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                message,
                "could not write to error log"
            );
        }
    }

    fn write_line(&self, message: &str) -> std::io::Result<()> {
        let mut file = open_private_append(&self.path)?;
        let line = format!("[{}] {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
        file.write_all(line.as_bytes())
    }
}
