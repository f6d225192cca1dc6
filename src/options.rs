//! Runtime configuration for one analysis run.

use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::feed::time::TimeWindow;

/// Default upload limit: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Archives larger than this are rejected before decompression.
    pub max_size_bytes: u64,
    /// Daytime window used for headways.
    pub window: TimeWindow,
    /// Feeds whose end date is before this day are rejected.
    pub today: NaiveDate,
    /// Parent of the per-run extraction directories.
    pub scratch_root: PathBuf,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            window: TimeWindow::default(),
            today: Local::now().date_naive(),
            scratch_root: std::env::temp_dir().join("gtfs_frequency"),
        }
    }
}

impl AnalyzeOptions {
    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_scratch_root(mut self, scratch_root: impl Into<PathBuf>) -> Self {
        self.scratch_root = scratch_root.into();
        self
    }
}
