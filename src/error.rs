//! Error kinds returned by feed analysis.

use chrono::NaiveDate;

use crate::feed::archive::ARCHIVE_NAME;

/// Every way an analysis run can fail. Each variant aborts the whole run;
/// there is no partial result.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("GTFS archive is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("Missing required GTFS files: {}", .0.join(", "))]
    MissingRequiredFiles(Vec<String>),

    #[error("GTFS feed expired on {end_date}")]
    FeedExpired { end_date: NaiveDate },

    #[error("Malformed GTFS file {file}: {reason}")]
    MalformedFeed { file: String, reason: String },

    #[error("Internal failure while analyzing feed: {0}")]
    InternalFailure(String),
}

impl AnalysisError {
    pub fn malformed(file: &str, reason: impl ToString) -> Self {
        AnalysisError::MalformedFeed {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Only unexpected failures are worth another attempt; the rest are
    /// properties of the uploaded archive.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalysisError::InternalFailure(_))
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::TooLarge { .. } => "too_large",
            AnalysisError::MissingRequiredFiles(_) => "missing_required_files",
            AnalysisError::FeedExpired { .. } => "feed_expired",
            AnalysisError::MalformedFeed { .. } => "malformed_feed",
            AnalysisError::InternalFailure(_) => "internal_failure",
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(e: std::io::Error) -> Self {
        AnalysisError::InternalFailure(e.to_string())
    }
}

/// Only I/O trouble is an internal failure; anything the zip reader rejects
/// is a property of the uploaded archive.
impl From<zip::result::ZipError> for AnalysisError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => AnalysisError::InternalFailure(io.to_string()),
            other => AnalysisError::malformed(ARCHIVE_NAME, other),
        }
    }
}
