//! Error type shared by the loader, report runner and writers.
//!
//! The aggregation engine itself never fails; everything here belongs to the
//! collaborators around it.

use thiserror::Error;

/// Result type alias using `ReportError`.
pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure while reading a dataset or writing an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader or writer rejected the file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// No catalog entry carries the requested id.
    #[error("Unknown report: {0}")]
    UnknownReport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_report_message_names_the_id() {
        let err = ReportError::UnknownReport("9m2025buses".to_string());
        assert_eq!(err.to_string(), "Unknown report: 9m2025buses");
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn open() -> ReportResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        let err = open().unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
