use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the fatal failure cases of an assignment run.
///
/// Unmatched courses, classes, teachers and the like are not errors: they are
/// recorded as [`Diagnostic`](crate::diagnostics::Diagnostic)s and the run
/// carries on.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the uploaded workbook carries no bytes at all.
    #[error("the uploaded file is empty")]
    EmptyUpload,

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when reference data is missing a required sheet or column.
    #[error("invalid reference data: {0}")]
    InvalidReference(String),

    /// Raised when a caller supplies an argument the pipeline cannot use.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    /// Returns `true` when the failure was caused by the caller's input rather
    /// than by the tool itself.
    ///
    /// Request front ends map these to a client error and echo the message;
    /// everything else is a server fault reported with a generic message.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ToolError::EmptyUpload
                | ToolError::InvalidArgument(_)
                | ToolError::MissingInput(_)
        )
    }
}
