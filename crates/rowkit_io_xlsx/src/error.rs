//! Error type shared by the marshaler, encoders and sinks.

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// "Write call failed" errors. Every variant aborts the call before the workbook is saved,
/// except `Xlsx`/`Io` raised by the save itself.
#[derive(Debug, Error)]
pub enum RowkitError {
    /// Sheet name rejected before the sheet is created.
    #[error("Invalid sheet name {name:?}: {reason}")]
    InvalidSheetName {
        /// Rejected name.
        name: String,
        /// Rule that was violated.
        reason: String,
    },
    /// A row was written before any sheet was created.
    #[error("No sheet created; call add_sheet() before writing rows.")]
    SheetNotCreated,
    /// A second sheet was requested from a single-sheet sink.
    #[error("Sink already holds a sheet; cannot add {0:?}")]
    SheetAlreadyCreated(String),
    /// A record field could not be turned into a cell value.
    #[error("Failed to encode field {field:?} of record {record_idx}: {message}")]
    FieldEncode {
        /// Source field identifier.
        field: String,
        /// Zero-based index of the record in the input slice.
        record_idx: usize,
        /// Underlying error text.
        message: String,
    },
    /// Column kind has no registered encoder.
    #[error("No cell encoder registered for kind {0:?}")]
    UnknownEncoder(String),
    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Sheet would exceed Excel row/column limits.
    #[error("Excel limit exceeded: {0}")]
    LimitExceeded(String),
    /// Error raised by `rust_xlsxwriter`.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
    /// Error writing serialized workbook bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
