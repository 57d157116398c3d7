//! `rowkit_io_xlsx` v1:
//! Record-to-sheet marshaling kernel on top of `rust_xlsxwriter`.
//!
//! Modules:
//! - `conf`    : constants and default presets
//! - `spec`    : config/schema/row/report models
//! - `error`   : shared error type
//! - `record`  : record capability and field values
//! - `encode`  : per-kind cell encoders
//! - `schema`  : column schema derivation
//! - `sink`    : sheet-building seam and in-memory sink
//! - `marshal` : record and raw-matrix marshaling loops
//! - `util`    : pure helper functions
//! - `writer`  : XLSX sink and public write entry points
//!
//! ```no_run
//! use rowkit_io_xlsx::{Json, SheetRecord, write_records};
//!
//! #[derive(SheetRecord)]
//! #[sheet(sheet_name = "Users")]
//! struct User {
//!     #[sheet(excel = "ID", type = "int")]
//!     id: u32,
//!     name: String,
//!     #[sheet(type = "json")]
//!     roles: Json<Vec<String>>,
//! }
//!
//! let users = vec![User { id: 1, name: "ann".to_string(), roles: Json(vec![]) }];
//! write_records("users.xlsx", &users)?;
//! # Ok::<(), rowkit_io_xlsx::RowkitError>(())
//! ```

extern crate self as rowkit_io_xlsx;

pub mod conf;
pub mod encode;
pub mod error;
pub mod marshal;
pub mod record;
pub mod schema;
pub mod sink;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_LEADING_ROW_PLACEHOLDER, N_HEIGHT_ROW_STYLED, N_HEIGHT_ROW_TALL, N_NCOLS_WIDTH_RANGE,
    N_WIDTH_COLUMN_DEFAULT, derive_default_sheet_write_config, derive_default_xlsx_formats,
};
pub use encode::{CellEncoderRegistry, FnCellEncoder, KIND_JSON, KIND_PLAIN};
pub use error::RowkitError;
pub use marshal::{derive_sheet_write_config, marshal_matrix_into, marshal_records_into};
pub use record::{
    EnumFieldValue, FnFieldAccessor, Json, SheetRecord, SpecFieldDescriptor, ToFieldValue,
};
pub use rowkit_io_xlsx_macros::SheetRecord;
pub use schema::derive_sheet_schema;
pub use sink::{SheetRowsBuffer, SheetSink};
pub use spec::{
    EnumCellValue, EnumSheetRowKind, SpecCellFormat, SpecSheetColumn, SpecSheetReport,
    SpecSheetRow, SpecSheetSchema, SpecSheetWriteConfig,
};
pub use writer::{
    XlsxRecordWriter, XlsxSheetSink, marshal_records, write_matrix, write_matrix_to,
    write_records, write_records_to,
};
