//! Sheet-building collaborator seam.
//!
//! The marshaler only appends rows to one sheet; [`SheetSink`] is the minimal
//! surface it needs. [`crate::writer::XlsxSheetSink`] renders into a
//! `rust_xlsxwriter` worksheet, [`SheetRowsBuffer`] keeps rows in memory.

use crate::error::RowkitError;
use crate::spec::SpecSheetRow;
use crate::util::validate_sheet_name;

/// Append-only target of one marshal call.
pub trait SheetSink {
    /// Create the target sheet. Must be called once, before any row.
    fn add_sheet(&mut self, name: &str) -> Result<(), RowkitError>;

    /// Append `row` below the previously written rows.
    fn write_row(&mut self, row: &SpecSheetRow) -> Result<(), RowkitError>;

    /// Set the width of zero-based columns `col_first..=col_last`.
    fn set_column_range_width(
        &mut self,
        col_first: u16,
        col_last: u16,
        width: f64,
    ) -> Result<(), RowkitError>;
}

/// In-memory sink recording the emitted sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRowsBuffer {
    /// Name passed to [`SheetSink::add_sheet`].
    pub sheet_name: Option<String>,
    /// Rows in write order.
    pub rows: Vec<SpecSheetRow>,
    /// Column width directives as `(col_first, col_last, width)`.
    pub column_widths: Vec<(u16, u16, f64)>,
}

impl SheetRowsBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell texts of every row, blank for empty cells.
    pub fn texts(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(SpecSheetRow::texts).collect()
    }
}

impl SheetSink for SheetRowsBuffer {
    fn add_sheet(&mut self, name: &str) -> Result<(), RowkitError> {
        validate_sheet_name(name)?;
        self.sheet_name = Some(name.to_string());
        Ok(())
    }

    fn write_row(&mut self, row: &SpecSheetRow) -> Result<(), RowkitError> {
        if self.sheet_name.is_none() {
            return Err(RowkitError::SheetNotCreated);
        }
        self.rows.push(row.clone());
        Ok(())
    }

    fn set_column_range_width(
        &mut self,
        col_first: u16,
        col_last: u16,
        width: f64,
    ) -> Result<(), RowkitError> {
        if self.sheet_name.is_none() {
            return Err(RowkitError::SheetNotCreated);
        }
        self.column_widths.push((col_first, col_last, width));
        Ok(())
    }
}
