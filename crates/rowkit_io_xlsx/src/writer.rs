//! XLSX writer kernel: renders marshaled rows into a `rust_xlsxwriter` workbook.

use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::info;

use crate::encode::CellEncoderRegistry;
use crate::error::RowkitError;
use crate::marshal::{marshal_matrix_into, marshal_records_into};
use crate::record::{EnumFieldValue, SheetRecord};
use crate::sink::{SheetRowsBuffer, SheetSink};
use crate::spec::{EnumCellValue, SpecCellFormat, SpecSheetReport, SpecSheetRow};
use crate::util::{cast_col_num, cast_row_num, validate_sheet_name};

////////////////////////////////////////////////////////////////////////////////
// #region XlsxSheetSink

/// [`SheetSink`] writing into one `rust_xlsxwriter` worksheet.
///
/// The worksheet is buffered in memory until [`Self::into_workbook`].
#[derive(Default)]
pub struct XlsxSheetSink {
    worksheet: Option<Worksheet>,
    n_row_cursor: usize,
}

impl XlsxSheetSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows appended so far.
    pub fn rows_written(&self) -> usize {
        self.n_row_cursor
    }

    /// Move the worksheet into a new workbook, ready to save.
    pub fn into_workbook(self) -> Workbook {
        let mut workbook = Workbook::new();
        if let Some(worksheet) = self.worksheet {
            workbook.push_worksheet(worksheet);
        }
        workbook
    }

    fn worksheet_mut(&mut self) -> Result<&mut Worksheet, RowkitError> {
        self.worksheet.as_mut().ok_or(RowkitError::SheetNotCreated)
    }
}

impl SheetSink for XlsxSheetSink {
    fn add_sheet(&mut self, name: &str) -> Result<(), RowkitError> {
        if self.worksheet.is_some() {
            return Err(RowkitError::SheetAlreadyCreated(name.to_string()));
        }
        validate_sheet_name(name)?;

        let mut worksheet = Worksheet::new();
        worksheet.set_name(name)?;
        self.worksheet = Some(worksheet);
        Ok(())
    }

    fn write_row(&mut self, row: &SpecSheetRow) -> Result<(), RowkitError> {
        let row_num = cast_row_num(self.n_row_cursor)?;
        let format = row.format.as_ref().map(derive_rust_xlsx_format);
        let worksheet = self.worksheet_mut()?;

        for (col_idx, value) in row.cells.iter().enumerate() {
            write_cell_with_format(
                worksheet,
                row_num,
                cast_col_num(col_idx)?,
                value,
                format.as_ref(),
            )?;
        }
        if let Some(height) = row.height {
            worksheet.set_row_height(row_num, height)?;
        }

        self.n_row_cursor += 1;
        Ok(())
    }

    fn set_column_range_width(
        &mut self,
        col_first: u16,
        col_last: u16,
        width: f64,
    ) -> Result<(), RowkitError> {
        self.worksheet_mut()?
            .set_column_range_width(col_first, col_last, width)?;
        Ok(())
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_num: u32,
    col_num: u16,
    value: &EnumCellValue,
    format: Option<&Format>,
) -> Result<(), RowkitError> {
    match (value, format) {
        (EnumCellValue::None, Some(fmt)) => {
            worksheet.write_blank(row_num, col_num, fmt)?;
        }
        (EnumCellValue::None, None) => {}
        (EnumCellValue::String(val), Some(fmt)) => {
            worksheet.write_string_with_format(row_num, col_num, val, fmt)?;
        }
        (EnumCellValue::String(val), None) => {
            worksheet.write_string(row_num, col_num, val)?;
        }
        (EnumCellValue::Number(val), Some(fmt)) => {
            worksheet.write_number_with_format(row_num, col_num, *val, fmt)?;
        }
        (EnumCellValue::Number(val), None) => {
            worksheet.write_number(row_num, col_num, *val)?;
        }
        (EnumCellValue::Bool(val), Some(fmt)) => {
            worksheet.write_boolean_with_format(row_num, col_num, *val, fmt)?;
        }
        (EnumCellValue::Bool(val), None) => {
            worksheet.write_boolean(row_num, col_num, *val)?;
        }
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatConversion

/// Convert a [`SpecCellFormat`] into a `rust_xlsxwriter` format.
pub fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    for c_align in [&spec.align, &spec.valign].into_iter().flatten() {
        if let Some(align) = derive_format_align(c_align) {
            format = format.set_align(align);
        }
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = spec.top {
        format = format.set_border_top(derive_format_border(val));
    }
    if let Some(val) = spec.bottom {
        format = format.set_border_bottom(derive_format_border(val));
    }
    if let Some(val) = spec.left {
        format = format.set_border_left(derive_format_border(val));
    }
    if let Some(val) = spec.right {
        format = format.set_border_right(derive_format_border(val));
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

/// Map an xlsxwriter border index (0..=13) to a border style; unknown indices mean no border.
pub fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        8 => FormatBorder::MediumDashed,
        9 => FormatBorder::DashDot,
        10 => FormatBorder::MediumDashDot,
        11 => FormatBorder::DashDotDot,
        12 => FormatBorder::MediumDashDotDot,
        13 => FormatBorder::SlantDashDot,
        _ => FormatBorder::None,
    }
}

/// Map an alignment keyword (horizontal or vertical) to a format alignment.
pub fn derive_format_align(align: &str) -> Option<FormatAlign> {
    match align.trim().to_ascii_lowercase().as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "center_across" => Some(FormatAlign::CenterAcross),
        "distributed" => Some(FormatAlign::Distributed),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        "vjustify" | "vertical_justify" => Some(FormatAlign::VerticalJustify),
        "vdistributed" | "vertical_distributed" => Some(FormatAlign::VerticalDistributed),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordWriter

/// Record writer bound to one encoder registry.
#[derive(Debug, Default)]
pub struct XlsxRecordWriter {
    registry: CellEncoderRegistry,
}

impl XlsxRecordWriter {
    /// Writer with the built-in `plain` and `json` encoders.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: CellEncoderRegistry) -> Self {
        Self { registry }
    }

    /// Add or replace the encoder for `kind`.
    pub fn with_encoder<F>(mut self, kind: impl Into<String>, encoder: F) -> Self
    where
        F: Fn(EnumFieldValue) -> Result<EnumCellValue, RowkitError> + Send + Sync + 'static,
    {
        self.registry.register(kind, encoder);
        self
    }

    pub fn registry(&self) -> &CellEncoderRegistry {
        &self.registry
    }

    /// Marshal `records` into memory without producing a workbook.
    pub fn marshal<R: SheetRecord>(
        &self,
        records: &[R],
    ) -> Result<(SheetRowsBuffer, SpecSheetReport), RowkitError> {
        let mut sink = SheetRowsBuffer::new();
        let report = marshal_records_into(&mut sink, records, &self.registry)?;
        Ok((sink, report))
    }

    /// Write `records` to an XLSX file at `path`.
    pub fn write_records<R: SheetRecord>(
        &self,
        path: impl AsRef<Path>,
        records: &[R],
    ) -> Result<SpecSheetReport, RowkitError> {
        let mut sink = XlsxSheetSink::new();
        let report = marshal_records_into(&mut sink, records, &self.registry)?;
        sink.into_workbook().save(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            sheet_name = %report.sheet_name,
            n_rows = report.n_rows_total,
            n_cols = report.n_cols,
            "wrote record sheet"
        );
        Ok(report)
    }

    /// Serialize `records` as an XLSX workbook into `writer`.
    pub fn write_records_to<R: SheetRecord, W: Write>(
        &self,
        writer: W,
        records: &[R],
    ) -> Result<SpecSheetReport, RowkitError> {
        let mut sink = XlsxSheetSink::new();
        let report = marshal_records_into(&mut sink, records, &self.registry)?;
        let n_bytes = save_workbook_to(sink.into_workbook(), writer)?;
        info!(
            n_bytes,
            sheet_name = %report.sheet_name,
            n_rows = report.n_rows_total,
            n_cols = report.n_cols,
            "streamed record sheet"
        );
        Ok(report)
    }
}

fn save_workbook_to<W: Write>(mut workbook: Workbook, mut writer: W) -> Result<usize, RowkitError> {
    let v_bytes = workbook.save_to_buffer()?;
    writer.write_all(&v_bytes)?;
    writer.flush()?;
    Ok(v_bytes.len())
}

/// Write `records` to `path` with the built-in encoders.
pub fn write_records<R: SheetRecord>(
    path: impl AsRef<Path>,
    records: &[R],
) -> Result<SpecSheetReport, RowkitError> {
    XlsxRecordWriter::new().write_records(path, records)
}

/// Serialize `records` into `writer` with the built-in encoders.
pub fn write_records_to<R: SheetRecord, W: Write>(
    writer: W,
    records: &[R],
) -> Result<SpecSheetReport, RowkitError> {
    XlsxRecordWriter::new().write_records_to(writer, records)
}

/// Marshal `records` into memory with the built-in encoders.
pub fn marshal_records<R: SheetRecord>(
    records: &[R],
) -> Result<(SheetRowsBuffer, SpecSheetReport), RowkitError> {
    XlsxRecordWriter::new().marshal(records)
}

/// Write a string matrix verbatim to `path`.
pub fn write_matrix<C: AsRef<str>>(
    path: impl AsRef<Path>,
    rows: &[Vec<C>],
) -> Result<SpecSheetReport, RowkitError> {
    let mut sink = XlsxSheetSink::new();
    let report = marshal_matrix_into(&mut sink, rows)?;
    sink.into_workbook().save(path.as_ref())?;
    info!(
        path = %path.as_ref().display(),
        n_rows = report.n_rows_total,
        "wrote string matrix"
    );
    Ok(report)
}

/// Serialize a string matrix verbatim into `writer`.
pub fn write_matrix_to<C: AsRef<str>, W: Write>(
    writer: W,
    rows: &[Vec<C>],
) -> Result<SpecSheetReport, RowkitError> {
    let mut sink = XlsxSheetSink::new();
    let report = marshal_matrix_into(&mut sink, rows)?;
    let n_bytes = save_workbook_to(sink.into_workbook(), writer)?;
    info!(n_bytes, n_rows = report.n_rows_total, "streamed string matrix");
    Ok(report)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
