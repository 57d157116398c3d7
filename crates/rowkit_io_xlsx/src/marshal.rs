//! Record and raw-matrix marshaling into a [`SheetSink`].
//!
//! Row order for records:
//! 1. `start_row` single-cell leading rows
//! 2. comment row, when the config carries a comment map
//! 3. header row
//! 4. type row, when the schema has at least one column
//! 5. one data row per record
//!
//! Leading and data rows go through the plain path; comment/header/type rows
//! go through the styled path.

use tracing::{debug, warn};

use crate::conf::{
    C_LEADING_ROW_PLACEHOLDER, C_SHEET_NAME_DEFAULT, N_NCOLS_WIDTH_RANGE,
    derive_default_sheet_write_config,
};
use crate::encode::CellEncoderRegistry;
use crate::error::RowkitError;
use crate::record::{SheetRecord, SpecFieldDescriptor};
use crate::schema::derive_sheet_schema_from_fields;
use crate::sink::SheetSink;
use crate::spec::{
    EnumCellValue, EnumSheetRowKind, SpecSheetReport, SpecSheetRow, SpecSheetSchema,
    SpecSheetWriteConfig,
};
use crate::util::{describe_duplicate_names, validate_sheet_extent};

/// Build the per-call config: defaults, then the first record's configurator.
pub fn derive_sheet_write_config<R: SheetRecord>(records: &[R]) -> SpecSheetWriteConfig {
    let mut config = derive_default_sheet_write_config();
    if let Some(record_first) = records.first() {
        record_first.configure(&mut config);
    }
    config
}

/// Text of the leading row at `row_idx`.
pub fn derive_leading_row_text(config: &SpecSheetWriteConfig, row_idx: usize) -> &str {
    config
        .leading_row_texts
        .get(row_idx)
        .map(String::as_str)
        .filter(|c_text| !c_text.is_empty())
        .unwrap_or(C_LEADING_ROW_PLACEHOLDER)
}

/// Marshal `records` into `sink`.
///
/// Encoding failures abort before the failing record's row is written; the
/// caller must not save the sheet after an error.
pub fn marshal_records_into<R, S>(
    sink: &mut S,
    records: &[R],
    registry: &CellEncoderRegistry,
) -> Result<SpecSheetReport, RowkitError>
where
    R: SheetRecord,
    S: SheetSink + ?Sized,
{
    let config = derive_sheet_write_config(records);
    debug!(config = ?config, "resolved sheet write config");

    let l_fields = R::sheet_fields();
    let schema = derive_sheet_schema_from_fields(&l_fields, &config);
    let n_cols = schema.width();
    let if_emit_comments = config.comments.is_some();
    let if_emit_types = !schema.is_empty();

    let n_rows_total = [
        usize::from(if_emit_comments),
        1,
        usize::from(if_emit_types),
        records.len(),
    ]
    .into_iter()
    .try_fold(config.start_row, usize::checked_add)
    .ok_or_else(|| {
        RowkitError::LimitExceeded(format!(
            "row count overflows with start_row {} and {} records",
            config.start_row,
            records.len()
        ))
    })?;
    validate_sheet_extent(n_rows_total, n_cols)?;

    if let Some(column) = schema
        .columns
        .iter()
        .find(|column| !registry.contains(&column.kind))
    {
        return Err(RowkitError::UnknownEncoder(column.kind.clone()));
    }

    sink.add_sheet(&config.sheet_name)?;
    debug!(
        sheet_name = %config.sheet_name,
        n_cols,
        n_records = records.len(),
        "derived sheet schema"
    );

    let mut report = SpecSheetReport {
        sheet_name: config.sheet_name.clone(),
        n_rows_leading: config.start_row,
        n_rows_data: 0,
        n_rows_total: 0,
        n_cols,
        warnings: vec![],
    };
    if let Some(c_msg) = describe_duplicate_names(&schema.display_names()) {
        warn!(sheet_name = %config.sheet_name, "duplicate column names: {c_msg}");
        report.warn(format!("Duplicate column names detected: {c_msg}"));
    }

    for row_idx in 0..config.start_row {
        sink.write_row(&SpecSheetRow::plain(
            EnumSheetRowKind::Leading,
            vec![derive_leading_row_text(&config, row_idx).into()],
            config.height_row_plain,
        ))?;
    }

    if if_emit_comments {
        sink.write_row(&SpecSheetRow::styled(
            EnumSheetRowKind::Comment,
            schema.comment_cells(),
            config.comment_format.clone(),
            config.height_row_styled,
        ))?;
    }

    sink.write_row(&SpecSheetRow::styled(
        EnumSheetRowKind::Header,
        schema.header_cells(),
        config.header_format.clone(),
        config.height_row_styled,
    ))?;

    if if_emit_types {
        sink.write_row(&SpecSheetRow::styled(
            EnumSheetRowKind::Type,
            schema.type_cells(),
            config.header_format.clone(),
            config.height_row_styled,
        ))?;
    }

    for (record_idx, record) in records.iter().enumerate() {
        let l_cells = encode_record(record, record_idx, &l_fields, &schema, registry)?;
        sink.write_row(&SpecSheetRow::plain(
            EnumSheetRowKind::Data,
            l_cells,
            config.height_row_plain,
        ))?;
        report.n_rows_data += 1;
    }

    if let Some(width) = config.width_columns {
        sink.set_column_range_width(0, N_NCOLS_WIDTH_RANGE - 1, width)?;
    }

    report.n_rows_total = n_rows_total;
    Ok(report)
}

/// Encode one record into cells, in schema order.
fn encode_record<R>(
    record: &R,
    record_idx: usize,
    fields: &[SpecFieldDescriptor<R>],
    schema: &SpecSheetSchema,
    registry: &CellEncoderRegistry,
) -> Result<Vec<EnumCellValue>, RowkitError> {
    fields
        .iter()
        .zip(&schema.columns)
        .map(|(field, column)| {
            let fail = |err: RowkitError| RowkitError::FieldEncode {
                field: field.name.to_string(),
                record_idx,
                message: err.to_string(),
            };
            let value = field.read(record).map_err(fail)?;
            registry.encode(&column.kind, value).map_err(fail)
        })
        .collect()
}

/// Write `rows` verbatim as string cells into a sheet named `Sheet1`.
pub fn marshal_matrix_into<S, C>(
    sink: &mut S,
    rows: &[Vec<C>],
) -> Result<SpecSheetReport, RowkitError>
where
    S: SheetSink + ?Sized,
    C: AsRef<str>,
{
    let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    validate_sheet_extent(rows.len(), n_cols)?;

    sink.add_sheet(C_SHEET_NAME_DEFAULT)?;
    for row in rows {
        let l_cells = row
            .iter()
            .map(|cell| EnumCellValue::String(cell.as_ref().to_string()))
            .collect();
        sink.write_row(&SpecSheetRow::plain(EnumSheetRowKind::Raw, l_cells, None))?;
    }

    Ok(SpecSheetReport {
        sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
        n_rows_leading: 0,
        n_rows_data: rows.len(),
        n_rows_total: rows.len(),
        n_cols,
        warnings: vec![],
    })
}
