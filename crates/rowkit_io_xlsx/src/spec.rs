//! Shared record-sheet specification models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::conf::{
    C_SHEET_NAME_DEFAULT, C_TAG_NAME_KEY_DEFAULT, C_TAG_TYPE_KEY_DEFAULT, N_HEIGHT_ROW_STYLED,
    N_WIDTH_COLUMN_DEFAULT,
};
use crate::error::RowkitError;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification, converted to `rust_xlsxwriter::Format` at write time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Top border override.
    pub top: Option<i64>,
    /// Bottom border override.
    pub bottom: Option<i64>,
    /// Left border override.
    pub left: Option<i64>,
    /// Right border override.
    pub right: Option<i64>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            top: other.top.or(self.top),
            bottom: other.bottom.or(self.bottom),
            left: other.left.or(self.left),
            right: other.right.or(self.right),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

/// Normalized cell value handed to a sheet sink.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl EnumCellValue {
    /// Text view used for previews and tests; blank for `None`.
    pub fn to_text(&self) -> String {
        match self {
            EnumCellValue::None => String::new(),
            EnumCellValue::String(s) => s.clone(),
            EnumCellValue::Number(n) => n.to_string(),
            EnumCellValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        EnumCellValue::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        EnumCellValue::String(value)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteConfig

/// Per-call write configuration.
///
/// Built fresh for every write call from [`crate::conf::derive_default_sheet_write_config`]
/// and then handed to the first record's [`crate::SheetRecord::configure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecSheetWriteConfig {
    /// Target sheet name.
    pub sheet_name: String,
    /// Number of reserved single-cell rows before structured rows.
    pub start_row: usize,
    /// Notes for the reserved rows, by index. Missing or empty entries use the placeholder.
    pub leading_row_texts: Vec<String>,
    /// Tag namespace holding the column display name.
    pub tag_name_key: String,
    /// Tag namespace holding the column type label.
    pub tag_type_key: String,
    /// Column comments keyed by field name. `Some` emits the comment row.
    pub comments: Option<BTreeMap<String, String>>,
    /// Format of the comment row.
    pub comment_format: Option<SpecCellFormat>,
    /// Format of the header and type rows.
    pub header_format: Option<SpecCellFormat>,
    /// Height of comment/header/type rows; `None` keeps the sheet default.
    pub height_row_styled: Option<f64>,
    /// Height of leading and data rows; `None` keeps the sheet default.
    pub height_row_plain: Option<f64>,
    /// Width applied to the fixed column range; `None` skips the directive.
    pub width_columns: Option<f64>,
}

impl Default for SpecSheetWriteConfig {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            start_row: 0,
            leading_row_texts: vec![],
            tag_name_key: C_TAG_NAME_KEY_DEFAULT.to_string(),
            tag_type_key: C_TAG_TYPE_KEY_DEFAULT.to_string(),
            comments: None,
            comment_format: None,
            header_format: None,
            height_row_styled: Some(N_HEIGHT_ROW_STYLED),
            height_row_plain: None,
            width_columns: Some(N_WIDTH_COLUMN_DEFAULT),
        }
    }
}

impl SpecSheetWriteConfig {
    /// Parse a config preset from JSON; missing keys keep their defaults.
    pub fn from_json_str(txt: &str) -> Result<Self, RowkitError> {
        Ok(serde_json::from_str(txt)?)
    }

    /// Set one column comment, enabling the comment row.
    pub fn set_comment(&mut self, field_name: impl Into<String>, comment: impl Into<String>) {
        self.comments
            .get_or_insert_with(BTreeMap::new)
            .insert(field_name.into(), comment.into());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SchemaSpecification

/// One column derived from one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetColumn {
    /// Source field identifier.
    pub field_name: String,
    /// Header text.
    pub display_name: String,
    /// Type row text.
    pub type_label: Option<String>,
    /// Comment row text; empty when the field has no comment.
    pub comment: String,
    /// Encoder kind.
    pub kind: String,
}

/// Ordered columns of one record type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecSheetSchema {
    pub columns: Vec<SpecSheetColumn>,
}

impl SpecSheetSchema {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn header_cells(&self) -> Vec<EnumCellValue> {
        self.columns
            .iter()
            .map(|col| EnumCellValue::String(col.display_name.clone()))
            .collect()
    }

    /// Type labels; blank cells where a column has none.
    pub fn type_cells(&self) -> Vec<EnumCellValue> {
        self.columns
            .iter()
            .map(|col| match &col.type_label {
                Some(label) => EnumCellValue::String(label.clone()),
                None => EnumCellValue::None,
            })
            .collect()
    }

    pub fn comment_cells(&self) -> Vec<EnumCellValue> {
        self.columns
            .iter()
            .map(|col| EnumCellValue::String(col.comment.clone()))
            .collect()
    }

    pub fn display_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|col| col.display_name.clone())
            .collect()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RowSpecification

/// Role of an emitted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSheetRowKind {
    /// Reserved single-cell note row.
    Leading,
    /// Column comments.
    Comment,
    /// Column display names.
    Header,
    /// Column type labels.
    Type,
    /// One record.
    Data,
    /// Raw matrix row.
    Raw,
}

/// One row as handed to a sheet sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetRow {
    /// Row role.
    pub kind: EnumSheetRowKind,
    /// Cells in column order.
    pub cells: Vec<EnumCellValue>,
    /// Format applied to every cell; `None` keeps the sheet default.
    pub format: Option<SpecCellFormat>,
    /// Row height; `None` keeps the sheet default.
    pub height: Option<f64>,
}

impl SpecSheetRow {
    /// Row written through the unstyled path.
    pub fn plain(kind: EnumSheetRowKind, cells: Vec<EnumCellValue>, height: Option<f64>) -> Self {
        Self {
            kind,
            cells,
            format: None,
            height,
        }
    }

    /// Row written through the styled path.
    pub fn styled(
        kind: EnumSheetRowKind,
        cells: Vec<EnumCellValue>,
        format: Option<SpecCellFormat>,
        height: Option<f64>,
    ) -> Self {
        Self {
            kind,
            cells,
            format,
            height,
        }
    }

    /// Cell texts, blank for `None` cells.
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(EnumCellValue::to_text).collect()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecSheetReport {
    /// Target sheet name.
    pub sheet_name: String,
    /// Reserved leading rows written.
    pub n_rows_leading: usize,
    /// Record rows written.
    pub n_rows_data: usize,
    /// All rows written.
    pub n_rows_total: usize,
    /// Column count of the schema (or widest raw row).
    pub n_cols: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecSheetReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_right_side_values() {
        let fmt_base = SpecCellFormat {
            bold: Some(false),
            font_size: Some(11),
            ..Default::default()
        };
        let fmt_merged = fmt_base.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        });
        assert_eq!(fmt_merged.bold, Some(true));
        assert_eq!(fmt_merged.font_size, Some(11));
    }

    #[test]
    fn test_config_from_json_keeps_defaults_for_missing_keys() {
        let config = SpecSheetWriteConfig::from_json_str(
            r#"{"sheet_name": "Users", "start_row": 2, "header_format": {"bold": true}}"#,
        )
        .expect("parse config");
        assert_eq!(config.sheet_name, "Users");
        assert_eq!(config.start_row, 2);
        assert_eq!(config.tag_name_key, "excel");
        assert_eq!(config.tag_type_key, "type");
        assert_eq!(
            config.header_format.and_then(|fmt| fmt.bold),
            Some(true)
        );
        assert!(config.comments.is_none());
    }

    #[test]
    fn test_config_from_json_rejects_malformed_input() {
        assert!(matches!(
            SpecSheetWriteConfig::from_json_str("{"),
            Err(RowkitError::Json(_))
        ));
    }

    #[test]
    fn test_set_comment_enables_comment_map() {
        let mut config = SpecSheetWriteConfig::default();
        config.set_comment("id", "primary key");
        assert_eq!(
            config.comments.as_ref().and_then(|m| m.get("id")).map(String::as_str),
            Some("primary key")
        );
    }

    #[test]
    fn test_schema_type_cells_blank_where_label_missing() {
        let schema = SpecSheetSchema {
            columns: vec![
                SpecSheetColumn {
                    field_name: "id".to_string(),
                    display_name: "ID".to_string(),
                    type_label: Some("int".to_string()),
                    comment: String::new(),
                    kind: "plain".to_string(),
                },
                SpecSheetColumn {
                    field_name: "name".to_string(),
                    display_name: "name".to_string(),
                    type_label: None,
                    comment: String::new(),
                    kind: "plain".to_string(),
                },
            ],
        };
        assert_eq!(
            schema.type_cells(),
            vec![EnumCellValue::String("int".to_string()), EnumCellValue::None]
        );
        assert_eq!(schema.display_names(), vec!["ID", "name"]);
    }
}
