//! Record-sheet constants and default preset factories.

use std::collections::BTreeMap;

use crate::spec::{SpecCellFormat, SpecSheetWriteConfig};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Sheet name used when the record type does not override it.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// Tag namespace holding the column display name.
pub const C_TAG_NAME_KEY_DEFAULT: &str = "excel";
/// Tag namespace holding the column type label.
pub const C_TAG_TYPE_KEY_DEFAULT: &str = "type";
/// Text written into leading rows without a configured note.
pub const C_LEADING_ROW_PLACEHOLDER: &str = "reserved row — free-form note";

/// Height of comment/header/type rows.
pub const N_HEIGHT_ROW_STYLED: f64 = 24.0;
/// Tall preset for data and leading rows.
pub const N_HEIGHT_ROW_TALL: f64 = 76.0;
/// Width applied to the fixed column range after all rows are written.
pub const N_WIDTH_COLUMN_DEFAULT: f64 = 20.0;
/// Number of leading columns covered by the width directive.
pub const N_NCOLS_WIDTH_RANGE: u16 = 100;

/// Text for non-finite numbers.
pub const C_NAN_STR: &str = "NaN";
pub const C_POSINF_STR: &str = "Inf";
pub const C_NEGINF_STR: &str = "-Inf";
/// Largest integer magnitude every f64 still holds exactly (2^53).
pub const N_F64_EXACT_INT_MAX: u128 = 1 << 53;

/// Build default named format presets (`text`, `header`, `comment`).
pub fn derive_default_xlsx_formats() -> BTreeMap<String, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some("Times New Roman".to_string()),
        font_size: Some(11),
        border: Some(1),
        align: Some("left".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert("text".to_string(), cfg_base_fmt_spec.clone());
    dict_fmt.insert(
        "header".to_string(),
        cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            align: Some("center".to_string()),
            bg_color: Some("#D9E1F2".to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        "comment".to_string(),
        cfg_base_fmt_spec.with_(SpecCellFormat {
            italic: Some(true),
            text_wrap: Some(true),
            font_color: Some("#595959".to_string()),
            ..Default::default()
        }),
    );

    dict_fmt
}

/// Build the default write config every write call starts from.
pub fn derive_default_sheet_write_config() -> SpecSheetWriteConfig {
    SpecSheetWriteConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_seeds_sheet_name_and_tag_keys() {
        let config = derive_default_sheet_write_config();
        assert_eq!(config.sheet_name, "Sheet1");
        assert_eq!(config.tag_name_key, "excel");
        assert_eq!(config.tag_type_key, "type");
        assert_eq!(config.start_row, 0);
        assert!(config.comments.is_none());
        assert!(config.header_format.is_none());
        assert_eq!(config.height_row_styled, Some(N_HEIGHT_ROW_STYLED));
    }

    #[test]
    fn test_leading_row_placeholder_text() {
        assert_eq!(C_LEADING_ROW_PLACEHOLDER, "reserved row — free-form note");
    }

    #[test]
    fn test_default_formats_overlay_base_preset() {
        let dict_fmt = derive_default_xlsx_formats();
        let fmt_header = &dict_fmt["header"];
        assert_eq!(fmt_header.bold, Some(true));
        assert_eq!(fmt_header.align.as_deref(), Some("center"));
        assert_eq!(fmt_header.font_name.as_deref(), Some("Times New Roman"));

        let fmt_comment = &dict_fmt["comment"];
        assert_eq!(fmt_comment.italic, Some(true));
        assert_eq!(fmt_comment.align.as_deref(), Some("left"));
        assert_eq!(fmt_comment.border, Some(1));
    }
}
