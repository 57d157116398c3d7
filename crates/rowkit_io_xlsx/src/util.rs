//! Stateless helper utilities used by the marshaler and the XLSX sink.

use std::collections::BTreeMap;

use crate::conf::{
    C_NAN_STR, C_NEGINF_STR, C_POSINF_STR, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::error::RowkitError;

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Text for `NaN`/`Inf`; `None` for finite values.
pub fn convert_nan_inf_to_str(x: f64) -> Option<&'static str> {
    if x.is_nan() {
        return Some(C_NAN_STR);
    }
    if x.is_infinite() {
        return Some(if x.is_sign_positive() {
            C_POSINF_STR
        } else {
            C_NEGINF_STR
        });
    }
    None
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnUtils

/// Describe duplicated names, e.g. `"id" x2 at indices [0, 3]`; `None` when all are unique.
pub fn describe_duplicate_names(names: &[String]) -> Option<String> {
    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in names.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let l_msgs = dict_pos
        .iter()
        .filter(|(_, l_pos)| l_pos.len() > 1)
        .map(|(c_name, l_pos)| format!("{c_name:?} x{} at indices {:?}", l_pos.len(), l_pos))
        .collect::<Vec<_>>();

    if l_msgs.is_empty() {
        None
    } else {
        Some(l_msgs.join("; "))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetValidation

/// Reject names Excel would refuse instead of silently renaming them.
pub fn validate_sheet_name(name: &str) -> Result<(), RowkitError> {
    let fail = |reason: String| RowkitError::InvalidSheetName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(fail("name is empty".to_string()));
    }
    let n_len = name.chars().count();
    if n_len > N_LEN_EXCEL_SHEET_NAME_MAX {
        return Err(fail(format!(
            "name has {n_len} characters; limit is {N_LEN_EXCEL_SHEET_NAME_MAX}"
        )));
    }
    if let Some(c_illegal) = TUP_EXCEL_ILLEGAL.iter().find(|c| name.contains(**c)) {
        return Err(fail(format!("name contains illegal character {c_illegal:?}")));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(fail("name starts or ends with an apostrophe".to_string()));
    }
    Ok(())
}

/// Check that a sheet of `n_rows` x `n_cols` fits Excel limits.
pub fn validate_sheet_extent(n_rows: usize, n_cols: usize) -> Result<(), RowkitError> {
    if n_rows > N_NROWS_EXCEL_MAX {
        return Err(RowkitError::LimitExceeded(format!(
            "{n_rows} rows; limit is {N_NROWS_EXCEL_MAX}"
        )));
    }
    if n_cols > N_NCOLS_EXCEL_MAX {
        return Err(RowkitError::LimitExceeded(format!(
            "{n_cols} columns; limit is {N_NCOLS_EXCEL_MAX}"
        )));
    }
    Ok(())
}

pub fn cast_row_num(value: usize) -> Result<u32, RowkitError> {
    u32::try_from(value)
        .map_err(|_| RowkitError::LimitExceeded(format!("row index overflow: {value}")))
}

pub fn cast_col_num(value: usize) -> Result<u16, RowkitError> {
    u16::try_from(value)
        .map_err(|_| RowkitError::LimitExceeded(format!("column index overflow: {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_nan_inf_to_str() {
        assert_eq!(convert_nan_inf_to_str(f64::NAN), Some("NaN"));
        assert_eq!(convert_nan_inf_to_str(f64::INFINITY), Some("Inf"));
        assert_eq!(convert_nan_inf_to_str(f64::NEG_INFINITY), Some("-Inf"));
        assert_eq!(convert_nan_inf_to_str(1.0), None);
    }

    #[test]
    fn test_describe_duplicate_names() {
        let names = vec![
            "id".to_string(),
            "name".to_string(),
            "id".to_string(),
        ];
        assert_eq!(
            describe_duplicate_names(&names).as_deref(),
            Some("\"id\" x2 at indices [0, 2]")
        );
        assert_eq!(describe_duplicate_names(&names[..2]), None);
    }

    #[test]
    fn test_validate_sheet_name() {
        assert!(validate_sheet_name("Sheet1").is_ok());
        assert!(validate_sheet_name("  ").is_err());
        assert!(validate_sheet_name("a/b").is_err());
        assert!(validate_sheet_name("'quoted").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
        assert!(validate_sheet_name(&"x".repeat(31)).is_ok());
    }

    #[test]
    fn test_validate_sheet_extent() {
        assert!(validate_sheet_extent(N_NROWS_EXCEL_MAX, N_NCOLS_EXCEL_MAX).is_ok());
        assert!(matches!(
            validate_sheet_extent(N_NROWS_EXCEL_MAX + 1, 1),
            Err(RowkitError::LimitExceeded(_))
        ));
        assert!(validate_sheet_extent(1, N_NCOLS_EXCEL_MAX + 1).is_err());
    }

    #[test]
    fn test_casts_reject_overflow() {
        assert_eq!(cast_col_num(3).expect("col"), 3);
        assert!(cast_col_num(usize::from(u16::MAX) + 1).is_err());
        assert_eq!(cast_row_num(7).expect("row"), 7);
    }
}
