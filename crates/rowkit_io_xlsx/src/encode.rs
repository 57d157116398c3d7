//! Pluggable field-value to cell-value transforms, keyed by column kind.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::RowkitError;
use crate::record::EnumFieldValue;
use crate::spec::EnumCellValue;
use crate::util::convert_nan_inf_to_str;

/// Kind of ordinary scalar columns.
pub const KIND_PLAIN: &str = "plain";
/// Kind of JSON document columns.
pub const KIND_JSON: &str = "json";

/// Transform from a raw field value to a cell value.
pub type FnCellEncoder =
    Box<dyn Fn(EnumFieldValue) -> Result<EnumCellValue, RowkitError> + Send + Sync>;

/// Encoders by kind. `plain` and `json` are always present unless replaced.
pub struct CellEncoderRegistry {
    dict_encoders: BTreeMap<String, FnCellEncoder>,
}

impl Default for CellEncoderRegistry {
    fn default() -> Self {
        let mut registry = Self {
            dict_encoders: BTreeMap::new(),
        };
        registry.register(KIND_PLAIN, encode_plain);
        registry.register(KIND_JSON, encode_json);
        registry
    }
}

impl fmt::Debug for CellEncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellEncoderRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl CellEncoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the encoder for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, encoder: F)
    where
        F: Fn(EnumFieldValue) -> Result<EnumCellValue, RowkitError> + Send + Sync + 'static,
    {
        self.dict_encoders.insert(kind.into(), Box::new(encoder));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.dict_encoders.contains_key(kind)
    }

    /// Registered kinds in sorted order.
    pub fn kinds(&self) -> Vec<&str> {
        self.dict_encoders.keys().map(String::as_str).collect()
    }

    /// Encode `value` with the encoder registered for `kind`.
    pub fn encode(&self, kind: &str, value: EnumFieldValue) -> Result<EnumCellValue, RowkitError> {
        let encoder = self
            .dict_encoders
            .get(kind)
            .ok_or_else(|| RowkitError::UnknownEncoder(kind.to_string()))?;
        encoder(value)
    }
}

/// Native cell representation of a field value.
pub fn encode_plain(value: EnumFieldValue) -> Result<EnumCellValue, RowkitError> {
    Ok(match value {
        EnumFieldValue::Blank => EnumCellValue::None,
        EnumFieldValue::Text(s) => EnumCellValue::String(s),
        EnumFieldValue::Number(n) => match convert_nan_inf_to_str(n) {
            Some(c_text) => EnumCellValue::String(c_text.to_string()),
            None => EnumCellValue::Number(n),
        },
        EnumFieldValue::Bool(b) => EnumCellValue::Bool(b),
        EnumFieldValue::Document(doc) => EnumCellValue::String(serde_json::to_string(&doc)?),
    })
}

/// Compact JSON string form of a field value; blank stays blank.
pub fn encode_json(value: EnumFieldValue) -> Result<EnumCellValue, RowkitError> {
    let c_json = match value {
        EnumFieldValue::Blank => return Ok(EnumCellValue::None),
        EnumFieldValue::Text(s) => serde_json::to_string(&s)?,
        EnumFieldValue::Number(n) => serde_json::to_string(&n)?,
        EnumFieldValue::Bool(b) => serde_json::to_string(&b)?,
        EnumFieldValue::Document(doc) => serde_json::to_string(&doc)?,
    };
    Ok(EnumCellValue::String(c_json))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_default_registry_has_builtin_kinds() {
        let registry = CellEncoderRegistry::default();
        assert_eq!(registry.kinds(), vec!["json", "plain"]);
    }

    #[test]
    fn test_plain_keeps_native_values() {
        let registry = CellEncoderRegistry::default();
        assert_eq!(
            registry
                .encode(KIND_PLAIN, EnumFieldValue::Number(1.5))
                .expect("number"),
            EnumCellValue::Number(1.5)
        );
        assert_eq!(
            registry
                .encode(KIND_PLAIN, EnumFieldValue::Blank)
                .expect("blank"),
            EnumCellValue::None
        );
        assert_eq!(
            registry
                .encode(KIND_PLAIN, EnumFieldValue::Number(f64::NEG_INFINITY))
                .expect("neg inf"),
            EnumCellValue::String("-Inf".to_string())
        );
    }

    #[test]
    fn test_json_renders_compact_string() {
        let registry = CellEncoderRegistry::default();
        assert_eq!(
            registry
                .encode(
                    KIND_JSON,
                    EnumFieldValue::Document(json!({"a": 1, "b": [true, null]}))
                )
                .expect("doc"),
            EnumCellValue::String(r#"{"a":1,"b":[true,null]}"#.to_string())
        );
        assert_eq!(
            registry
                .encode(KIND_JSON, EnumFieldValue::Document(json!({"zeta": 1, "alpha": 2})))
                .expect("unsorted doc"),
            EnumCellValue::String(r#"{"zeta":1,"alpha":2}"#.to_string())
        );
        assert_eq!(
            registry
                .encode(KIND_JSON, EnumFieldValue::Text("x".to_string()))
                .expect("text"),
            EnumCellValue::String("\"x\"".to_string())
        );
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let registry = CellEncoderRegistry::default();
        let err = registry
            .encode("money", EnumFieldValue::Number(1.0))
            .expect_err("unregistered");
        assert!(matches!(err, RowkitError::UnknownEncoder(kind) if kind == "money"));
    }

    #[test]
    fn test_register_custom_kind() {
        let mut registry = CellEncoderRegistry::default();
        registry.register("upper", |value| match value {
            EnumFieldValue::Text(s) => Ok(EnumCellValue::String(s.to_uppercase())),
            other => encode_plain(other),
        });
        assert!(registry.contains("upper"));
        assert_eq!(
            registry
                .encode("upper", EnumFieldValue::Text("abc".to_string()))
                .expect("upper"),
            EnumCellValue::String("ABC".to_string())
        );
    }
}
