//! Record capability: compile-time field descriptors and field value extraction.
//!
//! A record type lists its fields once, in declared order, as
//! [`SpecFieldDescriptor`] entries. The table is usually generated by
//! `#[derive(SheetRecord)]`, but can be written by hand:
//!
//! ```
//! use rowkit_io_xlsx::{SheetRecord, SpecFieldDescriptor, SpecSheetWriteConfig, ToFieldValue};
//!
//! struct User {
//!     id: u32,
//!     name: String,
//! }
//!
//! impl SheetRecord for User {
//!     fn sheet_fields() -> Vec<SpecFieldDescriptor<Self>> {
//!         vec![
//!             SpecFieldDescriptor::new("id", |r: &User| r.id.to_field_value())
//!                 .with_tags(&[("excel", "ID"), ("type", "int")]),
//!             SpecFieldDescriptor::new("name", |r: &User| r.name.to_field_value()),
//!         ]
//!     }
//!
//!     fn configure(&self, config: &mut SpecSheetWriteConfig) {
//!         config.sheet_name = "Users".to_string();
//!     }
//! }
//! ```

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::conf::N_F64_EXACT_INT_MAX;
use crate::encode::{KIND_JSON, KIND_PLAIN};
use crate::error::RowkitError;
use crate::spec::SpecSheetWriteConfig;

/// Reads one field value from a record.
pub type FnFieldAccessor<R> = fn(&R) -> Result<EnumFieldValue, RowkitError>;

/// One field of a record type.
pub struct SpecFieldDescriptor<R> {
    /// Field identifier; default display name and comment key.
    pub name: &'static str,
    /// Field tags as `(namespace, value)` pairs.
    pub tags: &'static [(&'static str, &'static str)],
    /// Encoder kind.
    pub kind: &'static str,
    /// Field reader.
    pub accessor: FnFieldAccessor<R>,
}

impl<R> SpecFieldDescriptor<R> {
    /// Untagged descriptor using the plain encoder.
    pub fn new(name: &'static str, accessor: FnFieldAccessor<R>) -> Self {
        Self {
            name,
            tags: &[],
            kind: KIND_PLAIN,
            accessor,
        }
    }

    pub fn with_tags(mut self, tags: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }

    /// Look up the tag value stored under `key`.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(c_key, _)| *c_key == key)
            .map(|(_, c_value)| *c_value)
    }

    /// Read this field from `record`.
    pub fn read(&self, record: &R) -> Result<EnumFieldValue, RowkitError> {
        (self.accessor)(record)
    }
}

impl<R> std::fmt::Debug for SpecFieldDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecFieldDescriptor")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A type whose instances are written as sheet rows.
pub trait SheetRecord: Sized {
    /// Field descriptors in declared order.
    fn sheet_fields() -> Vec<SpecFieldDescriptor<Self>>;

    /// Adjust the per-call config. Called once per batch on the first record.
    fn configure(&self, _config: &mut SpecSheetWriteConfig) {}
}

////////////////////////////////////////////////////////////////////////////////
// #region FieldValues

/// Raw value read from a record field, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumFieldValue {
    /// Missing value.
    Blank,
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Structured JSON document.
    Document(serde_json::Value),
}

/// Conversion from a field type to [`EnumFieldValue`].
///
/// `KIND` selects the default encoder for columns of this type.
pub trait ToFieldValue {
    const KIND: &'static str = KIND_PLAIN;

    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError>;
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for &T {
    const KIND: &'static str = T::KIND;

    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
        (**self).to_field_value()
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for Box<T> {
    const KIND: &'static str = T::KIND;

    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
        (**self).to_field_value()
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    const KIND: &'static str = T::KIND;

    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
        match self {
            Some(value) => value.to_field_value(),
            None => Ok(EnumFieldValue::Blank),
        }
    }
}

impl ToFieldValue for str {
    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
        Ok(EnumFieldValue::Text(self.to_string()))
    }
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
        Ok(EnumFieldValue::Text(self.clone()))
    }
}

impl ToFieldValue for char {
    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
        Ok(EnumFieldValue::Text(self.to_string()))
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
        Ok(EnumFieldValue::Bool(*self))
    }
}

macro_rules! impl_to_field_value_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToFieldValue for $ty {
                fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
                    Ok(EnumFieldValue::Number(*self as f64))
                }
            }
        )*
    };
}

impl_to_field_value_number!(i8, i16, i32, u8, u16, u32, f32, f64);

// Integers wider than the f64 mantissa fall back to text past 2^53.
macro_rules! impl_to_field_value_wide_int {
    ($($ty:ty => $magnitude:expr),* $(,)?) => {
        $(
            impl ToFieldValue for $ty {
                fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
                    let n_magnitude = u128::try_from($magnitude(*self)).unwrap_or(u128::MAX);
                    if n_magnitude <= N_F64_EXACT_INT_MAX {
                        Ok(EnumFieldValue::Number(*self as f64))
                    } else {
                        Ok(EnumFieldValue::Text(self.to_string()))
                    }
                }
            }
        )*
    };
}

impl_to_field_value_wide_int!(
    i64 => i64::unsigned_abs,
    i128 => i128::unsigned_abs,
    isize => isize::unsigned_abs,
    u64 => std::convert::identity::<u64>,
    u128 => std::convert::identity::<u128>,
    usize => std::convert::identity::<usize>,
);

impl ToFieldValue for serde_json::Value {
    const KIND: &'static str = KIND_JSON;

    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
        Ok(EnumFieldValue::Document(self.clone()))
    }
}

/// JSON document column: written as its compact JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Serialize> ToFieldValue for Json<T> {
    const KIND: &'static str = KIND_JSON;

    fn to_field_value(&self) -> Result<EnumFieldValue, RowkitError> {
        Ok(EnumFieldValue::Document(serde_json::to_value(&self.0)?))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
