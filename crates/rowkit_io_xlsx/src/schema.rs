//! Column schema derivation from a record's field descriptors.

use crate::record::{SheetRecord, SpecFieldDescriptor};
use crate::spec::{SpecSheetColumn, SpecSheetSchema, SpecSheetWriteConfig};

/// Derive the schema of `R` under `config`.
pub fn derive_sheet_schema<R: SheetRecord>(config: &SpecSheetWriteConfig) -> SpecSheetSchema {
    derive_sheet_schema_from_fields(&R::sheet_fields(), config)
}

/// Derive one column per descriptor, in descriptor order.
///
/// Display name falls back to the field name, the type label is absent without
/// a type tag, and the comment falls back to an empty string.
pub fn derive_sheet_schema_from_fields<R>(
    fields: &[SpecFieldDescriptor<R>],
    config: &SpecSheetWriteConfig,
) -> SpecSheetSchema {
    let columns = fields
        .iter()
        .map(|field| SpecSheetColumn {
            field_name: field.name.to_string(),
            display_name: field
                .tag(&config.tag_name_key)
                .unwrap_or(field.name)
                .to_string(),
            type_label: field.tag(&config.tag_type_key).map(ToString::to_string),
            comment: config
                .comments
                .as_ref()
                .and_then(|dict_comments| dict_comments.get(field.name))
                .cloned()
                .unwrap_or_default(),
            kind: field.kind.to_string(),
        })
        .collect();

    SpecSheetSchema { columns }
}
