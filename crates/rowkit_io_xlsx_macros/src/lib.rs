//! Proc macros for `rowkit_io_xlsx`.
//!
//! - [`SheetRecord`] - Generate the field descriptor table of a record type

mod attrs;
mod derive_record;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `rowkit_io_xlsx::SheetRecord` from struct field annotations.
///
/// Every named field becomes one column, in declaration order. Field values are
/// read through `ToFieldValue`, whose `KIND` picks the cell encoder.
///
/// # Field Attributes
///
/// `#[sheet(key = "value", ...)]` stores string tags on the field. The write
/// config decides which tag namespaces are read (`excel` for the header text
/// and `type` for the type row by default).
///
/// | Key | Description |
/// |-----|-------------|
/// | `encoder` | Encoder kind for this column (default: `ToFieldValue::KIND`) |
/// | any other | Tag stored under that namespace |
///
/// # Container Attributes
///
/// | Attribute | Type | Description |
/// |-----------|------|-------------|
/// | `sheet_name` | string | Target sheet name |
/// | `start_row` | integer | Number of reserved leading rows |
/// | `configure` | string | Path of `fn(&Self, &mut SpecSheetWriteConfig)` run after the above |
///
/// # Example
///
/// ```ignore
/// use rowkit_io_xlsx::{Json, SheetRecord};
///
/// #[derive(SheetRecord)]
/// #[sheet(sheet_name = "Orders", start_row = 1)]
/// struct Order {
///     #[sheet(excel = "Order ID", type = "int")]
///     id: u64,
///
///     #[sheet(excel = "Customer")]
///     customer: String,
///
///     #[sheet(type = "json")]
///     items: Json<Vec<String>>,
///
///     #[sheet(encoder = "json")]
///     note: String,
/// }
/// ```
#[proc_macro_derive(SheetRecord, attributes(sheet))]
pub fn sheet_record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_record::sheet_record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
