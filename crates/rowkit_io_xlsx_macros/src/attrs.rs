//! Attribute parsing for the `SheetRecord` derive macro.

use syn::{
    Attribute, Error, Ident, Lit, LitStr, Path, Result, Token,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
};

/// Attribute namespace shared by container and field attributes.
pub const ATTR_SHEET: &str = "sheet";
/// Field key overriding the encoder kind instead of producing a tag.
pub const KEY_ENCODER: &str = "encoder";

/// One `key = literal` item. Keys may be keywords such as `type`.
struct SheetAttrArg {
    key: Ident,
    value: Lit,
}

impl Parse for SheetAttrArg {
    fn parse(input: ParseStream) -> Result<Self> {
        let key = Ident::parse_any(input)?;
        input.parse::<Token![=]>()?;
        let value: Lit = input.parse()?;
        Ok(Self { key, value })
    }
}

fn parse_sheet_args(attrs: &[Attribute]) -> Result<Vec<SheetAttrArg>> {
    let mut l_args = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTR_SHEET)) {
        let args =
            attr.parse_args_with(Punctuated::<SheetAttrArg, Token![,]>::parse_terminated)?;
        l_args.extend(args);
    }
    Ok(l_args)
}

fn expect_lit_str(arg: &SheetAttrArg) -> Result<LitStr> {
    match &arg.value {
        Lit::Str(lit) => Ok(lit.clone()),
        other => Err(Error::new(
            other.span(),
            format!("`{}` expects a string literal", arg.key),
        )),
    }
}

/// Field-level attributes from `#[sheet(...)]`.
#[derive(Default)]
pub struct FieldAttrs {
    /// Tags as `(namespace, value)` in declaration order.
    pub tags: Vec<(String, LitStr)>,
    /// Encoder kind override.
    pub encoder: Option<LitStr>,
}

pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut field_attrs = FieldAttrs::default();
    for arg in parse_sheet_args(attrs)? {
        let c_key = arg.key.unraw().to_string();
        let value = expect_lit_str(&arg)?;

        if c_key == KEY_ENCODER {
            if field_attrs.encoder.is_some() {
                return Err(Error::new(arg.key.span(), "duplicate `encoder` key"));
            }
            field_attrs.encoder = Some(value);
            continue;
        }
        if field_attrs.tags.iter().any(|(key, _)| *key == c_key) {
            return Err(Error::new(
                arg.key.span(),
                format!("duplicate tag key `{c_key}`"),
            ));
        }
        field_attrs.tags.push((c_key, value));
    }
    Ok(field_attrs)
}

/// Container-level attributes from `#[sheet(...)]`.
#[derive(Default)]
pub struct ContainerAttrs {
    pub sheet_name: Option<LitStr>,
    pub start_row: Option<usize>,
    pub configure: Option<Path>,
}

impl ContainerAttrs {
    pub fn is_empty(&self) -> bool {
        self.sheet_name.is_none() && self.start_row.is_none() && self.configure.is_none()
    }
}

pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttrs> {
    let mut container_attrs = ContainerAttrs::default();
    for arg in parse_sheet_args(attrs)? {
        match arg.key.unraw().to_string().as_str() {
            "sheet_name" => container_attrs.sheet_name = Some(expect_lit_str(&arg)?),
            "start_row" => match &arg.value {
                Lit::Int(lit) => container_attrs.start_row = Some(lit.base10_parse()?),
                other => {
                    return Err(Error::new(
                        other.span(),
                        "`start_row` expects an integer literal",
                    ));
                }
            },
            "configure" => container_attrs.configure = Some(expect_lit_str(&arg)?.parse()?),
            other => {
                return Err(Error::new(
                    arg.key.span(),
                    format!(
                        "unknown sheet attribute `{other}`. Expected one of: sheet_name, start_row, configure"
                    ),
                ));
            }
        }
    }
    Ok(container_attrs)
}
