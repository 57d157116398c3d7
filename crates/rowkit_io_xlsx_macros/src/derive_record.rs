//! Implementation of the `#[derive(SheetRecord)]` macro.
//!
//! Generates the field descriptor table (and optionally `configure`) from
//! struct field annotations.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Result, ext::IdentExt, spanned::Spanned};

use crate::attrs::{parse_container_attrs, parse_field_attrs};

pub fn sheet_record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let container_attrs = parse_container_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "SheetRecord can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "SheetRecord can only be derived for structs",
            ));
        }
    };

    let mut field_tokens: Vec<TokenStream> = Vec::new();
    for field in fields.iter() {
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let field_name_str = field_ident.unraw().to_string();
        let field_ty = &field.ty;

        let field_attrs = parse_field_attrs(&field.attrs)?;

        let tag_tokens = field_attrs.tags.iter().map(|(key, value)| {
            quote! { (#key, #value) }
        });

        let kind_tokens = match &field_attrs.encoder {
            Some(kind) => quote! { #kind },
            None => quote! { <#field_ty as ::rowkit_io_xlsx::ToFieldValue>::KIND },
        };

        field_tokens.push(quote! {
            ::rowkit_io_xlsx::SpecFieldDescriptor {
                name: #field_name_str,
                tags: &[#(#tag_tokens),*],
                kind: #kind_tokens,
                accessor: |record: &Self| {
                    <#field_ty as ::rowkit_io_xlsx::ToFieldValue>::to_field_value(
                        &record.#field_ident,
                    )
                },
            }
        });
    }

    let configure_tokens = if container_attrs.is_empty() {
        quote! {}
    } else {
        let sheet_name_tokens = container_attrs.sheet_name.as_ref().map(|name| {
            quote! { config.sheet_name = ::std::string::String::from(#name); }
        });
        let start_row_tokens = container_attrs.start_row.map(|n_rows| {
            quote! { config.start_row = #n_rows; }
        });
        let configure_fn_tokens = container_attrs.configure.as_ref().map(|path| {
            quote! { #path(self, config); }
        });
        quote! {
            fn configure(&self, config: &mut ::rowkit_io_xlsx::SpecSheetWriteConfig) {
                #sheet_name_tokens
                #start_row_tokens
                #configure_fn_tokens
            }
        }
    };

    Ok(quote! {
        impl #impl_generics ::rowkit_io_xlsx::SheetRecord for #struct_name #ty_generics #where_clause {
            fn sheet_fields() -> ::std::vec::Vec<::rowkit_io_xlsx::SpecFieldDescriptor<Self>> {
                ::std::vec![
                    #(#field_tokens),*
                ]
            }

            #configure_tokens
        }
    })
}
