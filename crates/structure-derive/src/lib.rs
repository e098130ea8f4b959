//! Derive macro for the `structure` introspection traits.
//!
//! `#[derive(Structure)]` implements `structure::Structure` and
//! `structure::Reflect` for a struct with named fields (or a unit struct).
//!
//! # Field Attributes
//!
//! - `#[structure = "name"]` / `#[structure(rename = "name")]` - key used by `to_map`
//! - `#[structure = "-"]` / `#[structure(skip)]` - ignore the field everywhere
//! - `#[structure = ""]` - same as no attribute
//!
//! Only `pub` fields are visible. Visible field types must implement
//! `structure::Reflect`; hidden fields can have any type.
//!
//! # Container Attributes
//!
//! - `#[structure(crate = "path")]` - path to the `structure` crate when it is
//!   re-exported or renamed and cannot be found automatically

use darling::FromDeriveInput;
use proc_macro::TokenStream;
use syn::parse_macro_input;

mod attrs;
mod generate;
mod runtime_path;

#[proc_macro_derive(Structure, attributes(structure))]
pub fn derive_structure(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);

    match expand_derive_structure(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_derive_structure(input: &syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let attrs = attrs::StructureAttrs::from_derive_input(input)
        .map_err(|e| syn::Error::new_spanned(input, e.to_string()))?;

    let krate = runtime_path::runtime_path(attrs.krate.as_ref())?;
    generate::generate(&attrs, &krate)
}
