//! Where generated code finds the `structure` runtime crate.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::Span;

const RUNTIME_CRATE: &str = "structure";

/// Path used as the prefix of every item the derive emits.
///
/// An explicit `#[structure(crate = "...")]` wins. Otherwise the caller's
/// manifest is searched, which handles renamed dependencies.
pub(crate) fn runtime_path(explicit: Option<&syn::Path>) -> syn::Result<syn::Path> {
    if let Some(path) = explicit {
        return Ok(path.clone());
    }
    from_manifest(crate_name(RUNTIME_CRATE))
}

fn from_manifest(
    found: Result<FoundCrate, proc_macro_crate::Error>,
) -> syn::Result<syn::Path> {
    match found {
        // The crate's own tests and doctests go through `extern crate self as structure`.
        Ok(FoundCrate::Itself) => Ok(syn::parse_quote!(::structure)),
        Ok(FoundCrate::Name(name)) => {
            let ident = syn::Ident::new(&name.replace('-', "_"), Span::call_site());
            Ok(syn::parse_quote!(::#ident))
        }
        Err(err) => Err(syn::Error::new(
            Span::call_site(),
            format!(
                "could not find `{RUNTIME_CRATE}` in Cargo.toml ({err}); \
                 add it as a dependency or set #[structure(crate = \"...\")]"
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use quote::ToTokens;

    use super::*;

    fn render(path: syn::Path) -> String {
        path.to_token_stream().to_string()
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit: syn::Path = syn::parse_quote!(my_app::reexport::structure);
        let path = runtime_path(Some(&explicit)).expect("explicit path");
        assert_eq!(render(path), "my_app :: reexport :: structure");
    }

    #[test]
    fn test_manifest_lookup() {
        let itself = from_manifest(Ok(FoundCrate::Itself)).expect("itself");
        assert_eq!(render(itself), ":: structure");

        let renamed =
            from_manifest(Ok(FoundCrate::Name("my-structure".to_string()))).expect("renamed");
        assert_eq!(render(renamed), ":: my_structure");
    }
}
