//! Attribute parsing for `#[derive(Structure)]` using darling.
//!
//! Container attributes go through darling directly. Field tags are forwarded
//! and parsed by hand because they accept both the tag-literal form
//! (`#[structure = "-"]`) and the list form (`#[structure(skip)]`).

use darling::{FromDeriveInput, FromField};
use syn::{Attribute, Expr, ExprLit, Ident, Lit, LitStr, Meta, Type, Visibility, ext::IdentExt};

/// Container-level attributes for `#[derive(Structure)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(structure), supports(struct_named, struct_unit))]
pub struct StructureAttrs {
    pub ident: Ident,
    pub generics: syn::Generics,
    pub data: darling::ast::Data<(), FieldAttrs>,

    /// Path to the runtime crate, for re-exports or renamed dependencies.
    #[darling(default, rename = "crate")]
    pub krate: Option<syn::Path>,
}

/// Field-level data; the tag itself is read from the forwarded attributes.
#[derive(Debug, Clone, FromField)]
#[darling(forward_attrs(structure))]
pub struct FieldAttrs {
    pub ident: Option<Ident>,
    pub vis: Visibility,
    pub ty: Type,
    pub attrs: Vec<Attribute>,
}

/// Parsed field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    UseDeclared,
    Rename(String),
    Exclude,
}

impl Tag {
    fn from_literal(value: String) -> Self {
        match value.as_str() {
            "" => Tag::UseDeclared,
            "-" => Tag::Exclude,
            _ => Tag::Rename(value),
        }
    }
}

impl StructureAttrs {
    pub fn fields(&self) -> impl Iterator<Item = &FieldAttrs> {
        match &self.data {
            darling::ast::Data::Struct(fields) => fields.iter(),
            _ => unreachable!("StructureAttrs only supports structs"),
        }
    }
}

impl FieldAttrs {
    /// Returns the declared field name, without the `r#` prefix of raw
    /// identifiers.
    ///
    /// # Panics
    ///
    /// Panics if the field has no identifier (tuple struct field).
    pub fn name(&self) -> String {
        self.ident
            .as_ref()
            .expect("FieldAttrs requires named fields")
            .unraw()
            .to_string()
    }

    /// Only `pub` fields are readable from outside the defining module.
    pub fn is_exported(&self) -> bool {
        matches!(self.vis, Visibility::Public(_))
    }

    pub fn tag(&self) -> syn::Result<Tag> {
        let mut tag = None;
        for attr in &self.attrs {
            let parsed = parse_tag(attr)?;
            if tag.replace(parsed).is_some() {
                return Err(syn::Error::new_spanned(
                    attr,
                    format!("duplicate `structure` attribute on field `{}`", self.name()),
                ));
            }
        }
        Ok(tag.unwrap_or(Tag::UseDeclared))
    }
}

fn parse_tag(attr: &Attribute) -> syn::Result<Tag> {
    match &attr.meta {
        Meta::NameValue(name_value) => match &name_value.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => Ok(Tag::from_literal(lit.value())),
            other => Err(syn::Error::new_spanned(
                other,
                "expected a string literal, e.g. #[structure = \"name\"] or #[structure = \"-\"]",
            )),
        },
        Meta::List(_) => {
            let mut skip = false;
            let mut rename: Option<LitStr> = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    rename = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown `structure` field option; expected `skip` or `rename`"))
                }
            })?;

            match (skip, rename) {
                (true, Some(lit)) => Err(syn::Error::new_spanned(
                    lit,
                    "`skip` and `rename` cannot be combined",
                )),
                (true, None) => Ok(Tag::Exclude),
                (false, Some(lit)) if lit.value().is_empty() => Err(syn::Error::new_spanned(
                    lit,
                    "`rename` requires a non-empty name",
                )),
                (false, Some(lit)) => Ok(Tag::Rename(lit.value())),
                (false, None) => Err(syn::Error::new_spanned(
                    attr,
                    "empty `structure` attribute; expected `skip` or `rename = \"...\"`",
                )),
            }
        }
        Meta::Path(_) => Err(syn::Error::new_spanned(
            attr,
            "expected #[structure = \"...\"] or #[structure(...)]",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn parse(input: syn::DeriveInput) -> StructureAttrs {
        StructureAttrs::from_derive_input(&input).unwrap()
    }

    #[test]
    fn test_basic_parsing() {
        let attrs = parse(parse_quote! {
            pub struct User {
                pub name: String,
                age: u32,
            }
        });

        assert_eq!(attrs.ident.to_string(), "User");
        assert!(attrs.krate.is_none());
        let fields: Vec<_> = attrs.fields().collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name(), "name");
        assert!(fields[0].is_exported());
        assert!(!fields[1].is_exported());
        assert_eq!(fields[1].tag().unwrap(), Tag::UseDeclared);
    }

    #[test]
    fn test_raw_identifiers_are_unrawed() {
        let attrs = parse(parse_quote! {
            pub struct Keyword {
                pub r#type: String,
                #[structure = "kind"]
                pub r#match: u8,
            }
        });

        let names: Vec<_> = attrs.fields().map(FieldAttrs::name).collect();
        assert_eq!(names, vec!["type", "match"]);
    }

    #[test]
    fn test_restricted_visibility_is_not_exported() {
        let attrs = parse(parse_quote! {
            pub struct Config {
                pub(crate) path: String,
                pub(super) mode: u8,
            }
        });

        assert!(attrs.fields().all(|field| !field.is_exported()));
    }

    #[test]
    fn test_tag_literal_form() {
        let attrs = parse(parse_quote! {
            pub struct User {
                #[structure = "myName"]
                pub name: String,
                #[structure = "-"]
                pub password: String,
                #[structure = ""]
                pub email: String,
            }
        });

        let tags: Vec<_> = attrs.fields().map(|f| f.tag().unwrap()).collect();
        assert_eq!(
            tags,
            vec![
                Tag::Rename("myName".to_string()),
                Tag::Exclude,
                Tag::UseDeclared
            ]
        );
    }

    #[test]
    fn test_tag_list_form() {
        let attrs = parse(parse_quote! {
            pub struct User {
                #[structure(rename = "myName")]
                pub name: String,
                #[structure(skip)]
                pub password: String,
            }
        });

        let tags: Vec<_> = attrs.fields().map(|f| f.tag().unwrap()).collect();
        assert_eq!(tags, vec![Tag::Rename("myName".to_string()), Tag::Exclude]);
    }

    #[test]
    fn test_crate_override() {
        let attrs = parse(parse_quote! {
            #[structure(crate = "my_reexport::structure")]
            pub struct User {
                pub name: String,
            }
        });

        let krate = attrs.krate.expect("crate override");
        assert_eq!(quote::quote!(#krate).to_string(), "my_reexport :: structure");
    }

    #[test]
    fn test_invalid_tags() {
        let attrs = parse(parse_quote! {
            pub struct Broken {
                #[structure(skip, rename = "x")]
                pub a: i32,
                #[structure(rename = "")]
                pub b: i32,
                #[structure(flatten)]
                pub c: i32,
                #[structure = 3]
                pub d: i32,
                #[structure]
                pub e: i32,
                #[structure = "x"]
                #[structure(skip)]
                pub f: i32,
                #[structure()]
                pub g: i32,
            }
        });

        let errors: Vec<String> = attrs
            .fields()
            .map(|f| f.tag().unwrap_err().to_string())
            .collect();
        assert!(errors[0].contains("cannot be combined"));
        assert!(errors[1].contains("non-empty"));
        assert!(errors[2].contains("unknown `structure` field option"));
        assert!(errors[3].contains("expected a string literal"));
        assert!(errors[4].contains("expected #[structure"));
        assert!(errors[5].contains("duplicate `structure` attribute on field `f`"));
        assert!(errors[6].contains("empty `structure` attribute"));
    }

    #[test]
    fn test_rejects_enums_and_tuple_structs() {
        let input: syn::DeriveInput = parse_quote! {
            pub enum Shape { Circle, Square }
        };
        assert!(StructureAttrs::from_derive_input(&input).is_err());

        let input: syn::DeriveInput = parse_quote! {
            pub struct Pair(pub i32, pub i32);
        };
        assert!(StructureAttrs::from_derive_input(&input).is_err());
    }
}
