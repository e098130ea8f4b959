//! `Structure` and `Reflect` impl generation for `#[derive(Structure)]`.

use std::collections::HashSet;

use proc_macro2::{Span, TokenStream, TokenTree};
use quote::{ToTokens, quote};
use syn::{Ident, LitStr, Type, WherePredicate};

use crate::attrs::{FieldAttrs, StructureAttrs, Tag};

/// A field with its parsed tag, in declaration order.
struct Field<'a> {
    attrs: &'a FieldAttrs,
    tag: Tag,
}

impl Field<'_> {
    fn is_visible(&self) -> bool {
        self.attrs.is_exported() && self.tag != Tag::Exclude
    }
}

pub fn generate(attrs: &StructureAttrs, krate: &syn::Path) -> syn::Result<TokenStream> {
    let fields = attrs
        .fields()
        .map(|field| {
            Ok(Field {
                attrs: field,
                tag: field.tag()?,
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let struct_name = &attrs.ident;
    let type_name_lit = LitStr::new(&struct_name.to_string(), Span::call_site());

    let mut generics = attrs.generics.clone();
    let type_params: HashSet<Ident> = generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    let bounds: Vec<WherePredicate> = fields
        .iter()
        .filter(|field| field.is_visible() && mentions_any(&field.attrs.ty, &type_params))
        .map(|field| {
            let ty = &field.attrs.ty;
            syn::parse_quote!(#ty: #krate::Reflect)
        })
        .collect();
    generics.make_where_clause().predicates.extend(bounds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let descs: Vec<TokenStream> = fields
        .iter()
        .map(|field| field_desc(field, krate))
        .collect();

    let accessors: Vec<TokenStream> = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.is_visible())
        .map(|(index, field)| {
            let ident = &field.attrs.ident;
            quote! {
                #index => ::core::option::Option::Some(#krate::FieldRef::of(&self.#ident)),
            }
        })
        .collect();

    Ok(quote! {
        impl #impl_generics #krate::Structure for #struct_name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name_lit
            }

            fn field_descs(&self) -> &'static [#krate::FieldDesc] {
                const FIELDS: &[#krate::FieldDesc] = &[
                    #(#descs),*
                ];
                FIELDS
            }

            fn field(&self, index: usize) -> ::core::option::Option<#krate::FieldRef<'_>> {
                match index {
                    #(#accessors)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics #krate::Reflect for #struct_name #ty_generics #where_clause {
            const KIND: #krate::Kind = #krate::Kind::Struct(#type_name_lit);

            fn reflect(&self) -> #krate::Value {
                #krate::Value::Struct(#krate::Record::capture(self))
            }

            fn as_structure(&self) -> ::core::option::Option<&dyn #krate::Structure> {
                ::core::option::Option::Some(self)
            }
        }
    })
}

fn field_desc(field: &Field<'_>, krate: &syn::Path) -> TokenStream {
    let name_lit = LitStr::new(&field.attrs.name(), Span::call_site());
    let ty = &field.attrs.ty;

    let mut expr = quote! {
        #krate::FieldDesc::new(#name_lit, stringify!(#ty))
    };

    match &field.tag {
        Tag::UseDeclared => {}
        Tag::Rename(name) => {
            let rename_lit = LitStr::new(name, Span::call_site());
            expr = quote! { #expr.with_tag(#krate::FieldTag::Rename(#rename_lit)) };
        }
        Tag::Exclude => {
            expr = quote! { #expr.with_tag(#krate::FieldTag::Exclude) };
        }
    }

    if !field.attrs.is_exported() {
        expr = quote! { #expr.private() };
    }

    expr
}

/// Whether `ty` names any of the struct's type parameters.
fn mentions_any(ty: &Type, params: &HashSet<Ident>) -> bool {
    fn walk(tokens: TokenStream, params: &HashSet<Ident>) -> bool {
        tokens.into_iter().any(|token| match token {
            TokenTree::Ident(ident) => params.contains(&ident),
            TokenTree::Group(group) => walk(group.stream(), params),
            _ => false,
        })
    }

    !params.is_empty() && walk(ty.to_token_stream(), params)
}
