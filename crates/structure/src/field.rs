//! Field metadata and the [`Structure`] trait implemented by structs.
//!
//! A struct describes every declared field with a [`FieldDesc`] and exposes
//! the current value of each *visible* field through [`Structure::field`].
//! `#[derive(Structure)]` generates both from the struct definition:
//!
//! ```ignore
//! #[derive(Structure)]
//! pub struct User {
//!     #[structure = "myName"]
//!     pub name: String,
//!     #[structure = "-"]
//!     pub password: String,
//!     pub age: u32,
//! }
//! ```

use crate::{Reflect, Value};

/// Per-field annotation, parsed from `#[structure = "..."]` or
/// `#[structure(rename = "...")]` / `#[structure(skip)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldTag {
    /// No annotation, or an empty one.
    #[default]
    UseDeclared,
    /// Output name used by [`to_map`](crate::to_map) instead of the declared one.
    Rename(&'static str),
    /// The literal `-`: the field is ignored by every operation.
    Exclude,
}

impl FieldTag {
    /// Interpret a raw tag literal.
    pub const fn parse(tag: &'static str) -> Self {
        match tag.as_bytes() {
            [] => FieldTag::UseDeclared,
            [b'-'] => FieldTag::Exclude,
            _ => FieldTag::Rename(tag),
        }
    }
}

/// Description of one declared struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDesc {
    /// The field name as declared in Rust.
    pub name: &'static str,
    /// The declared type, as written in the struct definition.
    pub type_name: &'static str,
    pub tag: FieldTag,
    /// Whether the field is `pub`.
    pub exported: bool,
}

impl FieldDesc {
    /// A `pub` field without annotation.
    pub const fn new(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            tag: FieldTag::UseDeclared,
            exported: true,
        }
    }

    pub const fn with_tag(mut self, tag: FieldTag) -> Self {
        self.tag = tag;
        self
    }

    /// Mark the field as not accessible from outside its module.
    pub const fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Exported and not excluded.
    pub const fn is_visible(&self) -> bool {
        self.exported && !matches!(self.tag, FieldTag::Exclude)
    }

    /// Key used in maps: the override name if present, else the declared name.
    pub const fn output_name(&self) -> &'static str {
        match self.tag {
            FieldTag::Rename(name) => name,
            FieldTag::UseDeclared | FieldTag::Exclude => self.name,
        }
    }
}

/// Current value of a visible field.
pub enum FieldRef<'a> {
    /// The field is itself a struct (not behind a pointer); operations recurse.
    Nested(&'a dyn Structure),
    /// Any other value.
    Leaf(Value),
}

impl<'a> FieldRef<'a> {
    pub fn of<T: Reflect + ?Sized>(value: &'a T) -> Self {
        match value.as_structure() {
            Some(nested) => FieldRef::Nested(nested),
            None => FieldRef::Leaf(value.reflect()),
        }
    }
}

impl std::fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRef::Nested(nested) => f
                .debug_tuple("Nested")
                .field(&nested.type_name())
                .finish(),
            FieldRef::Leaf(value) => f.debug_tuple("Leaf").field(value).finish(),
        }
    }
}

/// A struct with named fields that can be walked field by field.
///
/// # Deriving
///
/// Use `#[derive(Structure)]`, which also implements [`Reflect`] for the
/// type. Hand-written impls must keep [`field`](Structure::field) in sync with
/// [`field_descs`](Structure::field_descs): every visible descriptor index
/// has to return `Some`.
pub trait Structure {
    /// Declared type name; empty for anonymous structs.
    fn type_name(&self) -> &'static str {
        ""
    }

    /// Descriptors of all declared fields, in declaration order.
    fn field_descs(&self) -> &'static [FieldDesc];

    /// Accessor for the field at `index` in [`field_descs`](Structure::field_descs).
    ///
    /// Only visible fields need to be readable; others may return `None`.
    fn field(&self, index: usize) -> Option<FieldRef<'_>>;
}
