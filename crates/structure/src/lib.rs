//! Reflection-style introspection for Rust structs.
//!
//! This crate walks the fields of a struct at runtime and offers a handful of
//! utilities on top of that walk:
//!
//! - [`to_map`] - struct to an ordered `String -> Value` map
//! - [`to_values`] - field values as a flat list
//! - [`is_fully_populated`] - every field differs from its default
//! - [`field_names`] - declared field names
//! - [`is_struct`] / [`type_name`] - type identity helpers
//!
//! Structs opt in with `#[derive(Structure)]`. Only `pub` fields are visible,
//! and a field can be renamed or hidden with a tag:
//!
//! ```ignore
//! use structure::Structure;
//!
//! #[derive(Structure)]
//! pub struct Server {
//!     #[structure = "serverName"]
//!     pub name: String,
//!     pub port: u16,
//!     #[structure = "-"]
//!     pub token: String,
//!     pub tls: Tls,
//! }
//!
//! #[derive(Structure)]
//! pub struct Tls {
//!     pub enabled: bool,
//! }
//!
//! let server = Server { /* ... */ };
//! let map = structure::to_map(&server);     // {"serverName", "port", "tls": {"enabled"}}
//! let names = structure::field_names(&server); // ["name", "port", "enabled", "tls"]
//! ```
//!
//! Passing something that is not a struct (or a single pointer to one) to an
//! operation is a caller bug and panics; use the `try_` forms or [`is_struct`]
//! when the input is not known to be a struct.

extern crate self as structure;

mod error;
pub mod field;
mod ops;
pub mod reflect;
mod resolve;
pub mod value;

pub use error::Error;
pub use field::{FieldDesc, FieldRef, FieldTag, Structure};
pub use ops::{
    field_names, fields, is_fully_populated, is_struct, is_struct_type, to_map, to_values,
    try_field_names, try_fields, try_is_fully_populated, try_to_map, try_to_values,
    try_type_name, type_name,
};
pub use reflect::{Kind, Reflect};
pub use resolve::FieldList;
pub use value::{Record, Value};

#[cfg(feature = "derive")]
pub use structure_derive::Structure;

pub use indexmap::IndexMap;
