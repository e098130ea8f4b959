//! The introspection operations.
//!
//! Every operation that needs a struct comes in two forms: a `try_` form that
//! returns [`Error`] and a plain form that panics with the same message. The
//! plain forms are the primary API; passing a non-struct is a caller bug.

use indexmap::IndexMap;

use crate::{
    Error, FieldDesc, FieldList, FieldRef, Reflect, Value,
    reflect::{Kind, deref_kind},
};

macro_rules! fatal {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    };
}

/// Convert a struct into a map keyed by field name.
///
/// A field tagged `#[structure = "name"]` appears under `name`; fields tagged
/// `-` and non-`pub` fields are left out. Nested structs become nested maps.
/// If two fields resolve to the same key, the later one wins.
///
/// # Panics
///
/// Panics if `value` is not a struct or a pointer to one.
#[track_caller]
pub fn to_map<T: Reflect + ?Sized>(value: &T) -> IndexMap<String, Value> {
    fatal!(try_to_map(value))
}

pub fn try_to_map<T: Reflect + ?Sized>(value: &T) -> Result<IndexMap<String, Value>, Error> {
    Ok(map_fields(&FieldList::resolve(value)?))
}

fn map_fields(fields: &FieldList<'_>) -> IndexMap<String, Value> {
    let mut out = IndexMap::with_capacity(fields.len());
    for (desc, field) in fields.iter() {
        let value = match field {
            FieldRef::Nested(nested) => {
                Value::Map(map_fields(&FieldList::from_structure(nested)))
            }
            FieldRef::Leaf(value) => value,
        };
        if out.insert(desc.output_name().to_string(), value).is_some() {
            tracing::debug!(
                type_name = fields.type_name(),
                key = desc.output_name(),
                "duplicate map key, keeping the later field"
            );
        }
    }
    out
}

/// Values of the visible fields, in declaration order.
///
/// Nested structs are flattened: their values are spliced in place.
///
/// # Panics
///
/// Panics if `value` is not a struct or a pointer to one.
#[track_caller]
pub fn to_values<T: Reflect + ?Sized>(value: &T) -> Vec<Value> {
    fatal!(try_to_values(value))
}

pub fn try_to_values<T: Reflect + ?Sized>(value: &T) -> Result<Vec<Value>, Error> {
    let mut out = Vec::new();
    collect_values(&FieldList::resolve(value)?, &mut out);
    Ok(out)
}

fn collect_values(fields: &FieldList<'_>, out: &mut Vec<Value>) {
    for (_, field) in fields.iter() {
        match field {
            FieldRef::Nested(nested) => collect_values(&FieldList::from_structure(nested), out),
            FieldRef::Leaf(value) => out.push(value),
        }
    }
}

/// Whether every visible field holds a non-default value.
///
/// Nested structs are checked recursively. Checking stops at the first field,
/// in declaration order, that holds its default. A struct without visible
/// fields is fully populated.
///
/// # Panics
///
/// Panics if `value` is not a struct or a pointer to one.
#[track_caller]
pub fn is_fully_populated<T: Reflect + ?Sized>(value: &T) -> bool {
    fatal!(try_is_fully_populated(value))
}

pub fn try_is_fully_populated<T: Reflect + ?Sized>(value: &T) -> Result<bool, Error> {
    Ok(populated(&FieldList::resolve(value)?))
}

fn populated(fields: &FieldList<'_>) -> bool {
    for (desc, field) in fields.iter() {
        let ok = match field {
            FieldRef::Nested(nested) => populated(&FieldList::from_structure(nested)),
            FieldRef::Leaf(value) => !value.is_zero(),
        };
        if !ok {
            tracing::debug!(
                type_name = fields.type_name(),
                field = desc.name,
                "field holds its default value"
            );
            return false;
        }
    }
    true
}

/// Declared names of the visible fields.
///
/// Tag overrides are ignored here: a field renamed to `myName` is still
/// reported under its declared name.
///
/// For a nested struct field, the nested struct's names come first and the
/// field's own name follows them, so `Outer { inner: Inner { a }, x }` gives
/// `["a", "inner", "x"]`. This order is kept for compatibility only; do not
/// build on it.
///
/// # Panics
///
/// Panics if `value` is not a struct or a pointer to one.
#[track_caller]
pub fn field_names<T: Reflect + ?Sized>(value: &T) -> Vec<&'static str> {
    fatal!(try_field_names(value))
}

pub fn try_field_names<T: Reflect + ?Sized>(value: &T) -> Result<Vec<&'static str>, Error> {
    let mut out = Vec::new();
    collect_names(&FieldList::resolve(value)?, &mut out);
    Ok(out)
}

fn collect_names(fields: &FieldList<'_>, out: &mut Vec<&'static str>) {
    for (desc, field) in fields.iter() {
        if let FieldRef::Nested(nested) = field {
            collect_names(&FieldList::from_structure(nested), out);
        }
        out.push(desc.name);
    }
}

/// Descriptors of the visible fields, without descending into nested structs.
///
/// # Panics
///
/// Panics if `value` is not a struct or a pointer to one.
#[track_caller]
pub fn fields<T: Reflect + ?Sized>(value: &T) -> Vec<&'static FieldDesc> {
    fatal!(try_fields(value))
}

pub fn try_fields<T: Reflect + ?Sized>(value: &T) -> Result<Vec<&'static FieldDesc>, Error> {
    Ok(FieldList::resolve(value)?.descs().collect())
}

/// Whether `value` is a struct or a one-level pointer to a struct type.
///
/// The check is on the type, so `None::<S>` and `Box<S>` both count. Never
/// panics; `()` is not a struct.
pub fn is_struct<T: Reflect + ?Sized>(_value: &T) -> bool {
    is_struct_type::<T>()
}

/// Type-level form of [`is_struct`].
pub fn is_struct_type<T: Reflect + ?Sized>() -> bool {
    deref_kind::<T>().is_struct()
}

/// Declared name of the struct type of `value`, after one dereference.
///
/// # Panics
///
/// Panics if the type is not a struct or a pointer to one.
#[track_caller]
pub fn type_name<T: Reflect + ?Sized>(value: &T) -> &'static str {
    fatal!(try_type_name(value))
}

pub fn try_type_name<T: Reflect + ?Sized>(_value: &T) -> Result<&'static str, Error> {
    match deref_kind::<T>() {
        Kind::Struct(name) => Ok(name),
        kind => Err(Error::NotStruct { kind }),
    }
}
