//! The [`Reflect`] trait: a static kind plus a dynamic [`Value`] view for
//! every type that can appear in a struct field.
//!
//! Structs get their implementation from `#[derive(Structure)]`. Standard
//! library scalars, strings, collections and the usual indirections
//! (`&T`, `Box<T>`, `Rc<T>`, `Arc<T>`, `Option<T>`) are covered here.
//!
//! # Example
//!
//! ```
//! use structure::{Kind, Reflect, Value};
//!
//! assert_eq!(<u8 as Reflect>::KIND, Kind::UInt);
//! assert_eq!(<Box<String> as Reflect>::ELEM_KIND, Some(Kind::String));
//! assert_eq!(7_i32.reflect(), Value::Int(7));
//! ```

use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    fmt,
    rc::Rc,
    sync::Arc,
};

use indexmap::IndexMap;

use crate::{Structure, Value};

/// Coarse classification of a reflected type.
///
/// `Struct` carries the declared type name so name lookups stay type-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Unit,
    Bool,
    Int,
    UInt,
    Float,
    Char,
    String,
    List,
    Map,
    Optional,
    Pointer,
    Struct(&'static str),
}

impl Kind {
    /// True for the one-level indirections that operations dereference.
    pub const fn is_indirect(self) -> bool {
        matches!(self, Kind::Pointer | Kind::Optional)
    }

    pub const fn is_struct(self) -> bool {
        matches!(self, Kind::Struct(_))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Kind::Unit => f.write_str("unit"),
            Kind::Bool => f.write_str("bool"),
            Kind::Int => f.write_str("int"),
            Kind::UInt => f.write_str("uint"),
            Kind::Float => f.write_str("float"),
            Kind::Char => f.write_str("char"),
            Kind::String => f.write_str("string"),
            Kind::List => f.write_str("list"),
            Kind::Map => f.write_str("map"),
            Kind::Optional => f.write_str("optional"),
            Kind::Pointer => f.write_str("pointer"),
            Kind::Struct("") => f.write_str("struct"),
            Kind::Struct(name) => write!(f, "struct `{name}`"),
        }
    }
}

/// A type whose values can be inspected at runtime.
///
/// # Deriving
///
/// `#[derive(Structure)]` implements this trait for structs with
/// `KIND = Kind::Struct("Name")` and [`as_structure`](Reflect::as_structure)
/// returning `Some(self)`.
pub trait Reflect {
    /// Kind of the type itself.
    const KIND: Kind;

    /// Kind of the pointee for one-level indirections; `None` otherwise.
    const ELEM_KIND: Option<Kind> = None;

    /// Snapshot of the current value.
    fn reflect(&self) -> Value;

    /// The value as a struct, without dereferencing.
    fn as_structure(&self) -> Option<&dyn Structure> {
        None
    }

    /// The value as a struct after at most one dereference.
    ///
    /// Indirections forward to their pointee's [`as_structure`], never further,
    /// so `Box<Box<S>>` is not a struct.
    ///
    /// [`as_structure`]: Reflect::as_structure
    fn deref_structure(&self) -> Option<&dyn Structure> {
        self.as_structure()
    }
}

/// Kind of `T` after at most one dereference.
pub(crate) fn deref_kind<T: Reflect + ?Sized>() -> Kind {
    match T::ELEM_KIND {
        Some(elem) if T::KIND.is_indirect() => elem,
        _ => T::KIND,
    }
}

// ============================================================================
// Scalars
// ============================================================================

impl Reflect for () {
    const KIND: Kind = Kind::Unit;

    fn reflect(&self) -> Value {
        Value::Unit
    }
}

impl Reflect for bool {
    const KIND: Kind = Kind::Bool;

    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Reflect for char {
    const KIND: Kind = Kind::Char;

    fn reflect(&self) -> Value {
        Value::Char(*self)
    }
}

macro_rules! impl_reflect_for_int {
    ($($ty:ty),*) => {
        $(
            impl Reflect for $ty {
                const KIND: Kind = Kind::Int;

                fn reflect(&self) -> Value {
                    Value::Int(*self as i64)
                }
            }
        )*
    };
}

impl_reflect_for_int!(i8, i16, i32, i64, isize);

macro_rules! impl_reflect_for_uint {
    ($($ty:ty),*) => {
        $(
            impl Reflect for $ty {
                const KIND: Kind = Kind::UInt;

                fn reflect(&self) -> Value {
                    Value::UInt(*self as u64)
                }
            }
        )*
    };
}

impl_reflect_for_uint!(u8, u16, u32, u64, usize);

impl Reflect for f32 {
    const KIND: Kind = Kind::Float;

    fn reflect(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl Reflect for f64 {
    const KIND: Kind = Kind::Float;

    fn reflect(&self) -> Value {
        Value::Float(*self)
    }
}

impl Reflect for str {
    const KIND: Kind = Kind::String;

    fn reflect(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl Reflect for String {
    const KIND: Kind = Kind::String;

    fn reflect(&self) -> Value {
        Value::String(self.clone())
    }
}

// ============================================================================
// Indirections
// ============================================================================

macro_rules! impl_reflect_for_pointer {
    ($($ptr:ty),*) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $ptr {
                const KIND: Kind = Kind::Pointer;
                const ELEM_KIND: Option<Kind> = Some(T::KIND);

                fn reflect(&self) -> Value {
                    Value::Pointer(Box::new((**self).reflect()))
                }

                fn deref_structure(&self) -> Option<&dyn Structure> {
                    (**self).as_structure()
                }
            }
        )*
    };
}

impl_reflect_for_pointer!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

impl<T: Reflect> Reflect for Option<T> {
    const KIND: Kind = Kind::Optional;
    const ELEM_KIND: Option<Kind> = Some(T::KIND);

    fn reflect(&self) -> Value {
        Value::Optional(self.as_ref().map(|value| Box::new(value.reflect())))
    }

    fn deref_structure(&self) -> Option<&dyn Structure> {
        self.as_ref().and_then(|value| value.as_structure())
    }
}

// ============================================================================
// Collections
// ============================================================================

impl<T: Reflect> Reflect for [T] {
    const KIND: Kind = Kind::List;

    fn reflect(&self) -> Value {
        Value::List(self.iter().map(Reflect::reflect).collect())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    const KIND: Kind = Kind::List;

    fn reflect(&self) -> Value {
        self.as_slice().reflect()
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    const KIND: Kind = Kind::List;

    fn reflect(&self) -> Value {
        self.as_slice().reflect()
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    const KIND: Kind = Kind::List;

    fn reflect(&self) -> Value {
        Value::List(self.iter().map(Reflect::reflect).collect())
    }
}

macro_rules! impl_reflect_for_map {
    ($($map:ident),*) => {
        $(
            impl<K: ToString, V: Reflect, S> Reflect for $map<K, V, S> {
                const KIND: Kind = Kind::Map;

                fn reflect(&self) -> Value {
                    Value::Map(
                        self.iter()
                            .map(|(key, value)| (key.to_string(), value.reflect()))
                            .collect(),
                    )
                }
            }
        )*
    };
}

impl_reflect_for_map!(HashMap, IndexMap);

impl<K: ToString, V: Reflect> Reflect for BTreeMap<K, V> {
    const KIND: Kind = Kind::Map;

    fn reflect(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.to_string(), value.reflect()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(<() as Reflect>::KIND, Kind::Unit);
        assert_eq!(<bool as Reflect>::KIND, Kind::Bool);
        assert_eq!(<i16 as Reflect>::KIND, Kind::Int);
        assert_eq!(<usize as Reflect>::KIND, Kind::UInt);
        assert_eq!(<f32 as Reflect>::KIND, Kind::Float);
        assert_eq!(<str as Reflect>::KIND, Kind::String);
        assert_eq!(<String as Reflect>::ELEM_KIND, None);
    }

    #[test]
    fn test_deref_kind_is_one_level() {
        assert_eq!(deref_kind::<Box<i32>>(), Kind::Int);
        assert_eq!(deref_kind::<Option<String>>(), Kind::String);
        assert_eq!(deref_kind::<&Box<i32>>(), Kind::Pointer);
        assert_eq!(deref_kind::<Vec<i32>>(), Kind::List);
    }

    #[test]
    fn test_reflect_values() {
        assert_eq!(3_u8.reflect(), Value::UInt(3));
        assert_eq!((-3_i64).reflect(), Value::Int(-3));
        assert_eq!(1.5_f32.reflect(), Value::Float(1.5));
        assert_eq!("hi".to_string().reflect(), Value::String("hi".to_string()));
        assert_eq!(
            vec![1_i32, 2].reflect(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(None::<i32>.reflect(), Value::Optional(None));
        assert_eq!(
            Box::new(true).reflect(),
            Value::Pointer(Box::new(Value::Bool(true)))
        );
    }

    #[test]
    fn test_bytes_are_lists_of_uint() {
        assert_eq!(
            [0x0a_u8, 0xff].reflect(),
            Value::List(vec![Value::UInt(10), Value::UInt(255)])
        );
        assert!(Vec::<u8>::new().reflect().is_zero());
        assert!(!vec![0_u8].reflect().is_zero());
    }

    #[test]
    fn test_btreemap_keys_are_sorted() {
        let map = BTreeMap::from([("b", 2_u32), ("a", 1_u32)]);
        let Value::Map(entries) = map.reflect() else {
            panic!("expected a map");
        };
        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::Struct("User").to_string(), "struct `User`");
        assert_eq!(Kind::Struct("").to_string(), "struct");
        assert_eq!(Kind::Optional.to_string(), "optional");
    }
}
