//! Dynamic value model returned by the introspection operations.

use indexmap::IndexMap;

use crate::{FieldList, FieldRef, Structure};

/// A snapshot of a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Optional(Option<Box<Value>>),
    /// One level of indirection (`&T`, `Box<T>`, `Rc<T>`, `Arc<T>`).
    Pointer(Box<Value>),
    /// A struct seen as an opaque value, e.g. behind a pointer or in a `Vec`.
    Struct(Record),
}

impl Value {
    /// Whether this equals the default value of the type it was taken from.
    ///
    /// Pointers are compared through their pointee, like `Box<T>: PartialEq`.
    /// A captured struct is zero when every visible field is.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Unit => true,
            Value::Bool(value) => !value,
            Value::Int(value) => *value == 0,
            Value::UInt(value) => *value == 0,
            Value::Float(value) => *value == 0.0,
            Value::Char(value) => *value == '\0',
            Value::String(value) => value.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Optional(inner) => inner.is_none(),
            Value::Pointer(inner) => inner.is_zero(),
            Value::Struct(record) => record.fields.values().all(Value::is_zero),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            Value::UInt(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

impl_value_from!(
    bool => Bool as bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    f32 => Float as f64,
    f64 => Float as f64,
    char => Char as char,
    String => String as String,
    &str => String as String,
);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// A struct captured as a value: its type name and the visible fields keyed
/// by output name, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub type_name: &'static str,
    pub fields: IndexMap<&'static str, Value>,
}

impl Record {
    pub fn capture(structure: &dyn Structure) -> Self {
        let fields = FieldList::from_structure(structure)
            .iter()
            .map(|(desc, field)| {
                let value = match field {
                    FieldRef::Nested(nested) => Value::Struct(Record::capture(nested)),
                    FieldRef::Leaf(value) => value,
                };
                (desc.output_name(), value)
            })
            .collect();

        Self {
            type_name: structure.type_name(),
            fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    use super::{Record, Value};

    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Value::Unit => serializer.serialize_unit(),
                Value::Bool(value) => serializer.serialize_bool(*value),
                Value::Int(value) => serializer.serialize_i64(*value),
                Value::UInt(value) => serializer.serialize_u64(*value),
                Value::Float(value) => serializer.serialize_f64(*value),
                Value::Char(value) => serializer.serialize_char(*value),
                Value::String(value) => serializer.serialize_str(value),
                Value::List(items) => {
                    let mut seq = serializer.serialize_seq(Some(items.len()))?;
                    for item in items {
                        seq.serialize_element(item)?;
                    }
                    seq.end()
                }
                Value::Map(entries) => {
                    let mut map = serializer.serialize_map(Some(entries.len()))?;
                    for (key, value) in entries {
                        map.serialize_entry(key, value)?;
                    }
                    map.end()
                }
                Value::Optional(None) => serializer.serialize_none(),
                Value::Optional(Some(inner)) => serializer.serialize_some(&**inner),
                Value::Pointer(inner) => inner.serialize(serializer),
                Value::Struct(record) => record.serialize(serializer),
            }
        }
    }

    impl Serialize for Record {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.fields.len()))?;
            for (key, value) in &self.fields {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }
}
