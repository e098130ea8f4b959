//! Field resolution shared by every operation.
//!
//! [`FieldList`] takes a value, checks that it is a struct (after at most one
//! dereference), and keeps the fields that are exported and not tagged `-`,
//! in declaration order. Nothing is cached: the list is rebuilt on every call.

use crate::{
    Error, FieldDesc, FieldRef, Reflect, Structure,
    reflect::{Kind, deref_kind},
};

/// The visible fields of one struct value.
pub struct FieldList<'a> {
    structure: &'a dyn Structure,
    visible: Vec<(usize, &'static FieldDesc)>,
}

impl<'a> FieldList<'a> {
    /// Resolve `value`, dereferencing one level of indirection if needed.
    pub fn resolve<T: Reflect + ?Sized>(value: &'a T) -> Result<Self, Error> {
        match value.deref_structure() {
            Some(structure) => Ok(Self::from_structure(structure)),
            None => Err(contract_violation::<T>()),
        }
    }

    pub fn from_structure(structure: &'a dyn Structure) -> Self {
        let visible = structure
            .field_descs()
            .iter()
            .enumerate()
            .filter(|(_, desc)| {
                if !desc.exported {
                    tracing::trace!(
                        type_name = structure.type_name(),
                        field = desc.name,
                        "skipping unexported field"
                    );
                } else if !desc.is_visible() {
                    tracing::trace!(
                        type_name = structure.type_name(),
                        field = desc.name,
                        "skipping excluded field"
                    );
                }
                desc.is_visible()
            })
            .collect();

        Self { structure, visible }
    }

    pub fn type_name(&self) -> &'static str {
        self.structure.type_name()
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Descriptors of the visible fields.
    pub fn descs(&self) -> impl Iterator<Item = &'static FieldDesc> + '_ {
        self.visible.iter().map(|(_, desc)| *desc)
    }

    /// Visible fields with their current values.
    ///
    /// Values are read lazily, one field per step, so a caller that stops
    /// early never reads the remaining fields.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldDesc, FieldRef<'a>)> + '_ {
        let structure = self.structure;
        self.visible.iter().filter_map(move |&(index, desc)| {
            let Some(field) = structure.field(index) else {
                tracing::warn!(
                    type_name = structure.type_name(),
                    field = desc.name,
                    "visible field has no accessor"
                );
                debug_assert!(
                    false,
                    "`{}::{}` is visible but `Structure::field` returned None",
                    structure.type_name(),
                    desc.name
                );
                return None;
            };
            Some((desc, field))
        })
    }
}

impl std::fmt::Debug for FieldList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldList")
            .field("type_name", &self.type_name())
            .field("fields", &self.descs().map(|desc| desc.name).collect::<Vec<_>>())
            .finish()
    }
}

fn contract_violation<T: Reflect + ?Sized>() -> Error {
    match deref_kind::<T>() {
        Kind::Struct(type_name) => Error::NilPointer { type_name },
        kind => Error::NotStruct { kind },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldTag, Value};

    #[allow(dead_code)]
    struct Account {
        id: u64,
        owner: String,
        secret: String,
        internal: bool,
    }

    impl Structure for Account {
        fn type_name(&self) -> &'static str {
            "Account"
        }

        fn field_descs(&self) -> &'static [FieldDesc] {
            const FIELDS: &[FieldDesc] = &[
                FieldDesc::new("id", "u64"),
                FieldDesc::new("owner", "String").with_tag(FieldTag::Rename("Owner")),
                FieldDesc::new("secret", "String").with_tag(FieldTag::Exclude),
                FieldDesc::new("internal", "bool").private(),
            ];
            FIELDS
        }

        fn field(&self, index: usize) -> Option<FieldRef<'_>> {
            match index {
                0 => Some(FieldRef::of(&self.id)),
                1 => Some(FieldRef::of(&self.owner)),
                _ => None,
            }
        }
    }

    impl Reflect for Account {
        const KIND: Kind = Kind::Struct("Account");

        fn reflect(&self) -> Value {
            Value::Struct(crate::Record::capture(self))
        }

        fn as_structure(&self) -> Option<&dyn Structure> {
            Some(self)
        }
    }

    fn account() -> Account {
        Account {
            id: 7,
            owner: "ann".to_string(),
            secret: "hunter2".to_string(),
            internal: true,
        }
    }

    #[test]
    fn test_resolve_keeps_visible_fields_in_order() {
        let account = account();
        let fields = FieldList::resolve(&account).expect("struct");
        let names: Vec<_> = fields.descs().map(|desc| desc.name).collect();
        assert_eq!(names, vec!["id", "owner"]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.type_name(), "Account");
    }

    #[test]
    fn test_resolve_dereferences_once() {
        let boxed = Box::new(account());
        assert!(FieldList::resolve(&boxed).is_ok());

        let optional = Some(account());
        assert!(FieldList::resolve(&optional).is_ok());

        let double = Box::new(Box::new(account()));
        assert_eq!(
            FieldList::resolve(&double).unwrap_err(),
            Error::NotStruct {
                kind: Kind::Pointer
            }
        );
    }

    #[test]
    fn test_resolve_rejects_non_structs() {
        assert_eq!(
            FieldList::resolve(&42_i32).unwrap_err(),
            Error::NotStruct { kind: Kind::Int }
        );
        assert_eq!(
            FieldList::resolve("text").unwrap_err(),
            Error::NotStruct { kind: Kind::String }
        );
        assert_eq!(
            FieldList::resolve(&None::<Account>).unwrap_err(),
            Error::NilPointer {
                type_name: "Account"
            }
        );
    }

    #[test]
    fn test_iter_reads_values() {
        let account = account();
        let fields = FieldList::resolve(&account).expect("struct");
        let values: Vec<_> = fields
            .iter()
            .map(|(desc, field)| match field {
                FieldRef::Leaf(value) => (desc.output_name(), value),
                FieldRef::Nested(_) => panic!("no nested fields here"),
            })
            .collect();
        assert_eq!(
            values,
            vec![("id", Value::UInt(7)), ("Owner", Value::from("ann"))]
        );
    }

    struct MissingAccessor;

    impl Structure for MissingAccessor {
        fn field_descs(&self) -> &'static [FieldDesc] {
            const FIELDS: &[FieldDesc] = &[FieldDesc::new("id", "u64")];
            FIELDS
        }

        fn field(&self, _index: usize) -> Option<FieldRef<'_>> {
            None
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "`::id` is visible but `Structure::field` returned None")]
    fn test_missing_accessor_fails_in_debug_builds() {
        let fields = FieldList::from_structure(&MissingAccessor);
        let _ = fields.iter().count();
    }
}
