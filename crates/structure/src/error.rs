use thiserror::Error;

use crate::reflect::Kind;

/// Contract violation raised when an operation that needs a struct is handed
/// something else.
///
/// The panicking operations ([`to_map`](crate::to_map) and friends) panic with
/// this error's message; the `try_` forms return it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input is not a struct, even after one level of dereferencing.
    #[error("not a struct: got {kind}")]
    NotStruct { kind: Kind },
    /// The input is a pointer-like value to a struct type, but it is empty.
    #[error("not a struct: nil pointer to `{type_name}`")]
    NilPointer { type_name: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_contract() {
        let err = Error::NotStruct { kind: Kind::Int };
        assert_eq!(err.to_string(), "not a struct: got int");

        let err = Error::NilPointer { type_name: "User" };
        assert_eq!(err.to_string(), "not a struct: nil pointer to `User`");
    }
}
