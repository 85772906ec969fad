//! Primitive descriptors: `any`, `void`, `null`, `boolean`, `number`,
//! `string` and `Symbol`.
//!
//! Each general primitive subsumes its literal counterpart in the
//! subtype order.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, Value};

use crate::compare::TypeRelation;
use crate::messages::ErrorCode;
use crate::types::Type;
use crate::validation::{no_errors, one_error, ErrorIter, Validation};

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyType;

impl AnyType {
    pub fn accepts(&self, _input: &Value) -> bool {
        true
    }

    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::Any(_) => TypeRelation::Equivalent,
            _ => TypeRelation::Subsumes,
        }
    }
}

impl fmt::Display for AnyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any")
    }
}

/// Declares a unit-struct primitive that accepts one value kind.
macro_rules! primitive_type {
    (
        $(#[$meta:meta])*
        $name:ident, $arm:ident, $syntax:literal, $code:ident, |$input:ident| $check:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            pub fn errors<'a>(
                self: &Arc<Self>,
                ctx: &'a Validation,
                path: IdentifierPath,
                input: Value,
            ) -> ErrorIter<'a> {
                if self.accepts(&input) {
                    return no_errors();
                }
                let expected = Type::$arm(Arc::clone(self));
                one_error(ctx.error(path, &expected, ErrorCode::$code, &[]))
            }

            pub fn accepts(&self, $input: &Value) -> bool {
                $check
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str($syntax)
            }
        }
    };
}

primitive_type!(
    /// Accepts only `undefined`.
    VoidType, Void, "void", ExpectVoid, |input| input.is_undefined()
);

primitive_type!(
    /// Accepts only `null`.
    NullLiteralType, Null, "null", ExpectNull, |input| input.is_null()
);

primitive_type!(BooleanType, Boolean, "boolean", ExpectBoolean, |input| matches!(input, Value::Bool(_)));

primitive_type!(NumberType, Number, "number", ExpectNumber, |input| matches!(input, Value::Number(_)));

primitive_type!(StringType, String, "string", ExpectString, |input| matches!(input, Value::String(_)));

primitive_type!(SymbolType, Symbol, "Symbol", ExpectSymbol, |input| matches!(input, Value::Symbol(_)));

impl VoidType {
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::Void(_) => TypeRelation::Equivalent,
            _ => TypeRelation::Incompatible,
        }
    }
}

impl NullLiteralType {
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::Null(_) => TypeRelation::Equivalent,
            _ => TypeRelation::Incompatible,
        }
    }
}

impl BooleanType {
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::BooleanLiteral(_) => TypeRelation::Subsumes,
            Type::Boolean(_) => TypeRelation::Equivalent,
            _ => TypeRelation::Incompatible,
        }
    }
}

impl NumberType {
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::NumberLiteral(_) => TypeRelation::Subsumes,
            Type::Number(_) => TypeRelation::Equivalent,
            _ => TypeRelation::Incompatible,
        }
    }
}

impl StringType {
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::StringLiteral(_) => TypeRelation::Subsumes,
            Type::String(_) => TypeRelation::Equivalent,
            _ => TypeRelation::Incompatible,
        }
    }
}

impl SymbolType {
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::Symbol(_) => TypeRelation::Equivalent,
            _ => TypeRelation::Incompatible,
        }
    }
}
