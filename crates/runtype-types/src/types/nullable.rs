//! `?T`: `null`, `undefined`, or a `T`.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, Value};

use crate::compare::{compare_types, TypeRelation};
use crate::types::Type;
use crate::validation::{no_errors, ErrorIter, Validation};

#[derive(Debug, Clone)]
pub struct NullableType {
    inner: Type,
}

impl NullableType {
    pub fn new(inner: Type) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Type {
        &self.inner
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        if input.is_nullish() {
            return no_errors();
        }
        self.inner.errors(ctx, path, input)
    }

    pub fn accepts(&self, ctx: &Validation, input: &Value) -> bool {
        input.is_nullish() || self.inner.accepts_with(ctx, input)
    }

    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::Null(_) | Type::Void(_) => TypeRelation::Subsumes,
            Type::Nullable(other) => compare_types(&self.inner, &other.inner),
            other => match compare_types(&self.inner, other) {
                TypeRelation::Incompatible => TypeRelation::Incompatible,
                _ => TypeRelation::Subsumes,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "typeName": "NullableType", "type": self.inner.to_json() })
    }
}

impl fmt::Display for NullableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.inner)
    }
}
