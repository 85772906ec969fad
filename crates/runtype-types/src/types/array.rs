//! `Array<T>`: arrays whose every element matches `T`.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, PathSegment, Value};

use crate::compare::{compare_types, TypeRelation};
use crate::messages::ErrorCode;
use crate::types::{Type, TypeIdentity};
use crate::validation::{cycle_scoped, one_error, ErrorIter, Validation};

#[derive(Debug, Clone)]
pub struct ArrayType {
    element: Type,
}

impl ArrayType {
    pub fn new(element: Type) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Type {
        &self.element
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        let this = Type::Array(Arc::clone(self));
        let Value::Array(array) = &input else {
            return one_error(ctx.error(path, &this, ErrorCode::ExpectArray, &[]));
        };
        let items = array.items();
        let element = self.element.clone();
        cycle_scoped(ctx, &this, &input, move || -> ErrorIter<'a> {
            Box::new(items.into_iter().enumerate().flat_map(move |(i, item)| {
                let mut path = path.clone();
                path.push(PathSegment::from(i));
                element.errors(ctx, path, item)
            }))
        })
    }

    pub fn accepts(&self, ctx: &Validation, input: &Value) -> bool {
        let Value::Array(array) = input else {
            return false;
        };
        let Some(_guard) = ctx.enter_cycle(TypeIdentity::of(self), input) else {
            return true;
        };
        array.items().iter().all(|item| self.element.accepts_with(ctx, item))
    }

    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::Array(other) => compare_types(&self.element, &other.element),
            _ => TypeRelation::Incompatible,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "typeName": "ArrayType", "elementType": self.element.to_json() })
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array<{}>", self.element)
    }
}
