//! # Intersections
//!
//! `A & B & …`: the conjunction of its members.
//!
//! - `errors` concatenates every member's errors in member order.
//! - `get_property` scans members in reverse, so a later member's property
//!   overrides an earlier one of the same key (structural "extends").
//! - `has_property` is true if any member declares the key.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, PropertyKey, Value};

use crate::compare::{compare_types, TypeRelation};
use crate::types::{ObjectTypeProperty, Type};
use crate::validation::{ErrorIter, Validation};

#[derive(Debug, Clone)]
pub struct IntersectionType {
    types: Vec<Type>,
}

impl IntersectionType {
    pub fn new(types: impl IntoIterator<Item = Type>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        let this = Arc::clone(self);
        Box::new(
            (0..this.types.len())
                .flat_map(move |i| this.types[i].errors(ctx, path.clone(), input.clone())),
        )
    }

    pub fn accepts(&self, ctx: &Validation, input: &Value) -> bool {
        self.types.iter().all(|t| t.accepts_with(ctx, input))
    }

    /// Last-declared member wins on key collision.
    pub fn get_property(&self, key: &PropertyKey) -> Option<Arc<ObjectTypeProperty>> {
        self.types.iter().rev().find_map(|t| t.get_property(key))
    }

    pub fn has_property(&self, key: &PropertyKey) -> bool {
        self.types.iter().any(|t| t.has_property(key))
    }

    /// Merged instance keys of the object-shaped members, first occurrence
    /// order. `None` if no member is object-shaped.
    pub fn property_keys(&self) -> Option<Vec<PropertyKey>> {
        let mut merged: Option<Vec<PropertyKey>> = None;
        for keys in self.types.iter().filter_map(Type::property_keys) {
            let merged = merged.get_or_insert_with(Vec::new);
            for key in keys {
                if !merged.contains(&key) {
                    merged.push(key);
                }
            }
        }
        merged
    }

    /// Against another intersection, every member here must match some
    /// member there; equivalent only if every member matched exactly.
    /// Against anything else, every member must accept it.
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        let mut identical = 0;
        if let Type::Intersection(other) = other {
            'members: for ty in &self.types {
                for candidate in &other.types {
                    match compare_types(ty, candidate) {
                        TypeRelation::Equivalent => {
                            identical += 1;
                            continue 'members;
                        }
                        TypeRelation::Subsumes => continue 'members,
                        TypeRelation::Incompatible => {}
                    }
                }
                return TypeRelation::Incompatible;
            }
        } else {
            for ty in &self.types {
                match compare_types(ty, other) {
                    TypeRelation::Incompatible => return TypeRelation::Incompatible,
                    TypeRelation::Equivalent => identical += 1,
                    TypeRelation::Subsumes => {}
                }
            }
        }
        if identical == self.types.len() {
            TypeRelation::Equivalent
        } else {
            TypeRelation::Subsumes
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let types: Vec<_> = self.types.iter().map(Type::to_json).collect();
        serde_json::json!({ "typeName": "IntersectionType", "types": types })
    }
}

impl fmt::Display for IntersectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                f.write_str(" & ")?;
            }
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}
