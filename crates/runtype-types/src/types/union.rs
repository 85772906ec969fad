//! `A | B | …`: accepts anything one member accepts.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, Value};

use crate::compare::{compare_types, TypeRelation};
use crate::messages::ErrorCode;
use crate::types::Type;
use crate::validation::{deferred, no_errors, one_error, ErrorIter, Validation};

#[derive(Debug, Clone)]
pub struct UnionType {
    types: Vec<Type>,
}

impl UnionType {
    pub fn new(types: impl IntoIterator<Item = Type>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// One `ERR_NO_UNION` at `path` if no member accepts `input`.
    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        let this = Arc::clone(self);
        deferred(move || {
            if this.accepts(ctx, &input) {
                return no_errors();
            }
            let syntax = this.to_string();
            one_error(ctx.error(path, &Type::Union(this), ErrorCode::NoUnion, &[&syntax]))
        })
    }

    pub fn accepts(&self, ctx: &Validation, input: &Value) -> bool {
        self.types.iter().any(|t| t.accepts_with(ctx, input))
    }

    /// Against another union, every member there must be covered by some
    /// member here; equivalent when each side's members all have an
    /// equivalent on the other side.
    /// Against anything else, subsumes if some member does.
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        let Type::Union(other) = other else {
            let covered = self
                .types
                .iter()
                .any(|t| compare_types(t, other) != TypeRelation::Incompatible);
            return if covered {
                TypeRelation::Subsumes
            } else {
                TypeRelation::Incompatible
            };
        };
        let mut identical = 0;
        'candidates: for candidate in &other.types {
            let mut covered = false;
            for ty in &self.types {
                match compare_types(ty, candidate) {
                    TypeRelation::Equivalent => {
                        identical += 1;
                        continue 'candidates;
                    }
                    TypeRelation::Subsumes => covered = true,
                    TypeRelation::Incompatible => {}
                }
            }
            if !covered {
                return TypeRelation::Incompatible;
            }
        }
        let mirrored = self.types.iter().all(|ty| {
            other
                .types
                .iter()
                .any(|candidate| compare_types(ty, candidate) == TypeRelation::Equivalent)
        });
        if identical == other.types.len() && mirrored {
            TypeRelation::Equivalent
        } else {
            TypeRelation::Subsumes
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let types: Vec<_> = self.types.iter().map(Type::to_json).collect();
        serde_json::json!({ "typeName": "UnionType", "types": types })
    }
}

impl fmt::Display for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}
