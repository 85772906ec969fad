//! A named descriptor refined by [`Constraint`]s.
//!
//! The inner descriptor validates first; the constraints run only if it
//! produced no errors. A constrained descriptor is equivalent only to
//! itself in the subtype order, since predicates cannot be compared.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, Value};

use crate::constraint::{collect_constraint_errors, constraints_accept, Constraint};
use crate::types::Type;
use crate::validation::{refine_after, ErrorIter, Validation};

#[derive(Debug, Clone)]
pub struct ConstrainedType {
    name: String,
    inner: Type,
    constraints: Arc<[Constraint]>,
}

impl ConstrainedType {
    pub fn new(name: impl Into<String>, inner: Type, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            name: name.into(),
            inner,
            constraints: constraints.into_iter().collect::<Vec<_>>().into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inner(&self) -> &Type {
        &self.inner
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        let structural = self.inner.errors(ctx, path.clone(), input.clone());
        let this = Arc::clone(self);
        refine_after(structural, move || {
            let constraints = Arc::clone(&this.constraints);
            collect_constraint_errors(ctx, constraints, Type::Constrained(this), path, input)
        })
    }

    pub fn accepts(&self, ctx: &Validation, input: &Value) -> bool {
        self.inner.accepts_with(ctx, input) && constraints_accept(&self.constraints, input)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let constraints: Vec<_> = self.constraints.iter().map(Constraint::name).collect();
        serde_json::json!({
            "typeName": "ConstrainedType",
            "name": self.name,
            "type": self.inner.to_json(),
            "constraints": constraints,
        })
    }
}

impl fmt::Display for ConstrainedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
