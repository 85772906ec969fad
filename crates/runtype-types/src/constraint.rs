//! # Constraints
//!
//! A [`Constraint`] is a named refinement predicate over a value. It returns
//! `None` when the value satisfies it, or `Some(message)` describing the
//! violation.
//!
//! Constraints run only after structural validation of the same value
//! succeeded. Within one descriptor they are evaluated in declaration order
//! and independently: one failing constraint does not suppress the others.
//!
//! [`ConstraintRegistry`] maps names back to predicates so the descriptor
//! codec can reattach constraints when rebuilding a graph from JSON.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, Value};

use crate::messages::ErrorCode;
use crate::types::Type;
use crate::validation::{ErrorIter, ErrorTuple, Validation};

type Predicate = dyn Fn(&Value) -> Option<String> + Send + Sync;

/// Named refinement predicate.
#[derive(Clone)]
pub struct Constraint {
    name: String,
    check: Arc<Predicate>,
}

impl Constraint {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The violation message, or `None` if `input` satisfies the constraint.
    pub fn check(&self, input: &Value) -> Option<String> {
        (self.check)(input)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Short-circuiting check: every constraint accepts `input`.
pub fn constraints_accept(constraints: &[Constraint], input: &Value) -> bool {
    constraints.iter().all(|c| c.check(input).is_none())
}

/// Every constraint violation for `input`, in declaration order.
///
/// Messages pass through the catalog's `ERR_CONSTRAINT_VIOLATION` template.
pub fn collect_constraint_errors<'a>(
    ctx: &'a Validation,
    constraints: Arc<[Constraint]>,
    expected: Type,
    path: IdentifierPath,
    input: Value,
) -> ErrorIter<'a> {
    let mut next = 0;
    Box::new(std::iter::from_fn(move || {
        while let Some(constraint) = constraints.get(next) {
            next += 1;
            if let Some(violation) = constraint.check(&input) {
                let message = ctx.message(ErrorCode::ConstraintViolation, &[&violation]);
                return Some(ErrorTuple::new(
                    path.clone(),
                    message,
                    expected.clone(),
                    ErrorCode::ConstraintViolation,
                ));
            }
        }
        None
    }))
}

/// Name → constraint lookup for the descriptor codec.
#[derive(Debug, Clone, Default)]
pub struct ConstraintRegistry {
    constraints: HashMap<String, Constraint>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constraint` under its own name, replacing any previous one.
    pub fn register(&mut self, constraint: Constraint) -> &mut Self {
        self.constraints.insert(constraint.name.clone(), constraint);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Constraint> {
        self.constraints.get(name)
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl FromIterator<Constraint> for ConstraintRegistry {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        let mut registry = Self::new();
        for constraint in iter {
            registry.register(constraint);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtype_core::path;

    fn positive() -> Constraint {
        Constraint::new("positive", |v| match v.as_f64() {
            Some(n) if n > 0.0 => None,
            _ => Some("must be positive".to_string()),
        })
    }

    fn even() -> Constraint {
        Constraint::new("even", |v| match v.as_f64() {
            Some(n) if n % 2.0 == 0.0 => None,
            _ => Some("must be even".to_string()),
        })
    }

    #[test]
    fn test_constraints_are_independent() {
        let ctx = Validation::new(Value::Null);
        let constraints: Arc<[Constraint]> = Arc::from(vec![positive(), even()]);
        let errors: Vec<_> = collect_constraint_errors(
            &ctx,
            constraints,
            Type::number(),
            path!["n"],
            Value::from(-3),
        )
        .collect();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["must be positive", "must be even"]);
        assert!(errors.iter().all(|e| e.code == ErrorCode::ConstraintViolation));
        assert!(errors.iter().all(|e| e.path == path!["n"]));
    }

    #[test]
    fn test_constraints_accept_short_circuits() {
        assert!(constraints_accept(&[positive(), even()], &Value::from(4)));
        assert!(!constraints_accept(&[positive(), even()], &Value::from(3)));
        assert!(constraints_accept(&[], &Value::Null));
    }

    #[test]
    fn test_registry_lookup() {
        let registry: ConstraintRegistry = [positive(), even()].into_iter().collect();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("even").map(Constraint::name), Some("even"));
        assert!(registry.get("odd").is_none());
    }
}
