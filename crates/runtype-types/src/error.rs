//! # Error Types
//!
//! Structural mismatches are not Rust errors: they are [`ErrorTuple`]s
//! collected in a [`Validation`](crate::Validation). Only the boundaries
//! produce `Err` values:
//!
//! - [`RuntimeTypeError`] — `assert` found at least one mismatch. Carries
//!   the aggregate multi-line report and the tuples it was rendered from.
//! - [`DescriptorError`] — a descriptor document could not be decoded, or
//!   a recursive alias could not be built.

use thiserror::Error;

use crate::validation::ErrorTuple;

/// Aggregate failure raised by `assert`.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RuntimeTypeError {
    message: String,
    errors: Vec<ErrorTuple>,
}

impl RuntimeTypeError {
    pub(crate) fn new(message: String, errors: Vec<ErrorTuple>) -> Self {
        Self { message, errors }
    }

    /// The rendered report, one block per error in traversal order.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &[ErrorTuple] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ErrorTuple> {
        self.errors
    }
}

/// Error decoding a descriptor document.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// `typeName` is not a known descriptor kind.
    #[error("unknown descriptor kind: {0}")]
    UnknownTypeName(String),

    /// A required field is absent.
    #[error("{kind} is missing required field `{field}`")]
    MissingField { kind: String, field: &'static str },

    /// A field is present but has the wrong shape.
    #[error("{kind} has invalid field `{field}`: {reason}")]
    InvalidField {
        kind: String,
        field: &'static str,
        reason: String,
    },

    /// A recursive alias reaches itself without an object, array or
    /// function in between, so validating it would never terminate.
    #[error("recursive alias {0} refers to itself outside an object, array or function")]
    UnguardedRecursion(String),

    /// A `TypeReference` names no enclosing alias.
    #[error("reference to unknown alias: {0}")]
    UnresolvedReference(String),

    /// A constraint name is not registered.
    #[error("unknown constraint: {0}")]
    UnknownConstraint(String),

    /// The document is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
