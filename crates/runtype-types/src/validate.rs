//! # Entry Points
//!
//! Every top-level check creates a fresh [`Validation`], runs the root
//! descriptor's error producer from an empty path, and hands the context to
//! the reporting pipeline:
//!
//! | Entry point | Drains | Result |
//! |---|---|---|
//! | [`Type::accepts`] | until the first error | `bool` |
//! | [`Type::validate`] | fully | the context, never fails |
//! | [`Type::assert`] | fully | the input, or one aggregate [`RuntimeTypeError`] |
//! | [`Type::warn`] | fully | the input; emits a `tracing` warning on failure |
//!
//! The root path defaults to the descriptor's name (aliases and constrained
//! descriptors) so reports read `Config.port must be a number`.

use std::sync::Arc;

use runtype_core::{IdentifierPath, PathSegment, Value};

use crate::error::RuntimeTypeError;
use crate::messages::{DefaultCatalog, MessageCatalog};
use crate::report::{make_type_error, make_warning_message};
use crate::types::Type;
use crate::validation::Validation;

/// Per-call configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Text prepended to aggregate reports.
    pub prefix: String,
    /// Root path; defaults to the descriptor's name.
    pub path: Option<IdentifierPath>,
    /// Message templates; defaults to [`DefaultCatalog`].
    pub catalog: Option<Arc<dyn MessageCatalog>>,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_path(mut self, path: IdentifierPath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn MessageCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }
}

impl Type {
    /// Collect every error for `input`. Never fails.
    pub fn validate(&self, input: &Value) -> Validation {
        self.validate_with(input, &ValidateOptions::default())
    }

    pub fn validate_with(&self, input: &Value, options: &ValidateOptions) -> Validation {
        let catalog = options
            .catalog
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultCatalog));
        let mut ctx = Validation::with_catalog(input.clone(), catalog);
        ctx.path = match &options.path {
            Some(path) => path.clone(),
            None => self
                .name()
                .map(|name| vec![PathSegment::from(name)])
                .unwrap_or_default(),
        };
        ctx.prefix = options.prefix.clone();
        let errors: Vec<_> = self.errors(&ctx, Vec::new(), input.clone()).collect();
        tracing::trace!(descriptor = self.type_name(), errors = errors.len(), "validated input");
        ctx.errors = errors;
        ctx
    }

    /// Return `input` unchanged if valid, else one error aggregating every
    /// mismatch.
    ///
    /// # Errors
    ///
    /// [`RuntimeTypeError`] if any error was found.
    pub fn assert(&self, input: Value) -> Result<Value, RuntimeTypeError> {
        self.assert_with(input, &ValidateOptions::default())
    }

    /// [`assert`](Self::assert) with per-call options.
    ///
    /// # Errors
    ///
    /// [`RuntimeTypeError`] if any error was found.
    pub fn assert_with(&self, input: Value, options: &ValidateOptions) -> Result<Value, RuntimeTypeError> {
        let ctx = self.validate_with(&input, options);
        match make_type_error(&ctx) {
            Some(error) => Err(error),
            None => Ok(input),
        }
    }

    /// Emit a warning for every mismatch; always returns `input`.
    pub fn warn(&self, input: Value) -> Value {
        self.warn_with(input, &ValidateOptions::default())
    }

    pub fn warn_with(&self, input: Value, options: &ValidateOptions) -> Value {
        let ctx = self.validate_with(&input, options);
        if let Some(message) = make_warning_message(&ctx) {
            tracing::warn!(errors = ctx.errors.len(), "{message}");
        }
        input
    }
}
