//! # Error Codes & Message Catalog
//!
//! Every structural mismatch is identified by an [`ErrorCode`], an invariant
//! identifier distinct from its rendered text. The text comes from a
//! [`MessageCatalog`], an opaque code-to-template lookup.
//!
//! Templates interpolate positional parameters written `$0`, `$1`, …
//! (typically the offending descriptor's syntax text).
//!
//! ## Configuration
//!
//! [`TemplateCatalog`] overrides templates from a YAML or JSON document:
//!
//! ```yaml
//! ERR_EXPECT_STRING: "should be text"
//! ERR_EXPECT_EXACT_VALUE: "should equal $0"
//! ```
//!
//! Codes missing from the document fall back to [`DefaultCatalog`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of structural error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "ERR_EXPECT_ARRAY")]
    ExpectArray,
    #[serde(rename = "ERR_EXPECT_ARITY")]
    ExpectArity,
    #[serde(rename = "ERR_EXPECT_BOOLEAN")]
    ExpectBoolean,
    #[serde(rename = "ERR_EXPECT_EXACT_VALUE")]
    ExpectExactValue,
    #[serde(rename = "ERR_EXPECT_FALSE")]
    ExpectFalse,
    #[serde(rename = "ERR_EXPECT_FUNCTION")]
    ExpectFunction,
    #[serde(rename = "ERR_EXPECT_NULL")]
    ExpectNull,
    #[serde(rename = "ERR_EXPECT_NUMBER")]
    ExpectNumber,
    #[serde(rename = "ERR_EXPECT_OBJECT")]
    ExpectObject,
    #[serde(rename = "ERR_EXPECT_STRING")]
    ExpectString,
    #[serde(rename = "ERR_EXPECT_SYMBOL")]
    ExpectSymbol,
    #[serde(rename = "ERR_EXPECT_TRUE")]
    ExpectTrue,
    #[serde(rename = "ERR_EXPECT_VOID")]
    ExpectVoid,
    #[serde(rename = "ERR_MISSING_PROPERTY")]
    MissingProperty,
    #[serde(rename = "ERR_NO_UNION")]
    NoUnion,
    #[serde(rename = "ERR_UNKNOWN_KEY")]
    UnknownKey,
    #[serde(rename = "ERR_UNRESOLVED_TYPE")]
    UnresolvedType,
    /// Free-form violation reported by a user constraint.
    #[serde(rename = "ERR_CONSTRAINT_VIOLATION")]
    ConstraintViolation,
}

impl ErrorCode {
    /// The stable identifier, e.g. `ERR_EXPECT_STRING`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpectArray => "ERR_EXPECT_ARRAY",
            Self::ExpectArity => "ERR_EXPECT_ARITY",
            Self::ExpectBoolean => "ERR_EXPECT_BOOLEAN",
            Self::ExpectExactValue => "ERR_EXPECT_EXACT_VALUE",
            Self::ExpectFalse => "ERR_EXPECT_FALSE",
            Self::ExpectFunction => "ERR_EXPECT_FUNCTION",
            Self::ExpectNull => "ERR_EXPECT_NULL",
            Self::ExpectNumber => "ERR_EXPECT_NUMBER",
            Self::ExpectObject => "ERR_EXPECT_OBJECT",
            Self::ExpectString => "ERR_EXPECT_STRING",
            Self::ExpectSymbol => "ERR_EXPECT_SYMBOL",
            Self::ExpectTrue => "ERR_EXPECT_TRUE",
            Self::ExpectVoid => "ERR_EXPECT_VOID",
            Self::MissingProperty => "ERR_MISSING_PROPERTY",
            Self::NoUnion => "ERR_NO_UNION",
            Self::UnknownKey => "ERR_UNKNOWN_KEY",
            Self::UnresolvedType => "ERR_UNRESOLVED_TYPE",
            Self::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
        }
    }

    /// Built-in template for this code.
    pub fn default_template(&self) -> &'static str {
        match self {
            Self::ExpectArray => "must be an Array",
            Self::ExpectArity => "must not accept more than $0 argument(s)",
            Self::ExpectBoolean => "must be true or false",
            Self::ExpectExactValue => "must be exactly $0",
            Self::ExpectFalse => "must be false",
            Self::ExpectFunction => "must be a function",
            Self::ExpectNull => "must be null",
            Self::ExpectNumber => "must be a number",
            Self::ExpectObject => "must be an object",
            Self::ExpectString => "must be a string",
            Self::ExpectSymbol => "must be a symbol",
            Self::ExpectTrue => "must be true",
            Self::ExpectVoid => "must be undefined",
            Self::MissingProperty => "does not exist on object",
            Self::NoUnion => "must be one of: $0",
            Self::UnknownKey => "should not contain the key: $0",
            Self::UnresolvedType => "refers to a type that is no longer available: $0",
            Self::ConstraintViolation => "$0",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup from error code to message template.
pub trait MessageCatalog: Send + Sync + fmt::Debug {
    /// Template for `code`. May contain `$0`, `$1`, … placeholders.
    fn template(&self, code: ErrorCode) -> &str;

    /// Render the message for `code` with positional parameters.
    fn message(&self, code: ErrorCode, params: &[&str]) -> String {
        interpolate(self.template(code), params)
    }
}

/// The built-in English templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

impl MessageCatalog for DefaultCatalog {
    fn template(&self, code: ErrorCode) -> &str {
        code.default_template()
    }
}

/// Templates loaded from configuration, falling back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    overrides: HashMap<ErrorCode, String>,
}

impl TemplateCatalog {
    /// Parse a YAML (or JSON, which is valid YAML) template document.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the document is not a mapping from
    /// known `ERR_*` codes to strings.
    pub fn from_yaml_str(document: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(document)
    }

    /// Override one template.
    pub fn with_template(mut self, code: ErrorCode, template: impl Into<String>) -> Self {
        self.overrides.insert(code, template.into());
        self
    }
}

impl MessageCatalog for TemplateCatalog {
    fn template(&self, code: ErrorCode) -> &str {
        self.overrides
            .get(&code)
            .map(String::as_str)
            .unwrap_or_else(|| code.default_template())
    }
}

/// Replace `$N` placeholders with `params[N]`. Unknown indices render empty.
pub fn interpolate(template: &str, params: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let start = i + 1;
        let mut end = start;
        while let Some(&(j, d)) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            end = j + d.len_utf8();
            chars.next();
        }
        if end == start {
            out.push('$');
            continue;
        }
        if let Some(param) = template[start..end]
            .parse::<usize>()
            .ok()
            .and_then(|n| params.get(n))
        {
            out.push_str(param);
        }
    }
    out
}
