//! Literal descriptors: exactly one boolean, number or string.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, Value};

use crate::compare::TypeRelation;
use crate::messages::ErrorCode;
use crate::types::Type;
use crate::validation::{no_errors, one_error, ErrorIter, Validation};

/// `true` or `false`, exactly.
#[derive(Debug, Clone, Copy)]
pub struct BooleanLiteralType {
    value: bool,
}

impl BooleanLiteralType {
    pub fn new(value: bool) -> Self {
        Self { value }
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        if self.accepts(&input) {
            return no_errors();
        }
        let code = if self.value {
            ErrorCode::ExpectTrue
        } else {
            ErrorCode::ExpectFalse
        };
        one_error(ctx.error(path, &Type::BooleanLiteral(Arc::clone(self)), code, &[]))
    }

    pub fn accepts(&self, input: &Value) -> bool {
        input.as_bool() == Some(self.value)
    }

    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::BooleanLiteral(o) if o.value == self.value => TypeRelation::Equivalent,
            _ => TypeRelation::Incompatible,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "typeName": "BooleanLiteralType", "value": self.value })
    }
}

impl fmt::Display for BooleanLiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// One number. NaN never matches, not even itself.
#[derive(Debug, Clone, Copy)]
pub struct NumberLiteralType {
    value: f64,
}

impl NumberLiteralType {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        if self.accepts(&input) {
            return no_errors();
        }
        let syntax = self.to_string();
        one_error(ctx.error(
            path,
            &Type::NumberLiteral(Arc::clone(self)),
            ErrorCode::ExpectExactValue,
            &[&syntax],
        ))
    }

    pub fn accepts(&self, input: &Value) -> bool {
        input.as_f64() == Some(self.value)
    }

    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::NumberLiteral(o) if o.value == self.value => TypeRelation::Equivalent,
            _ => TypeRelation::Incompatible,
        }
    }

    /// JSON has no non-finite numbers; those are written as the strings
    /// `"Infinity"`, `"-Infinity"` and `"NaN"`.
    pub fn to_json(&self) -> serde_json::Value {
        let value = if self.value.is_finite() {
            serde_json::json!(self.value)
        } else {
            serde_json::Value::String(self.to_string())
        };
        serde_json::json!({ "typeName": "NumberLiteralType", "value": value })
    }
}

impl fmt::Display for NumberLiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_number(f, self.value)
    }
}

/// Numbers print the way a JavaScript reader writes them.
pub(crate) fn format_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{n}")
    }
}

/// One string, compared by content.
#[derive(Debug, Clone)]
pub struct StringLiteralType {
    value: String,
}

impl StringLiteralType {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        if self.accepts(&input) {
            return no_errors();
        }
        let syntax = self.to_string();
        one_error(ctx.error(
            path,
            &Type::StringLiteral(Arc::clone(self)),
            ErrorCode::ExpectExactValue,
            &[&syntax],
        ))
    }

    pub fn accepts(&self, input: &Value) -> bool {
        input.as_str() == Some(self.value.as_str())
    }

    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::StringLiteral(o) if o.value == self.value => TypeRelation::Equivalent,
            _ => TypeRelation::Incompatible,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "typeName": "StringLiteralType", "value": self.value })
    }
}

impl fmt::Display for StringLiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::Value::String(self.value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_error(ty: &Type, input: Value) -> Option<(ErrorCode, String)> {
        let ctx = Validation::new(input.clone());
        let mut errors = ty.errors(&ctx, Vec::new(), input);
        errors.next().map(|e| (e.code, e.message))
    }

    #[test]
    fn test_string_literal_exact_match() {
        let t = Type::string_literal("foo");
        assert!(t.accepts(&Value::from("foo")));
        assert!(!t.accepts(&Value::from("bar")));
        assert_eq!(
            first_error(&t, Value::from("bar")),
            Some((ErrorCode::ExpectExactValue, "must be exactly \"foo\"".to_string()))
        );
    }

    #[test]
    fn test_boolean_literal_codes() {
        assert_eq!(
            first_error(&Type::boolean_literal(true), Value::from(false)).map(|e| e.0),
            Some(ErrorCode::ExpectTrue)
        );
        assert_eq!(
            first_error(&Type::boolean_literal(false), Value::from(1)).map(|e| e.0),
            Some(ErrorCode::ExpectFalse)
        );
        assert!(Type::boolean_literal(false).accepts(&Value::from(false)));
    }

    #[test]
    fn test_number_literal() {
        let t = Type::number_literal(42.0);
        assert!(t.accepts(&Value::from(42)));
        assert!(!t.accepts(&Value::from("42")));
        assert_eq!(t.to_string(), "42");
        assert_eq!(Type::number_literal(1.5).to_string(), "1.5");
        assert_eq!(Type::number_literal(f64::INFINITY).to_string(), "Infinity");
        assert!(!Type::number_literal(f64::NAN).accepts(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_literal_compare_only_identical() {
        let a = Type::string_literal("a");
        assert_eq!(a.compare_with(&Type::string_literal("a")), TypeRelation::Equivalent);
        assert_eq!(a.compare_with(&Type::string_literal("b")), TypeRelation::Incompatible);
        assert_eq!(a.compare_with(&Type::string()), TypeRelation::Incompatible);
    }

    #[test]
    fn test_string_literal_display_escapes() {
        assert_eq!(Type::string_literal("a\"b").to_string(), "\"a\\\"b\"");
    }

    #[test]
    fn test_literal_to_json() {
        assert_eq!(
            Type::boolean_literal(true).to_json(),
            serde_json::json!({"typeName": "BooleanLiteralType", "value": true})
        );
    }

    #[test]
    fn test_non_finite_number_literal_to_json() {
        assert_eq!(Type::number_literal(f64::INFINITY).to_json()["value"], "Infinity");
        assert_eq!(Type::number_literal(f64::NEG_INFINITY).to_json()["value"], "-Infinity");
        assert_eq!(Type::number_literal(f64::NAN).to_json()["value"], "NaN");
        assert_eq!(Type::number_literal(1.5).to_json()["value"], 1.5);
    }
}
