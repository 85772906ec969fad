//! # Error Reporting
//!
//! Turns the error tuples of a [`Validation`] into user-visible output:
//!
//! - [`make_type_error`] — the aggregate [`RuntimeTypeError`] raised by
//!   `assert`;
//! - [`make_warning_message`] — the text `warn` emits;
//! - [`make_json_error`] — a transport-suitable JSON array;
//! - [`type_of`] — a short description of a value's runtime shape.
//!
//! Every entry names the offending location (`field`), the catalog message,
//! the expected descriptor's syntax, and the actual value found at that
//! location. Entries keep traversal order.

use serde::Serialize;

use runtype_core::{stringify_path, IdentifierPath, PropertyKey, Value, ValueId};

use crate::error::RuntimeTypeError;
use crate::messages::ErrorCode;
use crate::validation::{ErrorTuple, Validation};

/// One rendered error, as it appears in [`make_json_error`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// Full path: the context's root path followed by the error path.
    pub path: IdentifierPath,
    /// `path` rendered for humans.
    pub field: String,
    pub message: String,
    pub code: ErrorCode,
    /// Syntax text of the descriptor that reported the error.
    pub expected: String,
    /// [`type_of`] the value found at the error path.
    pub actual: String,
}

fn full_path(ctx: &Validation, error: &ErrorTuple) -> IdentifierPath {
    ctx.path.iter().chain(error.path.iter()).cloned().collect()
}

/// Rendered entries for every error in `ctx`.
pub fn report_entries(ctx: &Validation) -> Vec<ReportEntry> {
    ctx.errors
        .iter()
        .map(|error| {
            let path = full_path(ctx, error);
            ReportEntry {
                field: stringify_path(&path),
                path,
                message: error.message.clone(),
                code: error.code,
                expected: error.expected.to_string(),
                actual: type_of(&ctx.resolve_path(&error.path)),
            }
        })
        .collect()
}

fn with_prefix(prefix: &str, body: String) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        body
    } else {
        format!("{prefix} {body}")
    }
}

/// The aggregate error for `ctx`, or `None` if it holds no errors.
pub fn make_type_error(ctx: &Validation) -> Option<RuntimeTypeError> {
    if !ctx.has_errors() {
        return None;
    }
    let body = ctx
        .errors
        .iter()
        .map(|error| {
            let field = stringify_path(&full_path(ctx, error));
            let actual = ctx.resolve_path(&error.path);
            let actual_type = type_of(&actual);
            match actual.to_json_pretty() {
                Ok(json) => format!(
                    "{field} {}\n\nExpected: {}\n\nActual Value: {json}\n\nActual Type: {actual_type}\n",
                    error.message, error.expected
                ),
                Err(_) => format!(
                    "{field} {}\n\nExpected: {}\n\nActual: {actual_type}\n",
                    error.message, error.expected
                ),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(RuntimeTypeError::new(
        with_prefix(&ctx.prefix, body),
        ctx.errors.clone(),
    ))
}

/// The warning text for `ctx`, or `None` if it holds no errors.
pub fn make_warning_message(ctx: &Validation) -> Option<String> {
    if !ctx.has_errors() {
        return None;
    }
    let body = ctx
        .errors
        .iter()
        .map(|error| {
            let field = stringify_path(&full_path(ctx, error));
            let actual_type = type_of(&ctx.resolve_path(&error.path));
            format!(
                "{field} {}\n\nExpected: {}\n\nActual: {actual_type}\n",
                error.message, error.expected
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(with_prefix(&ctx.prefix, body))
}

/// JSON array of [`ReportEntry`] objects; empty when `ctx` is valid.
pub fn make_json_error(ctx: &Validation) -> serde_json::Value {
    serde_json::json!(report_entries(ctx))
}

/// Short description of a value's runtime shape.
///
/// Primitives give their kind, class instances their constructor name,
/// arrays and maps `Array` / `Map`, and plain objects a listing of their
/// keys with the type of each value.
pub fn type_of(value: &Value) -> String {
    let mut ancestors = Vec::new();
    type_of_inner(value, &mut ancestors)
}

fn type_of_inner(value: &Value, ancestors: &mut Vec<ValueId>) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) => "Array".to_string(),
        Value::Map(_) => "Map".to_string(),
        Value::Object(object) => {
            if let Some(constructor) = object.constructor() {
                return constructor.name();
            }
            if ancestors.contains(&object.id()) {
                return "[Circular]".to_string();
            }
            ancestors.push(object.id());
            let fields: Vec<String> = object
                .entries()
                .iter()
                .map(|(key, item)| format!("  {}: {}", key_to_string(key), type_of_inner(item, ancestors)))
                .collect();
            ancestors.pop();
            format!("{{\n{}\n}}", fields.join(",\n"))
        }
        other => other.kind().to_string(),
    }
}

fn is_simple_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn key_to_string(key: &PropertyKey) -> String {
    match key {
        PropertyKey::Symbol(symbol) => format!("[{symbol}]"),
        PropertyKey::Index(i) => i.to_string(),
        PropertyKey::String(s) if is_simple_identifier(s) => s.clone(),
        PropertyKey::String(s) => serde_json::Value::String(s.clone()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;
    use runtype_core::{path, FunctionRef, ObjectRef, Symbol};

    fn failed(ty: &Type, input: Value) -> Validation {
        ty.validate(&input)
    }

    #[test]
    fn test_type_of_primitives_and_instances() {
        assert_eq!(type_of(&Value::Undefined), "undefined");
        assert_eq!(type_of(&Value::Null), "null");
        assert_eq!(type_of(&Value::from(1)), "number");
        assert_eq!(type_of(&Value::function("f", 0)), "function");
        assert_eq!(type_of(&Value::from(Symbol::new("s"))), "symbol");
        assert_eq!(type_of(&Value::array([])), "Array");
        assert_eq!(type_of(&Value::map([])), "Map");
        let class = FunctionRef::new("Point", 2);
        assert_eq!(type_of(&Value::instance(&class, [("x", 1)])), "Point");
    }

    #[test]
    fn test_type_of_plain_object_lists_keys() {
        let v = Value::object([("a", Value::from(1)), ("the key", Value::from("x"))]);
        assert_eq!(type_of(&v), "{\n  a: number,\n  \"the key\": string\n}");
    }

    #[test]
    fn test_type_of_cyclic_object() {
        let object = ObjectRef::new();
        object.set("me", object.clone());
        assert_eq!(type_of(&Value::Object(object)), "{\n  me: [Circular]\n}");
    }

    #[test]
    fn test_type_error_renders_every_entry() {
        let ty = Type::object([
            crate::types::ObjectTypeProperty::new("a", Type::number()),
            crate::types::ObjectTypeProperty::new("b", Type::string()),
        ]);
        let ctx = failed(&ty, Value::object([("a", Value::from("x")), ("b", Value::from(2))]));
        let error = make_type_error(&ctx).expect("errors present");
        assert_eq!(
            error.message(),
            "a must be a number\n\nExpected: number\n\nActual Value: \"x\"\n\nActual Type: string\n\
             \nb must be a string\n\nExpected: string\n\nActual Value: 2\n\nActual Type: number\n"
        );
        assert_eq!(error.errors().len(), 2);
    }

    #[test]
    fn test_type_error_without_json_value() {
        let ctx = failed(&Type::number(), Value::Undefined);
        let error = make_type_error(&ctx).expect("errors present");
        assert_eq!(
            error.to_string(),
            "Value must be a number\n\nExpected: number\n\nActual: undefined\n"
        );
    }

    #[test]
    fn test_prefix_is_trimmed_and_prepended() {
        let mut ctx = failed(&Type::string(), Value::from(1));
        ctx.prefix = "  config:  ".to_string();
        let message = make_warning_message(&ctx).expect("errors present");
        assert_eq!(message, "config: Value must be a string\n\nExpected: string\n\nActual: number\n");
    }

    #[test]
    fn test_root_path_prefixes_field() {
        let mut ctx = failed(&Type::string(), Value::from(1));
        ctx.path = path!["settings"];
        let entries = report_entries(&ctx);
        assert_eq!(entries[0].field, "settings");
    }

    #[test]
    fn test_json_error_shape() {
        let ty = Type::object([crate::types::ObjectTypeProperty::new("a", Type::number())]);
        let ctx = failed(&ty, Value::object([("a", "x")]));
        assert_eq!(
            make_json_error(&ctx),
            serde_json::json!([{
                "path": ["a"],
                "field": "a",
                "message": "must be a number",
                "code": "ERR_EXPECT_NUMBER",
                "expected": "number",
                "actual": "string",
            }])
        );
        assert_eq!(ctx.to_json(), make_json_error(&ctx));
    }

    #[test]
    fn test_valid_context_reports_nothing() {
        let ctx = failed(&Type::string(), Value::from("ok"));
        assert!(make_type_error(&ctx).is_none());
        assert!(make_warning_message(&ctx).is_none());
        assert_eq!(make_json_error(&ctx), serde_json::json!([]));
    }
}
