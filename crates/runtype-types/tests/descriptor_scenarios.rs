//! # Descriptor Scenarios
//!
//! End-to-end checks through the public API: composed descriptors,
//! recursive and cyclic data, aggregate reports, and the warning path.

use std::io;
use std::sync::{Arc, Mutex};

use runtype_core::{path, FunctionRef, ObjectRef, PropertyKey, Value};
use runtype_types::{
    make_json_error, ConstraintRegistry, Constraint, ErrorCode, ObjectTypeProperty, TemplateCatalog,
    Type, TypeAlias, ValidateOptions,
};

/// `type C = A & B` where `A = {a: number}` and `B = {b: string}`.
fn extended_interface() -> Type {
    let a = Type::object([ObjectTypeProperty::new("a", Type::number())]);
    let b = Type::object([ObjectTypeProperty::new("b", Type::string())]);
    Type::alias("C", Type::intersection([a, b]))
}

fn sample(a: Value, b: Value) -> Value {
    Value::object([("a", a), ("b", b)])
}

// ─── Composition ─────────────────────────────────────────────────────

#[test]
fn test_extended_interface_accepts_matching_object() {
    let ty = extended_interface();
    let input = sample(Value::from(123), Value::from("foo bar"));
    assert!(ty.accepts(&input));
    assert!(!ty.validate(&input).has_errors());
    assert!(ty.assert(input).is_ok());
}

#[test]
fn test_extended_interface_reports_one_error_at_b() {
    let ty = extended_interface();
    let ctx = ty.validate(&sample(Value::from(123), Value::from(0)));
    assert_eq!(ctx.errors.len(), 1);
    assert_eq!(ctx.errors[0].path, path!["b"]);
    assert_eq!(ctx.errors[0].code, ErrorCode::ExpectString);
    assert_eq!(ctx.path, path!["C"]);
}

#[test]
fn test_intersection_property_lookup_prefers_last_member() {
    let first = Type::object([ObjectTypeProperty::new("a", Type::number())]);
    let second = Type::object([ObjectTypeProperty::new("a", Type::string())]);
    let ty = Type::intersection([first, second]);
    let property = ty.get_property(&PropertyKey::from("a"));
    assert_eq!(property.map(|p| p.value().to_string()), Some("string".to_string()));
    assert!(ty.has_property(&PropertyKey::from("a")));
    assert!(!ty.has_property(&PropertyKey::from("b")));
}

#[test]
fn test_union_of_objects_reports_single_error_at_root() {
    let ty = Type::union([
        Type::object([ObjectTypeProperty::new("kind", Type::string_literal("circle"))]),
        Type::object([ObjectTypeProperty::new("kind", Type::string_literal("square"))]),
    ]);
    let ctx = ty.validate(&Value::object([("kind", "triangle")]));
    assert_eq!(ctx.errors.len(), 1);
    assert!(ctx.errors[0].path.is_empty());
    assert_eq!(ctx.errors[0].code, ErrorCode::NoUnion);
}

#[test]
fn test_errors_follow_declared_property_order() {
    let ty = Type::object([
        ObjectTypeProperty::new("z", Type::string()),
        ObjectTypeProperty::new("a", Type::string()),
        ObjectTypeProperty::new("m", Type::string()),
    ]);
    let ctx = ty.validate(&Value::object([("a", 1), ("m", 2), ("z", 3)]));
    let paths: Vec<_> = ctx.errors.iter().map(|e| e.path.clone()).collect();
    assert_eq!(paths, vec![path!["z"], path!["a"], path!["m"]]);
}

#[test]
fn test_exact_object_reports_unknown_keys_after_properties() {
    let ty = Type::exact_object([ObjectTypeProperty::new("a", Type::number())]);
    let ctx = ty.validate(&Value::object([("a", Value::from("x")), ("extra", Value::from(1))]));
    let codes: Vec<_> = ctx.errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorCode::ExpectNumber, ErrorCode::UnknownKey]);
}

#[test]
fn test_static_property_is_read_from_constructor() {
    let class = FunctionRef::new("Widget", 0);
    class.set("kind", "widget");
    let ty = Type::object([ObjectTypeProperty::new("kind", Type::string_literal("widget")).static_member()]);
    assert!(ty.accepts(&Value::instance(&class, [("size", 1)])));

    let other = FunctionRef::new("Gadget", 0);
    other.set("kind", "gadget");
    assert!(!ty.accepts(&Value::instance(&other, [("size", 1)])));
}

// ─── Recursion and cycles ────────────────────────────────────────────

#[test]
fn test_self_referencing_object_terminates() {
    let ty = Type::object([
        ObjectTypeProperty::new("name", Type::string()),
        ObjectTypeProperty::new("me", Type::any()),
    ]);
    let object = ObjectRef::new();
    object.set("name", "loop").set("me", object.clone());
    assert!(ty.accepts(&Value::Object(object.clone())));

    let recursive = TypeAlias::recursive("Loop", |me| {
        Type::object([
            ObjectTypeProperty::new("name", Type::string()),
            ObjectTypeProperty::new("me", me),
        ])
    })
    .unwrap();
    assert!(recursive.accepts(&Value::Object(object.clone())));
    assert!(!recursive.validate(&Value::Object(object)).has_errors());
}

#[test]
fn test_cyclic_array_terminates() {
    let ty = TypeAlias::recursive("Nested", |nested| {
        Type::array(Type::union([Type::number(), nested]))
    })
    .unwrap();
    let outer = runtype_core::ArrayRef::new(vec![Value::from(1)]);
    outer.push(outer.clone());
    assert!(ty.accepts(&Value::Array(outer.clone())));

    outer.push("nope");
    let ctx = ty.validate(&Value::Array(outer));
    assert_eq!(ctx.errors.len(), 1);
    assert_eq!(ctx.errors[0].path, path![2usize]);
}

#[test]
fn test_recursive_descriptor_reports_deep_path() {
    let tree = TypeAlias::recursive("Tree", |tree| {
        Type::object([
            ObjectTypeProperty::new("label", Type::string()),
            ObjectTypeProperty::new("children", Type::array(tree)),
        ])
    })
    .unwrap();
    let leaf = |label: Value| Value::object([("label", label), ("children", Value::array([]))]);
    let root = Value::object([
        ("label", Value::from("root")),
        ("children", Value::array([leaf(Value::from("ok")), leaf(Value::from(7))])),
    ]);
    let ctx = tree.validate(&root);
    assert_eq!(ctx.errors.len(), 1);
    assert_eq!(ctx.errors[0].path, path!["children", 1usize, "label"]);
}

// ─── Reporting ───────────────────────────────────────────────────────

#[test]
fn test_assert_message_names_field_and_types() {
    let error = extended_interface()
        .assert(sample(Value::from(123), Value::from(0)))
        .unwrap_err();
    assert!(error.message().starts_with("C.b must be a string"));
    assert!(error.message().contains("Expected: string"));
    assert!(error.message().contains("Actual Value: 0"));
    assert!(error.message().contains("Actual Type: number"));
    assert_eq!(error.errors().len(), 1);
}

#[test]
fn test_prefix_and_custom_root_path() {
    let options = ValidateOptions::new()
        .with_prefix("  Config invalid:  ")
        .with_path(path!["settings"]);
    let error = extended_interface()
        .assert_with(sample(Value::from("x"), Value::from("y")), &options)
        .unwrap_err();
    assert!(error.message().starts_with("Config invalid: settings.a must be a number"));
}

#[test]
fn test_json_report_entries() {
    let ty = extended_interface();
    let ctx = ty.validate(&sample(Value::from(true), Value::from(0)));
    let report = make_json_error(&ctx);
    let entries = report.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["field"], "C.a");
    assert_eq!(entries[0]["path"], serde_json::json!(["C", "a"]));
    assert_eq!(entries[0]["expected"], "number");
    assert_eq!(entries[0]["actual"], "boolean");
    assert_eq!(entries[1]["code"], "ERR_EXPECT_STRING");

    let clean = ty.validate(&sample(Value::from(1), Value::from("b")));
    assert_eq!(make_json_error(&clean), serde_json::json!([]));
}

#[test]
fn test_custom_catalog_changes_messages() {
    let catalog = TemplateCatalog::default().with_template(ErrorCode::ExpectString, "should be text");
    let options = ValidateOptions::new().with_catalog(Arc::new(catalog));
    let ctx = extended_interface().validate_with(&sample(Value::from(1), Value::from(2)), &options);
    assert_eq!(ctx.errors[0].message, "should be text");
}

#[test]
fn test_decoded_descriptor_validates_like_built_one() {
    let mut registry = ConstraintRegistry::new();
    registry.register(Constraint::new("nonEmpty", |v| match v.as_str() {
        Some("") => Some("must not be empty".to_string()),
        _ => None,
    }));
    let document = r#"
typeName: TypeAlias
name: User
type:
  typeName: ObjectType
  exact: false
  properties:
    - typeName: ObjectTypeProperty
      key: name
      value: { typeName: StringType }
      constraints: [nonEmpty]
    - typeName: ObjectTypeProperty
      key: age
      optional: true
      value: { typeName: NumberType }
"#;
    let ty = runtype_types::type_from_yaml_str(document, &registry).unwrap();
    assert!(ty.accepts(&Value::object([("name", "ada")])));
    let ctx = ty.validate(&Value::object([("name", Value::from("")), ("age", Value::from("old"))]));
    let paths: Vec<_> = ctx.errors.iter().map(|e| e.path.clone()).collect();
    assert_eq!(paths, vec![path!["name"], path!["age"]]);
    assert_eq!(ctx.errors[0].code, ErrorCode::ConstraintViolation);
}

// ─── Warnings ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[test]
fn test_warn_logs_and_returns_input() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let ty = extended_interface();
    let input = sample(Value::from(123), Value::from(0));
    let returned = tracing::subscriber::with_default(subscriber, || ty.warn(input.clone()));

    assert_eq!(returned.identity(), input.identity());
    let output = log.contents();
    assert!(output.contains("WARN"), "missing warning in: {output}");
    assert!(output.contains("C.b must be a string"), "missing message in: {output}");
}

#[test]
fn test_warn_is_silent_for_valid_input() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let ty = extended_interface();
    tracing::subscriber::with_default(subscriber, || {
        ty.warn(sample(Value::from(1), Value::from("ok")));
    });
    assert!(!log.contents().contains("WARN"));
}
