//! Property tests for identifier paths and JSON interchange.

use proptest::prelude::*;
use runtype_core::{match_path, resolve_path, stringify_path, PathSegment, Value};

fn arb_segment() -> impl Strategy<Value = PathSegment> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,6}".prop_map(PathSegment::from),
        (0usize..8).prop_map(PathSegment::from),
    ]
}

fn arb_path() -> impl Strategy<Value = Vec<PathSegment>> {
    prop::collection::vec(arb_segment(), 0..6)
}

/// JSON documents whose numbers survive the f64 value model exactly.
fn arb_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i32>().prop_map(|n| serde_json::json!(n)),
        "[a-zA-Z0-9 ]{0,12}".prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(3, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..5)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Every path is a prefix of itself and of any extension of itself.
    #[test]
    fn match_path_accepts_extensions(path in arb_path(), tail in arb_path()) {
        prop_assert!(match_path(&path, &path));
        let extended: Vec<_> = path.iter().chain(tail.iter()).cloned().collect();
        prop_assert!(match_path(&path, &extended));
        if !tail.is_empty() {
            prop_assert!(!match_path(&extended, &path));
        }
    }

    /// Rendering never fails and only the empty path renders as the root label.
    #[test]
    fn stringify_is_total(path in arb_path()) {
        let rendered = stringify_path(&path);
        prop_assert_eq!(rendered == "Value", path.is_empty());
    }

    /// A value planted at the end of a path of string keys is found again.
    #[test]
    fn resolve_finds_planted_value(keys in prop::collection::vec("[a-z]{1,4}", 1..5)) {
        let mut value = Value::from("leaf");
        for key in keys.iter().rev() {
            value = Value::object([(key.as_str(), value)]);
        }
        let path: Vec<_> = keys.iter().map(|k| PathSegment::from(k.as_str())).collect();
        let resolved = resolve_path(&value, &path);
        prop_assert_eq!(resolved.as_str(), Some("leaf"));
    }

    /// Plain JSON documents survive conversion through the value model.
    #[test]
    fn json_documents_survive_value_model(document in arb_json()) {
        let value = Value::from_json(&document);
        prop_assert_eq!(value.to_json().unwrap(), document);
    }
}
