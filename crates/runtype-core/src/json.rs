//! # JSON Interchange for Runtime Values
//!
//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! ## Rendering Rules
//!
//! [`Value::to_json`] follows `JSON.stringify` so that reports show values
//! the way a JavaScript-minded reader expects:
//!
//! 1. `undefined`, functions and symbols are dropped from objects and become
//!    `null` inside arrays. At the top level they are unrepresentable.
//! 2. Symbol-keyed properties are dropped.
//! 3. Integral numbers render without a fraction; NaN and infinities
//!    render as `null`.
//! 4. Maps render as `{}`.
//! 5. A reference cycle is an error, not an infinite loop.

use serde_json::{Map, Number};

use crate::error::ValueError;
use crate::identity::ValueId;
use crate::path::PropertyKey;
use crate::value::Value;

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Value {
    /// Build a value from a JSON document. Object keys become string keys.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::from(s.as_str()),
            serde_json::Value::Array(items) => Value::array(items.iter().map(Value::from_json)),
            serde_json::Value::Object(map) => {
                Value::object(map.iter().map(|(k, v)| (k.as_str(), Value::from_json(v))))
            }
        }
    }

    /// Render as JSON.
    ///
    /// # Errors
    ///
    /// `ValueError::Cyclic` if the value graph contains a cycle;
    /// `ValueError::Unrepresentable` for a top-level `undefined`, function
    /// or symbol.
    pub fn to_json(&self) -> Result<serde_json::Value, ValueError> {
        let mut ancestors = Vec::new();
        to_json_inner(self, &mut ancestors)?.ok_or(ValueError::Unrepresentable(self.kind()))
    }

    /// Render as two-space indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String, ValueError> {
        Ok(serde_json::to_string_pretty(&self.to_json()?)?)
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        serde_json::Value::Null
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// `Ok(None)` means "skip" (undefined, function, symbol).
fn to_json_inner(
    value: &Value,
    ancestors: &mut Vec<ValueId>,
) -> Result<Option<serde_json::Value>, ValueError> {
    if let Some(id) = value.identity() {
        if ancestors.contains(&id) {
            return Err(ValueError::Cyclic);
        }
    }
    let json = match value {
        Value::Undefined | Value::Function(_) | Value::Symbol(_) => return Ok(None),
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::Map(_) => serde_json::Value::Object(Map::new()),
        Value::Array(array) => {
            ancestors.push(array.id());
            let mut items = Vec::with_capacity(array.len());
            for item in array.items() {
                items.push(to_json_inner(&item, ancestors)?.unwrap_or(serde_json::Value::Null));
            }
            ancestors.pop();
            serde_json::Value::Array(items)
        }
        Value::Object(object) => {
            ancestors.push(object.id());
            let mut map = Map::new();
            for (key, item) in object.entries() {
                let name = match key {
                    PropertyKey::String(s) => s,
                    PropertyKey::Index(i) => i.to_string(),
                    PropertyKey::Symbol(_) => continue,
                };
                if let Some(json) = to_json_inner(&item, ancestors)? {
                    map.insert(name, json);
                }
            }
            ancestors.pop();
            serde_json::Value::Object(map)
        }
    };
    Ok(Some(json))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_json() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::Bool),
            (-1_000_000i64..1_000_000i64).prop_map(|n| serde_json::json!(n)),
            "[a-z]{0,8}".prop_map(serde_json::Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4).prop_map(|m| {
                    serde_json::Value::Object(m.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn json_documents_survive_conversion(doc in arb_json()) {
            prop_assert_eq!(Value::from_json(&doc).to_json().unwrap(), doc);
        }
    }
}
