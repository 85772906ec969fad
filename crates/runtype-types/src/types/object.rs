//! # Object Descriptors
//!
//! An [`ObjectType`] is an ordered list of [`ObjectTypeProperty`]s. Errors
//! are produced property by property in declaration order. An `exact`
//! object additionally rejects instance keys it does not declare.
//!
//! Objects are recursive descriptors: before descending into a value they
//! enter the validation context's cyclic guard, so a descriptor validating
//! self-referential data terminates.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, PropertyKey, Value};

use crate::compare::{compare_types, TypeRelation};
use crate::messages::ErrorCode;
use crate::types::{ObjectTypeProperty, Type, TypeIdentity};
use crate::validation::{cycle_scoped, deferred, one_error, ErrorIter, Validation};

#[derive(Debug, Clone, Default)]
pub struct ObjectType {
    properties: Vec<Arc<ObjectTypeProperty>>,
    exact: bool,
}

/// Static property keys of an object-shaped descriptor.
fn static_keys(ty: &Type) -> Vec<PropertyKey> {
    match ty.unwrap_alias() {
        Type::Object(object) => object
            .properties
            .iter()
            .filter(|p| p.is_static())
            .map(|p| p.key().clone())
            .collect(),
        Type::Intersection(intersection) => intersection.types().iter().flat_map(static_keys).collect(),
        _ => Vec::new(),
    }
}

/// Enumerable own keys of an object-shaped value.
fn own_keys(input: &Value) -> Vec<PropertyKey> {
    match input {
        Value::Object(object) => object.keys(),
        Value::Array(array) => (0..array.len()).map(PropertyKey::Index).collect(),
        _ => Vec::new(),
    }
}

impl ObjectType {
    pub fn new(properties: impl IntoIterator<Item = ObjectTypeProperty>) -> Self {
        Self {
            properties: properties.into_iter().map(Arc::new).collect(),
            exact: false,
        }
    }

    /// Reject instance keys that no property declares.
    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn properties(&self) -> &[Arc<ObjectTypeProperty>] {
        &self.properties
    }

    pub fn get_property(&self, key: &PropertyKey) -> Option<Arc<ObjectTypeProperty>> {
        self.properties.iter().find(|p| p.key() == key).cloned()
    }

    pub fn has_property(&self, key: &PropertyKey) -> bool {
        self.properties.iter().any(|p| p.key() == key)
    }

    /// Keys of non-static properties, in declaration order.
    pub fn property_keys(&self) -> Vec<PropertyKey> {
        self.properties
            .iter()
            .filter(|p| !p.is_static())
            .map(|p| p.key().clone())
            .collect()
    }

    fn declares_instance_key(&self, key: &PropertyKey) -> bool {
        self.properties.iter().any(|p| !p.is_static() && p.key() == key)
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        let this = Type::Object(Arc::clone(self));
        if !input.is_object() {
            return one_error(ctx.error(path, &this, ErrorCode::ExpectObject, &[]));
        }
        let object = Arc::clone(self);
        let scope = (this.clone(), input.clone());
        cycle_scoped(ctx, &scope.0, &scope.1, move || -> ErrorIter<'a> {
            let properties = {
                let object = Arc::clone(&object);
                let path = path.clone();
                let input = input.clone();
                (0..object.properties.len())
                    .flat_map(move |i| object.properties[i].errors(ctx, path.clone(), input.clone()))
            };
            if !object.exact {
                return Box::new(properties);
            }
            let unknown = deferred(move || -> ErrorIter<'a> {
                let mut errors = Vec::new();
                for key in own_keys(&input) {
                    if !object.declares_instance_key(&key) {
                        let name = key.to_string();
                        errors.push(ctx.error(path.clone(), &this, ErrorCode::UnknownKey, &[&name]));
                    }
                }
                Box::new(errors.into_iter())
            });
            Box::new(properties.chain(unknown))
        })
    }

    pub fn accepts(&self, ctx: &Validation, input: &Value) -> bool {
        if !input.is_object() {
            return false;
        }
        let Some(_guard) = ctx.enter_cycle(TypeIdentity::of(self), input) else {
            return true;
        };
        if !self.properties.iter().all(|p| p.accepts(ctx, input)) {
            return false;
        }
        !self.exact || own_keys(input).iter().all(|key| self.declares_instance_key(key))
    }

    /// Property-wise comparison against another object-shaped descriptor.
    ///
    /// A property missing on the other side, or narrower here, is
    /// incompatible. A broader property, or an extra property on the other
    /// side, makes this descriptor subsume it.
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        let Some(other_keys) = other.property_keys() else {
            return TypeRelation::Incompatible;
        };
        let other_exact = matches!(other, Type::Object(o) if o.exact);
        if self.exact && !other_exact {
            return TypeRelation::Incompatible;
        }
        let mut is_greater = !self.exact && other_exact;
        for property in &self.properties {
            let Some(other_property) = other.get_property(property.key()) else {
                return TypeRelation::Incompatible;
            };
            if property.is_static() != other_property.is_static() {
                return TypeRelation::Incompatible;
            }
            match (property.is_optional(), other_property.is_optional()) {
                (false, true) => return TypeRelation::Incompatible,
                (true, false) => is_greater = true,
                _ => {}
            }
            // A required nullable key must be present; the other side may
            // accept it missing.
            if !property.is_optional()
                && property.is_nullable()
                && !other_property.is_nullable()
                && other_property.value().accepts(&Value::Undefined)
            {
                return TypeRelation::Incompatible;
            }
            match compare_types(property.value(), other_property.value()) {
                TypeRelation::Incompatible => return TypeRelation::Incompatible,
                TypeRelation::Subsumes => is_greater = true,
                TypeRelation::Equivalent => {}
            }
        }
        let declared = self.property_keys();
        if other_keys.iter().any(|key| !declared.contains(key)) {
            if self.exact {
                return TypeRelation::Incompatible;
            }
            is_greater = true;
        }
        // Exactness only restricts instance keys; an extra static property
        // on the other side always narrows it.
        if static_keys(other)
            .iter()
            .any(|key| !self.properties.iter().any(|p| p.is_static() && p.key() == key))
        {
            is_greater = true;
        }
        if is_greater {
            TypeRelation::Subsumes
        } else {
            TypeRelation::Equivalent
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let properties: Vec<_> = self.properties.iter().map(|p| p.to_json()).collect();
        serde_json::json!({
            "typeName": "ObjectType",
            "properties": properties,
            "exact": self.exact,
        })
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = if self.exact { ("{|", "|}") } else { ("{", "}") };
        if self.properties.is_empty() {
            return write!(f, "{open}{close}");
        }
        writeln!(f, "{open}")?;
        for property in &self.properties {
            for line in property.to_string().lines() {
                writeln!(f, "  {line}")?;
            }
        }
        f.write_str(close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtype_core::{path, ObjectRef};

    fn point() -> Type {
        Type::object([
            ObjectTypeProperty::new("x", Type::number()),
            ObjectTypeProperty::new("y", Type::number()),
        ])
    }

    fn errors(ty: &Type, input: Value) -> Vec<(IdentifierPath, ErrorCode)> {
        let ctx = Validation::new(input.clone());
        ty.errors(&ctx, Vec::new(), input).map(|e| (e.path, e.code)).collect()
    }

    #[test]
    fn test_errors_follow_declaration_order() {
        let found = errors(&point(), Value::object([("y", "b"), ("x", "a")]));
        assert_eq!(
            found,
            vec![(path!["x"], ErrorCode::ExpectNumber), (path!["y"], ErrorCode::ExpectNumber)]
        );
    }

    #[test]
    fn test_rejects_non_objects() {
        assert_eq!(errors(&point(), Value::Null), vec![(Vec::new(), ErrorCode::ExpectObject)]);
        assert_eq!(
            errors(&point(), Value::function("f", 0)),
            vec![(Vec::new(), ErrorCode::ExpectObject)]
        );
        assert!(!point().accepts(&Value::from("x")));
    }

    #[test]
    fn test_inexact_allows_extra_keys() {
        assert!(point().accepts(&Value::object([("x", 1), ("y", 2), ("z", 3)])));
    }

    #[test]
    fn test_exact_reports_unknown_keys_after_properties() {
        let ty = Type::exact_object([ObjectTypeProperty::new("x", Type::number())]);
        let found = errors(&ty, Value::object([("x", Value::from("a")), ("z", Value::from(3))]));
        assert_eq!(
            found,
            vec![(path!["x"], ErrorCode::ExpectNumber), (Vec::new(), ErrorCode::UnknownKey)]
        );
        assert!(!ty.accepts(&Value::object([("x", 1), ("z", 3)])));
        assert!(ty.accepts(&Value::object([("x", 1)])));
    }

    #[test]
    fn test_self_referential_data_terminates() {
        let ty = crate::types::TypeAlias::recursive("Node", |node| {
            Type::object([ObjectTypeProperty::new("next", node)])
        })
        .unwrap();
        let object = ObjectRef::new();
        object.set("next", object.clone());
        let input = Value::Object(object);
        assert!(errors(&ty, input.clone()).is_empty());
        assert!(ty.accepts(&input));
    }

    #[test]
    fn test_early_drop_releases_guard() {
        let ty = point();
        let input = Value::object([("x", "a"), ("y", "b")]);
        let ctx = Validation::new(input.clone());
        let first = ty.errors(&ctx, Vec::new(), input.clone()).next();
        assert!(first.is_some());
        assert!(!ctx.in_cycle(&ty, &input));
        assert_eq!(ty.errors(&ctx, Vec::new(), input).count(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(point().to_string(), "{\n  x: number;\n  y: number;\n}");
        assert_eq!(Type::object([]).to_string(), "{}");
        let nested = Type::exact_object([ObjectTypeProperty::new("p", point())]);
        assert_eq!(
            nested.to_string(),
            "{|\n  p: {\n    x: number;\n    y: number;\n  };\n|}"
        );
    }

    #[test]
    fn test_compare_property_wise() {
        let wide = Type::object([ObjectTypeProperty::new("x", Type::number())]);
        let narrow = Type::object([ObjectTypeProperty::new("x", Type::number_literal(1.0))]);
        assert_eq!(wide.compare_with(&narrow), TypeRelation::Subsumes);
        assert_eq!(narrow.compare_with(&wide), TypeRelation::Incompatible);
        assert_eq!(wide.compare_with(&point()), TypeRelation::Subsumes);
        assert_eq!(point().compare_with(&wide), TypeRelation::Incompatible);
        assert_eq!(point().compare_with(&point()), TypeRelation::Equivalent);
        assert_eq!(point().compare_with(&Type::string()), TypeRelation::Incompatible);
    }

    #[test]
    fn test_compare_exactness() {
        let exact = Type::exact_object([ObjectTypeProperty::new("x", Type::number())]);
        let inexact = Type::object([ObjectTypeProperty::new("x", Type::number())]);
        assert_eq!(inexact.compare_with(&exact), TypeRelation::Subsumes);
        assert_eq!(exact.compare_with(&inexact), TypeRelation::Incompatible);
    }

    #[test]
    fn test_required_nullable_does_not_subsume_missing_key() {
        let nullable = Type::object([ObjectTypeProperty::new("a", Type::nullable(Type::number()))]);
        let void = Type::object([ObjectTypeProperty::new("a", Type::void())]);
        assert!(void.accepts(&Value::object(Vec::<(&str, Value)>::new())));
        assert!(!nullable.accepts(&Value::object(Vec::<(&str, Value)>::new())));
        assert_eq!(nullable.compare_with(&void), TypeRelation::Incompatible);
    }

    #[test]
    fn test_extra_static_property_is_narrower() {
        let empty = Type::exact_object([]);
        let with_static = Type::exact_object([ObjectTypeProperty::new("s", Type::string()).static_member()]);
        assert_eq!(empty.compare_with(&with_static), TypeRelation::Subsumes);
        assert_eq!(with_static.compare_with(&empty), TypeRelation::Incompatible);
        assert_eq!(with_static.compare_with(&with_static), TypeRelation::Equivalent);
    }
}
