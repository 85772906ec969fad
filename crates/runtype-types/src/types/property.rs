//! # Object Properties
//!
//! An [`ObjectTypeProperty`] validates one key of an object-like input.
//!
//! ## Container Selection
//!
//! Instance properties read from the input itself. Static properties read
//! from the input's constructor: the input must be object-like (else
//! `ERR_EXPECT_OBJECT` at the property's own path) and must have a
//! constructor function (else `ERR_EXPECT_FUNCTION` at `path.constructor`,
//! unless the property is optional).
//!
//! ## Presence
//!
//! - Optional and the value reads as `undefined`: no error.
//! - Nullable value descriptor and the key absent from the container:
//!   `ERR_MISSING_PROPERTY`. `?T` admits a present `null`, not a missing key.
//! - Otherwise the value descriptor validates the value at `path.key`, and
//!   the property's constraints run only if that produced no errors.

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, PathSegment, PropertyKey, Value};

use crate::compare::{compare_types, TypeRelation};
use crate::constraint::{collect_constraint_errors, constraints_accept, Constraint};
use crate::messages::ErrorCode;
use crate::types::Type;
use crate::validation::{no_errors, one_error, refine_after, ErrorIter, Validation};

const CONSTRUCTOR: &str = "constructor";

/// Definition of one object key.
#[derive(Debug, Clone)]
pub struct ObjectTypeProperty {
    key: PropertyKey,
    value: Type,
    optional: bool,
    is_static: bool,
    constraints: Arc<[Constraint]>,
}

/// Where a property's value was read from.
enum Resolved {
    Found {
        container: Value,
        target: Value,
        path: IdentifierPath,
    },
    /// Input cannot hold the property at all.
    Rejected(ErrorCode, IdentifierPath),
    /// Static, optional, and no constructor to read from.
    Skipped,
}

impl ObjectTypeProperty {
    pub fn new(key: impl Into<PropertyKey>, value: Type) -> Self {
        Self {
            key: key.into(),
            value,
            optional: false,
            is_static: false,
            constraints: Arc::from(Vec::new()),
        }
    }

    /// Mark as optional (`key?: T`).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark as a static member, read from the input's constructor.
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Attach refinements, evaluated after the value validates.
    pub fn with_constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        let mut all: Vec<Constraint> = self.constraints.iter().cloned().collect();
        all.extend(constraints);
        self.constraints = Arc::from(all);
        self
    }

    pub fn key(&self) -> &PropertyKey {
        &self.key
    }

    pub fn value(&self) -> &Type {
        &self.value
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether the value descriptor is `?T`.
    pub fn is_nullable(&self) -> bool {
        matches!(self.value, Type::Nullable(_))
    }

    /// Whether the key exists on the selected container of `input`.
    pub fn exists_on(&self, input: &Value) -> bool {
        if self.is_static {
            input.get(&PropertyKey::from(CONSTRUCTOR)).has(&self.key)
        } else {
            input.has(&self.key)
        }
    }

    fn resolve(&self, path: IdentifierPath, input: &Value) -> Resolved {
        if !self.is_static {
            let mut path = path;
            path.push(PathSegment::Key(self.key.clone()));
            return Resolved::Found {
                container: input.clone(),
                target: input.get(&self.key),
                path,
            };
        }
        if !input.is_object_like() {
            return Resolved::Rejected(ErrorCode::ExpectObject, path);
        }
        let mut path = path;
        path.push(PathSegment::from(CONSTRUCTOR));
        let constructor = input.get(&PropertyKey::from(CONSTRUCTOR));
        if !matches!(constructor, Value::Function(_)) {
            return if self.optional {
                Resolved::Skipped
            } else {
                Resolved::Rejected(ErrorCode::ExpectFunction, path)
            };
        }
        path.push(PathSegment::Key(self.key.clone()));
        Resolved::Found {
            target: constructor.get(&self.key),
            container: constructor,
            path,
        }
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        let this = Type::Property(Arc::clone(self));
        let (container, target, path) = match self.resolve(path, &input) {
            Resolved::Found {
                container,
                target,
                path,
            } => (container, target, path),
            Resolved::Rejected(code, path) => return one_error(ctx.error(path, &this, code, &[])),
            Resolved::Skipped => return no_errors(),
        };
        if self.optional && target.is_undefined() {
            return no_errors();
        }
        if self.is_nullable() && !container.has(&self.key) {
            return one_error(ctx.error(path, &this, ErrorCode::MissingProperty, &[]));
        }
        let structural = self.value.errors(ctx, path.clone(), target.clone());
        let constraints = Arc::clone(&self.constraints);
        refine_after(structural, move || {
            collect_constraint_errors(ctx, constraints, this, path, target)
        })
    }

    pub fn accepts(&self, ctx: &Validation, input: &Value) -> bool {
        let (container, target) = match self.resolve(Vec::new(), input) {
            Resolved::Found {
                container, target, ..
            } => (container, target),
            Resolved::Rejected(..) => return false,
            Resolved::Skipped => return true,
        };
        if self.optional && target.is_undefined() {
            return true;
        }
        if self.is_nullable() && !container.has(&self.key) {
            return false;
        }
        self.value.accepts_with(ctx, &target) && constraints_accept(&self.constraints, &target)
    }

    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match other {
            Type::Property(o) if o.key == self.key => compare_types(&self.value, &o.value),
            _ => TypeRelation::Incompatible,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut json = serde_json::json!({
            "typeName": "ObjectTypeProperty",
            "key": serde_json::to_value(&self.key).unwrap_or(serde_json::Value::Null),
            "value": self.value.to_json(),
            "optional": self.optional,
        });
        if self.is_static {
            json["static"] = serde_json::Value::Bool(true);
        }
        if matches!(self.key, PropertyKey::Symbol(_)) {
            json["symbolKey"] = serde_json::Value::Bool(true);
        }
        if !self.constraints.is_empty() {
            json["constraints"] = self.constraints.iter().map(|c| c.name().to_string()).collect();
        }
        json
    }
}

impl fmt::Display for ObjectTypeProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            f.write_str("static ")?;
        }
        match &self.key {
            PropertyKey::Symbol(symbol) => write!(f, "[{symbol}]")?,
            key => write!(f, "{key}")?,
        }
        if self.optional {
            f.write_str("?")?;
        }
        write!(f, ": {};", self.value)
    }
}
