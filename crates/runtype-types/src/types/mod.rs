//! # Type Descriptors
//!
//! [`Type`] is the handle for every node of a descriptor graph. It is a
//! closed enum over the built-in variants, each arm an `Arc` of that
//! variant's immutable configuration, plus [`Type::Custom`] for
//! user-defined descriptors implementing [`TypeDescriptor`].
//!
//! ## Uniform Contract
//!
//! Every variant provides:
//!
//! - `errors(ctx, path, input)` — lazy sequence of [`ErrorTuple`]s; pure
//!   with respect to `input`, restartable, safe to abandon early;
//! - `accepts(input)` — short-circuiting boolean, never renders messages;
//! - `compare_with(other)` — the subtype order ([`TypeRelation`]);
//! - `Display` — stable declarative syntax;
//! - `to_json()` — structural document with a `typeName` field.
//!
//! ## Identity & Sharing
//!
//! Descriptors are `Send + Sync` and never mutated after construction.
//! Cloning a `Type` clones the handle; [`Type::identity`] is the address of
//! the shared node and keys the cyclic guard.
//!
//! [`ErrorTuple`]: crate::validation::ErrorTuple

use std::fmt;
use std::sync::Arc;

use runtype_core::{IdentifierPath, PropertyKey, Value};

use crate::compare::{compare_types, TypeRelation};
use crate::constraint::Constraint;
use crate::validation::{ErrorIter, Validation};

pub mod alias;
pub mod array;
pub mod constrained;
pub mod function;
pub mod intersection;
pub mod literal;
pub mod nullable;
pub mod object;
pub mod primitive;
pub mod property;
pub mod union;

pub use alias::{TypeAlias, TypeReference};
pub use array::ArrayType;
pub use constrained::ConstrainedType;
pub use function::{FunctionType, FunctionTypeParam};
pub use intersection::IntersectionType;
pub use literal::{BooleanLiteralType, NumberLiteralType, StringLiteralType};
pub use nullable::NullableType;
pub use object::ObjectType;
pub use primitive::{AnyType, BooleanType, NullLiteralType, NumberType, StringType, SymbolType, VoidType};
pub use property::ObjectTypeProperty;
pub use union::UnionType;

/// Address of a shared descriptor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity(usize);

impl TypeIdentity {
    /// Identity of a variant seen through `&self`. Equals the identity of
    /// the `Type` handle holding it.
    pub(crate) fn of<T: ?Sized>(node: &T) -> Self {
        TypeIdentity(node as *const T as *const () as usize)
    }
}

/// Extension point for user-defined descriptors.
///
/// Implementations receive `Arc<Self>` in [`errors`](Self::errors) so the
/// returned iterator can own its descriptor and stay lazy.
pub trait TypeDescriptor: Send + Sync + fmt::Debug + fmt::Display {
    /// Kind name used in `to_json` documents.
    fn type_name(&self) -> &'static str;

    /// Every reason `input` fails at `path`.
    fn errors<'a>(self: Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a>;

    /// True iff `errors` would yield nothing. Should short-circuit.
    fn accepts(&self, ctx: &Validation, input: &Value) -> bool;

    /// Subtype order against `other`.
    fn compare_with(&self, _other: &Type) -> TypeRelation {
        TypeRelation::Incompatible
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "typeName": self.type_name() })
    }
}

/// Handle to a descriptor node.
#[derive(Clone)]
pub enum Type {
    Any(Arc<AnyType>),
    Void(Arc<VoidType>),
    Null(Arc<NullLiteralType>),
    Boolean(Arc<BooleanType>),
    BooleanLiteral(Arc<BooleanLiteralType>),
    Number(Arc<NumberType>),
    NumberLiteral(Arc<NumberLiteralType>),
    String(Arc<StringType>),
    StringLiteral(Arc<StringLiteralType>),
    Symbol(Arc<SymbolType>),
    Function(Arc<FunctionType>),
    Array(Arc<ArrayType>),
    Object(Arc<ObjectType>),
    Property(Arc<ObjectTypeProperty>),
    Intersection(Arc<IntersectionType>),
    Union(Arc<UnionType>),
    Nullable(Arc<NullableType>),
    Constrained(Arc<ConstrainedType>),
    Alias(Arc<TypeAlias>),
    Reference(Arc<TypeReference>),
    Custom(Arc<dyn TypeDescriptor>),
}

/// Address of an `Arc` payload, thin even for trait objects.
fn address<T: ?Sized>(arc: &Arc<T>) -> usize {
    TypeIdentity::of(arc.as_ref()).0
}

impl Type {
    // ─── Constructors ────────────────────────────────────────────────

    pub fn any() -> Self {
        Type::Any(Arc::new(AnyType))
    }

    pub fn void() -> Self {
        Type::Void(Arc::new(VoidType))
    }

    pub fn null() -> Self {
        Type::Null(Arc::new(NullLiteralType))
    }

    pub fn boolean() -> Self {
        Type::Boolean(Arc::new(BooleanType))
    }

    pub fn boolean_literal(value: bool) -> Self {
        Type::BooleanLiteral(Arc::new(BooleanLiteralType::new(value)))
    }

    pub fn number() -> Self {
        Type::Number(Arc::new(NumberType))
    }

    pub fn number_literal(value: f64) -> Self {
        Type::NumberLiteral(Arc::new(NumberLiteralType::new(value)))
    }

    pub fn string() -> Self {
        Type::String(Arc::new(StringType))
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Type::StringLiteral(Arc::new(StringLiteralType::new(value)))
    }

    pub fn symbol() -> Self {
        Type::Symbol(Arc::new(SymbolType))
    }

    pub fn function(function: FunctionType) -> Self {
        Type::Function(Arc::new(function))
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Arc::new(ArrayType::new(element)))
    }

    /// Inexact object with the given properties, in declaration order.
    pub fn object(properties: impl IntoIterator<Item = ObjectTypeProperty>) -> Self {
        Type::Object(Arc::new(ObjectType::new(properties)))
    }

    /// Object that also rejects keys it does not declare.
    pub fn exact_object(properties: impl IntoIterator<Item = ObjectTypeProperty>) -> Self {
        Type::Object(Arc::new(ObjectType::new(properties).exact()))
    }

    pub fn property(property: ObjectTypeProperty) -> Self {
        Type::Property(Arc::new(property))
    }

    pub fn intersection(types: impl IntoIterator<Item = Type>) -> Self {
        Type::Intersection(Arc::new(IntersectionType::new(types)))
    }

    pub fn union(types: impl IntoIterator<Item = Type>) -> Self {
        Type::Union(Arc::new(UnionType::new(types)))
    }

    pub fn nullable(inner: Type) -> Self {
        Type::Nullable(Arc::new(NullableType::new(inner)))
    }

    /// Named, non-recursive alias. See [`TypeAlias::recursive`] for
    /// self-referential descriptors.
    pub fn alias(name: impl Into<String>, inner: Type) -> Self {
        Type::Alias(Arc::new(TypeAlias::new(name, inner)))
    }

    pub fn custom(descriptor: impl TypeDescriptor + 'static) -> Self {
        Type::Custom(Arc::new(descriptor))
    }

    /// Refine this descriptor with named constraints.
    pub fn constrain(&self, name: impl Into<String>, constraints: impl IntoIterator<Item = Constraint>) -> Type {
        Type::Constrained(Arc::new(ConstrainedType::new(name, self.clone(), constraints)))
    }

    // ─── Identity & naming ───────────────────────────────────────────

    /// Identity of the shared node.
    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity(match self {
            Type::Any(t) => address(t),
            Type::Void(t) => address(t),
            Type::Null(t) => address(t),
            Type::Boolean(t) => address(t),
            Type::BooleanLiteral(t) => address(t),
            Type::Number(t) => address(t),
            Type::NumberLiteral(t) => address(t),
            Type::String(t) => address(t),
            Type::StringLiteral(t) => address(t),
            Type::Symbol(t) => address(t),
            Type::Function(t) => address(t),
            Type::Array(t) => address(t),
            Type::Object(t) => address(t),
            Type::Property(t) => address(t),
            Type::Intersection(t) => address(t),
            Type::Union(t) => address(t),
            Type::Nullable(t) => address(t),
            Type::Constrained(t) => address(t),
            Type::Alias(t) => address(t),
            Type::Reference(t) => address(t),
            Type::Custom(t) => address(t),
        })
    }

    /// True if both handles point to the same node.
    pub fn same_as(&self, other: &Type) -> bool {
        self.identity() == other.identity()
    }

    /// Kind name used in `to_json` documents.
    pub fn type_name(&self) -> &'static str {
        match self {
            Type::Any(_) => "AnyType",
            Type::Void(_) => "VoidType",
            Type::Null(_) => "NullLiteralType",
            Type::Boolean(_) => "BooleanType",
            Type::BooleanLiteral(_) => "BooleanLiteralType",
            Type::Number(_) => "NumberType",
            Type::NumberLiteral(_) => "NumberLiteralType",
            Type::String(_) => "StringType",
            Type::StringLiteral(_) => "StringLiteralType",
            Type::Symbol(_) => "SymbolType",
            Type::Function(_) => "FunctionType",
            Type::Array(_) => "ArrayType",
            Type::Object(_) => "ObjectType",
            Type::Property(_) => "ObjectTypeProperty",
            Type::Intersection(_) => "IntersectionType",
            Type::Union(_) => "UnionType",
            Type::Nullable(_) => "NullableType",
            Type::Constrained(_) => "ConstrainedType",
            Type::Alias(_) => "TypeAlias",
            Type::Reference(_) => "TypeReference",
            Type::Custom(t) => t.type_name(),
        }
    }

    /// Declared name of aliases, references and constrained descriptors.
    pub fn name(&self) -> Option<&str> {
        match self {
            Type::Alias(t) => Some(t.name()),
            Type::Reference(t) => Some(t.name()),
            Type::Constrained(t) => Some(t.name()),
            _ => None,
        }
    }

    /// Strip aliases and references down to the underlying descriptor.
    ///
    /// A reference whose alias is gone unwraps to itself.
    pub fn unwrap_alias(&self) -> Type {
        let mut current = self.clone();
        loop {
            let next = match &current {
                Type::Alias(alias) => alias.inner().clone(),
                Type::Reference(reference) => match reference.target() {
                    Some(alias) => alias.inner().clone(),
                    None => return current,
                },
                _ => return current,
            };
            current = next;
        }
    }

    // ─── Uniform contract ────────────────────────────────────────────

    /// Lazily produce every reason `input` fails at `path`.
    pub fn errors<'a>(&self, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        match self {
            Type::Any(_) => crate::validation::no_errors(),
            Type::Void(t) => t.errors(ctx, path, input),
            Type::Null(t) => t.errors(ctx, path, input),
            Type::Boolean(t) => t.errors(ctx, path, input),
            Type::BooleanLiteral(t) => t.errors(ctx, path, input),
            Type::Number(t) => t.errors(ctx, path, input),
            Type::NumberLiteral(t) => t.errors(ctx, path, input),
            Type::String(t) => t.errors(ctx, path, input),
            Type::StringLiteral(t) => t.errors(ctx, path, input),
            Type::Symbol(t) => t.errors(ctx, path, input),
            Type::Function(t) => t.errors(ctx, path, input),
            Type::Array(t) => t.errors(ctx, path, input),
            Type::Object(t) => t.errors(ctx, path, input),
            Type::Property(t) => t.errors(ctx, path, input),
            Type::Intersection(t) => t.errors(ctx, path, input),
            Type::Union(t) => t.errors(ctx, path, input),
            Type::Nullable(t) => t.errors(ctx, path, input),
            Type::Constrained(t) => t.errors(ctx, path, input),
            Type::Alias(t) => t.errors(ctx, path, input),
            Type::Reference(t) => t.errors(ctx, path, input),
            Type::Custom(t) => Arc::clone(t).errors(ctx, path, input),
        }
    }

    /// Short-circuiting check inside an existing context (shares its
    /// cyclic guard).
    pub fn accepts_with(&self, ctx: &Validation, input: &Value) -> bool {
        match self {
            Type::Any(_) => true,
            Type::Void(t) => t.accepts(input),
            Type::Null(t) => t.accepts(input),
            Type::Boolean(t) => t.accepts(input),
            Type::BooleanLiteral(t) => t.accepts(input),
            Type::Number(t) => t.accepts(input),
            Type::NumberLiteral(t) => t.accepts(input),
            Type::String(t) => t.accepts(input),
            Type::StringLiteral(t) => t.accepts(input),
            Type::Symbol(t) => t.accepts(input),
            Type::Function(t) => t.accepts(input),
            Type::Array(t) => t.accepts(ctx, input),
            Type::Object(t) => t.accepts(ctx, input),
            Type::Property(t) => t.accepts(ctx, input),
            Type::Intersection(t) => t.accepts(ctx, input),
            Type::Union(t) => t.accepts(ctx, input),
            Type::Nullable(t) => t.accepts(ctx, input),
            Type::Constrained(t) => t.accepts(ctx, input),
            Type::Alias(t) => t.accepts(ctx, input),
            Type::Reference(t) => t.accepts(ctx, input),
            Type::Custom(t) => t.accepts(ctx, input),
        }
    }

    /// True iff `input` produces no errors. Stops at the first failure.
    pub fn accepts(&self, input: &Value) -> bool {
        let ctx = Validation::new(input.clone());
        self.accepts_with(&ctx, input)
    }

    /// This descriptor's own view of the subtype order. Callers normally
    /// want [`compare_types`], which also handles identity and aliases.
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        match self {
            Type::Any(t) => t.compare_with(other),
            Type::Void(t) => t.compare_with(other),
            Type::Null(t) => t.compare_with(other),
            Type::Boolean(t) => t.compare_with(other),
            Type::BooleanLiteral(t) => t.compare_with(other),
            Type::Number(t) => t.compare_with(other),
            Type::NumberLiteral(t) => t.compare_with(other),
            Type::String(t) => t.compare_with(other),
            Type::StringLiteral(t) => t.compare_with(other),
            Type::Symbol(t) => t.compare_with(other),
            Type::Function(t) => t.compare_with(other),
            Type::Array(t) => t.compare_with(other),
            Type::Object(t) => t.compare_with(other),
            Type::Property(t) => t.compare_with(other),
            Type::Intersection(t) => t.compare_with(other),
            Type::Union(t) => t.compare_with(other),
            Type::Nullable(t) => t.compare_with(other),
            Type::Constrained(_) => TypeRelation::Incompatible,
            Type::Alias(t) => t.compare_with(other),
            Type::Reference(t) => t.compare_with(other),
            Type::Custom(t) => t.compare_with(other),
        }
    }

    /// Whether this descriptor's acceptance set may contain `other`'s.
    pub fn accepts_type(&self, other: &Type) -> bool {
        compare_types(self, other) != TypeRelation::Incompatible
    }

    /// Structural document for descriptor interchange.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Type::BooleanLiteral(t) => t.to_json(),
            Type::NumberLiteral(t) => t.to_json(),
            Type::StringLiteral(t) => t.to_json(),
            Type::Function(t) => t.to_json(),
            Type::Array(t) => t.to_json(),
            Type::Object(t) => t.to_json(),
            Type::Property(t) => t.to_json(),
            Type::Intersection(t) => t.to_json(),
            Type::Union(t) => t.to_json(),
            Type::Nullable(t) => t.to_json(),
            Type::Constrained(t) => t.to_json(),
            Type::Alias(t) => t.to_json(),
            Type::Reference(t) => t.to_json(),
            Type::Custom(t) => t.to_json(),
            _ => serde_json::json!({ "typeName": self.type_name() }),
        }
    }

    // ─── Object shape ────────────────────────────────────────────────

    /// Property definition for `key`, if this descriptor is object-shaped.
    pub fn get_property(&self, key: &PropertyKey) -> Option<Arc<ObjectTypeProperty>> {
        match self {
            Type::Object(t) => t.get_property(key),
            Type::Intersection(t) => t.get_property(key),
            Type::Alias(_) | Type::Reference(_) => match self.unwrap_alias() {
                Type::Alias(_) | Type::Reference(_) => None,
                inner => inner.get_property(key),
            },
            _ => None,
        }
    }

    /// Whether any part of this descriptor declares `key`.
    pub fn has_property(&self, key: &PropertyKey) -> bool {
        match self {
            Type::Object(t) => t.has_property(key),
            Type::Intersection(t) => t.has_property(key),
            Type::Alias(_) | Type::Reference(_) => match self.unwrap_alias() {
                Type::Alias(_) | Type::Reference(_) => false,
                inner => inner.has_property(key),
            },
            _ => false,
        }
    }

    /// Instance (non-static) property keys, for object-shaped descriptors.
    pub fn property_keys(&self) -> Option<Vec<PropertyKey>> {
        match self.unwrap_alias() {
            Type::Object(t) => Some(t.property_keys()),
            Type::Intersection(t) => t.property_keys(),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node: &dyn fmt::Display = match self {
            Type::Any(t) => t.as_ref(),
            Type::Void(t) => t.as_ref(),
            Type::Null(t) => t.as_ref(),
            Type::Boolean(t) => t.as_ref(),
            Type::BooleanLiteral(t) => t.as_ref(),
            Type::Number(t) => t.as_ref(),
            Type::NumberLiteral(t) => t.as_ref(),
            Type::String(t) => t.as_ref(),
            Type::StringLiteral(t) => t.as_ref(),
            Type::Symbol(t) => t.as_ref(),
            Type::Function(t) => t.as_ref(),
            Type::Array(t) => t.as_ref(),
            Type::Object(t) => t.as_ref(),
            Type::Property(t) => t.as_ref(),
            Type::Intersection(t) => t.as_ref(),
            Type::Union(t) => t.as_ref(),
            Type::Nullable(t) => t.as_ref(),
            Type::Constrained(t) => t.as_ref(),
            Type::Alias(t) => t.as_ref(),
            Type::Reference(t) => t.as_ref(),
            Type::Custom(t) => return fmt::Display::fmt(t.as_ref(), f),
        };
        fmt::Display::fmt(node, f)
    }
}

// Shallow: descriptor graphs may be recursive.
impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let t = Type::string();
        assert!(t.same_as(&t.clone()));
        assert!(!t.same_as(&Type::string()));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Type::string().type_name(), "StringType");
        assert_eq!(Type::null().type_name(), "NullLiteralType");
        assert_eq!(Type::object([]).type_name(), "ObjectType");
    }

    #[test]
    fn test_simple_to_json() {
        assert_eq!(Type::string().to_json(), serde_json::json!({"typeName": "StringType"}));
    }

    #[test]
    fn test_accepts_type_uses_order() {
        assert!(Type::string().accepts_type(&Type::string_literal("a")));
        assert!(!Type::string_literal("a").accepts_type(&Type::string()));
    }

    #[test]
    fn test_name_of_alias_and_constrained() {
        let alias = Type::alias("Name", Type::string());
        assert_eq!(alias.name(), Some("Name"));
        let constrained = Type::number().constrain("Positive", []);
        assert_eq!(constrained.name(), Some("Positive"));
        assert_eq!(Type::string().name(), None);
    }
}
