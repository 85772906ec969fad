//! # Aliases & Recursive Descriptors
//!
//! A [`TypeAlias`] gives a descriptor a name. Its name is the default root
//! path of reports and its syntax text wherever it is nested.
//!
//! Self-referential descriptors (`type Node = { next: ?Node }`) are built
//! with [`TypeAlias::recursive`]. The builder receives a
//! [`TypeReference`] back-edge to the alias under construction. References
//! hold the alias weakly, so a recursive graph is never a strong reference
//! cycle and is freed with its last outside handle. A reference that
//! outlived its alias reports `ERR_UNRESOLVED_TYPE`.

use std::fmt;
use std::sync::{Arc, Weak};

use runtype_core::{IdentifierPath, Value};

use crate::compare::{compare_types, TypeRelation};
use crate::error::DescriptorError;
use crate::messages::ErrorCode;
use crate::types::Type;
use crate::validation::{one_error, ErrorIter, Validation};

#[derive(Debug)]
pub struct TypeAlias {
    name: String,
    inner: Type,
}

impl TypeAlias {
    pub fn new(name: impl Into<String>, inner: Type) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// Build a self-referential alias. `build` receives a reference to the
    /// alias being built and returns its body.
    ///
    /// Every path from the body back to the reference must pass through an
    /// object, array or function descriptor. Those are the only nodes that
    /// descend into a different value (or stop at a cycle), so a body like
    /// `type X = string | ?X` would never terminate and is rejected.
    ///
    /// ```
    /// use runtype_types::{ObjectTypeProperty, Type, TypeAlias};
    ///
    /// let node = TypeAlias::recursive("Node", |node| {
    ///     Type::object([ObjectTypeProperty::new("next", Type::nullable(node))])
    /// })?;
    /// assert_eq!(node.to_string(), "Node");
    /// # Ok::<(), runtype_types::DescriptorError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`DescriptorError::UnguardedRecursion`] if the body reaches the
    /// reference without passing through an object, array or function.
    pub fn recursive<F>(name: impl Into<String>, build: F) -> Result<Type, DescriptorError>
    where
        F: FnOnce(Type) -> Type,
    {
        Self::try_recursive(name, |reference| Ok(build(reference)))
    }

    /// Fallible form of [`recursive`](Self::recursive).
    ///
    /// # Errors
    ///
    /// Returns whatever error `build` returns, or
    /// [`DescriptorError::UnguardedRecursion`] converted into `E`.
    pub fn try_recursive<F, E>(name: impl Into<String>, build: F) -> Result<Type, E>
    where
        F: FnOnce(Type) -> Result<Type, E>,
        E: From<DescriptorError>,
    {
        let name = name.into();
        let mut failure = None;
        let alias = Arc::new_cyclic(|weak: &Weak<TypeAlias>| {
            let reference = Type::Reference(Arc::new(TypeReference {
                name: name.clone(),
                target: weak.clone(),
            }));
            let inner = match build(reference) {
                Ok(inner) if reaches_unguarded(&inner, weak) => {
                    failure = Some(E::from(DescriptorError::UnguardedRecursion(name.clone())));
                    Type::any()
                }
                Ok(inner) => inner,
                Err(error) => {
                    failure = Some(error);
                    Type::any()
                }
            };
            TypeAlias { name, inner }
        });
        match failure {
            Some(error) => Err(error),
            None => Ok(Type::Alias(alias)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inner(&self) -> &Type {
        &self.inner
    }

    /// Declaration syntax: `type Name = body;`.
    pub fn declaration(&self) -> String {
        format!("type {} = {};", self.name, self.inner)
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        self.inner.errors(ctx, path, input)
    }

    pub fn accepts(&self, ctx: &Validation, input: &Value) -> bool {
        self.inner.accepts_with(ctx, input)
    }

    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        if let Type::Reference(reference) = other {
            if reference.points_to(self) {
                return TypeRelation::Equivalent;
            }
        }
        compare_types(&self.inner, other)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "typeName": "TypeAlias",
            "name": self.name,
            "type": self.inner.to_json(),
        })
    }
}

/// True if `ty` can reach a reference to `alias` while validating the same
/// input, i.e. without an object, array or function in between.
fn reaches_unguarded(ty: &Type, alias: &Weak<TypeAlias>) -> bool {
    match ty {
        Type::Reference(reference) => Weak::ptr_eq(&reference.target, alias),
        Type::Union(union) => union.types().iter().any(|t| reaches_unguarded(t, alias)),
        Type::Intersection(intersection) => intersection.types().iter().any(|t| reaches_unguarded(t, alias)),
        Type::Nullable(nullable) => reaches_unguarded(nullable.inner(), alias),
        Type::Constrained(constrained) => reaches_unguarded(constrained.inner(), alias),
        Type::Alias(nested) => reaches_unguarded(nested.inner(), alias),
        Type::Property(property) => reaches_unguarded(property.value(), alias),
        _ => false,
    }
}

impl fmt::Display for TypeAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Weak back-edge to an enclosing [`TypeAlias`].
#[derive(Debug)]
pub struct TypeReference {
    name: String,
    target: Weak<TypeAlias>,
}

impl TypeReference {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alias, if it is still alive.
    pub fn target(&self) -> Option<Arc<TypeAlias>> {
        self.target.upgrade()
    }

    fn points_to(&self, alias: &TypeAlias) -> bool {
        std::ptr::eq(self.target.as_ptr(), alias)
    }

    pub fn errors<'a>(self: &Arc<Self>, ctx: &'a Validation, path: IdentifierPath, input: Value) -> ErrorIter<'a> {
        match self.target() {
            Some(alias) => alias.inner.errors(ctx, path, input),
            None => one_error(ctx.error(
                path,
                &Type::Reference(Arc::clone(self)),
                ErrorCode::UnresolvedType,
                &[&self.name],
            )),
        }
    }

    pub fn accepts(&self, ctx: &Validation, input: &Value) -> bool {
        self.target()
            .is_some_and(|alias| alias.inner.accepts_with(ctx, input))
    }

    /// References to the same alias are equivalent; anything else is
    /// compared against the alias body.
    pub fn compare_with(&self, other: &Type) -> TypeRelation {
        if let Type::Reference(other) = other {
            return if Weak::ptr_eq(&self.target, &other.target) {
                TypeRelation::Equivalent
            } else {
                TypeRelation::Incompatible
            };
        }
        match self.target() {
            Some(alias) => compare_types(&alias.inner, other),
            None => TypeRelation::Incompatible,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "typeName": "TypeReference", "name": self.name })
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
