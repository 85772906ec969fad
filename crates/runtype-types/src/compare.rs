//! # Subtype Ordering
//!
//! [`compare_types`] relates two descriptors:
//!
//! | Result | Meaning |
//! |---|---|
//! | [`TypeRelation::Subsumes`] (`1`) | `a` accepts a structural superset of what `b` accepts |
//! | [`TypeRelation::Equivalent`] (`0`) | `a` and `b` are structurally equivalent |
//! | [`TypeRelation::Incompatible`] (`-1`) | unrelated, or `b` is broader |
//!
//! The order is partial and best-effort. It is not guaranteed transitive or
//! antisymmetric across every pair of variants. Treat `Incompatible`
//! conservatively: it implies neither disjointness nor overlap.

use serde::Serialize;

use crate::types::Type;

/// Result of [`compare_types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeRelation {
    Subsumes,
    Equivalent,
    Incompatible,
}

impl TypeRelation {
    /// The `1 / 0 / -1` encoding.
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Subsumes => 1,
            Self::Equivalent => 0,
            Self::Incompatible => -1,
        }
    }
}

/// Compare `a` against `b`.
///
/// Identical handles are equivalent. An alias on the right is unwrapped
/// before delegation. `any` subsumes everything and is subsumed only by
/// `any`. Everything else is decided by `a`'s own `compare_with`.
pub fn compare_types(a: &Type, b: &Type) -> TypeRelation {
    if a.same_as(b) {
        return TypeRelation::Equivalent;
    }
    let mut b = b.clone();
    while let Type::Alias(alias) = &b {
        let inner = alias.inner().clone();
        b = inner;
    }
    if a.same_as(&b) {
        return TypeRelation::Equivalent;
    }
    match (a, &b) {
        (Type::Any(_), Type::Any(_)) => TypeRelation::Equivalent,
        (Type::Any(_), _) => TypeRelation::Subsumes,
        (_, Type::Any(_)) => TypeRelation::Incompatible,
        _ => a.compare_with(&b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectTypeProperty;

    #[test]
    fn test_identity_is_equivalent() {
        let t = Type::object([ObjectTypeProperty::new("a", Type::string())]);
        assert_eq!(compare_types(&t, &t), TypeRelation::Equivalent);
        let c = Type::number().constrain("N", []);
        assert_eq!(compare_types(&c, &c), TypeRelation::Equivalent);
    }

    #[test]
    fn test_any_at_the_top() {
        assert_eq!(compare_types(&Type::any(), &Type::string()), TypeRelation::Subsumes);
        assert_eq!(compare_types(&Type::any(), &Type::any()), TypeRelation::Equivalent);
        assert_eq!(compare_types(&Type::string(), &Type::any()), TypeRelation::Incompatible);
    }

    #[test]
    fn test_right_alias_is_unwrapped() {
        let alias = Type::alias("S", Type::string_literal("x"));
        assert_eq!(compare_types(&Type::string(), &alias), TypeRelation::Subsumes);
        let any = Type::alias("Anything", Type::any());
        assert_eq!(compare_types(&Type::string(), &any), TypeRelation::Incompatible);
    }

    #[test]
    fn test_literal_below_primitive() {
        assert_eq!(compare_types(&Type::string(), &Type::string_literal("a")), TypeRelation::Subsumes);
        assert_eq!(compare_types(&Type::string_literal("a"), &Type::string()), TypeRelation::Incompatible);
        assert_eq!(compare_types(&Type::null(), &Type::null()), TypeRelation::Equivalent);
    }

    #[test]
    fn test_relation_encoding() {
        assert_eq!(TypeRelation::Subsumes.as_i8(), 1);
        assert_eq!(TypeRelation::Equivalent.as_i8(), 0);
        assert_eq!(TypeRelation::Incompatible.as_i8(), -1);
    }
}
