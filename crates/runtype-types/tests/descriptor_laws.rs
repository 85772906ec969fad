//! # Descriptor Laws
//!
//! Property tests over randomly composed descriptors and values:
//!
//! 1. `accepts` agrees with a full `validate`.
//! 2. Taking only the first error agrees with draining all of them.
//! 3. When `compare_types(a, b)` says `a` subsumes `b`, every value `b`
//!    accepts is accepted by `a`.
//! 4. Validation is deterministic.

use proptest::prelude::*;
use runtype_core::Value;
use runtype_types::{compare_types, ObjectTypeProperty, Type, TypeRelation, Validation};

const KEYS: [&str; 3] = ["a", "b", "c"];

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-3i32..3).prop_map(Value::from),
        prop::sample::select(vec!["", "a", "on"]).prop_map(|s| Value::from(s)),
        (0usize..3).prop_map(|arity| Value::function("f", arity)),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|items| Value::array(items)),
            prop::collection::vec((prop::sample::select(KEYS.to_vec()), inner), 0..4)
                .prop_map(|entries| Value::object(entries)),
        ]
    })
}

fn arb_type() -> impl Strategy<Value = Type> {
    let leaf = prop_oneof![
        Just(Type::any()),
        Just(Type::void()),
        Just(Type::null()),
        Just(Type::boolean()),
        Just(Type::number()),
        Just(Type::string()),
        any::<bool>().prop_map(Type::boolean_literal),
        (-3i32..3).prop_map(|n| Type::number_literal(f64::from(n))),
        prop::sample::select(vec!["", "a", "on"]).prop_map(|s| Type::string_literal(s)),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        let property = (prop::sample::select(KEYS.to_vec()), inner.clone(), any::<bool>()).prop_map(
            |(key, value, optional)| {
                let property = ObjectTypeProperty::new(key, value);
                if optional {
                    property.optional()
                } else {
                    property
                }
            },
        );
        prop_oneof![
            inner.clone().prop_map(Type::array),
            inner.clone().prop_map(Type::nullable),
            prop::collection::vec(inner.clone(), 1..3).prop_map(|types| Type::union(types)),
            prop::collection::vec(inner.clone(), 1..3).prop_map(|types| Type::intersection(types)),
            (prop::collection::vec(property, 0..3), any::<bool>()).prop_map(|(properties, exact)| {
                if exact {
                    Type::exact_object(properties)
                } else {
                    Type::object(properties)
                }
            }),
            inner.prop_map(|ty| Type::alias("T", ty)),
        ]
    })
}

proptest! {
    /// A fast yes/no answer matches the full error list.
    #[test]
    fn accepts_matches_validate(ty in arb_type(), value in arb_value()) {
        prop_assert_eq!(ty.accepts(&value), !ty.validate(&value).has_errors());
    }

    /// Stopping after the first error agrees with draining every error.
    #[test]
    fn first_error_matches_full_drain(ty in arb_type(), value in arb_value()) {
        let ctx = Validation::new(value.clone());
        let first = ty.errors(&ctx, Vec::new(), value.clone()).next();
        let all: Vec<_> = ty.errors(&ctx, Vec::new(), value).collect();
        prop_assert_eq!(first.is_some(), !all.is_empty());
        if let Some(first) = first {
            prop_assert_eq!(&first.path, &all[0].path);
            prop_assert_eq!(first.code, all[0].code);
        }
    }

    /// Repeated validation of the same input yields the same errors.
    #[test]
    fn validation_is_deterministic(ty in arb_type(), value in arb_value()) {
        let once = ty.validate(&value);
        let twice = ty.validate(&value);
        let render = |ctx: &Validation| -> Vec<(String, String)> {
            ctx.errors
                .iter()
                .map(|e| (format!("{:?}", e.path), e.message.clone()))
                .collect()
        };
        prop_assert_eq!(render(&once), render(&twice));
    }

    /// Subsumption never admits a value the wider side rejects.
    #[test]
    fn subsumption_is_sound(a in arb_type(), b in arb_type(), value in arb_value()) {
        if compare_types(&a, &b) == TypeRelation::Subsumes && b.accepts(&value) {
            prop_assert!(a.accepts(&value), "{} should accept what {} accepts", a, b);
        }
    }

    /// Every descriptor is equivalent to itself.
    #[test]
    fn compare_is_reflexive(ty in arb_type()) {
        prop_assert_eq!(compare_types(&ty, &ty), TypeRelation::Equivalent);
    }
}
