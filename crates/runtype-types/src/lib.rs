//! # runtype-types — Runtime Type Descriptors
//!
//! Compose reusable type descriptors once, then validate untyped
//! [`Value`](runtype_core::Value)s against them and get path-located error
//! reports instead of a single opaque failure.
//!
//! ```
//! use runtype_core::Value;
//! use runtype_types::{ObjectTypeProperty, Type};
//!
//! let a = Type::object([ObjectTypeProperty::new("a", Type::number())]);
//! let b = Type::object([ObjectTypeProperty::new("b", Type::string())]);
//! let c = Type::alias("C", Type::intersection([a, b]));
//!
//! assert!(c.accepts(&Value::object([("a", Value::from(123)), ("b", Value::from("foo bar"))])));
//!
//! let error = c
//!     .assert(Value::object([("a", Value::from(123)), ("b", Value::from(0))]))
//!     .unwrap_err();
//! assert!(error.message().starts_with("C.b must be a string"));
//! ```
//!
//! ## Components
//!
//! - [`types`] — the descriptor algebra: [`Type`] and its variants.
//! - [`validation`] — the per-call context: error list, root path, cyclic
//!   guard.
//! - [`compare`] — the subtype order between descriptors.
//! - [`constraint`] — named refinement predicates.
//! - [`messages`] — error codes and the message catalog.
//! - [`report`] — thrown, warned and JSON reports.
//! - [`codec`] — rebuilding descriptors from their JSON/YAML documents.
//!
//! ## Key Design Principles
//!
//! 1. **Errors are lazy.** `errors` returns an iterator. `accepts` stops at
//!    the first failure; `validate` and `assert` drain everything. The
//!    order is deterministic: declared property and member order.
//!
//! 2. **Descriptors are immutable and shared.** A `Type` is an `Arc`
//!    handle, `Send + Sync`, never mutated by validation. Only the
//!    per-call [`Validation`] changes.
//!
//! 3. **Self-reference terminates.** Object and array descriptors consult
//!    the cyclic guard before descending; recursive descriptors hold their
//!    alias weakly.
//!
//! 4. **Structure before refinement.** Constraints run only against values
//!    that already validated structurally.
//!
//! ## Crate Policy
//!
//! - Structural mismatches are data, never `Err`. Only `assert` and the
//!   codec return errors.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.
//! - No logging subscriber is installed here; diagnostics go through
//!   `tracing`.

pub mod codec;
pub mod compare;
pub mod constraint;
pub mod error;
pub mod messages;
pub mod report;
pub mod types;
pub mod validate;
pub mod validation;

// Re-export primary types for ergonomic imports.
pub use codec::{type_from_json, type_from_json_str, type_from_yaml_str};
pub use compare::{compare_types, TypeRelation};
pub use constraint::{Constraint, ConstraintRegistry};
pub use error::{DescriptorError, RuntimeTypeError};
pub use messages::{DefaultCatalog, ErrorCode, MessageCatalog, TemplateCatalog};
pub use report::{make_json_error, make_type_error, make_warning_message, type_of, ReportEntry};
pub use types::{
    AnyType, ArrayType, BooleanLiteralType, BooleanType, ConstrainedType, FunctionType,
    FunctionTypeParam, IntersectionType, NullLiteralType, NullableType, NumberLiteralType,
    NumberType, ObjectType, ObjectTypeProperty, StringLiteralType, StringType, SymbolType, Type,
    TypeAlias, TypeDescriptor, TypeIdentity, TypeReference, UnionType, VoidType,
};
pub use validate::ValidateOptions;
pub use validation::{ErrorIter, ErrorTuple, Validation};
