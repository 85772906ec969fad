//! # runtype-core — Runtime Value Model
//!
//! The leaf crate of the workspace. It defines the untyped data that type
//! descriptors validate, and the paths that locate values inside it. Every
//! other crate in the workspace depends on `runtype-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Identity is explicit.** Objects, arrays, maps and functions are
//!    shared handles; [`Value::identity`] exposes a non-owning [`ValueId`]
//!    so self-referential data can be validated without infinite recursion.
//!
//! 2. **Absent is not undefined.** [`Value::get`] reads like a property
//!    access, [`Value::has`] answers presence. Descriptors need both to tell
//!    "missing property" from "present but undefined".
//!
//! 3. **Static members are an explicit container.** A class instance carries
//!    its constructor; static properties live on the constructor, and
//!    descriptors select which container to read from.
//!
//! 4. **Paths are data.** [`IdentifierPath`] is a plain `Vec` of
//!    [`PathSegment`]s, prefix-comparable with [`match_path`] and rendered
//!    with [`stringify_path`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `runtype-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod json;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::ValueError;
pub use identity::{Symbol, ValueId};
pub use path::{
    match_path, resolve_path, stringify_path, IdentifierPath, PathSegment, PropertyKey,
    RETURN_TYPE_LABEL, RETURN_TYPE_MARKER, ROOT_LABEL,
};
pub use value::{ArrayRef, FunctionRef, MapRef, ObjectRef, Value};
