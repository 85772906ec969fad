//! # Error Types
//!
//! Errors raised by the value model itself. Validation failures are never
//! represented here: they are data (error tuples) collected by the
//! validation context in `runtype-types`.

use thiserror::Error;

/// Error rendering a [`Value`](crate::Value) as JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value graph contains a cycle.
    #[error("value contains a reference cycle and cannot be rendered as JSON")]
    Cyclic,

    /// The value has no JSON representation (`undefined`, functions, symbols).
    #[error("value of kind '{0}' has no JSON representation")]
    Unrepresentable(&'static str),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ValueError {
    fn from(e: serde_json::Error) -> Self {
        ValueError::Serialization(e.to_string())
    }
}
