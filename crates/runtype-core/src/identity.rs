//! # Identity Primitives
//!
//! Newtype wrappers for the two kinds of identity the validator reasons about:
//!
//! - [`Symbol`] — an opaque, symbol-like property key. Two symbols are equal
//!   only if they are the same symbol, regardless of description.
//! - [`ValueId`] — the identity of a shared runtime value (object, array,
//!   map or function). Used as a non-owning key by the cyclic guard.
//!
//! ## Invariant
//!
//! Holding a `ValueId` never keeps the value alive and never changes its
//! identity. It is only meaningful while the value it was taken from is
//! reachable from the root input of a validation call.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Opaque symbol-like identifier usable as a property key.
///
/// Symbols are `Send + Sync` so they can appear inside descriptor graphs,
/// which are shared across threads.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolInner>);

struct SymbolInner {
    id: Uuid,
    description: String,
}

impl Symbol {
    /// Create a fresh symbol. Every call yields a distinct symbol.
    pub fn new(description: impl Into<String>) -> Self {
        Self(Arc::new(SymbolInner {
            id: Uuid::new_v4(),
            description: description.into(),
        }))
    }

    /// The description given at construction.
    pub fn description(&self) -> &str {
        &self.0.description
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0.id
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0.description)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.0.description)
    }
}

/// Identity of a shared runtime value: the address of its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub usize);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value:{:#x}", self.0)
    }
}
