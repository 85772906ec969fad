//! # Validation Context
//!
//! One [`Validation`] exists per top-level validate call. It owns:
//!
//! - the root input, so reports can resolve the offending value by path;
//! - the root path and prefix used when rendering reports;
//! - the append-only list of [`ErrorTuple`]s for this call;
//! - the cyclic guard: a table of (descriptor, value) pairs currently being
//!   descended into.
//!
//! ## Cyclic Guard
//!
//! Recursive descriptors (objects, arrays) consult the guard before
//! descending into a value. Re-entering the same value under the same
//! descriptor is treated as already valid, which guarantees termination on
//! self-referential data. Membership is released by a scope guard on every
//! exit path, including a consumer dropping a half-drained error iterator,
//! so marks never leak into sibling branches or later calls.
//!
//! The table stores addresses only ([`TypeIdentity`], [`ValueId`]); it never
//! keeps a descriptor or a value alive.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use runtype_core::{match_path, resolve_path, IdentifierPath, PathSegment, Value, ValueId};

use crate::messages::{DefaultCatalog, ErrorCode, MessageCatalog};
use crate::types::{Type, TypeIdentity};

/// Lazy, finite, restartable sequence of error tuples.
pub type ErrorIter<'a> = Box<dyn Iterator<Item = ErrorTuple> + 'a>;

/// One reason an input fails: where, why, and which descriptor said so.
#[derive(Debug, Clone)]
pub struct ErrorTuple {
    /// Location relative to the root input.
    pub path: IdentifierPath,
    /// Rendered message.
    pub message: String,
    /// The descriptor that reported the mismatch.
    pub expected: Type,
    /// Invariant identifier of the mismatch.
    pub code: ErrorCode,
}

impl ErrorTuple {
    pub fn new(
        path: IdentifierPath,
        message: impl Into<String>,
        expected: Type,
        code: ErrorCode,
    ) -> Self {
        Self {
            path,
            message: message.into(),
            expected,
            code,
        }
    }
}

/// Per-call validation state.
pub struct Validation {
    input: Value,
    /// Root path prepended to every error path when rendering.
    pub path: IdentifierPath,
    /// Text prepended to aggregate reports.
    pub prefix: String,
    /// Errors collected by the traversal, in traversal order.
    pub errors: Vec<ErrorTuple>,
    catalog: Arc<dyn MessageCatalog>,
    cyclic: RefCell<HashMap<TypeIdentity, HashSet<ValueId>>>,
}

impl Validation {
    /// Fresh context over `input` using the built-in message catalog.
    pub fn new(input: Value) -> Self {
        Self::with_catalog(input, Arc::new(DefaultCatalog))
    }

    /// Fresh context over `input` rendering messages from `catalog`.
    pub fn with_catalog(input: Value, catalog: Arc<dyn MessageCatalog>) -> Self {
        Self {
            input,
            path: Vec::new(),
            prefix: String::new(),
            errors: Vec::new(),
            catalog,
            cyclic: RefCell::new(HashMap::new()),
        }
    }

    /// The root input of this call.
    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn catalog(&self) -> &dyn MessageCatalog {
        self.catalog.as_ref()
    }

    /// Render the message for `code`.
    pub fn message(&self, code: ErrorCode, params: &[&str]) -> String {
        self.catalog.message(code, params)
    }

    /// Build an error tuple with a catalog-rendered message.
    pub fn error(
        &self,
        path: IdentifierPath,
        expected: &Type,
        code: ErrorCode,
        params: &[&str],
    ) -> ErrorTuple {
        ErrorTuple::new(path, self.message(code, params), expected.clone(), code)
    }

    // ─── Cyclic guard ────────────────────────────────────────────────

    /// Whether `input` is currently being validated by `ty`.
    pub fn in_cycle(&self, ty: &Type, input: &Value) -> bool {
        match input.identity() {
            Some(id) => self.in_cycle_id(ty.identity(), id),
            None => false,
        }
    }

    fn in_cycle_id(&self, ty: TypeIdentity, id: ValueId) -> bool {
        self.cyclic
            .borrow()
            .get(&ty)
            .is_some_and(|tracked| tracked.contains(&id))
    }

    /// Mark `input` as being validated by `ty`. Primitives are never tracked.
    pub fn start_cycle(&self, ty: &Type, input: &Value) {
        if let Some(id) = input.identity() {
            self.start_cycle_id(ty.identity(), id);
        }
    }

    fn start_cycle_id(&self, ty: TypeIdentity, id: ValueId) {
        self.cyclic.borrow_mut().entry(ty).or_default().insert(id);
    }

    /// Release the mark set by [`start_cycle`](Self::start_cycle).
    pub fn end_cycle(&self, ty: &Type, input: &Value) {
        if let Some(id) = input.identity() {
            self.end_cycle_id(ty.identity(), id);
        }
    }

    fn end_cycle_id(&self, ty: TypeIdentity, id: ValueId) {
        let mut cyclic = self.cyclic.borrow_mut();
        if let Some(tracked) = cyclic.get_mut(&ty) {
            tracked.remove(&id);
            if tracked.is_empty() {
                cyclic.remove(&ty);
            }
        }
    }

    /// Enter the guarded region for (`ty`, `input`).
    ///
    /// Returns `None` if the pair is already being validated; the caller
    /// must then treat the value as valid and stop. Otherwise the returned
    /// guard releases the mark when dropped.
    pub(crate) fn enter_cycle(&self, ty: TypeIdentity, input: &Value) -> Option<CycleGuard<'_>> {
        let Some(id) = input.identity() else {
            return Some(CycleGuard { ctx: self, key: None });
        };
        if self.in_cycle_id(ty, id) {
            tracing::trace!(descriptor = ?ty, value = %id, "cyclic guard short-circuit");
            return None;
        }
        self.start_cycle_id(ty, id);
        Some(CycleGuard {
            ctx: self,
            key: Some((ty, id)),
        })
    }

    // ─── Error list ──────────────────────────────────────────────────

    /// Any error at all.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Any error located at or below `path`.
    pub fn has_errors_at(&self, path: &[PathSegment]) -> bool {
        self.errors.iter().any(|e| match_path(path, &e.path))
    }

    /// Append a free-form error. Chainable.
    pub fn add_error(
        &mut self,
        path: IdentifierPath,
        expected: Type,
        message: impl Into<String>,
    ) -> &mut Self {
        self.errors.push(ErrorTuple::new(
            path,
            message,
            expected,
            ErrorCode::ConstraintViolation,
        ));
        self
    }

    /// Drop every error. Returns whether there were any.
    pub fn clear_errors(&mut self) -> bool {
        let had_errors = !self.errors.is_empty();
        self.errors.clear();
        had_errors
    }

    /// Drop errors located at or below `path`. Returns whether any were removed.
    pub fn clear_errors_at(&mut self, path: &[PathSegment]) -> bool {
        let before = self.errors.len();
        self.errors.retain(|e| !match_path(path, &e.path));
        self.errors.len() != before
    }

    /// Resolve `path` against the root input.
    pub fn resolve_path(&self, path: &[PathSegment]) -> Value {
        resolve_path(&self.input, path)
    }

    /// Transport-suitable rendering of the error list.
    pub fn to_json(&self) -> serde_json::Value {
        crate::report::make_json_error(self)
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("path", &self.path)
            .field("prefix", &self.prefix)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

/// Releases a cyclic-guard mark when dropped.
pub(crate) struct CycleGuard<'a> {
    ctx: &'a Validation,
    key: Option<(TypeIdentity, ValueId)>,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if let Some((ty, id)) = self.key.take() {
            self.ctx.end_cycle_id(ty, id);
        }
    }
}

// ─── Iterator combinators ────────────────────────────────────────────

/// Run `body` inside the cyclic guard for (`ty`, `input`).
///
/// The guard is entered on the first pull, not at construction, and
/// released when the body is exhausted or the iterator is dropped.
pub(crate) fn cycle_scoped<'a, F>(
    ctx: &'a Validation,
    ty: &Type,
    input: &Value,
    body: F,
) -> ErrorIter<'a>
where
    F: FnOnce() -> ErrorIter<'a> + 'a,
{
    Box::new(CycleScoped {
        ctx,
        ty: ty.identity(),
        input: input.clone(),
        body: Some(body),
        running: None,
    })
}

struct CycleScoped<'a, F> {
    ctx: &'a Validation,
    ty: TypeIdentity,
    input: Value,
    body: Option<F>,
    // Field order matters: the inner iterator drops before the guard.
    running: Option<(ErrorIter<'a>, CycleGuard<'a>)>,
}

impl<'a, F> Iterator for CycleScoped<'a, F>
where
    F: FnOnce() -> ErrorIter<'a>,
{
    type Item = ErrorTuple;

    fn next(&mut self) -> Option<ErrorTuple> {
        if let Some(body) = self.body.take() {
            let guard = self.ctx.enter_cycle(self.ty, &self.input)?;
            self.running = Some((body(), guard));
        }
        let (inner, _) = self.running.as_mut()?;
        let next = inner.next();
        if next.is_none() {
            self.running = None;
        }
        next
    }
}

/// Yield `structural`; only if it yielded nothing, continue with `refinement`.
pub(crate) fn refine_after<'a, F>(structural: ErrorIter<'a>, refinement: F) -> ErrorIter<'a>
where
    F: FnOnce() -> ErrorIter<'a> + 'a,
{
    Box::new(RefineAfter {
        current: structural,
        yielded: false,
        refinement: Some(refinement),
    })
}

struct RefineAfter<'a, F> {
    current: ErrorIter<'a>,
    yielded: bool,
    refinement: Option<F>,
}

impl<'a, F> Iterator for RefineAfter<'a, F>
where
    F: FnOnce() -> ErrorIter<'a>,
{
    type Item = ErrorTuple;

    fn next(&mut self) -> Option<ErrorTuple> {
        loop {
            if let Some(error) = self.current.next() {
                self.yielded = true;
                return Some(error);
            }
            match self.refinement.take() {
                Some(refine) if !self.yielded => self.current = refine(),
                _ => return None,
            }
        }
    }
}

/// Build the sequence on first pull.
pub(crate) fn deferred<'a, F>(build: F) -> ErrorIter<'a>
where
    F: FnOnce() -> ErrorIter<'a> + 'a,
{
    Box::new(std::iter::once_with(build).flatten())
}

/// Empty error sequence.
pub(crate) fn no_errors<'a>() -> ErrorIter<'a> {
    Box::new(std::iter::empty())
}

/// Single-error sequence.
pub(crate) fn one_error<'a>(error: ErrorTuple) -> ErrorIter<'a> {
    Box::new(std::iter::once(error))
}
