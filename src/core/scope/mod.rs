//! core::scope
//!
//! Nested naming contexts.
//!
//! # Model
//!
//! A [`ScopeStack`] holds the active [`Scope`]s of one execution context,
//! outermost first. Scopes are entered with [`ScopeStack::enter`], which
//! returns a [`ScopeGuard`]; dropping the guard exits the scope. Exits happen
//! in strict reverse order of entry, including when the body returns early
//! with an error or unwinds from a panic.
//!
//! The active scopes produce a qualified name for a leaf:
//!
//! ```
//! use namescope::core::scope::{Scope, ScopeStack};
//!
//! let stack = ScopeStack::new();
//! let _model = stack.enter(Scope::named("model"));
//! let _anonymous = stack.enter(Scope::anonymous());
//! let _layer = stack.enter(Scope::named("layer"));
//!
//! assert_eq!(stack.qualified_name(Some("weight")).as_deref(), Some("model/layer/weight"));
//! ```
//!
//! # Ambient Stacks
//!
//! [`context`] keeps one stack per thread and per tokio task for code that
//! does not thread a `ScopeStack` through its calls.
//!
//! # Invariants
//!
//! - The stack is never popped while empty
//! - Only the innermost scope can exit
//! - A `ScopeStack` is never shared between execution contexts (`!Sync`)

pub mod context;

pub use context::{
    current_chain, current_context, depth, enter, isolated, qualified_name, scoped, task_scope,
    with_current, ContextKind, LocalScopeGuard,
};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use thiserror::Error;

/// Attribute read by [`ScopeStack::qualified_name`].
pub const NAME_ATTRIBUTE: &str = "name";

/// Errors from scope release.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("scope stack underflow: scope {0} exited with no active scope")]
    Underflow(ScopeId),

    #[error("scope {exited} exited out of order: innermost active scope is {innermost}")]
    OutOfOrder { exited: ScopeId, innermost: ScopeId },

    #[error("scope {0} belongs to a different scope stack")]
    ForeignGuard(ScopeId),
}

/// Identifier of an entered scope.
///
/// Identifiers are unique across all stacks in the process, so a guard can
/// never release a frame of another stack by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attributes of one naming context.
///
/// `name` is the segment contributed to qualified names. Anything else goes
/// into the extension map and is reachable through [`Scope::get`]. Empty
/// values read as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Scope {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            extra: BTreeMap::new(),
        }
    }

    /// A scope that contributes nothing to qualified names.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Set an attribute. `"name"` sets the typed name field.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if key == NAME_ATTRIBUTE {
            self.name = Some(value.into());
        } else {
            self.extra.insert(key, value.into());
        }
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Look up an attribute; unset and empty values are `None`.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        if attribute == NAME_ATTRIBUTE {
            self.name()
        } else {
            self.extra
                .get(attribute)
                .map(String::as_str)
                .filter(|value| !value.is_empty())
        }
    }
}

impl From<&str> for Scope {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

#[derive(Debug)]
struct Frame {
    id: ScopeId,
    scope: Scope,
    /// Exit was requested while inner scopes were active; the frame goes
    /// as soon as it is innermost.
    detached: bool,
}

/// The active scopes of one execution context, outermost first.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: RefCell<Vec<Frame>>,
}

impl ScopeStack {
    pub const fn new() -> Self {
        Self {
            frames: RefCell::new(Vec::new()),
        }
    }

    /// Enter a scope. It stays active until the returned guard is dropped
    /// or explicitly exited.
    #[must_use = "the scope exits as soon as the guard is dropped"]
    pub fn enter(&self, scope: Scope) -> ScopeGuard<'_> {
        let id = self.push(scope);
        ScopeGuard {
            stack: self,
            id,
            released: false,
        }
    }

    /// Enter several scopes, outermost first. The returned guards exit them
    /// innermost first.
    #[must_use = "the scopes exit as soon as the guards are dropped"]
    pub fn enter_all<I>(&self, scopes: I) -> ScopeGuards<'_>
    where
        I: IntoIterator,
        I::Item: Into<Scope>,
    {
        ScopeGuards {
            guards: scopes
                .into_iter()
                .map(|scope| self.enter(scope.into()))
                .collect(),
        }
    }

    /// Run `f` inside a scope; the scope exits when `f` returns or unwinds.
    pub fn scoped<R>(&self, scope: Scope, f: impl FnOnce(&Self) -> R) -> R {
        let _guard = self.enter(scope);
        f(self)
    }

    /// Exit the scope held by `guard`.
    ///
    /// # Errors
    ///
    /// - `ScopeError::ForeignGuard` if the guard was issued by another stack.
    ///   The scope is still exited on the stack that issued it.
    /// - `ScopeError::OutOfOrder` if it is not the innermost scope. The scope
    ///   is detached and exits together with the last scope entered after it.
    /// - `ScopeError::Underflow` if no scope is active
    pub fn exit(&self, guard: ScopeGuard<'_>) -> Result<Scope, ScopeError> {
        if !std::ptr::eq(guard.stack, self) {
            let owner = guard.stack;
            let id = guard.defuse();
            if let Err(err) = owner.release(id) {
                tracing::debug!(scope = %id, error = %err, "foreign guard release deferred");
            }
            return Err(ScopeError::ForeignGuard(id));
        }
        guard.exit()
    }

    /// Number of active scopes.
    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    /// Copies of the active scopes, outermost first.
    pub fn snapshot(&self) -> Vec<Scope> {
        self.frames
            .borrow()
            .iter()
            .map(|frame| frame.scope.clone())
            .collect()
    }

    /// Values of `attribute` for each active scope, outermost first, followed
    /// by `leaf`.
    ///
    /// With `drop_none`, unset values (and an absent leaf) are skipped, so
    /// every returned entry is `Some`.
    pub fn current_chain(
        &self,
        attribute: &str,
        leaf: Option<&str>,
        drop_none: bool,
    ) -> Vec<Option<String>> {
        self.current_chain_filtered(attribute, leaf, drop_none, |_| true)
    }

    /// Like [`ScopeStack::current_chain`], reading only the scopes accepted
    /// by `predicate`. The leaf is not subject to the predicate.
    pub fn current_chain_filtered(
        &self,
        attribute: &str,
        leaf: Option<&str>,
        drop_none: bool,
        predicate: impl Fn(&Scope) -> bool,
    ) -> Vec<Option<String>> {
        let frames = self.frames.borrow();
        let mut chain: Vec<Option<String>> = frames
            .iter()
            .filter(|frame| predicate(&frame.scope))
            .map(|frame| frame.scope.get(attribute).map(str::to_string))
            .filter(|value| !drop_none || value.is_some())
            .collect();

        // An empty leaf is unset, so `a` + "" gives "a" rather than "a/".
        let leaf = leaf.filter(|leaf| !leaf.is_empty()).map(str::to_string);
        if leaf.is_some() || !drop_none {
            chain.push(leaf);
        }
        chain
    }

    /// Active scope names and `leaf` joined by `/`.
    ///
    /// Returns `None` when nothing remains after dropping unnamed scopes and
    /// an absent or empty leaf.
    pub fn qualified_name(&self, leaf: Option<&str>) -> Option<String> {
        let segments: Vec<String> = self
            .current_chain(NAME_ATTRIBUTE, leaf, true)
            .into_iter()
            .flatten()
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }

    pub(crate) fn push(&self, scope: Scope) -> ScopeId {
        let id = ScopeId::next();
        let mut frames = self.frames.borrow_mut();
        tracing::trace!(
            scope = %id,
            name = scope.name().unwrap_or_default(),
            depth = frames.len() + 1,
            "enter scope"
        );
        frames.push(Frame {
            id,
            scope,
            detached: false,
        });
        id
    }

    /// Pop the frame `id` if it is innermost, along with any detached frames
    /// it uncovers. Otherwise the frame is detached and `OutOfOrder` returned.
    pub(crate) fn release(&self, id: ScopeId) -> Result<Scope, ScopeError> {
        let mut frames = self.frames.borrow_mut();
        let innermost = frames.last().ok_or(ScopeError::Underflow(id))?.id;
        if innermost != id {
            if let Some(frame) = frames.iter_mut().find(|frame| frame.id == id) {
                frame.detached = true;
                tracing::debug!(scope = %id, innermost = %innermost, "scope detached");
            }
            return Err(ScopeError::OutOfOrder {
                exited: id,
                innermost,
            });
        }

        let frame = frames.pop().ok_or(ScopeError::Underflow(id))?;
        tracing::trace!(scope = %id, depth = frames.len(), "exit scope");

        while frames.last().is_some_and(|frame| frame.detached) {
            if let Some(detached) = frames.pop() {
                tracing::trace!(scope = %detached.id, depth = frames.len(), "exit detached scope");
            }
        }
        Ok(frame.scope)
    }
}

/// Releases a scope on drop.
///
/// # Panics
///
/// Dropping a guard that is not the innermost active scope is a programmer
/// error and panics. During an unwind the failure is logged instead. Either
/// way the scope exits together with the scopes entered after it.
#[derive(Debug)]
pub struct ScopeGuard<'a> {
    stack: &'a ScopeStack,
    id: ScopeId,
    released: bool,
}

impl ScopeGuard<'_> {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Exit now, reporting ordering violations instead of panicking.
    ///
    /// # Errors
    ///
    /// See [`ScopeStack::exit`]. An out-of-order scope stays active until the
    /// scopes entered after it have exited.
    pub fn exit(self) -> Result<Scope, ScopeError> {
        let stack = self.stack;
        let id = self.defuse();
        stack.release(id)
    }

    fn defuse(mut self) -> ScopeId {
        self.released = true;
        self.id
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            if let Err(err) = self.stack.release(self.id) {
                release_failed(&err);
            }
        }
    }
}

/// Guards from [`ScopeStack::enter_all`], released innermost first.
#[derive(Debug)]
pub struct ScopeGuards<'a> {
    guards: Vec<ScopeGuard<'a>>,
}

impl ScopeGuards<'_> {
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Drop for ScopeGuards<'_> {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

/// Implicit release failed: fatal unless already unwinding.
pub(crate) fn release_failed(err: &ScopeError) {
    if std::thread::panicking() {
        tracing::error!(error = %err, "scope release failed during unwind");
    } else {
        panic!("{err}");
    }
}
