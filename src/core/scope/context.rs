//! core::scope::context
//!
//! Ambient scope stacks, one per execution context.
//!
//! # Contexts
//!
//! - **Task**: inside [`task_scope`] (or [`isolated`]), the stack belongs to
//!   that tokio task and follows it across worker threads.
//! - **Thread**: everywhere else, each thread has its own stack, created on
//!   first use.
//!
//! Contexts never see each other's scopes. A [`LocalScopeGuard`] remembers the
//! context it was created in and is `!Send`, so it is released where it was
//! acquired.
//!
//! # Example
//!
//! ```
//! use namescope::core::scope::{self, Scope};
//!
//! let name = scope::scoped(Scope::named("model"), || {
//!     let _layer = scope::enter(Scope::named("layer"));
//!     scope::qualified_name(Some("bias"))
//! });
//! assert_eq!(name.as_deref(), Some("model/layer/bias"));
//! assert_eq!(scope::qualified_name(None), None);
//! ```

use std::future::Future;
use std::marker::PhantomData;

use super::{release_failed, Scope, ScopeError, ScopeId, ScopeStack};

thread_local! {
    static THREAD_STACK: ScopeStack = const { ScopeStack::new() };
}

tokio::task_local! {
    static TASK_STACK: ScopeStack;
}

/// Which ambient stack an operation resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Thread,
    Task,
}

/// The context the calling code runs in.
pub fn current_context() -> ContextKind {
    if TASK_STACK.try_with(|_| ()).is_ok() {
        ContextKind::Task
    } else {
        ContextKind::Thread
    }
}

/// Run `f` against the stack of the current context.
pub fn with_current<R>(f: impl FnOnce(&ScopeStack) -> R) -> R {
    match current_context() {
        ContextKind::Task => TASK_STACK.with(f),
        ContextKind::Thread => THREAD_STACK.with(f),
    }
}

/// Run `future` with a fresh, task-private scope stack.
pub async fn task_scope<F: Future>(future: F) -> F::Output {
    TASK_STACK.scope(ScopeStack::new(), future).await
}

/// Run `f` with a fresh scope stack that shadows the thread's stack.
pub fn isolated<R>(f: impl FnOnce() -> R) -> R {
    TASK_STACK.sync_scope(ScopeStack::new(), f)
}

/// Enter a scope on the current context's stack.
#[must_use = "the scope exits as soon as the guard is dropped"]
pub fn enter(scope: Scope) -> LocalScopeGuard {
    let context = current_context();
    let id = with_current(|stack| stack.push(scope));
    LocalScopeGuard {
        context,
        id,
        released: false,
        _not_send: PhantomData,
    }
}

/// Run `f` inside a scope on the current context's stack.
pub fn scoped<R>(scope: Scope, f: impl FnOnce() -> R) -> R {
    let _guard = enter(scope);
    f()
}

/// See [`ScopeStack::qualified_name`].
pub fn qualified_name(leaf: Option<&str>) -> Option<String> {
    with_current(|stack| stack.qualified_name(leaf))
}

/// See [`ScopeStack::current_chain`].
pub fn current_chain(attribute: &str, leaf: Option<&str>, drop_none: bool) -> Vec<Option<String>> {
    with_current(|stack| stack.current_chain(attribute, leaf, drop_none))
}

/// Number of active scopes in the current context.
pub fn depth() -> usize {
    with_current(ScopeStack::depth)
}

fn release(context: ContextKind, id: ScopeId) -> Result<Scope, ScopeError> {
    let released = match context {
        ContextKind::Task => TASK_STACK.try_with(|stack| stack.release(id)).ok(),
        ContextKind::Thread => THREAD_STACK.try_with(|stack| stack.release(id)).ok(),
    };
    // The context's storage is gone (task scope ended, thread shutting down).
    released.unwrap_or(Err(ScopeError::Underflow(id)))
}

/// Releases an ambient scope on drop.
///
/// # Panics
///
/// Same rules as [`super::ScopeGuard`]: releasing anything but the innermost
/// scope of the originating context panics outside of an unwind.
#[derive(Debug)]
pub struct LocalScopeGuard {
    context: ContextKind,
    id: ScopeId,
    released: bool,
    _not_send: PhantomData<*const ()>,
}

impl LocalScopeGuard {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn context(&self) -> ContextKind {
        self.context
    }

    /// Exit now, reporting ordering violations instead of panicking.
    ///
    /// # Errors
    ///
    /// `ScopeError::OutOfOrder` detaches the scope; it exits together with
    /// the scopes entered after it. `ScopeError::Underflow` if the context
    /// that issued the guard is gone.
    pub fn exit(mut self) -> Result<Scope, ScopeError> {
        self.released = true;
        release(self.context, self.id)
    }
}

impl Drop for LocalScopeGuard {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            if let Err(err) = release(self.context, self.id) {
                release_failed(&err);
            }
        }
    }
}
