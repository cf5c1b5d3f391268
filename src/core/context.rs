//! Request-scoped logging context
//!
//! This module provides:
//! - `with_context` / `enter_context`: scoped context for synchronous code
//! - `ContextScope`: a future wrapper that carries a context across awaits
//! - `current_context` / `require_context`: accessors for the active context
//!
//! The active context is an immutable snapshot. Entering a scope merges the
//! patch over the enclosing snapshot (child keys win) and installs the result
//! for the scope's extent; leaving the scope reinstalls the enclosing one.

use super::error::{LoggerError, Result};
use super::field_value::Fields;
use pin_project_lite::pin_project;
use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

/// Shared, immutable context snapshot
pub type Context = Arc<Fields>;

thread_local! {
    // One entry per open scope, innermost last; `None` entries are scopes
    // that explicitly run without a context
    static SCOPES: RefCell<Vec<Option<Context>>> = const { RefCell::new(Vec::new()) };
}

fn merged_with_current(patch: Fields) -> Context {
    let mut merged = current_context()
        .map(|parent| (*parent).clone())
        .unwrap_or_default();
    merged.extend(patch);
    Arc::new(merged)
}

/// Get the current context, or `None` outside any context scope
pub fn current_context() -> Option<Context> {
    SCOPES.with(|scopes| scopes.borrow().last().cloned().flatten())
}

/// Get the current context, failing with [`LoggerError::NoContext`] outside
/// any context scope
pub fn require_context() -> Result<Context> {
    current_context().ok_or(LoggerError::NoContext)
}

/// RAII guard for a context scope
///
/// Leaves the scope when dropped, including during unwinding. Dropping a guard
/// also closes every scope entered after it, so dropping guards out of order
/// never leaves a stale context installed on the thread. The guard is `!Send`
/// so a scope cannot leave the thread it was entered on. Do not hold a guard
/// across an `.await`; wrap the future with [`ContextFutureExt`] instead.
#[must_use = "the context is left as soon as the guard is dropped"]
pub struct ContextGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl ContextGuard {
    fn install(context: Option<Context>) -> Self {
        let depth = SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            scopes.push(context);
            scopes.len() - 1
        });
        Self {
            depth,
            _not_send: PhantomData,
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        SCOPES.with(|scopes| scopes.borrow_mut().truncate(self.depth));
    }
}

/// Enter a context scope merged over the current one
///
/// # Example
///
/// ```
/// use rust_topic_logger::core::{current_context, enter_context};
/// use rust_topic_logger::fields;
///
/// {
///     let _guard = enter_context(fields! { "requestId" => "abc-123" });
///     assert!(current_context().is_some());
/// }
/// assert!(current_context().is_none());
/// ```
pub fn enter_context(patch: Fields) -> ContextGuard {
    ContextGuard::install(Some(merged_with_current(patch)))
}

/// Run `body` with `patch` merged over the current context
///
/// # Example
///
/// ```
/// use rust_topic_logger::core::{current_context, with_context};
/// use rust_topic_logger::fields;
///
/// with_context(fields! { "requestId" => "123" }, || {
///     with_context(fields! { "userId" => 42 }, || {
///         let context = current_context().unwrap();
///         assert_eq!(context.len(), 2);
///     });
/// });
/// ```
pub fn with_context<T, F>(patch: Fields, body: F) -> T
where
    F: FnOnce() -> T,
{
    let _guard = enter_context(patch);
    body()
}

pin_project! {
    /// Future that runs its inner future inside a fixed context snapshot
    ///
    /// The snapshot is installed for the duration of every `poll`, so the
    /// inner future observes it after each suspension regardless of which
    /// thread resumes it or what other tasks ran in between.
    #[must_use = "futures do nothing unless polled"]
    pub struct ContextScope<F> {
        #[pin]
        inner: F,
        context: Option<Context>,
    }
}

impl<F> ContextScope<F> {
    /// The snapshot this future runs in
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}

impl<F: Future> Future for ContextScope<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _guard = ContextGuard::install(this.context.clone());
        this.inner.poll(cx)
    }
}

/// Run `future` with `patch` merged over the context active right now
pub fn with_context_async<F: Future>(patch: Fields, future: F) -> ContextScope<F> {
    ContextScope {
        inner: future,
        context: Some(merged_with_current(patch)),
    }
}

/// Context propagation for futures
pub trait ContextFutureExt: Future + Sized {
    /// Run this future with `patch` merged over the current context
    fn with_context(self, patch: Fields) -> ContextScope<Self> {
        with_context_async(patch, self)
    }

    /// Carry the current context (or its absence) into this future, e.g.
    /// before handing it to a task spawner
    fn in_current_context(self) -> ContextScope<Self> {
        ContextScope {
            inner: self,
            context: current_context(),
        }
    }
}

impl<F: Future> ContextFutureExt for F {}
