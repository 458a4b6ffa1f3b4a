// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits: the application's view tree and its run loop.
//!
//! ## Overview
//!
//! The engine does not own views. It reaches them through [`ViewTree`], which
//! the host implements over whatever view storage it has. Callbacks are
//! optional: a view advertises the ones it implements through
//! [`ViewTree::capabilities`], and the engine only invokes those.
//!
//! Callbacks that need to change ownership (hand a touch to content, give it
//! back to an ancestor) queue requests through the [`TouchContext`] they are
//! handed. Requests run after the callback returns, inside the same batch.

use crate::context::TouchContext;
use crate::error::HandlerResult;
use crate::touch::Touch;
use crate::types::{Capabilities, DragResponse, StartResponse};

/// The application's view hierarchy as seen by touch dispatch.
///
/// Every callback receives the view it is addressed to; a single
/// implementation serves the whole tree.
pub trait ViewTree<K: Copy + Eq> {
    /// Next view in the responder chain (usually the parent), or `None` at
    /// the root.
    fn next_responder(&self, view: &K) -> Option<K>;

    /// Callbacks and properties `view` supports.
    fn capabilities(&self, view: &K) -> Capabilities;

    /// Flip the view's observable "has active touch" indicator.
    ///
    /// Called exactly once per transition in each direction.
    fn set_has_touch(&mut self, view: &K, has_touch: bool) {
        let _ = (view, has_touch);
    }

    /// Offered top-down before a new touch reaches its target. Return `true`
    /// to take the touch.
    fn capture_touch(
        &mut self,
        view: &K,
        touch: &Touch<K>,
        cx: &mut TouchContext<'_, K>,
    ) -> HandlerResult<bool> {
        let _ = (view, touch, cx);
        Ok(false)
    }

    /// Offered a touch that would make `view` its responder.
    fn touch_start(
        &mut self,
        view: &K,
        touch: &Touch<K>,
        cx: &mut TouchContext<'_, K>,
    ) -> HandlerResult<StartResponse<K>> {
        let _ = (view, touch, cx);
        Ok(StartResponse::Decline)
    }

    /// The `changed` touches moved. Every entry has `view` on its stack.
    fn touches_dragged(
        &mut self,
        view: &K,
        changed: &[&Touch<K>],
        cx: &mut TouchContext<'_, K>,
    ) -> HandlerResult<DragResponse> {
        let _ = (view, changed, cx);
        Ok(DragResponse::NoChange)
    }

    /// The touch lifted while `view` was its innermost responder.
    fn touch_end(
        &mut self,
        view: &K,
        touch: &Touch<K>,
        cx: &mut TouchContext<'_, K>,
    ) -> HandlerResult<()> {
        let _ = (view, touch, cx);
        Ok(())
    }

    /// The touch was cancelled, taken away, or ended while `view` sat below
    /// the innermost responder.
    fn touch_cancelled(
        &mut self,
        view: &K,
        touch: &Touch<K>,
        cx: &mut TouchContext<'_, K>,
    ) -> HandlerResult<()> {
        let _ = (view, touch, cx);
        Ok(())
    }

    /// The touch moved over `view`.
    fn touch_entered(
        &mut self,
        view: &K,
        touch: &Touch<K>,
        cx: &mut TouchContext<'_, K>,
    ) -> HandlerResult<()> {
        let _ = (view, touch, cx);
        Ok(())
    }

    /// The touch moved off `view`.
    fn touch_exited(
        &mut self,
        view: &K,
        touch: &Touch<K>,
        cx: &mut TouchContext<'_, K>,
    ) -> HandlerResult<()> {
        let _ = (view, touch, cx);
        Ok(())
    }
}

/// Begin/end boundary around a batch of state changes.
///
/// Observers of view properties fire once per batch rather than once per
/// change.
pub trait RunLoop {
    /// Open a batch.
    fn begin(&mut self);
    /// Close the batch opened by the matching [`begin`](RunLoop::begin) and
    /// flush observers.
    fn end(&mut self);
}

/// A run loop that does nothing, used when the host has no batching.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoRunLoop;

impl RunLoop for NoRunLoop {
    #[inline]
    fn begin(&mut self) {}
    #[inline]
    fn end(&mut self) {}
}

/// Scoped batch: opened on construction, closed on drop.
///
/// Closing happens on every exit path, including unwinding.
#[derive(Debug)]
pub struct BatchScope<'a, R: RunLoop + ?Sized> {
    run_loop: &'a mut R,
}

impl<'a, R: RunLoop + ?Sized> BatchScope<'a, R> {
    /// Open a batch on `run_loop`.
    pub fn new(run_loop: &'a mut R) -> Self {
        run_loop.begin();
        Self { run_loop }
    }
}

impl<R: RunLoop + ?Sized> Drop for BatchScope<'_, R> {
    fn drop(&mut self) {
        self.run_loop.end();
    }
}
