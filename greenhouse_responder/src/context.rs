// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The handle views receive inside touch callbacks.
//!
//! A [`TouchContext`] reads the registry and the view-touch index, and
//! queues ownership requests. Queued requests are applied in order once the
//! callback that made them returns, still inside the current batch.

use alloc::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::index::ViewTouchIndex;
use crate::touch::Touch;
use crate::types::{TouchAverage, TouchId};

/// Ownership change queued from inside a callback.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Request<K> {
    MakeTouchResponder {
        touch: TouchId,
        view: K,
        should_stack: bool,
    },
    CaptureTouch {
        touch: TouchId,
        starting_point: Option<K>,
        should_stack: bool,
    },
}

/// Callback-side view of the dispatch engine.
#[derive(Debug)]
pub struct TouchContext<'a, K: Copy + Eq> {
    pub(crate) touches: &'a BTreeMap<TouchId, Touch<K>>,
    pub(crate) index: &'a ViewTouchIndex<K>,
    pub(crate) requests: &'a mut VecDeque<Request<K>>,
    pub(crate) default_prevented: &'a mut bool,
}

impl<K: Copy + Ord> TouchContext<'_, K> {
    /// Look up a live touch.
    pub fn touch(&self, id: TouchId) -> Option<&Touch<K>> {
        self.touches.get(&id)
    }

    /// Touches currently owned by `view`, or `None` if it owns none.
    pub fn touches_for_view(&self, view: &K) -> Option<&BTreeSet<TouchId>> {
        self.index.touches_for_view(view)
    }

    /// Centroid and mean spread of the touches owned by `view`.
    pub fn averaged_touches_for_view(&self, view: &K) -> TouchAverage {
        self.index.averaged_touches_for_view(view, self.touches)
    }

    /// Queue [`TouchEngine::make_touch_responder`](crate::engine::TouchEngine::make_touch_responder).
    pub fn make_touch_responder(&mut self, touch: TouchId, view: K, should_stack: bool) {
        self.requests.push_back(Request::MakeTouchResponder {
            touch,
            view,
            should_stack,
        });
    }

    /// Queue [`TouchEngine::capture_touch`](crate::engine::TouchEngine::capture_touch).
    pub fn capture_touch(&mut self, touch: TouchId, starting_point: Option<K>, should_stack: bool) {
        self.requests.push_back(Request::CaptureTouch {
            touch,
            starting_point,
            should_stack,
        });
    }

    /// Ask the host to suppress the platform's default action for the event
    /// being dispatched.
    pub fn prevent_default(&mut self) {
        *self.default_prevented = true;
    }

    /// Number of requests queued and not yet applied.
    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }
}
