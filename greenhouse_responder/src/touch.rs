// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-contact touch records.
//!
//! A [`Touch`] lives from the platform's start signal until its end or cancel
//! signal. Besides position and timing it carries the touch's responder
//! stack: the views that accepted the touch, outermost first.
//!
//! Stack invariants:
//! - A view appears at most once.
//! - [`Touch::touch_responder`] is always the last entry.
//! - [`Touch::next_touch_responder`] is always the entry below it, or `None`
//!   when fewer than two views are stacked.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::hover::HoverState;
use crate::types::{PlatformEvent, RawTouch, TouchId};

/// State of one physical contact.
#[derive(Clone, Debug)]
pub struct Touch<K: Copy + Eq> {
    id: TouchId,
    target: K,
    over: K,
    start_page: Point,
    page: Point,
    start_timestamp: f64,
    timestamp: f64,
    event: Option<PlatformEvent>,
    stack: Vec<K>,
    pub(crate) hover: HoverState<K>,
}

impl<K: Copy + Eq> Touch<K> {
    /// Create a record for a contact that just started.
    pub(crate) fn new(raw: &RawTouch<K>, timestamp: f64) -> Self {
        Self {
            id: raw.id,
            target: raw.target,
            over: raw.target,
            start_page: raw.page,
            page: raw.page,
            start_timestamp: timestamp,
            timestamp,
            event: None,
            stack: Vec::new(),
            hover: HoverState::new(),
        }
    }

    /// Contact identifier.
    pub fn id(&self) -> TouchId {
        self.id
    }

    /// View the contact started on. Fixed for the touch's lifetime; capture
    /// resolves its chain from here.
    pub fn target(&self) -> K {
        self.target
    }

    /// View the platform last reported under the contact.
    pub fn over(&self) -> K {
        self.over
    }

    /// Current page position.
    pub fn page(&self) -> Point {
        self.page
    }

    /// Page position where the contact started.
    pub fn start_page(&self) -> Point {
        self.start_page
    }

    /// Displacement from the start position.
    pub fn displacement(&self) -> Vec2 {
        self.page - self.start_page
    }

    /// Timestamp of the last update, in milliseconds.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Timestamp of the start signal, in milliseconds.
    pub fn start_timestamp(&self) -> f64 {
        self.start_timestamp
    }

    /// Platform event being dispatched right now, if any.
    pub fn event(&self) -> Option<&PlatformEvent> {
        self.event.as_ref()
    }

    /// Responder stack, outermost first.
    pub fn responder_stack(&self) -> &[K] {
        &self.stack
    }

    /// Current responder (top of the stack).
    pub fn touch_responder(&self) -> Option<K> {
        self.stack.last().copied()
    }

    /// Responder the touch falls back to when the current one lets go.
    pub fn next_touch_responder(&self) -> Option<K> {
        self.stack.len().checked_sub(2).map(|i| self.stack[i])
    }

    /// Whether `view` is anywhere in the responder stack.
    pub fn is_stacked(&self, view: &K) -> bool {
        self.stack.contains(view)
    }

    /// Views the contact is currently over, root first.
    pub fn hovered(&self) -> &[K] {
        self.hover.current_path()
    }

    pub(crate) fn update(&mut self, raw: &RawTouch<K>, timestamp: f64) {
        self.page = raw.page;
        self.over = raw.target;
        self.timestamp = timestamp;
    }

    pub(crate) fn attach_event(&mut self, event: PlatformEvent) {
        self.event = Some(event);
    }

    pub(crate) fn detach_event(&mut self) {
        self.event = None;
    }

    pub(crate) fn push_responder(&mut self, view: K) {
        debug_assert!(
            !self.stack.contains(&view),
            "a view must not be stacked twice on one touch"
        );
        self.stack.push(view);
    }

    pub(crate) fn pop_responder(&mut self) -> Option<K> {
        self.stack.pop()
    }

    /// Drop `view` from the stack wherever it sits.
    pub(crate) fn remove_responder(&mut self, view: &K) -> bool {
        match self.stack.iter().position(|v| v == view) {
            Some(i) => {
                self.stack.remove(i);
                true
            }
            None => false,
        }
    }

    /// Topmost stacked view strictly below `above` (or the top itself when
    /// `above` is `None` or no longer stacked) that `skip` does not reject.
    pub(crate) fn next_frame(&self, above: Option<K>, skip: impl Fn(&K) -> bool) -> Option<K> {
        let upper = above
            .and_then(|v| self.stack.iter().position(|s| *s == v))
            .unwrap_or(self.stack.len());
        self.stack[..upper].iter().rev().find(|v| !skip(v)).copied()
    }
}
