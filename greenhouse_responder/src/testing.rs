// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording view tree shared by the unit tests.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::context::TouchContext;
use crate::error::HandlerResult;
use crate::touch::Touch;
use crate::types::{Capabilities, DragResponse, EventKind, StartResponse, TouchId};
use crate::view::{RunLoop, ViewTree};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Capture(u32, TouchId),
    Start(u32, TouchId),
    Dragged(u32, Vec<TouchId>),
    End(u32, TouchId),
    Cancelled(u32, TouchId),
    Entered(u32, TouchId),
    Exited(u32, TouchId),
    HasTouch(u32, bool),
}

#[derive(Debug, Default)]
pub(crate) struct Tree {
    pub(crate) parents: BTreeMap<u32, u32>,
    pub(crate) caps: BTreeMap<u32, Capabilities>,
    pub(crate) captures: BTreeSet<u32>,
    pub(crate) starts: BTreeMap<u32, StartResponse<u32>>,
    pub(crate) drags: BTreeMap<u32, DragResponse>,
    pub(crate) failing: BTreeSet<(u32, &'static str)>,
    /// On `touch_end`, the view queues a capture starting below itself.
    pub(crate) pass_through_on_end: BTreeSet<u32>,
    /// On `touches_dragged`, the view hands each touch back to the frame below.
    pub(crate) hand_back_on_drag: BTreeSet<u32>,
    /// On `touch_start`, the view asks for the platform default to be suppressed.
    pub(crate) prevents_default: BTreeSet<u32>,
    /// Platform event kind seen by each `touch_start`.
    pub(crate) start_events: Vec<Option<EventKind>>,
    pub(crate) calls: Vec<Call>,
    pub(crate) has_touch: BTreeMap<u32, bool>,
}

impl Tree {
    /// A chain `ids[0] → ids[1] → …` where `ids[0]` is the root; every view
    /// is a plain responder.
    pub(crate) fn chain(ids: &[u32]) -> Self {
        let mut tree = Self::default();
        for pair in ids.windows(2) {
            tree.parents.insert(pair[1], pair[0]);
        }
        for &id in ids {
            tree.caps.insert(id, Capabilities::RESPONDER);
        }
        tree
    }

    pub(crate) fn add_caps(&mut self, view: u32, caps: Capabilities) {
        *self.caps.entry(view).or_default() |= caps;
    }

    pub(crate) fn set_caps(&mut self, view: u32, caps: Capabilities) {
        self.caps.insert(view, caps);
    }

    pub(crate) fn capturing(&mut self, view: u32) {
        self.add_caps(view, Capabilities::CAPTURE_TOUCH);
        self.captures.insert(view);
    }

    pub(crate) fn fail(&mut self, view: u32, callback: &'static str) {
        self.failing.insert((view, callback));
    }

    pub(crate) fn take_calls(&mut self) -> Vec<Call> {
        core::mem::take(&mut self.calls)
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    fn check(&self, view: u32, callback: &'static str) -> HandlerResult<()> {
        if self.failing.contains(&(view, callback)) {
            return Err("injected failure".into());
        }
        Ok(())
    }
}

impl ViewTree<u32> for Tree {
    fn next_responder(&self, view: &u32) -> Option<u32> {
        self.parents.get(view).copied()
    }

    fn capabilities(&self, view: &u32) -> Capabilities {
        self.caps.get(view).copied().unwrap_or_default()
    }

    fn set_has_touch(&mut self, view: &u32, has_touch: bool) {
        self.calls.push(Call::HasTouch(*view, has_touch));
        self.has_touch.insert(*view, has_touch);
    }

    fn capture_touch(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<bool> {
        self.calls.push(Call::Capture(*view, touch.id()));
        self.check(*view, "capture_touch")?;
        Ok(self.captures.contains(view))
    }

    fn touch_start(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<StartResponse<u32>> {
        self.calls.push(Call::Start(*view, touch.id()));
        self.start_events.push(touch.event().map(|e| e.kind));
        if self.prevents_default.contains(view) {
            cx.prevent_default();
        }
        self.check(*view, "touch_start")?;
        Ok(self
            .starts
            .get(view)
            .copied()
            .unwrap_or(StartResponse::Accept))
    }

    fn touches_dragged(
        &mut self,
        view: &u32,
        changed: &[&Touch<u32>],
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<DragResponse> {
        self.calls
            .push(Call::Dragged(*view, changed.iter().map(|t| t.id()).collect()));
        self.check(*view, "touches_dragged")?;
        if self.hand_back_on_drag.contains(view) {
            for touch in changed {
                if let Some(next) = touch.next_touch_responder() {
                    cx.make_touch_responder(touch.id(), next, true);
                }
            }
        }
        Ok(self
            .drags
            .get(view)
            .copied()
            .unwrap_or(DragResponse::NoChange))
    }

    fn touch_end(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        self.calls.push(Call::End(*view, touch.id()));
        if self.pass_through_on_end.contains(view) {
            cx.capture_touch(touch.id(), Some(*view), true);
        }
        self.check(*view, "touch_end")
    }

    fn touch_cancelled(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        self.calls.push(Call::Cancelled(*view, touch.id()));
        self.check(*view, "touch_cancelled")
    }

    fn touch_entered(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        self.calls.push(Call::Entered(*view, touch.id()));
        self.check(*view, "touch_entered")
    }

    fn touch_exited(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        self.calls.push(Call::Exited(*view, touch.id()));
        self.check(*view, "touch_exited")
    }
}

/// Run loop that records nesting.
#[derive(Debug, Default)]
pub(crate) struct Batches {
    pub(crate) depth: i32,
    pub(crate) opened: u32,
    pub(crate) closed: u32,
}

impl RunLoop for Batches {
    fn begin(&mut self) {
        self.depth += 1;
        self.opened += 1;
    }

    fn end(&mut self) {
        self.depth -= 1;
        self.closed += 1;
    }
}
