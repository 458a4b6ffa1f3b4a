// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capture/dispatch engine.
//!
//! ## Overview
//!
//! [`TouchEngine`] owns the touch registry and the [`ViewTouchIndex`], and
//! decides which view responds to each touch.
//!
//! ## Capture
//!
//! [`TouchEngine::capture_touch`] builds the chain from the touch's target up
//! to (not including) a starting point, then offers the touch to each view in
//! that chain top-down. The first view that captures becomes the responder.
//! When none does, the target itself is offered, so a touch is never dropped
//! silently.
//!
//! ## Responder changes
//!
//! [`TouchEngine::make_touch_responder`] offers the touch to a candidate
//! (walking up to the first view that can start touches), then either
//! stacks the accepted view on top of the current responders or pops the
//! stack down to it. Popped views are told the touch was cancelled, except
//! multitouch views that still own other touches.
//!
//! ## Requests from callbacks
//!
//! Callbacks cannot re-enter the engine. They queue requests through their
//! [`TouchContext`], and the engine applies the queue after each callback
//! returns, bounded by [`TouchEngine::set_request_limit`].

use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use tracing::{debug, trace};

use crate::context::{Request, TouchContext};
use crate::error::TouchError;
use crate::hover::{HoverEvent, responder_path};
use crate::index::{IndexChange, ViewTouchIndex};
use crate::touch::Touch;
use crate::types::{
    Capabilities, DragResponse, EndKind, PlatformEvent, RawTouch, StartResponse, TouchAverage,
    TouchId,
};
use crate::view::ViewTree;

/// Default bound on queued requests applied per drain.
pub const DEFAULT_REQUEST_LIMIT: usize = 64;

/// Touch registry, view-touch index, and the responder state machine.
pub struct TouchEngine<K: Copy + Eq> {
    touches: BTreeMap<TouchId, Touch<K>>,
    index: ViewTouchIndex<K>,
    requests: VecDeque<Request<K>>,
    default_prevented: bool,
    request_limit: usize,
}

impl<K: Copy + Ord + Debug> Debug for TouchEngine<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TouchEngine")
            .field("touches", &self.touches.len())
            .field("active_views", &self.index.active_views())
            .field("pending_requests", &self.requests.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Ord + Debug> Default for TouchEngine<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Ord + Debug> TouchEngine<K> {
    /// Create an engine with no touches.
    pub fn new() -> Self {
        Self {
            touches: BTreeMap::new(),
            index: ViewTouchIndex::new(),
            requests: VecDeque::new(),
            default_prevented: false,
            request_limit: DEFAULT_REQUEST_LIMIT,
        }
    }

    /// Bound the number of queued requests applied in one drain.
    pub fn set_request_limit(&mut self, limit: usize) {
        self.request_limit = limit.max(1);
    }

    /// Current request limit.
    pub fn request_limit(&self) -> usize {
        self.request_limit
    }

    /// Look up a live touch.
    pub fn touch(&self, id: TouchId) -> Option<&Touch<K>> {
        self.touches.get(&id)
    }

    /// All live touches, ordered by identifier.
    pub fn touches(&self) -> impl Iterator<Item = &Touch<K>> {
        self.touches.values()
    }

    /// Number of live touches.
    pub fn len(&self) -> usize {
        self.touches.len()
    }

    /// Whether no touch is live.
    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// The view-touch index.
    pub fn index(&self) -> &ViewTouchIndex<K> {
        &self.index
    }

    /// Touches currently owned by `view`, or `None` if it owns none.
    pub fn touches_for_view(&self, view: &K) -> Option<&BTreeSet<TouchId>> {
        self.index.touches_for_view(view)
    }

    /// Centroid and mean spread of the touches owned by `view`.
    pub fn averaged_touches_for_view(&self, view: &K) -> TouchAverage {
        self.index.averaged_touches_for_view(view, &self.touches)
    }

    /// Offer a touch to the views between its target and `starting_point`,
    /// top-down, and make the first that captures it its responder.
    ///
    /// With `starting_point` of `None` the whole chain up to the root is
    /// considered. Returns whether the responder changed. Requests queued by
    /// callbacks are applied before returning; their faults are logged.
    pub fn capture_touch<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        starting_point: Option<K>,
        should_stack: bool,
    ) -> Result<bool, TouchError> {
        let changed = self.capture_touch_inner(views, id, starting_point, should_stack);
        self.flush(views);
        changed
    }

    /// Offer a touch to `candidate` and, if accepted, make it the touch's
    /// responder.
    ///
    /// With `should_stack`, the accepted view is pushed above the current
    /// responders so it can later hand the touch back. Without it (or when
    /// the view is already stacked) the stack is popped down to the view,
    /// cancelling each popped responder. Returns whether the responder
    /// changed.
    pub fn make_touch_responder<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        candidate: K,
        should_stack: bool,
    ) -> Result<bool, TouchError> {
        let changed = self.make_touch_responder_inner(views, id, candidate, should_stack);
        self.flush(views);
        changed
    }

    pub(crate) fn capture_touch_inner<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        starting_point: Option<K>,
        should_stack: bool,
    ) -> Result<bool, TouchError> {
        let target = self
            .touches
            .get(&id)
            .ok_or(TouchError::UnknownTouch(id))?
            .target();

        let mut chain = Vec::new();
        let mut cur = Some(target);
        while let Some(view) = cur {
            if Some(view) == starting_point {
                break;
            }
            chain.push(view);
            cur = views.next_responder(&view);
        }
        chain.reverse();

        for view in chain {
            if !views
                .capabilities(&view)
                .contains(Capabilities::CAPTURE_TOUCH)
            {
                continue;
            }
            let captured = self
                .with_touch(id, |touch, cx| views.capture_touch(&view, touch, cx))?
                .map_err(|e| TouchError::handler(&view, "capture_touch", e))?;
            if captured {
                trace!(touch = ?id, view = ?view, "touch captured");
                return self.make_touch_responder_inner(views, id, view, should_stack);
            }
        }
        // The fallback never climbs to the starting point or above it.
        self.offer_start(views, id, target, starting_point, should_stack)
    }

    pub(crate) fn make_touch_responder_inner<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        candidate: K,
        should_stack: bool,
    ) -> Result<bool, TouchError> {
        self.offer_start(views, id, candidate, None, should_stack)
    }

    /// Offer the touch to the first view from `candidate` up (stopping before
    /// `boundary`) that starts touches, and install whoever it confirms.
    fn offer_start<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        candidate: K,
        boundary: Option<K>,
        should_stack: bool,
    ) -> Result<bool, TouchError> {
        let touch = self.touches.get(&id).ok_or(TouchError::UnknownTouch(id))?;
        if touch.touch_responder() == Some(candidate) {
            return Ok(false);
        }
        let Some(offered) = first_capable(views, candidate, boundary, Capabilities::TOUCH_START)
        else {
            trace!(touch = ?id, view = ?candidate, "no view in the chain starts touches");
            return Ok(false);
        };
        let response = self
            .with_touch(id, |touch, cx| views.touch_start(&offered, touch, cx))?
            .map_err(|e| TouchError::handler(&offered, "touch_start", e))?;
        let confirmed = match response {
            StartResponse::Accept => offered,
            StartResponse::Delegate(view) => view,
            StartResponse::Decline => {
                trace!(touch = ?id, view = ?offered, "touch start declined");
                return Ok(false);
            }
        };
        self.install_responder(views, id, confirmed, should_stack)
    }

    /// Make `view` the top of the touch's stack without offering it the
    /// touch again.
    pub(crate) fn install_responder<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        view: K,
        should_stack: bool,
    ) -> Result<bool, TouchError> {
        let touch = self.touches.get(&id).ok_or(TouchError::UnknownTouch(id))?;
        if touch.touch_responder() == Some(view) {
            return Ok(false);
        }
        let stacked = touch.is_stacked(&view);

        notify(views, self.index.unassign(id));

        let mut first = None;
        if !should_stack || stacked {
            self.pop_until(views, id, Some(view), &mut first);
        }

        let touch = self
            .touches
            .get_mut(&id)
            .ok_or(TouchError::UnknownTouch(id))?;
        if touch.touch_responder() != Some(view) {
            touch.push_responder(view);
        }
        let depth = touch.responder_stack().len();
        notify(views, self.index.assign(id, view));
        debug!(touch = ?id, view = ?view, depth, "touch responder changed");

        match first {
            Some(fault) => Err(fault),
            None => Ok(true),
        }
    }

    /// Pop frames off the touch's stack until `keep` is on top (or the stack
    /// is empty), cancelling each popped view.
    fn pop_until<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        keep: Option<K>,
        first: &mut Option<TouchError>,
    ) {
        loop {
            let Some(touch) = self.touches.get_mut(&id) else {
                return;
            };
            if touch.touch_responder().is_none() || touch.touch_responder() == keep {
                return;
            }
            let Some(popped) = touch.pop_responder() else {
                return;
            };
            let caps = views.capabilities(&popped);
            // Multitouch views still tracking other touches are not told.
            if caps.contains(Capabilities::ACCEPTS_MULTITOUCH)
                && self.index.has_active_touch(&popped)
            {
                continue;
            }
            if !caps.contains(Capabilities::TOUCH_CANCELLED) {
                continue;
            }
            trace!(touch = ?id, view = ?popped, "responder popped");
            match self.with_touch(id, |touch, cx| views.touch_cancelled(&popped, touch, cx)) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => keep_first(first, TouchError::handler(&popped, "touch_cancelled", e)),
                Err(fault) => keep_first(first, fault),
            }
        }
    }

    /// Remove `view` from the touch's stack at its own request.
    ///
    /// When `view` was on top the touch falls back to the frame below.
    pub(crate) fn relinquish<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        view: K,
    ) -> Result<(), TouchError> {
        let touch = self
            .touches
            .get_mut(&id)
            .ok_or(TouchError::UnknownTouch(id))?;
        let was_top = touch.touch_responder() == Some(view);
        if !touch.remove_responder(&view) || !was_top {
            return Ok(());
        }
        let next = touch.touch_responder();
        notify(views, self.index.unassign(id));
        if let Some(next) = next {
            notify(views, self.index.assign(id, next));
        }
        debug!(touch = ?id, view = ?view, next = ?next, "responder let go of touch");
        Ok(())
    }

    /// Register a contact that just started and compute the views it
    /// entered.
    pub(crate) fn begin_touch<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &V,
        raw: &RawTouch<K>,
        timestamp: f64,
    ) -> Result<Vec<HoverEvent<K>>, TouchError> {
        if self.touches.contains_key(&raw.id) {
            return Err(TouchError::DuplicateTouch(raw.id));
        }
        let mut touch = Touch::new(raw, timestamp);
        let entered = touch.hover.update_path(&responder_path(views, raw.target));
        self.touches.insert(raw.id, touch);
        trace!(touch = ?raw.id, target = ?raw.target, "touch registered");
        Ok(entered)
    }

    /// Record a new position and return the hover transitions it causes.
    pub(crate) fn update_touch<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &V,
        raw: &RawTouch<K>,
        timestamp: f64,
    ) -> Result<Vec<HoverEvent<K>>, TouchError> {
        let path = responder_path(views, raw.target);
        let touch = self
            .touches
            .get_mut(&raw.id)
            .ok_or(TouchError::UnknownTouch(raw.id))?;
        touch.update(raw, timestamp);
        Ok(touch.hover.update_path(&path))
    }

    /// Record a final position without touching hover state.
    pub(crate) fn update_position(
        &mut self,
        raw: &RawTouch<K>,
        timestamp: f64,
    ) -> Result<(), TouchError> {
        self.touches
            .get_mut(&raw.id)
            .ok_or(TouchError::UnknownTouch(raw.id))?
            .update(raw, timestamp);
        Ok(())
    }

    pub(crate) fn attach_event(&mut self, id: TouchId, event: PlatformEvent) {
        if let Some(touch) = self.touches.get_mut(&id) {
            touch.attach_event(event);
        }
    }

    pub(crate) fn detach_event(&mut self, id: TouchId) {
        if let Some(touch) = self.touches.get_mut(&id) {
            touch.detach_event();
        }
    }

    pub(crate) fn take_default_prevented(&mut self) -> bool {
        core::mem::take(&mut self.default_prevented)
    }

    pub(crate) fn clear_requests(&mut self) {
        self.requests.clear();
    }

    /// Deliver hover transitions for one touch.
    pub(crate) fn deliver_hover<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        events: &[HoverEvent<K>],
    ) -> Vec<TouchError> {
        let mut faults = Vec::new();
        for event in events {
            let (view, entered) = match *event {
                HoverEvent::Entered(view) => (view, true),
                HoverEvent::Exited(view) => (view, false),
            };
            let needed = if entered {
                Capabilities::TOUCH_ENTERED
            } else {
                Capabilities::TOUCH_EXITED
            };
            if !views.capabilities(&view).contains(needed) {
                continue;
            }
            let result = self.with_touch(id, |touch, cx| {
                if entered {
                    views.touch_entered(&view, touch, cx)
                } else {
                    views.touch_exited(&view, touch, cx)
                }
            });
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    let name = if entered { "touch_entered" } else { "touch_exited" };
                    faults.push(TouchError::handler(&view, name, e));
                }
                Err(fault) => faults.push(fault),
            }
        }
        faults
    }

    /// Offer the moved touches to their responders, top of each stack first,
    /// one aggregated call per view per round.
    pub(crate) fn dispatch_drag<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        changed: &[TouchId],
    ) -> Vec<TouchError> {
        let mut faults = Vec::new();
        let mut offered: Vec<(TouchId, K)> = Vec::new();
        let mut pending: Vec<(TouchId, Option<K>)> = changed.iter().map(|&id| (id, None)).collect();

        while !pending.is_empty() {
            let mut groups: Vec<(K, Vec<TouchId>)> = Vec::new();
            for (id, above) in pending.drain(..) {
                let Some(touch) = self.touches.get(&id) else {
                    continue;
                };
                let Some(view) = touch.next_frame(above, |v| offered.contains(&(id, *v))) else {
                    continue;
                };
                offered.push((id, view));
                match groups.iter_mut().find(|(v, _)| *v == view) {
                    Some((_, ids)) => ids.push(id),
                    None => groups.push((view, vec![id])),
                }
            }

            for (view, ids) in groups {
                let response = if views
                    .capabilities(&view)
                    .contains(Capabilities::TOUCHES_DRAGGED)
                {
                    match self.with_touches(&ids, |touches, cx| {
                        views.touches_dragged(&view, touches, cx)
                    }) {
                        Ok(response) => response,
                        Err(e) => {
                            faults.push(TouchError::handler(&view, "touches_dragged", e));
                            DragResponse::StopPropagation
                        }
                    }
                } else {
                    DragResponse::NoChange
                };
                trace!(view = ?view, ?response, touches = ids.len(), "touches dragged");

                match response {
                    DragResponse::NoChange => {
                        pending.extend(ids.iter().map(|&id| (id, Some(view))));
                    }
                    DragResponse::StopPropagation => {}
                    DragResponse::Claim => {
                        for &id in &ids {
                            if let Err(fault) = self.install_responder(views, id, view, false) {
                                faults.push(fault);
                            }
                        }
                    }
                    DragResponse::Decline => {
                        for &id in &ids {
                            if let Err(fault) = self.relinquish(views, id, view) {
                                faults.push(fault);
                            }
                            pending.push((id, Some(view)));
                        }
                    }
                }
                faults.extend(self.drain_requests(views));
            }
        }
        faults
    }

    /// Deliver end (or cancel) to every stacked responder, innermost first,
    /// then release the touch.
    ///
    /// Only the innermost responder is told the touch ended; every frame
    /// below it is told it was cancelled. A responder that hands the touch to
    /// a new view while ending (a tap passed through to content) makes that
    /// view the new innermost frame, and it is told in turn. The record is
    /// removed whatever the callbacks return.
    pub(crate) fn end_touch<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        kind: EndKind,
    ) -> Vec<TouchError> {
        let mut faults = Vec::new();
        if !self.touches.contains_key(&id) {
            faults.push(TouchError::UnknownTouch(id));
            return faults;
        }
        notify(views, self.index.unassign(id));

        let mut notified: Vec<K> = Vec::new();
        for _ in 0..self.request_limit {
            let frames: Vec<K> = match self.touches.get(&id) {
                Some(touch) => touch
                    .responder_stack()
                    .iter()
                    .rev()
                    .filter(|v| !notified.contains(v))
                    .copied()
                    .collect(),
                None => break,
            };
            if frames.is_empty() {
                break;
            }
            for (i, view) in frames.into_iter().enumerate() {
                notified.push(view);
                let cancelled = i > 0 || kind == EndKind::Cancel;
                let (needed, name) = if cancelled {
                    (Capabilities::TOUCH_CANCELLED, "touch_cancelled")
                } else {
                    (Capabilities::TOUCH_END, "touch_end")
                };
                if !views.capabilities(&view).contains(needed) {
                    continue;
                }
                let result = self.with_touch(id, |touch, cx| {
                    if cancelled {
                        views.touch_cancelled(&view, touch, cx)
                    } else {
                        views.touch_end(&view, touch, cx)
                    }
                });
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => faults.push(TouchError::handler(&view, name, e)),
                    Err(fault) => faults.push(fault),
                }
            }
            faults.extend(self.drain_requests(views));
            // Requests may have handed the touch to a new responder.
            notify(views, self.index.unassign(id));
        }

        let exits = match self.touches.get_mut(&id) {
            Some(touch) => touch.hover.clear(),
            None => Vec::new(),
        };
        faults.extend(self.deliver_hover(views, id, &exits));
        faults.extend(self.drain_requests(views));
        notify(views, self.index.unassign(id));

        self.touches.remove(&id);
        debug!(touch = ?id, ?kind, "touch released");
        faults
    }

    /// Apply queued requests in order.
    pub(crate) fn drain_requests<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
    ) -> Vec<TouchError> {
        let mut faults = Vec::new();
        let mut applied = 0;
        while let Some(request) = self.requests.pop_front() {
            if applied == self.request_limit {
                self.requests.clear();
                faults.push(TouchError::RequestLimit(self.request_limit));
                break;
            }
            applied += 1;
            let result = match request {
                Request::MakeTouchResponder {
                    touch,
                    view,
                    should_stack,
                } => self.make_touch_responder_inner(views, touch, view, should_stack),
                Request::CaptureTouch {
                    touch,
                    starting_point,
                    should_stack,
                } => self.capture_touch_inner(views, touch, starting_point, should_stack),
            };
            if let Err(fault) = result {
                faults.push(fault);
            }
        }
        faults
    }

    fn flush<V: ViewTree<K> + ?Sized>(&mut self, views: &mut V) {
        for fault in self.drain_requests(views) {
            fault.log();
        }
    }

    fn with_touch<R>(
        &mut self,
        id: TouchId,
        f: impl FnOnce(&Touch<K>, &mut TouchContext<'_, K>) -> R,
    ) -> Result<R, TouchError> {
        let Self {
            touches,
            index,
            requests,
            default_prevented,
            ..
        } = self;
        let touches = &*touches;
        let touch = touches.get(&id).ok_or(TouchError::UnknownTouch(id))?;
        let mut cx = TouchContext {
            touches,
            index,
            requests,
            default_prevented,
        };
        Ok(f(touch, &mut cx))
    }

    fn with_touches<R>(
        &mut self,
        ids: &[TouchId],
        f: impl FnOnce(&[&Touch<K>], &mut TouchContext<'_, K>) -> R,
    ) -> R {
        let Self {
            touches,
            index,
            requests,
            default_prevented,
            ..
        } = self;
        let touches = &*touches;
        let batch: Vec<&Touch<K>> = ids.iter().filter_map(|id| touches.get(id)).collect();
        let mut cx = TouchContext {
            touches,
            index,
            requests,
            default_prevented,
        };
        f(&batch, &mut cx)
    }
}

/// First view from `start` up the responder chain that advertises `needed`,
/// not reaching `boundary`.
fn first_capable<K: Copy + Eq, V: ViewTree<K> + ?Sized>(
    views: &V,
    start: K,
    boundary: Option<K>,
    needed: Capabilities,
) -> Option<K> {
    let mut cur = Some(start);
    while let Some(view) = cur {
        if Some(view) == boundary {
            return None;
        }
        if views.capabilities(&view).contains(needed) {
            return Some(view);
        }
        cur = views.next_responder(&view);
    }
    None
}

fn notify<K: Copy + Eq, V: ViewTree<K> + ?Sized>(views: &mut V, change: IndexChange<K>) {
    if let Some(view) = change.deactivated {
        views.set_has_touch(&view, false);
    }
    if let Some(view) = change.activated {
        views.set_has_touch(&view, true);
    }
}

fn keep_first(first: &mut Option<TouchError>, fault: TouchError) {
    if first.is_none() {
        *first = Some(fault);
    } else {
        fault.log();
    }
}
