// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event router: raw platform touch events in, engine operations out.
//!
//! ## Overview
//!
//! [`RootResponder`] receives the four platform signals (start, move, end,
//! cancel), each carrying a batch of changed contacts, and drives the
//! [`TouchEngine`] for every contact in the batch.
//!
//! ## Batching
//!
//! Each raw event runs inside exactly one [`RunLoop`] batch, so observers of
//! view state see one coherent update per hardware event rather than one
//! per contact. Every contact of the batch is registered (or updated) before
//! the first view callback fires.
//!
//! ## Faults
//!
//! Routing never fails. A callback fault or an unknown identifier is logged
//! and recorded in the [`RouteReport`], and the remaining contacts of the
//! batch are still serviced.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::engine::TouchEngine;
use crate::error::TouchError;
use crate::hover::HoverEvent;
use crate::types::{EndKind, EventKind, PlatformEvent, RawTouchEvent, TouchAverage, TouchId};
use crate::view::{BatchScope, NoRunLoop, RunLoop, ViewTree};

/// Outcome of routing one raw event.
#[derive(Debug, Default)]
pub struct RouteReport {
    /// Contacts from the batch that were processed.
    pub touches: usize,
    /// Whether a callback asked to suppress the platform's default action.
    pub default_prevented: bool,
    /// Faults observed while routing, in the order they occurred.
    pub faults: Vec<TouchError>,
}

impl RouteReport {
    /// Whether routing finished without any fault.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    fn record(&mut self, fault: TouchError) {
        fault.log();
        self.faults.push(fault);
    }

    fn extend(&mut self, faults: Vec<TouchError>) {
        for fault in faults {
            self.record(fault);
        }
    }
}

/// Root of touch dispatch for one surface.
///
/// ## Usage
///
/// - Construct with [`RootResponder::new`], or [`RootResponder::with_run_loop`]
///   to batch through the host's run loop.
/// - Forward each platform signal to [`on_touch_start`](Self::on_touch_start),
///   [`on_touch_move`](Self::on_touch_move), [`on_touch_end`](Self::on_touch_end)
///   or [`on_touch_cancel`](Self::on_touch_cancel), with the view tree.
/// - Timers and other out-of-event code call
///   [`capture_touch`](Self::capture_touch) and
///   [`make_touch_responder`](Self::make_touch_responder), which open their
///   own batch.
pub struct RootResponder<K: Copy + Eq, R: RunLoop = NoRunLoop> {
    engine: TouchEngine<K>,
    run_loop: R,
}

impl<K: Copy + Ord + Debug, R: RunLoop + Debug> Debug for RootResponder<K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RootResponder")
            .field("engine", &self.engine)
            .field("run_loop", &self.run_loop)
            .finish()
    }
}

impl<K: Copy + Ord + Debug, R: RunLoop + Default> Default for RootResponder<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Ord + Debug, R: RunLoop + Default> RootResponder<K, R> {
    /// Create a root responder with a default run loop.
    pub fn new() -> Self {
        Self::with_run_loop(R::default())
    }
}

impl<K: Copy + Ord + Debug, R: RunLoop> RootResponder<K, R> {
    /// Create a root responder batching through `run_loop`.
    pub fn with_run_loop(run_loop: R) -> Self {
        Self {
            engine: TouchEngine::new(),
            run_loop,
        }
    }

    /// Bound the number of queued responder requests applied per callback.
    pub fn set_request_limit(&mut self, limit: usize) {
        self.engine.set_request_limit(limit);
    }

    /// The dispatch engine.
    pub fn engine(&self) -> &TouchEngine<K> {
        &self.engine
    }

    /// The run loop.
    pub fn run_loop(&self) -> &R {
        &self.run_loop
    }

    /// Mutable access to the run loop.
    pub fn run_loop_mut(&mut self) -> &mut R {
        &mut self.run_loop
    }

    /// Touches currently owned by `view`, or `None` if it owns none.
    pub fn touches_for_view(&self, view: &K) -> Option<&alloc::collections::BTreeSet<TouchId>> {
        self.engine.touches_for_view(view)
    }

    /// Centroid and mean spread of the touches owned by `view`.
    pub fn averaged_touches_for_view(&self, view: &K) -> TouchAverage {
        self.engine.averaged_touches_for_view(view)
    }

    /// [`TouchEngine::capture_touch`] inside its own batch.
    pub fn capture_touch<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        starting_point: Option<K>,
        should_stack: bool,
    ) -> Result<bool, TouchError> {
        let Self { engine, run_loop } = self;
        let _batch = BatchScope::new(run_loop);
        engine.capture_touch(views, id, starting_point, should_stack)
    }

    /// [`TouchEngine::make_touch_responder`] inside its own batch.
    pub fn make_touch_responder<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        id: TouchId,
        candidate: K,
        should_stack: bool,
    ) -> Result<bool, TouchError> {
        let Self { engine, run_loop } = self;
        let _batch = BatchScope::new(run_loop);
        engine.make_touch_responder(views, id, candidate, should_stack)
    }

    /// Register every started contact, then let each one find its
    /// responder through capture from the root.
    pub fn on_touch_start<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        event: &RawTouchEvent<K>,
    ) -> RouteReport {
        let Self { engine, run_loop } = self;
        let _batch = BatchScope::new(run_loop);
        let mut report = RouteReport::default();
        let platform = PlatformEvent {
            kind: EventKind::Start,
            timestamp: event.timestamp,
        };

        let mut started: Vec<(TouchId, Vec<HoverEvent<K>>)> = Vec::new();
        for raw in &event.changed {
            match engine.begin_touch(views, raw, event.timestamp) {
                Ok(entered) => {
                    engine.attach_event(raw.id, platform);
                    started.push((raw.id, entered));
                }
                Err(fault) => report.record(fault),
            }
        }

        for (id, entered) in started {
            report.extend(engine.deliver_hover(views, id, &entered));
            report.extend(engine.drain_requests(views));
            if let Err(fault) = engine.capture_touch_inner(views, id, None, false) {
                // Requests queued by the failing callback are dropped.
                engine.clear_requests();
                report.record(fault);
            }
            report.extend(engine.drain_requests(views));
            engine.detach_event(id);
            report.touches += 1;
        }

        report.default_prevented = engine.take_default_prevented();
        report
    }

    /// Update every moved contact, then deliver one aggregated "dragged"
    /// call per responder.
    pub fn on_touch_move<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        event: &RawTouchEvent<K>,
    ) -> RouteReport {
        let Self { engine, run_loop } = self;
        let _batch = BatchScope::new(run_loop);
        let mut report = RouteReport::default();
        let platform = PlatformEvent {
            kind: EventKind::Move,
            timestamp: event.timestamp,
        };

        let mut moved: Vec<TouchId> = Vec::new();
        let mut hovered: Vec<(TouchId, Vec<HoverEvent<K>>)> = Vec::new();
        for raw in &event.changed {
            match engine.update_touch(views, raw, event.timestamp) {
                Ok(transitions) => {
                    engine.attach_event(raw.id, platform);
                    if !moved.contains(&raw.id) {
                        moved.push(raw.id);
                    }
                    hovered.push((raw.id, transitions));
                }
                Err(fault) => report.record(fault),
            }
        }

        for (id, transitions) in hovered {
            report.extend(engine.deliver_hover(views, id, &transitions));
            report.extend(engine.drain_requests(views));
        }
        report.extend(engine.dispatch_drag(views, &moved));

        for &id in &moved {
            engine.detach_event(id);
        }
        report.touches = moved.len();
        report.default_prevented = engine.take_default_prevented();
        report
    }

    /// End every lifted contact: the innermost responder is told it ended,
    /// every frame below it that it was cancelled.
    pub fn on_touch_end<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        event: &RawTouchEvent<K>,
    ) -> RouteReport {
        self.finish(views, event, EndKind::End)
    }

    /// Cancel every contact in the batch: all stacked responders are told
    /// the touch was cancelled.
    pub fn on_touch_cancel<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        event: &RawTouchEvent<K>,
    ) -> RouteReport {
        self.finish(views, event, EndKind::Cancel)
    }

    fn finish<V: ViewTree<K> + ?Sized>(
        &mut self,
        views: &mut V,
        event: &RawTouchEvent<K>,
        kind: EndKind,
    ) -> RouteReport {
        let Self { engine, run_loop } = self;
        let _batch = BatchScope::new(run_loop);
        let mut report = RouteReport::default();
        let platform = PlatformEvent {
            kind: match kind {
                EndKind::End => EventKind::End,
                EndKind::Cancel => EventKind::Cancel,
            },
            timestamp: event.timestamp,
        };

        let mut ending: Vec<TouchId> = Vec::new();
        for raw in &event.changed {
            if ending.contains(&raw.id) {
                continue;
            }
            match engine.update_position(raw, event.timestamp) {
                Ok(()) => {
                    engine.attach_event(raw.id, platform);
                    ending.push(raw.id);
                }
                Err(fault) => report.record(fault),
            }
        }

        for id in ending {
            report.extend(engine.end_touch(views, id, kind));
            report.touches += 1;
        }
        report.default_prevented = engine.take_default_prevented();
        report
    }
}
