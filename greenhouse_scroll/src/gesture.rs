// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch-driven scroll gesture.
//!
//! ## Overview
//!
//! A scroll view owns one [`ScrollGesture`] and forwards its responder
//! callbacks to it. The gesture moves through
//! [`Idle`](ScrollPhase::Idle) → [`Tracking`](ScrollPhase::Tracking) →
//! [`Dragging`](ScrollPhase::Dragging) → [`Decelerating`](ScrollPhase::Decelerating)
//! → `Idle`, with `Tracking` → `Idle` when the contact lifts before crossing
//! the drag threshold.
//!
//! ## Content touches
//!
//! The scroll view captures touches that start over its content. While
//! tracking, content only sees the touch once the content-touch delay has
//! elapsed (the host reports it through
//! [`content_delay_elapsed`](ScrollGesture::content_delay_elapsed)), or as a
//! tap when the contact lifts early. Either way the content is stacked above
//! the scroll view. Once the drag threshold is crossed the gesture claims the
//! touch and the content is cancelled.
//!
//! ## Offsets
//!
//! Drag samples and deceleration ticks go through
//! [`ScrollTarget::set_transient_offset`]. The resting offset is committed
//! once per gesture through [`ScrollTarget::commit_offset`].

use core::fmt::Debug;

use greenhouse_responder::context::TouchContext;
use greenhouse_responder::touch::Touch;
use greenhouse_responder::types::{
    DragResponse, EventKind, StartResponse, TouchAverage, TouchId,
};
use kurbo::{Point, Vec2};
use tracing::{debug, trace};

use crate::config::{ConfigError, ScrollAxes, ScrollConfig};
use crate::physics::{Deceleration, VelocitySampler, resist_offset};
use crate::target::{Scheduler, ScrollTarget, TaskHandle, TaskKind};

/// Where a scroll gesture is in its life.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScrollPhase {
    /// No contact and no motion.
    Idle,
    /// A contact is down but has not moved past the drag threshold.
    Tracking,
    /// Content follows the contact.
    Dragging,
    /// Content coasts after release.
    Decelerating,
}

/// Scroll gesture state for one scroll view.
#[derive(Clone, Debug)]
pub struct ScrollGesture<K> {
    view: K,
    config: ScrollConfig,
    phase: ScrollPhase,
    generation: u64,
    touches: Vec<TouchId>,
    anchor_position: Point,
    anchor_offset: Vec2,
    last_offset: Vec2,
    sampler: VelocitySampler,
    deceleration: Option<Deceleration>,
    last_tick: f64,
}

impl<K: Copy + Ord + Debug> ScrollGesture<K> {
    /// Create the gesture for scroll view `view`.
    pub fn new(view: K, config: ScrollConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sampler = VelocitySampler::new(config.velocity_sample_interval, 0.0, Vec2::ZERO);
        Ok(Self {
            view,
            config,
            phase: ScrollPhase::Idle,
            generation: 0,
            touches: Vec::new(),
            anchor_position: Point::ZERO,
            anchor_offset: Vec2::ZERO,
            last_offset: Vec2::ZERO,
            sampler,
            deceleration: None,
            last_tick: 0.0,
        })
    }

    /// The scroll view this gesture drives.
    pub fn view(&self) -> K {
        self.view
    }

    /// Tuning in effect.
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Touches the gesture is following.
    pub fn touches(&self) -> &[TouchId] {
        &self.touches
    }

    /// Whether the scroll view should capture touches starting over its
    /// content.
    pub fn wants_capture(&self) -> bool {
        !self.config.axes.is_empty()
    }

    /// A touch was offered to the scroll view.
    ///
    /// Stops any deceleration in flight (committing where it got to) and
    /// starts tracking. Without a content-touch delay the touch is passed on
    /// to content right away. A touch offered while its end or cancel signal
    /// is being dispatched is declined.
    pub fn touch_start<T, S>(
        &mut self,
        touch: &Touch<K>,
        cx: &mut TouchContext<'_, K>,
        target: &mut T,
        scheduler: &mut S,
    ) -> StartResponse<K>
    where
        T: ScrollTarget + ?Sized,
        S: Scheduler + ?Sized,
    {
        if self.touches.contains(&touch.id()) {
            return StartResponse::Accept;
        }
        // A touch handed around while it lifts is not a new contact.
        if touch
            .event()
            .is_some_and(|e| matches!(e.kind, EventKind::End | EventKind::Cancel))
        {
            trace!(view = ?self.view, touch = ?touch.id(), "ignoring start of an ending touch");
            return StartResponse::Decline;
        }
        self.stop(target);

        if !self.touches.is_empty() {
            // Another finger joins; follow the centroid from here.
            self.touches.push(touch.id());
            self.reanchor(cx);
            debug!(view = ?self.view, touches = self.touches.len(), "scroll touch added");
            return StartResponse::Accept;
        }

        self.touches.push(touch.id());
        self.generation += 1;
        self.phase = ScrollPhase::Tracking;
        self.anchor_position = touch.page();
        self.anchor_offset = target.offset();
        self.last_offset = self.anchor_offset;
        self.sampler.reset(touch.timestamp(), self.anchor_offset);
        debug!(view = ?self.view, touch = ?touch.id(), "scroll tracking");

        if self.config.delays_content_touches {
            scheduler.schedule(
                self.config.content_touch_delay,
                self.handle(TaskKind::ContentDelay),
            );
        } else {
            cx.capture_touch(touch.id(), Some(self.view), true);
        }
        StartResponse::Accept
    }

    /// The content-touch delay fired.
    ///
    /// Returns the touch to hand to content (with
    /// `capture_touch(touch, Some(view), true)`) if the gesture is still
    /// tracking it; stale handles yield `None`.
    pub fn content_delay_elapsed(&mut self, task: TaskHandle) -> Option<TouchId> {
        if task.kind != TaskKind::ContentDelay
            || task.generation != self.generation
            || self.phase != ScrollPhase::Tracking
        {
            trace!(?task, "stale content delay");
            return None;
        }
        self.touches.first().copied()
    }

    /// Followed touches moved.
    ///
    /// Returns [`DragResponse::Claim`] once dragging, so content stacked
    /// above is cancelled, and [`DragResponse::NoChange`] below the
    /// threshold.
    pub fn touches_dragged<T>(
        &mut self,
        changed: &[&Touch<K>],
        cx: &TouchContext<'_, K>,
        target: &mut T,
    ) -> DragResponse
    where
        T: ScrollTarget + ?Sized,
    {
        if !changed.iter().any(|t| self.touches.contains(&t.id())) {
            return DragResponse::NoChange;
        }
        let Some((position, time)) = self.position(cx) else {
            return DragResponse::NoChange;
        };
        let displacement = self.along_axes(position - self.anchor_position);

        match self.phase {
            ScrollPhase::Tracking => {
                if displacement.hypot() <= self.config.drag_threshold {
                    return DragResponse::NoChange;
                }
                // The crossing sample only arms the drag.
                self.phase = ScrollPhase::Dragging;
                self.generation += 1;
                self.anchor_position = position;
                self.anchor_offset = self.last_offset;
                self.sampler.reset(time, self.last_offset);
                debug!(view = ?self.view, "scroll dragging");
                DragResponse::Claim
            }
            ScrollPhase::Dragging => {
                let candidate = self.anchor_offset - displacement;
                let offset = resist_offset(
                    candidate,
                    target.max_offset(),
                    self.anchor_offset,
                    &self.config,
                );
                target.set_transient_offset(offset);
                self.last_offset = offset;
                self.sampler.sample(time, offset);
                trace!(view = ?self.view, ?offset, "scroll drag sample");
                DragResponse::Claim
            }
            ScrollPhase::Idle | ScrollPhase::Decelerating => DragResponse::NoChange,
        }
    }

    /// A followed touch lifted while the scroll view was its innermost
    /// responder.
    ///
    /// A lift before the drag threshold is a tap: the touch is handed to
    /// content, which is then told it ended. A lift while dragging starts
    /// deceleration.
    pub fn touch_end<T, S>(
        &mut self,
        touch: &Touch<K>,
        cx: &mut TouchContext<'_, K>,
        target: &mut T,
        scheduler: &mut S,
    ) where
        T: ScrollTarget + ?Sized,
        S: Scheduler + ?Sized,
    {
        if !self.release(touch.id()) {
            return;
        }
        if !self.touches.is_empty() {
            self.reanchor(cx);
            return;
        }
        match self.phase {
            ScrollPhase::Tracking => {
                self.generation += 1;
                self.phase = ScrollPhase::Idle;
                if touch.touch_responder() == Some(self.view) {
                    cx.capture_touch(touch.id(), Some(self.view), true);
                    debug!(view = ?self.view, touch = ?touch.id(), "tap passed to content");
                }
            }
            ScrollPhase::Dragging => {
                // A finger held still before lifting has no velocity left.
                self.sampler.sample(touch.timestamp(), self.last_offset);
                let velocity = self.sampler.velocity() * self.config.release_amplification;
                self.deceleration = Some(Deceleration::new(
                    self.last_offset,
                    velocity,
                    target.max_offset(),
                    self.config.axes,
                ));
                self.generation += 1;
                self.phase = ScrollPhase::Decelerating;
                self.last_tick = touch.timestamp();
                scheduler.schedule(self.config.tick, self.handle(TaskKind::Tick));
                debug!(view = ?self.view, ?velocity, "scroll decelerating");
            }
            ScrollPhase::Idle | ScrollPhase::Decelerating => {}
        }
    }

    /// A followed touch was cancelled, taken away, or ended while content
    /// sat above the scroll view.
    pub fn touch_cancelled<T>(&mut self, touch: &Touch<K>, cx: &TouchContext<'_, K>, target: &mut T)
    where
        T: ScrollTarget + ?Sized,
    {
        if !self.release(touch.id()) {
            return;
        }
        if !self.touches.is_empty() {
            self.reanchor(cx);
            return;
        }
        if self.phase == ScrollPhase::Dragging {
            target.commit_offset(self.last_offset);
            debug!(view = ?self.view, offset = ?self.last_offset, "scroll drag cancelled");
        }
        self.generation += 1;
        self.phase = ScrollPhase::Idle;
    }

    /// A deceleration tick fired at time `now`.
    ///
    /// Returns whether deceleration continues (another tick was scheduled).
    /// Stale handles are ignored.
    pub fn tick<T, S>(&mut self, task: TaskHandle, now: f64, target: &mut T, scheduler: &mut S) -> bool
    where
        T: ScrollTarget + ?Sized,
        S: Scheduler + ?Sized,
    {
        if task.kind != TaskKind::Tick
            || task.generation != self.generation
            || self.phase != ScrollPhase::Decelerating
        {
            trace!(?task, "stale deceleration tick");
            return false;
        }
        let Some(deceleration) = self.deceleration.as_mut() else {
            return false;
        };
        let elapsed = now - self.last_tick;
        self.last_tick = now;
        let done = deceleration.step(elapsed, &self.config);
        let offset = deceleration.offset();
        self.last_offset = offset;
        if done {
            self.deceleration = None;
            self.phase = ScrollPhase::Idle;
            self.generation += 1;
            target.commit_offset(offset);
            debug!(view = ?self.view, ?offset, "scroll at rest");
            return false;
        }
        target.set_transient_offset(offset);
        scheduler.schedule(self.config.tick, self.handle(TaskKind::Tick));
        true
    }

    /// Stop a deceleration in flight and commit where it got to.
    ///
    /// Returns whether anything was stopped.
    pub fn stop<T>(&mut self, target: &mut T) -> bool
    where
        T: ScrollTarget + ?Sized,
    {
        if self.phase != ScrollPhase::Decelerating {
            return false;
        }
        self.deceleration = None;
        self.phase = ScrollPhase::Idle;
        self.generation += 1;
        target.commit_offset(self.last_offset);
        debug!(view = ?self.view, offset = ?self.last_offset, "scroll deceleration stopped");
        true
    }

    fn handle(&self, kind: TaskKind) -> TaskHandle {
        TaskHandle {
            kind,
            generation: self.generation,
        }
    }

    fn release(&mut self, id: TouchId) -> bool {
        let before = self.touches.len();
        self.touches.retain(|t| *t != id);
        self.touches.len() != before
    }

    /// Centroid of the followed touches and the latest timestamp among them.
    fn position(&self, cx: &TouchContext<'_, K>) -> Option<(Point, f64)> {
        let live: Vec<&Touch<K>> = self.touches.iter().filter_map(|id| cx.touch(*id)).collect();
        let time = live.iter().map(|t| t.timestamp()).reduce(f64::max)?;
        let average = TouchAverage::from_points(live.iter().map(|t| t.page()));
        Some((average.center, time))
    }

    fn reanchor(&mut self, cx: &TouchContext<'_, K>) {
        if let Some((position, time)) = self.position(cx) {
            self.anchor_position = position;
            self.anchor_offset = self.last_offset;
            if self.phase == ScrollPhase::Dragging {
                self.sampler.reset(time, self.last_offset);
            }
        }
    }

    fn along_axes(&self, v: Vec2) -> Vec2 {
        let axes = self.config.axes;
        Vec2::new(
            if axes.contains(ScrollAxes::HORIZONTAL) {
                v.x
            } else {
                0.0
            },
            if axes.contains(ScrollAxes::VERTICAL) {
                v.y
            } else {
                0.0
            },
        )
    }
}
