// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What the gesture moves and how it asks for time.

use kurbo::Vec2;

/// The scrolled content as seen by the gesture.
pub trait ScrollTarget {
    /// Largest offset on each axis; the smallest is zero.
    fn max_offset(&self) -> Vec2;

    /// Offset currently shown.
    fn offset(&self) -> Vec2;

    /// Show `offset` without notifying observers. Used for every drag sample
    /// and deceleration tick.
    fn set_transient_offset(&mut self, offset: Vec2);

    /// Store `offset` as the view's scroll position, notifying observers.
    /// Called once when a gesture comes to rest.
    fn commit_offset(&mut self, offset: Vec2);
}

/// Kind of timer a gesture asked for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TaskKind {
    /// End of the content-touch delay.
    ContentDelay,
    /// Next deceleration tick.
    Tick,
}

/// Token handed to the scheduler and given back when the timer fires.
///
/// Handles from a superseded gesture phase are stale: the gesture ignores
/// them, so the host never has to unschedule anything.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskHandle {
    pub(crate) kind: TaskKind,
    pub(crate) generation: u64,
}

impl TaskHandle {
    /// Kind of timer.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }
}

/// Single-shot delayed callbacks.
pub trait Scheduler {
    /// Fire `task` back into the gesture after `delay_ms` milliseconds.
    fn schedule(&mut self, delay_ms: f64, task: TaskHandle);
}
