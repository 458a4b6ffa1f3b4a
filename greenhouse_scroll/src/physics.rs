// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll physics: edge resistance, velocity sampling, and the deceleration
//! integrator.
//!
//! ## Edge resistance
//!
//! Inside `[0, max]` an offset passes through unchanged. Past either edge the
//! overrun `o` is compressed to `a - a·c^o`, which keeps growing with `o`
//! but never reaches the asymptote `a`.
//!
//! ## Deceleration
//!
//! A fixed-period integrator. Each tick the offset advances by the current
//! velocity, then the velocity decays geometrically. Past an edge, velocity still heading away is
//! bled off in proportion to the overrun; otherwise the content is pulled
//! back toward the edge and snaps onto it rather than crossing it. The run
//! finishes once every axis is in bounds and slower than the minimum
//! velocity.

use kurbo::Vec2;
use tracing::trace;

use crate::config::{ScrollAxes, ScrollConfig};

/// Apply edge resistance to one axis.
///
/// `max` below zero is treated as zero (content smaller than the view).
pub fn resist(offset: f64, max: f64, coefficient: f64, asymptote: f64) -> f64 {
    let max = max.max(0.0);
    if offset < 0.0 {
        -(asymptote - asymptote * coefficient.powf(-offset))
    } else if offset > max {
        max + (asymptote - asymptote * coefficient.powf(offset - max))
    } else {
        offset
    }
}

/// Apply edge resistance on every enabled axis; disabled axes are pinned to
/// `fixed`.
pub fn resist_offset(offset: Vec2, max: Vec2, fixed: Vec2, config: &ScrollConfig) -> Vec2 {
    let axis = |enabled: bool, o: f64, m: f64, f: f64| {
        if enabled {
            resist(o, m, config.resistance_coefficient, config.resistance_asymptote)
        } else {
            f
        }
    };
    Vec2::new(
        axis(
            config.axes.contains(ScrollAxes::HORIZONTAL),
            offset.x,
            max.x,
            fixed.x,
        ),
        axis(
            config.axes.contains(ScrollAxes::VERTICAL),
            offset.y,
            max.y,
            fixed.y,
        ),
    )
}

/// Offset velocity from samples taken at least an interval apart.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocitySampler {
    interval: f64,
    last_time: f64,
    last_offset: Vec2,
    velocity: Vec2,
}

impl VelocitySampler {
    /// Create a sampler anchored at `offset` at time `time`.
    pub fn new(interval: f64, time: f64, offset: Vec2) -> Self {
        Self {
            interval,
            last_time: time,
            last_offset: offset,
            velocity: Vec2::ZERO,
        }
    }

    /// Re-anchor, forgetting the current velocity.
    pub fn reset(&mut self, time: f64, offset: Vec2) {
        self.last_time = time;
        self.last_offset = offset;
        self.velocity = Vec2::ZERO;
    }

    /// Record an offset. The velocity only updates once at least one
    /// interval has passed since the previous accepted sample.
    pub fn sample(&mut self, time: f64, offset: Vec2) {
        let dt = time - self.last_time;
        if dt < self.interval || dt <= 0.0 {
            return;
        }
        self.velocity = (offset - self.last_offset) / dt;
        self.last_time = time;
        self.last_offset = offset;
    }

    /// Last measured velocity in pixels per millisecond.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// Inertial run after a release.
#[derive(Clone, Debug, PartialEq)]
pub struct Deceleration {
    offset: Vec2,
    velocity: Vec2,
    max: Vec2,
}

impl Deceleration {
    /// Start decelerating from `offset` at `velocity` (pixels per tick),
    /// with content bounds `[0, max]`.
    pub fn new(offset: Vec2, velocity: Vec2, max: Vec2, axes: ScrollAxes) -> Self {
        let velocity = Vec2::new(
            if axes.contains(ScrollAxes::HORIZONTAL) {
                velocity.x
            } else {
                0.0
            },
            if axes.contains(ScrollAxes::VERTICAL) {
                velocity.y
            } else {
                0.0
            },
        );
        Self {
            offset,
            velocity,
            max: Vec2::new(max.x.max(0.0), max.y.max(0.0)),
        }
    }

    /// Current offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Current velocity in pixels per tick.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Advance by `elapsed` milliseconds. Returns `true` once the run has
    /// come to rest inside the bounds.
    pub fn step(&mut self, elapsed: f64, config: &ScrollConfig) -> bool {
        let ticks = (elapsed / config.tick).max(0.0);
        let decay = config.decay_rate.powf(ticks);
        let (x, vx, x_rest) = step_axis(
            self.offset.x,
            self.velocity.x,
            self.max.x,
            ticks,
            decay,
            config,
        );
        let (y, vy, y_rest) = step_axis(
            self.offset.y,
            self.velocity.y,
            self.max.y,
            ticks,
            decay,
            config,
        );
        self.offset = Vec2::new(x, y);
        self.velocity = Vec2::new(vx, vy);
        trace!(offset = ?self.offset, velocity = ?self.velocity, "deceleration tick");
        x_rest && y_rest
    }
}

/// One axis of one tick: returns the new offset, the new velocity, and
/// whether the axis is at rest.
fn step_axis(
    offset: f64,
    velocity: f64,
    max: f64,
    ticks: f64,
    decay: f64,
    config: &ScrollConfig,
) -> (f64, f64, bool) {
    let mut pos = offset + velocity * ticks;
    let mut v = velocity * decay;

    let overrun = if pos < 0.0 {
        pos
    } else if pos > max {
        pos - max
    } else {
        0.0
    };

    if overrun != 0.0 {
        if v * overrun > 0.0 {
            // Still heading away from the content.
            v -= overrun * config.deceleration_from_edge;
        } else {
            let pull = (overrun.abs() * config.acceleration_to_edge)
                .max(overrun.abs().min(config.min_velocity));
            v = -overrun.signum() * pull;
            let edge = if overrun < 0.0 { 0.0 } else { max };
            let next = pos + v;
            if (overrun < 0.0 && next >= edge) || (overrun > 0.0 && next <= edge) {
                pos = edge;
                v = 0.0;
            }
        }
    }

    let in_bounds = (0.0..=max).contains(&pos);
    (pos, v, in_bounds && v.abs() < config.min_velocity)
}
