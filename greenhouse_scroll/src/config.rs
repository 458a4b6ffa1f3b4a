// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning for the scroll gesture and its physics.
//!
//! Distances are in page pixels, times in milliseconds. Velocities during
//! deceleration are in pixels per tick.

use thiserror::Error;

bitflags::bitflags! {
    /// Axes a scroll view may move along.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ScrollAxes: u8 {
        /// Left/right.
        const HORIZONTAL = 0b01;
        /// Up/down.
        const VERTICAL   = 0b10;
    }
}

impl Default for ScrollAxes {
    fn default() -> Self {
        Self::all()
    }
}

/// A setting outside its usable range.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Value must be zero or more.
    #[error("{name} must be non-negative, got {value}")]
    Negative {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Value must be greater than zero.
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Value must lie strictly between 0 and 1.
    #[error("{name} must be in (0, 1), got {value}")]
    NotAFraction {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// Scroll gesture tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Displacement a contact must exceed before a drag starts.
    pub drag_threshold: f64,
    /// Per-pixel factor of the edge resistance curve.
    pub resistance_coefficient: f64,
    /// Largest distance content can be pulled past an edge.
    pub resistance_asymptote: f64,
    /// Minimum time between velocity samples.
    pub velocity_sample_interval: f64,
    /// Multiplier from the release velocity (px/ms) to the initial
    /// deceleration velocity (px/tick).
    pub release_amplification: f64,
    /// Velocity kept per tick while decelerating.
    pub decay_rate: f64,
    /// Deceleration tick period.
    pub tick: f64,
    /// Fraction of the overrun taken off the velocity per tick while content
    /// still moves away from an edge.
    pub deceleration_from_edge: f64,
    /// Fraction of the overrun used as velocity back toward the edge.
    pub acceleration_to_edge: f64,
    /// Speed below which deceleration may stop.
    pub min_velocity: f64,
    /// How long a new touch is held back from content before the content is
    /// allowed to respond.
    pub content_touch_delay: f64,
    /// Whether touches reach content only after the delay (or as a tap).
    pub delays_content_touches: bool,
    /// Axes the view scrolls along.
    pub axes: ScrollAxes,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            resistance_coefficient: 0.998,
            resistance_asymptote: 320.0,
            velocity_sample_interval: 10.0,
            release_amplification: 10.0,
            decay_rate: 0.95,
            tick: 10.0,
            deceleration_from_edge: 0.05,
            acceleration_to_edge: 0.04,
            min_velocity: 1.0,
            content_touch_delay: 150.0,
            delays_content_touches: true,
            axes: ScrollAxes::all(),
        }
    }
}

impl ScrollConfig {
    /// Set the axes the view scrolls along.
    pub fn with_axes(mut self, axes: ScrollAxes) -> Self {
        self.axes = axes;
        self
    }

    /// Set the drag threshold.
    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Choose whether content sees touches only after the delay.
    pub fn with_delays_content_touches(mut self, delays: bool) -> Self {
        self.delays_content_touches = delays;
        self
    }

    /// Set the content-touch delay.
    pub fn with_content_touch_delay(mut self, delay: f64) -> Self {
        self.content_touch_delay = delay;
        self
    }

    /// Set the per-tick decay rate.
    pub fn with_decay_rate(mut self, rate: f64) -> Self {
        self.decay_rate = rate;
        self
    }

    /// Check every setting, reporting the first one out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("drag_threshold", self.drag_threshold)?;
        non_negative("content_touch_delay", self.content_touch_delay)?;
        non_negative("velocity_sample_interval", self.velocity_sample_interval)?;
        non_negative("deceleration_from_edge", self.deceleration_from_edge)?;
        positive("resistance_asymptote", self.resistance_asymptote)?;
        positive("release_amplification", self.release_amplification)?;
        positive("tick", self.tick)?;
        positive("min_velocity", self.min_velocity)?;
        positive("acceleration_to_edge", self.acceleration_to_edge)?;
        fraction("resistance_coefficient", self.resistance_coefficient)?;
        fraction("decay_rate", self.decay_rate)?;
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::NotAFraction { name, value })
    }
}
