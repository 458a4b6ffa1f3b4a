// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greenhouse Scroll: touch scrolling with edge resistance and inertia.
//!
//! ## Overview
//!
//! - [`physics`]: the rubber-band edge resistance curve, a velocity
//!   sampler, and the fixed-tick deceleration integrator with edge rebound.
//! - [`gesture`]: [`ScrollGesture`](crate::gesture::ScrollGesture), the
//!   idle → tracking → dragging → decelerating state machine a scroll view
//!   drives from its `greenhouse_responder` callbacks.
//! - [`target`]: the collaborator traits the gesture writes offsets to
//!   ([`ScrollTarget`](crate::target::ScrollTarget)) and asks for timers
//!   ([`Scheduler`](crate::target::Scheduler)).
//! - [`config`]: tuning with validated defaults.
//!
//! ## Edge resistance
//!
//! ```
//! use greenhouse_scroll::physics::resist;
//!
//! // In bounds: unchanged.
//! assert_eq!(resist(40.0, 100.0, 0.998, 320.0), 40.0);
//! // Past the far edge: compressed toward the edge.
//! let pulled = resist(150.0, 100.0, 0.998, 320.0);
//! assert!(pulled > 100.0 && pulled < 150.0);
//! ```
//!
//! ## Wiring a scroll view
//!
//! The scroll view advertises `CAPTURE_TOUCH` plus the responder callbacks,
//! answers `capture_touch` with [`wants_capture`](crate::gesture::ScrollGesture::wants_capture),
//! and forwards `touch_start`, `touches_dragged`, `touch_end` and
//! `touch_cancelled` to the gesture. The host's timer calls
//! [`tick`](crate::gesture::ScrollGesture::tick) for deceleration ticks, and
//! for the content-touch delay hands the touch returned by
//! [`content_delay_elapsed`](crate::gesture::ScrollGesture::content_delay_elapsed)
//! to `RootResponder::capture_touch(touch, Some(scroll_view), true)`.

pub mod config;
pub mod gesture;
pub mod physics;
pub mod target;
