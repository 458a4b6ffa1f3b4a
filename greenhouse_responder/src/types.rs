// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for touch dispatch: identifiers, raw platform input, capability
//! flags, and the responses views give back to the engine.
//!
//! ## Overview
//!
//! These types describe the touch protocol and its inputs/outputs.
//! They are referenced by the [`engine`](crate::engine) and the
//! [`router`](crate::router), and implemented against by view trees.

use alloc::vec::Vec;

use kurbo::Point;

/// Opaque identifier of one physical contact.
///
/// Stable from the platform's "touch started" signal until the matching
/// "touch ended" or "touch cancelled" signal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TouchId(pub u32);

/// One changed contact inside a raw platform event.
///
/// `target` is the view the host resolved under the contact. On a start it
/// becomes the touch's fixed [`target`](crate::touch::Touch::target); on
/// later signals it only drives hover.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTouch<K> {
    /// Contact identifier.
    pub id: TouchId,
    /// Page coordinates of the contact.
    pub page: Point,
    /// View the platform target resolves to.
    pub target: K,
}

/// A raw multi-touch platform event: the "changed touches" of one hardware
/// update.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTouchEvent<K> {
    /// Event timestamp in milliseconds from a monotonic source.
    pub timestamp: f64,
    /// Contacts that changed in this event.
    pub changed: Vec<RawTouch<K>>,
}

impl<K> RawTouchEvent<K> {
    /// Create an event with the given timestamp and changed contacts.
    pub fn new(timestamp: f64, changed: Vec<RawTouch<K>>) -> Self {
        Self { timestamp, changed }
    }
}

/// Kind of platform signal currently being dispatched.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventKind {
    /// A contact started.
    Start,
    /// A contact moved.
    Move,
    /// A contact lifted.
    End,
    /// The platform cancelled a contact.
    Cancel,
}

/// Platform event attached to a touch while one dispatch cycle runs.
///
/// Detached again once the cycle completes so no platform state is retained
/// between events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlatformEvent {
    /// Signal being dispatched.
    pub kind: EventKind,
    /// Timestamp of the raw event in milliseconds.
    pub timestamp: f64,
}

bitflags::bitflags! {
    /// Optional touch callbacks and properties a view advertises.
    ///
    /// The engine never invokes a callback the view does not advertise.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Wants first refusal on touches that start in its subtree.
        const CAPTURE_TOUCH      = 0b0000_0001;
        /// Can become a touch responder.
        const TOUCH_START        = 0b0000_0010;
        /// Receives movement of touches it is stacked on.
        const TOUCHES_DRAGGED    = 0b0000_0100;
        /// Told when its touch lifts.
        const TOUCH_END          = 0b0000_1000;
        /// Told when its touch is cancelled or taken away.
        const TOUCH_CANCELLED    = 0b0001_0000;
        /// Told when a touch moves over it.
        const TOUCH_ENTERED      = 0b0010_0000;
        /// Told when a touch moves off it.
        const TOUCH_EXITED       = 0b0100_0000;
        /// Tracks several concurrent touches.
        const ACCEPTS_MULTITOUCH = 0b1000_0000;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::empty()
    }
}

impl Capabilities {
    /// Every callback a plain touch-handling view needs.
    pub const RESPONDER: Self = Self::TOUCH_START
        .union(Self::TOUCHES_DRAGGED)
        .union(Self::TOUCH_END)
        .union(Self::TOUCH_CANCELLED);
}

/// Answer to a "touch start" offer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StartResponse<K> {
    /// The offered view takes the touch.
    Accept,
    /// The offered view refuses; ownership does not change.
    Decline,
    /// The offered view nominates another view to take the touch.
    Delegate(K),
}

/// Answer to a "touches dragged" notification.
///
/// Movement is offered to each touch's top responder first, then down the
/// responder stack.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DragResponse {
    /// Take the touches exclusively; every responder stacked above is cancelled.
    Claim,
    /// Give the touches up; they fall back to the responder below.
    Decline,
    /// Keep ownership as is and let the responder below see the movement.
    NoChange,
    /// Keep ownership as is and stop offering this movement further down.
    StopPropagation,
}

/// Which signal ended a touch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EndKind {
    /// The contact lifted normally.
    End,
    /// The platform cancelled the contact.
    Cancel,
}

/// Aggregate geometry of the touches owned by one view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchAverage {
    /// Centroid of the touches.
    pub center: Point,
    /// Mean distance of each touch from the centroid.
    pub distance: f64,
    /// Number of touches averaged.
    pub count: usize,
}

impl Default for TouchAverage {
    fn default() -> Self {
        Self {
            center: Point::ZERO,
            distance: 0.0,
            count: 0,
        }
    }
}

impl TouchAverage {
    /// Average a set of page positions. An empty set yields the zeroed record.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
        I::IntoIter: Clone,
    {
        let points = points.into_iter();
        let mut sum = kurbo::Vec2::ZERO;
        let mut count = 0_usize;
        for p in points.clone() {
            sum += p.to_vec2();
            count += 1;
        }
        if count == 0 {
            return Self::default();
        }
        let center = (sum / count as f64).to_point();
        let total: f64 = points.map(|p| (p - center).hypot()).sum();
        Self {
            center,
            distance: total / count as f64,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_nothing_is_zeroed() {
        let avg = TouchAverage::from_points(core::iter::empty());
        assert_eq!(avg, TouchAverage::default());
        assert_eq!(avg.count, 0);
    }

    #[test]
    fn average_of_two_points_is_midpoint_and_half_span() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let avg = TouchAverage::from_points(pts);
        assert_eq!(avg.center, Point::new(5.0, 0.0));
        assert!((avg.distance - 5.0).abs() < 1e-9);
        assert_eq!(avg.count, 2);
    }

    #[test]
    fn average_distance_is_mean_not_max() {
        // Centroid (0, 0): distances 1, 3, 4.
        let pts = [
            Point::new(-1.0, 0.0),
            Point::new(-3.0, 0.0),
            Point::new(4.0, 0.0),
        ];
        let avg = TouchAverage::from_points(pts);
        assert_eq!(avg.center, Point::new(0.0, 0.0));
        assert!((avg.distance - 8.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn responder_capabilities_exclude_capture_and_multitouch() {
        let caps = Capabilities::RESPONDER;
        assert!(caps.contains(Capabilities::TOUCH_START | Capabilities::TOUCH_END));
        assert!(!caps.contains(Capabilities::CAPTURE_TOUCH));
        assert!(!caps.contains(Capabilities::ACCEPTS_MULTITOUCH));
    }
}
