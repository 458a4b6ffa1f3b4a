// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking for touches: compute entered/exited transitions from path
//! changes.
//!
//! ## Usage
//!
//! 1) Build the root→view path under a contact with [`responder_path`].
//! 2) Call [`HoverState::update_path`] with that path to get `Entered(..)` / `Exited(..)` transitions.
//!
//! The engine keeps one [`HoverState`] per touch and delivers the resulting
//! transitions to views that advertise
//! [`TOUCH_ENTERED`](crate::types::Capabilities::TOUCH_ENTERED) /
//! [`TOUCH_EXITED`](crate::types::Capabilities::TOUCH_EXITED).
//!
//! ## Minimal example
//!
//! ```
//! use greenhouse_responder::hover::{HoverEvent, HoverState};
//! let mut h: HoverState<u32> = HoverState::new();
//! assert_eq!(h.update_path(&[1, 2]), vec![HoverEvent::Entered(1), HoverEvent::Entered(2)]);
//! assert_eq!(h.update_path(&[1, 3]), vec![HoverEvent::Exited(2), HoverEvent::Entered(3)]);
//! ```

use alloc::vec::Vec;

use crate::view::ViewTree;

/// A hover state machine over root→view paths.
///
/// Ordering semantics:
/// - Exit events are emitted from inner-most to outer-most.
/// - Enter events are emitted from outer-most to inner-most.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState<K: Copy + Eq> {
    current: Vec<K>,
}

/// A hover transition for one touch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The contact moved over the given view (outer→inner).
    Entered(K),
    /// The contact moved off the given view (inner→outer).
    Exited(K),
}

impl<K: Copy + Eq> HoverState<K> {
    /// Create an empty hover state.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// Return the current root→view path (if any).
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Clear the current path, returning exits from inner-most to outer-most.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        let out = self.current.iter().rev().map(|&k| HoverEvent::Exited(k)).collect();
        self.current.clear();
        out
    }

    /// Update the hovered path and return the transitions from the previous
    /// path to `new_path`.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        // Shared ancestry: length of the common prefix.
        let lca = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out: Vec<HoverEvent<K>> = self.current[lca..]
            .iter()
            .rev()
            .map(|&k| HoverEvent::Exited(k))
            .collect();
        out.extend(new_path[lca..].iter().map(|&k| HoverEvent::Entered(k)));

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}

/// Build the root→`view` path by following next-responder links.
pub fn responder_path<K: Copy + Eq, V: ViewTree<K> + ?Sized>(views: &V, view: K) -> Vec<K> {
    let mut out = Vec::new();
    let mut cur = Some(view);
    // Collect to root; the view tree is acyclic.
    while let Some(v) = cur {
        out.push(v);
        cur = views.next_responder(&v);
    }
    out.reverse();
    out
}
