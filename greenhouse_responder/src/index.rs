// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional view ⇄ touch bookkeeping.
//!
//! ## Overview
//!
//! [`ViewTouchIndex`] records which view currently owns each touch and, per
//! view, the set of touches it owns. A view has an entry exactly while it
//! owns at least one touch; entries are removed eagerly when the last touch
//! goes away. Every operation reports the resulting "has active touch"
//! transitions as an [`IndexChange`], so the caller can flip the view's
//! indicator exactly once per transition.
//!
//! The index is pure bookkeeping: it never calls into views.

use alloc::collections::{BTreeMap, BTreeSet};

use crate::touch::Touch;
use crate::types::{TouchAverage, TouchId};

/// "Has active touch" transitions produced by one index operation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IndexChange<K> {
    /// View that went from zero touches to one.
    pub activated: Option<K>,
    /// View that went from one touch to zero.
    pub deactivated: Option<K>,
}

impl<K> Default for IndexChange<K> {
    fn default() -> Self {
        Self {
            activated: None,
            deactivated: None,
        }
    }
}

impl<K> IndexChange<K> {
    /// Whether no indicator changed.
    pub fn is_empty(&self) -> bool {
        self.activated.is_none() && self.deactivated.is_none()
    }
}

/// View → touches and touch → view mapping.
#[derive(Clone, Debug)]
pub struct ViewTouchIndex<K> {
    views: BTreeMap<K, BTreeSet<TouchId>>,
    owners: BTreeMap<TouchId, K>,
}

impl<K> Default for ViewTouchIndex<K> {
    fn default() -> Self {
        Self {
            views: BTreeMap::new(),
            owners: BTreeMap::new(),
        }
    }
}

impl<K: Copy + Ord> ViewTouchIndex<K> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `view` owns `touch`.
    ///
    /// A touch has one owner; assigning it elsewhere first releases it from
    /// its previous owner.
    pub fn assign(&mut self, touch: TouchId, view: K) -> IndexChange<K> {
        if self.owners.get(&touch) == Some(&view) {
            return IndexChange::default();
        }
        let mut change = self.unassign(touch);
        let set = self.views.entry(view).or_default();
        if set.is_empty() {
            change.activated = Some(view);
        }
        set.insert(touch);
        self.owners.insert(touch, view);
        change
    }

    /// Release `touch` from whichever view owns it.
    pub fn unassign(&mut self, touch: TouchId) -> IndexChange<K> {
        let mut change = IndexChange::default();
        let Some(view) = self.owners.remove(&touch) else {
            return change;
        };
        if let Some(set) = self.views.get_mut(&view) {
            set.remove(&touch);
            if set.is_empty() {
                self.views.remove(&view);
                change.deactivated = Some(view);
            }
        }
        change
    }

    /// The live set of touches owned by `view`, or `None` if it owns none.
    pub fn touches_for_view(&self, view: &K) -> Option<&BTreeSet<TouchId>> {
        self.views.get(view)
    }

    /// Whether `view` owns at least one touch.
    pub fn has_active_touch(&self, view: &K) -> bool {
        self.views.contains_key(view)
    }

    /// The view that owns `touch`.
    pub fn owner_of(&self, touch: TouchId) -> Option<K> {
        self.owners.get(&touch).copied()
    }

    /// Number of views that own at least one touch.
    pub fn active_views(&self) -> usize {
        self.views.len()
    }

    /// Centroid and mean spread of the touches owned by `view`.
    pub fn averaged_touches_for_view(
        &self,
        view: &K,
        touches: &BTreeMap<TouchId, Touch<K>>,
    ) -> TouchAverage {
        let Some(ids) = self.views.get(view) else {
            return TouchAverage::default();
        };
        TouchAverage::from_points(ids.iter().filter_map(|id| touches.get(id).map(Touch::page)))
    }
}
