// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Per-instance selection state.
//!
//! The selected set holds point *indices* into the canonical list (the
//! host-facing convention); the active and last-added markers hold point
//! *ids* so they survive reordering. The index set wraps an
//! `Arc<BTreeSet>` so snapshots are cheap to clone and iteration order is
//! deterministic for multi-point operations. Mutations are copy-on-write.
//!
//! The active point is where the next drawn segment originates and the
//! reference for closing-eligibility checks; the last-added point is its
//! fallback before any explicit activity.

use crate::model::PointId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Selected point indices plus the active / last-added markers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    indices: Arc<BTreeSet<usize>>,
    active: Option<PointId>,
    last_added: Option<PointId>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no points are selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of selected points.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the point at `index` is selected.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Iterate selected indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Add an index to the selection.
    pub fn insert(&mut self, index: usize) {
        Arc::make_mut(&mut self.indices).insert(index);
    }

    /// Remove an index from the selection.
    pub fn remove(&mut self, index: usize) {
        Arc::make_mut(&mut self.indices).remove(&index);
    }

    /// Toggle an index (shift-click multi-select).
    pub fn toggle(&mut self, index: usize) {
        let set = Arc::make_mut(&mut self.indices);
        if !set.remove(&index) {
            set.insert(index);
        }
    }

    /// Replace the selected set wholesale.
    pub fn set_indices(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.indices = Arc::new(indices.into_iter().collect());
    }

    /// Select exactly one point and make it active.
    pub fn select_only(&mut self, index: usize, id: PointId) {
        self.set_indices([index]);
        self.active = Some(id);
    }

    /// Clear the selected set and the active marker.
    ///
    /// The last-added marker survives; it is drawing history, not
    /// selection.
    pub fn clear(&mut self) {
        self.indices = Arc::new(BTreeSet::new());
        self.active = None;
    }

    /// The explicitly active point id, if any.
    pub fn active(&self) -> Option<PointId> {
        self.active
    }

    /// Set or clear the active point id.
    pub fn set_active(&mut self, id: Option<PointId>) {
        self.active = id;
    }

    /// The last point added by drawing, if any.
    pub fn last_added(&self) -> Option<PointId> {
        self.last_added
    }

    /// Record the most recently added point.
    pub fn set_last_added(&mut self, id: Option<PointId>) {
        self.last_added = id;
    }

    /// The point the next drawn segment originates from: the active
    /// point, falling back to the last added one.
    pub fn active_or_last(&self) -> Option<PointId> {
        self.active.or(self.last_added)
    }

    /// Shift indices down past a batch of removals (ascending order).
    ///
    /// Removed indices drop out; every survivor greater than a removed
    /// index moves down by the number of removals before it.
    pub fn shift_for_removal(&mut self, removed: &[usize]) {
        if removed.is_empty() {
            return;
        }
        let next: BTreeSet<usize> = self
            .indices
            .iter()
            .filter(|i| !removed.contains(i))
            .map(|&i| i - removed.iter().take_while(|&&r| r < i).count())
            .collect();
        self.indices = Arc::new(next);
    }

    /// Shift indices up for an insertion at `at`.
    pub fn shift_for_insertion(&mut self, at: usize) {
        let next: BTreeSet<usize> = self
            .indices
            .iter()
            .map(|&i| if i >= at { i + 1 } else { i })
            .collect();
        self.indices = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_selection_is_empty() {
        let sel = Selection::new();
        assert!(sel.is_empty());
        assert_eq!(sel.len(), 0);
        assert!(sel.active_or_last().is_none());
    }

    #[test]
    fn insert_toggle_remove() {
        let mut sel = Selection::new();
        sel.insert(3);
        assert!(sel.contains(3));
        sel.toggle(3);
        assert!(!sel.contains(3));
        sel.toggle(5);
        assert!(sel.contains(5));
        sel.remove(5);
        assert!(sel.is_empty());
    }

    #[test]
    fn select_only_sets_active() {
        let id = PointId::next();
        let mut sel = Selection::new();
        sel.insert(0);
        sel.insert(1);
        sel.select_only(2, id);
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(sel.active(), Some(id));
    }

    #[test]
    fn active_falls_back_to_last_added() {
        let added = PointId::next();
        let mut sel = Selection::new();
        sel.set_last_added(Some(added));
        assert_eq!(sel.active_or_last(), Some(added));

        let active = PointId::next();
        sel.set_active(Some(active));
        assert_eq!(sel.active_or_last(), Some(active));
    }

    #[test]
    fn clear_keeps_last_added() {
        let added = PointId::next();
        let mut sel = Selection::new();
        sel.insert(1);
        sel.set_active(Some(added));
        sel.set_last_added(Some(added));
        sel.clear();
        assert!(sel.is_empty());
        assert!(sel.active().is_none());
        assert_eq!(sel.last_added(), Some(added));
    }

    #[test]
    fn removal_shifts_higher_indices_down() {
        let mut sel = Selection::new();
        sel.set_indices([0, 2, 5, 7]);
        sel.shift_for_removal(&[2, 6]);
        // 2 drops out, 5 → 4, 7 → 5.
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![0, 4, 5]);
    }

    #[test]
    fn insertion_shifts_higher_indices_up() {
        let mut sel = Selection::new();
        sel.set_indices([0, 2, 4]);
        sel.shift_for_insertion(2);
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![0, 3, 5]);
    }

    #[test]
    fn clones_are_independent() {
        let mut sel = Selection::new();
        sel.insert(1);
        let mut other = sel.clone();
        other.insert(2);
        assert!(!sel.contains(2));
        assert!(other.contains(2));
    }
}
