// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Cross-instance selection coordination.
//!
//! Several editors can be mounted over the same canvas (one per
//! annotated shape), and hit-testing at shape boundaries is ambiguous:
//! without a single arbiter two instances could each believe they own
//! the current gesture. The coordinator is an explicit registry injected
//! into every session at construction (never a hidden module global, so
//! tests can run independent registries side by side).
//!
//! At most one instance holds selection at a time. Every
//! selection-mutating gesture checks `can_instance_have_selection`
//! immediately before committing and silently no-ops when denied. The
//! coordinator never reaches into other instances' state; it only gates
//! future calls. Instances additionally publish snapshots (points,
//! selection, bounds) after each mutation so a host can drive
//! multi-region group transforms without touching live sessions.

use crate::error::EditorError;
use crate::model::InstanceId;
use crate::path::PathPoint;
use kurbo::Rect;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Published per-instance state, refreshed after every mutation.
#[derive(Debug, Clone, Default)]
pub struct InstanceSnapshot {
    /// The instance's canonical point list
    pub points: Vec<PathPoint>,
    /// Selected point indices
    pub selection: Vec<usize>,
    /// Shape bounding box (anchors and control points)
    pub bounds: Option<Rect>,
}

#[derive(Debug, Default)]
struct Registry {
    instances: HashMap<InstanceId, InstanceSnapshot>,
    holder: Option<InstanceId>,
}

/// Process-wide (per registry) selection arbiter.
#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    inner: Mutex<Registry>,
}

impl SelectionCoordinator {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // Single UI thread in practice; recover the data on poisoning.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new editor instance and return its id.
    pub fn register(&self) -> InstanceId {
        let id = InstanceId::next();
        self.registry()
            .instances
            .insert(id, InstanceSnapshot::default());
        tracing::debug!(?id, "editor instance registered");
        id
    }

    /// Deregister an instance, releasing any selection it held.
    pub fn deregister(&self, id: InstanceId) -> Result<(), EditorError> {
        let mut reg = self.registry();
        if reg.instances.remove(&id).is_none() {
            return Err(EditorError::UnknownInstance(id));
        }
        if reg.holder == Some(id) {
            reg.holder = None;
        }
        tracing::debug!(?id, "editor instance deregistered");
        Ok(())
    }

    /// Whether `id` may mutate selection right now: nobody holds it, or
    /// `id` is the holder.
    pub fn can_instance_have_selection(&self, id: InstanceId) -> bool {
        let reg = self.registry();
        reg.instances.contains_key(&id) && reg.holder.is_none_or(|h| h == id)
    }

    /// Claim selection for `id` with the given indices.
    ///
    /// The caller becomes the sole holder; an empty index set releases
    /// the claim. Previously-holding instances keep their own state;
    /// the registry only gates their future gestures.
    pub fn select_points(
        &self,
        id: InstanceId,
        indices: &[usize],
    ) -> Result<(), EditorError> {
        let mut reg = self.registry();
        let Some(snapshot) = reg.instances.get_mut(&id) else {
            return Err(EditorError::UnknownInstance(id));
        };
        snapshot.selection = indices.to_vec();
        reg.holder = if indices.is_empty() { None } else { Some(id) };
        Ok(())
    }

    /// Release `id`'s selection claim, if it holds one.
    pub fn clear_selection(&self, id: InstanceId) -> Result<(), EditorError> {
        let mut reg = self.registry();
        let Some(snapshot) = reg.instances.get_mut(&id) else {
            return Err(EditorError::UnknownInstance(id));
        };
        snapshot.selection.clear();
        if reg.holder == Some(id) {
            reg.holder = None;
        }
        Ok(())
    }

    /// The instance currently holding selection, if any.
    pub fn get_active_instance_id(&self) -> Option<InstanceId> {
        self.registry().holder
    }

    /// Whether `id` is the current selection holder.
    pub fn is_instance_selected(&self, id: InstanceId) -> bool {
        self.registry().holder == Some(id)
    }

    /// Publish an instance's current state for external queries.
    pub fn publish(
        &self,
        id: InstanceId,
        snapshot: InstanceSnapshot,
    ) -> Result<(), EditorError> {
        let mut reg = self.registry();
        let Some(entry) = reg.instances.get_mut(&id) else {
            return Err(EditorError::UnknownInstance(id));
        };
        *entry = snapshot;
        Ok(())
    }

    /// The last published snapshot for an instance.
    pub fn snapshot(&self, id: InstanceId) -> Option<InstanceSnapshot> {
        self.registry().instances.get(&id).cloned()
    }

    /// Ids of all registered instances.
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        self.registry().instances.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn fresh_instances_may_all_select() {
        let coord = SelectionCoordinator::new();
        let a = coord.register();
        let b = coord.register();
        assert!(coord.can_instance_have_selection(a));
        assert!(coord.can_instance_have_selection(b));
        assert!(coord.get_active_instance_id().is_none());
    }

    #[test]
    fn selection_is_exclusive_until_released() {
        let coord = SelectionCoordinator::new();
        let a = coord.register();
        let b = coord.register();

        coord.select_points(a, &[0]).unwrap();
        assert!(coord.can_instance_have_selection(a));
        assert!(!coord.can_instance_have_selection(b));
        assert!(coord.is_instance_selected(a));
        assert_eq!(coord.get_active_instance_id(), Some(a));

        coord.clear_selection(a).unwrap();
        assert!(coord.can_instance_have_selection(b));
    }

    #[test]
    fn empty_selection_releases_the_claim() {
        let coord = SelectionCoordinator::new();
        let a = coord.register();
        let b = coord.register();
        coord.select_points(a, &[1, 2]).unwrap();
        coord.select_points(a, &[]).unwrap();
        assert!(coord.can_instance_have_selection(b));
    }

    #[test]
    fn deregistering_the_holder_releases_selection() {
        let coord = SelectionCoordinator::new();
        let a = coord.register();
        let b = coord.register();
        coord.select_points(a, &[0]).unwrap();
        coord.deregister(a).unwrap();
        assert!(coord.can_instance_have_selection(b));
        assert!(coord.get_active_instance_id().is_none());
    }

    #[test]
    fn unknown_instances_fail_loudly() {
        let coord = SelectionCoordinator::new();
        let ghost = {
            let id = coord.register();
            coord.deregister(id).unwrap();
            id
        };
        assert!(matches!(
            coord.select_points(ghost, &[0]),
            Err(EditorError::UnknownInstance(_))
        ));
        assert!(matches!(
            coord.publish(ghost, InstanceSnapshot::default()),
            Err(EditorError::UnknownInstance(_))
        ));
        assert!(matches!(
            coord.deregister(ghost),
            Err(EditorError::UnknownInstance(_))
        ));
        assert!(!coord.can_instance_have_selection(ghost));
    }

    #[test]
    fn snapshots_round_trip() {
        let coord = SelectionCoordinator::new();
        let a = coord.register();
        let points = vec![crate::path::PathPoint::new(Point::new(1.0, 2.0))];
        coord
            .publish(
                a,
                InstanceSnapshot {
                    points: points.clone(),
                    selection: vec![0],
                    bounds: crate::geometry::bounding_box(&points),
                },
            )
            .unwrap();

        let snap = coord.snapshot(a).unwrap();
        assert_eq!(snap.points, points);
        assert_eq!(snap.selection, vec![0]);
        assert!(snap.bounds.is_some());
    }
}
