// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Point mutation operations.
//!
//! Every operation here preserves the reference-graph invariants: no
//! back-reference ever points at an absent id, ids are never reused, and
//! closure stays a derived property of the graph rather than stored
//! state. Operations that cannot apply (cap reached, ineligible closure,
//! unknown target) return without mutating; the host learns what
//! happened from the absence of an event.

use super::{EditSession, InteractionState};
use crate::editing::mouse::Handle;
use crate::events::EditorEvent;
use crate::geometry;
use crate::model::PointId;
use crate::path::{self, PathPoint};
use crate::settings;
use kurbo::{Affine, Point, Vec2};
use std::collections::{HashMap, HashSet};

impl EditSession {
    // ===== Adding points =====

    /// Append a point at a model-space position, chained to the active
    /// point (skeleton) or the last point (linear). The new point
    /// becomes active. Returns `None` when the point cap is reached.
    pub fn add_point(&mut self, pos: Point) -> Option<PointId> {
        if self.at_point_cap() {
            return None;
        }
        let pos = self.conform(pos);
        let prev = if self.config().skeleton {
            self.active_point_id()
        } else {
            self.points().last().map(|p| p.id)
        };

        let pt = match prev {
            Some(prev) => PathPoint::with_prev(pos, prev),
            None => PathPoint::new(pos),
        };
        let id = pt.id;
        let index = self.points().len();
        self.points_mut().push(pt);

        let selection = self.selection_mut();
        selection.set_last_added(Some(id));
        selection.set_active(Some(id));

        self.emit(EditorEvent::PointAdded { id, index });
        self.emit(EditorEvent::PathShapeChanged);
        self.publish();
        Some(id)
    }

    /// Insert a point on the segment nearest to `pos` (shift-click).
    ///
    /// The new point is spliced into the back-reference chain between
    /// the segment's endpoints; the active point does not change, so
    /// drawing continues from where it was. Only genuine graph segments
    /// take an insertion; the hit lookup follows the reference graph in
    /// skeleton mode, where array neighbors need not be connected.
    pub fn insert_point_on_segment(&mut self, pos: Point) -> Option<PointId> {
        if self.at_point_cap() {
            return None;
        }
        let hit = self.nearest_segment_hit(pos)?;
        if !self.segment_spliceable(&hit) {
            return None;
        }
        let anchor = self.conform(hit.point);
        let prev = self.points()[hit.from_index].id;
        let pt = PathPoint::with_prev(anchor, prev);
        let id = pt.id;

        let index = if hit.to_index == 0 && self.is_closed() {
            // Closing segment: append at the end and re-aim the first
            // point's closing reference at the new point.
            let points = self.points_mut();
            points[0].prev = Some(id);
            points.push(pt);
            points.len() - 1
        } else {
            let at = hit.to_index;
            let points = self.points_mut();
            points[at].prev = Some(id);
            points.insert(at, pt);
            self.selection_mut().shift_for_insertion(at);
            at
        };

        self.emit(EditorEvent::PointAdded { id, index });
        self.emit(EditorEvent::PathShapeChanged);
        self.publish();
        Some(id)
    }

    fn at_point_cap(&self) -> bool {
        self.config()
            .max_points
            .is_some_and(|max| self.points().len() >= max)
    }

    // ===== Deleting points =====

    /// Delete the point at `index`.
    pub fn delete_point(&mut self, index: usize) {
        if let Some(id) = self.points().get(index).map(|p| p.id) {
            self.delete_point_ids(&[id]);
        }
    }

    /// Delete a batch of points by id. Unknown ids are skipped, so the
    /// operation is idempotent.
    ///
    /// Survivors whose predecessor chain leads into the deleted set are
    /// rewired to the nearest surviving ancestor; the chase is bounded
    /// by the list length so corrupt chains cannot loop.
    pub fn delete_point_ids(&mut self, ids: &[PointId]) {
        let doomed: HashSet<PointId> = ids
            .iter()
            .copied()
            .filter(|&id| self.index_of(id).is_some())
            .collect();
        if doomed.is_empty() {
            return;
        }

        let was_closed = self.is_closed();
        let removed_indices: Vec<usize> = self
            .points()
            .iter()
            .enumerate()
            .filter(|(_, p)| doomed.contains(&p.id))
            .map(|(i, _)| i)
            .collect();
        let removed_ids: Vec<PointId> = removed_indices
            .iter()
            .map(|&i| self.points()[i].id)
            .collect();

        {
            let points = self.points_mut();
            let hop_limit = points.len();
            let prev_of: HashMap<PointId, Option<PointId>> =
                points.iter().map(|p| (p.id, p.prev)).collect();

            for pt in points.iter_mut() {
                if doomed.contains(&pt.id) {
                    continue;
                }
                let mut hops = 0;
                while let Some(prev) = pt.prev {
                    if !doomed.contains(&prev) {
                        break;
                    }
                    pt.prev = prev_of.get(&prev).copied().flatten();
                    hops += 1;
                    if hops > hop_limit {
                        pt.prev = None;
                        break;
                    }
                }
                // A collapsed ring must not leave a self-reference.
                if pt.prev == Some(pt.id) {
                    pt.prev = None;
                }
            }
            points.retain(|p| !doomed.contains(&p.id));
        }

        // A closed ring that degenerates below three straight points
        // reopens instead of surviving as a two-point loop.
        if was_closed
            && self.is_closed()
            && self.points().len() < 3
            && !self.points().iter().any(|p| p.bezier)
        {
            self.points_mut()[0].prev = None;
        }

        self.selection_mut().shift_for_removal(&removed_indices);
        if self
            .selection()
            .active()
            .is_some_and(|id| doomed.contains(&id))
        {
            self.selection_mut().set_active(None);
        }
        if self
            .selection()
            .last_added()
            .is_some_and(|id| doomed.contains(&id))
        {
            let fallback = self.points().last().map(|p| p.id);
            self.selection_mut().set_last_added(fallback);
        }

        for id in removed_ids {
            self.emit(EditorEvent::PointRemoved { id });
        }
        self.emit(EditorEvent::PathShapeChanged);
        if was_closed && !self.is_closed() {
            self.emit(EditorEvent::PathClosedChanged { closed: false });
        }
        self.publish();
    }

    // ===== Conversion =====

    /// Convert a point between line and bezier. Returns false when the
    /// conversion is not possible.
    ///
    /// To-bezier synthesizes handles along the chord between the point's
    /// two graph neighbors, so an endpoint of an open path (one
    /// neighbor) cannot become bezier.
    pub fn convert_point(&mut self, index: usize, to_bezier: bool) -> bool {
        let Some(pt) = self.points().get(index).cloned() else {
            return false;
        };
        if pt.bezier == to_bezier {
            return false;
        }

        if to_bezier {
            if !self.config().allow_bezier {
                return false;
            }
            let prev_index = pt.prev.and_then(|id| self.index_of(id));
            let next_index = path::successor_of(self.points(), pt.id);
            let (Some(pi), Some(ni)) = (prev_index, next_index) else {
                return false;
            };
            let chord = (self.points()[ni].point - self.points()[pi].point)
                * settings::bezier::HANDLE_FRACTION;
            let target = &mut self.points_mut()[index];
            target.bezier = true;
            target.ctrl1 = Some(target.point - chord);
            target.ctrl2 = Some(target.point + chord);
        } else {
            let target = &mut self.points_mut()[index];
            target.bezier = false;
            target.ctrl1 = None;
            target.ctrl2 = None;
        }

        let id = pt.id;
        self.emit(EditorEvent::PointConverted {
            id,
            bezier: to_bezier,
        });
        self.emit(EditorEvent::PathShapeChanged);
        self.publish();
        true
    }

    /// Toggle a point's bezier flag (double-click action).
    pub fn toggle_point_bezier(&mut self, index: usize) -> bool {
        match self.points().get(index) {
            Some(pt) => {
                let to_bezier = !pt.bezier;
                self.convert_point(index, to_bezier)
            }
            None => false,
        }
    }

    // ===== Closing and breaking =====

    /// Close the path by aiming the first point's back-reference at the
    /// last point. Returns false when closing is not currently eligible.
    pub fn close_path(&mut self) -> bool {
        if !self.closing_eligible() {
            return false;
        }
        let Some(last_id) = self.points().last().map(|p| p.id) else {
            return false;
        };
        self.points_mut()[0].prev = Some(last_id);
        self.set_drawing(false);
        self.emit(EditorEvent::PathClosedChanged { closed: true });
        self.emit(EditorEvent::PathShapeChanged);
        self.publish();
        true
    }

    /// Break a closed path at a segment (alt-click). The point after the
    /// break becomes the new chain start; the point before it becomes
    /// active so drawing can resume from the fresh end.
    ///
    /// Valid segment indices are the array-pair segments plus the
    /// closing-segment sentinel (`points.len()`).
    pub fn break_path_at(&mut self, segment_index: usize) -> bool {
        if !self.is_closed() {
            return false;
        }
        let len = self.points().len();
        let rotation = if segment_index == len {
            0
        } else if segment_index + 1 < len {
            segment_index + 1
        } else {
            return false;
        };

        {
            let points = self.points_mut();
            points.rotate_left(rotation);
            points[0].prev = None;
        }
        if rotation != 0 {
            let remapped: Vec<usize> = self
                .selection()
                .iter()
                .map(|i| (i + len - rotation) % len)
                .collect();
            self.selection_mut().set_indices(remapped);
        }

        let new_end = self.points().last().map(|p| p.id);
        let selection = self.selection_mut();
        selection.set_active(new_end);
        selection.set_last_added(new_end);
        self.set_drawing(true);

        self.emit(EditorEvent::PathClosedChanged { closed: false });
        self.emit(EditorEvent::PathShapeChanged);
        self.publish();
        true
    }

    // ===== Repositioning =====

    /// Move a point's anchor to a model-space position, translating its
    /// handles with it. Live-snapped and clamped. No event here; the
    /// pointer handler emits `PointRepositioned` once the gesture ends.
    pub fn move_point(&mut self, index: usize, pos: Point) {
        let pos = self.conform(pos);
        let Some(pt) = self.points_mut().get_mut(index) else {
            return;
        };
        let delta = pos - pt.point;
        pt.point = pos;
        if let Some(c) = pt.ctrl1.as_mut() {
            *c += delta;
        }
        if let Some(c) = pt.ctrl2.as_mut() {
            *c += delta;
        }
        self.request_redraw();
    }

    /// Move one bezier handle. The opposite handle is independent;
    /// tangents are not mirrored.
    pub fn move_control_point(&mut self, index: usize, handle: Handle, pos: Point) {
        let Some(pt) = self.points_mut().get_mut(index) else {
            return;
        };
        match handle {
            Handle::Incoming => pt.ctrl1 = Some(pos),
            Handle::Outgoing => pt.ctrl2 = Some(pos),
        }
        self.request_redraw();
    }

    pub(crate) fn commit_point_move(&mut self, index: usize) {
        if let Some(id) = self.points().get(index).map(|p| p.id) {
            self.emit(EditorEvent::PointRepositioned { id });
            self.emit(EditorEvent::PathShapeChanged);
            self.publish();
        }
    }

    pub(crate) fn commit_control_move(&mut self, index: usize) {
        if let Some(id) = self.points().get(index).map(|p| p.id) {
            self.emit(EditorEvent::PointEdited { id });
            self.emit(EditorEvent::PathShapeChanged);
            self.publish();
        }
    }

    // ===== Whole-shape translation =====

    /// Reposition every point to its drag-origin position plus `delta`.
    /// Unsnapped, since snapping is deferred to `finish_shape_drag` so the
    /// shape never wobbles mid-drag.
    pub(crate) fn update_shape_drag(&mut self, origin: &[PathPoint], delta: Vec2) {
        let delta = self.clamp_shape_delta(origin, delta);
        let points = self.points_mut();
        for (pt, orig) in points.iter_mut().zip(origin) {
            pt.point = orig.point + delta;
            pt.ctrl1 = orig.ctrl1.map(|c| c + delta);
            pt.ctrl2 = orig.ctrl2.map(|c| c + delta);
        }
        self.request_redraw();
    }

    /// Apply deferred pixel snapping at the end of a shape drag.
    ///
    /// Each anchor snaps independently unless that would collapse two
    /// originally-distinct points onto the same coordinates; then the
    /// whole shape snaps by a single delta (the first anchor's), which
    /// preserves every relative offset exactly.
    pub(crate) fn finish_shape_drag(&mut self, origin: &[PathPoint]) {
        if self.config().pixel_snapping && !self.points().is_empty() {
            let snapped: Vec<Point> = self
                .points()
                .iter()
                .map(|p| geometry::snap_to_pixel(p.point, true))
                .collect();

            let collides = |i: usize, j: usize| {
                origin[i].point != origin[j].point && snapped[i] == snapped[j]
            };
            let mut collapse = false;
            'outer: for i in 0..snapped.len() {
                for j in (i + 1)..snapped.len() {
                    if collides(i, j) {
                        collapse = true;
                        break 'outer;
                    }
                }
            }

            if collapse {
                let shift = snapped[0] - self.points()[0].point;
                let points = self.points_mut();
                for pt in points.iter_mut() {
                    pt.point += shift;
                    if let Some(c) = pt.ctrl1.as_mut() {
                        *c += shift;
                    }
                    if let Some(c) = pt.ctrl2.as_mut() {
                        *c += shift;
                    }
                }
            } else {
                let points = self.points_mut();
                for (pt, snap) in points.iter_mut().zip(snapped) {
                    let d = snap - pt.point;
                    pt.point = snap;
                    if let Some(c) = pt.ctrl1.as_mut() {
                        *c += d;
                    }
                    if let Some(c) = pt.ctrl2.as_mut() {
                        *c += d;
                    }
                }
            }
        }
        self.commit_transform();
    }

    /// Keep a whole-shape translation inside the canvas bounds.
    fn clamp_shape_delta(&self, origin: &[PathPoint], delta: Vec2) -> Vec2 {
        let (Some(size), Some(bbox)) = (self.config().bounds, geometry::bounding_box(origin))
        else {
            return delta;
        };
        let dx = delta
            .x
            .clamp((-bbox.x0).min(0.0), (size.width - bbox.x1).max(0.0));
        let dy = delta
            .y
            .clamp((-bbox.y0).min(0.0), (size.height - bbox.y1).max(0.0));
        Vec2::new(dx, dy)
    }

    // ===== Selection transforms =====

    /// Apply an affine map to the selected points (anchors and handles),
    /// clamping anchors into the canvas bounds.
    pub fn transform_selection(&mut self, affine: Affine) {
        let indices: Vec<usize> = self.selection().iter().collect();
        if indices.is_empty() {
            return;
        }
        self.transform_indices(&indices, affine);
    }

    /// Translate the selected points.
    pub fn translate_selection(&mut self, delta: Vec2) {
        self.transform_selection(Affine::translate(delta));
    }

    /// Rotate the selected points about a pivot (defaults to the
    /// selection bounding-box center).
    pub fn rotate_selection(&mut self, angle: f64, pivot: Option<Point>) {
        let Some(pivot) = pivot.or_else(|| self.selection_bounding_box().map(|b| b.center()))
        else {
            return;
        };
        self.transform_selection(Affine::rotate_about(angle, pivot));
    }

    /// Scale the selected points about a pivot (defaults to the
    /// selection bounding-box center).
    pub fn scale_selection(&mut self, sx: f64, sy: f64, pivot: Option<Point>) {
        let Some(pivot) = pivot.or_else(|| self.selection_bounding_box().map(|b| b.center()))
        else {
            return;
        };
        let about = Affine::translate(pivot.to_vec2())
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-pivot.to_vec2());
        self.transform_selection(about);
    }

    /// Enter the host-driven group transform mode. While a multi-region
    /// gesture is in flight the host applies per-step transforms through
    /// `transform_all` and closes with `end_group_drag`.
    pub fn begin_group_drag(&mut self) {
        self.set_state(InteractionState::DraggingGroup);
    }

    /// Leave group transform mode, reporting the final shape.
    pub fn end_group_drag(&mut self) {
        if matches!(self.state(), InteractionState::DraggingGroup) {
            self.set_state(InteractionState::Idle);
            self.commit_transform();
        }
    }

    /// Apply an affine map to every point: the host-driven group
    /// transform path for multi-region gestures.
    pub fn transform_all(&mut self, affine: Affine) {
        let indices: Vec<usize> = (0..self.points().len()).collect();
        if indices.is_empty() {
            return;
        }
        self.transform_indices(&indices, affine);
    }

    fn transform_indices(&mut self, indices: &[usize], affine: Affine) {
        let bounds = self.config().bounds;
        let points = self.points_mut();
        for &i in indices {
            let Some(pt) = points.get_mut(i) else { continue };
            pt.point = affine * pt.point;
            if let Some(size) = bounds {
                pt.point.x = pt.point.x.clamp(0.0, size.width);
                pt.point.y = pt.point.y.clamp(0.0, size.height);
            }
            pt.ctrl1 = pt.ctrl1.map(|c| affine * c);
            pt.ctrl2 = pt.ctrl2.map(|c| affine * c);
        }
        self.request_redraw();
    }

    /// End a transform gesture: hand the host the final shape.
    pub fn commit_transform(&mut self) {
        let shape = self.export_shape();
        self.emit(EditorEvent::TransformationComplete { shape });
        self.publish();
    }

    /// Leave draw mode and hand the host the finished shape.
    pub fn finish(&mut self) {
        let shape = self.export_shape();
        self.set_drawing(false);
        self.set_state(InteractionState::Idle);
        self.emit(EditorEvent::Finish { shape });
        self.publish();
    }

    // ===== Shared helpers =====

    /// Snap and clamp a model-space anchor position per configuration.
    pub(crate) fn conform(&self, pos: Point) -> Point {
        let mut pos = geometry::snap_to_pixel(pos, self.config().pixel_snapping);
        if let Some(size) = self.config().bounds {
            pos.x = pos.x.clamp(0.0, size.width);
            pos.y = pos.y.clamp(0.0, size.height);
        }
        pos
    }

    pub(crate) fn request_redraw(&mut self) {
        self.redraw.request();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::SelectionCoordinator;
    use crate::editing::session::EditorConfig;
    use crate::path::RawPoint;
    use kurbo::Size;
    use std::sync::Arc;

    fn session(coords: &[(f64, f64)]) -> EditSession {
        session_with(coords, EditorConfig::default())
    }

    fn session_with(coords: &[(f64, f64)], config: EditorConfig) -> EditSession {
        let raw: Vec<RawPoint> = coords.iter().map(|&c| RawPoint::from(c)).collect();
        EditSession::with_points(Arc::new(SelectionCoordinator::new()), config, &raw)
    }

    #[test]
    fn added_points_chain_and_become_active() {
        let mut s = session(&[]);
        let a = s.add_point(Point::new(0.0, 0.0)).unwrap();
        let b = s.add_point(Point::new(10.0, 0.0)).unwrap();
        assert_eq!(s.points()[0].prev, None);
        assert_eq!(s.points()[1].prev, Some(a));
        assert_eq!(s.active_point_id(), Some(b));

        let events = s.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, EditorEvent::PointAdded { id, index: 0 } if *id == a)));
    }

    #[test]
    fn point_cap_silently_stops_adding() {
        let mut s = session_with(
            &[(0.0, 0.0), (10.0, 0.0)],
            EditorConfig {
                max_points: Some(2),
                ..EditorConfig::default()
            },
        );
        s.take_events();
        assert!(s.add_point(Point::new(20.0, 0.0)).is_none());
        assert_eq!(s.points().len(), 2);
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn skeleton_adds_branch_from_active_point() {
        let mut s = session_with(
            &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)],
            EditorConfig {
                skeleton: true,
                ..EditorConfig::default()
            },
        );
        // Activate the middle point and branch off it.
        let mid = s.points()[1].id;
        s.selection_mut().select_only(1, mid);
        let branch = s.add_point(Point::new(10.0, 15.0)).unwrap();
        assert_eq!(s.points()[3].id, branch);
        assert_eq!(s.points()[3].prev, Some(mid));
    }

    #[test]
    fn insert_splices_the_chain_and_keeps_active() {
        let mut s = session(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        let active_before = s.active_point_id();
        let inserted = s.insert_point_on_segment(Point::new(50.0, 3.0)).unwrap();

        assert_eq!(s.points().len(), 4);
        assert_eq!(s.points()[1].id, inserted);
        assert_eq!(s.points()[1].prev, Some(s.points()[0].id));
        assert_eq!(s.points()[2].prev, Some(inserted));
        assert_eq!(s.active_point_id(), active_before);
        // The inserted anchor lies on the segment.
        assert_eq!(s.points()[1].point, Point::new(50.0, 0.0));
    }

    #[test]
    fn insert_on_closing_segment_appends() {
        let mut s = session(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        assert!(s.close_path());
        let inserted = s.insert_point_on_segment(Point::new(2.0, 50.0)).unwrap();

        assert_eq!(s.points().len(), 5);
        assert_eq!(s.points()[4].id, inserted);
        assert_eq!(s.points()[4].prev, Some(s.points()[3].id));
        assert_eq!(s.points()[0].prev, Some(inserted));
        assert!(s.is_closed());
    }

    #[test]
    fn insert_shifts_selection_indices() {
        let mut s = session(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        s.selection_mut().set_indices([0, 2]);
        s.insert_point_on_segment(Point::new(50.0, 0.0)).unwrap();
        assert_eq!(s.selection().iter().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn insert_ignores_unlinked_array_neighbors() {
        let mut s = session_with(
            &[],
            EditorConfig {
                skeleton: true,
                ..EditorConfig::default()
            },
        );
        let a = s.add_point(Point::new(0.0, 0.0)).unwrap();
        let b = s.add_point(Point::new(100.0, 0.0)).unwrap();
        s.selection_mut().select_only(0, a);
        let c = s.add_point(Point::new(0.0, 100.0)).unwrap();
        assert_eq!(s.points()[2].prev, Some(a));

        // Array neighbors 1 and 2 are separate branches off the root.
        // The span between their tips runs right through (60, 40), but
        // it is not a segment: the insertion lands on the nearest real
        // branch and the other branch keeps its parent.
        let id = s.insert_point_on_segment(Point::new(60.0, 40.0)).unwrap();
        assert_eq!(s.points().len(), 4);
        let at = s.index_of(id).unwrap();
        assert_eq!(s.points()[at].point, Point::new(60.0, 0.0));
        assert_eq!(s.points()[at].prev, Some(a));
        let b_index = s.points().iter().position(|p| p.id == b).unwrap();
        assert_eq!(s.points()[b_index].prev, Some(id));
        let c_index = s.points().iter().position(|p| p.id == c).unwrap();
        assert_eq!(s.points()[c_index].prev, Some(a));

        // The second branch still takes an insertion of its own.
        let id2 = s.insert_point_on_segment(Point::new(0.0, 50.0)).unwrap();
        assert_eq!(s.points()[s.index_of(id2).unwrap()].prev, Some(a));
        let c_index = s.points().iter().position(|p| p.id == c).unwrap();
        assert_eq!(s.points()[c_index].prev, Some(id2));
    }

    #[test]
    fn deleting_a_middle_point_rewires_the_chain() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let (a, b, c) = (s.points()[0].id, s.points()[1].id, s.points()[2].id);
        s.delete_point_ids(&[b]);

        assert_eq!(s.points().len(), 2);
        assert_eq!(s.points()[0].id, a);
        assert_eq!(s.points()[1].id, c);
        assert_eq!(s.points()[1].prev, Some(a));
    }

    #[test]
    fn batch_delete_chases_surviving_ancestors() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
        let (a, b, c, d) = (
            s.points()[0].id,
            s.points()[1].id,
            s.points()[2].id,
            s.points()[3].id,
        );
        s.delete_point_ids(&[b, c]);
        assert_eq!(s.points().len(), 2);
        assert_eq!(s.points()[1].id, d);
        assert_eq!(s.points()[1].prev, Some(a));
    }

    #[test]
    fn delete_is_idempotent_for_unknown_ids() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0)]);
        let ghost = s.points()[1].id;
        s.delete_point_ids(&[ghost]);
        s.take_events();
        s.delete_point_ids(&[ghost]);
        assert!(s.take_events().is_empty());
        assert_eq!(s.points().len(), 1);
    }

    #[test]
    fn deleting_from_a_closed_ring_reports_reopening() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        assert!(s.close_path());
        s.take_events();

        s.delete_point(2);
        assert!(!s.is_closed());
        // The collapsed two-point ring was reopened; the chain itself
        // survives.
        assert!(s.points()[0].prev.is_none());
        assert_eq!(s.points()[1].prev, Some(s.points()[0].id));
        assert!(s
            .take_events()
            .iter()
            .any(|e| matches!(e, EditorEvent::PathClosedChanged { closed: false })));
    }

    #[test]
    fn delete_updates_selection_and_markers() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let last = s.points()[2].id;
        s.selection_mut().set_indices([1, 2]);
        assert_eq!(s.selection().last_added(), Some(last));

        s.delete_point_ids(&[last]);
        assert_eq!(s.selection().iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(s.selection().last_added(), Some(s.points()[1].id));
    }

    #[test]
    fn convert_rejects_open_path_endpoints() {
        let mut s = session(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]);
        assert!(!s.convert_point(0, true));
        assert!(!s.convert_point(2, true));
        assert!(s.convert_point(1, true));
    }

    #[test]
    fn convert_synthesizes_handles_on_the_neighbor_chord() {
        let mut s = session(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]);
        assert!(s.convert_point(1, true));

        let pt = &s.points()[1];
        assert!(pt.bezier);
        // Chord (100, 0) at the default quarter fraction: 25 units each way.
        assert_eq!(pt.ctrl1, Some(Point::new(25.0, 0.0)));
        assert_eq!(pt.ctrl2, Some(Point::new(75.0, 0.0)));
    }

    #[test]
    fn convert_back_to_line_drops_handles() {
        let mut s = session(&[(0.0, 0.0), (50.0, 10.0), (100.0, 0.0)]);
        s.convert_point(1, true);
        assert!(s.toggle_point_bezier(1));
        let pt = &s.points()[1];
        assert!(!pt.bezier);
        assert!(pt.ctrl1.is_none() && pt.ctrl2.is_none());
    }

    #[test]
    fn convert_works_on_any_closed_path_point() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        s.close_path();
        assert!(s.convert_point(0, true));
    }

    #[test]
    fn bezier_conversion_respects_configuration() {
        let mut s = session_with(
            &[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)],
            EditorConfig {
                allow_bezier: false,
                ..EditorConfig::default()
            },
        );
        assert!(!s.convert_point(1, true));
    }

    #[test]
    fn close_then_break_round_trips() {
        let mut s = session(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        let ids: Vec<PointId> = s.points().iter().map(|p| p.id).collect();
        assert!(s.close_path());
        assert!(s.is_closed());
        assert!(!s.is_drawing());

        // Break the segment joining points 1 and 2.
        assert!(s.break_path_at(1));
        assert!(!s.is_closed());
        assert!(s.is_drawing());

        // The point after the break starts the chain; the one before it
        // is the new active end.
        let order: Vec<PointId> = s.points().iter().map(|p| p.id).collect();
        assert_eq!(order, vec![ids[2], ids[3], ids[0], ids[1]]);
        assert!(s.points()[0].prev.is_none());
        assert_eq!(s.active_point_id(), Some(ids[1]));
        assert_eq!(path::endpoint_indices(s.points()), vec![0, 3]);
    }

    #[test]
    fn breaking_the_closing_segment_keeps_order() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        let ids: Vec<PointId> = s.points().iter().map(|p| p.id).collect();
        s.close_path();
        assert!(s.break_path_at(s.points().len()));

        let order: Vec<PointId> = s.points().iter().map(|p| p.id).collect();
        assert_eq!(order, ids);
        assert!(s.points()[0].prev.is_none());
    }

    #[test]
    fn break_requires_a_closed_path() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        assert!(!s.break_path_at(0));
    }

    #[test]
    fn moving_a_point_carries_its_handles() {
        let mut s = session(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]);
        s.convert_point(1, true);
        s.move_point(1, Point::new(60.0, 20.0));

        let pt = &s.points()[1];
        assert_eq!(pt.point, Point::new(60.0, 20.0));
        assert_eq!(pt.ctrl1, Some(Point::new(35.0, 20.0)));
        assert_eq!(pt.ctrl2, Some(Point::new(85.0, 20.0)));
    }

    #[test]
    fn move_clamps_into_bounds_and_snaps() {
        let mut s = session_with(
            &[(0.0, 0.0), (50.0, 0.0)],
            EditorConfig {
                pixel_snapping: true,
                bounds: Some(Size::new(100.0, 100.0)),
                ..EditorConfig::default()
            },
        );
        s.move_point(1, Point::new(140.7, 55.4));
        assert_eq!(s.points()[1].point, Point::new(100.0, 55.0));
    }

    #[test]
    fn control_point_moves_are_independent() {
        let mut s = session(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]);
        s.convert_point(1, true);
        s.move_control_point(1, Handle::Outgoing, Point::new(90.0, 30.0));

        let pt = &s.points()[1];
        assert_eq!(pt.ctrl2, Some(Point::new(90.0, 30.0)));
        // The incoming handle stayed put.
        assert_eq!(pt.ctrl1, Some(Point::new(25.0, 0.0)));
    }

    #[test]
    fn deferred_snap_keeps_distinct_points_distinct() {
        let mut s = session_with(
            &[(0.0, 0.0), (0.4, 0.0), (5.0, 5.0)],
            EditorConfig {
                pixel_snapping: true,
                ..EditorConfig::default()
            },
        );
        let origin: Vec<PathPoint> = s.points().to_vec();

        // Per-point snapping would collapse the first two anchors onto
        // (10, 10); the fallback shifts everything by one shared delta.
        s.update_shape_drag(&origin, Vec2::new(9.8, 10.0));
        s.finish_shape_drag(&origin);

        let a = s.points()[0].point;
        let b = s.points()[1].point;
        assert_ne!(a, b);
        assert_eq!(b - a, Vec2::new(0.4, 0.0));
        // The reference anchor still landed on the pixel grid.
        assert_eq!(a, Point::new(10.0, 10.0));
    }

    #[test]
    fn deferred_snap_uses_per_point_grid_when_safe() {
        let mut s = session_with(
            &[(0.0, 0.0), (10.0, 0.0)],
            EditorConfig {
                pixel_snapping: true,
                ..EditorConfig::default()
            },
        );
        let origin: Vec<PathPoint> = s.points().to_vec();
        s.update_shape_drag(&origin, Vec2::new(5.3, 2.6));
        s.finish_shape_drag(&origin);

        assert_eq!(s.points()[0].point, Point::new(5.0, 3.0));
        assert_eq!(s.points()[1].point, Point::new(15.0, 3.0));
    }

    #[test]
    fn shape_drag_is_clamped_to_bounds() {
        let mut s = session_with(
            &[(10.0, 10.0), (20.0, 10.0)],
            EditorConfig {
                bounds: Some(Size::new(100.0, 100.0)),
                ..EditorConfig::default()
            },
        );
        let origin: Vec<PathPoint> = s.points().to_vec();
        s.update_shape_drag(&origin, Vec2::new(500.0, -500.0));

        // The far edge stops at the bound; the shape is not squashed.
        assert_eq!(s.points()[1].point, Point::new(100.0, 0.0));
        assert_eq!(s.points()[0].point, Point::new(90.0, 0.0));
    }

    #[test]
    fn rotate_about_the_selection_center() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0)]);
        s.selection_mut().set_indices([0, 1]);
        s.rotate_selection(std::f64::consts::PI, None);

        // A half-turn about (5, 0) swaps the anchors.
        assert!((s.points()[0].point.x - 10.0).abs() < 1e-9);
        assert!((s.points()[1].point.x - 0.0).abs() < 1e-9);
    }

    #[test]
    fn scale_about_an_explicit_pivot() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0)]);
        s.selection_mut().set_indices([0, 1]);
        s.scale_selection(2.0, 2.0, Some(Point::ZERO));
        assert_eq!(s.points()[1].point, Point::new(20.0, 0.0));
    }

    #[test]
    fn group_drag_transforms_everything_and_commits_once() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        s.take_events();
        s.begin_group_drag();
        s.transform_all(Affine::translate(Vec2::new(3.0, 4.0)));
        s.transform_all(Affine::translate(Vec2::new(1.0, 0.0)));
        s.end_group_drag();

        assert_eq!(s.points()[0].point, Point::new(4.0, 4.0));
        let events = s.take_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, EditorEvent::TransformationComplete { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn commit_transform_reports_the_final_shape() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        s.take_events();
        s.translate_selection(Vec2::new(1.0, 1.0));
        s.commit_transform();
        assert!(s
            .take_events()
            .iter()
            .any(|e| matches!(e, EditorEvent::TransformationComplete { .. })));
    }

    #[test]
    fn finish_leaves_draw_mode_with_the_shape() {
        let mut s = session(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        assert!(s.is_drawing());
        s.take_events();
        s.finish();
        assert!(!s.is_drawing());
        let events = s.take_events();
        assert!(matches!(events.last(), Some(EditorEvent::Finish { .. })));
    }

    proptest::proptest! {
        #[test]
        fn references_stay_resolvable_under_edit_sequences(
            ops in proptest::collection::vec((0u8..3, -100i32..100, -100i32..100), 1..32)
        ) {
            let mut s = session(&[]);
            for (op, x, y) in ops {
                match op {
                    0 => {
                        s.add_point(Point::new(x as f64, y as f64));
                    }
                    1 => {
                        if !s.points().is_empty() {
                            let i = (x.unsigned_abs() as usize) % s.points().len();
                            s.delete_point(i);
                        }
                    }
                    _ => {
                        if !s.points().is_empty() {
                            let i = (y.unsigned_abs() as usize) % s.points().len();
                            s.move_point(i, Point::new(x as f64, y as f64));
                        }
                    }
                }
                let by_id = path::index_by_id(s.points());
                for pt in s.points() {
                    if let Some(prev) = pt.prev {
                        proptest::prop_assert!(by_id.contains_key(&prev));
                    }
                }
            }
        }
    }
}
