// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Distance-based hit-testing against the current point list.
//!
//! Targets are tried in affordance order: bezier control handles first,
//! then point bodies, then segments, then the filled interior of a
//! closed shape. All radii are defined in screen pixels and divided by
//! the effective viewport scale, so the touchable area is visually
//! constant at any zoom.

use super::EditSession;
use crate::editing::mouse::{Handle, HitTarget, PointerEvent};
use crate::geometry::{self, SegmentHit};
use crate::settings;
use kurbo::{Point, Rect};

impl EditSession {
    /// Resolve what lies under a screen-space cursor position.
    pub fn hit_test(&self, screen: Point) -> HitTarget {
        let cursor = self.viewport().to_model(screen);

        if let Some((point, handle)) = self.hit_test_control_point(cursor) {
            return HitTarget::ControlPoint { point, handle };
        }
        if let Some(index) = self.hit_test_point(cursor) {
            return HitTarget::Point(index);
        }
        if let Some(hit) = self.hit_test_segment(cursor) {
            return HitTarget::Segment(self.segment_display_index(&hit));
        }
        if self.is_point_over_shape(cursor) {
            return HitTarget::Fill;
        }
        HitTarget::Empty
    }

    /// The host may pre-resolve targets (named hit regions); otherwise
    /// fall back to distance testing.
    pub(crate) fn resolve_target(&self, event: &PointerEvent) -> HitTarget {
        event.target.unwrap_or_else(|| self.hit_test(event.pos))
    }

    /// Nearest visible bezier handle within the control-point radius.
    ///
    /// Handles are only touchable on points whose handles are shown:
    /// selected bezier points (or the active one).
    pub fn hit_test_control_point(&self, cursor: Point) -> Option<(usize, Handle)> {
        let radius = self
            .viewport()
            .model_radius(settings::hit_radius::CONTROL_POINT);
        let active = self.active_point_id();

        let mut best: Option<(f64, usize, Handle)> = None;
        for (i, pt) in self.points().iter().enumerate() {
            if !pt.bezier || !(self.selection().contains(i) || active == Some(pt.id)) {
                continue;
            }
            for (ctrl, handle) in [(pt.ctrl1, Handle::Incoming), (pt.ctrl2, Handle::Outgoing)] {
                let Some(c) = ctrl else { continue };
                let d = c.distance(cursor);
                if d <= radius && best.is_none_or(|(bd, ..)| d < bd) {
                    best = Some((d, i, handle));
                }
            }
        }
        best.map(|(_, i, h)| (i, h))
    }

    /// Nearest point body within the selection radius.
    pub fn hit_test_point(&self, cursor: Point) -> Option<usize> {
        let radius = self.viewport().model_radius(settings::hit_radius::SELECTION);

        let mut best: Option<(f64, usize)> = None;
        for (i, pt) in self.points().iter().enumerate() {
            let d = pt.point.distance(cursor);
            if d <= radius && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, i));
            }
        }
        best.map(|(_, i)| i)
    }

    /// Nearest segment within the segment radius, closing segment
    /// included when the path is closed.
    pub fn hit_test_segment(&self, cursor: Point) -> Option<SegmentHit> {
        let hit = self.nearest_segment_hit(cursor)?;
        let radius = self.viewport().model_radius(settings::hit_radius::SEGMENT);
        (hit.dist_sq <= radius * radius).then_some(hit)
    }

    /// Nearest point across the segments that actually render: array
    /// adjacency for linear paths, the reference graph in skeleton
    /// mode, where array neighbors are not necessarily connected.
    pub(crate) fn nearest_segment_hit(&self, cursor: Point) -> Option<SegmentHit> {
        if self.config().skeleton {
            return geometry::closest_point_on_segments(cursor, &self.segments());
        }
        let len = self.points().len();
        let hit = geometry::closest_point_on_path(cursor, self.points(), self.is_closed())?;
        let (from_index, to_index) = if hit.segment_index == len {
            (len - 1, 0)
        } else {
            (hit.segment_index, hit.segment_index + 1)
        };
        Some(SegmentHit {
            point: hit.point,
            from_index,
            to_index,
            t: hit.t,
            dist_sq: hit.dist_sq,
        })
    }

    /// Collapse a segment hit to the single-index form `HitTarget` and
    /// `break_path_at` use: the start point's index, or the sentinel
    /// `points.len()` for the closing segment.
    pub(crate) fn segment_display_index(&self, hit: &SegmentHit) -> usize {
        if self.is_closed() && hit.to_index == 0 {
            self.points().len()
        } else {
            hit.from_index
        }
    }

    /// Bounding box of the selected points only, the default pivot for
    /// selection transforms.
    pub fn selection_bounding_box(&self) -> Option<Rect> {
        let selected: Vec<_> = self
            .selection()
            .iter()
            .filter_map(|i| self.points().get(i).cloned())
            .collect();
        geometry::bounding_box(&selected)
    }
}
