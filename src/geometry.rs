// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Pure geometry kernel: nearest-point queries, interior tests,
//! bounding boxes, and pixel snapping. No state, no side effects.
//!
//! `closest_point_on_path` works over consecutive array pairs of the
//! point list (plus the closing segment when requested);
//! `closest_point_on_segments` works over an explicit segment list, the
//! reference-graph view the session uses for skeleton topologies.

use crate::path::{PathPoint, Segment, SegmentInfo};
use kurbo::{Point, Rect};

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// The nearest point on a path to a cursor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathHit {
    /// The nearest point on the path
    pub point: Point,
    /// Index of the segment it lies on. Segment `i` joins points `i`
    /// and `i + 1`; `points.len()` denotes the closing segment.
    pub segment_index: usize,
    /// Parametric position on that segment
    pub t: f64,
    /// Squared distance from the cursor
    pub dist_sq: f64,
}

/// Find the globally nearest point across every segment of the path.
///
/// Straight and cubic segments are both solved exactly (kurbo nearest).
/// The closing segment (last point back to first) participates only when
/// `include_closing` is set. Returns `None` for paths with fewer than
/// two points.
pub fn closest_point_on_path(
    cursor: Point,
    points: &[PathPoint],
    include_closing: bool,
) -> Option<PathHit> {
    if points.len() < 2 {
        return None;
    }

    let mut best: Option<PathHit> = None;
    let mut consider = |segment: Segment, segment_index: usize| {
        let (t, dist_sq) = segment.nearest(cursor);
        if best.is_none_or(|b| dist_sq < b.dist_sq) {
            best = Some(PathHit {
                point: segment.eval(t),
                segment_index,
                t,
                dist_sq,
            });
        }
    };

    for (i, pair) in points.windows(2).enumerate() {
        consider(Segment::between(&pair[0], &pair[1]), i);
    }
    if include_closing {
        let last = &points[points.len() - 1];
        consider(Segment::between(last, &points[0]), points.len());
    }
    best
}

/// The nearest point on an explicit segment list, keyed by the array
/// indices of the hit segment's endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// The nearest point on the path
    pub point: Point,
    /// Array index of the hit segment's start point
    pub from_index: usize,
    /// Array index of the hit segment's end point
    pub to_index: usize,
    /// Parametric position on that segment
    pub t: f64,
    /// Squared distance from the cursor
    pub dist_sq: f64,
}

/// Find the globally nearest point across an explicit segment list
/// (the reference-graph view, where array neighbors are not
/// necessarily connected).
pub fn closest_point_on_segments(
    cursor: Point,
    segments: &[SegmentInfo],
) -> Option<SegmentHit> {
    let mut best: Option<SegmentHit> = None;
    for info in segments {
        let (t, dist_sq) = info.segment.nearest(cursor);
        if best.is_none_or(|b| dist_sq < b.dist_sq) {
            best = Some(SegmentHit {
                point: info.segment.eval(t),
                from_index: info.from_index,
                to_index: info.to_index,
                t,
                dist_sq,
            });
        }
    }
    best
}

/// Ray-casting interior test over the anchor polygon.
///
/// Bezier curvature is ignored (anchors only), which is how interior
/// hit-testing of closed shapes behaves. Shapes with fewer than three
/// points have no interior.
pub fn is_point_in_polygon(pos: Point, points: &[PathPoint]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let pi = points[i].point;
        let pj = points[j].point;
        if (pi.y > pos.y) != (pj.y > pos.y) {
            let x_cross = (pj.x - pi.x) * (pos.y - pi.y) / (pj.y - pi.y) + pi.x;
            if pos.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Bounding box of the point set, including bezier control points so
/// rotate/scale about the center stays visually stable.
pub fn bounding_box(points: &[PathPoint]) -> Option<Rect> {
    let mut acc: Option<Rect> = None;
    let mut include = |p: Point| {
        let r = Rect::from_points(p, p);
        acc = Some(match acc {
            Some(prev) => prev.union(r),
            None => r,
        });
    };

    for pt in points {
        include(pt.point);
        if let Some(c) = pt.ctrl1 {
            include(c);
        }
        if let Some(c) = pt.ctrl2 {
            include(c);
        }
    }
    acc
}

/// Round a point to the nearest integer coordinate when snapping is
/// enabled; identity otherwise.
pub fn snap_to_pixel(point: Point, enabled: bool) -> Point {
    if enabled {
        Point::new(point.x.round(), point.y.round())
    } else {
        point
    }
}
