// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Segment geometry between two path points.
//!
//! A segment is straight unless either endpoint is a bezier point, in
//! which case it is a cubic with control points taken from the start
//! point's outgoing handle and the end point's incoming handle (falling
//! back to the anchors for absent handles, which degenerates gracefully
//! toward a line).

use crate::path::PathPoint;
use crate::settings;
use kurbo::{CubicBez, Line, ParamCurve, ParamCurveNearest, Point};

/// Geometry of a single path segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Straight segment
    Line(Line),
    /// Cubic bezier segment
    Cubic(CubicBez),
}

impl Segment {
    /// Build the segment joining `from` to `to`.
    pub fn between(from: &PathPoint, to: &PathPoint) -> Self {
        if from.bezier || to.bezier {
            let c1 = from.ctrl2.unwrap_or(from.point);
            let c2 = to.ctrl1.unwrap_or(to.point);
            Segment::Cubic(CubicBez::new(from.point, c1, c2, to.point))
        } else {
            Segment::Line(Line::new(from.point, to.point))
        }
    }

    /// Evaluate the segment at parametric position `t` in `[0, 1]`.
    pub fn eval(&self, t: f64) -> Point {
        match self {
            Segment::Line(line) => line.eval(t),
            Segment::Cubic(cubic) => cubic.eval(t),
        }
    }

    /// Nearest point on the segment to `pos`.
    ///
    /// Returns `(t, dist_sq)`. Cubics are solved with kurbo's nearest
    /// query at `settings::bezier::NEAREST_ACCURACY`.
    pub fn nearest(&self, pos: Point) -> (f64, f64) {
        let nearest = match self {
            Segment::Line(line) => line.nearest(pos, settings::bezier::NEAREST_ACCURACY),
            Segment::Cubic(cubic) => cubic.nearest(pos, settings::bezier::NEAREST_ACCURACY),
        };
        (nearest.t, nearest.distance_sq)
    }

    /// Start anchor of the segment.
    pub fn start(&self) -> Point {
        self.eval(0.0)
    }

    /// End anchor of the segment.
    pub fn end(&self) -> Point {
        self.eval(1.0)
    }
}

/// A segment plus the array indices of the points it joins.
///
/// `to_index == 0` with `from_index == len - 1` describes the closing
/// segment of a closed path; closure is an ordinary back-reference, so
/// no special casing is needed downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInfo {
    /// Index of the start point in the canonical list
    pub from_index: usize,
    /// Index of the end point in the canonical list
    pub to_index: usize,
    /// The segment geometry
    pub segment: Segment,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> PathPoint {
        PathPoint::new(Point::new(x, y))
    }

    #[test]
    fn straight_points_make_a_line() {
        let seg = Segment::between(&pt(0.0, 0.0), &pt(10.0, 0.0));
        assert!(matches!(seg, Segment::Line(_)));
        assert_eq!(seg.eval(0.5), Point::new(5.0, 0.0));
    }

    #[test]
    fn bezier_endpoint_makes_a_cubic() {
        let mut b = pt(10.0, 0.0);
        b.bezier = true;
        b.ctrl1 = Some(Point::new(8.0, 4.0));
        let seg = Segment::between(&pt(0.0, 0.0), &b);
        assert!(matches!(seg, Segment::Cubic(_)));
        assert_eq!(seg.start(), Point::new(0.0, 0.0));
        assert_eq!(seg.end(), Point::new(10.0, 0.0));
    }

    #[test]
    fn nearest_on_line_is_perpendicular_foot() {
        let seg = Segment::between(&pt(0.0, 0.0), &pt(10.0, 0.0));
        let (t, dist_sq) = seg.nearest(Point::new(5.0, 3.0));
        assert!((t - 0.5).abs() < 1e-9);
        assert!((dist_sq - 9.0).abs() < 1e-9);
    }

    #[test]
    fn nearest_on_cubic_is_within_tolerance() {
        let mut b = pt(10.0, 0.0);
        b.bezier = true;
        b.ctrl1 = Some(Point::new(7.0, 6.0));
        let seg = Segment::between(&pt(0.0, 0.0), &b);

        let (t, dist_sq) = seg.nearest(seg.eval(0.3));
        assert!((t - 0.3).abs() < 1e-2);
        assert!(dist_sq < 1e-6);
    }
}
