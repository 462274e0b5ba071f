// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! The atomic unit of a path: an anchor point with optional bezier
//! handles and a back-reference to its predecessor.
//!
//! Connectivity is encoded solely through `prev`: a point with no `prev`
//! starts a chain, and a point whose id is never referenced by another
//! point's `prev` ends one. Array order is presentation order only;
//! skeleton mode relies on the reference graph to express branching that
//! array order cannot.

use crate::model::PointId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A single editable path point in model (image) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPoint {
    /// Stable unique id, assigned at creation, never reused
    pub id: PointId,
    /// Anchor position
    pub point: Point,
    /// Whether this point carries bezier tangent handles
    pub bezier: bool,
    /// Incoming tangent handle
    pub ctrl1: Option<Point>,
    /// Outgoing tangent handle
    pub ctrl2: Option<Point>,
    /// Back-reference encoding connectivity; `None` marks a chain start
    pub prev: Option<PointId>,
    /// Skeleton mode: not linearly chained to its visual predecessor
    pub disconnected: bool,
    /// Skeleton mode: branch origin marker
    pub branching: bool,
}

impl PathPoint {
    /// Create a straight (non-bezier) point with a fresh id.
    pub fn new(point: Point) -> Self {
        Self {
            id: PointId::next(),
            point,
            bezier: false,
            ctrl1: None,
            ctrl2: None,
            prev: None,
            disconnected: false,
            branching: false,
        }
    }

    /// Create a straight point chained to a predecessor.
    pub fn with_prev(point: Point, prev: PointId) -> Self {
        Self {
            prev: Some(prev),
            ..Self::new(point)
        }
    }
}

/// Host-supplied point input: either a bare `[x, y]` pair or a full
/// point object. Deserialized untagged so a JSON host can hand over
/// whichever form it stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPoint {
    /// Bare coordinate pair
    Pair([f64; 2]),
    /// Full point object (ids and connectivity preserved when present)
    Full(RawPathPoint),
}

/// The full host-facing point form.
///
/// `id` and `prev_point_id` are optional: missing ids get fresh unique
/// ones during normalization, and missing back-references are synthesized
/// linearly when no point in the list carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPathPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub is_bezier: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_point1: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_point2: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_point_id: Option<u64>,
    #[serde(default)]
    pub disconnected: bool,
    #[serde(default)]
    pub is_branching: bool,
}

impl From<[f64; 2]> for RawPoint {
    fn from(pair: [f64; 2]) -> Self {
        RawPoint::Pair(pair)
    }
}

impl From<(f64, f64)> for RawPoint {
    fn from((x, y): (f64, f64)) -> Self {
        RawPoint::Pair([x, y])
    }
}

impl From<&PathPoint> for RawPoint {
    /// The full form of a canonical point, as re-emitted to the host.
    fn from(pt: &PathPoint) -> Self {
        RawPoint::Full(RawPathPoint {
            id: Some(pt.id.raw()),
            x: pt.point.x,
            y: pt.point.y,
            is_bezier: pt.bezier,
            control_point1: pt.ctrl1.map(|c| [c.x, c.y]),
            control_point2: pt.ctrl2.map(|c| [c.x, c.y]),
            prev_point_id: pt.prev.map(PointId::raw),
            disconnected: pt.disconnected,
            is_branching: pt.branching,
        })
    }
}

/// Structural comparison between a host-supplied raw list and the
/// engine's canonical list, used to suppress feedback loops when the
/// host echoes an engine-emitted update back into `set_points`.
pub fn raw_matches_canonical(raw: &[RawPoint], points: &[PathPoint]) -> bool {
    if raw.len() != points.len() {
        return false;
    }
    raw.iter().zip(points.iter()).all(|(r, p)| match r {
        RawPoint::Pair([x, y]) => !p.bezier && p.point.x == *x && p.point.y == *y,
        RawPoint::Full(f) => {
            f.id.is_none_or(|id| id == p.id.raw())
                && f.x == p.point.x
                && f.y == p.point.y
                && f.is_bezier == p.bezier
                && f.control_point1 == p.ctrl1.map(|c| [c.x, c.y])
                && f.control_point2 == p.ctrl2.map(|c| [c.x, c.y])
                && f.prev_point_id == p.prev.map(PointId::raw)
                && f.disconnected == p.disconnected
                && f.is_branching == p.branching
        }
    })
}
