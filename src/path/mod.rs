// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! The path model: the editable point graph.
//!
//! A path is a flat list of `PathPoint`s whose connectivity is encoded
//! through each point's `prev` back-reference. This module owns
//! normalization of host input into that canonical form, the derived
//! closure and endpoint properties, and enumeration of the reference
//! graph into a flat segment list for hit-testing and rendering.
//!
//! Connectivity is deliberately id-based rather than pointer-based: all
//! lookups go through an id→index map rebuilt per pass, so there are no
//! mutable reference fields to keep consistent.

pub mod point;
pub mod segment;

pub use point::{PathPoint, RawPathPoint, RawPoint, raw_matches_canonical};
pub use segment::{Segment, SegmentInfo};

use crate::error::EditorError;
use crate::model::PointId;
use kurbo::Point;
use std::collections::{HashMap, HashSet};

/// Normalize host input into the canonical point list.
///
/// Bare pairs become straight points; full objects keep their ids,
/// handles, and back-references. Missing ids are assigned fresh (with the
/// id counter reserved past any host-supplied value). When no input point
/// carries a back-reference, a linear chain is synthesized. Dangling and
/// cyclic back-references are repaired.
///
/// Normalization is idempotent: feeding the emitted canonical list back
/// through produces an equal list.
pub fn normalize(raw: &[RawPoint]) -> Vec<PathPoint> {
    let has_chain = raw.iter().any(|r| match r {
        RawPoint::Full(f) => f.prev_point_id.is_some(),
        RawPoint::Pair(_) => false,
    });

    let mut points: Vec<PathPoint> = Vec::with_capacity(raw.len());
    for r in raw {
        let pt = match r {
            RawPoint::Pair([x, y]) => PathPoint::new(Point::new(*x, *y)),
            RawPoint::Full(f) => {
                let id = match f.id {
                    Some(raw_id) => {
                        PointId::reserve_through(raw_id);
                        PointId::from_raw(raw_id)
                    }
                    None => PointId::next(),
                };
                PathPoint {
                    id,
                    point: Point::new(f.x, f.y),
                    bezier: f.is_bezier,
                    ctrl1: f.control_point1.map(|[x, y]| Point::new(x, y)),
                    ctrl2: f.control_point2.map(|[x, y]| Point::new(x, y)),
                    prev: f.prev_point_id.map(PointId::from_raw),
                    disconnected: f.disconnected,
                    branching: f.is_branching,
                }
            }
        };
        points.push(pt);
    }

    if !has_chain {
        // No explicit connectivity anywhere: synthesize a linear chain.
        for i in 1..points.len() {
            points[i].prev = Some(points[i - 1].id);
        }
    }

    repair_references(&mut points);
    points
}

/// Normalize a JSON point array (either input form).
///
/// Structurally invalid point objects are a contract violation.
pub fn from_json(value: &serde_json::Value) -> Result<Vec<PathPoint>, EditorError> {
    let raw: Vec<RawPoint> = serde_json::from_value(value.clone())
        .map_err(|e| EditorError::MalformedPoint(e.to_string()))?;
    Ok(normalize(&raw))
}

/// Clear back-references to absent ids and break malformed reference
/// cycles.
///
/// A cycle that spans the entire list is legitimate closure (the first
/// point referencing the last) and is left alone; any shorter cycle can
/// only come from corrupt input and gets the closing reference cleared.
/// This is a normalization-time guard only; mutation operations preserve
/// well-formedness on their own.
fn repair_references(points: &mut [PathPoint]) {
    let by_id = index_by_id(points);

    for pt in points.iter_mut() {
        if let Some(prev) = pt.prev
            && !by_id.contains_key(&prev)
        {
            tracing::warn!(?prev, "clearing back-reference to absent point");
            pt.prev = None;
        }
    }

    let mut safe: HashSet<PointId> = HashSet::new();
    for start in 0..points.len() {
        if safe.contains(&points[start].id) {
            continue;
        }
        let mut seen: HashSet<PointId> = HashSet::new();
        let mut i = start;
        loop {
            seen.insert(points[i].id);
            let Some(prev) = points[i].prev else { break };
            let Some(&pi) = by_id.get(&prev) else { break };
            if seen.contains(&points[pi].id) {
                if seen.len() < points.len() {
                    tracing::warn!(
                        id = ?points[i].id,
                        "breaking cyclic back-reference chain"
                    );
                    points[i].prev = None;
                }
                break;
            }
            if safe.contains(&points[pi].id) {
                break;
            }
            i = pi;
        }
        safe.extend(seen);
    }
}

/// Build the id→index map for the current list.
pub fn index_by_id(points: &[PathPoint]) -> HashMap<PointId, usize> {
    points.iter().enumerate().map(|(i, p)| (p.id, i)).collect()
}

/// Derived closure: the first point's back-reference loops to the last.
///
/// Skeleton topologies are never closed.
pub fn is_closed(points: &[PathPoint], allow_close: bool) -> bool {
    allow_close
        && points.len() >= 2
        && points[0].prev == Some(points[points.len() - 1].id)
}

/// Whether the point at `index` is a chain endpoint: it has no
/// predecessor, or no other point references it as one.
pub fn is_endpoint(points: &[PathPoint], index: usize) -> bool {
    let Some(pt) = points.get(index) else {
        return false;
    };
    pt.prev.is_none() || !points.iter().any(|p| p.prev == Some(pt.id))
}

/// Indices of all chain endpoints (linear mode semantics).
pub fn endpoint_indices(points: &[PathPoint]) -> Vec<usize> {
    (0..points.len())
        .filter(|&i| is_endpoint(points, i))
        .collect()
}

/// Index of the point that references `id` as its predecessor.
pub fn successor_of(points: &[PathPoint], id: PointId) -> Option<usize> {
    points.iter().position(|p| p.prev == Some(id))
}

/// Enumerate the reference graph as a flat segment list.
///
/// Every point with a resolved predecessor yields one segment. In
/// skeleton mode, points whose predecessor did not resolve are attached
/// to the active point instead, so freshly branched points always render
/// connected to something. Closure needs no extra segment; it is an
/// ordinary back-reference from the first point to the last.
pub fn segments(
    points: &[PathPoint],
    skeleton: bool,
    active: Option<PointId>,
) -> Vec<SegmentInfo> {
    let by_id = index_by_id(points);
    let active_index = active.and_then(|id| by_id.get(&id).copied());

    let mut out = Vec::new();
    for (to_index, pt) in points.iter().enumerate() {
        let from_index = match pt.prev.and_then(|prev| by_id.get(&prev).copied()) {
            Some(i) => i,
            None => {
                if !skeleton {
                    continue;
                }
                match active_index {
                    Some(a) if points[a].id != pt.id => a,
                    _ => continue,
                }
            }
        };
        out.push(SegmentInfo {
            from_index,
            to_index,
            segment: Segment::between(&points[from_index], pt),
        });
    }
    out
}
