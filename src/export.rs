// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Simple shape export, the host-facing interchange form.
//!
//! Field names serialize camelCase so a JSON host sees the same shape it
//! would store: `{type, isClosed, incomplete, points: [{x, y, bezier,
//! controlPoints}]}`. Persistence of the result is entirely the host's
//! concern.

use crate::path::PathPoint;
use serde::{Deserialize, Serialize};

/// Shape classification of an exported path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Closed outline
    Polygon,
    /// Open chain
    Polyline,
}

/// One exported point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedPoint {
    pub x: f64,
    pub y: f64,
    pub bezier: bool,
    /// Incoming then outgoing handle, present handles only
    pub control_points: Vec<[f64; 2]>,
}

/// The exported shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedShape {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub is_closed: bool,
    /// Set when the shape has fewer points than the configured minimum
    pub incomplete: bool,
    pub points: Vec<ExportedPoint>,
}

/// Export the canonical point list in the simple format.
pub fn export_shape(
    points: &[PathPoint],
    is_closed: bool,
    min_points: Option<usize>,
) -> ExportedShape {
    let exported = points
        .iter()
        .map(|pt| {
            let mut control_points = Vec::new();
            if let Some(c) = pt.ctrl1 {
                control_points.push([c.x, c.y]);
            }
            if let Some(c) = pt.ctrl2 {
                control_points.push([c.x, c.y]);
            }
            ExportedPoint {
                x: pt.point.x,
                y: pt.point.y,
                bezier: pt.bezier,
                control_points,
            }
        })
        .collect();

    ExportedShape {
        kind: if is_closed {
            ShapeKind::Polygon
        } else {
            ShapeKind::Polyline
        },
        is_closed,
        incomplete: min_points.is_some_and(|min| points.len() < min),
        points: exported,
    }
}
