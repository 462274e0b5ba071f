// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Discrete notifications emitted to the host.
//!
//! The session queues events as it mutates and the host drains them
//! (`EditSession::take_events`) after dispatching each input event, so
//! every notification is delivered synchronously within the triggering
//! handler's frame. Absence of an event is the only signal for a
//! silently absorbed edge case.

use crate::export::ExportedShape;
use crate::model::PointId;

/// A discrete editor notification.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A point was appended or inserted
    PointAdded { id: PointId, index: usize },
    /// A point was removed
    PointRemoved { id: PointId },
    /// A point's handles or flags changed
    PointEdited { id: PointId },
    /// A point's anchor moved
    PointRepositioned { id: PointId },
    /// A point converted between line and bezier
    PointConverted { id: PointId, bezier: bool },
    /// The selected set changed
    PointSelected { indices: Vec<usize> },
    /// Any structural change to the path
    PathShapeChanged,
    /// The path closed or broke open
    PathClosedChanged { closed: bool },
    /// A transform gesture committed; carries the final exported shape
    TransformationComplete { shape: ExportedShape },
    /// The user signalled "done drawing"; carries the final shape
    Finish { shape: ExportedShape },
}
