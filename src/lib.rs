// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Pathedit: an interactive vector path editing engine.
//!
//! The engine maintains an editable path as a flat list of points whose
//! connectivity is encoded through per-point back-references, and turns
//! pointer gestures into point mutations: drawing, selecting, dragging,
//! inserting, deleting, closing and breaking, and line↔bezier
//! conversion. It is renderer-agnostic: a host feeds it pointer events
//! and a viewport transform, drains the emitted [`EditorEvent`]s, and
//! draws the point list and [`GhostPreview`]s however it likes.
//!
//! The core types are [`EditSession`] (one editor instance),
//! [`SelectionCoordinator`] (arbitration between instances sharing a
//! canvas), and [`PathPoint`] (the point model).
//!
//! [`EditorEvent`]: events::EditorEvent
//! [`GhostPreview`]: editing::GhostPreview
//! [`EditSession`]: editing::EditSession
//! [`SelectionCoordinator`]: coordinator::SelectionCoordinator
//! [`PathPoint`]: path::PathPoint

pub mod coordinator;
pub mod editing;
pub mod error;
pub mod events;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod path;
pub mod settings;

pub use coordinator::{InstanceSnapshot, SelectionCoordinator};
pub use editing::{EditSession, EditorConfig, GhostPreview, InteractionState, ViewPort};
pub use error::EditorError;
pub use events::EditorEvent;
pub use export::{ExportedShape, ShapeKind};
pub use model::{InstanceId, PointId};
pub use path::{PathPoint, RawPoint};
