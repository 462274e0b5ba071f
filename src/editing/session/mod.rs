// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit session: all state for one editor instance.
//!
//! The session owns the canonical point list, the selection, the
//! interaction state machine, and the event queue the host drains after
//! dispatching each input. Pointer routing lives in `pointer`, hit
//! testing in `hit_testing`, and the mutation operations in
//! `path_editing`.
//!
//! A session registers with its injected `SelectionCoordinator` at
//! construction and publishes a snapshot (points, selection, bounds)
//! after every mutation, so the host can query or drive multi-region
//! group transforms without reaching into the live session.

pub mod hit_testing;
pub mod path_editing;
pub mod pointer;

use crate::coordinator::{InstanceSnapshot, SelectionCoordinator};
use crate::editing::mouse::{ClickGate, DragGate, Handle, HitTarget, RedrawCoalescer};
use crate::editing::selection::Selection;
use crate::editing::viewport::ViewPort;
use crate::error::EditorError;
use crate::events::EditorEvent;
use crate::export::{self, ExportedShape};
use crate::geometry;
use crate::model::{InstanceId, PointId};
use crate::path::{self, PathPoint, RawPoint, SegmentInfo};
use crate::settings;
use kurbo::{Point, Rect, Size};
use std::sync::Arc;

/// Host-supplied configuration for one editor instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Whether the path may be closed into a polygon
    pub allow_close: bool,
    /// Whether points may carry bezier handles
    pub allow_bezier: bool,
    /// Minimum point count for a complete shape
    pub min_points: Option<usize>,
    /// Maximum point count; adding stops silently at the cap
    pub max_points: Option<usize>,
    /// Skeleton mode: branching topology, any point may become active
    pub skeleton: bool,
    /// Snap anchors to integer coordinates
    pub pixel_snapping: bool,
    /// Ignore all pointer input
    pub disabled: bool,
    /// Whether the host currently presents this editor as the selected
    /// region; previews are suppressed while it is not
    pub selected: bool,
    /// Canvas bounds in model units; mutations clamp into them
    pub bounds: Option<Size>,
    /// Explicit closure override from the host, trumping the derived
    /// reference-graph closure
    pub closed_override: Option<bool>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            allow_close: true,
            allow_bezier: true,
            min_points: None,
            max_points: None,
            skeleton: false,
            pixel_snapping: false,
            disabled: false,
            selected: true,
            bounds: None,
            closed_override: None,
        }
    }
}

/// Where the interaction state machine currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    /// Nothing in flight
    Idle,
    /// Cursor over an existing affordance
    Hovering { target: HitTarget },
    /// Pointer down, travel still below the drag threshold
    PendingPress { target: HitTarget },
    /// Repositioning a point body
    DraggingPoint { index: usize },
    /// Repositioning a bezier handle
    DraggingControlPoint { index: usize, handle: Handle },
    /// Translating the whole shape; holds the positions at drag start
    /// so snapping can be deferred to release
    DraggingShape { origin: Vec<PathPoint>, start: Point },
    /// Multi-region transform in flight, driven by the host
    DraggingGroup,
    /// Shift multi-select in progress
    MultiSelecting,
}

/// Transient preview entity, recomputed per frame, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GhostPreview {
    /// Draw preview from the active point to the cursor
    Line { from: Point, to: Point },
    /// Shift insert preview on a segment
    InsertPoint { pos: Point, segment_index: usize },
    /// Dashed closing indicator over the opposite endpoint
    CloseIndicator { endpoint: usize },
}

/// Editing state for a single path editor instance.
#[derive(Debug)]
pub struct EditSession {
    instance: InstanceId,
    coordinator: Arc<SelectionCoordinator>,
    config: EditorConfig,
    /// The canonical point list
    points: Arc<Vec<PathPoint>>,
    selection: Selection,
    viewport: ViewPort,
    state: InteractionState,
    pub(crate) drag: DragGate,
    pub(crate) clicks: ClickGate,
    redraw: RedrawCoalescer,
    /// Window-level shift tracking, kept in sync with (and overridden
    /// by) pointer event modifiers
    shift_down: bool,
    /// Draw mode: clicks on empty canvas append points
    drawing: bool,
    events: Vec<EditorEvent>,
    detached: bool,
}

impl EditSession {
    /// Create a session, registering it with the coordinator.
    pub fn new(coordinator: Arc<SelectionCoordinator>, config: EditorConfig) -> Self {
        let instance = coordinator.register();
        let mut session = Self {
            instance,
            coordinator,
            config,
            points: Arc::new(Vec::new()),
            selection: Selection::new(),
            viewport: ViewPort::default(),
            state: InteractionState::Idle,
            drag: DragGate::default(),
            clicks: ClickGate::default(),
            redraw: RedrawCoalescer::default(),
            shift_down: false,
            drawing: true,
            events: Vec::new(),
            detached: false,
        };
        session.publish();
        session
    }

    /// Create a session with an initial point list.
    pub fn with_points(
        coordinator: Arc<SelectionCoordinator>,
        config: EditorConfig,
        initial: &[RawPoint],
    ) -> Self {
        let mut session = Self::new(coordinator, config);
        session.replace_points(path::normalize(initial));
        session.drawing = !session.is_closed();
        session.selection.set_last_added(session.points.last().map(|p| p.id));
        session.publish();
        session
    }

    // ===== Accessors =====

    /// This instance's registry id.
    pub fn instance_id(&self) -> InstanceId {
        self.instance
    }

    /// The canonical point list.
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Current configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: EditorConfig) {
        if config.disabled && !self.config.disabled {
            self.cancel_interaction();
        }
        self.config = config;
    }

    /// Current viewport transform.
    pub fn viewport(&self) -> ViewPort {
        self.viewport
    }

    /// Update the viewport transform (zoom, pan, fit scale).
    pub fn set_viewport(&mut self, viewport: ViewPort) {
        self.viewport = viewport;
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: InteractionState) {
        self.state = state;
    }

    pub(crate) fn take_state(&mut self) -> InteractionState {
        std::mem::replace(&mut self.state, InteractionState::Idle)
    }

    /// Whether draw mode is active (clicks on empty canvas add points).
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Enter or leave draw mode programmatically.
    pub fn set_drawing(&mut self, drawing: bool) {
        self.drawing = drawing;
    }

    // ===== Host input =====

    /// Replace the point list from host input.
    ///
    /// Skipped when the input structurally equals the engine's canonical
    /// list; this is what stops the feedback loop when the host echoes
    /// an engine-emitted update back into its own props.
    pub fn set_points(&mut self, raw: &[RawPoint]) {
        if path::raw_matches_canonical(raw, &self.points) {
            return;
        }
        tracing::debug!(count = raw.len(), "replacing point list from host");
        self.replace_points(path::normalize(raw));
    }

    /// Replace the point list from a JSON array (either input form).
    pub fn set_points_json(&mut self, value: &serde_json::Value) -> Result<(), EditorError> {
        let points = path::from_json(value)?;
        self.replace_points(points);
        Ok(())
    }

    fn replace_points(&mut self, points: Vec<PathPoint>) {
        self.points = Arc::new(points);
        self.selection = Selection::new();
        self.selection
            .set_last_added(self.points.last().map(|p| p.id));
        self.cancel_interaction();
        self.publish();
    }

    /// Track window-level shift keydown (latency-free preview before
    /// the next pointer move).
    pub fn key_shift_down(&mut self) {
        self.shift_down = true;
        self.redraw.request();
    }

    /// Track window-level shift keyup.
    pub fn key_shift_up(&mut self) {
        self.shift_down = false;
        if matches!(self.state, InteractionState::MultiSelecting) {
            self.state = InteractionState::Idle;
        }
        self.redraw.request();
    }

    /// Whether shift is held, per the latest authoritative source.
    pub fn shift_held(&self) -> bool {
        self.shift_down
    }

    pub(crate) fn sync_shift(&mut self, from_pointer: bool) {
        // The live pointer event's flag is authoritative.
        self.shift_down = from_pointer;
    }

    // ===== Derived path properties =====

    /// Whether the path is closed (host override, else derived from the
    /// reference graph; skeleton topologies are never closed).
    pub fn is_closed(&self) -> bool {
        if let Some(closed) = self.config.closed_override {
            return closed;
        }
        !self.config.skeleton && path::is_closed(&self.points, self.config.allow_close)
    }

    /// Whether a closing gesture would currently be accepted.
    pub fn closing_eligible(&self) -> bool {
        let len = self.points.len();
        self.config.allow_close
            && !self.config.skeleton
            && !self.is_closed()
            && (len > 2 || self.points.iter().any(|p| p.bezier))
            && self.config.min_points.is_none_or(|min| len >= min)
    }

    /// Indices of chain endpoints.
    pub fn endpoint_indices(&self) -> Vec<usize> {
        path::endpoint_indices(&self.points)
    }

    /// Flat segment list for rendering and hit-testing.
    pub fn segments(&self) -> Vec<SegmentInfo> {
        path::segments(
            &self.points,
            self.config.skeleton,
            self.selection.active_or_last(),
        )
    }

    /// The active drawing point's id (explicit, else last added).
    pub fn active_point_id(&self) -> Option<PointId> {
        self.selection.active_or_last()
    }

    pub(crate) fn index_of(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    /// Whether an insertion can splice this segment: the end point must
    /// actually reference the start point. Skeleton rendering draws
    /// unresolved branches attached to the active point; those drawn
    /// attachments are not graph edges and cannot take an insertion.
    pub(crate) fn segment_spliceable(&self, hit: &geometry::SegmentHit) -> bool {
        let from_id = self.points[hit.from_index].id;
        self.points[hit.to_index].prev == Some(from_id)
    }

    // ===== Host queries =====

    /// Export the shape in the simple interchange format.
    pub fn export_shape(&self) -> ExportedShape {
        export::export_shape(&self.points, self.is_closed(), self.config.min_points)
    }

    /// Bounding box of the shape, control points included.
    pub fn get_shape_bounding_box(&self) -> Option<Rect> {
        geometry::bounding_box(&self.points)
    }

    /// Whether a model-space point lies inside the closed shape.
    pub fn is_point_over_shape(&self, pos: Point) -> bool {
        self.is_closed() && geometry::is_point_in_polygon(pos, &self.points)
    }

    /// Ids of the currently selected points.
    pub fn get_selected_point_ids(&self) -> Vec<PointId> {
        self.selection
            .iter()
            .filter_map(|i| self.points.get(i).map(|p| p.id))
            .collect()
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Consume the coalesced repaint request (once per host frame).
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    // ===== Previews =====

    /// Compute the transient preview for the given cursor position, or
    /// `None` when every preview is suppressed.
    pub fn preview(&self, cursor_screen: Point) -> Option<GhostPreview> {
        if self.config.disabled
            || !self.config.selected
            || !self.coordinator.can_instance_have_selection(self.instance)
        {
            return None;
        }

        let cursor = self.viewport.to_model(cursor_screen);

        // The closing indicator wins over the ghost line.
        if let Some(endpoint) = self.closing_target(cursor) {
            return Some(GhostPreview::CloseIndicator { endpoint });
        }

        if self.shift_down {
            return self.insert_preview(cursor);
        }

        // Ghost line suppression: existing affordances under the
        // cursor, cap reached, closed, or multi-selection in progress.
        if !matches!(self.hit_test(cursor_screen), HitTarget::Empty) {
            return None;
        }
        if self.config.max_points.is_some_and(|max| self.points.len() >= max)
            || self.is_closed()
            || matches!(self.state, InteractionState::MultiSelecting)
            || self.selection.len() > 1
            || !self.drawing
        {
            return None;
        }

        let from_id = self.active_point_id()?;
        let from = self.points[self.index_of(from_id)?].point;
        Some(GhostPreview::Line {
            from,
            to: geometry::snap_to_pixel(cursor, self.config.pixel_snapping),
        })
    }

    fn insert_preview(&self, cursor: Point) -> Option<GhostPreview> {
        let hit = self.nearest_segment_hit(cursor)?;
        if !self.segment_spliceable(&hit) {
            return None;
        }
        let radius = self.viewport.model_radius(settings::hit_radius::SEGMENT);
        if hit.dist_sq <= radius * radius {
            Some(GhostPreview::InsertPoint {
                pos: hit.point,
                segment_index: self.segment_display_index(&hit),
            })
        } else {
            None
        }
    }

    /// The endpoint a closing click would land on: the active point must
    /// be one endpoint and the cursor within the close radius of the
    /// other.
    pub(crate) fn closing_target(&self, cursor: Point) -> Option<usize> {
        if !self.closing_eligible() {
            return None;
        }
        let active = self.active_point_id()?;
        let active_index = self.index_of(active)?;
        let endpoints = self.endpoint_indices();
        if !endpoints.contains(&active_index) {
            return None;
        }
        let radius = self.viewport.model_radius(settings::hit_radius::CLOSE);
        endpoints
            .into_iter()
            .filter(|&i| i != active_index)
            .find(|&i| self.points[i].point.distance(cursor) <= radius)
    }

    // ===== Lifecycle =====

    /// Abandon any in-flight gesture and clear all pending timers.
    pub fn cancel_interaction(&mut self) {
        self.state = InteractionState::Idle;
        self.drag.clear();
        self.clicks.clear();
        self.redraw.clear();
    }

    /// Deregister from the coordinator. Further pointer input is
    /// ignored; queries keep working on the last state.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.cancel_interaction();
        if let Err(err) = self.coordinator.deregister(self.instance) {
            tracing::warn!(%err, "detach of unregistered session");
        }
        self.detached = true;
    }

    pub(crate) fn is_detached(&self) -> bool {
        self.detached
    }

    // ===== Internal plumbing =====

    pub(crate) fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
        self.redraw.request();
    }

    pub(crate) fn points_mut(&mut self) -> &mut Vec<PathPoint> {
        Arc::make_mut(&mut self.points)
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Whether this instance may mutate selection right now. Checked
    /// immediately before committing, never from a stale closure.
    pub(crate) fn may_select(&self) -> bool {
        self.coordinator.can_instance_have_selection(self.instance)
    }

    /// Give up this instance's selection claim in the registry.
    pub(crate) fn release_selection_claim(&mut self) -> Result<(), EditorError> {
        self.coordinator.clear_selection(self.instance)
    }

    /// Commit the selection to the coordinator and notify the host.
    pub(crate) fn commit_selection(&mut self) {
        let indices: Vec<usize> = self.selection.iter().collect();
        if let Err(err) = self.coordinator.select_points(self.instance, &indices) {
            tracing::warn!(%err, "selection commit after deregistration");
            return;
        }
        self.emit(EditorEvent::PointSelected { indices });
        self.publish();
    }

    /// Publish the current state snapshot to the coordinator registry.
    pub(crate) fn publish(&mut self) {
        if self.detached {
            return;
        }
        let snapshot = InstanceSnapshot {
            points: self.points.as_ref().clone(),
            selection: self.selection.iter().collect(),
            bounds: geometry::bounding_box(&self.points),
        };
        if self.coordinator.publish(self.instance, snapshot).is_err() {
            tracing::warn!("publish after deregistration");
        }
    }
}

impl Drop for EditSession {
    fn drop(&mut self) {
        self.detach();
    }
}
