// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer input routing, the interaction state machine.
//!
//! A press parks in `PendingPress` until it either travels past the
//! drag threshold (becoming a point / handle / shape drag) or releases
//! as a click. Clicks dispatch on modifiers: alt deletes points and
//! breaks closed paths, shift multi-selects and inserts on segments,
//! and plain clicks draw, close, select, or finish. Single clicks on
//! point bodies are parked in the click gate so a fast second click can
//! cancel them and toggle the point's curve type instead; the host
//! drives `tick` to release them once the window elapses.

use super::{EditSession, InteractionState};
use crate::editing::mouse::{
    ClickResolution, HitTarget, PendingClick, PointerEvent,
};
use crate::events::EditorEvent;
use std::time::Instant;

impl EditSession {
    /// Pointer press.
    pub fn pointer_down(&mut self, event: PointerEvent) {
        if self.ignores_pointer() {
            return;
        }
        self.sync_shift(event.mods.shift);
        let target = self.resolve_target(&event);
        self.drag.press(event.pos);
        self.set_state(InteractionState::PendingPress { target });
    }

    /// Pointer movement, pressed or not.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        if self.ignores_pointer() {
            return;
        }
        self.sync_shift(event.mods.shift);

        if self.drag.origin().is_some() {
            if self.drag.update(event.pos) {
                if let InteractionState::PendingPress { target } = self.state().clone() {
                    // A drag supersedes any pending click.
                    self.clicks.clear();
                    self.begin_drag(target);
                }
                self.continue_drag(event.pos);
            }
            return;
        }

        // Hover tracking. Multi-select sticks while shift is held so a
        // stray move between shift-clicks does not drop the mode.
        if matches!(self.state(), InteractionState::MultiSelecting) && self.shift_held() {
            return;
        }
        let next = match self.resolve_target(&event) {
            HitTarget::Empty => InteractionState::Idle,
            target => InteractionState::Hovering { target },
        };
        if next != *self.state() {
            self.set_state(next);
            self.request_redraw();
        }
    }

    /// Pointer release: commit a drag or resolve a click.
    pub fn pointer_up(&mut self, event: PointerEvent) {
        if self.ignores_pointer() {
            return;
        }
        self.sync_shift(event.mods.shift);
        let was_drag = self.drag.release();
        let state = self.take_state();

        if was_drag {
            match state {
                InteractionState::DraggingPoint { index } => self.commit_point_move(index),
                InteractionState::DraggingControlPoint { index, .. } => {
                    self.commit_control_move(index)
                }
                InteractionState::DraggingShape { origin, .. } => {
                    self.finish_shape_drag(&origin)
                }
                _ => {}
            }
            return;
        }

        // Only a release that began as a press on this session is a
        // click; a stray up is ignored.
        let InteractionState::PendingPress { target } = state else {
            return;
        };
        self.handle_click(&event, target);
    }

    /// Whether pointer input is currently routed at all. A host-driven
    /// group transform owns the pointer until `end_group_drag`.
    fn ignores_pointer(&self) -> bool {
        self.config().disabled
            || self.is_detached()
            || matches!(self.state(), InteractionState::DraggingGroup)
    }

    /// Host-driven clock: releases parked single clicks once their
    /// double-click window has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(pending) = self.clicks.poll(now) {
            self.resolve_single_click(pending);
        }
    }

    // ===== Drag dispatch =====

    fn begin_drag(&mut self, target: HitTarget) {
        match target {
            HitTarget::Point(index) => {
                // Dragging an unselected point selects it first.
                if self.may_select() && !self.selection().contains(index) {
                    if let Some(id) = self.points().get(index).map(|p| p.id) {
                        self.selection_mut().select_only(index, id);
                        self.commit_selection();
                    }
                }
                self.set_state(InteractionState::DraggingPoint { index });
            }
            HitTarget::ControlPoint { point, handle } => {
                self.set_state(InteractionState::DraggingControlPoint {
                    index: point,
                    handle,
                });
            }
            HitTarget::Segment(_) | HitTarget::Fill => {
                let Some(origin_pos) = self.drag.origin() else {
                    return;
                };
                let start = self.viewport().to_model(origin_pos);
                self.set_state(InteractionState::DraggingShape {
                    origin: self.points().to_vec(),
                    start,
                });
            }
            HitTarget::Empty => {
                if self.shift_held() {
                    self.set_state(InteractionState::MultiSelecting);
                }
            }
        }
    }

    fn continue_drag(&mut self, screen: kurbo::Point) {
        let model = self.viewport().to_model(screen);
        match self.state().clone() {
            InteractionState::DraggingPoint { index } => self.move_point(index, model),
            InteractionState::DraggingControlPoint { index, handle } => {
                self.move_control_point(index, handle, model)
            }
            InteractionState::DraggingShape { origin, start } => {
                self.update_shape_drag(&origin, model - start);
            }
            _ => {}
        }
    }

    // ===== Click dispatch =====

    fn handle_click(&mut self, event: &PointerEvent, target: HitTarget) {
        let model = self.viewport().to_model(event.pos);

        if event.mods.alt {
            match target {
                HitTarget::Point(index) => self.delete_point(index),
                HitTarget::Segment(index) if self.is_closed() => {
                    self.break_path_at(index);
                }
                _ => {}
            }
            return;
        }

        if event.mods.shift {
            match target {
                HitTarget::Point(index) => {
                    if self.may_select() {
                        self.selection_mut().toggle(index);
                        self.set_state(InteractionState::MultiSelecting);
                        self.commit_selection();
                    }
                }
                HitTarget::Segment(_) => {
                    self.insert_point_on_segment(model);
                }
                _ => {}
            }
            return;
        }

        if !event.mods.is_empty() {
            return;
        }

        // The closing gesture wins over plain point selection.
        if self.closing_target(model).is_some() {
            self.close_path();
            return;
        }

        match target {
            HitTarget::Point(index) => {
                // Re-clicking the selected active point ends drawing.
                let id = self.points().get(index).map(|p| p.id);
                if self.is_drawing()
                    && id.is_some()
                    && id == self.selection().active()
                    && self.selection().contains(index)
                {
                    self.finish();
                    return;
                }
                if let ClickResolution::Double(HitTarget::Point(i)) =
                    self.clicks.click(event.time, event.pos, target)
                {
                    self.toggle_point_bezier(i);
                }
            }
            HitTarget::Empty => {
                if self.is_drawing() {
                    self.add_point(model);
                } else if self.may_select() && !self.selection().is_empty() {
                    self.clear_selection_gesture();
                }
            }
            _ => {}
        }
    }

    fn resolve_single_click(&mut self, pending: PendingClick) {
        if let HitTarget::Point(index) = pending.target
            && let Some(id) = self.points().get(index).map(|p| p.id)
            && self.may_select()
        {
            self.selection_mut().select_only(index, id);
            self.commit_selection();
        }
    }

    fn clear_selection_gesture(&mut self) {
        self.selection_mut().clear();
        if let Err(err) = self.release_selection_claim() {
            tracing::warn!(%err, "selection release after deregistration");
            return;
        }
        self.emit(EditorEvent::PointSelected {
            indices: Vec::new(),
        });
        self.publish();
    }
}
