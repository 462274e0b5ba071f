// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer event types and low-level gesture plumbing.
//!
//! Three small state machines live here, each owned by the session and
//! explicitly clearable so a late callback can never act on a point list
//! that has since been replaced:
//!
//! - `DragGate`: turns a press into a drag only after the screen-space
//!   travel threshold is exceeded; below it, release resolves to a click.
//! - `ClickGate`: double-click disambiguation. A click parks as pending;
//!   a second click inside the window cancels it and reports a double,
//!   otherwise `poll` releases the single click once the window elapses.
//! - `RedrawCoalescer`: collapses high-frequency move-triggered repaint
//!   requests into one per host frame.

use crate::settings;
use kurbo::Point;
use std::time::Instant;

/// Modifier key flags carried on a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifier held.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.alt || self.ctrl || self.meta)
    }
}

/// Which bezier handle of a point a gesture addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// `ctrl1`, the incoming tangent
    Incoming,
    /// `ctrl2`, the outgoing tangent
    Outgoing,
}

/// What a pointer event landed on.
///
/// Hosts that resolve targets themselves (named hit regions) pass this
/// directly; otherwise the session derives it by distance hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A point body, by index
    Point(usize),
    /// A bezier control handle
    ControlPoint { point: usize, handle: Handle },
    /// A path segment, by its start point's index (`points.len()` is
    /// the closing segment)
    Segment(usize),
    /// The filled interior of a closed shape
    Fill,
    /// Nothing, just empty canvas
    Empty,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in screen space
    pub pos: Point,
    /// Modifier flags as reported by the pointer event (authoritative
    /// over window-level key tracking)
    pub mods: Modifiers,
    /// Pre-resolved target, when the host knows it
    pub target: Option<HitTarget>,
    /// Event timestamp, used for click disambiguation
    pub time: Instant,
}

impl PointerEvent {
    /// Event at `pos` with no modifiers, stamped now.
    pub fn new(pos: Point) -> Self {
        Self {
            pos,
            mods: Modifiers::default(),
            target: None,
            time: Instant::now(),
        }
    }

    /// Attach modifier flags.
    pub fn with_modifiers(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    /// Attach a host-resolved target.
    pub fn with_target(mut self, target: HitTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Override the timestamp (tests, replay).
    pub fn at_time(mut self, time: Instant) -> Self {
        self.time = time;
        self
    }
}

// ===== Drag threshold =====

/// Tracks whether a press has travelled far enough to count as a drag.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragGate {
    origin: Option<Point>,
    dragging: bool,
}

impl DragGate {
    /// Record a press at a screen position.
    pub fn press(&mut self, pos: Point) {
        self.origin = Some(pos);
        self.dragging = false;
    }

    /// Update with the current position; returns true once the travel
    /// threshold has been exceeded (and stays true for the gesture).
    pub fn update(&mut self, pos: Point) -> bool {
        if let Some(origin) = self.origin
            && !self.dragging
            && origin.distance(pos) > settings::interaction::DRAG_THRESHOLD
        {
            self.dragging = true;
        }
        self.dragging
    }

    /// Whether the gesture became a drag.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// The press origin, while a gesture is in flight.
    pub fn origin(&self) -> Option<Point> {
        self.origin
    }

    /// End the gesture; returns true if it had become a drag.
    pub fn release(&mut self) -> bool {
        let was_drag = self.dragging;
        *self = Self::default();
        was_drag
    }

    /// Abandon the gesture.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ===== Click disambiguation =====

/// A single click waiting out the double-click window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingClick {
    /// Screen position of the click
    pub pos: Point,
    /// Target the click resolved to
    pub target: HitTarget,
    /// When the single-click action may fire
    pub deadline: Instant,
}

/// Outcome of feeding a click into the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickResolution {
    /// Parked; `poll` will release it after the window
    Deferred,
    /// Second click within window and distance; fire the double action
    Double(HitTarget),
}

/// Double-click disambiguation with a cancellable pending single click.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickGate {
    pending: Option<PendingClick>,
}

impl ClickGate {
    /// Feed a click; either parks it or resolves a double-click.
    pub fn click(&mut self, now: Instant, pos: Point, target: HitTarget) -> ClickResolution {
        if let Some(pending) = self.pending
            && now < pending.deadline
            && pending.pos.distance(pos) < settings::interaction::DOUBLE_CLICK_DISTANCE
        {
            // The pending single-click action is cancelled by the
            // second click.
            self.pending = None;
            return ClickResolution::Double(pending.target);
        }
        self.pending = Some(PendingClick {
            pos,
            target,
            deadline: now + settings::interaction::DOUBLE_CLICK_WINDOW,
        });
        ClickResolution::Deferred
    }

    /// Release the pending single click once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<PendingClick> {
        if self.pending.is_some_and(|p| now >= p.deadline) {
            return self.pending.take();
        }
        None
    }

    /// Whether a click is still parked.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending click (superseding gesture, reset, detach).
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

// ===== Redraw coalescing =====

/// Collapses repaint requests from high-frequency pointer moves into a
/// single request per host frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedrawCoalescer {
    pending: bool,
}

impl RedrawCoalescer {
    /// Note that a repaint is wanted.
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Consume the request; the host calls this once per frame.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Drop any outstanding request.
    pub fn clear(&mut self) {
        self.pending = false;
    }
}
