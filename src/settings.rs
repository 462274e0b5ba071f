// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Engine tuning constants.
//!
//! Everything here is expressed in screen pixels (hit radii, drag
//! threshold) or plain scalars. Pixel values are converted into model
//! units at the call site by dividing by the current viewport scale, so
//! tolerances stay visually constant regardless of zoom.

// ============================================================================
// HIT RADII (screen pixels)
// ============================================================================
/// Hit radius for point bodies
const HIT_RADIUS_SELECTION: f64 = 8.0;

/// Hit radius for bezier control handles (smaller than point bodies)
const HIT_RADIUS_CONTROL_POINT: f64 = 6.0;

/// Hit radius for path segments
const HIT_RADIUS_SEGMENT: f64 = 5.0;

/// Hit radius for the close-path indicator on the opposite endpoint
const HIT_RADIUS_CLOSE: f64 = 12.0;

// ============================================================================
// INTERACTION SETTINGS
// ============================================================================
/// Screen-pixel distance a press must travel before it becomes a drag.
/// Below this, pointer-up resolves to a selection click instead.
const DRAG_THRESHOLD: f64 = 5.0;

/// Window for double-click disambiguation. A second click inside this
/// window cancels the pending single-click action.
const DOUBLE_CLICK_WINDOW_MS: u64 = 150;

/// Maximum screen-pixel distance between two clicks of a double-click
const DOUBLE_CLICK_DISTANCE: f64 = 10.0;

// ============================================================================
// BEZIER SETTINGS
// ============================================================================
/// Fraction of the neighbor-to-neighbor chord used when synthesizing
/// control handles for a line point converted to bezier. A heuristic
/// tunable, not a geometric invariant.
const BEZIER_HANDLE_FRACTION: f64 = 0.25;

/// Accuracy passed to kurbo's nearest-point solver for cubic segments
/// (model units; comfortably below a pixel at any reasonable zoom)
const NEAREST_ACCURACY: f64 = 1e-4;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Hit radii in screen pixels, converted to model units per gesture
pub mod hit_radius {
    /// Point bodies
    pub const SELECTION: f64 = super::HIT_RADIUS_SELECTION;

    /// Bezier control handles
    pub const CONTROL_POINT: f64 = super::HIT_RADIUS_CONTROL_POINT;

    /// Path segments
    pub const SEGMENT: f64 = super::HIT_RADIUS_SEGMENT;

    /// Close-path indicator
    pub const CLOSE: f64 = super::HIT_RADIUS_CLOSE;
}

/// Pointer gesture disambiguation settings
pub mod interaction {
    use std::time::Duration;

    /// Press-to-drag threshold (screen pixels)
    pub const DRAG_THRESHOLD: f64 = super::DRAG_THRESHOLD;

    /// Double-click debounce window
    pub const DOUBLE_CLICK_WINDOW: Duration =
        Duration::from_millis(super::DOUBLE_CLICK_WINDOW_MS);

    /// Double-click distance tolerance (screen pixels)
    pub const DOUBLE_CLICK_DISTANCE: f64 = super::DOUBLE_CLICK_DISTANCE;
}

/// Bezier conversion and curve-query settings
pub mod bezier {
    /// Handle length as a fraction of the neighbor chord
    pub const HANDLE_FRACTION: f64 = super::BEZIER_HANDLE_FRACTION;

    /// Nearest-point solver accuracy (model units)
    pub const NEAREST_ACCURACY: f64 = super::NEAREST_ACCURACY;
}
