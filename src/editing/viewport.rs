// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Screen↔model coordinate transform.
//!
//! The host supplies `zoom`, a pan `offset`, and a separate `fit_scale`
//! multiplier (the scale at which the image fits its container); the
//! effective scale is their product. Hit radii defined in screen pixels
//! divide by that scale so tolerance is visually constant at any zoom.

use kurbo::{Point, Vec2};

/// Viewport transform parameters supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPort {
    /// User zoom factor
    pub zoom: f64,
    /// Pan offset in screen pixels
    pub offset: Vec2,
    /// Fit-to-container scale multiplier
    pub fit_scale: f64,
}

impl ViewPort {
    /// Effective model→screen scale.
    pub fn scale(&self) -> f64 {
        self.zoom * self.fit_scale
    }

    /// Convert a model-space point to screen space.
    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale() + self.offset.x,
            p.y * self.scale() + self.offset.y,
        )
    }

    /// Convert a screen-space point to model space.
    pub fn to_model(&self, p: Point) -> Point {
        let s = self.scale();
        Point::new((p.x - self.offset.x) / s, (p.y - self.offset.y) / s)
    }

    /// Convert a screen-pixel radius into model units.
    pub fn model_radius(&self, pixels: f64) -> f64 {
        pixels / self.scale()
    }
}

impl Default for ViewPort {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
            fit_scale: 1.0,
        }
    }
}
