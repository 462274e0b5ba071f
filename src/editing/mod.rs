// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Interactive editing: the session, selection, viewport transform, and
//! pointer plumbing.

pub mod mouse;
pub mod selection;
pub mod session;
pub mod viewport;

pub use mouse::{Handle, HitTarget, Modifiers, PointerEvent};
pub use selection::Selection;
pub use session::{EditSession, EditorConfig, GhostPreview, InteractionState};
pub use viewport::ViewPort;
