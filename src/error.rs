// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Error type for contract violations.
//!
//! User-gesture edge cases (clicking below the drag threshold, closing
//! with too few points, deleting an id that is already gone) are never
//! errors; those paths silently no-op. `EditorError` covers integration
//! bugs only: malformed input points and operations against instance ids
//! that were never registered or already deregistered.

use crate::model::InstanceId;
use thiserror::Error;

/// A contract violation by the host
#[derive(Debug, Error)]
pub enum EditorError {
    /// An input point object was structurally invalid (e.g. missing `x`/`y`)
    #[error("malformed input point: {0}")]
    MalformedPoint(String),

    /// An operation referenced an editor instance that is not registered
    #[error("unknown editor instance {0:?}")]
    UnknownInstance(InstanceId),
}
