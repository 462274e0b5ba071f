// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for path points and editor instances.
//!
//! Each id is a monotonically increasing `u64` generated from a process-wide
//! atomic counter. Ids are never reused, so a deleted point can never be
//! confused with a later one. Hosts may supply their own numeric point ids
//! in the input list; `PointId::reserve_through` bumps the counter past
//! them so fresh ids stay unique.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a path point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PointId(u64);

static POINT_COUNTER: AtomicU64 = AtomicU64::new(1);

impl PointId {
    /// Create a new unique point id.
    pub fn next() -> Self {
        Self(POINT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a host-supplied raw id.
    ///
    /// Callers must also `reserve_through` the largest supplied id so the
    /// counter never hands the same value out again.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value, for export back to the host.
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Ensure future `next()` calls return ids strictly greater than `raw`.
    pub fn reserve_through(raw: u64) {
        POINT_COUNTER.fetch_max(raw.saturating_add(1), Ordering::Relaxed);
    }
}

impl Default for PointId {
    fn default() -> Self {
        Self::next()
    }
}

/// A unique identifier for a registered editor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

static INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

impl InstanceId {
    /// Create a new unique instance id.
    pub fn next() -> Self {
        Self(INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}
