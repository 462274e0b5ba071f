// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Identifier model

pub mod ids;

pub use ids::{InstanceId, PointId};
