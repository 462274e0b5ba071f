// Copyright 2025 the Pathedit Authors
// SPDX-License-Identifier: Apache-2.0

//! Tracing subscriber setup for binaries and examples embedding the
//! engine. Library code only emits through `tracing` and never installs
//! a subscriber on its own.

use tracing_subscriber::EnvFilter;

/// Initialize a tracing subscriber controlled by `RUST_LOG`, defaulting
/// to `pathedit=info` when the variable is unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pathedit=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
