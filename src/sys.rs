// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-specific time access for cross-platform compatibility.
//!
//! On native platforms the wall clock comes from `std::time`, while on
//! WASM it comes from `web_time`.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, per the host clock.
pub fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
