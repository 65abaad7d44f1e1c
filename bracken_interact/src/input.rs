// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame input snapshot supplied by the host.

use kurbo::{Point, Vec2};

/// One immutable snapshot of input state, consumed once per frame before
/// the logic pass runs.
///
/// Button fields are *held* state, not transitions; the state machine
/// derives press/release edges by comparing against its own tracking.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputSnapshot {
    /// Pointer position in root space.
    pub pointer: Point,
    /// Pointer movement since the previous frame.
    pub pointer_delta: Vec2,
    /// Left button held.
    pub left_down: bool,
    /// Right button held.
    pub right_down: bool,
    /// Wheel delta for this frame; positive y scrolls up.
    pub wheel: Vec2,
    /// Keyboard activation key (e.g. space) held; presses the keyboard
    /// navigation target.
    pub activate_key_down: bool,
    /// Control modifier held; redirects wheel input horizontally.
    pub ctrl_down: bool,
    /// Frame timestamp in milliseconds, used for status timestamps.
    pub now_ms: u64,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            pointer: Point::ZERO,
            pointer_delta: Vec2::ZERO,
            left_down: false,
            right_down: false,
            wheel: Vec2::ZERO,
            activate_key_down: false,
            ctrl_down: false,
            now_ms: 0,
        }
    }
}

impl InputSnapshot {
    /// A snapshot with the pointer at `pos` and everything else idle.
    #[must_use]
    pub fn at(pos: Point, now_ms: u64) -> Self {
        Self {
            pointer: pos,
            now_ms,
            ..Self::default()
        }
    }
}
