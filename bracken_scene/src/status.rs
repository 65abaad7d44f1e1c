// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic per-node interaction status.

/// Interaction status booleans and transition timestamps for one node.
///
/// Written by the interaction state machine and the scene's own mutators;
/// hosts read it through [`crate::Scene::status`].
#[derive(Clone, Debug)]
pub struct Status {
    /// Node participates in layout, rendering and hit testing.
    pub visible: bool,
    /// Style responds to hover/press; deactivated nodes always show the
    /// normal snapshot.
    pub active: bool,
    /// Node must repaint this frame. Propagates to every ancestor.
    pub dirty: bool,
    /// Pointer is over the node.
    pub hovered: bool,
    /// Left button (or activation key) is held on the node.
    pub pressed: bool,
    /// Right button is held on the node.
    pub right_pressed: bool,
    /// Toggled by clicks on select-capable nodes.
    pub selected: bool,
    /// A drag-capable node is currently pressed.
    pub dragging: bool,
    /// Nearest-ancestor-stack marker used to route wheel input.
    pub scroll_hovered: bool,
    /// Timestamp (ms) of the last hover start.
    pub hover_start_ms: u64,
    /// Timestamp (ms) of the last press start.
    pub press_start_ms: u64,
    /// Timestamp (ms) of the last right-press start.
    pub right_press_start_ms: u64,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            visible: true,
            active: true,
            // Fresh nodes must paint on their first frame.
            dirty: true,
            hovered: false,
            pressed: false,
            right_pressed: false,
            selected: false,
            dragging: false,
            scroll_hovered: false,
            hover_start_ms: 0,
            press_start_ms: 0,
            right_press_start_ms: 0,
        }
    }
}
