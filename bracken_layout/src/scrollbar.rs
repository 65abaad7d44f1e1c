// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollbar geometry derived from stack layout state.
//!
//! The layout pass decides visibility and reservation; these helpers turn
//! that state into node-local track and handle rects for hosts that paint
//! scrollbars. Wheel routing lives in `bracken_interact`.

use kurbo::Rect;

use bracken_scene::{NodeId, Scene};

/// Smallest handle extent, matching the engine's pointer-target minimum.
pub const MIN_HANDLE_EXTENT: f64 = 20.0;

/// Track and handle rects for a visible vertical scrollbar, in the
/// stack's local coordinates. `None` while the bar is hidden.
#[must_use]
pub fn v_scrollbar_rects(scene: &Scene, id: NodeId) -> Option<(Rect, Rect)> {
    let node = scene.get(id)?;
    let stack = node.stack.as_ref()?;
    if !stack.vscroll_visible {
        return None;
    }
    let style = scene.style(id)?;
    let sb = style.stack.scrollbar_size;
    let w = node.relative.width();
    let h = node.relative.height();
    let track = Rect::new(w - sb, 0.0, w, h);

    let reserved = if stack.hscroll_visible { sb } else { 0.0 };
    // Near-zero content would blow up the ratio; clamp the divisor.
    let content = stack.content.height.max(1e-6);
    let extent = ((h * (h - reserved)) / content).clamp(MIN_HANDLE_EXTENT.min(h), h);
    let total = stack.total.height.max(1e-6);
    let offset = ((h / total) * node.scroll_offset.y).clamp(0.0, h - extent);
    let handle = Rect::new(track.x0, offset, track.x1, offset + extent);
    Some((track, handle))
}

/// Track and handle rects for a visible horizontal scrollbar, in the
/// stack's local coordinates. `None` while the bar is hidden.
#[must_use]
pub fn h_scrollbar_rects(scene: &Scene, id: NodeId) -> Option<(Rect, Rect)> {
    let node = scene.get(id)?;
    let stack = node.stack.as_ref()?;
    if !stack.hscroll_visible {
        return None;
    }
    let style = scene.style(id)?;
    let sb = style.stack.scrollbar_size;
    let w = node.relative.width();
    let h = node.relative.height();
    // The vertical bar owns the corner when both are visible.
    let reserved = if stack.vscroll_visible { sb } else { 0.0 };
    let track = Rect::new(0.0, h - sb, w - reserved, h);

    let content = stack.content.width.max(1e-6);
    let span = track.width();
    let extent = ((span * (span - reserved)) / content).clamp(MIN_HANDLE_EXTENT.min(span), span);
    let total = stack.total.width.max(1e-6);
    let offset = ((span / total) * node.scroll_offset.x).clamp(0.0, span - extent);
    let handle = Rect::new(offset, track.y0, offset + extent, track.y1);
    Some((track, handle))
}
