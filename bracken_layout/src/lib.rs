// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Layout: the box-layout ("stack") engine.
//!
//! A stack container positions its visible, non-stack-ignoring children
//! along one axis. Each pass measures content (child extents plus spacing
//! plus padding), optionally grows or shrinks the container to content,
//! distributes leftover space among fill children, reserves scrollbar
//! space, and finally positions children honoring the container's content
//! anchor and each child's cross-axis alignment. The algorithm is
//! symmetric under axis swap; one implementation serves both directions.
//!
//! Layout never runs eagerly. Scene mutations queue affected stacks on the
//! scene's pending-layout queue; [`flush`] drains that queue to a fixed
//! point once per frame (and hosts may call it after bulk construction).
//! Batch-mutation scopes on the scene defer queueing entirely, so bulk
//! child insertion costs one pass instead of one per insertion.
//!
//! Scrollbars are layout state, not widgets: the pass computes visibility
//! and reservation, stores them on the node's
//! [`StackState`](bracken_scene::StackState), and [`scrollbar`] derives
//! track/handle rects for hosts that want to paint them.

mod scrollbar;
mod stack;

pub use scrollbar::{h_scrollbar_rects, v_scrollbar_rects, MIN_HANDLE_EXTENT};
pub use stack::refresh;

use bracken_scene::Scene;
use tracing::trace;

/// Upper bound on queue-drain iterations per flush. Layout converges in a
/// handful of passes; the bound only guards against pathological
/// grow/shrink oscillation in host styles.
const MAX_PASSES: usize = 32;

/// Drain the scene's pending-layout queue to a fixed point.
///
/// Runs [`refresh`] for every queued stack; refreshes may queue further
/// stacks (resized children that are themselves stacks, parents of grown
/// containers), so the drain loops until the queue stays empty.
pub fn flush(scene: &mut Scene) {
    for _ in 0..MAX_PASSES {
        let queue = scene.take_layout_queue();
        if queue.is_empty() {
            return;
        }
        trace!(stacks = queue.len(), "layout pass");
        for id in queue {
            refresh(scene, id);
        }
    }
    tracing::warn!("layout did not settle; check grow/shrink style combinations");
}
