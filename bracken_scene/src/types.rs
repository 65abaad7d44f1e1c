// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene tree: node identifiers, flags, roles.

/// Identifier for a node in the scene (generational).
///
/// A `NodeId` stays valid until its node is destroyed; after that every
/// operation taking the id either no-ops (mutators) or returns `None`
/// (queries). Ids are never reused with the same generation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node configuration flags.
    ///
    /// These are configuration, not status: dynamic interaction state
    /// (hovered, pressed, …) lives in [`crate::Status`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// Skipped by the parent's stack layout pass.
        const IGNORE_STACK   = 0b0000_0001;
        /// Positioned against the root's scroll offset instead of the
        /// parent's.
        const IGNORE_SCROLL  = 0b0000_0010;
        /// Skipped by hit testing.
        const IGNORE_RAYCAST = 0b0000_0100;
        /// `destroy` without `force` is honored.
        const CAN_DESTROY    = 0b0000_1000;
        /// Click toggles the selected status.
        const CAN_SELECT     = 0b0001_0000;
        /// Pressing and moving the pointer drags the node.
        const CAN_DRAG       = 0b0010_0000;
        /// Eligible as a keyboard-navigation target.
        const CAN_NAVIGATE   = 0b0100_0000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::CAN_DESTROY
    }
}

/// Layout direction of a stack container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Children are laid out top to bottom.
    Vertical,
    /// Children are laid out left to right.
    Horizontal,
}

/// Edge or corner a resize handle is attached to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl ResizeEdge {
    /// Dragging this handle moves the left edge.
    #[must_use]
    pub const fn touches_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    /// Dragging this handle moves the right edge.
    #[must_use]
    pub const fn touches_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    /// Dragging this handle moves the top edge.
    #[must_use]
    pub const fn touches_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    /// Dragging this handle moves the bottom edge.
    #[must_use]
    pub const fn touches_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// True for the four corner handles.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }
}

/// What kind of node this is.
///
/// Built-in sub-nodes (resize handles, drag ghosts) are ordinary nodes
/// distinguished by their role; widget specialization composes callbacks
/// onto [`Role::Widget`] nodes instead of subclassing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// A regular, host-created node.
    Widget,
    /// A resize handle owned by its parent node.
    Resizer(ResizeEdge),
    /// An invisible drag proxy its owner re-centers onto.
    Ghost,
}

/// Default z-index bands per node role. Paint order is ascending, hit-test
/// order descending, so later bands sit on top of earlier ones.
pub mod z {
    /// Ordinary widgets.
    pub const ELEMENT: i32 = 0;
    /// Scrollbar affordances painted by the host.
    pub const SCROLLBAR: i32 = 100;
    /// Resize handles.
    pub const RESIZER: i32 = 200;
    /// Drag ghosts.
    pub const GHOST: i32 = 300;
    /// Tooltips.
    pub const TOOLTIP: i32 = 400;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_allow_destroy_only() {
        let flags = NodeFlags::default();
        assert!(flags.contains(NodeFlags::CAN_DESTROY));
        assert!(!flags.contains(NodeFlags::IGNORE_STACK));
        assert!(!flags.contains(NodeFlags::CAN_DRAG));
    }

    #[test]
    fn corner_edges_touch_both_axes() {
        assert!(ResizeEdge::TopLeft.touches_left());
        assert!(ResizeEdge::TopLeft.touches_top());
        assert!(!ResizeEdge::TopLeft.touches_right());
        assert!(ResizeEdge::BottomRight.is_corner());
        assert!(!ResizeEdge::Left.is_corner());
    }
}
