// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node data and the construction spec.

use hashbrown::HashMap;
use kurbo::{Rect, Size, Vec2};
use smallvec::SmallVec;

use bracken_style::{StyleGroup, StyleState};

use crate::anchor::AnchorSpec;
use crate::status::Status;
use crate::types::{Axis, NodeFlags, NodeId, ResizeEdge, Role, z};

/// Per-stack layout state, present on stack containers only.
///
/// The metric fields are outputs of the box-layout pass; `bracken_layout`
/// writes them through [`crate::Scene::stack_mut`].
#[derive(Clone, Debug)]
pub struct StackState {
    /// Main-axis direction.
    pub axis: Axis,
    /// Measured content extents, padding included.
    pub content: Size,
    /// Content plus reserved scrollbar space; the scroll range bound.
    pub total: Size,
    /// Vertical scrollbar currently shown.
    pub vscroll_visible: bool,
    /// Horizontal scrollbar currently shown.
    pub hscroll_visible: bool,
}

impl StackState {
    pub(crate) fn new(axis: Axis) -> Self {
        Self {
            axis,
            content: Size::ZERO,
            total: Size::ZERO,
            vscroll_visible: false,
            hscroll_visible: false,
        }
    }
}

/// A position within wrapped text: character within line, line, absolute
/// character index over all lines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TextIndex {
    /// Character index within the line.
    pub char_i: usize,
    /// Wrapped-line index.
    pub line_i: usize,
    /// Character index over the joined lines.
    pub abs_i: usize,
}

/// Text facet content and selection state.
#[derive(Clone, Debug, Default)]
pub struct TextContent {
    /// The unwrapped text.
    pub text: String,
    /// Pointer selection is permitted.
    pub selectable: bool,
    /// Caret position as an absolute character index.
    pub cursor: usize,
    /// Selection anchor, set on press.
    pub selection_start: Option<TextIndex>,
    /// Moving selection end point, tracked while the button is held.
    pub selection_end: Option<TextIndex>,
    /// Node-local rectangles spanning the current selection.
    pub selection_rects: Vec<Rect>,
    /// Node-local rect of the laid-out text block, written by the render
    /// pass and consumed by selection hit testing.
    pub text_rect: Rect,
}

/// One entry in the scene tree.
///
/// Fields are read-only outside this crate ([`crate::Scene::get`] hands out
/// shared references); every mutation goes through a `Scene` method so that
/// dependent caches, dirty flags, layout queues, and anchors stay coherent.
#[derive(Debug)]
pub struct Node {
    pub(crate) generation: u32,
    /// Parent id; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Children in insertion order. Order is meaningful: it is the stack
    /// layout order and the z tie-break for painting.
    pub children: Vec<NodeId>,
    /// Identifier used by element-id style rules and events.
    pub element_id: String,
    /// Semicolon-joined style-id token string.
    pub style_id: String,
    /// Type tags used by element-type style rules, in declaration order.
    pub element_types: Vec<String>,
    /// Widget, resizer, or ghost.
    pub role: Role,
    /// Paint/hit-test priority. Higher paints later and hits first.
    pub z_index: i32,
    /// Configuration flags.
    pub flags: NodeFlags,
    /// Dynamic interaction status.
    pub status: Status,
    /// Rect relative to the parent's top-left, unscrolled.
    pub relative: Rect,
    /// Rect in root space, scroll and render offsets applied.
    pub absolute: Rect,
    /// Scroll offset applied to children (always zero on non-stacks).
    pub scroll_offset: Vec2,
    /// Extra offset applied when compositing onto the parent.
    pub render_offset: Vec2,
    /// Resolved style snapshots.
    pub style_group: StyleGroup,
    /// Which snapshot is currently selected by the node's status.
    pub style_state: StyleState,
    /// The six anchor slots, indexed by [`crate::AnchorSlot::idx`].
    pub anchors: [Option<AnchorSpec>; 6],
    /// Nodes anchored onto this one; back-references for re-application.
    pub anchor_observers: SmallVec<[NodeId; 4]>,
    /// Stack layout state, for stack containers.
    pub stack: Option<StackState>,
    pub(crate) needs_layout: bool,
    pub(crate) batch_depth: u32,
    /// Invisible drag proxy, if configured.
    pub ghost: Option<NodeId>,
    /// Offset kept between the node center and the ghost center.
    pub ghost_offset: Vec2,
    /// Tooltip node shown by the host while this node is hovered.
    pub tooltip: Option<NodeId>,
    /// Active resize handles.
    pub resize_edges: SmallVec<[ResizeEdge; 8]>,
    /// Spawned handle sub-nodes, one per active edge.
    pub resizer_nodes: SmallVec<[(ResizeEdge, NodeId); 8]>,
    /// Handle thickness.
    pub resizers_size: f64,
    /// Lower resize bound.
    pub resize_min: Option<Size>,
    /// Upper resize bound.
    pub resize_max: Option<Size>,
    /// Text facet content.
    pub text: TextContent,
    /// Free-form host attributes.
    pub attrs: HashMap<String, String>,
}

impl Node {
    pub(crate) fn new(generation: u32, spec: NodeSpec) -> Self {
        let relative = spec.rect;
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element_id: spec.element_id,
            style_id: spec.style_id,
            element_types: spec.element_types,
            role: spec.role,
            z_index: spec.z_index,
            flags: spec.flags,
            status: Status::default(),
            relative,
            absolute: relative,
            scroll_offset: Vec2::ZERO,
            render_offset: Vec2::ZERO,
            style_group: StyleGroup::default(),
            style_state: StyleState::Normal,
            anchors: [None; 6],
            anchor_observers: SmallVec::new(),
            stack: spec.stack.map(StackState::new),
            needs_layout: false,
            batch_depth: 0,
            ghost: None,
            ghost_offset: Vec2::ZERO,
            tooltip: None,
            resize_edges: SmallVec::new(),
            resizer_nodes: SmallVec::new(),
            resizers_size: 5.0,
            resize_min: Some(Size::new(20.0, 20.0)),
            resize_max: None,
            text: TextContent::default(),
            attrs: HashMap::new(),
        }
    }

    /// The node rect in its own coordinate space: origin at zero.
    #[must_use]
    pub fn static_rect(&self) -> Rect {
        Rect::from_origin_size(kurbo::Point::ZERO, self.relative.size())
    }

    /// Convenience for [`NodeFlags::IGNORE_STACK`].
    #[must_use]
    pub fn ignores_stack(&self) -> bool {
        self.flags.contains(NodeFlags::IGNORE_STACK)
    }

    /// Convenience for [`NodeFlags::IGNORE_SCROLL`].
    #[must_use]
    pub fn ignores_scroll(&self) -> bool {
        self.flags.contains(NodeFlags::IGNORE_SCROLL)
    }

    /// Convenience for [`NodeFlags::IGNORE_RAYCAST`].
    #[must_use]
    pub fn ignores_raycast(&self) -> bool {
        self.flags.contains(NodeFlags::IGNORE_RAYCAST)
    }

    /// Whether this node is a stack container.
    #[must_use]
    pub fn is_stack(&self) -> bool {
        self.stack.is_some()
    }
}

/// Construction parameters for [`crate::Scene::spawn`].
///
/// Starts from sensible defaults; chain the builder methods to adjust.
#[derive(Clone, Debug)]
pub struct NodeSpec {
    /// Starting rect relative to the parent.
    pub rect: Rect,
    /// Identifier for element-id style rules.
    pub element_id: String,
    /// Semicolon-joined style-id token string.
    pub style_id: String,
    /// Type tags for element-type style rules.
    pub element_types: Vec<String>,
    /// Paint/hit-test priority.
    pub z_index: i32,
    /// Node role.
    pub role: Role,
    /// Make the node a stack container with this direction.
    pub stack: Option<Axis>,
    /// Configuration flags.
    pub flags: NodeFlags,
}

impl NodeSpec {
    /// A plain widget node with the given relative rect.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            element_id: String::from("none"),
            style_id: String::new(),
            element_types: vec![String::from("element")],
            z_index: z::ELEMENT,
            role: Role::Widget,
            stack: None,
            flags: NodeFlags::default(),
        }
    }

    /// A stack container; adds the stack type tags the cascade matches on.
    #[must_use]
    pub fn stack(rect: Rect, axis: Axis) -> Self {
        let dir = match axis {
            Axis::Vertical => "vstack",
            Axis::Horizontal => "hstack",
        };
        let mut spec = Self::new(rect);
        spec.element_types = vec![
            String::from("element"),
            String::from("stack"),
            String::from(dir),
        ];
        spec.stack = Some(axis);
        spec
    }

    /// Set the element id.
    #[must_use]
    pub fn element_id(mut self, id: impl Into<String>) -> Self {
        self.element_id = id.into();
        self
    }

    /// Set the style-id token string.
    #[must_use]
    pub fn style_id(mut self, id: impl Into<String>) -> Self {
        self.style_id = id.into();
        self
    }

    /// Replace the type tags.
    #[must_use]
    pub fn element_types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.element_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the z-index.
    #[must_use]
    pub fn z_index(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    /// Set the role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set configuration flags.
    #[must_use]
    pub fn flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }
}
