// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: arena storage, node lifecycle, and mutation operations.

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::VecDeque;
use tracing::debug;

use bracken_style::{StyleGroup, StyleQuery, StyleState, Stylesheet};

use crate::error::{Error, Result};
use crate::event::{Event, EventKind, NodeCallback};
use crate::node::{Node, NodeSpec, StackState, TextContent};
use crate::status::Status;
use crate::types::{NodeFlags, NodeId, ResizeEdge, Role, z};

/// Options for [`Scene::set_size_with`].
///
/// The defaults match the plain [`Scene::set_size`]: re-run the parent's
/// stack pass, keep anchors applied, and refresh the node's own stack.
/// The layout engine and the anchor resolver pass non-default
/// combinations as recursion guards.
#[derive(Copy, Clone, Debug)]
pub struct SizeUpdate {
    /// Re-run the parent's stack pass afterwards.
    pub propagate_up: bool,
    /// Re-apply this node's own anchors afterwards (observers always
    /// re-apply theirs).
    pub apply_anchors: bool,
    /// Re-run this node's own stack pass afterwards, if it is a stack.
    pub refresh_self: bool,
}

impl Default for SizeUpdate {
    fn default() -> Self {
        Self {
            propagate_up: true,
            apply_anchors: true,
            refresh_self: true,
        }
    }
}

/// The scene tree and node registry.
///
/// Nodes live in a generational slot arena: a [`NodeId`] is an index plus a
/// generation, mutators silently no-op on stale ids, and queries return
/// `None`. The scene also owns the event queue, the named-callback
/// registry, and the pending-layout queue drained by `bracken_layout`.
pub struct Scene {
    nodes: Vec<Option<Node>>,
    /// Last generation per slot (persists across frees).
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    layout_queue: Vec<NodeId>,
    events: VecDeque<Event>,
    callbacks: HashMap<NodeId, HashMap<String, NodeCallback>>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("pending_layout", &self.layout_queue.len())
            .field("queued_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create a scene with a root node of the given size.
    ///
    /// The root is indestructible, carries no style, and is the implicit
    /// parent for top-level nodes.
    #[must_use]
    pub fn new(size: Size) -> Self {
        let mut spec = NodeSpec::new(Rect::from_origin_size(Point::ZERO, size));
        spec.element_id = String::from("root");
        spec.element_types = vec![String::from("root")];
        spec.flags = NodeFlags::empty();
        let mut root_node = Node::new(1, spec);
        root_node.status.dirty = true;
        Self {
            nodes: vec![Some(root_node)],
            generations: vec![1],
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            layout_queue: Vec::new(),
            events: VecDeque::new(),
            callbacks: HashMap::new(),
        }
    }

    /// The root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` refers to the root.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root
    }

    /// Returns true if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Shared access to a live node's data.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !self.is_alive(id) {
            return None;
        }
        self.nodes.get(id.idx()).and_then(|n| n.as_ref())
    }

    /// Access a node; panics if `id` is stale. Callers check liveness.
    pub(crate) fn node_ref(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut_ref(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    /// The children of a node, or an empty slice for stale ids.
    #[must_use]
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The parent of a live node; `None` for the root or stale ids.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// The node's absolute (root-space) rect.
    #[must_use]
    pub fn absolute_rect(&self, id: NodeId) -> Option<Rect> {
        self.get(id).map(|n| n.absolute)
    }

    /// The node's rect relative to its parent.
    #[must_use]
    pub fn relative_rect(&self, id: NodeId) -> Option<Rect> {
        self.get(id).map(|n| n.relative)
    }

    /// The node's status.
    #[must_use]
    pub fn status(&self, id: NodeId) -> Option<&Status> {
        self.get(id).map(|n| &n.status)
    }

    /// Mutable status access for the interaction state machine.
    pub fn status_mut(&mut self, id: NodeId) -> Option<&mut Status> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&mut self.node_mut_ref(id).status)
    }

    /// The currently selected style snapshot of a live node.
    #[must_use]
    pub fn style(&self, id: NodeId) -> Option<&bracken_style::Style> {
        self.get(id).map(|n| n.style_group.select(n.style_state))
    }

    /// Stack state of a live stack node.
    #[must_use]
    pub fn stack(&self, id: NodeId) -> Option<&StackState> {
        self.get(id).and_then(|n| n.stack.as_ref())
    }

    /// Mutable stack state; used by the layout pass to publish metrics.
    pub fn stack_mut(&mut self, id: NodeId) -> Option<&mut StackState> {
        if !self.is_alive(id) {
            return None;
        }
        self.node_mut_ref(id).stack.as_mut()
    }

    /// Text content of a live node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&TextContent> {
        self.get(id).map(|n| &n.text)
    }

    /// Mutable text content; used by text-selection tracking.
    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut TextContent> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&mut self.node_mut_ref(id).text)
    }

    // --- lifecycle ---

    /// Create a node under `parent`.
    ///
    /// Registers the node, computes its initial absolute rect, resolves its
    /// style group from `sheet`, and schedules the parent's stack pass. A
    /// stale parent is a configuration error.
    pub fn spawn(&mut self, parent: NodeId, spec: NodeSpec, sheet: &Stylesheet) -> Result<NodeId> {
        if !self.is_alive(parent) {
            return Err(Error::DeadParent(parent));
        }
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, spec));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, spec)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);

        self.node_mut_ref(id).parent = Some(parent);
        self.node_mut_ref(parent).children.push(id);
        self.resolve_style_group(id, sheet);
        self.update_absolute_pos(id);
        self.mark_needs_layout(id);
        self.mark_parent_layout(id);
        self.set_dirty(id);
        debug!(element_id = %self.node_ref(id).element_id, "node spawned");
        Ok(id)
    }

    /// Destroy a node and its whole subtree.
    ///
    /// Honors the node's `CAN_DESTROY` flag unless `force` is set. Fires
    /// the destroy transition, detaches the node from every anchor
    /// relationship on both ends, destroys its ghost, unlinks it from its
    /// parent, force-destroys its children, and removes it from the
    /// registries (callbacks included).
    pub fn destroy(&mut self, id: NodeId, force: bool) {
        if !self.is_alive(id) || self.is_root(id) {
            return;
        }
        if !self.node_ref(id).flags.contains(NodeFlags::CAN_DESTROY) && !force {
            return;
        }
        self.emit(id, EventKind::Destroy);
        if !self.is_alive(id) {
            // A destroy callback may have re-entrantly destroyed us.
            return;
        }

        let observers: Vec<NodeId> = self.node_ref(id).anchor_observers.to_vec();
        for obs in observers {
            self.drop_anchors_to(obs, id);
        }
        self.remove_anchors(id, &[]);
        if let Some(ghost) = self.node_ref(id).ghost {
            self.destroy(ghost, true);
        }
        self.unlink_from_parent(id);
        let children = self.node_ref(id).children.clone();
        for child in children {
            self.destroy(child, true);
        }
        self.callbacks.remove(&id);
        debug!(element_id = %self.node_ref(id).element_id, "node destroyed");
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Destroy all destroyable children of `id`.
    pub fn destroy_children(&mut self, id: NodeId) {
        for child in self.children_of(id).to_vec() {
            self.destroy(child, false);
        }
        self.mark_needs_layout(id);
        self.set_dirty(id);
    }

    /// Move `id` under a new parent; `None` moves it under the root.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if !self.is_alive(id) || self.is_root(id) {
            return;
        }
        let parent = parent.unwrap_or(self.root);
        if !self.is_alive(parent) || self.node_ref(id).parent == Some(parent) {
            return;
        }
        self.unlink_from_parent(id);
        self.node_mut_ref(id).parent = Some(parent);
        self.node_mut_ref(parent).children.push(id);
        self.mark_parent_layout(id);
        self.update_absolute_pos(id);
    }

    /// Replace `id`'s children with `children`, reparenting newcomers and
    /// detaching (or destroying, with `destroy_old`) the rest.
    pub fn set_children(&mut self, id: NodeId, children: &[NodeId], destroy_old: bool) {
        if !self.is_alive(id) {
            return;
        }
        for child in self.children_of(id).to_vec() {
            if !children.contains(&child) {
                if destroy_old {
                    self.destroy(child, false);
                } else {
                    self.set_parent(child, None);
                }
            }
        }
        for &child in children {
            self.set_parent(child, Some(id));
        }
    }

    /// Detach the listed children without destroying them; they move
    /// under the root.
    pub fn remove_children(&mut self, id: NodeId, children: &[NodeId]) {
        for &child in children {
            if self.parent_of(child) == Some(id) {
                self.set_parent(child, None);
            }
        }
    }

    /// Move `id` by `places` within its parent's child list, clamped.
    pub fn move_in_parent(&mut self, id: NodeId, places: isize) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        let siblings = &self.node_ref(parent).children;
        if siblings.len() <= 1 {
            return;
        }
        let old = siblings.iter().position(|&c| c == id).expect("child in parent");
        #[allow(
            clippy::cast_possible_wrap,
            reason = "child counts are far below isize::MAX"
        )]
        let new = (old as isize + places).clamp(0, siblings.len() as isize - 1) as usize;
        let children = &mut self.node_mut_ref(parent).children;
        children.remove(old);
        children.insert(new, id);
        self.mark_needs_layout(parent);
        self.set_dirty(parent);
    }

    /// Place `id` at `index` within its parent's child list, clamped.
    pub fn set_index_in_parent(&mut self, id: NodeId, index: usize) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        let children = &mut self.node_mut_ref(parent).children;
        let Some(old) = children.iter().position(|&c| c == id) else {
            return;
        };
        children.remove(old);
        let index = index.min(children.len());
        children.insert(index, id);
        self.mark_needs_layout(parent);
        self.set_dirty(parent);
    }

    /// Children excluding engine-created sub-nodes (resizers, ghosts).
    #[must_use]
    pub fn user_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children_of(id)
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(|n| n.role == Role::Widget))
            .collect()
    }

    fn unlink_from_parent(&mut self, id: NodeId) {
        if let Some(parent) = self.node_ref(id).parent {
            let children = &mut self.node_mut_ref(parent).children;
            if let Some(pos) = children.iter().position(|&c| c == id) {
                children.remove(pos);
            }
            self.mark_needs_layout(parent);
            self.set_dirty(parent);
        }
    }

    // --- dirty and layout bookkeeping ---

    /// Mark `id` as needing a repaint; propagates monotonically upward.
    ///
    /// Re-marking an already dirty node is a no-op, which both bounds the
    /// walk and makes propagation idempotent.
    pub fn set_dirty(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if self.node_ref(id).status.dirty {
            return;
        }
        self.node_mut_ref(id).status.dirty = true;
        if let Some(parent) = self.node_ref(id).parent {
            self.set_dirty(parent);
        }
    }

    /// Clear the repaint mark after painting. Does not propagate.
    pub fn clear_dirty(&mut self, id: NodeId) {
        if self.is_alive(id) {
            self.node_mut_ref(id).status.dirty = false;
        }
    }

    /// Queue a stack node for a layout pass. No-op for non-stacks, nodes
    /// inside an open batch scope, and already queued nodes.
    pub fn mark_needs_layout(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        let node = self.node_mut_ref(id);
        if node.stack.is_none() || node.batch_depth > 0 || node.needs_layout {
            return;
        }
        node.needs_layout = true;
        self.layout_queue.push(id);
    }

    /// Queue the parent's stack pass, honoring the ignore-stack flag.
    pub fn mark_parent_layout(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.ignores_stack() {
            return;
        }
        if let Some(parent) = node.parent {
            self.mark_needs_layout(parent);
        }
    }

    /// Drain the pending-layout queue, clearing the queued flags.
    pub fn take_layout_queue(&mut self) -> Vec<NodeId> {
        let queue = std::mem::take(&mut self.layout_queue);
        for &id in &queue {
            if self.is_alive(id) {
                self.node_mut_ref(id).needs_layout = false;
            }
        }
        queue
    }

    /// Open a batch-mutation scope on a stack: layout passes are deferred
    /// until the scope closes. Scopes nest.
    pub fn begin_batch(&mut self, id: NodeId) {
        if self.is_alive(id) {
            self.node_mut_ref(id).batch_depth += 1;
        }
    }

    /// Whether the node is inside an open batch-mutation scope.
    #[must_use]
    pub fn in_batch(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.batch_depth > 0)
    }

    /// Close a batch scope; the deferred layout pass runs once.
    pub fn end_batch(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        let node = self.node_mut_ref(id);
        node.batch_depth = node.batch_depth.saturating_sub(1);
        if node.batch_depth == 0 {
            self.mark_needs_layout(id);
        }
    }

    // --- geometry ---

    /// Recompute `id`'s absolute rect from its parent chain, recursing
    /// into children.
    ///
    /// Position = parent absolute top-left + relative top-left − the
    /// applicable scroll offset (the root's for scroll-ignoring nodes,
    /// the parent's otherwise) + the node's render offset.
    pub(crate) fn update_absolute_pos(&mut self, id: NodeId) {
        let node = self.node_ref(id);
        let origin = match node.parent {
            Some(parent) => {
                let scroll = if node.ignores_scroll() {
                    self.node_ref(self.root).scroll_offset
                } else {
                    self.node_ref(parent).scroll_offset
                };
                let parent_tl = self.node_ref(parent).absolute.origin();
                parent_tl + node.relative.origin().to_vec2() - scroll + node.render_offset
            }
            None => node.relative.origin(),
        };
        let size = self.node_ref(id).relative.size();
        self.node_mut_ref(id).absolute = Rect::from_origin_size(origin, size);
        for child in self.node_ref(id).children.clone() {
            self.update_absolute_pos(child);
        }
        self.set_dirty(id);
    }

    /// Set the position relative to the parent.
    pub fn set_relative_pos(&mut self, id: NodeId, pos: Point) {
        if !self.is_alive(id) {
            return;
        }
        if self.node_ref(id).relative.origin() == pos {
            return;
        }
        let size = self.node_ref(id).relative.size();
        self.node_mut_ref(id).relative = Rect::from_origin_size(pos, size);
        self.update_absolute_pos(id);
        self.emit(id, EventKind::PositionChange);
        self.apply_observer_anchors(id);
        self.apply_anchors(id);
    }

    /// Set the absolute (root-space) position.
    pub fn set_absolute_pos(&mut self, id: NodeId, pos: Point) {
        self.set_absolute_pos_with(id, pos, true);
    }

    pub(crate) fn set_absolute_pos_with(&mut self, id: NodeId, pos: Point, apply_anchors: bool) {
        if !self.is_alive(id) {
            return;
        }
        let node = self.node_ref(id);
        let rel = match node.parent {
            Some(parent) => {
                let scroll = if node.ignores_scroll() {
                    self.node_ref(self.root).scroll_offset
                } else {
                    self.node_ref(parent).scroll_offset
                };
                let parent_tl = self.node_ref(parent).absolute.origin();
                (pos - parent_tl) + scroll - node.render_offset
            }
            None => pos.to_vec2(),
        };
        let rel = rel.to_point();
        if self.node_ref(id).relative.origin() == rel {
            return;
        }
        let size = self.node_ref(id).relative.size();
        self.node_mut_ref(id).relative = Rect::from_origin_size(rel, size);
        self.update_absolute_pos(id);
        self.emit(id, EventKind::PositionChange);
        self.apply_observer_anchors(id);
        if apply_anchors {
            self.apply_anchors(id);
        }
    }

    /// Set the node size with the default [`SizeUpdate`].
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        self.set_size_with(id, size, SizeUpdate::default());
    }

    /// Set the node width, keeping the height.
    pub fn set_width(&mut self, id: NodeId, width: f64) {
        if let Some(rect) = self.relative_rect(id) {
            self.set_size(id, Size::new(width, rect.height()));
        }
    }

    /// Set the node height, keeping the width.
    pub fn set_height(&mut self, id: NodeId, height: f64) {
        if let Some(rect) = self.relative_rect(id) {
            self.set_size(id, Size::new(rect.width(), height));
        }
    }

    /// Set the node size with explicit update options.
    ///
    /// Degenerate sizes are clamped to one pixel per axis. An unchanged
    /// size returns without side effects.
    pub fn set_size_with(&mut self, id: NodeId, size: Size, update: SizeUpdate) {
        if !self.is_alive(id) {
            return;
        }
        let size = Size::new(size.width.max(1.0), size.height.max(1.0));
        if self.node_ref(id).relative.size() == size {
            return;
        }
        {
            let node = self.node_mut_ref(id);
            node.relative = Rect::from_origin_size(node.relative.origin(), size);
            node.absolute = Rect::from_origin_size(node.absolute.origin(), size);
        }
        if update.propagate_up {
            self.mark_parent_layout(id);
        }
        self.emit(id, EventKind::SizeChange);
        self.emit(id, EventKind::Build);
        self.update_resizers_size(id);
        self.apply_observer_anchors(id);
        if update.apply_anchors {
            self.apply_anchors(id);
        }
        if update.refresh_self {
            self.mark_needs_layout(id);
        }
        self.set_dirty(id);
    }

    /// Set the compositing offset applied when painting onto the parent.
    pub fn set_render_offset(&mut self, id: NodeId, offset: Vec2) {
        if !self.is_alive(id) || self.node_ref(id).render_offset == offset {
            return;
        }
        self.node_mut_ref(id).render_offset = offset;
        self.update_absolute_pos(id);
    }

    /// Set a stack's scroll offset, clamped to `[0, total]` per axis.
    ///
    /// Descendant absolute rects update immediately. Scrollbar visibility
    /// is re-evaluated by the next layout pass.
    pub fn set_scroll(&mut self, id: NodeId, offset: Vec2) {
        let Some(stack) = self.stack(id) else {
            return;
        };
        let total = stack.total;
        let clamped = Vec2::new(
            offset.x.clamp(0.0, total.width.max(0.0)),
            offset.y.clamp(0.0, total.height.max(0.0)),
        );
        if self.node_ref(id).scroll_offset == clamped {
            return;
        }
        self.node_mut_ref(id).scroll_offset = clamped;
        for child in self.node_ref(id).children.clone() {
            self.update_absolute_pos(child);
        }
        self.emit(id, EventKind::Scroll);
        self.set_dirty(id);
    }

    /// Scroll to a fraction of the content size, each axis in `0..=1`.
    pub fn scroll_to(&mut self, id: NodeId, fraction: Vec2) {
        let Some(stack) = self.stack(id) else {
            return;
        };
        let content = stack.content;
        self.set_scroll(
            id,
            Vec2::new(content.width * fraction.x, content.height * fraction.y),
        );
    }

    // --- flags, status, identity ---

    /// Show the node and re-run the parent's stack pass.
    pub fn show(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.node_mut_ref(id).status.visible = true;
        self.mark_parent_layout(id);
        self.set_dirty(id);
    }

    /// Hide the node and re-run the parent's stack pass.
    pub fn hide(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.node_mut_ref(id).status.visible = false;
        self.mark_parent_layout(id);
        self.set_dirty(id);
    }

    /// Let the style respond to hover/press again.
    pub fn activate(&mut self, id: NodeId) {
        if let Some(status) = self.status_mut(id) {
            status.active = true;
        }
    }

    /// Pin the style to the normal snapshot regardless of status.
    pub fn deactivate(&mut self, id: NodeId) {
        if let Some(status) = self.status_mut(id) {
            status.active = false;
        }
    }

    /// Set the paint/hit-test priority.
    pub fn set_z_index(&mut self, id: NodeId, z_index: i32) {
        if !self.is_alive(id) || self.node_ref(id).z_index == z_index {
            return;
        }
        self.node_mut_ref(id).z_index = z_index;
        self.set_dirty(id);
    }

    /// Replace the configuration flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if !self.is_alive(id) || self.node_ref(id).flags == flags {
            return;
        }
        self.node_mut_ref(id).flags = flags;
        self.set_dirty(id);
    }

    /// Insert flags on top of the current set.
    pub fn add_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(node) = self.get(id) {
            let merged = node.flags | flags;
            self.set_flags(id, merged);
        }
    }

    /// Remove flags from the current set.
    pub fn remove_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(node) = self.get(id) {
            let reduced = node.flags - flags;
            self.set_flags(id, reduced);
        }
    }

    /// Set a free-form host attribute.
    pub fn set_attr(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        if self.is_alive(id) {
            self.node_mut_ref(id).attrs.insert(key.into(), value.into());
        }
    }

    /// Read a free-form host attribute.
    #[must_use]
    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get(id).and_then(|n| n.attrs.get(key)).map(String::as_str)
    }

    // --- style ---

    fn resolve_style_group(&mut self, id: NodeId, sheet: &Stylesheet) {
        let group = {
            let node = self.node_ref(id);
            sheet.resolve_group(StyleQuery {
                element_types: &node.element_types,
                style_id: &node.style_id,
                element_id: &node.element_id,
            })
        };
        self.node_mut_ref(id).style_group = group;
    }

    /// Replace the resolved style group directly.
    pub fn set_style_group(&mut self, id: NodeId, group: StyleGroup) {
        if !self.is_alive(id) {
            return;
        }
        self.node_mut_ref(id).style_group = group;
        self.style_updated(id);
    }

    /// Set the style-id token string and re-resolve the style group.
    pub fn set_style_id(&mut self, id: NodeId, style_id: impl Into<String>, sheet: &Stylesheet) {
        if !self.is_alive(id) {
            return;
        }
        self.node_mut_ref(id).style_id = style_id.into();
        self.resolve_style_group(id, sheet);
        self.style_updated(id);
    }

    /// Set the element id and re-resolve the style group.
    pub fn set_element_id(&mut self, id: NodeId, element_id: impl Into<String>, sheet: &Stylesheet) {
        if !self.is_alive(id) {
            return;
        }
        self.node_mut_ref(id).element_id = element_id.into();
        self.resolve_style_group(id, sheet);
        self.style_updated(id);
    }

    /// Replace the type tags and re-resolve the style group.
    pub fn set_element_types(
        &mut self,
        id: NodeId,
        types: impl IntoIterator<Item = impl Into<String>>,
        sheet: &Stylesheet,
    ) {
        if !self.is_alive(id) {
            return;
        }
        self.node_mut_ref(id).element_types = types.into_iter().map(Into::into).collect();
        self.resolve_style_group(id, sheet);
        self.style_updated(id);
    }

    /// Append one type tag and re-resolve the style group.
    pub fn add_element_type(&mut self, id: NodeId, tag: impl Into<String>, sheet: &Stylesheet) {
        if !self.is_alive(id) {
            return;
        }
        self.node_mut_ref(id).element_types.push(tag.into());
        self.resolve_style_group(id, sheet);
        self.style_updated(id);
    }

    /// Select which snapshot of the style group is active.
    ///
    /// Called by the per-frame logic pass when the node's status changes
    /// the applicable state; a no-op when the state is unchanged.
    pub fn set_style_state(&mut self, id: NodeId, state: StyleState) {
        if !self.is_alive(id) || self.node_ref(id).style_state == state {
            return;
        }
        self.node_mut_ref(id).style_state = state;
        self.style_updated(id);
    }

    /// The style state the node's current status selects.
    #[must_use]
    pub fn desired_style_state(&self, id: NodeId) -> StyleState {
        let Some(node) = self.get(id) else {
            return StyleState::Normal;
        };
        let status = &node.status;
        if !status.active {
            StyleState::Normal
        } else if status.pressed || status.selected {
            StyleState::Press
        } else if status.hovered {
            StyleState::Hover
        } else {
            StyleState::Normal
        }
    }

    /// Common tail of every style mutation: rebuild caches, notify, and
    /// re-run dependent passes.
    fn style_updated(&mut self, id: NodeId) {
        self.set_dirty(id);
        self.mark_needs_layout(id);
        self.mark_parent_layout(id);
        self.emit(id, EventKind::StyleChange);
        self.emit(id, EventKind::Build);
        self.update_resizers_size(id);
        self.apply_anchors(id);
    }

    // --- resizers, ghost, tooltip ---

    /// Install resize handles on the given edges.
    ///
    /// Existing handles for edges not listed are destroyed; new edges get
    /// a handle sub-node anchored to the matching parent edge(s). `min`
    /// and `max` bound interactive resizing.
    pub fn set_resizers(
        &mut self,
        id: NodeId,
        edges: &[ResizeEdge],
        size: f64,
        min: Option<Size>,
        max: Option<Size>,
        sheet: &Stylesheet,
    ) -> Result<()> {
        if !self.is_alive(id) {
            return Err(Error::DeadNode(id));
        }
        if self.is_root(id) {
            return Err(Error::AnchorToRoot);
        }
        {
            let node = self.node_mut_ref(id);
            node.resizers_size = size;
            node.resize_min = min;
            node.resize_max = max;
        }
        // Drop handles whose edge is no longer requested.
        let existing = self.node_ref(id).resizer_nodes.clone();
        for (edge, handle) in &existing {
            if !edges.contains(edge) {
                self.destroy(*handle, true);
            }
        }
        self.node_mut_ref(id)
            .resizer_nodes
            .retain(|(edge, _)| edges.contains(edge));

        for &edge in edges {
            if existing.iter().any(|(e, _)| *e == edge) {
                continue;
            }
            let owner_element_id = self.node_ref(id).element_id.clone();
            let owner_style_id = self.node_ref(id).style_id.clone();
            let spec = NodeSpec::new(Rect::new(0.0, 0.0, 1.0, 1.0))
                .element_id(format!("{owner_element_id}_resizer"))
                .style_id(owner_style_id)
                .element_types(["element", "resizer"])
                .z_index(z::RESIZER)
                .role(Role::Resizer(edge))
                .flags(NodeFlags::default() | NodeFlags::IGNORE_STACK | NodeFlags::IGNORE_SCROLL);
            let handle = self.spawn(id, spec, sheet)?;
            self.anchor_resizer(handle, edge)?;
            self.node_mut_ref(id).resizer_nodes.push((edge, handle));
        }
        self.node_mut_ref(id).resize_edges = edges.iter().copied().collect();
        self.update_resizers_size(id);
        Ok(())
    }

    /// Remove the handles for the listed edges.
    pub fn remove_resizers(&mut self, id: NodeId, edges: &[ResizeEdge]) {
        if !self.is_alive(id) {
            return;
        }
        let keep: Vec<ResizeEdge> = self
            .node_ref(id)
            .resize_edges
            .iter()
            .copied()
            .filter(|e| !edges.contains(e))
            .collect();
        let existing = self.node_ref(id).resizer_nodes.clone();
        for (edge, handle) in existing {
            if edges.contains(&edge) {
                self.destroy(handle, true);
            }
        }
        let node = self.node_mut_ref(id);
        node.resizer_nodes.retain(|(edge, _)| keep.contains(edge));
        node.resize_edges = keep.into_iter().collect();
    }

    fn anchor_resizer(&mut self, handle: NodeId, edge: ResizeEdge) -> Result<()> {
        use crate::anchor::{AnchorSlot, AnchorTarget};
        let mut pin = |slot: AnchorSlot| {
            self.set_anchor(handle, AnchorTarget::Parent, slot, slot, 0.0)
        };
        match edge {
            ResizeEdge::Left | ResizeEdge::Right => {
                pin(if edge == ResizeEdge::Left {
                    AnchorSlot::Left
                } else {
                    AnchorSlot::Right
                })?;
                pin(AnchorSlot::CenterY)?;
            }
            ResizeEdge::Top | ResizeEdge::Bottom => {
                pin(if edge == ResizeEdge::Top {
                    AnchorSlot::Top
                } else {
                    AnchorSlot::Bottom
                })?;
                pin(AnchorSlot::CenterX)?;
            }
            ResizeEdge::TopLeft => {
                pin(AnchorSlot::Top)?;
                pin(AnchorSlot::Left)?;
            }
            ResizeEdge::TopRight => {
                pin(AnchorSlot::Top)?;
                pin(AnchorSlot::Right)?;
            }
            ResizeEdge::BottomLeft => {
                pin(AnchorSlot::Bottom)?;
                pin(AnchorSlot::Left)?;
            }
            ResizeEdge::BottomRight => {
                pin(AnchorSlot::Bottom)?;
                pin(AnchorSlot::Right)?;
            }
        }
        Ok(())
    }

    /// Re-derive handle sizes from the owner rect and handle thickness.
    pub(crate) fn update_resizers_size(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.resizer_nodes.is_empty() {
            return;
        }
        let rect = node.relative;
        let thickness = node.resizers_size;
        let handles = node.resizer_nodes.clone();
        for (edge, handle) in handles {
            let size = match edge {
                ResizeEdge::Top | ResizeEdge::Bottom => {
                    Size::new(rect.width() - thickness * 2.0, thickness)
                }
                ResizeEdge::Left | ResizeEdge::Right => {
                    Size::new(thickness, rect.height() - thickness * 2.0)
                }
                _ => Size::new(thickness * 2.0, thickness * 2.0),
            };
            self.set_size(handle, size);
        }
    }

    /// Create (or replace) an invisible ghost the node re-centers onto
    /// every frame, and flag the node to be skipped by stack layout.
    pub fn set_ghost(&mut self, id: NodeId, rect: Rect, offset: Vec2, sheet: &Stylesheet) -> Result<NodeId> {
        if !self.is_alive(id) {
            return Err(Error::DeadNode(id));
        }
        if let Some(old) = self.node_ref(id).ghost {
            self.destroy(old, true);
        }
        self.add_flags(id, NodeFlags::IGNORE_STACK);
        let parent = self.node_ref(id).parent.unwrap_or(self.root);
        let element_id = format!("{}_ghost", self.node_ref(id).element_id);
        let spec = NodeSpec::new(rect)
            .element_id(element_id)
            .style_id("invisible")
            .element_types(["element", "ghost"])
            .z_index(z::GHOST)
            .role(Role::Ghost);
        let ghost = self.spawn(parent, spec, sheet)?;
        let node = self.node_mut_ref(id);
        node.ghost = Some(ghost);
        node.ghost_offset = offset;
        Ok(ghost)
    }

    /// Register a tooltip node shown by the host on hover. Forces the
    /// tooltip into the tooltip z band and hides it.
    pub fn set_tooltip(&mut self, id: NodeId, tooltip: NodeId) {
        if !self.is_alive(id) || !self.is_alive(tooltip) {
            return;
        }
        if self.node_ref(tooltip).z_index < z::TOOLTIP {
            self.set_z_index(tooltip, z::TOOLTIP);
        }
        self.hide(tooltip);
        self.node_mut_ref(id).tooltip = Some(tooltip);
    }

    // --- text ---

    /// Replace the node's text, resetting selection state.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if !self.is_alive(id) {
            return;
        }
        let node = self.node_mut_ref(id);
        node.text.text = text.into();
        node.text.selection_start = None;
        node.text.selection_end = None;
        node.text.selection_rects.clear();
        self.set_dirty(id);
        self.emit(id, EventKind::Build);
    }

    /// Allow or forbid pointer text selection.
    pub fn set_text_selectable(&mut self, id: NodeId, selectable: bool) {
        if self.is_alive(id) {
            self.node_mut_ref(id).text.selectable = selectable;
        }
    }

    /// Record the laid-out text block rect (node-local). Written by the
    /// render pass; consumed by selection hit testing.
    pub fn set_text_rect(&mut self, id: NodeId, rect: Rect) {
        if self.is_alive(id) {
            self.node_mut_ref(id).text.text_rect = rect;
        }
    }

    // --- navigation ---

    /// Whether the node is a valid keyboard-navigation target.
    #[must_use]
    pub fn can_navigate(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| n.flags.contains(NodeFlags::CAN_NAVIGATE) && n.status.visible)
    }

    /// Depth-first search for a navigable node in the subtree of `id`.
    #[must_use]
    pub fn find_navigable_child(&self, id: NodeId) -> Option<NodeId> {
        for &child in self.children_of(id) {
            if self.can_navigate(child) {
                return Some(child);
            }
            if let Some(found) = self.find_navigable_child(child) {
                return Some(found);
            }
        }
        None
    }

    // --- events and callbacks ---

    /// Push a tagged event and invoke the matching named callback.
    pub fn emit(&mut self, id: NodeId, kind: EventKind) {
        self.events.push_back(Event { node: id, kind });
        self.invoke(id, kind.callback_name());
    }

    /// Invoke the callback registered on `id` under `name`, if any.
    ///
    /// The callback is detached for the duration of the call, so it may
    /// mutate the scene freely (including emitting further events). It is
    /// not re-attached if the node died or re-registered during the call.
    pub fn invoke(&mut self, id: NodeId, name: &str) {
        let cb = self.callbacks.get_mut(&id).and_then(|m| m.remove(name));
        if let Some(mut cb) = cb {
            cb(self, id);
            if self.is_alive(id) {
                self.callbacks
                    .entry(id)
                    .or_default()
                    .entry(name.to_owned())
                    .or_insert(cb);
            }
        }
    }

    /// Register a named callback on a node. Names the engine fires are
    /// listed on [`EventKind`]; hosts may register and [`Scene::invoke`]
    /// additional names of their own.
    pub fn set_callback(&mut self, id: NodeId, name: impl Into<String>, cb: NodeCallback) {
        if self.is_alive(id) {
            self.callbacks.entry(id).or_default().insert(name.into(), cb);
        }
    }

    /// Remove a named callback.
    pub fn remove_callback(&mut self, id: NodeId, name: &str) {
        if let Some(map) = self.callbacks.get_mut(&id) {
            map.remove(name);
        }
    }

    /// Drain the queued events for the host.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    /// Whether the node should be painted: visible and intersecting its
    /// parent's rect.
    #[must_use]
    pub fn can_render(&self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        if !node.status.visible {
            return false;
        }
        match node.parent {
            Some(parent) => !node
                .absolute
                .intersect(self.node_ref(parent).absolute)
                .is_zero_area(),
            None => true,
        }
    }

    /// Children of `id` sorted by ascending z-index (paint order), stable
    /// in child-list order for ties.
    #[must_use]
    pub fn children_by_z(&self, id: NodeId) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = self.children_of(id).to_vec();
        children.sort_by_key(|&c| self.get(c).map(|n| n.z_index).unwrap_or(0));
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Axis;

    fn scene() -> (Scene, Stylesheet) {
        (Scene::new(Size::new(800.0, 600.0)), Stylesheet::new())
    }

    fn clear_all_dirty(s: &mut Scene, id: NodeId) {
        s.clear_dirty(id);
        for child in s.children_of(id).to_vec() {
            clear_all_dirty(s, child);
        }
    }

    #[test]
    fn spawn_links_parent_and_computes_absolute() {
        let (mut s, sheet) = scene();
        let a = s
            .spawn(s.root(), NodeSpec::new(Rect::new(10.0, 20.0, 110.0, 70.0)), &sheet)
            .unwrap();
        let b = s
            .spawn(a, NodeSpec::new(Rect::new(5.0, 5.0, 25.0, 25.0)), &sheet)
            .unwrap();
        assert_eq!(s.parent_of(b), Some(a));
        assert_eq!(s.children_of(a), &[b]);
        assert_eq!(s.absolute_rect(b).unwrap().origin(), Point::new(15.0, 25.0));
    }

    #[test]
    fn spawn_under_dead_parent_is_a_config_error() {
        let (mut s, sheet) = scene();
        let a = s
            .spawn(s.root(), NodeSpec::new(Rect::new(0.0, 0.0, 10.0, 10.0)), &sheet)
            .unwrap();
        s.destroy(a, false);
        let err = s
            .spawn(a, NodeSpec::new(Rect::new(0.0, 0.0, 10.0, 10.0)), &sheet)
            .unwrap_err();
        assert_eq!(err, Error::DeadParent(a));
    }

    #[test]
    fn destroy_is_recursive_and_cleans_registries() {
        let (mut s, sheet) = scene();
        let a = s
            .spawn(s.root(), NodeSpec::new(Rect::new(0.0, 0.0, 100.0, 100.0)), &sheet)
            .unwrap();
        let b = s
            .spawn(a, NodeSpec::new(Rect::new(0.0, 0.0, 10.0, 10.0)), &sheet)
            .unwrap();
        s.set_callback(b, "on_click", Box::new(|_, _| {}));
        s.destroy(a, false);
        assert!(!s.is_alive(a));
        assert!(!s.is_alive(b));
        assert!(s.children_of(s.root()).is_empty());
    }

    #[test]
    fn destroy_respects_can_destroy_unless_forced() {
        let (mut s, sheet) = scene();
        let a = s
            .spawn(
                s.root(),
                NodeSpec::new(Rect::new(0.0, 0.0, 10.0, 10.0)).flags(NodeFlags::empty()),
                &sheet,
            )
            .unwrap();
        s.destroy(a, false);
        assert!(s.is_alive(a));
        s.destroy(a, true);
        assert!(!s.is_alive(a));
    }

    #[test]
    fn dirty_propagates_to_every_ancestor() {
        let (mut s, sheet) = scene();
        let a = s
            .spawn(s.root(), NodeSpec::new(Rect::new(0.0, 0.0, 100.0, 100.0)), &sheet)
            .unwrap();
        let b = s
            .spawn(a, NodeSpec::new(Rect::new(0.0, 0.0, 50.0, 50.0)), &sheet)
            .unwrap();
        let c = s
            .spawn(b, NodeSpec::new(Rect::new(0.0, 0.0, 10.0, 10.0)), &sheet)
            .unwrap();
        let root = s.root();
        clear_all_dirty(&mut s, root);

        s.set_dirty(c);
        assert!(s.status(c).unwrap().dirty);
        assert!(s.status(b).unwrap().dirty);
        assert!(s.status(a).unwrap().dirty);
        assert!(s.status(root).unwrap().dirty);
    }

    #[test]
    fn moving_a_parent_moves_descendant_absolutes() {
        let (mut s, sheet) = scene();
        let a = s
            .spawn(s.root(), NodeSpec::new(Rect::new(0.0, 0.0, 100.0, 100.0)), &sheet)
            .unwrap();
        let b = s
            .spawn(a, NodeSpec::new(Rect::new(5.0, 5.0, 15.0, 15.0)), &sheet)
            .unwrap();
        s.set_relative_pos(a, Point::new(40.0, 0.0));
        assert_eq!(s.absolute_rect(b).unwrap().origin(), Point::new(45.0, 5.0));
    }

    #[test]
    fn set_size_clamps_degenerate_sizes() {
        let (mut s, sheet) = scene();
        let a = s
            .spawn(s.root(), NodeSpec::new(Rect::new(0.0, 0.0, 100.0, 100.0)), &sheet)
            .unwrap();
        s.set_size(a, Size::new(-5.0, 0.0));
        assert_eq!(s.relative_rect(a).unwrap().size(), Size::new(1.0, 1.0));
    }

    #[test]
    fn batch_scope_defers_layout_marking() {
        let (mut s, sheet) = scene();
        let stack = s
            .spawn(
                s.root(),
                NodeSpec::stack(Rect::new(0.0, 0.0, 200.0, 200.0), Axis::Vertical),
                &sheet,
            )
            .unwrap();
        s.take_layout_queue();

        s.begin_batch(stack);
        s.spawn(stack, NodeSpec::new(Rect::new(0.0, 0.0, 50.0, 20.0)), &sheet)
            .unwrap();
        s.spawn(stack, NodeSpec::new(Rect::new(0.0, 0.0, 50.0, 20.0)), &sheet)
            .unwrap();
        assert!(s.take_layout_queue().is_empty());
        s.end_batch(stack);
        assert_eq!(s.take_layout_queue(), vec![stack]);
    }

    #[test]
    fn callbacks_fire_on_emit_and_survive() {
        use std::cell::Cell;
        use std::rc::Rc;
        let (mut s, sheet) = scene();
        let a = s
            .spawn(s.root(), NodeSpec::new(Rect::new(0.0, 0.0, 10.0, 10.0)), &sheet)
            .unwrap();
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        s.set_callback(
            a,
            EventKind::Click.callback_name(),
            Box::new(move |_, _| hits2.set(hits2.get() + 1)),
        );
        s.emit(a, EventKind::Click);
        s.emit(a, EventKind::Click);
        assert_eq!(hits.get(), 2);
        let events: Vec<EventKind> = s.drain_events().into_iter().map(|e| e.kind).collect();
        assert!(events.contains(&EventKind::Click));
    }

    #[test]
    fn reorder_ops_clamp_and_reorder() {
        let (mut s, sheet) = scene();
        let root = s.root();
        let a = s
            .spawn(root, NodeSpec::new(Rect::new(0.0, 0.0, 10.0, 10.0)), &sheet)
            .unwrap();
        let b = s
            .spawn(root, NodeSpec::new(Rect::new(0.0, 0.0, 10.0, 10.0)), &sheet)
            .unwrap();
        let c = s
            .spawn(root, NodeSpec::new(Rect::new(0.0, 0.0, 10.0, 10.0)), &sheet)
            .unwrap();
        s.move_in_parent(a, 100);
        assert_eq!(s.children_of(root), &[b, c, a]);
        s.set_index_in_parent(a, 0);
        assert_eq!(s.children_of(root), &[a, b, c]);
    }

    #[test]
    fn resizers_spawn_one_handle_per_edge() {
        let (mut s, sheet) = scene();
        let a = s
            .spawn(s.root(), NodeSpec::new(Rect::new(0.0, 0.0, 100.0, 100.0)), &sheet)
            .unwrap();
        s.set_resizers(
            a,
            &[ResizeEdge::Right, ResizeEdge::BottomRight],
            5.0,
            Some(Size::new(20.0, 20.0)),
            None,
            &sheet,
        )
        .unwrap();
        assert_eq!(s.node_ref(a).resizer_nodes.len(), 2);
        let (_, handle) = s.node_ref(a).resizer_nodes[0];
        assert_eq!(s.get(handle).unwrap().role, Role::Resizer(ResizeEdge::Right));
        // Edge handle spans the owner height minus the corner notches.
        assert_eq!(
            s.relative_rect(handle).unwrap().size(),
            Size::new(5.0, 90.0)
        );

        s.remove_resizers(a, &[ResizeEdge::Right]);
        assert_eq!(s.node_ref(a).resizer_nodes.len(), 1);
    }

    #[test]
    fn scroll_offsets_shift_children() {
        let (mut s, sheet) = scene();
        let stack = s
            .spawn(
                s.root(),
                NodeSpec::stack(Rect::new(0.0, 0.0, 100.0, 100.0), Axis::Vertical),
                &sheet,
            )
            .unwrap();
        let child = s
            .spawn(stack, NodeSpec::new(Rect::new(0.0, 0.0, 50.0, 300.0)), &sheet)
            .unwrap();
        s.stack_mut(stack).unwrap().total = Size::new(0.0, 300.0);
        s.set_scroll(stack, Vec2::new(0.0, 40.0));
        assert_eq!(s.absolute_rect(child).unwrap().origin().y, -40.0);
        // Clamped to the total.
        s.set_scroll(stack, Vec2::new(0.0, 1000.0));
        assert_eq!(s.node_ref(stack).scroll_offset.y, 300.0);
    }
}
