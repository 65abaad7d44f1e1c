// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor constraints: slot types and the constraint resolver.
//!
//! An anchor pins one of a node's six slots (four edges, two centers) to a
//! slot on a target node, with a pixel offset. Anchored nodes are skipped
//! by their parent's stack pass; the resolver runs after layout and
//! overrides stack-derived placement.
//!
//! Anchor targets are plain [`NodeId`]s, never owning references; the
//! target keeps a back-reference list of observers so that moving or
//! resizing it re-applies every dependent's constraints, recursively.
//! Cycles between anchor targets are rejected when the anchor is set.

use kurbo::{Point, Size};
use tracing::trace;

use crate::error::{Error, Result};
use crate::scene::{Scene, SizeUpdate};
use crate::types::{NodeFlags, NodeId};

/// One of the six anchorable slots of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnchorSlot {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
    /// Horizontal center.
    CenterX,
    /// Vertical center.
    CenterY,
}

impl AnchorSlot {
    /// All slots, in storage order.
    pub const ALL: [Self; 6] = [
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
        Self::CenterX,
        Self::CenterY,
    ];

    pub(crate) const fn idx(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Top => 2,
            Self::Bottom => 3,
            Self::CenterX => 4,
            Self::CenterY => 5,
        }
    }
}

/// A configured anchor: target node, target slot, offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnchorSpec {
    /// Node whose slot is followed. A back-reference, not ownership.
    pub target: NodeId,
    /// Slot on the target that is followed.
    pub target_slot: AnchorSlot,
    /// Added to the target's resolved slot value.
    pub offset: f64,
}

/// Anchor target parameter accepted by [`Scene::set_anchor`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnchorTarget {
    /// The node's current parent.
    Parent,
    /// An explicit node.
    Node(NodeId),
}

impl Scene {
    /// Set (or replace) the anchor on `slot` of `id`.
    ///
    /// Setting any anchor flags the node to be ignored by its parent's
    /// stack pass. Center anchors are mutually exclusive with the edge
    /// anchors of the same axis, the target can never be the root, and an
    /// anchor that would close a target cycle is rejected; all three are
    /// configuration errors.
    pub fn set_anchor(
        &mut self,
        id: NodeId,
        target: AnchorTarget,
        slot: AnchorSlot,
        target_slot: AnchorSlot,
        offset: f64,
    ) -> Result<()> {
        if !self.is_alive(id) {
            return Err(Error::DeadNode(id));
        }
        let target = match target {
            AnchorTarget::Parent => self
                .node_ref(id)
                .parent
                .ok_or(Error::AnchorToRoot)?,
            AnchorTarget::Node(t) => t,
        };
        if !self.is_alive(target) {
            return Err(Error::DeadAnchorTarget(target));
        }
        if target == self.root() {
            return Err(Error::AnchorToRoot);
        }

        // Center/edge exclusivity per axis, checked against the slots that
        // would be populated after this call.
        let has = |s: AnchorSlot| -> bool {
            s != slot && self.node_ref(id).anchors[s.idx()].is_some()
        };
        let conflict = match slot {
            AnchorSlot::CenterX => has(AnchorSlot::Left) || has(AnchorSlot::Right),
            AnchorSlot::Left | AnchorSlot::Right => has(AnchorSlot::CenterX),
            AnchorSlot::CenterY => has(AnchorSlot::Top) || has(AnchorSlot::Bottom),
            AnchorSlot::Top | AnchorSlot::Bottom => has(AnchorSlot::CenterY),
        };
        if conflict {
            return Err(Error::AnchorConflict);
        }

        // Reject cycles at configuration time: if `id` is reachable from
        // `target` through anchor targets, this anchor would loop.
        if target == id || self.anchor_reaches(target, id) {
            return Err(Error::AnchorCycle);
        }

        self.clear_anchor_slot(id, slot);
        {
            let node = self.node_mut_ref(id);
            node.flags |= NodeFlags::IGNORE_STACK;
            node.anchors[slot.idx()] = Some(AnchorSpec {
                target,
                target_slot,
                offset,
            });
        }
        self.node_mut_ref(target).anchor_observers.push(id);
        trace!(?slot, ?target_slot, "anchor set");
        self.apply_anchors(id);
        Ok(())
    }

    /// Clear the anchor on `slot`, if any.
    pub fn clear_anchor(&mut self, id: NodeId, slot: AnchorSlot) {
        if !self.is_alive(id) {
            return;
        }
        self.clear_anchor_slot(id, slot);
    }

    /// Remove every anchor of `id` except the slots in `skip`.
    pub fn remove_anchors(&mut self, id: NodeId, skip: &[AnchorSlot]) {
        if !self.is_alive(id) {
            return;
        }
        for slot in AnchorSlot::ALL {
            if !skip.contains(&slot) {
                self.clear_anchor_slot(id, slot);
            }
        }
    }

    /// Whether `slot` of `id` is anchored.
    #[must_use]
    pub fn has_anchor(&self, id: NodeId, slot: AnchorSlot) -> bool {
        self.get(id)
            .is_some_and(|n| n.anchors[slot.idx()].is_some())
    }

    /// Set every populated anchor's offset to `padding`, negated for the
    /// right and bottom slots, skipping the slots in `skip`, then re-apply.
    pub fn anchors_padding(&mut self, id: NodeId, padding: f64, skip: &[AnchorSlot]) {
        if !self.is_alive(id) {
            return;
        }
        for slot in AnchorSlot::ALL {
            if skip.contains(&slot) {
                continue;
            }
            let node = self.node_mut_ref(id);
            if let Some(spec) = node.anchors[slot.idx()].as_mut() {
                spec.offset = match slot {
                    AnchorSlot::Left | AnchorSlot::Top => padding,
                    AnchorSlot::Right | AnchorSlot::Bottom => -padding,
                    AnchorSlot::CenterX | AnchorSlot::CenterY => spec.offset,
                };
            }
        }
        self.apply_anchors(id);
    }

    /// Remove one observer entry and empty the slot.
    fn clear_anchor_slot(&mut self, id: NodeId, slot: AnchorSlot) {
        let old = self.node_mut_ref(id).anchors[slot.idx()].take();
        if let Some(spec) = old {
            if self.is_alive(spec.target) {
                let obs = &mut self.node_mut_ref(spec.target).anchor_observers;
                if let Some(pos) = obs.iter().position(|&o| o == id) {
                    obs.remove(pos);
                }
            }
        }
    }

    /// Is `needle` reachable from `from` by following anchor targets?
    fn anchor_reaches(&self, from: NodeId, needle: NodeId) -> bool {
        let Some(node) = self.get(from) else {
            return false;
        };
        for spec in node.anchors.iter().flatten() {
            if spec.target == needle || self.anchor_reaches(spec.target, needle) {
                return true;
            }
        }
        false
    }

    /// Clear any anchors of `observer` that point at a node being
    /// destroyed. No observer-list fixup: the target is going away.
    pub(crate) fn drop_anchors_to(&mut self, observer: NodeId, dead: NodeId) {
        if !self.is_alive(observer) {
            return;
        }
        let node = self.node_mut_ref(observer);
        for slot in &mut node.anchors {
            if slot.is_some_and(|s| s.target == dead) {
                *slot = None;
            }
        }
    }

    /// Resolved value of an anchor slot on a node's absolute rect.
    fn anchor_value(&self, spec: AnchorSpec) -> f64 {
        let rect = self
            .get(spec.target)
            .map(|n| n.absolute)
            .unwrap_or_default();
        let base = match spec.target_slot {
            AnchorSlot::Left => rect.x0,
            AnchorSlot::Right => rect.x1,
            AnchorSlot::Top => rect.y0,
            AnchorSlot::Bottom => rect.y1,
            AnchorSlot::CenterX => rect.center().x,
            AnchorSlot::CenterY => rect.center().y,
        };
        base + spec.offset
    }

    /// Re-apply the anchor constraints of `id`, then of every node
    /// anchored onto it (through the setters' observer notification).
    ///
    /// Per axis: a center anchor pins the center and keeps the extent;
    /// otherwise each anchored edge resolves independently, a single
    /// anchored edge preserves the extent, no anchored edge leaves the
    /// axis untouched, and a far edge at or before the near edge is forced
    /// one pixel past it. The resulting rect is applied with anchor
    /// re-application suppressed for this node (re-entrancy guard).
    pub(crate) fn apply_anchors(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.anchors.iter().all(Option::is_none) {
            return;
        }
        let abs = node.absolute;
        let anchors = node.anchors;

        let (left, width) = match anchors[AnchorSlot::CenterX.idx()] {
            Some(cx) => (self.anchor_value(cx) - abs.width() / 2.0, abs.width()),
            None => {
                let l = anchors[AnchorSlot::Left.idx()].map(|s| self.anchor_value(s));
                let r = anchors[AnchorSlot::Right.idx()].map(|s| self.anchor_value(s));
                let (l, r) = match (l, r) {
                    (Some(l), None) => (l, l + abs.width()),
                    (None, Some(r)) => (r - abs.width(), r),
                    (Some(l), Some(r)) => (l, r),
                    (None, None) => (abs.x0, abs.x1),
                };
                let r = if r <= l { l + 1.0 } else { r };
                (l, r - l)
            }
        };
        let (top, height) = match anchors[AnchorSlot::CenterY.idx()] {
            Some(cy) => (self.anchor_value(cy) - abs.height() / 2.0, abs.height()),
            None => {
                let t = anchors[AnchorSlot::Top.idx()].map(|s| self.anchor_value(s));
                let b = anchors[AnchorSlot::Bottom.idx()].map(|s| self.anchor_value(s));
                let (t, b) = match (t, b) {
                    (Some(t), None) => (t, t + abs.height()),
                    (None, Some(b)) => (b - abs.height(), b),
                    (Some(t), Some(b)) => (t, b),
                    (None, None) => (abs.y0, abs.y1),
                };
                let b = if b <= t { t + 1.0 } else { b };
                (t, b - t)
            }
        };

        self.set_size_with(
            id,
            Size::new(width, height),
            SizeUpdate {
                propagate_up: false,
                apply_anchors: false,
                refresh_self: true,
            },
        );
        self.set_absolute_pos_with(id, Point::new(left, top), false);
    }

    /// Re-apply every observer's anchors after `id` moved or resized.
    pub(crate) fn apply_observer_anchors(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let observers: Vec<NodeId> = node.anchor_observers.iter().copied().collect();
        for obs in observers {
            self.apply_anchors(obs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeSpec;
    use kurbo::Rect;

    fn scene() -> Scene {
        Scene::new(Size::new(800.0, 600.0))
    }

    fn spawn(scene: &mut Scene, rect: Rect) -> NodeId {
        let sheet = bracken_style::Stylesheet::new();
        scene
            .spawn(scene.root(), NodeSpec::new(rect), &sheet)
            .unwrap()
    }

    #[test]
    fn edge_anchor_tracks_target_edge() {
        let mut s = scene();
        let a = spawn(&mut s, Rect::new(10.0, 10.0, 110.0, 60.0));
        let b = spawn(&mut s, Rect::new(0.0, 0.0, 40.0, 40.0));
        s.set_anchor(b, AnchorTarget::Node(a), AnchorSlot::Left, AnchorSlot::Right, 5.0)
            .unwrap();
        let rect = s.get(b).unwrap().absolute;
        // Left pinned to a.right + 5, width preserved.
        assert_eq!(rect.x0, 115.0);
        assert_eq!(rect.width(), 40.0);
    }

    #[test]
    fn anchor_reapplication_is_idempotent() {
        let mut s = scene();
        let a = spawn(&mut s, Rect::new(10.0, 10.0, 110.0, 60.0));
        let b = spawn(&mut s, Rect::new(0.0, 0.0, 40.0, 40.0));
        s.set_anchor(b, AnchorTarget::Node(a), AnchorSlot::Left, AnchorSlot::Right, 0.0)
            .unwrap();
        s.set_anchor(b, AnchorTarget::Node(a), AnchorSlot::CenterY, AnchorSlot::CenterY, 0.0)
            .unwrap();
        let first = s.get(b).unwrap().absolute;
        s.apply_anchors(b);
        s.apply_anchors(b);
        assert_eq!(s.get(b).unwrap().absolute, first);
    }

    #[test]
    fn observers_follow_their_target() {
        let mut s = scene();
        let a = spawn(&mut s, Rect::new(0.0, 0.0, 100.0, 50.0));
        let b = spawn(&mut s, Rect::new(0.0, 0.0, 40.0, 40.0));
        s.set_anchor(b, AnchorTarget::Node(a), AnchorSlot::Left, AnchorSlot::Right, 0.0)
            .unwrap();
        s.set_relative_pos(a, Point::new(200.0, 0.0));
        assert_eq!(s.get(b).unwrap().absolute.x0, 300.0);
    }

    #[test]
    fn center_and_edge_on_same_axis_conflict() {
        let mut s = scene();
        let a = spawn(&mut s, Rect::new(0.0, 0.0, 100.0, 50.0));
        let b = spawn(&mut s, Rect::new(0.0, 0.0, 40.0, 40.0));
        s.set_anchor(b, AnchorTarget::Node(a), AnchorSlot::CenterX, AnchorSlot::CenterX, 0.0)
            .unwrap();
        let err = s
            .set_anchor(b, AnchorTarget::Node(a), AnchorSlot::Left, AnchorSlot::Left, 0.0)
            .unwrap_err();
        assert_eq!(err, Error::AnchorConflict);
    }

    #[test]
    fn anchoring_to_the_root_is_rejected() {
        let mut s = scene();
        let root = s.root();
        let b = spawn(&mut s, Rect::new(0.0, 0.0, 40.0, 40.0));
        let err = s
            .set_anchor(b, AnchorTarget::Node(root), AnchorSlot::Left, AnchorSlot::Left, 0.0)
            .unwrap_err();
        assert_eq!(err, Error::AnchorToRoot);
        // A top-level node's parent IS the root.
        let err = s
            .set_anchor(b, AnchorTarget::Parent, AnchorSlot::Left, AnchorSlot::Left, 0.0)
            .unwrap_err();
        assert_eq!(err, Error::AnchorToRoot);
    }

    #[test]
    fn anchor_cycles_are_rejected() {
        let mut s = scene();
        let a = spawn(&mut s, Rect::new(0.0, 0.0, 100.0, 50.0));
        let b = spawn(&mut s, Rect::new(0.0, 0.0, 40.0, 40.0));
        let c = spawn(&mut s, Rect::new(0.0, 0.0, 40.0, 40.0));
        s.set_anchor(b, AnchorTarget::Node(a), AnchorSlot::Left, AnchorSlot::Right, 0.0)
            .unwrap();
        s.set_anchor(c, AnchorTarget::Node(b), AnchorSlot::Left, AnchorSlot::Right, 0.0)
            .unwrap();
        let err = s
            .set_anchor(a, AnchorTarget::Node(c), AnchorSlot::Left, AnchorSlot::Right, 0.0)
            .unwrap_err();
        assert_eq!(err, Error::AnchorCycle);
        // Self-anchoring is the smallest cycle.
        let err = s
            .set_anchor(a, AnchorTarget::Node(a), AnchorSlot::Left, AnchorSlot::Left, 0.0)
            .unwrap_err();
        assert_eq!(err, Error::AnchorCycle);
    }

    #[test]
    fn degenerate_far_edge_is_forced_past_near() {
        let mut s = scene();
        let a = spawn(&mut s, Rect::new(100.0, 0.0, 200.0, 50.0));
        let b = spawn(&mut s, Rect::new(0.0, 0.0, 40.0, 40.0));
        // Left anchored after right: crossing edges.
        s.set_anchor(b, AnchorTarget::Node(a), AnchorSlot::Left, AnchorSlot::Right, 0.0)
            .unwrap();
        s.set_anchor(b, AnchorTarget::Node(a), AnchorSlot::Right, AnchorSlot::Left, 0.0)
            .unwrap();
        let rect = s.get(b).unwrap().absolute;
        assert_eq!(rect.width(), 1.0);
    }

    #[test]
    fn anchored_node_ignores_the_stack() {
        let mut s = scene();
        let a = spawn(&mut s, Rect::new(0.0, 0.0, 100.0, 50.0));
        let b = spawn(&mut s, Rect::new(0.0, 0.0, 40.0, 40.0));
        s.set_anchor(b, AnchorTarget::Node(a), AnchorSlot::Top, AnchorSlot::Bottom, 0.0)
            .unwrap();
        assert!(s.get(b).unwrap().flags.contains(NodeFlags::IGNORE_STACK));
    }
}
