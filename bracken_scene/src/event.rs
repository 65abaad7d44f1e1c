// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tagged events and the named-callback registry.
//!
//! Every interaction or lifecycle transition does two things: it pushes a
//! tagged [`Event`] into the scene's queue (drained by the host once per
//! frame) and it invokes the callback registered under the transition's
//! name, if any. The callback name set is an open registry: hosts may
//! register and [`crate::Scene::invoke`] arbitrary names of their own; the
//! engine only ever fires the names listed on [`EventKind`].

use crate::scene::Scene;
use crate::types::NodeId;

/// A boxed per-node callback.
///
/// Callbacks receive the scene and the node they were registered on, and
/// may freely mutate the scene (including re-entrant emission).
pub type NodeCallback = Box<dyn FnMut(&mut Scene, NodeId)>;

/// The transitions the engine emits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer entered the node.
    StartHover,
    /// Pointer left the node.
    StopHover,
    /// Fired every frame the node stays hovered.
    Hovered,
    /// Left press began.
    StartPress,
    /// Left press ended.
    StopPress,
    /// Fired every frame the node stays pressed.
    Pressed,
    /// Full left press-release cycle completed.
    Click,
    /// Right press began.
    StartRightPress,
    /// Right press ended.
    StopRightPress,
    /// Fired every frame the node stays right-pressed.
    RightPressed,
    /// Full right press-release cycle completed.
    RightClick,
    /// Selected status turned on.
    Select,
    /// Selected status turned off.
    Deselect,
    /// Node moved while dragged.
    Drag,
    /// Node size changed through a resize handle.
    Resize,
    /// Node position changed.
    PositionChange,
    /// Node size changed.
    SizeChange,
    /// Resolved style snapshot changed.
    StyleChange,
    /// Visual caches must be rebuilt (follows size/style changes).
    Build,
    /// The text selection's indices or rectangles changed.
    TextSelectionChange,
    /// A scroll-hovered stack consumed wheel input.
    Scroll,
    /// The node is about to be destroyed.
    Destroy,
}

impl EventKind {
    /// The callback name invoked alongside this event.
    #[must_use]
    pub const fn callback_name(self) -> &'static str {
        match self {
            Self::StartHover => "on_start_hover",
            Self::StopHover => "on_stop_hover",
            Self::Hovered => "when_hovered",
            Self::StartPress => "on_start_press",
            Self::StopPress => "on_stop_press",
            Self::Pressed => "when_pressed",
            Self::Click => "on_click",
            Self::StartRightPress => "on_start_right_press",
            Self::StopRightPress => "on_stop_right_press",
            Self::RightPressed => "when_right_pressed",
            Self::RightClick => "on_right_click",
            Self::Select => "on_select",
            Self::Deselect => "on_deselect",
            Self::Drag => "on_drag",
            Self::Resize => "on_resize",
            Self::PositionChange => "on_position_change",
            Self::SizeChange => "on_size_change",
            Self::StyleChange => "on_style_change",
            Self::Build => "on_build",
            Self::TextSelectionChange => "on_text_selection_change",
            Self::Scroll => "on_scroll",
            Self::Destroy => "on_destroy",
        }
    }
}

/// One emitted transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Node the transition happened on. May be stale by the time the host
    /// drains the queue if the node was destroyed in the same frame.
    pub node: NodeId,
    /// What happened.
    pub kind: EventKind,
}
