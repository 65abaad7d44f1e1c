// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Scene: the retained scene tree of the Bracken UI composition
//! engine.
//!
//! Nodes live in a generational slot arena owned by [`Scene`]; a
//! [`NodeId`] is an index plus a generation, so parent links, anchor
//! targets, and anchor observers are plain ids rather than owning
//! references, and a destroyed node invalidates every outstanding id to it.
//!
//! The scene tracks, per node: geometry (relative and absolute rects),
//! ordered children, z-index, configuration flags, interaction [`Status`],
//! the resolved style group and active snapshot, the six anchor slots with
//! their observer back-references, optional stack-layout state, resize
//! handles, ghost and tooltip attachments, and text content.
//!
//! ## Mutation discipline
//!
//! All state changes go through `Scene` methods. Each mutator validates,
//! applies, refreshes the dependent caches (absolute rects, resize handle
//! geometry), notifies (tagged event + named callback), propagates the
//! dirty flag upward, and re-applies anchors for the node and its
//! observers. Stale ids make mutators no-ops and queries return `None`;
//! only constructing and configuring calls (spawning, anchoring) report
//! configuration [`Error`]s.
//!
//! ## Passes
//!
//! The scene itself runs no passes. `bracken_layout` drains
//! [`Scene::take_layout_queue`], `bracken_interact` drives status and the
//! per-frame logic walk, and the render pass in `bracken_ui` consumes
//! dirty flags. Everything is single-threaded and frame-synchronous.

mod anchor;
mod error;
mod event;
mod node;
mod scene;
mod status;
mod types;

pub use anchor::{AnchorSlot, AnchorSpec, AnchorTarget};
pub use error::{Error, Result};
pub use event::{Event, EventKind, NodeCallback};
pub use node::{Node, NodeSpec, StackState, TextContent, TextIndex};
pub use scene::{Scene, SizeUpdate};
pub use status::Status;
pub use types::{Axis, NodeFlags, NodeId, ResizeEdge, Role, z};
