// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Interact: the interaction state machine of the Bracken UI
//! composition engine.
//!
//! One [`InputSnapshot`] is consumed per frame. The machine ray-casts the
//! pointer against the scene ([`raycast`]), drives the global
//! hover/press/right-press/text-selection states with a strict transition
//! order (text-selection drag, then active left press, then active right
//! press, then hover re-evaluation), routes wheel input to the
//! scroll-hovered stack, and runs the per-node logic walk: ghost
//! following, style re-selection from status, resize-handle application,
//! and dragging.
//!
//! Every transition both fires the node's named callback and pushes a
//! tagged event into the scene's queue; see
//! [`bracken_scene::EventKind`] for the full set and ordering guarantees
//! (press ends before click, click before select).
//!
//! Text-selection hit testing measures through the host's
//! [`bracken_style::TextMeasure`]; geometry lives in [`textsel`].

mod input;
mod machine;
mod raycast;
pub mod textsel;

pub use input::InputSnapshot;
pub use machine::Interaction;
pub use raycast::raycast;
