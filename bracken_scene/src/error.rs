// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors for scene operations.

use crate::types::NodeId;

/// Result alias used across the scene crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Configuration errors.
///
/// All of these indicate programmer misuse; they are raised synchronously
/// at the offending call and never retried or swallowed. Transient numeric
/// conditions (degenerate sizes, empty stacks) are clamped instead and do
/// not appear here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A node id passed to a constructing or configuring call is stale.
    #[error("node id is stale")]
    DeadNode(NodeId),
    /// The parent passed at construction is stale.
    #[error("parent node is not alive")]
    DeadParent(NodeId),
    /// Anchor target is the scene root.
    #[error("anchor target cannot be the root")]
    AnchorToRoot,
    /// Anchor target id is stale.
    #[error("anchor target is not alive")]
    DeadAnchorTarget(NodeId),
    /// A center anchor was combined with an edge anchor on the same axis.
    #[error("center anchors are exclusive with edge anchors on the same axis")]
    AnchorConflict,
    /// The requested anchor would close a cycle of anchor targets.
    #[error("anchor would create a cycle")]
    AnchorCycle,
}
