// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped construction context.
//!
//! Instead of an ambient "current parent" global, construction goes
//! through an explicit [`BuildCx`] carrying the scene, the stylesheet,
//! and the current parent. [`BuildCx::with_parent`] nests scopes: it
//! makes a node the parent for the duration of a closure and restores the
//! previous parent on exit, wrapping the scope in the scene's
//! batch-mutation guard so a stack populated inside it lays out once.

use kurbo::Rect;

use bracken_scene::{Axis, NodeId, NodeSpec, Result, Scene};
use bracken_style::Stylesheet;

/// A construction context: scene, stylesheet, and current parent.
#[derive(Debug)]
pub struct BuildCx<'a> {
    scene: &'a mut Scene,
    sheet: &'a Stylesheet,
    parent: NodeId,
}

impl<'a> BuildCx<'a> {
    /// A context rooted at `parent`.
    pub fn new(scene: &'a mut Scene, sheet: &'a Stylesheet, parent: NodeId) -> Self {
        Self {
            scene,
            sheet,
            parent,
        }
    }

    /// The current parent.
    #[must_use]
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// The scene under construction.
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    /// The stylesheet nodes resolve against.
    #[must_use]
    pub fn sheet(&self) -> &Stylesheet {
        self.sheet
    }

    /// Spawn a node under the current parent.
    pub fn spawn(&mut self, spec: NodeSpec) -> Result<NodeId> {
        self.scene.spawn(self.parent, spec, self.sheet)
    }

    /// Spawn a plain widget with the given relative rect.
    pub fn node(&mut self, rect: Rect) -> Result<NodeId> {
        self.spawn(NodeSpec::new(rect))
    }

    /// Spawn a stack container with the given direction.
    pub fn stack(&mut self, rect: Rect, axis: Axis) -> Result<NodeId> {
        self.spawn(NodeSpec::stack(rect, axis))
    }

    /// Run `f` with `parent` as the current parent, restoring the prior
    /// parent afterwards. The scope is wrapped in a batch-mutation guard,
    /// so a stack filled inside lays out once on exit.
    pub fn with_parent<R>(&mut self, parent: NodeId, f: impl FnOnce(&mut Self) -> R) -> R {
        let prior = self.parent;
        self.parent = parent;
        self.scene.begin_batch(parent);
        let result = f(self);
        self.scene.end_batch(parent);
        self.parent = prior;
        result
    }
}
