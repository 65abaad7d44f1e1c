// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-stepped property animations.
//!
//! An animation moves one scalar property of a node by a delta over a
//! duration, applied as an eased offset from the value captured when the
//! animation first steps. Timing comes from the frame timestamps; there
//! is no internal clock.

use kurbo::{Point, Size, Vec2};

use bracken_scene::{NodeId, Scene};

/// The animatable scalar properties.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimProperty {
    /// Relative x position.
    X,
    /// Relative y position.
    Y,
    /// Node width.
    Width,
    /// Node height.
    Height,
    /// Render-offset x.
    RenderX,
    /// Render-offset y.
    RenderY,
}

/// What happens when an animation's duration elapses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RepeatMode {
    /// Stop at the end value and remove the animation.
    #[default]
    Once,
    /// Jump back to the start value and run again.
    Loop,
    /// Run back towards the start value, alternating.
    PingPong,
}

/// Easing applied to animation progress.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Ease {
    /// Constant rate.
    Linear,
    /// Slow start.
    #[default]
    In,
    /// Slow finish.
    Out,
    /// Slow start and finish.
    InOut,
}

impl Ease {
    fn apply(self, p: f64) -> f64 {
        match self {
            Self::Linear => p,
            Self::In => p * p,
            Self::Out => 1.0 - (1.0 - p) * (1.0 - p),
            Self::InOut => p * p * (3.0 - 2.0 * p),
        }
    }
}

#[derive(Debug)]
struct Animation {
    node: NodeId,
    property: AnimProperty,
    delta: f64,
    duration_ms: u64,
    repeat: RepeatMode,
    ease: Ease,
    start_ms: Option<u64>,
    base: f64,
}

/// The set of running animations, stepped once per frame.
#[derive(Debug, Default)]
pub struct Animations {
    running: Vec<Animation>,
}

impl Animations {
    /// No animations running.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating `property` of `node` by `delta` over
    /// `duration_ms`.
    pub fn animate(
        &mut self,
        node: NodeId,
        property: AnimProperty,
        delta: f64,
        duration_ms: u64,
        repeat: RepeatMode,
        ease: Ease,
    ) {
        self.running.push(Animation {
            node,
            property,
            delta,
            duration_ms: duration_ms.max(1),
            repeat,
            ease,
            start_ms: None,
            base: 0.0,
        });
    }

    /// Drop every animation attached to `node`.
    pub fn clear_node(&mut self, node: NodeId) {
        self.running.retain(|a| a.node != node);
    }

    /// Number of running animations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.running.len()
    }

    /// Whether nothing is animating.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Advance all animations to `now_ms`, applying values through the
    /// scene's setters.
    pub fn step(&mut self, scene: &mut Scene, now_ms: u64) {
        let mut running = std::mem::take(&mut self.running);
        running.retain_mut(|anim| {
            if !scene.is_alive(anim.node) {
                return false;
            }
            if anim.start_ms.is_none() {
                anim.base = read_property(scene, anim.node, anim.property);
                anim.start_ms = Some(now_ms);
            }
            let start = anim.start_ms.expect("start stamped above");
            let elapsed = now_ms.saturating_sub(start);
            #[allow(
                clippy::cast_precision_loss,
                reason = "durations are far below f64 precision limits"
            )]
            let progress = (elapsed as f64 / anim.duration_ms as f64).min(1.0);
            let value = anim.base + anim.delta * anim.ease.apply(progress);
            write_property(scene, anim.node, anim.property, value);
            if progress < 1.0 {
                return true;
            }
            match anim.repeat {
                RepeatMode::Once => false,
                RepeatMode::Loop => {
                    anim.start_ms = Some(now_ms);
                    true
                }
                RepeatMode::PingPong => {
                    anim.base += anim.delta;
                    anim.delta = -anim.delta;
                    anim.start_ms = Some(now_ms);
                    true
                }
            }
        });
        self.running = running;
    }
}

fn read_property(scene: &Scene, id: NodeId, property: AnimProperty) -> f64 {
    let Some(node) = scene.get(id) else {
        return 0.0;
    };
    match property {
        AnimProperty::X => node.relative.x0,
        AnimProperty::Y => node.relative.y0,
        AnimProperty::Width => node.relative.width(),
        AnimProperty::Height => node.relative.height(),
        AnimProperty::RenderX => node.render_offset.x,
        AnimProperty::RenderY => node.render_offset.y,
    }
}

fn write_property(scene: &mut Scene, id: NodeId, property: AnimProperty, value: f64) {
    let Some(rect) = scene.relative_rect(id) else {
        return;
    };
    match property {
        AnimProperty::X => scene.set_relative_pos(id, Point::new(value, rect.y0)),
        AnimProperty::Y => scene.set_relative_pos(id, Point::new(rect.x0, value)),
        AnimProperty::Width => scene.set_size(id, Size::new(value, rect.height())),
        AnimProperty::Height => scene.set_size(id, Size::new(rect.width(), value)),
        AnimProperty::RenderX => {
            let offset = scene.get(id).map(|n| n.render_offset).unwrap_or_default();
            scene.set_render_offset(id, Vec2::new(value, offset.y));
        }
        AnimProperty::RenderY => {
            let offset = scene.get(id).map(|n| n.render_offset).unwrap_or_default();
            scene.set_render_offset(id, Vec2::new(offset.x, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_scene::NodeSpec;
    use bracken_style::Stylesheet;
    use kurbo::Rect;

    fn scene_with_node() -> (Scene, NodeId) {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let sheet = Stylesheet::new();
        let id = scene
            .spawn(scene.root(), NodeSpec::new(Rect::new(10.0, 0.0, 60.0, 50.0)), &sheet)
            .unwrap();
        (scene, id)
    }

    #[test]
    fn linear_animation_reaches_its_target_and_stops() {
        let (mut scene, id) = scene_with_node();
        let mut anims = Animations::new();
        anims.animate(id, AnimProperty::X, 100.0, 100, RepeatMode::Once, Ease::Linear);

        anims.step(&mut scene, 1000);
        assert_eq!(scene.relative_rect(id).unwrap().x0, 10.0);
        anims.step(&mut scene, 1050);
        assert_eq!(scene.relative_rect(id).unwrap().x0, 60.0);
        anims.step(&mut scene, 1100);
        assert_eq!(scene.relative_rect(id).unwrap().x0, 110.0);
        assert!(anims.is_empty());
    }

    #[test]
    fn ping_pong_returns_to_the_base_value(){
        let (mut scene, id) = scene_with_node();
        let mut anims = Animations::new();
        anims.animate(id, AnimProperty::Width, 50.0, 100, RepeatMode::PingPong, Ease::Linear);

        anims.step(&mut scene, 0);
        anims.step(&mut scene, 100);
        assert_eq!(scene.relative_rect(id).unwrap().width(), 100.0);
        anims.step(&mut scene, 200);
        assert_eq!(scene.relative_rect(id).unwrap().width(), 50.0);
        assert_eq!(anims.len(), 1);
    }

    #[test]
    fn animations_for_dead_nodes_are_dropped() {
        let (mut scene, id) = scene_with_node();
        let mut anims = Animations::new();
        anims.animate(id, AnimProperty::Y, 10.0, 100, RepeatMode::Loop, Ease::Linear);
        scene.destroy(id, true);
        anims.step(&mut scene, 0);
        assert!(anims.is_empty());
    }
}
