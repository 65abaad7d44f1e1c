// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken: a retained-mode UI composition engine for embedding in a
//! host render/input loop.
//!
//! This crate is the host-facing facade over the engine's parts:
//!
//! - [`bracken_scene`]: the scene tree (lifecycle, dirty propagation,
//!   anchors, events).
//! - [`bracken_style`]: the style model and cascade resolver.
//! - [`bracken_layout`]: the box-layout ("stack") engine.
//! - [`bracken_interact`]: ray-casting and the interaction state machine.
//!
//! [`Ui`] owns one of everything and drives the per-frame control flow:
//! the host hands it one [`InputSnapshot`] per frame, [`Ui::frame`] runs
//! the interaction pass (which includes the per-node logic walk), steps
//! animations, and flushes layout; [`Ui::render`] then repaints dirty
//! nodes through the host's [`SurfaceFactory`] and returns the root
//! surface for presentation. Queued [`Event`]s are drained with
//! [`Ui::events`].
//!
//! ## Minimal host loop
//!
//! ```no_run
//! # use bracken_ui::*;
//! # use kurbo::{Rect, Size};
//! # fn measure() -> Box<dyn bracken_style::TextMeasure> { unimplemented!() }
//! # fn factory() -> Box<dyn SurfaceFactory> { unimplemented!() }
//! let mut ui = Ui::new(Size::new(1280.0, 720.0));
//! let panel = ui
//!     .build(|cx| cx.stack(Rect::new(40.0, 40.0, 400.0, 300.0), Axis::Vertical))
//!     .unwrap();
//! ui.build(|cx| {
//!     cx.with_parent(panel, |cx| {
//!         for _ in 0..3 {
//!             cx.node(Rect::new(0.0, 0.0, 120.0, 32.0)).unwrap();
//!         }
//!     })
//! });
//!
//! let measure = measure();
//! let mut factory = factory();
//! loop {
//!     let input = InputSnapshot::default(); // from the host event pump
//!     ui.frame(&input, measure.as_ref());
//!     for _event in ui.events() {
//!         // react to clicks, hovers, drags, …
//!     }
//!     ui.render(measure.as_ref(), factory.as_mut());
//! }
//! ```

mod anim;
mod backend;
mod build;
mod render;

pub use anim::{AnimProperty, Animations, Ease, RepeatMode};
pub use backend::{Surface, SurfaceFactory};
pub use build::BuildCx;
pub use render::Renderer;

pub use bracken_interact::{InputSnapshot, Interaction, raycast};
pub use bracken_scene::{
    AnchorSlot, AnchorTarget, Axis, Error, Event, EventKind, NodeFlags, NodeId, NodeSpec,
    ResizeEdge, Role, Scene, z,
};
pub use bracken_style::{
    Facet, Rgba, Selector, Style, StyleRule, StyleState, StyleValue, Stylesheet, TextMeasure,
};

use kurbo::Size;

/// The engine: scene, stylesheet, interaction machine, renderer, and
/// animations under one roof, with the per-frame driver.
#[derive(Debug)]
pub struct Ui {
    /// The scene tree. Mutate through its methods; style-resolving calls
    /// take [`Ui::sheet`].
    pub scene: Scene,
    /// The style rule registry.
    pub sheet: Stylesheet,
    /// The interaction state machine.
    pub interaction: Interaction,
    /// Running property animations.
    pub animations: Animations,
    renderer: Renderer,
}

impl Ui {
    /// An engine with an empty scene of the given root size.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            scene: Scene::new(size),
            sheet: Stylesheet::new(),
            interaction: Interaction::new(),
            animations: Animations::new(),
            renderer: Renderer::new(),
        }
    }

    /// Run a construction closure with a [`BuildCx`] rooted at the scene
    /// root.
    pub fn build<R>(&mut self, f: impl FnOnce(&mut BuildCx<'_>) -> R) -> R {
        let root = self.scene.root();
        let mut cx = BuildCx::new(&mut self.scene, &self.sheet, root);
        f(&mut cx)
    }

    /// Advance one frame: interaction transitions and the logic walk,
    /// then animations, then layout to a fixed point.
    pub fn frame(&mut self, input: &InputSnapshot, measure: &dyn TextMeasure) {
        self.interaction.frame(&mut self.scene, input, measure);
        self.animations.step(&mut self.scene, input.now_ms);
        bracken_layout::flush(&mut self.scene);
    }

    /// Repaint dirty nodes and return the root surface for presentation.
    pub fn render(
        &mut self,
        measure: &dyn TextMeasure,
        factory: &mut dyn SurfaceFactory,
    ) -> Option<&dyn Surface> {
        self.renderer.render(&mut self.scene, measure, factory)
    }

    /// Drain the events queued since the last drain.
    pub fn events(&mut self) -> Vec<Event> {
        self.scene.drain_events()
    }

    /// Access the renderer (image/icon registration).
    pub fn renderer(&mut self) -> &mut Renderer {
        &mut self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_style::FontSpec;
    use kurbo::{Point, Rect};

    struct NullSurface(Size);

    impl Surface for NullSurface {
        fn size(&self) -> Size {
            self.0
        }
        fn fill(&mut self, _color: Rgba) {}
        fn fill_rect(&mut self, _rect: Rect, _color: Rgba) {}
        fn blit(&mut self, _src: &dyn Surface, _at: Point) {}
        fn blit_region(&mut self, _src: &dyn Surface, _src_rect: Rect, _at: Point) {}
        fn blit_scaled(&mut self, _src: &dyn Surface, _src_rect: Rect, _dst_rect: Rect) {}
    }

    struct NullFactory;

    impl SurfaceFactory for NullFactory {
        fn create(&mut self, size: Size) -> Box<dyn Surface> {
            Box::new(NullSurface(size))
        }
    }

    struct Mono;

    impl TextMeasure for Mono {
        fn line_height(&self, _font: &FontSpec) -> f64 {
            10.0
        }
        fn char_width(&self, _font: &FontSpec, _ch: char) -> f64 {
            5.0
        }
        fn wrap(&self, _font: &FontSpec, text: &str, _max_width: f64) -> Vec<String> {
            text.lines().map(str::to_owned).collect()
        }
    }

    #[test]
    fn a_full_frame_runs_interaction_layout_and_render() {
        let mut ui = Ui::new(Size::new(800.0, 600.0));
        let panel = ui
            .build(|cx| cx.stack(Rect::new(0.0, 0.0, 200.0, 200.0), Axis::Vertical))
            .unwrap();
        ui.build(|cx| {
            cx.with_parent(panel, |cx| {
                for _ in 0..2 {
                    cx.node(Rect::new(0.0, 0.0, 80.0, 30.0)).unwrap();
                }
            })
        });

        // Hover over the panel area.
        ui.frame(&InputSnapshot::at(Point::new(100.0, 100.0), 1), &Mono);
        assert!(ui.interaction.hovered.is_some());
        // The layout flush measured the stack.
        let state = ui.scene.stack(panel).unwrap();
        assert!(state.content.height > 0.0);

        let kinds: Vec<EventKind> = ui.events().into_iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EventKind::StartHover));

        // Press and release over the same point produces a click.
        let mut down = InputSnapshot::at(Point::new(100.0, 100.0), 2);
        down.left_down = true;
        ui.frame(&down, &Mono);
        ui.frame(&InputSnapshot::at(Point::new(100.0, 100.0), 3), &Mono);
        let kinds: Vec<EventKind> = ui.events().into_iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EventKind::Click));

        // Rendering yields the root surface and settles the dirty flags.
        let mut factory = NullFactory;
        let surface = ui.render(&Mono, &mut factory).expect("root surface");
        assert_eq!(surface.size(), Size::new(800.0, 600.0));
        assert!(!ui.scene.status(ui.scene.root()).unwrap().dirty);
    }

    #[test]
    fn style_rules_flow_through_to_resolved_nodes() {
        let mut ui = Ui::new(Size::new(800.0, 600.0));
        ui.sheet
            .add_rule(StyleRule {
                selector: Selector::ElementId("accent".into()),
                state: StyleState::Normal,
                facet: Facet::Background,
                property: "color".into(),
                value: StyleValue::Color(Rgba::rgb(10, 20, 30)),
            })
            .unwrap();
        let node = ui
            .build(|cx| {
                cx.spawn(NodeSpec::new(Rect::new(0.0, 0.0, 50.0, 50.0)).element_id("accent"))
            })
            .unwrap();
        assert_eq!(
            ui.scene.style(node).unwrap().background.color,
            Rgba::rgb(10, 20, 30)
        );
    }
}
