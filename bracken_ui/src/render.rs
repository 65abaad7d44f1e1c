// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dirty-driven render pass.
//!
//! Each node owns a retained surface sized to its rect. A repaint clears
//! the surface, paints the enabled facets in order (background, image,
//! shape, text, icon), composites the children's cached surfaces by
//! ascending z-index, and finishes with the outline on top. Only dirty
//! nodes repaint; because dirtiness propagates upward, a clean node can
//! never have a dirty descendant, so clean subtrees are walked purely to
//! keep compositing order intact. Every dirty node repaints exactly once
//! per pass.

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};
use tracing::trace;

use bracken_scene::{NodeId, Role, Scene};
use bracken_style::{Rgba, Style, TextAlign, TextMeasure, line_width};

use crate::backend::{Surface, SurfaceFactory};

/// Runs the render pass and owns the per-node retained surfaces plus the
/// host-registered image and icon sources.
#[derive(Default)]
pub struct Renderer {
    surfaces: HashMap<NodeId, Box<dyn Surface>>,
    images: HashMap<NodeId, Box<dyn Surface>>,
    icons: HashMap<NodeId, Box<dyn Surface>>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("surfaces", &self.surfaces.len())
            .field("images", &self.images.len())
            .field("icons", &self.icons.len())
            .finish()
    }
}

impl Renderer {
    /// A renderer with no cached surfaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or clear) the source surface for a node's image facet.
    pub fn set_image(&mut self, id: NodeId, surface: Option<Box<dyn Surface>>) {
        match surface {
            Some(s) => {
                self.images.insert(id, s);
            }
            None => {
                self.images.remove(&id);
            }
        }
    }

    /// Register (or clear) the source surface for a node's icon facet.
    pub fn set_icon(&mut self, id: NodeId, surface: Option<Box<dyn Surface>>) {
        match surface {
            Some(s) => {
                self.icons.insert(id, s);
            }
            None => {
                self.icons.remove(&id);
            }
        }
    }

    /// Render one frame and return the root surface for presentation.
    ///
    /// Also drops cached surfaces of destroyed nodes.
    pub fn render(
        &mut self,
        scene: &mut Scene,
        measure: &dyn TextMeasure,
        factory: &mut dyn SurfaceFactory,
    ) -> Option<&dyn Surface> {
        let root = scene.root();
        self.render_node(scene, measure, factory, root);
        self.surfaces.retain(|&id, _| scene.is_alive(id));
        self.surfaces.get(&root).map(Box::as_ref)
    }

    fn ensure_surface(
        &mut self,
        factory: &mut dyn SurfaceFactory,
        id: NodeId,
        size: Size,
    ) -> bool {
        let size = Size::new(size.width.max(1.0), size.height.max(1.0));
        let stale = self
            .surfaces
            .get(&id)
            .is_none_or(|s| s.size() != size);
        if stale {
            self.surfaces.insert(id, factory.create(size));
        }
        stale
    }

    fn render_node(
        &mut self,
        scene: &mut Scene,
        measure: &dyn TextMeasure,
        factory: &mut dyn SurfaceFactory,
        id: NodeId,
    ) {
        if !scene.can_render(id) {
            return;
        }
        let Some(node) = scene.get(id) else {
            return;
        };
        let rect = node.relative;
        let ghost = node.role == Role::Ghost;
        let dirty = node.status.dirty;
        let children = scene.children_by_z(id);

        self.ensure_surface(factory, id, rect.size());
        if dirty {
            trace!(element_id = %scene.get(id).map(|n| n.element_id.clone()).unwrap_or_default(), "repaint");
            let local = Rect::from_origin_size(Point::ZERO, rect.size());
            let style = scene.style(id).cloned().unwrap_or_default();
            {
                let surface = self.surfaces.get_mut(&id).expect("surface just ensured");
                surface.fill(Rgba::TRANSPARENT);
                // Ghosts keep geometry but never paint facets.
                if !ghost {
                    paint_background(surface.as_mut(), &style, local);
                }
            }
            if !ghost {
                self.paint_image(id, &style, local);
                self.paint_shape(id, &style, local);
                self.paint_text(scene, measure, id, &style, local);
                self.paint_icon(id, &style, local);
            }

            for &child in &children {
                self.render_node(scene, measure, factory, child);
                self.composite_child(scene, id, child);
            }

            if !ghost {
                let surface = self.surfaces.get_mut(&id).expect("surface just ensured");
                paint_outline(surface.as_mut(), &style, local);
            }
        } else {
            // Clean subtree: no descendant can be dirty, walk only to keep
            // ordering bookkeeping uniform.
            for &child in &children {
                self.render_node(scene, measure, factory, child);
            }
        }
        scene.clear_dirty(id);
    }

    /// Blit a child's cached surface onto the parent at its relative
    /// position, applying scroll and render offsets.
    fn composite_child(&mut self, scene: &Scene, parent: NodeId, child: NodeId) {
        let Some(cn) = scene.get(child) else {
            return;
        };
        if !cn.status.visible {
            return;
        }
        let scroll = if cn.ignores_scroll() {
            scene.get(scene.root()).map(|n| n.scroll_offset)
        } else {
            scene.get(parent).map(|n| n.scroll_offset)
        }
        .unwrap_or(Vec2::ZERO);
        let at = cn.relative.origin() - scroll + cn.render_offset;
        let Some(child_surface) = self.surfaces.remove(&child) else {
            return;
        };
        if let Some(parent_surface) = self.surfaces.get_mut(&parent) {
            parent_surface.blit(child_surface.as_ref(), at);
        }
        self.surfaces.insert(child, child_surface);
    }

    fn paint_image(&mut self, id: NodeId, style: &Style, local: Rect) {
        if !style.image.enabled {
            return;
        }
        let Some(image) = self.images.remove(&id) else {
            return;
        };
        if let Some(surface) = self.surfaces.get_mut(&id) {
            let params = &style.image;
            let padded = inset(local, params.padding);
            let src = Rect::from_origin_size(Point::ZERO, image.size());
            if params.fill || (params.stretch_x && params.stretch_y) {
                surface.blit_scaled(image.as_ref(), src, padded);
            } else if params.stretch_x || params.stretch_y {
                let dst_size = Size::new(
                    if params.stretch_x { padded.width() } else { src.width() },
                    if params.stretch_y { padded.height() } else { src.height() },
                );
                let dst = centered(padded, dst_size);
                surface.blit_scaled(image.as_ref(), src, dst);
            } else {
                let dst = centered(padded, src.size());
                surface.blit_region(image.as_ref(), src, dst.origin());
            }
            if params.outline_width > 0.0 {
                stroke_rect(surface.as_mut(), padded, params.outline_color, params.outline_width);
            }
        }
        self.images.insert(id, image);
    }

    fn paint_shape(&mut self, id: NodeId, style: &Style, local: Rect) {
        if !style.shape.enabled {
            return;
        }
        let Some(surface) = self.surfaces.get_mut(&id) else {
            return;
        };
        let params = &style.shape;
        let rect = match params.kind {
            bracken_style::ShapeKind::Rect => inset(local, params.padding),
            bracken_style::ShapeKind::Ellipse => {
                let r = inset(local, params.padding);
                Rect::new(
                    r.x0 + params.ellipse_padding_x,
                    r.y0 + params.ellipse_padding_y,
                    r.x1 - params.ellipse_padding_x,
                    r.y1 - params.ellipse_padding_y,
                )
            }
        };
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        if params.outline_width > 0.0 {
            stroke_rect(surface.as_mut(), rect, params.color, params.outline_width);
        } else {
            surface.fill_rect(rect, params.color);
        }
    }

    /// Lay out the text block, record its rect for selection hit testing,
    /// and paint the text background and selection rectangles. Glyph
    /// rasterization itself belongs to the host's text backend.
    fn paint_text(
        &mut self,
        scene: &mut Scene,
        measure: &dyn TextMeasure,
        id: NodeId,
        style: &Style,
        local: Rect,
    ) {
        if !style.text.enabled {
            return;
        }
        let Some(content) = scene.text(id) else {
            return;
        };
        if content.text.is_empty() {
            return;
        }
        let params = &style.text;
        let lines = measure.wrap(&params.font, &content.text.clone(), local.width());
        let block_w = lines
            .iter()
            .map(|l| line_width(measure, &params.font, l))
            .fold(0.0, f64::max);
        let block_h = measure.line_height(&params.font) * lines.len() as f64;
        let text_rect = align_block(
            Size::new(block_w, block_h),
            local,
            params.padding,
            params.y_padding,
            params.align,
        );
        scene.set_text_rect(id, text_rect);

        let selection: Vec<Rect> = scene
            .text(id)
            .map(|t| t.selection_rects.clone())
            .unwrap_or_default();
        let Some(surface) = self.surfaces.get_mut(&id) else {
            return;
        };
        if let Some(bg) = params.bg_color {
            surface.fill_rect(text_rect, bg);
        }
        let highlight = Rgba::rgba(params.color.r, params.color.g, params.color.b, 60);
        for rect in selection {
            surface.fill_rect(rect, highlight);
        }
    }

    fn paint_icon(&mut self, id: NodeId, style: &Style, local: Rect) {
        if !style.icon.enabled {
            return;
        }
        let Some(icon) = self.icons.remove(&id) else {
            return;
        };
        if let Some(surface) = self.surfaces.get_mut(&id) {
            let params = &style.icon;
            let src = Rect::from_origin_size(Point::ZERO, icon.size());
            let dst_size = Size::new(src.width() * params.scale, src.height() * params.scale);
            let dst = align_block(dst_size, local, params.padding, params.padding, params.align);
            surface.blit_scaled(icon.as_ref(), src, dst);
        }
        self.icons.insert(id, icon);
    }
}

fn paint_background(surface: &mut dyn Surface, style: &Style, local: Rect) {
    if style.background.enabled {
        surface.fill_rect(local, style.background.color);
    }
}

fn paint_outline(surface: &mut dyn Surface, style: &Style, local: Rect) {
    if style.outline.enabled && style.outline.width > 0.0 {
        stroke_rect(surface, local, style.outline.color, style.outline.width);
    }
}

/// Stroke a rect as four filled edges.
fn stroke_rect(surface: &mut dyn Surface, rect: Rect, color: Rgba, width: f64) {
    surface.fill_rect(Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + width), color);
    surface.fill_rect(Rect::new(rect.x0, rect.y1 - width, rect.x1, rect.y1), color);
    surface.fill_rect(Rect::new(rect.x0, rect.y0, rect.x0 + width, rect.y1), color);
    surface.fill_rect(Rect::new(rect.x1 - width, rect.y0, rect.x1, rect.y1), color);
}

fn inset(rect: Rect, by: f64) -> Rect {
    let r = Rect::new(rect.x0 + by, rect.y0 + by, rect.x1 - by, rect.y1 - by);
    if r.width() <= 0.0 || r.height() <= 0.0 {
        rect
    } else {
        r
    }
}

fn centered(within: Rect, size: Size) -> Rect {
    let origin = Point::new(
        within.x0 + within.width() / 2.0 - size.width / 2.0,
        within.y0 + within.height() / 2.0 - size.height / 2.0,
    );
    Rect::from_origin_size(origin, size)
}

/// Place a block of the given size inside `rect` per the nine-position
/// alignment, using `padding`/`y_padding` insets at the edges.
fn align_block(size: Size, rect: Rect, padding: f64, y_padding: f64, align: TextAlign) -> Rect {
    let (w, h) = (size.width, size.height);
    let origin = match align {
        TextAlign::Center => Point::new(
            rect.center().x - w / 2.0,
            rect.center().y - h / 2.0,
        ),
        TextAlign::TopLeft => Point::new(rect.x0 + padding, rect.y0 + y_padding),
        TextAlign::TopRight => Point::new(rect.x1 - padding - w, rect.y0 + y_padding),
        TextAlign::BottomLeft => Point::new(rect.x0 + padding, rect.y1 - y_padding - h),
        TextAlign::BottomRight => Point::new(rect.x1 - padding - w, rect.y1 - y_padding - h),
        TextAlign::Left => Point::new(rect.x0 + padding, rect.center().y - h / 2.0),
        TextAlign::Right => Point::new(rect.x1 - padding - w, rect.center().y - h / 2.0),
        TextAlign::Top => Point::new(rect.center().x - w / 2.0, rect.y0 + y_padding),
        TextAlign::Bottom => Point::new(rect.center().x - w / 2.0, rect.y1 - y_padding - h),
    };
    Rect::from_origin_size(origin, size)
}
