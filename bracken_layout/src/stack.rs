// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-stack layout pass.

use kurbo::{Point, Size, Vec2};

use bracken_scene::{Axis, NodeId, Scene, SizeUpdate};
use bracken_style::{ChildAlign, StackAnchor, StackStyle};

/// Main-axis component of a size for the given axis.
fn main(axis: Axis, size: Size) -> f64 {
    match axis {
        Axis::Vertical => size.height,
        Axis::Horizontal => size.width,
    }
}

/// Cross-axis component of a size for the given axis.
fn cross(axis: Axis, size: Size) -> f64 {
    match axis {
        Axis::Vertical => size.width,
        Axis::Horizontal => size.height,
    }
}

/// Build a size from main/cross components.
fn size_of(axis: Axis, main_extent: f64, cross_extent: f64) -> Size {
    match axis {
        Axis::Vertical => Size::new(cross_extent, main_extent),
        Axis::Horizontal => Size::new(main_extent, cross_extent),
    }
}

/// Build a point from main/cross components.
fn point_of(axis: Axis, main_pos: f64, cross_pos: f64) -> Point {
    match axis {
        Axis::Vertical => Point::new(cross_pos, main_pos),
        Axis::Horizontal => Point::new(main_pos, cross_pos),
    }
}

/// Per-axis scrollbar reservations in x/y terms: `.0` is the width the
/// vertical bar reserves, `.1` the height the horizontal bar reserves.
fn reservations(style: &StackStyle, content: Size, container: Size) -> (bool, bool, f64, f64) {
    if style.floating_scrollbars {
        return (false, false, 0.0, 0.0);
    }
    let sb = style.scrollbar_size;
    let v_allowed = style.scroll_y && !style.grow_y;
    let h_allowed = style.scroll_x && !style.grow_x;

    // Vertical first, then horizontal against the reduced width, then a
    // re-check: a horizontal bar eats height and may force the vertical
    // bar after all.
    let mut vscroll = v_allowed && content.height > container.height;
    let mut sx = if vscroll { sb } else { 0.0 };
    let hscroll = h_allowed && content.width > container.width - sx;
    let sy = if hscroll { sb } else { 0.0 };
    if hscroll && !vscroll {
        vscroll = v_allowed && content.height > container.height - sy;
        if vscroll {
            sx = sb;
        }
    }
    (vscroll, hscroll, sx, sy)
}

/// Run the box-layout pass for one stack container.
///
/// A no-op for stale ids, non-stacks, and nodes inside an open batch
/// scope. Resizing the container here (grow/shrink) deliberately does not
/// re-enter this pass; the queue re-runs it if anything else changed.
pub fn refresh(scene: &mut Scene, id: NodeId) {
    let Some(node) = scene.get(id) else {
        return;
    };
    let Some(stack) = node.stack.as_ref() else {
        return;
    };
    let axis = stack.axis;
    if scene.in_batch(id) {
        return;
    }
    let style: StackStyle = scene.style(id).map(|s| s.stack.clone()).unwrap_or_default();
    let container = node.relative.size();
    let children: Vec<NodeId> = node.children.clone();

    // Measure pass: accumulate main-axis extents plus spacing for fixed
    // children, track the cross-axis maximum among non-fill-cross ones,
    // and collect the fill-main children for distribution.
    let mut total_main = style.padding;
    let mut total_cross = 0.0_f64;
    let mut active_children = 0_usize;
    let mut placed = 0_usize;
    let mut fill_main: Vec<NodeId> = Vec::new();
    for &child in &children {
        let Some(cn) = scene.get(child) else {
            continue;
        };
        if cn.ignores_stack() || !cn.status.visible {
            continue;
        }
        let child_size = cn.relative.size();
        let child_stack = scene
            .style(child)
            .map(|s| s.stack.clone())
            .unwrap_or_default();
        let (fill_m, fill_c) = match axis {
            Axis::Vertical => (child_stack.fill_y, child_stack.fill_x),
            Axis::Horizontal => (child_stack.fill_x, child_stack.fill_y),
        };
        if !fill_c && cross(axis, child_size) > total_cross {
            total_cross = cross(axis, child_size);
        }
        if fill_m {
            active_children += 1;
            fill_main.push(child);
            continue;
        }
        if placed > 0 {
            total_main += style.spacing;
        }
        total_main += main(axis, child_size);
        active_children += 1;
        placed += 1;
    }
    total_main += style.padding;
    total_cross += style.padding * 2.0;

    // Fill children may consume the whole container even when the fixed
    // content is smaller.
    let fixed_total_main = total_main;
    if !fill_main.is_empty() && total_main < main(axis, container) {
        total_main = main(axis, container);
    }

    // Cross-axis container resize. The main axis resolves in the position
    // step, after scrollbars are known.
    let (grow_c, shrink_c) = match axis {
        Axis::Vertical => (style.grow_x, style.shrink_x),
        Axis::Horizontal => (style.grow_y, style.shrink_y),
    };
    if (total_cross < cross(axis, container) && shrink_c)
        || (total_cross > cross(axis, container) && grow_c)
    {
        scene.set_size_with(
            id,
            size_of(axis, main(axis, container), total_cross),
            SizeUpdate {
                propagate_up: true,
                apply_anchors: true,
                refresh_self: false,
            },
        );
    }
    let container = scene.relative_rect(id).map(|r| r.size()).unwrap_or(container);

    let content = size_of(axis, total_main, total_cross);
    let (vscroll, hscroll, sx, sy) = reservations(&style, content, container);
    let total = Size::new(content.width + sx, content.height + sy);
    let (main_reserve, cross_reserve) = match axis {
        Axis::Vertical => (sy, sx),
        Axis::Horizontal => (sx, sy),
    };

    if let Some(state) = scene.stack_mut(id) {
        state.content = content;
        state.total = total;
        state.vscroll_visible = vscroll;
        state.hscroll_visible = hscroll;
    }

    // Content that fits suppresses the bar and resets its scroll offset.
    let mut scroll = scene.get(id).map(|n| n.scroll_offset).unwrap_or(Vec2::ZERO);
    if !hscroll {
        scroll.x = 0.0;
    }
    if !vscroll {
        scroll.y = 0.0;
    }
    scene.set_scroll(id, scroll);

    // Distribute the leftover main-axis space among fill children.
    if !fill_main.is_empty() {
        let mut available = main(axis, container) - fixed_total_main - main_reserve;
        available -= style.spacing * (fill_main.len() as f64 - 1.0);
        if available < 0.0 {
            available = 0.0;
        }
        let each = available / fill_main.len() as f64;
        for &child in &fill_main {
            let Some(child_size) = scene.relative_rect(child).map(|r| r.size()) else {
                continue;
            };
            // Sizing children from inside the pass must not re-queue it.
            scene.set_size_with(
                child,
                size_of(axis, each, cross(axis, child_size)),
                SizeUpdate {
                    propagate_up: false,
                    apply_anchors: true,
                    refresh_self: true,
                },
            );
        }
    }

    // Max-spacing redistributes leftover space as extra inter-child gaps.
    let mut spacing = style.spacing;
    let mut total_main = main(axis, scene.stack(id).map(|s| s.content).unwrap_or(content));
    if style.anchor == StackAnchor::MaxSpacing && total_main < main(axis, container) - main_reserve
    {
        let remaining = main(axis, container) - main_reserve - total_main;
        total_main = main(axis, container) - main_reserve;
        let gaps = (active_children.saturating_sub(1)).max(1) as f64;
        spacing = remaining / gaps + style.padding / gaps;
    }

    // Resolve the container main extent (shrink/grow) or pick the content
    // anchor offset, then walk children assigning positions.
    let (grow_m, shrink_m) = match axis {
        Axis::Vertical => (style.grow_y, style.shrink_y),
        Axis::Horizontal => (style.grow_x, style.shrink_x),
    };
    let mut cursor = 0.0_f64;
    if total_main < main(axis, container) - main_reserve {
        if shrink_m {
            scene.set_size_with(
                id,
                size_of(axis, total_main, cross(axis, container)),
                SizeUpdate {
                    propagate_up: true,
                    apply_anchors: true,
                    refresh_self: false,
                },
            );
        } else {
            cursor = match style.anchor {
                StackAnchor::Center => {
                    (main(axis, container) - main_reserve) / 2.0 - total_main / 2.0
                }
                StackAnchor::End => (main(axis, container) - main_reserve) - total_main,
                StackAnchor::Start | StackAnchor::MaxSpacing => 0.0,
            };
        }
    } else if total_main > main(axis, container) && grow_m {
        scene.set_size_with(
            id,
            size_of(axis, total_main, cross(axis, container)),
            SizeUpdate {
                propagate_up: true,
                apply_anchors: true,
                refresh_self: false,
            },
        );
    }
    let container = scene.relative_rect(id).map(|r| r.size()).unwrap_or(container);
    cursor += style.padding;

    let mut first = true;
    for &child in &children {
        let Some(cn) = scene.get(child) else {
            continue;
        };
        if cn.ignores_stack() || !cn.status.visible {
            continue;
        }
        if !first {
            cursor += spacing;
        }
        let child_size = cn.relative.size();
        let child_stack = scene
            .style(child)
            .map(|s| s.stack.clone())
            .unwrap_or_default();
        let (fill_c, align) = match axis {
            Axis::Vertical => (child_stack.fill_x, child_stack.align),
            Axis::Horizontal => (child_stack.fill_y, child_stack.align),
        };
        let mut cross_pos = style.padding;
        if fill_c {
            scene.set_size_with(
                child,
                size_of(
                    axis,
                    main(axis, child_size),
                    cross(axis, container) - style.padding * 2.0 - cross_reserve,
                ),
                SizeUpdate {
                    propagate_up: false,
                    apply_anchors: true,
                    refresh_self: true,
                },
            );
        } else if cross(axis, child_size) < cross(axis, container) - cross_reserve {
            cross_pos = match align {
                ChildAlign::Center => {
                    (cross(axis, container) - cross_reserve) / 2.0 - cross(axis, child_size) / 2.0
                }
                ChildAlign::End => {
                    (cross(axis, container) - cross_reserve)
                        - cross(axis, child_size)
                        - style.padding
                }
                ChildAlign::Start => style.padding,
            };
        }
        scene.set_relative_pos(child, point_of(axis, cursor, cross_pos));
        let advanced = scene
            .relative_rect(child)
            .map(|r| r.size())
            .unwrap_or(child_size);
        cursor += main(axis, advanced);
        first = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_scene::NodeSpec;
    use bracken_style::{Facet, Selector, StyleRule, StyleState, StyleValue, Stylesheet};
    use kurbo::Rect;

    fn stack_rule(selector: Selector, prop: &str, value: StyleValue) -> StyleRule {
        StyleRule {
            selector,
            state: StyleState::Normal,
            facet: Facet::Stack,
            property: prop.into(),
            value,
        }
    }

    /// Stylesheet with fixed (non-fill) children and explicit container
    /// padding/spacing, the shape most tests want.
    fn sheet(padding: f64, spacing: f64) -> Stylesheet {
        let mut sheet = Stylesheet::new();
        sheet
            .add_rules([
                stack_rule(
                    Selector::ElementType("element".into()),
                    "fill_y",
                    StyleValue::Bool(false),
                ),
                stack_rule(
                    Selector::ElementType("element".into()),
                    "fill_x",
                    StyleValue::Bool(false),
                ),
                stack_rule(
                    Selector::ElementType("stack".into()),
                    "padding",
                    StyleValue::Float(padding),
                ),
                stack_rule(
                    Selector::ElementType("stack".into()),
                    "spacing",
                    StyleValue::Float(spacing),
                ),
            ])
            .unwrap();
        sheet
    }

    fn vstack(scene: &mut Scene, sheet: &Stylesheet, size: Size) -> NodeId {
        scene
            .spawn(
                scene.root(),
                NodeSpec::stack(Rect::from_origin_size(Point::ZERO, size), Axis::Vertical),
                sheet,
            )
            .unwrap()
    }

    fn child(scene: &mut Scene, sheet: &Stylesheet, parent: NodeId, size: Size) -> NodeId {
        scene
            .spawn(
                parent,
                NodeSpec::new(Rect::from_origin_size(Point::ZERO, size)),
                sheet,
            )
            .unwrap()
    }

    #[test]
    fn content_is_sum_of_children_spacing_and_padding() {
        let sheet = sheet(7.0, 4.0);
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = vstack(&mut scene, &sheet, Size::new(200.0, 400.0));
        for h in [10.0, 20.0, 30.0] {
            child(&mut scene, &sheet, stack, Size::new(50.0, h));
        }
        crate::flush(&mut scene);

        let state = scene.stack(stack).unwrap();
        // Σhᵢ + s·(N−1) + 2p = 60 + 8 + 14.
        assert_eq!(state.content.height, 82.0);
        // Cross content: widest child plus padding on both sides.
        assert_eq!(state.content.width, 64.0);
        // No growth/shrink: the container keeps its size.
        assert_eq!(
            scene.relative_rect(stack).unwrap().size(),
            Size::new(200.0, 400.0)
        );
    }

    #[test]
    fn fill_child_takes_the_remaining_space() {
        let mut sheet = sheet(0.0, 0.0);
        sheet
            .add_rule(stack_rule(
                Selector::StyleIdToken("fill".into()),
                "fill_y",
                StyleValue::Bool(true),
            ))
            .unwrap();
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = vstack(&mut scene, &sheet, Size::new(100.0, 500.0));
        child(&mut scene, &sheet, stack, Size::new(50.0, 300.0));
        let filler = scene
            .spawn(
                stack,
                NodeSpec::new(Rect::new(0.0, 0.0, 50.0, 10.0)).style_id("fill"),
                &sheet,
            )
            .unwrap();
        crate::flush(&mut scene);

        assert_eq!(scene.relative_rect(filler).unwrap().height(), 200.0);
    }

    #[test]
    fn empty_stack_reports_padding_only_content() {
        let sheet = sheet(7.0, 5.0);
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = vstack(&mut scene, &sheet, Size::new(200.0, 200.0));
        crate::flush(&mut scene);

        let state = scene.stack(stack).unwrap();
        assert_eq!(state.content, Size::new(14.0, 14.0));
        assert_eq!(state.total, Size::new(14.0, 14.0));
        assert!(!state.vscroll_visible);
        assert!(!state.hscroll_visible);
        assert_eq!(
            scene.relative_rect(stack).unwrap().size(),
            Size::new(200.0, 200.0)
        );
    }

    #[test]
    fn start_anchored_children_are_positioned_in_order() {
        let mut sheet = sheet(7.0, 4.0);
        sheet
            .add_rule(stack_rule(
                Selector::ElementType("stack".into()),
                "anchor",
                StyleValue::Str("start".into()),
            ))
            .unwrap();
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = vstack(&mut scene, &sheet, Size::new(200.0, 400.0));
        let a = child(&mut scene, &sheet, stack, Size::new(50.0, 10.0));
        let b = child(&mut scene, &sheet, stack, Size::new(50.0, 20.0));
        crate::flush(&mut scene);

        // Main axis: padding, then extent plus spacing. Cross axis:
        // default centered alignment.
        assert_eq!(
            scene.relative_rect(a).unwrap().origin(),
            Point::new(75.0, 7.0)
        );
        assert_eq!(
            scene.relative_rect(b).unwrap().origin(),
            Point::new(75.0, 21.0)
        );
    }

    #[test]
    fn oversized_content_shows_the_vertical_scrollbar() {
        let sheet = sheet(0.0, 0.0);
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = vstack(&mut scene, &sheet, Size::new(100.0, 100.0));
        child(&mut scene, &sheet, stack, Size::new(50.0, 300.0));
        crate::flush(&mut scene);

        let state = scene.stack(stack).unwrap();
        assert!(state.vscroll_visible);
        assert!(!state.hscroll_visible);
        assert_eq!(state.total.width, state.content.width + 10.0);

        let (track, handle) = crate::v_scrollbar_rects(&scene, stack).unwrap();
        assert_eq!(track, Rect::new(90.0, 0.0, 100.0, 100.0));
        assert!(handle.height() >= crate::MIN_HANDLE_EXTENT);
        assert!(handle.height() <= track.height());
    }

    #[test]
    fn fitting_content_resets_the_scroll_offset() {
        let sheet = sheet(0.0, 0.0);
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = vstack(&mut scene, &sheet, Size::new(100.0, 100.0));
        let big = child(&mut scene, &sheet, stack, Size::new(50.0, 300.0));
        crate::flush(&mut scene);
        scene.set_scroll(stack, kurbo::Vec2::new(0.0, 120.0));
        assert_eq!(scene.get(stack).unwrap().scroll_offset.y, 120.0);

        // Shrinking the child makes the content fit again.
        scene.set_size(big, Size::new(50.0, 40.0));
        crate::flush(&mut scene);
        assert!(!scene.stack(stack).unwrap().vscroll_visible);
        assert_eq!(scene.get(stack).unwrap().scroll_offset.y, 0.0);
    }

    #[test]
    fn grow_containers_resize_to_content_without_scrollbars() {
        let mut sheet = sheet(0.0, 0.0);
        sheet
            .add_rule(stack_rule(
                Selector::StyleIdToken("grower".into()),
                "grow_y",
                StyleValue::Bool(true),
            ))
            .unwrap();
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = scene
            .spawn(
                scene.root(),
                NodeSpec::stack(Rect::new(0.0, 0.0, 100.0, 50.0), Axis::Vertical)
                    .style_id("grower"),
                &sheet,
            )
            .unwrap();
        child(&mut scene, &sheet, stack, Size::new(50.0, 300.0));
        crate::flush(&mut scene);

        assert_eq!(scene.relative_rect(stack).unwrap().height(), 300.0);
        assert!(!scene.stack(stack).unwrap().vscroll_visible);
    }

    #[test]
    fn max_spacing_redistributes_leftover_space() {
        let mut sheet = sheet(0.0, 0.0);
        sheet
            .add_rule(stack_rule(
                Selector::ElementType("stack".into()),
                "anchor",
                StyleValue::Str("max_spacing".into()),
            ))
            .unwrap();
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = vstack(&mut scene, &sheet, Size::new(100.0, 100.0));
        let a = child(&mut scene, &sheet, stack, Size::new(50.0, 10.0));
        let b = child(&mut scene, &sheet, stack, Size::new(50.0, 10.0));
        crate::flush(&mut scene);

        assert_eq!(scene.relative_rect(a).unwrap().origin().y, 0.0);
        assert_eq!(scene.relative_rect(b).unwrap().origin().y, 90.0);
    }

    #[test]
    fn hidden_and_stack_ignoring_children_are_skipped() {
        let sheet = sheet(0.0, 0.0);
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = vstack(&mut scene, &sheet, Size::new(100.0, 100.0));
        let a = child(&mut scene, &sheet, stack, Size::new(50.0, 10.0));
        let b = child(&mut scene, &sheet, stack, Size::new(50.0, 10.0));
        scene.hide(a);
        scene.add_flags(b, bracken_scene::NodeFlags::IGNORE_STACK);
        crate::flush(&mut scene);

        assert_eq!(scene.stack(stack).unwrap().content.height, 0.0);
    }

    #[test]
    fn horizontal_stacks_mirror_the_vertical_algorithm() {
        let sheet = sheet(7.0, 4.0);
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let stack = scene
            .spawn(
                scene.root(),
                NodeSpec::stack(Rect::new(0.0, 0.0, 400.0, 200.0), Axis::Horizontal),
                &sheet,
            )
            .unwrap();
        for w in [10.0, 20.0, 30.0] {
            child(&mut scene, &sheet, stack, Size::new(w, 50.0));
        }
        crate::flush(&mut scene);

        let state = scene.stack(stack).unwrap();
        assert_eq!(state.content.width, 82.0);
        assert_eq!(state.content.height, 64.0);
    }
}
