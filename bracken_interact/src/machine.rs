// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame interaction state machine.

use kurbo::{Point, Size, Vec2};
use tracing::trace;

use bracken_scene::{EventKind, NodeFlags, NodeId, Scene, SizeUpdate};
use bracken_style::TextMeasure;

use crate::input::InputSnapshot;
use crate::raycast::raycast;
use crate::textsel::{click_index, selection_rects};

/// Wheel-step to pixel multiplier.
const SCROLL_MULTIPLIER: f64 = 12.0;

/// Tracks the globally-unique interaction states across frames: the
/// hovered node, the left- and right-pressed nodes, the optional keyboard
/// navigation target, the scroll-hover association, and the text-selection
/// anchor.
///
/// Exactly one [`Interaction::frame`] call consumes each input snapshot.
/// Transitions are evaluated in a fixed priority order: text-selection
/// drag, then an active left press, then an active right press, then hover
/// re-evaluation. The per-node logic walk (ghost following, style
/// re-selection, drag and resize application) runs afterwards in the same
/// call.
#[derive(Default)]
pub struct Interaction {
    /// Currently hovered node.
    pub hovered: Option<NodeId>,
    /// Node holding an active left press.
    pub pressed: Option<NodeId>,
    /// Node holding an active right press.
    pub right_pressed: Option<NodeId>,
    keyboard_target: Option<NodeId>,
    scroll_hovered: Option<NodeId>,
    text_select: Option<NodeId>,
}

impl std::fmt::Debug for Interaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interaction")
            .field("hovered", &self.hovered)
            .field("pressed", &self.pressed)
            .field("right_pressed", &self.right_pressed)
            .field("keyboard_target", &self.keyboard_target)
            .finish_non_exhaustive()
    }
}

impl Interaction {
    /// A fresh machine with no active states.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyboard navigation target; it pre-empts ray-casting until
    /// cleared.
    pub fn set_keyboard_target(&mut self, target: Option<NodeId>) {
        self.keyboard_target = target;
    }

    /// The active keyboard navigation target.
    #[must_use]
    pub fn keyboard_target(&self) -> Option<NodeId> {
        self.keyboard_target
    }

    /// The stack currently receiving wheel input, if any.
    #[must_use]
    pub fn scroll_hovered(&self) -> Option<NodeId> {
        self.scroll_hovered
    }

    /// The node owning the active text selection, if any.
    #[must_use]
    pub fn text_selecting(&self) -> Option<NodeId> {
        self.text_select
    }

    /// Run one frame: state-machine transitions, wheel routing, then the
    /// per-node logic walk.
    pub fn frame(&mut self, scene: &mut Scene, input: &InputSnapshot, measure: &dyn TextMeasure) {
        self.drop_stale(scene);
        self.track_text_selection(scene, input, measure);

        if let Some(pressed) = self.pressed {
            self.drive_left_press(scene, input, pressed);
        } else if let Some(pressed) = self.right_pressed {
            self.drive_right_press(scene, input, pressed);
        } else {
            self.reevaluate_hover(scene, input, measure);
        }

        self.route_wheel(scene, input);
        let root = scene.root();
        self.logic_walk(scene, input, root);
    }

    /// Clear any tracked node that died since last frame.
    fn drop_stale(&mut self, scene: &Scene) {
        for slot in [
            &mut self.hovered,
            &mut self.pressed,
            &mut self.right_pressed,
            &mut self.keyboard_target,
            &mut self.scroll_hovered,
            &mut self.text_select,
        ] {
            if slot.is_some_and(|id| !scene.is_alive(id)) {
                *slot = None;
            }
        }
    }

    // --- text selection ---

    /// Track the moving end point of an active selection and rebuild the
    /// selection rectangles when the indices changed.
    fn track_text_selection(
        &mut self,
        scene: &mut Scene,
        input: &InputSnapshot,
        measure: &dyn TextMeasure,
    ) {
        let Some(id) = self.text_select else {
            return;
        };
        let Some(text) = scene.text(id) else {
            return;
        };
        let Some(start) = text.selection_start else {
            return;
        };
        let font = scene
            .style(id)
            .map(|s| s.text.font.clone())
            .unwrap_or_default();
        let width = scene.relative_rect(id).map(|r| r.width()).unwrap_or(0.0);
        let lines = measure.wrap(&font, &text.text.clone(), width);
        let text_rect = text.text_rect;
        let abs_origin = scene
            .absolute_rect(id)
            .map(|r| r.origin())
            .unwrap_or(Point::ZERO);

        if input.left_down {
            if let Some(end) =
                click_index(measure, &font, &lines, input.pointer, text_rect, abs_origin)
            {
                let changed = scene.text(id).and_then(|t| t.selection_end) != Some(end);
                if changed {
                    if let Some(t) = scene.text_mut(id) {
                        t.selection_end = Some(end);
                    }
                    scene.emit(id, EventKind::TextSelectionChange);
                }
            }
        }

        let Some(end) = scene.text(id).and_then(|t| t.selection_end) else {
            return;
        };
        if input.left_down {
            // While held, the caret tracks the moving end of the span.
            let cursor = if end.abs_i > start.abs_i {
                end.abs_i + 1
            } else {
                end.abs_i
            };
            if let Some(t) = scene.text_mut(id) {
                t.cursor = cursor;
            }
        }
        let caret_eligible = input.pointer_delta.hypot() != 0.0 && input.left_down;
        let rects = selection_rects(measure, &font, start, end, &lines, text_rect, caret_eligible);
        if !rects.is_empty()
            && scene.text(id).map(|t| t.selection_rects.as_slice()) != Some(rects.as_slice())
        {
            if let Some(t) = scene.text_mut(id) {
                t.selection_rects = rects;
            }
            scene.set_dirty(id);
            scene.emit(id, EventKind::TextSelectionChange);
        }
    }

    /// Begin selection tracking on press over a selectable text node.
    fn text_select_start(
        &mut self,
        scene: &mut Scene,
        input: &InputSnapshot,
        measure: &dyn TextMeasure,
        id: NodeId,
    ) {
        if !scene.text(id).is_some_and(|t| t.selectable) {
            return;
        }
        if let Some(old) = self.text_select {
            if let Some(t) = scene.text_mut(old) {
                t.selection_rects.clear();
                t.selection_start = None;
                t.selection_end = None;
            }
            scene.set_dirty(old);
        }
        self.text_select = None;
        let Some(text) = scene.text(id) else {
            return;
        };
        if text.text.is_empty() {
            return;
        }
        let font = scene
            .style(id)
            .map(|s| s.text.font.clone())
            .unwrap_or_default();
        let width = scene.relative_rect(id).map(|r| r.width()).unwrap_or(0.0);
        let lines = measure.wrap(&font, &text.text.clone(), width);
        let abs_origin = scene
            .absolute_rect(id)
            .map(|r| r.origin())
            .unwrap_or(Point::ZERO);
        let text_rect = scene.text(id).map(|t| t.text_rect).unwrap_or_default();
        let Some(start) =
            click_index(measure, &font, &lines, input.pointer, text_rect, abs_origin)
        else {
            return;
        };
        self.text_select = Some(id);
        if let Some(t) = scene.text_mut(id) {
            t.selection_start = Some(start);
            t.selection_end = None;
        }
        scene.emit(id, EventKind::TextSelectionChange);
    }

    // --- press states ---

    fn drive_left_press(&mut self, scene: &mut Scene, input: &InputSnapshot, pressed: NodeId) {
        scene.emit(pressed, EventKind::Pressed);
        let over = scene
            .absolute_rect(pressed)
            .is_some_and(|r| r.contains(input.pointer));
        if let Some(status) = scene.status_mut(pressed) {
            status.hovered = over;
        }
        let keyboard_held = self.keyboard_target == Some(pressed);
        let released = if keyboard_held {
            !input.activate_key_down
        } else {
            !input.left_down
        };
        if !released {
            return;
        }
        trace!("left press released");
        if let Some(status) = scene.status_mut(pressed) {
            status.pressed = false;
        }
        scene.emit(pressed, EventKind::StopPress);
        scene.emit(pressed, EventKind::Click);
        if scene
            .get(pressed)
            .is_some_and(|n| n.flags.contains(NodeFlags::CAN_SELECT))
        {
            let was_selected = scene.status(pressed).is_some_and(|s| s.selected);
            if let Some(status) = scene.status_mut(pressed) {
                status.selected = !was_selected;
            }
            scene.emit(
                pressed,
                if was_selected {
                    EventKind::Deselect
                } else {
                    EventKind::Select
                },
            );
        }
        self.pressed = None;
    }

    fn drive_right_press(&mut self, scene: &mut Scene, input: &InputSnapshot, pressed: NodeId) {
        scene.emit(pressed, EventKind::RightPressed);
        let over = scene
            .absolute_rect(pressed)
            .is_some_and(|r| r.contains(input.pointer));
        if let Some(status) = scene.status_mut(pressed) {
            status.hovered = over;
        }
        if input.right_down {
            return;
        }
        if let Some(status) = scene.status_mut(pressed) {
            status.right_pressed = false;
        }
        scene.emit(pressed, EventKind::StopRightPress);
        scene.emit(pressed, EventKind::RightClick);
        self.right_pressed = None;
    }

    // --- hover ---

    fn reevaluate_hover(
        &mut self,
        scene: &mut Scene,
        input: &InputSnapshot,
        measure: &dyn TextMeasure,
    ) {
        let hit = if let Some(target) = self.keyboard_target {
            Some(target)
        } else {
            raycast(scene, input.pointer, scene.root(), false)
        };

        if let Some(old) = self.hovered {
            if hit != Some(old) {
                if let Some(status) = scene.status_mut(old) {
                    status.hovered = false;
                }
                scene.emit(old, EventKind::StopHover);
                if let Some(sh) = self.scroll_hovered.take() {
                    if let Some(status) = scene.status_mut(sh) {
                        status.scroll_hovered = false;
                    }
                }
            }
        }
        self.hovered = hit;
        let Some(hovered) = self.hovered else {
            return;
        };

        if !scene.status(hovered).is_some_and(|s| s.hovered) {
            if let Some(status) = scene.status_mut(hovered) {
                status.hovered = true;
                status.hover_start_ms = input.now_ms;
            }
            scene.emit(hovered, EventKind::StartHover);
            self.mark_scroll_hovered(scene, hovered);
        }
        scene.emit(hovered, EventKind::Hovered);

        let keyboard_press = input.activate_key_down && self.keyboard_target == Some(hovered);
        if input.left_down || keyboard_press {
            if !scene.status(hovered).is_some_and(|s| s.pressed) {
                if let Some(status) = scene.status_mut(hovered) {
                    status.pressed = true;
                    status.press_start_ms = input.now_ms;
                }
                scene.emit(hovered, EventKind::StartPress);
                self.pressed = Some(hovered);
                self.text_select_start(scene, input, measure, hovered);
            }
        } else if input.right_down
            && !scene.status(hovered).is_some_and(|s| s.right_pressed)
        {
            if let Some(status) = scene.status_mut(hovered) {
                status.right_pressed = true;
                status.right_press_start_ms = input.now_ms;
            }
            scene.emit(hovered, EventKind::StartRightPress);
            self.right_pressed = Some(hovered);
        }
    }

    /// Mark the nearest ancestor stack (or the node itself) with a visible
    /// scrollbar as the wheel-input target.
    fn mark_scroll_hovered(&mut self, scene: &mut Scene, from: NodeId) {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let is_scrollable = scene
                .stack(id)
                .is_some_and(|s| s.vscroll_visible || s.hscroll_visible);
            if is_scrollable {
                if let Some(status) = scene.status_mut(id) {
                    status.scroll_hovered = true;
                }
                self.scroll_hovered = Some(id);
                return;
            }
            cursor = scene.parent_of(id);
        }
    }

    /// Route wheel input to the scroll-hovered stack.
    fn route_wheel(&mut self, scene: &mut Scene, input: &InputSnapshot) {
        if input.wheel == Vec2::ZERO {
            return;
        }
        let Some(target) = self.scroll_hovered else {
            return;
        };
        let Some(stack) = scene.stack(target) else {
            return;
        };
        let (vscroll, hscroll) = (stack.vscroll_visible, stack.hscroll_visible);
        let mut offset = scene.get(target).map(|n| n.scroll_offset).unwrap_or_default();
        if vscroll && !input.ctrl_down {
            offset.y -= input.wheel.y * SCROLL_MULTIPLIER;
        } else if hscroll {
            offset.x -= input.wheel.y * SCROLL_MULTIPLIER;
        }
        if hscroll {
            offset.x -= input.wheel.x * SCROLL_MULTIPLIER;
        }
        scene.set_scroll(target, offset);
    }

    // --- logic walk ---

    /// Depth-first, ascending-z logic pass: ghost following, style
    /// re-selection from status, resize handle application, dragging.
    fn logic_walk(&mut self, scene: &mut Scene, input: &InputSnapshot, id: NodeId) {
        let Some(node) = scene.get(id) else {
            return;
        };
        if !node.status.visible {
            return;
        }

        // A ghosted node re-centers onto its ghost each frame.
        if let Some(ghost) = node.ghost {
            if let (Some(ghost_rect), Some(rect)) =
                (scene.relative_rect(ghost), scene.relative_rect(id))
            {
                let offset = scene.get(id).map(|n| n.ghost_offset).unwrap_or_default();
                let center = ghost_rect.center();
                scene.set_relative_pos(
                    id,
                    Point::new(
                        center.x - rect.width() / 2.0 + offset.x,
                        center.y - rect.height() / 2.0 + offset.y,
                    ),
                );
            }
        }

        for child in scene.children_by_z(id) {
            self.logic_walk(scene, input, child);
        }
        if !scene.is_alive(id) {
            return;
        }

        let desired = scene.desired_style_state(id);
        scene.set_style_state(id, desired);

        self.apply_resizers(scene, input, id);
        self.apply_drag(scene, input, id);
    }

    /// While a resize handle is pressed, translate the owner's size (and
    /// position, for near-side edges) by the pointer delta, clamped to the
    /// configured bounds.
    fn apply_resizers(&mut self, scene: &mut Scene, input: &InputSnapshot, id: NodeId) {
        let delta = input.pointer_delta;
        if delta.hypot() == 0.0 {
            return;
        }
        let Some(node) = scene.get(id) else {
            return;
        };
        if node.resizer_nodes.is_empty() {
            return;
        }
        let handles = node.resizer_nodes.clone();
        let min = node.resize_min.unwrap_or(Size::ZERO);
        let max = node
            .resize_max
            .unwrap_or(Size::new(f64::INFINITY, f64::INFINITY));
        for (edge, handle) in handles {
            if !scene.status(handle).is_some_and(|s| s.pressed) {
                continue;
            }
            let (mut dx, mut dy, mut px, mut py) = (0.0, 0.0, 0.0, 0.0);
            if edge.touches_left() {
                dx = -delta.x;
                px = delta.x;
            } else if edge.touches_right() {
                dx = delta.x;
            }
            if edge.touches_top() {
                dy = -delta.y;
                py = delta.y;
            } else if edge.touches_bottom() {
                dy = delta.y;
            }
            let Some(rect) = scene.relative_rect(id) else {
                continue;
            };
            let new_size = Size::new(
                (rect.width() + dx).clamp(min.width, max.width),
                (rect.height() + dy).clamp(min.height, max.height),
            );
            if new_size.width == rect.width() {
                px = 0.0;
            }
            if new_size.height == rect.height() {
                py = 0.0;
            }
            if px != 0.0 || py != 0.0 {
                scene.set_relative_pos(id, Point::new(rect.x0 + px, rect.y0 + py));
            }
            if new_size != rect.size() {
                scene.set_size_with(id, new_size, SizeUpdate::default());
                scene.emit(id, EventKind::Resize);
            }
        }
    }

    /// While a drag-capable node is pressed, translate it by the pointer
    /// delta.
    fn apply_drag(&mut self, scene: &mut Scene, input: &InputSnapshot, id: NodeId) {
        let Some(node) = scene.get(id) else {
            return;
        };
        let draggable = node.flags.contains(NodeFlags::CAN_DRAG);
        if draggable && node.status.pressed {
            if let Some(status) = scene.status_mut(id) {
                status.dragging = true;
            }
            if input.pointer_delta.hypot() != 0.0 {
                let rect = scene.relative_rect(id).unwrap_or_default();
                scene.set_relative_pos(
                    id,
                    Point::new(
                        rect.x0 + input.pointer_delta.x,
                        rect.y0 + input.pointer_delta.y,
                    ),
                );
                scene.emit(id, EventKind::Drag);
            }
        } else if let Some(status) = scene.status_mut(id) {
            status.dragging = false;
        }
    }
}
