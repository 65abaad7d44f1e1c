// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray-cast hit testing: pointer position to topmost interactable node.

use kurbo::Point;

use bracken_scene::{NodeId, Scene};

/// Find the node under `pos`, searching the children of `start`.
///
/// Children are tried in descending z-index order; the first visible,
/// raycastable child whose absolute rect contains the point wins, and its
/// own subtree is searched first so the deepest qualifying node is
/// returned. When nothing in `start` qualifies and `recurse_above` is
/// set, the search retries against `start`'s parent.
#[must_use]
pub fn raycast(scene: &Scene, pos: Point, start: NodeId, recurse_above: bool) -> Option<NodeId> {
    let node = scene.get(start)?;
    if !node.status.visible {
        return None;
    }
    if (!node.absolute.contains(pos) || node.ignores_raycast()) && recurse_above {
        return raycast(scene, pos, node.parent?, true);
    }

    let ordered = scene.children_by_z(start);
    for &child in ordered.iter().rev() {
        let Some(cn) = scene.get(child) else {
            continue;
        };
        if !cn.absolute.contains(pos) || !cn.status.visible || cn.ignores_raycast() {
            continue;
        }
        if !cn.children.is_empty() {
            if let Some(hit) = raycast(scene, pos, child, false) {
                if scene.status(hit).is_some_and(|s| s.visible) {
                    return Some(hit);
                }
            }
        }
        return Some(child);
    }

    if recurse_above {
        return raycast(scene, pos, node.parent?, true);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_scene::{NodeFlags, NodeSpec};
    use bracken_style::Stylesheet;
    use kurbo::{Rect, Size};

    fn scene() -> (Scene, Stylesheet) {
        (Scene::new(Size::new(800.0, 600.0)), Stylesheet::new())
    }

    #[test]
    fn front_most_sibling_wins() {
        let (mut s, sheet) = scene();
        let root = s.root();
        let back = s
            .spawn(root, NodeSpec::new(Rect::new(0.0, 0.0, 100.0, 100.0)), &sheet)
            .unwrap();
        let front = s
            .spawn(
                root,
                NodeSpec::new(Rect::new(50.0, 50.0, 150.0, 150.0)).z_index(1),
                &sheet,
            )
            .unwrap();
        let p = Point::new(75.0, 75.0);
        assert_eq!(raycast(&s, p, root, false), Some(front));
        // Outside the overlap the lower sibling is hit.
        assert_eq!(raycast(&s, Point::new(10.0, 10.0), root, false), Some(back));
    }

    #[test]
    fn deepest_visible_hit_wins() {
        let (mut s, sheet) = scene();
        let root = s.root();
        let outer = s
            .spawn(root, NodeSpec::new(Rect::new(0.0, 0.0, 200.0, 200.0)), &sheet)
            .unwrap();
        let inner = s
            .spawn(outer, NodeSpec::new(Rect::new(10.0, 10.0, 90.0, 90.0)), &sheet)
            .unwrap();
        assert_eq!(raycast(&s, Point::new(20.0, 20.0), root, false), Some(inner));
        // Inside the outer node but outside the inner one.
        assert_eq!(
            raycast(&s, Point::new(150.0, 150.0), root, false),
            Some(outer)
        );
    }

    #[test]
    fn hidden_and_raycast_ignoring_nodes_are_skipped() {
        let (mut s, sheet) = scene();
        let root = s.root();
        let a = s
            .spawn(root, NodeSpec::new(Rect::new(0.0, 0.0, 100.0, 100.0)), &sheet)
            .unwrap();
        let b = s
            .spawn(
                root,
                NodeSpec::new(Rect::new(0.0, 0.0, 100.0, 100.0)).z_index(5),
                &sheet,
            )
            .unwrap();
        s.add_flags(b, NodeFlags::IGNORE_RAYCAST);
        assert_eq!(raycast(&s, Point::new(50.0, 50.0), root, false), Some(a));
        s.hide(a);
        assert_eq!(raycast(&s, Point::new(50.0, 50.0), root, false), None);
    }

    #[test]
    fn upward_recursion_escapes_a_missed_container() {
        let (mut s, sheet) = scene();
        let root = s.root();
        let sibling = s
            .spawn(root, NodeSpec::new(Rect::new(300.0, 0.0, 400.0, 100.0)), &sheet)
            .unwrap();
        let container = s
            .spawn(root, NodeSpec::new(Rect::new(0.0, 0.0, 100.0, 100.0)), &sheet)
            .unwrap();
        // Starting from a container that does not contain the point,
        // recursion retries from its parent and finds the sibling.
        assert_eq!(
            raycast(&s, Point::new(350.0, 50.0), container, true),
            Some(sibling)
        );
        assert_eq!(raycast(&s, Point::new(350.0, 50.0), container, false), None);
    }
}
