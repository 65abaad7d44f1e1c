// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascade resolution: from a node's identity to a [`StyleGroup`].

use tracing::trace;

use crate::props::{Style, StyleGroup, StyleState};
use crate::rules::{apply_prop, Selector, StyleRule, Stylesheet};

/// A borrowed view of the identity a node exposes to the cascade.
#[derive(Copy, Clone, Debug)]
pub struct StyleQuery<'a> {
    /// Type tags, in declaration order.
    pub element_types: &'a [String],
    /// Semicolon-joined style-id string.
    pub style_id: &'a str,
    /// Unique element id.
    pub element_id: &'a str,
}

impl Stylesheet {
    /// Resolve the three snapshots for a node identity.
    #[must_use]
    pub fn resolve_group(&self, query: StyleQuery<'_>) -> StyleGroup {
        StyleGroup {
            normal: self.resolve(query, StyleState::Normal),
            hover: self.resolve(query, StyleState::Hover),
            press: self.resolve(query, StyleState::Press),
        }
    }

    /// Resolve one snapshot for a node identity.
    ///
    /// Starts from [`Style::baseline`], then applies matching rules in the
    /// specificity ladder: type tags (tag declaration order, registration
    /// order within a tag), style-id tokens (registration order), element
    /// id (registration order). Later writes win per property.
    #[must_use]
    pub fn resolve(&self, query: StyleQuery<'_>, state: StyleState) -> Style {
        let mut style = Style::baseline(state);
        let mut text_touched = false;

        let mut apply = |style: &mut Style, rule: &StyleRule| {
            // Rules are validated when registered, so application is total.
            apply_prop(style, rule.facet, &rule.property, &rule.value)
                .expect("rule validated at registration");
            if rule.facet == crate::rules::Facet::Text {
                text_touched = true;
            }
        };

        for tag in query.element_types {
            for rule in &self.rules {
                if rule.state != state {
                    continue;
                }
                if matches!(&rule.selector, Selector::ElementType(t) if t == tag) {
                    apply(&mut style, rule);
                }
            }
        }
        for rule in &self.rules {
            if rule.state != state {
                continue;
            }
            if matches!(&rule.selector, Selector::StyleIdToken(t) if query.style_id.contains(t.as_str()))
            {
                apply(&mut style, rule);
            }
        }
        for rule in &self.rules {
            if rule.state != state {
                continue;
            }
            if matches!(&rule.selector, Selector::ElementId(id) if id == query.element_id) {
                apply(&mut style, rule);
            }
        }

        if text_touched {
            style.text.build_font();
        }
        trace!(element_id = query.element_id, ?state, "style resolved");
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::rules::{Facet, StyleValue};

    fn types(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| (*t).into()).collect()
    }

    fn bg_rule(selector: Selector, color: Rgba) -> StyleRule {
        StyleRule {
            selector,
            state: StyleState::Normal,
            facet: Facet::Background,
            property: "color".into(),
            value: StyleValue::Color(color),
        }
    }

    #[test]
    fn element_id_beats_type_regardless_of_registration_order() {
        let mut sheet = Stylesheet::new();
        // The more specific rule is registered first on purpose.
        sheet
            .add_rule(bg_rule(Selector::ElementId("submit".into()), Rgba::rgb(1, 2, 3)))
            .unwrap();
        sheet
            .add_rule(bg_rule(Selector::ElementType("button".into()), Rgba::rgb(9, 9, 9)))
            .unwrap();

        let tags = types(&["button"]);
        let query = StyleQuery {
            element_types: &tags,
            style_id: "",
            element_id: "submit",
        };
        let style = sheet.resolve(query, StyleState::Normal);
        assert_eq!(style.background.color, Rgba::rgb(1, 2, 3));
    }

    #[test]
    fn style_id_token_matches_by_containment() {
        let mut sheet = Stylesheet::new();
        sheet
            .add_rule(bg_rule(Selector::StyleIdToken("danger".into()), Rgba::rgb(200, 0, 0)))
            .unwrap();

        let tags = types(&["element"]);
        let hit = StyleQuery {
            element_types: &tags,
            style_id: "rounded;danger;flat",
            element_id: "none",
        };
        let miss = StyleQuery {
            element_types: &tags,
            style_id: "rounded;flat",
            element_id: "none",
        };
        assert_eq!(
            sheet.resolve(hit, StyleState::Normal).background.color,
            Rgba::rgb(200, 0, 0)
        );
        assert_eq!(
            sheet.resolve(miss, StyleState::Normal).background.color,
            Style::baseline(StyleState::Normal).background.color
        );
    }

    #[test]
    fn later_registration_wins_within_a_category() {
        let mut sheet = Stylesheet::new();
        sheet
            .add_rule(bg_rule(Selector::ElementType("button".into()), Rgba::rgb(1, 1, 1)))
            .unwrap();
        sheet
            .add_rule(bg_rule(Selector::ElementType("button".into()), Rgba::rgb(2, 2, 2)))
            .unwrap();

        let tags = types(&["button"]);
        let query = StyleQuery {
            element_types: &tags,
            style_id: "",
            element_id: "none",
        };
        assert_eq!(
            sheet.resolve(query, StyleState::Normal).background.color,
            Rgba::rgb(2, 2, 2)
        );
    }

    #[test]
    fn tag_order_on_the_node_orders_type_rules() {
        let mut sheet = Stylesheet::new();
        sheet
            .add_rule(bg_rule(Selector::ElementType("b".into()), Rgba::rgb(2, 2, 2)))
            .unwrap();
        sheet
            .add_rule(bg_rule(Selector::ElementType("a".into()), Rgba::rgb(1, 1, 1)))
            .unwrap();

        // "b" is declared later on the node, so its rule lands last.
        let tags = types(&["a", "b"]);
        let query = StyleQuery {
            element_types: &tags,
            style_id: "",
            element_id: "none",
        };
        assert_eq!(
            sheet.resolve(query, StyleState::Normal).background.color,
            Rgba::rgb(2, 2, 2)
        );
    }

    #[test]
    fn states_resolve_independently() {
        let mut sheet = Stylesheet::new();
        let mut rule = bg_rule(Selector::ElementType("element".into()), Rgba::rgb(5, 5, 5));
        rule.state = StyleState::Hover;
        sheet.add_rule(rule).unwrap();

        let tags = types(&["element"]);
        let query = StyleQuery {
            element_types: &tags,
            style_id: "",
            element_id: "none",
        };
        let group = sheet.resolve_group(query);
        assert_eq!(group.hover.background.color, Rgba::rgb(5, 5, 5));
        assert_eq!(
            group.normal.background.color,
            Style::baseline(StyleState::Normal).background.color
        );
        assert_eq!(
            group.press.background.color,
            Style::baseline(StyleState::Press).background.color
        );
    }

    #[test]
    fn text_rules_rebuild_the_font() {
        let mut sheet = Stylesheet::new();
        sheet
            .add_rule(StyleRule {
                selector: Selector::ElementType("element".into()),
                state: StyleState::Normal,
                facet: Facet::Text,
                property: "font_size".into(),
                value: StyleValue::Float(30.0),
            })
            .unwrap();

        let tags = types(&["element"]);
        let query = StyleQuery {
            element_types: &tags,
            style_id: "",
            element_id: "none",
        };
        let style = sheet.resolve(query, StyleState::Normal);
        assert_eq!(style.text.font.size, 30.0);
    }
}
