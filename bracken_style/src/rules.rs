// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style rules, the registration-time property table, and the [`Stylesheet`]
//! registry the cascade reads from.

use tracing::debug;

use crate::color::Rgba;
use crate::props::{
    ChildAlign, ShapeKind, StackAnchor, Style, StyleState, TextAlign,
};
use crate::FontAlign;

/// Errors raised while registering a style rule.
///
/// These are configuration errors in the sense of the engine's error
/// taxonomy: they indicate a malformed rule and are never retried or
/// swallowed. Because every rule is validated here, applying rules during
/// cascade resolution cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// The property does not exist on the facet's parameter set.
    #[error("{facet:?} style has no property '{property}'")]
    UnknownProperty {
        /// Facet the rule addressed.
        facet: Facet,
        /// Property name that failed to resolve.
        property: String,
    },
    /// The value's type does not match the property's type.
    #[error("property '{property}' on {facet:?} expects {expected}")]
    TypeMismatch {
        /// Facet the rule addressed.
        facet: Facet,
        /// Property name.
        property: String,
        /// Human-readable expected type.
        expected: &'static str,
    },
    /// A keyword value is not one of the property's accepted tokens.
    #[error("'{token}' is not a valid value for '{property}'")]
    InvalidKeyword {
        /// Property name.
        property: String,
        /// Offending token.
        token: String,
    },
}

/// One of the seven property groups a rule can address: the six visual
/// facets plus the stack-layout parameter set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Facet {
    /// Stack-layout parameters.
    Stack,
    /// Background fill.
    Background,
    /// Host-supplied image.
    Image,
    /// Vector shape.
    Shape,
    /// Text block.
    Text,
    /// Icon surface.
    Icon,
    /// Border outline.
    Outline,
}

/// What a rule matches against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Matches any node carrying this type tag.
    ElementType(String),
    /// Matches any node whose semicolon-joined style-id string contains
    /// this token.
    StyleIdToken(String),
    /// Matches the node whose element id equals this exactly.
    ElementId(String),
}

/// A typed rule value.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// Numeric properties (sizes, paddings, radii, scales).
    Float(f64),
    /// Boolean switches.
    Bool(bool),
    /// Color properties.
    Color(Rgba),
    /// Keyword or string properties (alignments, font names, shape kinds).
    Str(String),
    /// Clears an optional property (currently only `text.bg_color`).
    None,
}

/// One registered rule: selector, interaction state, and a single
/// property assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
    /// What the rule matches.
    pub selector: Selector,
    /// Which snapshot the rule contributes to.
    pub state: StyleState,
    /// Property group addressed.
    pub facet: Facet,
    /// Property name within the facet.
    pub property: String,
    /// Value written when the rule applies.
    pub value: StyleValue,
}

/// The process-wide ordered rule list.
///
/// Rules are appended once at setup and never re-ordered or deduplicated;
/// resolution reads the list on demand.
#[derive(Debug, Default)]
pub struct Stylesheet {
    pub(crate) rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// An empty stylesheet; nodes resolve to the baselines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one rule, validating it against the property table.
    pub fn add_rule(&mut self, rule: StyleRule) -> Result<(), StyleError> {
        let mut probe = Style::baseline(rule.state);
        apply_prop(&mut probe, rule.facet, &rule.property, &rule.value)?;
        debug!(selector = ?rule.selector, property = %rule.property, "style rule registered");
        self.rules.push(rule);
        Ok(())
    }

    /// Register several rules; stops at the first invalid one.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = StyleRule>) -> Result<(), StyleError> {
        for rule in rules {
            self.add_rule(rule)?;
        }
        Ok(())
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn float(v: &StyleValue, facet: Facet, prop: &str) -> Result<f64, StyleError> {
    match v {
        StyleValue::Float(f) => Ok(*f),
        _ => Err(StyleError::TypeMismatch {
            facet,
            property: prop.into(),
            expected: "a number",
        }),
    }
}

fn boolean(v: &StyleValue, facet: Facet, prop: &str) -> Result<bool, StyleError> {
    match v {
        StyleValue::Bool(b) => Ok(*b),
        _ => Err(StyleError::TypeMismatch {
            facet,
            property: prop.into(),
            expected: "a bool",
        }),
    }
}

fn color(v: &StyleValue, facet: Facet, prop: &str) -> Result<Rgba, StyleError> {
    match v {
        StyleValue::Color(c) => Ok(*c),
        _ => Err(StyleError::TypeMismatch {
            facet,
            property: prop.into(),
            expected: "a color",
        }),
    }
}

fn keyword<'a>(v: &'a StyleValue, facet: Facet, prop: &str) -> Result<&'a str, StyleError> {
    match v {
        StyleValue::Str(s) => Ok(s),
        _ => Err(StyleError::TypeMismatch {
            facet,
            property: prop.into(),
            expected: "a keyword",
        }),
    }
}

fn stack_anchor(token: &str, prop: &str) -> Result<StackAnchor, StyleError> {
    match token {
        "start" | "top" | "left" => Ok(StackAnchor::Start),
        "center" | "middle" => Ok(StackAnchor::Center),
        "end" | "bottom" | "right" => Ok(StackAnchor::End),
        "max_spacing" => Ok(StackAnchor::MaxSpacing),
        _ => Err(StyleError::InvalidKeyword {
            property: prop.into(),
            token: token.into(),
        }),
    }
}

fn child_align(token: &str, prop: &str) -> Result<ChildAlign, StyleError> {
    match token {
        "start" | "top" | "left" => Ok(ChildAlign::Start),
        "center" | "middle" => Ok(ChildAlign::Center),
        "end" | "bottom" | "right" => Ok(ChildAlign::End),
        _ => Err(StyleError::InvalidKeyword {
            property: prop.into(),
            token: token.into(),
        }),
    }
}

fn text_align(token: &str, prop: &str) -> Result<TextAlign, StyleError> {
    match token {
        "center" => Ok(TextAlign::Center),
        "topleft" => Ok(TextAlign::TopLeft),
        "topright" => Ok(TextAlign::TopRight),
        "bottomleft" => Ok(TextAlign::BottomLeft),
        "bottomright" => Ok(TextAlign::BottomRight),
        "midleft" | "left" => Ok(TextAlign::Left),
        "midright" | "right" => Ok(TextAlign::Right),
        "midtop" | "top" => Ok(TextAlign::Top),
        "midbottom" | "bottom" => Ok(TextAlign::Bottom),
        _ => Err(StyleError::InvalidKeyword {
            property: prop.into(),
            token: token.into(),
        }),
    }
}

fn font_align(token: &str, prop: &str) -> Result<FontAlign, StyleError> {
    match token {
        "left" => Ok(FontAlign::Left),
        "center" => Ok(FontAlign::Center),
        "right" => Ok(FontAlign::Right),
        _ => Err(StyleError::InvalidKeyword {
            property: prop.into(),
            token: token.into(),
        }),
    }
}

fn shape_kind(token: &str, prop: &str) -> Result<ShapeKind, StyleError> {
    match token {
        "rect" => Ok(ShapeKind::Rect),
        "ellipse" => Ok(ShapeKind::Ellipse),
        _ => Err(StyleError::InvalidKeyword {
            property: prop.into(),
            token: token.into(),
        }),
    }
}

/// The explicit per-facet property table: write `value` into `style`.
///
/// Every `(facet, property)` pair the engine understands has an arm here;
/// anything else is an [`StyleError::UnknownProperty`]. Used both to
/// validate rules at registration and to apply them during resolution.
pub(crate) fn apply_prop(
    style: &mut Style,
    facet: Facet,
    prop: &str,
    value: &StyleValue,
) -> Result<(), StyleError> {
    match facet {
        Facet::Stack => {
            let s = &mut style.stack;
            match prop {
                "spacing" => s.spacing = float(value, facet, prop)?,
                "padding" => s.padding = float(value, facet, prop)?,
                "scroll_x" => s.scroll_x = boolean(value, facet, prop)?,
                "scroll_y" => s.scroll_y = boolean(value, facet, prop)?,
                "grow_x" => s.grow_x = boolean(value, facet, prop)?,
                "grow_y" => s.grow_y = boolean(value, facet, prop)?,
                "shrink_x" => s.shrink_x = boolean(value, facet, prop)?,
                "shrink_y" => s.shrink_y = boolean(value, facet, prop)?,
                "fill_x" => s.fill_x = boolean(value, facet, prop)?,
                "fill_y" => s.fill_y = boolean(value, facet, prop)?,
                "anchor" => s.anchor = stack_anchor(keyword(value, facet, prop)?, prop)?,
                "align" => s.align = child_align(keyword(value, facet, prop)?, prop)?,
                "scrollbar_size" => s.scrollbar_size = float(value, facet, prop)?,
                "floating_scrollbars" => s.floating_scrollbars = boolean(value, facet, prop)?,
                _ => return unknown(facet, prop),
            }
        }
        Facet::Background => {
            let s = &mut style.background;
            match prop {
                "enabled" => s.enabled = boolean(value, facet, prop)?,
                "color" => s.color = color(value, facet, prop)?,
                "border_radius" => s.border_radius = float(value, facet, prop)?,
                _ => return unknown(facet, prop),
            }
        }
        Facet::Image => {
            let s = &mut style.image;
            match prop {
                "enabled" => s.enabled = boolean(value, facet, prop)?,
                "padding" => s.padding = float(value, facet, prop)?,
                "border_radius" => s.border_radius = float(value, facet, prop)?,
                "stretch_x" => s.stretch_x = boolean(value, facet, prop)?,
                "stretch_y" => s.stretch_y = boolean(value, facet, prop)?,
                "fill" => s.fill = boolean(value, facet, prop)?,
                "outline_width" => s.outline_width = float(value, facet, prop)?,
                "outline_color" => s.outline_color = color(value, facet, prop)?,
                _ => return unknown(facet, prop),
            }
        }
        Facet::Shape => {
            let s = &mut style.shape;
            match prop {
                "enabled" => s.enabled = boolean(value, facet, prop)?,
                "color" => s.color = color(value, facet, prop)?,
                "outline_width" => s.outline_width = float(value, facet, prop)?,
                "kind" => s.kind = shape_kind(keyword(value, facet, prop)?, prop)?,
                "padding" => s.padding = float(value, facet, prop)?,
                "rect_border_radius" => s.rect_border_radius = float(value, facet, prop)?,
                "ellipse_padding_x" => s.ellipse_padding_x = float(value, facet, prop)?,
                "ellipse_padding_y" => s.ellipse_padding_y = float(value, facet, prop)?,
                _ => return unknown(facet, prop),
            }
        }
        Facet::Text => {
            let s = &mut style.text;
            match prop {
                "enabled" => s.enabled = boolean(value, facet, prop)?,
                "color" => s.color = color(value, facet, prop)?,
                "bg_color" => {
                    s.bg_color = match value {
                        StyleValue::None => None,
                        other => Some(color(other, facet, prop)?),
                    };
                }
                "padding" => s.padding = float(value, facet, prop)?,
                "y_padding" => s.y_padding = float(value, facet, prop)?,
                "align" => s.align = text_align(keyword(value, facet, prop)?, prop)?,
                "font_name" => s.font_name = keyword(value, facet, prop)?.into(),
                "font_size" => s.font_size = float(value, facet, prop)?,
                "font_align" => s.font_align = font_align(keyword(value, facet, prop)?, prop)?,
                "bold" => s.bold = boolean(value, facet, prop)?,
                "italic" => s.italic = boolean(value, facet, prop)?,
                "underline" => s.underline = boolean(value, facet, prop)?,
                "strikethrough" => s.strikethrough = boolean(value, facet, prop)?,
                _ => return unknown(facet, prop),
            }
        }
        Facet::Icon => {
            let s = &mut style.icon;
            match prop {
                "enabled" => s.enabled = boolean(value, facet, prop)?,
                "scale" => s.scale = float(value, facet, prop)?,
                "padding" => s.padding = float(value, facet, prop)?,
                "align" => s.align = text_align(keyword(value, facet, prop)?, prop)?,
                _ => return unknown(facet, prop),
            }
        }
        Facet::Outline => {
            let s = &mut style.outline;
            match prop {
                "enabled" => s.enabled = boolean(value, facet, prop)?,
                "color" => s.color = color(value, facet, prop)?,
                "width" => s.width = float(value, facet, prop)?,
                "border_radius" => s.border_radius = float(value, facet, prop)?,
                _ => return unknown(facet, prop),
            }
        }
    }
    Ok(())
}

fn unknown(facet: Facet, prop: &str) -> Result<(), StyleError> {
    Err(StyleError::UnknownProperty {
        facet,
        property: prop.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(facet: Facet, prop: &str, value: StyleValue) -> StyleRule {
        StyleRule {
            selector: Selector::ElementType("element".into()),
            state: StyleState::Normal,
            facet,
            property: prop.into(),
            value,
        }
    }

    #[test]
    fn unknown_property_is_rejected() {
        let mut sheet = Stylesheet::new();
        let err = sheet
            .add_rule(rule(Facet::Background, "colour", StyleValue::Color(Rgba::grey(9))))
            .unwrap_err();
        assert!(matches!(err, StyleError::UnknownProperty { .. }));
        assert!(sheet.is_empty());
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut sheet = Stylesheet::new();
        let err = sheet
            .add_rule(rule(Facet::Stack, "spacing", StyleValue::Bool(true)))
            .unwrap_err();
        assert!(matches!(err, StyleError::TypeMismatch { .. }));
    }

    #[test]
    fn bad_alignment_token_is_rejected() {
        let mut sheet = Stylesheet::new();
        let err = sheet
            .add_rule(rule(Facet::Text, "align", StyleValue::Str("diagonal".into())))
            .unwrap_err();
        assert_eq!(
            err,
            StyleError::InvalidKeyword {
                property: "align".into(),
                token: "diagonal".into(),
            }
        );
    }

    #[test]
    fn valid_rules_are_kept_in_registration_order() {
        let mut sheet = Stylesheet::new();
        sheet
            .add_rules([
                rule(Facet::Stack, "padding", StyleValue::Float(0.0)),
                rule(Facet::Outline, "width", StyleValue::Float(2.0)),
            ])
            .unwrap();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.rules[0].property, "padding");
        assert_eq!(sheet.rules[1].property, "width");
    }

    #[test]
    fn bg_color_accepts_none() {
        let mut style = Style::baseline(StyleState::Normal);
        apply_prop(&mut style, Facet::Text, "bg_color", &StyleValue::None).unwrap();
        assert_eq!(style.text.bg_color, None);
        apply_prop(
            &mut style,
            Facet::Text,
            "bg_color",
            &StyleValue::Color(Rgba::grey(1)),
        )
        .unwrap();
        assert_eq!(style.text.bg_color, Some(Rgba::grey(1)));
    }
}
