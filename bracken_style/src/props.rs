// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-facet style parameter sets and the resolved [`Style`] bundle.

use crate::color::Rgba;
use crate::font::{FontAlign, FontSpec};

/// Interaction state a resolved style snapshot applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleState {
    /// Idle appearance.
    Normal,
    /// Pointer is over the node.
    Hover,
    /// Node is pressed or selected.
    Press,
}

/// Placement of a stack's content block along its main axis when the
/// content is smaller than the container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StackAnchor {
    /// Content starts at the padding edge.
    Start,
    /// Content block is centered.
    #[default]
    Center,
    /// Content ends at the far padding edge.
    End,
    /// Leftover space is redistributed as extra inter-child spacing.
    MaxSpacing,
}

/// Per-child cross-axis alignment within a stack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChildAlign {
    /// Near edge (left in a vertical stack, top in a horizontal one).
    Start,
    /// Centered on the cross axis.
    #[default]
    Center,
    /// Far edge.
    End,
}

/// Nine-position alignment of a text or icon block within its node rect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Centered both ways.
    #[default]
    Center,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Vertically centered at the left edge.
    Left,
    /// Vertically centered at the right edge.
    Right,
    /// Horizontally centered at the top edge.
    Top,
    /// Horizontally centered at the bottom edge.
    Bottom,
}

/// Shape drawn by the shape facet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// An inset rounded rectangle.
    #[default]
    Rect,
    /// An inset ellipse.
    Ellipse,
}

/// Stack-layout parameters. Read from the container for most fields; the
/// `fill_x`/`fill_y`/`align` fields are read from each child's own style.
#[derive(Clone, Debug, PartialEq)]
pub struct StackStyle {
    /// Gap between consecutive children on the main axis.
    pub spacing: f64,
    /// Inset on both ends of both axes.
    pub padding: f64,
    /// Horizontal scrolling permitted.
    pub scroll_x: bool,
    /// Vertical scrolling permitted.
    pub scroll_y: bool,
    /// Container grows horizontally to oversized content.
    pub grow_x: bool,
    /// Container grows vertically to oversized content.
    pub grow_y: bool,
    /// Container shrinks horizontally to undersized content.
    pub shrink_x: bool,
    /// Container shrinks vertically to undersized content.
    pub shrink_y: bool,
    /// As a child: absorb a share of leftover horizontal space.
    pub fill_x: bool,
    /// As a child: absorb a share of leftover vertical space.
    pub fill_y: bool,
    /// Content-block anchoring along the main axis.
    pub anchor: StackAnchor,
    /// As a child: cross-axis alignment.
    pub align: ChildAlign,
    /// Thickness reserved for a visible scrollbar.
    pub scrollbar_size: f64,
    /// Scrollbars overlay content instead of reserving space.
    pub floating_scrollbars: bool,
}

impl Default for StackStyle {
    fn default() -> Self {
        Self {
            spacing: 5.0,
            padding: 7.0,
            scroll_x: true,
            scroll_y: true,
            grow_x: false,
            grow_y: false,
            shrink_x: false,
            shrink_y: false,
            fill_x: false,
            fill_y: true,
            anchor: StackAnchor::Center,
            align: ChildAlign::Center,
            scrollbar_size: 10.0,
            floating_scrollbars: false,
        }
    }
}

/// Background facet parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundStyle {
    /// Facet participates in rendering.
    pub enabled: bool,
    /// Fill color.
    pub color: Rgba,
    /// Corner radius.
    pub border_radius: f64,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgba::grey(25),
            border_radius: 7.0,
        }
    }
}

/// Image facet parameters. The image surface itself is node data supplied
/// by the host; the style only controls how it is fitted.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageStyle {
    /// Facet participates in rendering.
    pub enabled: bool,
    /// Inset from the node rect.
    pub padding: f64,
    /// Corner radius applied when compositing.
    pub border_radius: f64,
    /// Stretch to the node width instead of preserving aspect.
    pub stretch_x: bool,
    /// Stretch to the node height instead of preserving aspect.
    pub stretch_y: bool,
    /// Cover the padded rect entirely, cropping overflow.
    pub fill: bool,
    /// Width of the outline drawn around the image, 0 for none.
    pub outline_width: f64,
    /// Outline color.
    pub outline_color: Rgba,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            padding: 5.0,
            border_radius: 7.0,
            stretch_x: false,
            stretch_y: false,
            fill: false,
            outline_width: 0.0,
            outline_color: Rgba::grey(50),
        }
    }
}

/// Shape facet parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeStyle {
    /// Facet participates in rendering.
    pub enabled: bool,
    /// Fill color.
    pub color: Rgba,
    /// Stroke width, 0 for filled.
    pub outline_width: f64,
    /// Which shape to draw.
    pub kind: ShapeKind,
    /// Inset from the node rect.
    pub padding: f64,
    /// Corner radius for [`ShapeKind::Rect`].
    pub rect_border_radius: f64,
    /// Extra horizontal inset for [`ShapeKind::Ellipse`].
    pub ellipse_padding_x: f64,
    /// Extra vertical inset for [`ShapeKind::Ellipse`].
    pub ellipse_padding_y: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgba::rgb(0, 120, 255),
            outline_width: 0.0,
            kind: ShapeKind::Rect,
            padding: 8.0,
            rect_border_radius: 7.0,
            ellipse_padding_x: 10.0,
            ellipse_padding_y: 20.0,
        }
    }
}

/// Text facet parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Facet participates in rendering.
    pub enabled: bool,
    /// Foreground color.
    pub color: Rgba,
    /// Optional background behind the text block.
    pub bg_color: Option<Rgba>,
    /// Horizontal inset used by edge alignments.
    pub padding: f64,
    /// Vertical inset used by edge alignments.
    pub y_padding: f64,
    /// Block placement within the node rect.
    pub align: TextAlign,
    /// Font family or file name.
    pub font_name: String,
    /// Font point size.
    pub font_size: f64,
    /// Per-line alignment inside the block.
    pub font_align: FontAlign,
    /// Bold variant.
    pub bold: bool,
    /// Italic variant.
    pub italic: bool,
    /// Underline decoration.
    pub underline: bool,
    /// Strikethrough decoration.
    pub strikethrough: bool,
    /// Font resolved from the fields above; rebuilt after every cascade.
    pub font: FontSpec,
}

impl TextStyle {
    /// Recompute [`TextStyle::font`] from the current font fields.
    pub fn build_font(&mut self) {
        self.font = FontSpec {
            family: self.font_name.clone(),
            size: self.font_size,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strikethrough: self.strikethrough,
            align: self.font_align,
        };
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        let mut s = Self {
            enabled: true,
            color: Rgba::grey(255),
            bg_color: None,
            padding: 5.0,
            y_padding: 1.0,
            align: TextAlign::Center,
            font_name: String::from("Segoe UI"),
            font_size: 22.0,
            font_align: FontAlign::Center,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            font: FontSpec::default(),
        };
        s.build_font();
        s
    }
}

/// Icon facet parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct IconStyle {
    /// Facet participates in rendering.
    pub enabled: bool,
    /// Uniform scale applied to the icon surface.
    pub scale: f64,
    /// Inset used by edge alignments.
    pub padding: f64,
    /// Placement within the node rect.
    pub align: TextAlign,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 1.0,
            padding: 5.0,
            align: TextAlign::Center,
        }
    }
}

/// Outline facet parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlineStyle {
    /// Facet participates in rendering.
    pub enabled: bool,
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width.
    pub width: f64,
    /// Corner radius.
    pub border_radius: f64,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgba::grey(50),
            width: 1.0,
            border_radius: 7.0,
        }
    }
}

/// One fully-populated style snapshot: every facet's parameters plus the
/// stack-layout parameters, for a single interaction state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Stack-layout parameters.
    pub stack: StackStyle,
    /// Background facet.
    pub background: BackgroundStyle,
    /// Image facet.
    pub image: ImageStyle,
    /// Shape facet.
    pub shape: ShapeStyle,
    /// Text facet.
    pub text: TextStyle,
    /// Icon facet.
    pub icon: IconStyle,
    /// Outline facet.
    pub outline: OutlineStyle,
}

impl Style {
    /// The hard-coded baseline the cascade starts from for `state`.
    ///
    /// The hover and press baselines differ from normal only in background
    /// color.
    #[must_use]
    pub fn baseline(state: StyleState) -> Self {
        let mut style = Self::default();
        match state {
            StyleState::Normal => {}
            StyleState::Hover => style.background.color = Rgba::grey(32),
            StyleState::Press => style.background.color = Rgba::grey(17),
        }
        style
    }
}

/// The three independently resolved snapshots for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleGroup {
    /// Idle snapshot.
    pub normal: Style,
    /// Hover snapshot.
    pub hover: Style,
    /// Press snapshot.
    pub press: Style,
}

impl StyleGroup {
    /// The snapshot for `state`.
    #[must_use]
    pub fn select(&self, state: StyleState) -> &Style {
        match state {
            StyleState::Normal => &self.normal,
            StyleState::Hover => &self.hover,
            StyleState::Press => &self.press,
        }
    }
}

impl Default for StyleGroup {
    fn default() -> Self {
        Self {
            normal: Style::baseline(StyleState::Normal),
            hover: Style::baseline(StyleState::Hover),
            press: Style::baseline(StyleState::Press),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baselines_differ_only_in_background() {
        let normal = Style::baseline(StyleState::Normal);
        let mut hover = Style::baseline(StyleState::Hover);
        assert_eq!(hover.background.color, Rgba::grey(32));
        hover.background.color = normal.background.color;
        assert_eq!(normal, hover);
    }

    #[test]
    fn font_rebuild_tracks_fields() {
        let mut text = TextStyle::default();
        text.font_size = 14.0;
        text.bold = true;
        text.build_font();
        assert_eq!(text.font.size, 14.0);
        assert!(text.font.bold);
    }
}
