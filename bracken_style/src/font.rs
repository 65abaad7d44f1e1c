// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font description and the text measurement contract.
//!
//! Bracken does not shape or rasterize text. Text-bearing facets carry a
//! [`FontSpec`] describing the face they want, and the host supplies a
//! [`TextMeasure`] implementation that answers the three questions the core
//! needs: line height, per-character advance, and word-wrap splitting.

/// Horizontal alignment of wrapped lines within a text block.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontAlign {
    /// Lines start at the left edge of the text rect.
    Left,
    /// Lines are centered within the text rect.
    #[default]
    Center,
    /// Lines end at the right edge of the text rect.
    Right,
}

/// A resolved font description.
///
/// Rebuilt from the text facet's style properties whenever the cascade
/// changes any of them; hosts map it onto whatever font machinery they use.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family or file name, host-interpreted.
    pub family: String,
    /// Point size.
    pub size: f64,
    /// Bold variant requested.
    pub bold: bool,
    /// Italic variant requested.
    pub italic: bool,
    /// Underline decoration requested.
    pub underline: bool,
    /// Strikethrough decoration requested.
    pub strikethrough: bool,
    /// Per-line alignment.
    pub align: FontAlign,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: String::from("Segoe UI"),
            size: 22.0,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            align: FontAlign::Center,
        }
    }
}

/// Host-supplied text measurement backend.
///
/// Consumed by text-selection hit testing and by text facet layout. The
/// same `FontSpec` must always yield the same measurements within a frame.
pub trait TextMeasure {
    /// Height of one wrapped line, in pixels.
    fn line_height(&self, font: &FontSpec) -> f64;

    /// Horizontal advance of a single character, in pixels.
    fn char_width(&self, font: &FontSpec, ch: char) -> f64;

    /// Split `text` into wrapped lines no wider than `max_width`.
    ///
    /// Explicit newlines always break; the split must never produce an
    /// empty vec for non-empty input.
    fn wrap(&self, font: &FontSpec, text: &str, max_width: f64) -> Vec<String>;
}

/// Width of a full line under `measure`, summing per-character advances.
#[must_use]
pub fn line_width(measure: &dyn TextMeasure, font: &FontSpec, line: &str) -> f64 {
    line.chars().map(|c| measure.char_width(font, c)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-advance measure used across the workspace's tests.
    struct Mono;

    impl TextMeasure for Mono {
        fn line_height(&self, _font: &FontSpec) -> f64 {
            10.0
        }
        fn char_width(&self, _font: &FontSpec, _ch: char) -> f64 {
            5.0
        }
        fn wrap(&self, _font: &FontSpec, text: &str, max_width: f64) -> Vec<String> {
            let per_line = (max_width / 5.0).max(1.0) as usize;
            text.lines()
                .flat_map(|l| {
                    l.as_bytes()
                        .chunks(per_line)
                        .map(|c| String::from_utf8_lossy(c).into_owned())
                        .collect::<Vec<_>>()
                })
                .collect()
        }
    }

    #[test]
    fn line_width_sums_advances() {
        let font = FontSpec::default();
        assert_eq!(line_width(&Mono, &font, "abcd"), 20.0);
        assert_eq!(line_width(&Mono, &font, ""), 0.0);
    }
}
