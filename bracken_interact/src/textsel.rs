// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text-selection geometry: pointer to character index, index span to
//! selection rectangles.
//!
//! All measurement goes through the host's [`TextMeasure`]; this module
//! only does the arithmetic. Out-of-range indices (the text may have been
//! replaced mid-drag) degrade to a partial or empty result rather than
//! erroring: selection is a non-critical visual affordance.

use kurbo::{Point, Rect};

use bracken_scene::TextIndex;
use bracken_style::{FontAlign, FontSpec, TextMeasure, line_width};

/// Horizontal offset of a line's first glyph inside the text block.
fn line_offset(measure: &dyn TextMeasure, font: &FontSpec, line: &str, block_width: f64) -> f64 {
    match font.align {
        FontAlign::Left => 0.0,
        FontAlign::Center => block_width / 2.0 - line_width(measure, font, line) / 2.0,
        FontAlign::Right => block_width - line_width(measure, font, line),
    }
}

/// Advance of the first `n` characters of `line`.
fn prefix_width(measure: &dyn TextMeasure, font: &FontSpec, line: &str, n: usize) -> f64 {
    line.chars()
        .take(n)
        .map(|c| measure.char_width(font, c))
        .sum()
}

/// Advance of the characters `from..=to` of `line`, clamped to its end.
fn range_width(
    measure: &dyn TextMeasure,
    font: &FontSpec,
    line: &str,
    from: usize,
    to: usize,
) -> f64 {
    line.chars()
        .skip(from)
        .take(to.saturating_sub(from) + 1)
        .map(|c| measure.char_width(font, c))
        .sum()
}

/// Map a pointer position to a character within wrapped `lines`.
///
/// `text_rect` is the node-local rect of the laid-out block and
/// `abs_origin` the node's absolute top-left. Returns `None` when the
/// position misses the block, lands on an empty line, sits left of the
/// line's first glyph, or runs past its last one.
#[must_use]
pub fn click_index(
    measure: &dyn TextMeasure,
    font: &FontSpec,
    lines: &[String],
    pos: Point,
    text_rect: Rect,
    abs_origin: Point,
) -> Option<TextIndex> {
    if lines.is_empty() {
        return None;
    }
    let rel = Point::new(pos.x - abs_origin.x, pos.y - abs_origin.y);
    if !text_rect.contains(rel) {
        return None;
    }
    let line_height = measure.line_height(font);
    if line_height <= 0.0 {
        return None;
    }
    let line_i = ((rel.y - text_rect.y0) / line_height).floor();
    if line_i < 0.0 {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "bounds-checked against lines.len() below"
    )]
    let line_i = line_i as usize;
    let line = lines.get(line_i)?;
    if line.is_empty() {
        return None;
    }

    let start_x = text_rect.x0 + line_offset(measure, font, line, text_rect.width());
    if rel.x <= start_x {
        return None;
    }
    let mut advance = 0.0;
    let mut char_i = None;
    for (i, ch) in line.chars().enumerate() {
        advance += measure.char_width(font, ch);
        if advance + start_x >= rel.x {
            char_i = Some(i);
            break;
        }
    }
    let char_i = char_i?;
    let abs_i = lines[..line_i]
        .iter()
        .map(|l| l.chars().count())
        .sum::<usize>()
        + char_i;
    Some(TextIndex {
        char_i,
        line_i,
        abs_i,
    })
}

/// Rectangles spanning the selection from `start` to `end`, in node-local
/// coordinates.
///
/// A degenerate (same-index) selection yields the single character's rect
/// only while `caret_eligible` is set (pointer moved with the button still
/// held); otherwise it yields nothing.
#[must_use]
pub fn selection_rects(
    measure: &dyn TextMeasure,
    font: &FontSpec,
    start: TextIndex,
    end: TextIndex,
    lines: &[String],
    rect: Rect,
    caret_eligible: bool,
) -> Vec<Rect> {
    let (s_li, s_ci, e_li, e_ci) = if start.line_i > end.line_i {
        (end.line_i, end.char_i, start.line_i, start.char_i)
    } else {
        (start.line_i, start.char_i, end.line_i, end.char_i)
    };
    let line_height = measure.line_height(font);
    let mut rects = Vec::new();

    if s_li == e_li {
        let Some(line) = lines.get(s_li) else {
            return rects;
        };
        let offset = line_offset(measure, font, line, rect.width());
        let y0 = rect.y0 + line_height * s_li as f64;
        if s_ci == e_ci {
            if !caret_eligible {
                return rects;
            }
            let Some(ch) = line.chars().nth(s_ci) else {
                return rects;
            };
            let x0 = rect.x0 + offset + prefix_width(measure, font, line, s_ci);
            rects.push(Rect::new(
                x0,
                y0,
                x0 + measure.char_width(font, ch),
                y0 + line_height,
            ));
            return rects;
        }
        let (lo, hi) = (s_ci.min(e_ci), s_ci.max(e_ci));
        let x0 = rect.x0 + offset + prefix_width(measure, font, line, lo);
        rects.push(Rect::new(
            x0,
            y0,
            x0 + range_width(measure, font, line, lo, hi),
            y0 + line_height,
        ));
    } else {
        let Some(start_line) = lines.get(s_li) else {
            return rects;
        };
        let Some(end_line) = lines.get(e_li) else {
            return rects;
        };
        let start_offset = line_offset(measure, font, start_line, rect.width());
        let end_offset = line_offset(measure, font, end_line, rect.width());

        let x0 = rect.x0 + start_offset + prefix_width(measure, font, start_line, s_ci);
        let y0 = rect.y0 + line_height * s_li as f64;
        let tail = start_line.chars().count().saturating_sub(s_ci);
        rects.push(Rect::new(
            x0,
            y0,
            x0 + range_width(measure, font, start_line, s_ci, s_ci + tail.saturating_sub(1)),
            y0 + line_height,
        ));

        let y0 = rect.y0 + line_height * e_li as f64;
        rects.push(Rect::new(
            rect.x0 + end_offset,
            y0,
            rect.x0 + end_offset + range_width(measure, font, end_line, 0, e_ci),
            y0 + line_height,
        ));

        for (i, line) in lines[s_li + 1..e_li].iter().enumerate() {
            let offset = line_offset(measure, font, line, rect.width());
            let y0 = rect.y0 + line_height * (i + s_li + 1) as f64;
            rects.push(Rect::new(
                rect.x0 + offset,
                y0,
                rect.x0 + offset + line_width(measure, font, line),
                y0 + line_height,
            ));
        }
    }
    rects
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fixed-advance measure shared by the interaction tests.
    pub(crate) struct Mono;

    impl TextMeasure for Mono {
        fn line_height(&self, _font: &FontSpec) -> f64 {
            10.0
        }
        fn char_width(&self, _font: &FontSpec, _ch: char) -> f64 {
            5.0
        }
        fn wrap(&self, _font: &FontSpec, text: &str, max_width: f64) -> Vec<String> {
            let per_line = ((max_width / 5.0).max(1.0)) as usize;
            text.lines()
                .flat_map(|l| {
                    let chars: Vec<char> = l.chars().collect();
                    chars
                        .chunks(per_line)
                        .map(|c| c.iter().collect::<String>())
                        .collect::<Vec<_>>()
                })
                .collect()
        }
    }

    fn left_font() -> FontSpec {
        FontSpec {
            align: FontAlign::Left,
            ..FontSpec::default()
        }
    }

    #[test]
    fn click_maps_to_line_and_char() {
        let font = left_font();
        let lines: Vec<String> = vec!["hello".into(), "world".into()];
        let rect = Rect::new(0.0, 0.0, 50.0, 20.0);
        // Second line, third character: y in [10, 20), x in (10, 15].
        let idx = click_index(&Mono, &font, &lines, Point::new(12.0, 15.0), rect, Point::ZERO)
            .unwrap();
        assert_eq!(idx.line_i, 1);
        assert_eq!(idx.char_i, 2);
        assert_eq!(idx.abs_i, 7);
    }

    #[test]
    fn click_outside_the_block_misses() {
        let font = left_font();
        let lines: Vec<String> = vec!["hello".into()];
        let rect = Rect::new(0.0, 0.0, 50.0, 10.0);
        assert!(click_index(&Mono, &font, &lines, Point::new(100.0, 5.0), rect, Point::ZERO).is_none());
        // Past the last character of the line.
        assert!(click_index(&Mono, &font, &lines, Point::new(49.0, 5.0), rect, Point::ZERO).is_none());
    }

    #[test]
    fn single_line_selection_spans_the_char_range() {
        let font = left_font();
        let lines: Vec<String> = vec!["hello".into()];
        let rect = Rect::new(0.0, 0.0, 50.0, 10.0);
        let start = TextIndex { char_i: 1, line_i: 0, abs_i: 1 };
        let end = TextIndex { char_i: 3, line_i: 0, abs_i: 3 };
        let rects = selection_rects(&Mono, &font, start, end, &lines, rect, false);
        assert_eq!(rects, vec![Rect::new(5.0, 0.0, 20.0, 10.0)]);
    }

    #[test]
    fn multi_line_selection_produces_head_tail_and_middles() {
        let font = left_font();
        let lines: Vec<String> = vec!["aaaa".into(), "bbbb".into(), "cccc".into()];
        let rect = Rect::new(0.0, 0.0, 20.0, 30.0);
        let start = TextIndex { char_i: 2, line_i: 0, abs_i: 2 };
        let end = TextIndex { char_i: 1, line_i: 2, abs_i: 9 };
        let rects = selection_rects(&Mono, &font, start, end, &lines, rect, false);
        assert_eq!(rects.len(), 3);
        // Head: from char 2 to the end of the first line.
        assert_eq!(rects[0], Rect::new(10.0, 0.0, 20.0, 10.0));
        // Tail: from the start of the last line through char 1.
        assert_eq!(rects[1], Rect::new(0.0, 20.0, 10.0, 30.0));
        // Middle line, full width.
        assert_eq!(rects[2], Rect::new(0.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn degenerate_selection_is_empty_unless_caret_eligible() {
        let font = left_font();
        let lines: Vec<String> = vec!["hello".into()];
        let rect = Rect::new(0.0, 0.0, 50.0, 10.0);
        let idx = TextIndex { char_i: 2, line_i: 0, abs_i: 2 };
        assert!(selection_rects(&Mono, &font, idx, idx, &lines, rect, false).is_empty());
        let rects = selection_rects(&Mono, &font, idx, idx, &lines, rect, true);
        assert_eq!(rects, vec![Rect::new(10.0, 0.0, 15.0, 10.0)]);
    }

    #[test]
    fn stale_indices_degrade_to_empty() {
        let font = left_font();
        let lines: Vec<String> = vec!["hi".into()];
        let rect = Rect::new(0.0, 0.0, 50.0, 10.0);
        let start = TextIndex { char_i: 0, line_i: 5, abs_i: 0 };
        let end = TextIndex { char_i: 1, line_i: 7, abs_i: 1 };
        assert!(selection_rects(&Mono, &font, start, end, &lines, rect, false).is_empty());
    }
}
