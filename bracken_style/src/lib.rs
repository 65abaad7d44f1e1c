// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Style: the style model and cascade resolver for the Bracken UI
//! composition engine.
//!
//! A node's appearance is described by a [`Style`]: one parameter set per
//! visual facet (background, image, shape, text, icon, outline) plus the
//! stack-layout parameters consumed by `bracken_layout`. Styles are not
//! authored directly; hosts register [`StyleRule`]s into a [`Stylesheet`]
//! and the cascade resolves one [`Style`] per interaction state
//! (normal/hover/press) for each node, bundled as a [`StyleGroup`].
//!
//! ## Cascade order
//!
//! Resolution starts from a hard-coded baseline for the requested
//! [`StyleState`] and then applies matching rules in a strict specificity
//! ladder: element-type rules (in the order the tags are declared on the
//! node), then style-id rules (token containment), then element-id rules
//! (exact match). Within a category, registration order is preserved.
//! Later applications overwrite earlier ones per property; there is no
//! numeric specificity weighting.
//!
//! ## Validation
//!
//! Rules are checked against an explicit per-facet property table when they
//! are registered; an unknown property or a value of the wrong type is a
//! fatal [`StyleError`] at `add_rule` time. Application during resolution
//! is therefore infallible.
//!
//! The textual style-sheet syntax that produces rules is out of scope; this
//! crate only defines the registration API such a loader would target.

mod cascade;
mod color;
mod font;
mod props;
mod rules;

pub use cascade::StyleQuery;
pub use color::Rgba;
pub use font::{FontAlign, FontSpec, TextMeasure, line_width};
pub use props::{
    BackgroundStyle, ChildAlign, IconStyle, ImageStyle, OutlineStyle, ShapeKind, ShapeStyle,
    StackAnchor, StackStyle, Style, StyleGroup, StyleState, TextAlign, TextStyle,
};
pub use rules::{Facet, Selector, StyleError, StyleRule, StyleValue, Stylesheet};
