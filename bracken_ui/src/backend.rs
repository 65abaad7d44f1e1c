// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-backend contracts.
//!
//! Bracken paints by issuing fill and blit operations against a 2D
//! surface abstraction the host supplies; it never touches pixels itself.
//! One retained surface is kept per node, sized to its rect, and
//! composited onto the parent's surface each repaint.

use kurbo::{Point, Rect, Size};

use bracken_style::Rgba;

/// A 2D pixel surface owned by the host's renderer.
pub trait Surface {
    /// Surface dimensions.
    fn size(&self) -> Size;

    /// Fill the whole surface with `color` (alpha replaces, so a
    /// transparent fill clears).
    fn fill(&mut self, color: Rgba);

    /// Fill a rect, clipped to the surface.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Composite `src` with its top-left at `at`.
    fn blit(&mut self, src: &dyn Surface, at: Point);

    /// Composite the `src_rect` sub-region of `src` at `at`.
    fn blit_region(&mut self, src: &dyn Surface, src_rect: Rect, at: Point);

    /// Composite the `src_rect` sub-region of `src` scaled into
    /// `dst_rect`.
    fn blit_scaled(&mut self, src: &dyn Surface, src_rect: Rect, dst_rect: Rect);
}

/// Creates surfaces for the render pass.
pub trait SurfaceFactory {
    /// Create a transparent surface of the given size. Degenerate sizes
    /// are clamped to one pixel by the caller.
    fn create(&mut self, size: Size) -> Box<dyn Surface>;
}

impl std::fmt::Debug for dyn Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Surface({:?})", self.size())
    }
}
