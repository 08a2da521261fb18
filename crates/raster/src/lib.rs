#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Scanline rasterization of 2D fill and stroke operations.
//!
//! This crate is reexported in [tracery](https://docs.rs/tracery/).
//!
//! ## Overview
//!
//! The most interesting types of this crate are:
//!
//! * [`EdgeTable`](scanline/struct.EdgeTable.html) - Non-zero winding
//!   scanline rasterizer over one or more closed contours.
//! * [`stroke_outline`](stroke/fn.stroke_outline.html) - Stroke outline
//!   synthesis (caps, joins, miter limits).
//! * [`Pixmap`](pixel/struct.Pixmap.html) - RGBA8 destination buffer with
//!   "over" compositing.
//! * [`fill_sub_paths`](render/fn.fill_sub_paths.html) /
//!   [`stroke_sub_paths`](render/fn.stroke_sub_paths.html) - The
//!   rasterization entry points.
//!
//! ## The rasterization pipeline
//!
//! Path data flows strictly downward: parsed commands are flattened into
//! polylines (`tracery_path`), stroked shapes grow an outline, the
//! scanline rasterizer classifies pixels by accumulated winding, the
//! coverage engine refines boundary pixels to fractional coverage, and
//! the compositor blends the coverage-weighted color into the
//! destination. Rendering one shape is a synchronous single-threaded
//! computation with no hidden shared state: the destination pixmap is
//! the only thing written to.

pub use tracery_path as path;
pub use tracery_path::geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod coverage;
pub mod pixel;
pub mod render;
pub mod scanline;
pub mod stroke;

#[doc(inline)]
pub use crate::coverage::AntiAliasing;
#[doc(inline)]
pub use crate::pixel::{Color, Pixmap};
#[doc(inline)]
pub use crate::render::{fill_path, fill_sub_paths, stroke_path, stroke_sub_paths, FillOptions};
#[doc(inline)]
pub use crate::scanline::{Crossing, Edge, EdgeTable};
#[doc(inline)]
pub use crate::stroke::stroke_outline;

pub use tracery_path::FillRule;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// The shape of the ends of an open stroked sub-path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The stroke ends flat at the endpoint.
    Butt,
    /// The stroke extends past the endpoint by half the line width.
    Square,
    /// The stroke ends with a half-circle of radius half the line width.
    Round,
}

/// The shape of the corners between two stroked segments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// The offset edges extend to their intersection, falling back to
    /// bevel past the miter limit.
    Miter,
    /// The corner is cut at the offset points.
    Bevel,
    /// The corner is a circular arc centered on the vertex.
    Round,
}

/// Parameters for stroke outline generation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct StrokeStyle {
    /// What cap to use at the start of each open sub-path.
    ///
    /// Default value: `LineCap::Butt`.
    pub start_cap: LineCap,

    /// What cap to use at the end of each open sub-path.
    ///
    /// Default value: `LineCap::Butt`.
    pub end_cap: LineCap,

    /// See the SVG specification.
    ///
    /// Default value: `LineJoin::Miter`.
    pub line_join: LineJoin,

    /// Line width.
    ///
    /// Default value: `StrokeStyle::DEFAULT_LINE_WIDTH`.
    pub line_width: f64,

    /// See the SVG specification.
    ///
    /// Must be greater than or equal to 1.0.
    /// Default value: `StrokeStyle::DEFAULT_MITER_LIMIT`.
    pub miter_limit: f64,

    /// Maximum allowed distance to the true round join/cap arcs when
    /// sampling them.
    ///
    /// Default value: `StrokeStyle::DEFAULT_TOLERANCE`.
    pub tolerance: f64,
}

impl StrokeStyle {
    /// Minimum miter limit as defined by the SVG specification.
    pub const MINIMUM_MITER_LIMIT: f64 = 1.0;
    /// Default miter limit as defined by the SVG specification.
    pub const DEFAULT_MITER_LIMIT: f64 = 4.0;
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::Butt;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Miter;
    pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
    pub const DEFAULT_TOLERANCE: f64 = 0.1;

    pub const DEFAULT: Self = StrokeStyle {
        start_cap: Self::DEFAULT_LINE_CAP,
        end_cap: Self::DEFAULT_LINE_CAP,
        line_join: Self::DEFAULT_LINE_JOIN,
        line_width: Self::DEFAULT_LINE_WIDTH,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
        tolerance: Self::DEFAULT_TOLERANCE,
    };

    #[inline]
    pub const fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    #[inline]
    pub const fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }

    #[inline]
    pub const fn with_start_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self
    }

    #[inline]
    pub const fn with_end_cap(mut self, cap: LineCap) -> Self {
        self.end_cap = cap;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        assert!(limit >= Self::MINIMUM_MITER_LIMIT);
        self.miter_limit = limit;
        self
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.line_width * 0.5
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_style_builder() {
        let style = StrokeStyle::default()
            .with_line_width(10.0)
            .with_line_cap(LineCap::Round)
            .with_line_join(LineJoin::Bevel);

        assert_eq!(style.line_width, 10.0);
        assert_eq!(style.start_cap, LineCap::Round);
        assert_eq!(style.end_cap, LineCap::Round);
        assert_eq!(style.line_join, LineJoin::Bevel);
        assert_eq!(style.miter_limit, StrokeStyle::DEFAULT_MITER_LIMIT);
    }

    #[test]
    #[should_panic]
    fn miter_limit_below_minimum() {
        let _ = StrokeStyle::default().with_miter_limit(0.5);
    }
}
