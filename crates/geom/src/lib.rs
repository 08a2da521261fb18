#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::many_single_char_names)]

//! Scalar 2D geometric primitives for the tracery rasterizer.
//!
//! This crate is reexported in [tracery](https://docs.rs/tracery/).
//!
//! # Overview
//!
//! This crate implements the maths the rasterization pipeline is built on:
//!
//! - lines and line segments,
//! - quadratic and cubic bézier curves,
//! - elliptic arcs.
//!
//! All types are `f64` on top of euclid.
//!
//! # Flattening
//!
//! Flattening is the action of approximating a curve with a succession of
//! line segments. The tolerance threshold taken as input by the flattening
//! algorithms corresponds to the maximum distance between a curve and its
//! linear approximation: the smaller the tolerance, the more precise the
//! approximation and the more segments are generated.
//!
//! Every curve type in this crate (including arc-derived cubics) is
//! flattened by the same recursive subdivision under the same flatness
//! metric, so a given tolerance means the same thing throughout the
//! pipeline.

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod arc;
pub mod cubic_bezier;
mod line;
pub mod quadratic_bezier;

#[doc(inline)]
pub use crate::arc::{Arc, ArcFlags, SvgArc};
#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::line::{Line, LineSegment};
#[doc(inline)]
pub use crate::quadratic_bezier::QuadraticBezierSegment;

/// Alias for `euclid::default::Point2D<f64>`.
pub type Point = euclid::default::Point2D<f64>;

/// Alias for `euclid::default::Vector2D<f64>`.
pub type Vector = euclid::default::Vector2D<f64>;

/// Alias for `euclid::default::Box2D<f64>`.
pub type Box2D = euclid::default::Box2D<f64>;

/// Alias for `euclid::default::Rotation2D<f64>`.
pub type Rotation = euclid::default::Rotation2D<f64>;

/// An angle in radians.
pub type Angle = euclid::Angle<f64>;

/// Shorthand for `Point::new`.
#[inline]
pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Shorthand for `Vector::new`.
#[inline]
pub fn vector(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

/// Distance under which two points are considered coincident.
///
/// This is the one epsilon used for every degeneracy check in the
/// workspace: close-path drift, zero-length stroke segments, arc
/// straight-line degradation and the coverage engine's minimum segment
/// length all compare against it.
pub const COINCIDENCE_EPSILON: f64 = 1e-6;

/// Hard cap on recursive subdivision, for pathological curves whose
/// chord stays near zero while the control deviation does not shrink.
pub(crate) const MAX_SUBDIVISION_DEPTH: u32 = 24;

/// The shared flatness criterion.
///
/// `deviation` is the maximum distance of the control point(s) from the
/// chord segment, `chord` the chord length. The effective threshold
/// tightens as the deviation grows relative to the chord, so short
/// highly curved segments subdivide further than long gentle ones. For
/// `deviation << chord` this reduces to the plain
/// `deviation <= tolerance` bound.
///
/// Since the curve lies in the convex hull of its control polygon and
/// the distance to the chord is convex, a deviation within `tolerance`
/// bounds the whole curve's distance to the chord by `tolerance`.
#[inline]
pub(crate) fn flat_enough(deviation: f64, chord: f64, tolerance: f64) -> bool {
    if chord <= COINCIDENCE_EPSILON {
        return deviation <= tolerance;
    }

    deviation * (chord + deviation) <= tolerance * chord
}
