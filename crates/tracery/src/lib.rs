#![deny(bare_trait_objects)]

//! 2D vector graphics rasterization on the CPU.
//!
//! # Crates
//!
//! This meta-crate (`tracery`) reexports the following sub-crates for
//! convenience:
//!
//! * **tracery_geom** - f64 utilities for line segments, bézier curves
//!   and elliptic arcs, with adaptive flattening.
//! * **tracery_path** - The path command model, the path mini-language
//!   parser and the flattening interpreter.
//! * **tracery_raster** - Stroke outline synthesis, the non-zero
//!   scanline rasterizer, anti-aliased coverage and compositing.
//!
//! Each `tracery_<name>` crate is reexported as a `<name>` module. For
//! example:
//!
//! ```ignore
//! use tracery_raster::Pixmap;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! use tracery::raster::Pixmap;
//! ```
//!
//! # Feature flags
//!
//! Serialization using serde can be enabled on each crate with the
//! `serialization` feature flag (disabled by default).
//!
//! # Example
//!
//! ```
//! use tracery::path::parse;
//! use tracery::raster::{fill_path, Color, FillOptions, Pixmap};
//!
//! let commands = parse("M 8 8 L 56 8 L 56 56 L 8 56 Z").unwrap();
//!
//! let mut pixmap = Pixmap::new(64, 64);
//! fill_path(
//!     &mut pixmap,
//!     &commands,
//!     Color::rgb(30, 90, 200),
//!     &FillOptions::default(),
//! );
//!
//! assert_eq!(pixmap.pixel(32, 32).unwrap(), Color::rgb(30, 90, 200));
//! ```

pub use tracery_raster as raster;
pub use tracery_raster::geom;
pub use tracery_raster::path;

pub use tracery_raster::{
    fill_path, fill_sub_paths, stroke_path, stroke_sub_paths, AntiAliasing, Color, FillOptions,
    FillRule, LineCap, LineJoin, Pixmap, StrokeStyle,
};
