#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Path commands for the tracery rasterizer: the command model, the SVG
//! path mini-language parser and the flattening interpreter.
//!
//! This crate is reexported in [tracery](https://docs.rs/tracery/).
//!
//! # Overview
//!
//! A path is parsed from the standard path mini-language into an
//! immutable sequence of [`PathCommand`]s, then interpreted against a
//! mutable cursor ([`flatten`]) to produce one polyline per
//! move-to-delimited [`SubPath`]. Curved commands are approximated
//! within the flattening tolerance (see the `tracery_geom`
//! documentation).
//!
//! ```
//! use tracery_path::{parse, flatten};
//!
//! let commands = parse("M 10 10 L 20 20 C 30 10 40 10 50 20 Z").unwrap();
//! let sub_paths = flatten(&commands, 0.1);
//! assert!(sub_paths[0].closed);
//! ```

// Reexport the geometry crate.
pub use tracery_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod command;
mod flatten;
mod parser;

#[doc(inline)]
pub use crate::command::{write_svg_path, PathCommand, Position};
#[doc(inline)]
pub use crate::flatten::{close_flags, flatten, flatten_single, PathContext, SubPath};
#[doc(inline)]
pub use crate::parser::{parse, ParseError};

/// The fill rule deciding which regions of a shape are interior.
///
/// See the [SVG specification](https://www.w3.org/TR/SVG/painting.html#FillRuleProperty).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl FillRule {
    #[inline]
    pub fn is_in(&self, winding_number: i32) -> bool {
        match *self {
            FillRule::NonZero => winding_number != 0,
            FillRule::EvenOdd => winding_number % 2 != 0,
        }
    }

    #[inline]
    pub fn is_out(&self, winding_number: i32) -> bool {
        !self.is_in(winding_number)
    }
}

impl Default for FillRule {
    fn default() -> Self {
        FillRule::NonZero
    }
}
