//! Integer-coordinate boolean polygon engine.
//!
//! Provides the polygon-set algebra the plane fragment pipeline is built
//! on: union / intersection / difference / xor over closed integer paths
//! with independent fill rules per side, results as flat path lists or as a
//! parent/child polygon tree, and polygon offsetting with square, round or
//! miter joins.
//!
//! All classification is exact: intersections are located with `i128`
//! predicates and every derived coordinate is rounded once onto the integer
//! grid. The only floating point lives in offset join construction, where
//! the deviation from the ideal join is bounded by the configured arc
//! tolerance.

pub mod clipper;
pub mod error;
pub mod offset;
pub mod poly;
pub mod types;

mod arrangement;

pub use clipper::Clipper;
pub use error::{ClipError, Result};
pub use offset::ClipperOffset;
pub use poly::{PolyNode, PolyTree};
pub use types::*;
