//! Value types shared by objects and records.
//!
//! # Key Components
//!
//! - [`enums`] - closed enumerations with checked wire conversion
//! - [`flags`] - bit flag words stored inside object payloads
//! - [`geometry`] - colors, points, rectangles and transform matrices

/// Closed enumerations of the format
pub mod enums;
/// Flag words of object payloads
pub mod flags;
/// Fixed-layout geometry values and affine helpers
pub mod geometry;

pub use enums::*;
pub use flags::*;
pub use geometry::*;
