//! NMRPipe core types: FDATA header codec, parameter roles, and data layout.
//!
//! The header is a 512-slot array of 4-byte values. Most slots are numeric,
//! a fixed set of slot runs hold packed ASCII text. [`Fdata`] parses and
//! serializes the array in either byte order, [`ParmRole`] resolves
//! per-axis parameters through a single (role, axis) table, and
//! [`layout`] derives the concrete memory/file layout of the intensities.

pub mod enums;
pub mod error;
pub mod fdata;
pub mod layout;
pub mod params;
pub mod text;

pub use enums::*;
pub use error::{HeaderError, LayoutError};
pub use fdata::*;
pub use layout::{
    AxisLayout, AxisShape, FileTemplate, FileVariant, Interleave, LayoutDescriptor, Shape,
};
pub use params::*;
pub use text::TextField;
