//! Error types for header parsing and layout derivation.

use crate::params::ParmRole;
use thiserror::Error;

/// Errors from the FDATA header codec.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeaderError {
    #[error("buffer too small for FDATA header: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    /// The byte-order constant matched neither byte order.
    #[error(
        "invalid header: slot {offset} holds {found} (bits {found_bits:#010x}), \
         expected {expected} in either byte order"
    )]
    InvalidHeader {
        offset: usize,
        expected: f32,
        found: f32,
        found_bits: u32,
    },

    #[error("parameter {role} has no header location on axis {axis}")]
    NoLocation { role: ParmRole, axis: usize },

    #[error("parameter {role} is text, not a number")]
    TextRole { role: ParmRole },

    #[error("dimension order slot for axis {axis} holds {value}, not a dimension code")]
    BadDimOrder { axis: usize, value: f32 },
}

/// Errors from layout derivation: every cause of an unsupported layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("unsupported layout: dimension count {0} (expected 1-4)")]
    DimCount(i32),

    #[error("unsupported layout: dimension order {0:?} is not a permutation")]
    DimOrder(Vec<i32>),

    #[error("unsupported layout: axis {axis} has quad flag {value}")]
    QuadFlag { axis: char, value: i32 },

    #[error("unsupported layout: axis {axis} has size {size}")]
    Size { axis: char, size: f32 },

    #[error("unsupported layout: interleaved axis {axis} has odd size {size}")]
    OddInterleave { axis: char, size: usize },

    #[error("unsupported layout: axis {axis} sign code {code} does not match its data type")]
    SignCode { axis: char, code: i32 },

    #[error("unsupported layout: cube series requires 4 dimensions, header has {0}")]
    CubeDims(usize),

    #[error("unsupported layout: template {template:?}: {reason}")]
    Template { template: String, reason: String },

    #[error("unsupported layout: header declares {declared} files, layout implies {expected}")]
    FileCount { declared: usize, expected: usize },

    #[error("unsupported layout: slice count {declared} does not match {expected} from sizes")]
    SliceCount { declared: u64, expected: u64 },

    #[error("unsupported layout: plane bounds {first}..={last} outside 1..={planes}")]
    PlaneBounds {
        first: usize,
        last: usize,
        planes: usize,
    },

    #[error("unsupported layout: expected {expected} floats of data, got {got}")]
    DataLength { expected: usize, got: usize },
}
