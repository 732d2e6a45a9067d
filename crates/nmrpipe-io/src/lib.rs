//! NMRPipe I/O boundary: header and data sources/sinks, single-file and
//! stream readers/writers, plane-series enumeration, and byte swapping.
//!
//! Processing code never touches files. Everything that moves bytes goes
//! through [`SpectrumSource`], [`SpectrumSink`] and [`PlaneEnumerator`].

pub mod adapter;
pub mod byteswap;
pub mod reader;
pub mod writer;

pub use adapter::*;
pub use byteswap::*;
pub use reader::*;
pub use writer::*;
