//! NMRPipe-format spectral data engine.
//!
//! The workspace crates do the work:
//!
//! - [`nmrpipe_core`]: FDATA header codec, parameter roles, data layout
//! - [`nmrpipe_io`]: sources, sinks, readers and writers
//! - [`nmrpipe_proc`]: spectrum model, operations, pipeline, history
//!
//! This crate is the boundary facade: path-based loading and saving of
//! single files, streams and plane series, JSON pipeline files, and the
//! logging bootstrap.

pub mod files;
pub mod logging;

pub use nmrpipe_core;
pub use nmrpipe_io;
pub use nmrpipe_proc;

pub use files::{load, load_pipeline, process_file, save, EngineError};
pub use nmrpipe_proc::{History, Operation, Pipeline, ProcessingConfig, Spectrum};
