//! NMRPipe-compatible processing.
//!
//! A [`Spectrum`] owns a header and its samples. [`Operation`]s transform
//! the current X axis of a spectrum into a new spectrum; a [`Pipeline`]
//! applies a list of them under one [`ProcessingConfig`] and records each
//! step in a [`History`].

pub mod axis;
pub mod config;
pub mod dfilter;
pub mod error;
pub mod history;
pub mod ops;
pub mod pipeline;
pub mod spectrum;
pub mod trace;

pub use axis::FrequencyScale;
pub use config::{FrequencyConvention, GroupDelayMode, ProcessingConfig};
pub use error::ProcError;
pub use history::{History, HistoryEntry};
pub use ops::{Operation, RunContext};
pub use pipeline::Pipeline;
pub use spectrum::{ApodState, Spectrum};
pub use trace::CancelToken;
