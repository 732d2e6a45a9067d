//! Processing errors.

use nmrpipe_core::{DataType, Domain, HeaderError, LayoutError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    UnsupportedLayout(#[from] LayoutError),

    /// Requested bounds or sizes fall outside the axis. The input spectrum is untouched.
    #[error("{op}: range error: {reason}")]
    Range { op: &'static str, reason: String },

    #[error("{op}: axis {axis} is in the {domain} domain")]
    Domain {
        op: &'static str,
        axis: usize,
        domain: Domain,
    },

    #[error("{op}: {data_type:?} data is not supported on axis {axis}")]
    UnsupportedDataType {
        op: &'static str,
        axis: usize,
        data_type: DataType,
    },

    #[error("{op}: invalid option {name}: {reason}")]
    InvalidOption {
        op: String,
        name: String,
        reason: String,
    },

    #[error("cancelled after {done} of {total} traces")]
    Cancelled { done: usize, total: usize },

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("pipeline JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProcError {
    pub(crate) fn range(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Range {
            op,
            reason: reason.into(),
        }
    }

    pub(crate) fn option(op: &str, name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            op: op.to_string(),
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
