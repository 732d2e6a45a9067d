//! Exchange of two logical dimensions.
//!
//! Storage order, outermost first, is
//!
//! ```text
//!   A.point A.comp  Z.point Z.comp  Y.point Y.comp  X.comp X.point
//! ```
//!
//! X keeps its real block ahead of its imaginary block; every other axis
//! interleaves components point by point. A transpose gathers each output
//! trace from the input through per-axis strides.

use super::RunContext;
use crate::error::ProcError;
use crate::spectrum::Spectrum;
use nmrpipe_core::layout::Shape;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// `TP` options. Axes are 1-based logical dimensions (X = 1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TpOptions {
    pub axes: Option<(usize, usize)>,
}

impl TpOptions {
    /// Axes exchanged, X and Y when unspecified.
    pub fn axes(&self) -> (usize, usize) {
        self.axes.unwrap_or((1, 2))
    }

    pub fn command(&self) -> String {
        match self.axes() {
            (1, 2) | (2, 1) => "nmrPipe -fn TP".to_string(),
            (1, 3) | (3, 1) => "nmrPipe -fn ZTP".to_string(),
            (a, b) => format!("nmrPipe -fn TP -axes {a} {b}"),
        }
    }
}

/// (point stride, component stride) of every axis in storage.
fn strides(shape: &Shape) -> Vec<(usize, usize)> {
    let x = shape.axis(0);
    let mut out = vec![(1, x.points)];
    let mut running = x.total();
    for axis in &shape.axes()[1..] {
        out.push((running * axis.components, running));
        running *= axis.total();
    }
    out
}

pub fn transpose(
    spec: &Spectrum,
    axes: (usize, usize),
    ctx: &RunContext,
) -> Result<Spectrum, ProcError> {
    let ndim = spec.ndim();
    let (a, b) = axes;
    if a == b || a == 0 || b == 0 || a > ndim.min(4) || b > ndim.min(4) {
        return Err(ProcError::range(
            "TP",
            format!("cannot exchange axes {a} and {b} of a {ndim}D spectrum"),
        ));
    }

    let input = spec.shape();
    let mut perm: Vec<usize> = (0..ndim).collect();
    perm.swap(a - 1, b - 1);
    let mut shape = input.clone();
    shape.swap_axes(a - 1, b - 1);

    let in_strides = strides(input);
    let src_of: Vec<(usize, usize)> = perm.iter().map(|&p| in_strides[p]).collect();
    let out_axes = shape.axes().to_vec();
    let x = shape.axis(0);
    let trace_len = x.total();
    let src = spec.data();
    let mut data = vec![0.0f32; src.len()];

    if trace_len > 0 {
        let cancel = &ctx.cancel;
        let done = AtomicUsize::new(0);
        data.par_chunks_mut(trace_len)
            .enumerate()
            .try_for_each(|(t, dst)| {
                if cancel.is_cancelled() {
                    return Err(());
                }
                let mut rest = t;
                let mut base = 0;
                for m in (1..ndim).rev() {
                    let axis = out_axes[m];
                    let c = rest % axis.components;
                    rest /= axis.components;
                    let k = rest % axis.points;
                    rest /= axis.points;
                    base += k * src_of[m].0 + c * src_of[m].1;
                }
                let (k_stride, c_stride) = src_of[0];
                for c in 0..x.components {
                    for k in 0..x.points {
                        dst[c * x.points + k] = src[base + k * k_stride + c * c_stride];
                    }
                }
                done.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
            .map_err(|_| ProcError::Cancelled {
                done: done.load(Ordering::Relaxed),
                total: shape.trace_count(),
            })?;
    }

    let mut header = spec.header().clone();
    let mut order = header.dim_order();
    order.swap(a - 1, b - 1);
    header.set_dim_order(order);
    header.set_transposed(!header.is_transposed());
    log::debug!("TP: axes {a} and {b}, {} traces", shape.trace_count());
    Spectrum::from_parts(header, data, shape)
}
