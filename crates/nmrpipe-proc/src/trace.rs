//! Trace-parallel execution.
//!
//! A trace is one X vector: `n` reals followed by `n` imaginaries when X is
//! complex, `n` reals otherwise. Traces are independent, so operations map
//! them in parallel into a fresh output buffer; the caller commits that
//! buffer only when every trace has completed.

use crate::error::ProcError;
use num_complex::Complex;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared flag telling workers to stop picking up new traces.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Map each `in_len`-float trace of `data` to an `out_len`-float trace.
///
/// `f` receives the trace index, the input trace and its (zeroed) output slot.
pub fn map_traces<F>(
    data: &[f32],
    in_len: usize,
    out_len: usize,
    cancel: &CancelToken,
    f: F,
) -> Result<Vec<f32>, ProcError>
where
    F: Fn(usize, &[f32], &mut [f32]) + Sync,
{
    if in_len == 0 || out_len == 0 {
        return Ok(Vec::new());
    }
    let total = data.len() / in_len;
    let mut out = vec![0.0f32; total * out_len];
    let done = AtomicUsize::new(0);
    log::debug!("mapping {total} traces: {in_len} -> {out_len} floats");

    out.par_chunks_mut(out_len)
        .zip(data.par_chunks(in_len))
        .enumerate()
        .try_for_each(|(i, (dst, src))| {
            if cancel.is_cancelled() {
                return Err(());
            }
            f(i, src, dst);
            done.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .map_err(|_| ProcError::Cancelled {
            done: done.load(Ordering::Relaxed),
            total,
        })?;
    Ok(out)
}

/// Gather a trace into complex points.
pub fn to_complex(src: &[f32], complex: bool) -> Vec<Complex<f32>> {
    if complex {
        let (re, im) = src.split_at(src.len() / 2);
        re.iter().zip(im).map(|(&r, &i)| Complex::new(r, i)).collect()
    } else {
        src.iter().map(|&r| Complex::new(r, 0.0)).collect()
    }
}

/// Scatter complex points into a trace; real traces keep only the real part.
pub fn from_complex(buf: &[Complex<f32>], dst: &mut [f32], complex: bool) {
    if complex {
        let (re, im) = dst.split_at_mut(buf.len());
        for ((r, i), z) in re.iter_mut().zip(im.iter_mut()).zip(buf) {
            *r = z.re;
            *i = z.im;
        }
    } else {
        for (r, z) in dst.iter_mut().zip(buf) {
            *r = z.re;
        }
    }
}
