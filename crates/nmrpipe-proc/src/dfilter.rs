//! Digital-filter (group-delay) removal for oversampled acquisitions.
//!
//! Decimating receivers delay the FID by a fixed, usually fractional,
//! number of points. Two removal strategies are provided:
//!
//! ```text
//!   legacy:   roll left by floor(gd) before the FT,
//!             then phase the spectrum by p0 = 180*frac, p1 = -360*frac
//!   reflect:  shift left by exactly gd (FFT phase ramp, zero padded),
//!             then refill the last ceil(gd) points with a mirror image
//!             of the samples before them
//! ```
//!
//! With `frac = 0` the legacy phase step is a no-op.

use num_complex::Complex;
use nmrpipe_core::fdata::next_power2;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Integer and fractional parts of a group delay.
pub fn split_delay(group_delay: f64) -> (usize, f64) {
    let whole = group_delay.max(0.0).floor();
    (whole as usize, group_delay.max(0.0) - whole)
}

/// Roll a time-domain vector left by the integer part of the delay.
pub fn roll_left(buf: &mut [Complex<f32>], points: usize) {
    if !buf.is_empty() {
        buf.rotate_left(points % buf.len());
    }
}

/// Phase, in degrees, that removes a residual delay of `frac` points from a
/// transformed spectrum: zero at the center point.
pub fn fractional_phase(frac: f64) -> (f64, f64) {
    (180.0 * frac, -360.0 * frac)
}

/// Re-usable exact-shift corrector.
///
/// Holds pre-planned FFTs and the phase ramp so that many vectors of the
/// same length can be corrected without re-planning.
pub struct ReflectCorrector {
    /// Vector length (complex points).
    size: usize,
    /// Padded transform length.
    fft_size: usize,
    /// Points refilled at the tail.
    tail: usize,
    ramp: Vec<Complex<f32>>,
    fwd: Arc<dyn Fft<f32>>,
    inv: Arc<dyn Fft<f32>>,
}

impl ReflectCorrector {
    pub fn new(size: usize, group_delay: f64) -> Self {
        let gd = group_delay.max(0.0);
        let tail = gd.ceil() as usize;
        let fft_size = next_power2(2 * size.max(1));

        // Signed bin k gets exp(+i 2 pi k gd / N): x[t] -> x[t + gd].
        let ramp = (0..fft_size)
            .map(|j| {
                let k = if j < fft_size / 2 {
                    j as f64
                } else {
                    j as f64 - fft_size as f64
                };
                let angle = 2.0 * PI * k * gd / fft_size as f64;
                Complex::new(angle.cos() as f32, angle.sin() as f32)
            })
            .collect();

        let mut planner = FftPlanner::<f32>::new();
        Self {
            size,
            fft_size,
            tail,
            ramp,
            fwd: planner.plan_fft_forward(fft_size),
            inv: planner.plan_fft_inverse(fft_size),
        }
    }

    /// Shift one vector in place.
    pub fn correct(&self, buf: &mut [Complex<f32>]) {
        let n = self.size.min(buf.len());
        let mut work = vec![Complex::new(0.0f32, 0.0); self.fft_size];
        work[..n].copy_from_slice(&buf[..n]);

        self.fwd.process(&mut work);
        for (z, r) in work.iter_mut().zip(&self.ramp) {
            *z = *z * *r;
        }
        self.inv.process(&mut work);
        let scale = 1.0 / self.fft_size as f32;
        for (dst, z) in buf[..n].iter_mut().zip(&work) {
            *dst = *z * scale;
        }

        // Mirror the samples preceding the tail into it.
        if n > 2 * self.tail {
            let start = n - self.tail;
            for j in 0..self.tail {
                buf[start + j] = buf[start - 1 - j];
            }
        }
    }
}
