//! Point ↔ Hz ↔ ppm conversion along a frequency-domain axis.
//!
//! The legacy convention puts point `i` of `n` at
//! `orig + sw*(n-1-i)/n`: the last point sits exactly on the origin and the
//! first one falls `sw/n` short of the full width. The corrected convention
//! divides by `n-1` so the first point lands on `orig + sw`.
//!
//! After an extraction that kept the sweep width, the header records the
//! retained range as X1/XN of the full FT size; the scale is then evaluated
//! on the full axis with an offset.

use crate::config::FrequencyConvention;
use nmrpipe_core::fdata::Fdata;
use nmrpipe_core::params::ParmRole;
use nmrpipe_core::HeaderError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyScale {
    /// Points in the axis the sweep width spans.
    full_n: usize,
    /// Position of the first stored point inside the full axis.
    offset: usize,
    sw: f64,
    orig: f64,
    obs: f64,
    convention: FrequencyConvention,
}

impl FrequencyScale {
    pub fn new(n: usize, sw: f64, orig: f64, obs: f64, convention: FrequencyConvention) -> Self {
        Self {
            full_n: n,
            offset: 0,
            sw,
            orig,
            obs,
            convention,
        }
    }

    /// Scale for an axis holding `points` stored points.
    pub fn from_header(
        hdr: &Fdata,
        axis: usize,
        points: usize,
        convention: FrequencyConvention,
    ) -> Result<Self, HeaderError> {
        let x1 = hdr.try_parm(ParmRole::X1, axis)?.max(0.0) as usize;
        let ft_size = hdr.try_parm(ParmRole::FtSize, axis)?.max(0.0) as usize;
        let (full_n, offset) = if x1 > 0 && ft_size >= points {
            (ft_size, x1 - 1)
        } else {
            (points, 0)
        };
        Ok(Self {
            full_n,
            offset,
            sw: hdr.try_parm(ParmRole::Sw, axis)? as f64,
            orig: hdr.try_parm(ParmRole::Orig, axis)? as f64,
            obs: hdr.try_parm(ParmRole::Obs, axis)? as f64,
            convention,
        })
    }

    fn divisor(&self) -> f64 {
        match self.convention {
            FrequencyConvention::Legacy => self.full_n as f64,
            FrequencyConvention::Corrected => (self.full_n.max(2) - 1) as f64,
        }
    }

    /// Frequency of a 0-based stored point (fractional positions allowed).
    pub fn hz(&self, index: f64) -> f64 {
        let i = index + self.offset as f64;
        self.orig + self.sw * (self.full_n as f64 - 1.0 - i) / self.divisor()
    }

    pub fn ppm(&self, index: f64) -> f64 {
        if self.obs == 0.0 {
            return self.hz(index);
        }
        self.hz(index) / self.obs
    }

    /// Fractional 0-based stored index of a frequency.
    pub fn hz_to_index(&self, hz: f64) -> f64 {
        if self.sw == 0.0 {
            return 0.0;
        }
        self.full_n as f64 - 1.0 - (hz - self.orig) * self.divisor() / self.sw - self.offset as f64
    }

    pub fn ppm_to_index(&self, ppm: f64) -> f64 {
        self.hz_to_index(ppm * self.obs)
    }

    pub fn first_hz(&self) -> f64 {
        self.hz(0.0)
    }

    /// Hz between adjacent points.
    pub fn spacing(&self) -> f64 {
        self.sw / self.divisor()
    }

    /// Points in the axis the sweep width spans.
    pub fn full_points(&self) -> usize {
        self.full_n
    }

    /// 0-based position of stored point 0 within the full axis.
    pub fn offset(&self) -> usize {
        self.offset
    }
}
