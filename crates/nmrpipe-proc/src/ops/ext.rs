//! Region extraction along X.

use super::RunContext;
use crate::axis::FrequencyScale;
use crate::config::FrequencyConvention;
use crate::error::ProcError;
use crate::spectrum::Spectrum;
use crate::trace::map_traces;
use nmrpipe_core::enums::Domain;
use nmrpipe_core::fdata::Fdata;
use nmrpipe_core::layout::AxisShape;
use nmrpipe_core::params::{ParmRole, CUR_XDIM};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One end of an extraction range.
///
/// In JSON a bare integer is a 1-based point; strings take a unit suffix:
/// `"4.7ppm"`, `"1200Hz"`, `"25%"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundRepr", into = "String")]
pub enum Bound {
    Points(usize),
    Hz(f64),
    Ppm(f64),
    Percent(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoundRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<BoundRepr> for Bound {
    type Error = String;

    fn try_from(repr: BoundRepr) -> Result<Self, Self::Error> {
        match repr {
            BoundRepr::Number(v) if v >= 1.0 && v.fract() == 0.0 => Ok(Bound::Points(v as usize)),
            BoundRepr::Number(v) => Err(format!("point bound {v} is not a positive integer")),
            BoundRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Bound> for String {
    fn from(bound: Bound) -> Self {
        bound.to_string()
    }
}

impl FromStr for Bound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        let number = |digits: &str| -> Result<f64, String> {
            digits
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("cannot parse bound '{s}'"))
        };
        if let Some(v) = lower.strip_suffix("ppm") {
            Ok(Bound::Ppm(number(v)?))
        } else if let Some(v) = lower.strip_suffix("hz") {
            Ok(Bound::Hz(number(v)?))
        } else if let Some(v) = lower.strip_suffix('%') {
            Ok(Bound::Percent(number(v)?))
        } else {
            match lower.parse::<usize>() {
                Ok(p) if p >= 1 => Ok(Bound::Points(p)),
                _ => Err(format!("cannot parse bound '{s}'")),
            }
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Points(p) => write!(f, "{p}"),
            Bound::Hz(v) => write!(f, "{v}Hz"),
            Bound::Ppm(v) => write!(f, "{v}ppm"),
            Bound::Percent(v) => write!(f, "{v}%"),
        }
    }
}

impl Bound {
    /// 0-based index on an `n`-point axis. `scale` is required for Hz/ppm.
    fn index(&self, n: usize, scale: Option<&FrequencyScale>) -> Result<i64, ProcError> {
        let last = n.saturating_sub(1) as f64;
        let index = match *self {
            Bound::Points(p) => p as f64 - 1.0,
            Bound::Percent(v) => v / 100.0 * last,
            Bound::Hz(v) | Bound::Ppm(v) => {
                let scale = scale.ok_or_else(|| {
                    ProcError::option(
                        "EXT",
                        "x1/xn",
                        "Hz and ppm bounds need a frequency-domain axis",
                    )
                })?;
                if matches!(self, Bound::Hz(_)) {
                    scale.hz_to_index(v)
                } else {
                    scale.ppm_to_index(v)
                }
            }
        };
        Ok(index.round() as i64)
    }
}

/// `EXT` options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtOptions {
    pub x1: Option<Bound>,
    pub xn: Option<Bound>,
    /// Rescale sweep width and origin to the retained range.
    pub sw: bool,
    /// Left half.
    pub left: bool,
    /// Right half.
    pub right: bool,
    /// Middle half.
    pub mid: bool,
}

impl ExtOptions {
    pub fn command(&self) -> String {
        let mut cmd = String::from("nmrPipe -fn EXT");
        for (bound, flag) in [(self.x1, "-x1"), (self.xn, "-xn")] {
            if let Some(b) = bound {
                cmd.push_str(&format!(" {flag} {b}"));
            }
        }
        for (set, flag) in [
            (self.left, " -left"),
            (self.right, " -right"),
            (self.mid, " -mid"),
            (self.sw, " -sw"),
        ] {
            if set {
                cmd.push_str(flag);
            }
        }
        cmd
    }

    pub fn region(&self) -> String {
        if self.left {
            "left half".to_string()
        } else if self.right {
            "right half".to_string()
        } else if self.mid {
            "middle half".to_string()
        } else {
            let show = |b: Option<Bound>, default: &str| {
                b.map(|b| b.to_string())
                    .unwrap_or_else(|| default.to_string())
            };
            format!("{} to {}", show(self.x1, "first"), show(self.xn, "last"))
        }
    }

    /// Inclusive 0-based range to keep on an `n`-point axis.
    fn range(&self, n: usize, scale: Option<&FrequencyScale>) -> Result<(usize, usize), ProcError> {
        let halves = [self.left, self.right, self.mid].iter().filter(|s| **s).count();
        if halves > 1 {
            return Err(ProcError::option(
                "EXT",
                "left/right/mid",
                "at most one half may be selected",
            ));
        }
        if halves == 1 && (self.x1.is_some() || self.xn.is_some()) {
            return Err(ProcError::option(
                "EXT",
                "x1/xn",
                "bounds cannot be combined with a half",
            ));
        }
        if n < 2 && halves == 1 {
            return Err(ProcError::range("EXT", format!("cannot halve a {n}-point axis")));
        }
        if self.left {
            return Ok((0, n / 2 - 1));
        }
        if self.right {
            return Ok((n / 2, n - 1));
        }
        if self.mid {
            let start = n / 4;
            return Ok((start, start + n / 2 - 1));
        }

        let a = match self.x1 {
            Some(b) => b.index(n, scale)?,
            None => 0,
        };
        let b = match self.xn {
            Some(b) => b.index(n, scale)?,
            None => n as i64 - 1,
        };
        // Frequency bounds are usually given high to low.
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if lo < 0 || hi >= n as i64 {
            return Err(ProcError::range(
                "EXT",
                format!("points {}..={} outside 1..={n}", lo + 1, hi + 1),
            ));
        }
        Ok((lo as usize, hi as usize))
    }
}

pub fn extract(
    spec: &Spectrum,
    opts: &ExtOptions,
    ctx: &RunContext,
) -> Result<Spectrum, ProcError> {
    let hdr = spec.header();
    let x = spec.shape().axis(0);
    let n = x.points;
    let convention = ctx.config.frequency_convention;
    let freq = spec.domain(CUR_XDIM) == Domain::Frequency;
    let scale = if freq {
        Some(FrequencyScale::from_header(hdr, CUR_XDIM, n, convention)?)
    } else {
        None
    };
    let (lo, hi) = opts.range(n, scale.as_ref())?;
    let new_n = hi - lo + 1;

    let complex = x.is_complex();
    let data = map_traces(
        spec.data(),
        x.total(),
        x.components * new_n,
        &ctx.cancel,
        |_, src, dst| {
            dst[..new_n].copy_from_slice(&src[lo..=hi]);
            if complex {
                dst[new_n..].copy_from_slice(&src[n + lo..=n + hi]);
            }
        },
    )?;

    let mut header = hdr.clone();
    match scale {
        Some(scale) if opts.sw => rescale_axis(&mut header, &scale, lo, hi, convention)?,
        Some(scale) => {
            if header.try_parm(ParmRole::FtSize, CUR_XDIM)? <= 0.0 {
                header.set_parm(ParmRole::FtSize, CUR_XDIM, scale.full_points() as f32)?;
            }
            let base = scale.offset() + 1;
            header.set_parm(ParmRole::X1, CUR_XDIM, (base + lo) as f32)?;
            header.set_parm(ParmRole::Xn, CUR_XDIM, (base + hi) as f32)?;
        }
        None => {
            if opts.sw {
                log::warn!("EXT: -sw ignored on a time-domain axis");
            }
            header.set_parm(ParmRole::Apod, CUR_XDIM, new_n as f32)?;
        }
    }

    let mut shape = spec.shape().clone();
    shape.set_axis(0, AxisShape { points: new_n, ..x });
    log::debug!("EXT: kept points {}..={} of {n}", lo + 1, hi + 1);
    let mut out = Spectrum::from_parts(header, data, shape)?;
    out.refresh_min_max();
    Ok(out)
}

/// Make the retained range a self-contained axis that keeps each point's frequency.
fn rescale_axis(
    header: &mut Fdata,
    scale: &FrequencyScale,
    lo: usize,
    hi: usize,
    convention: FrequencyConvention,
) -> Result<(), ProcError> {
    let new_n = hi - lo + 1;
    let spacing = scale.spacing();
    let new_sw = match convention {
        FrequencyConvention::Legacy => spacing * new_n as f64,
        FrequencyConvention::Corrected => spacing * (new_n.max(2) - 1) as f64,
    };
    let orig = scale.hz(hi as f64);
    let center = Fdata::center_for(new_n) as f64;
    let car_hz = orig + new_sw * (new_n as f64 - center) / new_n as f64;
    let obs = header.try_parm(ParmRole::Obs, CUR_XDIM)? as f64;

    header.set_parm(ParmRole::Sw, CUR_XDIM, new_sw as f32)?;
    header.set_parm(ParmRole::Orig, CUR_XDIM, orig as f32)?;
    header.set_parm(ParmRole::Center, CUR_XDIM, center as f32)?;
    if obs != 0.0 {
        header.set_parm(ParmRole::Car, CUR_XDIM, (car_hz / obs) as f32)?;
    }
    header.set_parm(ParmRole::FtSize, CUR_XDIM, new_n as f32)?;
    header.set_parm(ParmRole::X1, CUR_XDIM, 0.0)?;
    header.set_parm(ParmRole::Xn, CUR_XDIM, 0.0)?;
    Ok(())
}
