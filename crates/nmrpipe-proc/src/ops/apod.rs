//! Apodization: EM, GM, SP, TM and TRI windows along X.

use super::{direct_dim, require_domain, RunContext};
use crate::error::ProcError;
use crate::spectrum::Spectrum;
use crate::trace::map_traces;
use nmrpipe_core::enums::{ApodCode, DmxMode, Domain};
use nmrpipe_core::params::{ParmRole, CUR_XDIM};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Window shape and its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    /// Exponential, `lb` Hz of line broadening.
    Em { lb: f64 },
    /// Lorentz-to-Gauss: inverse exponential `g1` Hz, gaussian `g2` Hz centered at fraction `g3`.
    Gm { g1: f64, g2: f64, g3: f64 },
    /// Shifted sine bell from `off` to `end` (in units of pi), raised to `pow`.
    Sp { off: f64, end: f64, pow: f64 },
    /// Trapezoid with `t1` points rising and `t2` points falling.
    Tm { t1: usize, t2: usize },
    /// Triangle peaking at 1-based point `loc`, starting at `lhi` and ending at `rhi`.
    Tri { loc: Option<usize>, lhi: f64, rhi: f64 },
}

impl Window {
    pub fn code(&self) -> ApodCode {
        match self {
            Self::Em { .. } => ApodCode::Em,
            Self::Gm { .. } => ApodCode::Gm,
            Self::Sp { .. } => ApodCode::Sp,
            Self::Tm { .. } => ApodCode::Tm,
            Self::Tri { .. } => ApodCode::Tri,
        }
    }

    /// Values recorded in NDAPODQ1..Q3.
    pub fn q(&self) -> [f64; 3] {
        match *self {
            Self::Em { lb } => [lb, 0.0, 0.0],
            Self::Gm { g1, g2, g3 } => [g1, g2, g3],
            Self::Sp { off, end, pow } => [off, end, pow],
            Self::Tm { t1, t2 } => [t1 as f64, t2 as f64, 0.0],
            Self::Tri { loc, lhi, rhi } => [loc.unwrap_or(0) as f64, lhi, rhi],
        }
    }

    fn needs_sw(&self) -> bool {
        matches!(self, Self::Em { .. } | Self::Gm { .. })
    }

    /// Window value at point `x` (0-based, fractional allowed) of an `n`-point window.
    pub fn value(&self, x: f64, n: usize, sw: f64) -> f64 {
        let last = (n.max(2) - 1) as f64;
        match *self {
            Self::Em { lb } => (-PI * lb * x / sw).exp(),
            Self::Gm { g1, g2, g3 } => {
                let e = PI * g1 * x / sw;
                let g = 0.6 * PI * g2 * (g3 * last - x) / sw;
                (e - g * g).exp()
            }
            Self::Sp { off, end, pow } => {
                let s = (PI * off + PI * (end - off) * x / last).sin();
                if pow.fract() == 0.0 {
                    s.powi(pow as i32)
                } else {
                    s.powf(pow)
                }
            }
            Self::Tm { t1, t2 } => {
                let fall_start = n.saturating_sub(t2) as f64;
                if x < t1 as f64 {
                    if t1 > 1 {
                        (x / (t1 - 1) as f64).min(1.0)
                    } else {
                        0.0
                    }
                } else if x >= fall_start && t2 > 1 {
                    (1.0 - (x - fall_start) / (t2 - 1) as f64).max(0.0)
                } else {
                    1.0
                }
            }
            Self::Tri { loc, lhi, rhi } => {
                let loc = loc.unwrap_or(n / 2).clamp(1, n.max(1)) as f64;
                if x < loc {
                    if loc > 1.0 {
                        lhi + (1.0 - lhi) * x / (loc - 1.0)
                    } else {
                        lhi
                    }
                } else {
                    let right = n as f64 - loc;
                    if right > 0.0 {
                        1.0 + (rhi - 1.0) * (x - loc + 1.0) / right
                    } else {
                        rhi
                    }
                }
            }
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Em { lb } => write!(f, "EM (LB={lb:.1} Hz)"),
            Self::Gm { g1, g2, g3 } => write!(f, "GM (G1={g1:.1}, G2={g2:.1}, G3={g3:.3})"),
            Self::Sp { off, end, pow } => {
                write!(f, "SP (off={off:.2}, end={end:.2}, pow={pow:.1})")
            }
            Self::Tm { t1, t2 } => write!(f, "TM (t1={t1}, t2={t2})"),
            Self::Tri { loc, lhi, rhi } => match loc {
                Some(loc) => write!(f, "TRI (loc={loc}, lHi={lhi:.2}, rHi={rhi:.2})"),
                None => write!(f, "TRI (lHi={lhi:.2}, rHi={rhi:.2})"),
            },
        }
    }
}

/// Options shared by every window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApodFlags {
    /// First-point scale.
    pub c: f64,
    /// Divide by the window instead of multiplying.
    pub inv: bool,
    /// Allow frequency-domain data.
    pub force: bool,
}

macro_rules! apod_options {
    (
        $(#[$meta:meta])* $name:ident {
            $($field:ident : $ty:ty = $default:expr $(, alias = $alias:literal)?;)*
        } => $window:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct $name {
            $($(#[serde(alias = $alias)])? pub $field: $ty,)*
            pub c: f64,
            pub inv: bool,
            pub force: bool,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default,)*
                    c: 1.0,
                    inv: false,
                    force: false,
                }
            }
        }

        impl $name {
            pub fn window(&self) -> Window {
                let $name { $($field,)* .. } = self.clone();
                $window
            }

            pub fn flags(&self) -> ApodFlags {
                ApodFlags {
                    c: self.c,
                    inv: self.inv,
                    force: self.force,
                }
            }
        }
    };
}

apod_options!(
    /// `EM`: exponential line broadening.
    EmOptions { lb: f64 = 0.0; } => Window::Em { lb }
);
apod_options!(
    /// `GM`: Lorentz-to-Gauss.
    GmOptions { g1: f64 = 0.0; g2: f64 = 0.0; g3: f64 = 0.0; } => Window::Gm { g1, g2, g3 }
);
apod_options!(
    /// `SP`: shifted sine bell.
    SpOptions { off: f64 = 0.0; end: f64 = 1.0; pow: f64 = 1.0; } => Window::Sp { off, end, pow }
);
apod_options!(
    /// `TM`: trapezoid.
    TmOptions { t1: usize = 0; t2: usize = 0; } => Window::Tm { t1, t2 }
);
apod_options!(
    /// `TRI`: triangle.
    TriOptions {
        loc: Option<usize> = None;
        lhi: f64 = 0.0, alias = "lHi";
        rhi: f64 = 0.0, alias = "rHi";
    } => Window::Tri { loc, lhi, rhi }
);

/// Apply a window along X.
pub fn apodize(
    spec: &Spectrum,
    window: &Window,
    flags: &ApodFlags,
    ctx: &RunContext,
) -> Result<Spectrum, ProcError> {
    let op: &'static str = match window.code() {
        ApodCode::Em => "EM",
        ApodCode::Gm => "GM",
        ApodCode::Sp => "SP",
        ApodCode::Tm => "TM",
        _ => "TRI",
    };
    if !flags.force {
        require_domain(op, spec, CUR_XDIM, Domain::Time)?;
    }

    let hdr = spec.header();
    let x = spec.shape().axis(0);
    let n = x.points;
    let sw = hdr.try_parm(ParmRole::Sw, CUR_XDIM)? as f64;
    if window.needs_sw() && sw <= 0.0 {
        return Err(ProcError::option(op, "sw", "sweep width must be positive"));
    }
    let recorded = hdr.try_parm(ParmRole::Apod, CUR_XDIM)?.max(0.0) as usize;
    let apod_n = if recorded > 0 && recorded <= n { recorded } else { n };

    let centered = ctx.config.apodization_group_delay
        && direct_dim(spec)
        && spec.group_delay() > 0.0
        && hdr.dmx_mode() != DmxMode::Off;
    let gd = if centered { spec.group_delay() } else { 0.0 };

    let mut weights = vec![1.0f32; n];
    for (i, w) in weights.iter_mut().enumerate().take(apod_n) {
        *w = window.value((i as f64 - gd).abs(), apod_n, sw) as f32;
    }
    if let Some(w0) = weights.first_mut() {
        *w0 *= flags.c as f32;
    }

    let complex = x.is_complex();
    let trace_len = x.total();
    let inv = flags.inv;
    let data = map_traces(spec.data(), trace_len, trace_len, &ctx.cancel, |_, src, dst| {
        for (j, (d, s)) in dst.iter_mut().zip(src).enumerate() {
            let w = weights[if complex { j % n } else { j }];
            *d = if !inv {
                s * w
            } else if w != 0.0 {
                s / w
            } else {
                *s
            };
        }
    })?;

    let mut header = hdr.clone();
    let (code, q, c1) = if inv {
        (ApodCode::None, [0.0; 3], 0.0)
    } else {
        (window.code(), window.q(), flags.c - 1.0)
    };
    header.set_parm(ParmRole::ApodCode, CUR_XDIM, code as i32 as f32)?;
    for (role, value) in [ParmRole::ApodQ1, ParmRole::ApodQ2, ParmRole::ApodQ3]
        .into_iter()
        .zip(q)
    {
        header.set_parm(role, CUR_XDIM, value as f32)?;
    }
    header.set_parm(ParmRole::C1, CUR_XDIM, c1 as f32)?;
    header.set_parm(ParmRole::Apod, CUR_XDIM, apod_n as f32)?;
    if let Window::Em { lb } = window {
        header.set_parm(ParmRole::Lb, CUR_XDIM, if inv { 0.0 } else { *lb as f32 })?;
    }
    if centered {
        log::debug!("{op}: window centered on group delay {gd:.3}");
    }
    Spectrum::from_parts(header, data, spec.shape().clone())
}
