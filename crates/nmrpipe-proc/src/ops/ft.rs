//! Fourier transform along X, with quadrature sign handling and
//! digital-filter removal.
//!
//! Forward: unnormalized inverse DFT, then a half-length rotation so that
//! positive frequencies sit on the left. Inverse: the exact reverse,
//! normalized by the length.

use super::{direct_dim, RunContext};
use crate::config::GroupDelayMode;
use crate::dfilter::{fractional_phase, roll_left, split_delay, ReflectCorrector};
use crate::error::ProcError;
use crate::spectrum::Spectrum;
use crate::trace::{from_complex, map_traces, to_complex};
use nmrpipe_core::enums::{AqSign, DataType, DmxMode, Domain, QuadFlag};
use nmrpipe_core::layout::AxisShape;
use nmrpipe_core::params::{ParmRole, CUR_XDIM};
use nmrpipe_core::{Fdata, LayoutError};
use num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// `FT` options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FtOptions {
    /// Choose direction, real/complex and sign handling from the header.
    pub auto: bool,
    /// Transform the real part only.
    pub real: bool,
    /// Inverse transform.
    pub inv: bool,
    /// Alternate the sign of every other point.
    pub alt: bool,
    /// Negate imaginaries.
    pub neg: bool,
    /// Override the header's digital-filter flag.
    pub dmx: Option<DmxMode>,
}

impl FtOptions {
    pub fn command(&self) -> String {
        let mut cmd = String::from("nmrPipe -fn FT");
        for (set, flag) in [
            (self.auto, " -auto"),
            (self.real, " -real"),
            (self.inv, " -inv"),
            (self.alt, " -alt"),
            (self.neg, " -neg"),
        ] {
            if set {
                cmd.push_str(flag);
            }
        }
        match self.dmx {
            Some(DmxMode::On) => cmd.push_str(" -dmx"),
            Some(DmxMode::Off) => cmd.push_str(" -nodmx"),
            _ => {}
        }
        cmd
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DelayFix {
    Legacy { whole: usize, frac: f64 },
    Reflect(f64),
}

/// What one FT call will do, resolved from options and header.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FtPlan {
    inverse: bool,
    real: bool,
    alt: bool,
    neg: bool,
    delay: Option<DelayFix>,
}

fn sign_code(hdr: &Fdata, data_type: DataType) -> Result<AqSign, ProcError> {
    let code = hdr.aq_sign_code(CUR_XDIM);
    AqSign::from_i32(code)
        .filter(|sign| sign.accepts(data_type))
        .ok_or_else(|| LayoutError::SignCode { axis: 'X', code }.into())
}

fn plan(spec: &Spectrum, opts: &FtOptions, ctx: &RunContext) -> Result<FtPlan, ProcError> {
    let hdr = spec.header();
    let domain = spec.domain(CUR_XDIM);
    let inverse = opts.inv || (opts.auto && domain == Domain::Frequency);
    let wanted = if inverse { Domain::Frequency } else { Domain::Time };
    if domain != wanted {
        return Err(ProcError::Domain {
            op: "FT",
            axis: CUR_XDIM,
            domain,
        });
    }

    let data_type = spec.data_type(CUR_XDIM);
    let complex = data_type.is_complex();
    if inverse && !complex {
        return Err(ProcError::UnsupportedDataType {
            op: "FT",
            axis: CUR_XDIM,
            data_type,
        });
    }
    let real = !inverse && (!complex || opts.real);

    let (mut alt, mut neg) = (opts.alt, opts.neg);
    if opts.auto && !inverse {
        let sign = sign_code(hdr, data_type)?;
        alt |= sign.alternates();
        neg |= sign.negates_imag();
    }

    let gd = spec.group_delay();
    let mode = opts.dmx.unwrap_or_else(|| hdr.dmx_mode());
    let delay = if !inverse && direct_dim(spec) && gd > 0.0 && mode != DmxMode::Off {
        Some(match ctx.config.group_delay {
            GroupDelayMode::Legacy => {
                let (whole, frac) = split_delay(gd);
                DelayFix::Legacy { whole, frac }
            }
            GroupDelayMode::Reflect => DelayFix::Reflect(gd),
        })
    } else {
        None
    };

    Ok(FtPlan {
        inverse,
        real,
        alt,
        neg,
        delay,
    })
}

/// Multiply by `exp(i*(p0 + p1*k/n))`, angles in degrees.
pub(crate) fn rotate_phase(buf: &mut [Complex<f32>], p0: f64, p1: f64) {
    let n = buf.len().max(1) as f64;
    for (k, z) in buf.iter_mut().enumerate() {
        let angle = (p0 + p1 * k as f64 / n) * PI / 180.0;
        let rot = Complex::new(angle.cos() as f32, angle.sin() as f32);
        *z = *z * rot;
    }
}

/// Transform X.
pub fn fourier_transform(
    spec: &Spectrum,
    opts: &FtOptions,
    ctx: &RunContext,
) -> Result<Spectrum, ProcError> {
    let plan = plan(spec, opts, ctx)?;
    let x = spec.shape().axis(0);
    let n = x.points;
    let in_complex = x.is_complex();
    let out_points = if plan.real { n / 2 } else { n };
    if out_points == 0 {
        return Err(ProcError::range("FT", format!("{n} points cannot be transformed")));
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = if plan.inverse {
        planner.plan_fft_forward(n)
    } else {
        planner.plan_fft_inverse(n)
    };
    let reflect = match plan.delay {
        Some(DelayFix::Reflect(gd)) => Some(ReflectCorrector::new(n, gd)),
        _ => None,
    };

    let data = map_traces(spec.data(), x.total(), 2 * out_points, &ctx.cancel, |_, src, dst| {
        let mut buf = if in_complex && plan.real {
            to_complex(&src[..n], false)
        } else {
            to_complex(src, in_complex)
        };

        if plan.inverse {
            buf.rotate_left(n / 2);
            fft.process(&mut buf);
            let scale = 1.0 / n as f32;
            for z in buf.iter_mut() {
                *z = *z * scale;
            }
        } else {
            match plan.delay {
                Some(DelayFix::Legacy { whole, .. }) => roll_left(&mut buf, whole),
                Some(DelayFix::Reflect(_)) => {
                    if let Some(corrector) = &reflect {
                        corrector.correct(&mut buf);
                    }
                }
                None => {}
            }
            if plan.neg {
                for z in buf.iter_mut() {
                    z.im = -z.im;
                }
            }
            if plan.alt {
                for z in buf.iter_mut().skip(1).step_by(2) {
                    *z = -*z;
                }
            }
            fft.process(&mut buf);
            buf.rotate_right(n / 2);
            if let Some(DelayFix::Legacy { frac, .. }) = plan.delay {
                if frac > 0.0 {
                    let (p0, p1) = fractional_phase(frac);
                    rotate_phase(&mut buf, p0, p1);
                }
            }
        }
        from_complex(&buf[..out_points], dst, true);
    })?;

    let mut header = spec.header().clone();
    let mut shape = spec.shape().clone();
    shape.set_axis(0, AxisShape::complex(out_points));
    header.set_parm(ParmRole::QuadFlag, CUR_XDIM, QuadFlag::Complex as i32 as f32)?;
    if plan.inverse {
        header.set_domain(CUR_XDIM, Domain::Time)?;
    } else {
        header.set_domain(CUR_XDIM, Domain::Frequency)?;
        header.set_aqsign(CUR_XDIM, AqSign::None)?;
        header.set_parm(ParmRole::FtSize, CUR_XDIM, out_points as f32)?;
        header.set_parm(ParmRole::Center, CUR_XDIM, Fdata::center_for(out_points) as f32)?;
        header.compute_orig(CUR_XDIM, out_points)?;
        // The transformed axis is complete; an earlier extract range no longer applies.
        header.set_parm(ParmRole::X1, CUR_XDIM, 0.0)?;
        header.set_parm(ParmRole::Xn, CUR_XDIM, 0.0)?;
    }
    if plan.delay.is_some() {
        header.set_dmx(spec.group_delay() as f32, DmxMode::Off);
    }

    log::debug!("FT plan: {plan:?}, {n} -> {out_points} points");
    let mut out = Spectrum::from_parts(header, data, shape)?;
    out.refresh_min_max();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;
    use crate::spectrum::tests::fid_1d;

    /// Complex exponential at `cycles` per vector, stored X-block style.
    fn tone(n: usize, cycles: f64) -> Vec<f32> {
        let mut v = vec![0.0; 2 * n];
        for t in 0..n {
            let a = 2.0 * PI * cycles * t as f64 / n as f64;
            v[t] = a.cos() as f32;
            v[n + t] = a.sin() as f32;
        }
        v
    }

    fn peak(spec: &Spectrum) -> usize {
        let n = spec.size(1);
        let d = spec.data();
        (0..n)
            .max_by(|&a, &b| {
                let ma = d[a].hypot(d[n + a]);
                let mb = d[b].hypot(d[n + b]);
                ma.total_cmp(&mb)
            })
            .unwrap_or(0)
    }

    #[test]
    fn positive_frequency_lands_left_of_center() {
        let spec = fid_1d(64, 1000.0, tone(64, 5.0));
        let out = fourier_transform(&spec, &FtOptions::default(), &RunContext::default()).unwrap();
        assert_eq!(peak(&out), 32 - 5);
        assert!((out.data()[27] - 64.0).abs() < 1e-3);
        assert_eq!(out.domain(1), Domain::Frequency);
        assert_eq!(out.header().get_parm(ParmRole::FtSize, 1), 64.0);
        assert_eq!(out.header().get_max(), out.data().iter().cloned().fold(f32::MIN, f32::max));
    }

    #[test]
    fn inverse_restores_fid() {
        let ctx = RunContext::default();
        let fid = tone(32, 3.0);
        let spec = fid_1d(32, 1000.0, fid.clone());
        let freq = fourier_transform(&spec, &FtOptions::default(), &ctx).unwrap();
        let auto = FtOptions {
            auto: true,
            ..Default::default()
        };
        let back = fourier_transform(&freq, &auto, &ctx).unwrap();
        assert_eq!(back.domain(1), Domain::Time);
        for (a, b) in back.data().iter().zip(&fid) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn real_transform_halves_and_becomes_complex() {
        let mut spec = fid_1d(16, 1000.0, vec![0.0; 32]);
        let (mut hdr, _) = spec.into_parts();
        hdr.set_parm(ParmRole::QuadFlag, 1, QuadFlag::Real as i32 as f32).unwrap();
        let data: Vec<f32> = (0..16)
            .map(|t| (2.0 * PI * 2.0 * t as f64 / 16.0).cos() as f32)
            .collect();
        spec = Spectrum::new(hdr, data).unwrap();

        let opts = FtOptions {
            auto: true,
            ..Default::default()
        };
        let out = fourier_transform(&spec, &opts, &RunContext::default()).unwrap();
        assert_eq!(out.size(1), 8);
        assert_eq!(out.data_type(1), DataType::Complex);
        assert_eq!(out.data().len(), 16);
        assert_eq!(peak(&out), 6);
    }

    #[test]
    fn sequential_code_on_complex_data_is_unsupported() {
        let spec = fid_1d(8, 1000.0, vec![0.0; 16]);
        let (mut hdr, data) = spec.into_parts();
        hdr.set_aqsign(1, AqSign::Sequential).unwrap();
        // The layout itself rejects the combination.
        assert!(matches!(
            Spectrum::new(hdr, data),
            Err(ProcError::UnsupportedLayout(LayoutError::SignCode { .. }))
        ));
    }

    #[test]
    fn states_code_alternates_under_auto() {
        let fid = tone(16, 0.0);
        let spec = fid_1d(16, 1000.0, fid);
        let (mut hdr, data) = spec.into_parts();
        hdr.set_aqsign(1, AqSign::States).unwrap();
        let spec = Spectrum::new(hdr, data).unwrap();
        let opts = FtOptions {
            auto: true,
            ..Default::default()
        };
        // Alternation moves a DC signal to the band edge.
        let out = fourier_transform(&spec, &opts, &RunContext::default()).unwrap();
        assert_eq!(peak(&out), 0);
        assert_eq!(out.header().aq_sign_code(1), 0);
    }

    fn delayed(gd: f32) -> Spectrum {
        let n = 256;
        let mut data = tone(n, 20.0);
        for (t, v) in data.iter_mut().enumerate() {
            let decay = (-((t % n) as f32) / 80.0).exp();
            *v *= decay;
        }
        let spec = fid_1d(n, 1000.0, data);
        let (mut hdr, data) = spec.into_parts();
        hdr.set_dmx(gd, DmxMode::Auto);
        Spectrum::new(hdr, data).unwrap()
    }

    #[test]
    fn legacy_delay_rolls_then_phases() {
        let spec = delayed(67.98);
        let ctx = RunContext::default();
        let out = fourier_transform(&spec, &FtOptions::default(), &ctx).unwrap();
        assert_eq!(out.header().dmx_mode(), DmxMode::Off);

        // Same result by hand: roll 67, FT, phase for 0.98.
        let n = 256;
        let mut buf = to_complex(spec.data(), true);
        buf.rotate_left(67);
        FftPlanner::<f32>::new().plan_fft_inverse(n).process(&mut buf);
        buf.rotate_right(n / 2);
        rotate_phase(&mut buf, 180.0 * 0.98, -360.0 * 0.98);
        let mut expected = vec![0.0; 2 * n];
        from_complex(&buf, &mut expected, true);
        for (a, b) in out.data().iter().zip(&expected) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn reflect_mode_differs_and_is_reproducible() {
        let spec = delayed(67.98);
        let ft = FtOptions::default();
        let legacy = fourier_transform(&spec, &ft, &RunContext::default()).unwrap();
        let ctx = RunContext {
            config: ProcessingConfig {
                group_delay: GroupDelayMode::Reflect,
                ..Default::default()
            },
            ..Default::default()
        };
        let a = fourier_transform(&spec, &FtOptions::default(), &ctx).unwrap();
        let b = fourier_transform(&spec, &FtOptions::default(), &ctx).unwrap();
        assert_eq!(a.data(), b.data());
        let diff: f32 = a.data().iter().zip(legacy.data()).map(|(x, y)| (x - y).abs()).sum();
        assert!(diff > 1.0);
    }

    #[test]
    fn nodmx_skips_correction() {
        let spec = delayed(12.5);
        let opts = FtOptions {
            dmx: Some(DmxMode::Off),
            ..Default::default()
        };
        let out = fourier_transform(&spec, &opts, &RunContext::default()).unwrap();
        let plain = fourier_transform(
            &fid_1d(256, 1000.0, spec.data().to_vec()),
            &FtOptions::default(),
            &RunContext::default(),
        )
        .unwrap();
        assert_eq!(out.data(), plain.data());
        assert_eq!(out.header().dmx_mode(), DmxMode::Auto);
    }

    #[test]
    fn time_domain_inverse_is_rejected() {
        let spec = fid_1d(8, 1000.0, vec![0.0; 16]);
        let opts = FtOptions {
            inv: true,
            ..Default::default()
        };
        assert!(matches!(
            fourier_transform(&spec, &opts, &RunContext::default()),
            Err(ProcError::Domain { .. })
        ));
    }
}
