//! Zero- and first-order phase correction along X.

use super::{require_domain, RunContext};
use crate::error::ProcError;
use crate::ops::ft::rotate_phase;
use crate::spectrum::Spectrum;
use crate::trace::{from_complex, map_traces, to_complex};
use nmrpipe_core::enums::Domain;
use nmrpipe_core::params::{ParmRole, CUR_XDIM};
use serde::{Deserialize, Serialize};

/// `PS` options. Angles in degrees; missing angles come from the header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PsOptions {
    pub p0: Option<f64>,
    pub p1: Option<f64>,
    /// Undo a previous correction.
    pub inv: bool,
}

impl PsOptions {
    pub fn command(&self, p0: f64, p1: f64) -> String {
        let mut cmd = format!("nmrPipe -fn PS -p0 {p0:.2} -p1 {p1:.2}");
        if self.inv {
            cmd.push_str(" -inv");
        }
        cmd
    }

    /// Angles this call applies, given the header.
    pub fn angles(&self, spec: &Spectrum) -> Result<(f64, f64), ProcError> {
        let (hp0, hp1) = spec.phase_state(CUR_XDIM)?;
        Ok((self.p0.unwrap_or(hp0), self.p1.unwrap_or(hp1)))
    }
}

/// Apply `phase(k) = p0 + p1*k/n` to every X vector.
pub fn phase_correct(
    spec: &Spectrum,
    opts: &PsOptions,
    ctx: &RunContext,
) -> Result<Spectrum, ProcError> {
    require_domain("PS", spec, CUR_XDIM, Domain::Frequency)?;
    let data_type = spec.data_type(CUR_XDIM);
    if !data_type.is_complex() {
        return Err(ProcError::UnsupportedDataType {
            op: "PS",
            axis: CUR_XDIM,
            data_type,
        });
    }

    let (p0, p1) = opts.angles(spec)?;
    let (a0, a1) = if opts.inv { (-p0, -p1) } else { (p0, p1) };
    let len = spec.shape().trace_len();
    let data = map_traces(spec.data(), len, len, &ctx.cancel, |_, src, dst| {
        let mut buf = to_complex(src, true);
        rotate_phase(&mut buf, a0, a1);
        from_complex(&buf, dst, true);
    })?;

    let mut header = spec.header().clone();
    let (rp0, rp1) = if opts.inv { (0.0, 0.0) } else { (p0, p1) };
    header.set_parm(ParmRole::P0, CUR_XDIM, rp0 as f32)?;
    header.set_parm(ParmRole::P1, CUR_XDIM, rp1 as f32)?;
    Spectrum::from_parts(header, data, spec.shape().clone())
}
