//! Zero fill along X.

use super::RunContext;
use crate::error::ProcError;
use crate::spectrum::Spectrum;
use crate::trace::map_traces;
use nmrpipe_core::fdata::{Fdata, MAX_NMR_SIZE};
use nmrpipe_core::layout::AxisShape;
use nmrpipe_core::params::{ParmRole, CUR_XDIM};
use serde::{Deserialize, Serialize};

/// `ZF` options. Precedence: `inv`, `size`, `pad`, `zf` (default one doubling).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZfOptions {
    /// Absolute target size in points.
    pub size: Option<usize>,
    /// Number of doublings.
    pub zf: Option<u32>,
    /// Points of zeros to append.
    pub pad: Option<usize>,
    /// Round the target up to a power of two.
    pub auto: bool,
    /// Remove a previous zero fill, back to the valid time-domain size.
    pub inv: bool,
}

impl ZfOptions {
    pub fn command(&self) -> String {
        let mut cmd = String::from("nmrPipe -fn ZF");
        if self.inv {
            cmd.push_str(" -inv");
        } else if let Some(size) = self.size {
            cmd.push_str(&format!(" -size {size}"));
        } else if let Some(pad) = self.pad {
            cmd.push_str(&format!(" -pad {pad}"));
        } else if let Some(zf) = self.zf {
            cmd.push_str(&format!(" -zf {zf}"));
        }
        if self.auto {
            cmd.push_str(" -auto");
        }
        cmd
    }

    /// Target size for an axis of `current` points.
    pub fn target(&self, current: usize, apod: usize) -> Result<usize, ProcError> {
        let target = if self.inv {
            if apod == 0 {
                return Err(ProcError::option(
                    "ZF",
                    "inv",
                    "no valid time-domain size is recorded",
                ));
            }
            return Ok(apod);
        } else if let Some(size) = self.size {
            size
        } else if let Some(pad) = self.pad {
            current
                .checked_add(pad)
                .ok_or_else(|| ProcError::option("ZF", "pad", format!("{pad} points overflow")))?
        } else {
            let doublings = self.zf.unwrap_or(1);
            current
                .checked_shl(doublings)
                .filter(|t| t >> doublings == current)
                .ok_or_else(|| {
                    ProcError::option("ZF", "zf", format!("{doublings} doublings overflow"))
                })?
        };
        if !self.auto {
            return Ok(target);
        }
        target
            .max(1)
            .checked_next_power_of_two()
            .ok_or_else(|| ProcError::option("ZF", "auto", format!("{target} has no power of two")))
    }
}

pub fn zero_fill(
    spec: &Spectrum,
    opts: &ZfOptions,
    ctx: &RunContext,
) -> Result<Spectrum, ProcError> {
    let hdr = spec.header();
    let x = spec.shape().axis(0);
    let current = x.points;
    let apod = hdr.try_parm(ParmRole::Apod, CUR_XDIM)?.max(0.0) as usize;
    let target = opts.target(current, apod)?;
    if !opts.inv && target < current {
        return Err(ProcError::range(
            "ZF",
            format!("target size {target} is smaller than the current {current} points"),
        ));
    }
    if opts.inv && target > current {
        return Err(ProcError::range(
            "ZF",
            format!("recorded size {target} exceeds the current {current} points"),
        ));
    }

    if target > MAX_NMR_SIZE as usize {
        return Err(ProcError::range(
            "ZF",
            format!("target size {target} exceeds the {MAX_NMR_SIZE}-point axis limit"),
        ));
    }
    x.components
        .checked_mul(target)
        .and_then(|len| len.checked_mul(spec.shape().trace_count()))
        .ok_or_else(|| ProcError::option("ZF", "size", format!("{target} points overflow")))?;

    let complex = x.is_complex();
    let kept = current.min(target);
    let data = map_traces(
        spec.data(),
        x.total(),
        x.components * target,
        &ctx.cancel,
        |_, src, dst| {
            dst[..kept].copy_from_slice(&src[..kept]);
            if complex {
                dst[target..target + kept].copy_from_slice(&src[current..current + kept]);
            }
        },
    )?;

    let mut header = hdr.clone();
    if apod == 0 {
        header.set_parm(ParmRole::Apod, CUR_XDIM, current as f32)?;
    }
    let zf_record = if opts.inv { 0.0 } else { -(target as f32) };
    header.set_parm(ParmRole::Zf, CUR_XDIM, zf_record)?;
    header.set_parm(ParmRole::Center, CUR_XDIM, Fdata::center_for(target) as f32)?;
    header.compute_orig(CUR_XDIM, target)?;

    let mut shape = spec.shape().clone();
    shape.set_axis(0, AxisShape { points: target, ..x });
    log::debug!("ZF: {current} -> {target} points");
    Spectrum::from_parts(header, data, shape)
}
