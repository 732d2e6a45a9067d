//! Processing operations.
//!
//! Every operation reads a [`Spectrum`] and returns a new one; the input is
//! never modified, so a failed or cancelled step leaves the caller's data
//! intact. Operations act on the current X axis; other axes are reached by
//! transposing first.

pub mod apod;
pub mod ext;
pub mod ft;
pub mod phase;
pub mod transpose;
pub mod zf;

pub use apod::{ApodFlags, EmOptions, GmOptions, SpOptions, TmOptions, TriOptions, Window};
pub use ext::{Bound, ExtOptions};
pub use ft::FtOptions;
pub use phase::PsOptions;
pub use transpose::TpOptions;
pub use zf::ZfOptions;

use crate::config::ProcessingConfig;
use crate::error::ProcError;
use crate::spectrum::Spectrum;
use crate::trace::CancelToken;
use nmrpipe_core::enums::Domain;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings and cancellation shared by every operation of a run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub config: ProcessingConfig,
    pub cancel: CancelToken,
}

impl RunContext {
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }
}

/// True when the current X axis is the acquisition (direct) dimension.
pub(crate) fn direct_dim(spec: &Spectrum) -> bool {
    spec.header().dim_order()[0] == 2
}

pub(crate) fn require_domain(
    op: &'static str,
    spec: &Spectrum,
    axis: usize,
    domain: Domain,
) -> Result<(), ProcError> {
    let actual = spec.domain(axis);
    if actual != domain {
        return Err(ProcError::Domain {
            op,
            axis,
            domain: actual,
        });
    }
    Ok(())
}

/// One processing step, keyed by its nmrPipe function name.
///
/// Serialized as `{"fn": "EM", "lb": 5.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fn", rename_all = "UPPERCASE")]
pub enum Operation {
    Ft(FtOptions),
    Em(EmOptions),
    Gm(GmOptions),
    Sp(SpOptions),
    Tm(TmOptions),
    Tri(TriOptions),
    Ps(PsOptions),
    Zf(ZfOptions),
    Ext(ExtOptions),
    Tp(TpOptions),
    Ztp,
}

const NAMES: [&str; 11] = [
    "FT", "EM", "GM", "SP", "TM", "TRI", "PS", "ZF", "EXT", "TP", "ZTP",
];

impl Operation {
    /// Build an operation from its function name and an option object.
    ///
    /// Unknown names and unknown or mistyped options are rejected.
    pub fn from_options(name: &str, options: &serde_json::Value) -> Result<Self, ProcError> {
        let key = name.trim().to_uppercase();
        if !NAMES.contains(&key.as_str()) {
            return Err(ProcError::option(name, "fn", "unknown function"));
        }
        let mut map = match options {
            serde_json::Value::Null => serde_json::Map::new(),
            serde_json::Value::Object(map) => map.clone(),
            other => {
                return Err(ProcError::option(
                    &key,
                    "options",
                    format!("expected an object, got {other}"),
                ))
            }
        };
        if map.contains_key("fn") {
            return Err(ProcError::option(&key, "fn", "reserved key"));
        }
        map.insert("fn".to_string(), serde_json::Value::String(key.clone()));
        serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| ProcError::option(&key, "options", e.to_string()))
    }

    /// nmrPipe function name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ft(_) => "FT",
            Self::Em(_) => "EM",
            Self::Gm(_) => "GM",
            Self::Sp(_) => "SP",
            Self::Tm(_) => "TM",
            Self::Tri(_) => "TRI",
            Self::Ps(_) => "PS",
            Self::Zf(_) => "ZF",
            Self::Ext(_) => "EXT",
            Self::Tp(_) => "TP",
            Self::Ztp => "ZTP",
        }
    }

    /// Equivalent nmrPipe command line, as it would run on `spec`.
    pub fn command(&self, spec: &Spectrum) -> Result<String, ProcError> {
        Ok(match self {
            Self::Ft(o) => o.command(),
            Self::Em(o) => apod_command("EM", &format!("-lb {:.2}", o.lb), &o.flags()),
            Self::Gm(o) => apod_command(
                "GM",
                &format!("-g1 {:.2} -g2 {:.2} -g3 {:.3}", o.g1, o.g2, o.g3),
                &o.flags(),
            ),
            Self::Sp(o) => apod_command(
                "SP",
                &format!("-off {:.2} -end {:.2} -pow {:.1}", o.off, o.end, o.pow),
                &o.flags(),
            ),
            Self::Tm(o) => apod_command("TM", &format!("-t1 {} -t2 {}", o.t1, o.t2), &o.flags()),
            Self::Tri(o) => {
                let loc = o.loc.map(|l| format!("-loc {l} ")).unwrap_or_default();
                let args = format!("{loc}-lHi {:.2} -rHi {:.2}", o.lhi, o.rhi);
                apod_command("TRI", &args, &o.flags())
            }
            Self::Ps(o) => {
                let (p0, p1) = o.angles(spec)?;
                o.command(p0, p1)
            }
            Self::Zf(o) => o.command(),
            Self::Ext(o) => o.command(),
            Self::Tp(o) => o.command(),
            Self::Ztp => "nmrPipe -fn ZTP".to_string(),
        })
    }

    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Self::Ft(o) if o.inv => "Inverse Fourier Transform".to_string(),
            Self::Ft(o) if o.real => "Fourier Transform (real)".to_string(),
            Self::Ft(_) => "Fourier Transform".to_string(),
            Self::Em(o) => format!("Apodization: {}", o.window()),
            Self::Gm(o) => format!("Apodization: {}", o.window()),
            Self::Sp(o) => format!("Apodization: {}", o.window()),
            Self::Tm(o) => format!("Apodization: {}", o.window()),
            Self::Tri(o) => format!("Apodization: {}", o.window()),
            Self::Ps(o) => match (o.p0, o.p1) {
                (Some(p0), Some(p1)) => format!("Phase Correction (P0={p0:.1}°, P1={p1:.1}°)"),
                _ => "Phase Correction (header angles)".to_string(),
            },
            Self::Zf(o) if o.inv => "Remove Zero Fill".to_string(),
            Self::Zf(_) => "Zero Fill".to_string(),
            Self::Ext(o) => format!("Extract {}", o.region()),
            Self::Tp(o) => {
                let (a, b) = o.axes();
                format!("Transpose axes {a} and {b}")
            }
            Self::Ztp => "Transpose X and Z".to_string(),
        }
    }

    pub fn apply(&self, spec: &Spectrum, ctx: &RunContext) -> Result<Spectrum, ProcError> {
        match self {
            Self::Ft(o) => ft::fourier_transform(spec, o, ctx),
            Self::Em(o) => apod::apodize(spec, &o.window(), &o.flags(), ctx),
            Self::Gm(o) => apod::apodize(spec, &o.window(), &o.flags(), ctx),
            Self::Sp(o) => apod::apodize(spec, &o.window(), &o.flags(), ctx),
            Self::Tm(o) => apod::apodize(spec, &o.window(), &o.flags(), ctx),
            Self::Tri(o) => apod::apodize(spec, &o.window(), &o.flags(), ctx),
            Self::Ps(o) => phase::phase_correct(spec, o, ctx),
            Self::Zf(o) => zf::zero_fill(spec, o, ctx),
            Self::Ext(o) => ext::extract(spec, o, ctx),
            Self::Tp(o) => transpose::transpose(spec, o.axes(), ctx),
            Self::Ztp => transpose::transpose(spec, (1, 3), ctx),
        }
    }

    /// Axes, other than X, that this step moves.
    pub(crate) fn moved_axes(&self) -> Option<(usize, usize)> {
        match self {
            Self::Tp(o) => Some(o.axes()),
            Self::Ztp => Some((1, 3)),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn apod_command(name: &str, params: &str, flags: &ApodFlags) -> String {
    let mut cmd = format!("nmrPipe -fn {name} {params}");
    if flags.c != 1.0 {
        cmd.push_str(&format!(" -c {:.2}", flags.c));
    }
    if flags.inv {
        cmd.push_str(" -inv");
    }
    if flags.force {
        cmd.push_str(" -force");
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_parse_by_name() {
        let op = Operation::from_options("em", &json!({"lb": 2.5, "c": 0.5})).unwrap();
        assert_eq!(
            op,
            Operation::Em(EmOptions {
                lb: 2.5,
                c: 0.5,
                ..Default::default()
            })
        );
        let tri = Operation::from_options("TRI", &json!({"loc": 10, "lHi": 0.2})).unwrap();
        match tri {
            Operation::Tri(o) => {
                assert_eq!(o.loc, Some(10));
                assert_eq!(o.lhi, 0.2);
            }
            other => panic!("unexpected {other:?}"),
        }
        let ztp = Operation::from_options("ZTP", &serde_json::Value::Null).unwrap();
        assert_eq!(ztp, Operation::Ztp);
    }

    #[test]
    fn unknown_function_and_option_are_rejected() {
        assert!(matches!(
            Operation::from_options("BOGUS", &json!({})),
            Err(ProcError::InvalidOption { .. })
        ));
        let err = Operation::from_options("EM", &json!({"lbb": 1.0})).unwrap_err();
        match err {
            ProcError::InvalidOption { op, reason, .. } => {
                assert_eq!(op, "EM");
                assert!(reason.contains("lbb"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Operation::from_options("ZF", &json!({"size": "big"})).is_err());
        assert!(Operation::from_options("FT", &json!([1, 2])).is_err());
    }

    #[test]
    fn json_form_is_tagged_by_function() {
        let op = Operation::Zf(ZfOptions {
            size: Some(2048),
            ..Default::default()
        });
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["fn"], "ZF");
        assert_eq!(value["size"], 2048);
        let back: Operation = serde_json::from_value(value).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn commands_read_like_nmrpipe() {
        let spec = crate::spectrum::tests::fid_1d(8, 100.0, vec![0.0; 16]);
        let em = Operation::from_options("EM", &json!({"lb": 1.0})).unwrap();
        assert_eq!(em.command(&spec).unwrap(), "nmrPipe -fn EM -lb 1.00");
        let ft = Operation::from_options("FT", &json!({"auto": true})).unwrap();
        assert_eq!(ft.command(&spec).unwrap(), "nmrPipe -fn FT -auto");
        let ps = Operation::from_options("PS", &json!({"p0": 45.0})).unwrap();
        assert_eq!(ps.command(&spec).unwrap(), "nmrPipe -fn PS -p0 45.00 -p1 0.00");
    }
}
