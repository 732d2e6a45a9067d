//! Ordered list of operations applied to one spectrum.
//!
//! A pipeline is plain data and round-trips through JSON:
//!
//! ```json
//! {
//!   "config": { "group_delay": "legacy" },
//!   "operations": [
//!     { "fn": "EM", "lb": 1.0 },
//!     { "fn": "ZF", "size": 2048 },
//!     { "fn": "FT", "auto": true }
//!   ]
//! }
//! ```

use crate::config::ProcessingConfig;
use crate::error::ProcError;
use crate::history::History;
use crate::ops::{Operation, RunContext};
use crate::spectrum::Spectrum;
use crate::trace::CancelToken;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub config: ProcessingConfig,
    #[serde(rename = "operations")]
    ops: Vec<Operation>,
}

impl Pipeline {
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            config,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: Operation) {
        self.ops.push(op);
    }

    pub fn with(mut self, op: Operation) -> Self {
        self.ops.push(op);
        self
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    pub fn from_json(json: &str) -> Result<Self, ProcError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ProcError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply every operation in order.
    ///
    /// Each successful step is appended to `history`. On error the steps
    /// already applied stay recorded and the error is returned; the caller's
    /// spectrum is consumed either way.
    pub fn run(&self, spectrum: Spectrum, history: &mut History) -> Result<Spectrum, ProcError> {
        self.run_with_cancel(spectrum, history, CancelToken::new())
    }

    /// As [`Pipeline::run`], stopping early once `cancel` is set.
    pub fn run_with_cancel(
        &self,
        spectrum: Spectrum,
        history: &mut History,
        cancel: CancelToken,
    ) -> Result<Spectrum, ProcError> {
        let ctx = RunContext {
            config: self.config.clone(),
            cancel,
        };
        let pool = self.config.thread_pool()?;
        log::info!(
            "running {} operations on a {}D spectrum",
            self.ops.len(),
            spectrum.ndim()
        );

        let mut current = spectrum;
        for op in &self.ops {
            let command = op.command(&current)?;
            let result = match &pool {
                Some(pool) => pool.install(|| op.apply(&current, &ctx)),
                None => op.apply(&current, &ctx),
            };
            current = result.map_err(|e| {
                log::error!("{} failed: {e}", op.name());
                e
            })?;
            history.add_entry(op.name(), &op.describe(), &command);
        }
        Ok(current)
    }

    /// Run on XY planes `first..=last` only.
    ///
    /// The planes are cut out with [`Spectrum::plane_subset`]; steps that
    /// move the Z or A axis cannot run on a partition.
    pub fn run_partition(
        &self,
        spectrum: &Spectrum,
        first: usize,
        last: usize,
        history: &mut History,
    ) -> Result<Spectrum, ProcError> {
        self.check_partitionable()?;
        let subset = spectrum.plane_subset(first, last)?;
        self.run(subset, history)
    }

    /// Run on consecutive groups of `planes` planes and merge the results.
    ///
    /// Only the first group is recorded in `history`.
    pub fn run_partitioned(
        &self,
        spectrum: &Spectrum,
        planes: usize,
        history: &mut History,
    ) -> Result<Spectrum, ProcError> {
        self.check_partitionable()?;
        if planes == 0 {
            return Err(ProcError::range("partition", "a partition needs at least one plane"));
        }
        let total = spectrum.shape().plane_count();
        let mut parts = Vec::new();
        let mut first = 1;
        while first <= total {
            let last = (first + planes - 1).min(total);
            log::debug!("partition {first}..={last} of {total}");
            let part = if first == 1 {
                self.run_partition(spectrum, first, last, history)?
            } else {
                self.run_partition(spectrum, first, last, &mut History::new())?
            };
            parts.push(part);
            first = last + 1;
        }
        Spectrum::reassemble(spectrum.header(), parts)
    }

    fn check_partitionable(&self) -> Result<(), ProcError> {
        for op in &self.ops {
            if let Some((a, b)) = op.moved_axes() {
                if a > 2 || b > 2 {
                    return Err(ProcError::option(
                        op.name(),
                        "axes",
                        "Z and A cannot move inside a partition",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupDelayMode;
    use crate::ops::{EmOptions, FtOptions, TpOptions, ZfOptions};
    use crate::spectrum::tests::{fid_1d, header_3d};
    use serde_json::json;

    fn decaying_fid(n: usize) -> Spectrum {
        let mut data = vec![0.0; 2 * n];
        for t in 0..n {
            let a = 0.3 * t as f32;
            let decay = (-(t as f32) / 20.0).exp();
            data[t] = a.cos() * decay;
            data[n + t] = a.sin() * decay;
        }
        fid_1d(n, 2000.0, data)
    }

    fn basic() -> Pipeline {
        Pipeline::default()
            .with(Operation::Em(EmOptions {
                lb: 2.0,
                ..Default::default()
            }))
            .with(Operation::Zf(ZfOptions::default()))
            .with(Operation::Ft(FtOptions {
                auto: true,
                ..Default::default()
            }))
    }

    #[test]
    fn json_roundtrip() {
        let json = r#"{
            "config": { "group_delay": "reflect" },
            "operations": [
                { "fn": "EM", "lb": 1.0 },
                { "fn": "ZF", "size": 2048 },
                { "fn": "FT", "auto": true },
                { "fn": "TP" }
            ]
        }"#;
        let pipeline = Pipeline::from_json(json).unwrap();
        assert_eq!(pipeline.config.group_delay, GroupDelayMode::Reflect);
        assert_eq!(pipeline.ops().len(), 4);
        assert_eq!(pipeline.ops()[3], Operation::Tp(TpOptions::default()));
        assert_eq!(Pipeline::from_json(&pipeline.to_json().unwrap()).unwrap(), pipeline);
        assert!(Pipeline::from_json(r#"{"operations": [{"fn": "XX"}]}"#).is_err());
    }

    #[test]
    fn run_records_each_step() {
        let mut history = History::new();
        let out = basic().run(decaying_fid(32), &mut history).unwrap();
        assert_eq!(out.size(1), 64);
        assert_eq!(history.len(), 3);
        let names: Vec<&str> = history.entries.iter().map(|e| e.operation.as_str()).collect();
        assert_eq!(names, ["EM", "ZF", "FT"]);
        assert_eq!(history.entries[2].nmrpipe_command, "nmrPipe -fn FT -auto");
    }

    #[test]
    fn failure_stops_the_run() {
        let mut history = History::new();
        let pipeline = Pipeline::default()
            .with(Operation::Zf(ZfOptions::default()))
            .with(Operation::from_options("PS", &json!({"p0": 90.0})).unwrap());
        assert!(matches!(
            pipeline.run(decaying_fid(16), &mut history),
            Err(ProcError::Domain { .. })
        ));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn cancelled_run_reports_cancellation() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut history = History::new();
        assert!(matches!(
            basic().run_with_cancel(decaying_fid(16), &mut history, cancel),
            Err(ProcError::Cancelled { .. })
        ));
        assert!(history.is_empty());
    }

    #[test]
    fn dedicated_pool_gives_same_result() {
        let mut pooled = basic();
        pooled.config.threads = Some(2);
        let a = basic().run(decaying_fid(32), &mut History::new()).unwrap();
        let b = pooled.run(decaying_fid(32), &mut History::new()).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn partitions_match_whole_run() {
        // X complex 8, Y complex 2, Z complex 3: 6 planes.
        let fd = header_3d(8, 4, 6, true);
        let n = 16 * 4 * 6;
        let data: Vec<f32> = (0..n).map(|i| ((i * 7) % 11) as f32 - 5.0).collect();
        let spec = Spectrum::new(fd, data).unwrap();
        let pipeline = Pipeline::default()
            .with(Operation::Em(EmOptions {
                lb: 5.0,
                ..Default::default()
            }))
            .with(Operation::Ft(FtOptions::default()));

        let whole = pipeline.run(spec.clone(), &mut History::new()).unwrap();
        let mut history = History::new();
        let merged = pipeline.run_partitioned(&spec, 4, &mut history).unwrap();
        assert_eq!(merged.data(), whole.data());
        assert_eq!(merged.shape(), whole.shape());
        assert_eq!(history.len(), 2);

        let part = pipeline.run_partition(&spec, 2, 3, &mut History::new()).unwrap();
        assert_eq!(part.shape().plane_count(), 2);
        let ztp = Pipeline::default().with(Operation::Ztp);
        assert!(matches!(
            ztp.run_partition(&spec, 1, 2, &mut History::new()),
            Err(ProcError::InvalidOption { .. })
        ));
    }
}
