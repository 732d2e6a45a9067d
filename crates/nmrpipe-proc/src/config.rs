//! Processing configuration.
//!
//! Every default reproduces the established NMRPipe numerics, including the
//! approximations. The alternatives are opt-in.

use crate::error::ProcError;
use serde::{Deserialize, Serialize};

/// Frequency of each point along a transformed axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyConvention {
    /// First point at `orig + sw*(1 - 1/n)`, last point at `orig`.
    #[default]
    Legacy,
    /// First point at `orig + sw`, last point at `orig`.
    Corrected,
}

/// How the digital-filter group delay is removed during FT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupDelayMode {
    /// Integer roll before the transform, first-order phase for the fraction after it.
    #[default]
    Legacy,
    /// Exact fractional time shift, wrapped tail replaced by a mirror image.
    Reflect,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub frequency_convention: FrequencyConvention,
    pub group_delay: GroupDelayMode,
    /// Center apodization windows on the group delay instead of point 0.
    pub apodization_group_delay: bool,
    /// Worker threads for trace processing; `None` uses the global pool.
    pub threads: Option<usize>,
}

impl ProcessingConfig {
    pub fn from_json(json: &str) -> Result<Self, ProcError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ProcError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A dedicated pool when a thread count is configured.
    pub fn thread_pool(&self) -> Result<Option<rayon::ThreadPool>, ProcError> {
        match self.threads {
            Some(n) => Ok(Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_legacy() {
        let cfg = ProcessingConfig::default();
        assert_eq!(cfg.frequency_convention, FrequencyConvention::Legacy);
        assert_eq!(cfg.group_delay, GroupDelayMode::Legacy);
        assert!(!cfg.apodization_group_delay);
        assert_eq!(cfg.threads, None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ProcessingConfig::from_json(r#"{"group_delay": "reflect"}"#).unwrap();
        assert_eq!(cfg.group_delay, GroupDelayMode::Reflect);
        assert_eq!(cfg.frequency_convention, FrequencyConvention::Legacy);
    }

    #[test]
    fn json_round_trip() {
        let cfg = ProcessingConfig {
            frequency_convention: FrequencyConvention::Corrected,
            group_delay: GroupDelayMode::Reflect,
            apodization_group_delay: true,
            threads: Some(2),
        };
        let back = ProcessingConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(ProcessingConfig::from_json(r#"{"group_delay": "exact"}"#).is_err());
    }
}
