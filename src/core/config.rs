//! Benchmark configuration.
//!
//! Read from `appsettings.json` in the working directory when present,
//! otherwise the built-in defaults are used.

use crate::core::error::{BenchError, BenchResult};
use crate::strategy::PollMode;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

pub const SETTINGS_FILE: &str = "appsettings.json";

const DEFAULT_DELAYS_MS: [u32; 11] = [1, 9, 10, 13, 14, 15, 16, 17, 25, 50, 100];
const DEFAULT_REPETITIONS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BenchmarkingParameters {
    #[serde(
        rename = "TargetDelaysMs",
        default = "default_delays",
        deserialize_with = "validate_delays"
    )]
    pub target_delays_ms: Vec<u32>,
    #[serde(
        rename = "Repetitions",
        default = "default_repetitions",
        deserialize_with = "validate_positive_u32"
    )]
    pub repetitions: u32,
    #[serde(rename = "PollMode", default)]
    pub poll_mode: PollMode,
}

fn default_delays() -> Vec<u32> {
    DEFAULT_DELAYS_MS.to_vec()
}

fn default_repetitions() -> u32 {
    DEFAULT_REPETITIONS
}

fn validate_positive_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = u32::deserialize(deserializer)?;
    if value > 0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("Value must be positive"))
    }
}

fn validate_delays<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let delays = Vec::<u32>::deserialize(deserializer)?;
    if delays.is_empty() {
        return Err(serde::de::Error::custom("At least one target delay is required"));
    }
    if delays.contains(&0) {
        return Err(serde::de::Error::custom("Target delays must be positive"));
    }
    Ok(delays)
}

impl Default for BenchmarkingParameters {
    fn default() -> Self {
        Self {
            target_delays_ms: default_delays(),
            repetitions: DEFAULT_REPETITIONS,
            poll_mode: PollMode::default(),
        }
    }
}

impl BenchmarkingParameters {
    pub fn from_json(content: &str) -> BenchResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> BenchResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content).map_err(|e| match e {
                BenchError::Json(e) => BenchError::Config(format!("{}: {}", path.display(), e)),
                other => other,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn target_delays(&self) -> impl Iterator<Item = Duration> + '_ {
        self.target_delays_ms
            .iter()
            .map(|&ms| Duration::from_millis(ms as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_delays() {
        let params = BenchmarkingParameters::default();
        assert_eq!(params.target_delays_ms, vec![1, 9, 10, 13, 14, 15, 16, 17, 25, 50, 100]);
        assert_eq!(params.repetitions, 10);
        assert_eq!(params.poll_mode, PollMode::Adaptive);
    }

    #[test]
    fn parses_full_settings() {
        let params = BenchmarkingParameters::from_json(
            r#"{ "TargetDelaysMs": [2, 4], "Repetitions": 3, "PollMode": "global_high_res" }"#,
        )
        .unwrap();
        assert_eq!(params.target_delays_ms, vec![2, 4]);
        assert_eq!(params.repetitions, 3);
        assert_eq!(params.poll_mode, PollMode::GlobalHighRes);
        assert_eq!(
            params.target_delays().collect::<Vec<_>>(),
            vec![Duration::from_millis(2), Duration::from_millis(4)]
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let params = BenchmarkingParameters::from_json(r#"{ "Repetitions": 4 }"#).unwrap();
        assert_eq!(params.repetitions, 4);
        assert_eq!(params.target_delays_ms, default_delays());
    }

    #[test]
    fn rejects_zero_repetitions() {
        assert!(BenchmarkingParameters::from_json(r#"{ "Repetitions": 0 }"#).is_err());
    }

    #[test]
    fn rejects_empty_or_zero_delays() {
        assert!(BenchmarkingParameters::from_json(r#"{ "TargetDelaysMs": [] }"#).is_err());
        assert!(BenchmarkingParameters::from_json(r#"{ "TargetDelaysMs": [5, 0] }"#).is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let params =
            BenchmarkingParameters::load(Path::new("definitely/not/here/appsettings.json")).unwrap();
        assert_eq!(params, BenchmarkingParameters::default());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("slb-settings-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = BenchmarkingParameters::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, BenchError::Config(_)));
    }
}
