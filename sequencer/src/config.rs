use chrono::TimeDelta;
use plan::{ConfigError, PlanConfig, UnitsConfig};
use serde::{Deserialize, Serialize};

/// Shape of what is written out for each completed stereo pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Left frame, right frame, capture angles and set id on separate channels
    #[default]
    Separate,
    /// One `CapturedPair` record
    Combined,
}

/// Configuration for the panorama sequencer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Convergence tolerance per axis in degrees
    pub error_margin_deg: f64,
    /// Minimum time after convergence before frames are trusted
    pub settling_delay_ms: u64,
    /// Re-issue interval for goal commands while not converged
    #[serde(default)]
    pub command_repeat_ms: Option<u64>,
    /// Minimum spacing of repeated diagnostics
    #[serde(default = "default_diagnostic_interval_ms")]
    pub diagnostic_interval_ms: u64,
    #[serde(default)]
    pub output_mode: OutputMode,
    #[serde(default)]
    pub units: UnitsConfig,
    pub plan: PlanConfig,
}

fn default_diagnostic_interval_ms() -> u64 {
    1000
}

impl SequencerConfig {
    pub fn settling_delay(&self) -> Result<TimeDelta, ConfigError> {
        millis("settling_delay_ms", self.settling_delay_ms)
    }

    pub fn command_repeat(&self) -> Result<Option<TimeDelta>, ConfigError> {
        self.command_repeat_ms
            .map(|ms| millis("command_repeat_ms", ms))
            .transpose()
    }

    pub fn diagnostic_interval(&self) -> Result<TimeDelta, ConfigError> {
        millis("diagnostic_interval_ms", self.diagnostic_interval_ms)
    }
}

/// Upper bound for every millisecond setting: one day
pub const MAX_DURATION_MS: u64 = 24 * 60 * 60 * 1000;

fn millis(field: &'static str, ms: u64) -> Result<TimeDelta, ConfigError> {
    if ms > MAX_DURATION_MS {
        return Err(ConfigError::DurationOutOfRange { field, ms });
    }
    i64::try_from(ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .ok_or(ConfigError::DurationOutOfRange { field, ms })
}
