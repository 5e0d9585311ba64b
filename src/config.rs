use anyhow::Context;
use sequencer::SequencerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: HostConfig,
    pub sequencer: SequencerConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Scheduler period between ticks
    pub tick_period_ms: u64,
    /// Complete panoramas to take before exiting
    pub panoramas: u32,
    /// Sleep for each tick period instead of running as fast as possible
    #[serde(default)]
    pub realtime: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub slew_rate_deg_per_s: f64,
    pub frame_period_ms: u64,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Peak amplitude of the wobble added to angle feedback
    #[serde(default)]
    pub feedback_jitter_deg: f64,
}

impl Config {
    /// Load from `path`, else `config.toml`, else the embedded example
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            let config = Self::from_file(path)?;
            log::info!("Loaded configuration from {}", path.display());
            return Ok(config);
        }

        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            let config = Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?;
            log::info!("Loaded configuration from file");
            Ok(config)
        } else {
            // Fallback to embedded defaults
            let config = Self::parse(include_str!("../config.toml.example"))
                .context("embedded example configuration is invalid")?;
            log::warn!("Using embedded default configuration");
            Ok(config)
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

// Helper functions for easy access
impl Config {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.host.tick_period_ms)
    }
}
