use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the PTU expresses angles on its command and feedback channels.
///
/// Goals and measurements are held in radians inside the sequencer; this is
/// the only place that knows about the actuator's own units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UnitsConfig {
    /// Radians scaled by a gearing factor per axis
    Radians {
        #[serde(default = "unity")]
        pan_gearing: f64,
        #[serde(default = "unity")]
        tilt_gearing: f64,
    },
    /// Actuator steps, given as degrees per step per axis
    Steps {
        pan_resolution_deg: f64,
        tilt_resolution_deg: f64,
    },
}

fn unity() -> f64 {
    1.0
}

impl Default for UnitsConfig {
    fn default() -> Self {
        UnitsConfig::Radians {
            pan_gearing: 1.0,
            tilt_gearing: 1.0,
        }
    }
}

/// Linear factor between radians and one axis' native units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    native_per_radian: f64,
}

impl AxisScale {
    pub fn new(native_per_radian: f64) -> Result<Self, ConfigError> {
        if !native_per_radian.is_finite() || native_per_radian <= 0.0 {
            return Err(ConfigError::InvalidUnits(format!(
                "scale must be positive and finite, got {native_per_radian}"
            )));
        }
        Ok(AxisScale { native_per_radian })
    }

    /// Scale for an axis that moves `resolution_deg` degrees per step
    pub fn from_step_resolution(resolution_deg: f64) -> Result<Self, ConfigError> {
        if !resolution_deg.is_finite() || resolution_deg <= 0.0 {
            return Err(ConfigError::InvalidUnits(format!(
                "step resolution must be positive and finite, got {resolution_deg} deg"
            )));
        }
        AxisScale::new(1.0 / resolution_deg.to_radians())
    }

    pub fn to_native(&self, radians: f64) -> f64 {
        radians * self.native_per_radian
    }

    pub fn to_radians(&self, native: f64) -> f64 {
        native / self.native_per_radian
    }

    pub fn native_per_radian(&self) -> f64 {
        self.native_per_radian
    }
}

/// Per-axis conversion fixed once when the sequencer is configured
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleConversion {
    pub pan: AxisScale,
    pub tilt: AxisScale,
}

impl AngleConversion {
    pub fn build(config: &UnitsConfig) -> Result<Self, ConfigError> {
        let conversion = match *config {
            UnitsConfig::Radians {
                pan_gearing,
                tilt_gearing,
            } => AngleConversion {
                pan: AxisScale::new(pan_gearing)?,
                tilt: AxisScale::new(tilt_gearing)?,
            },
            UnitsConfig::Steps {
                pan_resolution_deg,
                tilt_resolution_deg,
            } => AngleConversion {
                pan: AxisScale::from_step_resolution(pan_resolution_deg)?,
                tilt: AxisScale::from_step_resolution(tilt_resolution_deg)?,
            },
        };
        log::debug!(
            "Angle conversion: pan {:.4} native/rad, tilt {:.4} native/rad",
            conversion.pan.native_per_radian(),
            conversion.tilt.native_per_radian()
        );
        Ok(conversion)
    }

    /// Radians in, radians out
    pub fn identity() -> Self {
        AngleConversion {
            pan: AxisScale {
                native_per_radian: 1.0,
            },
            tilt: AxisScale {
                native_per_radian: 1.0,
            },
        }
    }
}
