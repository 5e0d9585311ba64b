use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Pan/tilt goal in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub pan: f64,
    pub tilt: f64,
}

impl Position {
    pub fn new(pan: f64, tilt: f64) -> Self {
        Position { pan, tilt }
    }

    pub fn from_degrees(pan_deg: f64, tilt_deg: f64) -> Self {
        Position {
            pan: pan_deg.to_radians(),
            tilt: tilt_deg.to_radians(),
        }
    }

    pub fn pan_degrees(&self) -> f64 {
        self.pan.to_degrees()
    }

    pub fn tilt_degrees(&self) -> f64 {
        self.tilt.to_degrees()
    }
}

/// Where the goal list comes from.
///
/// Angles are configured in degrees:
/// ```toml
/// [sequencer.plan]
/// policy = "explicit"
/// positions = [[0.0, 0.0], [30.0, 20.0]]
/// ```
/// or
/// ```toml
/// [sequencer.plan]
/// policy = "generated"
/// separation_deg = 30.0
/// count = 12
/// tilt_deg = -10.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PlanConfig {
    /// Literal `[pan, tilt]` pairs
    Explicit { positions: Vec<[f64; 2]> },
    /// `count` pans spaced by `separation_deg`, centered on zero, at one tilt
    Generated {
        separation_deg: f64,
        count: i64,
        tilt_deg: f64,
    },
}

/// Largest picture count a generated plan accepts
pub const MAX_GENERATED_POSITIONS: i64 = 10_000;

/// Ordered, non-empty list of goals, indexed cyclically
#[derive(Debug, Clone, PartialEq)]
pub struct PositionPlan {
    positions: Vec<Position>,
}

impl PositionPlan {
    pub fn build(config: &PlanConfig) -> Result<Self, ConfigError> {
        let plan = match config {
            PlanConfig::Explicit { positions } => {
                for &[pan, tilt] in positions {
                    check_finite("pan_deg", pan)?;
                    check_finite("tilt_deg", tilt)?;
                }
                PositionPlan::from_positions(
                    positions
                        .iter()
                        .map(|&[pan, tilt]| Position::from_degrees(pan, tilt))
                        .collect(),
                )?
            }
            PlanConfig::Generated {
                separation_deg,
                count,
                tilt_deg,
            } => PositionPlan::generated(*separation_deg, *count, *tilt_deg)?,
        };
        log::info!("Position plan built with {} goals", plan.len());
        Ok(plan)
    }

    /// Plan from goals already in radians
    pub fn from_positions(positions: Vec<Position>) -> Result<Self, ConfigError> {
        if positions.is_empty() {
            return Err(ConfigError::EmptyPlan);
        }
        if let Some(bad) = positions
            .iter()
            .find(|p| !p.pan.is_finite() || !p.tilt.is_finite())
        {
            let value = if bad.pan.is_finite() { bad.tilt } else { bad.pan };
            return Err(ConfigError::NonFinite {
                field: "position",
                value,
            });
        }
        Ok(PositionPlan { positions })
    }

    /// Evenly spaced pans, symmetric about index `(count - 1) / 2`
    pub fn generated(separation_deg: f64, count: i64, tilt_deg: f64) -> Result<Self, ConfigError> {
        if count <= 0 {
            return Err(ConfigError::NonPositiveCount(count));
        }
        if count > MAX_GENERATED_POSITIONS {
            return Err(ConfigError::TooManyPositions {
                count,
                max: MAX_GENERATED_POSITIONS,
            });
        }
        check_finite("separation_deg", separation_deg)?;
        check_finite("tilt_deg", tilt_deg)?;

        let center = (count - 1) as f64 / 2.0;
        let positions = (0..count)
            .map(|i| Position::from_degrees(separation_deg * (i as f64 - center), tilt_deg))
            .collect();
        PositionPlan::from_positions(positions)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false for a built plan
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn current(&self, index: usize) -> Position {
        self.positions[index % self.positions.len()]
    }

    pub fn advance(&self, index: usize) -> usize {
        (index + 1) % self.positions.len()
    }

    pub fn is_last(&self, index: usize) -> bool {
        index == self.positions.len() - 1
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}
