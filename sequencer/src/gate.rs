use chrono::TimeDelta;
use clock::Timestamp;
use plan::{ConfigError, Position};

/// Tolerance applied to pan and tilt separately, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorMargin(f64);

impl ErrorMargin {
    pub fn from_degrees(degrees: f64) -> Result<Self, ConfigError> {
        if !degrees.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "error_margin_deg",
                value: degrees,
            });
        }
        if degrees < 0.0 {
            return Err(ConfigError::NegativeMargin(degrees));
        }
        Ok(ErrorMargin(degrees.to_radians()))
    }

    pub fn from_radians(radians: f64) -> Result<Self, ConfigError> {
        Self::from_degrees(radians.to_degrees())?;
        Ok(ErrorMargin(radians))
    }

    pub fn radians(&self) -> f64 {
        self.0
    }

    pub fn degrees(&self) -> f64 {
        self.0.to_degrees()
    }
}

/// Per-axis result of comparing a measurement against a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    pub pan_converged: bool,
    pub tilt_converged: bool,
}

impl Convergence {
    pub fn both(&self) -> bool {
        self.pan_converged && self.tilt_converged
    }
}

/// `|measured - goal| < margin` on each axis.
///
/// Strict: an error exactly equal to the margin is not converged. NaN
/// measurements never converge.
pub fn evaluate(measured: Position, goal: Position, margin: ErrorMargin) -> Convergence {
    Convergence {
        pan_converged: axis_converged(measured.pan, goal.pan, margin),
        tilt_converged: axis_converged(measured.tilt, goal.tilt, margin),
    }
}

pub fn axis_converged(measured: f64, goal: f64, margin: ErrorMargin) -> bool {
    (measured - goal).abs() < margin.0
}

/// Limits how often an unconverged axis gets its goal written again.
///
/// Released when a new goal is set, and again after `repeat` has elapsed
/// since the last re-issue when an interval is configured.
#[derive(Debug, Clone)]
pub struct CommandLatch {
    repeat: Option<TimeDelta>,
    last_issued: Option<Timestamp>,
}

impl CommandLatch {
    pub fn new(repeat: Option<TimeDelta>) -> Self {
        CommandLatch {
            repeat,
            last_issued: None,
        }
    }

    pub fn is_released(&self, now: Timestamp) -> bool {
        match (self.last_issued, self.repeat) {
            (None, _) => true,
            (Some(at), Some(repeat)) => now - at >= repeat,
            (Some(_), None) => false,
        }
    }

    pub fn mark_issued(&mut self, now: Timestamp) {
        self.last_issued = Some(now);
    }

    pub fn reset(&mut self) {
        self.last_issued = None;
    }
}
