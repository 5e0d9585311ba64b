use thiserror::Error;

/// Configuration problems that keep the sequencer from starting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Explicit position list has no entries.
    #[error("position plan is empty")]
    EmptyPlan,

    /// Generated plan asked for zero or fewer pictures.
    #[error("picture count must be positive, got {0}")]
    NonPositiveCount(i64),

    /// Generated plan asked for more pictures than the sequencer holds.
    #[error("picture count {count} exceeds the maximum of {max}")]
    TooManyPositions {
        /// Requested count.
        count: i64,
        /// Largest accepted count.
        max: i64,
    },

    /// Error margin below zero.
    #[error("error margin must be non-negative, got {0} deg")]
    NegativeMargin(f64),

    /// An angle or factor was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending setting.
        field: &'static str,
        /// Value that was rejected.
        value: f64,
    },

    /// Unit conversion factor was zero, negative or not finite.
    #[error("invalid unit conversion: {0}")]
    InvalidUnits(String),

    /// A millisecond setting is longer than the sequencer allows.
    #[error("{field} of {ms} ms is out of range")]
    DurationOutOfRange {
        /// Name of the offending setting.
        field: &'static str,
        /// Value that was rejected.
        ms: u64,
    },
}
