//! Capture sequencer for a pan-tilt stereo panorama head.
//!
//! Each tick: read PTU feedback, check convergence on the current goal,
//! wait out the settling delay, accept one timestamp-gated frame per camera,
//! emit the pair and move on. After the last position the set id is bumped
//! and the sequencer stops.

pub mod config;
pub mod diagnostics;
pub mod gate;
pub mod ports;
pub mod sequencer;
pub mod states;

pub use crate::config::{OutputMode, SequencerConfig, MAX_DURATION_MS};
pub use crate::gate::{evaluate, Convergence, ErrorMargin};
pub use crate::ports::{SequencerInputs, SequencerOutputs};
pub use crate::sequencer::{PanoramaSequencer, TickStatus};
pub use crate::states::{Phase, SequencerState};

pub use capture::{CaptureError, CapturedPair, Frame};
pub use plan::{ConfigError, PlanConfig, Position, UnitsConfig};
