// Phase and counters of the panorama sequencer.
// To add or modify phases, edit this file and the tick handler in sequencer.rs.

/// - Idle: started, goal commands for index 0 not yet written
/// - Seeking: waiting for both axes to converge on the goal
/// - Settling: converged, waiting out the settling delay
/// - Capturing: accepting frames until the stereo pair is complete
/// - Complete: last position captured, controller stopped
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Phase {
    Idle,
    Seeking,
    Settling,
    Capturing,
    Complete,
}

impl Phase {
    /// Check if the sequencer is somewhere between start and completion
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Seeking | Phase::Settling | Phase::Capturing)
    }

    /// Frames are offered to the capture window in these phases
    pub fn accepts_frames(&self) -> bool {
        matches!(self, Phase::Settling | Phase::Capturing)
    }
}

/// Mutable counters owned by the sequencer and touched only from `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerState {
    pub position_index: usize,
    pub set_id: u32,
    pub phase: Phase,
}

impl SequencerState {
    pub fn new() -> Self {
        SequencerState {
            position_index: 0,
            set_id: 0,
            phase: Phase::Idle,
        }
    }

    /// Back to the first position, keeping the set id
    pub fn rewind(&mut self) {
        self.position_index = 0;
        self.phase = Phase::Idle;
    }
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::new()
    }
}
