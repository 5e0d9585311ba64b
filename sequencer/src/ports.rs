// Channels between the sequencer and the rest of the system.
// Reads are "latest value or none" and never block; writes are fire-and-forget.

use capture::{CapturedPair, Frame};

/// Hardware feedback and camera frames, polled once per tick
pub trait SequencerInputs {
    /// Measured pan angle in native PTU units, if a new one arrived
    fn read_pan(&mut self) -> Option<f64>;
    /// Measured tilt angle in native PTU units, if a new one arrived
    fn read_tilt(&mut self) -> Option<f64>;
    fn read_left(&mut self) -> Option<Frame>;
    fn read_right(&mut self) -> Option<Frame>;
}

/// Goal commands and capture results
pub trait SequencerOutputs {
    /// Pan goal in native PTU units
    fn write_pan(&mut self, native: f64);
    /// Tilt goal in native PTU units
    fn write_tilt(&mut self, native: f64);

    // Separate output mode
    fn write_left_frame(&mut self, frame: Frame);
    fn write_right_frame(&mut self, frame: Frame);
    fn write_capture_angles(&mut self, pan_degrees: f64, tilt_degrees: f64);
    fn write_set_id(&mut self, set_id: u32);

    // Combined output mode
    fn write_pair(&mut self, pair: CapturedPair);
}
