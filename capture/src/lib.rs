// Stereo frame acceptance for the panorama sequencer.

pub mod frame;
pub mod window;

pub use frame::{CapturedPair, Channel, Frame, StereoPair};
pub use window::{CaptureError, CaptureWindow, Offer};
