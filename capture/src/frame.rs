use clock::Timestamp;
use std::fmt;

/// Which camera of the stereo pair a frame came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Channel::Left => write!(f, "left"),
            Channel::Right => write!(f, "right"),
        }
    }
}

/// Timestamped camera image.
///
/// Pixel data is opaque here; encoding belongs to the camera driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Time at which the frame was taken
    pub timestamp: Timestamp,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(timestamp: Timestamp, width: u32, height: u32, data: Vec<u8>) -> Self {
        Frame {
            timestamp,
            width,
            height,
            data,
        }
    }
}

/// Both frames of one completed capture window
#[derive(Debug, Clone, PartialEq)]
pub struct StereoPair {
    pub left: Frame,
    pub right: Frame,
}

impl StereoPair {
    /// Moment the pair became complete
    pub fn timestamp(&self) -> Timestamp {
        self.left.timestamp.max(self.right.timestamp)
    }
}

/// One stereo capture at one plan position, tagged with its panorama set
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPair {
    pub timestamp: Timestamp,
    /// Measured angles at capture, in degrees
    pub pan_degrees: f64,
    pub tilt_degrees: f64,
    pub left_frame: Frame,
    pub right_frame: Frame,
    /// Panorama the picture belongs to
    pub set_id: u32,
}

impl CapturedPair {
    pub fn new(pair: StereoPair, pan_degrees: f64, tilt_degrees: f64, set_id: u32) -> Self {
        CapturedPair {
            timestamp: pair.timestamp(),
            pan_degrees,
            tilt_degrees,
            left_frame: pair.left,
            right_frame: pair.right,
            set_id,
        }
    }
}
