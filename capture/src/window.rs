use chrono::TimeDelta;
use clock::Timestamp;
use thiserror::Error;

use crate::frame::{Channel, Frame, StereoPair};

/// Contract violations on the capture window.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// `take` was called before both frames were accepted.
    #[error("capture window not complete (open: {open}, left ready: {left_ready}, right ready: {right_ready})")]
    InvalidState {
        open: bool,
        left_ready: bool,
        right_ready: bool,
    },
}

/// What happened to a frame offered to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Accepted,
    /// Window not open
    NotAwaiting,
    /// Timestamp at or before arrival time plus settling delay
    TooEarly,
    /// Both frames already held
    AlreadyComplete,
}

/// Timestamp-gated acceptance of one stereo pair per goal.
///
/// Frames are never matched against each other; each channel is gated on
/// its own timestamp and the two cameras are assumed to be synchronized
/// upstream.
#[derive(Debug, Clone)]
pub struct CaptureWindow {
    settling_delay: TimeDelta,
    goal_arrival_time: Option<Timestamp>,
    awaiting: bool,
    left: Option<Frame>,
    right: Option<Frame>,
}

impl CaptureWindow {
    pub fn new(settling_delay: TimeDelta) -> Self {
        CaptureWindow {
            settling_delay,
            goal_arrival_time: None,
            awaiting: false,
            left: None,
            right: None,
        }
    }

    /// Start accepting frames taken after `arrival_time + settling_delay`.
    ///
    /// Opening an already open window moves the gate to the new arrival
    /// time and drops any held frame that no longer passes it.
    pub fn open(&mut self, arrival_time: Timestamp) {
        if self.awaiting {
            log::debug!(
                "Capture window re-opened, arrival time moved to {}",
                arrival_time
            );
            self.goal_arrival_time = Some(arrival_time);
            if !self.left.as_ref().is_some_and(|f| self.passes_gate(f)) {
                self.left = None;
            }
            if !self.right.as_ref().is_some_and(|f| self.passes_gate(f)) {
                self.right = None;
            }
            return;
        }

        self.goal_arrival_time = Some(arrival_time);
        self.awaiting = true;
        self.left = None;
        self.right = None;
    }

    pub fn is_open(&self) -> bool {
        self.awaiting
    }

    pub fn goal_arrival_time(&self) -> Option<Timestamp> {
        self.goal_arrival_time
    }

    /// Earliest timestamp (exclusive) a frame may carry to be accepted.
    /// `None` before `open`, or when the gate lies beyond the representable
    /// range; no frame passes in either case.
    pub fn gate(&self) -> Option<Timestamp> {
        self.goal_arrival_time
            .and_then(|t| t.checked_add_signed(self.settling_delay))
    }

    fn passes_gate(&self, frame: &Frame) -> bool {
        self.gate().is_some_and(|gate| frame.timestamp > gate)
    }

    pub fn settling_delay(&self) -> TimeDelta {
        self.settling_delay
    }

    pub fn offer_left(&mut self, frame: Frame) -> Offer {
        self.offer(Channel::Left, frame)
    }

    pub fn offer_right(&mut self, frame: Frame) -> Offer {
        self.offer(Channel::Right, frame)
    }

    /// Accept or drop a frame. Dropped frames are not buffered.
    ///
    /// A later valid frame on a channel that is already ready replaces the
    /// held one until the pair completes.
    pub fn offer(&mut self, channel: Channel, frame: Frame) -> Offer {
        if !self.awaiting {
            return Offer::NotAwaiting;
        }
        if self.is_complete() {
            return Offer::AlreadyComplete;
        }
        if !self.passes_gate(&frame) {
            return Offer::TooEarly;
        }

        match channel {
            Channel::Left => self.left = Some(frame),
            Channel::Right => self.right = Some(frame),
        }
        Offer::Accepted
    }

    pub fn left_ready(&self) -> bool {
        self.left.is_some()
    }

    pub fn right_ready(&self) -> bool {
        self.right.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.left_ready() && self.right_ready()
    }

    /// Close the window and hand out both frames
    pub fn take(&mut self) -> Result<StereoPair, CaptureError> {
        if !self.awaiting || !self.is_complete() {
            return Err(CaptureError::InvalidState {
                open: self.awaiting,
                left_ready: self.left_ready(),
                right_ready: self.right_ready(),
            });
        }
        match (self.left.take(), self.right.take()) {
            (Some(left), Some(right)) => {
                self.awaiting = false;
                Ok(StereoPair { left, right })
            }
            (left, right) => {
                // unreachable after is_complete, put back whatever was there
                self.left = left;
                self.right = right;
                Err(CaptureError::InvalidState {
                    open: self.awaiting,
                    left_ready: self.left_ready(),
                    right_ready: self.right_ready(),
                })
            }
        }
    }

    /// Close without emitting anything
    pub fn discard(&mut self) {
        self.awaiting = false;
        self.goal_arrival_time = None;
        self.left = None;
        self.right = None;
    }
}
