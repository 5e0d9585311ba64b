// Stand-in hardware for running the sequencer without a PTU or cameras:
// a slew-rate limited pan/tilt head, a synchronized stereo pair and a sink
// that logs what comes out.

use anyhow::Context;
use chrono::TimeDelta;
use clock::{Clock, Timestamp};
use plan::AngleConversion;
use sequencer::{CapturedPair, Frame, SequencerInputs, SequencerOutputs};
use std::time::Duration;

use crate::config::SimulationConfig;

/// Goal commands collected during one tick, in native PTU units
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Commands {
    pub pan: Option<f64>,
    pub tilt: Option<f64>,
}

pub struct SimulatedHead<C: Clock> {
    clock: C,
    conversion: AngleConversion,
    slew_rate_deg_per_s: f64,
    jitter_deg: f64,
    frame_period: TimeDelta,
    width: u32,
    height: u32,
    pan_deg: f64,
    tilt_deg: f64,
    target_pan_deg: f64,
    target_tilt_deg: f64,
    last_frame: Option<Timestamp>,
    left: Option<Frame>,
    right: Option<Frame>,
    samples: u64,
}

impl<C: Clock> SimulatedHead<C> {
    pub fn new(
        config: &SimulationConfig,
        conversion: AngleConversion,
        clock: C,
    ) -> anyhow::Result<Self> {
        let frame_period = i64::try_from(config.frame_period_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .context("frame_period_ms out of range")?;

        Ok(SimulatedHead {
            clock,
            conversion,
            slew_rate_deg_per_s: config.slew_rate_deg_per_s,
            jitter_deg: config.feedback_jitter_deg,
            frame_period,
            width: config.frame_width,
            height: config.frame_height,
            pan_deg: 0.0,
            tilt_deg: 0.0,
            target_pan_deg: 0.0,
            target_tilt_deg: 0.0,
            last_frame: None,
            left: None,
            right: None,
            samples: 0,
        })
    }

    /// Move the axes for `dt` and expose a new frame pair when one is due
    pub fn advance(&mut self, dt: Duration) {
        let max_step = self.slew_rate_deg_per_s * dt.as_secs_f64();
        self.pan_deg += (self.target_pan_deg - self.pan_deg).clamp(-max_step, max_step);
        self.tilt_deg += (self.target_tilt_deg - self.tilt_deg).clamp(-max_step, max_step);

        let now = self.clock.now();
        let due = match self.last_frame {
            Some(last) => now - last >= self.frame_period,
            None => true,
        };
        if due {
            // both cameras are triggered together
            let shade = (((self.pan_deg + 180.0) / 360.0) * 255.0).clamp(0.0, 255.0) as u8;
            let pixels = vec![shade; (self.width * self.height) as usize];
            self.left = Some(Frame::new(now, self.width, self.height, pixels.clone()));
            self.right = Some(Frame::new(now, self.width, self.height, pixels));
            self.last_frame = Some(now);
        }
    }

    pub fn command(&mut self, commands: Commands) {
        if let Some(native) = commands.pan {
            self.target_pan_deg = self.conversion.pan.to_radians(native).to_degrees();
        }
        if let Some(native) = commands.tilt {
            self.target_tilt_deg = self.conversion.tilt.to_radians(native).to_degrees();
        }
    }

    pub fn position_deg(&self) -> (f64, f64) {
        (self.pan_deg, self.tilt_deg)
    }

    fn jitter(&mut self) -> f64 {
        self.samples += 1;
        self.jitter_deg * (self.samples as f64 * 0.7).sin()
    }
}

impl<C: Clock> SequencerInputs for SimulatedHead<C> {
    fn read_pan(&mut self) -> Option<f64> {
        let measured = self.pan_deg + self.jitter();
        Some(self.conversion.pan.to_native(measured.to_radians()))
    }

    fn read_tilt(&mut self) -> Option<f64> {
        let measured = self.tilt_deg + self.jitter();
        Some(self.conversion.tilt.to_native(measured.to_radians()))
    }

    fn read_left(&mut self) -> Option<Frame> {
        self.left.take()
    }

    fn read_right(&mut self) -> Option<Frame> {
        self.right.take()
    }
}

/// Collects goal commands for the head and logs every capture
#[derive(Debug, Default)]
pub struct CaptureSink {
    commands: Commands,
    frames: u32,
    angles: Option<(f64, f64)>,
    captures: u32,
}

impl CaptureSink {
    pub fn take_commands(&mut self) -> Commands {
        std::mem::take(&mut self.commands)
    }

    pub fn captures(&self) -> u32 {
        self.captures
    }
}

impl SequencerOutputs for CaptureSink {
    fn write_pan(&mut self, native: f64) {
        self.commands.pan = Some(native);
    }

    fn write_tilt(&mut self, native: f64) {
        self.commands.tilt = Some(native);
    }

    fn write_left_frame(&mut self, _frame: Frame) {
        self.frames += 1;
    }

    fn write_right_frame(&mut self, _frame: Frame) {
        self.frames += 1;
    }

    fn write_capture_angles(&mut self, pan_degrees: f64, tilt_degrees: f64) {
        self.angles = Some((pan_degrees, tilt_degrees));
    }

    fn write_set_id(&mut self, set_id: u32) {
        // set id is the last write of a separate-mode capture
        self.captures += 1;
        let (pan, tilt) = self.angles.take().unwrap_or((f64::NAN, f64::NAN));
        log::info!(
            "Set {} picture {}: pan {:.2}, tilt {:.2} ({} frames)",
            set_id,
            self.captures,
            pan,
            tilt,
            std::mem::take(&mut self.frames)
        );
    }

    fn write_pair(&mut self, pair: CapturedPair) {
        self.captures += 1;
        log::info!(
            "Set {} picture {} at {}: pan {:.2}, tilt {:.2}, {}x{} stereo",
            pair.set_id,
            self.captures,
            pair.timestamp,
            pair.pan_degrees,
            pair.tilt_degrees,
            pair.left_frame.width,
            pair.left_frame.height
        );
    }
}
