#![allow(dead_code)]

use chrono::TimeDelta;
use clock::{Clock, ManualClock, Timestamp};
use sequencer::{
    CapturedPair, Frame, OutputMode, PanoramaSequencer, PlanConfig, SequencerConfig,
    SequencerInputs, SequencerOutputs, TickStatus, UnitsConfig,
};
use std::rc::Rc;

/// Inputs whose next reads are set by the test; each value is read once
#[derive(Default)]
pub struct ScriptedInputs {
    pub pan: Option<f64>,
    pub tilt: Option<f64>,
    pub left: Option<Frame>,
    pub right: Option<Frame>,
}

impl ScriptedInputs {
    pub fn feedback(&mut self, pan: f64, tilt: f64) {
        self.pan = Some(pan);
        self.tilt = Some(tilt);
    }

    pub fn frames(&mut self, left: Frame, right: Frame) {
        self.left = Some(left);
        self.right = Some(right);
    }
}

impl SequencerInputs for ScriptedInputs {
    fn read_pan(&mut self) -> Option<f64> {
        self.pan.take()
    }

    fn read_tilt(&mut self) -> Option<f64> {
        self.tilt.take()
    }

    fn read_left(&mut self) -> Option<Frame> {
        self.left.take()
    }

    fn read_right(&mut self) -> Option<Frame> {
        self.right.take()
    }
}

/// Everything the sequencer wrote
#[derive(Default)]
pub struct Recorder {
    pub pan_commands: Vec<f64>,
    pub tilt_commands: Vec<f64>,
    pub left_frames: Vec<Frame>,
    pub right_frames: Vec<Frame>,
    pub capture_angles: Vec<(f64, f64)>,
    pub set_ids: Vec<u32>,
    pub pairs: Vec<CapturedPair>,
}

impl SequencerOutputs for Recorder {
    fn write_pan(&mut self, native: f64) {
        self.pan_commands.push(native);
    }

    fn write_tilt(&mut self, native: f64) {
        self.tilt_commands.push(native);
    }

    fn write_left_frame(&mut self, frame: Frame) {
        self.left_frames.push(frame);
    }

    fn write_right_frame(&mut self, frame: Frame) {
        self.right_frames.push(frame);
    }

    fn write_capture_angles(&mut self, pan_degrees: f64, tilt_degrees: f64) {
        self.capture_angles.push((pan_degrees, tilt_degrees));
    }

    fn write_set_id(&mut self, set_id: u32) {
        self.set_ids.push(set_id);
    }

    fn write_pair(&mut self, pair: CapturedPair) {
        self.pairs.push(pair);
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Three positions in degrees, 1 deg margin, 100 ms settling, radians on the wire
pub fn three_position_config() -> SequencerConfig {
    SequencerConfig {
        error_margin_deg: 1.0,
        settling_delay_ms: 100,
        command_repeat_ms: None,
        diagnostic_interval_ms: 1000,
        output_mode: OutputMode::Separate,
        units: UnitsConfig::default(),
        plan: PlanConfig::Explicit {
            positions: vec![[0.0, 0.0], [10.0, 0.0], [-10.0, 0.0]],
        },
    }
}

pub fn frame_at(timestamp: Timestamp) -> Frame {
    Frame::new(timestamp, 4, 2, vec![7; 8])
}

pub struct Harness {
    pub clock: Rc<ManualClock>,
    pub sequencer: PanoramaSequencer<Rc<ManualClock>>,
    pub inputs: ScriptedInputs,
    pub out: Recorder,
}

impl Harness {
    pub fn new(config: &SequencerConfig) -> Self {
        init_logging();
        let clock = Rc::new(ManualClock::at_epoch());
        let sequencer = PanoramaSequencer::configure(config, Rc::clone(&clock)).unwrap();
        Harness {
            clock,
            sequencer,
            inputs: ScriptedInputs::default(),
            out: Recorder::default(),
        }
    }

    pub fn tick(&mut self) -> TickStatus {
        self.sequencer.tick(&mut self.inputs, &mut self.out)
    }

    pub fn advance_ms(&mut self, ms: i64) {
        self.clock.advance(TimeDelta::milliseconds(ms));
    }

    /// Report the PTU at the given angles (radians on the wire) and tick
    pub fn arrive_deg(&mut self, pan_deg: f64, tilt_deg: f64) -> TickStatus {
        self.inputs
            .feedback(pan_deg.to_radians(), tilt_deg.to_radians());
        self.tick()
    }

    /// Converge on the current goal, wait 150 ms, deliver a pair and tick
    pub fn capture_current(&mut self) -> TickStatus {
        let goal = self.sequencer.goal();
        let status = self.arrive_deg(goal.pan_degrees(), goal.tilt_degrees());
        assert_eq!(status, TickStatus::Running);
        let arrival = self.clock.now();

        self.advance_ms(150);
        let stamp = arrival + TimeDelta::milliseconds(150);
        self.inputs.frames(frame_at(stamp), frame_at(stamp));
        self.tick()
    }
}
