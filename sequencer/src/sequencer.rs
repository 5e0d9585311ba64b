use capture::{CaptureWindow, CapturedPair, Frame, Offer};
use clock::{Clock, Timestamp};
use plan::{AngleConversion, ConfigError, Position, PositionPlan};

use crate::config::{OutputMode, SequencerConfig};
use crate::diagnostics::DiagnosticThrottle;
use crate::gate::{self, CommandLatch, ErrorMargin};
use crate::ports::{SequencerInputs, SequencerOutputs};
use crate::states::{Phase, SequencerState};

/// Result of one tick, for the hosting scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Not started, stopped, or already complete; nothing was done
    Stopped,
    Running,
    /// The last position was captured on this tick; stop ticking
    Complete,
}

/// Drives the PTU through the position plan and collects one stereo pair
/// per position.
///
/// The host calls `tick` once per period from a single thread. Seeking has
/// no timeout: a goal that never converges is waited on forever.
pub struct PanoramaSequencer<C: Clock> {
    clock: C,
    plan: PositionPlan,
    margin: ErrorMargin,
    conversion: AngleConversion,
    output_mode: OutputMode,
    window: CaptureWindow,
    state: SequencerState,
    running: bool,
    goal: Position,
    // latest measurements, radians
    measured_pan: Option<f64>,
    measured_tilt: Option<f64>,
    pan_latch: CommandLatch,
    tilt_latch: CommandLatch,
    seek_log: DiagnosticThrottle,
    frame_log: DiagnosticThrottle,
}

impl<C: Clock> PanoramaSequencer<C> {
    /// Build plan, margin, unit conversion and settling delay; refuse to
    /// exist with an unusable plan.
    pub fn configure(config: &SequencerConfig, clock: C) -> Result<Self, ConfigError> {
        let plan = PositionPlan::build(&config.plan)?;
        let margin = ErrorMargin::from_degrees(config.error_margin_deg)?;
        let conversion = AngleConversion::build(&config.units)?;
        let settling_delay = config.settling_delay()?;
        let repeat = config.command_repeat()?;
        let diagnostic_interval = config.diagnostic_interval()?;

        if margin.radians() == 0.0 {
            log::warn!("Error margin is zero, goals will practically never converge");
        }

        log::info!(
            "Sequencer configured: {} positions, margin {:.3} deg, settling {} ms, units {:?}, output {:?}",
            plan.len(),
            margin.degrees(),
            settling_delay.num_milliseconds(),
            config.units,
            config.output_mode
        );

        let goal = plan.current(0);
        Ok(PanoramaSequencer {
            clock,
            plan,
            margin,
            conversion,
            output_mode: config.output_mode,
            window: CaptureWindow::new(settling_delay),
            state: SequencerState::new(),
            running: false,
            goal,
            measured_pan: None,
            measured_tilt: None,
            pan_latch: CommandLatch::new(repeat),
            tilt_latch: CommandLatch::new(repeat),
            seek_log: DiagnosticThrottle::new(diagnostic_interval),
            frame_log: DiagnosticThrottle::new(diagnostic_interval),
        })
    }

    /// Rewind to the first position; the next tick writes its goal.
    /// The set id carries over so consecutive panoramas stay distinct.
    pub fn start(&mut self) {
        self.reset_run();
        self.running = true;
        log::info!("Sequencer started, set {}", self.state.set_id);
    }

    /// Drop any partial capture and rewind
    pub fn stop(&mut self) {
        if self.window.is_open() {
            log::info!(
                "Discarding in-flight capture at position {}",
                self.state.position_index
            );
        }
        self.reset_run();
        self.running = false;
    }

    /// Stop and forget the set counter
    pub fn cleanup(&mut self) {
        self.stop();
        self.state.set_id = 0;
    }

    fn reset_run(&mut self) {
        self.window.discard();
        self.state.rewind();
        self.goal = self.plan.current(0);
        self.measured_pan = None;
        self.measured_tilt = None;
        self.pan_latch.reset();
        self.tilt_latch.reset();
        self.seek_log.reset();
        self.frame_log.reset();
    }

    /// One scheduler period: poll inputs, advance the state machine, write
    /// commands and results. Never blocks and never fails.
    pub fn tick<I, O>(&mut self, inputs: &mut I, outputs: &mut O) -> TickStatus
    where
        I: SequencerInputs,
        O: SequencerOutputs,
    {
        if !self.running {
            return TickStatus::Stopped;
        }
        let now = self.clock.now();

        if self.state.phase == Phase::Idle {
            self.set_goal(self.state.position_index, outputs);
            self.enter(Phase::Seeking);
        }

        let pan = inputs.read_pan();
        let tilt = inputs.read_tilt();
        if let Some(native) = tilt {
            self.measured_tilt = Some(self.conversion.tilt.to_radians(native));
        }
        if let Some(native) = pan {
            self.measured_pan = Some(self.conversion.pan.to_radians(native));
        }

        match self.state.phase {
            Phase::Seeking => {
                if tilt.is_some() {
                    self.check_tilt(now, outputs);
                }
                if pan.is_some() {
                    self.check_arrival(now, outputs);
                }
            }
            Phase::Settling => {
                if self.window.gate().is_some_and(|gate| now > gate) {
                    self.enter(Phase::Capturing);
                }
            }
            _ => {}
        }

        // frames are always drained so nothing stale survives into the next window
        let left = inputs.read_left();
        let right = inputs.read_right();
        if self.state.phase.accepts_frames() {
            if let Some(frame) = left {
                self.offer(now, capture::Channel::Left, frame);
            }
            if let Some(frame) = right {
                self.offer(now, capture::Channel::Right, frame);
            }
        }

        if self.state.phase == Phase::Capturing && self.window.is_complete() {
            return self.finish_position(now, outputs);
        }
        TickStatus::Running
    }

    fn set_goal<O: SequencerOutputs>(&mut self, index: usize, outputs: &mut O) {
        self.state.position_index = index;
        self.goal = self.plan.current(index);
        self.pan_latch.reset();
        self.tilt_latch.reset();
        self.seek_log.reset();

        log::info!(
            "Goal {}/{}: pan {:.2} deg, tilt {:.2} deg",
            index + 1,
            self.plan.len(),
            self.goal.pan_degrees(),
            self.goal.tilt_degrees()
        );
        outputs.write_pan(self.conversion.pan.to_native(self.goal.pan));
        outputs.write_tilt(self.conversion.tilt.to_native(self.goal.tilt));
    }

    fn check_tilt<O: SequencerOutputs>(&mut self, now: Timestamp, outputs: &mut O) {
        let measured = self.measured_tilt.unwrap_or(f64::NAN);
        if gate::axis_converged(measured, self.goal.tilt, self.margin) {
            return;
        }
        if self.tilt_latch.is_released(now) {
            log::debug!(
                "Re-issuing tilt goal {:.2} deg (measured {:.2} deg)",
                self.goal.tilt_degrees(),
                measured.to_degrees()
            );
            outputs.write_tilt(self.conversion.tilt.to_native(self.goal.tilt));
            self.tilt_latch.mark_issued(now);
        }
    }

    fn check_arrival<O: SequencerOutputs>(&mut self, now: Timestamp, outputs: &mut O) {
        let measured = Position::new(
            self.measured_pan.unwrap_or(f64::NAN),
            self.measured_tilt.unwrap_or(f64::NAN),
        );
        let convergence = gate::evaluate(measured, self.goal, self.margin);

        if convergence.both() {
            log::info!(
                "Reached goal {} at pan {:.2} deg, tilt {:.2} deg",
                self.state.position_index + 1,
                measured.pan_degrees(),
                measured.tilt_degrees()
            );
            self.window.open(now);
            self.frame_log.reset();
            self.enter(Phase::Settling);
            return;
        }

        if !convergence.pan_converged && self.pan_latch.is_released(now) {
            log::debug!(
                "Re-issuing pan goal {:.2} deg (measured {:.2} deg)",
                self.goal.pan_degrees(),
                measured.pan_degrees()
            );
            outputs.write_pan(self.conversion.pan.to_native(self.goal.pan));
            self.pan_latch.mark_issued(now);
        }

        if let Some(suppressed) = self.seek_log.hit(now) {
            log::debug!(
                "Seeking goal {}: pan error {:.3} deg, tilt error {:.3} deg ({} similar suppressed)",
                self.state.position_index + 1,
                (measured.pan - self.goal.pan).to_degrees(),
                (measured.tilt - self.goal.tilt).to_degrees(),
                suppressed
            );
        }
    }

    fn offer(&mut self, now: Timestamp, channel: capture::Channel, frame: Frame) {
        let stamp = frame.timestamp;
        match self.window.offer(channel, frame) {
            Offer::Accepted => log::debug!("Accepted {} frame at {}", channel, stamp),
            rejected => {
                if let Some(suppressed) = self.frame_log.hit(now) {
                    log::debug!(
                        "Dropped {} frame at {}: {:?} ({} similar suppressed)",
                        channel,
                        stamp,
                        rejected,
                        suppressed
                    );
                }
            }
        }
    }

    fn finish_position<O: SequencerOutputs>(
        &mut self,
        now: Timestamp,
        outputs: &mut O,
    ) -> TickStatus {
        let pair = match self.window.take() {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("Capture window out of step: {e}, reopening");
                self.window.discard();
                self.window.open(now);
                return TickStatus::Running;
            }
        };

        let pan_degrees = self.measured_pan.unwrap_or(self.goal.pan).to_degrees();
        let tilt_degrees = self.measured_tilt.unwrap_or(self.goal.tilt).to_degrees();
        let captured = CapturedPair::new(pair, pan_degrees, tilt_degrees, self.state.set_id);
        log::info!(
            "Captured position {}/{} of set {} at pan {:.2} deg, tilt {:.2} deg",
            self.state.position_index + 1,
            self.plan.len(),
            captured.set_id,
            pan_degrees,
            tilt_degrees
        );
        self.emit(captured, outputs);

        if self.plan.is_last(self.state.position_index) {
            log::info!("Panorama set {} complete", self.state.set_id);
            self.state.set_id = self.state.set_id.wrapping_add(1);
            self.state.position_index = 0;
            self.running = false;
            self.enter(Phase::Complete);
            return TickStatus::Complete;
        }

        let next = self.plan.advance(self.state.position_index);
        self.set_goal(next, outputs);
        self.enter(Phase::Seeking);
        TickStatus::Running
    }

    fn emit<O: SequencerOutputs>(&self, captured: CapturedPair, outputs: &mut O) {
        match self.output_mode {
            OutputMode::Separate => {
                outputs.write_left_frame(captured.left_frame);
                outputs.write_right_frame(captured.right_frame);
                outputs.write_capture_angles(captured.pan_degrees, captured.tilt_degrees);
                outputs.write_set_id(captured.set_id);
            }
            OutputMode::Combined => outputs.write_pair(captured),
        }
    }

    fn enter(&mut self, phase: Phase) {
        if self.state.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.state.phase, phase);
            self.state.phase = phase;
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn set_id(&self) -> u32 {
        self.state.set_id
    }

    pub fn position_index(&self) -> usize {
        self.state.position_index
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn plan(&self) -> &PositionPlan {
        &self.plan
    }

    pub fn window(&self) -> &CaptureWindow {
        &self.window
    }

    pub fn conversion(&self) -> AngleConversion {
        self.conversion
    }

    pub fn margin(&self) -> ErrorMargin {
        self.margin
    }
}
