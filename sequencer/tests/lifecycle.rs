//! Configure / start / stop / cleanup behaviour and output shapes

mod common;

use approx::assert_relative_eq;
use clock::{Clock, ManualClock};
use common::{three_position_config, Harness};
use sequencer::{
    ConfigError, OutputMode, PanoramaSequencer, Phase, PlanConfig, TickStatus, UnitsConfig,
};

#[test]
fn empty_plan_refuses_to_configure() {
    let mut config = three_position_config();
    config.plan = PlanConfig::Explicit { positions: vec![] };
    let result = PanoramaSequencer::configure(&config, ManualClock::at_epoch());
    assert!(matches!(result, Err(ConfigError::EmptyPlan)));
}

#[test]
fn bad_margin_and_count_refuse_to_configure() {
    let mut config = three_position_config();
    config.error_margin_deg = -0.5;
    assert!(matches!(
        PanoramaSequencer::configure(&config, ManualClock::at_epoch()),
        Err(ConfigError::NegativeMargin(_))
    ));

    let mut config = three_position_config();
    config.plan = PlanConfig::Generated {
        separation_deg: 30.0,
        count: 0,
        tilt_deg: 0.0,
    };
    assert!(matches!(
        PanoramaSequencer::configure(&config, ManualClock::at_epoch()),
        Err(ConfigError::NonPositiveCount(0))
    ));
}

#[test]
fn oversized_delay_and_count_refuse_to_configure() {
    let mut config = three_position_config();
    config.settling_delay_ms = 1_000_000_000_000_000_000;
    assert!(matches!(
        PanoramaSequencer::configure(&config, ManualClock::at_epoch()),
        Err(ConfigError::DurationOutOfRange {
            field: "settling_delay_ms",
            ..
        })
    ));

    let mut config = three_position_config();
    config.plan = PlanConfig::Generated {
        separation_deg: 30.0,
        count: i64::MAX,
        tilt_deg: 0.0,
    };
    assert!(matches!(
        PanoramaSequencer::configure(&config, ManualClock::at_epoch()),
        Err(ConfigError::TooManyPositions { .. })
    ));
}

#[test]
fn ticks_before_start_do_nothing() {
    let mut h = Harness::new(&three_position_config());
    assert_eq!(h.sequencer.phase(), Phase::Idle);
    assert_eq!(h.arrive_deg(0.0, 0.0), TickStatus::Stopped);
    assert!(h.out.pan_commands.is_empty());
    assert!(h.out.tilt_commands.is_empty());
}

#[test]
fn stop_discards_partial_capture() {
    let mut h = Harness::new(&three_position_config());
    h.sequencer.start();
    assert_eq!(h.capture_current(), TickStatus::Running);

    // converge on the second goal and deliver half a pair
    h.arrive_deg(10.0, 0.0);
    let arrival = h.clock.now();
    h.advance_ms(150);
    h.inputs.left = Some(common::frame_at(arrival + chrono::TimeDelta::milliseconds(120)));
    h.tick();
    assert!(h.sequencer.window().left_ready());

    h.sequencer.stop();
    assert!(!h.sequencer.is_running());
    assert!(!h.sequencer.window().is_open());
    assert_eq!(h.sequencer.position_index(), 0);
    assert_eq!(h.sequencer.phase(), Phase::Idle);

    // restart goes back to the first goal, the partial capture is gone
    h.sequencer.start();
    let commands = h.out.pan_commands.len();
    h.tick();
    assert_eq!(h.out.pan_commands.len(), commands + 1);
    assert_relative_eq!(*h.out.pan_commands.last().unwrap(), 0.0);
    assert_eq!(h.sequencer.phase(), Phase::Seeking);
    assert!(!h.sequencer.window().left_ready());
}

#[test]
fn set_id_carries_over_restarts_until_cleanup() {
    let mut h = Harness::new(&three_position_config());

    for expected_set in 0..2u32 {
        h.sequencer.start();
        let mut status = TickStatus::Running;
        while status != TickStatus::Complete {
            status = h.capture_current();
        }
        assert_eq!(h.sequencer.set_id(), expected_set + 1);
    }
    assert_eq!(h.out.set_ids, vec![0, 0, 0, 1, 1, 1]);

    h.sequencer.cleanup();
    assert_eq!(h.sequencer.set_id(), 0);
    assert!(!h.sequencer.is_running());
}

#[test]
fn combined_output_writes_one_record() {
    let mut config = three_position_config();
    config.output_mode = OutputMode::Combined;
    let mut h = Harness::new(&config);
    h.sequencer.start();
    h.capture_current();

    assert!(h.out.left_frames.is_empty());
    assert!(h.out.set_ids.is_empty());
    assert_eq!(h.out.pairs.len(), 1);

    let pair = &h.out.pairs[0];
    assert_eq!(pair.set_id, 0);
    assert_relative_eq!(pair.pan_degrees, 0.0);
    assert_eq!(pair.timestamp, pair.left_frame.timestamp);
}

#[test]
fn step_units_convert_at_the_boundary() {
    let mut config = three_position_config();
    config.units = UnitsConfig::Steps {
        pan_resolution_deg: 0.05,
        tilt_resolution_deg: 0.0125,
    };
    config.plan = PlanConfig::Explicit {
        positions: vec![[10.0, 5.0]],
    };
    config.output_mode = OutputMode::Combined;
    let mut h = Harness::new(&config);
    h.sequencer.start();

    h.tick();
    assert_relative_eq!(h.out.pan_commands[0], 200.0, epsilon = 1e-9);
    assert_relative_eq!(h.out.tilt_commands[0], 400.0, epsilon = 1e-9);

    // feedback in steps, 10 steps of pan off is still inside 1 deg
    h.inputs.feedback(210.0, 400.0);
    h.tick();
    assert_eq!(h.sequencer.phase(), Phase::Settling);
    let arrival = h.clock.now();

    h.advance_ms(150);
    let stamp = arrival + chrono::TimeDelta::milliseconds(150);
    h.inputs.frames(common::frame_at(stamp), common::frame_at(stamp));
    assert_eq!(h.tick(), TickStatus::Complete);

    let pair = &h.out.pairs[0];
    assert_relative_eq!(pair.pan_degrees, 10.5, epsilon = 1e-9);
    assert_relative_eq!(pair.tilt_degrees, 5.0, epsilon = 1e-9);
}

#[test]
fn tilt_gearing_scales_commands_and_feedback() {
    let mut config = three_position_config();
    config.units = UnitsConfig::Radians {
        pan_gearing: 1.0,
        tilt_gearing: 4.0,
    };
    config.plan = PlanConfig::Explicit {
        positions: vec![[30.0, 20.0]],
    };
    let mut h = Harness::new(&config);
    h.sequencer.start();

    h.tick();
    assert_relative_eq!(h.out.tilt_commands[0], 80f64.to_radians(), epsilon = 1e-12);

    // raw tilt of 20 deg means the head is only at 5 deg
    h.inputs.feedback(30f64.to_radians(), 20f64.to_radians());
    h.tick();
    assert_eq!(h.sequencer.phase(), Phase::Seeking);

    h.inputs.feedback(30f64.to_radians(), 80f64.to_radians());
    h.tick();
    assert_eq!(h.sequencer.phase(), Phase::Settling);
}

#[test]
fn generated_plan_drives_centered_goals() {
    let mut config = three_position_config();
    config.plan = PlanConfig::Generated {
        separation_deg: 45.0,
        count: 8,
        tilt_deg: -10.0,
    };
    let mut h = Harness::new(&config);
    h.sequencer.start();

    let mut status = TickStatus::Running;
    while status != TickStatus::Complete {
        status = h.capture_current();
    }

    let pans: Vec<f64> = h.out.capture_angles.iter().map(|(p, _)| *p).collect();
    assert_eq!(pans.len(), 8);
    for (i, pan) in pans.iter().enumerate() {
        assert_relative_eq!(*pan, 45.0 * (i as f64 - 3.5), epsilon = 1e-9);
    }
    assert!(h
        .out
        .capture_angles
        .iter()
        .all(|(_, tilt)| (tilt + 10.0).abs() < 1e-9));
}
