use anyhow::Context;
use chrono::{TimeDelta, Utc};
use clap::Parser;
use clock::{Clock, ManualClock};
use log::*;
use sequencer::{PanoramaSequencer, TickStatus};
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::Instant;

mod config;
mod sim;

use crate::config::Config;
use crate::sim::{CaptureSink, SimulatedHead};

/// Run the panorama capture sequencer against a simulated pan-tilt head
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Configuration file (defaults to ./config.toml, then the built-in example)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of panoramas to take, overriding the configuration
    #[arg(short, long)]
    panoramas: Option<u32>,

    /// Sleep for each tick period
    #[arg(long)]
    realtime: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let period = config.tick_period();
    let tick = TimeDelta::from_std(period).context("tick period out of range")?;
    let realtime = args.realtime || config.host.realtime;
    let panoramas = args.panoramas.unwrap_or(config.host.panoramas);

    // Simulated time; advanced by one period per tick
    let clock = Rc::new(ManualClock::new(Utc::now()));
    let mut sequencer = PanoramaSequencer::configure(&config.sequencer, Rc::clone(&clock))
        .context("sequencer refused its configuration")?;
    let mut head =
        SimulatedHead::new(&config.simulation, sequencer.conversion(), Rc::clone(&clock))?;
    let mut sink = CaptureSink::default();

    info!(
        "Taking {} panorama(s) of {} pictures, tick {:?}",
        panoramas,
        sequencer.plan().len(),
        period
    );

    for run in 0..panoramas {
        sequencer.start();
        let started = clock.now();
        let wall = Instant::now();
        let mut ticks = 0u64;

        loop {
            clock.advance(tick);
            head.advance(period);
            let status = sequencer.tick(&mut head, &mut sink);
            head.command(sink.take_commands());
            ticks += 1;

            if realtime {
                thread::sleep(period);
            }

            match status {
                TickStatus::Running => {}
                TickStatus::Complete => break,
                TickStatus::Stopped => {
                    warn!("Sequencer stopped unexpectedly");
                    break;
                }
            }
        }

        let (pan, tilt) = head.position_deg();
        info!(
            "Panorama {}/{} done: {} ticks, {} ms simulated, {:?} wall, head at pan {:.2} tilt {:.2}",
            run + 1,
            panoramas,
            ticks,
            (clock.now() - started).num_milliseconds(),
            wall.elapsed(),
            pan,
            tilt
        );
    }

    sequencer.cleanup();
    info!("{} stereo pairs captured", sink.captures());
    Ok(())
}
