//! `enclosure` daemon entry point.
//!
//! Wires the hardware to the modules and parks the control loop on the
//! main thread. Three helper threads: the sampler (sensor polling), the
//! timelapse camera, and a signal listener that turns SIGINT/SIGTERM into
//! a shutdown message on the control channel.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::info;
use rppal::gpio::Gpio;
use rppal::i2c::I2c;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use enclosure::camera::Timelapse;
use enclosure::config::Config;
use enclosure::control::{ControlLoop, ControlMsg, LocalClock};
use enclosure::drivers::ShiftRegister;
use enclosure::sampler::{AirDataLog, Sampler};
use enclosure::sensors::scd30::{Scd30, I2C_ADDRESS};

/// Environmental controller for an enclosed growing chamber.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Log level filter (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Path to the TOML configuration file.
    #[arg(long, default_value = "/etc/enclosure/enclosure.toml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .format_timestamp_millis()
        .init();

    let config = Config::load(&args.config)?;
    info!("configuration loaded from {}", args.config.display());

    // Shift register lines. `into_output_low` guarantees the relays see
    // deenergised lines from the first microsecond.
    let gpio = Gpio::new().context("opening GPIO")?;
    let data = gpio
        .get(config.pins.sr_data)
        .context("claiming data pin")?
        .into_output_low();
    let clock = gpio
        .get(config.pins.sr_clock)
        .context("claiming clock pin")?
        .into_output_low();
    let latch = gpio
        .get(config.pins.sr_latch)
        .context("claiming latch pin")?
        .into_output_low();
    let sr = ShiftRegister::new(data, clock, latch);

    // Sensor bring-up is the one place hardware errors are fatal: a chamber
    // without readings cannot be controlled, so fail loudly at startup.
    let i2c = I2c::with_bus(enclosure::pins::SCD30_I2C_BUS).context("opening I2C bus")?;
    let mut sensor = Scd30::new(i2c);
    info!("configuring SCD30 at 0x{I2C_ADDRESS:02x}");
    sensor
        .set_measurement_interval(config.daemon.sample_interval_secs)
        .map_err(|e| anyhow!("setting measurement interval: {e}"))?;
    sensor
        .start_continuous(0)
        .map_err(|e| anyhow!("starting continuous measurement: {e}"))?;
    // First measurement needs one full interval to appear.
    thread::sleep(Duration::from_secs(2));

    let air_log = AirDataLog::open(&config.daemon.air_data_log).with_context(|| {
        format!(
            "opening air data log {}",
            config.daemon.air_data_log.display()
        )
    })?;

    let (tx, rx) = mpsc::channel();

    let signal_tx = tx.clone();
    let mut signals = Signals::new([SIGINT, SIGTERM]).context("installing signal handlers")?;
    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                info!("received signal {signal}, shutting down");
                let _ = signal_tx.send(ControlMsg::Shutdown);
            }
        })
        .context("spawning signal thread")?;

    let timelapse = Timelapse::new(
        config.daemon.images_dir.clone(),
        Duration::from_secs(config.daemon.capture_interval_secs),
    )
    .context("initialising timelapse")?;
    thread::Builder::new()
        .name("camera".into())
        .spawn(move || timelapse.run())
        .context("spawning camera thread")?;

    let sampler = Sampler::new(
        sensor,
        air_log,
        tx,
        Duration::from_secs(u64::from(config.daemon.sample_interval_secs)),
    );
    thread::Builder::new()
        .name("sampler".into())
        .spawn(move || sampler.run())
        .context("spawning sampler thread")?;

    ControlLoop::new(config.profile, config.outlets, sr, LocalClock, rx).run()
}
