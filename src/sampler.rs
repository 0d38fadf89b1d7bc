//! Sampler — polls the SCD30 and feeds the control loop.
//!
//! Runs on its own thread. Every accepted reading goes two places: into
//! the mpsc channel toward the control loop, and as one line into the
//! append-only air-data log. Sensor hiccups are logged and skipped; the
//! sampler never takes the daemon down once it is running.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use chrono::Local;
use embedded_hal::i2c::I2c;
use log::{debug, error, warn};

use crate::control::ControlMsg;
use crate::sensors::scd30::Scd30;
use crate::sensors::Sample;

/// Retry delay when the sensor has no measurement buffered yet.
const NOT_READY_DELAY: Duration = Duration::from_millis(200);

/// Timestamp layout used in the air-data log, e.g. `26 Aug 2026 14:03:07`.
const LOG_TIME_FORMAT: &str = "%d %b %Y %H:%M:%S";

/// Append-only log of raw readings, one line per accepted sample.
pub struct AirDataLog {
    file: File,
}

impl AirDataLog {
    /// Open (or create) the log file for appending.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Append one reading. Failures are logged, not returned: a full disk
    /// must not stop climate control.
    pub fn append(&mut self, sample: &Sample) {
        let line = format!(
            "{} CO2: {:.2}ppm, temp: {:.2}°C, rh: {:.2}%\n",
            Local::now().format(LOG_TIME_FORMAT),
            sample.co2_ppm,
            sample.temp_c,
            sample.rh_percent,
        );
        if let Err(e) = self.file.write_all(line.as_bytes()).and_then(|()| self.file.flush()) {
            error!("air data log write failed: {e}");
        }
    }
}

/// The sampling loop. Owns the sensor handle and the sending end of the
/// control channel.
pub struct Sampler<I2C> {
    sensor: Scd30<I2C>,
    air_log: AirDataLog,
    tx: Sender<ControlMsg>,
    interval: Duration,
}

impl<I2C: I2c> Sampler<I2C> {
    pub fn new(
        sensor: Scd30<I2C>,
        air_log: AirDataLog,
        tx: Sender<ControlMsg>,
        interval: Duration,
    ) -> Self {
        Self {
            sensor,
            air_log,
            tx,
            interval,
        }
    }

    /// Run until the receiving end hangs up.
    ///
    /// The cadence follows the sensor: sleep the full interval after a
    /// delivered sample, a short retry delay when no measurement is
    /// buffered yet.
    pub fn run(mut self) {
        loop {
            let ready = match self.sensor.data_ready() {
                Ok(ready) => ready,
                Err(e) => {
                    // Treat a failed poll like not-ready and retry; the
                    // bus usually comes back on its own.
                    error!("data-ready poll failed: {e}");
                    false
                }
            };
            if !ready {
                thread::sleep(NOT_READY_DELAY);
                continue;
            }

            match self.sensor.read_measurement() {
                Ok(sample) => {
                    debug!(
                        "sample: co2={:.2}ppm temp={:.2}C rh={:.2}%",
                        sample.co2_ppm, sample.temp_c, sample.rh_percent
                    );
                    if self.tx.send(ControlMsg::Sample(sample)).is_err() {
                        // Control loop is gone; nothing left to sample for.
                        return;
                    }
                    self.air_log.append(&sample);
                }
                Err(e) => warn!("dropping unreadable measurement: {e}"),
            }
            thread::sleep(self.interval);
        }
    }
}
