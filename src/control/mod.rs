//! Control loop — the single owner of outlet state and the hardware lines.
//!
//! ```text
//!  sampler thread ──▶ mpsc channel ──▶ ControlLoop ──▶ policy (pure)
//!  signal thread  ──▶      │                │
//!                          ▼                ▼
//!                      Shutdown      ShiftRegister ──▶ relays
//! ```
//!
//! The loop blocks only on the channel receive. Shutdown arrives as a
//! message on the same channel, so it interrupts the blocked wait without
//! any shared mutable state or signal-handler globals.

pub mod policy;

use anyhow::bail;
use chrono::{Local, Timelike};
use embedded_hal::digital::OutputPin;
use log::{error, info};
use std::sync::mpsc::Receiver;

use crate::config::{OutletMap, Profile};
use crate::drivers::ShiftRegister;
use crate::outlets::OutletState;
use crate::sensors::Sample;

/// Everything the control loop can receive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMsg {
    /// A fresh air reading from the sampler.
    Sample(Sample),
    /// Terminate: force all outlets off and return.
    Shutdown,
}

/// Wall-clock port for the light schedule. Injected so tests can pin the
/// hour; production uses [`LocalClock`].
pub trait Clock {
    /// Local hour of day, 0-23.
    fn hour(&self) -> u8;
}

/// System local time via `chrono`.
pub struct LocalClock;

impl Clock for LocalClock {
    fn hour(&self) -> u8 {
        Local::now().hour() as u8
    }
}

/// The control loop. Owns the shift register, the outlet vector and the
/// receiving end of the sample channel; nothing else ever touches them.
pub struct ControlLoop<P: OutputPin, C: Clock> {
    profile: Profile,
    outlets: OutletMap,
    sr: ShiftRegister<P>,
    clock: C,
    rx: Receiver<ControlMsg>,
    state: OutletState,
}

impl<P: OutputPin, C: Clock> ControlLoop<P, C> {
    pub fn new(
        profile: Profile,
        outlets: OutletMap,
        sr: ShiftRegister<P>,
        clock: C,
        rx: Receiver<ControlMsg>,
    ) -> Self {
        Self {
            profile,
            outlets,
            sr,
            clock,
            rx,
            state: OutletState::ALL_OFF,
        }
    }

    /// Run until shutdown. Consumes the loop; on return every outlet has
    /// been commanded off (best effort even on a hardware fault).
    pub fn run(mut self) -> anyhow::Result<()> {
        if let Err(e) = self.sr.clear() {
            bail!("shift register clear failed: {e:?}");
        }
        info!("outputs cleared, entering control loop");

        loop {
            match self.rx.recv() {
                Ok(ControlMsg::Sample(sample)) => {
                    let hour = self.clock.hour();
                    let next =
                        policy::next_state(&sample, &self.profile, &self.outlets, self.state, hour);
                    if next == self.state {
                        // Nothing changed — skip the hardware write so the
                        // register lines are not pulsed redundantly.
                        continue;
                    }
                    info!("outlet state {} -> {next}", self.state);
                    self.state = next;
                    if let Err(e) = self.sr.set_bits(next) {
                        // Deenergise before giving up; the write path may
                        // still work even if this one failed transiently.
                        let _ = self.sr.set_bits(OutletState::ALL_OFF);
                        bail!("shift register write failed: {e:?}");
                    }
                }
                // A dropped sender counts as a shutdown request: without a
                // sampler the loop could only go stale.
                Ok(ControlMsg::Shutdown) | Err(_) => {
                    // Unconditional write, bypassing the only-if-changed
                    // check: outlets must be deenergised on every
                    // controlled shutdown.
                    if let Err(e) = self.sr.set_bits(OutletState::ALL_OFF) {
                        error!("failed to clear outlets on shutdown: {e:?}");
                    }
                    self.state = OutletState::ALL_OFF;
                    info!("all outlets off, control loop stopped");
                    return Ok(());
                }
            }
        }
    }
}
