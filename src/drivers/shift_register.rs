//! 74HC595-style serial shift register driver.
//!
//! Three digital output lines: serial data (SER), shift clock (SRCLK) and
//! register latch (RCLK). A byte is loaded by setting the data line per bit
//! and pulsing the clock, then pulsing the latch once to transfer the
//! shifted byte to the output pins atomically.
//!
//! This driver is a dumb bit shifter: it knows nothing about outlet roles.
//! The wire contract is that bits go out in [`OutletState`] index order
//! (index 0 first) — the rest of the system relies on that to resolve an
//! outlet index to the correct physical relay.

use embedded_hal::digital::OutputPin;
use log::info;

use crate::outlets::OutletState;

/// Driver over any three `embedded-hal` output pins (real GPIO on the Pi,
/// recording mocks in tests).
pub struct ShiftRegister<P: OutputPin> {
    data: P,
    clock: P,
    latch: P,
}

impl<P: OutputPin> ShiftRegister<P> {
    /// Take ownership of the three lines. All are assumed to start low.
    pub fn new(data: P, clock: P, latch: P) -> Self {
        Self { data, clock, latch }
    }

    /// Shift in 8 zero bits and latch, forcing every output low.
    ///
    /// The SRCLR pin would do this in hardware, but it is wired to VCC on
    /// the common breakout boards, so we clear serially instead.
    pub fn clear(&mut self) -> Result<(), P::Error> {
        for _ in 0..8 {
            self.shift_bit(false)?;
        }
        self.pulse_latch()
    }

    /// Load the full outlet vector, index 0 first, then latch it to the
    /// output pins in one transfer.
    pub fn set_bits(&mut self, state: OutletState) -> Result<(), P::Error> {
        info!("setting register bits to {state}");
        for bit in state.bits() {
            self.shift_bit(bit)?;
        }
        self.pulse_latch()
    }

    fn shift_bit(&mut self, high: bool) -> Result<(), P::Error> {
        if high {
            self.data.set_high()?;
        } else {
            self.data.set_low()?;
        }
        self.pulse_clock()
    }

    fn pulse_clock(&mut self) -> Result<(), P::Error> {
        self.clock.set_high()?;
        self.clock.set_low()
    }

    fn pulse_latch(&mut self) -> Result<(), P::Error> {
        self.latch.set_high()?;
        self.latch.set_low()
    }
}
