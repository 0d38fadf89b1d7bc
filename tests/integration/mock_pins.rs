//! Thread-safe recording pins and a pinned clock for driving the control
//! loop from tests.

use core::convert::Infallible;
use std::sync::{Arc, Mutex};

use embedded_hal::digital::OutputPin;
use enclosure::control::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Data,
    Clock,
    Latch,
}

pub type EventLog = Arc<Mutex<Vec<(Line, bool)>>>;

/// Output pin that appends every level change to a shared log. `Send`, so
/// the control loop owning it can run on its own thread.
pub struct MockPin {
    line: Line,
    log: EventLog,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.lock().unwrap().push((self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.lock().unwrap().push((self.line, true));
        Ok(())
    }
}

/// Three pins sharing one event log, in (data, clock, latch) order.
pub fn pin_rig() -> (MockPin, MockPin, MockPin, EventLog) {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let pin = |line| MockPin {
        line,
        log: Arc::clone(&log),
    };
    (
        pin(Line::Data),
        pin(Line::Clock),
        pin(Line::Latch),
        log,
    )
}

/// Replay the recorded edges and return the byte transferred by each latch
/// pulse, first-shifted bit in the MSB.
pub fn latched_frames(events: &[(Line, bool)]) -> Vec<u8> {
    let mut frames = Vec::new();
    let mut shifted: Vec<bool> = Vec::new();
    let (mut data, mut clock, mut latch) = (false, false, false);
    for &(line, high) in events {
        match line {
            Line::Data => data = high,
            Line::Clock => {
                if high && !clock {
                    shifted.push(data);
                }
                clock = high;
            }
            Line::Latch => {
                if high && !latch {
                    let tail = &shifted[shifted.len().saturating_sub(8)..];
                    let mut byte = 0u8;
                    for (i, &bit) in tail.iter().enumerate() {
                        if bit {
                            byte |= 1 << (7 - i);
                        }
                    }
                    frames.push(byte);
                }
                latch = high;
            }
        }
    }
    frames
}

/// Clock whose hour never moves, so light decisions are reproducible.
pub struct FixedClock(pub u8);

impl Clock for FixedClock {
    fn hour(&self) -> u8 {
        self.0
    }
}
