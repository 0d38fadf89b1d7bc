//! Sensirion SCD30 CO2/temperature/humidity sensor driver.
//!
//! Generic over an `embedded-hal` I²C bus, so it runs against rppal on the
//! Pi and against a transaction mock in tests. Commands are big-endian u16
//! words; every data word on the wire (in either direction) carries a
//! Sensirion CRC-8 which this driver verifies and generates.

use core::fmt;
use std::thread;
use std::time::Duration;

use embedded_hal::i2c::I2c;

use super::Sample;

/// Fixed I²C address of the SCD30.
pub const I2C_ADDRESS: u8 = 0x61;

// Command words, per the Sensirion interface description.
const CMD_START_CONTINUOUS: u16 = 0x0010;
const CMD_STOP_CONTINUOUS: u16 = 0x0104;
const CMD_SET_INTERVAL: u16 = 0x4600;
const CMD_DATA_READY: u16 = 0x0202;
const CMD_READ_MEASUREMENT: u16 = 0x0300;
const CMD_SOFT_RESET: u16 = 0xD304;

// CRC-8 parameters (poly x^8 + x^5 + x^4 + 1).
const CRC_POLY: u8 = 0x31;
const CRC_INIT: u8 = 0xFF;

/// The sensor needs a moment between the command write and the data
/// read-back; 3 ms covers the worst case in the datasheet.
const READBACK_DELAY: Duration = Duration::from_millis(3);

/// Driver errors, generic over the bus error type.
#[derive(Debug, PartialEq, Eq)]
pub enum Scd30Error<E> {
    /// The underlying I²C transaction failed.
    Bus(E),
    /// A received word failed its CRC check.
    Crc { expected: u8, actual: u8 },
}

impl<E> From<E> for Scd30Error<E> {
    fn from(e: E) -> Self {
        Scd30Error::Bus(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Scd30Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "i2c bus error: {e:?}"),
            Self::Crc { expected, actual } => {
                write!(f, "crc mismatch: expected {expected:#04x}, got {actual:#04x}")
            }
        }
    }
}

impl<E: fmt::Debug> std::error::Error for Scd30Error<E> {}

/// SCD30 sensor handle owning the bus connection.
pub struct Scd30<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Scd30<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Start continuous measurement mode.
    ///
    /// `pressure_mbar` compensates for ambient pressure; 0 disables
    /// compensation.
    pub fn start_continuous(&mut self, pressure_mbar: u16) -> Result<(), Scd30Error<I2C::Error>> {
        self.write_command(CMD_START_CONTINUOUS, Some(pressure_mbar))
    }

    /// Stop continuous measurement mode.
    pub fn stop_continuous(&mut self) -> Result<(), Scd30Error<I2C::Error>> {
        self.write_command(CMD_STOP_CONTINUOUS, None)
    }

    /// Set the measurement interval in seconds (2 – 1800).
    pub fn set_measurement_interval(&mut self, secs: u16) -> Result<(), Scd30Error<I2C::Error>> {
        self.write_command(CMD_SET_INTERVAL, Some(secs))
    }

    /// Reboot the sensor firmware without cycling power.
    pub fn soft_reset(&mut self) -> Result<(), Scd30Error<I2C::Error>> {
        self.write_command(CMD_SOFT_RESET, None)
    }

    /// Non-blocking readiness check: whether a measurement is waiting in
    /// the sensor's buffer.
    pub fn data_ready(&mut self) -> Result<bool, Scd30Error<I2C::Error>> {
        let mut buf = [0u8; 3];
        self.read_command(CMD_DATA_READY, &mut buf)?;
        let word = Self::checked_word(&buf)?;
        Ok(word == 1)
    }

    /// Read one measurement from the buffer.
    ///
    /// The sensor returns 18 bytes: three big-endian f32 values (CO2 ppm,
    /// temperature °C, relative humidity %), each split into two CRC'd
    /// 16-bit words.
    pub fn read_measurement(&mut self) -> Result<Sample, Scd30Error<I2C::Error>> {
        let mut buf = [0u8; 18];
        self.read_command(CMD_READ_MEASUREMENT, &mut buf)?;
        Ok(Sample {
            co2_ppm: Self::checked_f32(&buf[0..6])?,
            temp_c: Self::checked_f32(&buf[6..12])?,
            rh_percent: Self::checked_f32(&buf[12..18])?,
        })
    }

    // ── Wire helpers ──────────────────────────────────────────

    fn write_command(&mut self, cmd: u16, arg: Option<u16>) -> Result<(), Scd30Error<I2C::Error>> {
        let mut buf = [0u8; 5];
        buf[0..2].copy_from_slice(&cmd.to_be_bytes());
        let len = match arg {
            Some(arg) => {
                buf[2..4].copy_from_slice(&arg.to_be_bytes());
                buf[4] = crc8(&buf[2..4]);
                5
            }
            None => 2,
        };
        self.i2c.write(I2C_ADDRESS, &buf[..len])?;
        Ok(())
    }

    fn read_command(&mut self, cmd: u16, out: &mut [u8]) -> Result<(), Scd30Error<I2C::Error>> {
        self.i2c.write(I2C_ADDRESS, &cmd.to_be_bytes())?;
        thread::sleep(READBACK_DELAY);
        self.i2c.read(I2C_ADDRESS, out)?;
        Ok(())
    }

    /// Verify the CRC of a `[msb, lsb, crc]` triplet and return the word.
    fn checked_word(triplet: &[u8]) -> Result<u16, Scd30Error<I2C::Error>> {
        let expected = crc8(&triplet[0..2]);
        if expected != triplet[2] {
            return Err(Scd30Error::Crc {
                expected,
                actual: triplet[2],
            });
        }
        Ok(u16::from_be_bytes([triplet[0], triplet[1]]))
    }

    /// Decode a 6-byte `[msb, lsb, crc, msb, lsb, crc]` line into an f32.
    fn checked_f32(line: &[u8]) -> Result<f32, Scd30Error<I2C::Error>> {
        let hi = Self::checked_word(&line[0..3])?;
        let lo = Self::checked_word(&line[3..6])?;
        Ok(f32::from_bits((u32::from(hi) << 16) | u32::from(lo)))
    }
}

/// Sensirion CRC-8 over arbitrary data.
fn crc8(data: &[u8]) -> u8 {
    let mut crc = CRC_INIT;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ CRC_POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}
