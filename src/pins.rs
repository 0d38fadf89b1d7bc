//! Default GPIO pin assignments (BCM numbering).
//!
//! Single source of truth for the config-file defaults — change a pin here
//! and every freshly written config picks it up. A deployed config file
//! overrides these per installation.

// ---------------------------------------------------------------------------
// 74HC595 shift register
// ---------------------------------------------------------------------------

/// Serial data line (SER).
pub const SR_DATA: u8 = 17;
/// Shift clock line (SRCLK) — one rising edge per bit.
pub const SR_CLOCK: u8 = 27;
/// Register latch line (RCLK) — rising edge transfers the shifted byte
/// to the output pins.
pub const SR_LATCH: u8 = 22;

// ---------------------------------------------------------------------------
// SCD30 CO2/temperature/humidity sensor
// ---------------------------------------------------------------------------

/// The SCD30 sits on the Pi's primary I²C bus (GPIO 2/3); no pin
/// configuration is needed beyond enabling the bus in the firmware.
pub const SCD30_I2C_BUS: u8 = 1;
