//! Grow-chamber environmental controller.
//!
//! Samples CO2, temperature and relative humidity from an SCD30, derives
//! on/off decisions for four mains outlets (light, humidifier, fan, heater)
//! against a configured profile, and drives an 8-bit serial shift register
//! to switch them. Hardware access goes through `embedded-hal` traits, so
//! every module here is testable on the host without a Raspberry Pi.

#![deny(unused_must_use)]

pub mod camera;
pub mod config;
pub mod control;
pub mod drivers;
pub mod outlets;
pub mod pins;
pub mod sampler;
pub mod sensors;
