//! Sensor subsystem.

pub mod scd30;

/// One air reading: the fixed 3-tuple the SCD30 produces every interval.
///
/// Timestamping is implicit at receipt; samples are consumed exactly once
/// by the control loop and never persisted by the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// CO2 concentration, parts per million (0 – 10 000).
    pub co2_ppm: f32,
    /// Temperature, degrees Celsius (-40 – 125).
    pub temp_c: f32,
    /// Relative humidity, percent (0 – 100).
    pub rh_percent: f32,
}
