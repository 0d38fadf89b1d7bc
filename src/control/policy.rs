//! Control policy — the pure decision function.
//!
//! Maps one air sample plus the profile thresholds onto the next outlet
//! vector. Four rules run independently, one per outlet role; each rule
//! reads only its own bit of the current state and writes only that bit of
//! the result, so rule order never matters. The humidifier, fan and heater
//! rules are hysteresis bands: between MIN and MAX nothing changes, which
//! is what keeps relays from chattering around a threshold.
//!
//! Readings are rounded to one decimal place before every comparison.
//! That rounding is a deliberate debounce against sensor jitter on the
//! last digit — do not remove it.

use log::info;

use crate::config::{OutletMap, Profile};
use crate::outlets::OutletState;
use crate::sensors::Sample;

/// Compute the outlet vector that should follow `current` for this sample.
///
/// Pure and deterministic: same inputs, same output, no side effects
/// beyond decision logging. `now_hour` is the local wall-clock hour (0-23)
/// used by the light schedule.
pub fn next_state(
    sample: &Sample,
    profile: &Profile,
    outlets: &OutletMap,
    current: OutletState,
    now_hour: u8,
) -> OutletState {
    let co2 = round1(sample.co2_ppm);
    let temp = round1(sample.temp_c);
    let rh = round1(sample.rh_percent);

    let mut next = current;

    // Light: a single day/night edge on the wall clock, no hysteresis.
    let daytime = now_hour >= profile.light_min && now_hour < profile.light_max;
    if daytime && !current.is_on(outlets.light) {
        info!(
            "time is DAY ({} <= {} < {}), turning ON outlet {} (light)",
            profile.light_min, now_hour, profile.light_max, outlets.light
        );
        next.set(outlets.light, true);
    } else if !daytime && current.is_on(outlets.light) {
        info!(
            "time is NIGHT (outside {}..{}, hour {}), turning OFF outlet {} (light)",
            profile.light_min, profile.light_max, now_hour, outlets.light
        );
        next.set(outlets.light, false);
    }

    // Humidifier: off at the ceiling, on below the floor, hold in between.
    if rh >= profile.hum_max as f32 && current.is_on(outlets.humidifier) {
        info!(
            "humidity HIGH ({rh} >= {}), turning OFF outlet {} (humidifier)",
            profile.hum_max, outlets.humidifier
        );
        next.set(outlets.humidifier, false);
    } else if rh < profile.hum_min as f32 && !current.is_on(outlets.humidifier) {
        info!(
            "humidity LOW ({rh} < {}), turning ON outlet {} (humidifier)",
            profile.hum_min, outlets.humidifier
        );
        next.set(outlets.humidifier, true);
    }

    // Fan: triggered by high CO2 OR high temperature; released only by the
    // temperature floor. CO2 has no low-side release here — once CO2 trips
    // the fan, it runs until the chamber cools to TEMP_MIN. Intentional
    // policy, not a bug.
    if (co2 >= profile.co2_max as f32 || temp >= profile.temp_max as f32)
        && !current.is_on(outlets.fan)
    {
        if co2 >= profile.co2_max as f32 {
            info!(
                "CO2 HIGH ({co2} >= {}), turning ON outlet {} (fan)",
                profile.co2_max, outlets.fan
            );
        }
        if temp >= profile.temp_max as f32 {
            info!(
                "temperature HIGH ({temp} >= {}), turning ON outlet {} (fan)",
                profile.temp_max, outlets.fan
            );
        }
        next.set(outlets.fan, true);
    } else if temp <= profile.temp_min as f32 && current.is_on(outlets.fan) {
        info!(
            "temperature LOW ({temp} <= {}), turning OFF outlet {} (fan)",
            profile.temp_min, outlets.fan
        );
        next.set(outlets.fan, false);
    }

    // Heater: the mirror band on the same temperature thresholds. Fan and
    // heater react to the same numbers but independently — both can be on
    // at once in the dead band.
    if temp >= profile.temp_max as f32 && current.is_on(outlets.heater) {
        info!(
            "temperature HIGH ({temp} >= {}), turning OFF outlet {} (heater)",
            profile.temp_max, outlets.heater
        );
        next.set(outlets.heater, false);
    } else if temp <= profile.temp_min as f32 && !current.is_on(outlets.heater) {
        info!(
            "temperature LOW ({temp} <= {}), turning ON outlet {} (heater)",
            profile.temp_min, outlets.heater
        );
        next.set(outlets.heater, true);
    }

    next
}

/// Round to one decimal place.
fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
