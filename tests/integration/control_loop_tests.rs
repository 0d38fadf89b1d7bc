//! Drives `ControlLoop` end to end: messages in, latched register frames
//! out.

use std::sync::mpsc;
use std::thread;

use enclosure::config::{OutletMap, Profile};
use enclosure::control::{ControlLoop, ControlMsg};
use enclosure::drivers::ShiftRegister;
use enclosure::sensors::Sample;

use crate::mock_pins::{latched_frames, pin_rig, EventLog, FixedClock};

fn profile() -> Profile {
    Profile {
        co2_max: 1000,
        co2_min: 400,
        hum_max: 95,
        hum_min: 85,
        temp_max: 24,
        temp_min: 13,
        light_max: 18,
        light_min: 6,
    }
}

fn outlets() -> OutletMap {
    OutletMap {
        humidifier: 7,
        heater: 5,
        light: 3,
        fan: 6,
    }
}

fn sample(co2: f32, temp: f32, rh: f32) -> ControlMsg {
    ControlMsg::Sample(Sample {
        co2_ppm: co2,
        temp_c: temp,
        rh_percent: rh,
    })
}

/// Spawn a control loop at the given fixed hour; returns the sender and
/// the shared pin event log. Join the returned handle after `Shutdown`.
fn spawn_loop(hour: u8) -> (mpsc::Sender<ControlMsg>, EventLog, thread::JoinHandle<()>) {
    let (data, clock, latch, log) = pin_rig();
    let sr = ShiftRegister::new(data, clock, latch);
    let (tx, rx) = mpsc::channel();
    let control = ControlLoop::new(profile(), outlets(), sr, FixedClock(hour), rx);
    let handle = thread::spawn(move || control.run().unwrap());
    (tx, log, handle)
}

#[test]
fn high_co2_daytime_sample_latches_light_and_fan() {
    let (tx, log, handle) = spawn_loop(10);
    tx.send(sample(1100.0, 20.0, 90.0)).unwrap();
    tx.send(ControlMsg::Shutdown).unwrap();
    handle.join().unwrap();

    // Startup clear, then light (bit 3) + fan (bit 6), then the shutdown
    // all-off frame.
    let frames = latched_frames(&log.lock().unwrap());
    assert_eq!(frames, vec![0b0000_0000, 0b0001_0010, 0b0000_0000]);
}

#[test]
fn unchanged_state_is_not_rewritten() {
    let (tx, log, handle) = spawn_loop(10);
    let reading = sample(1100.0, 20.0, 90.0);
    tx.send(reading).unwrap();
    tx.send(reading).unwrap();
    tx.send(reading).unwrap();
    tx.send(ControlMsg::Shutdown).unwrap();
    handle.join().unwrap();

    // Three identical samples produce one transition frame, not three.
    let frames = latched_frames(&log.lock().unwrap());
    assert_eq!(frames, vec![0b0000_0000, 0b0001_0010, 0b0000_0000]);
}

#[test]
fn shutdown_forces_all_outlets_off_even_from_all_off() {
    let (tx, log, handle) = spawn_loop(2);
    tx.send(ControlMsg::Shutdown).unwrap();
    handle.join().unwrap();

    // No sample ever arrived, yet shutdown still writes the zero frame on
    // top of the startup clear.
    let frames = latched_frames(&log.lock().unwrap());
    assert_eq!(frames, vec![0b0000_0000, 0b0000_0000]);
}

#[test]
fn dropped_sender_behaves_like_shutdown() {
    let (tx, log, handle) = spawn_loop(10);
    tx.send(sample(600.0, 13.0, 90.0)).unwrap(); // heater + light
    drop(tx);
    handle.join().unwrap();

    let frames = latched_frames(&log.lock().unwrap());
    assert_eq!(
        frames,
        vec![0b0000_0000, 0b0001_0100, 0b0000_0000],
        "hangup must deenergise everything"
    );
}

#[test]
fn state_evolves_across_samples() {
    let (tx, log, handle) = spawn_loop(10);
    // Dry chamber: humidifier and light come on.
    tx.send(sample(600.0, 20.0, 80.0)).unwrap();
    // Humidity recovers past the ceiling: humidifier drops out.
    tx.send(sample(600.0, 20.0, 95.5)).unwrap();
    tx.send(ControlMsg::Shutdown).unwrap();
    handle.join().unwrap();

    let frames = latched_frames(&log.lock().unwrap());
    assert_eq!(
        frames,
        vec![0b0000_0000, 0b0001_0001, 0b0001_0000, 0b0000_0000]
    );
}
