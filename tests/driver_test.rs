//! Behavior tests for the U12 driver against a scripted vendor seam.
//!
//! Everything here goes through the public API only: a fake [`U12Api`]
//! records transactions and plays back queued error codes, standing in for
//! the `ljackuw` library.

use std::sync::{Arc, Mutex, MutexGuard};

use daq_driver_labjack::{
    DigitalImages, LabjackError, PulseRequest, U12Api, U12Config, U12Driver, MAX_PULSES_PER_CALL,
};

// =============================================================================
// Scripted fake
// =============================================================================

#[derive(Debug, Default)]
struct ScriptState {
    version: i32,
    digital_codes: Vec<i32>,
    pulse_codes: Vec<i32>,
    digital_calls: Vec<(DigitalImages, bool)>,
    pulse_calls: Vec<PulseRequest>,
}

/// Fake of the `ljackuw` seam; the handle is cloneable so tests can inspect
/// recorded calls after handing the fake to the driver.
#[derive(Clone, Default)]
struct ScriptedU12(Arc<Mutex<ScriptState>>);

impl ScriptedU12 {
    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.0.lock().unwrap()
    }
}

impl U12Api for ScriptedU12 {
    fn firmware_version(&mut self) -> i32 {
        self.state().version
    }

    fn digital_io(&mut self, images: &mut DigitalImages, update_outputs: bool) -> i32 {
        let mut state = self.state();
        state.digital_calls.push((*images, update_outputs));
        if state.digital_codes.is_empty() {
            0
        } else {
            state.digital_codes.remove(0)
        }
    }

    fn pulse_out(&mut self, request: &PulseRequest) -> i32 {
        let mut state = self.state();
        state.pulse_calls.push(*request);
        if state.pulse_codes.is_empty() {
            0
        } else {
            state.pulse_codes.remove(0)
        }
    }
}

fn driver_with_fake() -> (U12Driver, ScriptedU12) {
    let fake = ScriptedU12::default();
    (U12Driver::new(Box::new(fake.clone())), fake)
}

// =============================================================================
// Pulse chunking
// =============================================================================

#[test]
fn pulse_train_splits_at_the_driver_ceiling() {
    let (mut driver, fake) = driver_with_fake();

    driver.pulse_dio(0x01, 40000, 500).unwrap();

    let calls = fake.state().pulse_calls.clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].num_pulses, 32767);
    assert_eq!(calls[1].num_pulses, 7233);
    let total: i32 = calls.iter().map(|c| c.num_pulses).sum();
    assert_eq!(total, 40000);
    for call in &calls {
        assert!(call.num_pulses <= MAX_PULSES_PER_CALL as i32);
        assert_eq!(call.bit_select, 0x01);
    }
}

#[test]
fn pulse_train_below_ceiling_is_a_single_burst() {
    let (mut driver, fake) = driver_with_fake();

    driver.pulse_dio(0x80, 32767, 250).unwrap();

    let calls = fake.state().pulse_calls.clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].num_pulses, 32767);
    // 25000 / 250 Hz = 100 ticks per half-period.
    assert_eq!(calls[0].time_b1, 100);
    assert_eq!(calls[0].time_b2, 100);
}

#[test]
fn pulse_fault_stops_the_train_and_carries_the_code() {
    let (mut driver, fake) = driver_with_fake();

    // First burst succeeds, second reports fault 57; the third is never sent.
    fake.state().pulse_codes = vec![0, 57];

    let err = driver.pulse_dio(0x01, 70000, 500).unwrap_err();
    assert_eq!(
        err,
        LabjackError::Device {
            operation: "PulseDIO",
            code: 57
        }
    );
    assert_eq!(fake.state().pulse_calls.len(), 2);
}

// =============================================================================
// Register round-trips
// =============================================================================

#[test]
fn configure_write_read_round_trip() {
    let (mut driver, fake) = driver_with_fake();

    // IO0 and IO1 become outputs, IO0 starting high.
    driver.set_io_to_output(0b0011, 0b0001).unwrap();
    // Raise IO1 without touching IO0.
    driver.write_to_io(0b0010, 0b0010).unwrap();

    assert_eq!(driver.read_io().unwrap(), 0b0011);

    // Every transaction resubmitted the full image pair for both groups.
    let calls = fake.state().digital_calls.clone();
    assert_eq!(calls.len(), 3);
    for (images, _) in &calls[1..] {
        assert_eq!(images.tris_io, 0b0011);
        assert_eq!(images.tris_d, 0);
    }
    // The configuration and write drive outputs, the read is pure.
    assert!(calls[0].1);
    assert!(calls[1].1);
    assert!(!calls[2].1);
}

#[test]
fn dio_group_mirrors_io_group_semantics() {
    let (mut driver, _fake) = driver_with_fake();

    driver.set_dio_to_output(0x00FF, 0x0055).unwrap();
    driver.write_to_dio(0x0002, 0x0003).unwrap();

    let images = driver.images();
    assert_eq!(images.tris_d, 0x00FF);
    // Bits 0-1 follow the write data, the rest keep their configured levels.
    assert_eq!(images.state_d, 0x0056);
}

#[test]
fn group_registers_do_not_bleed_into_each_other() {
    let (mut driver, _fake) = driver_with_fake();

    driver.set_io_to_output(0xF, 0xF).unwrap();
    driver.set_dio_to_output(0xFFFF, 0).unwrap();
    driver.write_to_dio(0x1234, 0xFFFF).unwrap();

    let images = driver.images();
    assert_eq!(images.state_io, 0xF);
    assert_eq!(images.state_d, 0x1234);
}

// =============================================================================
// Open and configuration
// =============================================================================

#[test]
fn config_parses_from_toml() {
    let config: U12Config = toml::from_str("local_id = 3").unwrap();
    assert_eq!(config.local_id, Some(3));

    let config: U12Config = toml::from_str("").unwrap();
    assert_eq!(config.local_id, None);
}

#[cfg(not(feature = "labjack_hardware"))]
#[test]
fn open_without_hardware_uses_the_demo_binding() {
    let mut u12 = U12Driver::open(&U12Config::default()).unwrap();
    assert!(u12.check_connection());
    assert_eq!(u12.read_io().unwrap(), 0);
    assert_eq!(u12.read_dio().unwrap(), 0);
}
