//! LabJack U12 hardware driver.
//!
//! This crate drives the digital subsystem of the LabJack U12 USB DAQ unit:
//! the four screw-terminal IO lines, the sixteen DB25 D lines, and timed
//! pulse trains on D0-D7. Its original job is stepping a SPEX 1681
//! monochromator, which takes 50 pulses per nanometre at up to 500 Hz on its
//! step input; any slow stepper with a step/direction interface fits the
//! same shape.
//!
//! The vendor library is reached through the narrow [`U12Api`] seam, so
//! everything above it runs against fakes in tests. Real hardware needs the
//! `labjack_hardware` feature and an installed LabJack driver library;
//! without the feature a demo binding answers instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use daq_driver_labjack::{U12Config, U12Driver};
//!
//! let mut u12 = U12Driver::open(&U12Config::default())?;
//! if u12.check_connection() {
//!     u12.set_dio_to_output(0x0001, 0)?;
//!     u12.pulse_dio(0x01, 2500, 500)?;
//! }
//! ```

pub mod driver;
pub mod error;
pub mod u12;

#[cfg(not(feature = "labjack_hardware"))]
pub use driver::DemoU12;
#[cfg(feature = "labjack_hardware")]
pub use driver::UsbU12;
pub use driver::{
    DigitalImages, PulseRequest, U12Api, FIRMWARE_VERSION_MAX, MAX_PULSES_PER_CALL,
    PULSE_TIMING_BASE,
};
pub use error::{LabjackError, Result};
pub use u12::{U12Config, U12Driver};
