//! LabJack U12 digital I/O and pulse-output control.
//!
//! The U12 exposes two digital line groups: the four screw-terminal lines
//! (IO) and the sixteen DB25 lines (D). The vendor's DigitalIO transaction
//! always carries the full direction/level images for both groups, so
//! [`U12Driver`] caches the last-known images and merges every request into
//! them before calling out; anything else would silently reconfigure lines
//! the caller never touched.
//!
//! All calls are synchronous and block for the driver round-trip; pulse
//! trains block for roughly `pulses / freq_hz` seconds per burst. The driver
//! is not reentrant - callers running it from several threads must serialize
//! access themselves.
//!
//! Reference: LabJack U12 User's Guide, ljackuw function reference.
//!
//! # Usage
//!
//! ```rust,ignore
//! use daq_driver_labjack::{U12Config, U12Driver};
//!
//! let config: U12Config = toml::from_str("local_id = 3")?;
//! let mut u12 = U12Driver::open(&config)?;
//!
//! // Drive the monochromator step input on D0: 50 pulses per nm at 500 Hz.
//! u12.set_dio_to_output(0x0001, 0)?;
//! u12.pulse_dio(0x01, 50 * 120, 500)?;
//! ```

use serde::Deserialize;
use tracing::instrument;

use crate::driver::{
    DigitalImages, PulseRequest, U12Api, FIRMWARE_VERSION_MAX, MAX_PULSES_PER_CALL,
    PULSE_TIMING_BASE,
};
#[cfg(not(feature = "labjack_hardware"))]
use crate::driver::DemoU12;
#[cfg(feature = "labjack_hardware")]
use crate::driver::UsbU12;
use crate::error::{LabjackError, Result};

// =============================================================================
// U12Config
// =============================================================================

/// Configuration for the U12 driver.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct U12Config {
    /// Local ID of the device to address. Omit to use the first U12 found.
    #[serde(default)]
    pub local_id: Option<i32>,
}

// =============================================================================
// U12Driver
// =============================================================================

/// Driver for the LabJack U12 digital subsystem.
///
/// Owns the cached register images for both line groups; construction gives
/// power-on defaults (every line an input, every level low). Independent
/// instances are possible, but two instances addressing the same physical
/// device will fight over its registers - keep one per device.
pub struct U12Driver {
    api: Box<dyn U12Api>,
    images: DigitalImages,
}

impl U12Driver {
    /// Create a driver over an already-built vendor seam.
    ///
    /// This is the injection point for fakes in tests; production code goes
    /// through [`U12Driver::open`].
    pub fn new(api: Box<dyn U12Api>) -> Self {
        Self {
            api,
            images: DigitalImages::default(),
        }
    }

    /// Open the device described by `config` and verify it is answering.
    ///
    /// Builds the USB binding when compiled with `labjack_hardware`, the
    /// demo binding otherwise. Fails with [`LabjackError::NotDetected`] when
    /// the firmware probe comes back with an error sentinel; use
    /// [`check_connection`](Self::check_connection) for non-failing polls
    /// afterwards.
    pub fn open(config: &U12Config) -> Result<Self> {
        #[cfg(feature = "labjack_hardware")]
        let api: Box<dyn U12Api> = Box::new(UsbU12::new(config.local_id));

        #[cfg(not(feature = "labjack_hardware"))]
        let api: Box<dyn U12Api> = {
            let _ = config;
            tracing::warn!("built without labjack_hardware; using the demo binding");
            Box::new(DemoU12)
        };

        let mut driver = Self::new(api);
        let version = driver.api.firmware_version();
        if version > FIRMWARE_VERSION_MAX {
            return Err(LabjackError::NotDetected { version });
        }
        tracing::info!(firmware = version, "LabJack U12 detected");
        Ok(driver)
    }

    /// Last-known register images, as updated by the most recent transaction.
    pub fn images(&self) -> DigitalImages {
        self.images
    }

    /// Check whether a U12 is answering on the USB bus.
    ///
    /// A probe, not a transaction: it never fails and never touches the
    /// cached register images, so callers can poll for device presence
    /// without error-driven control flow.
    pub fn check_connection(&mut self) -> bool {
        let version = self.api.firmware_version();
        tracing::debug!(version, "firmware version probe");
        version <= FIRMWARE_VERSION_MAX
    }

    // =========================================================================
    // IO group - the 4 screw-terminal lines
    // =========================================================================

    /// Read the four screw-terminal IO lines.
    ///
    /// Issues a pure-read transaction and returns the lines as a 4-bit mask.
    #[instrument(skip(self), err)]
    pub fn read_io(&mut self) -> Result<u8> {
        self.digital_transaction("ReadIO", false)?;
        Ok((self.images.state_io & 0xF) as u8)
    }

    /// Configure screw-terminal lines as outputs.
    ///
    /// Bits set in `direction` mark the corresponding lines as outputs;
    /// `data` gives their initial levels. Both merge by OR into the cached
    /// images, so a line once configured as output stays one - there is no
    /// way to revert a line to input through this call.
    #[instrument(skip(self), err)]
    pub fn set_io_to_output(&mut self, direction: u8, data: u8) -> Result<()> {
        self.images.tris_io |= i32::from(direction);
        self.images.state_io |= i32::from(data);
        self.digital_transaction("SetIOtoOutput", true)
    }

    /// Write levels to a subset of the IO lines.
    ///
    /// Only lines selected by `bitmask` take the value from `data`; the rest
    /// keep their cached level exactly. Pass `0xF` to address all four.
    /// Direction is left alone - writing to a line still configured as input
    /// has no electrical effect but is not rejected.
    #[instrument(skip(self), err)]
    pub fn write_to_io(&mut self, data: u8, bitmask: u8) -> Result<()> {
        let data = i32::from(data);
        let mask = i32::from(bitmask);
        // Set the requested high bits, then clear the requested low bits.
        // Positions outside the mask read 1 in the AND operand, so they
        // survive both steps unchanged.
        self.images.state_io |= data & mask;
        self.images.state_io &= data | !mask;
        self.digital_transaction("WritetoIO", true)
    }

    // =========================================================================
    // D group - the 16 DB25 lines
    // =========================================================================

    /// Read the sixteen DB25 D lines.
    ///
    /// Issues a pure-read transaction and returns the lines as a 16-bit mask.
    #[instrument(skip(self), err)]
    pub fn read_dio(&mut self) -> Result<u16> {
        self.digital_transaction("ReadDIO", false)?;
        Ok((self.images.state_d & 0xFFFF) as u16)
    }

    /// Configure DB25 lines as outputs.
    ///
    /// Same contract as [`set_io_to_output`](Self::set_io_to_output), for the
    /// 16-line group.
    #[instrument(skip(self), err)]
    pub fn set_dio_to_output(&mut self, direction: u16, data: u16) -> Result<()> {
        self.images.tris_d |= i32::from(direction);
        self.images.state_d |= i32::from(data);
        self.digital_transaction("SetDIOtoOutput", true)
    }

    /// Write levels to a subset of the D lines.
    ///
    /// Same contract as [`write_to_io`](Self::write_to_io), for the 16-line
    /// group; pass `0xFFFF` to address all sixteen.
    #[instrument(skip(self), err)]
    pub fn write_to_dio(&mut self, data: u16, bitmask: u16) -> Result<()> {
        let data = i32::from(data);
        let mask = i32::from(bitmask);
        self.images.state_d |= data & mask;
        self.images.state_d &= data | !mask;
        self.digital_transaction("WritetoDIO", true)
    }

    // =========================================================================
    // Pulse output
    // =========================================================================

    /// Pulse the D lines selected by `lines` `pulses` times at roughly
    /// `freq_hz`.
    ///
    /// Only D0-D7 can be pulsed; the `u8` mask covers exactly those eight
    /// lines. A zero count returns immediately without a driver call. The
    /// driver takes at most [`MAX_PULSES_PER_CALL`] pulses per transaction,
    /// so longer trains are split into bursts; timing across bursts is not
    /// gap-free, which is acceptable for stepper rates (the SPEX-class
    /// monochromators this crate targets step at 500 Hz or below). Each
    /// burst blocks for its full duration.
    ///
    /// Fails fast: the first burst reporting a fault raises it and the
    /// remaining bursts are not attempted.
    #[instrument(skip(self), err)]
    pub fn pulse_dio(&mut self, lines: u8, pulses: u32, freq_hz: u32) -> Result<()> {
        if pulses == 0 {
            return Ok(());
        }
        if freq_hz == 0 {
            return Err(LabjackError::InvalidArgument {
                message: "pulse frequency must be nonzero".into(),
            });
        }

        // ljackuw timing: half-period of 25000 / f clock ticks per phase,
        // cycle count pinned to 1 for both phases. Keep the arithmetic as-is;
        // it matches measured hardware timing, not a datasheet formula.
        let half_period = (PULSE_TIMING_BASE / freq_hz) as i32;

        let mut remaining = pulses;
        while remaining > 0 {
            let burst = remaining.min(MAX_PULSES_PER_CALL);
            tracing::debug!(burst, remaining, freq_hz, "PulseOut burst");
            let code = self.api.pulse_out(&PulseRequest {
                low_first: false,
                bit_select: i32::from(lines),
                num_pulses: burst as i32,
                time_b1: half_period,
                time_c1: 1,
                time_b2: half_period,
                time_c2: 1,
            });
            if code != 0 {
                return Err(LabjackError::device("PulseDIO", code));
            }
            remaining -= burst;
        }
        Ok(())
    }

    /// Run one DigitalIO round-trip with the cached images.
    ///
    /// The driver's readback lands in the cache even when the call reports a
    /// fault - the transaction completed at the protocol level, so the
    /// readback is the device's real state.
    fn digital_transaction(&mut self, operation: &'static str, update_outputs: bool) -> Result<()> {
        let code = self.api.digital_io(&mut self.images, update_outputs);
        if code != 0 {
            tracing::warn!(operation, code, "DigitalIO transaction failed");
            return Err(LabjackError::device(operation, code));
        }
        tracing::trace!(operation, images = ?self.images, "DigitalIO transaction");
        Ok(())
    }
}

impl std::fmt::Debug for U12Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("U12Driver")
            .field("images", &self.images)
            .finish_non_exhaustive()
    }
}
