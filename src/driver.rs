//! The injectable seam over the `ljackuw` driver library.
//!
//! [`U12Api`] narrows the vendor library to the three entry points the U12
//! driver uses, so the register-merging logic in [`crate::u12`] can be tested
//! against fakes without hardware. [`UsbU12`] is the real binding, compiled
//! only with the `labjack_hardware` feature; [`DemoU12`] stands in otherwise.

#[cfg(feature = "labjack_hardware")]
use std::os::raw::c_long;

// =============================================================================
// Driver limits
// =============================================================================

/// Firmware-version values above this are `512 + errorcode` sentinels,
/// reported when no device answered the query.
pub const FIRMWARE_VERSION_MAX: i32 = 512;

/// PulseOut accepts at most this many pulses per call; longer trains must be
/// split into bursts.
pub const MAX_PULSES_PER_CALL: u32 = (1 << 15) - 1;

/// Numerator of the half-period derivation: a pulse train at `f` Hz uses a
/// half-period of `25000 / f` driver clock ticks per phase.
pub const PULSE_TIMING_BASE: u32 = 25000;

// =============================================================================
// Transaction parameter types
// =============================================================================

/// Full register images for both digital line groups.
///
/// The DigitalIO transaction has no partial-register form: every call
/// resubmits all four images, and the driver writes the line states it
/// observed back into them. The last-known full image must therefore be
/// resubmitted on every call, or lines the caller never addressed are
/// silently reconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitalImages {
    /// Direction register for the 16 D lines (1 = output).
    pub tris_d: i32,
    /// Direction register for the 4 IO lines (1 = output).
    pub tris_io: i32,
    /// Level register for the D lines.
    pub state_d: i32,
    /// Level register for the IO lines.
    pub state_io: i32,
}

/// Parameters of a single PulseOut transaction.
///
/// Each pulse is two phases: `time_c1` cycles of `time_b1` clock ticks,
/// then `time_c2` cycles of `time_b2` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseRequest {
    /// Emit the low phase before the high phase.
    pub low_first: bool,
    /// Bit mask of the D lines to pulse (D0-D7).
    pub bit_select: i32,
    /// Pulses in this burst, at most [`MAX_PULSES_PER_CALL`].
    pub num_pulses: i32,
    /// First-phase half-period, driver clock ticks.
    pub time_b1: i32,
    /// First-phase cycle count.
    pub time_c1: i32,
    /// Second-phase half-period, driver clock ticks.
    pub time_b2: i32,
    /// Second-phase cycle count.
    pub time_c2: i32,
}

// =============================================================================
// U12Api - the vendor-call seam
// =============================================================================

/// The three `ljackuw` entry points the U12 driver uses.
///
/// Every call is a blocking round-trip to the device; pulse bursts block for
/// their full duration. Methods return the raw driver error code, 0 meaning
/// success, so the caller decides how faults surface.
pub trait U12Api: Send {
    /// GetFirmwareVersion. Values above [`FIRMWARE_VERSION_MAX`] mean the
    /// query failed and nothing answered.
    fn firmware_version(&mut self) -> i32;

    /// One DigitalIO round-trip. The driver writes observed line states back
    /// into `images`; with `update_outputs` false the transaction is a pure
    /// read.
    fn digital_io(&mut self, images: &mut DigitalImages, update_outputs: bool) -> i32;

    /// One PulseOut burst on the lines selected in `request`.
    fn pulse_out(&mut self, request: &PulseRequest) -> i32;
}

// =============================================================================
// UsbU12 - real hardware binding
// =============================================================================

/// Binding to the installed `ljackuw` driver library.
#[cfg(feature = "labjack_hardware")]
pub struct UsbU12 {
    /// Local ID of the addressed device; -1 selects the first U12 found.
    /// The driver writes the resolved ID back on the first transaction, so
    /// later calls keep talking to the same unit.
    idnum: c_long,
    /// Demo-mode flag of the vendor API. Always 0; demo mode fabricates
    /// readings.
    demo: c_long,
}

#[cfg(feature = "labjack_hardware")]
impl UsbU12 {
    /// Create a binding addressing the device with the given local ID, or
    /// the first U12 found when `local_id` is `None`.
    pub fn new(local_id: Option<i32>) -> Self {
        Self {
            idnum: c_long::from(local_id.unwrap_or(-1)),
            demo: 0,
        }
    }

    /// The local ID this binding addresses, as last resolved by the driver.
    pub fn local_id(&self) -> i32 {
        self.idnum as i32
    }
}

#[cfg(feature = "labjack_hardware")]
impl U12Api for UsbU12 {
    fn firmware_version(&mut self) -> i32 {
        // SAFETY: idnum is a live field for the duration of the call and the
        // driver only writes the resolved local ID through it.
        let version = unsafe { labjack_sys::GetFirmwareVersion(&mut self.idnum) };
        version as i32
    }

    fn digital_io(&mut self, images: &mut DigitalImages, update_outputs: bool) -> i32 {
        let mut tris_d = c_long::from(images.tris_d);
        let tris_io = c_long::from(images.tris_io);
        let mut state_d = c_long::from(images.state_d);
        let mut state_io = c_long::from(images.state_io);
        let mut output_d: c_long = 0;

        // SAFETY: every pointer refers to a live stack local or field for the
        // duration of the call; the driver only writes through them.
        let code = unsafe {
            labjack_sys::DigitalIO(
                &mut self.idnum,
                self.demo,
                &mut tris_d,
                tris_io,
                &mut state_d,
                &mut state_io,
                if update_outputs { 1 } else { 0 },
                &mut output_d,
            )
        };

        // trisIO is submitted by value, so only the by-reference images come
        // back updated.
        images.tris_d = tris_d as i32;
        images.state_d = state_d as i32;
        images.state_io = state_io as i32;

        code as i32
    }

    fn pulse_out(&mut self, request: &PulseRequest) -> i32 {
        // SAFETY: idnum is a live field; all other parameters pass by value.
        let code = unsafe {
            labjack_sys::PulseOut(
                &mut self.idnum,
                self.demo,
                if request.low_first { 1 } else { 0 },
                c_long::from(request.bit_select),
                c_long::from(request.num_pulses),
                c_long::from(request.time_b1),
                c_long::from(request.time_c1),
                c_long::from(request.time_b2),
                c_long::from(request.time_c2),
            )
        };
        code as i32
    }
}

// =============================================================================
// DemoU12 - hardware-free stand-in
// =============================================================================

/// Firmware version [`DemoU12`] reports; reads as firmware 1.10.
#[cfg(not(feature = "labjack_hardware"))]
const DEMO_FIRMWARE_VERSION: i32 = 110;

/// Stand-in for the USB binding when built without `labjack_hardware`.
///
/// Answers the firmware probe with a plausible version and treats the
/// DigitalIO round-trip as a loopback: submitted images are accepted
/// unchanged, so outputs read back exactly as driven. Pulse bursts are
/// acknowledged without blocking.
#[cfg(not(feature = "labjack_hardware"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoU12;

#[cfg(not(feature = "labjack_hardware"))]
impl U12Api for DemoU12 {
    fn firmware_version(&mut self) -> i32 {
        DEMO_FIRMWARE_VERSION
    }

    fn digital_io(&mut self, images: &mut DigitalImages, update_outputs: bool) -> i32 {
        tracing::trace!(?images, update_outputs, "demo DigitalIO");
        0
    }

    fn pulse_out(&mut self, request: &PulseRequest) -> i32 {
        tracing::debug!(?request, "demo PulseOut");
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_images_are_all_inputs_low() {
        let images = DigitalImages::default();
        assert_eq!(images.tris_d, 0);
        assert_eq!(images.tris_io, 0);
        assert_eq!(images.state_d, 0);
        assert_eq!(images.state_io, 0);
    }

    #[test]
    fn test_pulse_ceiling_is_15_bits() {
        assert_eq!(MAX_PULSES_PER_CALL, 32767);
    }

    #[cfg(not(feature = "labjack_hardware"))]
    #[test]
    fn test_demo_binding_answers_probe() {
        let mut demo = DemoU12;
        assert!(demo.firmware_version() <= FIRMWARE_VERSION_MAX);
        let mut images = DigitalImages::default();
        assert_eq!(demo.digital_io(&mut images, true), 0);
        assert_eq!(images, DigitalImages::default());
    }
}
