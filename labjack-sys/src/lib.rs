//! Low-level FFI bindings for the LabJack U12 `ljackuw` driver library.
//!
//! These declarations are hand-written rather than generated: the U12 surface
//! used by `daq-driver-labjack` is three calls. The full library exports many
//! more (analog I/O, counters, watchdog); add declarations here as they are
//! needed.
//!
//! # Calling convention
//!
//! `ljackuw.dll` exports stdcall entry points on 32-bit Windows; `extern
//! "system"` selects stdcall there and the platform C convention everywhere
//! else. All integer parameters are C `long`, which the Windows driver
//! defines as a 32-bit signed field.
//!
//! # Safety
//!
//! All functions in this crate are direct FFI bindings and therefore
//! `unsafe`. For a safe wrapper, use the `daq-driver-labjack` crate instead.
//!
//! # Features
//!
//! - `labjack-sdk`: link against the installed LabJack driver library.
//!   Without this feature the crate compiles to an empty shell so dependents
//!   build on machines without the driver.

#![allow(non_snake_case)]

#[cfg(feature = "labjack-sdk")]
use std::os::raw::c_long;

#[cfg(feature = "labjack-sdk")]
extern "system" {
    /// Query the firmware version of the U12 addressed by `idnum`.
    ///
    /// `idnum` is read-write: pass -1 to address the first device found; the
    /// driver writes the resolved local ID back. Return values above 512
    /// are `512 + errorcode` sentinels, not versions.
    pub fn GetFirmwareVersion(idnum: *mut c_long) -> c_long;

    /// One digital I/O round-trip over all twenty digital lines.
    ///
    /// `trisD`, `stateD` and `stateIO` are read-write register images; the
    /// driver writes the states it observed back through them. `trisIO` is
    /// submitted by value. `updateDigital` of 0 performs a pure read; 1 also
    /// drives the submitted output states. `outputD` receives the states of
    /// the D lines regardless. Returns 0 on success, a driver error code
    /// otherwise.
    pub fn DigitalIO(
        idnum: *mut c_long,
        demo: c_long,
        trisD: *mut c_long,
        trisIO: c_long,
        stateD: *mut c_long,
        stateIO: *mut c_long,
        updateDigital: c_long,
        outputD: *mut c_long,
    ) -> c_long;

    /// Emit a burst of two-phase pulses on the D lines selected by
    /// `bitSelect` (D0-D7 only).
    ///
    /// Each pulse runs `timeC1` cycles of `timeB1` clock ticks for the first
    /// phase and `timeC2` cycles of `timeB2` ticks for the second;
    /// `lowFirst` of 1 emits the low phase first. `numPulses` must be below
    /// 2^15. Blocks for the duration of the burst. Returns 0 on success, a
    /// driver error code otherwise.
    pub fn PulseOut(
        idnum: *mut c_long,
        demo: c_long,
        lowFirst: c_long,
        bitSelect: c_long,
        numPulses: c_long,
        timeB1: c_long,
        timeC1: c_long,
        timeB2: c_long,
        timeC2: c_long,
    ) -> c_long;
}
