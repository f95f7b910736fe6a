//! Error types for LabJack U12 operations.

use thiserror::Error;

/// Result type alias for U12 operations.
pub type Result<T> = std::result::Result<T, LabjackError>;

/// Errors that can occur when working with a LabJack U12.
///
/// Every fallible driver transaction surfaces its fault as [`Device`],
/// carrying the failing operation's name and the raw `ljackuw` error code so
/// operators can cross-reference the vendor's error-code table. Nothing is
/// retried or translated here; callers own the recovery policy.
///
/// [`Device`]: LabjackError::Device
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabjackError {
    /// A driver transaction returned a nonzero fault code.
    #[error("LabJack {operation} failed: driver error code {code}")]
    Device {
        /// Name of the failing operation.
        operation: &'static str,
        /// Raw error code reported by the driver.
        code: i32,
    },

    /// No U12 answered the firmware-version probe at open time.
    #[error("no LabJack U12 detected (firmware probe returned {version})")]
    NotDetected {
        /// The sentinel the probe reported instead of a version.
        version: i32,
    },

    /// Argument rejected before any driver call was made.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },
}

impl LabjackError {
    pub(crate) fn device(operation: &'static str, code: i32) -> Self {
        Self::Device { operation, code }
    }

    /// The raw driver error code, if this error carries one.
    pub fn driver_code(&self) -> Option<i32> {
        match self {
            Self::Device { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Check if this error came back from a driver transaction.
    pub fn is_device_fault(&self) -> bool {
        matches!(self, Self::Device { .. })
    }
}
