// ── Core error types ──
//
// User-facing errors from pductl-core. Anything the device handle reports
// arrives wrapped in `CoreError::Device` with its original meaning intact;
// the core never retries or rolls back.

use thiserror::Error;

use crate::device::DeviceError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Unrecognized action: {verb}")]
    UnrecognizedAction { verb: String },

    #[error("No outlet named '{name}'")]
    OutletNameNotFound { name: String },

    #[error("Invalid outlet reference '{token}': expected an outlet id or name")]
    InvalidOutletRef { token: String },

    // ── Device data errors ───────────────────────────────────────────
    #[error("Malformed device status: {message}")]
    MalformedStatus { message: String },

    // ── Device communication (wrapped, meaning preserved) ────────────
    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl CoreError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedStatus {
            message: message.into(),
        }
    }
}
