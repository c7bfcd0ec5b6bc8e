//! The device capability consumed by the core.
//!
//! A [`PduDevice`] is an already-authenticated handle to one PDU. The core
//! only decides *which* calls to make and in what order; talking to the
//! hardware is the implementor's job. [`Connect`] turns a [`PduConfig`]
//! into such a handle and is supplied by whoever embeds the CLI.

use std::future::Future;

use thiserror::Error;

use crate::config::PduConfig;
use crate::model::{DeviceStatus, OutletSelection};

/// Failure reported by a device handle.
///
/// Every variant is a device communication error from the caller's point of
/// view. The variants only exist so the CLI can choose a sensible exit code
/// and help text.
#[derive(Debug, Error)]
pub enum DeviceError {
    // ── Transport ───────────────────────────────────────────────────
    /// The PDU could not be reached.
    #[error("Cannot connect to PDU at {host}: {reason}")]
    Connection { host: String, reason: String },

    /// The device did not answer in time.
    #[error("PDU request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Commands ────────────────────────────────────────────────────
    /// The device refused a command, e.g. an outlet id it does not have.
    #[error("PDU rejected the request: {message}")]
    Rejected { message: String },

    /// The device answered with something the handle could not decode.
    #[error("Unexpected response from PDU: {message}")]
    Protocol { message: String },
}

/// Operations a PDU handle exposes to the core.
///
/// `enable_outlets`/`disable_outlets` receive the selection untouched:
/// [`OutletSelection::All`] means every outlet the device has, which is
/// different from an empty id set.
pub trait PduDevice {
    /// Raw status payload. Must carry an `outlet_states` object.
    fn status(&self) -> impl Future<Output = Result<DeviceStatus, DeviceError>> + Send;

    /// `(native_key, name)` pairs in device order.
    fn outlet_names(&self) -> impl Future<Output = Result<Vec<(String, String)>, DeviceError>> + Send;

    fn enable_outlets(
        &self,
        outlets: &OutletSelection,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;

    fn disable_outlets(
        &self,
        outlets: &OutletSelection,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;
}

/// Opens an authenticated [`PduDevice`] for a given configuration.
pub trait Connect {
    type Device: PduDevice + Send + Sync;

    fn connect(
        &self,
        config: PduConfig,
    ) -> impl Future<Output = Result<Self::Device, DeviceError>> + Send;
}
