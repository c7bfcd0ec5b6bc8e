// pductl-core: Outlet resolution and action dispatch between the CLI and a PDU device handle.

pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod resolve;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::PduConfig;
pub use device::{Connect, DeviceError, PduDevice};
pub use dispatch::{Dispatcher, Outcome, SETTLE_DELAY};
pub use error::CoreError;
pub use resolve::{UnknownNames, resolve_many, resolve_one, resolve_tokens, snapshot_outlets};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Action, DeviceStatus, OutletId, OutletIdSet, OutletRecord, OutletRef, OutletSelection,
    OutletState, Snapshot,
};
