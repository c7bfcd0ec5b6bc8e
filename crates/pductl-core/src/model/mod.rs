// ── Domain model ──
//
// Outlet identity, selection, device status and the action verbs. Every
// value here is transient: built for one invocation and thrown away.

pub mod action;
pub mod outlet;
pub mod status;

pub use action::Action;
pub use outlet::{OutletId, OutletIdSet, OutletRecord, OutletRef, OutletSelection, OutletState};
pub use status::{DeviceStatus, Snapshot};
