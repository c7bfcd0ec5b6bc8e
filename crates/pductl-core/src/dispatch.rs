//! Action dispatch: one [`Action`] → the device calls that carry it out.

use std::time::Duration;

use tracing::{debug, info};

use crate::device::PduDevice;
use crate::error::CoreError;
use crate::model::{Action, DeviceStatus, OutletSelection, Snapshot};
use crate::resolve::snapshot_outlets;

/// Pause between switching outlets off and back on during a toggle.
///
/// Protects the connected hardware. Not configurable and never skipped.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Result of a completed dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Enabled(OutletSelection),
    Disabled(OutletSelection),
    Toggled(OutletSelection),
    /// Every named outlet with its id and state, in device order.
    States(Snapshot),
    /// Raw status payload, untouched.
    Status(DeviceStatus),
}

/// Drives a device handle for exactly one action at a time.
#[derive(Debug)]
pub struct Dispatcher<'a, D: ?Sized> {
    device: &'a D,
}

impl<'a, D> Dispatcher<'a, D>
where
    D: PduDevice + ?Sized,
{
    pub fn new(device: &'a D) -> Self {
        Self { device }
    }

    /// Carry out `action`. The selection is ignored by STATUS and STATES.
    ///
    /// Device errors propagate as-is; a failed disable during a toggle
    /// stops before the settle delay and nothing is re-enabled.
    pub async fn dispatch(
        &self,
        action: Action,
        outlets: &OutletSelection,
    ) -> Result<Outcome, CoreError> {
        debug!(%action, %outlets, "dispatching");
        match action {
            Action::Enable => {
                self.device.enable_outlets(outlets).await?;
                info!(%outlets, "enabled");
                Ok(Outcome::Enabled(outlets.clone()))
            }
            Action::Disable => {
                self.device.disable_outlets(outlets).await?;
                info!(%outlets, "disabled");
                Ok(Outcome::Disabled(outlets.clone()))
            }
            Action::Toggle => {
                self.toggle(outlets).await?;
                Ok(Outcome::Toggled(outlets.clone()))
            }
            Action::States => {
                let snapshot = snapshot_outlets(self.device).await?;
                Ok(Outcome::States(snapshot))
            }
            Action::Status => {
                let status = self.device.status().await?;
                Ok(Outcome::Status(status))
            }
        }
    }

    async fn toggle(&self, outlets: &OutletSelection) -> Result<(), CoreError> {
        debug!(%outlets, "toggle: disabling");
        self.device.disable_outlets(outlets).await?;

        debug!(delay = ?SETTLE_DELAY, "toggle: settling");
        tokio::time::sleep(SETTLE_DELAY).await;

        debug!(%outlets, "toggle: enabling");
        self.device.enable_outlets(outlets).await?;
        info!(%outlets, "toggled");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{OutletId, OutletIdSet, OutletState};
    use crate::testing::{DeviceCall, RecordingPdu};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pdu() -> RecordingPdu {
        RecordingPdu::new()
            .with_outlet("1", "A", "ON")
            .with_outlet("2", "B", "OFF")
            .with_outlet("5", "C", "ON")
    }

    fn only(ids: &[u32]) -> OutletSelection {
        OutletSelection::Only(ids.iter().copied().map(OutletId::new).collect::<OutletIdSet>())
    }

    #[tokio::test]
    async fn enable_passes_selection_through() {
        let device = pdu();
        let outcome = Dispatcher::new(&device)
            .dispatch(Action::Enable, &only(&[2]))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Enabled(only(&[2])));
        assert_eq!(device.calls(), vec![DeviceCall::Enable(only(&[2]))]);
        assert_eq!(device.state_of("2"), Some(json!("ON")));
    }

    #[tokio::test]
    async fn disable_all_addresses_every_outlet() {
        let device = pdu();
        Dispatcher::new(&device)
            .dispatch(Action::Disable, &OutletSelection::All)
            .await
            .unwrap();
        assert_eq!(device.calls(), vec![DeviceCall::Disable(OutletSelection::All)]);
        for key in ["1", "2", "5"] {
            assert_eq!(device.state_of(key), Some(json!("OFF")), "outlet {key}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_disables_waits_then_enables() {
        let device = pdu();
        let selection = only(&[2, 5]);
        let outcome = Dispatcher::new(&device)
            .dispatch(Action::Toggle, &selection)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Toggled(selection.clone()));

        let calls = device.timed_calls();
        assert_eq!(calls.len(), 2);
        let (disabled_at, first) = &calls[0];
        let (enabled_at, second) = &calls[1];
        assert_eq!(*first, DeviceCall::Disable(selection.clone()));
        assert_eq!(*second, DeviceCall::Enable(selection));
        assert!(enabled_at.duration_since(*disabled_at) >= SETTLE_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_stops_when_disable_fails() {
        let device = pdu().reject_switching_with("unknown outlet 9");
        let err = Dispatcher::new(&device)
            .dispatch(Action::Toggle, &only(&[9]))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Device(_)));
        assert_eq!(device.calls(), vec![DeviceCall::Disable(only(&[9]))]);
    }

    #[tokio::test]
    async fn states_maps_names_to_states() {
        let device = RecordingPdu::new()
            .with_outlet("1", "A", "ON")
            .with_outlet("2", "B", "OFF");
        let outcome = Dispatcher::new(&device)
            .dispatch(Action::States, &OutletSelection::All)
            .await
            .unwrap();
        let snapshot = match outcome {
            Outcome::States(snapshot) => snapshot,
            other => panic!("expected states, got {other:?}"),
        };
        assert_eq!(snapshot.get("A").unwrap().state, OutletState::On);
        assert_eq!(snapshot.get("B").unwrap().state, OutletState::Off);
    }

    #[tokio::test]
    async fn states_keep_outlet_ids() {
        let device = RecordingPdu::new()
            .with_outlet("outlet3", "NAS", "ON")
            .with_outlet("outlet7", "Modem", "OFF");
        let outcome = Dispatcher::new(&device)
            .dispatch(Action::States, &OutletSelection::All)
            .await
            .unwrap();
        let Outcome::States(snapshot) = outcome else {
            panic!("expected states");
        };
        let ids: Vec<_> = snapshot.records().map(|r| (r.name.as_str(), r.id.get())).collect();
        assert_eq!(ids, vec![("NAS", 3), ("Modem", 7)]);
    }

    #[tokio::test]
    async fn status_returns_raw_payload() {
        let device = pdu().with_status_field("firmware", "2.1.0");
        let outcome = Dispatcher::new(&device)
            .dispatch(Action::Status, &OutletSelection::All)
            .await
            .unwrap();
        let status = match outcome {
            Outcome::Status(status) => status,
            other => panic!("expected status, got {other:?}"),
        };
        assert_eq!(status.get("firmware"), Some(&json!("2.1.0")));
        assert_eq!(
            status.get("outlet_states"),
            Some(&json!({"1": "ON", "2": "OFF", "5": "ON"}))
        );
        assert_eq!(device.calls(), vec![DeviceCall::Status]);
    }

    #[tokio::test]
    async fn read_only_actions_never_switch() {
        let device = pdu();
        let dispatcher = Dispatcher::new(&device);
        dispatcher.dispatch(Action::Status, &only(&[1])).await.unwrap();
        dispatcher.dispatch(Action::States, &only(&[1])).await.unwrap();
        assert!(
            device
                .calls()
                .iter()
                .all(|c| matches!(c, DeviceCall::Status | DeviceCall::OutletNames))
        );
    }
}
