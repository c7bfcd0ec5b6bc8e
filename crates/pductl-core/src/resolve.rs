//! Outlet resolution: operator tokens → canonical outlet selection.
//!
//! Numeric references pass straight through (the device is the authority on
//! which ids exist); names are looked up in a fresh [`Snapshot`].

use tracing::{debug, warn};

use crate::device::PduDevice;
use crate::error::CoreError;
use crate::model::{OutletId, OutletIdSet, OutletRef, OutletSelection, Snapshot};

/// What to do with a name that matches no outlet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownNames {
    /// Drop the name and carry on.
    #[default]
    Skip,
    /// Fail with [`CoreError::OutletNameNotFound`].
    Reject,
}

/// Fetch status and names once and join them into a snapshot.
pub async fn snapshot_outlets<D>(device: &D) -> Result<Snapshot, CoreError>
where
    D: PduDevice + ?Sized,
{
    let status = device.status().await?;
    let names = device.outlet_names().await?;
    let snapshot = Snapshot::from_parts(&status, &names)?;
    debug!(outlets = snapshot.len(), "captured outlet snapshot");
    Ok(snapshot)
}

/// Resolve a single reference. `None` means the name matched nothing.
pub fn resolve_one(outlet: &OutletRef, snapshot: &Snapshot) -> Option<OutletId> {
    match outlet {
        OutletRef::Numeric(id) => Some(*id),
        OutletRef::Name(name) => snapshot.get(name).map(|record| record.id),
    }
}

/// Resolve every reference into a sorted, deduplicated selection.
///
/// `None` or an empty slice selects every outlet.
pub fn resolve_many(
    outlets: Option<&[OutletRef]>,
    snapshot: &Snapshot,
    unknown: UnknownNames,
) -> Result<OutletSelection, CoreError> {
    let Some(outlets) = outlets.filter(|refs| !refs.is_empty()) else {
        return Ok(OutletSelection::All);
    };

    let mut ids = OutletIdSet::new();
    for outlet in outlets {
        match resolve_one(outlet, snapshot) {
            Some(id) => {
                ids.insert(id);
            }
            None => match unknown {
                UnknownNames::Skip => warn!(outlet = %outlet, "no outlet with this name, skipping"),
                UnknownNames::Reject => {
                    return Err(CoreError::OutletNameNotFound {
                        name: outlet.to_string(),
                    });
                }
            },
        }
    }

    if ids.is_empty() {
        warn!("none of the given outlets resolved");
    }
    Ok(OutletSelection::Only(ids))
}

/// Classify raw tokens and resolve them against the device.
///
/// The snapshot is only fetched when at least one token is a name.
pub async fn resolve_tokens<D, S>(
    device: &D,
    tokens: &[S],
    unknown: UnknownNames,
) -> Result<OutletSelection, CoreError>
where
    D: PduDevice + ?Sized,
    S: AsRef<str>,
{
    let refs = tokens
        .iter()
        .map(|token| OutletRef::classify(token.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let snapshot = if refs.iter().any(|r| matches!(r, OutletRef::Name(_))) {
        snapshot_outlets(device).await?
    } else {
        Snapshot::default()
    };

    let selection = resolve_many(Some(refs.as_slice()), &snapshot, unknown)?;
    debug!(outlets = %selection, "resolved outlet selection");
    Ok(selection)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{DeviceCall, RecordingPdu};
    use pretty_assertions::assert_eq;

    fn pdu() -> RecordingPdu {
        RecordingPdu::new()
            .with_outlet("outlet1", "A", "ON")
            .with_outlet("outlet2", "B", "OFF")
            .with_outlet("outlet5", "Lamp", "ON")
    }

    fn ids(selection: &OutletSelection) -> Vec<u32> {
        selection
            .ids()
            .expect("explicit selection")
            .iter()
            .map(OutletId::get)
            .collect()
    }

    fn names(tokens: &[&str]) -> Vec<OutletRef> {
        tokens
            .iter()
            .map(|t| OutletRef::classify(t).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn names_resolve_to_sorted_unique_ids() {
        let snapshot = snapshot_outlets(&pdu()).await.unwrap();
        let refs = names(&["Lamp", "A", "Lamp", "B"]);
        let selection = resolve_many(Some(refs.as_slice()), &snapshot, UnknownNames::Skip).unwrap();
        assert_eq!(ids(&selection), vec![1, 2, 5]);
    }

    #[test]
    fn numeric_passes_through_unknown_ids() {
        let snapshot = Snapshot::default();
        let id = resolve_one(&OutletRef::classify("3").unwrap(), &snapshot);
        assert_eq!(id, Some(OutletId::new(3)));
    }

    #[test]
    fn empty_or_absent_input_selects_all() {
        let snapshot = Snapshot::default();
        assert_eq!(
            resolve_many(None, &snapshot, UnknownNames::Skip).unwrap(),
            OutletSelection::All
        );
        assert_eq!(
            resolve_many(Some(&[] as &[OutletRef]), &snapshot, UnknownNames::Skip).unwrap(),
            OutletSelection::All
        );
    }

    #[tokio::test]
    async fn mixed_input_drops_unknown_names() {
        let snapshot = snapshot_outlets(&pdu()).await.unwrap();
        let refs = names(&["A", "3", "Z"]);
        let selection = resolve_many(Some(refs.as_slice()), &snapshot, UnknownNames::Skip).unwrap();
        assert_eq!(ids(&selection), vec![1, 3]);
    }

    #[tokio::test]
    async fn strict_mode_reports_unknown_names() {
        let snapshot = snapshot_outlets(&pdu()).await.unwrap();
        let refs = names(&["A", "Z"]);
        let err = resolve_many(Some(refs.as_slice()), &snapshot, UnknownNames::Reject).unwrap_err();
        assert!(matches!(err, CoreError::OutletNameNotFound { name } if name == "Z"));
    }

    #[tokio::test]
    async fn nothing_resolved_is_an_empty_selection_not_all() {
        let snapshot = snapshot_outlets(&pdu()).await.unwrap();
        let refs = names(&["Nope"]);
        let selection = resolve_many(Some(refs.as_slice()), &snapshot, UnknownNames::Skip).unwrap();
        assert_eq!(selection, OutletSelection::Only(OutletIdSet::new()));
    }

    #[tokio::test]
    async fn numeric_tokens_skip_the_snapshot() {
        let device = pdu();
        let selection = resolve_tokens(&device, &["5", "2"], UnknownNames::Skip)
            .await
            .unwrap();
        assert_eq!(ids(&selection), vec![2, 5]);
        assert!(device.calls().is_empty());
    }

    #[tokio::test]
    async fn name_tokens_fetch_one_snapshot() {
        let device = pdu();
        let selection = resolve_tokens(&device, &["Lamp", "1"], UnknownNames::Skip)
            .await
            .unwrap();
        assert_eq!(ids(&selection), vec![1, 5]);
        assert_eq!(device.calls(), vec![DeviceCall::Status, DeviceCall::OutletNames]);
    }

    #[tokio::test]
    async fn leading_digit_token_is_rejected_before_any_device_call() {
        let device = pdu();
        let err = resolve_tokens(&device, &["1Server"], UnknownNames::Skip)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidOutletRef { .. }));
        assert!(device.calls().is_empty());
    }

    #[tokio::test]
    async fn device_failure_propagates() {
        let device = pdu().fail_status_with("connection refused");
        let err = resolve_tokens(&device, &["A"], UnknownNames::Skip)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Device(_)));
    }
}
