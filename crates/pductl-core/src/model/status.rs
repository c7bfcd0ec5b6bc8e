// ── Device status and outlet snapshots ──

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::outlet::{OutletId, OutletRecord, OutletState};
use crate::error::CoreError;

/// Raw status payload as reported by the device.
///
/// Kept as an untyped JSON object so STATUS can emit it unmodified. Only
/// `outlet_states` is interpreted, and only when a snapshot is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceStatus(Map<String, Value>);

impl DeviceStatus {
    pub const OUTLET_STATES: &'static str = "outlet_states";

    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Per-outlet states keyed by id.
    pub fn outlet_states(&self) -> Result<BTreeMap<OutletId, OutletState>, CoreError> {
        let states = self
            .get(Self::OUTLET_STATES)
            .and_then(Value::as_object)
            .ok_or_else(|| CoreError::malformed("missing 'outlet_states' object"))?;

        states
            .iter()
            .map(|(key, value)| {
                let id = OutletId::from_native_key(key)
                    .ok_or_else(|| CoreError::malformed(format!("unrecognized outlet key '{key}'")))?;
                let state = OutletState::from_value(value).ok_or_else(|| {
                    CoreError::malformed(format!("unrecognized state {value} for outlet '{key}'"))
                })?;
                Ok((id, state))
            })
            .collect()
    }
}

impl TryFrom<Value> for DeviceStatus {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(CoreError::malformed(format!(
                "status must be a JSON object, got {other}"
            ))),
        }
    }
}

/// Point-in-time view of every named outlet, keyed by name.
///
/// Preserves the order the device listed the names in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(IndexMap<String, OutletRecord>);

impl Snapshot {
    /// Join the status payload with the `(native_key, name)` list.
    ///
    /// A later duplicate name replaces the earlier one, so names stay unique.
    pub fn from_parts(status: &DeviceStatus, names: &[(String, String)]) -> Result<Self, CoreError> {
        let states = status.outlet_states()?;
        let mut outlets = IndexMap::with_capacity(names.len());

        for (key, name) in names {
            let id = OutletId::from_native_key(key)
                .ok_or_else(|| CoreError::malformed(format!("unrecognized outlet key '{key}'")))?;
            let state = *states
                .get(&id)
                .ok_or_else(|| CoreError::malformed(format!("no state reported for outlet {id}")))?;
            outlets.insert(
                name.clone(),
                OutletRecord {
                    id,
                    name: name.clone(),
                    state,
                },
            );
        }

        Ok(Self(outlets))
    }

    /// Exact, case-sensitive name lookup.
    pub fn get(&self, name: &str) -> Option<&OutletRecord> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &OutletRecord> {
        self.0.values()
    }

    /// Name → state, in device order.
    pub fn states(&self) -> IndexMap<String, OutletState> {
        self.0
            .iter()
            .map(|(name, record)| (name.clone(), record.state))
            .collect()
    }
}
