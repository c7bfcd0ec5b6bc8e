//! In-memory PDU for tests.
//!
//! [`RecordingPdu`] answers `status()`/`outlet_names()` from canned data,
//! applies enable/disable to its own state, and records every call with the
//! (tokio) time it was made so callers can assert ordering and delays.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value, json};
use tokio::time::Instant;

use crate::config::PduConfig;
use crate::device::{Connect, DeviceError, PduDevice};
use crate::model::{DeviceStatus, OutletId, OutletSelection};

/// One recorded device call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Status,
    OutletNames,
    Enable(OutletSelection),
    Disable(OutletSelection),
}

#[derive(Debug, Default)]
struct Inner {
    outlets: Vec<(String, String, Value)>,
    extra: Map<String, Value>,
    calls: Vec<(Instant, DeviceCall)>,
    status_error: Option<String>,
    switch_error: Option<String>,
}

/// Fake device handle. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingPdu {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingPdu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an outlet with its native key, name and raw state value.
    pub fn with_outlet(self, key: &str, name: &str, state: impl Into<Value>) -> Self {
        self.lock()
            .outlets
            .push((key.to_owned(), name.to_owned(), state.into()));
        self
    }

    /// Add a non-outlet field to the status payload.
    pub fn with_status_field(self, key: &str, value: impl Into<Value>) -> Self {
        self.lock().extra.insert(key.to_owned(), value.into());
        self
    }

    /// Make `status()` fail with a connection error.
    pub fn fail_status_with(self, reason: &str) -> Self {
        self.lock().status_error = Some(reason.to_owned());
        self
    }

    /// Make enable/disable fail with a rejection.
    pub fn reject_switching_with(self, message: &str) -> Self {
        self.lock().switch_error = Some(message.to_owned());
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.lock().calls.iter().map(|(_, c)| c.clone()).collect()
    }

    /// Calls made so far with the instant each was issued.
    pub fn timed_calls(&self) -> Vec<(Instant, DeviceCall)> {
        self.lock().calls.clone()
    }

    /// Current state value of the outlet with this native key.
    pub fn state_of(&self, key: &str) -> Option<Value> {
        self.lock()
            .outlets
            .iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, _, state)| state.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: DeviceCall) {
        self.lock().calls.push((Instant::now(), call));
    }

    fn switch(&self, outlets: &OutletSelection, on: bool) -> Result<(), DeviceError> {
        let mut inner = self.lock();
        if let Some(message) = inner.switch_error.clone() {
            return Err(DeviceError::Rejected { message });
        }
        let state = if on { json!("ON") } else { json!("OFF") };
        for (key, _, value) in &mut inner.outlets {
            let selected = match outlets {
                OutletSelection::All => true,
                OutletSelection::Only(ids) => {
                    OutletId::from_native_key(key).is_some_and(|id| ids.contains(id))
                }
            };
            if selected {
                *value = state.clone();
            }
        }
        Ok(())
    }
}

impl PduDevice for RecordingPdu {
    async fn status(&self) -> Result<DeviceStatus, DeviceError> {
        self.record(DeviceCall::Status);
        let inner = self.lock();
        if let Some(reason) = inner.status_error.clone() {
            return Err(DeviceError::Connection {
                host: "fake-pdu".into(),
                reason,
            });
        }
        let states: Map<String, Value> = inner
            .outlets
            .iter()
            .map(|(key, _, state)| (key.clone(), state.clone()))
            .collect();
        let mut fields = Map::new();
        fields.insert(DeviceStatus::OUTLET_STATES.into(), Value::Object(states));
        fields.extend(inner.extra.clone());
        Ok(DeviceStatus::new(fields))
    }

    async fn outlet_names(&self) -> Result<Vec<(String, String)>, DeviceError> {
        self.record(DeviceCall::OutletNames);
        Ok(self
            .lock()
            .outlets
            .iter()
            .map(|(key, name, _)| (key.clone(), name.clone()))
            .collect())
    }

    async fn enable_outlets(&self, outlets: &OutletSelection) -> Result<(), DeviceError> {
        self.record(DeviceCall::Enable(outlets.clone()));
        self.switch(outlets, true)
    }

    async fn disable_outlets(&self, outlets: &OutletSelection) -> Result<(), DeviceError> {
        self.record(DeviceCall::Disable(outlets.clone()));
        self.switch(outlets, false)
    }
}

/// Hands out clones of one [`RecordingPdu`] and remembers the config it saw.
#[derive(Debug, Clone, Default)]
pub struct RecordingConnector {
    pub device: RecordingPdu,
    seen: Arc<Mutex<Vec<PduConfig>>>,
    refuse: Option<String>,
}

impl RecordingConnector {
    pub fn new(device: RecordingPdu) -> Self {
        Self {
            device,
            seen: Arc::default(),
            refuse: None,
        }
    }

    /// Fail every `connect` with an authentication error.
    pub fn refuse_with(mut self, message: &str) -> Self {
        self.refuse = Some(message.to_owned());
        self
    }

    /// Configurations passed to `connect`, in order.
    pub fn connections(&self) -> Vec<PduConfig> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Connect for RecordingConnector {
    type Device = RecordingPdu;

    async fn connect(&self, config: PduConfig) -> Result<RecordingPdu, DeviceError> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config);
        match &self.refuse {
            Some(message) => Err(DeviceError::Authentication {
                message: message.clone(),
            }),
            None => Ok(self.device.clone()),
        }
    }
}
