// ── Outlet domain types ──

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Numeric outlet id as handed out by the device. Never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutletId(u32);

impl OutletId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Extract the id from a device-native key such as `outlet3` or `3`.
    ///
    /// The id is the run of ASCII digits at the end of the key.
    pub fn from_native_key(key: &str) -> Option<Self> {
        let prefix_len = key.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        key.get(prefix_len..)
            .filter(|digits| !digits.is_empty())
            .and_then(|digits| digits.parse().ok())
            .map(Self)
    }
}

impl From<u32> for OutletId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for OutletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-supplied outlet token, classified once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutletRef {
    Numeric(OutletId),
    Name(String),
}

impl OutletRef {
    /// Classify a raw token.
    ///
    /// Anything starting with an ASCII digit is numeric, so an outlet named
    /// `1Server` can never be addressed by name. Such a token is rejected
    /// as [`CoreError::InvalidOutletRef`] instead of being looked up.
    pub fn classify(token: &str) -> Result<Self, CoreError> {
        if !token.starts_with(|c: char| c.is_ascii_digit()) {
            return Ok(Self::Name(token.to_owned()));
        }
        token
            .parse::<u32>()
            .map(|id| Self::Numeric(OutletId(id)))
            .map_err(|_| CoreError::InvalidOutletRef {
                token: token.to_owned(),
            })
    }
}

impl From<OutletId> for OutletRef {
    fn from(id: OutletId) -> Self {
        Self::Numeric(id)
    }
}

impl fmt::Display for OutletRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Power state of a single outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum OutletState {
    On,
    Off,
}

impl OutletState {
    /// Interpret a state value from the device's status payload.
    ///
    /// Accepts `"ON"`/`"OFF"` in any case, booleans, and `1`/`0`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if s.eq_ignore_ascii_case("on") => Some(Self::On),
            Value::String(s) if s.eq_ignore_ascii_case("off") => Some(Self::Off),
            Value::Bool(on) => Some(if *on { Self::On } else { Self::Off }),
            Value::Number(n) => match n.as_u64() {
                Some(1) => Some(Self::On),
                Some(0) => Some(Self::Off),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Canonical outlet record built from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutletRecord {
    pub id: OutletId,
    pub name: String,
    pub state: OutletState,
}

/// Unique outlet ids, always iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutletIdSet(BTreeSet<OutletId>);

impl OutletIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: OutletId) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: OutletId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OutletId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<OutletId> for OutletIdSet {
    fn from_iter<I: IntoIterator<Item = OutletId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OutletIdSet {
    type Item = OutletId;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, OutletId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl fmt::Display for OutletIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}")?;
        }
        f.write_str("}")
    }
}

/// Which outlets a switching action addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutletSelection {
    /// Every outlet the device currently reports.
    All,
    /// Exactly these ids. May be empty when nothing resolved.
    Only(OutletIdSet),
}

impl OutletSelection {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The explicit id set, or `None` for [`OutletSelection::All`].
    pub fn ids(&self) -> Option<&OutletIdSet> {
        match self {
            Self::All => None,
            Self::Only(ids) => Some(ids),
        }
    }
}

impl From<OutletIdSet> for OutletSelection {
    fn from(ids: OutletIdSet) -> Self {
        Self::Only(ids)
    }
}

impl fmt::Display for OutletSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all outlets"),
            Self::Only(ids) => write!(f, "{ids}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn native_key_takes_trailing_digits() {
        assert_eq!(OutletId::from_native_key("outlet3"), Some(OutletId(3)));
        assert_eq!(OutletId::from_native_key("5"), Some(OutletId(5)));
        assert_eq!(OutletId::from_native_key("outlet12"), Some(OutletId(12)));
        assert_eq!(OutletId::from_native_key("outlet"), None);
        assert_eq!(OutletId::from_native_key(""), None);
    }

    #[test]
    fn classify_digit_string_as_numeric() {
        assert_eq!(
            OutletRef::classify("3").unwrap(),
            OutletRef::Numeric(OutletId(3))
        );
        assert_eq!(
            OutletRef::classify("007").unwrap(),
            OutletRef::Numeric(OutletId(7))
        );
    }

    #[test]
    fn classify_name() {
        assert_eq!(
            OutletRef::classify("Router").unwrap(),
            OutletRef::Name("Router".into())
        );
        assert_eq!(
            OutletRef::classify("server-1").unwrap(),
            OutletRef::Name("server-1".into())
        );
    }

    #[test]
    fn classify_leading_digit_name_is_not_a_name() {
        let err = OutletRef::classify("1Server").unwrap_err();
        assert!(matches!(err, CoreError::InvalidOutletRef { token } if token == "1Server"));
    }

    #[test]
    fn outlet_state_from_device_values() {
        assert_eq!(OutletState::from_value(&json!("ON")), Some(OutletState::On));
        assert_eq!(OutletState::from_value(&json!("off")), Some(OutletState::Off));
        assert_eq!(OutletState::from_value(&json!(true)), Some(OutletState::On));
        assert_eq!(OutletState::from_value(&json!(0)), Some(OutletState::Off));
        assert_eq!(OutletState::from_value(&json!("cycling")), None);
        assert_eq!(OutletState::from_value(&json!(7)), None);
    }

    #[test]
    fn outlet_state_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&OutletState::On).unwrap(), "\"ON\"");
        assert_eq!(OutletState::Off.to_string(), "OFF");
    }

    #[test]
    fn id_set_dedups_and_sorts() {
        let set: OutletIdSet = [5, 2, 5, 1].into_iter().map(OutletId::new).collect();
        assert_eq!(set.iter().map(OutletId::get).collect::<Vec<_>>(), vec![1, 2, 5]);
        assert_eq!(set.to_string(), "{1, 2, 5}");
    }

    #[test]
    fn selection_all_differs_from_empty() {
        let empty = OutletSelection::Only(OutletIdSet::new());
        assert_ne!(empty, OutletSelection::All);
        assert!(OutletSelection::All.ids().is_none());
        assert!(empty.ids().unwrap().is_empty());
    }
}
