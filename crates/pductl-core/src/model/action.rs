// ── Action verbs ──

use std::str::FromStr;

use strum::{Display, EnumMessage, EnumString, VariantArray};

use crate::error::CoreError;

/// What to do with the selected outlets.
///
/// Parsed from the operator's verb through a fixed, case-sensitive synonym
/// table. `to_string` is the canonical spelling used for display.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumMessage,
    EnumString,
    VariantArray,
)]
pub enum Action {
    #[strum(to_string = "on", serialize = "o", serialize = "enable", serialize = "e")]
    Enable,
    #[strum(to_string = "off", serialize = "f", serialize = "disable", serialize = "d")]
    Disable,
    #[strum(to_string = "toggle", serialize = "t")]
    Toggle,
    #[strum(to_string = "status", serialize = "st", serialize = "s")]
    Status,
    #[strum(to_string = "states")]
    States,
}

impl Action {
    /// Parse an operator verb, failing with [`CoreError::UnrecognizedAction`].
    pub fn from_verb(verb: &str) -> Result<Self, CoreError> {
        Self::from_str(verb).map_err(|_| CoreError::UnrecognizedAction {
            verb: verb.to_owned(),
        })
    }

    /// Every accepted spelling, the canonical one included.
    pub fn aliases(self) -> &'static [&'static str] {
        self.get_serializations()
    }

    /// Whether this action changes outlet power.
    pub fn is_switching(self) -> bool {
        matches!(self, Self::Enable | Self::Disable | Self::Toggle)
    }
}
