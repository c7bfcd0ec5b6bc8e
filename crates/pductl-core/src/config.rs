// ── Runtime connection configuration ──
//
// Describes *how* to reach a PDU. Carries credential data but never touches
// disk: the config crate builds a `PduConfig` and hands it in by value.

use secrecy::SecretString;

/// Connection settings for a single PDU.
#[derive(Debug, Clone)]
pub struct PduConfig {
    /// Hostname or address of the PDU.
    pub hostname: String,
    /// Login name for the device.
    pub username: String,
    /// Login password for the device.
    pub password: SecretString,
    /// Verbose diagnostics requested by the operator.
    pub debug: bool,
}
