//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use pductl_config::ConfigError;
use pductl_core::{CoreError, DeviceError};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const AUTH: u8 = 3;
    pub const NOT_FOUND: u8 = 4;
    pub const CONNECTION: u8 = 7;
    pub const TIMEOUT: u8 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Usage ────────────────────────────────────────────────────────
    #[error("Unknown action: {verb}")]
    #[diagnostic(
        code(pductl::unknown_action),
        help(
            "Valid actions: on|o|enable|e, off|f|disable|d, toggle|t, states, status|st|s"
        )
    )]
    UnrecognizedAction { verb: String },

    #[error("'{token}' is not a valid outlet id")]
    #[diagnostic(
        code(pductl::invalid_outlet),
        help(
            "Tokens starting with a digit are read as outlet ids, so outlets whose \
             names start with a digit must be addressed by id.\n\
             Run: pductl states --output table"
        )
    )]
    InvalidOutlet { token: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pductl::validation))]
    Validation { field: String, reason: String },

    // ── Outlets ──────────────────────────────────────────────────────
    #[error("No outlet named '{name}'")]
    #[diagnostic(
        code(pductl::outlet_not_found),
        help("Names are case-sensitive. Run: pductl states to list outlet names")
    )]
    OutletNotFound { name: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Could not connect to PDU at {host}")]
    #[diagnostic(
        code(pductl::connection_failed),
        help("Check that the PDU is powered and reachable.\nReason: {reason}")
    )]
    ConnectionFailed { host: String, reason: String },

    #[error("PDU request timed out after {seconds}s")]
    #[diagnostic(code(pductl::timeout))]
    Timeout { seconds: u64 },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(pductl::auth_failed),
        help("Verify --username/--password, PDU_USERNAME/PDU_PASSWORD, or the profile credentials.")
    )]
    AuthFailed { message: String },

    #[error("PDU rejected the request: {message}")]
    #[diagnostic(code(pductl::rejected))]
    Rejected { message: String },

    #[error("Unexpected response from PDU: {message}")]
    #[diagnostic(code(pductl::protocol))]
    Protocol { message: String },

    #[error("Malformed PDU status: {message}")]
    #[diagnostic(code(pductl::malformed_status))]
    MalformedStatus { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No {field} configured")]
    #[diagnostic(
        code(pductl::missing_setting),
        help("Pass --{flag}, set {env}, or add `{field}` to profile '{profile}'.")
    )]
    MissingSetting {
        field: &'static str,
        flag: &'static str,
        env: &'static str,
        profile: String,
    },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(pductl::no_credentials),
        help(
            "Pass --password or set PDU_PASSWORD, store it in the keyring under \
             service 'pductl' as '{profile}/password', or set `password_env` in the profile."
        )
    )]
    NoCredentials { profile: String },

    #[error(transparent)]
    #[diagnostic(code(pductl::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::UnrecognizedAction { .. }
            | Self::InvalidOutlet { .. }
            | Self::Validation { .. } => exit_code::USAGE,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::OutletNotFound { .. } => exit_code::NOT_FOUND,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnrecognizedAction { verb } => CliError::UnrecognizedAction { verb },
            CoreError::InvalidOutletRef { token } => CliError::InvalidOutlet { token },
            CoreError::OutletNameNotFound { name } => CliError::OutletNotFound { name },
            CoreError::MalformedStatus { message } => CliError::MalformedStatus { message },
            CoreError::Device(err) => err.into(),
        }
    }
}

impl From<DeviceError> for CliError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::Connection { host, reason } => CliError::ConnectionFailed { host, reason },
            DeviceError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            DeviceError::Authentication { message } => CliError::AuthFailed { message },
            DeviceError::Rejected { message } => CliError::Rejected { message },
            DeviceError::Protocol { message } => CliError::Protocol { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing {
                field,
                flag,
                env,
                profile,
            } => CliError::MissingSetting {
                field,
                flag,
                env,
                profile,
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Io(err) => CliError::Io(err),
        }
    }
}
