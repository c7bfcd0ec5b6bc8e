//! Configuration for pductl.
//!
//! TOML profiles, credential resolution (flag/env + keyring + plaintext +
//! prompt), and translation to `pductl_core::PduConfig`. The core never sees
//! these types; it only receives the finished `PduConfig`.

use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use pductl_core::PduConfig;

const KEYRING_SERVICE: &str = "pductl";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no {field} configured (use --{flag}, set {env}, or add it to profile '{profile}')")]
    Missing {
        field: &'static str,
        flag: &'static str,
        env: &'static str,
        profile: String,
    },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is requested.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named PDU profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "json".into()
}

/// A named PDU profile. Every field can be overridden from the command line.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Hostname or address of the PDU.
    pub hostname: Option<String>,

    /// Login name.
    pub username: Option<String>,

    /// Password (plaintext — prefer keyring or `password_env`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "pductl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pductl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from defaults, the TOML file at `path`, and `PDU_*` env.
///
/// A missing file is not an error. Nested keys use a double underscore,
/// e.g. `PDU_DEFAULTS__OUTPUT=yaml`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PDU_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Profile resolution ──────────────────────────────────────────────

/// Resolve the active profile name: request → config default → `"default"`.
pub fn active_profile_name(requested: Option<&str>, config: &Config) -> String {
    requested
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Values supplied on the command line (or through their env fallbacks).
#[derive(Debug, Default)]
pub struct Overrides {
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub debug: bool,
}

/// Where a missing password may still come from.
#[derive(Debug, Clone, Copy)]
pub struct CredentialSources {
    /// Consult the system keyring.
    pub keyring: bool,
    /// Ask on the terminal as a last resort (only if stdin is a TTY).
    pub prompt: bool,
}

impl Default for CredentialSources {
    fn default() -> Self {
        Self {
            keyring: true,
            prompt: true,
        }
    }
}

/// Merge overrides with the named profile into a `PduConfig`.
///
/// This is the single boundary where config types cross into core types.
/// A missing profile is fine as long as the overrides cover every field.
pub fn resolve(
    config: &Config,
    profile_name: &str,
    overrides: Overrides,
    sources: CredentialSources,
) -> Result<PduConfig, ConfigError> {
    let fallback = Profile::default();
    let profile = config.profiles.get(profile_name).unwrap_or(&fallback);

    // 1. Hostname (flag > env > profile)
    let hostname = overrides
        .hostname
        .or_else(|| profile.hostname.clone())
        .ok_or_else(|| ConfigError::Missing {
            field: "hostname",
            flag: "hostname",
            env: "PDU_HOSTNAME",
            profile: profile_name.into(),
        })?;

    // 2. Username (flag > env > profile)
    let username = overrides
        .username
        .or_else(|| profile.username.clone())
        .ok_or_else(|| ConfigError::Missing {
            field: "username",
            flag: "username",
            env: "PDU_USERNAME",
            profile: profile_name.into(),
        })?;

    // 3. Password
    let password = match overrides.password {
        Some(password) => password,
        None => resolve_password(profile, profile_name, &hostname, &username, sources)?,
    };

    Ok(PduConfig {
        hostname,
        username,
        password,
        debug: overrides.debug,
    })
}

// ── Credential helpers ──────────────────────────────────────────────

/// Resolve a password from the credential chain (no CLI flag step).
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    hostname: &str,
    username: &str,
    sources: CredentialSources,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if sources.keyring {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
            if let Ok(secret) = entry.get_password() {
                return Ok(SecretString::from(secret));
            }
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    // 4. Interactive prompt
    if sources.prompt && std::io::stdin().is_terminal() {
        let pw = rpassword::prompt_password(format!("Password for {username}@{hostname}: "))?;
        return Ok(SecretString::from(pw));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}
