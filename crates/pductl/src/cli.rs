//! Clap derive structures for the `pductl` CLI.
//!
//! Kept free of crate-internal imports so `build.rs` can include it
//! directly to render the man page.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use secrecy::SecretString;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pductl -- switch PDU outlets on, off, or through a power cycle
#[derive(Debug, Parser)]
#[command(
    name = "pductl",
    version,
    about = "Control the outlets of a network-attached PDU",
    long_about = "Enable, disable, toggle or query outlets on a network-attached \
        power distribution unit.\n\n\
        Outlets are given by name or numeric id. Omitting them addresses every \
        outlet the PDU reports.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Action to perform: on|o|enable|e, off|f|disable|d, toggle|t, states, status|st|s
    #[arg(value_name = "ACTION")]
    pub action: String,

    /// Outlet names or ids (default: all outlets)
    #[arg(value_name = "OUTLETS")]
    pub outlets: Vec<String>,

    #[command(flatten)]
    pub global: GlobalOpts,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// PDU hostname or address (overrides profile)
    #[arg(long, short = 'H', short_alias = 's', env = "PDU_HOSTNAME")]
    pub hostname: Option<String>,

    /// PDU username (overrides profile)
    #[arg(long, short = 'u', env = "PDU_USERNAME")]
    pub username: Option<String>,

    /// PDU password (overrides profile and keyring)
    #[arg(long, short = 'p', env = "PDU_PASSWORD", hide_env_values = true)]
    pub password: Option<SecretString>,

    /// Enable debug logging
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Configuration profile to use
    #[arg(long, env = "PDU_PROFILE")]
    pub profile: Option<String>,

    /// Path to the configuration file
    #[arg(long, env = "PDU_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format for `states` and `status` (default: from config, else json)
    #[arg(long, short = 'o', env = "PDU_OUTPUT")]
    pub output: Option<OutputFormat>,

    /// Fail when an outlet name matches nothing instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Never read the password from the system keyring
    #[arg(long, env = "PDU_NO_KEYRING")]
    pub no_keyring: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Pretty table
    Table,
}
