//! pductl command-line front end.
//!
//! The crate owns argument parsing, configuration, logging and output, and
//! leaves the PDU transport to whoever embeds it: a binary supplies a
//! [`Connect`] implementation and hands it to [`main_with`].
//!
//! ```ignore
//! fn main() -> std::process::ExitCode {
//!     pductl::main_with(my_transport::HttpConnector::default())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod output;

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pductl_config::{CredentialSources, Overrides};
use pductl_core::{
    Action, Connect, Dispatcher, OutletSelection, UnknownNames, resolve_tokens,
};

use crate::cli::{Cli, OutputFormat};
use crate::error::CliError;

/// Parse the process arguments, run one action, and report the result.
pub fn main_with<C: Connect>(connector: C) -> ExitCode {
    let cli = Cli::parse();

    // Setup tracing based on --debug
    init_tracing(cli.global.debug);

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::from)
        .and_then(|runtime| {
            let mut stdout = std::io::stdout();
            runtime.block_on(run(cli, &connector, &mut stdout))
        });

    // Dispatch and handle errors with proper exit codes
    let code = exit_code_for(&result);
    if let Err(err) = result {
        eprintln!("{:?}", miette::Report::new(err));
    }
    code
}

/// Process exit status for the result of [`run`].
pub fn exit_code_for(result: &Result<(), CliError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(err.exit_code()),
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `--debug`.
pub fn init_tracing(debug: bool) {
    let filter = if debug { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run a parsed command line against a device obtained from `connector`.
///
/// The action verb is checked before anything else, so an unknown verb
/// never loads config or touches the device.
pub async fn run<C, W>(cli: Cli, connector: &C, out: &mut W) -> Result<(), CliError>
where
    C: Connect,
    W: Write,
{
    let action = Action::from_verb(&cli.action)?;
    debug!(%action, outlets = ?cli.outlets, "parsed command");

    let Cli {
        outlets, global, ..
    } = cli;

    let config_path = global.config.unwrap_or_else(pductl_config::config_path);
    let config = pductl_config::load_config(&config_path)?;
    let format = output_format(global.output, &config.defaults.output)?;

    let profile = pductl_config::active_profile_name(global.profile.as_deref(), &config);
    let overrides = Overrides {
        hostname: global.hostname,
        username: global.username,
        password: global.password,
        debug: global.debug,
    };
    let sources = CredentialSources {
        keyring: !global.no_keyring,
        prompt: true,
    };
    let pdu_config = pductl_config::resolve(&config, &profile, overrides, sources)?;

    debug!(hostname = %pdu_config.hostname, %profile, "connecting");
    let device = connector.connect(pdu_config).await?;

    let selection = if action.is_switching() && !outlets.is_empty() {
        let unknown = if global.strict {
            UnknownNames::Reject
        } else {
            UnknownNames::Skip
        };
        resolve_tokens(&device, outlets.as_slice(), unknown).await?
    } else {
        if !outlets.is_empty() {
            debug!(%action, "outlets are ignored for read-only actions");
        }
        OutletSelection::All
    };

    let outcome = Dispatcher::new(&device).dispatch(action, &selection).await?;

    if let Some(rendered) = output::render_outcome(format, &outcome)? {
        writeln!(out, "{rendered}")?;
    }
    Ok(())
}

fn output_format(flag: Option<OutputFormat>, configured: &str) -> Result<OutputFormat, CliError> {
    if let Some(format) = flag {
        return Ok(format);
    }
    OutputFormat::from_str(configured, true).map_err(|reason| CliError::Validation {
        field: "defaults.output".into(),
        reason,
    })
}
