//! Output formatting: JSON, YAML, table.
//!
//! Only the read-only actions produce output. Switching actions report
//! through the log and print nothing on stdout.

use tabled::{Table, Tabled, settings::Style};

use pductl_core::{DeviceStatus, OutletId, OutletState, Outcome, Snapshot};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ID")]
    id: OutletId,
    #[tabled(rename = "STATE")]
    state: OutletState,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render an outcome, or `None` when there is nothing to print.
pub fn render_outcome(format: OutputFormat, outcome: &Outcome) -> Result<Option<String>, CliError> {
    match outcome {
        Outcome::States(snapshot) => render_states(format, snapshot).map(Some),
        Outcome::Status(status) => render_status(format, status).map(Some),
        Outcome::Enabled(_) | Outcome::Disabled(_) | Outcome::Toggled(_) => Ok(None),
    }
}

/// Outlet name → state. The table also shows each outlet's id.
pub fn render_states(format: OutputFormat, snapshot: &Snapshot) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let rows = snapshot.records().map(|record| StateRow {
                name: record.name.clone(),
                id: record.id,
                state: record.state,
            });
            Ok(render_table(rows))
        }
        _ => render_structured(format, &snapshot.states()),
    }
}

/// The raw status payload, unmodified.
pub fn render_status(format: OutputFormat, status: &DeviceStatus) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let rows = status.as_map().iter().map(|(key, value)| StatusRow {
                key: key.clone(),
                value: value.as_str().map_or_else(|| value.to_string(), str::to_owned),
            });
            Ok(render_table(rows))
        }
        _ => render_structured(format, status),
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_structured<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?.trim_end().to_owned(),
        OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(data)?,
    };
    Ok(rendered)
}
