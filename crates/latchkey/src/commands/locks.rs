//! Read and validation command handlers.

use std::sync::Arc;

use owo_colors::OwoColorize;
use tabled::Tabled;

use latchkey_core::{Controller, CoreError, Lock, SmartlockId, ValidationError};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LockRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Code")]
    code: String,
}

impl From<&Arc<Lock>> for LockRow {
    fn from(l: &Arc<Lock>) -> Self {
        Self {
            id: l.id.to_string(),
            name: l.name.clone(),
            state: l.state.to_string(),
            battery: battery_display(l),
            code: l.raw_state.to_string(),
        }
    }
}

/// Exact percentage when reported, tilde-prefixed estimate otherwise.
pub(crate) fn battery_display(l: &Lock) -> String {
    let pct = match l.battery_charge {
        Some(exact) => format!("{exact}%"),
        None => format!("~{}%", l.battery_percent()),
    };
    if l.battery_critical {
        format!("{pct} (critical)")
    } else {
        pct
    }
}

fn detail(l: &Lock) -> String {
    let mut lines = vec![
        format!("ID:       {}", l.id),
        format!("Name:     {}", l.name),
        format!("State:    {} (code {})", l.state, l.raw_state),
        format!("Battery:  {}", battery_display(l)),
    ];
    if let Some(charging) = l.battery_charging {
        lines.push(format!("Charging: {}", if charging { "yes" } else { "no" }));
    }
    lines.join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

/// `latchkey list` -- poll once and print the snapshot.
pub async fn list(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    controller.refresh().await?;
    let locks = controller.store().all();

    let rendered = output::render_list(
        &global.output,
        locks.as_slice(),
        |l| LockRow::from(l),
        |l| l.id.to_string(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

/// `latchkey status <id>` -- device-scoped fetch, bypasses the snapshot.
pub async fn status(
    controller: &Controller,
    id: SmartlockId,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let lock = controller.fetch_lock(id).await.map_err(|e| {
        if matches!(&e, CoreError::Api(api) if api.is_not_found()) {
            CliError::NotFound { id }
        } else {
            CliError::from(e)
        }
    })?;

    let rendered = output::render_single(&global.output, &lock, detail, |l| l.id.to_string());
    output::print_output(&rendered, global.quiet);
    Ok(())
}

/// `latchkey validate` -- credential probe with the three distinct
/// setup-flow outcomes.
pub async fn validate(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    match controller.validate_account().await {
        Ok(count) => {
            let msg = format!(
                "{} token accepted, {count} smartlock{} found",
                "OK:".green().bold(),
                if count == 1 { "" } else { "s" }
            );
            output::print_output(&msg, global.quiet);
            Ok(())
        }
        Err(ValidationError::NoLocksFound) => Err(CliError::NoDevices),
        Err(ValidationError::InvalidCredential) => Err(CliError::AuthFailed),
        Err(ValidationError::Unknown(e)) => Err(CliError::ConnectionFailed {
            source: CoreError::Api(e),
        }),
    }
}
