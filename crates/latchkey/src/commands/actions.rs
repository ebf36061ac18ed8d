//! Action command handlers.
//!
//! Every action goes through the core's action-then-settle protocol. By
//! default the handler then waits out the settle poll and reports the
//! state it landed on; `--no-wait` returns as soon as the vendor accepts.

use std::time::Duration;

use owo_colors::OwoColorize;

use latchkey_core::{Controller, LockState, SmartlockId};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::locks::battery_display;

/// Margin on top of the settle delay so the detached settle poll has
/// landed before we read the snapshot.
const SETTLE_REPORT_MARGIN: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Lock,
    Unlock,
    Open,
    LockNGo { unlatch: bool },
}

impl Kind {
    fn verb(self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::Open => "open",
            Self::LockNGo { .. } => "lock'n'go",
        }
    }
}

pub async fn run(
    controller: &Controller,
    id: SmartlockId,
    kind: Kind,
    no_wait: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match kind {
        Kind::Lock => controller.lock(id).await?,
        Kind::Unlock => controller.unlock(id).await?,
        Kind::Open => controller.open(id).await?,
        Kind::LockNGo { unlatch } => controller.lock_n_go(id, unlatch).await?,
    }

    if no_wait {
        output::print_output(&format!("{} accepted for smartlock {id}", kind.verb()), global.quiet);
        return Ok(());
    }

    if !global.quiet && matches!(global.output, OutputFormat::Table | OutputFormat::Plain) {
        eprintln!(
            "{} accepted, waiting {:.0?} for the lock to settle...",
            kind.verb(),
            controller.config().settle_delay
        );
    }

    tokio::time::sleep(controller.config().settle_delay + SETTLE_REPORT_MARGIN).await;

    // The immediate refresh already populated the snapshot, so the lock
    // is present even if the settle poll failed.
    let lock = controller.get_lock(id)?;
    let rendered = match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            let state = colorize_state(lock.state);
            format!("{} is {state} (battery {})", lock.name, battery_display(&lock))
        }
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_single(
            &global.output,
            lock.as_ref(),
            |_| String::new(),
            |l| l.id.to_string(),
        ),
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn colorize_state(state: LockState) -> String {
    match state {
        LockState::Locked => state.green().to_string(),
        LockState::Unlocked => state.yellow().to_string(),
        LockState::Jammed => state.red().bold().to_string(),
        _ => state.to_string(),
    }
}
