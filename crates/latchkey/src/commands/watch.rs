//! Continuous watch: connect, subscribe, print snapshot changes until
//! interrupted.

use chrono::Local;
use owo_colors::OwoColorize;

use latchkey_core::{Controller, Lock};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn run(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    controller.connect().await?;

    let mut snapshots = controller.store().subscribe();
    let mut availability = controller.store().subscribe_availability();

    // Initial state, then deltas. Clone the Arc out so the watch borrow
    // guard is not held while printing.
    let initial = snapshots.borrow_and_update().clone();
    print_snapshot(&initial, global);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = snapshots.borrow_and_update().clone();
                print_snapshot(&snap, global);
            }
            changed = availability.changed() => {
                if changed.is_err() {
                    break;
                }
                if !*availability.borrow_and_update() {
                    eprintln!("{} poll failed, showing last known state", "warning:".yellow());
                }
            }
        }
    }

    controller.shutdown().await;
    Ok(())
}

fn print_snapshot(locks: &[std::sync::Arc<Lock>], global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    let stamp = Local::now().format("%H:%M:%S");
    for lock in locks {
        println!(
            "{stamp}  {:<24} {:<10} battery {}",
            lock.name,
            lock.state.to_string(),
            super::locks::battery_display(lock)
        );
    }
}
