//! Command handlers.

pub mod actions;
pub mod locks;
pub mod watch;

use latchkey_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List => locks::list(controller, global).await,
        Command::Status { id } => locks::status(controller, id, global).await,
        Command::Validate => locks::validate(controller, global).await,
        Command::Lock(args) => {
            actions::run(controller, args.id, actions::Kind::Lock, args.no_wait, global).await
        }
        Command::Unlock(args) => {
            actions::run(controller, args.id, actions::Kind::Unlock, args.no_wait, global).await
        }
        Command::Open(args) => {
            actions::run(controller, args.id, actions::Kind::Open, args.no_wait, global).await
        }
        Command::LockNGo { id, unlatch, no_wait } => {
            actions::run(controller, id, actions::Kind::LockNGo { unlatch }, no_wait, global).await
        }
        Command::Watch { .. } => watch::run(controller, global).await,
    }
}
