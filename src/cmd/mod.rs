//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`validate`], [`webhook_test`] (the `test`
//! command), or [`health`]. Each handler lives in its own submodule.

pub mod health;
pub mod run;
pub mod validate;
pub mod webhook_test;

use crate::cli::{Cli, Commands};
use crate::error::RelayError;

pub async fn dispatch(cli: Cli) -> Result<(), RelayError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Test(ref args)) => webhook_test::execute(args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  webhook-relay v{version}: chat webhook relay\n\n  \
         No command provided. To get started:\n\n    \
         webhook-relay validate             Check ./config.yml\n    \
         webhook-relay run                  Start the relay on :8080\n    \
         webhook-relay test                 Send a test message to every webhook\n    \
         webhook-relay --help               See all commands and options\n"
    );
}
