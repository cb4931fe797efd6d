//! Command dispatch: bridges CLI args -> core coordinator -> output formatting.

pub mod config_cmd;
pub mod login;
pub mod readings;
pub mod recommendations;
pub mod status;
pub mod util;
pub mod watch;

use sutro_core::ConfigEntry;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a token-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    entry: ConfigEntry,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::Watch(args) = cmd {
        return watch::handle(entry, args, global).await;
    }

    let session = util::Session::open(entry).await?;
    let result = match cmd {
        Command::Status => status::handle(&session, global),
        Command::Readings => readings::handle(&session, global),
        Command::Recommendations(args) => recommendations::handle(&session, args, global).await,
        // Handled before dispatch
        Command::Watch(_) | Command::Login(_) | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    };
    session.close().await;
    result
}
