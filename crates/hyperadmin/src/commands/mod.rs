//! Command dispatch: bridges CLI args -> client intents -> output formatting.

pub mod config_cmd;
pub mod messages;
pub mod users;
pub mod util;

use hyperadmin_core::AdminClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::presenter::TerminalPresenter;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &AdminClient,
    presenter: &TerminalPresenter,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => users::handle(client, presenter, args, global).await,
        Command::Messages(args) => messages::handle(client, presenter, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
