//! Message command handlers.

use hyperadmin_core::AdminClient;

use crate::cli::{GlobalOpts, MessagesArgs, MessagesCommand};
use crate::error::CliError;
use crate::output;
use crate::presenter::TerminalPresenter;

use super::users::MessageRow;
use super::util;

pub async fn handle(
    client: &AdminClient,
    presenter: &TerminalPresenter,
    args: MessagesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MessagesCommand::Delete { url, user } => {
            // With an owning user selected, the client reloads their
            // history after the delete.
            if let Some(user) = &user {
                client.select(user).await?;
            }
            let prompt = format!("Delete message {url}?");
            if !util::confirm(&prompt, "messages delete", global.yes)? {
                return Ok(());
            }
            client.delete_message(&url).await?;

            if user.is_some() {
                let messages = presenter.rendered().messages.unwrap_or_default();
                let out = output::render_list(
                    &global.output,
                    &messages.items,
                    |m| MessageRow::from(m),
                    |m| m.url.clone(),
                )?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }
    }
}
