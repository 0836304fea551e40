//! Purge command: moderator-gated bulk message deletion.

use async_trait::async_trait;

use crate::client::BotClient;
use crate::error::DaemonError;
use crate::handlers::spec::{CommandSpec, OptionKind};
use crate::handlers::traits::CommandHandler;
use crate::interaction::Interaction;
use crate::permissions::Permissions;

/// Prompts for confirmation before a bulk delete.
///
/// The actual deletion is acknowledged by the paired `purge-confirm`
/// component handler.
pub struct PurgeCommand;

#[async_trait]
impl CommandHandler for PurgeCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("purge", "Bulk-delete recent messages in this channel").with_option(
            "count",
            "How many messages to delete",
            OptionKind::Integer,
            true,
        )
    }

    fn permissions(&self) -> Option<Permissions> {
        Some(Permissions::MANAGE_MESSAGES)
    }

    async fn execute(
        &self,
        client: &BotClient,
        interaction: &Interaction,
    ) -> Result<(), DaemonError> {
        let count = interaction
            .option("count")
            .and_then(|v| v.as_i64())
            .unwrap_or(0);

        client
            .reply(
                interaction,
                &format!("Delete the last {} messages? Press confirm to proceed.", count),
            )
            .await
    }
}
