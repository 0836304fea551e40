//! Ping command for liveness checking.

use async_trait::async_trait;

use crate::client::BotClient;
use crate::error::DaemonError;
use crate::handlers::spec::CommandSpec;
use crate::handlers::traits::CommandHandler;
use crate::interaction::Interaction;

/// Simple ping command that replies with a pong message.
///
/// Unrestricted; useful for verifying the dispatch path end to end.
pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("ping", "Check that the bot is alive")
    }

    async fn execute(
        &self,
        client: &BotClient,
        interaction: &Interaction,
    ) -> Result<(), DaemonError> {
        client.reply(interaction, "pong").await
    }
}
