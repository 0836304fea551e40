//! Remote command registration.
//!
//! Pushes the registry's serialized command list to the platform, per guild
//! or globally, and clears either scope by publishing an empty set. These
//! are one-shot administrative operations, not part of the dispatch path.

use std::sync::Arc;

use tracing::{info, warn};

use crate::client::BotClient;
use crate::error::DaemonError;
use crate::handlers::{CommandSpec, HandlerRegistry};
use crate::LogSink;

/// Publishes and clears command sets against the platform API.
pub struct CommandRegistrar {
    client: Arc<BotClient>,
    sink: Option<LogSink>,
}

impl CommandRegistrar {
    /// Create a registrar over an authenticated client.
    pub fn new(client: Arc<BotClient>, sink: Option<LogSink>) -> Self {
        Self { client, sink }
    }

    /// Publish the full command list to every guild the bot belongs to.
    ///
    /// Guild publishes are independent: a failure for one guild is warned
    /// and skipped, never blocking the remaining guilds. Only the guild
    /// enumeration itself is fatal.
    pub async fn publish_guild_commands(
        &self,
        registry: &HandlerRegistry,
    ) -> Result<(), DaemonError> {
        self.put_per_guild(registry.command_payloads(), "Refreshed")
            .await
    }

    /// Publish the full command list at the global scope.
    pub async fn publish_global_commands(
        &self,
        registry: &HandlerRegistry,
    ) -> Result<(), DaemonError> {
        self.client
            .put_commands(&self.global_path(), registry.command_payloads())
            .await?;

        info!(
            commands = registry.command_payloads().len(),
            "Refreshed commands globally"
        );
        self.confirm("Refreshed commands globally");
        Ok(())
    }

    /// Remove all registered commands from every guild.
    pub async fn clear_guild_commands(&self) -> Result<(), DaemonError> {
        self.put_per_guild(&[], "Removed all").await
    }

    /// Remove all globally-registered commands.
    pub async fn clear_global_commands(&self) -> Result<(), DaemonError> {
        self.client.put_commands(&self.global_path(), &[]).await?;

        info!("Removed all commands globally");
        self.confirm("Removed all commands globally");
        Ok(())
    }

    async fn put_per_guild(
        &self,
        payloads: &[CommandSpec],
        verb: &str,
    ) -> Result<(), DaemonError> {
        let guilds = self.client.guilds().await?;

        for guild in guilds {
            let path = self.guild_path(&guild.id);
            match self.client.put_commands(&path, payloads).await {
                Ok(()) => {
                    info!(guild = %guild.name, commands = payloads.len(), "Guild command set updated");
                    self.confirm(&format!("{} commands for \"{}\"", verb, guild.name));
                }
                Err(e) => {
                    warn!(guild = %guild.name, error = %e, "Guild command update failed, continuing");
                }
            }
        }

        Ok(())
    }

    fn guild_path(&self, guild_id: &str) -> String {
        format!(
            "/applications/{}/guilds/{}/commands",
            self.client.application_id(),
            guild_id
        )
    }

    fn global_path(&self) -> String {
        format!("/applications/{}/commands", self.client.application_id())
    }

    fn confirm(&self, message: &str) {
        if let Some(sink) = &self.sink {
            sink(message);
        }
    }
}
