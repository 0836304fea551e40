//! Handler trait definitions.
//!
//! Handlers come in exactly two shapes: slash commands (routed by name,
//! remotely registered) and component events (routed by custom id). The
//! closed [`HandlerDefinition`] pair is what the loader consumes; there is
//! no open-ended "has an execute property" probing.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::BotClient;
use crate::error::DaemonError;
use crate::interaction::Interaction;
use crate::permissions::Permissions;

use super::spec::CommandSpec;

/// Core trait for slash-command handlers.
///
/// # Example
///
/// ```ignore
/// pub struct PingCommand;
///
/// #[async_trait]
/// impl CommandHandler for PingCommand {
///     fn spec(&self) -> CommandSpec {
///         CommandSpec::new("ping", "Health check")
///     }
///
///     async fn execute(
///         &self,
///         client: &BotClient,
///         interaction: &Interaction,
///     ) -> Result<(), DaemonError> {
///         client.reply(interaction, "pong").await
///     }
/// }
/// ```
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// The command's registration metadata. The spec's `name` is the
    /// registry key.
    fn spec(&self) -> CommandSpec;

    /// Permissions the invoking member must hold, if any.
    ///
    /// `None` means unrestricted. Captured once at load time.
    fn permissions(&self) -> Option<Permissions> {
        None
    }

    /// Optional one-shot initialization hook, awaited by the loader before
    /// the handler is inserted into the registry. A failure here aborts
    /// startup.
    async fn load(&self, _client: &BotClient) -> Result<(), DaemonError> {
        Ok(())
    }

    /// Handle one command interaction.
    async fn execute(
        &self,
        client: &BotClient,
        interaction: &Interaction,
    ) -> Result<(), DaemonError>;
}

/// Core trait for component event handlers.
///
/// Identical lifecycle to [`CommandHandler`], but routed by an opaque
/// custom id and never registered remotely.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// The custom id this handler is keyed by.
    fn id(&self) -> &str;

    /// Permissions the invoking member must hold, if any.
    fn permissions(&self) -> Option<Permissions> {
        None
    }

    /// Optional one-shot initialization hook; see [`CommandHandler::load`].
    async fn load(&self, _client: &BotClient) -> Result<(), DaemonError> {
        Ok(())
    }

    /// Handle one component interaction.
    async fn execute(
        &self,
        client: &BotClient,
        interaction: &Interaction,
    ) -> Result<(), DaemonError>;
}

/// One entry in the handler manifest fed to the loader.
#[derive(Clone)]
pub enum HandlerDefinition {
    /// A slash-command handler.
    Command(Arc<dyn CommandHandler>),
    /// A component event handler.
    Event(Arc<dyn EventHandler>),
}

impl HandlerDefinition {
    /// The identifier this definition will be keyed by, for diagnostics.
    pub fn key(&self) -> String {
        match self {
            Self::Command(handler) => handler.spec().name,
            Self::Event(handler) => handler.id().to_string(),
        }
    }
}
