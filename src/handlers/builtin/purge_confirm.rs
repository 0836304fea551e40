//! Confirmation button for the purge command.

use async_trait::async_trait;

use crate::client::BotClient;
use crate::error::DaemonError;
use crate::handlers::traits::EventHandler;
use crate::interaction::Interaction;
use crate::permissions::Permissions;

/// Acknowledges a confirmed purge.
///
/// Gated on the same permission as the command that produced the button.
pub struct PurgeConfirm;

#[async_trait]
impl EventHandler for PurgeConfirm {
    fn id(&self) -> &str {
        "purge-confirm"
    }

    fn permissions(&self) -> Option<Permissions> {
        Some(Permissions::MANAGE_MESSAGES)
    }

    async fn execute(
        &self,
        client: &BotClient,
        interaction: &Interaction,
    ) -> Result<(), DaemonError> {
        client.reply(interaction, "Purge confirmed.").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_id_and_gate() {
        assert_eq!(PurgeConfirm.id(), "purge-confirm");
        assert_eq!(
            PurgeConfirm.permissions(),
            Some(Permissions::MANAGE_MESSAGES)
        );
    }
}
