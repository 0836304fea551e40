//! Interaction dispatch.
//!
//! One dispatch is: classify the interaction, look up the matching
//! descriptor, gate on the member's permissions, invoke the handler. The
//! two drop cases (unknown target, missing permissions) are silent at the
//! user boundary but reported distinctly to the caller and the trace log.

use std::sync::Arc;

use tracing::debug;

use crate::client::BotClient;
use crate::error::DaemonError;
use crate::interaction::{Interaction, InteractionKind};
use crate::permissions::Permissions;

use super::registry::HandlerRegistry;

/// What a dispatch did with an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler ran to completion.
    Handled,
    /// The interaction carried neither a command name nor a custom id.
    Unroutable,
    /// No handler is registered for the carried identifier.
    UnknownTarget,
    /// The invoking member lacks the handler's required permissions.
    PermissionDenied,
}

/// Routes interactions to loaded handlers.
///
/// Stateless across dispatches; the shared registry is read-only.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over a loaded registry.
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher routes against.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Dispatch one inbound interaction.
    ///
    /// The permission check always precedes handler invocation. Handler
    /// failures are not caught here; the surrounding task is responsible
    /// for containing and logging them.
    pub async fn dispatch(
        &self,
        client: &BotClient,
        interaction: &Interaction,
    ) -> Result<DispatchOutcome, DaemonError> {
        match interaction.kind() {
            None => {
                debug!(id = %interaction.id, "Unroutable interaction dropped");
                Ok(DispatchOutcome::Unroutable)
            }
            Some(InteractionKind::Command(name)) => {
                let Some(descriptor) = self.registry.command(name) else {
                    debug!(command = %name, "Unknown command dropped");
                    return Ok(DispatchOutcome::UnknownTarget);
                };

                if !Self::permitted(interaction, descriptor.permissions) {
                    debug!(
                        command = %name,
                        user = %interaction.member.user_id,
                        "Command denied, member lacks required permissions"
                    );
                    return Ok(DispatchOutcome::PermissionDenied);
                }

                descriptor.handler.execute(client, interaction).await?;
                Ok(DispatchOutcome::Handled)
            }
            Some(InteractionKind::Component(id)) => {
                let Some(descriptor) = self.registry.event(id) else {
                    debug!(event = %id, "Unknown component event dropped");
                    return Ok(DispatchOutcome::UnknownTarget);
                };

                if !Self::permitted(interaction, descriptor.permissions) {
                    debug!(
                        event = %id,
                        user = %interaction.member.user_id,
                        "Component event denied, member lacks required permissions"
                    );
                    return Ok(DispatchOutcome::PermissionDenied);
                }

                descriptor.handler.execute(client, interaction).await?;
                Ok(DispatchOutcome::Handled)
            }
        }
    }

    fn permitted(interaction: &Interaction, required: Option<Permissions>) -> bool {
        match required {
            Some(required) => interaction.member.permissions.satisfies(required),
            None => true,
        }
    }
}
