//! Handler registry: the two routing indices and the serialized command list.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::permissions::Permissions;

use super::spec::CommandSpec;
use super::traits::{CommandHandler, EventHandler};

/// A loaded, validated slash-command handler.
#[derive(Clone)]
pub struct CommandDescriptor {
    /// The handler implementation.
    pub handler: Arc<dyn CommandHandler>,
    /// Required permissions, captured once at load time.
    pub permissions: Option<Permissions>,
    /// The registration metadata this descriptor was loaded with.
    pub spec: CommandSpec,
}

/// A loaded, validated component event handler.
#[derive(Clone)]
pub struct EventDescriptor {
    /// The handler implementation.
    pub handler: Arc<dyn EventHandler>,
    /// Required permissions, captured once at load time.
    pub permissions: Option<Permissions>,
}

/// Registry of all loaded handlers.
///
/// Constructed once by the loader and shared read-only (`Arc`) with the
/// dispatcher; it exposes no mutation path after load completes.
#[derive(Default)]
pub struct HandlerRegistry {
    commands: HashMap<String, CommandDescriptor>,
    events: HashMap<String, EventDescriptor>,
    payloads: Vec<CommandSpec>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("commands", &self.commands.len())
            .field("events", &self.events.len())
            .field("payloads", &self.payloads.len())
            .finish()
    }
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command descriptor keyed by its spec name.
    ///
    /// The last-loaded definition for a name wins; the previous descriptor
    /// and its payload entry are replaced, not duplicated.
    pub(crate) fn insert_command(&mut self, descriptor: CommandDescriptor) {
        let name = descriptor.spec.name.clone();
        let spec = descriptor.spec.clone();
        debug!(command = %name, "Registering command handler");

        if self.commands.insert(name.clone(), descriptor).is_some() {
            warn!(command = %name, "Duplicate command definition, last one wins");
            self.payloads.retain(|existing| existing.name != name);
        }

        self.payloads.push(spec);
    }

    /// Insert an event descriptor keyed by `id`.
    pub(crate) fn insert_event(&mut self, id: String, descriptor: EventDescriptor) {
        debug!(event = %id, "Registering event handler");

        if self.events.insert(id.clone(), descriptor).is_some() {
            warn!(event = %id, "Duplicate event definition, last one wins");
        }
    }

    /// Look up a command descriptor by name.
    pub fn command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    /// Look up an event descriptor by custom id.
    pub fn event(&self, id: &str) -> Option<&EventDescriptor> {
        self.events.get(id)
    }

    /// The serialized command list, in load order, for remote registration.
    pub fn command_payloads(&self) -> &[CommandSpec] {
        &self.payloads
    }

    /// Number of loaded commands.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Number of loaded event handlers.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BotClient;
    use crate::error::DaemonError;
    use crate::interaction::Interaction;
    use async_trait::async_trait;

    struct StubCommand {
        spec: CommandSpec,
    }

    #[async_trait]
    impl CommandHandler for StubCommand {
        fn spec(&self) -> CommandSpec {
            self.spec.clone()
        }

        async fn execute(
            &self,
            _client: &BotClient,
            _interaction: &Interaction,
        ) -> Result<(), DaemonError> {
            Ok(())
        }
    }

    fn descriptor(name: &str, description: &str) -> CommandDescriptor {
        let spec = CommandSpec::new(name, description);
        CommandDescriptor {
            handler: Arc::new(StubCommand { spec: spec.clone() }),
            permissions: None,
            spec,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = HandlerRegistry::new();
        registry.insert_command(descriptor("ping", "Health check"));

        assert!(registry.command("ping").is_some());
        assert!(registry.command("pong").is_none());
        assert_eq!(registry.command_count(), 1);
        assert_eq!(registry.command_payloads().len(), 1);
    }

    #[test]
    fn test_overwrite_replaces_payload_entry() {
        let mut registry = HandlerRegistry::new();
        registry.insert_command(descriptor("ping", "first"));
        registry.insert_command(descriptor("ping", "second"));

        assert_eq!(registry.command_count(), 1);
        assert_eq!(registry.command_payloads().len(), 1);
        assert_eq!(registry.command_payloads()[0].description, "second");
        assert_eq!(registry.command("ping").unwrap().spec.description, "second");
    }

    #[test]
    fn test_empty_registry() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.command_payloads().is_empty());
        assert_eq!(registry.event_count(), 0);
    }
}
