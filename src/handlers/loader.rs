//! Handler loading and validation.
//!
//! The loader consumes an explicit manifest of handler definitions, runs
//! each through the validation rules and its optional `load` hook, and
//! produces the registry. Any failure is fatal: the caller must not serve
//! interactions from a partially-loaded registry.

use tracing::info;

use crate::client::BotClient;
use crate::error::{DaemonError, HandlerErrorKind, ValidationErrorKind};
use crate::validation::{
    validate_command_name, validate_custom_id, validate_option_name, MAX_COMMAND_OPTIONS,
};
use crate::LogSink;

use super::registry::{CommandDescriptor, EventDescriptor, HandlerRegistry};
use super::spec::CommandSpec;
use super::traits::HandlerDefinition;

/// Validate one command spec against the platform rules.
fn validate_spec(spec: &CommandSpec) -> Result<(), DaemonError> {
    validate_command_name(&spec.name)?;

    if spec.description.is_empty() {
        return Err(DaemonError::Validation {
            kind: ValidationErrorKind::MissingDescription {
                name: spec.name.clone(),
            },
        });
    }

    if spec.options.len() > MAX_COMMAND_OPTIONS {
        return Err(DaemonError::Validation {
            kind: ValidationErrorKind::TooManyOptions {
                name: spec.name.clone(),
                count: spec.options.len(),
                max: MAX_COMMAND_OPTIONS,
            },
        });
    }

    for option in &spec.options {
        validate_option_name(&spec.name, &option.name)?;
    }

    Ok(())
}

/// Load a manifest of handler definitions into a fresh registry.
///
/// For each definition: validate its identifier (and, for commands, its
/// full spec), await its `load` hook with the bot client, then insert its
/// descriptor. A handler's hook always completes before that handler is
/// inserted; iteration order across the manifest is unspecified and must
/// not be relied upon.
///
/// # Errors
///
/// Returns the first validation or load-hook failure encountered. The
/// partially-built registry is dropped with the error.
pub async fn load_handlers(
    client: &BotClient,
    definitions: Vec<HandlerDefinition>,
    sink: Option<&LogSink>,
) -> Result<HandlerRegistry, DaemonError> {
    let mut registry = HandlerRegistry::new();

    for definition in definitions {
        match definition {
            HandlerDefinition::Command(handler) => {
                let spec = handler.spec();
                validate_spec(&spec)?;

                handler.load(client).await.map_err(|e| DaemonError::Handler {
                    kind: HandlerErrorKind::LoadFailed {
                        name: spec.name.clone(),
                        message: e.to_string(),
                    },
                })?;

                let permissions = handler.permissions();
                registry.insert_command(CommandDescriptor {
                    handler,
                    permissions,
                    spec: spec.clone(),
                });

                info!(command = %spec.name, "Loaded command");
                if let Some(sink) = sink {
                    sink(&format!("Loaded command: {}", spec.name));
                }
            }
            HandlerDefinition::Event(handler) => {
                let id = handler.id().to_string();
                validate_custom_id(&id)?;

                handler.load(client).await.map_err(|e| DaemonError::Handler {
                    kind: HandlerErrorKind::LoadFailed {
                        name: id.clone(),
                        message: e.to_string(),
                    },
                })?;

                let permissions = handler.permissions();
                registry.insert_event(
                    id.clone(),
                    EventDescriptor {
                        handler,
                        permissions,
                    },
                );

                info!(event = %id, "Loaded event");
                if let Some(sink) = sink {
                    sink(&format!("Loaded event: {id}"));
                }
            }
        }
    }

    info!(
        commands = registry.command_count(),
        events = registry.event_count(),
        "Handler registry loaded"
    );

    Ok(registry)
}
