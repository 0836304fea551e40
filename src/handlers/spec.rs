//! Serializable command metadata.
//!
//! A `CommandSpec` is the unit the registry accumulates into its serialized
//! command list and the exact body element of registrar publishes.

use serde::{Deserialize, Serialize};

/// Remotely-registered description of one slash command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Command name; unique within the command registry.
    pub name: String,

    /// Short human-readable description shown in the platform UI.
    pub description: String,

    /// Declared invocation options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

/// One declared command option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOption {
    /// Option name, keyed in the interaction's argument map.
    pub name: String,

    /// Short human-readable description.
    pub description: String,

    /// Value type expected from the platform.
    #[serde(rename = "type")]
    pub kind: OptionKind,

    /// Whether the invoker must supply this option.
    #[serde(default)]
    pub required: bool,
}

/// Option value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
}

impl CommandSpec {
    /// Create a spec with no options.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Add an option (builder pattern).
    pub fn with_option(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        kind: OptionKind,
        required: bool,
    ) -> Self {
        self.options.push(CommandOption {
            name: name.into(),
            description: description.into(),
            kind,
            required,
        });
        self
    }
}
