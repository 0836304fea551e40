//! Inbound interaction model.
//!
//! An interaction is one user action delivered by the platform gateway:
//! invoking a slash command or activating a message component. Routing is
//! structural: a command interaction carries a command name, a component
//! interaction carries a custom id.

use serde::{Deserialize, Serialize};

use crate::permissions::Permissions;

/// An inbound interaction event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Platform-assigned interaction id, used to post a reply.
    pub id: String,

    /// Command name, present on command-shaped interactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_name: Option<String>,

    /// Component custom id, present on component-shaped interactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,

    /// Guild the interaction originated in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,

    /// The invoking member.
    pub member: Member,

    /// Invocation arguments keyed by option name.
    #[serde(default)]
    pub options: serde_json::Value,
}

/// The member who triggered an interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// The member's user id.
    pub user_id: String,

    /// The member's resolved permission set in the interaction's context.
    #[serde(default)]
    pub permissions: Permissions,
}

/// Structural classification of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind<'a> {
    /// A slash-command invocation, routed by command name.
    Command(&'a str),
    /// A component activation, routed by custom id.
    Component(&'a str),
}

impl Interaction {
    /// Classify this interaction by the identifying field it carries.
    ///
    /// A frame carrying both fields routes as a command; a frame carrying
    /// neither is unroutable and returns `None`.
    pub fn kind(&self) -> Option<InteractionKind<'_>> {
        if let Some(name) = self.command_name.as_deref() {
            return Some(InteractionKind::Command(name));
        }
        self.custom_id.as_deref().map(InteractionKind::Component)
    }

    /// Look up a named invocation argument.
    pub fn option(&self, name: &str) -> Option<&serde_json::Value> {
        self.options.get(name)
    }

    /// Build a command interaction (for testing).
    #[cfg(test)]
    pub fn test_command(name: &str, permissions: Permissions) -> Self {
        Self {
            id: "interaction-1".to_string(),
            command_name: Some(name.to_string()),
            custom_id: None,
            guild_id: Some("guild-1".to_string()),
            member: Member {
                user_id: "user-1".to_string(),
                permissions,
            },
            options: serde_json::json!({}),
        }
    }

    /// Build a component interaction (for testing).
    #[cfg(test)]
    pub fn test_component(custom_id: &str, permissions: Permissions) -> Self {
        Self {
            id: "interaction-1".to_string(),
            command_name: None,
            custom_id: Some(custom_id.to_string()),
            guild_id: Some("guild-1".to_string()),
            member: Member {
                user_id: "user-1".to_string(),
                permissions,
            },
            options: serde_json::json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_classification() {
        let interaction = Interaction::test_command("ping", Permissions::empty());
        assert_eq!(interaction.kind(), Some(InteractionKind::Command("ping")));
    }

    #[test]
    fn test_component_classification() {
        let interaction = Interaction::test_component("purge-confirm", Permissions::empty());
        assert_eq!(
            interaction.kind(),
            Some(InteractionKind::Component("purge-confirm"))
        );
    }

    #[test]
    fn test_command_wins_when_both_fields_present() {
        let mut interaction = Interaction::test_command("ping", Permissions::empty());
        interaction.custom_id = Some("stray-id".to_string());
        assert_eq!(interaction.kind(), Some(InteractionKind::Command("ping")));
    }

    #[test]
    fn test_neither_field_is_unroutable() {
        let mut interaction = Interaction::test_command("ping", Permissions::empty());
        interaction.command_name = None;
        assert_eq!(interaction.kind(), None);
    }

    #[test]
    fn test_deserialization_defaults() {
        let interaction: Interaction = serde_json::from_str(
            r#"{
                "id": "991",
                "command_name": "ping",
                "member": {"user_id": "42"}
            }"#,
        )
        .unwrap();

        assert_eq!(interaction.kind(), Some(InteractionKind::Command("ping")));
        assert_eq!(interaction.member.permissions, Permissions::empty());
        assert!(interaction.guild_id.is_none());
        assert!(interaction.option("count").is_none());
    }

    #[test]
    fn test_member_permissions_decode_from_bits() {
        let interaction: Interaction = serde_json::from_str(&format!(
            r#"{{
                "id": "991",
                "custom_id": "purge-confirm",
                "member": {{"user_id": "42", "permissions": {}}}
            }}"#,
            Permissions::MANAGE_MESSAGES.bits()
        ))
        .unwrap();

        assert!(interaction
            .member
            .permissions
            .satisfies(Permissions::MANAGE_MESSAGES));
    }
}
