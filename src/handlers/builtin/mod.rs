//! Built-in handler manifest.
//!
//! The statically auditable handler list fed to the loader at startup.

mod ping;
mod purge;
mod purge_confirm;

use std::sync::Arc;

use super::traits::HandlerDefinition;

pub use ping::PingCommand;
pub use purge::PurgeCommand;
pub use purge_confirm::PurgeConfirm;

/// All built-in handler definitions, ready for the loader.
pub fn manifest() -> Vec<HandlerDefinition> {
    vec![
        HandlerDefinition::Command(Arc::new(PingCommand)),
        HandlerDefinition::Command(Arc::new(PurgeCommand)),
        HandlerDefinition::Event(Arc::new(PurgeConfirm)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_shape() {
        let definitions = manifest();
        assert_eq!(definitions.len(), 3);

        let keys: Vec<String> = definitions.iter().map(|d| d.key()).collect();
        assert!(keys.contains(&"ping".to_string()));
        assert!(keys.contains(&"purge".to_string()));
        assert!(keys.contains(&"purge-confirm".to_string()));
    }
}
