//! Input validation module.
//!
//! Provides validators for command names, command options, and component
//! event ids. The loader runs these before anything reaches the registry.

mod command_name;
mod custom_id;

pub use command_name::{validate_command_name, validate_option_name, MAX_COMMAND_OPTIONS};
pub use custom_id::validate_custom_id;
