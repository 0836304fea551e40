//! Configuration module for the slashd daemon.
//!
//! Handles loading and validating daemon configuration from TOML files.

mod settings;

pub use settings::*;
