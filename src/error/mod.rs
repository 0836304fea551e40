//! Error types for the slashd daemon.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
