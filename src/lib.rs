//! slashd library
//!
//! This crate provides the core functionality for the slashd interaction
//! daemon, which routes chat-platform slash commands and component events
//! to registered handlers and publishes command metadata to the platform.

use std::sync::Arc;

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod interaction;
pub mod permissions;
pub mod protocol;
pub mod registrar;
pub mod validation;

/// Optional callback for human-readable confirmation messages.
///
/// Invoked for load confirmations and registration confirmations. Absence
/// never affects control flow; structured logging via `tracing` happens
/// regardless.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;
