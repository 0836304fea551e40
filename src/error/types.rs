//! Error types for the slashd daemon.

use thiserror::Error;

/// Main error type for the daemon.
#[derive(Error, Debug)]
pub enum DaemonError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Socket-related errors.
    #[error("Socket error: {message}")]
    Socket { message: String },

    /// Handler validation errors raised at load time.
    #[error("Validation error: {kind}")]
    Validation { kind: ValidationErrorKind },

    /// Handler lifecycle errors (load hooks, execution).
    #[error("Handler error: {kind}")]
    Handler { kind: HandlerErrorKind },

    /// Remote command registration errors.
    #[error("Registrar error: {kind}")]
    Registrar { kind: RegistrarErrorKind },

    /// Protocol errors.
    #[error("Protocol error: {kind}")]
    Protocol { kind: ProtocolErrorKind },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validation error kinds.
///
/// All of these are raised by the loader before a handler reaches the
/// registry; any one of them aborts startup.
#[derive(Error, Debug)]
pub enum ValidationErrorKind {
    #[error("Command definition has no name")]
    MissingCommandName,

    #[error("Invalid command name '{name}': {message}")]
    InvalidCommandName { name: String, message: String },

    #[error("Command '{name}' has no description")]
    MissingDescription { name: String },

    #[error("Command '{name}' declares {count} options, maximum is {max}")]
    TooManyOptions { name: String, count: usize, max: usize },

    #[error("Invalid option '{option}' on command '{command}': {message}")]
    InvalidOption {
        command: String,
        option: String,
        message: String,
    },

    #[error("Event definition has no id")]
    MissingEventId,

    #[error("Invalid event id '{id}': {message}")]
    InvalidEventId { id: String, message: String },
}

/// Handler error kinds.
#[derive(Error, Debug)]
pub enum HandlerErrorKind {
    #[error("Load hook of '{name}' failed: {message}")]
    LoadFailed { name: String, message: String },

    #[error("Handler execution failed: {message}")]
    ExecutionFailed { message: String },
}

/// Registrar error kinds.
#[derive(Error, Debug)]
pub enum RegistrarErrorKind {
    #[error("Platform API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },
}

/// Protocol error kinds.
#[derive(Error, Debug)]
pub enum ProtocolErrorKind {
    #[error("Message too large: {size} bytes exceeds maximum of {max} bytes")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Invalid message format: {message}")]
    InvalidMessageFormat { message: String },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Connection timed out")]
    ConnectionTimeout,
}

/// Result type alias for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
