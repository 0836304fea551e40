//! Handler contracts, registry, loading, and dispatch.
//!
//! ## Adding a New Handler
//!
//! 1. Implement `CommandHandler` (slash command) or `EventHandler`
//!    (component event)
//! 2. Add it to the manifest in `builtin::manifest()`
//!
//! The loader validates every manifest entry at startup; a bad definition
//! aborts the process before it serves interactions.

mod dispatch;
mod loader;
mod registry;
mod spec;
mod traits;

pub mod builtin;

pub use dispatch::{DispatchOutcome, Dispatcher};
pub use loader::load_handlers;
pub use registry::{CommandDescriptor, EventDescriptor, HandlerRegistry};
pub use spec::{CommandOption, CommandSpec, OptionKind};
pub use traits::{CommandHandler, EventHandler, HandlerDefinition};
