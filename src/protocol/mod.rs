//! Wire protocol module.
//!
//! Defines the delivery-ack type and message framing for the gateway
//! socket.
//!
//! ## Wire Format
//!
//! Each frame is length-prefixed JSON:
//! ```text
//! [4 bytes: length (big-endian u32)][JSON payload]
//! ```
//!
//! Inbound frames carry one interaction event each; the daemon answers
//! every frame with a [`DeliveryAck`].

mod ack;
mod wire;

pub use ack::DeliveryAck;
pub use wire::{read_frame, read_frame_with_timeout, write_frame, write_frame_with_timeout};
