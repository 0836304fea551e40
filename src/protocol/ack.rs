//! Delivery acknowledgement sent back per interaction frame.
//!
//! The ack only confirms that a frame was accepted for dispatch; it never
//! reflects routing or permission decisions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement for one inbound frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAck {
    /// Whether the frame was accepted for dispatch.
    pub received: bool,

    /// Daemon-assigned id for this delivery, for log correlation.
    pub delivery_id: Uuid,

    /// Sanitized rejection reason, present only when `received` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryAck {
    /// Ack a frame accepted for dispatch.
    pub fn accepted(delivery_id: Uuid) -> Self {
        Self {
            received: true,
            delivery_id,
            error: None,
        }
    }

    /// Ack a rejected frame with a sanitized reason.
    pub fn rejected(delivery_id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            received: false,
            delivery_id,
            error: Some(reason.into()),
        }
    }
}
