//! Per-connection handler.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UnixStream;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::client::BotClient;
use crate::config::Settings;
use crate::error::{DaemonError, ProtocolErrorKind};
use crate::handlers::{DispatchOutcome, Dispatcher};
use crate::interaction::Interaction;
use crate::protocol::{read_frame_with_timeout, write_frame_with_timeout, DeliveryAck};

use super::listener::DispatchMetrics;

/// Handle a single gateway-shim connection.
///
/// Frames are processed in a loop: each one is parsed, acked, and handed to
/// an independent dispatch task. A slow or failing handler never blocks the
/// read loop, so interactions multiplexed on one connection dispatch
/// concurrently.
pub async fn handle_connection(
    stream: UnixStream,
    settings: Arc<Settings>,
    client: Arc<BotClient>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<DispatchMetrics>,
) -> Result<(), DaemonError> {
    let (mut reader, mut writer) = stream.into_split();
    let socket_timeout = Duration::from_secs(settings.limits.socket_timeout_seconds);

    loop {
        let frame = match read_frame_with_timeout(
            &mut reader,
            settings.limits.max_message_size,
            socket_timeout,
        )
        .await
        {
            Ok(frame) => frame,
            Err(DaemonError::Protocol {
                kind: ProtocolErrorKind::ConnectionClosed,
            }) => {
                debug!("Gateway shim disconnected");
                return Ok(());
            }
            Err(DaemonError::Protocol {
                kind: ProtocolErrorKind::ConnectionTimeout,
            }) => {
                warn!("Gateway connection timed out");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let delivery_id = Uuid::new_v4();

        let ack = match serde_json::from_slice::<Interaction>(&frame) {
            Ok(interaction) => {
                info!(
                    delivery_id = %delivery_id,
                    interaction = %interaction.id,
                    "Received interaction"
                );
                spawn_dispatch(
                    delivery_id,
                    interaction,
                    Arc::clone(&client),
                    Arc::clone(&dispatcher),
                    Arc::clone(&metrics),
                );
                DeliveryAck::accepted(delivery_id)
            }
            Err(e) => {
                warn!(delivery_id = %delivery_id, error = %e, "Unparseable interaction frame");
                DeliveryAck::rejected(delivery_id, "invalid interaction payload")
            }
        };

        let ack_bytes = serde_json::to_vec(&ack)?;
        write_frame_with_timeout(&mut writer, &ack_bytes, socket_timeout).await?;
    }
}

/// Run one dispatch as its own task.
///
/// The dispatcher does not catch handler failures; this task is the
/// containment boundary that keeps one failing interaction from affecting
/// the rest of the service.
fn spawn_dispatch(
    delivery_id: Uuid,
    interaction: Interaction,
    client: Arc<BotClient>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<DispatchMetrics>,
) {
    metrics.active_dispatches.fetch_add(1, Ordering::Relaxed);

    tokio::spawn(async move {
        let result = dispatcher.dispatch(&client, &interaction).await;

        match &result {
            Ok(DispatchOutcome::Handled) => {
                info!(delivery_id = %delivery_id, "Interaction handled");
            }
            Ok(outcome) => {
                // Dropped silently at the user boundary; only the trace log
                // records which drop case it was.
                debug!(delivery_id = %delivery_id, outcome = ?outcome, "Interaction dropped");
            }
            Err(e) => {
                error!(delivery_id = %delivery_id, error = %e, "Interaction handler failed");
            }
        }

        metrics.record_dispatch(result.is_ok());
        metrics.active_dispatches.fetch_sub(1, Ordering::Relaxed);
    });
}
