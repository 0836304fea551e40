//! Unix socket listener for the interaction gateway.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::UnixListener;
use tokio::sync::{Notify, Semaphore};
use tracing::{debug, error, info, warn};

use crate::client::BotClient;
use crate::config::Settings;
use crate::error::DaemonError;
use crate::handlers::Dispatcher;

use super::handle_connection;

/// Dispatch metrics for monitoring.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Total dispatch tasks completed.
    pub dispatches_total: AtomicU64,
    /// Dispatch tasks that ended in a handler error.
    pub dispatches_failed: AtomicU64,
    /// Currently running dispatch tasks.
    pub active_dispatches: AtomicUsize,
    /// Currently open gateway connections.
    pub active_connections: AtomicUsize,
}

impl DispatchMetrics {
    /// Create new dispatch metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed dispatch task.
    pub fn record_dispatch(&self, success: bool) {
        self.dispatches_total.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.dispatches_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Total dispatch count.
    pub fn total_dispatches(&self) -> u64 {
        self.dispatches_total.load(Ordering::Relaxed)
    }

    /// Failed dispatch count.
    pub fn failed_dispatches(&self) -> u64 {
        self.dispatches_failed.load(Ordering::Relaxed)
    }

    /// Count of in-flight dispatch tasks and open connections.
    pub fn active(&self) -> usize {
        self.active_dispatches.load(Ordering::Relaxed)
            + self.active_connections.load(Ordering::Relaxed)
    }
}

/// Unix socket server feeding the dispatcher.
pub struct GatewayListener {
    listener: UnixListener,
    settings: Arc<Settings>,
    client: Arc<BotClient>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<DispatchMetrics>,
    /// Semaphore for connection limiting
    connection_semaphore: Arc<Semaphore>,
}

impl GatewayListener {
    /// Create and bind a new gateway listener.
    ///
    /// The dispatcher must already be built from a fully-loaded registry:
    /// by contract, loading completes before the gateway serves anything.
    pub fn bind(
        settings: Arc<Settings>,
        client: Arc<BotClient>,
        dispatcher: Arc<Dispatcher>,
    ) -> Result<Self, DaemonError> {
        let socket_path = &settings.socket.path;

        // Remove existing socket file if present
        // Security: Use symlink_metadata to detect symlinks without following them
        if let Ok(metadata) = std::fs::symlink_metadata(socket_path) {
            // Refuse to remove if the path is a symlink (prevents arbitrary file deletion)
            if metadata.file_type().is_symlink() {
                return Err(DaemonError::Socket {
                    message: format!(
                        "Socket path {} is a symlink, refusing to remove for security",
                        socket_path.display()
                    ),
                });
            }

            std::fs::remove_file(socket_path).map_err(|e| DaemonError::Socket {
                message: format!(
                    "Failed to remove existing socket file {}: {}",
                    socket_path.display(),
                    e
                ),
            })?;
        }

        // Create parent directory if needed
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DaemonError::Socket {
                message: format!(
                    "Failed to create socket directory {}: {}",
                    parent.display(),
                    e
                ),
            })?;
        }

        // Bind to the socket
        let listener = UnixListener::bind(socket_path).map_err(|e| DaemonError::Socket {
            message: format!("Failed to bind to socket {}: {}", socket_path.display(), e),
        })?;

        // Set socket permissions
        Self::set_socket_permissions(socket_path, &settings.socket.permissions)?;

        let metrics = Arc::new(DispatchMetrics::new());

        // Limit concurrent gateway-shim connections
        let connection_semaphore =
            Arc::new(Semaphore::new(settings.limits.max_concurrent_connections));
        info!(
            max_connections = settings.limits.max_concurrent_connections,
            "Connection limiting enabled"
        );

        info!(
            path = %socket_path.display(),
            commands = dispatcher.registry().command_count(),
            events = dispatcher.registry().event_count(),
            "Gateway listener bound"
        );

        Ok(Self {
            listener,
            settings,
            client,
            dispatcher,
            metrics,
            connection_semaphore,
        })
    }

    /// Get dispatch metrics.
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Set socket file permissions.
    fn set_socket_permissions(path: &Path, permissions_str: &str) -> Result<(), DaemonError> {
        let mode = u32::from_str_radix(permissions_str, 8).map_err(|e| DaemonError::Socket {
            message: format!("Invalid socket permissions '{}': {}", permissions_str, e),
        })?;

        let permissions = std::fs::Permissions::from_mode(mode);
        std::fs::set_permissions(path, permissions).map_err(|e| DaemonError::Socket {
            message: format!(
                "Failed to set socket permissions on {}: {}",
                path.display(),
                e
            ),
        })?;

        Ok(())
    }

    /// Run the gateway listener, accepting connections.
    ///
    /// The listener stops accepting new connections when `shutdown` is
    /// notified. In-flight connections and dispatch tasks continue until
    /// they complete.
    pub async fn run(&self, shutdown: Arc<Notify>) -> Result<(), DaemonError> {
        info!("Gateway listener running, waiting for connections...");

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, _addr)) => {
                            // Try to acquire a connection permit
                            let permit = match self.connection_semaphore.clone().try_acquire_owned() {
                                Ok(permit) => permit,
                                Err(_) => {
                                    warn!(
                                        max = self.settings.limits.max_concurrent_connections,
                                        "Connection limit reached, rejecting connection"
                                    );
                                    // Connection will be dropped, rejecting the shim
                                    continue;
                                }
                            };

                            let settings = Arc::clone(&self.settings);
                            let client = Arc::clone(&self.client);
                            let dispatcher = Arc::clone(&self.dispatcher);
                            let metrics = Arc::clone(&self.metrics);

                            metrics.active_connections.fetch_add(1, Ordering::Relaxed);
                            debug!(active = metrics.active(), "New gateway connection accepted");

                            // Spawn a task to handle the connection
                            // Permit is moved into the task and dropped when task completes
                            tokio::spawn(async move {
                                let _permit = permit;
                                if let Err(e) = handle_connection(
                                    stream,
                                    settings,
                                    client,
                                    dispatcher,
                                    Arc::clone(&metrics),
                                ).await {
                                    error!(error = %e, "Gateway connection handler error");
                                }

                                metrics.active_connections.fetch_sub(1, Ordering::Relaxed);
                                debug!(active = metrics.active(), "Gateway connection closed");
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to accept connection");
                        }
                    }
                }
                _ = shutdown.notified() => {
                    info!("Shutdown signal received, stopping listener");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Wait for all active connections and dispatch tasks to drain.
    ///
    /// Returns immediately if nothing is in flight.
    pub async fn wait_for_drain(&self) {
        let poll_interval = std::time::Duration::from_millis(100);

        while self.metrics.active() > 0 {
            debug!(
                active = self.metrics.active(),
                "Waiting for connections to drain"
            );
            tokio::time::sleep(poll_interval).await;
        }

        info!("All connections drained");
    }
}
