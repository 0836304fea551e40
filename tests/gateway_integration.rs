//! Integration tests for the slashd daemon.
//!
//! These tests start a real gateway listener and feed it interaction
//! frames over the Unix socket to verify end-to-end routing.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

use slashd::client::BotClient;
use slashd::config::{
    CommandScope, LimitsConfig, LoggingConfig, PlatformConfig, Settings, SocketConfig,
};
use slashd::error::DaemonError;
use slashd::gateway::GatewayListener;
use slashd::handlers::{
    load_handlers, CommandHandler, CommandSpec, Dispatcher, EventHandler, HandlerDefinition,
};
use slashd::interaction::Interaction;
use slashd::permissions::Permissions;

struct CountingCommand {
    spec: CommandSpec,
    permissions: Option<Permissions>,
    invocations: Arc<AtomicUsize>,
}

#[async_trait]
impl CommandHandler for CountingCommand {
    fn spec(&self) -> CommandSpec {
        self.spec.clone()
    }

    fn permissions(&self) -> Option<Permissions> {
        self.permissions
    }

    async fn execute(
        &self,
        _client: &BotClient,
        _interaction: &Interaction,
    ) -> Result<(), DaemonError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct CountingEvent {
    id: String,
    invocations: Arc<AtomicUsize>,
}

#[async_trait]
impl EventHandler for CountingEvent {
    fn id(&self) -> &str {
        &self.id
    }

    async fn execute(
        &self,
        _client: &BotClient,
        _interaction: &Interaction,
    ) -> Result<(), DaemonError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Test daemon instance.
struct TestDaemon {
    socket_path: PathBuf,
    _temp_dir: TempDir,
    shutdown: Arc<tokio::sync::Notify>,
    ping_invocations: Arc<AtomicUsize>,
    ban_invocations: Arc<AtomicUsize>,
    confirm_invocations: Arc<AtomicUsize>,
}

impl TestDaemon {
    /// Create a new test daemon with counting handlers.
    async fn start() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let socket_path = temp_dir.path().join("gateway.sock");

        let settings = Settings {
            socket: SocketConfig {
                path: socket_path.clone(),
                permissions: "0600".to_string(),
            },
            platform: PlatformConfig {
                api_base_url: "http://127.0.0.1:0".to_string(),
                token_path: temp_dir.path().join("token"),
                application_id: "app-test".to_string(),
                command_scope: CommandScope::None,
                request_timeout_seconds: 5,
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: "pretty".to_string(),
                file: None,
            },
            limits: LimitsConfig {
                max_message_size: 4096,
                socket_timeout_seconds: 5,
                max_concurrent_connections: 16,
            },
        };

        let client = Arc::new(BotClient::new("http://127.0.0.1:0", "test-token", "app-test"));

        let ping_invocations = Arc::new(AtomicUsize::new(0));
        let ban_invocations = Arc::new(AtomicUsize::new(0));
        let confirm_invocations = Arc::new(AtomicUsize::new(0));

        let definitions = vec![
            HandlerDefinition::Command(Arc::new(CountingCommand {
                spec: CommandSpec::new("ping", "Health check"),
                permissions: None,
                invocations: Arc::clone(&ping_invocations),
            })),
            HandlerDefinition::Command(Arc::new(CountingCommand {
                spec: CommandSpec::new("ban", "Ban a member"),
                permissions: Some(Permissions::BAN_MEMBERS),
                invocations: Arc::clone(&ban_invocations),
            })),
            HandlerDefinition::Event(Arc::new(CountingEvent {
                id: "confirm-button".to_string(),
                invocations: Arc::clone(&confirm_invocations),
            })),
        ];

        let registry = load_handlers(&client, definitions, None)
            .await
            .expect("Failed to load handlers");
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry)));

        let listener = GatewayListener::bind(Arc::new(settings), client, dispatcher)
            .expect("Failed to bind socket");

        let shutdown = Arc::new(tokio::sync::Notify::new());
        let shutdown_for_run = Arc::clone(&shutdown);

        tokio::spawn(async move {
            if let Err(e) = listener.run(shutdown_for_run).await {
                eprintln!("Listener error: {}", e);
            }
        });

        // Wait for socket to be ready
        tokio::time::sleep(Duration::from_millis(200)).await;

        Self {
            socket_path,
            _temp_dir: temp_dir,
            shutdown,
            ping_invocations,
            ban_invocations,
            confirm_invocations,
        }
    }

    /// Open a framed connection to the daemon.
    fn connect(&self) -> UnixStream {
        let stream = UnixStream::connect(&self.socket_path).expect("Failed to connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("Failed to set read timeout");
        stream
            .set_write_timeout(Some(Duration::from_secs(5)))
            .expect("Failed to set write timeout");
        stream
    }

    /// Send one interaction frame and read the delivery ack.
    fn send_interaction(&self, interaction: Value) -> Result<Value, String> {
        let mut stream = self.connect();
        let bytes = serde_json::to_vec(&interaction).map_err(|e| e.to_string())?;
        write_raw_frame(&mut stream, &bytes)?;
        read_frame(&mut stream)
    }

    /// Give spawned dispatch tasks a moment to finish.
    async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    /// Stop the test daemon.
    async fn stop(self) {
        self.shutdown.notify_waiters();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

fn write_raw_frame(stream: &mut UnixStream, bytes: &[u8]) -> Result<(), String> {
    let length = bytes.len() as u32;
    stream
        .write_all(&length.to_be_bytes())
        .map_err(|e| format!("Failed to write length: {}", e))?;
    stream
        .write_all(bytes)
        .map_err(|e| format!("Failed to write frame: {}", e))?;
    stream.flush().map_err(|e| format!("Failed to flush: {}", e))
}

fn read_frame(stream: &mut UnixStream) -> Result<Value, String> {
    let mut length_bytes = [0u8; 4];
    stream
        .read_exact(&mut length_bytes)
        .map_err(|e| format!("Failed to read ack length: {}", e))?;
    let length = u32::from_be_bytes(length_bytes) as usize;

    let mut payload = vec![0u8; length];
    stream
        .read_exact(&mut payload)
        .map_err(|e| format!("Failed to read ack: {}", e))?;

    serde_json::from_slice(&payload).map_err(|e| format!("Failed to parse ack: {}", e))
}

fn command_frame(name: &str, permissions: Permissions) -> Value {
    json!({
        "id": "interaction-1",
        "command_name": name,
        "guild_id": "guild-1",
        "member": {"user_id": "user-1", "permissions": permissions.bits()}
    })
}

fn component_frame(custom_id: &str, permissions: Permissions) -> Value {
    json!({
        "id": "interaction-1",
        "custom_id": custom_id,
        "guild_id": "guild-1",
        "member": {"user_id": "user-1", "permissions": permissions.bits()}
    })
}

// ============================================================================
// Socket Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_socket_connection() {
    let daemon = TestDaemon::start().await;
    assert!(daemon.socket_path.exists(), "Socket file should exist");
    daemon.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_command_interaction_invokes_handler_once() {
    let daemon = TestDaemon::start().await;

    let ack = daemon
        .send_interaction(command_frame("ping", Permissions::empty()))
        .unwrap();
    assert_eq!(ack["received"], true, "Ack: {:?}", ack);

    daemon.settle().await;
    assert_eq!(daemon.ping_invocations.load(Ordering::SeqCst), 1);

    daemon.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_multiple_interactions_on_one_connection() {
    let daemon = TestDaemon::start().await;

    let mut stream = daemon.connect();
    for _ in 0..5 {
        let bytes = serde_json::to_vec(&command_frame("ping", Permissions::empty())).unwrap();
        write_raw_frame(&mut stream, &bytes).unwrap();
        let ack = read_frame(&mut stream).unwrap();
        assert_eq!(ack["received"], true);
    }

    daemon.settle().await;
    assert_eq!(daemon.ping_invocations.load(Ordering::SeqCst), 5);

    daemon.stop().await;
}

// ============================================================================
// Routing Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_command_is_dropped_silently() {
    let daemon = TestDaemon::start().await;

    // The frame is valid, so it is acked; routing drops it without error.
    let ack = daemon
        .send_interaction(command_frame("nonexistent", Permissions::empty()))
        .unwrap();
    assert_eq!(ack["received"], true);

    daemon.settle().await;
    assert_eq!(daemon.ping_invocations.load(Ordering::SeqCst), 0);
    assert_eq!(daemon.ban_invocations.load(Ordering::SeqCst), 0);

    daemon.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_permission_denied_blocks_invocation() {
    let daemon = TestDaemon::start().await;

    let ack = daemon
        .send_interaction(command_frame("ban", Permissions::KICK_MEMBERS))
        .unwrap();
    assert_eq!(ack["received"], true);

    daemon.settle().await;
    assert_eq!(daemon.ban_invocations.load(Ordering::SeqCst), 0);

    daemon.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sufficient_permissions_invoke_handler() {
    let daemon = TestDaemon::start().await;

    let ack = daemon
        .send_interaction(command_frame(
            "ban",
            Permissions::BAN_MEMBERS | Permissions::KICK_MEMBERS,
        ))
        .unwrap();
    assert_eq!(ack["received"], true);

    daemon.settle().await;
    assert_eq!(daemon.ban_invocations.load(Ordering::SeqCst), 1);

    daemon.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_component_interaction_routes_by_custom_id() {
    let daemon = TestDaemon::start().await;

    let ack = daemon
        .send_interaction(component_frame("confirm-button", Permissions::empty()))
        .unwrap();
    assert_eq!(ack["received"], true);

    daemon.settle().await;
    assert_eq!(daemon.confirm_invocations.load(Ordering::SeqCst), 1);

    daemon.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_component_is_dropped_silently() {
    let daemon = TestDaemon::start().await;

    let ack = daemon
        .send_interaction(component_frame("unknown-button", Permissions::empty()))
        .unwrap();
    assert_eq!(ack["received"], true);

    daemon.settle().await;
    assert_eq!(daemon.confirm_invocations.load(Ordering::SeqCst), 0);

    daemon.stop().await;
}

// ============================================================================
// Protocol Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_frame_gets_rejection_ack() {
    let daemon = TestDaemon::start().await;

    let mut stream = daemon.connect();
    write_raw_frame(&mut stream, b"not json at all").unwrap();
    let ack = read_frame(&mut stream).unwrap();

    assert_eq!(ack["received"], false, "Ack: {:?}", ack);
    assert_eq!(ack["error"], "invalid interaction payload");

    // The connection survives a bad frame.
    let bytes = serde_json::to_vec(&command_frame("ping", Permissions::empty())).unwrap();
    write_raw_frame(&mut stream, &bytes).unwrap();
    let ack = read_frame(&mut stream).unwrap();
    assert_eq!(ack["received"], true);

    daemon.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_oversized_frame_closes_connection_but_not_daemon() {
    let daemon = TestDaemon::start().await;

    // Declare a frame larger than the configured 4 KB limit.
    let mut stream = daemon.connect();
    stream.write_all(&100_000u32.to_be_bytes()).unwrap();
    stream.write_all(&[0u8; 16]).unwrap();
    stream.flush().unwrap();

    // The daemon drops this connection without an ack.
    let mut buf = [0u8; 4];
    assert!(stream.read_exact(&mut buf).is_err());

    // A fresh connection still works.
    let ack = daemon
        .send_interaction(command_frame("ping", Permissions::empty()))
        .unwrap();
    assert_eq!(ack["received"], true);

    daemon.settle().await;
    assert_eq!(daemon.ping_invocations.load(Ordering::SeqCst), 1);

    daemon.stop().await;
}
