//! slashd - Interaction dispatch daemon for a chat-bot platform.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::signal;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use slashd::client::BotClient;
use slashd::config::{CommandScope, Settings};
use slashd::gateway::GatewayListener;
use slashd::handlers::{builtin, load_handlers, Dispatcher};
use slashd::registrar::CommandRegistrar;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

/// What the process should do this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Publish per config scope, then serve interactions.
    Run,
    /// One-shot: publish the command set to every guild.
    PublishGuild,
    /// One-shot: publish the global command set.
    PublishGlobal,
    /// One-shot: clear every guild's command set.
    ClearGuild,
    /// One-shot: clear the global command set.
    ClearGlobal,
}

fn main() -> ExitCode {
    // Parse command line arguments (simple std::env approach)
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let mode = match get_mode(&args) {
        Ok(mode) => mode,
        Err(unknown) => {
            eprintln!("Unknown mode '{}', see --help", unknown);
            return ExitCode::FAILURE;
        }
    };

    // Get config path from --config argument or default
    let config_path = get_config_path(&args);

    // Load configuration
    let settings = match Settings::load(&config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging based on configuration
    init_logging(&settings);

    // Print startup banner
    info!("Starting {} v{}", NAME, VERSION);
    info!("Configuration loaded from: {}", config_path);
    info!("Socket path: {}", settings.socket.path.display());
    info!("Log level: {}", settings.logging.level);

    // Run the async main
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    match runtime.block_on(async_main(settings, mode)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Daemon failed");
            ExitCode::FAILURE
        }
    }
}

/// Async main function.
async fn async_main(settings: Settings, mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Arc::new(settings);
    let client = Arc::new(BotClient::from_config(&settings.platform)?);

    let user = client.current_user().await?;
    info!(bot = %user.username, id = %user.id, "Authenticated with platform");

    // Load the handler manifest. Any validation or load-hook failure is
    // fatal: the daemon must not serve from a partially-loaded registry.
    let registry = Arc::new(load_handlers(&client, builtin::manifest(), None).await?);
    let registrar = CommandRegistrar::new(Arc::clone(&client), None);

    match mode {
        Mode::PublishGuild => return Ok(registrar.publish_guild_commands(&registry).await?),
        Mode::PublishGlobal => return Ok(registrar.publish_global_commands(&registry).await?),
        Mode::ClearGuild => return Ok(registrar.clear_guild_commands().await?),
        Mode::ClearGlobal => return Ok(registrar.clear_global_commands().await?),
        Mode::Run => {}
    }

    match settings.platform.command_scope {
        CommandScope::Guild => registrar.publish_guild_commands(&registry).await?,
        CommandScope::Global => registrar.publish_global_commands(&registry).await?,
        CommandScope::None => info!("Startup command publication disabled"),
    }

    let dispatcher = Arc::new(Dispatcher::new(registry));
    let listener = GatewayListener::bind(Arc::clone(&settings), client, dispatcher)?;

    // Create shutdown notification
    let shutdown = Arc::new(Notify::new());
    let shutdown_for_run = Arc::clone(&shutdown);

    // Run the listener with graceful shutdown
    tokio::select! {
        result = listener.run(Arc::clone(&shutdown_for_run)) => {
            if let Err(e) = result {
                error!(error = %e, "Gateway listener failed");
                return Err(e.into());
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, initiating graceful shutdown...");
            shutdown.notify_waiters();

            // Wait for connections to drain with timeout
            let drain_timeout = std::time::Duration::from_secs(30);
            match tokio::time::timeout(drain_timeout, listener.wait_for_drain()).await {
                Ok(()) => info!("Graceful shutdown complete"),
                Err(_) => warn!(
                    "Shutdown timeout after {}s, some dispatches may be terminated",
                    drain_timeout.as_secs()
                ),
            }
        }
    }

    info!("Daemon stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Interaction dispatch daemon for a chat-bot platform.

USAGE:
    {} [OPTIONS] [MODE]

MODES:
    run                    Publish commands per config, then serve [default]
    publish-guild          Push the command set to every guild, then exit
    publish-global         Push the global command set, then exit
    clear-guild            Remove all commands from every guild, then exit
    clear-global           Remove all global commands, then exit

OPTIONS:
    -c, --config <PATH>    Path to configuration file
                           [default: /etc/slashd/daemon.toml]
    -h, --help             Print help information
    -V, --version          Print version information
"#,
        NAME, VERSION, NAME
    );
}

/// Get the run mode from command line arguments.
///
/// The mode is the first positional argument; the value of `--config`/`-c`
/// is skipped when scanning for it.
fn get_mode(args: &[String]) -> Result<Mode, String> {
    let mut previous_was_config = false;
    let mut mode_arg = None;
    for arg in args.iter().skip(1) {
        if previous_was_config {
            previous_was_config = false;
            continue;
        }
        if arg == "--config" || arg == "-c" {
            previous_was_config = true;
            continue;
        }
        if !arg.starts_with('-') {
            mode_arg = Some(arg.clone());
            break;
        }
    }

    match mode_arg.as_deref() {
        None | Some("run") => Ok(Mode::Run),
        Some("publish-guild") => Ok(Mode::PublishGuild),
        Some("publish-global") => Ok(Mode::PublishGlobal),
        Some("clear-guild") => Ok(Mode::ClearGuild),
        Some("clear-global") => Ok(Mode::ClearGlobal),
        Some(other) => Err(other.to_string()),
    }
}

/// Get configuration file path from command line arguments.
fn get_config_path(args: &[String]) -> String {
    for (i, arg) in args.iter().enumerate() {
        if (arg == "--config" || arg == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    // Default path
    "/etc/slashd/daemon.toml".to_string()
}

/// Initialize logging based on settings.
fn init_logging(settings: &Settings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Default to pretty format
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}
