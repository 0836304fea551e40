//! Platform HTTP client.
//!
//! A thin authenticated wrapper over the platform REST API: bot identity,
//! guild enumeration, interaction replies, and the command-registration
//! primitive used by the registrar. The wire format beyond these routes is
//! out of scope; failures map to transport/API errors.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::PlatformConfig;
use crate::error::{DaemonError, RegistrarErrorKind};
use crate::handlers::CommandSpec;
use crate::interaction::Interaction;

/// The bot's own user record.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    /// The bot's user id.
    pub id: String,
    /// The bot's display name.
    pub username: String,
}

/// A guild the bot belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Guild {
    /// The guild id.
    pub id: String,
    /// The guild's display name.
    pub name: String,
}

/// Authenticated client for the platform REST API.
pub struct BotClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
    application_id: String,
}

impl BotClient {
    /// Create a client from explicit parts.
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        application_id: impl Into<String>,
    ) -> Self {
        let api_base = api_base.into();
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
            application_id: application_id.into(),
        }
    }

    /// Create a client from platform configuration.
    ///
    /// Reads the bot token from the configured secret file (the file should
    /// be readable by the daemon user only) and applies the configured
    /// request timeout.
    pub fn from_config(config: &PlatformConfig) -> Result<Self, DaemonError> {
        let token = Self::load_token(&config.token_path)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| DaemonError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            token,
            application_id: config.application_id.clone(),
        })
    }

    /// Read and trim the bot token from a secret file.
    fn load_token(path: &Path) -> Result<String, DaemonError> {
        let raw = std::fs::read_to_string(path).map_err(|e| DaemonError::Config {
            message: format!("Failed to read token file '{}': {}", path.display(), e),
        })?;

        let token = raw.trim().to_string();
        if token.is_empty() {
            return Err(DaemonError::Config {
                message: format!("Token file '{}' is empty", path.display()),
            });
        }

        Ok(token)
    }

    /// The application id commands are registered under.
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Fetch the bot's own user record.
    pub async fn current_user(&self) -> Result<BotUser, DaemonError> {
        self.get_json("/users/@me").await
    }

    /// Enumerate the guilds the bot belongs to.
    pub async fn guilds(&self) -> Result<Vec<Guild>, DaemonError> {
        self.get_json("/users/@me/guilds").await
    }

    /// Post a plain-text reply to an interaction.
    pub async fn reply(&self, interaction: &Interaction, content: &str) -> Result<(), DaemonError> {
        let path = format!("/interactions/{}/callback", interaction.id);
        let body = serde_json::json!({ "content": content });

        debug!(interaction = %interaction.id, "Posting interaction reply");
        let response = self
            .http
            .post(self.url(&path))
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        Self::check_status(response).await.map(|_| ())
    }

    /// Replace a command set with `payloads`.
    ///
    /// `scope_path` is the guild or global command route; the PUT replaces
    /// the full set at that scope, so repeating it is idempotent.
    pub(crate) async fn put_commands(
        &self,
        scope_path: &str,
        payloads: &[CommandSpec],
    ) -> Result<(), DaemonError> {
        let response = self
            .http
            .put(self.url(scope_path))
            .header("Authorization", self.auth_header())
            .json(&payloads)
            .send()
            .await
            .map_err(transport_error)?;

        Self::check_status(response).await.map(|_| ())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, DaemonError> {
        let response = self
            .http
            .get(self.url(path))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(transport_error)?;

        let response = Self::check_status(response).await?;
        response.json::<T>().await.map_err(|e| DaemonError::Registrar {
            kind: RegistrarErrorKind::Transport {
                message: format!("Invalid response body: {}", e),
            },
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DaemonError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable>".to_string());
        Err(DaemonError::Registrar {
            kind: RegistrarErrorKind::Api {
                status: status.as_u16(),
                message: body,
            },
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }
}

fn transport_error(e: reqwest::Error) -> DaemonError {
    DaemonError::Registrar {
        kind: RegistrarErrorKind::Transport {
            message: e.to_string(),
        },
    }
}
