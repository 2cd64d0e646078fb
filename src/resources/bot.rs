use crate::app::Bot;
use crate::error::ResourceError;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Account the bot token belongs to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotUser {
    pub id: String,
    pub username: String,
}

/// Bot session authenticated against the platform's REST API
pub struct DiscordBot {
    client: reqwest::Client,
    api_base: String,
    user: RwLock<Option<BotUser>>,
}

impl DiscordBot {
    pub fn new(api_base: impl Into<String>) -> Result<Self, ResourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("botsite/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            user: RwLock::new(None),
        })
    }

    /// The logged in account, if a session is open
    pub fn user(&self) -> Option<BotUser> {
        self.user.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.read().is_some()
    }
}

#[async_trait]
impl Bot for DiscordBot {
    async fn login(&self, token: &str) -> Result<(), ResourceError> {
        let url = format!("{}/users/@me", self.api_base.trim_end_matches('/'));
        debug!("Validating bot token against {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bot {}", token))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ResourceError::bot("Improper token has been passed")),
            status if !status.is_success() => Err(ResourceError::bot(format!(
                "Login rejected with status {}",
                status
            ))),
            _ => {
                let user: BotUser = response.json().await?;
                info!("Logged in as {} ({})", user.username, user.id);
                *self.user.write() = Some(user);
                Ok(())
            }
        }
    }

    async fn close(&self) -> Result<(), ResourceError> {
        let user = self.user.write().take();
        match user {
            Some(user) => info!("Bot session for {} closed", user.username),
            None => debug!("Bot session already closed"),
        }
        Ok(())
    }
}
