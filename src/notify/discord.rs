// src/notify/discord.rs
//!
//! Discord REST notifier. Posts alerts as embeds to a channel using a bot token.

use super::{Notification, Notifier};
use crate::error::{RelayError, Result};
use crate::logging::LogLevel;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
struct CurrentUser {
    username: String,
    #[serde(default)]
    id: String,
}

pub struct DiscordNotifier {
    client: reqwest::Client,
    api_base: String,
    token: String,
    /// Channels checked at connect time
    channels: Vec<String>,
    online: AtomicBool,
    resolved: RwLock<HashSet<String>>,
}

impl DiscordNotifier {
    pub fn new(
        api_base: &str,
        token: &str,
        channels: Vec<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ddos-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::ConfigError(format!("HTTP client build error: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            channels,
            online: AtomicBool::new(false),
            resolved: RwLock::new(HashSet::new()),
        })
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Verify the credential and resolve the configured channels
    pub async fn connect(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/users/@me", self.api_base))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await;

        let user = match response {
            Ok(resp) if resp.status().is_success() => resp.json::<CurrentUser>().await?,
            Ok(resp) => {
                self.set_online(false);
                return Err(RelayError::Notification(format!(
                    "login rejected: HTTP {}",
                    resp.status()
                )));
            }
            Err(e) => {
                self.set_online(false);
                return Err(e.into());
            }
        };

        if !self.online.swap(true, Ordering::SeqCst) {
            notify_log!(LogLevel::Info, "Logged in as {} ({})", user.username, user.id);
        }

        for channel in &self.channels {
            match self.check_channel(channel).await {
                Ok(true) => {
                    self.resolved.write().await.insert(channel.clone());
                }
                Ok(false) => {
                    self.resolved.write().await.remove(channel);
                    notify_log!(LogLevel::Error, "Channel not found: {}", channel);
                }
                Err(e) => {
                    notify_log!(LogLevel::Warn, "Could not check channel {}: {}", channel, e);
                }
            }
        }

        Ok(())
    }

    async fn check_channel(&self, channel: &str) -> Result<bool> {
        let resp = self
            .client
            .get(format!("{}/channels/{}", self.api_base, channel))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => Ok(false),
            s => Err(RelayError::Notification(format!("HTTP {}", s))),
        }
    }

    fn set_online(&self, online: bool) {
        if self.online.swap(online, Ordering::SeqCst) && !online {
            notify_log!(LogLevel::Warn, "Notification service went offline");
        }
    }

    /// Recheck connectivity on a fixed interval for the life of the process
    pub fn spawn_heartbeat(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately; connect() already ran at startup
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match self.connect().await {
                    Ok(()) => notify_log!(LogLevel::Debug, "Heartbeat ok"),
                    Err(e) => notify_log!(LogLevel::Warn, "Heartbeat failed: {}", e),
                }
            }
        })
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, notification: &Notification, destination: &str) -> Result<()> {
        let body = json!({
            "embeds": [{
                "title": notification.title,
                "description": notification.description,
                "color": notification.color,
                "footer": { "text": notification.footer },
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }]
        });

        let resp = self
            .client
            .post(format!("{}/channels/{}/messages", self.api_base, destination))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&body)
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => {
                self.set_online(false);
                Err(RelayError::Notification("credential rejected".to_string()))
            }
            StatusCode::NOT_FOUND => {
                self.resolved.write().await.remove(destination);
                Err(RelayError::DestinationUnavailable(destination.to_string()))
            }
            s => Err(RelayError::Notification(format!("HTTP {}", s))),
        }
    }

    async fn resolves(&self, destination: &str) -> bool {
        self.resolved.read().await.contains(destination)
    }

    async fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
