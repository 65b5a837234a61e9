//! Minimal Telegram Bot API client: long-poll updates and Markdown
//! message delivery. Only the two methods the broadcaster needs.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

const API_BASE: &str = "https://api.telegram.org";
/// Server-side long-poll window, seconds.
const LONG_POLL_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    token: String,
}

impl TelegramClient {
    pub fn new(client: Client, token: String) -> Self {
        Self { client, token }
    }

    /// Fetch updates after `offset`. The request timeout is widened past
    /// the long-poll window so the poll itself never trips it.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let url = self.method_url("getUpdates");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("offset", (offset + 1).to_string()),
                ("timeout", LONG_POLL_SECS.to_string()),
            ])
            .timeout(Duration::from_secs(LONG_POLL_SECS + 5))
            .send()
            .await
            .context("getUpdates request failed")?;

        let body: UpdatesResponse = response
            .json()
            .await
            .context("getUpdates decode failed")?;

        if !body.ok {
            warn!("telegram getUpdates replied ok=false");
            return Ok(Vec::new());
        }
        Ok(body.result)
    }

    /// Send one Markdown message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = self.method_url("sendMessage");
        let response = self
            .client
            .post(&url)
            .form(&[
                ("chat_id", chat_id.to_string()),
                ("text", text.to_string()),
                ("parse_mode", "Markdown".to_string()),
            ])
            .timeout(Duration::from_secs(20))
            .send()
            .await
            .context("sendMessage request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("sendMessage returned {}", response.status());
        }
        Ok(())
    }

    fn method_url(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.token)
    }
}
