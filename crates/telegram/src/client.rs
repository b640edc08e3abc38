use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use share_config::{ChatId, Credentials, TelegramConfig};
use share_core::{Result, ShareError};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Minimal Telegram Bot API client: just enough to post a photo and a text.
///
/// The token is part of every request URL, so it is kept out of `Debug`
/// output and stripped from transport errors.
#[derive(Clone)]
pub struct TelegramBot {
    /// `{api_base}/bot{token}`.
    base: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot").finish_non_exhaustive()
    }
}

/// Envelope wrapped around every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
}

impl TelegramBot {
    pub fn new(token: &str, api_base: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShareError::Telegram(format!("HTTP client: {e}")))?;

        Ok(Self {
            base: format!("{}/bot{token}", api_base.trim_end_matches('/')),
            client,
        })
    }

    /// Build a client from the credentials file and `[telegram]` settings.
    pub fn from_config(creds: &Credentials, cfg: &TelegramConfig) -> Result<Self> {
        Self::new(&creds.token, &cfg.api_base, Duration::from_secs(cfg.timeout_secs))
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base)
    }

    /// Upload the PNG at `path` to `chat_id`.
    pub async fn send_photo(&self, chat_id: &ChatId, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ShareError::Telegram(format!("cannot read '{}': {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "plot.png".to_string(), |n| n.to_string_lossy().into_owned());

        debug!("Uploading {} bytes as '{file_name}'", bytes.len());

        let photo = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/png")
            .map_err(transport_err)?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", photo);

        let resp = self
            .client
            .post(self.url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_err)?;

        check("sendPhoto", resp).await?;
        info!("Photo delivered to chat {chat_id}");
        Ok(())
    }

    /// Post a plain-text message to `chat_id`.
    pub async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.url("sendMessage"))
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            .map_err(transport_err)?;

        check("sendMessage", resp).await?;
        info!("Message delivered to chat {chat_id}");
        Ok(())
    }
}

/// Turn a non-2xx status or `"ok": false` into an error carrying the API's description.
async fn check(method: &str, resp: reqwest::Response) -> Result<()> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport_err)?;

    match serde_json::from_str::<ApiResponse>(&body) {
        Ok(api) if api.ok && status.is_success() => Ok(()),
        Ok(api) => Err(ShareError::Telegram(format!(
            "{method} failed ({}): {}",
            api.error_code.map_or_else(|| status.as_u16().to_string(), |c| c.to_string()),
            api.description.as_deref().unwrap_or("no description"),
        ))),
        Err(_) => Err(ShareError::Telegram(format!(
            "{method} failed ({status}): {}",
            body.chars().take(200).collect::<String>()
        ))),
    }
}

fn transport_err(e: reqwest::Error) -> ShareError {
    ShareError::Telegram(e.without_url().to_string())
}
