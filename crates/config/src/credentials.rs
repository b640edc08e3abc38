use serde::{Deserialize, Serialize};
use share_core::{Result, ShareError};
use std::fmt;
use std::path::Path;

/// Target chat: a numeric id or a `@channelusername`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Name(String),
}

impl ChatId {
    fn is_blank(&self) -> bool {
        matches!(self, Self::Name(s) if s.trim().is_empty())
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Bot credentials, read from the JSON file passed with `--config`.
///
/// ```json
/// { "token": "123456:ABC...", "chatID": "-100123456789" }
/// ```
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub token: String,
    #[serde(rename = "chatID")]
    pub chat_id: ChatId,
}

// Keep the token out of `{:?}` output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Load and validate the credentials file.
pub fn load_credentials(path: impl AsRef<Path>) -> Result<Credentials> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ShareError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let creds: Credentials = serde_json::from_str(&raw)
        .map_err(|e| ShareError::Config(format!("JSON parse error in '{}': {e}", path.display())))?;

    if creds.token.trim().is_empty() {
        return Err(ShareError::Config("credentials: `token` is empty".into()));
    }
    if creds.chat_id.is_blank() {
        return Err(ShareError::Config("credentials: `chatID` is empty".into()));
    }

    Ok(creds)
}
