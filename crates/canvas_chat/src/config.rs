//! Pipeline configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ChatResult;

/// Configuration for the composition and delivery pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatConfig {
    /// Maximum length of the normalized draft text, in characters.
    pub max_text_chars: usize,
    /// Maximum number of images that may be staged at once.
    pub max_staged_images: usize,
    /// Gateway round-trip timeout, in seconds.
    pub request_timeout_secs: u64,
    /// Body text of the assistant "typing" placeholder.
    pub typing_indicator: String,
    /// Body text of the in-conversation failure message.
    pub failure_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 500,
            max_staged_images: 6,
            request_timeout_secs: 30,
            typing_indicator: "Thinking…".to_string(),
            failure_reply: "Something went wrong, please try again.".to_string(),
        }
    }
}

impl ChatConfig {
    /// Load configuration from a JSON file. Missing fields fall back to
    /// their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ChatResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// The gateway round-trip timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
