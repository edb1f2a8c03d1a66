//! HTTP implementation of the transport gateway.
//!
//! Delivers the multi-part payload to the chat service as a multipart form
//! and parses the JSON reply. One request per send operation, no automatic
//! retry - retry is user-initiated via a fresh send.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::gateway::{Attachment, GatewayReply, OutboundPayload, TransportError, TransportGateway};

/// Gateway speaking the chat service's multipart HTTP contract.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway for the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn file_part(attachment: &Attachment) -> Result<Part, TransportError> {
        let bytes = tokio::fs::read(&attachment.source)
            .await
            .map_err(|e| TransportError::Transport(format!("Failed to read attachment: {}", e)))?;
        let file_name = Path::new(&attachment.source)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment")
            .to_string();
        Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&attachment.media_type)
            .map_err(|e| TransportError::Transport(format!("Invalid media type: {}", e)))
    }

    async fn build_form(payload: OutboundPayload) -> Result<Form, TransportError> {
        let mut form = Form::new();
        if let Some(text) = payload.text {
            form = form.text("text", text);
        }
        for image in &payload.images {
            form = form.part("images", Self::file_part(image).await?);
        }
        if let Some(ref audio) = payload.audio {
            form = form.part("audio", Self::file_part(audio).await?);
        }
        Ok(form)
    }
}

#[async_trait]
impl TransportGateway for HttpGateway {
    async fn deliver(
        &self,
        payload: OutboundPayload,
        timeout: Duration,
    ) -> Result<GatewayReply, TransportError> {
        let url = format!("{}/api/v1/chat/messages", self.base_url);
        let form = Self::build_form(payload).await?;

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        secs: timeout.as_secs(),
                    }
                } else {
                    TransportError::Transport(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let wire: WireReply = response
            .json()
            .await
            .map_err(|e| TransportError::Transport(format!("Failed to parse reply: {}", e)))?;

        Ok(GatewayReply {
            reply_text: wire.reply,
            generated_image: wire.image_url,
        })
    }
}

// Wire format of the chat service reply
#[derive(Debug, Deserialize)]
struct WireReply {
    reply: Option<String>,
    image_url: Option<String>,
}
