//! Transport gateway boundary: payload, reply and failure taxonomy.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MediaRef;

/// Classified failures at the transport boundary.
///
/// All three are folded into the same user-visible failure message by the
/// send coordinator, but the classification is preserved here for logging
/// and for callers that want to differentiate.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The round trip exceeded the configured bound.
    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The request could not be completed (connectivity, payload rejected
    /// before transmission, malformed reply).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response was received but signaled non-success.
    #[error("Service error {status}: {body}")]
    Service { status: u16, body: String },
}

/// A media attachment: a byte source plus its declared media type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// File-path-like token handed over by a capture collaborator.
    pub source: MediaRef,
    /// Declared media type, guessed from the file extension.
    #[serde(rename = "mediaType")]
    pub media_type: String,
}

impl Attachment {
    /// Build an attachment from a media reference, guessing the media type.
    pub fn from_ref(source: impl Into<MediaRef>) -> Self {
        let source = source.into();
        let media_type = guess_media_type(&source).to_string();
        Self { source, media_type }
    }
}

/// The structured multi-part body of one send operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutboundPayload {
    /// Normalized draft text, when non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Image attachments, in selection order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Attachment>,
    /// The recorded audio clip, if one was staged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Attachment>,
}

/// Parsed service reply. Both fields are independently optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayReply {
    /// Textual reply, resolves the typing placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_text: Option<String>,
    /// Generated-image reference, appended after the text reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<MediaRef>,
}

/// Capability to deliver one multi-part payload and get back a structured
/// reply or a classified failure. One attempt per call, no automatic retry.
#[async_trait]
pub trait TransportGateway: Send + Sync {
    async fn deliver(
        &self,
        payload: OutboundPayload,
        timeout: Duration,
    ) -> Result<GatewayReply, TransportError>;
}

#[async_trait]
impl<T: TransportGateway + ?Sized> TransportGateway for std::sync::Arc<T> {
    async fn deliver(
        &self,
        payload: OutboundPayload,
        timeout: Duration,
    ) -> Result<GatewayReply, TransportError> {
        (**self).deliver(payload, timeout).await
    }
}

/// Guess a media type from a file extension.
pub fn guess_media_type(source: &str) -> &'static str {
    let ext = Path::new(source)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type("a/b/photo.JPG"), "image/jpeg");
        assert_eq!(guess_media_type("shot.png"), "image/png");
        assert_eq!(guess_media_type("clip.m4a"), "audio/mp4");
        assert_eq!(guess_media_type("voice.wav"), "audio/wav");
        assert_eq!(guess_media_type("mystery"), "application/octet-stream");
    }

    #[test]
    fn test_attachment_from_ref() {
        let att = Attachment::from_ref("tmp/pic.webp");
        assert_eq!(att.source, "tmp/pic.webp");
        assert_eq!(att.media_type, "image/webp");
    }

    #[test]
    fn test_error_display_is_classified() {
        let timeout = TransportError::Timeout { secs: 30 };
        assert!(timeout.to_string().contains("30s"));

        let service = TransportError::Service {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert!(service.to_string().contains("503"));
    }
}
