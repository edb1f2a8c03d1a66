//! Core types for the conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque reference to a media file (path or URL handed over by a
/// capture collaborator or returned by the service).
pub type MediaRef = String;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Delivery status of a message.
///
/// At most one message per conversation log may be `Pending` - that
/// entry is the assistant "typing" placeholder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Pending,
    #[default]
    None,
}

/// Message payload, discriminated by kind.
///
/// Exactly one payload is populated per message; the variant carries it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum MessageBody {
    Text(String),
    Image(MediaRef),
    Audio(MediaRef),
}

impl MessageBody {
    /// The text content, when this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The media reference, when this is an image or audio message.
    pub fn media_ref(&self) -> Option<&str> {
        match self {
            Self::Image(r) | Self::Audio(r) => Some(r),
            Self::Text(_) => None,
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID, stable for the message's lifetime
    pub id: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Kind-discriminated payload
    #[serde(flatten)]
    pub body: MessageBody,
    /// When the message was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Delivery status
    #[serde(default)]
    pub status: MessageStatus,
}

impl Message {
    fn new(id: String, role: MessageRole, body: MessageBody, status: MessageStatus) -> Self {
        Self {
            id,
            role,
            body,
            created_at: Utc::now(),
            status,
        }
    }

    /// Create a user text message, marked sent.
    pub fn user_text(id: String, content: impl Into<String>) -> Self {
        Self::new(
            id,
            MessageRole::User,
            MessageBody::Text(content.into()),
            MessageStatus::Sent,
        )
    }

    /// Create a user image message, marked sent.
    pub fn user_image(id: String, src: impl Into<MediaRef>) -> Self {
        Self::new(
            id,
            MessageRole::User,
            MessageBody::Image(src.into()),
            MessageStatus::Sent,
        )
    }

    /// Create a user audio message, marked sent.
    pub fn user_audio(id: String, src: impl Into<MediaRef>) -> Self {
        Self::new(
            id,
            MessageRole::User,
            MessageBody::Audio(src.into()),
            MessageStatus::Sent,
        )
    }

    /// Create an assistant text message.
    pub fn assistant_text(id: String, content: impl Into<String>) -> Self {
        Self::new(
            id,
            MessageRole::Assistant,
            MessageBody::Text(content.into()),
            MessageStatus::None,
        )
    }

    /// Create an assistant image message.
    pub fn assistant_image(id: String, src: impl Into<MediaRef>) -> Self {
        Self::new(
            id,
            MessageRole::Assistant,
            MessageBody::Image(src.into()),
            MessageStatus::None,
        )
    }

    /// Create the assistant "typing" placeholder.
    pub fn typing(id: String, indicator: impl Into<String>) -> Self {
        Self::new(
            id,
            MessageRole::Assistant,
            MessageBody::Text(indicator.into()),
            MessageStatus::Pending,
        )
    }

    /// Whether this message is the typing placeholder.
    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }

    /// Creation time formatted for display (hour:minute).
    pub fn display_time(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}
