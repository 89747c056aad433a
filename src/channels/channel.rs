//! Transport-neutral message types and the `Channel` trait.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use uuid::Uuid;

use crate::error::ChannelError;
use crate::i18n::{Keyboard, RenderedReply};

/// Stream of inbound messages produced by a channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// Structured content attached to a message instead of (or besides) text.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundPayload {
    /// A shared contact card.
    Contact { phone: Option<String> },
    /// A shared GPS position.
    Location { latitude: f64, longitude: f64 },
}

/// A message received from a channel.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Name of the channel that produced it.
    pub channel: String,
    /// Stable sender identifier on that channel.
    pub user_id: String,
    pub content: String,
    pub payload: Option<InboundPayload>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    /// Channel-specific routing data, e.g. Telegram's `chat_id`.
    pub metadata: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(
        channel: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.into(),
            user_id: user_id.into(),
            content: content.into(),
            payload: None,
            first_name: None,
            last_name: None,
            username: None,
            metadata: serde_json::Value::Null,
            received_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_payload(mut self, payload: InboundPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// A rendered reply on its way out.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingResponse {
    pub text: String,
    pub keyboard: Keyboard,
}

impl OutgoingResponse {
    /// Plain text that leaves the current keyboard alone.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Unchanged,
        }
    }
}

impl From<RenderedReply> for OutgoingResponse {
    fn from(reply: RenderedReply) -> Self {
        Self {
            text: reply.text,
            keyboard: reply.keyboard,
        }
    }
}

/// A conversation transport.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Begin receiving messages.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Reply to the sender of `msg`.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    async fn health_check(&self) -> Result<(), ChannelError>;

    async fn shutdown(&self) -> Result<(), ChannelError>;
}
