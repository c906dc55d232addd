//! Channel trait and message types shared by all transports.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChannelError;

/// Stream of inbound messages produced by [`Channel::start`].
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// Kind of chat a message arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Parse the Bot API `chat.type` value.
    pub fn from_api(kind: &str) -> Option<Self> {
        match kind {
            "private" => Some(Self::Private),
            "group" => Some(Self::Group),
            "supergroup" => Some(Self::Supergroup),
            "channel" => Some(Self::Channel),
            _ => None,
        }
    }

    pub fn is_private(self) -> bool {
        self == Self::Private
    }
}

/// A message received from a channel.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Name of the channel that produced the message.
    pub channel: String,
    /// Sender identity as reported by the channel.
    pub user_id: String,
    /// Display name, when the channel knows one.
    pub user_name: Option<String>,
    /// Chat the message was posted in; replies go here.
    pub chat_id: String,
    pub chat_kind: ChatKind,
    pub content: String,
    /// Channel-specific extras.
    pub metadata: serde_json::Value,
}

impl IncomingMessage {
    /// A private-chat message where the chat id equals the sender id.
    pub fn new(channel: &str, user_id: &str, content: &str) -> Self {
        Self {
            channel: channel.to_string(),
            user_id: user_id.to_string(),
            user_name: None,
            chat_id: user_id.to_string(),
            chat_kind: ChatKind::Private,
            content: content.to_string(),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn in_chat(mut self, chat_id: &str, kind: ChatKind) -> Self {
        self.chat_id = chat_id.to_string();
        self.chat_kind = kind;
        self
    }

    pub fn with_user_name(mut self, name: &str) -> Self {
        self.user_name = Some(name.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A reply to an inbound message.
#[derive(Debug, Clone)]
pub struct OutgoingResponse {
    pub content: String,
}

impl OutgoingResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A message transport.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Start receiving messages.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Reply in the chat the message came from.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    /// Post to an arbitrary chat, e.g. the branch group.
    ///
    /// `Ok` means the transport accepted the message for delivery.
    async fn send_to(&self, chat_id: &str, content: &str) -> Result<(), ChannelError>;

    async fn health_check(&self) -> Result<(), ChannelError>;

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_kind_from_api() {
        assert_eq!(ChatKind::from_api("private"), Some(ChatKind::Private));
        assert_eq!(ChatKind::from_api("supergroup"), Some(ChatKind::Supergroup));
        assert_eq!(ChatKind::from_api("secret"), None);
        assert!(ChatKind::Private.is_private());
        assert!(!ChatKind::Group.is_private());
    }

    #[test]
    fn new_message_defaults_to_private_chat() {
        let msg = IncomingMessage::new("telegram", "42", "hi");
        assert_eq!(msg.chat_id, "42");
        assert!(msg.chat_kind.is_private());
    }

    #[test]
    fn in_chat_overrides_destination() {
        let msg = IncomingMessage::new("telegram", "42", "hi").in_chat("-100500", ChatKind::Group);
        assert_eq!(msg.chat_id, "-100500");
        assert_eq!(msg.chat_kind, ChatKind::Group);
    }
}
