//! Command routing between a channel and the report service.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, warn};

use crate::channels::{Channel, IncomingMessage, OutgoingResponse};
use crate::error::ChannelError;
use crate::messages;
use crate::report::ReportService;

/// What an inbound message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/help`: show the submission format.
    Start,
    /// `/chatid`: tell the chat its id.
    ChatId,
    /// `/отчет` or `/report`: publish the summary now.
    Report,
    /// Anything else: a report submission when sent privately.
    Text(String),
}

impl Command {
    /// Parse message content. Commands are case-insensitive and may carry
    /// an `@botname` suffix; arguments after a command are ignored.
    pub fn parse(content: &str) -> Self {
        let trimmed = content.trim();
        if !trimmed.starts_with('/') {
            return Command::Text(content.to_string());
        }

        let word = trimmed.split_whitespace().next().unwrap_or(trimmed);
        let name = word.split('@').next().unwrap_or(word).to_lowercase();

        match name.as_str() {
            "/start" | "/help" => Command::Start,
            "/chatid" => Command::ChatId,
            "/отчет" | "/отчёт" | "/report" => Command::Report,
            _ => Command::Text(content.to_string()),
        }
    }
}

/// Routes messages to the report service and builds the replies.
pub struct ReportBot {
    service: Arc<ReportService>,
    publish_time: String,
}

impl ReportBot {
    /// `publish_time` is the `HH:MM` shown in the greeting and the
    /// submission acknowledgement.
    pub fn new(service: Arc<ReportService>, publish_time: impl Into<String>) -> Self {
        Self {
            service,
            publish_time: publish_time.into(),
        }
    }

    pub fn service(&self) -> &Arc<ReportService> {
        &self.service
    }

    /// Handle one message and return the reply, if any.
    pub async fn handle(&self, msg: &IncomingMessage) -> Option<String> {
        match Command::parse(&msg.content) {
            Command::Start => Some(messages::with_time(messages::GREETING, &self.publish_time)),
            Command::ChatId => Some(messages::chat_id(&msg.chat_id)),
            Command::Report => match self.service.publish().await {
                Ok(_) => Some(messages::REPORT_SENT.to_string()),
                Err(e) => {
                    warn!(user = %msg.user_id, "Manual publish failed: {}", e);
                    Some(messages::REPORT_FAILED.to_string())
                }
            },
            Command::Text(text) => {
                if !msg.chat_kind.is_private() {
                    debug!(chat = %msg.chat_id, "Ignoring non-command group message");
                    return None;
                }
                match self.service.submit(&text).await {
                    Ok(_) => Some(messages::with_time(messages::SAVED, &self.publish_time)),
                    Err(_) => Some(messages::FORMAT_INVALID.to_string()),
                }
            }
        }
    }
}

/// Consume the channel's message stream until it ends.
///
/// Submissions are stored in stream order, so a correction sent right after
/// the original always wins. Only publishes, which wait on delivery, and the
/// replies run on their own tasks.
pub async fn run(channel: Arc<dyn Channel>, bot: Arc<ReportBot>) -> Result<(), ChannelError> {
    let mut stream = channel.start().await?;

    while let Some(msg) = stream.next().await {
        let channel = Arc::clone(&channel);

        if Command::parse(&msg.content) == Command::Report {
            let bot = Arc::clone(&bot);
            tokio::spawn(async move {
                if let Some(reply) = bot.handle(&msg).await {
                    reply_to(channel.as_ref(), &msg, reply).await;
                }
            });
            continue;
        }

        if let Some(reply) = bot.handle(&msg).await {
            tokio::spawn(async move {
                reply_to(channel.as_ref(), &msg, reply).await;
            });
        }
    }

    tracing::info!(channel = channel.name(), "Message stream ended");
    Ok(())
}

async fn reply_to(channel: &dyn Channel, msg: &IncomingMessage, reply: String) {
    if let Err(e) = channel.respond(msg, OutgoingResponse::text(reply)).await {
        warn!(channel = channel.name(), chat = %msg.chat_id, "Failed to reply: {}", e);
    }
}
