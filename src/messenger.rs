use crate::error::DeliveryError;
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;

/// Discord rejects messages longer than this.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Cut `content` to Discord's message limit on a character boundary.
pub fn truncate_message(content: String) -> String {
    if content.chars().count() <= MAX_MESSAGE_LENGTH {
        return content;
    }
    let mut truncated: String = content.chars().take(MAX_MESSAGE_LENGTH - 1).collect();
    truncated.push('…');
    truncated
}

/// A message about to be sent to a channel. Send hooks may rewrite `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub channel_id: ChannelId,
    pub content: String,
}

impl OutgoingMessage {
    pub fn new(channel_id: ChannelId, content: impl Into<String>) -> Self {
        Self {
            channel_id,
            content: content.into(),
        }
    }
}

/// Delivers plain text messages to channels.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DeliveryError>;
}

/// Sends through Discord's REST API.
pub struct HttpMessenger {
    http: Arc<Http>,
}

impl HttpMessenger {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MessageSink for HttpMessenger {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        let content = truncate_message(message.content.clone());
        message.channel_id.say(&self.http, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_message() {
        let short = "hello".to_string();
        assert_eq!(truncate_message(short.clone()), short);

        let exact = "a".repeat(MAX_MESSAGE_LENGTH);
        assert_eq!(truncate_message(exact.clone()), exact);

        let long = "é".repeat(MAX_MESSAGE_LENGTH + 10);
        let truncated = truncate_message(long);
        assert_eq!(truncated.chars().count(), MAX_MESSAGE_LENGTH);
        assert!(truncated.ends_with('…'));
    }
}
