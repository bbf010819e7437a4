// center.rs - Shared Bot State
// Everything the event handler and slash commands need, stored once in the
// client's TypeMap.

use crate::custom_commands::{ConfigStore, CustomCommandsService};
use crate::lookup::{Endpoints, LookupClient};
use crate::messenger::{MessageSink, OutgoingMessage};
use crate::reminder::ReminderService;
use serenity::prelude::TypeMapKey;
use std::sync::Arc;

pub struct CommandCenter {
    pub custom_commands: CustomCommandsService,
    pub reminders: ReminderService,
    pub lookup: LookupClient,
    pub messenger: Arc<dyn MessageSink>,
}

impl CommandCenter {
    pub fn new(store: Box<dyn ConfigStore>, messenger: Arc<dyn MessageSink>, endpoints: Endpoints) -> Self {
        Self {
            custom_commands: CustomCommandsService::new(store),
            reminders: ReminderService::new(Arc::clone(&messenger)),
            lookup: LookupClient::new(endpoints),
            messenger,
        }
    }

    /// Send the custom command response for `message`, if it invokes one.
    /// Returns whether a response went out.
    pub async fn relay_custom_command(&self, message: &OutgoingMessage) -> bool {
        let mut outgoing = message.clone();
        if !self.custom_commands.intercept(&mut outgoing).await {
            return false;
        }

        match self.messenger.send(&outgoing).await {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "❌ Failed to send custom command response to channel {}: {}",
                    outgoing.channel_id,
                    e
                );
                false
            }
        }
    }
}

pub struct CommandCenterKey;

impl TypeMapKey for CommandCenterKey {
    type Value = Arc<CommandCenter>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_commands::JsonFileStore;
    use crate::messenger::testing::RecordingSink;
    use serenity::model::id::ChannelId;

    async fn center_with_sink(dir: &std::path::Path) -> (CommandCenter, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let center = CommandCenter::new(
            Box::new(JsonFileStore::in_dir(dir)),
            sink.clone(),
            Endpoints::default(),
        );
        center.custom_commands.load().await;
        (center, sink)
    }

    #[tokio::test]
    async fn test_custom_command_response_is_sent_to_same_channel() {
        let dir = tempfile::tempdir().unwrap();
        let (center, sink) = center_with_sink(dir.path()).await;

        let message = OutgoingMessage::new(ChannelId(12), "./bye see you");
        assert!(center.relay_custom_command(&message).await);

        let sent = sink.sent.lock().await.clone();
        assert_eq!(sent, vec![OutgoingMessage::new(ChannelId(12), "Goodbye, cruel world!")]);
        assert_eq!(message.content, "./bye see you");
    }

    #[tokio::test]
    async fn test_plain_messages_send_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (center, sink) = center_with_sink(dir.path()).await;

        for content in ["hello", "./nope", " ./hello", "say ./hello"] {
            let message = OutgoingMessage::new(ChannelId(12), content);
            assert!(!center.relay_custom_command(&message).await);
        }
        assert!(sink.contents().await.is_empty());
    }
}
