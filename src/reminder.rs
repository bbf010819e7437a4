// reminder.rs - One-shot Reminders
// Parses `10m` / `1h` style delays and delivers a mention to a channel once
// the delay has passed. Reminders live only in memory.

use crate::error::DelayError;
use crate::messenger::{truncate_message, MessageSink, OutgoingMessage};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serenity::model::id::{ChannelId, UserId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

static DELAY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)([A-Za-z]+)$").expect("Invalid delay regex pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayUnit {
    Minutes,
    Hours,
}

impl DelayUnit {
    fn seconds(self) -> u64 {
        match self {
            DelayUnit::Minutes => 60,
            DelayUnit::Hours => 60 * 60,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            DelayUnit::Minutes => "m",
            DelayUnit::Hours => "h",
        }
    }
}

/// A validated reminder delay such as `10m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderDelay {
    pub amount: u64,
    pub unit: DelayUnit,
    duration: Duration,
}

impl ReminderDelay {
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for ReminderDelay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

/// Parse a `<number><unit>` token where unit is `m` (minutes) or `h` (hours).
pub fn parse_delay(token: &str) -> Result<ReminderDelay, DelayError> {
    let captures = DELAY_PATTERN
        .captures(token.trim())
        .ok_or(DelayError::InvalidFormat)?;

    let amount: u64 = captures[1].parse().map_err(|_| DelayError::InvalidFormat)?;
    let unit = match &captures[2] {
        "m" => DelayUnit::Minutes,
        "h" => DelayUnit::Hours,
        _ => return Err(DelayError::InvalidUnit),
    };

    let seconds = amount
        .checked_mul(unit.seconds())
        .ok_or(DelayError::InvalidFormat)?;

    Ok(ReminderDelay {
        amount,
        unit,
        duration: Duration::from_secs(seconds),
    })
}

#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: UserId,
    pub channel_id: Option<ChannelId>,
    pub message: String,
    /// `None` when the delay is too large to represent as a timestamp
    pub fire_at: Option<DateTime<Utc>>,
}

impl Reminder {
    /// Mention plus message, cut to fit in one Discord message.
    pub fn content(&self) -> String {
        truncate_message(format!("<@{}>, reminder: {}", self.user_id.0, self.message))
    }
}

type PendingMap = HashMap<UserId, Vec<Reminder>>;

/// Schedules reminders. Several reminders for the same user may be pending
/// at once; each fires on its own and setting one never cancels another.
pub struct ReminderService {
    sink: Arc<dyn MessageSink>,
    pending: Arc<Mutex<PendingMap>>,
}

impl ReminderService {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self {
            sink,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn schedule(
        &self,
        user_id: UserId,
        delay: Duration,
        message: impl Into<String>,
        channel_id: Option<ChannelId>,
    ) -> Uuid {
        let fire_at = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|delay| Utc::now().checked_add_signed(delay));
        let reminder = Reminder {
            id: Uuid::new_v4(),
            user_id,
            channel_id,
            message: message.into(),
            fire_at,
        };
        let id = reminder.id;

        self.pending
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .push(reminder.clone());

        match reminder.fire_at {
            Some(fire_at) => log::info!(
                "Reminder {} for user {} scheduled at {}",
                id,
                user_id,
                fire_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => log::info!("Reminder {} for user {} scheduled", id, user_id),
        }

        let sink = Arc::clone(&self.sink);
        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            deliver(sink.as_ref(), &reminder).await;
            remove_pending(&pending, reminder.user_id, reminder.id).await;
        });

        id
    }

    #[cfg(test)]
    async fn pending_for(&self, user_id: UserId) -> usize {
        self.pending
            .lock()
            .await
            .get(&user_id)
            .map_or(0, Vec::len)
    }
}

async fn deliver(sink: &dyn MessageSink, reminder: &Reminder) {
    let Some(channel_id) = reminder.channel_id else {
        log::debug!("Reminder {} has no channel, skipping delivery", reminder.id);
        return;
    };

    let message = OutgoingMessage::new(channel_id, reminder.content());
    match sink.send(&message).await {
        Ok(()) => log::debug!("Reminder {} delivered to channel {}", reminder.id, channel_id),
        Err(e) => log::error!("Failed to deliver reminder {}: {}", reminder.id, e),
    }
}

async fn remove_pending(pending: &Mutex<PendingMap>, user_id: UserId, id: Uuid) {
    let mut pending = pending.lock().await;
    if let Some(reminders) = pending.get_mut(&user_id) {
        reminders.retain(|reminder| reminder.id != id);
        if reminders.is_empty() {
            pending.remove(&user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messenger::testing::RecordingSink;

    #[test]
    fn test_parse_minutes_and_hours() {
        let delay = parse_delay("10m").unwrap();
        assert_eq!(delay.duration().as_millis(), 600_000);
        assert_eq!(delay.to_string(), "10m");

        let delay = parse_delay("1h").unwrap();
        assert_eq!(delay.duration().as_millis(), 3_600_000);
        assert_eq!(delay.unit, DelayUnit::Hours);
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert_eq!(parse_delay("10x"), Err(DelayError::InvalidUnit));
        assert_eq!(parse_delay("5M"), Err(DelayError::InvalidUnit));
        assert_eq!(parse_delay("10"), Err(DelayError::InvalidFormat));
        assert_eq!(parse_delay("m"), Err(DelayError::InvalidFormat));
        assert_eq!(parse_delay("-5m"), Err(DelayError::InvalidFormat));
        assert_eq!(parse_delay("1.5h"), Err(DelayError::InvalidFormat));
        assert_eq!(parse_delay("99999999999999999999m"), Err(DelayError::InvalidFormat));
    }

    #[test]
    fn test_reminder_content() {
        let reminder = Reminder {
            id: Uuid::new_v4(),
            user_id: UserId(42),
            channel_id: Some(ChannelId(1)),
            message: "stretch".to_string(),
            fire_at: Some(Utc::now()),
        };
        assert_eq!(reminder.content(), "<@42>, reminder: stretch");
    }

    #[test]
    fn test_long_reminder_content_fits_one_message() {
        let reminder = Reminder {
            id: Uuid::new_v4(),
            user_id: UserId(42),
            channel_id: Some(ChannelId(1)),
            message: "x".repeat(3000),
            fire_at: None,
        };
        let content = reminder.content();
        assert_eq!(content.chars().count(), crate::messenger::MAX_MESSAGE_LENGTH);
        assert!(content.starts_with("<@42>, reminder: xxx"));
        assert!(content.ends_with('…'));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_fires_after_delay() {
        let sink = Arc::new(RecordingSink::default());
        let service = ReminderService::new(sink.clone());
        let delay = parse_delay("10m").unwrap().duration();

        service
            .schedule(UserId(42), delay, "take a break", Some(ChannelId(9)))
            .await;
        assert_eq!(service.pending_for(UserId(42)).await, 1);

        tokio::time::sleep(Duration::from_secs(599)).await;
        assert!(sink.contents().await.is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let sent = sink.sent.lock().await.clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].channel_id, ChannelId(9));
        assert_eq!(sent[0].content, "<@42>, reminder: take a break");
        assert_eq!(service.pending_for(UserId(42)).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_reminder_does_not_cancel_first() {
        let sink = Arc::new(RecordingSink::default());
        let service = ReminderService::new(sink.clone());

        service
            .schedule(UserId(5), Duration::from_secs(60 * 60), "later", Some(ChannelId(1)))
            .await;
        service
            .schedule(UserId(5), Duration::from_secs(10 * 60), "sooner", Some(ChannelId(1)))
            .await;
        assert_eq!(service.pending_for(UserId(5)).await, 2);

        tokio::time::sleep(Duration::from_secs(11 * 60)).await;
        assert_eq!(sink.contents().await, vec!["<@5>, reminder: sooner"]);
        assert_eq!(service.pending_for(UserId(5)).await, 1);

        tokio::time::sleep(Duration::from_secs(50 * 60)).await;
        assert_eq!(
            sink.contents().await,
            vec!["<@5>, reminder: sooner", "<@5>, reminder: later"]
        );
        assert_eq!(service.pending_for(UserId(5)).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_channel_skips_delivery() {
        let sink = Arc::new(RecordingSink::default());
        let service = ReminderService::new(sink.clone());

        service
            .schedule(UserId(3), Duration::from_secs(60), "nowhere", None)
            .await;
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(sink.contents().await.is_empty());
        assert_eq!(service.pending_for(UserId(3)).await, 0);
    }
}
