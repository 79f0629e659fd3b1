//! Record of reminder sends, consulted before offering to send again.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendChannel {
    Email,
    Whatsapp,
}

impl SendChannel {
    pub fn label(&self) -> &'static str {
        match self {
            SendChannel::Email => "email",
            SendChannel::Whatsapp => "whatsapp",
        }
    }
}

/// One delivered reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSend {
    pub channel: SendChannel,
    pub sent_at: DateTime<Utc>,
}

/// Whether a client has been reminded recently, and over which channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Pending,
    EmailSent,
    WhatsappSent,
}

impl SendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SendStatus::Pending => "pending",
            SendStatus::EmailSent => "email sent",
            SendStatus::WhatsappSent => "whatsapp sent",
        }
    }
}

/// Summarize a client's send history over the recency window.
/// An email send outranks a whatsapp send; anything older than the window
/// does not count.
pub fn send_status(history: &[AlertSend], now_utc: DateTime<Utc>, window_days: i64) -> SendStatus {
    let cutoff = now_utc - Duration::days(window_days);
    let recent: Vec<&AlertSend> = history.iter().filter(|s| s.sent_at >= cutoff).collect();

    if recent.is_empty() {
        SendStatus::Pending
    } else if recent.iter().any(|s| s.channel == SendChannel::Email) {
        SendStatus::EmailSent
    } else {
        SendStatus::WhatsappSent
    }
}
