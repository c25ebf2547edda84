//! Error types for the notification fanout

use crate::core::types::NotificationId;
use std::fmt;

#[derive(Debug, Clone)]
pub enum NotificationError {
    ChannelClosed(String),
    PublishFailed {
        channel: String,
        dropped_subscribers: Vec<String>,
    },
    RecordFailed(String),
    RecordNotFound {
        id: NotificationId,
    },
    EmailFailed(String),
}

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationError::ChannelClosed(channel) => {
                write!(f, "Channel closed: {channel}")
            }
            NotificationError::PublishFailed {
                channel,
                dropped_subscribers,
            } => {
                write!(
                    f,
                    "Dropped {} closed subscribers while publishing to '{}': {:?}",
                    dropped_subscribers.len(),
                    channel,
                    dropped_subscribers
                )
            }
            NotificationError::RecordFailed(msg) => {
                write!(f, "Failed to persist notification record: {msg}")
            }
            NotificationError::RecordNotFound { id } => {
                write!(f, "Notification not found: {id}")
            }
            NotificationError::EmailFailed(msg) => {
                write!(f, "Email sending failed: {msg}")
            }
        }
    }
}

impl std::error::Error for NotificationError {}

impl crate::core::error_handling::ContextualError for NotificationError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, NotificationError::RecordNotFound { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            NotificationError::RecordNotFound { .. } => Some("Notification not found."),
            _ => None,
        }
    }
}
