//! Seams for transports the core never implements itself

use crate::core::types::UserId;
use crate::notifications::error::NotificationError;
use async_trait::async_trait;
use serde_json::Value;

/// Publishes transient payloads to named channels
///
/// The in-process [`LiveUpdateHub`](crate::notifications::LiveUpdateHub) is
/// the default implementation; a deployment fronting websockets or a message
/// broker supplies its own.
#[async_trait]
pub trait LiveUpdatePublisher: Send + Sync {
    async fn publish(&self, channel: &str, payload: Value) -> Result<(), NotificationError>;
}

/// Sends notification emails
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError>;
}

/// Resolves a user id to an email address, when one is known
pub trait UserDirectory: Send + Sync {
    fn email_for(&self, user: UserId) -> Option<String>;
}

/// Email sender that only logs; the default when no SMTP transport is wired
pub struct LogOnlyEmailSender;

#[async_trait]
impl EmailSender for LogOnlyEmailSender {
    async fn send_email(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        _body: &str,
    ) -> Result<(), NotificationError> {
        log::info!("Email {from} -> {to} suppressed (no transport configured): {subject}");
        Ok(())
    }
}

/// Directory that knows no addresses; email fanout becomes a no-op
pub struct NullUserDirectory;

impl UserDirectory for NullUserDirectory {
    fn email_for(&self, _user: UserId) -> Option<String> {
        None
    }
}
