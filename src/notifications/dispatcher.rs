//! Pending event consumption

use crate::core::error_handling::log_error_with_context;
use crate::core::time::Clock;
use crate::notifications::error::NotificationError;
use crate::notifications::event::PendingEvent;
use crate::notifications::inbox::NotificationInbox;
use crate::notifications::traits::{EmailSender, LiveUpdatePublisher, UserDirectory};
use std::sync::Arc;

const EMAIL_SUBJECT: &str = "Queue Notification";

/// Consumes the pending events a committed transition produced
///
/// In-app records are the mandatory step: a failure there propagates to the
/// caller. Live publishes and emails are best effort; their failures are
/// logged and never surface.
pub struct NotificationDispatcher {
    inbox: Arc<NotificationInbox>,
    publisher: Arc<dyn LiveUpdatePublisher>,
    email: Arc<dyn EmailSender>,
    directory: Arc<dyn UserDirectory>,
    from_address: String,
}

impl NotificationDispatcher {
    pub fn new(
        clock: Arc<dyn Clock>,
        publisher: Arc<dyn LiveUpdatePublisher>,
        email: Arc<dyn EmailSender>,
        directory: Arc<dyn UserDirectory>,
        from_address: String,
    ) -> Self {
        Self {
            inbox: Arc::new(NotificationInbox::new(clock)),
            publisher,
            email,
            directory,
            from_address,
        }
    }

    pub fn inbox(&self) -> &NotificationInbox {
        &self.inbox
    }

    /// Dispatch every event from one committed transition
    ///
    /// Events are independent of each other: every in-app record is attempted
    /// before any best-effort delivery, and a failure for one user never
    /// stops the records or deliveries owed to the rest. The first record
    /// failure is returned once the whole batch has been worked through.
    pub async fn dispatch(&self, events: Vec<PendingEvent>) -> Result<(), NotificationError> {
        let mut first_failure: Option<NotificationError> = None;
        for event in &events {
            if let PendingEvent::Notify {
                user_id, message, ..
            } = event
            {
                match self.inbox.create(*user_id, message) {
                    Ok(_) => log::debug!("Notification recorded for {user_id}"),
                    Err(e) => {
                        log_error_with_context(&e, &format!("notification record for {user_id}"));
                        first_failure.get_or_insert(e);
                    }
                }
            }
        }

        for event in &events {
            match event {
                PendingEvent::Live(update) => {
                    let channel = update.channel();
                    let payload = match serde_json::to_value(update) {
                        Ok(payload) => payload,
                        Err(e) => {
                            log::error!("Live update for '{channel}' not serializable: {e}");
                            continue;
                        }
                    };
                    if let Err(e) = self.publisher.publish(&channel, payload).await {
                        log_error_with_context(&e, &format!("live update on '{channel}'"));
                    }
                }
                PendingEvent::Notify {
                    user_id,
                    message,
                    email: true,
                    ..
                } => {
                    let Some(address) = self.directory.email_for(*user_id) else {
                        log::debug!("No email address known for {user_id}, skipping email");
                        continue;
                    };
                    if let Err(e) = self
                        .email
                        .send_email(&self.from_address, &address, EMAIL_SUBJECT, message)
                        .await
                    {
                        log_error_with_context(&e, &format!("email to {user_id}"));
                    }
                }
                PendingEvent::Notify { .. } => {}
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
