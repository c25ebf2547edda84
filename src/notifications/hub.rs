//! In-process live-update channels

use crate::core::sync::handle_rwlock_write;
use crate::notifications::error::NotificationError;
use crate::notifications::traits::LiveUpdatePublisher;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::mpsc;

struct ChannelSubscriber {
    id: String,
    sender: mpsc::UnboundedSender<Value>,
}

/// Fans live-update payloads out to per-channel subscribers
///
/// Subscribers are identified by caller-chosen ids; re-subscribing with the
/// same id on the same channel replaces the previous receiver. Payloads are
/// not buffered for absent subscribers.
pub struct LiveUpdateHub {
    channels: RwLock<HashMap<String, Vec<ChannelSubscriber>>>,
}

impl LiveUpdateHub {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe to a channel, receiving every payload published after this
    /// call returns
    pub fn subscribe(
        &self,
        channel: &str,
        subscriber_id: &str,
    ) -> Result<mpsc::UnboundedReceiver<Value>, NotificationError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut channels =
            handle_rwlock_write(self.channels.write(), NotificationError::ChannelClosed)?;
        let subscribers = channels.entry(channel.to_string()).or_default();
        if let Some(existing) = subscribers
            .iter_mut()
            .find(|subscriber| subscriber.id == subscriber_id)
        {
            log::warn!("Replacing subscriber '{subscriber_id}' on channel '{channel}'");
            existing.sender = sender;
        } else {
            subscribers.push(ChannelSubscriber {
                id: subscriber_id.to_string(),
                sender,
            });
        }
        log::trace!("Subscriber '{subscriber_id}' attached to channel '{channel}'");
        Ok(receiver)
    }

    /// Remove one subscriber; silently ignores ids that are not attached
    pub fn unsubscribe(&self, channel: &str, subscriber_id: &str) -> Result<(), NotificationError> {
        let mut channels =
            handle_rwlock_write(self.channels.write(), NotificationError::ChannelClosed)?;
        if let Some(subscribers) = channels.get_mut(channel) {
            subscribers.retain(|subscriber| subscriber.id != subscriber_id);
            if subscribers.is_empty() {
                channels.remove(channel);
            }
        }
        Ok(())
    }

    /// Number of live subscribers on a channel
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .map(|channels| channels.get(channel).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl Default for LiveUpdateHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveUpdatePublisher for LiveUpdateHub {
    /// Deliver a payload to every live subscriber of the channel
    ///
    /// Subscribers whose receivers were dropped are pruned during the
    /// publish; their ids are reported in the error so callers can log them,
    /// but delivery to the remaining subscribers has already happened.
    async fn publish(&self, channel: &str, payload: Value) -> Result<(), NotificationError> {
        let mut channels =
            handle_rwlock_write(self.channels.write(), NotificationError::ChannelClosed)?;
        let Some(subscribers) = channels.get_mut(channel) else {
            log::trace!("No subscribers on channel '{channel}', payload dropped");
            return Ok(());
        };

        let mut dropped = Vec::new();
        subscribers.retain(|subscriber| {
            if subscriber.sender.send(payload.clone()).is_ok() {
                true
            } else {
                dropped.push(subscriber.id.clone());
                false
            }
        });
        if subscribers.is_empty() {
            channels.remove(channel);
        }

        if dropped.is_empty() {
            Ok(())
        } else {
            Err(NotificationError::PublishFailed {
                channel: channel.to_string(),
                dropped_subscribers: dropped,
            })
        }
    }
}
