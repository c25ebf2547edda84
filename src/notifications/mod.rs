//! Notification Fanout
//!
//! Every externally visible entry transition produces side effects through
//! this module, after the authoritative transition has committed:
//!
//! 1. an in-app [`Notification`] record is persisted: the one mandatory
//!    step, whose failure surfaces to the triggering operation,
//! 2. a transient live-update payload is published to the service point's
//!    channel for connected viewers, with failures swallowed and logged,
//! 3. an email send is attempted through the [`EmailSender`] seam, with
//!    failures swallowed and logged.
//!
//! The state machine never performs fanout itself: it returns
//! [`PendingEvent`] descriptors and the [`NotificationDispatcher`] consumes
//! them, so state machine correctness is testable without any network or
//! email dependency.

pub mod api;
mod dispatcher;
mod error;
mod event;
mod hub;
mod inbox;
mod traits;

pub use dispatcher::NotificationDispatcher;
pub use error::NotificationError;
pub use event::{channel_for, LiveUpdate, Notification, PendingEvent};
pub use hub::LiveUpdateHub;
pub use inbox::NotificationInbox;
pub use traits::{
    EmailSender, LiveUpdatePublisher, LogOnlyEmailSender, NullUserDirectory, UserDirectory,
};
