//! Public API for the notification fanout

use crate::core::config::QueueFlowConfig;
use crate::core::time::SystemClock;
use crate::notifications::dispatcher::NotificationDispatcher;
use crate::notifications::hub::LiveUpdateHub;
use crate::notifications::traits::{LogOnlyEmailSender, NullUserDirectory};
use std::sync::{Arc, LazyLock};

/// Global live-update hub shared by the dispatcher and channel subscribers
static LIVE_UPDATE_HUB: LazyLock<Arc<LiveUpdateHub>> = LazyLock::new(|| {
    log::trace!("Initializing live update hub");
    Arc::new(LiveUpdateHub::new())
});

/// Global dispatcher wired to the shared hub
///
/// Email goes through the log-only sender until a real transport is
/// configured.
static NOTIFICATION_SERVICE: LazyLock<Arc<NotificationDispatcher>> = LazyLock::new(|| {
    log::trace!("Initializing notification dispatcher");
    Arc::new(NotificationDispatcher::new(
        Arc::new(SystemClock),
        get_live_update_hub(),
        Arc::new(LogOnlyEmailSender),
        Arc::new(NullUserDirectory),
        QueueFlowConfig::default().email_from,
    ))
});

/// Access the live update hub
///
/// Each call returns the same shared instance.
pub fn get_live_update_hub() -> Arc<LiveUpdateHub> {
    Arc::clone(&LIVE_UPDATE_HUB)
}

/// Access the notification dispatcher
///
/// Each call returns the same shared instance.
pub fn get_notification_service() -> Arc<NotificationDispatcher> {
    Arc::clone(&NOTIFICATION_SERVICE)
}
