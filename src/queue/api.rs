//! Public API for the queue service

use crate::core::config::QueueFlowConfig;
use crate::core::time::SystemClock;
use crate::notifications::api::get_notification_service;
use crate::queue::engine::QueueEngine;
use crate::queue::service::QueueService;
use crate::registry::api::get_registry_service;
use crate::store::MemoryEntryStore;
use std::sync::{Arc, LazyLock};

/// Global queue service wired to the shared registry and dispatcher
static QUEUE_SERVICE: LazyLock<Arc<QueueService>> = LazyLock::new(|| {
    log::trace!("Initializing queue service");
    let config = QueueFlowConfig::default();
    let engine = QueueEngine::new(
        Arc::new(MemoryEntryStore::new()),
        get_registry_service(),
        Arc::new(SystemClock),
        config.minutes_per_visitor,
        config.default_max_queue_length,
    );
    Arc::new(QueueService::new(engine, get_notification_service()))
});

/// Access the queue service
///
/// Each call returns the same shared instance.
pub fn get_queue_service() -> Arc<QueueService> {
    Arc::clone(&QUEUE_SERVICE)
}
