//! Service Registry Re-exports
//!
//! Re-exports service access functions from their respective modules.
//! All services live in their domain modules; this is the single import
//! point for the embedding API layer.

pub use crate::notifications::api::{get_live_update_hub, get_notification_service};
pub use crate::queue::api::get_queue_service;
pub use crate::registry::api::get_registry_service;
