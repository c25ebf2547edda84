//! Queue Management
//!
//! The queue state machine and its supporting pieces. One service point owns
//! one queue; a visitor's entry moves `joined -> called -> served`, or drops
//! to `abandoned` when they leave or the point closes. Positions within a
//! point's active set are dense `1..N` at every observable moment, and a user
//! holds at most one active entry system-wide.
//!
//! ```text
//!  caller ──► QueueService ──► QueueEngine ──► EntryStore (per-point locks)
//!                   │                │
//!                   │                └──► Vec<PendingEvent>  (committed)
//!                   └──► NotificationDispatcher (inbox / live / email)
//! ```
//!
//! The engine commits a transition and returns the fanout it owes as data;
//! the service then drives the dispatcher. Nothing inside the engine awaits,
//! so every invariant can be tested synchronously.
//!
//! # Example
//!
//! ```no_run
//! use queueflow::auth::Identity;
//! use queueflow::core::services::get_queue_service;
//! use queueflow::core::types::{ServicePointId, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = get_queue_service();
//! let visitor = Identity::customer(UserId(42));
//! let entry = service.join(&visitor, ServicePointId(1), None).await?;
//! println!("You are number {} in line", entry.position);
//! # Ok(())
//! # }
//! ```

pub mod api;
mod analytics;
mod engine;
mod error;
pub mod reconciler;
mod service;

pub use analytics::QueueAnalytics;
pub use engine::{Committed, QueueEngine};
pub use error::{QueueError, QueueResult};
pub use service::QueueService;

#[cfg(test)]
mod engine_tests;
