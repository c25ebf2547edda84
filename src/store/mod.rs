//! Entry Store
//!
//! Durable table of queue entries with atomic compare-and-update primitives.
//! The store owns the two correctness-critical disciplines of the system:
//!
//! - **Per-service-point exclusion**: every read-modify-write sequence on one
//!   point's active entry set (position assignment at join, call-next's
//!   select-and-mark, departure's reconciliation) runs under that point's
//!   lock, so concurrent joins can never assign the same position twice and a
//!   reconciliation pass can never race a concurrent join's position read.
//!   Operations on different points proceed in parallel.
//! - **Global active-entry uniqueness**: a user holds at most one entry in an
//!   active status across the entire system, enforced by an index updated
//!   atomically with entry insertion (no check-then-insert window).
//!
//! Entries are never deleted: terminal entries (`served`, `abandoned`) stay
//! behind for history and analytics.

mod entry;
mod error;
mod memory;
mod traits;

pub use entry::{EntryStatus, QueueEntry};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryEntryStore;
pub use traits::{Departure, EntryStore};
