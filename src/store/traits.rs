//! Entry store trait
//!
//! The seam between the queue state machine and persistence. Every method is
//! a single atomic unit: implementations must run each read-modify-write under
//! the affected service point's exclusion scope, and must validate the global
//! one-active-entry-per-user constraint atomically with insertion.

use crate::core::types::{EntryId, ServicePointId, UserId};
use crate::store::entry::{EntryStatus, QueueEntry};
use crate::store::error::StoreResult;
use chrono::{DateTime, Utc};

/// Outcome of an entry leaving the active set
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    /// The departed entry in its new terminal state
    pub entry: QueueEntry,
    /// Remaining active entries whose positions were compacted, with their
    /// new position values
    pub repositioned: Vec<QueueEntry>,
}

pub trait EntryStore: Send + Sync {
    /// Append a new `joined` entry at the tail of `point`'s active set.
    ///
    /// Assigns `position` = active count + 1 and computes the wait estimate
    /// from the same count, all inside the point's exclusion scope. Fails with
    /// `DuplicateActiveEntry` if the user already holds any active entry
    /// anywhere in the system, and with `CapacityExceeded` if a capacity is
    /// given and the active set is at it.
    #[allow(clippy::too_many_arguments)]
    fn insert(
        &self,
        point: ServicePointId,
        user: UserId,
        priority_level: Option<u8>,
        minutes_per_visitor: i64,
        capacity: Option<u32>,
        now: DateTime<Utc>,
    ) -> StoreResult<QueueEntry>;

    /// Look up a single entry by id
    fn entry(&self, id: EntryId) -> StoreResult<Option<QueueEntry>>;

    /// The active entries at `point`, in rank order
    fn active_entries(&self, point: ServicePointId) -> StoreResult<Vec<QueueEntry>>;

    /// Number of active entries at `point`
    fn active_count(&self, point: ServicePointId) -> StoreResult<u32>;

    /// The user's single active entry, if any (the most recently joined one
    /// should the uniqueness rule ever be relaxed)
    fn active_entry_for_user(&self, user: UserId) -> StoreResult<Option<QueueEntry>>;

    /// Select the `joined` entry with the smallest rank across `points` and
    /// atomically mark it `called`, stamping `called_at`.
    ///
    /// Returns `None` when no point has a joined entry. Selection and the
    /// status flip happen under the winning point's exclusion scope, so two
    /// concurrent calls can never claim the same entry.
    fn call_next(
        &self,
        points: &[ServicePointId],
        now: DateTime<Utc>,
    ) -> StoreResult<Option<QueueEntry>>;

    /// Transition an active entry to a terminal status and synchronously
    /// compact the remaining active positions at its service point.
    ///
    /// `expected_from` is the compare half of the compare-and-update: the
    /// entry must currently be in one of those statuses or the call fails
    /// with `TransitionConflict` and changes nothing.
    fn depart(
        &self,
        id: EntryId,
        to: EntryStatus,
        expected_from: &[EntryStatus],
        now: DateTime<Utc>,
    ) -> StoreResult<Departure>;

    /// Transition every active entry at `point` to `abandoned` (bulk closure).
    ///
    /// No position compaction: the active set empties. Returns the affected
    /// entries.
    fn abandon_all(&self, point: ServicePointId, now: DateTime<Utc>) -> StoreResult<Vec<QueueEntry>>;

    /// Full entry history (active and terminal) for the given points,
    /// ordered by join time
    fn entries_for_points(&self, points: &[ServicePointId]) -> StoreResult<Vec<QueueEntry>>;

    /// Computed rank of an active entry among its point's active set
    /// (1-based), or `None` if the entry is unknown or terminal.
    ///
    /// This is the query the state machine exposes instead of the stored
    /// `position` integer, so the storage representation can change without
    /// touching the state machine contract.
    fn rank(&self, id: EntryId) -> StoreResult<Option<u32>>;
}
