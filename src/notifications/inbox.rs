//! Persistent in-app notification records

use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};
use crate::core::time::Clock;
use crate::core::types::{NotificationId, UserId};
use crate::notifications::error::NotificationError;
use crate::notifications::event::Notification;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Stores each user's notification records
///
/// Records are owner-scoped: reads and mutations require the owning user id,
/// and a mismatched owner is indistinguishable from a missing record.
pub struct NotificationInbox {
    records: RwLock<HashMap<NotificationId, Notification>>,
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl NotificationInbox {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            clock,
        }
    }

    /// Persist a new unread record for the user
    pub fn create(
        &self,
        user_id: UserId,
        message: &str,
    ) -> Result<Notification, NotificationError> {
        let record = Notification {
            id: NotificationId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            user_id,
            message: message.to_string(),
            is_read: false,
            created_at: self.clock.now(),
        };
        let mut records =
            handle_rwlock_write(self.records.write(), NotificationError::RecordFailed)?;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    /// All records for a user, newest first
    pub fn list_for(&self, user_id: UserId) -> Result<Vec<Notification>, NotificationError> {
        let records = handle_rwlock_read(self.records.read(), NotificationError::RecordFailed)?;
        let mut listed: Vec<Notification> = records
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(listed)
    }

    /// Mark one of the user's records as read
    pub fn mark_read(
        &self,
        user_id: UserId,
        id: NotificationId,
    ) -> Result<Notification, NotificationError> {
        let mut records =
            handle_rwlock_write(self.records.write(), NotificationError::RecordFailed)?;
        let record = records
            .get_mut(&id)
            .filter(|record| record.user_id == user_id)
            .ok_or(NotificationError::RecordNotFound { id })?;
        record.is_read = true;
        Ok(record.clone())
    }

    /// Poison the records lock so every subsequent access fails
    #[cfg(test)]
    pub(crate) fn poison_records(&self) {
        let _ = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = self.records.write().unwrap();
                    panic!("poisoning inbox records lock");
                })
                .join()
        });
    }

    /// Delete one of the user's records
    pub fn delete(&self, user_id: UserId, id: NotificationId) -> Result<(), NotificationError> {
        let mut records =
            handle_rwlock_write(self.records.write(), NotificationError::RecordFailed)?;
        match records.get(&id) {
            Some(record) if record.user_id == user_id => {
                records.remove(&id);
                Ok(())
            }
            _ => Err(NotificationError::RecordNotFound { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::ManualClock;
    use chrono::TimeZone;

    fn inbox() -> (NotificationInbox, Arc<ManualClock>) {
        let start = chrono::Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .unwrap();
        let clock = Arc::new(ManualClock::starting_at(start));
        (NotificationInbox::new(clock.clone()), clock)
    }

    #[test]
    fn test_create_and_list_newest_first() {
        let (inbox, clock) = inbox();
        inbox.create(UserId(1), "first").unwrap();
        clock.advance_secs(60);
        inbox.create(UserId(1), "second").unwrap();
        inbox.create(UserId(2), "other user").unwrap();

        let listed = inbox.list_for(UserId(1)).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].message, "second");
        assert_eq!(listed[1].message, "first");
        assert!(listed.iter().all(|record| !record.is_read));
    }

    #[test]
    fn test_mark_read() {
        let (inbox, _) = inbox();
        let record = inbox.create(UserId(1), "called").unwrap();

        let updated = inbox.mark_read(UserId(1), record.id).unwrap();
        assert!(updated.is_read);
        assert!(inbox.list_for(UserId(1)).unwrap()[0].is_read);
    }

    #[test]
    fn test_other_users_records_look_missing() {
        let (inbox, _) = inbox();
        let record = inbox.create(UserId(1), "called").unwrap();

        assert!(matches!(
            inbox.mark_read(UserId(2), record.id),
            Err(NotificationError::RecordNotFound { .. })
        ));
        assert!(matches!(
            inbox.delete(UserId(2), record.id),
            Err(NotificationError::RecordNotFound { .. })
        ));
        // The record is untouched
        assert_eq!(inbox.list_for(UserId(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (inbox, _) = inbox();
        let record = inbox.create(UserId(1), "called").unwrap();
        inbox.delete(UserId(1), record.id).unwrap();
        assert!(inbox.list_for(UserId(1)).unwrap().is_empty());
        assert!(matches!(
            inbox.delete(UserId(1), record.id),
            Err(NotificationError::RecordNotFound { .. })
        ));
    }
}
