//! Queue state machine behaviour tests

use crate::auth::Identity;
use crate::core::time::ManualClock;
use crate::core::types::{EntryId, ServicePointId, UserId};
use crate::notifications::{LiveUpdate, PendingEvent};
use crate::queue::engine::QueueEngine;
use crate::queue::error::QueueError;
use crate::registry::{PointConfig, ServicePoint, ServicePointRegistry};
use crate::store::{EntryStatus, MemoryEntryStore};
use chrono::TimeZone;
use std::sync::Arc;

const OWNER: UserId = UserId(100);

struct Fixture {
    engine: QueueEngine,
    clock: Arc<ManualClock>,
}

fn fixture() -> Fixture {
    let start = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::starting_at(start));
    let registry = Arc::new(ServicePointRegistry::new(clock.clone()));
    let engine = QueueEngine::new(
        Arc::new(MemoryEntryStore::new()),
        registry,
        clock.clone(),
        5,
        None,
    );
    Fixture { engine, clock }
}

impl Fixture {
    fn point(&self, config: PointConfig) -> ServicePoint {
        self.engine
            .registry()
            .create(&self.owner(), "Counter 1", "", "", config)
            .unwrap()
    }

    fn owner(&self) -> Identity {
        Identity::staff(OWNER, [])
    }

    fn owner_of(&self, point: &ServicePoint) -> Identity {
        Identity::staff(OWNER, [point.id])
    }
}

fn live_positions(events: &[PendingEvent]) -> Vec<(UserId, u32)> {
    events
        .iter()
        .filter_map(|event| match event {
            PendingEvent::Live(LiveUpdate::Position {
                position, user_id, ..
            }) => Some((*user_id, *position)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_join_assigns_tail_positions() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());

    let first = fx
        .engine
        .join(&Identity::customer(UserId(1)), point.id, None)
        .unwrap();
    let second = fx
        .engine
        .join(&Identity::customer(UserId(2)), point.id, None)
        .unwrap();

    assert_eq!(first.value.position, 1);
    assert_eq!(second.value.position, 2);
    assert_eq!(second.value.estimated_wait_minutes, Some(5));

    // One in-app record plus the live position for the joiner
    assert!(matches!(
        second.events[0],
        PendingEvent::Notify { user_id: UserId(2), email: false, .. }
    ));
    assert_eq!(live_positions(&second.events), vec![(UserId(2), 2)]);
}

#[test]
fn test_join_unknown_or_inactive_point() {
    let fx = fixture();
    let customer = Identity::customer(UserId(1));

    assert!(matches!(
        fx.engine.join(&customer, ServicePointId(99), None),
        Err(QueueError::NotFound(_))
    ));

    let point = fx.point(PointConfig::default());
    fx.engine.registry().deactivate(point.id).unwrap();
    assert!(matches!(
        fx.engine.join(&customer, point.id, None),
        Err(QueueError::NotFound(_))
    ));
}

#[test]
fn test_join_twice_is_conflict_even_across_points() {
    let fx = fixture();
    let first = fx.point(PointConfig::default());
    let second = fx
        .engine
        .registry()
        .create(&fx.owner(), "Counter 2", "", "", PointConfig::default())
        .unwrap();
    let customer = Identity::customer(UserId(1));

    fx.engine.join(&customer, first.id, None).unwrap();
    assert!(matches!(
        fx.engine.join(&customer, first.id, None),
        Err(QueueError::Conflict(_))
    ));
    assert!(matches!(
        fx.engine.join(&customer, second.id, None),
        Err(QueueError::Conflict(_))
    ));
}

#[test]
fn test_join_priority_validation() {
    let fx = fixture();
    let plain = fx.point(PointConfig::default());
    let customer = Identity::customer(UserId(1));

    // Priority at a point that does not support it
    assert!(matches!(
        fx.engine.join(&customer, plain.id, Some(2)),
        Err(QueueError::Validation(_))
    ));

    let priority_point = fx
        .engine
        .registry()
        .create(
            &fx.owner(),
            "Triage",
            "",
            "",
            PointConfig {
                supports_priority: true,
                ..PointConfig::default()
            },
        )
        .unwrap();

    // Out-of-range level
    assert!(matches!(
        fx.engine.join(&customer, priority_point.id, Some(5)),
        Err(QueueError::Validation(_))
    ));
    // Valid level
    let entry = fx.engine.join(&customer, priority_point.id, Some(3)).unwrap();
    assert_eq!(entry.value.priority_level, Some(3));
}

#[test]
fn test_join_full_queue_is_conflict() {
    let fx = fixture();
    let point = fx.point(PointConfig {
        max_queue_length: Some(1),
        ..PointConfig::default()
    });

    fx.engine
        .join(&Identity::customer(UserId(1)), point.id, None)
        .unwrap();
    assert!(matches!(
        fx.engine.join(&Identity::customer(UserId(2)), point.id, None),
        Err(QueueError::Conflict(_))
    ));
}

#[test]
fn test_call_next_authorisation() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());

    assert!(matches!(
        fx.engine.call_next(&Identity::customer(UserId(1)), Some(point.id)),
        Err(QueueError::Forbidden(_))
    ));
    // Staff, but not the owner of this point
    assert!(matches!(
        fx.engine.call_next(&Identity::staff(UserId(200), []), Some(point.id)),
        Err(QueueError::Forbidden(_))
    ));
    assert!(matches!(
        fx.engine.call_next(&fx.owner(), Some(ServicePointId(99))),
        Err(QueueError::NotFound(_))
    ));
}

#[test]
fn test_call_next_empty_queue() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    let result = fx.engine.call_next(&fx.owner_of(&point), Some(point.id));
    assert!(matches!(result, Err(QueueError::NotFound(_))));
}

#[test]
fn test_call_next_emails_the_called_visitor() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    fx.engine
        .join(&Identity::customer(UserId(1)), point.id, None)
        .unwrap();

    let called = fx
        .engine
        .call_next(&fx.owner_of(&point), Some(point.id))
        .unwrap();
    assert_eq!(called.value.status, EntryStatus::Called);
    assert!(matches!(
        called.events[0],
        PendingEvent::Notify { user_id: UserId(1), email: true, .. }
    ));
}

#[test]
fn test_call_next_scans_all_owned_points() {
    let fx = fixture();
    let first = fx.point(PointConfig::default());
    let second = fx
        .engine
        .registry()
        .create(&fx.owner(), "Counter 2", "", "", PointConfig::default())
        .unwrap();
    let staff = Identity::staff(OWNER, [first.id, second.id]);

    fx.engine
        .join(&Identity::customer(UserId(1)), second.id, None)
        .unwrap();
    fx.clock.advance_secs(10);
    fx.engine
        .join(&Identity::customer(UserId(2)), first.id, None)
        .unwrap();

    // Earliest join across both points wins
    let called = fx.engine.call_next(&staff, None).unwrap();
    assert_eq!(called.value.user_id, UserId(1));
    assert_eq!(called.value.service_point_id, second.id);
}

#[test]
fn test_dismiss_requires_called_status() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    let entry = fx
        .engine
        .join(&Identity::customer(UserId(1)), point.id, None)
        .unwrap();

    let result = fx.engine.dismiss(&fx.owner_of(&point), entry.value.id);
    assert!(matches!(result, Err(QueueError::Conflict(_))));
}

#[test]
fn test_dismiss_compacts_and_notifies() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    let staff = fx.owner_of(&point);
    for user in 1..=3u64 {
        fx.engine
            .join(&Identity::customer(UserId(user)), point.id, None)
            .unwrap();
        fx.clock.advance_secs(1);
    }

    let called = fx.engine.call_next(&staff, Some(point.id)).unwrap();
    let dismissed = fx.engine.dismiss(&staff, called.value.id).unwrap();

    assert_eq!(dismissed.value.entry.status, EntryStatus::Served);
    assert_eq!(
        live_positions(&dismissed.events),
        vec![(UserId(2), 1), (UserId(3), 2)]
    );
    assert!(dismissed.events.iter().any(|event| matches!(
        event,
        PendingEvent::Live(LiveUpdate::Deleted { user_id: UserId(1), .. })
    )));
    assert!(matches!(
        dismissed.events[0],
        PendingEvent::Notify { user_id: UserId(1), email: true, .. }
    ));
}

#[test]
fn test_dismiss_unknown_entry_or_foreign_point() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    let entry = fx
        .engine
        .join(&Identity::customer(UserId(1)), point.id, None)
        .unwrap();

    assert!(matches!(
        fx.engine.dismiss(&fx.owner_of(&point), EntryId(99)),
        Err(QueueError::NotFound(_))
    ));
    assert!(matches!(
        fx.engine.dismiss(&Identity::staff(UserId(200), []), entry.value.id),
        Err(QueueError::Forbidden(_))
    ));
}

#[test]
fn test_leave_shifts_everyone_behind() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    for user in 1..=3u64 {
        fx.engine
            .join(&Identity::customer(UserId(user)), point.id, None)
            .unwrap();
        fx.clock.advance_secs(1);
    }

    // The middle visitor leaves: 1 keeps position 1, 3 moves up to 2
    let departed = fx.engine.leave(&Identity::customer(UserId(2)), None).unwrap();
    assert_eq!(departed.value.entry.status, EntryStatus::Abandoned);
    assert_eq!(live_positions(&departed.events), vec![(UserId(3), 2)]);

    let waiting = fx.engine.waiting_list(point.id).unwrap();
    let positions: Vec<(UserId, u32)> = waiting
        .iter()
        .map(|entry| (entry.user_id, entry.position))
        .collect();
    assert_eq!(positions, vec![(UserId(1), 1), (UserId(3), 2)]);
}

#[test]
fn test_leave_while_called_is_allowed() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    fx.engine
        .join(&Identity::customer(UserId(1)), point.id, None)
        .unwrap();
    fx.engine
        .call_next(&fx.owner_of(&point), Some(point.id))
        .unwrap();

    let departed = fx.engine.leave(&Identity::customer(UserId(1)), None).unwrap();
    assert_eq!(departed.value.entry.status, EntryStatus::Abandoned);
}

#[test]
fn test_leave_without_entry() {
    let fx = fixture();
    assert!(matches!(
        fx.engine.leave(&Identity::customer(UserId(1)), None),
        Err(QueueError::NotFound(_))
    ));
}

#[test]
fn test_leave_cannot_target_someone_elses_entry() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    let entry = fx
        .engine
        .join(&Identity::customer(UserId(1)), point.id, None)
        .unwrap();

    // Reported as missing, not forbidden, so ids cannot be probed
    assert!(matches!(
        fx.engine
            .leave(&Identity::customer(UserId(2)), Some(entry.value.id)),
        Err(QueueError::NotFound(_))
    ));
    // The entry is untouched
    assert_eq!(fx.engine.rank(entry.value.id).unwrap(), Some(1));
}

#[test]
fn test_close_point_abandons_everyone_once() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    let staff = fx.owner_of(&point);
    for user in 1..=3u64 {
        fx.engine
            .join(&Identity::customer(UserId(user)), point.id, None)
            .unwrap();
    }

    let closed = fx.engine.close_point(&staff, point.id).unwrap();
    assert!(!closed.value.active);

    // Exactly one in-app record per affected visitor, no emails
    let notified: Vec<UserId> = closed
        .events
        .iter()
        .filter_map(|event| match event {
            PendingEvent::Notify { user_id, email: false, .. } => Some(*user_id),
            _ => None,
        })
        .collect();
    assert_eq!(notified, vec![UserId(1), UserId(2), UserId(3)]);

    // Everyone may queue elsewhere immediately
    assert!(fx
        .engine
        .my_position(&Identity::customer(UserId(1)))
        .unwrap()
        .is_none());

    // Closing again is a quiet no-op
    let again = fx.engine.close_point(&staff, point.id).unwrap();
    assert!(again.events.is_empty());
}

#[test]
fn test_close_point_authorisation() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());

    assert!(matches!(
        fx.engine.close_point(&Identity::customer(UserId(1)), point.id),
        Err(QueueError::Forbidden(_))
    ));
    assert!(matches!(
        fx.engine.close_point(&Identity::staff(UserId(200), []), point.id),
        Err(QueueError::Forbidden(_))
    ));
}

#[test]
fn test_purge_point_requires_closed() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    let staff = fx.owner_of(&point);

    assert!(matches!(
        fx.engine.purge_point(&staff, point.id),
        Err(QueueError::Conflict(_))
    ));

    fx.engine.close_point(&staff, point.id).unwrap();
    fx.engine.purge_point(&staff, point.id).unwrap();
    assert!(fx.engine.registry().point(point.id).unwrap().is_none());
}

#[test]
fn test_my_position_and_rank() {
    let fx = fixture();
    let point = fx.point(PointConfig {
        supports_priority: true,
        ..PointConfig::default()
    });

    fx.engine
        .join(&Identity::customer(UserId(1)), point.id, None)
        .unwrap();
    fx.clock.advance_secs(1);
    let urgent = fx
        .engine
        .join(&Identity::customer(UserId(2)), point.id, Some(4))
        .unwrap();

    // Stored position reflects join order; rank reflects service order
    assert_eq!(urgent.value.position, 2);
    assert_eq!(fx.engine.rank(urgent.value.id).unwrap(), Some(1));

    let mine = fx
        .engine
        .my_position(&Identity::customer(UserId(2)))
        .unwrap()
        .unwrap();
    assert_eq!(mine.id, urgent.value.id);
}

#[test]
fn test_analytics_over_owned_points() {
    let fx = fixture();
    let point = fx.point(PointConfig::default());
    let staff = fx.owner_of(&point);

    fx.engine
        .join(&Identity::customer(UserId(1)), point.id, None)
        .unwrap();
    fx.engine
        .join(&Identity::customer(UserId(2)), point.id, None)
        .unwrap();
    fx.engine
        .join(&Identity::customer(UserId(3)), point.id, None)
        .unwrap();

    // First visitor: called after 10 minutes, then served
    fx.clock.advance_secs(600);
    let called = fx.engine.call_next(&staff, Some(point.id)).unwrap();
    fx.engine.dismiss(&staff, called.value.id).unwrap();
    // Second visitor walks out
    fx.engine.leave(&Identity::customer(UserId(2)), None).unwrap();

    let summary = fx.engine.analytics(&staff).unwrap();
    assert_eq!(summary.total_served, 1);
    assert_eq!(summary.total_abandoned, 1);
    assert_eq!(summary.currently_active, 1);
    assert_eq!(summary.average_served_wait_minutes, Some(10.0));

    // Staff with no points sees an empty summary, customers see nothing
    let lone = Identity::staff(UserId(300), []);
    assert_eq!(fx.engine.analytics(&lone).unwrap().currently_active, 0);
    assert!(matches!(
        fx.engine.analytics(&Identity::customer(UserId(1))),
        Err(QueueError::Forbidden(_))
    ));
}
