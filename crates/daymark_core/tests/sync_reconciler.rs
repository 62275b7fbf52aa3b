use chrono::{Duration as ChronoDuration, Local};
use daymark_core::db::open_db_in_memory;
use daymark_core::{
    CalendarEvent, EventStore, ExternalIdentity, KeyedStore, KvMedium, RemoteError, Session,
    SessionContext, SimulatedRemoteCalendar, SqliteKvMedium, StatsLedger, SyncFailure,
    SyncOutcome, SyncReconciler, SyncState,
};
use std::time::Duration;

fn logged_in_session(store: &KeyedStore<SqliteKvMedium<'_>>, email: &str) -> Session {
    let context = SessionContext::new(store);
    context
        .login(&ExternalIdentity {
            name: "U One".to_string(),
            email: email.to_string(),
            picture_url: None,
            external_token: Some("tok".to_string()),
        })
        .unwrap()
}

fn future_events(count: usize) -> Vec<CalendarEvent> {
    let today = Local::now().date_naive();
    (0..count)
        .map(|index| {
            CalendarEvent::with_id(
                1_000 + index as u64,
                format!("local event {index}"),
                today + ChronoDuration::days(7 + index as i64),
            )
        })
        .collect()
}

#[test]
fn successful_pass_tags_all_events_and_pads_to_the_minimum() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let session = logged_in_session(&store, "u1@example.com");
    let partition = session.partition_key();

    let events = EventStore::new(&store);
    events.save_all(&future_events(3), &partition).unwrap();

    let mut reconciler = SyncReconciler::new(&store, SimulatedRemoteCalendar::new());
    let outcome = reconciler.sync(Some(&session));

    let report = match outcome {
        SyncOutcome::Completed(report) => report,
        SyncOutcome::Failed(failure) => panic!("sync should succeed, got {failure:?}"),
    };
    assert_eq!(report.total_events, 5);
    assert_eq!(report.newly_added, 2);
    assert_eq!(reconciler.state(), SyncState::Synced);

    let reconciled = events.list(&partition).unwrap();
    assert_eq!(reconciled.len(), 5);
    for event in &reconciled {
        assert!(event.synced);
        assert_eq!(
            event.remote_id.as_deref(),
            Some(format!("remote_{}", event.id).as_str())
        );
    }

    // Stats grew by exactly the padded count.
    let stats = StatsLedger::new(&store).stats(&partition).unwrap();
    assert_eq!(stats.events_created, 2);
}

#[test]
fn pass_with_enough_events_adds_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let session = logged_in_session(&store, "u1@example.com");
    let partition = session.partition_key();

    let events = EventStore::new(&store);
    events.save_all(&future_events(6), &partition).unwrap();

    let mut reconciler = SyncReconciler::new(&store, SimulatedRemoteCalendar::new());
    let outcome = reconciler.sync(Some(&session));

    match outcome {
        SyncOutcome::Completed(report) => {
            assert_eq!(report.total_events, 6);
            assert_eq!(report.newly_added, 0);
        }
        SyncOutcome::Failed(failure) => panic!("sync should succeed, got {failure:?}"),
    }

    let stats = StatsLedger::new(&store).stats(&partition).unwrap();
    assert_eq!(stats.events_created, 0);
}

#[test]
fn guest_session_is_refused_and_storage_is_untouched() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let context = SessionContext::new(&store);
    let guest = context.login_as_guest().unwrap();
    let partition = guest.partition_key();

    let events = EventStore::new(&store);
    events.save_all(&future_events(2), &partition).unwrap();

    let medium = SqliteKvMedium::try_new(&conn).unwrap();
    let key = format!("calendar_events_{}", guest.partition);
    let raw_before = medium.read(&key).unwrap().expect("events were saved");

    let mut reconciler = SyncReconciler::new(&store, SimulatedRemoteCalendar::new());
    let outcome = reconciler.sync(Some(&guest));

    assert_eq!(outcome, SyncOutcome::Failed(SyncFailure::GuestSession));
    assert_eq!(reconciler.state(), SyncState::NotSynced);

    let raw_after = medium.read(&key).unwrap().expect("events still present");
    assert_eq!(raw_after, raw_before, "collection must be byte-for-byte unchanged");
}

#[test]
fn missing_session_is_refused() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());

    let mut reconciler = SyncReconciler::new(&store, SimulatedRemoteCalendar::new());
    let outcome = reconciler.sync(None);

    assert_eq!(outcome, SyncOutcome::Failed(SyncFailure::NoActiveSession));
}

#[test]
fn remote_failure_rolls_back_to_not_synced_without_mutation() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let session = logged_in_session(&store, "u1@example.com");
    let partition = session.partition_key();

    let events = EventStore::new(&store);
    let saved = future_events(3);
    events.save_all(&saved, &partition).unwrap();

    let mut reconciler =
        SyncReconciler::new(&store, SimulatedRemoteCalendar::failing("quota exceeded"));
    let outcome = reconciler.sync(Some(&session));

    assert_eq!(
        outcome,
        SyncOutcome::Failed(SyncFailure::Remote(RemoteError::Unavailable(
            "quota exceeded".to_string()
        )))
    );
    assert_eq!(reconciler.state(), SyncState::NotSynced);
    assert_eq!(events.list(&partition).unwrap(), saved);

    let stats = StatsLedger::new(&store).stats(&partition).unwrap();
    assert_eq!(stats.events_created, 0);
}

#[test]
fn slow_remote_exchange_times_out_and_falls_back() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let session = logged_in_session(&store, "u1@example.com");

    let slow_remote = SimulatedRemoteCalendar::with_latency(Duration::from_secs(30));
    let mut reconciler =
        SyncReconciler::new(&store, slow_remote).with_exchange_timeout(Duration::from_millis(50));
    let outcome = reconciler.sync(Some(&session));

    assert_eq!(
        outcome,
        SyncOutcome::Failed(SyncFailure::Remote(RemoteError::TimedOut { deadline_ms: 50 }))
    );
    assert_eq!(reconciler.state(), SyncState::NotSynced);
}

#[test]
fn local_mutation_after_a_pass_drops_freshness() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let session = logged_in_session(&store, "u1@example.com");
    let partition = session.partition_key();

    let mut reconciler = SyncReconciler::new(&store, SimulatedRemoteCalendar::new());
    assert!(reconciler.sync(Some(&session)).is_completed());
    assert_eq!(reconciler.state(), SyncState::Synced);

    let today = Local::now().date_naive();
    reconciler
        .add_event(
            CalendarEvent::with_id(77, "added after sync", today + ChronoDuration::days(3)),
            Some(&session),
        )
        .unwrap();
    assert_eq!(reconciler.state(), SyncState::NotSynced);

    assert!(reconciler.sync(Some(&session)).is_completed());
    assert_eq!(reconciler.state(), SyncState::Synced);

    reconciler.remove_event(77, Some(&session)).unwrap();
    assert_eq!(reconciler.state(), SyncState::NotSynced);

    assert!(reconciler.sync(Some(&session)).is_completed());
    reconciler.clear_events(Some(&session)).unwrap();
    assert_eq!(reconciler.state(), SyncState::NotSynced);
    assert!(EventStore::new(&store).list(&partition).unwrap().is_empty());
}

#[test]
fn repeated_passes_keep_remote_ids_stable() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let session = logged_in_session(&store, "u1@example.com");
    let partition = session.partition_key();

    let events = EventStore::new(&store);
    events.save_all(&future_events(5), &partition).unwrap();

    let mut reconciler = SyncReconciler::new(&store, SimulatedRemoteCalendar::new());
    assert!(reconciler.sync(Some(&session)).is_completed());
    let first = events.list(&partition).unwrap();

    assert!(reconciler.sync(Some(&session)).is_completed());
    let second = events.list(&partition).unwrap();

    assert_eq!(first, second);
}
