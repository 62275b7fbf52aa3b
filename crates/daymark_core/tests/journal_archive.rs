use chrono::{Datelike, Duration, Local, NaiveDate};
use daymark_core::db::open_db_in_memory;
use daymark_core::{EntityKind, JournalStore, KeyedStore, PartitionKey, SqliteKvMedium};

#[test]
fn upsert_twice_for_same_date_keeps_one_entry_with_latest_content() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let journal = JournalStore::new(&store);
    let partition = PartitionKey::User("p1".to_string());
    let date = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();

    let first = journal.upsert_entry(date, "morning draft", &partition).unwrap();
    let second = journal.upsert_entry(date, "evening rewrite", &partition).unwrap();

    let entries = journal.entries(&partition).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, "evening rewrite");
    assert_eq!(entries[0].id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
}

#[test]
fn entry_ids_are_derived_from_partition_and_date() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let journal = JournalStore::new(&store);
    let partition = PartitionKey::User("p1".to_string());
    let date = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();

    let entry = journal.upsert_entry(date, "body", &partition).unwrap();
    assert_eq!(entry.id, "journal_p1_2025-04-10");
}

#[test]
fn entry_for_date_finds_only_its_own_date() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let journal = JournalStore::new(&store);
    let partition = PartitionKey::User("p1".to_string());

    let written = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
    let other = NaiveDate::from_ymd_opt(2025, 4, 11).unwrap();
    journal.upsert_entry(written, "only day", &partition).unwrap();

    assert!(journal.entry_for_date(written, &partition).unwrap().is_some());
    assert!(journal.entry_for_date(other, &partition).unwrap().is_none());
}

#[test]
fn archive_excludes_current_month_and_groups_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let journal = JournalStore::new(&store);
    let partition = PartitionKey::User("p1".to_string());

    let today = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
    journal
        .upsert_entry(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(), "this month", &partition)
        .unwrap();
    journal
        .upsert_entry(NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(), "last month a", &partition)
        .unwrap();
    journal
        .upsert_entry(NaiveDate::from_ymd_opt(2025, 4, 9).unwrap(), "last month b", &partition)
        .unwrap();
    journal
        .upsert_entry(NaiveDate::from_ymd_opt(2024, 11, 30).unwrap(), "last year", &partition)
        .unwrap();

    let buckets = journal.archived_entries_as_of(&partition, today).unwrap();

    assert!(!buckets.contains_key("2025-05"));
    assert_eq!(buckets["2025-04"].len(), 2);
    assert_eq!(buckets["2024-11"].len(), 1);
    let total: usize = buckets.values().map(Vec::len).sum();
    assert_eq!(total, 3);
}

#[test]
fn archive_relative_to_the_real_clock_excludes_todays_entry() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let journal = JournalStore::new(&store);
    let partition = PartitionKey::User("p1".to_string());

    let today = Local::now().date_naive();
    // ~3 months back always lands outside the current calendar month
    let old = today - Duration::days(92);
    journal.upsert_entry(today, "fresh", &partition).unwrap();
    journal.upsert_entry(old, "aged", &partition).unwrap();

    let buckets = journal.archived_entries(&partition).unwrap();

    let old_key = format!("{:04}-{:02}", old.year(), old.month());
    assert_eq!(buckets[&old_key].len(), 1);
    let total: usize = buckets.values().map(Vec::len).sum();
    assert_eq!(total, 1);
}

#[test]
fn malformed_dates_are_skipped_by_the_archive_not_errored() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let journal = JournalStore::new(&store);
    let partition = PartitionKey::User("p1".to_string());

    journal
        .upsert_entry(NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(), "good", &partition)
        .unwrap();

    // Corrupt one stored date the way a buggy earlier revision could have.
    let mut entries = journal.entries(&partition).unwrap();
    let mut broken = entries[0].clone();
    broken.id = "journal_p1_broken".to_string();
    broken.date = "14/08/2024".to_string();
    entries.push(broken);
    store
        .write(EntityKind::JournalEntries, &partition, &entries)
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let buckets = journal.archived_entries_as_of(&partition, today).unwrap();

    let total: usize = buckets.values().map(Vec::len).sum();
    assert_eq!(total, 1);
    assert_eq!(buckets["2024-08"][0].content, "good");
}

#[test]
fn journal_collections_are_isolated_per_partition() {
    let conn = open_db_in_memory().unwrap();
    let store = KeyedStore::new(SqliteKvMedium::try_new(&conn).unwrap());
    let journal = JournalStore::new(&store);

    let date = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
    let first = PartitionKey::User("first".to_string());
    let second = PartitionKey::User("second".to_string());

    journal.upsert_entry(date, "first only", &first).unwrap();

    assert_eq!(journal.entries(&first).unwrap().len(), 1);
    assert!(journal.entries(&second).unwrap().is_empty());
}
