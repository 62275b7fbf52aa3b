//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `daymark_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use daymark_core::db::open_db_in_memory;
use daymark_core::{KeyedStore, PartitionKey, SqliteKvMedium, StatsLedger, StatsUpdate};

fn main() {
    println!("daymark_core version={}", daymark_core::core_version());

    // Tiny end-to-end probe over an in-memory medium.
    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open in-memory medium: {err}");
            std::process::exit(1);
        }
    };

    let result = SqliteKvMedium::try_new(&conn).map(KeyedStore::new).and_then(|store| {
        let ledger = StatsLedger::new(&store);
        let partition = PartitionKey::User("smoke".to_string());
        let current = ledger.stats(&partition)?;
        ledger.update(
            StatsUpdate {
                focus_minutes: Some(current.focus_minutes + 25),
                ..StatsUpdate::default()
            },
            &partition,
        )
    });

    match result {
        Ok(stats) => println!("smoke focus_minutes={}", stats.focus_minutes),
        Err(err) => {
            eprintln!("smoke probe failed: {err}");
            std::process::exit(1);
        }
    }
}
