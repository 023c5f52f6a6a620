//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskflow_core` linkage.
//! - Keep output deterministic enough for quick local sanity checks.

use std::error::Error;
use taskflow_core::db::open_db_in_memory;
use taskflow_core::{SqliteTaskRepository, SystemClock, TaskStore};

fn main() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    let store = TaskStore::new(SqliteTaskRepository::new(&conn), SystemClock);

    let today = store.today();
    println!("taskflow_core version={}", taskflow_core::core_version());
    println!(
        "today={today} tasks={}",
        store.tasks_for_today()?.len()
    );

    Ok(())
}
