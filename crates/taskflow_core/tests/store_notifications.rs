use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use taskflow_core::db::open_db_in_memory;
use taskflow_core::model::task::normalize_description;
use taskflow_core::{
    DateKey, FixedClock, RepoError, RepoResult, SqliteTaskRepository, Task, TaskChange, TaskDraft,
    TaskId, TaskRepository, TaskStore,
};

fn date(text: &str) -> DateKey {
    DateKey::parse(text).unwrap()
}

fn store_at<'a>(
    conn: &'a rusqlite::Connection,
    today: &str,
) -> TaskStore<SqliteTaskRepository<'a>, FixedClock> {
    TaskStore::new(
        SqliteTaskRepository::new(conn),
        FixedClock::new(date(today)),
    )
}

fn record_events<R, C>(store: &TaskStore<R, C>) -> Arc<Mutex<Vec<TaskChange>>>
where
    R: taskflow_core::TaskRepository,
    C: taskflow_core::Clock,
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    store.subscribe(Box::new(move |change: &TaskChange| {
        sink.lock().unwrap().push(*change);
    }));
    events
}

#[test]
fn each_mutation_emits_exactly_one_event_in_order() {
    let conn = open_db_in_memory().unwrap();
    let store = store_at(&conn, "2024-03-05");
    let events = record_events(&store);

    let first = store.create(date("2024-03-05"), None, "first").unwrap();
    let second = store.create(date("2024-03-05"), None, "second").unwrap();
    store.set_completed(first.id, true).unwrap();
    store.set_description(second.id, "renamed").unwrap();
    store.delete(first.id).unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            TaskChange::Created(first.id),
            TaskChange::Created(second.id),
            TaskChange::Updated(first.id),
            TaskChange::Updated(second.id),
            TaskChange::Deleted(first.id),
        ]
    );
}

#[test]
fn repeated_toggles_notify_per_call() {
    let conn = open_db_in_memory().unwrap();
    let store = store_at(&conn, "2024-03-05");

    let task = store.create(date("2024-03-05"), None, "toggle").unwrap();
    let events = record_events(&store);

    store.set_completed(task.id, true).unwrap();
    store.set_completed(task.id, true).unwrap();

    // Per-call granularity: idempotent state, two observable events.
    assert_eq!(events.lock().unwrap().len(), 2);
}

#[test]
fn failed_mutations_emit_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = store_at(&conn, "2024-03-05");
    let events = record_events(&store);

    store.create(date("2024-03-05"), None, "  ").unwrap_err();
    store.set_completed(999, true).unwrap_err();
    store.delete(999).unwrap_err();

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn event_reports_the_committed_record() {
    let conn = open_db_in_memory().unwrap();
    let store = store_at(&conn, "2024-03-05");
    let events = record_events(&store);

    let task = store.create(date("2024-03-05"), None, "committed").unwrap();

    let seen = events.lock().unwrap();
    assert_eq!(*seen, vec![TaskChange::Created(task.id)]);
    drop(seen);

    // The id broadcast to views resolves against the store.
    assert_eq!(store.get(task.id).unwrap().unwrap().description, "committed");
}

#[test]
fn unsubscribed_view_stops_receiving_events() {
    let conn = open_db_in_memory().unwrap();
    let store = store_at(&conn, "2024-03-05");

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let handle = store.subscribe(Box::new(move |change: &TaskChange| {
        sink.lock().unwrap().push(*change);
    }));

    store.create(date("2024-03-05"), None, "seen").unwrap();
    assert!(store.unsubscribe(handle));
    assert!(!store.unsubscribe(handle));
    store.create(date("2024-03-05"), None, "unseen").unwrap();

    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn listener_can_call_back_into_the_store() {
    // Shared-store setup: the listener holds a reference to the store it
    // was subscribed on, like a view that reacts to changes by mutating.
    let store: &'static TaskStore<MemRepo, FixedClock> = Box::leak(Box::new(TaskStore::new(
        MemRepo::default(),
        FixedClock::new(date("2024-03-05")),
    )));

    let events = record_events(store);
    store.subscribe(Box::new(move |change: &TaskChange| {
        if let TaskChange::Created(id) = change {
            store.set_completed(*id, true).unwrap();
        }
    }));

    let task = store.create(date("2024-03-05"), None, "auto-done").unwrap();

    assert!(store.get(task.id).unwrap().unwrap().completed);
    assert_eq!(
        *events.lock().unwrap(),
        vec![TaskChange::Created(task.id), TaskChange::Updated(task.id)]
    );
}

#[test]
fn two_views_observe_the_same_mutation() {
    let conn = open_db_in_memory().unwrap();
    let store = store_at(&conn, "2024-03-05");

    let calendar_events = record_events(&store);
    let list_events = record_events(&store);

    let task = store.create(date("2024-03-05"), None, "shared").unwrap();

    assert_eq!(*calendar_events.lock().unwrap(), vec![TaskChange::Created(task.id)]);
    assert_eq!(*list_events.lock().unwrap(), vec![TaskChange::Created(task.id)]);
}

/// In-memory repository for tests that share one store across listeners.
#[derive(Default)]
struct MemRepo {
    rows: Mutex<Vec<Task>>,
    next_id: AtomicI64,
}

impl TaskRepository for MemRepo {
    fn insert_task(&self, draft: &TaskDraft) -> RepoResult<Task> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let task = Task {
            id,
            date: draft.date(),
            time: draft.time(),
            description: draft.description().to_string(),
            completed: false,
            created_at: format!("2024-03-05 09:00:00.{id:03}"),
        };
        self.rows.lock().unwrap().push(task.clone());
        Ok(task)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|task| task.id == id).cloned())
    }

    fn list_for_date(&self, date: DateKey) -> RepoResult<Vec<Task>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|task| task.date == date).cloned().collect())
    }

    fn count_for_date(&self, date: DateKey) -> RepoResult<u32> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|task| task.date == date).count() as u32)
    }

    fn set_completed(&self, id: TaskId, completed: bool) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let task = rows
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(RepoError::NotFound(id))?;
        task.completed = completed;
        Ok(())
    }

    fn set_description(&self, id: TaskId, description: &str) -> RepoResult<()> {
        let normalized = normalize_description(description)?;
        let mut rows = self.rows.lock().unwrap();
        let task = rows
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(RepoError::NotFound(id))?;
        task.description = normalized;
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|task| task.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}
