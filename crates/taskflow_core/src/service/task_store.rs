//! Task store facade: validation, persistence and change broadcast.
//!
//! # Responsibility
//! - Provide the mutation/query entry points consumed by every view.
//! - Notify the change bus after each committed mutation.
//!
//! # Invariants
//! - Notification granularity is per mutating call: exactly one event per
//!   successful `create`/`set_completed`/`set_description`/`delete`, sent
//!   after the repository commit returns, never on failure. Callers that
//!   batch several store calls into one user action will observe one event
//!   per call.
//! - "Today" queries go through the injected clock; the store never reads
//!   the OS clock directly.
//! - Listeners run against a snapshot of the registry taken under the bus
//!   lock, then dispatched outside it, so a listener may re-enter the
//!   store (including `subscribe`/`unsubscribe`). A listener registered
//!   mid-dispatch first hears the next change.

use crate::datetime::{Clock, DateKey, TimeOfDay};
use crate::model::task::{Task, TaskDraft, TaskId};
use crate::repo::task_repo::{RepoResult, TaskRepository};
use crate::sync::change_bus::{ChangeBus, ChangeListener, ListenerId, TaskChange};
use log::{info, warn};
use std::sync::Mutex;

/// Durable, queryable collection of task records shared by all views.
pub struct TaskStore<R: TaskRepository, C: Clock> {
    repo: R,
    clock: C,
    bus: Mutex<ChangeBus>,
}

impl<R: TaskRepository, C: Clock> TaskStore<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            bus: Mutex::new(ChangeBus::new()),
        }
    }

    /// Registers a view listener; dispatch follows subscription order.
    pub fn subscribe(&self, listener: Box<dyn ChangeListener>) -> ListenerId {
        self.bus_guard().subscribe(listener)
    }

    /// Removes a view listener. Returns `false` for unknown handles.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.bus_guard().unsubscribe(id)
    }

    /// Creates one task and broadcasts the committed insert.
    ///
    /// Fails with `RepoError::Validation` when the description trims to
    /// empty; the date is valid by type.
    pub fn create(
        &self,
        date: DateKey,
        time: Option<TimeOfDay>,
        description: &str,
    ) -> RepoResult<Task> {
        let draft = TaskDraft::new(date, time, description)?;
        let task = self.repo.insert_task(&draft)?;

        info!(
            "event=task_create module=store status=ok id={} date={}",
            task.id, task.date
        );
        self.notify(TaskChange::Created(task.id));
        Ok(task)
    }

    /// Lists tasks due on `date`, in insertion order.
    pub fn tasks_for_date(&self, date: DateKey) -> RepoResult<Vec<Task>> {
        self.repo.list_for_date(date)
    }

    /// Lists tasks due today, per the injected clock.
    ///
    /// Same query path as `tasks_for_date`; "today" is just a parameter.
    pub fn tasks_for_today(&self) -> RepoResult<Vec<Task>> {
        self.tasks_for_date(self.today())
    }

    /// Returns whether `date` has at least one task, via a count-only
    /// query (no rows are materialized).
    pub fn has_any(&self, date: DateKey) -> RepoResult<bool> {
        Ok(self.repo.count_for_date(date)? > 0)
    }

    /// Looks up one task by id.
    pub fn get(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    /// Sets the completion flag and broadcasts the committed update.
    pub fn set_completed(&self, id: TaskId, completed: bool) -> RepoResult<()> {
        self.repo.set_completed(id, completed)?;
        self.notify(TaskChange::Updated(id));
        Ok(())
    }

    /// Replaces the description (re-validated) and broadcasts the update.
    pub fn set_description(&self, id: TaskId, description: &str) -> RepoResult<()> {
        self.repo.set_description(id, description)?;
        self.notify(TaskChange::Updated(id));
        Ok(())
    }

    /// Hard-deletes one task and broadcasts the committed delete.
    ///
    /// The id is gone from every future query; ids are never recycled.
    pub fn delete(&self, id: TaskId) -> RepoResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=store status=ok id={id}");
        self.notify(TaskChange::Deleted(id));
        Ok(())
    }

    /// Current date key from the injected clock.
    pub fn today(&self) -> DateKey {
        self.clock.today()
    }

    fn notify(&self, change: TaskChange) {
        // Snapshot under the lock, dispatch outside it: listeners may call
        // back into this store without deadlocking on the bus.
        let listeners = self.bus_guard().snapshot();
        ChangeBus::dispatch(&listeners, &change);
    }

    fn bus_guard(&self) -> std::sync::MutexGuard<'_, ChangeBus> {
        // Listener panics are caught inside the bus, so a poisoned lock can
        // only come from a panic between lock and dispatch; the bus state
        // itself stays consistent.
        match self.bus.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("event=bus_lock_poisoned module=store status=recovered");
                poisoned.into_inner()
            }
        }
    }
}
