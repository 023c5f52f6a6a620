//! In-process publish/subscribe bus for task mutations.
//!
//! # Responsibility
//! - Track subscribed views and broadcast committed mutations to them.
//! - Isolate listener panics so one broken view cannot starve the rest.
//!
//! # Invariants
//! - `notify` is called once per committed store mutation, never before
//!   the commit and never for a failed one (enforced by the store).
//! - Dispatch order equals subscription order.

use crate::model::task::TaskId;
use log::error;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Handle returned by `subscribe`, used to unsubscribe later.
pub type ListenerId = u64;

/// One committed mutation, as seen by the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskChange {
    Created(TaskId),
    /// Covers completion toggles and description edits.
    Updated(TaskId),
    Deleted(TaskId),
}

impl TaskChange {
    /// Returns the id of the task the change refers to.
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => *id,
        }
    }
}

/// View-side callback invoked after every committed mutation.
pub trait ChangeListener: Send + Sync {
    fn on_tasks_changed(&self, change: &TaskChange);
}

// Closures subscribe without boilerplate adapter types.
impl<F> ChangeListener for F
where
    F: Fn(&TaskChange) + Send + Sync,
{
    fn on_tasks_changed(&self, change: &TaskChange) {
        self(change);
    }
}

/// Broadcast registry for change listeners.
///
/// Purely a dispatch mechanism; it holds no task state and no queue.
#[derive(Default)]
pub struct ChangeBus {
    listeners: Vec<(ListenerId, Arc<dyn ChangeListener>)>,
    next_id: ListenerId,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one listener; dispatch follows registration order.
    pub fn subscribe(&mut self, listener: Box<dyn ChangeListener>) -> ListenerId {
        self.next_id += 1;
        let id = self.next_id;
        self.listeners.push((id, Arc::from(listener)));
        id
    }

    /// Removes one listener. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Returns the current membership for dispatch outside any lock
    /// guarding the registry, so listeners may re-enter it.
    pub fn snapshot(&self) -> Vec<(ListenerId, Arc<dyn ChangeListener>)> {
        self.listeners.clone()
    }

    /// Broadcasts one committed change to every listener.
    pub fn notify(&self, change: &TaskChange) {
        Self::dispatch(&self.listeners, change);
    }

    /// Invokes each listener in order.
    ///
    /// A panicking listener is caught and logged; remaining listeners
    /// still run.
    pub fn dispatch(listeners: &[(ListenerId, Arc<dyn ChangeListener>)], change: &TaskChange) {
        for (id, listener) in listeners {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener.on_tasks_changed(change)));
            if outcome.is_err() {
                error!(
                    "event=listener_panic module=sync status=error listener_id={id} task_id={}",
                    change.task_id()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeBus, TaskChange};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn notify_reaches_listeners_in_subscription_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut bus = ChangeBus::new();

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(Box::new(move |_: &TaskChange| {
                order.lock().unwrap().push(tag);
            }));
        }

        bus.notify(&TaskChange::Created(1));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut bus = ChangeBus::new();

        let counted = Arc::clone(&hits);
        let id = bus.subscribe(Box::new(move |_: &TaskChange| {
            counted.fetch_add(1, Ordering::SeqCst);
        }));

        bus.notify(&TaskChange::Updated(7));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.notify(&TaskChange::Updated(7));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_listener_does_not_block_later_listeners() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut bus = ChangeBus::new();

        bus.subscribe(Box::new(|_: &TaskChange| panic!("broken view")));
        let counted = Arc::clone(&hits);
        bus.subscribe(Box::new(move |_: &TaskChange| {
            counted.fetch_add(1, Ordering::SeqCst);
        }));

        bus.notify(&TaskChange::Deleted(3));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
