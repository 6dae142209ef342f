use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::io::store::{KeyValueStore, TaskStore};
use crate::model::task::Task;

/// Result of one background save, reported back to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { count: usize },
    Failed(String),
}

#[derive(Default)]
struct Mailbox {
    /// Latest snapshot not yet picked up by the worker
    pending: Option<Vec<Task>>,
    /// Worker is currently writing a snapshot
    in_flight: bool,
    closed: bool,
}

#[derive(Default)]
struct Shared {
    mailbox: Mutex<Mailbox>,
    /// Signaled when a snapshot is submitted or the saver closes
    wake: Condvar,
    /// Signaled when the worker finishes a save
    idle: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Mailbox> {
        self.mailbox.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Background writer for the task list.
///
/// Owns the store on a dedicated thread. Snapshots go through a single-slot
/// mailbox: submitting while an earlier snapshot is still queued replaces it,
/// and at most one save runs at a time, so writes land in submission order
/// and a stale snapshot can never overwrite a newer one.
pub struct Saver {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
    rx: mpsc::Receiver<SaveOutcome>,
}

impl Saver {
    /// Start the worker thread, moving the store onto it.
    pub fn spawn<K: KeyValueStore + 'static>(store: TaskStore<K>) -> std::io::Result<Self> {
        let shared = Arc::new(Shared::default());
        let (tx, rx) = mpsc::channel();
        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("tasknest-saver".into())
            .spawn(move || run_worker(&worker_shared, store, tx))?;
        Ok(Saver {
            shared,
            handle: Some(handle),
            rx,
        })
    }

    /// Queue a snapshot for saving. Returns immediately.
    pub fn submit(&self, tasks: Vec<Task>) {
        let mut mailbox = self.shared.lock();
        if mailbox.pending.replace(tasks).is_some() {
            tracing::debug!("superseded queued save");
        }
        self.shared.wake.notify_one();
    }

    /// Non-blocking poll for finished saves.
    /// Returns all queued outcomes (may be empty).
    pub fn poll(&self) -> Vec<SaveOutcome> {
        self.rx.try_iter().collect()
    }

    /// Block until nothing is queued or in flight
    pub fn flush(&self) {
        let mut mailbox = self.shared.lock();
        while (mailbox.pending.is_some() || mailbox.in_flight) && !mailbox.closed {
            mailbox = self
                .shared
                .idle
                .wait(mailbox)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Write out anything still queued, stop the worker, and return the
    /// outcomes the caller hasn't polled yet.
    pub fn shutdown(mut self) -> Vec<SaveOutcome> {
        self.close_and_join();
        self.poll()
    }

    fn close_and_join(&mut self) {
        self.shared.lock().closed = true;
        self.shared.wake.notify_one();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("saver thread panicked");
        }
    }
}

impl Drop for Saver {
    fn drop(&mut self) {
        self.close_and_join();
    }
}

fn run_worker<K: KeyValueStore>(
    shared: &Shared,
    mut store: TaskStore<K>,
    tx: mpsc::Sender<SaveOutcome>,
) {
    loop {
        let tasks = {
            let mut mailbox = shared.lock();
            loop {
                if let Some(tasks) = mailbox.pending.take() {
                    mailbox.in_flight = true;
                    break Some(tasks);
                }
                // Drain before honoring close
                if mailbox.closed {
                    break None;
                }
                mailbox = shared
                    .wake
                    .wait(mailbox)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        let Some(tasks) = tasks else {
            shared.idle.notify_all();
            return;
        };

        let outcome = match store.save(&tasks) {
            Ok(()) => {
                tracing::debug!(count = tasks.len(), "saved tasks");
                SaveOutcome::Saved { count: tasks.len() }
            }
            Err(e) => {
                tracing::warn!(error = %e, "save failed; in-memory list is still current");
                SaveOutcome::Failed(e.to_string())
            }
        };
        // Receiver may be gone during shutdown
        let _ = tx.send(outcome);

        shared.lock().in_flight = false;
        shared.idle.notify_all();
    }
}
