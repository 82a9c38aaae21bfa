//! Off-thread execution for storage and network work.
//!
//! The UI thread never blocks: each call runs on its own named worker
//! thread and the result comes back through a completion callback. A
//! worker that panics delivers `None` instead of crashing anything, so
//! callbacks must treat "no result" as a normal outcome.
//!
//! `SequencedDispatcher` adds a request token per dispatch: completions
//! that arrive after a newer request has been dispatched are dropped,
//! so the UI renders the last request made, not the last one to finish.

use crate::error::AppError;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

#[derive(Default)]
struct DispatcherInner {
    next_id: AtomicUsize,
    active: Mutex<HashMap<usize, String>>,
}

/// Spawns one worker thread per dispatched call and tracks the in-flight
/// set. There is no cancellation; a dispatched job always runs to
/// completion.
#[derive(Clone, Default)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` off the calling thread and hand its result to
    /// `on_complete`. A panicking job is logged and delivered as `None`.
    pub fn dispatch<T, F, C>(
        &self,
        name: &str,
        job: F,
        on_complete: C,
    ) -> Result<WorkerHandle, AppError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
        C: FnOnce(Option<T>) + Send + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let thread_name = format!("worker-{}-{}", name, id);
        self.register(id, &thread_name)?;

        let inner = Arc::clone(&self.inner);
        let name_for_log = thread_name.clone();
        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                let result = std::panic::catch_unwind(AssertUnwindSafe(job));
                let value = match result {
                    Ok(v) => Some(v),
                    Err(_) => {
                        log::error!("worker '{}' panicked; delivering no result", name_for_log);
                        None
                    }
                };
                on_complete(value);
                if let Ok(mut active) = inner.active.lock() {
                    active.remove(&id);
                }
            })
            .map_err(|e| {
                self.unregister(id);
                AppError::Internal(format!("failed to spawn worker '{}': {}", thread_name, e))
            })?;

        Ok(WorkerHandle {
            name: thread_name,
            handle: Some(handle),
        })
    }

    /// Names of workers currently running.
    pub fn active_workers(&self) -> Vec<String> {
        match self.inner.active.lock() {
            Ok(active) => active.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn register(&self, id: usize, name: &str) -> Result<(), AppError> {
        let mut active = self.inner.active.lock().map_err(|_| AppError::LockPoisoned)?;
        active.insert(id, name.to_string());
        Ok(())
    }

    fn unregister(&self, id: usize) {
        if let Ok(mut active) = self.inner.active.lock() {
            active.remove(&id);
        }
    }
}

/// Join handle for a dispatched worker. Dropping it detaches the worker;
/// joining is only needed when the caller wants to wait (tests do).
pub struct WorkerHandle {
    name: String,
    handle: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn join(mut self) -> std::thread::Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

/// A dispatcher for request streams where only the newest result matters,
/// e.g. the list view reacting to rapid filter changes.
#[derive(Clone, Default)]
pub struct SequencedDispatcher {
    dispatcher: Dispatcher,
    latest: Arc<AtomicU64>,
}

impl SequencedDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`Dispatcher::dispatch`], but the completion only fires if no
    /// newer request has been dispatched since this one. Stale results
    /// are dropped silently.
    pub fn dispatch_latest<T, F, C>(
        &self,
        name: &str,
        job: F,
        on_complete: C,
    ) -> Result<WorkerHandle, AppError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
        C: FnOnce(Option<T>) + Send + 'static,
    {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.latest);
        let name_for_log = name.to_string();

        self.dispatcher.dispatch(name, job, move |value| {
            if latest.load(Ordering::SeqCst) == token {
                on_complete(value);
            } else {
                log::debug!("dropping stale '{}' result (token {})", name_for_log, token);
            }
        })
    }
}
