//! Single-assignment async value
//!
//! A [`Deferred<T>`] starts pending and is resolved exactly once. Consumers
//! either register a callback with [`Deferred::when_ready`] (run in
//! subscription order, or immediately once resolved) or suspend on
//! [`Deferred::wait`].

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;

type Consumer<T> = Box<dyn FnOnce(&Arc<T>) + Send + 'static>;

enum State<T> {
    Pending(Vec<Consumer<T>>),
    /// Value is set; consumers queued before (or during) resolution still run
    Draining(Arc<T>, Vec<Consumer<T>>),
    Resolved(Arc<T>),
}

/// Returned by [`Deferred::resolve`] when a value is already present
///
/// Carries the rejected value back to the caller.
pub struct AlreadyResolved<T>(pub T);

impl<T> fmt::Debug for AlreadyResolved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AlreadyResolved(..)")
    }
}

impl<T> fmt::Display for AlreadyResolved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("deferred value is already resolved")
    }
}

impl<T> std::error::Error for AlreadyResolved<T> {}

/// Single-assignment async value
pub struct Deferred<T> {
    state: Mutex<State<T>>,
    notify: Notify,
}

impl<T> fmt::Debug for Deferred<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("value", &self.current())
            .finish()
    }
}

impl<T> Default for Deferred<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deferred<T>
where
    T: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Pending(Vec::new())),
            notify: Notify::new(),
        }
    }

    /// Resolve with `value`
    ///
    /// Queued consumers run on the calling task, in subscription order,
    /// before this returns. Consumers registered while the queue drains are
    /// appended and run in the same pass.
    pub fn resolve(&self, value: T) -> Result<Arc<T>, AlreadyResolved<T>> {
        let (value, mut queue) = {
            let mut state = self.lock();
            let State::Pending(queue) = &mut *state else {
                return Err(AlreadyResolved(value));
            };
            let queue = std::mem::take(queue);
            let value = Arc::new(value);
            *state = State::Draining(Arc::clone(&value), Vec::new());
            (value, queue)
        };
        self.notify.notify_waiters();

        let _finish = FinishDrain(self);
        loop {
            for consumer in queue.drain(..) {
                consumer(&value);
            }
            let mut state = self.lock();
            match &mut *state {
                State::Draining(_, late) if !late.is_empty() => {
                    queue = std::mem::take(late);
                }
                _ => {
                    *state = State::Resolved(Arc::clone(&value));
                    break;
                }
            }
        }

        Ok(value)
    }

    /// Run `consumer` with the value once it is available
    ///
    /// Runs inline when the value is already resolved.
    pub fn when_ready<F>(&self, consumer: F)
    where
        F: FnOnce(&Arc<T>) + Send + 'static,
    {
        let mut state = self.lock();
        match &mut *state {
            State::Pending(queue) | State::Draining(_, queue) => queue.push(Box::new(consumer)),
            State::Resolved(value) => {
                let value = Arc::clone(value);
                drop(state);
                consumer(&value);
            }
        }
    }

    /// Current value, if resolved
    pub fn current(&self) -> Option<Arc<T>> {
        match &*self.lock() {
            State::Pending(_) => None,
            State::Draining(value, _) | State::Resolved(value) => Some(Arc::clone(value)),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.current().is_some()
    }

    /// Suspend until the value is available
    pub async fn wait(&self) -> Arc<T> {
        loop {
            // Register before checking so a concurrent resolve cannot be missed
            let notified = self.notify.notified();
            if let Some(value) = self.current() {
                return value;
            }
            notified.await;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Leaves `Draining` for `Resolved` even if a consumer unwinds
///
/// Consumers still queued at that point are dropped without running.
struct FinishDrain<'a, T>(&'a Deferred<T>)
where
    T: Send + Sync + 'static;

impl<T> Drop for FinishDrain<'_, T>
where
    T: Send + Sync + 'static,
{
    fn drop(&mut self) {
        let mut state = self.0.lock();
        if let State::Draining(value, late) = &mut *state {
            tracing::warn!(
                dropped = late.len(),
                "Deferred consumer panicked; remaining consumers dropped"
            );
            let value = Arc::clone(value);
            *state = State::Resolved(value);
        }
    }
}
