//! In-flight call deduplication
//!
//! [`SingleFlight::run`] executes at most one operation at a time. Callers
//! that arrive while an operation is running do not start their own; they
//! wait for the running one and receive a clone of its outcome.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

type Slot<T, E> = Option<watch::Receiver<Option<Result<T, E>>>>;

enum Role<T, E> {
    Leader(watch::Sender<Option<Result<T, E>>>),
    Follower(watch::Receiver<Option<Result<T, E>>>),
}

/// Shares one in-flight operation between concurrent callers
pub struct SingleFlight<T, E> {
    inflight: Mutex<Slot<T, E>>,
}

impl<T, E> Default for SingleFlight<T, E>
where
    T: Clone,
    E: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone,
    E: Clone,
{
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(None),
        }
    }

    /// Whether an operation is currently running
    pub fn is_running(&self) -> bool {
        self.lock().is_some()
    }

    /// Run `op`, or join the operation that is already running
    ///
    /// If the running operation is dropped before it finishes, one of the
    /// waiting callers takes over and runs its own `op`.
    pub async fn run<F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        loop {
            let role = {
                let mut slot = self.lock();
                match &*slot {
                    Some(rx) => Role::Follower(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        *slot = Some(rx);
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Follower(mut rx) => {
                    tracing::trace!("joining in-flight operation");
                    let published = match rx.wait_for(Option::is_some).await {
                        Ok(value) => (*value).clone(),
                        Err(_) => None,
                    };
                    if let Some(result) = published {
                        return result;
                    }
                    // leader was dropped without publishing
                }
                Role::Leader(tx) => {
                    let _clear = ClearOnDrop(&self.inflight);
                    let result = op().await;
                    tx.send_replace(Some(result.clone()));
                    return result;
                }
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot<T, E>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Frees the slot when the leader finishes or is cancelled
struct ClearOnDrop<'a, T, E>(&'a Mutex<Slot<T, E>>);

impl<T, E> Drop for ClearOnDrop<'_, T, E> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
