//! Future helpers

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed, `Send` future (for recursion and type-erased callbacks)
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error returned when a future does not complete in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation did not complete within {}ms", .limit.as_millis())]
pub struct Elapsed {
    pub limit: Duration,
}

/// Await `fut`, giving up after `limit`
pub async fn with_timeout<F>(limit: Duration, fut: F) -> Result<F::Output, Elapsed>
where
    F: Future,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| Elapsed { limit })
}
