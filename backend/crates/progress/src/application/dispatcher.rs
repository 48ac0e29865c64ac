//! Request Dispatcher
//!
//! Sends one remote call and decides what a failure means: an expired
//! credential triggers one refresh and hands control to the retry action,
//! anything else is surfaced unchanged.

use std::sync::Arc;
use std::time::Duration;

use identity::SessionContext;
use platform::task::{BoxFuture, with_timeout};

use crate::domain::entities::RemoteCall;
use crate::domain::services::{Disposition, classify};
use crate::domain::transport::{CallOutcome, CallPayload, Transport};
use crate::domain::value_objects::Attempt;
use crate::error::{ProgressError, ProgressResult};

/// Re-invokes the original data access operation with the next attempt
pub type RetryAction<'a> =
    Box<dyn FnOnce(Attempt) -> BoxFuture<'a, ProgressResult<CallPayload>> + Send + 'a>;

pub struct Dispatcher<T>
where
    T: Transport,
{
    transport: Arc<T>,
    session: Arc<SessionContext>,
    call_timeout: Duration,
}

impl<T> Dispatcher<T>
where
    T: Transport + Sync,
{
    pub fn new(transport: Arc<T>, session: Arc<SessionContext>, call_timeout: Duration) -> Self {
        Self {
            transport,
            session,
            call_timeout,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Send `call`; on an expired credential refresh once and adopt the
    /// result of `retry` verbatim
    pub async fn dispatch<'a>(
        &'a self,
        call: RemoteCall,
        retry: RetryAction<'a>,
    ) -> ProgressResult<CallPayload> {
        tracing::debug!(call = %call, state = "sent");

        let outcome = with_timeout(self.call_timeout, self.transport.send(&call))
            .await
            .inspect_err(|_| tracing::debug!(call = %call, state = "failed", "timed out"))?;

        let failure = match outcome {
            CallOutcome::Success(payload) => {
                tracing::debug!(call = %call, state = "succeeded");
                return Ok(payload);
            }
            CallOutcome::Failure(failure) => failure,
        };

        tracing::debug!(call = %call, state = "error_classified", code = %failure.code);
        if classify(&failure) == Disposition::Propagate {
            tracing::debug!(call = %call, state = "failed");
            return Err(ProgressError::Remote(failure));
        }

        let Some(next) = call.attempt.next() else {
            tracing::debug!(call = %call, state = "exhausted");
            return Err(ProgressError::RetryExhausted {
                attempts: call.attempt.number(),
                last: failure,
            });
        };

        let identity = self.session.identity().current().ok_or_else(|| {
            ProgressError::Internal("call dispatched before the identity resolved".into())
        })?;

        tracing::debug!(call = %call, state = "refreshing");
        match identity.refresh().await {
            Ok(identity_id) => {
                tracing::debug!(call = %call, state = "retried", identity_id = %identity_id);
                retry(next).await
            }
            Err(err) => {
                tracing::debug!(call = %call, state = "failed", "refresh failed");
                Err(ProgressError::Refresh(err))
            }
        }
    }
}
