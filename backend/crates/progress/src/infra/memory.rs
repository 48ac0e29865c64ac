//! In-memory transport
//!
//! A process-local answer table speaking the same payload format as the
//! remote store. Failures can be scripted per send, and the most recent
//! calls are kept for inspection.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::json;

use crate::domain::entities::{AnswerKey, CallKind, RemoteCall};
use crate::domain::services::answer_item;
use crate::domain::transport::{CallOutcome, CallPayload, RemoteFailure, Transport};
use crate::domain::value_objects::Answer;

/// Calls kept by [`MemoryTransport::sent`]
pub const SENT_LOG_CAPACITY: usize = 256;

#[derive(Debug, Default)]
pub struct MemoryTransport {
    table: Mutex<HashMap<AnswerKey, Answer>>,
    script: Mutex<VecDeque<RemoteFailure>>,
    sent: Mutex<VecDeque<RemoteCall>>,
    send_count: AtomicUsize,
    delay: Option<Duration>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every send by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the next send with `failure`; queued failures apply in order
    pub fn fail_next(&self, failure: RemoteFailure) {
        lock(&self.script).push_back(failure);
    }

    /// The last [`SENT_LOG_CAPACITY`] calls received, oldest first
    pub fn sent(&self) -> Vec<RemoteCall> {
        lock(&self.sent).iter().cloned().collect()
    }

    /// Total sends, including those no longer in the log
    pub fn send_count(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }

    /// Stored answer for `key`, bypassing the transport
    pub fn stored(&self, key: &AnswerKey) -> Option<Answer> {
        lock(&self.table).get(key).cloned()
    }

    fn apply(&self, call: &RemoteCall) -> CallOutcome {
        let mut table = lock(&self.table);
        match (call.kind, &call.answer) {
            (CallKind::Write, Some(answer)) => {
                table.insert(call.key.clone(), answer.clone());
                CallOutcome::Success(CallPayload::empty())
            }
            (CallKind::Write, None) => CallOutcome::Failure(
                RemoteFailure::new("ValidationException", "write without an answer").with_status(400),
            ),
            (CallKind::Read, _) => match table.get(&call.key) {
                Some(answer) => CallOutcome::Success(CallPayload::new(json!({
                    "Item": answer_item(&call.key, answer),
                }))),
                None => CallOutcome::Success(CallPayload::empty()),
            },
        }
    }
}

impl Transport for MemoryTransport {
    async fn send(&self, call: &RemoteCall) -> CallOutcome {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        {
            let mut sent = lock(&self.sent);
            if sent.len() == SENT_LOG_CAPACITY {
                sent.pop_front();
            }
            sent.push_back(call.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = lock(&self.script).pop_front();
        if let Some(failure) = scripted {
            tracing::trace!(key = %call.key, code = %failure.code, "Scripted failure");
            return CallOutcome::Failure(failure);
        }

        self.apply(call)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
