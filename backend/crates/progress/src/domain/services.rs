//! Domain Services
//!
//! Pure domain logic: failure classification and the stored item format.
//!
//! Items are keyed by `(userId: S, problemId: N)` with the answer in
//! `answer: S`, using the store's typed attribute-value JSON.

use kernel::id::IdentityId;
use serde_json::{Map, Value, json};

use crate::domain::entities::{AnswerKey, FetchedAnswer, StoredAnswer};
use crate::domain::transport::{CallPayload, RemoteFailure};
use crate::domain::value_objects::{Answer, ProblemId};
use crate::error::{ProgressError, ProgressResult};

/// What to do about a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Credentials expired or invalid: refresh, then retry once
    RefreshAndRetry,
    /// Anything else: surface the failure unchanged
    Propagate,
}

pub fn classify(failure: &RemoteFailure) -> Disposition {
    if failure.kind().is_recoverable() {
        Disposition::RefreshAndRetry
    } else {
        Disposition::Propagate
    }
}

/// Typed key attributes for `key`
pub fn key_attributes(key: &AnswerKey) -> Value {
    json!({
        "userId": { "S": key.user_id.as_str() },
        "problemId": { "N": key.problem_id.to_string() },
    })
}

/// Full item for a write
pub fn answer_item(key: &AnswerKey, answer: &Answer) -> Value {
    let mut item = key_attributes(key);
    if let Some(attrs) = item.as_object_mut() {
        attrs.insert("answer".into(), json!({ "S": answer.as_str() }));
    }
    item
}

/// Decode a read payload; no `Item` member means nothing is stored
pub fn decode_fetched(payload: &CallPayload) -> ProgressResult<FetchedAnswer> {
    let Some(item) = payload.item() else {
        return Ok(FetchedAnswer::Empty);
    };

    let user_id = IdentityId::new(string_attr(item, "userId", "S")?)
        .map_err(|e| ProgressError::MalformedPayload(e.to_string()))?;
    let problem_id = string_attr(item, "problemId", "N")?
        .parse::<ProblemId>()
        .map_err(|e| ProgressError::MalformedPayload(e.to_string()))?;
    let answer = Answer::new(string_attr(item, "answer", "S")?)
        .map_err(|e| ProgressError::MalformedPayload(e.to_string()))?;

    Ok(FetchedAnswer::Found(StoredAnswer {
        user_id,
        problem_id,
        answer,
    }))
}

fn string_attr<'a>(item: &'a Map<String, Value>, name: &str, ty: &str) -> ProgressResult<&'a str> {
    item.get(name)
        .and_then(|attr| attr.get(ty))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ProgressError::MalformedPayload(format!("item attribute `{name}` is not of type {ty}"))
        })
}
