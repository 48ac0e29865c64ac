//! Domain Entities
//!
//! Core entities for the progress domain.

use std::fmt;

use kernel::id::IdentityId;

use crate::domain::value_objects::{Answer, Attempt, ProblemId};

/// Direction of a remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Read,
    Write,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Read => "read",
            CallKind::Write => "write",
        }
    }
}

/// Primary key of a stored answer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnswerKey {
    pub user_id: IdentityId,
    pub problem_id: ProblemId,
}

impl AnswerKey {
    pub fn new(user_id: IdentityId, problem_id: ProblemId) -> Self {
        Self {
            user_id,
            problem_id,
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.problem_id)
    }
}

/// One prepared request against the store
///
/// Single use: a retry builds a new call with the next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
    pub kind: CallKind,
    pub key: AnswerKey,
    /// Present for writes
    pub answer: Option<Answer>,
    pub attempt: Attempt,
}

impl RemoteCall {
    pub fn read(key: AnswerKey, attempt: Attempt) -> Self {
        Self {
            kind: CallKind::Read,
            key,
            answer: None,
            attempt,
        }
    }

    pub fn write(key: AnswerKey, answer: Answer, attempt: Attempt) -> Self {
        Self {
            kind: CallKind::Write,
            key,
            answer: Some(answer),
            attempt,
        }
    }
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (attempt {})", self.kind.as_str(), self.key, self.attempt)
    }
}

/// Answer as persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAnswer {
    pub user_id: IdentityId,
    pub problem_id: ProblemId,
    pub answer: Answer,
}

/// Result of a fetch; absence is not an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedAnswer {
    Found(StoredAnswer),
    Empty,
}

impl FetchedAnswer {
    pub fn answer(&self) -> Option<&Answer> {
        match self {
            FetchedAnswer::Found(stored) => Some(&stored.answer),
            FetchedAnswer::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FetchedAnswer::Empty)
    }
}
