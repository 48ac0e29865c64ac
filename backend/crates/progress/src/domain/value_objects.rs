//! Domain Value Objects
//!
//! Immutable value types for the progress domain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProgressError, ProgressResult};

/// Problem number, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ProblemId(u32);

impl ProblemId {
    pub fn new(number: u32) -> ProgressResult<Self> {
        if number == 0 {
            return Err(ProgressError::InvalidProblemId(
                "problem numbers start at 1".into(),
            ));
        }
        Ok(Self(number))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ProblemId {
    type Error = ProgressError;

    fn try_from(value: u32) -> ProgressResult<Self> {
        Self::new(value)
    }
}

impl From<ProblemId> for u32 {
    fn from(id: ProblemId) -> Self {
        id.0
    }
}

impl FromStr for ProblemId {
    type Err = ProgressError;

    /// Parses the decimal wire form (`"N"` attribute values, path segments)
    fn from_str(s: &str) -> ProgressResult<Self> {
        let number = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ProgressError::InvalidProblemId(format!("`{s}` is not a problem number")))?;
        Self::new(number)
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User's answer to a problem (source text, stored as-is)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Answer(String);

impl Answer {
    /// Upper bound well below the store's item size limit
    pub const MAX_BYTES: usize = 64 * 1024;

    pub fn new(answer: impl Into<String>) -> ProgressResult<Self> {
        let answer = answer.into();
        if answer.len() > Self::MAX_BYTES {
            return Err(ProgressError::InvalidAnswer(format!(
                "answer must be at most {} bytes",
                Self::MAX_BYTES
            )));
        }
        Ok(Self(answer))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Answer {
    type Error = ProgressError;

    fn try_from(value: String) -> ProgressResult<Self> {
        Self::new(value)
    }
}

impl From<Answer> for String {
    fn from(answer: Answer) -> Self {
        answer.0
    }
}

/// Position of a remote call within one logical operation
///
/// The first send is attempt 1; each retry after a credential refresh
/// increments it until `max_retries` is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    number: u32,
    max_retries: u32,
}

impl Attempt {
    pub const DEFAULT_MAX_RETRIES: u32 = 1;

    pub fn first(max_retries: u32) -> Self {
        Self {
            number: 1,
            max_retries,
        }
    }

    /// The following attempt, or `None` once the retry cap is reached
    pub fn next(&self) -> Option<Self> {
        if self.number > self.max_retries {
            return None;
        }
        self.number.checked_add(1).map(|number| Self {
            number,
            max_retries: self.max_retries,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn is_retry(&self) -> bool {
        self.number > 1
    }
}

impl Default for Attempt {
    fn default() -> Self {
        Self::first(Self::DEFAULT_MAX_RETRIES)
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.max_retries.saturating_add(1))
    }
}
