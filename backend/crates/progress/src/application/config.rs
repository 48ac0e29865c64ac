//! Application Configuration
//!
//! Configuration for the progress application layer.

use std::time::Duration;

use crate::domain::value_objects::Attempt;

/// Progress application configuration
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Table holding one item per (user, problem)
    pub table_name: String,
    /// Store region
    pub region: String,
    /// Override of the store endpoint (DynamoDB Local, tests)
    pub endpoint: Option<String>,
    /// Upper bound for one remote call
    pub call_timeout: Duration,
    /// Upper bound for waiting on the session identity
    pub identity_wait_timeout: Duration,
    /// Retries allowed after a credential refresh
    pub max_retries: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            table_name: "learnjs".to_string(),
            region: "ap-northeast-1".to_string(),
            endpoint: None,
            call_timeout: Duration::from_secs(10),
            identity_wait_timeout: Duration::from_secs(120),
            max_retries: Attempt::DEFAULT_MAX_RETRIES,
        }
    }
}

impl ProgressConfig {
    /// Create config for development (local store, short timeouts)
    pub fn development() -> Self {
        Self {
            endpoint: Some("http://localhost:8000/".to_string()),
            call_timeout: Duration::from_secs(3),
            identity_wait_timeout: Duration::from_secs(30),
            ..Default::default()
        }
    }

    /// Store endpoint URL
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://dynamodb.{}.amazonaws.com/", self.region))
    }

    /// First attempt of a logical operation
    pub fn first_attempt(&self) -> Attempt {
        Attempt::first(self.max_retries)
    }
}
