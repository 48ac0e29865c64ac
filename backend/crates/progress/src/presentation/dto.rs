//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Response for GET /answers/{problem_id}
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub problem_id: u32,
    /// `null` when nothing has been saved yet
    pub answer: Option<String>,
}

/// Request for PUT /answers/{problem_id}
#[derive(Debug, Clone, Deserialize)]
pub struct SaveAnswerRequest {
    pub answer: String,
}

/// Response for GET /identity
#[derive(Debug, Clone, Serialize)]
pub struct IdentityResponse {
    pub id: String,
    pub email: String,
}
