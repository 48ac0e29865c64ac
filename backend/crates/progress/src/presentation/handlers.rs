//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use identity::IdentityError;

use crate::application::answers::AnswerService;
use crate::domain::transport::Transport;
use crate::domain::value_objects::{Answer, ProblemId};
use crate::error::{ProgressError, ProgressResult};
use crate::presentation::dto::{AnswerResponse, IdentityResponse, SaveAnswerRequest};

/// Shared state for progress handlers
pub struct ProgressAppState<T>
where
    T: Transport + Sync + 'static,
{
    pub service: Arc<AnswerService<T>>,
}

impl<T> Clone for ProgressAppState<T>
where
    T: Transport + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// GET /answers/{problem_id}
pub async fn fetch_answer<T>(
    State(state): State<ProgressAppState<T>>,
    Path(problem_id): Path<String>,
) -> ProgressResult<Json<AnswerResponse>>
where
    T: Transport + Sync + 'static,
{
    let problem_id: ProblemId = problem_id.parse()?;
    let fetched = state.service.fetch_answer(problem_id).await?;

    Ok(Json(AnswerResponse {
        problem_id: problem_id.get(),
        answer: fetched.answer().map(|answer| answer.as_str().to_string()),
    }))
}

/// PUT /answers/{problem_id}
pub async fn save_answer<T>(
    State(state): State<ProgressAppState<T>>,
    Path(problem_id): Path<String>,
    Json(req): Json<SaveAnswerRequest>,
) -> ProgressResult<impl IntoResponse>
where
    T: Transport + Sync + 'static,
{
    let problem_id: ProblemId = problem_id.parse()?;
    let answer = Answer::new(req.answer)?;

    state.service.save_answer(problem_id, answer).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /identity
pub async fn current_identity<T>(
    State(state): State<ProgressAppState<T>>,
) -> ProgressResult<Json<IdentityResponse>>
where
    T: Transport + Sync + 'static,
{
    let identity = state
        .service
        .identity()
        .current()
        .ok_or(ProgressError::IdentityNotReady(IdentityError::NotSignedIn))?;

    Ok(Json(IdentityResponse {
        id: identity.id.to_string(),
        email: identity.email.to_string(),
    }))
}
