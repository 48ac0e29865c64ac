//! Progress Router

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::application::answers::AnswerService;
use crate::domain::transport::Transport;
use crate::presentation::handlers::{self, ProgressAppState};

/// Create the progress router for any transport implementation
pub fn progress_router<T>(service: Arc<AnswerService<T>>) -> Router
where
    T: Transport + Sync + 'static,
{
    let state = ProgressAppState { service };

    Router::new()
        .route(
            "/answers/{problem_id}",
            get(handlers::fetch_answer::<T>).put(handlers::save_answer::<T>),
        )
        .route("/identity", get(handlers::current_identity::<T>))
        .with_state(state)
}
