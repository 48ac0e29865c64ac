//! Answer Service
//!
//! Saves and fetches a user's answers. Every operation waits for the session
//! identity first, so no call leaves before the user is known, and binds its
//! own arguments into the retry action handed to the dispatcher.

use std::sync::Arc;

use identity::{Identity, IdentityFuture, SessionContext};
use platform::task::BoxFuture;

use crate::application::config::ProgressConfig;
use crate::application::dispatcher::{Dispatcher, RetryAction};
use crate::domain::entities::{AnswerKey, FetchedAnswer, RemoteCall};
use crate::domain::services::decode_fetched;
use crate::domain::transport::{CallPayload, Transport};
use crate::domain::value_objects::{Answer, Attempt, ProblemId};
use crate::error::{ProgressError, ProgressResult};

pub struct AnswerService<T>
where
    T: Transport,
{
    dispatcher: Dispatcher<T>,
    session: Arc<SessionContext>,
    config: Arc<ProgressConfig>,
}

impl<T> AnswerService<T>
where
    T: Transport + Sync,
{
    pub fn new(transport: Arc<T>, session: Arc<SessionContext>, config: Arc<ProgressConfig>) -> Self {
        let dispatcher = Dispatcher::new(transport, Arc::clone(&session), config.call_timeout);
        Self {
            dispatcher,
            session,
            config,
        }
    }

    /// The session identity, for callers that gate on sign-in
    pub fn identity(&self) -> &IdentityFuture {
        self.session.identity()
    }

    pub fn transport(&self) -> &Arc<T> {
        self.dispatcher.transport()
    }

    /// Store `answer` for `problem_id` under the signed-in user
    pub async fn save_answer(&self, problem_id: ProblemId, answer: Answer) -> ProgressResult<()> {
        self.put(problem_id, answer, self.config.first_attempt())
            .await
            .inspect_err(ProgressError::log)?;
        tracing::info!(problem_id = %problem_id, "Answer saved");
        Ok(())
    }

    /// Fetch the signed-in user's answer for `problem_id`
    pub async fn fetch_answer(&self, problem_id: ProblemId) -> ProgressResult<FetchedAnswer> {
        let payload = self
            .get(problem_id, self.config.first_attempt())
            .await
            .inspect_err(ProgressError::log)?;
        decode_fetched(&payload)
    }

    fn put(
        &self,
        problem_id: ProblemId,
        answer: Answer,
        attempt: Attempt,
    ) -> BoxFuture<'_, ProgressResult<CallPayload>> {
        Box::pin(async move {
            let identity = self.wait_for_identity().await?;
            let key = AnswerKey::new(identity.id.clone(), problem_id);
            let call = RemoteCall::write(key, answer.clone(), attempt);
            let retry: RetryAction<'_> = Box::new(move |next| self.put(problem_id, answer, next));
            self.dispatcher.dispatch(call, retry).await
        })
    }

    fn get(&self, problem_id: ProblemId, attempt: Attempt) -> BoxFuture<'_, ProgressResult<CallPayload>> {
        Box::pin(async move {
            let identity = self.wait_for_identity().await?;
            let key = AnswerKey::new(identity.id.clone(), problem_id);
            let call = RemoteCall::read(key, attempt);
            let retry: RetryAction<'_> = Box::new(move |next| self.get(problem_id, next));
            self.dispatcher.dispatch(call, retry).await
        })
    }

    async fn wait_for_identity(&self) -> ProgressResult<Arc<Identity>> {
        self.session
            .identity()
            .wait_timeout(self.config.identity_wait_timeout)
            .await
            .map_err(ProgressError::IdentityNotReady)
    }
}
