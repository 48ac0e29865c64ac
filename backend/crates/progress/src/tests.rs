//! Unit tests for progress crate
//! Covers the dispatcher failure paths, the answer operations end to end
//! over the in-memory transport, and the HTTP surface.

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use identity::domain::entity::identity::{Identity, RefreshHandle};
    use identity::domain::value_object::{email::Email, federated_token::FederatedToken};
    use identity::{
        IdentityConfig, IdentityError, MemoryIdentityProvider, SessionContext, SignInInput,
        SignInUseCase, StaticTokenSource,
    };
    use kernel::id::{IdentityId, IdentityPoolId};

    use crate::application::answers::AnswerService;
    use crate::application::config::ProgressConfig;
    use crate::infra::memory::MemoryTransport;

    pub struct Harness {
        pub session: Arc<SessionContext>,
        pub provider: Arc<MemoryIdentityProvider>,
        pub source: Arc<StaticTokenSource>,
        pub transport: Arc<MemoryTransport>,
        pub service: Arc<AnswerService<MemoryTransport>>,
        sign_in: SignInUseCase<MemoryIdentityProvider, StaticTokenSource>,
    }

    impl Harness {
        pub fn new(transport: MemoryTransport, provider: MemoryIdentityProvider) -> Self {
            Self::with_config(transport, provider, ProgressConfig::default())
        }

        pub fn with_config(
            transport: MemoryTransport,
            provider: MemoryIdentityProvider,
            config: ProgressConfig,
        ) -> Self {
            let session = Arc::new(SessionContext::new());
            let provider = Arc::new(provider);
            let source = Arc::new(StaticTokenSource::new(
                FederatedToken::new("renewed-token").unwrap(),
            ));
            let identity_config = Arc::new(IdentityConfig::for_pool(
                "ap-northeast-1",
                IdentityPoolId::new("ap-northeast-1:pool").unwrap(),
            ));
            let sign_in = SignInUseCase::new(
                Arc::clone(&session),
                Arc::clone(&provider),
                Arc::clone(&source),
                identity_config,
            );
            let transport = Arc::new(transport);
            let service = Arc::new(AnswerService::new(
                Arc::clone(&transport),
                Arc::clone(&session),
                Arc::new(config),
            ));
            Self {
                session,
                provider,
                source,
                transport,
                service,
                sign_in,
            }
        }

        pub async fn sign_in(&self) {
            self.sign_in
                .execute(SignInInput {
                    federated_token: "initial-token".into(),
                    email: "u1@example.com".into(),
                })
                .await
                .unwrap();
        }
    }

    /// Signed in as `U1` over a fresh in-memory store
    pub async fn signed_in() -> Harness {
        let harness = Harness::new(MemoryTransport::new(), MemoryIdentityProvider::new("U1"));
        harness.sign_in().await;
        harness
    }

    /// Session resolved directly with an identity whose refresh is counted
    pub fn session_with_refresh(refresh_fails: bool) -> (Arc<SessionContext>, Arc<AtomicUsize>) {
        let session = Arc::new(SessionContext::new());
        let refreshes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&refreshes);
        let handle = RefreshHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let outcome = if refresh_fails {
                Err(IdentityError::TokenSource("sign-in cancelled".into()))
            } else {
                Ok(IdentityId::new("U1").unwrap())
            };
            Box::pin(async move { outcome })
        });
        session
            .identity()
            .resolve(Identity::new(
                IdentityId::new("U1").unwrap(),
                Email::new("u1@example.com").unwrap(),
                handle,
            ))
            .unwrap();
        (session, refreshes)
    }

    pub const CALL_TIMEOUT: Duration = Duration::from_secs(1);
}

#[cfg(test)]
mod value_object_tests {
    use crate::domain::value_objects::*;
    use crate::error::ProgressError;

    #[test]
    fn test_problem_id() {
        assert_eq!(ProblemId::new(1).unwrap().get(), 1);
        assert!(ProblemId::new(0).is_err());
        assert_eq!("12".parse::<ProblemId>().unwrap().get(), 12);
        assert!(matches!(
            "abc".parse::<ProblemId>(),
            Err(ProgressError::InvalidProblemId(_))
        ));
        assert!("-1".parse::<ProblemId>().is_err());
    }

    #[test]
    fn test_answer_limits() {
        assert!(Answer::new("").is_ok());
        assert!(Answer::new("x".repeat(Answer::MAX_BYTES)).is_ok());
        assert!(matches!(
            Answer::new("x".repeat(Answer::MAX_BYTES + 1)),
            Err(ProgressError::InvalidAnswer(_))
        ));
    }

    #[test]
    fn test_attempt_cap() {
        let first = Attempt::first(1);
        assert_eq!(first.number(), 1);
        assert!(!first.is_retry());

        let second = first.next().unwrap();
        assert_eq!(second.number(), 2);
        assert!(second.is_retry());
        assert!(second.next().is_none());

        assert!(Attempt::first(0).next().is_none());
        assert_eq!(Attempt::default(), Attempt::first(Attempt::DEFAULT_MAX_RETRIES));
    }

    #[test]
    fn test_attempt_display_with_unbounded_retries() {
        assert_eq!(Attempt::first(1).to_string(), "1/2");
        assert_eq!(Attempt::first(u32::MAX).to_string(), format!("1/{}", u32::MAX));
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = ProgressConfig::default();

        assert_eq!(config.table_name, "learnjs");
        assert_eq!(config.region, "ap-northeast-1");
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.call_timeout, Duration::from_secs(10));
        assert_eq!(
            config.endpoint_url(),
            "https://dynamodb.ap-northeast-1.amazonaws.com/"
        );
        assert_eq!(config.first_attempt().number(), 1);
    }

    #[test]
    fn test_development_config() {
        let config = ProgressConfig::development();
        assert_eq!(config.endpoint_url(), "http://localhost:8000/");
        assert!(config.call_timeout < ProgressConfig::default().call_timeout);
    }
}

#[cfg(test)]
mod signing_tests {
    use chrono::{TimeZone, Utc};
    use platform::signing::{SigV4Signer, SigningKeys};

    #[test]
    fn test_store_request_signature_shape() {
        let signer = SigV4Signer::new("ap-northeast-1", "dynamodb");
        let keys = SigningKeys {
            access_key_id: "ASIAEXAMPLE",
            secret_key: "secret",
            session_token: Some("session"),
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let headers = signer.sign_post(
            &keys,
            "dynamodb.ap-northeast-1.amazonaws.com",
            &[
                ("content-type", "application/x-amz-json-1.0"),
                ("x-amz-target", "DynamoDB_20120810.GetItem"),
            ],
            b"{}",
            now,
        );

        let authorization = &headers
            .iter()
            .find(|(name, _)| name == "authorization")
            .unwrap()
            .1;
        assert!(authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=ASIAEXAMPLE/20240102/ap-northeast-1/dynamodb/aws4_request"
        ));
        assert!(authorization.contains(
            "SignedHeaders=content-type;host;x-amz-date;x-amz-security-token;x-amz-target"
        ));

        let signature = authorization.rsplit("Signature=").next().unwrap();
        assert_eq!(hex::decode(signature).unwrap().len(), 32);
        assert!(headers.iter().any(|(name, value)| name == "x-amz-security-token" && value == "session"));
    }
}

#[cfg(test)]
mod dispatcher_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use kernel::id::IdentityId;
    use platform::task::BoxFuture;
    use serde_json::json;

    use super::support::{CALL_TIMEOUT, session_with_refresh};
    use crate::application::dispatcher::{Dispatcher, RetryAction};
    use crate::domain::entities::{AnswerKey, RemoteCall};
    use crate::domain::transport::{CallPayload, RemoteFailure};
    use crate::domain::value_objects::{Answer, Attempt, ProblemId};
    use crate::error::{ProgressError, ProgressResult};
    use crate::infra::memory::MemoryTransport;

    fn write_call(attempt: Attempt) -> RemoteCall {
        RemoteCall::write(
            AnswerKey::new(IdentityId::new("U1").unwrap(), ProblemId::new(1).unwrap()),
            Answer::new("42").unwrap(),
            attempt,
        )
    }

    /// Retry action that records its invocations and returns a marker payload
    fn counting_retry<'a>(count: &Arc<AtomicUsize>) -> RetryAction<'a> {
        let count = Arc::clone(count);
        Box::new(move |next: Attempt| -> BoxFuture<'a, ProgressResult<CallPayload>> {
            count.fetch_add(1, Ordering::SeqCst);
            assert_eq!(next.number(), 2);
            Box::pin(async { Ok(CallPayload::new(json!({ "retried": true }))) })
        })
    }

    fn dispatcher(
        transport: MemoryTransport,
        refresh_fails: bool,
    ) -> (Dispatcher<MemoryTransport>, Arc<MemoryTransport>, Arc<AtomicUsize>) {
        let (session, refreshes) = session_with_refresh(refresh_fails);
        let transport = Arc::new(transport);
        let dispatcher = Dispatcher::new(Arc::clone(&transport), session, CALL_TIMEOUT);
        (dispatcher, transport, refreshes)
    }

    #[tokio::test]
    async fn test_success_resolves_with_payload() {
        let (dispatcher, transport, refreshes) = dispatcher(MemoryTransport::new(), false);
        let retries = Arc::new(AtomicUsize::new(0));

        let payload = dispatcher
            .dispatch(write_call(Attempt::default()), counting_retry(&retries))
            .await
            .unwrap();

        assert_eq!(payload, CallPayload::empty());
        assert_eq!(transport.send_count(), 1);
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
        assert_eq!(retries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_other_failure_is_surfaced_verbatim() {
        let (dispatcher, transport, refreshes) = dispatcher(MemoryTransport::new(), false);
        let failure = RemoteFailure::new(
            "ProvisionedThroughputExceededException",
            "Rate of requests exceeds the allowed throughput",
        )
        .with_status(400);
        transport.fail_next(failure.clone());
        let retries = Arc::new(AtomicUsize::new(0));

        let err = dispatcher
            .dispatch(write_call(Attempt::default()), counting_retry(&retries))
            .await
            .unwrap_err();

        let ProgressError::Remote(surfaced) = err else {
            panic!("expected the remote failure, got {err:?}");
        };
        assert_eq!(surfaced, failure);
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
        assert_eq!(retries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expired_credentials_refresh_then_adopt_retry() {
        let (dispatcher, transport, refreshes) = dispatcher(MemoryTransport::new(), false);
        transport.fail_next(RemoteFailure::new("CredentialsError", "Missing credentials in config"));
        let retries = Arc::new(AtomicUsize::new(0));

        let payload = dispatcher
            .dispatch(write_call(Attempt::default()), counting_retry(&retries))
            .await
            .unwrap();

        assert_eq!(payload, CallPayload::new(json!({ "retried": true })));
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(retries.load(Ordering::SeqCst), 1);
        // The retry action owns the second send
        assert_eq!(transport.send_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_never_retries() {
        let (dispatcher, transport, refreshes) = dispatcher(MemoryTransport::new(), true);
        transport.fail_next(RemoteFailure::new("ExpiredTokenException", "expired").with_status(400));
        let retries = Arc::new(AtomicUsize::new(0));

        let err = dispatcher
            .dispatch(write_call(Attempt::default()), counting_retry(&retries))
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressError::Refresh(_)), "{err:?}");
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(retries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retry_cap() {
        let (dispatcher, transport, refreshes) = dispatcher(MemoryTransport::new(), false);
        transport.fail_next(RemoteFailure::new("ExpiredTokenException", "expired"));
        let retries = Arc::new(AtomicUsize::new(0));
        let second = Attempt::default().next().unwrap();

        let err = dispatcher
            .dispatch(write_call(second), counting_retry(&retries))
            .await
            .unwrap_err();

        let ProgressError::RetryExhausted { attempts, last } = err else {
            panic!("expected exhaustion, got {err:?}");
        };
        assert_eq!(attempts, 2);
        assert_eq!(last.code, "ExpiredTokenException");
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
        assert_eq!(retries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_timeout_is_not_retried() {
        let transport = MemoryTransport::new().with_delay(Duration::from_secs(60));
        let (dispatcher, _transport, refreshes) = dispatcher(transport, false);
        let retries = Arc::new(AtomicUsize::new(0));

        let err = dispatcher
            .dispatch(write_call(Attempt::default()), counting_retry(&retries))
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressError::Timeout(_)));
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
        assert_eq!(retries.load(Ordering::SeqCst), 0);
    }
}

#[cfg(test)]
mod answers_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use identity::MemoryIdentityProvider;
    use kernel::error::app_error::AppError;
    use tokio_test::assert_ok;

    use super::support::{Harness, signed_in};
    use crate::application::config::ProgressConfig;
    use crate::domain::entities::{CallKind, FetchedAnswer};
    use crate::domain::transport::RemoteFailure;
    use crate::domain::value_objects::{Answer, ProblemId};
    use crate::error::ProgressError;
    use crate::infra::memory::MemoryTransport;

    fn problem(n: u32) -> ProblemId {
        ProblemId::new(n).unwrap()
    }

    fn answer(text: &str) -> Answer {
        Answer::new(text).unwrap()
    }

    #[tokio::test]
    async fn test_save_writes_identity_key() {
        let h = signed_in().await;

        assert_ok!(h.service.save_answer(problem(1), answer("42")).await);

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, CallKind::Write);
        assert_eq!(sent[0].key.user_id.as_str(), "U1");
        assert_eq!(sent[0].key.problem_id, problem(1));
        assert_eq!(sent[0].answer, Some(answer("42")));
    }

    #[tokio::test]
    async fn test_fetch_on_empty_store() {
        let h = signed_in().await;

        let fetched = h.service.fetch_answer(problem(1)).await.unwrap();

        assert_eq!(fetched, FetchedAnswer::Empty);
        assert!(fetched.answer().is_none());
    }

    #[tokio::test]
    async fn test_save_then_fetch() {
        let h = signed_in().await;
        h.service
            .save_answer(problem(3), answer("(function() { return 42; })()"))
            .await
            .unwrap();

        let FetchedAnswer::Found(stored) = h.service.fetch_answer(problem(3)).await.unwrap() else {
            panic!("expected a stored answer");
        };
        assert_eq!(stored.user_id.as_str(), "U1");
        assert_eq!(stored.answer.as_str(), "(function() { return 42; })()");
    }

    #[tokio::test]
    async fn test_expired_write_is_retried_once_after_refresh() {
        let h = signed_in().await;
        h.transport
            .fail_next(RemoteFailure::new("CredentialsError", "Missing credentials in config"));

        h.service.save_answer(problem(1), answer("42")).await.unwrap();

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].key, sent[1].key);
        assert_eq!(sent[1].answer, Some(answer("42")));
        assert!(sent[1].attempt.is_retry());
        // sign-in + one refresh
        assert_eq!(h.provider.exchange_calls(), 2);
        assert_eq!(h.source.calls(), 1);
        assert_eq!(h.provider.last_token().as_deref(), Some("renewed-token"));
        assert_eq!(
            h.transport.stored(&sent[1].key),
            Some(answer("42"))
        );
    }

    #[tokio::test]
    async fn test_expired_read_is_retried_once_after_refresh() {
        let h = signed_in().await;
        h.service.save_answer(problem(2), answer("true")).await.unwrap();
        h.transport
            .fail_next(RemoteFailure::new("ExpiredTokenException", "expired").with_status(400));

        let fetched = h.service.fetch_answer(problem(2)).await.unwrap();

        assert_eq!(fetched.answer(), Some(&answer("true")));
        assert_eq!(h.transport.send_count(), 3);
    }

    #[tokio::test]
    async fn test_repeated_expiry_exhausts() {
        let h = signed_in().await;
        for _ in 0..2 {
            h.transport
                .fail_next(RemoteFailure::new("InvalidSignatureException", "bad signature"));
        }

        let err = h
            .service
            .save_answer(problem(1), answer("42"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressError::RetryExhausted { attempts: 2, .. }), "{err:?}");
        assert_eq!(h.transport.send_count(), 2);
        assert_eq!(h.provider.exchange_calls(), 2);
    }

    #[tokio::test]
    async fn test_other_failure_skips_refresh() {
        let h = signed_in().await;
        h.transport.fail_next(
            RemoteFailure::new("ResourceNotFoundException", "Requested resource not found")
                .with_status(400),
        );

        let err = h.service.fetch_answer(problem(1)).await.unwrap_err();

        assert!(matches!(err, ProgressError::Remote(_)));
        assert_eq!(h.transport.send_count(), 1);
        assert_eq!(h.provider.exchange_calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_surfaces() {
        let h = signed_in().await;
        h.transport
            .fail_next(RemoteFailure::new("ExpiredTokenException", "expired"));
        h.provider
            .fail_next(AppError::from_remote(
                "ServiceUnavailableException",
                "identity pool unavailable",
            ));

        let err = h
            .service
            .save_answer(problem(1), answer("42"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressError::Refresh(_)), "{err:?}");
        assert_eq!(h.transport.send_count(), 1);
    }

    #[tokio::test]
    async fn test_calls_wait_for_identity() {
        let h = Harness::new(MemoryTransport::new(), MemoryIdentityProvider::new("U1"));

        let pending = {
            let service = Arc::clone(&h.service);
            tokio::spawn(async move { service.save_answer(ProblemId::new(1).unwrap(), Answer::new("42").unwrap()).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(h.transport.send_count(), 0);

        h.sign_in().await;

        assert_ok!(pending.await.unwrap());
        assert_eq!(h.transport.send_count(), 1);
        assert_eq!(h.transport.sent()[0].key.user_id.as_str(), "U1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_identity_wait_timeout() {
        let config = ProgressConfig {
            identity_wait_timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let h = Harness::with_config(
            MemoryTransport::new(),
            MemoryIdentityProvider::new("U1"),
            config,
        );

        let err = h.service.fetch_answer(problem(1)).await.unwrap_err();

        assert!(matches!(err, ProgressError::IdentityNotReady(_)));
        assert_eq!(h.transport.send_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_expiry_shares_one_refresh() {
        let h = Harness::new(
            MemoryTransport::new(),
            MemoryIdentityProvider::new("U1").with_delay(Duration::from_millis(10)),
        );
        h.sign_in().await;
        h.transport.fail_next(RemoteFailure::new("ExpiredTokenException", "expired"));
        h.transport.fail_next(RemoteFailure::new("ExpiredTokenException", "expired"));

        let (first, second) = tokio::join!(
            h.service.save_answer(problem(1), answer("a")),
            h.service.save_answer(problem(2), answer("b")),
        );

        assert_ok!(first);
        assert_ok!(second);
        assert_eq!(h.transport.send_count(), 4);
        // sign-in + one shared refresh
        assert_eq!(h.provider.exchange_calls(), 2);
        assert_eq!(h.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_end_of_session_drops_credentials() {
        let h = signed_in().await;
        assert!(h.session.credentials().snapshot().is_some());

        h.session.end();

        assert!(h.session.credentials().snapshot().is_none());
    }
}

#[cfg(test)]
mod transport_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use identity::MemoryIdentityProvider;
    use kernel::error::kind::ErrorKind;
    use kernel::id::IdentityId;

    use super::support::Harness;
    use crate::application::config::ProgressConfig;
    use crate::domain::entities::{AnswerKey, RemoteCall};
    use crate::domain::transport::{CallOutcome, RemoteFailure, Transport};
    use crate::domain::value_objects::{Attempt, ProblemId};
    use crate::infra::dynamodb::DynamoDbTransport;
    use crate::infra::memory::MemoryTransport;

    fn failure(outcome: CallOutcome) -> RemoteFailure {
        match outcome {
            CallOutcome::Failure(failure) => failure,
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_credentials_are_read_at_send_time() {
        let h = Harness::new(MemoryTransport::new(), MemoryIdentityProvider::new("U1"));
        let config = ProgressConfig {
            endpoint: Some("http://127.0.0.1:1/".into()),
            call_timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let transport =
            DynamoDbTransport::new(&config, Arc::clone(h.session.credentials())).unwrap();
        let call = RemoteCall::read(
            AnswerKey::new(IdentityId::new("U1").unwrap(), ProblemId::new(1).unwrap()),
            Attempt::default(),
        );

        let before = failure(transport.send(&call).await);
        assert_eq!(before.code, "CredentialsError");
        assert_eq!(before.kind(), ErrorKind::AuthorizationExpired);

        // Same transport instance, credentials written afterwards
        h.sign_in().await;
        let after = failure(transport.send(&call).await);
        assert_eq!(after.code, "NetworkingError");
        assert!(!after.kind().is_recoverable());

        h.session.end();
        let ended = failure(transport.send(&call).await);
        assert_eq!(ended.code, "CredentialsError");
    }
}

#[cfg(test)]
mod router_tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use identity::MemoryIdentityProvider;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::{Harness, signed_in};
    use crate::domain::transport::RemoteFailure;
    use crate::infra::memory::MemoryTransport;
    use crate::presentation::router::progress_router;

    async fn call(h: &Harness, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = progress_router(h.service.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_put_then_get_answer() {
        let h = signed_in().await;

        let (status, _) = call(&h, "PUT", "/answers/1", Some(json!({ "answer": "42" }))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(&h, "GET", "/answers/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "problemId": 1, "answer": "42" }));
    }

    #[tokio::test]
    async fn test_get_missing_answer_is_null() {
        let h = signed_in().await;

        let (status, body) = call(&h, "GET", "/answers/7", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "problemId": 7, "answer": null }));
    }

    #[tokio::test]
    async fn test_invalid_problem_id() {
        let h = signed_in().await;

        let (status, body) = call(&h, "GET", "/answers/zero", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert_eq!(h.transport.send_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_status() {
        let h = signed_in().await;
        h.transport.fail_next(
            RemoteFailure::new("ThrottlingException", "Rate exceeded").with_status(400),
        );

        let (status, body) = call(&h, "GET", "/answers/1", None).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], "ThrottlingException");
    }

    #[tokio::test]
    async fn test_identity_endpoint() {
        let h = Harness::new(MemoryTransport::new(), MemoryIdentityProvider::new("U1"));

        let (status, _) = call(&h, "GET", "/identity", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        h.sign_in().await;

        let (status, body) = call(&h, "GET", "/identity", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": "U1", "email": "u1@example.com" }));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::domain::transport::RemoteFailure;
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use identity::IdentityError;
    use platform::task::Elapsed;
    use std::time::Duration;

    #[test]
    fn test_error_into_response_status_codes() {
        let expired = RemoteFailure::new("ExpiredTokenException", "expired");
        let test_cases: Vec<(ProgressError, StatusCode)> = vec![
            (
                ProgressError::InvalidProblemId("0".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ProgressError::InvalidAnswer("too long".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ProgressError::IdentityNotReady(IdentityError::NotSignedIn),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ProgressError::Remote(RemoteFailure::new("AccessDeniedException", "denied")),
                StatusCode::FORBIDDEN,
            ),
            (
                ProgressError::Refresh(IdentityError::TokenSource("cancelled".into())),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ProgressError::RetryExhausted {
                    attempts: 2,
                    last: expired,
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                ProgressError::Timeout(Elapsed {
                    limit: Duration::from_secs(1),
                }),
                StatusCode::REQUEST_TIMEOUT,
            ),
            (
                ProgressError::MalformedPayload("bad item".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ProgressError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_error_display() {
        let err = ProgressError::RetryExhausted {
            attempts: 2,
            last: RemoteFailure::new("ExpiredTokenException", "expired"),
        };
        assert!(err.to_string().contains("2 attempt"));
        assert!(err.to_string().contains("ExpiredTokenException"));
        assert_eq!(
            err.to_app_error().code(),
            Some("ExpiredTokenException")
        );
    }
}
