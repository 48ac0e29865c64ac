//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, http,
    http::{Method, header},
};
use identity::domain::value_object::federated_token::FederatedToken;
use identity::{
    CognitoIdentityProvider, FederatedTokenSource, FileTokenSource, IdentityConfig,
    IdentityProvider, MemoryIdentityProvider, SessionContext, SignInInput, SignInUseCase,
    StaticTokenSource,
};
use kernel::id::IdentityPoolId;
use progress::domain::transport::Transport;
use progress::{AnswerService, DynamoDbTransport, MemoryTransport, ProgressConfig, progress_router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Where the federated token comes from
enum TokenSetting {
    File(PathBuf),
    Inline(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,identity=info,progress=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let region = env::var("LEARN_REGION").unwrap_or_else(|_| "ap-northeast-1".to_string());
    let email = env::var("LEARN_EMAIL").unwrap_or_else(|_| "learner@example.com".to_string());
    let token = match env::var("LEARN_ID_TOKEN_FILE") {
        Ok(path) => TokenSetting::File(path.into()),
        Err(_) => TokenSetting::Inline(env::var("LEARN_ID_TOKEN").unwrap_or_default()),
    };

    let session = Arc::new(SessionContext::new());

    let app = if env::var("LEARN_BACKEND").is_ok_and(|backend| backend == "memory") {
        tracing::info!("Using in-memory identity provider and answer store");

        let provider = Arc::new(MemoryIdentityProvider::new(
            "ap-northeast-1:00000000-0000-0000-0000-000000000000",
        ));
        let source = Arc::new(StaticTokenSource::new(FederatedToken::new("memory-token")?));
        spawn_sign_in(
            Arc::clone(&session),
            provider,
            source,
            IdentityConfig::development(),
            SignInInput {
                federated_token: "memory-token".to_string(),
                email,
            },
        );

        build_app(
            Arc::new(MemoryTransport::new()),
            Arc::clone(&session),
            ProgressConfig::development(),
        )
    } else {
        let pool_id = env::var("LEARN_IDENTITY_POOL_ID")
            .map_err(|_| anyhow::anyhow!("LEARN_IDENTITY_POOL_ID must be set in environment"))?;
        let identity_config = IdentityConfig::for_pool(region.clone(), IdentityPoolId::new(pool_id)?);
        let progress_config = ProgressConfig {
            region,
            table_name: env::var("LEARN_TABLE_NAME").unwrap_or_else(|_| "learnjs".to_string()),
            ..ProgressConfig::default()
        };

        let provider = Arc::new(CognitoIdentityProvider::new(&identity_config)?);
        let transport = Arc::new(DynamoDbTransport::new(
            &progress_config,
            Arc::clone(session.credentials()),
        )?);

        match token {
            TokenSetting::File(path) => {
                let source = Arc::new(FileTokenSource::new(path));
                let initial = source.read().await?;
                let input = SignInInput {
                    federated_token: initial.expose().to_string(),
                    email,
                };
                spawn_sign_in(Arc::clone(&session), provider, source, identity_config, input);
            }
            TokenSetting::Inline(raw) => {
                let source = Arc::new(StaticTokenSource::new(FederatedToken::new(raw.clone())?));
                let input = SignInInput {
                    federated_token: raw,
                    email,
                };
                spawn_sign_in(Arc::clone(&session), provider, source, identity_config, input);
            }
        }

        build_app(transport, Arc::clone(&session), progress_config)
    };

    // Start server
    let addr: SocketAddr = env::var("LEARN_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(session))
        .await?;

    Ok(())
}

/// Sign in without blocking startup
///
/// Requests arriving before the identity resolves wait on it.
fn spawn_sign_in<P, S>(
    session: Arc<SessionContext>,
    provider: Arc<P>,
    source: Arc<S>,
    config: IdentityConfig,
    input: SignInInput,
) where
    P: IdentityProvider + Sync + 'static,
    S: FederatedTokenSource + Sync + 'static,
{
    let use_case = SignInUseCase::new(session, provider, source, Arc::new(config));
    tokio::spawn(async move {
        match use_case.execute(input).await {
            Ok(identity) => tracing::info!(identity_id = %identity.id, "Signed in"),
            Err(e) => {
                e.log();
                tracing::error!(error = %e, "Sign-in failed; answer requests will time out");
            }
        }
    });
}

fn build_app<T>(transport: Arc<T>, session: Arc<SessionContext>, config: ProgressConfig) -> Router
where
    T: Transport + Sync + 'static,
{
    let service = Arc::new(AnswerService::new(transport, session, Arc::new(config)));

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]));

    Router::new()
        .nest("/api/progress", progress_router(service))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn shutdown_signal(session: Arc<SessionContext>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
    session.end();
    tracing::info!("Shutting down");
}
