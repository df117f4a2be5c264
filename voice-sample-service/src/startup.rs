use crate::config::{StoreBackend, VoiceConfig};
use crate::handlers;
use crate::middleware::{AccessSecrets, API_SECRET_HEADER};
use crate::services::{InMemoryStore, MongoDb, VoiceStore};
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{header, HeaderName, Method},
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Largest accepted body for `POST /voice-sample/save`.
pub const MAX_SAVE_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VoiceStore>,
    pub secrets: AccessSecrets,
}

impl AppState {
    pub fn new(store: Arc<dyn VoiceStore>, secrets: AccessSecrets) -> Self {
        Self { store, secrets }
    }
}

impl FromRef<AppState> for AccessSecrets {
    fn from_ref(state: &AppState) -> Self {
        state.secrets.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::service_health))
        .route("/metrics", get(handlers::metrics))
        .route("/health-check", get(handlers::list_health_checks))
        .route("/voice-samples", get(handlers::list_voice_samples))
        .route(
            "/voice-sample/save",
            post(handlers::save_voice_sample)
                .layer(DefaultBodyLimit::max(MAX_SAVE_PAYLOAD_BYTES)),
        )
        .route(
            "/voice-sample/delete/:id",
            delete(handlers::delete_voice_sample),
        )
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    HeaderName::from_static(API_SECRET_HEADER),
                ]),
        )
}

/// Opens the store selected by `config.store.backend`. For MongoDB this is
/// the single startup connection attempt.
pub async fn connect_store(config: &VoiceConfig) -> Result<Arc<dyn VoiceStore>, AppError> {
    match config.store.backend {
        StoreBackend::Mongo => {
            let credentials = config.mongodb.credentials.as_ref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("MongoDB credentials were not resolved"))
            })?;
            tracing::info!(
                source = ?config.mongodb.credential_source,
                "Using MongoDB store"
            );
            Ok(Arc::new(MongoDb::connect(credentials, &config.mongodb).await?))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; voice samples are lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
}

impl Application {
    pub async fn build(config: VoiceConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        Self::build_with_store(config, store).await
    }

    pub async fn build_with_store(
        config: VoiceConfig,
        store: Arc<dyn VoiceStore>,
    ) -> Result<Self, AppError> {
        let secrets = AccessSecrets::from_config(&config.auth);
        if !secrets.has_admin() {
            tracing::warn!("NODE_API_SECRET_ADMIN not set; admin routes will answer 403");
        }
        if !secrets.has_user() {
            tracing::warn!("NODE_API_SECRET_USER not set; only the admin secret can save or delete");
        }

        let app = build_router(AppState::new(store, secrets));

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Server is listening on port {}", port);

        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
