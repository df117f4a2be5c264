use service_core::error::AppError;
use service_core::observability::init_tracing;
use voice_sample_service::config::VoiceConfig;
use voice_sample_service::services::init_metrics;
use voice_sample_service::startup::Application;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Fail fast on configuration before anything else starts.
    let config = VoiceConfig::load()?;

    init_tracing(
        "voice-sample-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        backend = ?config.store.backend,
        "Starting voice sample service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start voice sample service, exiting: {}", e);
        e
    })?;

    app.run_until_stopped().await?;
    Ok(())
}
