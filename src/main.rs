use anyhow::Context;
use churn_serve::{audio, config, model, server, telemetry};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load Config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());
    let config = config::AppConfig::load(&config_path)?;

    // 2. Init observability
    telemetry::init_tracing(&config.logging.filter);
    let metrics_handle = telemetry::install_metrics().context("installing metrics recorder")?;

    // 3. Load model and encoders; the service never starts without them
    let context = match model::loader::load_context(&config.model) {
        Ok(context) => Arc::new(context),
        Err(error) => {
            tracing::error!(error = %error, "Failed to load model artifacts");
            return Err(error.into());
        }
    };

    // 4. Optional audio side channel
    let narrator = if config.audio.enabled {
        let synthesizer = audio::HttpSpeechSynthesizer::from_config(&config.audio)?;
        let store = audio::AudioStore::new(&config.audio.output_dir).await?;
        tracing::info!(dir = %store.dir().display(), "Audio summaries enabled");
        Some(audio::AudioNarrator::new(Arc::new(synthesizer), store))
    } else {
        None
    };

    // 5. Create Router
    let app = server::routes::create_router(context, narrator, metrics_handle);

    // 6. Bind & Serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
