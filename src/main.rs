use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ballot_relay::{build_app, run_server, AppState};
use ballot_relay::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;
    if !config.groq_configured() {
        warn!("GROQ_API_KEY is not set; /chat will return configuration errors");
    }
    info!(
        model = %config.groq_model,
        ballot_base_url = %config.ballot_base_url,
        concurrency = config.description_concurrency,
        summarize = config.summarize_descriptions,
        "configuration loaded"
    );

    let state = AppState::new(config).context("Failed to create HTTP clients")?;
    let app = build_app(state);

    run_server(app, port).await.context("server failed")?;
    Ok(())
}
