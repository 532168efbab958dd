pub mod api;
pub mod ballot;
pub mod config;
pub mod prompts;
pub mod relay;

use std::sync::Arc;

use axum::Router;
use tracing::info;

use ballot::BallotClient;
use config::AppConfig;
use relay::RelayClient;

/// Read-only state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub relay: Arc<RelayClient>,
    pub ballot: Arc<BallotClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let relay = RelayClient::new(&config)?;
        let ballot = BallotClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
            ballot: Arc::new(ballot),
        })
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await
}
