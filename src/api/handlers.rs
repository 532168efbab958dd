use axum::{extract::rejection::JsonRejection, extract::State, Json};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::ballot::ScrapeError;
use crate::AppState;

use super::error::ApiError;
use super::models::{
    CandidatesRequest, CandidatesResponse, ChatRequest, ChatResponse, Endpoints, HealthResponse,
    ServiceInfo,
};

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Voting Assistant Chatbot API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            chat: "/chat (POST)",
            candidates: "/candidates (POST)",
            health: "/health (GET)",
        },
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        groq_configured: state.relay.is_configured(),
    })
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload?;
    let message = required(payload.message.as_deref())
        .ok_or_else(|| ApiError::validation("No message provided"))?;

    let response = state.relay.chat(message).await?;
    info!(reply_len = response.len(), "chat reply relayed");

    Ok(Json(ChatResponse { response }))
}

pub async fn candidates(
    State(state): State<AppState>,
    payload: Result<Json<CandidatesRequest>, JsonRejection>,
) -> Result<Json<CandidatesResponse>, ApiError> {
    let Json(payload) = payload?;
    let (Some(us_state), Some(position)) = (
        required(payload.state.as_deref()),
        required(payload.position.as_deref()),
    ) else {
        return Err(ApiError::validation("Both state and position are required"));
    };
    let summarize = payload
        .summarize
        .unwrap_or(state.config.summarize_descriptions);

    let results = state.ballot.candidates(us_state, position).await?;
    let names: Vec<String> = results.into_iter().map(|row| row.candidate).collect();
    info!(state = us_state, position, count = names.len(), "candidates scraped");

    // `buffered` yields in input order, keeping descriptions paired with names.
    let descriptions: Vec<String> = stream::iter(names.iter().cloned())
        .map(|name| {
            let state = state.clone();
            async move { describe(&state, &name, summarize).await }
        })
        .buffered(state.config.description_concurrency.max(1))
        .collect()
        .await;

    Ok(Json(CandidatesResponse {
        candidates: names,
        descriptions,
    }))
}

/// Description text for one candidate; failures become an inline message.
async fn describe(state: &AppState, name: &str, summarize: bool) -> String {
    let biography = match state.ballot.description(name).await {
        Ok(text) => text,
        Err(ScrapeError::DescriptionNotFound) => {
            debug!(candidate = name, "no biography block on candidate page");
            return ScrapeError::DescriptionNotFound.to_string();
        }
        Err(err) => {
            warn!(candidate = name, error = %err, "description lookup failed");
            return format!("Error fetching description: {err}");
        }
    };

    if !summarize {
        return biography;
    }

    match state.relay.summarize(&biography).await {
        Ok(summary) => summary,
        Err(err) => {
            warn!(candidate = name, error = %err, "summary failed, returning raw biography");
            biography
        }
    }
}

/// The value as sent, unless it is absent or blank.
fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
