use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct CandidatesRequest {
    pub state: Option<String>,
    pub position: Option<String>,
    /// Overrides `SUMMARIZE_DESCRIPTIONS` for this request.
    #[serde(default)]
    pub summarize: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<String>,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub groq_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub chat: &'static str,
    pub candidates: &'static str,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
