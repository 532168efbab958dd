use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::ballot::ScrapeError;
use crate::relay::RelayError;

use super::models::ErrorResponse;

/// Everything a handler can fail with, already phrased for the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unsupported(String),
    #[error("{0}")]
    Configuration(String),
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
    #[error("{0}")]
    Connectivity(String),
    #[error("{0}")]
    Parsing(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Unsupported(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::Configuration(_) | Self::Connectivity(_) | Self::Parsing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::MissingApiKey => {
                Self::Configuration(RelayError::MissingApiKey.to_string())
            }
            RelayError::Connectivity(source) => {
                error!(error = %source, "completion request failed");
                Self::Connectivity("Failed to connect to AI service".to_string())
            }
            RelayError::UpstreamStatus(status) => Self::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("API request failed: {}", status.as_u16()),
            },
            RelayError::InvalidResponse(detail) => {
                warn!(%detail, "completion response parsing error");
                Self::Parsing("Invalid response from AI service".to_string())
            }
        }
    }
}

impl From<ScrapeError> for ApiError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::UnsupportedPosition(_) => Self::Unsupported(err.to_string()),
            ScrapeError::Connectivity { ref url, ref source } => {
                error!(%url, error = %source, "page fetch failed");
                Self::Connectivity("Failed to connect to election results source".to_string())
            }
            // A missing page usually means the state name is wrong.
            ScrapeError::UpstreamStatus { status, .. } if status == StatusCode::NOT_FOUND => {
                Self::Upstream {
                    status: StatusCode::BAD_REQUEST,
                    message: format!("Election page not found: {}", status.as_u16()),
                }
            }
            ScrapeError::UpstreamStatus { status, .. } => Self::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Election page request failed: {}", status.as_u16()),
            },
            ScrapeError::PageStructure(_) | ScrapeError::DescriptionNotFound => {
                warn!(error = %err, "scraped page did not match expected layout");
                Self::Parsing(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
