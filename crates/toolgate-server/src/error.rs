use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use toolgate_core::{CapabilityError, ErrorEnvelope};

/// Everything a route can fail with, rendered as an error envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("invalid JSON body: {0}")]
    Body(#[from] JsonRejection),

    #[error("invalid path parameter: {0}")]
    Path(#[from] PathRejection),

    #[error("invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Capability(error) => {
                StatusCode::from_u16(error.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Body(_) | Self::Path(_) | Self::Query(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = match &self {
            Self::Capability(error) => ErrorEnvelope::from(error),
            Self::Body(rejection) => ErrorEnvelope::new("Invalid JSON body").with_details(rejection.body_text()),
            Self::Path(rejection) => ErrorEnvelope::new("Invalid path parameter").with_details(rejection.body_text()),
            Self::Query(rejection) => ErrorEnvelope::new("Invalid query string").with_details(rejection.body_text()),
            Self::NotFound => ErrorEnvelope::new("Not found"),
        };

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %envelope.error, "request failed");
        }
        (status, Json(envelope)).into_response()
    }
}
