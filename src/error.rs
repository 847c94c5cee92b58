use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;

use crate::apis::participant_api::schemas::UpstreamErrorResponse;
use crate::apis::schemas::ErrorResponse;

// Every failure a relay request can end in. Each variant renders the exact
// response body the browser receives.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Missing required env vars: {}", .missing.join(", "))]
    MissingCredentials {
        missing: Vec<&'static str>,
        campaign_id_len: usize,
        api_key_len: usize,
        expose_lengths: bool,
    },

    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Missing email")]
    MissingEmail,

    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, body: Value },

    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.to_string())
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::MissingCredentials { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::InvalidJson | RelayError::MissingEmail => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status, .. } => *status,
            RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            RelayError::MethodNotAllowed => builder.content_type("text/plain; charset=utf-8").body(self.to_string()),
            RelayError::MissingCredentials { campaign_id_len, api_key_len, expose_lengths: true, .. } => {
                builder.json(json!({
                    "ok": false,
                    "error": self.to_string(),
                    "seen": { "campaignIdLen": campaign_id_len, "apiKeyLen": api_key_len },
                }))
            }
            RelayError::Upstream { status, body } => builder.json(UpstreamErrorResponse {
                ok: false,
                status: status.as_u16(),
                upstream: body.clone(),
            }),
            _ => builder.json(ErrorResponse::new(self.to_string())),
        }
    }
}
