use actix_web::http::{Method, StatusCode};
use actix_web::{get, web, HttpRequest, HttpResponse, Responder, ResponseError};
use log::{error, info};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

use crate::apis::participant_api::schemas::{ParticipantRequest, ParticipantResponse, UpstreamErrorResponse};
use crate::apis::schemas::ErrorResponse;
use crate::configs::settings::Config;
use crate::cores::credentials::{CredentialSource, Credentials};
use crate::cores::referral_models::growsurf::GrowSurf;
use crate::cores::referral_models::referral_controller::ReferralProvider;
use crate::cores::schemas::UpstreamPayload;
use crate::error::RelayError;
use crate::utils::log::log_request;

// Shared by every request; holds nothing request-specific.
pub struct RelayState {
    pub config: Config,
    pub credentials: Arc<dyn CredentialSource>,
    pub client: Client,
}

impl RelayState {
    pub fn new(config: Config, credentials: Arc<dyn CredentialSource>) -> Self {
        RelayState { config, credentials, client: Client::new() }
    }

    fn provider(&self, credentials: Credentials) -> Box<dyn ReferralProvider> {
        Box::new(GrowSurf {
            client: self.client.clone(),
            base_url: self.config.upstream_base_url.clone(),
            credentials,
            auth_scheme: self.config.auth_scheme,
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
       .service(
           web::resource("/participant")
               .route(web::post().to(add_participant))
               .route(web::method(Method::OPTIONS).to(preflight))
               .default_service(web::to(method_not_allowed)),
       );
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, body = String))
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    "OK"
}

#[utoipa::path(
    options,
    path = "/participant",
    responses((status = 200, description = "CORS preflight, empty body"))
)]
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn method_not_allowed() -> HttpResponse {
    RelayError::MethodNotAllowed.error_response()
}

#[utoipa::path(
    post,
    path = "/participant",
    request_body = ParticipantRequest,
    responses(
        (status = 200, body = ParticipantResponse),
        (status = 400, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
        (status = "4XX", description = "Upstream rejection, upstream status and body relayed", body = UpstreamErrorResponse),
    )
)]
pub async fn add_participant(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<RelayState>,
) -> HttpResponse {
    match relay(&state, &body).await {
        Ok(resp) => {
            info!(target: "access_log", "{}", log_request(&req, 200, None));
            HttpResponse::Ok().json(resp)
        }
        Err(err) => {
            let message = err.to_string();
            let line = log_request(&req, err.status_code().as_u16(), Some(message.as_str()));
            match err {
                RelayError::InvalidJson | RelayError::MissingEmail => info!(target: "access_log", "{}", line),
                _ => error!(target: "error_log", "{}", line),
            }
            err.error_response()
        }
    }
}

async fn relay(state: &RelayState, body: &[u8]) -> Result<ParticipantResponse, RelayError> {
    // 1. Server credentials, checked before anything else touches the body
    let credentials = Credentials::load(state.credentials.as_ref(), state.config.expose_credential_lengths)?;

    // 2. Validate the submission
    let req_body = parse_body(body)?;
    let email = req_body.email.clone().filter(|email| !email.is_empty()).ok_or(RelayError::MissingEmail)?;

    // 3. Forward to the referral service
    let payload = UpstreamPayload::new(email, req_body);
    let reply = state.provider(credentials).add_participant(&payload).await?;

    // 4. Relay failures verbatim, reshape successes
    if !reply.status.is_success() {
        let status = StatusCode::from_u16(reply.status.as_u16())
            .map_err(|err| RelayError::Transport(err.to_string()))?;
        return Err(RelayError::Upstream { status, body: reply.data });
    }

    let share_url = reply.share_url();
    Ok(ParticipantResponse {
        ok: true,
        participant: reply.data,
        share_url,
    })
}

// An empty body reads as `{}`; anything but a JSON object is rejected
fn parse_body(body: &[u8]) -> Result<ParticipantRequest, RelayError> {
    if body.is_empty() {
        return Ok(ParticipantRequest::default());
    }
    let value: Value = serde_json::from_slice(body).map_err(|_| RelayError::InvalidJson)?;
    if !value.is_object() {
        return Err(RelayError::InvalidJson);
    }
    serde_json::from_value(value).map_err(|_| RelayError::InvalidJson)
}
