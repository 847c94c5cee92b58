use utoipa::OpenApi;

use crate::apis::participant_api;
use crate::apis::participant_api::schemas::{ParticipantRequest, ParticipantResponse, UpstreamErrorResponse};
use crate::apis::schemas::ErrorResponse;


#[derive(OpenApi)]
#[openapi(
    paths(
        participant_api::participant::health,
        participant_api::participant::preflight,
        participant_api::participant::add_participant,
    ),
    components(
        schemas(ParticipantRequest, ParticipantResponse, UpstreamErrorResponse, ErrorResponse)
    )
)]

pub struct ApiDoc;
