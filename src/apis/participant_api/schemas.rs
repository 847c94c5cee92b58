use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// Lead-capture form submission posted by the website to /participant.
#[derive(Deserialize, Serialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub advisor_url: Option<String>,   // Optional, stored as participant metadata.
    pub advisor_name: Option<String>,  // Optional, stored as participant metadata.
    pub ip_address: Option<String>,
    pub fingerprint: Option<String>,
}

// Successful relay response. `participant` mirrors the upstream object verbatim.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub ok: bool,
    #[schema(value_type = Object)]
    pub participant: Value,
    pub share_url: Option<String>,
}

// Upstream failure relayed to the browser with the upstream status and body.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct UpstreamErrorResponse {
    pub ok: bool,
    pub status: u16,
    #[schema(value_type = Object)]
    pub upstream: Value,
}
