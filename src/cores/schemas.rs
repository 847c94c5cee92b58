use serde::Serialize;
use serde_json::{json, Value};

use crate::apis::participant_api::schemas::ParticipantRequest;

// Body sent to the GrowSurf participant endpoint.
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPayload {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub metadata: UpstreamMetadata,
}

// Always serialized in full; absent values go out as explicit nulls.
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamMetadata {
    pub advisor_url: Option<String>,
    pub advisor_name: Option<String>,
}

impl UpstreamPayload {
    pub fn new(email: String, req: ParticipantRequest) -> Self {
        UpstreamPayload {
            email,
            first_name: req.first_name,
            last_name: req.last_name,
            ip_address: req.ip_address,
            fingerprint: req.fingerprint,
            metadata: UpstreamMetadata {
                advisor_url: non_empty(req.advisor_url),
                advisor_name: non_empty(req.advisor_name),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// Raw upstream answer: status plus the body as JSON, or {"raw": text} when
// the body is not JSON.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: reqwest::StatusCode,
    pub data: Value,
}

impl UpstreamReply {
    pub fn from_text(status: reqwest::StatusCode, text: &str) -> Self {
        let data = serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }));
        UpstreamReply { status, data }
    }

    pub fn share_url(&self) -> Option<String> {
        self.data
            .get("shareUrl")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}
