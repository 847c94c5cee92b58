use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use crate::configs::settings::AuthScheme;
use crate::cores::credentials::Credentials;
use crate::cores::referral_models::referral_controller::ReferralProvider;
use crate::cores::schemas::{UpstreamPayload, UpstreamReply};
use crate::error::RelayError;

pub struct GrowSurf {
    pub client: Client,
    pub base_url: String,
    pub credentials: Credentials,
    pub auth_scheme: AuthScheme,
}

impl GrowSurf {
    pub fn participant_url(&self) -> String {
        format!(
            "{}/campaign/{}/participant",
            self.base_url.trim_end_matches('/'),
            self.credentials.campaign_id
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth_scheme {
            AuthScheme::ApiKeyHeader => request.header("X-API-KEY", &self.credentials.api_key),
            AuthScheme::BearerToken => request.bearer_auth(&self.credentials.api_key),
        }
    }
}

#[async_trait]
impl ReferralProvider for GrowSurf {
    async fn add_participant(&self, payload: &UpstreamPayload) -> Result<UpstreamReply, RelayError> {
        // 1. Build the request with the configured credential header
        let request = self.client.post(self.participant_url())
            .header("Content-Type", "application/json")
            .json(payload);
        let request = self.authorize(request);

        // 2. Send it; no retry, no local timeout
        let response = request.send().await?;

        // 3. Read the body as text first so non-JSON answers survive
        let status = response.status();
        let text = response.text().await?;
        Ok(UpstreamReply::from_text(status, &text))
    }
}
