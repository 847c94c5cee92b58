use async_trait::async_trait;

use crate::cores::schemas::{UpstreamPayload, UpstreamReply};
use crate::error::RelayError;

#[async_trait]
pub trait ReferralProvider: Send + Sync {
    // Create or update a participant. Any HTTP answer, 2xx or not, is an Ok
    // reply; Err is reserved for failures to get an answer at all.
    async fn add_participant(&self, payload: &UpstreamPayload) -> Result<UpstreamReply, RelayError>;
}
