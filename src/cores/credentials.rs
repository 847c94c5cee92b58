use crate::error::RelayError;

pub const CAMPAIGN_ID_VAR: &str = "GROWSURF_CAMPAIGN_ID";
pub const API_KEY_VAR: &str = "GROWSURF_API_KEY";

// Where the server-held GrowSurf credentials come from. Looked up on every
// request, never cached.
pub trait CredentialSource: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;
}

// Reads the process environment.
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub campaign_id: String,
    pub api_key: String,
}

// Manual impl so the key never ends up in a log line.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("campaign_id", &self.campaign_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn load(source: &dyn CredentialSource, expose_lengths: bool) -> Result<Credentials, RelayError> {
        let read = |name: &str| source.lookup(name).map(|v| v.trim().to_string()).unwrap_or_default();
        let campaign_id = read(CAMPAIGN_ID_VAR);
        let api_key = read(API_KEY_VAR);

        let mut missing = Vec::new();
        if campaign_id.is_empty() {
            missing.push(CAMPAIGN_ID_VAR);
        }
        if api_key.is_empty() {
            missing.push(API_KEY_VAR);
        }
        if !missing.is_empty() {
            return Err(RelayError::MissingCredentials {
                missing,
                campaign_id_len: campaign_id.len(),
                api_key_len: api_key.len(),
                expose_lengths,
            });
        }

        Ok(Credentials { campaign_id, api_key })
    }
}
