use serde::Deserialize;
use std::fs::{File, metadata};
use std::io::Read;
use once_cell::sync::Lazy;
use serde_yaml;
use thiserror::Error;

// ---------------------------------------------- Auth Scheme ----------------------------------------------
// How the GrowSurf API key is presented to the upstream service
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    // X-API-KEY: {apiKey}
    #[default]
    ApiKeyHeader,
    // Authorization: Bearer {apiKey}
    BearerToken,
}

// ---------------------------------------------- Errors ----------------------------------------------
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("allowed_origins must contain at least one origin")]
    EmptyAllowlist,
    #[error("invalid origin {0:?}: expected scheme://host[:port] without path or trailing slash")]
    InvalidOrigin(String),
    #[error("duplicate origin {0:?} in allowed_origins")]
    DuplicateOrigin(String),
    #[error("invalid upstream_base_url {0:?}: expected an http(s) URL")]
    InvalidUpstream(String),
}

// ---------------------------------------------- Config ----------------------------------------------
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub upstream_base_url: String,
    pub auth_scheme: AuthScheme,
    pub expose_credential_lengths: bool,
    pub max_body_bytes: usize,
    pub rate_limit_enabled: bool,
    pub rate_limit_tps: usize,
    pub rate_limit_bucket_capacity: usize,
    pub rate_limit_refill_interval: u64,
    pub api_docs_enabled: bool,
    pub tls_enabled: bool,
    pub server_cert_file: String,
    pub key_file: String,
    pub log_config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            allowed_origins: vec![
                "https://www.lucentfinancialplanning.co.uk".to_string(),
                "https://lucentfp.webflow.io".to_string(),
            ],
            upstream_base_url: "https://api.growsurf.com/v2".to_string(),
            auth_scheme: AuthScheme::ApiKeyHeader,
            expose_credential_lengths: false,
            max_body_bytes: 64 * 1024,
            rate_limit_enabled: false,
            rate_limit_tps: 50,
            rate_limit_bucket_capacity: 100,
            rate_limit_refill_interval: 1000,
            api_docs_enabled: false,
            tls_enabled: false,
            server_cert_file: "/etc/growsurf-relay/https/server.crt".to_string(),
            key_file: "/etc/growsurf-relay/https/server.key".to_string(),
            log_config_file: default_log_config_file(),
        }
    }
}

impl Config {
    pub fn load_config() -> Result<Config, SettingsError> {
        let config_path = if metadata("/etc/growsurf-relay/configs.yaml").is_ok() {
            "/etc/growsurf-relay/configs.yaml"
        } else {
            "src/configs/configs.yaml"
        };
        Config::from_file(config_path)
    }

    pub fn from_file(config_path: &str) -> Result<Config, SettingsError> {
        let io_err = |source| SettingsError::Io { path: config_path.to_string(), source };
        let mut file = File::open(config_path).map_err(io_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err)?;
        Config::from_yaml(&contents).map_err(|source| SettingsError::Parse { path: config_path.to_string(), source })
    }

    pub fn from_yaml(contents: &str) -> Result<Config, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    // Checked once at startup; the handlers assume a valid allowlist afterwards
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.allowed_origins.is_empty() {
            return Err(SettingsError::EmptyAllowlist);
        }
        for (i, origin) in self.allowed_origins.iter().enumerate() {
            if !is_valid_origin(origin) {
                return Err(SettingsError::InvalidOrigin(origin.clone()));
            }
            if self.allowed_origins[..i].contains(origin) {
                return Err(SettingsError::DuplicateOrigin(origin.clone()));
            }
        }
        let upstream = self.upstream_base_url.trim_end_matches('/');
        let host = upstream
            .strip_prefix("https://")
            .or_else(|| upstream.strip_prefix("http://"))
            .unwrap_or("");
        if host.is_empty() {
            return Err(SettingsError::InvalidUpstream(self.upstream_base_url.clone()));
        }
        Ok(())
    }
}

// Same lookup order as the settings file: /etc first, then the source tree
fn default_log_config_file() -> String {
    if metadata("/etc/growsurf-relay/log4rs.yaml").is_ok() {
        "/etc/growsurf-relay/log4rs.yaml".to_string()
    } else {
        "src/configs/log4rs.yaml".to_string()
    }
}

// An origin is scheme://host[:port] and nothing else
fn is_valid_origin(origin: &str) -> bool {
    let rest = match origin.strip_prefix("https://").or_else(|| origin.strip_prefix("http://")) {
        Some(rest) => rest,
        None => return false,
    };
    if rest.is_empty() || rest.contains(&['/', '?', '#', ' '][..]) {
        return false;
    }
    match rest.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => true,
    }
}

// 全局静态配置对象
pub static GLOBAL_CONFIG: Lazy<Result<Config, SettingsError>> = Lazy::new(|| {
    let config = Config::load_config()?;
    config.validate()?;
    Ok(config)
});
