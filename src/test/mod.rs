use crate::configs::settings::Config;

pub const SITE_ORIGIN: &str = "https://www.lucentfinancialplanning.co.uk";
pub const PREVIEW_ORIGIN: &str = "https://lucentfp.webflow.io";
pub const CAMPAIGN_ID: &str = "trtaq2";
pub const API_KEY: &str = "gs-secret-key";

// Builds the full relay service the way main does, with injected config and
// credentials.
macro_rules! relay_app {
    ($config:expr, $credentials:expr) => {{
        let config: $crate::configs::settings::Config = $config;
        let state = actix_web::web::Data::new($crate::apis::participant_api::participant::RelayState::new(
            config.clone(),
            std::sync::Arc::new($credentials),
        ));
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::middleware::rate_limit::RateLimitMiddleware::from_config(&config))
                .wrap($crate::middleware::cors::CorsPolicy::new(&config.allowed_origins))
                .app_data(state)
                .app_data(actix_web::web::PayloadConfig::new(config.max_body_bytes))
                .configure($crate::apis::participant_api::participant::configure),
        )
        .await
    }};
}

// Relay config pointed at a mock upstream
pub fn config_for(upstream: &str) -> Config {
    Config {
        upstream_base_url: format!("{}/v2", upstream),
        ..Config::default()
    }
}

pub fn participant_path() -> String {
    format!("/v2/campaign/{}/participant", CAMPAIGN_ID)
}

mod servers_test;
