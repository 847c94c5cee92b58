use actix_web::{web, App, HttpServer};
use log::info;
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use std::{fs::File, io::BufReader};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use log4rs::init_file;

mod apis;
mod cores;
mod configs;
mod error;
mod middleware;
mod utils;

use crate::configs::settings::{Config, GLOBAL_CONFIG};
use crate::cores::credentials::EnvCredentials;
use crate::middleware::cors::CorsPolicy;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::apis::api_doc::ApiDoc;
use crate::apis::participant_api::participant::RelayState;

#[cfg(test)]
mod test;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Credentials may come from a local .env during development
    dotenvy::dotenv().ok();

    let config = match &*GLOBAL_CONFIG {
        Ok(config) => config.clone(),
        Err(err) => return Err(Error::new(ErrorKind::InvalidInput, format!("Invalid configuration: {}", err))),
    };

    init_file(&config.log_config_file, Default::default())
        .map_err(|e| Error::new(ErrorKind::Other, format!("Logging setup failed: {}", e)))?;

    // Set the port number
    let port = config.port;
    info!(
        "Starting growsurf-relay on port {} (auth scheme {:?}, {} allowed origins)",
        port,
        config.auth_scheme,
        config.allowed_origins.len()
    );

    let state = web::Data::new(RelayState::new(config.clone(), Arc::new(EnvCredentials)));
    let rate_limiter = RateLimitMiddleware::from_config(&config);
    let app_config = config.clone();

    // Start the HTTP server
    let server = HttpServer::new(move || {
        let config = &app_config;
        App::new()
            .wrap(rate_limiter.clone())
            .wrap(CorsPolicy::new(&config.allowed_origins))
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(config.max_body_bytes))
            .configure(apis::participant_api::participant::configure)
            .configure(|cfg| {
                if config.api_docs_enabled {
                    cfg.service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
                }
            })
    });

    let server = if config.tls_enabled {
        server.bind_rustls_0_23(("0.0.0.0", port), load_tls_config(&config)?)?
    } else {
        server.bind(("0.0.0.0", port))?
    };
    server.run().await
}

fn load_tls_config(config: &Config) -> std::io::Result<rustls::ServerConfig> {
    let mut certs_file = BufReader::new(File::open(&config.server_cert_file)?);
    let mut key_file = BufReader::new(File::open(&config.key_file)?);

    let tls_certs = rustls_pemfile::certs(&mut certs_file)
        .collect::<Result<Vec<_>, _>>()?;
    let tls_key = rustls_pemfile::private_key(&mut key_file)?
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("No private key found in {}", config.key_file)))?;

    // set up TLS config options
    rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(tls_certs, tls_key)
        .map_err(|e| Error::new(ErrorKind::InvalidData, format!("Invalid TLS certificate: {}", e)))
}
