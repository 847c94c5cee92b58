use actix_service::{Service, Transform};
use actix_web::{
    dev::{ServiceRequest, ServiceResponse},
    http::header::{self, HeaderMap, HeaderValue},
    Error,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::task::{Context, Poll};

const ALLOW_HEADERS: &str = "Content-Type";
const ALLOW_METHODS: &str = "POST,OPTIONS";

// Origin allowlist. Never rejects a request: a caller whose origin is not on
// the list gets the first allowlisted origin back, which the browser then
// refuses on its own.
#[derive(Clone, Debug)]
pub struct CorsPolicy {
    allowed_origins: Vec<HeaderValue>,
}

impl CorsPolicy {
    // `origins` must be non-empty and valid header values; Config::validate
    // guarantees both.
    pub fn new(origins: &[String]) -> Self {
        let allowed_origins = origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect::<Vec<_>>();
        CorsPolicy { allowed_origins }
    }

    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        origin
            .and_then(|origin| self.allowed_origins.iter().find(|allowed| *allowed == origin))
            .or_else(|| self.allowed_origins.first())
            .cloned()
    }

    pub fn apply(&self, origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        if let Some(allow) = self.allow_origin(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow);
        }
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsPolicy
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CorsMiddleware {
            service,
            policy: self.clone(),
        })
    }
}

pub struct CorsMiddleware<S> {
    service: S,
    policy: CorsPolicy,
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let policy = self.policy.clone();
        // Only the header is copied; the router needs sole ownership of the request.
        let origin = req.headers().get(header::ORIGIN).cloned();

        let fut = self.service.call(req);
        Box::pin(async move {
            // Rate limiting, extractor failures and relay errors all come
            // back as Ok responses, so they pick up the headers here too.
            let mut res = fut.await?;
            policy.apply(origin.as_ref(), res.headers_mut());
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpRequest};

    fn policy() -> CorsPolicy {
        CorsPolicy::new(&[
            "https://www.lucentfinancialplanning.co.uk".to_string(),
            "https://lucentfp.webflow.io".to_string(),
        ])
    }

    #[::core::prelude::v1::test]
    fn allowed_origin_is_echoed() {
        let origin = HeaderValue::from_static("https://lucentfp.webflow.io");
        assert_eq!(policy().allow_origin(Some(&origin)).unwrap(), "https://lucentfp.webflow.io");
    }

    #[::core::prelude::v1::test]
    fn unknown_origin_gets_first_entry() {
        let origin = HeaderValue::from_static("https://evil.example");
        assert_eq!(policy().allow_origin(Some(&origin)).unwrap(), "https://www.lucentfinancialplanning.co.uk");
    }

    #[::core::prelude::v1::test]
    fn missing_or_empty_origin_gets_first_entry() {
        let empty = HeaderValue::from_static("");
        assert_eq!(policy().allow_origin(None).unwrap(), "https://www.lucentfinancialplanning.co.uk");
        assert_eq!(policy().allow_origin(Some(&empty)).unwrap(), "https://www.lucentfinancialplanning.co.uk");
    }

    #[::core::prelude::v1::test]
    fn origin_match_is_exact() {
        let origin = HeaderValue::from_static("https://lucentfp.webflow.io/");
        assert_eq!(policy().allow_origin(Some(&origin)).unwrap(), "https://www.lucentfinancialplanning.co.uk");
    }

    #[::core::prelude::v1::test]
    fn apply_sets_fixed_headers() {
        let mut headers = HeaderMap::new();
        policy().apply(None, &mut headers);
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "Content-Type");
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "POST,OPTIONS");
    }

    #[actix_rt::test]
    async fn wraps_routes_with_path_parameters() {
        let app = test::init_service(
            App::new()
                .wrap(policy())
                .route("/campaign/{id}", web::post().to(|req: HttpRequest| async move {
                    req.match_info().get("id").unwrap_or_default().to_string()
                })),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/campaign/trtaq2")
            .insert_header(("Origin", "https://lucentfp.webflow.io"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "https://lucentfp.webflow.io");
        assert_eq!(resp.headers().get(header::VARY).unwrap(), "Origin");
        let body = test::read_body(resp).await;
        assert_eq!(body, "trtaq2");
    }

    #[actix_rt::test]
    async fn unmatched_routes_still_get_headers() {
        let app = test::init_service(
            App::new()
                .wrap(policy())
                .route("/health", web::get().to(|| async { "OK" })),
        )
        .await;

        let req = test::TestRequest::get().uri("/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://www.lucentfinancialplanning.co.uk"
        );
    }
}
