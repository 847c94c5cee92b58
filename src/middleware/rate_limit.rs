use actix_web::{body::EitherBody, dev::{Service, ServiceRequest, ServiceResponse, Transform}, Error, HttpResponse};
use leaky_bucket::RateLimiter;
use log::warn;
use std::{task::{Context, Poll}, time::Duration};
use std::sync::Arc;
use futures::future::{ok, LocalBoxFuture, Ready};

use crate::apis::schemas::ErrorResponse;
use crate::configs::settings::Config;

// Token-bucket limiter shared by every worker
#[derive(Clone)]
pub struct RateLimitMiddleware {
    enabled: bool,
    limiter: Arc<RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(enabled: bool, rate_per_interval: usize, max_capacity: usize, interval: Duration) -> Self {
        let limiter = RateLimiter::builder()
            .initial(max_capacity)
            .refill(rate_per_interval)
            .max(max_capacity)
            .interval(interval)
            .fair(false)
            .build();

        Self {
            enabled,
            limiter: Arc::new(limiter),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.rate_limit_enabled,
            config.rate_limit_tps,
            config.rate_limit_bucket_capacity,
            Duration::from_millis(config.rate_limit_refill_interval),
        )
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitMiddlewareService {
            service,
            enabled: self.enabled,
            limiter: self.limiter.clone(),
        })
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    enabled: bool,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !self.enabled || self.limiter.try_acquire(1) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        warn!(target: "error_log", "rate limit exceeded for {} {}", req.method(), req.path());
        let res = req.into_response(HttpResponse::TooManyRequests().json(ErrorResponse::new("Rate limit exceeded")));
        Box::pin(async move { Ok(res.map_into_right_body()) })
    }
}
