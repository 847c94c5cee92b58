#[cfg(test)]
pub mod tests {
    use actix_web::{test, App};
    use crate::apis::participant_api::participant::health;

    #[actix_rt::test]
    async fn test_health() {
        let mut app = test::init_service(App::new().service(health)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&mut app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(body, "OK");
    }

    #[actix_rt::test]
    async fn test_health_needs_no_credentials() {
        use crate::cores::credentials::tests::StaticCredentials;
        use crate::test::config_for;
        use std::collections::HashMap;

        let app = relay_app!(config_for("http://127.0.0.1:1"), StaticCredentials(HashMap::new()));
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }
}
