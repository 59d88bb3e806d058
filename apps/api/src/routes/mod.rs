pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::reports::handlers as reports;
use crate::state::AppState;
use crate::wanted_persons::handlers as wanted_persons;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Wanted persons
        .route(
            "/wanted-persons",
            get(wanted_persons::handle_list_wanted_persons),
        )
        .route(
            "/wanted-persons/scrape",
            post(wanted_persons::handle_refresh_wanted_persons),
        )
        // Reports
        .route("/reports/daily", post(reports::handle_daily_report))
        // Chat
        .route("/chat/ask", post(chat::handle_ask))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::errors::AppError;
    use crate::models::wanted_person::WantedPerson;
    use crate::wanted_persons::scraper::WantedPersonsSource;

    struct StubSource(Vec<WantedPerson>);

    #[async_trait]
    impl WantedPersonsSource for StubSource {
        async fn fetch(&self) -> Result<Vec<WantedPerson>, AppError> {
            Ok(self.0.clone())
        }
    }

    fn person(name: &str, alias: Option<&str>, station: &str) -> WantedPerson {
        WantedPerson {
            full_name: name.to_string(),
            alias: alias.map(String::from),
            crimes: vec!["Murder".to_string()],
            image_url: None,
            police_station: Some(station.to_string()),
            source_url: None,
        }
    }

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let mut state = AppState::from_config(Config::for_tests(dir.path().join("wanted.json")));
        state.scraper = Arc::new(StubSource(vec![
            person("John Brown", Some("Shotta"), "Half Way Tree"),
            person("Mary Green", None, "Spanish Town"),
        ]));
        state
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let (status, body) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["integrations"]["firecrawl"], false);
    }

    #[tokio::test]
    async fn test_list_before_first_scrape_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let (status, body) = send(
            app,
            Request::get("/wanted-persons").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["scraped_at"], "2025-01-01T00:00:00Z");
        assert_eq!(body["source_url"], "https://jcf.gov.jm/crime/wanted-persons/");
    }

    #[tokio::test]
    async fn test_scrape_then_filter() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let (status, body) = send(
            build_router(state.clone()),
            Request::post("/wanted-persons/scrape")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            build_router(state.clone()),
            Request::get("/wanted-persons?station=half%20way")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["full_name"], "John Brown");

        let (_, body) = send(
            build_router(state),
            Request::get("/wanted-persons?alias=SHOT&station=spanish")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(body["items"], json!([]));
    }

    #[tokio::test]
    async fn test_chat_with_empty_history_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let (status, body) = send(app, post_json("/chat/ask", json!({"history": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_daily_report_without_model_key_skips_convex() {
        let convex_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(0)
            .mount(&convex_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_tests(dir.path().join("wanted.json"));
        config.resend_api_key = Some("re_key".to_string());
        config.recipients = Some("ops@example.org".to_string());
        config.convex_deployment_url = Some(convex_server.uri());
        let app = build_router(AppState::from_config(config));

        let (status, body) = send(app, post_json("/reports/daily", json!({}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "OPENROUTER_API_KEY is not configured");
    }

    #[tokio::test]
    async fn test_chat_without_model_key_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let (status, body) = send(
            app,
            post_json(
                "/chat/ask",
                json!({"history": [{"role": "user", "content": "Any crime nearby?"}]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_daily_report_without_email_settings() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let (status, body) = send(app, post_json("/reports/daily", json!({}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
        assert_eq!(body["error"]["message"], "RESEND_API_KEY is not configured");
    }
}
