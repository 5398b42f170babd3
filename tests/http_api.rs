//! HTTP contract tests for the story endpoints.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storyteller::{
    build_router,
    config::GeminiSettings,
    inference::{GeminiClient, InferenceError, TextGenerator},
    story::StoryService,
    AppState,
};

const GENERIC_FAILURE: &str = "Failed to generate story. Please try again.";

/// Deterministic generator that records every prompt it receives.
struct FakeGenerator {
    reply: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(InferenceError::Api {
                status: 429,
                body: "RESOURCE_EXHAUSTED: quota exceeded for project secret-project-id".into(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

fn app_with(generator: Arc<dyn TextGenerator>) -> Router {
    build_router(AppState::new(Arc::new(StoryService::new(generator))))
}

async fn post_story(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate-story")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn valid_request_returns_story() {
    let generator = FakeGenerator::ok("The trees whispered secrets to the moss.");
    let app = app_with(generator.clone());

    let (status, body) = post_story(
        app,
        &json!({ "topic": "a magical forest", "length": 150 }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "story": "The trees whispered secrets to the moss." }));
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn prompt_carries_trimmed_topic_and_exact_length() {
    let generator = FakeGenerator::ok("story");
    let app = app_with(generator.clone());

    let (status, _) = post_story(
        app,
        &json!({ "topic": "   Space exploration  ", "length": 1234 }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Topic: Space exploration and Length: 1234 words."));
}

#[tokio::test]
async fn omitted_length_defaults_to_250() {
    let generator = FakeGenerator::ok("story");
    let app = app_with(generator.clone());

    let (status, _) = post_story(app, r#"{ "topic": "Robot companion" }"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(generator.prompts.lock().unwrap()[0].contains("Length: 250 words."));
}

#[tokio::test]
async fn short_topic_is_rejected_without_generating() {
    let generator = FakeGenerator::ok("unused");
    let app = app_with(generator.clone());

    let (status, body) = post_story(app, r#"{ "topic": "ab" }"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Topic must be at least 3 characters long." })
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn length_out_of_range_is_rejected() {
    let cases = [
        (5, "Length must be at least 10."),
        (5000, "Length must be at most 2000."),
    ];
    for (length, message) in cases {
        let generator = FakeGenerator::ok("unused");
        let app = app_with(generator.clone());

        let (status, body) = post_story(
            app,
            &json!({ "topic": "space exploration", "length": length }).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": message }));
        assert_eq!(generator.calls(), 0);
    }
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let generator = FakeGenerator::ok("unused");
    let app = app_with(generator.clone());

    let (status, body) = post_story(app, r#"{ "topic": "space"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Request body must be valid JSON." }));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn body_without_json_content_type_fails_topic_rule() {
    let generator = FakeGenerator::ok("unused");
    let app = app_with(generator.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate-story")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("a magical forest"))
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Topic must be at least 3 characters long." })
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn generation_failure_returns_generic_500() {
    let generator = FakeGenerator::failing();
    let app = app_with(generator.clone());

    let (status, body) = post_story(app, r#"{ "topic": "Lost treasure", "length": 300 }"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERIC_FAILURE }));
    assert!(!body.to_string().contains("secret-project-id"));
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn health_is_ok_even_when_generator_is_down() {
    let generator = FakeGenerator::failing();
    let app = app_with(generator.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Backend is running");
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let app = app_with(FakeGenerator::ok("unused"));

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/generate-story")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

fn gemini_settings(base_url: String, timeout: Duration) -> GeminiSettings {
    GeminiSettings {
        api_key: "test-key".into(),
        model: "gemini-2.0-flash".into(),
        base_url,
        temperature: 0.9,
        timeout,
    }
}

#[tokio::test]
async fn end_to_end_with_gemini_upstream() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "A comet hummed a lullaby." }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(&gemini_settings(
        format!("{}/v1beta", mock_server.uri()),
        Duration::from_secs(5),
    ))
    .unwrap();
    let app = app_with(Arc::new(client));

    let (status, body) = post_story(
        app,
        &json!({ "topic": "space exploration", "length": 100 }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["story"], "A comet hummed a lullaby.");
}

#[tokio::test]
async fn upstream_timeout_returns_generic_500() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "candidates": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(&gemini_settings(
        mock_server.uri(),
        Duration::from_millis(200),
    ))
    .unwrap();
    let app = app_with(Arc::new(client));

    let (status, body) = post_story(app, r#"{ "topic": "Time traveler" }"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERIC_FAILURE }));
}
