//! Integration tests for the dispatch pipeline
//!
//! These tests drive the public API end to end with stub collaborators:
//! registry population, direction inference, delegation and the HTTP surface.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use translator_dispatch::detector::{Detection, LanguageDetector};
use translator_dispatch::generator::{OpenAiGenerator, TextGenerator};
use translator_dispatch::model::Category;
use translator_dispatch::retry::RetryPolicy;
use translator_dispatch::server::{self, AppState};
use translator_dispatch::translator::{AmbiguityPolicy, Translator};
use translator_dispatch::translators::{modes, PairConfig};
use translator_dispatch::{DispatchError, Dispatcher, TranslationRequest, TranslatorRegistry};

// ==================== Test Helpers ====================

struct CountingDetector {
    language: &'static str,
    confidence: f64,
    calls: AtomicUsize,
}

#[async_trait]
impl LanguageDetector for CountingDetector {
    async fn detect(&self, _text: &str, _reference: &str) -> anyhow::Result<Detection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Detection::new(self.language, self.confidence))
    }
}

struct CountingGenerator {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for CountingGenerator {
    async fn generate(&self, _system: &str, user_text: &str, _t: f32) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("backend unavailable");
        }
        Ok(format!("[{}]", user_text))
    }
}

fn detector(language: &'static str, confidence: f64) -> Arc<CountingDetector> {
    Arc::new(CountingDetector {
        language,
        confidence,
        calls: AtomicUsize::new(0),
    })
}

fn generator(fail: bool) -> Arc<CountingGenerator> {
    Arc::new(CountingGenerator {
        fail,
        calls: AtomicUsize::new(0),
    })
}

/// Generic pair translator: directions {a-to-b, b-to-a}, modes {general, formal}
fn pair_config() -> PairConfig {
    PairConfig {
        id: "x",
        display_name: "X Translator",
        category: Category::Language,
        language: "b",
        language_name: "B",
        into_english: "b-to-a",
        from_english: Some("a-to-b"),
        default_direction: "a-to-b",
        modes: vec![modes::GENERAL, modes::FORMAL],
        into_english_notes: "Write natural A.",
        from_english_notes: "Write natural B.",
        policy: AmbiguityPolicy::SilentDefault,
    }
}

fn test_registry() -> TranslatorRegistry {
    let mut registry = TranslatorRegistry::new();
    registry
        .register("x", || Arc::new(pair_config().build()))
        .expect("Test translator should register");
    registry
}

fn test_dispatcher(
    detector: Arc<CountingDetector>,
    generator: Arc<CountingGenerator>,
) -> Dispatcher {
    Dispatcher::new(Arc::new(test_registry()), detector, generator)
}

// ==================== End-to-End Scenarios ====================

#[tokio::test]
async fn test_detected_language_chooses_direction() {
    let dispatcher = test_dispatcher(detector("b", 0.9), generator(false));

    let result = dispatcher
        .dispatch(&TranslationRequest::new("x", "hello"))
        .await
        .expect("Should translate");

    assert_eq!(result.direction, "b-to-a");
    assert!(result.auto_detected);
    assert_eq!(result.translated_text, "[hello]");
    assert_eq!(result.tool_id, "x");
}

#[tokio::test]
async fn test_explicit_direction_wins_over_detection() {
    let dispatcher = test_dispatcher(detector("b", 0.95), generator(false));

    let result = dispatcher
        .dispatch(&TranslationRequest::new("x", "hello").with_direction("a-to-b"))
        .await
        .expect("Should translate");

    assert_eq!(result.direction, "a-to-b");
    assert!(!result.auto_detected);
}

#[tokio::test]
async fn test_empty_text_never_reaches_collaborators() {
    let detector = detector("b", 0.9);
    let generator = generator(false);
    let dispatcher = test_dispatcher(detector.clone(), generator.clone());

    let err = dispatcher
        .dispatch(&TranslationRequest::new("x", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::InvalidInput { field: "text", .. }));
    assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_over_length_text_never_reaches_collaborators() {
    let detector = detector("b", 0.9);
    let generator = generator(false);
    let dispatcher = test_dispatcher(detector.clone(), generator.clone());

    let err = dispatcher
        .dispatch(&TranslationRequest::new("x", "a".repeat(5001)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "invalid_input");
    assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_mode_is_rejected() {
    let dispatcher = test_dispatcher(detector("b", 0.9), generator(false));

    let err = dispatcher
        .dispatch(&TranslationRequest::new("x", "hi").with_mode("not-a-real-mode"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DispatchError::UnsupportedMode {
            mode: "not-a-real-mode".to_string(),
            supported: vec!["general".to_string(), "formal".to_string()],
        }
    );
}

#[tokio::test]
async fn test_detect_only_returns_empty_translation() {
    let generator = generator(false);
    let dispatcher = test_dispatcher(detector("unknown", 0.1), generator.clone());

    let result = dispatcher
        .dispatch(&TranslationRequest::new("x", "hi").detect_only())
        .await
        .expect("Should detect");

    assert_eq!(result.translated_text, "");
    let detection = result.detection.expect("Detection should be populated");
    assert_eq!(detection.detected_language, "unknown");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generator_failure_is_fatal() {
    let dispatcher = test_dispatcher(detector("b", 0.9), generator(true));

    let err = dispatcher
        .dispatch(&TranslationRequest::new("x", "hi"))
        .await
        .unwrap_err();

    match err {
        DispatchError::GenerationFailed { tool_id, reason } => {
            assert_eq!(tool_id, "x");
            assert!(reason.contains("backend unavailable"));
        }
        other => panic!("Expected GenerationFailed, got {:?}", other),
    }
}

// ==================== Properties ====================

#[tokio::test]
async fn test_identical_requests_yield_identical_shape() {
    let dispatcher = test_dispatcher(detector("b", 0.9), generator(false));
    let request = TranslationRequest::new("x", "hello").with_mode("formal");

    let first = dispatcher.dispatch(&request).await.expect("First call");
    let second = dispatcher.dispatch(&request).await.expect("Second call");

    assert_eq!(first, second);
    assert_eq!(dispatcher.metrics().requests(), 2);
}

#[tokio::test]
async fn test_explicit_direction_beats_contradicting_detector_on_builtins() {
    let registry = Arc::new(TranslatorRegistry::with_builtin());

    for descriptor in registry.list_all() {
        for direction in &descriptor.supported_directions {
            let dispatcher = Dispatcher::new(
                registry.clone(),
                detector("english", 0.99),
                generator(false),
            );
            let text = if descriptor.requires_ai { "hello" } else { "... ---" };
            let request = TranslationRequest::new(descriptor.id, text).with_direction(*direction);

            let result = dispatcher
                .dispatch(&request)
                .await
                .unwrap_or_else(|e| panic!("{} / {}: {}", descriptor.id, direction, e));

            assert_eq!(result.direction, *direction);
            assert!(!result.auto_detected);
        }
    }
}

#[tokio::test]
async fn test_registry_last_writer_wins() {
    let mut registry = test_registry();
    registry
        .register("x", || {
            let mut config = pair_config();
            config.display_name = "Replacement";
            Arc::new(config.build())
        })
        .expect("Replacement should register");

    let translator = registry.resolve("x").expect("Should resolve");
    assert_eq!(translator.descriptor().display_name, "Replacement");
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_inconsistent_translator_is_never_served() {
    let mut registry = test_registry();
    let err = registry
        .register("bad", || {
            let mut config = pair_config();
            config.id = "bad";
            config.modes = vec![];
            config.default_direction = "zz-to-qq";
            Arc::new(config.build())
        })
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_translator");

    let generator = generator(false);
    let dispatcher = Dispatcher::new(Arc::new(registry), detector("b", 0.9), generator.clone());
    let err = dispatcher
        .dispatch(&TranslationRequest::new("bad", "hello"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "tool_not_found");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_results_stay_within_supported_sets() {
    let registry = Arc::new(TranslatorRegistry::with_builtin());
    let dispatcher = Dispatcher::new(registry.clone(), detector("unknown", 0.1), generator(false));

    for descriptor in registry.list_all() {
        let text = if descriptor.requires_ai { "hello" } else { "abc" };
        let result = dispatcher
            .dispatch(&TranslationRequest::new(descriptor.id, text))
            .await
            .unwrap_or_else(|e| panic!("{}: {}", descriptor.id, e));

        assert!(descriptor.supports_direction(&result.direction), "{}", descriptor.id);
        assert!(descriptor.mode(&result.mode).is_some(), "{}", descriptor.id);
    }
}

#[tokio::test]
async fn test_stylistic_catalog_is_served_by_rule_set() {
    let generator = generator(false);
    let dispatcher = Dispatcher::new(
        Arc::new(TranslatorRegistry::with_builtin()),
        detector("text", 0.9),
        generator.clone(),
    );

    let stylistic = dispatcher.registry().list_by_category(Category::Stylistic);
    assert_eq!(stylistic.len(), 1);

    let result = dispatcher
        .dispatch(&TranslationRequest::new(stylistic[0].id, "Hello"))
        .await
        .expect("Should convert");
    assert_eq!(result.translated_text, "Heibllo");

    let result = dispatcher
        .dispatch(&TranslationRequest::new("al-bhed", "Hello").with_direction("toAlBhed"))
        .await
        .expect("Should encipher");
    assert_eq!(result.translated_text, "Oammu");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_translate_with_wrong_instance_is_tool_mismatch() {
    let dispatcher = test_dispatcher(detector("b", 0.9), generator(false));
    let other = translator_dispatch::translators::languages::esperanto();

    let err = dispatcher
        .translate(&other, &TranslationRequest::new("x", "hi"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "tool_mismatch");
}

#[tokio::test]
async fn test_empty_registry_reports_ordering_bug() {
    let dispatcher = Dispatcher::new(
        Arc::new(TranslatorRegistry::new()),
        detector("b", 0.9),
        generator(false),
    );

    let err = dispatcher
        .dispatch(&TranslationRequest::new("x", "hi"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "registry_not_initialized");
}

#[tokio::test]
async fn test_morse_never_calls_generator() {
    let generator = generator(false);
    let dispatcher = Dispatcher::new(
        Arc::new(TranslatorRegistry::with_builtin()),
        detector("text", 0.95),
        generator.clone(),
    );

    let result = dispatcher
        .dispatch(&TranslationRequest::new("morse-code", "SOS").with_mode("visual"))
        .await
        .expect("Should encode");

    assert_eq!(result.direction, "toMorse");
    assert_eq!(result.translated_text, "••• ▬▬▬ •••");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

// ==================== OpenAI Generator ====================

#[tokio::test]
async fn test_dispatch_through_mocked_openai() {
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-openai-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Saluton, mondo!\n"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let openai = OpenAiGenerator::new(
        reqwest::Client::new(),
        "test-openai-key",
        "gpt-4o-mini",
        format!("{}/v1/chat/completions", mock_server.uri()),
    )
    .with_retry(RetryPolicy::none());

    let dispatcher = Dispatcher::new(
        Arc::new(TranslatorRegistry::with_builtin()),
        detector("english", 0.9),
        Arc::new(openai),
    );

    let result = dispatcher
        .dispatch(&TranslationRequest::new("esperanto", "Hello, world!"))
        .await
        .expect("Should translate");

    assert_eq!(result.translated_text, "Saluton, mondo!");
    assert_eq!(result.direction, "toEsperanto");
    assert!(result.auto_detected);
}

// ==================== HTTP Surface ====================

async fn spawn_server(api_key: Option<&str>) -> String {
    let dispatcher = Dispatcher::new(
        Arc::new(TranslatorRegistry::with_builtin()),
        detector("greek", 0.9),
        generator(false),
    );
    let app = server::router(AppState {
        dispatcher: Arc::new(dispatcher),
        api_key: api_key.map(str::to_string),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_http_translate_round_trip() {
    let base = spawn_server(None).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({"text": "Γεια σου", "toolId": "greek-english"}))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["translatedText"], "[Γεια σου]");
    assert_eq!(body["direction"], "greek-to-en");
    assert_eq!(body["autoDetected"], true);
    assert_eq!(body["languageInfo"]["detectedLanguage"], "Greek");
}

#[tokio::test]
async fn test_http_error_mapping() {
    let base = spawn_server(None).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({"text": "  ", "toolId": "greek-english"}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["kind"], "invalid_input");

    let response = client
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({"text": "hi", "toolId": "klingon"}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_http_requires_api_key_when_configured() {
    let base = spawn_server(Some("test-api-key")).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/tools", base))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/api/tools?category=fictional", base))
        .header("Authorization", "Bearer test-api-key")
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);
    let tools: serde_json::Value = response.json().await.expect("Invalid JSON");
    assert_eq!(tools.as_array().map(Vec::len), Some(2));
    assert_eq!(tools[0]["id"], "dragon-language");
    assert_eq!(tools[1]["id"], "al-bhed");

    // Health stays open
    let response = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_metrics_and_bad_category() {
    let base = spawn_server(None).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({"text": "Γεια", "toolId": "greek-english"}))
        .send()
        .await
        .expect("Request failed");

    let metrics: serde_json::Value = client
        .get(format!("{}/api/metrics", base))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(metrics["requests"], 1);
    assert_eq!(metrics["generatorCalls"], 1);

    let response = client
        .get(format!("{}/api/tools?category=wizardry", base))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 400);
}
