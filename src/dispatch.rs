//! The shared translation pipeline.
//!
//! Validation, direction inference, delegation and response shaping are
//! implemented once here on top of the [`Translator`] contract. A request
//! suspends at most twice (detector, then generator) and spawns nothing, so
//! dropping the returned future cancels whichever call is in flight.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::detector::{Detection, LanguageDetector};
use crate::error::{DispatchError, Result};
use crate::generator::TextGenerator;
use crate::inference::DirectionInference;
use crate::metrics::DispatchMetrics;
use crate::model::{DetectionOutcome, LanguageInfo, TranslationRequest, TranslationResult};
use crate::registry::TranslatorRegistry;
use crate::translator::{Engine, Translator, UNKNOWN_LANGUAGE};

pub struct Dispatcher {
    registry: Arc<TranslatorRegistry>,
    detector: Arc<dyn LanguageDetector>,
    generator: Arc<dyn TextGenerator>,
    metrics: DispatchMetrics,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<TranslatorRegistry>,
        detector: Arc<dyn LanguageDetector>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            registry,
            detector,
            generator,
            metrics: DispatchMetrics::new(),
        }
    }

    pub fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Resolve `request.tool_id` and translate with it.
    pub async fn dispatch(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        let translator = self.registry.resolve(&request.tool_id).inspect_err(|e| {
            self.metrics.record_rejected();
            debug!(tool_id = %request.tool_id, "Registry lookup failed: {}", e);
        })?;
        self.translate(translator.as_ref(), request).await
    }

    /// Run one request through `translator`.
    pub async fn translate(
        &self,
        translator: &dyn Translator,
        request: &TranslationRequest,
    ) -> Result<TranslationResult> {
        let mode = validate(translator, request).inspect_err(|e| {
            self.metrics.record_rejected();
            debug!(tool_id = %request.tool_id, kind = e.kind(), "Rejected request: {}", e);
        })?;
        self.metrics.record_request();

        let explicit = request.direction.as_deref();
        let mut inference = DirectionInference::start(explicit);
        if request.auto_detect || request.detect_only {
            let detection = self.detect(translator, &request.text).await;
            inference = inference.observe(translator, detection);
        }
        let outcome = inference.outcome().cloned();
        let (direction, auto_detected) = inference.finish(translator);

        debug!(
            tool_id = translator.id(),
            direction = %direction,
            auto_detected,
            "Resolved direction"
        );

        if request.detect_only {
            let explanation = translator.explain_detection(outcome.as_ref());
            return Ok(shape(
                translator,
                request,
                mode,
                String::new(),
                direction,
                outcome,
                auto_detected,
                explanation,
            ));
        }

        let translated = self.perform(translator, &request.text, &direction, mode).await?;

        info!(
            tool_id = translator.id(),
            mode,
            direction = %direction,
            auto_detected,
            "Translation completed"
        );

        let explanation = translator.explain_translation(outcome.as_ref(), explicit);
        Ok(shape(
            translator,
            request,
            mode,
            translated,
            direction,
            outcome,
            auto_detected,
            explanation,
        ))
    }

    /// Best-effort detection. Failures are logged and degrade to `None`.
    async fn detect(&self, translator: &dyn Translator, text: &str) -> Option<Detection> {
        self.metrics.record_detection();
        match self.detector.detect(text, translator.reference_language()).await {
            Ok(detection) => Some(detection),
            Err(e) => {
                self.metrics.record_detection_failure();
                warn!(
                    tool_id = translator.id(),
                    "Language detection failed, continuing without it: {:#}", e
                );
                None
            }
        }
    }

    /// Transform the text with the translator's engine. Blank output is a failure.
    async fn perform(
        &self,
        translator: &dyn Translator,
        text: &str,
        direction: &str,
        mode: &str,
    ) -> Result<String> {
        let output = match translator.engine() {
            Engine::Generative => {
                let system_prompt = translator.build_system_prompt(direction, mode);
                self.metrics.record_generator_call();
                self.generator
                    .generate(&system_prompt, text, translator.descriptor().temperature)
                    .await
                    .map_err(|e| {
                        self.metrics.record_generator_failure();
                        warn!(tool_id = translator.id(), "Text generation failed: {:#}", e);
                        DispatchError::generation_failed(translator.id(), format!("{:#}", e))
                    })?
            }
            Engine::RuleBased(rules) => {
                self.metrics.record_rule_based();
                rules.apply(text, direction, mode)
            }
        };

        let trimmed = output.trim();
        if trimmed.is_empty() {
            if translator.engine().is_generative() {
                self.metrics.record_generator_failure();
            }
            warn!(tool_id = translator.id(), "Translation produced no text");
            return Err(DispatchError::generation_failed(
                translator.id(),
                "translation produced no text",
            ));
        }
        Ok(trimmed.to_string())
    }
}

/// Check the request against the translator and return the mode to use.
fn validate(translator: &dyn Translator, request: &TranslationRequest) -> Result<&'static str> {
    let descriptor = translator.descriptor();

    if request.text.trim().is_empty() {
        return Err(DispatchError::invalid_input(
            "text",
            "Please enter some text to translate",
        ));
    }
    let length = request.text.chars().count();
    if length > descriptor.max_input_length {
        return Err(DispatchError::invalid_input(
            "text",
            format!(
                "Text is {} characters long; the maximum is {}",
                length, descriptor.max_input_length
            ),
        ));
    }

    if request.tool_id != descriptor.id {
        return Err(DispatchError::ToolMismatch {
            expected: descriptor.id.to_string(),
            requested: request.tool_id.clone(),
        });
    }

    let mode = match request.mode.as_deref() {
        None => descriptor.default_mode,
        Some(requested) => match descriptor.mode(requested) {
            Some(mode_spec) => mode_spec.id,
            None => {
                return Err(DispatchError::UnsupportedMode {
                    mode: requested.to_string(),
                    supported: descriptor.mode_ids(),
                })
            }
        },
    };

    if let Some(direction) = request.direction.as_deref() {
        if !translator.is_valid_direction(direction) {
            return Err(DispatchError::UnsupportedDirection {
                direction: direction.to_string(),
                supported: descriptor.direction_ids(),
            });
        }
    }

    Ok(mode)
}

#[allow(clippy::too_many_arguments)]
fn shape(
    translator: &dyn Translator,
    request: &TranslationRequest,
    mode: &str,
    translated_text: String,
    direction: String,
    detection: Option<DetectionOutcome>,
    auto_detected: bool,
    explanation: String,
) -> TranslationResult {
    let label = detection
        .as_ref()
        .map(|d| d.detected_language.as_str())
        .unwrap_or(UNKNOWN_LANGUAGE);

    let language_info = LanguageInfo {
        detected_language: translator.format_language_name(label),
        direction: translator.describe_direction(label, Some(&direction)),
        confidence: detection
            .as_ref()
            .map(DetectionOutcome::confidence_percent)
            .unwrap_or(0),
        explanation,
    };

    TranslationResult {
        translated_text,
        original_text: request.text.clone(),
        tool_id: translator.id().to_string(),
        mode: mode.to_string(),
        direction,
        detection,
        auto_detected,
        language_info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translators::{languages, MorseCodeTranslator};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Doubles ====================

    struct StubDetector {
        result: std::result::Result<Detection, String>,
        calls: AtomicUsize,
    }

    impl StubDetector {
        fn returning(language: &str, confidence: f64) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(Detection::new(language, confidence)),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                result: Err("detector offline".to_string()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LanguageDetector for StubDetector {
        async fn detect(&self, _text: &str, _reference: &str) -> anyhow::Result<Detection> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(anyhow::Error::msg)
        }
    }

    struct StubGenerator {
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
        last: Mutex<Option<(String, String, f32)>>,
    }

    impl StubGenerator {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err("quota exceeded".to_string()),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(
            &self,
            system_prompt: &str,
            user_text: &str,
            temperature: f32,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() =
                Some((system_prompt.to_string(), user_text.to_string(), temperature));
            self.reply.clone().map_err(anyhow::Error::msg)
        }
    }

    fn dispatcher(detector: Arc<StubDetector>, generator: Arc<StubGenerator>) -> Dispatcher {
        Dispatcher::new(
            Arc::new(TranslatorRegistry::with_builtin()),
            detector,
            generator,
        )
    }

    // ==================== Validation ====================

    #[tokio::test]
    async fn test_whitespace_text_is_rejected_before_any_call() {
        let detector = StubDetector::returning("greek", 0.9);
        let generator = StubGenerator::replying("x");
        let dispatcher = dispatcher(detector.clone(), generator.clone());

        let err = dispatcher
            .dispatch(&TranslationRequest::new("greek-english", "  \n\t "))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.metrics().rejected(), 1);
        assert_eq!(dispatcher.metrics().requests(), 0);
    }

    #[tokio::test]
    async fn test_length_is_counted_in_characters() {
        let dispatcher = dispatcher(
            StubDetector::returning("chinese", 0.9),
            StubGenerator::replying("ok"),
        );

        // 5000 three-byte characters: within the limit
        let at_limit = "字".repeat(5000);
        assert!(dispatcher
            .dispatch(&TranslationRequest::new("chinese-english", at_limit))
            .await
            .is_ok());

        let over_limit = "字".repeat(5001);
        let err = dispatcher
            .dispatch(&TranslationRequest::new("chinese-english", over_limit))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("maximum is 5000"));
    }

    #[tokio::test]
    async fn test_tool_mismatch_is_not_a_caller_error() {
        let dispatcher = dispatcher(StubDetector::returning("greek", 0.9), StubGenerator::replying("x"));
        let translator = languages::greek_english();

        let err = dispatcher
            .translate(&translator, &TranslationRequest::new("esperanto", "hello"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DispatchError::ToolMismatch {
                expected: "greek-english".to_string(),
                requested: "esperanto".to_string(),
            }
        );
        assert!(!err.is_caller_error());
    }

    #[tokio::test]
    async fn test_unsupported_direction_lists_supported() {
        let dispatcher = dispatcher(StubDetector::returning("greek", 0.9), StubGenerator::replying("x"));

        let err = dispatcher
            .dispatch(&TranslationRequest::new("greek-english", "hello").with_direction("en-to-zh"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DispatchError::UnsupportedDirection {
                direction: "en-to-zh".to_string(),
                supported: vec!["greek-to-en".to_string(), "en-to-greek".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let dispatcher = dispatcher(StubDetector::returning("greek", 0.9), StubGenerator::replying("x"));
        let err = dispatcher
            .dispatch(&TranslationRequest::new("klingon", "hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "tool_not_found");
    }

    // ==================== Delegation ====================

    #[tokio::test]
    async fn test_generator_receives_prompt_and_original_text_separately() {
        let generator = StubGenerator::replying("  Καλημέρα \n");
        let dispatcher = dispatcher(StubDetector::returning("english", 0.9), generator.clone());

        let result = dispatcher
            .dispatch(&TranslationRequest::new("greek-english", " Good morning ").with_mode("formal"))
            .await
            .expect("Should translate");

        assert_eq!(result.translated_text, "Καλημέρα");
        assert_eq!(result.original_text, " Good morning ");
        assert_eq!(result.mode, "formal");
        assert_eq!(result.direction, "en-to-greek");

        let (prompt, text, temperature) = generator.last.lock().unwrap().clone().expect("Called");
        assert_eq!(text, " Good morning ");
        assert!(!prompt.contains("Good morning"));
        assert!(prompt.contains("formal register"));
        assert!(prompt.contains("English to Greek"));
        assert!((temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_default_mode_is_used_when_absent() {
        let dispatcher = dispatcher(StubDetector::returning("chinese", 0.9), StubGenerator::replying("hi"));
        let result = dispatcher
            .dispatch(&TranslationRequest::new("chinese-english", "你好"))
            .await
            .expect("Should translate");
        assert_eq!(result.mode, "general");
    }

    #[tokio::test]
    async fn test_rule_based_translator_bypasses_generator() {
        let generator = StubGenerator::replying("should not be used");
        let dispatcher = dispatcher(StubDetector::returning("morse", 0.95), generator.clone());

        let result = dispatcher
            .dispatch(&TranslationRequest::new("morse-code", "... --- ..."))
            .await
            .expect("Should translate");

        assert_eq!(result.translated_text, "SOS");
        assert_eq!(result.direction, "toText");
        assert!(result.auto_detected);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.metrics().rule_based(), 1);
    }

    #[tokio::test]
    async fn test_rule_based_empty_output_is_failure() {
        let translator = MorseCodeTranslator::new();
        let dispatcher = dispatcher(StubDetector::returning("text", 0.9), StubGenerator::replying("x"));

        let err = dispatcher
            .translate(
                &translator,
                &TranslationRequest::new("morse-code", "你好").with_direction("toMorse"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "generation_failed");
    }

    #[tokio::test]
    async fn test_blank_generation_is_failure() {
        let generator = StubGenerator::replying("   \n");
        let dispatcher = dispatcher(StubDetector::returning("greek", 0.9), generator);

        let err = dispatcher
            .dispatch(&TranslationRequest::new("greek-english", "Γεια"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "generation_failed");
        assert_eq!(dispatcher.metrics().generator_failures(), 1);
    }

    // ==================== Detection ====================

    #[tokio::test]
    async fn test_detector_failure_degrades() {
        let detector = StubDetector::failing();
        let dispatcher = dispatcher(detector.clone(), StubGenerator::replying("Hello"));

        let result = dispatcher
            .dispatch(&TranslationRequest::new("chinese-english", "你好"))
            .await
            .expect("Detector failure must not abort the request");

        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
        assert!(result.detection.is_none());
        assert!(!result.auto_detected);
        assert_eq!(result.direction, "zh-to-en");
        assert_eq!(result.language_info.explanation, "Translation completed");
        assert_eq!(dispatcher.metrics().detection_failures(), 1);
    }

    #[tokio::test]
    async fn test_auto_detect_off_skips_detector() {
        let detector = StubDetector::returning("english", 0.9);
        let dispatcher = dispatcher(detector.clone(), StubGenerator::replying("你好"));

        let result = dispatcher
            .dispatch(&TranslationRequest::new("chinese-english", "hello").with_auto_detect(false))
            .await
            .expect("Should translate");

        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.direction, "zh-to-en");
        assert!(!result.auto_detected);
        assert!(result.detection.is_none());
    }

    #[tokio::test]
    async fn test_ambiguous_detection_keeps_default_direction() {
        let dispatcher = dispatcher(StubDetector::returning("unknown", 0.3), StubGenerator::replying("Saluton"));

        let result = dispatcher
            .dispatch(&TranslationRequest::new("esperanto", "hmm"))
            .await
            .expect("Should translate");

        assert_eq!(result.direction, "toEsperanto");
        assert!(!result.auto_detected);
        let detection = result.detection.expect("Detection is echoed");
        assert!(detection.ambiguous);
        assert!(detection.suggested_direction.is_none());
        assert!(result.language_info.explanation.contains("uncertain (30% confidence)"));
    }

    #[tokio::test]
    async fn test_detect_only_runs_even_with_auto_detect_off() {
        let detector = StubDetector::returning("japanese", 0.8);
        let generator = StubGenerator::replying("x");
        let dispatcher = dispatcher(detector.clone(), generator.clone());

        let result = dispatcher
            .dispatch(
                &TranslationRequest::new("japanese-english", "こんにちは")
                    .with_auto_detect(false)
                    .detect_only(),
            )
            .await
            .expect("Should detect");

        assert_eq!(result.translated_text, "");
        assert_eq!(result.direction, "ja-to-en");
        assert_eq!(
            result.language_info.explanation,
            "Detected Japanese input with 80% confidence, will translate to English"
        );
        assert_eq!(result.language_info.confidence, 80);
        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_language_info_for_manual_direction() {
        let dispatcher = dispatcher(StubDetector::returning("chinese", 0.9), StubGenerator::replying("你好"));

        let result = dispatcher
            .dispatch(&TranslationRequest::new("chinese-english", "你好").with_direction("en-to-zh"))
            .await
            .expect("Should translate");

        assert_eq!(result.direction, "en-to-zh");
        assert!(!result.auto_detected);
        assert_eq!(result.language_info.detected_language, "Chinese");
        assert_eq!(result.language_info.direction, "English → Chinese");
        assert_eq!(result.language_info.explanation, "Manual translation: English → Chinese");
    }

    // ==================== Cancellation ====================

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    struct HangingGenerator {
        dropped: Arc<AtomicBool>,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl TextGenerator for HangingGenerator {
        async fn generate(&self, _: &str, _: &str, _: f32) -> anyhow::Result<String> {
            let _guard = DropFlag(self.dropped.clone());
            tokio::time::sleep(Duration::from_secs(3600)).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok("too late".to_string())
        }
    }

    #[tokio::test]
    async fn test_abandoning_request_cancels_generation() {
        let dropped = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let dispatcher = Dispatcher::new(
            Arc::new(TranslatorRegistry::with_builtin()),
            StubDetector::returning("greek", 0.9),
            Arc::new(HangingGenerator {
                dropped: dropped.clone(),
                finished: finished.clone(),
            }),
        );

        let request = TranslationRequest::new("greek-english", "Γεια σου");
        let outcome =
            tokio::time::timeout(Duration::from_millis(50), dispatcher.dispatch(&request)).await;

        assert!(outcome.is_err(), "Request should have timed out");
        assert!(dropped.load(Ordering::SeqCst), "Generation future must be dropped");
        assert!(!finished.load(Ordering::SeqCst));
    }

    struct HangingDetector {
        dropped: Arc<AtomicBool>,
    }

    #[async_trait]
    impl LanguageDetector for HangingDetector {
        async fn detect(&self, _: &str, _: &str) -> anyhow::Result<Detection> {
            let _guard = DropFlag(self.dropped.clone());
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Detection::new("greek", 0.9))
        }
    }

    #[tokio::test]
    async fn test_abandoning_request_cancels_detection() {
        let dropped = Arc::new(AtomicBool::new(false));
        let generator = StubGenerator::replying("never");
        let dispatcher = Dispatcher::new(
            Arc::new(TranslatorRegistry::with_builtin()),
            Arc::new(HangingDetector {
                dropped: dropped.clone(),
            }),
            generator.clone(),
        );

        let request = TranslationRequest::new("greek-english", "Γεια σου");
        let outcome =
            tokio::time::timeout(Duration::from_millis(50), dispatcher.dispatch(&request)).await;

        assert!(outcome.is_err(), "Request should have timed out");
        assert!(dropped.load(Ordering::SeqCst), "Detection future must be dropped");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.metrics().detections(), 1);
        assert_eq!(dispatcher.metrics().generator_calls(), 0);
    }
}
