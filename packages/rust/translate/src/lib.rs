//! Translation backends for titles and summaries.
//!
//! The pipeline talks to a [`Translator`]. [`GoogleTranslator`] calls the public
//! Google Translate web endpoint; [`PassthroughTranslator`] returns its input and
//! is used when translation is disabled. Callers that must never fail go through
//! [`translate_or_fallback`], which keeps the source text on any error.

use std::future::Future;
use std::time::Duration;

use paperfeed_shared::text::{contains_hangul, truncate_chars};
use paperfeed_shared::{AppConfig, PaperfeedError, Result};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// User-Agent string for translation requests.
const USER_AGENT: &str = concat!("paperfeed/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// A text translation backend.
pub trait Translator {
    /// Translate `text` into the target language.
    fn translate(&self, text: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Translate `text`, falling back to the source text on failure.
pub async fn translate_or_fallback<T: Translator>(translator: &T, text: &str) -> String {
    match translator.translate(text).await {
        Ok(translated) => translated,
        Err(e) => {
            warn!(error = %e, chars = text.chars().count(), "translation failed, keeping source text");
            text.to_string()
        }
    }
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, text: &str) -> impl Future<Output = Result<String>> + Send {
        let out = text.to_string();
        async move { Ok(out) }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Runtime translation settings.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Endpoint origin, e.g. `https://translate.googleapis.com`.
    pub base_url: Url,
    pub source_lang: String,
    pub target_lang: String,
    /// Input is truncated to this many characters.
    pub max_chars: usize,
    /// Pause after each backend call.
    pub delay: Duration,
    pub timeout_secs: u64,
}

impl TryFrom<&AppConfig> for TranslateOptions {
    type Error = PaperfeedError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let t = &config.translation;
        let base_url = Url::parse(&t.base_url)
            .map_err(|e| PaperfeedError::config(format!("invalid translation.base_url: {e}")))?;
        Ok(Self {
            base_url,
            source_lang: t.source_lang.clone(),
            target_lang: t.target_lang.clone(),
            max_chars: t.max_chars,
            delay: Duration::from_millis(t.delay_ms),
            timeout_secs: t.timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// GoogleTranslator
// ---------------------------------------------------------------------------

/// Google Translate web backend (`translate_a/single`, `client=gtx`).
pub struct GoogleTranslator {
    client: Client,
    endpoint: Url,
    options: TranslateOptions,
}

impl GoogleTranslator {
    pub fn new(options: TranslateOptions) -> Result<Self> {
        let endpoint = options
            .base_url
            .join("translate_a/single")
            .map_err(|e| PaperfeedError::config(format!("invalid translation endpoint: {e}")))?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| PaperfeedError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            options,
        })
    }

    async fn request(&self, text: &str) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint.as_str())
            .query(&[
                ("client", "gtx"),
                ("sl", self.options.source_lang.as_str()),
                ("tl", self.options.target_lang.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| PaperfeedError::Translation(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaperfeedError::Translation(format!(
                "{}: HTTP {status}",
                self.endpoint
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PaperfeedError::Translation(format!("unreadable response: {e}")))?;

        parse_segments(&body)
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str) -> impl Future<Output = Result<String>> + Send {
        async move {
            if text.trim().is_empty() || contains_hangul(text) {
                return Ok(text.to_string());
            }

            let input = truncate_chars(text, self.options.max_chars);
            let result = self.request(input).await;

            if !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }

            let translated = result?;
            debug!(
                chars_in = input.chars().count(),
                chars_out = translated.chars().count(),
                "translated text"
            );
            if translated.is_empty() {
                Ok(text.to_string())
            } else {
                Ok(translated)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Translator chosen at runtime from configuration.
pub enum TranslatorBackend {
    Google(GoogleTranslator),
    Passthrough(PassthroughTranslator),
}

impl TranslatorBackend {
    /// Google backend when `enabled`, passthrough otherwise.
    pub fn from_config(config: &AppConfig, enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self::Passthrough(PassthroughTranslator));
        }
        let options = TranslateOptions::try_from(config)?;
        Ok(Self::Google(GoogleTranslator::new(options)?))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Google(_) => "google",
            Self::Passthrough(_) => "passthrough",
        }
    }
}

impl Translator for TranslatorBackend {
    fn translate(&self, text: &str) -> impl Future<Output = Result<String>> + Send {
        async move {
            match self {
                Self::Google(t) => t.translate(text).await,
                Self::Passthrough(t) => t.translate(text).await,
            }
        }
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The response is a nested array whose first element lists
/// `[translated, source, ...]` pairs, one per sentence.
fn parse_segments(body: &serde_json::Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| PaperfeedError::Translation("response has no segment list".into()))?;

    Ok(segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|s| s.as_str()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(server: &wiremock::MockServer) -> TranslateOptions {
        TranslateOptions {
            base_url: Url::parse(&server.uri()).unwrap(),
            source_lang: "en".into(),
            target_lang: "ko".into(),
            max_chars: 4500,
            delay: Duration::ZERO,
            timeout_secs: 5,
        }
    }

    #[test]
    fn segments_are_joined() {
        let body = json!([[["안녕하세요. ", "Hello. ", null, null, 10], ["세계", "World", null]], null, "en"]);
        assert_eq!(parse_segments(&body).unwrap(), "안녕하세요. 세계");
        assert!(parse_segments(&json!({"error": 1})).is_err());
    }

    #[test]
    fn options_from_config() {
        let opts = TranslateOptions::try_from(&AppConfig::default()).unwrap();
        assert_eq!(opts.delay, Duration::from_millis(500));
        assert_eq!(opts.max_chars, 4500);
    }

    #[tokio::test]
    async fn translate_with_mock_server() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/translate_a/single"))
            .and(wiremock::matchers::query_param("tl", "ko"))
            .and(wiremock::matchers::query_param("q", "Reasoning framework"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(json!([[["추론 프레임워크", "Reasoning framework", null]], null, "en"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new(options(&server)).unwrap();
        let out = translator.translate("Reasoning framework").await.unwrap();
        assert_eq!(out, "추론 프레임워크");
    }

    #[tokio::test]
    async fn hangul_input_is_not_sent() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::any())
            .respond_with(wiremock::ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new(options(&server)).unwrap();
        let out = translator.translate("이미 번역됨").await.unwrap();
        assert_eq!(out, "이미 번역됨");
    }

    #[tokio::test]
    async fn long_input_is_truncated() {
        let server = wiremock::MockServer::start().await;
        let long = "a".repeat(20);

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::query_param("q", "a".repeat(8)))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_json(json!([[["에이", "aaaaaaaa"]]])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut opts = options(&server);
        opts.max_chars = 8;
        let translator = GoogleTranslator::new(opts).unwrap();
        assert_eq!(translator.translate(&long).await.unwrap(), "에이");
    }

    #[tokio::test]
    async fn failure_falls_back_to_source() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::any())
            .respond_with(wiremock::ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new(options(&server)).unwrap();
        assert!(translator.translate("Hello").await.is_err());
        assert_eq!(translate_or_fallback(&translator, "Hello").await, "Hello");
    }

    #[tokio::test]
    async fn passthrough_returns_input() {
        assert_eq!(PassthroughTranslator.translate("same").await.unwrap(), "same");
    }

    #[tokio::test]
    async fn disabled_backend_is_passthrough() {
        let backend = TranslatorBackend::from_config(&AppConfig::default(), false).unwrap();
        assert_eq!(backend.name(), "passthrough");
        assert_eq!(backend.translate("text").await.unwrap(), "text");
    }
}
