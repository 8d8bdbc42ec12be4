use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::ai::CompletionService;
use crate::models::{CompletionRequest, Config, DEFAULT_BACKOFF_MS, DEFAULT_BASE_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio_retry::{strategy::FixedInterval, RetryIf};

/// Gemini `generateContent` client with a single retry on rate limiting.
pub struct GeminiCompletionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    backoff: Duration,
}

impl GeminiCompletionClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-2.0-flash`);
    /// a `models/` prefix is stripped.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        }
    }

    /// Build from configuration; `None` when no credential is configured.
    pub fn from_config(config: &Config, client: Client) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(
            Self::new_with_client(api_key, config.model.clone(), config.request_timeout, client)
                .with_base_url(config.base_url.clone())
                .with_backoff(config.rate_limit_backoff),
        )
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_once(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!("Sending generateContent request to Gemini ({})", self.model);

        // The credential rides in the query string, so strip URLs from errors.
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Failed to send request to Gemini: {}", e);
                Error::Http(e)
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::RateLimited(error_text));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::Transport(format!(
                "Gemini API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| Error::Http(e.without_url()))?;
        let envelope: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::Transport(format!("Failed to parse Gemini response: {}", e))
        })?;

        Ok(envelope.first_text())
    }
}

#[async_trait]
impl CompletionService for GeminiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = GenerateContentRequest::from(request);
        let strategy = FixedInterval::new(self.backoff).take(1);

        let outcome = RetryIf::start(
            strategy,
            || self.post_once(&body),
            |e: &Error| {
                if e.is_rate_limited() {
                    tracing::warn!(
                        "Gemini rate limited; retrying once in {}ms",
                        self.backoff.as_millis()
                    );
                    true
                } else {
                    false
                }
            },
        )
        .await;

        match outcome {
            Err(Error::RateLimited(detail)) => {
                tracing::error!("Gemini still rate limited after retry: {}", detail);
                Err(Error::Transport(format!(
                    "rate limited after retry: {}",
                    detail
                )))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.0-flash";

    fn make_client(server: &MockServer, model: &str) -> GeminiCompletionClient {
        GeminiCompletionClient::new(
            "test-key".to_string(),
            model.to_string(),
            Duration::from_secs(5),
        )
        .with_base_url(server.uri())
        .with_backoff(Duration::from_millis(10))
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_instruction: "Return JSON.".to_string(),
            user_payload: "{}".to_string(),
            temperature: 0.7,
            max_output_tokens: 128,
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_candidate_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_json(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Return JSON.\n\n{}" }] }],
                "generationConfig": { "temperature": 0.7, "maxOutputTokens": 128 }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(test_support::candidate_body("{\"a\":1}")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let text = client.complete(&request()).await.unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_missing_candidates_yield_empty_text() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        assert_eq!(client.complete(&request()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_single_429_is_retried_once() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        test_support::post_generate_content()
            .respond_with(
                ResponseTemplate::new(200).set_body_json(test_support::candidate_body("ok")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        assert_eq!(client.complete(&request()).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_second_429_becomes_transport_error() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .expect(2)
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("rate limited after retry"));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_forbidden_is_transport_error() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        assert!(client.complete(&request()).await.unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let client = GeminiCompletionClient::new(
            "test-key".to_string(),
            DEFAULT_MODEL.to_string(),
            Duration::from_secs(2),
        )
        .with_base_url("http://127.0.0.1:1".to_string());

        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn test_strips_models_prefix_from_model_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(test_support::candidate_body("x")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "models/gemini-2.0-flash");
        assert_eq!(client.model(), "gemini-2.0-flash");
        client.complete(&request()).await.unwrap();
    }

    #[test]
    fn test_from_config_requires_credential() {
        let config = Config::default();
        assert!(GeminiCompletionClient::from_config(&config, Client::new()).is_none());

        let config = Config {
            api_key: Some("k".to_string()),
            ..Config::default()
        };
        assert!(GeminiCompletionClient::from_config(&config, Client::new()).is_some());
    }
}
