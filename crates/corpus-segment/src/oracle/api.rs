//! API-based section oracle using OpenAI-compatible endpoints.

use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::{SectionDraft, SectionOracle, SegmenterError};

/// Configuration for the API-based section oracle.
#[derive(Debug, Clone)]
pub struct ApiSectionOracleConfig {
    /// API base URL (e.g., "https://api.openai.com/v1")
    pub base_url: String,

    /// Model to use (e.g., "gpt-4o-mini", "claude-3-haiku-20240307")
    pub model: String,

    /// API key
    pub api_key: SecretString,

    /// Request timeout
    pub timeout: Duration,

    /// Maximum retries on failure
    pub max_retries: u32,
}

impl ApiSectionOracleConfig {
    /// Create config for OpenAI API.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
            api_key: SecretString::from(api_key.into()),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    /// Create config for Claude API.
    pub fn claude(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.anthropic.com/v1".to_string(),
            model: model.into(),
            api_key: SecretString::from(api_key.into()),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    /// Override the base URL (for custom/self-hosted endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// API-based section oracle implementation.
pub struct ApiSectionOracle {
    client: Client,
    config: ApiSectionOracleConfig,
}

/// Strict response schema: a single `sections` list of drafts.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SectionListResponse {
    sections: Vec<SectionDraft>,
}

impl ApiSectionOracle {
    /// Create a new API section oracle.
    pub fn new(config: ApiSectionOracleConfig) -> Result<Self, SegmenterError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SegmenterError::ConfigError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Build the segmentation prompt from the paragraph sample.
    fn build_prompt(&self, paragraphs: &[String]) -> String {
        let paragraphs_text: String = paragraphs
            .iter()
            .enumerate()
            .map(|(i, p)| format!("[paragraph {}]\n{}", i + 1, p))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"Split this document into properly titled sections.
Here is the raw text split by paragraph breaks:

{paragraphs_text}

Group paragraphs that belong to the same section, assign each section a title,
and return JSON in exactly this format:
{{
  "sections": [
    {{"title": "Section title", "content": "Merged paragraph content"}}
  ]
}}

Guidelines:
- Keep the original paragraph order
- Merge paragraphs that belong to the same section
- Titles should be short and descriptive
- Do not invent content that is not in the paragraphs"#
        )
    }

    /// Call the API with retry logic.
    async fn call_api(&self, prompt: &str) -> Result<String, SegmenterError> {
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(120)),
            ..Default::default()
        };

        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Calling segmentation API");

            match self.make_request(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempts >= self.config.max_retries {
                        error!(error = %e, "Max retries exceeded");
                        return Err(e);
                    }

                    match backoff.next_backoff() {
                        Some(duration) => {
                            warn!(
                                error = %e,
                                retry_in_ms = duration.as_millis(),
                                "API call failed, retrying"
                            );
                            tokio::time::sleep(duration).await;
                        }
                        None => {
                            error!(error = %e, "Backoff exhausted");
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    /// Make a single API request.
    async fn make_request(&self, prompt: &str) -> Result<String, SegmenterError> {
        let is_anthropic = self.config.base_url.contains("anthropic");

        if is_anthropic {
            self.make_anthropic_request(prompt).await
        } else {
            self.make_openai_request(prompt).await
        }
    }

    /// Make OpenAI-compatible API request.
    async fn make_openai_request(&self, prompt: &str) -> Result<String, SegmenterError> {
        #[derive(Serialize)]
        struct OpenAIRequest {
            model: String,
            messages: Vec<OpenAIMessage>,
            response_format: OpenAIResponseFormat,
        }

        #[derive(Serialize)]
        struct OpenAIMessage {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct OpenAIResponseFormat {
            #[serde(rename = "type")]
            format_type: String,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            choices: Vec<OpenAIChoice>,
        }

        #[derive(Deserialize)]
        struct OpenAIChoice {
            message: OpenAIMessageResponse,
        }

        #[derive(Deserialize)]
        struct OpenAIMessageResponse {
            content: String,
        }

        let request = OpenAIRequest {
            model: self.config.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: OpenAIResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SegmenterError::ApiError(e.to_string()))?;

        if response.status() == 429 {
            return Err(SegmenterError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SegmenterError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let response_body: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| SegmenterError::ParseError(e.to_string()))?;

        response_body
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| SegmenterError::ParseError("No choices in response".to_string()))
    }

    /// Make Anthropic API request.
    async fn make_anthropic_request(&self, prompt: &str) -> Result<String, SegmenterError> {
        #[derive(Serialize)]
        struct AnthropicRequest {
            model: String,
            max_tokens: u32,
            messages: Vec<AnthropicMessage>,
        }

        #[derive(Serialize)]
        struct AnthropicMessage {
            role: String,
            content: String,
        }

        #[derive(Deserialize)]
        struct AnthropicResponse {
            content: Vec<AnthropicContent>,
        }

        #[derive(Deserialize)]
        struct AnthropicContent {
            text: String,
        }

        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: 4096,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let url = format!("{}/messages", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.config.api_key.expose_secret())
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SegmenterError::ApiError(e.to_string()))?;

        if response.status() == 429 {
            return Err(SegmenterError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SegmenterError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let response_body: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| SegmenterError::ParseError(e.to_string()))?;

        response_body
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| SegmenterError::ParseError("No content in response".to_string()))
    }

    /// Parse the response body into section drafts through the strict schema.
    fn parse_sections(&self, response: &str) -> Result<Vec<SectionDraft>, SegmenterError> {
        let json_str = extract_json(response);

        let parsed: SectionListResponse = serde_json::from_str(&json_str).map_err(|e| {
            SegmenterError::ParseError(format!("Failed to parse section list JSON: {}", e))
        })?;

        Ok(parsed.sections)
    }
}

/// Extract JSON object from text (handles markdown code blocks).
fn extract_json(text: &str) -> String {
    // Check for markdown code block
    if let Some(start) = text.find("```json") {
        if let Some(end) = text[start + 7..].find("```") {
            return text[start + 7..start + 7 + end].trim().to_string();
        }
    }

    // Check for plain code block
    if let Some(start) = text.find("```") {
        if let Some(end) = text[start + 3..].find("```") {
            return text[start + 3..start + 3 + end].trim().to_string();
        }
    }

    // Find first { and last }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        return text[start..=end].to_string();
    }

    text.to_string()
}

#[async_trait]
impl SectionOracle for ApiSectionOracle {
    async fn propose_sections(
        &self,
        paragraphs: &[String],
    ) -> Result<Vec<SectionDraft>, SegmenterError> {
        if paragraphs.is_empty() {
            return Err(SegmenterError::NoParagraphs);
        }

        let prompt = self.build_prompt(paragraphs);
        let response = self.call_api(&prompt).await?;
        self.parse_sections(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_json_plain() {
        let text = r#"{"sections": []}"#;
        assert_eq!(extract_json(text), text);
    }

    #[test]
    fn test_extract_json_code_block() {
        let text = "Here you go:\n```json\n{\"sections\": []}\n```";
        assert_eq!(extract_json(text), r#"{"sections": []}"#);
    }

    #[test]
    fn test_extract_json_with_prefix() {
        let text = r#"Sure! {"sections": [{"title": "A", "content": "b"}]}"#;
        let json = extract_json(text);
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
    }

    #[test]
    fn test_openai_config() {
        let config = ApiSectionOracleConfig::openai("test-key", "gpt-4o-mini");
        assert!(config.base_url.contains("openai"));
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_claude_config() {
        let config = ApiSectionOracleConfig::claude("test-key", "claude-3-haiku-20240307");
        assert!(config.base_url.contains("anthropic"));
    }

    fn oracle_against(server: &MockServer) -> ApiSectionOracle {
        let config = ApiSectionOracleConfig::openai("test-key", "gpt-4o-mini")
            .with_base_url(server.uri());
        ApiSectionOracle::new(config).unwrap()
    }

    fn chat_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"content": content}}]
        })
    }

    #[tokio::test]
    async fn test_propose_sections_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(
                r#"{"sections": [{"title": "Scope", "content": "Applies to cranes."}]}"#,
            )))
            .mount(&server)
            .await;

        let oracle = oracle_against(&server);
        let drafts = oracle
            .propose_sections(&["Applies to cranes.".to_string()])
            .await
            .unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Scope");
    }

    #[tokio::test]
    async fn test_propose_sections_rejects_nonconforming_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(
                r#"{"sections": [{"title": "Scope", "content": "x", "extra": true}]}"#,
            )))
            .mount(&server)
            .await;

        let oracle = oracle_against(&server);
        let result = oracle.propose_sections(&["x".to_string()]).await;

        assert!(matches!(result, Err(SegmenterError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_propose_sections_empty_input() {
        let server = MockServer::start().await;
        let oracle = oracle_against(&server);
        let result = oracle.propose_sections(&[]).await;
        assert!(matches!(result, Err(SegmenterError::NoParagraphs)));
    }
}
