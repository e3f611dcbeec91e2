//! Analyzer - sends a selected image to the vision model and reads back a description.

use std::path::Path;
use std::time::Duration;

use super::error::AnalysisError;
use super::request::{data_uri, encode_image, ChatRequest, DEFAULT_MIME_TYPE, DEFAULT_PROMPT};
use super::response::extract_description;
use super::secret::ApiKey;
use crate::acquire::ImageReference;
use crate::config::Config;

/// Default base URL for Groq's OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "llama-3.2-11b-vision-preview";

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the `data:` URI is labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MimeLabel {
    /// Same MIME type for every image
    Fixed(String),
    /// Guess from the file extension, falling back to JPEG
    FromExtension,
}

impl Default for MimeLabel {
    fn default() -> Self {
        MimeLabel::Fixed(DEFAULT_MIME_TYPE.to_string())
    }
}

impl MimeLabel {
    /// MIME type to use for the image at `path`.
    pub fn for_path(&self, path: &Path) -> String {
        match self {
            MimeLabel::Fixed(mime) => mime.clone(),
            MimeLabel::FromExtension => image::ImageFormat::from_path(path)
                .map(|format| format.to_mime_type().to_string())
                .unwrap_or_else(|_| DEFAULT_MIME_TYPE.to_string()),
        }
    }
}

/// Client for the chat-completions endpoint.
///
/// The API key is injected at construction; nothing here reads the
/// environment.
pub struct Analyzer {
    api_key: ApiKey,
    base_url: String,
    model: String,
    prompt: String,
    mime_label: MimeLabel,
    http_client: reqwest::Client,
}

impl Analyzer {
    /// Create an analyzer against the default endpoint and model.
    pub fn new(api_key: ApiKey) -> Result<Self, AnalysisError> {
        Self::with_timeout(api_key, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create an analyzer from loaded configuration.
    pub fn from_config(api_key: ApiKey, config: &Config) -> Result<Self, AnalysisError> {
        let mime_label = if config.image.detect_mime_type {
            MimeLabel::FromExtension
        } else {
            MimeLabel::Fixed(config.image.mime_type.clone())
        };

        Ok(Self::with_timeout(
            api_key,
            Duration::from_secs(config.api.connect_timeout_secs),
        )?
        .with_base_url(config.api.base_url.clone())
        .with_model(config.api.model.clone())
        .with_prompt(config.api.prompt.clone())
        .with_mime_label(mime_label))
    }

    fn with_timeout(api_key: ApiKey, connect_timeout: Duration) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            mime_label: MimeLabel::default(),
            http_client,
        })
    }

    /// Point the analyzer at a different base URL. Useful for testing against a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_mime_label(mut self, mime_label: MimeLabel) -> Self {
        self.mime_label = mime_label;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn mime_label(&self) -> &MimeLabel {
        &self.mime_label
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Full URL of the chat-completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Ask the model to describe the selected image.
    ///
    /// Preconditions are checked in order before any I/O: an image must be
    /// selected, then the API key must be non-empty. The request is sent once;
    /// failures are never retried.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::NoImageSelected` or `AnalysisError::MissingApiKey`
    /// when a precondition fails, `AnalysisError::Http` for a non-success
    /// status, `AnalysisError::UnexpectedResponse` when the body lacks
    /// `choices[0].message.content`, and `Io`/`Request`/`Json` for the rest.
    pub async fn analyze(&self, image: Option<&ImageReference>) -> Result<String, AnalysisError> {
        let image = image.ok_or(AnalysisError::NoImageSelected)?;

        if self.api_key.is_empty() {
            return Err(AnalysisError::MissingApiKey {
                value: self.api_key.expose().to_string(),
            });
        }

        log::debug!("Reading image bytes from {}", image);
        let bytes = tokio::fs::read(image.path()).await?;
        let mime_type = self.mime_label.for_path(image.path());
        let request = ChatRequest::describe_image(
            &self.model,
            &self.prompt,
            data_uri(&mime_type, &encode_image(&bytes)),
        );

        log::debug!(
            "Requesting description from {} (model {}, {} bytes as {})",
            self.endpoint(),
            self.model,
            bytes.len(),
            mime_type
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Response status: {}", status.as_u16());
            log::error!("Response body: {}", body);
            return Err(AnalysisError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let description = extract_description(&body)?;
        log::debug!("Received description ({} chars)", description.len());
        Ok(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let analyzer = Analyzer::new(ApiKey::new("test-key")).unwrap();
        assert_eq!(analyzer.base_url(), DEFAULT_BASE_URL);
        assert_eq!(analyzer.model(), DEFAULT_MODEL);
        assert_eq!(analyzer.prompt(), DEFAULT_PROMPT);
        assert_eq!(
            analyzer.mime_label(),
            &MimeLabel::Fixed("image/jpeg".to_string())
        );
        assert!(analyzer.has_api_key());
    }

    #[test]
    fn test_empty_key_still_constructs() {
        let analyzer = Analyzer::new(ApiKey::default()).unwrap();
        assert!(!analyzer.has_api_key());
    }

    #[test]
    fn test_endpoint_url() {
        let analyzer = Analyzer::new(ApiKey::new("k")).unwrap();
        assert_eq!(
            analyzer.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );

        let analyzer = analyzer.with_base_url("http://127.0.0.1:9999/");
        assert_eq!(analyzer.endpoint(), "http://127.0.0.1:9999/chat/completions");
    }

    #[test]
    fn test_from_config_applies_settings() {
        let mut config = Config::default();
        config.api.model = "custom-model".to_string();
        config.api.prompt = "Describe it".to_string();
        config.image.mime_type = "image/png".to_string();

        let analyzer = Analyzer::from_config(ApiKey::new("k"), &config).unwrap();
        assert_eq!(analyzer.model(), "custom-model");
        assert_eq!(analyzer.prompt(), "Describe it");
        assert_eq!(
            analyzer.mime_label(),
            &MimeLabel::Fixed("image/png".to_string())
        );

        config.image.detect_mime_type = true;
        let analyzer = Analyzer::from_config(ApiKey::new("k"), &config).unwrap();
        assert_eq!(analyzer.mime_label(), &MimeLabel::FromExtension);
    }

    #[test]
    fn test_fixed_label_ignores_extension() {
        let label = MimeLabel::default();
        assert_eq!(label.for_path(Path::new("photo.png")), "image/jpeg");
        assert_eq!(label.for_path(Path::new("photo.jpg")), "image/jpeg");
    }

    #[test]
    fn test_extension_label() {
        let label = MimeLabel::FromExtension;
        assert_eq!(label.for_path(Path::new("photo.png")), "image/png");
        assert_eq!(label.for_path(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(label.for_path(Path::new("photo.webp")), "image/webp");
        assert_eq!(label.for_path(Path::new("no_extension")), "image/jpeg");
    }

    #[tokio::test]
    async fn test_analyze_without_image_fails_first() {
        // Missing image is reported even when the key is also missing.
        let analyzer = Analyzer::new(ApiKey::default()).unwrap();
        let result = analyzer.analyze(None).await;
        assert!(matches!(result, Err(AnalysisError::NoImageSelected)));
    }

    #[tokio::test]
    async fn test_analyze_with_blank_key_reports_value() {
        let analyzer = Analyzer::new(ApiKey::new("  ")).unwrap();
        let image = ImageReference::new("/does/not/exist.jpg");
        match analyzer.analyze(Some(&image)).await {
            Err(AnalysisError::MissingApiKey { value }) => assert_eq!(value, "  "),
            other => panic!("Expected MissingApiKey, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_analyze_missing_file_is_io_error() {
        let analyzer = Analyzer::new(ApiKey::new("k"))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let image = ImageReference::new("/does/not/exist.jpg");
        let result = analyzer.analyze(Some(&image)).await;
        assert!(matches!(result, Err(AnalysisError::Io(_))));
    }

    mod mock_http_tests {
        use super::*;
        use std::io::Write;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn image_file(bytes: &[u8]) -> tempfile::NamedTempFile {
            let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
            file.write_all(bytes).unwrap();
            file
        }

        #[tokio::test]
        async fn test_analyze_sends_bearer_token_and_body() {
            let mock_server = MockServer::start().await;
            let file = image_file(b"ABC");

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .and(header("Authorization", "Bearer test-api-key"))
                .and(header("Content-Type", "application/json"))
                .and(wiremock::matchers::body_json(serde_json::json!({
                    "model": "llama-3.2-11b-vision-preview",
                    "messages": [{
                        "role": "user",
                        "content": [
                            {"type": "text", "text": "What is there in the image?"},
                            {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}}
                        ]
                    }]
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "choices": [{"message": {"content": "a cat"}}]
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            let analyzer = Analyzer::new(ApiKey::new("test-api-key"))
                .unwrap()
                .with_base_url(mock_server.uri());
            let image = ImageReference::new(file.path());
            let result = analyzer.analyze(Some(&image)).await.unwrap();
            assert_eq!(result, "a cat");
        }

        #[tokio::test]
        async fn test_analyze_labels_by_extension_when_enabled() {
            let mock_server = MockServer::start().await;
            let file = image_file(b"ABC");

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .and(wiremock::matchers::body_string_contains(
                    "data:image/png;base64,QUJD",
                ))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "choices": [{"message": {"content": "a logo"}}]
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            let analyzer = Analyzer::new(ApiKey::new("k"))
                .unwrap()
                .with_base_url(mock_server.uri())
                .with_mime_label(MimeLabel::FromExtension);
            let image = ImageReference::new(file.path());
            assert_eq!(analyzer.analyze(Some(&image)).await.unwrap(), "a logo");
        }

        #[tokio::test]
        async fn test_analyze_http_error_carries_status_and_body() {
            let mock_server = MockServer::start().await;
            let file = image_file(b"ABC");

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
                .expect(1)
                .mount(&mock_server)
                .await;

            let analyzer = Analyzer::new(ApiKey::new("bad-key"))
                .unwrap()
                .with_base_url(mock_server.uri());
            let image = ImageReference::new(file.path());
            match analyzer.analyze(Some(&image)).await {
                Err(AnalysisError::Http { status, body }) => {
                    assert_eq!(status, 401);
                    assert_eq!(body, "invalid api key");
                }
                other => panic!("Expected Http error, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_analyze_invalid_json_is_parse_error() {
            let mock_server = MockServer::start().await;
            let file = image_file(b"ABC");

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
                .mount(&mock_server)
                .await;

            let analyzer = Analyzer::new(ApiKey::new("k"))
                .unwrap()
                .with_base_url(mock_server.uri());
            let image = ImageReference::new(file.path());
            let result = analyzer.analyze(Some(&image)).await;
            assert!(matches!(result, Err(AnalysisError::Json(_))));
        }

        #[tokio::test]
        async fn test_analyze_does_not_retry_on_server_error() {
            let mock_server = MockServer::start().await;
            let file = image_file(b"ABC");

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
                .expect(1)
                .mount(&mock_server)
                .await;

            let analyzer = Analyzer::new(ApiKey::new("k"))
                .unwrap()
                .with_base_url(mock_server.uri());
            let image = ImageReference::new(file.path());
            assert!(analyzer.analyze(Some(&image)).await.is_err());
        }
    }
}
