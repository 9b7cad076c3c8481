use super::types::{
    ApiConfig, ApiError, Chapter, EmotionVoice, GenerationInput, GenerationResponse,
};

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the generation backend. All three endpoints take
/// multipart form bodies; no retries, no request cancellation.
#[derive(Clone)]
pub struct GenerationClient {
    client: reqwest::Client,
    base_url: String,
}

impl GenerationClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::NoBaseUrl);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generate_url(&self) -> String {
        format!("{}/generate", self.base_url)
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    pub fn detect_emotion_url(&self) -> String {
        format!("{}/detect-emotion", self.base_url)
    }

    /// Submit one generation request. Empty input fails locally, before any
    /// network traffic.
    pub async fn generate(
        &self,
        input: &GenerationInput,
        target_emotion: Option<&str>,
    ) -> Result<GenerationResponse, ApiError> {
        let fields = generation_fields(input, target_emotion)?;

        let mut form = Form::new();
        if let Some(text) = fields.text {
            form = form.text("text", text);
        }
        if let Some((name, bytes)) = fields.file {
            form = form.part("file", Part::bytes(bytes).file_name(name));
        }
        if let Some(tag) = fields.target_emotion {
            form = form.text("target_emotion", tag);
        }

        let response = self
            .client
            .post(self.generate_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_generate_response(status, &body)
    }

    /// Post a book file and return the detected chapter list.
    pub async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<Vec<Chapter>, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::EmptyInput);
        }

        let form = Form::new().part("file", Part::bytes(bytes).file_name(name.to_string()));

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_upload_response(status, &body)
    }

    /// Classify the text's narrative tone. Any failure resolves to the
    /// default pair instead of an error; the primary flow never blocks on
    /// this call.
    pub async fn detect_emotion(&self, text: &str) -> EmotionVoice {
        match self.try_detect_emotion(text).await {
            Ok(detected) => detected,
            Err(e) => {
                tracing::warn!(error = %e, "emotion detection failed, using default voice");
                EmotionVoice::default()
            }
        }
    }

    async fn try_detect_emotion(&self, text: &str) -> Result<EmotionVoice, ApiError> {
        let form = Form::new().text("text", text.to_string());

        let response = self
            .client
            .post(self.detect_emotion_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::ApiResponse {
                status: status.as_u16(),
                message: "Emotion detection failed".to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Parse(format!("detect-emotion response: {}", e)))
    }
}

/// Multipart fields for one `/generate` submission, kept apart from the
/// reqwest form so the payload shape stays checkable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFields {
    pub text: Option<String>,
    pub file: Option<(String, Vec<u8>)>,
    pub target_emotion: Option<String>,
}

pub fn generation_fields(
    input: &GenerationInput,
    target_emotion: Option<&str>,
) -> Result<GenerationFields, ApiError> {
    if input.is_empty() {
        return Err(ApiError::EmptyInput);
    }

    let (text, file) = match input {
        GenerationInput::Text(t) => (Some(t.clone()), None),
        GenerationInput::File { name, bytes } => (None, Some((name.clone(), bytes.clone()))),
    };

    Ok(GenerationFields {
        text,
        file,
        target_emotion: target_emotion.map(|t| t.to_string()),
    })
}

/// Map a `/generate` reply to a result. Non-2xx replies surface the backend
/// `detail` string when present, else a generic message.
pub fn parse_generate_response(
    status: StatusCode,
    body: &str,
) -> Result<GenerationResponse, ApiError> {
    let raw: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    if !status.is_success() {
        let message = raw
            .get("detail")
            .and_then(|d| d.as_str())
            .unwrap_or("Generation failed")
            .to_string();
        return Err(ApiError::ApiResponse {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: GenerationResponse = serde_json::from_value(raw)
        .map_err(|e| ApiError::Parse(format!("generate response: {}", e)))?;

    if parsed.audio_url.trim().is_empty() {
        return Err(ApiError::Parse(
            "generate response: missing audio_url".to_string(),
        ));
    }

    Ok(parsed)
}

pub fn parse_upload_response(status: StatusCode, body: &str) -> Result<Vec<Chapter>, ApiError> {
    let raw: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    if !status.is_success() {
        let message = raw
            .get("detail")
            .and_then(|d| d.as_str())
            .unwrap_or("Upload failed")
            .to_string();
        return Err(ApiError::ApiResponse {
            status: status.as_u16(),
            message,
        });
    }

    match raw.get("chapters") {
        Some(chapters) => serde_json::from_value(chapters.clone())
            .map_err(|e| ApiError::Parse(format!("upload response: {}", e))),
        None => Ok(vec![]),
    }
}
