use serde::{Deserialize, Serialize};

/// Fallback pair used whenever emotion detection is unavailable.
pub const DEFAULT_EMOTION: &str = "neutral";
pub const DEFAULT_VOICE: &str = "en-US-JennyNeural";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Backend location comes from the environment, like the web build's
    /// public API base URL.
    pub fn from_env() -> Option<Self> {
        std::env::var("NARRATA_API_BASE_URL")
            .ok()
            .map(|u| Self::new(&u))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No text or file provided.")]
    EmptyInput,

    #[error("Backend base URL is required")]
    NoBaseUrl,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned error: {status} — {message}")]
    ApiResponse { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Message suitable for direct display in the demo view. Backend-reported
    /// errors carry the backend's own detail text; transport and parse
    /// failures collapse to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::ApiResponse { message, .. } => message.clone(),
            ApiError::EmptyInput => self.to_string(),
            _ => "Something went wrong".to_string(),
        }
    }
}

/// One generation payload: free text or an uploaded file. Immutable once
/// submitted; the orchestrator clones it per variant request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationInput {
    Text(String),
    File { name: String, bytes: Vec<u8> },
}

impl GenerationInput {
    pub fn is_empty(&self) -> bool {
        match self {
            GenerationInput::Text(t) => t.trim().is_empty(),
            GenerationInput::File { bytes, .. } => bytes.is_empty(),
        }
    }

    /// Short snippet of the source shown under each generated sample.
    pub fn preview_snippet(&self) -> String {
        match self {
            GenerationInput::Text(t) => {
                let trimmed = t.trim();
                if trimmed.is_empty() {
                    "Custom text input".to_string()
                } else {
                    trimmed.chars().take(140).collect()
                }
            }
            GenerationInput::File { name, .. } => format!("Uploaded file: {}", name),
        }
    }
}

/// Successful `/generate` body. Fields are carried verbatim into view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub audio_url: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub voice: String,
}

/// `/detect-emotion` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionVoice {
    pub emotion: String,
    pub voice: String,
}

impl Default for EmotionVoice {
    fn default() -> Self {
        Self {
            emotion: DEFAULT_EMOTION.to_string(),
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

/// One detected chapter from `/upload`. Extra backend fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    #[serde(default)]
    pub preview: String,
}

/// Lifecycle of a single generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(GenerationResponse),
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn audio_url(&self) -> Option<&str> {
        match self {
            RequestState::Succeeded(r) => Some(&r.audio_url),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(m) => Some(m),
            _ => None,
        }
    }
}

/// One entry of the emotion-variant batch, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSample {
    pub id: String,
    pub emotion: String,
    pub audio_url: String,
    pub voice: String,
    pub title: String,
    pub description: String,
    pub preview: String,
}
