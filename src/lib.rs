//! Narrata demo client.
//!
//! Client-side core of the emotion-aware audiobook demo: it submits text or
//! file generation requests to the remote backend, collects a best-effort
//! batch of emotion-variant samples, and drives the waveform visualizers.
//! Speech synthesis and emotion detection live behind the HTTP API; this
//! crate only speaks the contract.

mod narrata;

pub use narrata::client::{
    generation_fields, parse_generate_response, parse_upload_response, GenerationClient,
    GenerationFields,
};
pub use narrata::demo::{DemoSession, InputMode};
pub use narrata::showcase::{Showcase, IDLE_BAR_PERCENT, SHOWCASE_BAR_COUNT};
pub use narrata::types::{
    ApiConfig, ApiError, Chapter, EmotionVoice, GeneratedSample, GenerationInput,
    GenerationResponse, RequestState, DEFAULT_EMOTION, DEFAULT_VOICE,
};
pub use narrata::upload::{ChapterPlayer, UploadSession};
pub use narrata::variants::{collect_variants, collect_variants_with, EmotionVariant, EMOTION_VARIANTS};
pub use narrata::viz::{
    bar_gradient, decode_wav_samples, ContextState, Gradient, Interaction, SessionState,
    VisualizationSession, BAR_COUNT, FFT_SIZE, MIN_BAR_HEIGHT,
};
