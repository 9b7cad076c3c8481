use super::client::GenerationClient;
use super::types::{ApiError, GeneratedSample, GenerationInput, GenerationResponse};

use rand::Rng;
use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed set of emotion renditions generated after the base sample.
#[derive(Debug, Clone, Copy)]
pub struct EmotionVariant {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const EMOTION_VARIANTS: [EmotionVariant; 3] = [
    EmotionVariant {
        key: "dramatic",
        label: "Dramatic",
        description: "High-stakes narration with bold pacing.",
    },
    EmotionVariant {
        key: "suspenseful",
        label: "Suspenseful",
        description: "Tense delivery with rising intensity.",
    },
    EmotionVariant {
        key: "neutral",
        label: "Neutral",
        description: "Balanced, documentary-style narration.",
    },
];

/// Best-effort enrichment of the base result: one extra generation per
/// emotion tag, issued sequentially. The first failure aborts the rest and
/// is logged; samples completed so far are kept. An input that can no longer
/// be rebuilt yields an empty batch, not an error.
pub async fn collect_variants(
    client: &GenerationClient,
    input: &GenerationInput,
    preview: &str,
) -> Vec<GeneratedSample> {
    collect_variants_with(
        |input, tag| {
            let client = client.clone();
            async move { client.generate(&input, Some(&tag)).await }
        },
        input,
        preview,
    )
    .await
}

pub async fn collect_variants_with<F, Fut>(
    mut generate: F,
    input: &GenerationInput,
    preview: &str,
) -> Vec<GeneratedSample>
where
    F: FnMut(GenerationInput, String) -> Fut,
    Fut: Future<Output = Result<GenerationResponse, ApiError>>,
{
    let mut samples = Vec::new();

    if input.is_empty() {
        return samples;
    }

    for variant in &EMOTION_VARIANTS {
        match generate(input.clone(), variant.key.to_string()).await {
            Ok(response) => {
                let emotion = if response.emotion.trim().is_empty() {
                    variant.key.to_string()
                } else {
                    response.emotion
                };
                samples.push(GeneratedSample {
                    id: sample_id(variant.key),
                    emotion,
                    audio_url: response.audio_url,
                    voice: response.voice,
                    title: format!("{} Sample", variant.label),
                    description: variant.description.to_string(),
                    preview: preview.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(tag = variant.key, error = %e, "variant generation failed");
                break;
            }
        }
    }

    samples
}

/// Render key for one sample: tag, wall-clock millis, random hex suffix.
fn sample_id(tag: &str) -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix: u32 = rand::thread_rng().gen();
    format!("{}-{}-{:08x}", tag, ts, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(tag: &str) -> Result<GenerationResponse, ApiError> {
        Ok(GenerationResponse {
            audio_url: format!("{}.mp3", tag),
            emotion: tag.to_string(),
            voice: "en-US-AvaNeural".to_string(),
        })
    }

    fn server_error() -> Result<GenerationResponse, ApiError> {
        Err(ApiError::ApiResponse {
            status: 500,
            message: "Variation generation failed".to_string(),
        })
    }

    #[tokio::test]
    async fn full_batch_covers_every_tag_in_order() {
        let input = GenerationInput::Text("Hello world".to_string());
        let samples =
            collect_variants_with(|_, tag| async move { ok(&tag) }, &input, "Hello world").await;

        assert_eq!(samples.len(), EMOTION_VARIANTS.len());
        let tags: Vec<&str> = samples.iter().map(|s| s.emotion.as_str()).collect();
        assert_eq!(tags, vec!["dramatic", "suspenseful", "neutral"]);
        assert_eq!(samples[0].title, "Dramatic Sample");
        assert_eq!(samples[0].preview, "Hello world");
    }

    #[tokio::test]
    async fn first_failure_aborts_the_remainder() {
        let input = GenerationInput::Text("Hello world".to_string());
        let mut calls = 0;
        let samples = collect_variants_with(
            |_, tag| {
                calls += 1;
                let n = calls;
                async move {
                    if n == 2 {
                        server_error()
                    } else {
                        ok(&tag)
                    }
                }
            },
            &input,
            "Hello world",
        )
        .await;

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].emotion, "dramatic");
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn empty_input_is_a_silent_skip() {
        let input = GenerationInput::Text("   ".to_string());
        let mut calls = 0;
        let samples = collect_variants_with(
            |_, tag| {
                calls += 1;
                async move { ok(&tag) }
            },
            &input,
            "",
        )
        .await;

        assert!(samples.is_empty());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn blank_response_emotion_falls_back_to_the_tag() {
        let input = GenerationInput::Text("Hello".to_string());
        let samples = collect_variants_with(
            |_, _| async {
                Ok::<_, ApiError>(GenerationResponse {
                    audio_url: "a.mp3".to_string(),
                    emotion: String::new(),
                    voice: "v1".to_string(),
                })
            },
            &input,
            "Hello",
        )
        .await;

        assert_eq!(samples[0].emotion, "dramatic");
    }

    #[tokio::test]
    async fn sample_ids_are_unique_and_tagged() {
        let input = GenerationInput::Text("Hello".to_string());
        let samples =
            collect_variants_with(|_, tag| async move { ok(&tag) }, &input, "Hello").await;

        assert!(samples[0].id.starts_with("dramatic-"));
        assert!(samples[1].id.starts_with("suspenseful-"));
        let ids: std::collections::HashSet<&str> =
            samples.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), samples.len());
    }
}
