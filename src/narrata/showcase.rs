use super::types::GeneratedSample;
use super::viz::{bar_gradient, Gradient};

use rand::Rng;

/// Bars per showcase card.
pub const SHOWCASE_BAR_COUNT: usize = 40;
/// Resting height (percent of the panel) for idle bars.
pub const IDLE_BAR_PERCENT: f32 = 20.0;

/// Decorative variant showcase: one card per generated sample, with a purely
/// cosmetic bar animation while a sample plays. It reads no audio data, and
/// at most one sample is audible at a time.
pub struct Showcase {
    samples: Vec<GeneratedSample>,
    playing: Option<String>,
}

impl Showcase {
    pub fn new(samples: Vec<GeneratedSample>) -> Self {
        Self {
            samples,
            playing: None,
        }
    }

    pub fn samples(&self) -> &[GeneratedSample] {
        &self.samples
    }

    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }

    pub fn is_playing(&self, id: &str) -> bool {
        self.playing.as_deref() == Some(id)
    }

    /// Start the given sample, implicitly stopping whichever was playing.
    /// Toggling the active sample stops it.
    pub fn toggle(&mut self, id: &str) {
        if self.is_playing(id) {
            self.playing = None;
        } else if self.samples.iter().any(|s| s.id == id) {
            self.playing = Some(id.to_string());
        }
    }

    /// Playback of the given sample ran to its end.
    pub fn ended(&mut self, id: &str) {
        if self.is_playing(id) {
            self.playing = None;
        }
    }

    /// Cosmetic bar heights for one card, in percent of the panel height.
    /// Playing cards bounce between 20 and 100; idle cards rest at 20.
    pub fn bar_heights(&self, id: &str, rng: &mut impl Rng) -> Vec<f32> {
        (0..SHOWCASE_BAR_COUNT)
            .map(|_| {
                if self.is_playing(id) {
                    rng.gen_range(0.0..80.0) + IDLE_BAR_PERCENT
                } else {
                    IDLE_BAR_PERCENT
                }
            })
            .collect()
    }

    pub fn gradient_for(&self, id: &str) -> Gradient {
        let emotion = self
            .samples
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.emotion.as_str())
            .unwrap_or_default();
        bar_gradient(emotion)
    }
}
