use super::types::ApiError;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::io::Cursor;
use std::sync::Arc;

/// Transform size of the analyser; matches the demo's fixed `fftSize`.
pub const FFT_SIZE: usize = 128;
/// One bar per frequency bin.
pub const BAR_COUNT: usize = FFT_SIZE / 2;
/// Silence still renders: bars never drop below this height (px).
pub const MIN_BAR_HEIGHT: f32 = 3.0;

/// Lifecycle of the visualization session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Wired,
    Animating,
    TornDown,
}

/// Audio-processing context state. New contexts start suspended under the
/// browser autoplay policy and are resumed by the first user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Play,
    Click,
}

/// Two-stop color gradient for the bars, keyed by emotion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub from: &'static str,
    pub to: &'static str,
}

/// Pure palette lookup. Unknown emotions fall back to the default gradient.
pub fn bar_gradient(emotion: &str) -> Gradient {
    match emotion {
        "calm" => Gradient { from: "blue-400", to: "cyan-400" },
        "sad" => Gradient { from: "indigo-400", to: "blue-600" },
        "happy" => Gradient { from: "yellow-400", to: "pink-400" },
        "excited" => Gradient { from: "red-400", to: "orange-500" },
        "dramatic" => Gradient { from: "purple-500", to: "pink-500" },
        "suspenseful" => Gradient { from: "amber-300", to: "red-600" },
        "neutral" => Gradient { from: "blue-500", to: "cyan-500" },
        _ => Gradient { from: "blue-400", to: "purple-500" },
    }
}

/// Source → analyser → output wiring over decoded PCM.
struct AnalyserGraph {
    samples: Vec<f32>,
    sample_rate: u32,
    fft: Arc<dyn Fft<f32>>,
}

/// Live binding between one audio resource and the frequency analyser that
/// drives the bar visualizer. Owns the only analyser graph; wiring a new
/// resource tears the previous graph down first, and teardown is
/// unconditional and idempotent so no native resource outlives the session.
pub struct VisualizationSession {
    state: SessionState,
    context: ContextState,
    graph: Option<AnalyserGraph>,
    emotion: String,
    resume_armed: bool,
    frame_pending: bool,
}

impl VisualizationSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            context: ContextState::Closed,
            graph: None,
            emotion: String::new(),
            resume_armed: false,
            frame_pending: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn context_state(&self) -> ContextState {
        self.context
    }

    pub fn has_graph(&self) -> bool {
        self.graph.is_some()
    }

    pub fn gradient(&self) -> Gradient {
        bar_gradient(&self.emotion)
    }

    /// Wire a new audio resource. Any previously wired graph is torn down
    /// first, so the session holds exactly one live graph at a time.
    pub fn wire(&mut self, samples: Vec<f32>, sample_rate: u32, emotion: &str) {
        self.teardown_graph();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        self.graph = Some(AnalyserGraph {
            samples,
            sample_rate,
            fft,
        });
        self.emotion = emotion.to_string();
        self.context = ContextState::Suspended;
        self.resume_armed = true;
        self.state = SessionState::Wired;
    }

    /// Begin the per-frame animation loop.
    pub fn start(&mut self) {
        if self.state == SessionState::Wired {
            self.state = SessionState::Animating;
            self.frame_pending = true;
        }
    }

    /// First `play` or `click` resumes a suspended context, then the
    /// listener disarms (one-shot).
    pub fn interact(&mut self, _event: Interaction) {
        if !self.resume_armed {
            return;
        }
        self.resume_armed = false;
        if self.context == ContextState::Suspended {
            self.context = ContextState::Running;
        }
    }

    /// One animation frame: read the frequency magnitudes around the current
    /// playback position and map each bin to a bar height with a floor, so
    /// silence is still visibly rendered. Returns `None` once the loop has
    /// been cancelled or the session is not animating.
    pub fn frame(&mut self, position_secs: f64) -> Option<Vec<f32>> {
        if self.state != SessionState::Animating || !self.frame_pending {
            return None;
        }
        let graph = self.graph.as_ref()?;

        let mut window = [Complex::new(0.0f32, 0.0f32); FFT_SIZE];
        let start = (position_secs.max(0.0) * graph.sample_rate as f64) as usize;
        for (i, slot) in window.iter_mut().enumerate() {
            let sample = graph.samples.get(start + i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * hann_window(i, FFT_SIZE), 0.0);
        }

        let mut spectrum = window;
        graph.fft.process(&mut spectrum);

        // Normalize magnitudes into the analyser's byte range: a Hann-windowed
        // full-scale tone peaks near FFT_SIZE / 4.
        let full_scale = FFT_SIZE as f32 / 4.0;
        let heights = spectrum[..BAR_COUNT]
            .iter()
            .map(|bin| {
                let byte = (bin.norm() * 255.0 / full_scale).min(255.0);
                (byte / 2.5).max(MIN_BAR_HEIGHT)
            })
            .collect();

        Some(heights)
    }

    /// Tear the whole session down: cancel the pending frame, drop the
    /// interaction listener, disconnect the analyser, close the context.
    /// Every step runs unconditionally; calling this twice is a no-op.
    pub fn close(&mut self) {
        self.teardown_graph();
        self.state = SessionState::TornDown;
    }

    fn teardown_graph(&mut self) {
        self.frame_pending = false;
        self.resume_armed = false;
        self.graph = None;
        self.context = ContextState::Closed;
    }
}

impl Default for VisualizationSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Hann window, as used by the analysis pipeline.
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Decode a WAV resource into mono f32 samples for analysis.
pub fn decode_wav_samples(bytes: &[u8]) -> Result<(Vec<f32>, u32), ApiError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| ApiError::Parse(format!("WAV decode: {}", e)))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => {
            reader.into_samples::<f32>().filter_map(Result::ok).collect()
        }
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .filter_map(Result::ok)
                .map(|s| s as f32 / full_scale)
                .collect()
        }
    };

    let mono = samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn wiring_transitions_through_the_state_machine() {
        let mut session = VisualizationSession::new();
        assert_eq!(session.state(), SessionState::Uninitialized);

        session.wire(vec![0.0; 1024], 8000, "calm");
        assert_eq!(session.state(), SessionState::Wired);
        assert_eq!(session.context_state(), ContextState::Suspended);

        session.start();
        assert_eq!(session.state(), SessionState::Animating);

        session.close();
        assert_eq!(session.state(), SessionState::TornDown);
        assert_eq!(session.context_state(), ContextState::Closed);
        assert!(!session.has_graph());
    }

    #[test]
    fn rewiring_never_leaves_two_graphs() {
        let mut session = VisualizationSession::new();
        session.wire(vec![0.0; 256], 8000, "calm");
        session.start();
        session.wire(vec![0.0; 256], 8000, "sad");

        assert!(session.has_graph());
        assert_eq!(session.state(), SessionState::Wired);
        // The replaced graph's frame loop was cancelled with it.
        assert_eq!(session.frame(0.0), None);
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut session = VisualizationSession::new();
        session.wire(vec![0.0; 256], 8000, "calm");
        session.close();
        session.close();
        assert_eq!(session.state(), SessionState::TornDown);

        // Closing a session that never finished wiring is also fine.
        let mut fresh = VisualizationSession::new();
        fresh.close();
        fresh.close();
        assert!(!fresh.has_graph());
    }

    #[test]
    fn first_interaction_resumes_the_context_once() {
        let mut session = VisualizationSession::new();
        session.wire(vec![0.0; 256], 8000, "calm");
        assert_eq!(session.context_state(), ContextState::Suspended);

        session.interact(Interaction::Play);
        assert_eq!(session.context_state(), ContextState::Running);

        // Listener is gone after the first interaction.
        session.close();
        session.interact(Interaction::Click);
        assert_eq!(session.context_state(), ContextState::Closed);
    }

    #[test]
    fn silence_renders_at_the_floor_height() {
        let mut session = VisualizationSession::new();
        session.wire(vec![0.0; 1024], 8000, "neutral");
        session.start();

        let heights = session.frame(0.0).unwrap();
        assert_eq!(heights.len(), BAR_COUNT);
        assert!(heights.iter().all(|&h| h == MIN_BAR_HEIGHT));
    }

    #[test]
    fn a_tone_lifts_its_frequency_bin_above_the_floor() {
        let sample_rate = 8000;
        // Bin 16 of a 128-point transform at 8 kHz is 1 kHz.
        let samples = sine(1000.0, sample_rate, 8000);

        let mut session = VisualizationSession::new();
        session.wire(samples, sample_rate, "excited");
        session.start();

        let heights = session.frame(0.0).unwrap();
        assert!(heights[16] > MIN_BAR_HEIGHT);
        assert!(heights[16] > heights[40]);
    }

    #[test]
    fn positions_past_the_end_render_silence() {
        let mut session = VisualizationSession::new();
        session.wire(sine(440.0, 8000, 800), 8000, "calm");
        session.start();

        let heights = session.frame(60.0).unwrap();
        assert!(heights.iter().all(|&h| h == MIN_BAR_HEIGHT));
    }

    #[test]
    fn frames_stop_after_close() {
        let mut session = VisualizationSession::new();
        session.wire(vec![0.1; 1024], 8000, "calm");
        session.start();
        assert!(session.frame(0.0).is_some());

        session.close();
        assert_eq!(session.frame(0.0), None);
    }

    #[test]
    fn palette_covers_known_emotions_and_falls_back() {
        assert_eq!(bar_gradient("dramatic").from, "purple-500");
        assert_eq!(bar_gradient("suspenseful").to, "red-600");
        assert_eq!(
            bar_gradient("confused"),
            Gradient { from: "blue-400", to: "purple-500" }
        );
    }

    #[test]
    fn wav_decode_downmixes_to_mono() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut bytes, spec).unwrap();
            for _ in 0..64 {
                writer.write_sample(i16::MAX).unwrap();
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }

        let (mono, sample_rate) = decode_wav_samples(&bytes.into_inner()).unwrap();
        assert_eq!(sample_rate, 8000);
        assert_eq!(mono.len(), 64);
        assert!((mono[0] - 0.5).abs() < 0.01);
    }
}
