use super::client::GenerationClient;
use super::types::{ApiError, GeneratedSample, GenerationInput, RequestState};
use super::variants::collect_variants;

/// Which input the user asked to generate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Text,
    File,
}

/// Page controller for the demo flow: one base generation at a time, then a
/// best-effort variant batch over the same input. The variant batch has its
/// own progress flag, independent of the base request's lifecycle.
pub struct DemoSession {
    client: GenerationClient,
    text: String,
    file: Option<(String, Vec<u8>)>,
    state: RequestState,
    samples: Vec<GeneratedSample>,
    variants_loading: bool,
    // Bumped on every submit; completions from a superseded submit are
    // dropped instead of overwriting newer state.
    generation: u64,
}

impl DemoSession {
    pub fn new(client: GenerationClient) -> Self {
        Self {
            client,
            text: String::new(),
            file: None,
            state: RequestState::Idle,
            samples: Vec::new(),
            variants_loading: false,
            generation: 0,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn set_file(&mut self, name: &str, bytes: Vec<u8>) {
        self.file = Some((name.to_string(), bytes));
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn samples(&self) -> &[GeneratedSample] {
        &self.samples
    }

    pub fn variants_loading(&self) -> bool {
        self.variants_loading
    }

    pub fn emotion(&self) -> Option<&str> {
        match &self.state {
            RequestState::Succeeded(r) => Some(&r.emotion),
            _ => None,
        }
    }

    /// Run the base generation for the chosen input, then the variant batch.
    /// A request already in flight gates repeated submission; empty input
    /// fails locally without touching the network.
    pub async fn submit(&mut self, mode: InputMode) {
        if self.state.is_loading() {
            return;
        }

        self.generation += 1;
        let token = self.generation;

        self.state = RequestState::Loading;
        self.samples.clear();
        self.variants_loading = false;

        let input = match self.input_for(mode) {
            Some(input) => input,
            None => {
                self.state = RequestState::Failed(ApiError::EmptyInput.user_message());
                return;
            }
        };

        let result = self.client.generate(&input, None).await;
        if self.generation != token {
            return;
        }

        match result {
            Ok(response) => {
                self.state = RequestState::Succeeded(response);
                let preview = input.preview_snippet();

                self.variants_loading = true;
                let samples = collect_variants(&self.client, &input, &preview).await;
                if self.generation == token {
                    self.samples = samples;
                    self.variants_loading = false;
                }
            }
            Err(e) => {
                self.state = RequestState::Failed(e.user_message());
            }
        }
    }

    fn input_for(&self, mode: InputMode) -> Option<GenerationInput> {
        match mode {
            InputMode::Text => {
                if self.text.trim().is_empty() {
                    None
                } else {
                    Some(GenerationInput::Text(self.text.clone()))
                }
            }
            InputMode::File => self
                .file
                .as_ref()
                .map(|(name, bytes)| GenerationInput::File {
                    name: name.clone(),
                    bytes: bytes.clone(),
                })
                .filter(|input| !input.is_empty()),
        }
    }
}
