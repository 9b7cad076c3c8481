use super::client::GenerationClient;
use super::types::{Chapter, GenerationInput, RequestState};

/// Upload flow: post a book file, keep the detected chapter list, and let
/// each chapter generate its own audio from its preview text.
pub struct UploadSession {
    file: Option<(String, Vec<u8>)>,
    chapters: Vec<Chapter>,
    loading: bool,
    error: Option<String>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self {
            file: None,
            chapters: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn set_file(&mut self, name: &str, bytes: Vec<u8>) {
        self.file = Some((name.to_string(), bytes));
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Upload the selected file. Without a selection this is a no-op, the
    /// way the upload button stays disabled until a file is picked.
    pub async fn upload(&mut self, client: &GenerationClient) {
        let Some((name, bytes)) = self.file.clone() else {
            return;
        };
        if self.loading {
            return;
        }

        self.loading = true;
        self.error = None;

        match client.upload(&name, bytes).await {
            Ok(chapters) => self.chapters = chapters,
            Err(e) => self.error = Some(e.user_message()),
        }

        self.loading = false;
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-chapter generation control on the upload page.
pub struct ChapterPlayer {
    chapter: Chapter,
    state: RequestState,
}

impl ChapterPlayer {
    pub fn new(chapter: Chapter) -> Self {
        Self {
            chapter,
            state: RequestState::Idle,
        }
    }

    pub fn chapter(&self) -> &Chapter {
        &self.chapter
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.state.audio_url()
    }

    /// Generate audio from the chapter preview through the same `/generate`
    /// contract as the demo flow.
    pub async fn generate(&mut self, client: &GenerationClient) {
        if self.state.is_loading() {
            return;
        }

        self.state = RequestState::Loading;
        let input = GenerationInput::Text(self.chapter.preview.clone());

        self.state = match client.generate(&input, None).await {
            Ok(response) => RequestState::Succeeded(response),
            Err(e) => RequestState::Failed(e.user_message()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrata::types::ApiConfig;

    fn client() -> GenerationClient {
        GenerationClient::new(ApiConfig::new("http://127.0.0.1:1")).unwrap()
    }

    #[tokio::test]
    async fn upload_without_a_file_is_a_no_op() {
        let mut s = UploadSession::new();
        s.upload(&client()).await;
        assert!(s.chapters().is_empty());
        assert!(s.error().is_none());
        assert!(!s.loading());
    }

    #[tokio::test]
    async fn empty_file_surfaces_the_validation_error() {
        let mut s = UploadSession::new();
        s.set_file("book.txt", Vec::new());
        s.upload(&client()).await;
        assert_eq!(s.error(), Some("No text or file provided."));
        assert!(!s.loading());
    }

    #[tokio::test]
    async fn chapter_without_preview_fails_locally() {
        let mut p = ChapterPlayer::new(Chapter {
            id: 1,
            preview: String::new(),
        });
        p.generate(&client()).await;
        assert_eq!(p.state().error(), Some("No text or file provided."));
        assert!(p.audio_url().is_none());
    }

    #[tokio::test]
    async fn chapter_generation_against_dead_backend_fails_generically() {
        let mut p = ChapterPlayer::new(Chapter {
            id: 1,
            preview: "Once upon a time".to_string(),
        });
        p.generate(&client()).await;
        assert_eq!(p.state().error(), Some("Something went wrong"));
    }
}
