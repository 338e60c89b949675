use async_trait::async_trait;
use std::error::Error;

pub const VOICE_UNSUPPORTED: &str = "Voice input is not supported in this environment";

/// Platform speech-to-text. Absent on most terminals.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listens for one utterance and returns its transcript.
    async fn listen(&self) -> Result<String, Box<dyn Error + Send + Sync>>;
}
