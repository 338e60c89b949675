pub mod voice;

use log::{ debug, error, info, warn };
use serde_json::json;
use std::sync::{ Arc, Mutex, MutexGuard };
use tokio_util::sync::CancellationToken;

use crate::api::{ endpoints, ApiClient, ApiError, ApiRequest };
use crate::models::chat::{ ChatMessage, Conversation, SendMessageReply };
use crate::notify::Notifier;
use voice::{ SpeechRecognizer, VOICE_UNSUPPORTED };

pub const DEFAULT_CONVERSATION_TITLE: &str = "Website chat";
const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub open: bool,
    pub conversation: Option<Conversation>,
    pub messages: Vec<ChatMessage>,
    /// A reply is in flight.
    pub loading: bool,
    /// Bumped by `reset`. Work started under an older generation is discarded.
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Replied(ChatMessage),
    /// Blank input.
    Ignored,
    /// Still waiting on the previous reply.
    Busy,
    VoiceUnsupported,
}

/// Floating chat widget client. The conversation is created on first use and
/// lives only as long as the widget.
///
/// Lock order is `state` then `session`; neither is held across an await.
pub struct ChatWidget {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    voice: Option<Arc<dyn SpeechRecognizer>>,
    state: Mutex<ChatState>,
    /// Serializes conversation creation so concurrent callers share one.
    creating: tokio::sync::Mutex<()>,
    /// Child of `lifetime`, replaced on every reset.
    session: Mutex<CancellationToken>,
    lifetime: CancellationToken,
}

impl ChatWidget {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        let lifetime = CancellationToken::new();
        Self {
            api,
            notifier,
            voice: None,
            state: Mutex::new(ChatState::default()),
            creating: tokio::sync::Mutex::new(()),
            session: Mutex::new(lifetime.child_token()),
            lifetime,
        }
    }

    pub fn with_voice(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.voice = Some(recognizer);
        self
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn session(&self) -> CancellationToken {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Generation and token for work started now.
    fn begin(&self) -> (u64, CancellationToken) {
        let state = self.state();
        (state.generation, self.session())
    }

    pub fn snapshot(&self) -> ChatState {
        self.state().clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state().messages.clone()
    }

    pub fn conversation_id(&self) -> Option<String> {
        self.state().conversation.as_ref().map(|c| c.id.clone())
    }

    /// Opening the widget is the first interaction: it creates the conversation.
    pub async fn open(&self) -> Result<(), ApiError> {
        self.state().open = true;
        let (generation, session) = self.begin();
        match self.ensure_conversation(generation, &session).await {
            Ok(_) => Ok(()),
            Err(e) => {
                if !e.is_cancelled() {
                    error!("Failed to start conversation: {}", e);
                    self.notifier.error("Failed to start conversation");
                }
                Err(e)
            }
        }
    }

    pub fn close(&self) {
        self.state().open = false;
    }

    /// Forgets the transcript and the conversation. A reply still in flight
    /// is cancelled and never reaches the new transcript.
    pub fn reset(&self) {
        let mut state = self.state();
        state.generation = state.generation.wrapping_add(1);
        state.conversation = None;
        state.messages.clear();
        state.loading = false;

        let mut session = self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        session.cancel();
        *session = self.lifetime.child_token();
    }

    /// Cancels whatever is in flight; used on teardown.
    pub fn shutdown(&self) {
        self.lifetime.cancel();
    }

    /// The conversation of `generation`, or `Cancelled` once a reset moved on.
    fn current_conversation(&self, generation: u64) -> Result<Option<Conversation>, ApiError> {
        let state = self.state();
        if state.generation != generation {
            return Err(ApiError::Cancelled);
        }
        Ok(state.conversation.clone())
    }

    async fn ensure_conversation(
        &self,
        generation: u64,
        session: &CancellationToken
    ) -> Result<Conversation, ApiError> {
        if let Some(conversation) = self.current_conversation(generation)? {
            return Ok(conversation);
        }

        let _creating = self.creating.lock().await;
        // Whoever held the gate may have created it already.
        if let Some(conversation) = self.current_conversation(generation)? {
            return Ok(conversation);
        }

        let request = ApiRequest::post(endpoints::CONVERSATIONS).json(
            json!({ "title": DEFAULT_CONVERSATION_TITLE })
        );
        let envelope = self.api.fetch::<Conversation>(request, session).await?;
        let conversation = envelope.data;

        let mut state = self.state();
        if state.generation != generation {
            debug!("Discarding conversation {} created before a reset", conversation.id);
            return Err(ApiError::Cancelled);
        }
        info!("Started conversation {}", conversation.id);
        state.conversation = Some(conversation.clone());
        Ok(conversation)
    }

    /// Appends the user's message right away and the reply once it arrives.
    pub async fn send(&self, text: &str) -> Result<SendOutcome, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        let (generation, session) = {
            let mut state = self.state();
            if state.loading {
                warn!("Chat reply still pending, ignoring new message");
                return Ok(SendOutcome::Busy);
            }
            state.loading = true;
            state.messages.push(ChatMessage::user(text));
            (state.generation, self.session())
        };

        let result = self.exchange(text, generation, &session).await;

        let mut state = self.state();
        if state.generation != generation {
            debug!("Dropping chat reply from a conversation that was reset");
            return Err(ApiError::Cancelled);
        }
        state.loading = false;
        match result {
            Ok(reply) => {
                state.messages.push(reply.clone());
                Ok(SendOutcome::Replied(reply))
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                state.messages.push(ChatMessage::bot(FALLBACK_REPLY));
                drop(state);
                error!("Chat message failed: {}", e);
                self.notifier.error("Failed to send message");
                Err(e)
            }
        }
    }

    async fn exchange(
        &self,
        text: &str,
        generation: u64,
        session: &CancellationToken
    ) -> Result<ChatMessage, ApiError> {
        let conversation = self.ensure_conversation(generation, session).await?;
        let request = ApiRequest::post(endpoints::conversation_message(&conversation.id)).json(
            json!({ "message": text })
        );
        let envelope = self.api.fetch::<SendMessageReply>(request, session).await?;
        Ok(envelope.data.assistant_message.into())
    }

    /// Dictates one message. Without a recognizer the user gets a notice.
    pub async fn dictate(&self) -> Result<SendOutcome, ApiError> {
        let recognizer = match &self.voice {
            Some(recognizer) => recognizer.clone(),
            None => {
                self.notifier.info(VOICE_UNSUPPORTED);
                return Ok(SendOutcome::VoiceUnsupported);
            }
        };
        match recognizer.listen().await {
            Ok(transcript) => self.send(&transcript).await,
            Err(e) => {
                error!("Speech recognition failed: {}", e);
                self.notifier.error("Could not understand audio, please try again");
                Ok(SendOutcome::Ignored)
            }
        }
    }
}

impl Drop for ChatWidget {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
