use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One line of the widget transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: &str) -> Self {
        Self::local(text, Sender::User)
    }

    pub fn bot(text: &str) -> Self {
        Self::local(text, Sender::Bot)
    }

    fn local(text: &str, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// Message as the chat backend stores it.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerChatMessage {
    #[serde(alias = "_id")]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ServerChatMessage> for ChatMessage {
    fn from(msg: ServerChatMessage) -> Self {
        let sender = match msg.role.as_deref() {
            Some("user") => Sender::User,
            _ => Sender::Bot,
        };
        Self {
            id: msg.id,
            text: msg.content,
            sender,
            timestamp: msg.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageReply {
    pub assistant_message: ServerChatMessage,
}
