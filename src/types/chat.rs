//! Contains all data structures that are particularly used for chat completion.

use serde::{Deserialize, Serialize};

/// A single message in a conversation, as sent to or received from the gateway.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// The role of the author of this message (e.g. `"system"`, `"user"`, `"assistant"`).
    #[serde(default)]
    pub role: String,
    /// The content of the message.
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Request for `ChatComplete`: generates the next reply for a list of messages.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompleteRequest {
    /// The name of the model to use. Refer to the developer docs for available models.
    pub model: String,
    /// The conversation so far.
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompleteRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn add_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Response for `ChatComplete`.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompleteResponse {
    /// The generated reply.
    #[serde(default)]
    pub response: ChatMessage,
    /// Number of tokens in the generated reply.
    #[serde(default)]
    pub tokens: u32,
}

/// Request for `ChatCompleteStream`. Streamed and blocking completion take the same request.
pub type ChatCompleteStreamRequest = ChatCompleteRequest;

/// One chunk of a `ChatCompleteStream` response.
///
/// The first chunk carries the role of the reply; every chunk after it carries
/// a piece of the reply's content.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompleteStreamChunk {
    #[serde(default)]
    pub response: ChatMessage,
}
