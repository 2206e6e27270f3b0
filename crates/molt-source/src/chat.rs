//! Conversational relay client.
//!
//! `POST {base}/chat` with `{"message": ...}`, answered by `{"reply": ...}`.
//! The relay is opaque: any failure becomes a canned assistant message.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};
use crate::remote::{build_http_client, parse_base_url};

pub const DEFAULT_CHAT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 60;

pub const GREETING: &str = "Bienvenido al núcleo cognitivo de Moltbook. Soy MoltNet AI, \
     tu asistente en la red de agentes. ¿En qué puedo ayudarte hoy?";
pub const NO_REPLY_MESSAGE: &str = "Sin respuesta del servidor.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_CHAT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_CHAT_TIMEOUT_SECS
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_CHAT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatReply {
    reply: Option<String>,
}

pub struct ChatRelay {
    base_url: Url,
    client: Client,
}

impl ChatRelay {
    pub fn new(config: ChatConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_http_client(None, config.timeout_secs)?;
        Ok(Self { base_url, client })
    }

    pub fn connection_error_message(&self) -> String {
        format!(
            "Error de conexión con el núcleo. Asegúrate de que el backend está corriendo en {}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    async fn post(&self, message: &str) -> Result<Option<String>> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidConfig(format!("'{}' cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .push("chat");

        let response = self.client.post(url).json(&ChatRequest { message }).send().await?;
        let body = response.bytes().await?;
        let reply: ChatReply = serde_json::from_slice(&body)?;
        Ok(reply.reply.filter(|r| !r.is_empty()))
    }

    /// Send one message. Blank input is not sent and yields `None`;
    /// otherwise the reply or a substitute text is always returned.
    pub async fn send(&self, message: &str) -> Option<String> {
        let text = message.trim();
        if text.is_empty() {
            return None;
        }
        let reply = match self.post(text).await {
            Ok(Some(reply)) => reply,
            Ok(None) => NO_REPLY_MESSAGE.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Chat relay unreachable");
                self.connection_error_message()
            }
        };
        Some(reply)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Transcript of one conversation, opened by the assistant greeting.
pub struct ChatSession {
    relay: ChatRelay,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(relay: ChatRelay) -> Self {
        Self {
            relay,
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                content: GREETING.to_string(),
            }],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Record the user message and the assistant answer. Returns the answer,
    /// or `None` for blank input (nothing is recorded).
    pub async fn ask(&mut self, input: &str) -> Option<&ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: text.to_string(),
        });
        let reply = self
            .relay
            .send(text)
            .await
            .unwrap_or_else(|| NO_REPLY_MESSAGE.to_string());
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: reply,
        });
        self.messages.last()
    }
}
