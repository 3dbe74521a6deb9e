use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::{Message, Part};

/// A tool signature advertised to the model: name, description, and a JSON
/// schema for the arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Per-session generation settings. An empty `tools` list means no
/// declarations are advertised and tool calling is off for the turn.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub system_instruction: Option<String>,
    pub temperature: f32,
    pub tools: Vec<ToolDeclaration>,
}

#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub candidates: Vec<Candidate>,
}

impl ChatResponse {
    /// Parts of the first candidate, or an empty slice. Only the first
    /// candidate is ever consumed.
    pub fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }
}

/// One open chat exchange. Implementations carry the conversation state so
/// every `send` sees the full history.
#[async_trait]
pub trait ChatSession: Send {
    async fn send(&mut self, parts: Vec<Part>) -> Result<ChatResponse>;
}

/// Opaque client able to open chat sessions. The wire protocol behind it is
/// not this crate's business; tests substitute a scripted implementation.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn create_session(
        &self,
        config: SessionConfig,
        history: &[Message],
    ) -> Result<Box<dyn ChatSession>>;
}
