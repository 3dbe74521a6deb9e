use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Model,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Model => "model",
            Role::Tool => "tool",
        }
    }
}

/// One element of a message. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    ToolCall {
        name: String,
        arguments: Map<String, Value>,
    },
    ToolResult {
        name: String,
        result: Map<String, Value>,
    },
}

impl Part {
    pub fn text(content: impl Into<String>) -> Self {
        Part::Text(content.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_tool_call(&self) -> bool {
        matches!(self, Part::ToolCall { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Message {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, vec![Part::text(content)])
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(content)])
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::text(content)])
    }

    pub fn tool(parts: Vec<Part>) -> Self {
        Self::new(Role::Tool, parts)
    }
}

/// Everything one conversation turn produced: the text answers in the order
/// the model emitted them, plus the raw parts they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOutput {
    pub answers: Vec<String>,
    pub raw_parts: Vec<Part>,
}
