use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::transport::ToolDeclaration;
use crate::models::{Message, Part, Role};

/// Wire-level content part. The endpoint populates exactly one field.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<WireFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<WireFunctionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunctionResponse {
    pub name: String,
    #[serde(default)]
    pub response: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WireCandidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<WireCandidate>,
}

impl From<&Part> for WirePart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(text) => WirePart {
                text: Some(text.clone()),
                ..Default::default()
            },
            Part::ToolCall { name, arguments } => WirePart {
                function_call: Some(WireFunctionCall {
                    name: name.clone(),
                    args: arguments.clone(),
                }),
                ..Default::default()
            },
            Part::ToolResult { name, result } => WirePart {
                function_response: Some(WireFunctionResponse {
                    name: name.clone(),
                    response: result.clone(),
                }),
                ..Default::default()
            },
        }
    }
}

impl WirePart {
    /// Back to the domain representation. Parts the endpoint may emit that
    /// carry none of the known fields map to nothing.
    pub fn to_part(&self) -> Option<Part> {
        if let Some(text) = &self.text {
            return Some(Part::Text(text.clone()));
        }
        if let Some(call) = &self.function_call {
            return Some(Part::ToolCall {
                name: call.name.clone(),
                arguments: call.args.clone(),
            });
        }
        if let Some(resp) = &self.function_response {
            return Some(Part::ToolResult {
                name: resp.name.clone(),
                result: resp.response.clone(),
            });
        }
        None
    }
}

/// Map a history message onto wire content. System messages are carried via
/// `systemInstruction` instead, and tool results travel under the user role.
pub fn content_from_message(message: &Message) -> Option<Content> {
    let role = match message.role {
        Role::System => return None,
        Role::User | Role::Tool => "user",
        Role::Model => "model",
    };

    Some(Content {
        role: Some(role.to_string()),
        parts: message.parts.iter().map(WirePart::from).collect(),
    })
}

pub fn format_tool_declarations(tools: &[ToolDeclaration]) -> Vec<Value> {
    vec![json!({
        "functionDeclarations": tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "parameters": t.parameters,
                })
            })
            .collect::<Vec<_>>(),
    })]
}
