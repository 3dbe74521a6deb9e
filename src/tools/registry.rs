use jsonschema::{Draft, JSONSchema};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::ToolDeclaration;
use crate::error::{LumoError, Result};

pub type ToolOutput = Map<String, Value>;

/// Bound tool handler. Receives the ambient cancellation token explicitly;
/// a panicking handler is a programming error and is left to propagate.
pub type ToolHandler = Box<
    dyn for<'a> Fn(
            &'a CancellationToken,
            &'a Map<String, Value>,
        )
            -> Pin<Box<dyn Future<Output = std::result::Result<ToolOutput, String>> + Send + 'a>>
        + Send
        + Sync,
>;

pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema (Draft 7) for the arguments the model may pass.
    pub parameters: Value,
    pub handler: ToolHandler,
}

/// Named tools keyed by name, declarations kept in registration order.
/// Read-only once built; safe to share across concurrent turns.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolSpec>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: ToolSpec) -> Result<()> {
        if self.tools.contains_key(&spec.name) {
            return Err(LumoError::DuplicateTool(spec.name));
        }
        self.order.push(spec.name.clone());
        self.tools.insert(spec.name.clone(), spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name)
    }

    pub fn list(&self) -> Vec<&ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Signatures advertised to the model, in registration order.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.list()
            .iter()
            .map(|spec| ToolDeclaration {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            })
            .collect()
    }

    pub fn validate_arguments(
        &self,
        tool_name: &str,
        arguments: &Map<String, Value>,
    ) -> std::result::Result<(), String> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| format!("Tool '{}' not found", tool_name))?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&tool.parameters)
            .map_err(|e| format!("Invalid tool schema: {}", e))?;

        let args_value = Value::Object(arguments.clone());
        if let Err(errors) = schema.validate(&args_value) {
            let messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(messages.join("; "));
        }

        Ok(())
    }

    /// Run a tool by name. Handler errors come back wrapped with the tool
    /// name for diagnostics; how to react is the caller's decision.
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| LumoError::UnknownTool(name.to_string()))?;

        self.validate_arguments(name, arguments)
            .map_err(|message| LumoError::ToolExecution {
                tool: name.to_string(),
                message,
            })?;

        debug!(tool = name, "executing tool");

        (tool.handler)(cancel, arguments)
            .await
            .map_err(|message| LumoError::ToolExecution {
                tool: name.to_string(),
                message,
            })
    }
}
