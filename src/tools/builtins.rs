use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::registry::{ToolOutput, ToolRegistry, ToolSpec};
use crate::config::ToolsConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub base_dir: PathBuf,
    pub max_file_size_bytes: u64,
}

impl ToolSettings {
    pub fn from_config(config: &ToolsConfig) -> Self {
        let base_dir = config
            .base_dir
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            base_dir,
            max_file_size_bytes: config.max_file_size_mb * 1024 * 1024,
        }
    }
}

/// Build a registry holding the enabled built-in tools.
pub fn builtin_registry(config: &ToolsConfig) -> Result<ToolRegistry> {
    let settings = ToolSettings::from_config(config);
    let mut registry = ToolRegistry::new();

    let enabled = |name: &str| !config.disabled.iter().any(|d| d == name);

    if enabled("echo") {
        registry.register(ToolSpec {
            name: "echo".to_string(),
            description: "Echo back the provided text. Useful for testing or simple text output."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The text to echo back"
                    }
                },
                "required": ["text"],
                "additionalProperties": false
            }),
            handler: Box::new(|_cancel, args| Box::pin(async move { handle_echo(args) })),
        })?;
    }

    if enabled("time_now") {
        registry.register(ToolSpec {
            name: "time_now".to_string(),
            description: "Get the current date and time in ISO-8601 format.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
            handler: Box::new(|_cancel, args| Box::pin(async move { handle_time_now(args) })),
        })?;
    }

    if enabled("read_file") {
        let read_settings = settings.clone();
        registry.register(ToolSpec {
            name: "read_file".to_string(),
            description: "Read and return the contents of a file. Limited to files within the base directory and under the size limit."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the file to read (relative to base directory)"
                    }
                },
                "required": ["path"],
                "additionalProperties": false
            }),
            handler: Box::new(move |_cancel, args| {
                let settings = read_settings.clone();
                Box::pin(async move { handle_read_file(args, &settings) })
            }),
        })?;
    }

    Ok(registry)
}

// Tool handlers

pub fn handle_echo(args: &Map<String, Value>) -> std::result::Result<ToolOutput, String> {
    let text = args
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing required argument: text".to_string())?;

    let mut out = Map::new();
    out.insert("text".to_string(), Value::String(text.to_string()));
    Ok(out)
}

pub fn handle_time_now(_args: &Map<String, Value>) -> std::result::Result<ToolOutput, String> {
    let mut out = Map::new();
    out.insert(
        "time".to_string(),
        Value::String(chrono::Utc::now().to_rfc3339()),
    );
    Ok(out)
}

pub fn handle_read_file(
    args: &Map<String, Value>,
    settings: &ToolSettings,
) -> std::result::Result<ToolOutput, String> {
    let path_str = args
        .get("path")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing required argument: path".to_string())?;

    let resolved_path = safe_resolve_path(path_str, &settings.base_dir)?;

    if !resolved_path.exists() {
        return Err(format!("File not found: {}", path_str));
    }
    if !resolved_path.is_file() {
        return Err(format!("Path is not a file: {}", path_str));
    }

    let metadata =
        fs::metadata(&resolved_path).map_err(|e| format!("Failed to read file metadata: {}", e))?;
    if metadata.len() > settings.max_file_size_bytes {
        return Err(format!(
            "File too large: {} bytes (max: {} bytes)",
            metadata.len(),
            settings.max_file_size_bytes
        ));
    }

    // UTF-8 only
    let content =
        fs::read_to_string(&resolved_path).map_err(|e| format!("Failed to read file: {}", e))?;

    let mut out = Map::new();
    out.insert("content".to_string(), Value::String(content));
    Ok(out)
}

/// Resolve a user-provided path within the base directory, rejecting
/// traversal outside of it.
fn safe_resolve_path(user_path: &str, base_dir: &Path) -> std::result::Result<PathBuf, String> {
    if user_path.is_empty() || user_path.len() > 4096 {
        return Err("Invalid path: path must be non-empty and under 4096 characters".to_string());
    }

    let resolved = base_dir
        .join(user_path)
        .canonicalize()
        .map_err(|e| format!("Failed to resolve path: {}", e))?;

    let base_canonical = base_dir
        .canonicalize()
        .map_err(|e| format!("Failed to canonicalize base directory: {}", e))?;

    if !resolved.starts_with(&base_canonical) {
        return Err(format!(
            "Path traversal detected: '{}' escapes base directory",
            user_path
        ));
    }

    Ok(resolved)
}
