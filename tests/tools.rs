use serde_json::{json, Map, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use lumo::config::ToolsConfig;
use lumo::error::LumoError;
use lumo::tools::builtins::{handle_echo, handle_read_file};
use lumo::tools::{builtin_registry, ToolRegistry, ToolSettings, ToolSpec};

fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn noop_tool(name: &str, parameters: Value) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: format!("test tool {}", name),
        parameters,
        handler: Box::new(|_cancel, _args| Box::pin(async move { Ok(Map::new()) })),
    }
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = ToolRegistry::new();
    registry
        .register(noop_tool("echo", json!({ "type": "object" })))
        .unwrap();

    let err = registry
        .register(noop_tool("echo", json!({ "type": "object" })))
        .unwrap_err();

    assert!(matches!(err, LumoError::DuplicateTool(name) if name == "echo"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn declarations_keep_registration_order() {
    let mut registry = ToolRegistry::new();
    registry
        .register(noop_tool("bravo", json!({ "type": "object" })))
        .unwrap();
    registry
        .register(noop_tool("alpha", json!({ "type": "object" })))
        .unwrap();

    let names: Vec<String> = registry
        .declarations()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["bravo".to_string(), "alpha".to_string()]);
}

#[tokio::test]
async fn executing_an_unknown_tool_errors() {
    let registry = ToolRegistry::new();
    let err = registry
        .execute(&CancellationToken::new(), "nope", &Map::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LumoError::UnknownTool(name) if name == "nope"));
}

#[tokio::test]
async fn schema_violations_are_reported_as_execution_errors() {
    let mut registry = ToolRegistry::new();
    registry
        .register(noop_tool(
            "strict",
            json!({
                "type": "object",
                "properties": { "count": { "type": "integer" } },
                "required": ["count"],
                "additionalProperties": false
            }),
        ))
        .unwrap();

    let err = registry
        .execute(
            &CancellationToken::new(),
            "strict",
            &obj(json!({ "count": "not a number" })),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, LumoError::ToolExecution { tool, .. } if tool == "strict"));
}

#[tokio::test]
async fn handler_errors_carry_the_tool_name() {
    let mut registry = ToolRegistry::new();
    registry
        .register(ToolSpec {
            name: "flaky".to_string(),
            description: "always fails".to_string(),
            parameters: json!({ "type": "object" }),
            handler: Box::new(|_cancel, _args| {
                Box::pin(async move { Err("boom".to_string()) })
            }),
        })
        .unwrap();

    let err = registry
        .execute(&CancellationToken::new(), "flaky", &Map::new())
        .await
        .unwrap_err();

    match err {
        LumoError::ToolExecution { tool, message } => {
            assert_eq!(tool, "flaky");
            assert_eq!(message, "boom");
        }
        other => panic!("expected ToolExecution, got {:?}", other),
    }
}

#[tokio::test]
async fn registry_reads_are_safe_across_concurrent_turns() {
    let mut registry = ToolRegistry::new();
    registry
        .register(noop_tool("echo", json!({ "type": "object" })))
        .unwrap();
    let registry = Arc::new(registry);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            registry
                .execute(&CancellationToken::new(), "echo", &Map::new())
                .await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
}

#[test]
fn builtin_registry_honors_disabled_list() {
    let config = ToolsConfig {
        disabled: vec!["read_file".to_string()],
        ..Default::default()
    };

    let registry = builtin_registry(&config).unwrap();
    assert!(registry.get("echo").is_some());
    assert!(registry.get("time_now").is_some());
    assert!(registry.get("read_file").is_none());
}

#[test]
fn echo_returns_the_given_text() {
    let result = handle_echo(&obj(json!({ "text": "Hello, world!" }))).unwrap();
    assert_eq!(result.get("text"), Some(&Value::String("Hello, world!".into())));

    let err = handle_echo(&Map::new()).unwrap_err();
    assert!(err.contains("Missing required argument: text"));
}

#[test]
fn read_file_returns_contents() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("test.txt"), "Hello, world!").unwrap();

    let settings = ToolSettings {
        base_dir: temp_dir.path().to_path_buf(),
        max_file_size_bytes: 1024,
    };

    let result = handle_read_file(&obj(json!({ "path": "test.txt" })), &settings).unwrap();
    assert_eq!(
        result.get("content"),
        Some(&Value::String("Hello, world!".into()))
    );
}

#[test]
fn read_file_rejects_missing_and_oversized_files() {
    let temp_dir = TempDir::new().unwrap();
    let settings = ToolSettings {
        base_dir: temp_dir.path().to_path_buf(),
        max_file_size_bytes: 1024,
    };

    let err = handle_read_file(&obj(json!({ "path": "nonexistent.txt" })), &settings).unwrap_err();
    assert!(err.contains("File not found"));

    fs::write(temp_dir.path().join("large.txt"), "x".repeat(2048)).unwrap();
    let err = handle_read_file(&obj(json!({ "path": "large.txt" })), &settings).unwrap_err();
    assert!(err.contains("File too large"));
}

#[test]
fn read_file_prevents_path_traversal() {
    let temp_dir = TempDir::new().unwrap();
    let settings = ToolSettings {
        base_dir: temp_dir.path().to_path_buf(),
        max_file_size_bytes: 1024,
    };

    let result = handle_read_file(&obj(json!({ "path": "../../etc/passwd" })), &settings);
    assert!(result.is_err());
}
