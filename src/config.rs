use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::api::DEFAULT_API_ENDPOINT;
use crate::cli::Args;
use crate::orchestrator::DEFAULT_MAX_ROUNDS;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub system_prompt: String,
    pub max_rounds: usize,
    pub request_timeout: u64,
    pub verbose: bool,
    pub tools_enabled: bool,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub base_dir: Option<String>,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    /// Built-in tool names to leave unregistered.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_dir: None,
            max_file_size_mb: default_max_file_size_mb(),
            disabled: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_file_size_mb() -> u64 {
    1
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiFileConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionFileConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub max_rounds: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct YamlConfig {
    #[serde(default)]
    pub api: ApiFileConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionFileConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    /// Precedence: CLI args > environment variables > YAML config > defaults.
    pub fn from_env_and_args(args: &Args) -> std::result::Result<Self, String> {
        let yaml_config = YamlConfig::load().unwrap_or_default();

        // The key stays env-only for security.
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| "GEMINI_API_KEY environment variable not set")?;

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env::var("LUMO_API_ENDPOINT").ok())
            .or(yaml_config.api.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env::var("LUMO_MODEL").ok())
            .or(yaml_config.model.name.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt = args
            .system_prompt
            .clone()
            .or_else(|| env::var("LUMO_SYSTEM_PROMPT").ok())
            .or(yaml_config.model.system_prompt.clone())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let max_rounds = args
            .max_rounds
            .or_else(|| {
                env::var("LUMO_MAX_ROUNDS")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
            })
            .or(yaml_config.session.max_rounds)
            .unwrap_or(DEFAULT_MAX_ROUNDS);

        let request_timeout = env::var("LUMO_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .or(yaml_config.api.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let verbose = args.verbose
            || env::var("LUMO_VERBOSE")
                .ok()
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(yaml_config.session.verbose)
                .unwrap_or(false);

        let tools_enabled = if args.no_tools {
            false
        } else {
            match env::var("LUMO_TOOLS_ENABLED").ok() {
                Some(v) => matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"),
                None => yaml_config.tools.enabled,
            }
        };

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            system_prompt,
            max_rounds,
            request_timeout,
            verbose,
            tools_enabled,
            tools: yaml_config.tools,
        })
    }
}

impl YamlConfig {
    pub fn load() -> Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

                let config: YamlConfig = serde_yaml::from_str(&contents).with_context(|| {
                    format!("Failed to parse YAML config file: {}", path.display())
                })?;

                return Ok(config);
            }
        }

        Ok(YamlConfig::default())
    }

    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Local override first, then the user's global config.
        paths.push(PathBuf::from(".lumo.yaml"));
        paths.push(PathBuf::from(".lumo.yml"));

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("lumo");
            paths.push(config_dir.join("lumo.yaml"));
            paths.push(config_dir.join("lumo.yml"));
        }

        paths
    }
}
