use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use super::models::{
    content_from_message, format_tool_declarations, Content, GenerateRequest, GenerateResponse,
    GenerationConfig, WirePart,
};
use super::transport::{Candidate, ChatResponse, ChatSession, ChatTransport, SessionConfig};
use crate::error::{LumoError, Result};
use crate::models::{Message, Part};

pub const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const API_KEY_HEADER: &str = "x-goog-api-key";
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, endpoint: &str, model: &str, timeout_secs: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key)
                .map_err(|e| LumoError::ConfigError(format!("Invalid API key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl ChatTransport for GeminiClient {
    async fn create_session(
        &self,
        config: SessionConfig,
        history: &[Message],
    ) -> Result<Box<dyn ChatSession>> {
        let contents = history.iter().filter_map(content_from_message).collect();

        Ok(Box::new(GeminiSession {
            http: self.http.clone(),
            url: self.generate_url(),
            config,
            contents,
        }))
    }
}

/// One open exchange. Accumulates the wire history so every request carries
/// the whole conversation, including the model's own replies.
struct GeminiSession {
    http: reqwest::Client,
    url: String,
    config: SessionConfig,
    contents: Vec<Content>,
}

impl GeminiSession {
    fn build_request(&self) -> GenerateRequest {
        GenerateRequest {
            contents: self.contents.clone(),
            system_instruction: self.config.system_instruction.as_ref().map(|text| Content {
                role: Some("system".to_string()),
                parts: vec![WirePart {
                    text: Some(text.clone()),
                    ..Default::default()
                }],
            }),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
            tools: if self.config.tools.is_empty() {
                None
            } else {
                Some(format_tool_declarations(&self.config.tools))
            },
        }
    }
}

#[async_trait]
impl ChatSession for GeminiSession {
    async fn send(&mut self, parts: Vec<Part>) -> Result<ChatResponse> {
        self.contents.push(Content {
            role: Some("user".to_string()),
            parts: parts.iter().map(WirePart::from).collect(),
        });

        debug!(url = %self.url, contents = self.contents.len(), "chat request");

        let response = self
            .http
            .post(&self.url)
            .json(&self.build_request())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LumoError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let wire: GenerateResponse = response.json().await?;

        // The model's reply joins the session history before the caller
        // sees it, so a follow-up send stays coherent.
        if let Some(content) = wire.candidates.first().and_then(|c| c.content.clone()) {
            self.contents.push(content);
        }

        let candidates = wire
            .candidates
            .into_iter()
            .map(|c| Candidate {
                parts: c
                    .content
                    .map(|content| content.parts.iter().filter_map(WirePart::to_part).collect())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(ChatResponse { candidates })
    }
}
