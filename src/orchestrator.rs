use serde_json::Map;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::api::{ChatTransport, SessionConfig};
use crate::error::{LumoError, Result};
use crate::models::{Message, Part, TurnOutput};
use crate::tools::ToolRegistry;

// Matches the endpoint default the assistant was tuned against.
const TEMPERATURE: f32 = 1.0;

pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// Drives one user turn against the transport: send the message, run any
/// tools the model asks for, feed the results back, repeat until the model
/// stops asking.
pub struct Orchestrator {
    transport: Arc<dyn ChatTransport>,
    max_rounds: usize,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Cap on tool-result resubmission rounds within a single turn.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Run one conversation turn. `history` is read-only context; the turn's
    /// own state lives and dies inside this call. An empty `user_message` is
    /// forwarded as-is — validating it is the caller's job.
    pub async fn send_chat_message(
        &self,
        cancel: &CancellationToken,
        system_prompt: &str,
        history: &[Message],
        user_message: &str,
        tools: &ToolRegistry,
    ) -> Result<TurnOutput> {
        let config = SessionConfig {
            system_instruction: if system_prompt.is_empty() {
                None
            } else {
                Some(system_prompt.to_string())
            },
            temperature: TEMPERATURE,
            // An empty registry advertises nothing, which disables tool
            // calling for this turn.
            tools: tools.declarations(),
        };

        let mut session = self.transport.create_session(config, history).await?;
        let mut output = TurnOutput::default();

        if cancel.is_cancelled() {
            return Err(LumoError::Cancelled { partial: output });
        }

        // A failed initial send is fatal and not retried here: the turn is a
        // full logical exchange, and repeating it blindly is unsafe once
        // tools have side effects.
        let mut response = session.send(vec![Part::text(user_message)]).await?;

        let mut rounds = 0usize;

        loop {
            let parts = response.first_parts().to_vec();
            if parts.is_empty() {
                // Defined edge case: an empty response ends the turn with
                // whatever has been accumulated, not an error.
                info!("model response is empty");
                break;
            }

            if let Some(text) = parts[0].as_text() {
                output.answers.push(text.to_string());
                output.raw_parts.push(parts[0].clone());
            }

            let mut batch: Vec<Part> = Vec::new();

            for part in &parts {
                let (name, arguments) = match part {
                    Part::ToolCall { name, arguments } => (name, arguments),
                    _ => continue,
                };

                if tools.get(name).is_none() {
                    // Unresolvable calls must not abort the exchange; the
                    // call simply gets no result.
                    debug!(tool = %name, "model requested an unregistered tool, skipping");
                    continue;
                }

                let result = match tools.execute(cancel, name, arguments).await {
                    Ok(result) => result,
                    Err(e) => {
                        // The model reacts to the failure conversationally:
                        // it still receives a result part, just an empty one.
                        error!(tool = %name, error = %e, "tool execution failed");
                        Map::new()
                    }
                };

                batch.push(Part::ToolResult {
                    name: name.clone(),
                    result,
                });
            }

            if batch.is_empty() {
                break;
            }

            if cancel.is_cancelled() {
                return Err(LumoError::Cancelled { partial: output });
            }

            rounds += 1;
            if rounds > self.max_rounds {
                return Err(LumoError::RoundLimit {
                    rounds: self.max_rounds,
                    partial: output,
                });
            }

            debug!(round = rounds, results = batch.len(), "resubmitting tool results");

            response = match session.send(batch).await {
                Ok(res) => res,
                Err(e) => {
                    // Late-round failure keeps the progress already made.
                    error!(error = %e, "failed to send tool results");
                    return Err(LumoError::Interrupted {
                        partial: output,
                        source: Box::new(e),
                    });
                }
            };
        }

        Ok(output)
    }
}
