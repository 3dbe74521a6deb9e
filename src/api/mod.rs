pub mod client;
pub mod models;
pub mod transport;

pub use client::{GeminiClient, DEFAULT_API_ENDPOINT};
pub use transport::{Candidate, ChatResponse, ChatSession, ChatTransport, SessionConfig, ToolDeclaration};
