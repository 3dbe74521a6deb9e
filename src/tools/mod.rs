pub mod builtins;
pub mod registry;

pub use builtins::{builtin_registry, ToolSettings};
pub use registry::{ToolHandler, ToolOutput, ToolRegistry, ToolSpec};
