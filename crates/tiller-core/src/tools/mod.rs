//! Tools: registry, workspace file access and built-in tool implementations

pub mod command_guard;
pub mod implementations;
pub mod registry;
pub mod truncation;
pub mod workspace;

pub use implementations::register_all_tools;
pub use registry::{parse_params, Tool, ToolContext, ToolName, ToolRegistry, ToolResult};
pub use workspace::{FileError, Workspace};
