//! MCP protocol implementation
//!
//! JSON-RPC message types live in `protocol`; `server` runs the stdio loop
//! and routes `tools/call` requests to the report tools.

pub mod protocol;
pub mod server;

pub use server::{tool_definitions, McpServer};
