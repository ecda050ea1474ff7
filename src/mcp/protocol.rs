//! MCP (Model Context Protocol) message structures and JSON-RPC handling
//!
//! This module defines the JSON-RPC message format that MCP clients use to
//! talk to the library reports server, plus the mapping from service errors
//! to the error codes and payloads clients see.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::storage::StorageError;
use crate::tools::ServiceError;

/// MCP protocol version we support
pub const MCP_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request message
///
/// A request without an `id` is a notification and gets no response.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    #[allow(dead_code)]
    pub jsonrpc: String,
    /// Request identifier; absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// The method to call (e.g., "tools/call")
    pub method: String,
    /// Parameters for the method call
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID that we're responding to
    pub id: Value,
    /// Successful result (if no error occurred)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information (if something went wrong)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error information
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// Error code (standard JSON-RPC codes)
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// MCP tool call parameters
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call (e.g., "report_create")
    pub name: String,
    /// Arguments to pass to the tool
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// MCP tool call result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Tool execution results
    pub content: Vec<ToolContent>,
    /// Whether this is an error result
    pub is_error: bool,
    /// Machine-readable copy of the result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

/// Content returned by a tool
#[derive(Debug, Serialize)]
pub struct ToolContent {
    /// Type of content (always "text")
    #[serde(rename = "type")]
    pub content_type: String,
    /// The actual content/result
    pub text: String,
}

/// MCP tool definition
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name (e.g., "report_create")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

/// MCP server capabilities
#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    /// Tools that this server provides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Tools capability information
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the tool list can change at runtime
    pub list_changed: bool,
}

/// MCP initialization response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// MCP protocol version we support
    pub protocol_version: String,
    /// Our server capabilities
    pub capabilities: ServerCapabilities,
    /// Information about our server
    pub server_info: ServerInfo,
}

/// Information about the library reports server
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

// JSON-RPC error codes
pub mod error_codes {
    /// Parse error - Invalid JSON was received by the server
    pub const PARSE_ERROR: i32 = -32700;
    /// Method not found - The requested method doesn't exist
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid parameters - Method exists but parameters are wrong
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error - Internal JSON-RPC error
    pub const INTERNAL_ERROR: i32 = -32603;

    // Application-specific error codes, in the -32000 to -32099 range
    /// The specified report ID doesn't exist
    pub const REPORT_NOT_FOUND: i32 = -32001;
    /// Another report already covers this month and year
    pub const DUPLICATE_PERIOD: i32 = -32002;
    /// Input validation failed
    pub const VALIDATION_ERROR: i32 = -32003;
    /// Database or storage operation failed
    pub const STORAGE_ERROR: i32 = -32004;
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
        }
    }
}

impl ToolCallResult {
    /// A successful result rendered as pretty JSON text plus structured content
    pub fn json(value: Value) -> Self {
        let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
            structured_content: Some(value),
        }
    }

    /// A successful result that is plain text only
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
            structured_content: None,
        }
    }

    /// An error result with the `{code, message, errors}` body
    pub fn error(code: i32, message: String, errors: Value) -> Self {
        Self {
            content: vec![ToolContent::text(format!("Error: {}", message))],
            is_error: true,
            structured_content: Some(json!({
                "code": code,
                "message": message,
                "errors": errors,
            })),
        }
    }

    /// Error result for a failed tool call
    pub fn from_service_error(error: &ServiceError) -> Self {
        let errors = match error {
            ServiceError::Validation(validation) => json!(validation.errors),
            _ => json!({}),
        };
        Self::error(service_error_code(error), error.to_string(), errors)
    }
}

impl ToolContent {
    fn text(text: String) -> Self {
        Self {
            content_type: "text".to_string(),
            text,
        }
    }
}

/// Map storage errors to the application error codes
pub fn storage_error_code(error: &StorageError) -> i32 {
    match error {
        StorageError::ReportNotFound { .. } => error_codes::REPORT_NOT_FOUND,
        StorageError::DuplicatePeriod { .. } => error_codes::DUPLICATE_PERIOD,
        StorageError::Query(_) => error_codes::STORAGE_ERROR,
        StorageError::Connection(_) => error_codes::STORAGE_ERROR,
        StorageError::Migration(_) => error_codes::STORAGE_ERROR,
    }
}

/// Map any tool failure to the code clients see
pub fn service_error_code(error: &ServiceError) -> i32 {
    match error {
        ServiceError::Validation(_) => error_codes::VALIDATION_ERROR,
        ServiceError::Storage(storage) => storage_error_code(storage),
        ServiceError::Chart(_) => error_codes::INTERNAL_ERROR,
        ServiceError::InvalidParams(_) => error_codes::INVALID_PARAMS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;

    #[test]
    fn test_notification_has_no_id() {
        let request: JsonRpcRequest = serde_json::from_str(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        )
        .unwrap();
        assert!(request.id.is_none());
        assert!(request.params.is_none());
    }

    #[test]
    fn test_tool_result_uses_camel_case() {
        let value = serde_json::to_value(ToolCallResult::json(json!({"year": 2024}))).unwrap();

        assert_eq!(value["isError"], false);
        assert_eq!(value["structuredContent"]["year"], 2024);
        assert_eq!(value["content"][0]["type"], "text");
        assert!(value.get("is_error").is_none());
    }

    #[test]
    fn test_validation_error_result() {
        let error = ServiceError::Validation(ValidationError::single(
            "month",
            "Please select a reporting month.",
        ));
        let value = serde_json::to_value(ToolCallResult::from_service_error(&error)).unwrap();

        assert_eq!(value["isError"], true);
        assert_eq!(value["structuredContent"]["code"], error_codes::VALIDATION_ERROR);
        assert_eq!(
            value["structuredContent"]["errors"]["month"],
            "Please select a reporting month."
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            service_error_code(&ServiceError::Storage(StorageError::not_found("abc"))),
            error_codes::REPORT_NOT_FOUND
        );
        assert_eq!(
            service_error_code(&ServiceError::Storage(StorageError::duplicate_period(2024, 3))),
            error_codes::DUPLICATE_PERIOD
        );
        assert_eq!(
            storage_error_code(&StorageError::Migration("boom".to_string())),
            error_codes::STORAGE_ERROR
        );
    }
}
