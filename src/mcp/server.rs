//! MCP server implementation that handles JSON-RPC communication
//!
//! This module implements the actual MCP server that:
//! 1. Reads JSON-RPC requests from stdin
//! 2. Runs the matching report tool
//! 3. Sends JSON-RPC responses to stdout

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::domain::ReportPayload;
use crate::mcp::protocol::*;
use crate::tools::{self, ServiceError};
use crate::{LibraryReportsServer, ServerError};

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying reports server
    reports: LibraryReportsServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(reports: LibraryReportsServer) -> Self {
        Self {
            reports,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Whether the client has sent its `initialized` notification
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        match request.id.clone() {
            Some(id) => Some(self.handle_request(id, request).await),
            None => {
                self.handle_notification(&request);
                None
            }
        }
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    async fn handle_request(&mut self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => {
                if !self.initialized {
                    warn!("tools/call received before the client confirmed initialization");
                }
                self.handle_tools_call(id, request.params)
            }
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Library Reports MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        debug!("Calling tool '{}'", tool_params.name);

        let result = match tool_params.name.as_str() {
            "report_list" => self.call_report_list(tool_params.arguments),
            "report_create" => self.call_report_create(&tool_params.arguments),
            "report_get" => self.call_report_get(tool_params.arguments),
            "report_update" => self.call_report_update(tool_params.arguments),
            "report_delete" => self.call_report_delete(tool_params.arguments),
            "report_dashboard" => self.call_report_dashboard(),
            "report_chart" => self.call_report_chart(tool_params.arguments),
            _ => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Unknown tool: {}", tool_params.name),
                    None,
                );
            }
        };

        match result {
            Ok(result) => respond(id, &result),
            Err(ServiceError::InvalidParams(e)) => JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid parameters: {}", e),
                None,
            ),
            Err(e) => {
                warn!("Tool '{}' failed: {}", tool_params.name, e);
                respond(id, &ToolCallResult::from_service_error(&e))
            }
        }
    }

    fn current_year(&self) -> i32 {
        self.reports.clock().current_year()
    }

    fn call_report_list(&self, args: Map<String, Value>) -> Result<ToolCallResult, ServiceError> {
        let params: tools::ListReportsParams = parse_arguments(args)?;
        let view = tools::list_reports(self.reports.storage(), params, self.current_year())?;
        json_result(&view)
    }

    fn call_report_create(&self, args: &Map<String, Value>) -> Result<ToolCallResult, ServiceError> {
        let report = tools::create_report(self.reports.storage(), args)?;
        json_result(&tools::ReportDetail::from(report))
    }

    fn call_report_get(&self, args: Map<String, Value>) -> Result<ToolCallResult, ServiceError> {
        let params: tools::ReportIdParams = parse_arguments(args)?;
        let detail = tools::get_report(self.reports.storage(), &params.report_id)?;
        json_result(&detail)
    }

    fn call_report_update(&self, args: Map<String, Value>) -> Result<ToolCallResult, ServiceError> {
        let params: tools::ReportIdParams = parse_arguments(args.clone())?;
        let report = tools::update_report(self.reports.storage(), &params.report_id, &args)?;
        json_result(&tools::ReportDetail::from(report))
    }

    fn call_report_delete(&self, args: Map<String, Value>) -> Result<ToolCallResult, ServiceError> {
        let params: tools::ReportIdParams = parse_arguments(args)?;
        let response = tools::delete_report(self.reports.storage(), &params.report_id)?;
        json_result(&response)
    }

    fn call_report_dashboard(&self) -> Result<ToolCallResult, ServiceError> {
        let view = tools::dashboard(self.reports.storage(), self.current_year())?;
        json_result(&view)
    }

    fn call_report_chart(&self, args: Map<String, Value>) -> Result<ToolCallResult, ServiceError> {
        let params: tools::ChartParams = parse_arguments(args)?;
        match tools::render_chart(self.reports.storage(), params, self.current_year())? {
            tools::ChartOutput::Svg(svg) => Ok(ToolCallResult::text(svg)),
            tools::ChartOutput::Drawing(drawing) => json_result(&drawing),
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, ServiceError> {
    Ok(serde_json::from_value(Value::Object(args))?)
}

fn json_result<T: Serialize>(value: &T) -> Result<ToolCallResult, ServiceError> {
    Ok(ToolCallResult::json(serde_json::to_value(value)?))
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
            None,
        ),
    }
}

fn schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({ "type": "object" }))
}

/// Every tool this server offers, with generated input schemas
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "report_list".to_string(),
            description: "List the monthly reports of one year with year totals, chart rows and the years that have data".to_string(),
            input_schema: schema::<tools::ListReportsParams>(),
        },
        ToolDefinition {
            name: "report_create".to_string(),
            description: "Record a new monthly library report; only one report per month and year".to_string(),
            input_schema: schema::<ReportPayload>(),
        },
        ToolDefinition {
            name: "report_get".to_string(),
            description: "Show one report with its period and activity breakdown".to_string(),
            input_schema: schema::<tools::ReportIdParams>(),
        },
        ToolDefinition {
            name: "report_update".to_string(),
            description: "Replace every field of an existing report".to_string(),
            input_schema: schema::<tools::UpdateReportParams>(),
        },
        ToolDefinition {
            name: "report_delete".to_string(),
            description: "Permanently delete a report".to_string(),
            input_schema: schema::<tools::ReportIdParams>(),
        },
        ToolDefinition {
            name: "report_dashboard".to_string(),
            description: "Recent reports plus the current year's totals, averages and trends".to_string(),
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "report_chart".to_string(),
            description: "Render a year's trend chart as SVG or as a JSON drawing".to_string(),
            input_schema: schema::<tools::ChartParams>(),
        },
    ]
}
