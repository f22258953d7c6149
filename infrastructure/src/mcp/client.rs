//! MCP client over the streamable HTTP transport.
//!
//! Every JSON-RPC message is POSTed to a single endpoint. The session is
//! opened lazily on first use: `initialize`, then `notifications/initialized`.
//! The `Mcp-Session-Id` returned by the server is echoed on every later
//! request; a 404 on a session request means the server dropped it, and the
//! client re-initializes once before giving up.

use super::error::{McpError, Result};
use super::protocol::{
    CallToolResult, InitializeResult, JsonRpcNotification, JsonRpcRequest, ListToolsResult,
    decode_response, initialize_params,
};
use async_trait::async_trait;
use mcp_agent_application::{ToolServer, ToolServerError};
use mcp_agent_domain::ToolDescriptor;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

const SESSION_HEADER: &str = "Mcp-Session-Id";
const ACCEPT_BOTH: &str = "application/json, text/event-stream";

/// Upper bound on `tools/list` pages, against servers that loop on a cursor
const MAX_LIST_PAGES: usize = 100;

#[derive(Debug, Clone, Default)]
struct Session {
    id: Option<String>,
}

pub struct McpClient {
    client: Client,
    url: String,
    timeout: Duration,
    session: Mutex<Option<Session>>,
}

impl McpClient {
    /// # Arguments
    /// * `url` - MCP endpoint (e.g., "http://alfresco-mcp:8003/mcp").
    /// * `timeout` - Bound on each HTTP exchange.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
            session: Mutex::new(None),
        }
    }

    /// Return the open session, performing the handshake if needed.
    async fn ensure_session(&self) -> Result<Session> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        let session = self.initialize().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    async fn reset_session(&self) {
        *self.session.lock().await = None;
    }

    async fn initialize(&self) -> Result<Session> {
        let request = JsonRpcRequest::new("initialize", Some(initialize_params()));
        let mut session = Session::default();
        let (result, session_id) = self.post_request(&session, &request).await?;
        session.id = session_id;

        let init: InitializeResult = serde_json::from_value(result)?;
        info!(
            url = %self.url,
            protocol_version = %init.protocol_version,
            server = init.server_info.as_ref().map(|s| s.name.as_str()).unwrap_or("unknown"),
            session = session.id.is_some(),
            "MCP session initialized"
        );

        self.notify(&session, "notifications/initialized").await?;
        Ok(session)
    }

    /// Send a request on the current session, re-initializing once if the
    /// server reports the session as gone.
    async fn request(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let session = self.ensure_session().await?;
        let request = JsonRpcRequest::new(method, Some(params.clone()));
        match self.post_request(&session, &request).await {
            Err(McpError::SessionExpired) => {
                debug!(url = %self.url, "MCP session expired, re-initializing");
                self.reset_session().await;
                let session = self.ensure_session().await?;
                let request = JsonRpcRequest::new(method, Some(params));
                self.post_request(&session, &request).await.map(|(r, _)| r)
            }
            other => other.map(|(r, _)| r),
        }
    }

    fn post(&self, session: &Session) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(&self.url)
            .header(ACCEPT, ACCEPT_BOTH)
            .timeout(self.timeout);
        if let Some(id) = &session.id {
            builder = builder.header(SESSION_HEADER, id);
        }
        builder
    }

    /// POST one request; returns the result and any session id the server assigned.
    async fn post_request(
        &self,
        session: &Session,
        request: &JsonRpcRequest,
    ) -> Result<(serde_json::Value, Option<String>)> {
        debug!(method = %request.method, id = request.id, "Sending MCP request");

        let response = self.post(session).json(request).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND && session.id.is_some() {
            return Err(McpError::SessionExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_ascii_lowercase();
        let body = response.text().await?;

        let result = decode_response(&content_type, &body, request.id)?.into_result()?;
        Ok((result, session_id))
    }

    async fn notify(&self, session: &Session, method: &str) -> Result<()> {
        let response = self
            .post(session)
            .json(&JsonRpcNotification::new(method))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McpError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Fetch every page of `tools/list`.
    pub async fn list_all_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let params = match &cursor {
                Some(cursor) => serde_json::json!({ "cursor": cursor }),
                None => serde_json::json!({}),
            };
            let page: ListToolsResult =
                serde_json::from_value(self.request("tools/list", params).await?)?;
            for tool in page.tools {
                tools.push(ToolDescriptor::try_from(tool)?);
            }

            match page.next_cursor.filter(|c| !c.is_empty()) {
                Some(next) => cursor = Some(next),
                None => return Ok(tools),
            }
        }

        Err(McpError::UnexpectedResponse(format!(
            "tools/list did not finish within {} pages",
            MAX_LIST_PAGES
        )))
    }

    /// Invoke `tools/call` and return the tool's text output.
    pub async fn call(
        &self,
        name: &str,
        arguments: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<String> {
        let params = serde_json::json!({ "name": name, "arguments": arguments });
        let result: CallToolResult =
            serde_json::from_value(self.request("tools/call", params).await?)?;
        result.into_output()
    }
}

#[async_trait]
impl ToolServer for McpClient {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn list_tools(&self) -> std::result::Result<Vec<ToolDescriptor>, ToolServerError> {
        Ok(self.list_all_tools().await?)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<String, ToolServerError> {
        Ok(self.call(name, arguments).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Test Server ====================

    /// Streamable-HTTP MCP server with scripted replies. Records the method
    /// and session header of every message it receives.
    #[derive(Default)]
    struct FakeMcpServer {
        sessions: AtomicUsize,
        /// Number of upcoming session requests to answer with 404
        expire: AtomicUsize,
        seen: std::sync::Mutex<Vec<(String, Option<String>)>>,
    }

    impl FakeMcpServer {
        fn seen(&self) -> Vec<(String, Option<String>)> {
            self.seen.lock().unwrap().clone()
        }

        fn count(&self, method: &str) -> usize {
            self.seen().iter().filter(|(m, _)| m == method).count()
        }
    }

    fn reply(id: &Value, result: Value) -> Value {
        json!({ "jsonrpc": "2.0", "id": id, "result": result })
    }

    async fn handle(
        State(server): State<Arc<FakeMcpServer>>,
        headers: HeaderMap,
        axum::Json(message): axum::Json<Value>,
    ) -> Response {
        let method = message["method"].as_str().unwrap_or_default().to_string();
        let session = headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        server.seen.lock().unwrap().push((method.clone(), session));

        let id = &message["id"];
        if id.is_null() {
            return StatusCode::ACCEPTED.into_response();
        }

        if method == "initialize" {
            let n = server.sessions.fetch_add(1, Ordering::SeqCst) + 1;
            let body = reply(
                id,
                json!({
                    "protocolVersion": "2025-03-26",
                    "capabilities": { "tools": {} },
                    "serverInfo": { "name": "alfresco-mcp", "version": "1.0" }
                }),
            );
            return (
                [(SESSION_HEADER, format!("session-{}", n))],
                axum::Json(body),
            )
                .into_response();
        }

        if server
            .expire
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return StatusCode::NOT_FOUND.into_response();
        }

        match method.as_str() {
            "tools/list" if message["params"]["cursor"].is_null() => axum::Json(reply(
                id,
                json!({
                    "tools": [{
                        "name": "get_markdown_content",
                        "description": "Fetch Markdown for a node",
                        "inputSchema": {
                            "type": "object",
                            "properties": { "node_id": { "type": "string" } },
                            "required": ["node_id"]
                        }
                    }],
                    "nextCursor": "page-2"
                }),
            ))
            .into_response(),
            "tools/list" => {
                // Second page arrives as an SSE stream
                let body = reply(
                    id,
                    json!({ "tools": [{ "name": "list_nodes", "description": "List nodes" }] }),
                );
                (
                    [(header::CONTENT_TYPE, "text/event-stream")],
                    format!("event: message\ndata: {}\n\n", body),
                )
                    .into_response()
            }
            "tools/call" => {
                let node = message["params"]["arguments"]["node_id"]
                    .as_str()
                    .unwrap_or_default();
                axum::Json(reply(
                    id,
                    json!({ "content": [{ "type": "text", "text": format!("# {}", node) }] }),
                ))
                .into_response()
            }
            _ => StatusCode::BAD_REQUEST.into_response(),
        }
    }

    async fn start_server() -> (Arc<FakeMcpServer>, McpClient) {
        let server = Arc::new(FakeMcpServer::default());
        let app = Router::new()
            .route("/mcp", post(handle))
            .with_state(server.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = McpClient::new(format!("http://{}/mcp", address), Duration::from_secs(5));
        (server, client)
    }

    fn node_args(node: &str) -> serde_json::Map<String, Value> {
        let mut args = serde_json::Map::new();
        args.insert("node_id".to_string(), json!(node));
        args
    }

    // ==================== Tests ====================

    #[test]
    fn test_endpoint() {
        let client = McpClient::new("http://alfresco-mcp:8003/mcp", Duration::from_secs(5));
        assert_eq!(client.endpoint(), "http://alfresco-mcp:8003/mcp");
    }

    #[tokio::test]
    async fn test_handshake_then_session_header_is_echoed() {
        let (server, client) = start_server().await;

        assert_eq!(client.call("get_markdown_content", &node_args("X")).await.unwrap(), "# X");
        assert_eq!(client.call("get_markdown_content", &node_args("Y")).await.unwrap(), "# Y");

        let session = Some("session-1".to_string());
        assert_eq!(
            server.seen(),
            vec![
                ("initialize".to_string(), None),
                ("notifications/initialized".to_string(), session.clone()),
                ("tools/call".to_string(), session.clone()),
                ("tools/call".to_string(), session),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_tools_follows_cursor() {
        let (server, client) = start_server().await;

        let tools = client.list_tools().await.unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["get_markdown_content", "list_nodes"]);
        assert_eq!(server.count("tools/list"), 2);
        assert_eq!(server.count("initialize"), 1);
    }

    #[tokio::test]
    async fn test_expired_session_reinitializes_once() {
        let (server, client) = start_server().await;
        client.call("get_markdown_content", &node_args("X")).await.unwrap();

        server.expire.store(1, Ordering::SeqCst);
        assert_eq!(client.call("get_markdown_content", &node_args("Y")).await.unwrap(), "# Y");

        let seen = server.seen();
        assert_eq!(server.count("initialize"), 2);
        assert_eq!(
            seen.last().unwrap(),
            &("tools/call".to_string(), Some("session-2".to_string()))
        );
        assert_eq!(server.count("tools/call"), 3);
    }

    #[tokio::test]
    async fn test_second_expiry_is_reported() {
        let (server, client) = start_server().await;
        client.call("get_markdown_content", &node_args("X")).await.unwrap();

        server.expire.store(2, Ordering::SeqCst);
        let err = client
            .call("get_markdown_content", &node_args("Y"))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::SessionExpired));
        assert_eq!(server.count("initialize"), 2);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = McpClient::new("http://127.0.0.1:9/mcp", Duration::from_secs(2));
        let err = client.list_tools().await.unwrap_err();
        assert!(matches!(
            err,
            ToolServerError::Transport(_) | ToolServerError::Timeout
        ));
        // Failed handshakes leave no session behind
        assert!(client.session.lock().await.is_none());
    }
}
