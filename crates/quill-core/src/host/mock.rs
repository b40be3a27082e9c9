//! Mock implementation of the host services for development and testing.
//!
//! Simulates the preview server, formatter, and HTTP client without
//! touching the network or spawning processes.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing;

use super::services::{HostRequest, HostServiceError, HostServices};

/// Mock host that answers every [`HostRequest`] in-memory.
#[derive(Debug, Default)]
pub struct MockHostServices {
    /// Ports with a simulated preview server running.
    running_ports: Mutex<HashSet<u16>>,
    /// Canned HTTP responses keyed by URL.
    http_responses: Mutex<HashMap<String, (u16, String)>>,
    /// Every request received, oldest first.
    requests: Mutex<Vec<HostRequest>>,
    /// When set, every request fails with this message.
    failure: Mutex<Option<String>>,
}

impl MockHostServices {
    /// Create a new mock host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned HTTP response for a URL (for testing).
    pub fn set_http_response(&self, url: &str, status: u16, body: &str) {
        let mut responses = self.http_responses.lock().unwrap_or_else(|e| e.into_inner());
        responses.insert(url.to_string(), (status, body.to_string()));
    }

    /// Make every subsequent request fail (for testing).
    pub fn fail_with(&self, message: Option<&str>) {
        let mut failure = self.failure.lock().unwrap_or_else(|e| e.into_inner());
        *failure = message.map(str::to_string);
    }

    /// Returns whether a simulated preview server is running on `port`.
    pub fn is_serving(&self, port: u16) -> bool {
        self.running_ports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&port)
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<HostRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn start_server(&self, root: &str, port: u16) -> Result<Value, HostServiceError> {
        let mut ports = self.running_ports.lock().unwrap_or_else(|e| e.into_inner());
        if !ports.insert(port) {
            return Err(HostServiceError::Failed(format!(
                "port {port} is already in use"
            )));
        }
        tracing::info!("[MockHost] Serving '{}' on port {}", root, port);
        Ok(json!({ "success": true, "port": port }))
    }

    fn stop_server(&self, port: u16) -> Result<Value, HostServiceError> {
        let mut ports = self.running_ports.lock().unwrap_or_else(|e| e.into_inner());
        if !ports.remove(&port) {
            return Err(HostServiceError::Failed(format!(
                "no preview server on port {port}"
            )));
        }
        tracing::info!("[MockHost] Stopped preview server on port {}", port);
        Ok(json!({ "success": true }))
    }

    fn format(source: &str, options: &Value) -> Value {
        let tab_width = options
            .get("tabWidth")
            .and_then(Value::as_u64)
            .unwrap_or(2) as usize;
        let indent = " ".repeat(tab_width);

        let mut formatted: String = source
            .lines()
            .map(|line| {
                let trimmed = line.trim_end();
                let leading_tabs = trimmed.len() - trimmed.trim_start_matches('\t').len();
                format!(
                    "{}{}",
                    indent.repeat(leading_tabs),
                    &trimmed[leading_tabs..]
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        if !formatted.is_empty() {
            formatted.push('\n');
        }
        json!({ "success": true, "formatted": formatted })
    }

    fn http(&self, method: &str, url: &str) -> Value {
        let responses = self.http_responses.lock().unwrap_or_else(|e| e.into_inner());
        let (status, body) = responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| (404, "Not Found".to_string()));
        tracing::debug!("[MockHost] {} {} -> {}", method, url, status);
        json!({ "success": true, "status": status, "body": body })
    }
}

#[async_trait]
impl HostServices for MockHostServices {
    async fn invoke(&self, request: HostRequest) -> Result<Value, HostServiceError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        if let Some(message) = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(HostServiceError::Failed(message));
        }

        match &request {
            HostRequest::StartPreviewServer { root, port } => self.start_server(root, *port),
            HostRequest::StopPreviewServer { port } => self.stop_server(*port),
            HostRequest::FormatSource {
                source, options, ..
            } => Ok(Self::format(source, options)),
            HostRequest::SendHttpRequest { method, url, .. } => Ok(self.http(method, url)),
        }
    }
}
