//! Opaque host services reachable from extensions.
//!
//! The runtime hands these through to extensions verbatim; it neither
//! wraps nor validates requests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A structured request to the host process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostRequest {
    /// Start a local preview server rooted at `root`.
    StartPreviewServer {
        /// Directory served by the preview server.
        root: String,
        /// Requested port.
        port: u16,
    },
    /// Stop the preview server listening on `port`.
    StopPreviewServer {
        /// Port of the running server.
        port: u16,
    },
    /// Format source text with an external formatter.
    FormatSource {
        /// Text to format.
        source: String,
        /// Language hint (e.g. `"javascript"`).
        language: String,
        /// Formatter options.
        #[serde(default)]
        options: Value,
    },
    /// Send an HTTP request on behalf of the extension.
    SendHttpRequest {
        /// HTTP method.
        method: String,
        /// Target URL.
        url: String,
        /// Request headers.
        #[serde(default)]
        headers: BTreeMap<String, String>,
        /// Optional request body.
        #[serde(default)]
        body: Option<String>,
        /// Give up after this many milliseconds.
        #[serde(default)]
        timeout_ms: Option<u64>,
        /// Whether redirects are followed.
        #[serde(default)]
        follow_redirects: bool,
    },
}

impl HostRequest {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartPreviewServer { .. } => "start_preview_server",
            Self::StopPreviewServer { .. } => "stop_preview_server",
            Self::FormatSource { .. } => "format_source",
            Self::SendHttpRequest { .. } => "send_http_request",
        }
    }
}

/// Failure reported by a host service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostServiceError {
    /// The host does not provide this service.
    #[error("host service '{0}' is not available")]
    Unavailable(String),
    /// The service rejected the request.
    #[error("{0}")]
    Failed(String),
}

/// Services implemented by the host process.
#[async_trait]
pub trait HostServices: Send + Sync {
    /// Invokes a host service and returns its structured result.
    async fn invoke(&self, request: HostRequest) -> Result<Value, HostServiceError>;
}

/// Host that provides no services at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHostServices;

#[async_trait]
impl HostServices for NoHostServices {
    async fn invoke(&self, request: HostRequest) -> Result<Value, HostServiceError> {
        Err(HostServiceError::Unavailable(request.name().to_string()))
    }
}
