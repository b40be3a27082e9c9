//! REST Client: sends HTTP requests through the host and keeps a history.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use quill_core::host::HostRequest;
use quill_extension::prelude::*;

use crate::host_call::call_host;

pub const EXTENSION_ID: &str = "rest-client";
pub const PANEL_ID: &str = "rest-client-panel";

pub const CMD_SEND_REQUEST: &str = "rest.sendRequest";
pub const CMD_HISTORY: &str = "rest.history";
pub const CMD_CLEAR_HISTORY: &str = "rest.clearHistory";

pub const SETTING_DEFAULT_METHOD: &str = "rest.defaultMethod";
pub const SETTING_TIMEOUT_MS: &str = "rest.timeoutMs";
pub const SETTING_FOLLOW_REDIRECTS: &str = "rest.followRedirects";

pub const METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Entries kept per activation.
const HISTORY_LIMIT: usize = 50;

pub const README: &str = "\
# REST Client

Send HTTP requests and inspect responses without leaving the editor.

`rest.sendRequest` takes either a URL or an object with `url`, and
optionally `method`, `headers`, and `body`. The method defaults to
`rest.defaultMethod`. Recent requests are listed by `rest.history`.
";

/// Request accepted by `rest.sendRequest`.
#[derive(Debug, Clone, Deserialize)]
struct RequestSpec {
    url: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    body: Option<String>,
}

/// One completed request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub method: String,
    pub url: String,
    pub status: Option<u64>,
    pub duration_ms: u64,
    pub sent_at: DateTime<Utc>,
}

/// Request history of the current activation, newest first.
#[derive(Debug, Default)]
struct History {
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl History {
    fn record(&self, entry: HistoryEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push_front(entry);
        entries.truncate(HISTORY_LIMIT);
    }

    fn snapshot(&self) -> Vec<HistoryEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().cloned().collect()
    }

    fn clear(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let count = entries.len();
        entries.clear();
        count
    }
}

/// The HTTP client extension.
#[derive(Debug, Default)]
pub struct RestClientExtension;

impl RestClientExtension {
    /// Creates the extension.
    pub fn new() -> Self {
        Self
    }

    /// Manifest.
    pub fn manifest() -> ExtensionManifest {
        ExtensionManifest::new(EXTENSION_ID, "REST Client", "1.0.0")
            .with_description("Send HTTP requests and view responses")
            .with_author("Quill")
            .with_icon("send")
            .with_readme(README)
    }

    /// Declared settings.
    pub fn settings() -> Vec<SettingDescriptor> {
        vec![
            SettingDescriptor::select(SETTING_DEFAULT_METHOD, "Default Method", &METHODS, "GET")
                .with_description("Method used when a request does not name one")
                .in_section("REST Client"),
            SettingDescriptor::number(SETTING_TIMEOUT_MS, "Timeout (ms)", 30000)
                .with_description("Give up on a request after this long")
                .in_section("REST Client"),
            SettingDescriptor::toggle(SETTING_FOLLOW_REDIRECTS, "Follow Redirects", true)
                .in_section("REST Client"),
        ]
    }
}

/// Registration bundle.
pub fn module() -> ExtensionModule {
    ExtensionModule::new(RestClientExtension::manifest(), Arc::new(RestClientExtension::new()))
        .with_settings(RestClientExtension::settings())
}

#[async_trait]
impl Extension for RestClientExtension {
    async fn activate(&self, ctx: ExtensionContext) -> anyhow::Result<()> {
        let send_ctx = ctx.clone();
        ctx.register_command(CMD_SEND_REQUEST, move |args| {
            let ctx = send_ctx.clone();
            async move { send_request(&ctx, args).await }
        })?;

        let history = ctx.state::<History>();
        ctx.register_command(CMD_HISTORY, move |_| {
            let history = history.clone();
            async move { Ok(serde_json::to_value(history.snapshot())?) }
        })?;

        let history = ctx.state::<History>();
        ctx.register_command(CMD_CLEAR_HISTORY, move |_| {
            let history = history.clone();
            async move { Ok(json!(history.clear())) }
        })?;

        ctx.register_sidebar_panel(
            PANEL_ID,
            PanelOptions::new("send", "REST Client"),
            Arc::new(|| {
                json!({
                    "view": "rest-client",
                    "methods": METHODS,
                    "send": CMD_SEND_REQUEST,
                    "history": CMD_HISTORY,
                })
            }),
        )
        .await?;

        Ok(())
    }
}

fn parse_request(args: Vec<Value>) -> anyhow::Result<RequestSpec> {
    match args.into_iter().next() {
        Some(Value::String(url)) => Ok(RequestSpec {
            url,
            method: None,
            headers: BTreeMap::new(),
            body: None,
        }),
        Some(value @ Value::Object(_)) => {
            serde_json::from_value(value).context("invalid request description")
        }
        _ => bail!("expected a URL or a request object as the first argument"),
    }
}

/// `rest.sendRequest(url | {method?, url, headers?, body?})`.
async fn send_request(ctx: &ExtensionContext, args: Vec<Value>) -> anyhow::Result<Value> {
    let spec = parse_request(args)?;
    if !(spec.url.starts_with("http://") || spec.url.starts_with("https://")) {
        bail!("URL must start with http:// or https://, got '{}'", spec.url);
    }

    let settings = ctx.get_settings().await;
    let method = match spec.method {
        Some(method) => method.to_uppercase(),
        None => settings
            .select(SETTING_DEFAULT_METHOD)
            .unwrap_or("GET")
            .to_string(),
    };
    if !METHODS.contains(&method.as_str()) {
        bail!("unsupported method '{method}'");
    }

    let started = Instant::now();
    let reply = call_host(
        ctx,
        HostRequest::SendHttpRequest {
            method: method.clone(),
            url: spec.url.clone(),
            headers: spec.headers,
            body: spec.body,
            timeout_ms: settings.unsigned(SETTING_TIMEOUT_MS),
            follow_redirects: settings.toggle(SETTING_FOLLOW_REDIRECTS).unwrap_or(true),
        },
    )
    .await?;
    let duration_ms = started.elapsed().as_millis() as u64;

    let status = reply.get("status").and_then(Value::as_u64);
    info!(method = %method, url = %spec.url, status, duration_ms, "Request completed");

    ctx.state::<History>().record(HistoryEntry {
        method,
        url: spec.url,
        status,
        duration_ms,
        sent_at: Utc::now(),
    });

    Ok(json!({
        "status": status,
        "body": reply.get("body").cloned().unwrap_or(Value::Null),
        "durationMs": duration_ms,
    }))
}
