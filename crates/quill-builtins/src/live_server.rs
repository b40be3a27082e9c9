//! Live Server: starts and stops a local preview server for the open folder.

use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{info, warn};

use quill_core::host::HostRequest;
use quill_extension::prelude::*;

use crate::host_call::call_host;

pub const EXTENSION_ID: &str = "live-server";
pub const STATUS_ITEM_ID: &str = "live-server-btn";

pub const CMD_START: &str = "live-server.start";
pub const CMD_STOP: &str = "live-server.stop";
pub const CMD_TOGGLE: &str = "live-server.toggle";

pub const SETTING_PORT: &str = "live-server.port";
pub const SETTING_OPEN_BROWSER: &str = "live-server.openBrowser";

pub const README: &str = "\
# Live Server

Launch a local development server with live reload for the open folder.

- Click **Go Live** in the status bar, or run `live-server.toggle`.
- The port is taken from `live-server.port` (default 5500).
- While running, the status bar shows the port; click it again to stop.
";

/// Port of the server started by the current activation, if any.
///
/// The lock is held across host calls so overlapping start/stop requests
/// are serialized.
#[derive(Debug, Default)]
struct ServerState {
    port: Mutex<Option<u16>>,
}

/// The live-server extension.
#[derive(Debug, Default)]
pub struct LiveServerExtension;

impl LiveServerExtension {
    /// Creates the extension.
    pub fn new() -> Self {
        Self
    }

    /// Manifest.
    pub fn manifest() -> ExtensionManifest {
        ExtensionManifest::new(EXTENSION_ID, "Live Server", "1.0.0")
            .with_description("Launch a local development server with live reload")
            .with_author("Quill")
            .with_icon("radio")
            .with_readme(README)
    }

    /// Declared settings.
    pub fn settings() -> Vec<SettingDescriptor> {
        vec![
            SettingDescriptor::number(SETTING_PORT, "Port", 5500)
                .with_description("Port the preview server listens on")
                .in_section("Live Server"),
            SettingDescriptor::toggle(SETTING_OPEN_BROWSER, "Open Browser", true)
                .with_description("Open the preview in a browser after starting")
                .in_section("Live Server"),
        ]
    }
}

/// Registration bundle.
pub fn module() -> ExtensionModule {
    ExtensionModule::new(LiveServerExtension::manifest(), Arc::new(LiveServerExtension::new()))
        .with_settings(LiveServerExtension::settings())
}

#[async_trait]
impl Extension for LiveServerExtension {
    async fn activate(&self, ctx: ExtensionContext) -> anyhow::Result<()> {
        show_stopped(&ctx).await?;

        let start_ctx = ctx.clone();
        ctx.register_command(CMD_START, move |_| {
            let ctx = start_ctx.clone();
            async move { start(&ctx).await }
        })?;

        let stop_ctx = ctx.clone();
        ctx.register_command(CMD_STOP, move |_| {
            let ctx = stop_ctx.clone();
            async move { stop(&ctx).await }
        })?;

        let toggle_ctx = ctx.clone();
        ctx.register_command(CMD_TOGGLE, move |_| {
            let ctx = toggle_ctx.clone();
            async move {
                let running = ctx.state::<ServerState>().port.lock().await.is_some();
                if running { stop(&ctx).await } else { start(&ctx).await }
            }
        })?;

        Ok(())
    }

    async fn deactivate(&self, ctx: ExtensionContext) -> anyhow::Result<()> {
        let state = ctx.state::<ServerState>();
        let mut port = state.port.lock().await;
        if let Some(running) = port.take() {
            call_host(&ctx, HostRequest::StopPreviewServer { port: running })
                .await
                .with_context(|| format!("stopping preview server on port {running}"))?;
            info!(port = running, "Live server stopped on deactivation");
        }
        Ok(())
    }
}

async fn start(ctx: &ExtensionContext) -> anyhow::Result<Value> {
    let state = ctx.state::<ServerState>();
    let mut running = state.port.lock().await;

    if let Some(port) = *running {
        ctx.window()
            .show_information_message(&format!("Live Server is already running on port {port}"));
        return Ok(json!({ "port": port }));
    }

    let Some(root) = ctx.get_workspace_root() else {
        ctx.window()
            .show_warning_message("Open a folder first to start Live Server");
        bail!("no workspace folder is open");
    };

    let settings = ctx.get_settings().await;
    let requested = settings.unsigned(SETTING_PORT).unwrap_or(5500);
    let requested = u16::try_from(requested)
        .with_context(|| format!("port {requested} is out of range"))?;

    let reply = call_host(
        ctx,
        HostRequest::StartPreviewServer {
            root: root.display().to_string(),
            port: requested,
        },
    )
    .await?;
    let port = reply
        .get("port")
        .and_then(Value::as_u64)
        .and_then(|p| u16::try_from(p).ok())
        .unwrap_or(requested);

    *running = Some(port);
    drop(running);

    ctx.window()
        .create_status_bar_item(
            StatusBarItemOptions::new(STATUS_ITEM_ID, format!("Port: {port}"))
                .with_command(CMD_TOGGLE)
                .with_tooltip("Click to stop Live Server")
                .with_color("#4ec9b0")
                .aligned(StatusBarAlignment::Right, 100),
        )
        .await?;

    let url = format!("http://localhost:{port}");
    if settings.toggle(SETTING_OPEN_BROWSER).unwrap_or(true) {
        ctx.window()
            .show_information_message(&format!("Live Server started at {url}"));
    } else {
        ctx.window()
            .show_information_message(&format!("Live Server started on port {port}"));
    }
    info!(port, root = %root.display(), "Live server started");

    Ok(json!({ "port": port, "url": url }))
}

async fn stop(ctx: &ExtensionContext) -> anyhow::Result<Value> {
    let state = ctx.state::<ServerState>();
    let mut running = state.port.lock().await;

    let Some(port) = *running else {
        ctx.window().show_information_message("Live Server is not running");
        return Ok(Value::Null);
    };

    if let Err(e) = call_host(ctx, HostRequest::StopPreviewServer { port }).await {
        warn!(port, error = %e, "Failed to stop preview server");
        return Err(e);
    }
    *running = None;
    drop(running);

    show_stopped(ctx).await?;
    ctx.window().show_information_message("Live Server stopped");
    info!(port, "Live server stopped");

    Ok(json!({ "port": port }))
}

async fn show_stopped(ctx: &ExtensionContext) -> anyhow::Result<()> {
    ctx.window()
        .create_status_bar_item(
            StatusBarItemOptions::new(STATUS_ITEM_ID, "Go Live")
                .with_command(CMD_TOGGLE)
                .with_tooltip("Click to start Live Server")
                .aligned(StatusBarAlignment::Right, 100),
        )
        .await?;
    Ok(())
}
