//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};

use quill_core::config::AppConfig;
use quill_core::host::{MemorySettings, MockHostServices, RecordingNotifier};
use quill_extension::context::ExtensionContext;
use quill_extension::contributions::StatusBarItemOptions;
use quill_extension::traits::FnExtension;
use quill_extension::{Extension, ExtensionManifest, LifecycleManager};
use quill_host::HostRuntime;

/// An isolated runtime with recording collaborators
pub struct TestHost {
    /// The wired runtime
    pub runtime: HostRuntime,
    /// Every notification shown to the user
    pub notifier: Arc<RecordingNotifier>,
    /// Simulated host services
    pub services: Arc<MockHostServices>,
    /// In-memory settings persistence
    pub persistence: Arc<MemorySettings>,
}

impl TestHost {
    /// Create a runtime with default configuration and nothing persisted
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default(), HashMap::new()).await
    }

    /// Create a runtime whose persistence already holds `values`
    pub async fn with_persisted(values: HashMap<String, Value>) -> Self {
        Self::with_config(AppConfig::default(), values).await
    }

    /// Create a runtime from explicit configuration
    pub async fn with_config(config: AppConfig, persisted: HashMap<String, Value>) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let services = Arc::new(MockHostServices::new());
        let persistence = Arc::new(MemorySettings::with_values(persisted));

        let runtime = HostRuntime::new(
            &config,
            notifier.clone(),
            services.clone(),
            persistence.clone(),
        )
        .await
        .expect("Failed to build runtime");

        Self {
            runtime,
            notifier,
            services,
            persistence,
        }
    }

    /// The lifecycle manager
    pub fn manager(&self) -> &LifecycleManager {
        self.runtime.manager()
    }
}

/// Manifest with the given id and a matching name
pub fn manifest(id: &str) -> ExtensionManifest {
    ExtensionManifest::new(id, id, "1.0.0")
}

/// Extension registering `sample.hello` (returns "Hello") and a status item
pub fn hello_extension() -> Arc<dyn Extension> {
    FnExtension::new(|ctx: ExtensionContext| async move {
        ctx.register_command("sample.hello", |_| async { Ok(json!("Hello")) })?;
        ctx.window()
            .create_status_bar_item(
                StatusBarItemOptions::new("sample-btn", "Sample").with_command("sample.hello"),
            )
            .await?;
        Ok(())
    })
    .into_arc()
}

/// Extension registering one command `<prefix>.run` returning the prefix
pub fn command_extension(prefix: &'static str) -> Arc<dyn Extension> {
    FnExtension::new(move |ctx: ExtensionContext| async move {
        ctx.register_command(&format!("{prefix}.run"), move |_| async move { Ok(json!(prefix)) })?;
        Ok(())
    })
    .into_arc()
}

/// Extension whose activation always fails
pub fn failing_extension(message: &'static str) -> Arc<dyn Extension> {
    FnExtension::new(move |_ctx: ExtensionContext| async move { anyhow::bail!(message) })
        .into_arc()
}
