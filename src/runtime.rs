//! Host runtime bootstrap.

use std::sync::Arc;

use tracing::{error, info, warn};

use quill_core::AppResult;
use quill_core::config::AppConfig;
use quill_core::host::{
    HostServices, JsonFileSettings, NotificationSurface, SettingsPersistence, StaticWorkspace,
};
use quill_extension::lifecycle::StartupReport;
use quill_extension::{ExtensionModule, HostBindings, LifecycleManager, SettingsStore};

/// A fully wired extension runtime.
#[derive(Debug)]
pub struct HostRuntime {
    manager: LifecycleManager,
    workspace: Arc<StaticWorkspace>,
}

impl HostRuntime {
    /// Builds a runtime from configuration and explicit host collaborators.
    ///
    /// Persisted overrides are loaded before any extension registers, so
    /// each descriptor picks up its stored value as it arrives. Overrides
    /// that cannot be read are dropped and every setting starts at its default.
    pub async fn new(
        config: &AppConfig,
        notifier: Arc<dyn NotificationSurface>,
        services: Arc<dyn HostServices>,
        persistence: Arc<dyn SettingsPersistence>,
    ) -> AppResult<Self> {
        let workspace = Arc::new(StaticWorkspace::new(
            config.host.workspace_root.as_ref().map(Into::into),
        ));

        let settings = Arc::new(SettingsStore::with_persistence(persistence));
        match settings.load_overrides().await {
            Ok(loaded) => info!(count = loaded, "Loaded persisted settings"),
            Err(e) => warn!(error = %e, "Ignoring unreadable persisted settings, using defaults"),
        }

        let host = HostBindings::new(notifier, workspace.clone(), services);
        let manager = LifecycleManager::new(host, settings, &config.extensions);

        Ok(Self { manager, workspace })
    }

    /// Builds a runtime that persists settings to `host.settings_file`.
    pub async fn with_settings_file(
        config: &AppConfig,
        notifier: Arc<dyn NotificationSurface>,
        services: Arc<dyn HostServices>,
    ) -> AppResult<Self> {
        let persistence = Arc::new(JsonFileSettings::new(&config.host.settings_file));
        Self::new(config, notifier, services, persistence).await
    }

    /// Registers modules in order. A module that fails to register is
    /// logged and skipped; the rest still load. Returns how many registered.
    pub async fn register_all(&self, modules: Vec<ExtensionModule>) -> usize {
        let mut registered = 0;
        for module in modules {
            let id = module.manifest.id.clone();
            match self.manager.register_module(module).await {
                Ok(()) => registered += 1,
                Err(e) => error!(extension_id = %id, error = %e, "Failed to register extension"),
            }
        }
        registered
    }

    /// Registers the bundled extensions and, unless disabled, activates everything.
    pub async fn start(&self, config: &AppConfig) -> StartupReport {
        let registered = self.register_all(quill_builtins::builtin_modules()).await;
        info!(registered, "Bundled extensions registered");

        if !config.extensions.auto_activate {
            warn!("Automatic activation disabled; extensions stay registered");
            return StartupReport::default();
        }
        self.manager.activate_all().await
    }

    /// Deactivates every active extension.
    pub async fn shutdown(&self) {
        self.manager.deactivate_all().await;
    }

    /// The lifecycle manager and, through it, every registry.
    pub fn manager(&self) -> &LifecycleManager {
        &self.manager
    }

    /// The workspace accessor handed to extensions.
    pub fn workspace(&self) -> &Arc<StaticWorkspace> {
        &self.workspace
    }
}
