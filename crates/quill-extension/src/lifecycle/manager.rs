//! Lifecycle manager: activation, deactivation, and reload of extensions.
//!
//! The manager owns every state transition. Activation failures (returned
//! errors and panics alike) leave only the offending extension `Failed`.
//! Deactivation always ends with an ownership sweep of the extension's
//! commands and contributions, whatever its own cleanup did.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use quill_core::config::extensions::ExtensionsConfig;

use super::state::{ExtensionState, ExtensionStatus};
use crate::commands::CommandBus;
use crate::context::{ContextFactory, ExtensionContext};
use crate::contributions::ContributionRegistry;
use crate::error::{ExtensionError, ExtensionResult};
use crate::host::HostBindings;
use crate::isolation::contain;
use crate::manifest::ExtensionManifest;
use crate::registry::{Extension, ExtensionModule, ExtensionRegistry};
use crate::settings::{SettingDescriptor, SettingsStore};

/// Runtime record of one extension.
#[derive(Debug)]
struct Slot {
    state: ExtensionState,
    /// Context of the current activation.
    context: Option<ExtensionContext>,
    last_error: Option<String>,
    activated_at: Option<DateTime<Utc>>,
}

impl Slot {
    fn registered() -> Self {
        Self {
            state: ExtensionState::Registered,
            context: None,
            last_error: None,
            activated_at: None,
        }
    }
}

/// Outcome of [`LifecycleManager::activate_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartupReport {
    /// Extensions that reached `Active`.
    pub activated: Vec<String>,
    /// Extensions that ended `Failed`.
    pub failed: Vec<String>,
    /// Extensions not attempted (disabled or already active).
    pub skipped: Vec<String>,
}

/// Orchestrates the lifecycle of every registered extension.
pub struct LifecycleManager {
    /// Manifests and entry points.
    registry: Arc<ExtensionRegistry>,
    /// Shared command table.
    commands: Arc<CommandBus>,
    /// Shared contribution tables.
    contributions: Arc<ContributionRegistry>,
    /// Shared settings.
    settings: Arc<SettingsStore>,
    /// Builds one context per activation.
    factory: ContextFactory,
    /// Host collaborators.
    host: HostBindings,
    /// Extension id → runtime record.
    slots: RwLock<HashMap<String, Slot>>,
    /// Startup exclusions.
    disabled: Vec<String>,
    /// How long to wait for an extension's own cleanup.
    deactivate_timeout: Duration,
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("commands", &self.commands)
            .field("deactivate_timeout", &self.deactivate_timeout)
            .finish_non_exhaustive()
    }
}

impl LifecycleManager {
    /// Creates a manager and the registries it orchestrates.
    pub fn new(host: HostBindings, settings: Arc<SettingsStore>, config: &ExtensionsConfig) -> Self {
        let commands = Arc::new(CommandBus::new(host.notifier.clone()));
        let contributions = Arc::new(ContributionRegistry::new(settings.clone()));
        let registry = Arc::new(ExtensionRegistry::new(settings.clone()));
        let factory = ContextFactory::new(
            commands.clone(),
            contributions.clone(),
            settings.clone(),
            host.clone(),
        );

        Self {
            registry,
            commands,
            contributions,
            settings,
            factory,
            host,
            slots: RwLock::new(HashMap::new()),
            disabled: config.disabled.clone(),
            deactivate_timeout: config.deactivate_timeout(),
        }
    }

    /// Overrides the deactivation grace period.
    pub fn with_deactivate_timeout(mut self, timeout: Duration) -> Self {
        self.deactivate_timeout = timeout;
        self
    }

    /// Registers an extension and records it as `Registered`.
    pub async fn register(
        &self,
        manifest: ExtensionManifest,
        descriptors: Vec<SettingDescriptor>,
        extension: Arc<dyn Extension>,
    ) -> ExtensionResult<()> {
        let id = manifest.id.clone();
        // Held across both inserts so a listed extension always has a state.
        let mut slots = self.slots.write().await;
        self.registry.register(manifest, descriptors, extension).await?;
        slots.insert(id, Slot::registered());
        Ok(())
    }

    /// Registers a bundled module.
    pub async fn register_module(&self, module: ExtensionModule) -> ExtensionResult<()> {
        self.register(module.manifest, module.settings, module.extension)
            .await
    }

    /// Activates an extension with a fresh context.
    pub async fn activate(&self, id: &str) -> ExtensionResult<()> {
        let entry = self
            .registry
            .entry(id)
            .await
            .ok_or_else(|| ExtensionError::NotFound(id.to_string()))?;

        self.transition(id, "activate", ExtensionState::can_activate, ExtensionState::Activating)
            .await?;

        info!(extension_id = %id, version = %entry.manifest.version, "Activating extension");

        let ctx = self.factory.build(id);
        match contain(entry.extension.activate(ctx.clone())).await {
            Ok(()) => {
                let mut slots = self.slots.write().await;
                if let Some(slot) = slots.get_mut(id) {
                    slot.state = ExtensionState::Active;
                    slot.last_error = None;
                    slot.activated_at = Some(ctx.activated_at());
                    slot.context = Some(ctx);
                }
                info!(extension_id = %id, "Extension activated");
                Ok(())
            }
            Err(message) => {
                error!(extension_id = %id, error = %message, "Extension activation failed");

                // Nothing registered by a failed activation survives it.
                ctx.revoke().await;
                self.sweep(id).await;

                {
                    let mut slots = self.slots.write().await;
                    if let Some(slot) = slots.get_mut(id) {
                        slot.state = ExtensionState::Failed;
                        slot.last_error = Some(message.clone());
                        slot.activated_at = None;
                        slot.context = None;
                    }
                }

                let err = ExtensionError::Activation {
                    id: id.to_string(),
                    message,
                };
                self.host.notifier.show_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Deactivates an active extension, then sweeps everything it owns.
    ///
    /// The extension's own `deactivate` runs as a detached task. Errors and
    /// panics from it are logged, and if it outlives the grace period the
    /// sweep proceeds without waiting for it.
    pub async fn deactivate(&self, id: &str) -> ExtensionResult<()> {
        let entry = self
            .registry
            .entry(id)
            .await
            .ok_or_else(|| ExtensionError::NotFound(id.to_string()))?;

        let ctx = {
            let mut slots = self.slots.write().await;
            let slot = slots
                .get_mut(id)
                .ok_or_else(|| ExtensionError::NotFound(id.to_string()))?;
            if slot.state != ExtensionState::Active {
                return Err(ExtensionError::InvalidState {
                    id: id.to_string(),
                    state: slot.state,
                    operation: "deactivate",
                });
            }
            slot.state = ExtensionState::Deactivating;
            slot.context.take()
        };

        info!(extension_id = %id, "Deactivating extension");

        if let Some(ctx) = ctx {
            let extension = entry.extension.clone();
            let task_ctx = ctx.clone();
            let task = tokio::spawn(async move { contain(extension.deactivate(task_ctx)).await });

            match tokio::time::timeout(self.deactivate_timeout, task).await {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(message))) => {
                    let err = ExtensionError::Deactivation {
                        id: id.to_string(),
                        message,
                    };
                    warn!(extension_id = %id, error = %err, "Extension deactivate returned error");
                }
                Ok(Err(join_error)) => {
                    warn!(extension_id = %id, error = %join_error, "Extension deactivate task failed");
                }
                Err(_) => {
                    warn!(
                        extension_id = %id,
                        timeout_ms = self.deactivate_timeout.as_millis() as u64,
                        "Extension deactivate timed out, sweeping anyway"
                    );
                }
            }

            ctx.revoke().await;
        }

        self.sweep(id).await;

        {
            let mut slots = self.slots.write().await;
            if let Some(slot) = slots.get_mut(id) {
                slot.state = ExtensionState::Deactivated;
                slot.activated_at = None;
            }
        }

        info!(extension_id = %id, "Extension deactivated");
        Ok(())
    }

    /// Deactivates (if active) and activates an extension again.
    pub async fn reload(&self, id: &str) -> ExtensionResult<()> {
        match self.state(id).await {
            None => Err(ExtensionError::NotFound(id.to_string())),
            Some(ExtensionState::Active) => {
                self.deactivate(id).await?;
                self.activate(id).await
            }
            Some(state) if state.is_transitioning() => Err(ExtensionError::InvalidState {
                id: id.to_string(),
                state,
                operation: "reload",
            }),
            Some(_) => self.activate(id).await,
        }
    }

    /// Activates every registered extension sequentially, in registration order.
    ///
    /// A failing extension never prevents the ones after it from activating.
    pub async fn activate_all(&self) -> StartupReport {
        let mut report = StartupReport::default();

        for id in self.registry.ids().await {
            if self.disabled.iter().any(|disabled| disabled == &id) {
                info!(extension_id = %id, "Extension disabled, skipping activation");
                report.skipped.push(id);
                continue;
            }
            if !self.state(&id).await.is_some_and(ExtensionState::can_activate) {
                report.skipped.push(id);
                continue;
            }
            match self.activate(&id).await {
                Ok(()) => report.activated.push(id),
                Err(_) => report.failed.push(id),
            }
        }

        info!(
            activated = report.activated.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "Startup activation complete"
        );
        report
    }

    /// Deactivates every active extension in reverse registration order.
    pub async fn deactivate_all(&self) {
        for id in self.registry.ids().await.into_iter().rev() {
            if self.state(&id).await != Some(ExtensionState::Active) {
                continue;
            }
            if let Err(e) = self.deactivate(&id).await {
                error!(extension_id = %id, error = %e, "Error deactivating extension");
            }
        }
        info!("All extensions deactivated");
    }

    /// Executes a command through the shared bus.
    pub async fn execute_command(&self, command_id: &str, args: Vec<Value>) -> ExtensionResult<Value> {
        self.commands.execute_command(command_id, args).await
    }

    /// Current state of an extension.
    pub async fn state(&self, id: &str) -> Option<ExtensionState> {
        self.slots.read().await.get(id).map(|slot| slot.state)
    }

    /// Error message of an extension's most recent failed activation.
    pub async fn last_error(&self, id: &str) -> Option<String> {
        self.slots
            .read()
            .await
            .get(id)
            .and_then(|slot| slot.last_error.clone())
    }

    /// Status of every extension in registration order.
    pub async fn states(&self) -> Vec<ExtensionStatus> {
        let manifests = self.registry.list().await;
        let slots = self.slots.read().await;
        manifests
            .into_iter()
            .filter_map(|manifest| {
                let slot = slots.get(&manifest.id)?;
                Some(ExtensionStatus {
                    state: slot.state,
                    last_error: slot.last_error.clone(),
                    activated_at: slot.activated_at,
                    id: manifest.id,
                    name: manifest.name,
                    version: manifest.version,
                    icon: manifest.icon,
                })
            })
            .collect()
    }

    /// Returns the extension registry.
    pub fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }

    /// Returns the command bus.
    pub fn commands(&self) -> &Arc<CommandBus> {
        &self.commands
    }

    /// Returns the contribution registry.
    pub fn contributions(&self) -> &Arc<ContributionRegistry> {
        &self.contributions
    }

    /// Returns the settings store.
    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Checks the current state against `allowed` and moves to `next`.
    async fn transition(
        &self,
        id: &str,
        operation: &'static str,
        allowed: fn(ExtensionState) -> bool,
        next: ExtensionState,
    ) -> ExtensionResult<()> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .get_mut(id)
            .ok_or_else(|| ExtensionError::NotFound(id.to_string()))?;
        if !allowed(slot.state) {
            return Err(ExtensionError::InvalidState {
                id: id.to_string(),
                state: slot.state,
                operation,
            });
        }
        slot.state = next;
        Ok(())
    }

    /// Removes every command and contribution owned by `id`.
    async fn sweep(&self, id: &str) {
        let commands = self.commands.unregister_all(id);
        let swept = self.contributions.remove_owned(id).await;
        info!(
            extension_id = %id,
            commands,
            contributions = swept.total(),
            "Swept extension registrations"
        );
    }
}
