//! The context object an extension receives on activation.
//!
//! Every registration made through a context is implicitly owned by the
//! context's extension, so one extension can neither claim nor overwrite
//! another's commands and contributions. Once the activation ends the
//! context is revoked and further registrations fail.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{RwLock, RwLockReadGuard};
use uuid::Uuid;

use quill_core::host::HostServices;

use super::state::ActivationState;
use super::window::Window;
use crate::commands::{CommandBus, CommandHandler, FnCommand};
use crate::contributions::{ContributionRegistry, PanelOptions, RenderFactory};
use crate::error::{ExtensionError, ExtensionResult};
use crate::host::HostBindings;
use crate::settings::{SettingsSnapshot, SettingsStore};

pub(crate) struct ContextInner {
    pub(crate) extension_id: String,
    pub(crate) activation_id: Uuid,
    pub(crate) activated_at: DateTime<Utc>,
    pub(crate) commands: Arc<CommandBus>,
    pub(crate) contributions: Arc<ContributionRegistry>,
    pub(crate) settings: Arc<SettingsStore>,
    pub(crate) host: HostBindings,
    pub(crate) state: ActivationState,
    pub(crate) revoked: AtomicBool,
    /// Held shared by registrations and exclusively by revocation.
    pub(crate) gate: RwLock<()>,
}

/// Capability context scoped to one activation of one extension.
///
/// Cheap to clone; clones share the same activation.
#[derive(Clone)]
pub struct ExtensionContext {
    pub(crate) inner: Arc<ContextInner>,
}

impl std::fmt::Debug for ExtensionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionContext")
            .field("extension_id", &self.inner.extension_id)
            .field("activation_id", &self.inner.activation_id)
            .field("revoked", &self.is_revoked())
            .finish()
    }
}

impl ExtensionContext {
    /// Id of the extension this context belongs to.
    pub fn extension_id(&self) -> &str {
        &self.inner.extension_id
    }

    /// Unique id of this activation.
    pub fn activation_id(&self) -> Uuid {
        self.inner.activation_id
    }

    /// When this activation started.
    pub fn activated_at(&self) -> DateTime<Utc> {
        self.inner.activated_at
    }

    /// Whether the activation has ended.
    pub fn is_revoked(&self) -> bool {
        self.inner.revoked.load(Ordering::SeqCst)
    }

    /// Ends the activation. Waits for in-flight registrations, so a sweep
    /// run after this returns sees everything they inserted.
    pub(crate) async fn revoke(&self) {
        let _gate = self.inner.gate.write().await;
        self.inner.revoked.store(true, Ordering::SeqCst);
    }

    fn ensure_live(&self) -> ExtensionResult<()> {
        if self.is_revoked() {
            return Err(ExtensionError::ContextRevoked(
                self.inner.extension_id.clone(),
            ));
        }
        Ok(())
    }

    /// Admits one registration; the guard must outlive the insert.
    pub(crate) async fn live(&self) -> ExtensionResult<RwLockReadGuard<'_, ()>> {
        let gate = self.inner.gate.read().await;
        self.ensure_live()?;
        Ok(gate)
    }

    /// Non-blocking [`Self::live`]. A revocation in progress counts as revoked.
    fn try_live(&self) -> ExtensionResult<RwLockReadGuard<'_, ()>> {
        let gate = self
            .inner
            .gate
            .try_read()
            .map_err(|_| ExtensionError::ContextRevoked(self.inner.extension_id.clone()))?;
        self.ensure_live()?;
        Ok(gate)
    }

    /// Registers a command implemented by an async closure.
    pub fn register_command<F, Fut>(&self, command_id: &str, handler: F) -> ExtensionResult<()>
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.register_command_handler(command_id, Arc::new(FnCommand::new(handler)))
    }

    /// Registers a command implemented by a [`CommandHandler`].
    pub fn register_command_handler(
        &self,
        command_id: &str,
        handler: Arc<dyn CommandHandler>,
    ) -> ExtensionResult<()> {
        let _live = self.try_live()?;
        self.inner
            .commands
            .register_command(&self.inner.extension_id, command_id, handler)
    }

    /// Registers a sidebar panel. Fails if the panel id is taken.
    pub async fn register_sidebar_panel(
        &self,
        panel_id: &str,
        options: PanelOptions,
        renderer: RenderFactory,
    ) -> ExtensionResult<()> {
        let _live = self.live().await?;
        self.inner
            .contributions
            .register_sidebar_panel(&self.inner.extension_id, panel_id, options, renderer)
            .await
    }

    /// Status bar, editor toolbar, and notification operations.
    pub fn window(&self) -> Window<'_> {
        Window::new(self)
    }

    /// Snapshot of every setting's current value, across all extensions.
    pub async fn get_settings(&self) -> SettingsSnapshot {
        self.inner.settings.get_all().await
    }

    /// Current value of one setting.
    pub async fn setting(&self, id: &str) -> ExtensionResult<Value> {
        self.inner.settings.get(id).await
    }

    /// The open project directory, if any.
    pub fn get_workspace_root(&self) -> Option<PathBuf> {
        self.inner.host.workspace.root()
    }

    /// Host-provided services, passed through unwrapped.
    pub fn host_services(&self) -> Arc<dyn HostServices> {
        self.inner.host.services.clone()
    }

    /// Returns this activation's state cell of type `T`.
    pub fn state<T>(&self) -> Arc<T>
    where
        T: Default + Send + Sync + 'static,
    {
        self.inner.state.get::<T>()
    }
}
