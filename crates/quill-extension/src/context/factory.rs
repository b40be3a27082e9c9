//! Builds a fresh [`ExtensionContext`] for every activation.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::extension::{ContextInner, ExtensionContext};
use super::state::ActivationState;
use crate::commands::CommandBus;
use crate::contributions::ContributionRegistry;
use crate::host::HostBindings;
use crate::settings::SettingsStore;

/// Holds the shared registries each context is scoped against.
#[derive(Debug, Clone)]
pub struct ContextFactory {
    /// Shared command table.
    commands: Arc<CommandBus>,
    /// Shared contribution tables.
    contributions: Arc<ContributionRegistry>,
    /// Shared settings.
    settings: Arc<SettingsStore>,
    /// Host collaborators.
    host: HostBindings,
}

impl ContextFactory {
    /// Creates a factory over explicitly provided registries.
    pub fn new(
        commands: Arc<CommandBus>,
        contributions: Arc<ContributionRegistry>,
        settings: Arc<SettingsStore>,
        host: HostBindings,
    ) -> Self {
        Self {
            commands,
            contributions,
            settings,
            host,
        }
    }

    /// Builds a context for one activation of `extension_id`.
    pub fn build(&self, extension_id: &str) -> ExtensionContext {
        let activation_id = Uuid::now_v7();
        debug!(extension_id = %extension_id, activation_id = %activation_id, "Building extension context");

        ExtensionContext {
            inner: Arc::new(ContextInner {
                extension_id: extension_id.to_string(),
                activation_id,
                activated_at: Utc::now(),
                commands: self.commands.clone(),
                contributions: self.contributions.clone(),
                settings: self.settings.clone(),
                host: self.host.clone(),
                state: ActivationState::default(),
                revoked: AtomicBool::new(false),
                gate: RwLock::new(()),
            }),
        }
    }
}
