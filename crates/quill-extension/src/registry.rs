//! Extension registry: stores manifests and activation entry points.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::context::ExtensionContext;
use crate::error::{ExtensionError, ExtensionResult};
use crate::manifest::ExtensionManifest;
use crate::settings::{SettingDescriptor, SettingsStore};

/// Entry points every extension provides.
#[async_trait]
pub trait Extension: Send + Sync {
    /// Called on activation with a fresh context.
    async fn activate(&self, ctx: ExtensionContext) -> anyhow::Result<()>;

    /// Called on deactivation with the context handed to `activate`.
    ///
    /// Errors are logged only; the runtime sweeps everything the
    /// extension registered regardless of the outcome.
    async fn deactivate(&self, _ctx: ExtensionContext) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A registered extension.
#[derive(Clone)]
pub struct RegisteredExtension {
    /// Immutable manifest.
    pub manifest: ExtensionManifest,
    /// Ids of the settings this extension declared.
    pub settings: Vec<String>,
    /// Activation entry points.
    pub extension: Arc<dyn Extension>,
}

impl std::fmt::Debug for RegisteredExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredExtension")
            .field("manifest", &self.manifest)
            .field("settings", &self.settings)
            .field("extension", &"<extension>")
            .finish()
    }
}

/// Everything needed to register one extension.
#[derive(Clone)]
pub struct ExtensionModule {
    /// Manifest.
    pub manifest: ExtensionManifest,
    /// Declared settings.
    pub settings: Vec<SettingDescriptor>,
    /// Entry points.
    pub extension: Arc<dyn Extension>,
}

impl std::fmt::Debug for ExtensionModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionModule")
            .field("manifest", &self.manifest)
            .field("settings", &self.settings.len())
            .finish()
    }
}

impl ExtensionModule {
    /// Bundles a manifest with its entry points and no settings.
    pub fn new(manifest: ExtensionManifest, extension: Arc<dyn Extension>) -> Self {
        Self {
            manifest,
            settings: Vec::new(),
            extension,
        }
    }

    /// Adds setting descriptors.
    pub fn with_settings(mut self, settings: Vec<SettingDescriptor>) -> Self {
        self.settings = settings;
        self
    }
}

#[derive(Default)]
struct RegistryState {
    /// Extension id → entry.
    entries: HashMap<String, RegisteredExtension>,
    /// Ids in registration order.
    order: Vec<String>,
}

/// Registry of every extension known to the host.
pub struct ExtensionRegistry {
    state: RwLock<RegistryState>,
    settings: Arc<SettingsStore>,
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry").finish_non_exhaustive()
    }
}

impl ExtensionRegistry {
    /// Creates an empty registry forwarding descriptors to `settings`.
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            settings,
        }
    }

    /// Registers an extension and its settings.
    ///
    /// A duplicate extension id or any rejected setting aborts the whole
    /// registration; nothing is left behind. Hosts register through
    /// [`crate::LifecycleManager::register`], which also records the state.
    pub(crate) async fn register(
        &self,
        manifest: ExtensionManifest,
        descriptors: Vec<SettingDescriptor>,
        extension: Arc<dyn Extension>,
    ) -> ExtensionResult<()> {
        let id = manifest.id.clone();
        let mut state = self.state.write().await;

        if state.entries.contains_key(&id) {
            return Err(ExtensionError::DuplicateExtension(id));
        }

        let descriptors: Vec<SettingDescriptor> = descriptors
            .into_iter()
            .map(|mut descriptor| {
                descriptor.extension_id = id.clone();
                descriptor
            })
            .collect();
        let setting_ids = descriptors.iter().map(|d| d.id.clone()).collect();
        self.settings.register_descriptors(descriptors).await?;

        info!(
            extension_id = %id,
            name = %manifest.name,
            version = %manifest.version,
            "Registering extension"
        );

        state.order.push(id.clone());
        state.entries.insert(
            id,
            RegisteredExtension {
                manifest,
                settings: setting_ids,
                extension,
            },
        );

        Ok(())
    }

    /// Gets an extension's manifest.
    pub async fn get(&self, id: &str) -> ExtensionResult<ExtensionManifest> {
        let state = self.state.read().await;
        state
            .entries
            .get(id)
            .map(|entry| entry.manifest.clone())
            .ok_or_else(|| ExtensionError::NotFound(id.to_string()))
    }

    /// Gets the full entry for an extension.
    pub async fn entry(&self, id: &str) -> Option<RegisteredExtension> {
        let state = self.state.read().await;
        state.entries.get(id).cloned()
    }

    /// Lists manifests in registration order.
    pub async fn list(&self) -> Vec<ExtensionManifest> {
        let state = self.state.read().await;
        state
            .order
            .iter()
            .filter_map(|id| state.entries.get(id))
            .map(|entry| entry.manifest.clone())
            .collect()
    }

    /// Lists extension ids in registration order.
    pub async fn ids(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.order.clone()
    }

    /// Checks whether an extension is registered.
    pub async fn contains(&self, id: &str) -> bool {
        let state = self.state.read().await;
        state.entries.contains_key(id)
    }

    /// Returns extension count.
    pub async fn count(&self) -> usize {
        let state = self.state.read().await;
        state.entries.len()
    }
}
