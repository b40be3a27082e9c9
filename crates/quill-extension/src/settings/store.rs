//! Settings store: merges descriptor defaults with user overrides.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use quill_core::host::SettingsPersistence;

use super::descriptor::{SettingDescriptor, SettingsSection};
use crate::error::{ExtensionError, ExtensionResult};

/// Capacity of the change notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Emitted whenever a setting's effective value changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingChange {
    /// Setting id.
    pub id: String,
    /// New effective value.
    pub value: Value,
}

/// Point-in-time copy of every setting's effective value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SettingsSnapshot {
    values: BTreeMap<String, Value>,
}

impl SettingsSnapshot {
    /// Returns the raw value of a setting.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    /// Returns a number setting.
    pub fn number(&self, id: &str) -> Option<f64> {
        self.values.get(id).and_then(Value::as_f64)
    }

    /// Returns a number setting as an unsigned integer.
    pub fn unsigned(&self, id: &str) -> Option<u64> {
        self.values.get(id).and_then(Value::as_u64)
    }

    /// Returns a toggle setting.
    pub fn toggle(&self, id: &str) -> Option<bool> {
        self.values.get(id).and_then(Value::as_bool)
    }

    /// Returns a text or select setting.
    pub fn text(&self, id: &str) -> Option<&str> {
        self.values.get(id).and_then(Value::as_str)
    }

    /// Chosen option of a select setting.
    pub fn select(&self, id: &str) -> Option<&str> {
        self.text(id)
    }

    /// Number of settings in the snapshot.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(id, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Consumes the snapshot into its underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.values
    }
}

#[derive(Debug, Default)]
struct SettingsState {
    /// Setting id → descriptor.
    descriptors: HashMap<String, SettingDescriptor>,
    /// Setting ids in registration order.
    order: Vec<String>,
    /// Setting id → user override.
    overrides: HashMap<String, Value>,
    /// Persisted overrides whose descriptor has not been registered yet.
    pending: HashMap<String, Value>,
}

impl SettingsState {
    fn effective(&self, id: &str) -> Option<Value> {
        let descriptor = self.descriptors.get(id)?;
        Some(
            self.overrides
                .get(id)
                .cloned()
                .unwrap_or_else(|| descriptor.default.clone()),
        )
    }
}

/// Holds setting descriptors and their current values.
pub struct SettingsStore {
    state: RwLock<SettingsState>,
    changes: broadcast::Sender<SettingChange>,
    persistence: Option<Arc<dyn SettingsPersistence>>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

impl SettingsStore {
    /// Creates a store without durable persistence.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(SettingsState::default()),
            changes,
            persistence: None,
        }
    }

    /// Creates a store that saves every change through `persistence`.
    pub fn with_persistence(persistence: Arc<dyn SettingsPersistence>) -> Self {
        Self {
            persistence: Some(persistence),
            ..Self::new()
        }
    }

    /// Registers a batch of descriptors.
    ///
    /// The batch is all-or-nothing: a duplicate id (against the store or
    /// within the batch) or a default that does not match its declared kind
    /// rejects every descriptor in it.
    pub async fn register_descriptors(
        &self,
        descriptors: Vec<SettingDescriptor>,
    ) -> ExtensionResult<()> {
        let mut state = self.state.write().await;

        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if let Some(existing) = state.descriptors.get(&descriptor.id) {
                return Err(ExtensionError::DuplicateSetting {
                    id: descriptor.id.clone(),
                    owner: existing.extension_id.clone(),
                });
            }
            if !seen.insert(descriptor.id.as_str()) {
                return Err(ExtensionError::DuplicateSetting {
                    id: descriptor.id.clone(),
                    owner: descriptor.extension_id.clone(),
                });
            }
            descriptor.kind.validate(&descriptor.default).map_err(|message| {
                ExtensionError::InvalidSettingValue {
                    id: descriptor.id.clone(),
                    message: format!("default {message}"),
                }
            })?;
        }

        for descriptor in descriptors {
            let id = descriptor.id.clone();
            if let Some(value) = state.pending.remove(&id) {
                match descriptor.kind.validate(&value) {
                    Ok(()) => {
                        state.overrides.insert(id.clone(), value);
                    }
                    Err(message) => {
                        warn!(setting = %id, error = %message, "Ignoring persisted value");
                    }
                }
            }
            debug!(setting = %id, extension_id = %descriptor.extension_id, "Setting registered");
            state.order.push(id.clone());
            state.descriptors.insert(id, descriptor);
        }

        Ok(())
    }

    /// Applies persisted overrides from the attached persistence.
    ///
    /// Values for settings that are not registered yet are held back and
    /// applied when their descriptor arrives. Values that do not match the
    /// declared kind are dropped with a warning. Returns how many values
    /// were read.
    pub async fn load_overrides(&self) -> ExtensionResult<usize> {
        let Some(persistence) = &self.persistence else {
            return Ok(0);
        };

        let values = persistence
            .load()
            .await
            .map_err(|e| ExtensionError::SettingsLoad(e.to_string()))?;
        let count = values.len();

        let mut state = self.state.write().await;
        for (id, value) in values {
            let Some(descriptor) = state.descriptors.get(&id) else {
                state.pending.insert(id, value);
                continue;
            };
            match descriptor.kind.validate(&value) {
                Ok(()) => {
                    state.overrides.insert(id, value);
                }
                Err(message) => {
                    warn!(setting = %id, error = %message, "Ignoring persisted value");
                }
            }
        }

        info!(count = count, "Persisted settings loaded");
        Ok(count)
    }

    /// Returns the current value of a setting.
    pub async fn get(&self, id: &str) -> ExtensionResult<Value> {
        let state = self.state.read().await;
        state
            .effective(id)
            .ok_or_else(|| ExtensionError::SettingNotFound(id.to_string()))
    }

    /// Overrides a setting and notifies subscribers.
    pub async fn set(&self, id: &str, value: Value) -> ExtensionResult<()> {
        {
            let mut state = self.state.write().await;
            let descriptor = state
                .descriptors
                .get(id)
                .ok_or_else(|| ExtensionError::SettingNotFound(id.to_string()))?;
            descriptor
                .kind
                .validate(&value)
                .map_err(|message| ExtensionError::InvalidSettingValue {
                    id: id.to_string(),
                    message,
                })?;
            state.overrides.insert(id.to_string(), value.clone());
        }

        debug!(setting = %id, value = %value, "Setting updated");
        self.publish(id, value.clone());

        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.save(id, &value).await {
                warn!(setting = %id, error = %e, "Failed to persist setting");
            }
        }
        Ok(())
    }

    /// Drops the user override, restoring the descriptor's default.
    pub async fn reset(&self, id: &str) -> ExtensionResult<Value> {
        let value = {
            let mut state = self.state.write().await;
            let default = state
                .descriptors
                .get(id)
                .map(|d| d.default.clone())
                .ok_or_else(|| ExtensionError::SettingNotFound(id.to_string()))?;
            state.overrides.remove(id);
            default
        };

        self.publish(id, value.clone());

        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.remove(id).await {
                warn!(setting = %id, error = %e, "Failed to remove persisted setting");
            }
        }
        Ok(value)
    }

    /// Returns every setting's current value.
    pub async fn get_all(&self) -> SettingsSnapshot {
        let state = self.state.read().await;
        let values = state
            .order
            .iter()
            .filter_map(|id| state.effective(id).map(|v| (id.clone(), v)))
            .collect();
        SettingsSnapshot { values }
    }

    /// Returns a descriptor by id.
    pub async fn descriptor(&self, id: &str) -> Option<SettingDescriptor> {
        self.state.read().await.descriptors.get(id).cloned()
    }

    /// Returns every descriptor in registration order.
    pub async fn descriptors(&self) -> Vec<SettingDescriptor> {
        let state = self.state.read().await;
        state
            .order
            .iter()
            .filter_map(|id| state.descriptors.get(id).cloned())
            .collect()
    }

    /// Returns descriptors grouped by section, sections in first-seen order.
    pub async fn descriptors_by_section(&self) -> Vec<SettingsSection> {
        let mut sections: Vec<SettingsSection> = Vec::new();
        for descriptor in self.descriptors().await {
            match sections.iter_mut().find(|s| s.section == descriptor.section) {
                Some(section) => section.settings.push(descriptor),
                None => sections.push(SettingsSection {
                    section: descriptor.section.clone(),
                    settings: vec![descriptor],
                }),
            }
        }
        sections
    }

    /// Subscribes to setting changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SettingChange> {
        self.changes.subscribe()
    }

    fn publish(&self, id: &str, value: Value) {
        // No receivers is not an error.
        let _ = self.changes.send(SettingChange {
            id: id.to_string(),
            value,
        });
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
