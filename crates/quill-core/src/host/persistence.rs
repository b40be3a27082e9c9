//! Durable storage for user setting overrides.
//!
//! Persisted settings are a flat `id → value` JSON object.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::result::AppResult;

/// Load-on-start, save-on-change persistence for setting overrides.
#[async_trait]
pub trait SettingsPersistence: Send + Sync {
    /// Loads all persisted overrides.
    async fn load(&self) -> AppResult<HashMap<String, Value>>;

    /// Persists a single override.
    async fn save(&self, id: &str, value: &Value) -> AppResult<()>;

    /// Drops a persisted override.
    async fn remove(&self, id: &str) -> AppResult<()>;
}

/// Settings persisted as a single pretty-printed JSON object on disk.
#[derive(Debug)]
pub struct JsonFileSettings {
    /// Path to the JSON file.
    path: PathBuf,
    /// Cached contents; written back as a whole on every change.
    cache: Mutex<Option<HashMap<String, Value>>>,
}

impl JsonFileSettings {
    /// Creates a persistence backend for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> AppResult<HashMap<String, Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => {
                let value: Value = serde_json::from_slice(&bytes)?;
                match value {
                    Value::Object(map) => Ok(map.into_iter().collect()),
                    _ => Err(AppError::validation(format!(
                        "Settings file '{}' must contain a JSON object",
                        self.path.display()
                    ))),
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, values: &HashMap<String, Value>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let ordered: serde_json::Map<String, Value> = {
            let mut keys: Vec<&String> = values.keys().collect();
            keys.sort();
            keys.into_iter()
                .map(|k| (k.clone(), values[k].clone()))
                .collect()
        };
        let bytes = serde_json::to_vec_pretty(&Value::Object(ordered))?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsPersistence for JsonFileSettings {
    async fn load(&self) -> AppResult<HashMap<String, Value>> {
        let values = self.read_file().await?;
        *self.cache.lock().await = Some(values.clone());
        Ok(values)
    }

    async fn save(&self, id: &str, value: &Value) -> AppResult<()> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.read_file().await?);
        }
        let values = cache.get_or_insert_with(HashMap::new);
        values.insert(id.to_string(), value.clone());
        self.write_file(values).await
    }

    async fn remove(&self, id: &str) -> AppResult<()> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.read_file().await?);
        }
        let values = cache.get_or_insert_with(HashMap::new);
        if values.remove(id).is_some() {
            self.write_file(values).await?;
        }
        Ok(())
    }
}

/// In-memory persistence, used by tests and ephemeral hosts.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, Value>>,
}

impl MemorySettings {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with overrides.
    pub fn with_values(values: HashMap<String, Value>) -> Self {
        Self {
            values: Mutex::new(values),
        }
    }

    /// Returns a copy of the persisted overrides.
    pub async fn snapshot(&self) -> HashMap<String, Value> {
        self.values.lock().await.clone()
    }
}

#[async_trait]
impl SettingsPersistence for MemorySettings {
    async fn load(&self) -> AppResult<HashMap<String, Value>> {
        Ok(self.values.lock().await.clone())
    }

    async fn save(&self, id: &str, value: &Value) -> AppResult<()> {
        self.values
            .lock()
            .await
            .insert(id.to_string(), value.clone());
        Ok(())
    }

    async fn remove(&self, id: &str) -> AppResult<()> {
        self.values.lock().await.remove(id);
        Ok(())
    }
}
