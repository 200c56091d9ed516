use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::{fs, sync::Mutex};
use uuid::Uuid;

pub const DEVICE_ID_KEY: &str = "device_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("{0}")]
    Unavailable(String),
}

/// Platform-provided per-install identifier
#[async_trait]
pub trait InstallationIdSource: Send + Sync {
    /// `Ok(None)` when the platform has no identifier to offer
    async fn installation_id(&self) -> Result<Option<String>, StoreError>;
}

/// Small persistent string store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Resolves this installation's identifier.
///
/// Tries the platform source, then a previously persisted id, and finally
/// generates and persists a fresh one. Never fails.
pub struct DeviceIdResolver {
    platform: Option<Arc<dyn InstallationIdSource>>,
    store: Arc<dyn KeyValueStore>,
}

impl DeviceIdResolver {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            platform: None,
            store,
        }
    }

    pub fn with_platform(mut self, platform: Arc<dyn InstallationIdSource>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub async fn get_device_id(&self) -> String {
        if let Some(platform) = &self.platform {
            match platform.installation_id().await {
                Ok(id) => {
                    if let Some(id) = non_blank(id) {
                        return id;
                    }
                }
                Err(e) => log::warn!("platform installation id unavailable: {e}"),
            }
        }

        match self.store.get(DEVICE_ID_KEY).await {
            Ok(id) => {
                if let Some(id) = non_blank(id) {
                    return id;
                }
            }
            Err(e) => log::warn!("failed to read persisted device id: {e}"),
        }

        let id = Uuid::new_v4().to_string();
        if let Err(e) = self.store.set(DEVICE_ID_KEY, &id).await {
            log::warn!("failed to persist generated device id: {e}");
        } else {
            log::info!("generated new device id");
        }
        id
    }
}

fn non_blank(id: Option<String>) -> Option<String> {
    id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())
}

/// `KeyValueStore` kept as a flat JSON object on disk
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(json) if json.trim().is_empty() => Ok(HashMap::new()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(StoreError::Corrupt(e)) => {
                log::warn!(
                    "overwriting unreadable store {}: {e}",
                    self.path.display()
                );
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}
