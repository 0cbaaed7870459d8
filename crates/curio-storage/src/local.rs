use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::traits::{GatewayStore, StorageError, StorageResult};

/// Gateway list persisted as a JSON array in a local file
#[derive(Clone, Debug)]
pub struct FileGatewayStore {
    path: PathBuf,
}

impl FileGatewayStore {
    /// Create a store backed by `path`, creating its parent directory.
    ///
    /// The file itself is only written on the first change.
    pub async fn new(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create gateway store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl GatewayStore for FileGatewayStore {
    async fn get(&self) -> StorageResult<Vec<String>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::ReadFailed(e.to_string())),
        };

        // A hand-edited or truncated file is treated like no preferences at all.
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Ignoring unreadable gateway preferences"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn set(&self, gateways: &[String]) -> StorageResult<()> {
        let body = serde_json::to_string_pretty(gateways)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        let temp = self.temp_path();
        fs::write(&temp, body)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::WriteFailed(e.to_string())),
        }
    }
}

/// Process-local gateway list, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryGatewayStore {
    gateways: Mutex<Vec<String>>,
}

impl MemoryGatewayStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GatewayStore for MemoryGatewayStore {
    async fn get(&self) -> StorageResult<Vec<String>> {
        Ok(self.gateways.lock().await.clone())
    }

    async fn set(&self, gateways: &[String]) -> StorageResult<()> {
        *self.gateways.lock().await = gateways.to_vec();
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.gateways.lock().await.clear();
        Ok(())
    }
}
