use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use fieldbook_core::errors::{ServiceError, ServiceResult};
use mockall::automock;

use crate::config::UploadConfig;

/// Stores an object and returns the public URL it is reachable under.
#[automock]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, object_name: &str, bytes: Vec<u8>) -> ServiceResult<String>;
}

/// [`BlobStore`] writing objects below a local directory that is served
/// statically under `public_url`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(&config.dir, &config.public_url)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Object names are relative paths; anything escaping the root is refused.
    fn object_path(&self, object_name: &str) -> ServiceResult<PathBuf> {
        let relative = Path::new(object_name);
        let plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if object_name.is_empty() || !plain {
            return Err(ServiceError::UploadRejected(format!(
                "invalid object name {object_name:?}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, object_name: &str, bytes: Vec<u8>) -> ServiceResult<String> {
        let path = self.object_path(object_name)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| ServiceError::Internal(Box::new(err)))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|err| ServiceError::Internal(Box::new(err)))?;

        tracing::debug!(object_name, size = bytes.len(), "Stored blob");
        Ok(format!("{}/{}", self.public_url, object_name))
    }
}
