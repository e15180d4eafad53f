//! Asset uploads via the `object_store` crate.
//!
//! Any `ObjectStore` backend works — `LocalFileSystem` for development and
//! tests, an S3-compatible builder for the production bucket — because the
//! public URL is composed from a configured base, not from the backend.
//! Objects are keyed `images/{uuid}.{ext}` so concurrent pipelines can never
//! collide on figure names.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use tracing::{debug, info};
use uuid::Uuid;

use crate::ports::{AssetStore, AssetStoreError};

/// Image extensions the store accepts, matching what converters emit.
const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// [`AssetStore`] backed by any [`ObjectStore`] implementation.
pub struct ObjectAssetStore {
    inner: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl ObjectAssetStore {
    /// Wrap an already-built backend. `public_base_url` is the externally
    /// reachable prefix under which uploaded object keys resolve.
    pub fn new(inner: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            inner,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Local-filesystem backend rooted at `base_dir` (created if missing).
    pub fn local(
        base_dir: PathBuf,
        public_base_url: impl Into<String>,
    ) -> Result<Self, AssetStoreError> {
        std::fs::create_dir_all(&base_dir)?;
        let fs = object_store::local::LocalFileSystem::new_with_prefix(base_dir)
            .map_err(|e| AssetStoreError::UploadFailed(e.to_string()))?;
        Ok(Self::new(Arc::new(fs), public_base_url))
    }
}

#[async_trait::async_trait]
impl AssetStore for ObjectAssetStore {
    async fn upload(&self, local_path: &Path) -> Result<String, AssetStoreError> {
        if !local_path.exists() {
            return Err(AssetStoreError::NotFound(local_path.to_path_buf()));
        }

        let extension = local_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AssetStoreError::UnsupportedExtension(extension));
        }

        let bytes = tokio::fs::read(local_path).await?;
        debug!("Uploading {} ({} bytes)", local_path.display(), bytes.len());

        // Content type is derived from the object key's extension at serve
        // time, so only the key needs to carry it.
        let object_name = format!("images/{}.{extension}", Uuid::new_v4());
        self.inner
            .put(&StorePath::from(object_name.clone()), PutPayload::from(bytes))
            .await
            .map_err(|e| AssetStoreError::UploadFailed(e.to_string()))?;

        let public_url = format!("{}/{}", self.public_base_url, object_name);
        info!("Uploaded {} -> {}", local_path.display(), public_url);
        Ok(public_url)
    }
}
