//! Image relocation: move a figure referenced by a local path to durable
//! public storage and rewrite its token.
//!
//! ## Failure policy
//!
//! Relocation failure is non-fatal by design. A converted section can
//! reference figures that never materialised, or the asset store can be
//! briefly unreachable; in both cases the original token is returned
//! unchanged so the surrounding text still renders. The failure is logged,
//! never propagated — callers cannot distinguish "relocated" from
//! "left as-is" except by inspecting the returned token, and that is the
//! point: a broken image reference degrades gracefully rather than failing
//! the whole document.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::chunk::{extract_image_url, replace_image_url, Chunk};
use crate::error::ChunkError;
use crate::ports::AssetStore;

/// Relocate an image chunk's asset and rewrite its locator.
///
/// Returns the rewritten token on success, or the original token content
/// unchanged on any failure (extraction, upload, or rewrite).
pub async fn relocate_chunk(store: &Arc<dyn AssetStore>, chunk: &Chunk) -> String {
    match try_relocate(store, chunk).await {
        Ok(token) => token,
        Err(e) => {
            warn!("Image relocation failed, keeping original token: {e}");
            chunk.content.clone()
        }
    }
}

async fn try_relocate(store: &Arc<dyn AssetStore>, chunk: &Chunk) -> Result<String, ChunkError> {
    let locator =
        extract_image_url(&chunk.content).ok_or_else(|| ChunkError::ExtractionFailed {
            token: chunk.content.clone(),
        })?;

    let public_url = store
        .upload(Path::new(&locator))
        .await
        .map_err(|e| ChunkError::UploadFailed {
            source_path: locator.clone().into(),
            detail: e.to_string(),
        })?;

    debug!("Relocated '{locator}' -> '{public_url}'");
    Ok(replace_image_url(&chunk.content, &public_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::AssetStoreError;
    use std::path::PathBuf;

    struct FixedStore {
        url: Option<String>,
    }

    #[async_trait::async_trait]
    impl AssetStore for FixedStore {
        async fn upload(&self, local_path: &Path) -> Result<String, AssetStoreError> {
            match &self.url {
                Some(u) => Ok(u.clone()),
                None => Err(AssetStoreError::NotFound(PathBuf::from(local_path))),
            }
        }
    }

    #[tokio::test]
    async fn relocates_and_preserves_title() {
        let store: Arc<dyn AssetStore> = Arc::new(FixedStore {
            url: Some("https://cdn/fig1.png".into()),
        });
        let chunk = Chunk::image(r#"![fig](local/fig1.png "Figure 1")"#);
        let out = relocate_chunk(&store, &chunk).await;
        assert_eq!(out, r#"![fig](https://cdn/fig1.png "Figure 1")"#);
    }

    #[tokio::test]
    async fn upload_failure_returns_original_token() {
        let store: Arc<dyn AssetStore> = Arc::new(FixedStore { url: None });
        let chunk = Chunk::image("![fig](local/fig1.png)");
        let out = relocate_chunk(&store, &chunk).await;
        assert_eq!(out, "![fig](local/fig1.png)");
    }

    #[tokio::test]
    async fn unparseable_token_returns_original() {
        let store: Arc<dyn AssetStore> = Arc::new(FixedStore {
            url: Some("https://cdn/x.png".into()),
        });
        let chunk = Chunk::image("not actually an image token");
        let out = relocate_chunk(&store, &chunk).await;
        assert_eq!(out, "not actually an image token");
    }
}
