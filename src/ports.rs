//! Collaborator traits consumed by the core pipeline.
//!
//! The pipeline holds no process-wide state: every external capability —
//! language model, structural converter, asset store, paper store — is an
//! explicitly constructed instance passed in behind one of these traits, so
//! the whole core is constructible and testable with stubs.

use std::path::Path;

use async_trait::async_trait;

use crate::error::DigestError;
use crate::output::{ArxivMetadata, PaperRecord};

/// A black-box text completion capability.
///
/// The transformer sends one instruction prompt per text chunk and uses the
/// response verbatim; retry and fallback policy deliberately live outside
/// this crate.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `user_prompt`, optionally preceded by a system instruction.
    async fn complete(
        &self,
        system_prompt: Option<&str>,
        user_prompt: &str,
    ) -> Result<String, LanguageModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LanguageModelError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("api call timed out after {0}s")]
    Timeout(u64),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Structural document conversion: raw PDF bytes → titled markdown sections.
///
/// The returned list order *is* the document reading order. This is an
/// explicit contract, not an incidental property of some map's iteration
/// order: implementations must emit sections in the order a human would
/// read them.
#[async_trait]
pub trait SectionConverter: Send + Sync {
    /// Convert `bytes` into ordered `(title, markup)` pairs. `stem` names
    /// the document for any intermediate artefacts (rendered figure files).
    async fn convert(
        &self,
        bytes: &[u8],
        stem: &str,
    ) -> Result<Vec<(String, String)>, ConverterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("conversion failed: {0}")]
    Failed(String),
}

/// Where papers come from: metadata lookup and document download.
///
/// Fails with the crate's own error taxonomy rather than a colocated enum,
/// since callers act on specific variants ([`DigestError::PaperNotFound`],
/// [`DigestError::UnsupportedContent`]). [`crate::arxiv::ArxivClient`] is the
/// production implementation.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Fetch paper metadata for a normalized id.
    async fn fetch_metadata(&self, arxiv_id: &str) -> Result<ArxivMetadata, DigestError>;

    /// Download the raw document bytes behind `pdf_url`.
    async fn download_pdf(&self, pdf_url: &str) -> Result<Vec<u8>, DigestError>;
}

/// Durable public storage for figure assets.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload the file at `local_path` and return its public URL.
    async fn upload(&self, local_path: &Path) -> Result<String, AssetStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssetStoreError {
    #[error("file not found: {0}")]
    NotFound(std::path::PathBuf),
    #[error("unsupported file extension: {0:?}")]
    UnsupportedExtension(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence for analysed paper records.
#[async_trait]
pub trait PaperStore: Send + Sync {
    /// Persist `record`, returning the stored document id.
    async fn save_paper(&self, record: &PaperRecord) -> Result<String, PaperStoreError>;

    /// Look a paper up by canonical URL; `Some(id)` when it already exists.
    async fn find_paper_id(&self, url: &str) -> Result<Option<String>, PaperStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PaperStoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}
