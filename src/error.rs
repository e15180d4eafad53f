//! Error types for the paper-digest library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DigestError`] — **Fatal**: the analysis cannot proceed or must not
//!   produce partial output (metadata lookup failed, document is not a PDF,
//!   structural conversion failed, a text-chunk transformation failed).
//!   Returned as `Err(DigestError)` from the top-level entry points.
//!
//! * [`ChunkError`] — **Non-fatal**: a single image chunk failed to relocate
//!   (unparseable token or upload failure). Absorbed by the image relocator,
//!   which falls back to the original token so the surrounding text still
//!   renders.
//!
//! The asymmetry is deliberate: a missing image degrades gracefully, but a
//! missing or garbled summary must never be silently substituted with raw
//! untransformed text. User-visible failure is "no analysed content for this
//! paper", never a corrupted or partially-translated document.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the paper-digest library.
///
/// Image-chunk failures use [`ChunkError`] and are handled inside the
/// relocator rather than propagated here.
#[derive(Debug, Error)]
pub enum DigestError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input string is not an arXiv id or abs/pdf URL we understand.
    #[error("Invalid arXiv identifier '{input}': expected an id like '2301.00001' or an arxiv.org abs/pdf URL")]
    InvalidArxivId { input: String },

    /// The arXiv export API returned no entry for the id.
    #[error("Paper not found on arXiv: '{arxiv_id}'")]
    PaperNotFound { arxiv_id: String },

    /// The arXiv export API call failed or its feed could not be parsed.
    #[error("Failed to fetch arXiv metadata for '{arxiv_id}': {reason}")]
    MetadataFetchFailed { arxiv_id: String, reason: String },

    /// HTTP download of the PDF failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease the download timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The server answered with something other than a PDF.
    #[error("Unsupported content type '{content_type}' for '{url}': expected application/pdf")]
    UnsupportedContent { url: String, content_type: String },

    /// The byte stream was fetched but does not start with the PDF magic.
    #[error("Document is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { magic: [u8; 4] },

    // ── Analysis errors ───────────────────────────────────────────────────
    /// Structural document conversion failed; no sections were produced.
    #[error("Document conversion failed: {detail}")]
    ConversionFailed { detail: String },

    /// The language model call for a text chunk failed.
    ///
    /// Fatal to the enclosing section: partial or raw-text output is never
    /// substituted for a failed transformation.
    #[error("Chunk transformation failed: {detail}")]
    TransformFailed { detail: String },

    /// The abstract-summary language model call failed.
    #[error("Abstract summarisation failed for '{title}': {detail}")]
    SummaryFailed { title: String, detail: String },

    // ── Collaborator errors ───────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The paper store rejected a save/lookup.
    #[error("Paper store operation failed: {detail}")]
    StoreFailed { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single image chunk.
///
/// Never escapes the relocator: on any variant the original image token is
/// returned unchanged and the failure is logged.
#[derive(Debug, Clone, Error)]
pub enum ChunkError {
    /// No resource locator could be parsed out of the image token.
    #[error("could not extract a locator from image token: {token:?}")]
    ExtractionFailed { token: String },

    /// The asset upload failed (missing source file, network, storage).
    #[error("upload failed for {source_path:?}: {detail}")]
    UploadFailed { source_path: PathBuf, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_content_display() {
        let e = DigestError::UnsupportedContent {
            url: "https://arxiv.org/pdf/x.pdf".into(),
            content_type: "text/html".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("text/html"), "got: {msg}");
        assert!(msg.contains("application/pdf"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = DigestError::NotAPdf { magic: *b"<htm" };
        assert!(e.to_string().contains("not a valid PDF"));
    }

    #[test]
    fn chunk_error_extraction_display() {
        let e = ChunkError::ExtractionFailed {
            token: "![broken".into(),
        };
        assert!(e.to_string().contains("![broken"));
    }

    #[test]
    fn transform_failed_display() {
        let e = DigestError::TransformFailed {
            detail: "429 rate limited".into(),
        };
        assert!(e.to_string().contains("429"));
    }
}
