//! Output types: analysed sections, arXiv metadata, and the persisted
//! paper record.
//!
//! The record shape mirrors the document-store schema, so the serde names
//! use the store's camelCase convention (`contentTitle`, `contentBlocks`,
//! `lastPublishDate`). All of these are plain value structs validated where
//! external data enters the crate — nothing here is lazily populated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A titled, ordered unit of analysed document content.
///
/// Created once per converter section, content assembled exactly once, never
/// mutated after being appended to the analysis output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// 1-based position in the document. Contiguous and strictly increasing
    /// in converter order; no two sections share an `order`.
    pub order: usize,
    /// The section heading as given by the converter.
    #[serde(rename = "contentTitle")]
    pub content_title: String,
    /// The reassembled, human-readable body after chunk transformation.
    pub content: String,
}

/// Paper metadata as returned by the arXiv export API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArxivMetadata {
    pub arxiv_id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub updated: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
}

impl ArxivMetadata {
    /// Canonical arXiv abstract-page URL for this paper.
    pub fn abs_url(&self) -> String {
        format!("https://arxiv.org/abs/{}", self.arxiv_id)
    }
}

/// The persisted paper document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    pub title: String,
    pub summary: String,
    pub content_blocks: Vec<Section>,
    pub url: String,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub last_publish_date: Option<DateTime<Utc>>,
}
