//! Per-paper processing flow, from an incoming message to a saved record.
//!
//! The handler is transport-agnostic: it takes a decoded [`PaperMessage`] and
//! injected collaborators, so it works equally behind a queue consumer or the
//! CLI. The duplicate check runs before any fetch, keyed on the canonical abs
//! URL derived from the id alone. Only the abstract summary is load-bearing;
//! section analysis failures degrade to a record with empty content blocks
//! rather than losing the paper.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::analyze::DocumentAnalyzer;
use crate::arxiv;
use crate::config::AnalysisConfig;
use crate::error::DigestError;
use crate::output::PaperRecord;
use crate::pipeline::transform;
use crate::ports::{LanguageModel, PaperSource, PaperStore};

/// Incoming work item naming one paper to process.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperMessage {
    pub user_id: String,
    pub paper_id: String,
}

/// What the handler did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The paper was already stored; nothing to do.
    AlreadyExists { id: String },
    /// A new record was analysed and persisted.
    Saved { id: String, section_count: usize },
}

/// Process one paper end to end.
///
/// Steps:
/// 1. Normalize the id and skip if the paper is already stored (no fetch)
/// 2. Fetch metadata from the paper source
/// 3. Summarize the abstract (fatal on failure)
/// 4. Download the PDF and run full section analysis (best effort)
/// 5. Persist the assembled [`PaperRecord`]
pub async fn process_paper(
    message: &PaperMessage,
    config: &AnalysisConfig,
    source: &Arc<dyn PaperSource>,
    model: &Arc<dyn LanguageModel>,
    analyzer: &DocumentAnalyzer,
    papers: &Arc<dyn PaperStore>,
) -> Result<ProcessOutcome, DigestError> {
    let clean_id = arxiv::normalize_arxiv_id(&message.paper_id);
    if clean_id.is_empty() {
        return Err(DigestError::InvalidArxivId {
            input: message.paper_id.clone(),
        });
    }
    info!("Processing paper {clean_id} for user {}", message.user_id);

    // Step 1: dedupe on the canonical abs URL, derived from the id alone so
    // an already-stored paper costs no network round trip.
    let abs_url = format!("https://arxiv.org/abs/{clean_id}");
    if let Some(existing_id) = papers
        .find_paper_id(&abs_url)
        .await
        .map_err(|e| DigestError::StoreFailed {
            detail: e.to_string(),
        })?
    {
        info!("Paper already stored as {existing_id}, skipping");
        return Ok(ProcessOutcome::AlreadyExists { id: existing_id });
    }

    let metadata = source.fetch_metadata(&clean_id).await?;

    // Step 2: abstract summary. Without it the record is useless, so any
    // failure here fails the message.
    let summary = transform::summarize_abstract(
        model,
        &metadata.title,
        &metadata.abstract_text,
        config.summary_system_prompt.as_deref(),
    )
    .await?;

    // Step 3: full-text analysis, best effort.
    let content_blocks = match analyze_full_text(source, analyzer, &clean_id).await {
        Ok(sections) => sections,
        Err(e) => {
            error!("Full-text analysis failed for {clean_id}: {e}");
            Vec::new()
        }
    };
    if content_blocks.is_empty() {
        warn!("Saving {clean_id} with no content blocks");
    }

    let section_count = content_blocks.len();
    let record = PaperRecord {
        title: metadata.title.clone(),
        summary,
        content_blocks,
        url: abs_url,
        authors: metadata.authors.clone(),
        categories: metadata.categories.clone(),
        abstract_text: metadata.abstract_text.clone(),
        last_publish_date: metadata.updated,
    };

    let id = papers
        .save_paper(&record)
        .await
        .map_err(|e| DigestError::StoreFailed {
            detail: e.to_string(),
        })?;
    info!("Saved paper {clean_id} as {id} ({section_count} sections)");
    Ok(ProcessOutcome::Saved { id, section_count })
}

async fn analyze_full_text(
    source: &Arc<dyn PaperSource>,
    analyzer: &DocumentAnalyzer,
    clean_id: &str,
) -> Result<Vec<crate::output::Section>, DigestError> {
    let pdf_url = arxiv::pdf_url_for_id(clean_id);
    let pdf_bytes = source.download_pdf(&pdf_url).await?;
    // arXiv ids contain slashes in the old scheme; flatten for the stem.
    let stem = clean_id.replace('/', "_");
    analyzer.analyze(&pdf_bytes, &stem).await
}
