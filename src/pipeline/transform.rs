//! Chunk transformation: one language-model call per text chunk.
//!
//! Intentionally thin — the prompt lives in [`crate::prompts`] so it can be
//! tuned without touching dispatch logic, and retry/fallback policy
//! deliberately does not exist here: a failed transformation propagates to
//! the section assembler, because substituting raw untranslated text for a
//! failed summary would corrupt the document silently.

use std::sync::Arc;

use tracing::debug;

use crate::chunk::Chunk;
use crate::error::DigestError;
use crate::ports::LanguageModel;
use crate::prompts;

/// Transform a text chunk through the language model.
///
/// Returns the model's raw textual response unmodified. Errors propagate to
/// the caller; this function performs no retry and produces no fallback text.
pub async fn transform_chunk(
    model: &Arc<dyn LanguageModel>,
    chunk: &Chunk,
) -> Result<String, DigestError> {
    debug!("Transforming text chunk ({} bytes)", chunk.content.len());
    let prompt = prompts::content_analysis_prompt(&chunk.content);
    model
        .complete(None, &prompt)
        .await
        .map_err(|e| DigestError::TransformFailed {
            detail: e.to_string(),
        })
}

/// Summarise a paper abstract into the structured bullet-point form.
pub async fn summarize_abstract(
    model: &Arc<dyn LanguageModel>,
    title: &str,
    abstract_text: &str,
    system_prompt_override: Option<&str>,
) -> Result<String, DigestError> {
    let system = system_prompt_override.unwrap_or(prompts::SUMMARY_SYSTEM_PROMPT);
    let user = prompts::summary_user_prompt(abstract_text, title);
    model
        .complete(Some(system), &user)
        .await
        .map_err(|e| DigestError::SummaryFailed {
            title: title.to_string(),
            detail: e.to_string(),
        })
}
