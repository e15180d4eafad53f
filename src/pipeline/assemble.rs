//! Section assembly: split, dispatch per chunk, rejoin in order.
//!
//! The assembler is the order-preservation contract of the whole pipeline:
//! chunks are processed strictly sequentially and joined in the order the
//! splitter produced them. There is no internal parallelism and therefore no
//! re-sorting step — order holds by construction.

use std::sync::Arc;

use crate::chunk::{split_text_and_images, ChunkKind};
use crate::error::DigestError;
use crate::pipeline::{relocate, transform};
use crate::ports::{AssetStore, LanguageModel};

/// Assemble one section body from its markup.
///
/// Each chunk in splitter order is either relocated (Image — wrapped in a
/// leading and trailing line break so the token sits on its own paragraph
/// when re-embedded) or transformed (Text — model response used verbatim).
/// Per-chunk results are joined with a single line break.
///
/// # Errors
/// Only the language-model call can fail out of this function; the image
/// relocator absorbs its own failures. A transform failure leaves the
/// section unproduced — the caller decides whether to abort or skip.
pub async fn assemble_section(
    model: &Arc<dyn LanguageModel>,
    assets: &Arc<dyn AssetStore>,
    section_markup: &str,
) -> Result<String, DigestError> {
    let chunks = split_text_and_images(section_markup);
    let mut parts = Vec::with_capacity(chunks.len());

    for chunk in &chunks {
        match chunk.kind {
            ChunkKind::Image => {
                let token = relocate::relocate_chunk(assets, chunk).await;
                parts.push(format!("\n{token}\n"));
            }
            ChunkKind::Text => {
                parts.push(transform::transform_chunk(model, chunk).await?);
            }
        }
    }

    Ok(parts.join("\n"))
}
