//! # paper-digest
//!
//! Turn an arXiv paper into a summarised, figure-hosted markdown record.
//!
//! The pipeline fetches metadata and the PDF, converts the PDF into titled
//! markdown sections, then processes each section chunk by chunk: text chunks
//! are rewritten by an LLM, image chunks have their figures re-hosted on
//! durable object storage, and the results are reassembled in reading order.
//!
//! ```text
//! arXiv id ──▶ metadata ──▶ abstract summary
//!     │
//!     └─▶ PDF ──▶ sections ──▶ chunks ──▶ transform / relocate ──▶ PaperRecord
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use paper_digest::{AnalysisConfig, ArxivClient, DocumentAnalyzer, MemoryPaperStore};
//! use paper_digest::{process_paper, resolve_language_model, PaperMessage};
//! # use paper_digest::ports::{PaperSource, PaperStore, SectionConverter};
//! # fn converter() -> Arc<dyn SectionConverter> { unimplemented!() }
//! # fn assets() -> Arc<dyn paper_digest::ports::AssetStore> { unimplemented!() }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnalysisConfig::builder().model("gpt-4o-mini").build()?;
//! let model = resolve_language_model(&config)?;
//! let source: Arc<dyn PaperSource> = Arc::new(ArxivClient::new(config.download_timeout_secs)?);
//! let analyzer = DocumentAnalyzer::new(Arc::clone(&model), converter(), assets());
//! let papers: Arc<dyn PaperStore> = Arc::new(MemoryPaperStore::new());
//!
//! let message = PaperMessage {
//!     user_id: "u-1".into(),
//!     paper_id: "1706.03762".into(),
//! };
//! let outcome = process_paper(&message, &config, &source, &model, &analyzer, &papers).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Collaborators
//!
//! Every external capability sits behind a trait in [`ports`]:
//! [`ports::LanguageModel`] (backed by `edgequake-llm` via
//! [`resolve_language_model`]), [`ports::PaperSource`] (see [`ArxivClient`]),
//! [`ports::SectionConverter`], [`ports::AssetStore`] (see
//! [`store::ObjectAssetStore`]) and [`ports::PaperStore`]. Tests plug in
//! stubs; production wires real backends.

pub mod analyze;
pub mod arxiv;
pub mod chunk;
pub mod config;
pub mod error;
pub mod handler;
pub mod llm;
pub mod markdown;
pub mod output;
pub mod pipeline;
pub mod ports;
pub mod prompts;
pub mod store;

pub use analyze::DocumentAnalyzer;
pub use arxiv::ArxivClient;
pub use chunk::{Chunk, ChunkKind};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::{ChunkError, DigestError};
pub use handler::{process_paper, PaperMessage, ProcessOutcome};
pub use llm::{resolve_language_model, ProviderLanguageModel};
pub use output::{ArxivMetadata, PaperRecord, Section};
pub use store::{MemoryPaperStore, ObjectAssetStore};
