//! Pipeline stages for section analysis.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets implementations be
//! swapped (a different asset store, a different model) without touching the
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! section markup ──▶ split ──▶ per chunk ──▶ join
//!   (markdown)     (chunk.rs)  Text  → transform (LLM)
//!                              Image → relocate  (asset store)
//! ```
//!
//! Chunk processing is strictly sequential: the join preserves original
//! chunk order by construction, with no re-sorting step.

pub mod assemble;
pub mod relocate;
pub mod transform;
