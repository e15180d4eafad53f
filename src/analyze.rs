//! Document analysis: the top-level orchestrator.
//!
//! Given raw PDF bytes, delegate structural conversion to the
//! [`SectionConverter`], then run every section through the assembler in
//! converter order, assigning contiguous 1-based `order` values. One
//! document is fully analysed before the next begins; there is no internal
//! parallelism across sections or chunks, so ordering holds by construction.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::DigestError;
use crate::markdown;
use crate::output::Section;
use crate::pipeline::assemble;
use crate::ports::{AssetStore, LanguageModel, SectionConverter};

/// Orchestrates conversion, chunk-level transformation, and reassembly for
/// one document at a time.
///
/// Holds no process-wide state: every collaborator is an explicitly
/// constructed instance, so the analyzer is fully stub-testable.
pub struct DocumentAnalyzer {
    model: Arc<dyn LanguageModel>,
    converter: Arc<dyn SectionConverter>,
    assets: Arc<dyn AssetStore>,
}

impl DocumentAnalyzer {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        converter: Arc<dyn SectionConverter>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            model,
            converter,
            assets,
        }
    }

    /// Analyse a raw PDF into ordered, assembled sections.
    ///
    /// # Errors
    /// - [`DigestError::NotAPdf`] when the bytes do not start with `%PDF`
    /// - [`DigestError::ConversionFailed`] when the converter fails; callers
    ///   that want the best-effort "no content available" policy map this to
    ///   an empty section list at their own boundary
    /// - [`DigestError::TransformFailed`] when any text-chunk model call
    ///   fails (no partial section output is ever returned)
    pub async fn analyze(&self, pdf_bytes: &[u8], stem: &str) -> Result<Vec<Section>, DigestError> {
        if pdf_bytes.len() < 4 || &pdf_bytes[..4] != b"%PDF" {
            let mut magic = [0u8; 4];
            let n = pdf_bytes.len().min(4);
            magic[..n].copy_from_slice(&pdf_bytes[..n]);
            return Err(DigestError::NotAPdf { magic });
        }

        info!("Starting content analysis: {stem} ({} bytes)", pdf_bytes.len());
        let pairs = self
            .converter
            .convert(pdf_bytes, stem)
            .await
            .map_err(|e| DigestError::ConversionFailed {
                detail: e.to_string(),
            })?;
        debug!("Converter produced {} sections", pairs.len());

        self.assemble_sections(pairs).await
    }

    /// Analyse an already-converted markdown document.
    ///
    /// Sections are derived from ATX headings via
    /// [`markdown::split_sections`]; useful when conversion happened out of
    /// process and only the chunk pipeline is needed.
    pub async fn analyze_markdown(&self, markdown_doc: &str) -> Result<Vec<Section>, DigestError> {
        let pairs = markdown::split_sections(markdown_doc);
        self.assemble_sections(pairs).await
    }

    async fn assemble_sections(
        &self,
        pairs: Vec<(String, String)>,
    ) -> Result<Vec<Section>, DigestError> {
        let mut sections = Vec::with_capacity(pairs.len());
        for (idx, (title, markup)) in pairs.into_iter().enumerate() {
            let content = assemble::assemble_section(&self.model, &self.assets, &markup).await?;
            sections.push(Section {
                order: idx + 1,
                content_title: title,
                content,
            });
        }
        info!("Analysed {} sections", sections.len());
        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{
        AssetStoreError, ConverterError, LanguageModelError,
    };
    use std::path::Path;

    struct EchoModel;

    #[async_trait::async_trait]
    impl LanguageModel for EchoModel {
        async fn complete(
            &self,
            _system: Option<&str>,
            user_prompt: &str,
        ) -> Result<String, LanguageModelError> {
            Ok(user_prompt
                .split("\"\"\"")
                .nth(1)
                .unwrap_or(user_prompt)
                .trim()
                .to_string())
        }
    }

    struct NoopStore;

    #[async_trait::async_trait]
    impl AssetStore for NoopStore {
        async fn upload(&self, path: &Path) -> Result<String, AssetStoreError> {
            Ok(format!("https://cdn/{}", path.display()))
        }
    }

    struct TwoSectionConverter;

    #[async_trait::async_trait]
    impl SectionConverter for TwoSectionConverter {
        async fn convert(
            &self,
            _bytes: &[u8],
            _stem: &str,
        ) -> Result<Vec<(String, String)>, ConverterError> {
            Ok(vec![
                ("Abstract".to_string(), "the abstract".to_string()),
                ("Method".to_string(), "the method".to_string()),
            ])
        }
    }

    struct FailingConverter;

    #[async_trait::async_trait]
    impl SectionConverter for FailingConverter {
        async fn convert(
            &self,
            _bytes: &[u8],
            _stem: &str,
        ) -> Result<Vec<(String, String)>, ConverterError> {
            Err(ConverterError::Failed("layout model crashed".into()))
        }
    }

    fn analyzer(converter: Arc<dyn SectionConverter>) -> DocumentAnalyzer {
        DocumentAnalyzer::new(Arc::new(EchoModel), converter, Arc::new(NoopStore))
    }

    #[tokio::test]
    async fn sections_get_contiguous_one_based_order() {
        let a = analyzer(Arc::new(TwoSectionConverter));
        let sections = a.analyze(b"%PDF-1.7 rest", "paper").await.unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].order, 1);
        assert_eq!(sections[0].content_title, "Abstract");
        assert_eq!(sections[1].order, 2);
        assert_eq!(sections[1].content_title, "Method");
    }

    #[tokio::test]
    async fn non_pdf_bytes_are_rejected() {
        let a = analyzer(Arc::new(TwoSectionConverter));
        let err = a.analyze(b"<html>nope</html>", "paper").await.unwrap_err();
        assert!(matches!(err, DigestError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn converter_failure_is_explicit() {
        let a = analyzer(Arc::new(FailingConverter));
        let err = a.analyze(b"%PDF-1.7", "paper").await.unwrap_err();
        assert!(matches!(err, DigestError::ConversionFailed { .. }));
    }

    #[tokio::test]
    async fn analyze_markdown_derives_sections_from_headings() {
        let a = analyzer(Arc::new(FailingConverter));
        let sections = a
            .analyze_markdown("# Intro\nhello\n# Outro\nbye")
            .await
            .unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, "hello");
        assert_eq!(sections[1].content_title, "Outro");
    }
}
