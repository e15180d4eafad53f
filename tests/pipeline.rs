//! End-to-end pipeline tests with stub collaborators.
//!
//! The language model is a deterministic stub that uppercases the excerpt it
//! is asked to transform, so section assembly can be asserted exactly. The
//! asset store is the real local-filesystem adapter backed by tempdirs.

use std::path::Path;
use std::sync::Arc;

use paper_digest::ports::{
    AssetStore, AssetStoreError, ConverterError, LanguageModel, LanguageModelError, PaperStore,
    SectionConverter,
};
use paper_digest::{DocumentAnalyzer, MemoryPaperStore, ObjectAssetStore, PaperRecord};

/// Echoes the excerpt between the prompt's triple-quote fences, uppercased.
/// Prompts without a fenced excerpt get a fixed summary line.
struct UppercaseModel;

#[async_trait::async_trait]
impl LanguageModel for UppercaseModel {
    async fn complete(
        &self,
        _system: Option<&str>,
        user_prompt: &str,
    ) -> Result<String, LanguageModelError> {
        let parts: Vec<&str> = user_prompt.split(r#"""""#).collect();
        if parts.len() >= 2 {
            Ok(parts[1].to_uppercase())
        } else {
            Ok("• 요약".to_string())
        }
    }
}

struct FixedConverter {
    sections: Vec<(String, String)>,
}

#[async_trait::async_trait]
impl SectionConverter for FixedConverter {
    async fn convert(
        &self,
        _bytes: &[u8],
        _stem: &str,
    ) -> Result<Vec<(String, String)>, ConverterError> {
        Ok(self.sections.clone())
    }
}

struct RejectingStore;

#[async_trait::async_trait]
impl AssetStore for RejectingStore {
    async fn upload(&self, local_path: &Path) -> Result<String, AssetStoreError> {
        Err(AssetStoreError::NotFound(local_path.to_path_buf()))
    }
}

fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.7 fake body".to_vec()
}

#[tokio::test]
async fn two_section_document_keeps_order_and_relocates_figures() {
    let source_dir = tempfile::tempdir().unwrap();
    let fig = source_dir.path().join("fig1.png");
    std::fs::write(&fig, b"\x89PNGfake").unwrap();

    let intro = format!(
        "The model attends to all positions.\n\n![fig]({} \"Figure 1\")\n\nIt scales well.",
        fig.display()
    );
    let converter = FixedConverter {
        sections: vec![
            ("Abstract".to_string(), intro),
            ("Method".to_string(), "Multi-head attention is used.".to_string()),
        ],
    };

    let assets_dir = tempfile::tempdir().unwrap();
    let assets: Arc<dyn AssetStore> = Arc::new(
        ObjectAssetStore::local(assets_dir.path().to_path_buf(), "https://cdn.example").unwrap(),
    );
    let model: Arc<dyn LanguageModel> = Arc::new(UppercaseModel);
    let analyzer = DocumentAnalyzer::new(model, Arc::new(converter), assets);

    let sections = analyzer.analyze(&pdf_bytes(), "1706.03762").await.unwrap();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].order, 1);
    assert_eq!(sections[0].content_title, "Abstract");
    assert_eq!(sections[1].order, 2);
    assert_eq!(sections[1].content_title, "Method");

    // Text chunks went through the model, the figure moved to the CDN with
    // its alt text and title intact.
    assert!(sections[0].content.contains("THE MODEL ATTENDS TO ALL POSITIONS."));
    assert!(sections[0].content.contains("![fig](https://cdn.example/images/"));
    assert!(sections[0].content.contains("\"Figure 1\")"));
    assert!(!sections[0].content.contains(&fig.display().to_string()));
    assert_eq!(sections[1].content, "MULTI-HEAD ATTENTION IS USED.");
}

#[tokio::test]
async fn failed_relocation_keeps_original_reference() {
    let converter = FixedConverter {
        sections: vec![(
            "Results".to_string(),
            "See the curve.\n\n![loss](figures/loss.png)".to_string(),
        )],
    };
    let model: Arc<dyn LanguageModel> = Arc::new(UppercaseModel);
    let analyzer = DocumentAnalyzer::new(model, Arc::new(converter), Arc::new(RejectingStore));

    let sections = analyzer.analyze(&pdf_bytes(), "paper").await.unwrap();

    assert_eq!(sections.len(), 1);
    assert!(sections[0].content.contains("SEE THE CURVE."));
    assert!(sections[0].content.contains("![loss](figures/loss.png)"));
}

#[tokio::test]
async fn non_pdf_input_is_rejected() {
    let converter = FixedConverter { sections: Vec::new() };
    let model: Arc<dyn LanguageModel> = Arc::new(UppercaseModel);
    let analyzer = DocumentAnalyzer::new(model, Arc::new(converter), Arc::new(RejectingStore));

    let err = analyzer.analyze(b"<html>not a pdf</html>", "x").await.unwrap_err();
    assert!(matches!(err, paper_digest::DigestError::NotAPdf { .. }));
}

#[tokio::test]
async fn markdown_document_splits_on_headings() {
    let doc = "\
# Introduction

Attention mechanisms are everywhere.

## Background

RNNs process tokens sequentially.
";
    let model: Arc<dyn LanguageModel> = Arc::new(UppercaseModel);
    let converter = FixedConverter { sections: Vec::new() };
    let analyzer = DocumentAnalyzer::new(model, Arc::new(converter), Arc::new(RejectingStore));

    let sections = analyzer.analyze_markdown(doc).await.unwrap();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].content_title, "Introduction");
    assert_eq!(sections[0].content, "ATTENTION MECHANISMS ARE EVERYWHERE.");
    assert_eq!(sections[1].content_title, "Background");
    assert_eq!(sections[1].order, 2);
}

#[tokio::test]
async fn paper_store_round_trips_records() {
    let store = MemoryPaperStore::new();
    let record = PaperRecord {
        title: "Attention Is All You Need".into(),
        summary: "• 요약".into(),
        content_blocks: Vec::new(),
        url: "https://arxiv.org/abs/1706.03762".into(),
        authors: vec!["Ashish Vaswani".into()],
        categories: vec!["cs.CL".into()],
        abstract_text: "The dominant sequence transduction models...".into(),
        last_publish_date: None,
    };

    let id = store.save_paper(&record).await.unwrap();
    assert_eq!(
        store
            .find_paper_id("https://arxiv.org/abs/1706.03762")
            .await
            .unwrap(),
        Some(id)
    );
    assert_eq!(store.records(), vec![record]);
}
