//! Command-line front end for one-shot paper processing.
//!
//! Fetches metadata and summarises the abstract for an arXiv id. With
//! `--markdown`, a pre-converted markdown document is analysed into content
//! blocks too; figure files referenced by local paths are re-hosted under
//! `--assets-dir`. The resulting record is printed (or written) as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use paper_digest::ports::{AssetStore, ConverterError, SectionConverter};
use paper_digest::{
    pipeline::transform, AnalysisConfig, ArxivClient, DocumentAnalyzer, ObjectAssetStore,
    PaperRecord,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "paper-digest", version, about = "Summarise and digest arXiv papers")]
struct Cli {
    /// arXiv id (e.g. 1706.03762 or 1706.03762v7)
    arxiv_id: String,

    /// Pre-converted markdown document to analyse into content blocks.
    /// Without it, only the metadata and abstract summary are produced.
    #[arg(long)]
    markdown: Option<PathBuf>,

    /// Directory receiving re-hosted figure files
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,

    /// Public URL prefix under which uploaded figures resolve
    #[arg(long, default_value = "http://localhost:8080/assets")]
    public_base_url: String,

    /// LLM model identifier
    #[arg(long)]
    model: Option<String>,

    /// LLM provider name (openai, anthropic, ollama, ...)
    #[arg(long)]
    provider: Option<String>,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.1)]
    temperature: f32,

    /// Write the record JSON here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Placeholder converter for the markdown-input path, which never calls it.
struct NoConverter;

#[async_trait::async_trait]
impl SectionConverter for NoConverter {
    async fn convert(
        &self,
        _bytes: &[u8],
        _stem: &str,
    ) -> Result<Vec<(String, String)>, ConverterError> {
        Err(ConverterError::Failed(
            "no PDF converter configured; pass --markdown".into(),
        ))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut builder = AnalysisConfig::builder().temperature(cli.temperature);
    if let Some(model) = &cli.model {
        builder = builder.model(model);
    }
    if let Some(provider) = &cli.provider {
        builder = builder.provider_name(provider);
    }
    let config = builder.build()?;

    let model = paper_digest::resolve_language_model(&config)
        .context("failed to resolve an LLM provider")?;

    let client = ArxivClient::new(config.download_timeout_secs)?;
    let metadata = client.fetch_metadata(&cli.arxiv_id).await?;
    eprintln!("Title: {}", metadata.title);

    let summary = transform::summarize_abstract(
        &model,
        &metadata.title,
        &metadata.abstract_text,
        config.summary_system_prompt.as_deref(),
    )
    .await?;

    let content_blocks = match &cli.markdown {
        Some(path) => {
            let doc = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let assets: Arc<dyn AssetStore> = Arc::new(ObjectAssetStore::local(
                cli.assets_dir.clone(),
                &cli.public_base_url,
            )?);
            let analyzer =
                DocumentAnalyzer::new(Arc::clone(&model), Arc::new(NoConverter), assets);
            analyzer.analyze_markdown(&doc).await?
        }
        None => {
            warn!("No --markdown input; producing a summary-only record");
            Vec::new()
        }
    };

    let record = PaperRecord {
        title: metadata.title.clone(),
        summary,
        content_blocks,
        url: metadata.abs_url(),
        authors: metadata.authors.clone(),
        categories: metadata.categories.clone(),
        abstract_text: metadata.abstract_text.clone(),
        last_publish_date: metadata.updated,
    };

    let json = serde_json::to_string_pretty(&record)?;
    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, &json)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "paper_digest=info",
        1 => "paper_digest=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
