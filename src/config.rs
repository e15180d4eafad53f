//! Configuration for paper analysis.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks and to diff two runs to understand
//! why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; new fields never break existing call sites.

use std::fmt;
use std::sync::Arc;

use edgequake_llm::LLMProvider;

use crate::error::DigestError;

/// Configuration for an analysis run.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use paper_digest::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .model("gpt-4o-mini")
///     .temperature(0.1)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// LLM model identifier, e.g. "gpt-4o-mini". If None, uses the provider
    /// default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is auto-detected from the
    /// environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    /// Useful in tests or when the caller needs custom middleware.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for LLM completions. Default: 0.1.
    ///
    /// Low temperature keeps the model faithful to the source text, which is
    /// what summarisation and translation of academic prose needs. Higher
    /// values introduce paraphrasing drift.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate per chunk. Default: 4096.
    ///
    /// Dense sections (reference lists, long tables) can exceed 2 000 output
    /// tokens; setting this too low silently truncates mid-sentence.
    pub max_tokens: usize,

    /// Custom system prompt for abstract summarisation. If None, uses the
    /// built-in default from [`crate::prompts`].
    pub summary_system_prompt: Option<String>,

    /// Per-LLM-call timeout in seconds. Default: 60.
    ///
    /// The core has no cancellation of its own; this is the boundary wrap
    /// around each external model call.
    pub api_timeout_secs: u64,

    /// Download timeout for PDF and metadata fetches in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.1,
            max_tokens: 4096,
            summary_system_prompt: None,
            api_timeout_secs: 60,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn summary_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.summary_system_prompt = Some(prompt.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, DigestError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(DigestError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(DigestError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
