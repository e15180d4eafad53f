//! Language-model wiring: edgequake-llm providers behind the
//! [`LanguageModel`] port.
//!
//! The pipeline itself only knows the narrow [`LanguageModel`] trait, so
//! tests run against stubs. Production callers wrap any
//! [`edgequake_llm::LLMProvider`] in [`ProviderLanguageModel`], or let
//! [`resolve_language_model`] pick a provider from the config/environment.

use std::sync::Arc;
use std::time::Duration;

use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::DigestError;
use crate::ports::{LanguageModel, LanguageModelError};

/// Model used when a provider is named without an explicit model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Adapter: an edgequake-llm chat provider exposed as a [`LanguageModel`].
///
/// Applies the configured sampling options and wraps every call in the
/// configured hard timeout — the only cancellation point the pipeline has.
pub struct ProviderLanguageModel {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
    timeout_secs: u64,
}

impl ProviderLanguageModel {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &AnalysisConfig) -> Self {
        Self {
            provider,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.api_timeout_secs,
        }
    }

    fn options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl LanguageModel for ProviderLanguageModel {
    async fn complete(
        &self,
        system_prompt: Option<&str>,
        user_prompt: &str,
    ) -> Result<String, LanguageModelError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(user_prompt));

        let options = self.options();
        let call = self.provider.chat(&messages, Some(&options));

        let response = tokio::time::timeout(Duration::from_secs(self.timeout_secs), call)
            .await
            .map_err(|_| LanguageModelError::Timeout(self.timeout_secs))?
            .map_err(|e| LanguageModelError::ApiRequestFailed(e.to_string()))?;

        debug!(
            "LLM call: {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );
        Ok(response.content)
    }
}

/// Resolve the language model from config and environment.
///
/// Sources are consulted most-specific first: a pre-built
/// `config.provider` wins outright, then a `config.provider_name` (with
/// `config.model` or the crate default), then the
/// `EDGEQUAKE_LLM_PROVIDER`/`EDGEQUAKE_MODEL` variable pair, then OpenAI if
/// `OPENAI_API_KEY` is set, then whatever [`ProviderFactory::from_env`] can
/// detect. A summarisation run should never fail just because the caller
/// left provider selection to the deployment environment.
pub fn resolve_language_model(
    config: &AnalysisConfig,
) -> Result<Arc<dyn LanguageModel>, DigestError> {
    let provider = resolve_provider(config)?;
    Ok(Arc::new(ProviderLanguageModel::new(provider, config)))
}

fn resolve_provider(config: &AnalysisConfig) -> Result<Arc<dyn LLMProvider>, DigestError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    // An OpenAI key short-circuits detection: with several provider keys in
    // the environment the choice must not depend on factory scan order.
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_provider("openai", model);
        }
    }

    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| DigestError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No provider key found in the environment. Export an API key \
                (OPENAI_API_KEY, ANTHROPIC_API_KEY, ...) or set `provider_name` \
                on AnalysisConfig. Detection error: {e}"
            ),
        })?;

    Ok(provider)
}

fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, DigestError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        DigestError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
