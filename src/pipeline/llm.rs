//! Generative-model interaction for the Markdown stage.
//!
//! The stage only needs "submit prompt, get text", so that is the whole
//! [`MarkdownGenerator`] surface. [`LlmMarkdownGenerator`] adapts an
//! `edgequake_llm` provider built once at startup; tests plug in a fake.

use crate::config::{ConversionConfig, Settings};
use crate::error::DocIntelError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Turns a prompt into Markdown text.
#[async_trait]
pub trait MarkdownGenerator: Send + Sync {
    /// Return the model's reply verbatim.
    async fn generate(&self, prompt: &str) -> Result<String, DocIntelError>;
}

/// [`MarkdownGenerator`] backed by an `edgequake_llm` provider.
pub struct LlmMarkdownGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl LlmMarkdownGenerator {
    /// Wrap an already-constructed provider.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &ConversionConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }

    /// Build the configured provider (Gemini by default).
    ///
    /// The provider reads its key from the environment, which
    /// [`Settings::from_env`] has already populated from `.env`.
    pub fn from_settings(
        settings: &Settings,
        config: &ConversionConfig,
    ) -> Result<Self, DocIntelError> {
        if config.llm_provider == "gemini" && settings.api_key.is_none() {
            return Err(DocIntelError::ProviderNotConfigured {
                provider: config.llm_provider.clone(),
                hint: "Set GEMINI_API_KEY in the environment or in .env".to_string(),
            });
        }

        let provider = ProviderFactory::create_llm_provider(&config.llm_provider, &config.llm_model)
            .map_err(|e| DocIntelError::ProviderNotConfigured {
                provider: config.llm_provider.clone(),
                hint: format!("{e}"),
            })?;

        Ok(Self::new(provider, config))
    }
}

#[async_trait]
impl MarkdownGenerator for LlmMarkdownGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DocIntelError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::user(prompt)];

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| DocIntelError::LlmApiError {
                message: format!("{e}"),
            })?;

        debug!(
            "Markdown generated: {} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(response.content)
    }
}

/// Build `CompletionOptions` from the conversion config.
fn build_options(config: &ConversionConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
