//! Configuration for the OCR and Markdown stages.
//!
//! Two layers:
//!
//! * [`Settings`] — the credentials and input path, read from the process
//!   environment after pre-populating it from a local `.env` file. Nothing is
//!   validated here; a missing key surfaces when the service rejects it.
//! * [`ConversionConfig`] — behavioural knobs (model, output layout, LLM
//!   options), built via [`ConversionConfigBuilder`].

use crate::error::DocIntelError;
use crate::paths::{OutputLayout, OutputPathPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_ENDPOINT: &str = "AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT";
pub const ENV_KEY: &str = "AZURE_DOCUMENT_INTELLIGENCE_KEY";
pub const ENV_FILE_PATH: &str = "DOCUMENT_FILE_PATH";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_OUTPUT_DIR: &str = "DOCUMENT_OUTPUT_DIR";

/// Document Intelligence REST API version used by default.
pub const DEFAULT_API_VERSION: &str = "2024-11-30";

/// Values sourced from the environment.
///
/// Every field is optional: absent or empty variables become `None`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Document Intelligence endpoint, e.g. `https://<name>.cognitiveservices.azure.com/`.
    pub endpoint: Option<String>,
    /// Document Intelligence subscription key.
    pub key: Option<String>,
    /// Path of the document to analyse.
    pub file_path: Option<String>,
    /// Gemini API key for the Markdown stage.
    pub api_key: Option<String>,
    /// Root directory for [`OutputLayout::Nested`].
    pub output_dir: Option<String>,
}

impl Settings {
    /// Load `.env` (if present) into the process environment, then read the settings.
    pub fn from_env() -> Self {
        Self::report_dotenv(&Self::load_dotenv());
        Self::from_process_env()
    }

    /// Load `.env` into the process environment without logging.
    ///
    /// `Ok(None)` means there was no `.env` file. Pass the outcome to
    /// [`Settings::report_dotenv`] once a subscriber is installed.
    pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
        match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Log the outcome of [`Settings::load_dotenv`].
    pub fn report_dotenv(outcome: &Result<Option<PathBuf>, dotenvy::Error>) {
        match outcome {
            Ok(Some(path)) => tracing::debug!("Loaded settings file {}", path.display()),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }
    }

    /// Read the settings from the process environment as it is now.
    pub fn from_process_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            endpoint: get(ENV_ENDPOINT),
            key: get(ENV_KEY),
            file_path: get(ENV_FILE_PATH),
            api_key: get(ENV_GEMINI_API_KEY),
            output_dir: get(ENV_OUTPUT_DIR),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("key", &redact(&self.key))
            .field("file_path", &self.file_path)
            .field("api_key", &redact(&self.api_key))
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

/// Prebuilt Document Intelligence model used for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OcrModel {
    /// `prebuilt-read`: plain text lines and words. (default)
    #[default]
    Read,
    /// `prebuilt-layout`: text plus paragraphs, roles and tables.
    Layout,
}

impl OcrModel {
    /// Model id in the REST path.
    pub fn model_id(self) -> &'static str {
        match self {
            OcrModel::Read => "prebuilt-read",
            OcrModel::Layout => "prebuilt-layout",
        }
    }
}

/// Configuration for OCR and Markdown conversion.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Extraction model. Default: [`OcrModel::Read`].
    pub ocr_model: OcrModel,

    /// Persist OCR text for local inputs. Default: true.
    pub save_output: bool,

    /// Where outputs are written. Default: [`OutputLayout::Sibling`].
    pub output_layout: OutputLayout,

    /// Root for [`OutputLayout::Nested`]. Default: current directory.
    pub output_root: PathBuf,

    /// REST `api-version` query value. Default: [`DEFAULT_API_VERSION`].
    pub api_version: String,

    /// Delay between status polls when the service sends no `Retry-After`. Default: 1000.
    pub poll_interval_ms: u64,

    /// LLM provider name understood by `edgequake_llm::ProviderFactory`. Default: "gemini".
    pub llm_provider: String,

    /// LLM model id. Default: "gemini-1.5-pro".
    pub llm_model: String,

    /// Sampling temperature for the Markdown rendition. Default: 0.1.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate. Default: 8192.
    pub max_tokens: usize,

    /// Embed the OCR text itself in the prompt. Default: true.
    ///
    /// When false the prompt carries only the document and OCR file paths.
    pub embed_ocr_text: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            ocr_model: OcrModel::default(),
            save_output: true,
            output_layout: OutputLayout::default(),
            output_root: PathBuf::from("."),
            api_version: DEFAULT_API_VERSION.to_string(),
            poll_interval_ms: 1000,
            llm_provider: "gemini".to_string(),
            llm_model: "gemini-1.5-pro".to_string(),
            temperature: 0.1,
            max_tokens: 8192,
            embed_ocr_text: true,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The output path policy selected by `output_layout`.
    pub fn path_policy(&self) -> Box<dyn OutputPathPolicy> {
        self.output_layout.policy(&self.output_root)
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn ocr_model(mut self, model: OcrModel) -> Self {
        self.config.ocr_model = model;
        self
    }

    pub fn save_output(mut self, v: bool) -> Self {
        self.config.save_output = v;
        self
    }

    pub fn output_layout(mut self, layout: OutputLayout) -> Self {
        self.config.output_layout = layout;
        self
    }

    pub fn output_root(mut self, root: impl AsRef<Path>) -> Self {
        self.config.output_root = root.as_ref().to_path_buf();
        self
    }

    pub fn api_version(mut self, v: impl Into<String>) -> Self {
        self.config.api_version = v.into();
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    pub fn llm_provider(mut self, name: impl Into<String>) -> Self {
        self.config.llm_provider = name.into();
        self
    }

    pub fn llm_model(mut self, model: impl Into<String>) -> Self {
        self.config.llm_model = model.into();
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

    pub fn embed_ocr_text(mut self, v: bool) -> Self {
        self.config.embed_ocr_text = v;
        self
    }

    /// Apply the output directory from [`Settings`], if any.
    pub fn settings(mut self, settings: &Settings) -> Self {
        if let Some(ref dir) = settings.output_dir {
            self.config.output_root = PathBuf::from(dir);
        }
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, DocIntelError> {
        let c = &self.config;
        if c.poll_interval_ms == 0 {
            return Err(DocIntelError::InvalidConfig(
                "Poll interval must be ≥ 1ms".into(),
            ));
        }
        if c.api_version.trim().is_empty() {
            return Err(DocIntelError::InvalidConfig(
                "API version must not be empty".into(),
            ));
        }
        if c.llm_provider.trim().is_empty() || c.llm_model.trim().is_empty() {
            return Err(DocIntelError::InvalidConfig(
                "LLM provider and model must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
