//! # docintel2md
//!
//! Extract text from documents with Azure AI Document Intelligence and render
//! it as Markdown with a generative model (Gemini by default).
//!
//! ## Pipeline Overview
//!
//! ```text
//! document (file or URL)
//!  │
//!  ├─ 1. Input     validate the path / URL before any network call
//!  ├─ 2. OCR       prebuilt-read or prebuilt-layout, long-running operation
//!  ├─ 3. Save      <stem>_ocr.txt (sibling or outputs/ocr/)
//!  ├─ 4. LLM       fixed Markdown prompt + OCR text
//!  └─ 5. Output    <stem>.md (sibling or output/markdown/)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docintel2md::{analyze, AzureDocumentIntelligence, ConversionConfig, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env();
//!     let config = ConversionConfig::builder().settings(&settings).build()?;
//!     let client = AzureDocumentIntelligence::from_settings(&settings, &config)?;
//!     let output = analyze(&client, settings.file_path.as_deref(), None, &config).await?;
//!     println!("{}", output.text());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docintel2md` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, OcrModel, Settings};
pub use convert::{analyze, analyze_document, analyze_sync, convert_document, convert_to_markdown};
pub use error::{DocIntelError, ErrorKind};
pub use output::{AnalyzeResult, MarkdownOutput, OcrOutput};
pub use paths::{NestedPaths, OutputLayout, OutputPathPolicy, SiblingPaths};
pub use pipeline::input::DocumentInput;
pub use pipeline::llm::{LlmMarkdownGenerator, MarkdownGenerator};
pub use pipeline::ocr::{AzureDocumentIntelligence, DocumentSource, OcrClient};
