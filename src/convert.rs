//! Stage entry points.
//!
//! * [`analyze_document`] — OCR a local file or URL, optionally saving the text.
//! * [`convert_to_markdown`] — render a previously saved OCR text file as Markdown.
//! * [`convert_document`] — both, in order.
//!
//! The stages run strictly one after the other; nothing here spawns tasks.

use crate::config::ConversionConfig;
use crate::error::DocIntelError;
use crate::output::{MarkdownOutput, OcrOutput};
use crate::pipeline::input::DocumentInput;
use crate::pipeline::llm::MarkdownGenerator;
use crate::pipeline::ocr::OcrClient;
use crate::prompts::{markdown_prompt, PromptInput};
use std::path::Path;
use tracing::{debug, info, warn};

/// Characters of extracted text echoed to the log.
pub const PREVIEW_CHARS: usize = 1000;

/// Run OCR on `input` and, when `config.save_output` is set and the input is a
/// local file, write the extracted text to the policy's OCR path.
///
/// Re-running against the same input overwrites the previous text file.
///
/// # Errors
/// - [`DocIntelError::FileNotFound`] if the local file vanished before it was read
/// - [`DocIntelError::ServiceError`] / [`DocIntelError::AuthError`] on any service failure
/// - [`DocIntelError::OutputWriteFailed`] if the text cannot be saved
pub async fn analyze_document(
    client: &dyn OcrClient,
    input: &DocumentInput,
    config: &ConversionConfig,
) -> Result<OcrOutput, DocIntelError> {
    info!("Starting OCR: {}", input.display());

    let source = input.load().await?;
    let result = client.analyze(config.ocr_model, source).await?;
    info!("OCR process complete.");

    if result.is_empty() {
        warn!("No text content found.");
        return Ok(OcrOutput {
            result,
            saved_to: None,
        });
    }

    info!(
        "Extracted Text (first {} chars):\n{}...",
        PREVIEW_CHARS,
        preview(&result.content, PREVIEW_CHARS)
    );

    let saved_to = match input.local_path() {
        Some(document) if config.save_output => {
            let path = config.path_policy().ocr_path(document);
            write_output(&path, &result.content).await?;
            info!("OCR result saved to: {}", path.display());
            Some(path)
        }
        _ => None,
    };

    Ok(OcrOutput { result, saved_to })
}

/// Convenience wrapper: resolve a file path / URL pair, then [`analyze_document`].
///
/// Validation happens before `client` is touched: with neither input the
/// result is [`DocIntelError::MissingInput`], with a missing file it is
/// [`DocIntelError::FileNotFound`].
pub async fn analyze(
    client: &dyn OcrClient,
    file_path: Option<&str>,
    doc_url: Option<&str>,
    config: &ConversionConfig,
) -> Result<OcrOutput, DocIntelError> {
    let input = DocumentInput::from_parts(file_path, doc_url)?;
    analyze_document(client, &input, config).await
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally; do not call from async code.
pub fn analyze_sync(
    client: &dyn OcrClient,
    file_path: Option<&str>,
    doc_url: Option<&str>,
    config: &ConversionConfig,
) -> Result<OcrOutput, DocIntelError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocIntelError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze(client, file_path, doc_url, config))
}

/// Render the saved OCR text of `document` as Markdown and write it to the
/// policy's Markdown path.
///
/// `document` is the original source document, not the OCR file: both output
/// paths derive from its name. The model's reply is written verbatim.
///
/// # Errors
/// - [`DocIntelError::FileNotFound`] if no OCR text file exists for `document`
/// - whatever the generator returns (not retried)
pub async fn convert_to_markdown(
    generator: &dyn MarkdownGenerator,
    document: &Path,
    config: &ConversionConfig,
) -> Result<MarkdownOutput, DocIntelError> {
    let policy = config.path_policy();
    let ocr_path = policy.ocr_path(document);
    info!("Converting {} to Markdown", ocr_path.display());

    let ocr_text = tokio::fs::read_to_string(&ocr_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DocIntelError::FileNotFound {
                path: ocr_path.clone(),
            }
        } else {
            DocIntelError::ReadFailed {
                path: ocr_path.clone(),
                source: e,
            }
        }
    })?;

    let prompt_input = if config.embed_ocr_text {
        PromptInput::Text(&ocr_text)
    } else {
        PromptInput::Paths {
            document,
            ocr: &ocr_path,
        }
    };
    let prompt = markdown_prompt(prompt_input);
    debug!("Prompt is {} chars", prompt.len());

    let markdown = generator.generate(&prompt).await?;

    let path = policy.markdown_path(document);
    write_output(&path, &markdown).await?;
    info!("Markdown file saved to: {}", path.display());

    Ok(MarkdownOutput { markdown, path })
}

/// OCR a local document, save its text, then render it as Markdown.
///
/// The OCR text is always saved here, whatever `config.save_output` says,
/// because the Markdown stage reads it back from disk.
///
/// # Errors
/// [`DocIntelError::InvalidInput`] for a URL input: there is no local name to
/// derive output paths from.
pub async fn convert_document(
    client: &dyn OcrClient,
    generator: &dyn MarkdownGenerator,
    input: &DocumentInput,
    config: &ConversionConfig,
) -> Result<(OcrOutput, MarkdownOutput), DocIntelError> {
    let document = input
        .local_path()
        .ok_or_else(|| DocIntelError::InvalidInput {
            input: input.display(),
            reason: "Markdown conversion needs a local file".to_string(),
        })?
        .to_path_buf();

    let mut ocr_config = config.clone();
    ocr_config.save_output = true;
    let ocr = analyze_document(client, input, &ocr_config).await?;
    if ocr.saved_to.is_none() {
        return Err(DocIntelError::InvalidInput {
            input: input.display(),
            reason: "OCR found no text to convert".to_string(),
        });
    }

    let markdown = convert_to_markdown(generator, &document, config).await?;
    Ok((ocr, markdown))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Write `contents` to `path`, replacing any existing file.
///
/// Writes to a sibling temp file first, then renames, so an interrupted run
/// never leaves a truncated output behind.
async fn write_output(path: &Path, contents: &str) -> Result<(), DocIntelError> {
    let write_err = |e: std::io::Error| DocIntelError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents.as_bytes())
        .await
        .map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
            warn!("Could not remove {}: {}", tmp_path.display(), cleanup);
        }
        return Err(write_err(e));
    }
    Ok(())
}

/// The first `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
