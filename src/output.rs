//! Result types.
//!
//! [`AnalyzeResult`] mirrors the subset of the Document Intelligence
//! `analyzeResult` object this crate exposes. Every field defaults so that
//! `prebuilt-read` responses (no tables, no paragraph roles) and
//! `prebuilt-layout` responses deserialise into the same type.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extraction result returned by the OCR service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeResult {
    pub api_version: String,
    pub model_id: String,
    /// Concatenated text of the whole document.
    pub content: String,
    pub pages: Vec<Page>,
    /// Populated by `prebuilt-layout` (and by `prebuilt-read` for some formats).
    pub paragraphs: Vec<Paragraph>,
    /// Populated by `prebuilt-layout` only.
    pub tables: Vec<Table>,
}

impl AnalyzeResult {
    /// True when the service returned no content at all.
    ///
    /// Whitespace-only content still counts as text and is saved.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    /// 1-indexed.
    pub page_number: usize,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit: Option<String>,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Line {
    pub content: String,
    pub polygon: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paragraph {
    /// `title`, `sectionHeading`, `pageHeader`, `footnote`, … when known.
    pub role: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    pub row_count: usize,
    pub column_count: usize,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableCell {
    /// `content`, `columnHeader`, `rowHeader`, … when known.
    pub kind: Option<String>,
    pub row_index: usize,
    pub column_index: usize,
    pub content: String,
}

/// Outcome of the OCR stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    pub result: AnalyzeResult,
    /// Where the text was persisted, if it was.
    pub saved_to: Option<PathBuf>,
}

impl OcrOutput {
    /// Extracted text.
    pub fn text(&self) -> &str {
        &self.result.content
    }
}

/// Outcome of the Markdown stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownOutput {
    /// Markdown exactly as returned by the LLM.
    pub markdown: String,
    /// File the Markdown was written to.
    pub path: PathBuf,
}
