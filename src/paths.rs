//! Output path policies.
//!
//! Both stages derive their output file from the *source document* path, so
//! the OCR text of `scans/invoice.pdf` and its Markdown rendition always share
//! the `invoice` stem. Where those files land is a policy chosen by
//! configuration ([`OutputLayout`]) rather than hardcoded per stage.
//!
//! | Layout    | OCR text                                | Markdown                              |
//! |-----------|-----------------------------------------|---------------------------------------|
//! | `Sibling` | `scans/invoice_ocr.txt`                 | `scans/invoice.md`                    |
//! | `Nested`  | `<root>/outputs/ocr/invoice_ocr.txt`    | `<root>/output/markdown/invoice.md`   |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Suffix appended to the document stem for the OCR text file.
pub const OCR_SUFFIX: &str = "_ocr.txt";

/// Extension of the Markdown rendition.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Maps a source document path to the files the pipeline writes.
pub trait OutputPathPolicy: Send + Sync {
    /// Where the extracted OCR text for `document` is stored.
    fn ocr_path(&self, document: &Path) -> PathBuf;

    /// Where the Markdown rendition of `document` is stored.
    fn markdown_path(&self, document: &Path) -> PathBuf;
}

/// Outputs are written next to the source document.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiblingPaths;

impl OutputPathPolicy for SiblingPaths {
    fn ocr_path(&self, document: &Path) -> PathBuf {
        document.with_file_name(format!("{}{}", file_stem(document), OCR_SUFFIX))
    }

    fn markdown_path(&self, document: &Path) -> PathBuf {
        document.with_file_name(format!("{}.{}", file_stem(document), MARKDOWN_EXTENSION))
    }
}

/// Outputs are collected under a single root directory.
#[derive(Debug, Clone)]
pub struct NestedPaths {
    pub root: PathBuf,
}

impl NestedPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputPathPolicy for NestedPaths {
    fn ocr_path(&self, document: &Path) -> PathBuf {
        self.root
            .join("outputs")
            .join("ocr")
            .join(format!("{}{}", file_stem(document), OCR_SUFFIX))
    }

    fn markdown_path(&self, document: &Path) -> PathBuf {
        self.root
            .join("output")
            .join("markdown")
            .join(format!("{}.{}", file_stem(document), MARKDOWN_EXTENSION))
    }
}

/// Which [`OutputPathPolicy`] to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputLayout {
    /// [`SiblingPaths`] (default).
    #[default]
    Sibling,
    /// [`NestedPaths`] rooted at the configured output directory.
    Nested,
}

impl OutputLayout {
    /// Instantiate the policy for this layout.
    ///
    /// `root` is ignored by [`OutputLayout::Sibling`].
    pub fn policy(self, root: &Path) -> Box<dyn OutputPathPolicy> {
        match self {
            OutputLayout::Sibling => Box::new(SiblingPaths),
            OutputLayout::Nested => Box::new(NestedPaths::new(root)),
        }
    }
}

/// Base name without the final extension. Names with no extension are kept whole.
fn file_stem(document: &Path) -> String {
    document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
