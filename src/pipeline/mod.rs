//! Pipeline stages for document-to-Markdown conversion.
//!
//! Each submodule implements one step and owns the only network or disk seam
//! of that step, so tests can substitute a fake at the trait boundary.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ ocr ──▶ (OCR text file) ──▶ llm ──▶ (Markdown file)
//! (path/URL)  (Azure)                   (Gemini)
//! ```
//!
//! 1. [`input`] — validate the file path / URL pair before any service call
//! 2. [`ocr`]   — submit to Document Intelligence and wait for the
//!    long-running operation
//! 3. [`llm`]   — send the Markdown prompt to the generative model

pub mod input;
pub mod llm;
pub mod ocr;
