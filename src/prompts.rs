//! Prompt used for the OCR-text → Markdown rendition.
//!
//! The guidelines are fixed; only the `Input:` section varies. By default it
//! carries the OCR text itself. [`PromptInput::Paths`] reproduces the older
//! behaviour of sending only the document and OCR file paths, which leaves the
//! model nothing to convert unless it can resolve the paths on its own.

use std::path::Path;

/// Guidelines preceding the input section.
pub const MARKDOWN_GUIDELINES: &str = r#"You are an expert in converting OCR text into well-structured Markdown documents.
You will be provided with the OCR text extracted from an image or document.
Your task is to analyze this text and reformat it into a clean, readable Markdown document,
preserving the original document's structure as much as possible.

Here are the guidelines:

1. Headings: Identify headings and subheadings based on font size, positioning, and surrounding text.
Use appropriate Markdown heading levels (e.g., # for main title, ## for section headings, ### for sub-sections).

2. Lists: Detect bulleted or numbered lists and format them using Markdown list syntax (* for unordered, 1. 2. 3. for ordered).

3. Tables: Identify tabular data. Format tables using Markdown table syntax. Ensure proper column alignment.
If the table has a header row, clearly mark it.

4. Emphasis: Use Markdown's emphasis syntax (*italics* or **bold**) where appropriate to highlight key words or phrases,
mimicking the original document's emphasis.

5. Paragraphs: Separate paragraphs with blank lines.

6. Code Blocks: If the document contains code snippets, format them using Markdown code blocks (```).
Specify the programming language if possible.

7. Links: Identify and preserve any URLs or links using Markdown link syntax ([link text](URL)).

8. Spacing & Line Breaks: Preserve significant spacing and line breaks to maintain the document's visual structure."#;

/// Examples and closing instruction following the input section.
pub const MARKDOWN_EXAMPLES: &str = r#"Example Table Output:

| Header 1 | Header 2 | Header 3 |
| -------- | -------- | -------- |
| Data 1   | Data 2   | Data 3   |
| Data 4   | Data 5   | Data 6   |

Example List Output:

* Item 1
* Item 2
    * Sub-item 1
    * Sub-item 2
* Item 3

Now, only return all of the formatted Markdown output given in the OCR, Do not include any introductory or concluding remarks."#;

/// What goes into the prompt's `Input:` section.
#[derive(Debug, Clone, Copy)]
pub enum PromptInput<'a> {
    /// The OCR text itself.
    Text(&'a str),
    /// Only the document path and the OCR file path, as literal strings.
    Paths { document: &'a Path, ocr: &'a Path },
}

/// Build the full Markdown conversion prompt.
pub fn markdown_prompt(input: PromptInput<'_>) -> String {
    let body = match input {
        PromptInput::Text(text) => format!("\"\"\"\n{}\n\"\"\"", text.trim_end()),
        PromptInput::Paths { document, ocr } => {
            format!("{}\n{}", document.display(), ocr.display())
        }
    };
    format!("{MARKDOWN_GUIDELINES}\n\nInput:\n{body}\n\n{MARKDOWN_EXAMPLES}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_prompt_embeds_content_not_paths() {
        let p = markdown_prompt(PromptInput::Text("INVOICE\nTotal: 42 EUR\n"));
        assert!(p.contains("Input:\n\"\"\"\nINVOICE\nTotal: 42 EUR\n\"\"\""), "got: {p}");
        assert!(!p.contains("_ocr.txt"));
    }

    #[test]
    fn path_prompt_embeds_paths_only() {
        let p = markdown_prompt(PromptInput::Paths {
            document: Path::new("scans/invoice.pdf"),
            ocr: Path::new("scans/invoice_ocr.txt"),
        });
        assert!(p.contains("Input:\nscans/invoice.pdf\nscans/invoice_ocr.txt\n"), "got: {p}");
    }

    #[test]
    fn prompt_has_guidelines_then_examples() {
        let p = markdown_prompt(PromptInput::Text("x"));
        let guide = p.find("Here are the guidelines").unwrap();
        let input = p.find("Input:").unwrap();
        let example = p.find("Example Table Output").unwrap();
        assert!(guide < input && input < example);
        assert!(p.ends_with("Do not include any introductory or concluding remarks."));
    }
}
