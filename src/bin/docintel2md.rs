//! CLI binary for docintel2md.
//!
//! A thin shim over the library crate that maps CLI flags and `.env`
//! settings to `ConversionConfig` and reports results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use docintel2md::{
    analyze_document, convert_document, convert_to_markdown, AzureDocumentIntelligence,
    ConversionConfig, DocIntelError, DocumentInput, LlmMarkdownGenerator, OcrModel, OcrOutput,
    OutputLayout, Settings,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # OCR the document named by DOCUMENT_FILE_PATH in .env
  docintel2md --service azure

  # OCR a specific file with the layout model, then render Markdown
  docintel2md --service azure --model layout --markdown -f scans/invoice.pdf

  # OCR a remote document and print the text
  docintel2md --service azure --url https://example.com/form.pdf

  # Render Markdown from a previously saved OCR text file
  docintel2md --service google -f scans/invoice.pdf

  # Collect outputs under ./results/outputs/ocr and ./results/output/markdown
  docintel2md --service azure --markdown --layout nested --output-dir results

ENVIRONMENT VARIABLES (also read from .env):
  AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT   Document Intelligence endpoint URL
  AZURE_DOCUMENT_INTELLIGENCE_KEY        Document Intelligence key
  DOCUMENT_FILE_PATH                     Default document path
  GEMINI_API_KEY                         Gemini API key (Markdown stage)
  DOCUMENT_OUTPUT_DIR                    Root directory for --layout nested
  RUST_LOG                               Override log filter
"#;

/// Extract document text with Azure Document Intelligence and render it as Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "docintel2md",
    version,
    about = "Extract document text with Azure Document Intelligence and render it as Markdown",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Service to run: azure (OCR) or google (Markdown). Prompted for when omitted.
    #[arg(short, long, value_enum)]
    service: Option<ServiceArg>,

    /// Local document path. Defaults to DOCUMENT_FILE_PATH.
    #[arg(short, long)]
    file: Option<String>,

    /// Remote document URL (OCR only).
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,

    /// After OCR, also render the text as Markdown.
    #[arg(long, env = "DOCINTEL_MARKDOWN")]
    markdown: bool,

    /// Extraction model: read (plain text) or layout (text + structure).
    #[arg(long, env = "DOCINTEL_MODEL", value_enum, default_value = "read")]
    model: ModelArg,

    /// Output layout: sibling (next to the document) or nested (under --output-dir).
    #[arg(long, env = "DOCINTEL_LAYOUT", value_enum, default_value = "sibling")]
    layout: LayoutArg,

    /// Root directory for the nested layout. Defaults to DOCUMENT_OUTPUT_DIR, then ".".
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Do not save the OCR text to disk.
    #[arg(long, env = "DOCINTEL_NO_SAVE")]
    no_save: bool,

    /// LLM provider for the Markdown stage.
    #[arg(long, env = "DOCINTEL_LLM_PROVIDER", default_value = "gemini")]
    llm_provider: String,

    /// LLM model for the Markdown stage.
    #[arg(long, env = "DOCINTEL_LLM_MODEL", default_value = "gemini-1.5-pro")]
    llm_model: String,

    /// Send only the document and OCR file paths to the LLM, not the OCR text.
    #[arg(long, env = "DOCINTEL_PROMPT_PATHS")]
    prompt_paths: bool,

    /// Document Intelligence REST API version.
    #[arg(long, env = "DOCINTEL_API_VERSION", default_value = docintel2md::config::DEFAULT_API_VERSION)]
    api_version: String,

    /// Print the OCR result as JSON instead of plain text.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "DOCINTEL_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCINTEL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCINTEL_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ServiceArg {
    Azure,
    Google,
}

impl ServiceArg {
    /// Parse an interactive answer. Only the exact names are accepted.
    fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim() {
            "azure" => Some(ServiceArg::Azure),
            "google" => Some(ServiceArg::Google),
            _ => None,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModelArg {
    Read,
    Layout,
}

impl From<ModelArg> for OcrModel {
    fn from(v: ModelArg) -> Self {
        match v {
            ModelArg::Read => OcrModel::Read,
            ModelArg::Layout => OcrModel::Layout,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Sibling,
    Nested,
}

impl From<LayoutArg> for OutputLayout {
    fn from(v: LayoutArg) -> Self {
        match v {
            LayoutArg::Sibling => OutputLayout::Sibling,
            LayoutArg::Nested => OutputLayout::Nested,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so clap's `env = …` defaults see it too.
    let dotenv = Settings::load_dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    Settings::report_dotenv(&dotenv);
    let settings = Settings::from_process_env();
    tracing::debug!("{:?}", settings);

    let service = match cli.service {
        Some(s) => s,
        None => prompt_service()?,
    };

    let config = build_config(&cli, &settings)?;
    let file_path = document_path(&cli, &settings);
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;

    match service {
        ServiceArg::Azure => {
            run_ocr(&cli, &settings, &config, file_path.as_deref(), show_progress).await
        }
        ServiceArg::Google => {
            let Some(file_path) = file_path else {
                return Err(DocIntelError::MissingInput).context("Markdown conversion failed");
            };
            run_markdown(&cli, &settings, &config, Path::new(&file_path), show_progress).await
        }
    }
}

/// The local document to use: `--file`, else `DOCUMENT_FILE_PATH` unless a
/// `--url` was given on the command line.
fn document_path(cli: &Cli, settings: &Settings) -> Option<String> {
    cli.file
        .clone()
        .or_else(|| cli.url.is_none().then(|| settings.file_path.clone()).flatten())
}

/// Ask which service to run on stdin.
fn prompt_service() -> Result<ServiceArg> {
    eprint!("Which service do you want to use? (azure/google): ");
    io::stderr().flush().ok();

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read service name")?;

    match ServiceArg::from_answer(&answer) {
        Some(service) => Ok(service),
        None => bail!(
            "Invalid service '{}'. Please type 'azure' or 'google'.",
            answer.trim()
        ),
    }
}

/// OCR stage, optionally followed by the Markdown stage.
async fn run_ocr(
    cli: &Cli,
    settings: &Settings,
    config: &ConversionConfig,
    file_path: Option<&str>,
    show_progress: bool,
) -> Result<()> {
    let input = DocumentInput::from_parts(file_path, cli.url.as_deref())
        .context("Cannot analyse document")?;
    let client = AzureDocumentIntelligence::from_settings(settings, config)
        .context("Failed to create Document Intelligence client")?;

    if cli.markdown {
        let generator = LlmMarkdownGenerator::from_settings(settings, config)
            .context("Failed to create LLM provider")?;

        let bar = spinner(show_progress, "Analyzing document and generating Markdown…");
        let result = convert_document(&client, &generator, &input, config).await;
        finish(bar);
        let (ocr, md) = result.context("Conversion failed")?;

        if cli.json {
            print_json(&ocr)?;
        }
        if !cli.quiet {
            report_saved(&ocr);
            eprintln!("{} Markdown saved to {}", green("✔"), bold(&md.path.display().to_string()));
        }
        return Ok(());
    }

    let bar = spinner(show_progress, "Analyzing document…");
    let result = analyze_document(&client, &input, config).await;
    finish(bar);
    let ocr = result.context("OCR failed")?;

    if cli.json {
        print_json(&ocr)?;
    } else if ocr.saved_to.is_none() {
        // Nothing on disk: the text goes to stdout.
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(ocr.text().as_bytes())
            .context("Failed to write to stdout")?;
        if !ocr.text().ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet {
        report_saved(&ocr);
    }
    Ok(())
}

/// Markdown stage from a previously saved OCR file.
async fn run_markdown(
    cli: &Cli,
    settings: &Settings,
    config: &ConversionConfig,
    document: &Path,
    show_progress: bool,
) -> Result<()> {
    let generator = LlmMarkdownGenerator::from_settings(settings, config)
        .context("Failed to create LLM provider")?;

    let bar = spinner(show_progress, "Generating Markdown…");
    let result = convert_to_markdown(&generator, document, config).await;
    finish(bar);
    let md = result.context("Markdown conversion failed")?;

    if !cli.quiet {
        eprintln!("{} Markdown saved to {}", green("✔"), bold(&md.path.display().to_string()));
    }
    Ok(())
}

/// Map CLI args and settings to `ConversionConfig`.
fn build_config(cli: &Cli, settings: &Settings) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .ocr_model(cli.model.into())
        .output_layout(cli.layout.into())
        .settings(settings)
        .save_output(!cli.no_save)
        .api_version(cli.api_version.clone())
        .llm_provider(cli.llm_provider.clone())
        .llm_model(cli.llm_model.clone())
        .embed_ocr_text(!cli.prompt_paths);

    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_root(dir);
    }

    builder.build().context("Invalid configuration")
}

fn print_json(ocr: &OcrOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(ocr).context("Failed to serialise output")?;
    println!("{json}");
    Ok(())
}

fn report_saved(ocr: &OcrOutput) {
    match ocr.saved_to {
        Some(ref path) => eprintln!(
            "{} OCR result saved to {}",
            green("✔"),
            bold(&path.display().to_string())
        ),
        None if ocr.result.is_empty() => eprintln!("{} No text content found.", red("✘")),
        None => {}
    }
}

/// Spinner shown while waiting on a remote service.
fn spinner(enabled: bool, message: &'static str) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}  ⏱ {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

fn finish(bar: Option<ProgressBar>) {
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
}
