use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use pdfsum_core::{
    Config, ExtractedText, LengthRange, ModelId, ModelRegistry, SummaryRequest,
};
use pdfsum_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// PDF Summarizer - extract the text of a PDF and summarize it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and print the text of a PDF
    Extract {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Write the extracted text to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Extract the text of a PDF and summarize it
    Summarize {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Summarization model (t5-small, facebook/bart-large-cnn)
        #[arg(short, long)]
        model: Option<ModelId>,

        /// Minimum summary length
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        min_length: Option<u32>,

        /// Maximum summary length
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_length: Option<u32>,

        /// Also print the extracted text
        #[arg(long)]
        show_text: bool,

        /// Hugging Face inference endpoint (overrides config and PDFSUM_INFERENCE_URL)
        #[arg(long)]
        inference_url: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Command::Extract {
            file_path,
            output,
            no_color,
        } => extract(&file_path, output, no_color).await,
        Command::Summarize {
            file_path,
            model,
            min_length,
            max_length,
            show_text,
            inference_url,
            no_color,
        } => {
            let lengths = LengthRange::new(
                min_length.unwrap_or(config.default_lengths.min()),
                max_length.unwrap_or(config.default_lengths.max()),
            )?;
            let mut config = config;
            if let Some(url) = inference_url {
                config.inference.endpoint = url;
            }
            summarize(
                &file_path,
                config,
                model,
                lengths,
                show_text,
                ColorMode(!no_color),
            )
            .await
        }
    }
}

async fn extract(file_path: &Path, output: Option<PathBuf>, no_color: bool) -> anyhow::Result<()> {
    let color = ColorMode(!no_color && output.is_none());
    let text = extract_with_spinner(file_path).await?;

    let mut stderr = std::io::stderr();
    output::print_extraction_summary(&mut stderr, &display_name(file_path), &text, color)?;

    if let Some(ref output_path) = output {
        std::fs::write(output_path, text.as_str())?;
        writeln!(stderr, "Wrote extracted text to {}", output_path.display())?;
    } else {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", text.as_str())?;
        stdout.flush()?;
    }
    Ok(())
}

async fn summarize(
    file_path: &Path,
    config: Config,
    model: Option<ModelId>,
    lengths: LengthRange,
    show_text: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let model = model.unwrap_or(config.default_model);
    let text = extract_with_spinner(file_path).await?;

    let mut stdout = std::io::stdout();
    output::print_extraction_summary(&mut stdout, &display_name(file_path), &text, color)?;
    if show_text {
        output::print_extracted_text(&mut stdout, &text, color)?;
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("pdfsum/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let registry = ModelRegistry::hugging_face(config.inference.clone(), client);
    let request = SummaryRequest::new(text.into_string(), model, lengths)?;

    let spinner = spinner(format!("Summarizing text with {model}..."));
    let result = pdfsum_core::summarize_text(&registry, &request).await;
    spinner.finish_and_clear();

    let outcome = result?;
    output::print_summary(&mut stdout, &outcome, color)?;
    Ok(())
}

/// Run extraction on the blocking pool, showing per-page progress.
async fn extract_with_spinner(file_path: &Path) -> anyhow::Result<ExtractedText> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let spinner = spinner("Extracting text from PDF...".to_string());
    let path = file_path.to_path_buf();
    let progress = spinner.clone();

    let result = tokio::task::spawn_blocking(move || {
        let backend = MupdfBackend::new();
        pdfsum_core::extract_text_from_pdf(&path, &backend, &mut |p| {
            progress.set_message(format!(
                "Extracting text from PDF... page {}/{}",
                p.page, p.total
            ));
        })
    })
    .await?;
    spinner.finish_and_clear();

    Ok(result?)
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn display_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string())
}
