use std::io::Write;

use owo_colors::OwoColorize;
use pdfsum_core::{ExtractedText, SummaryOutcome};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print what was recovered from the PDF, with the word-limit warning if needed.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    pdf_name: &str,
    text: &ExtractedText,
    color: ColorMode,
) -> std::io::Result<()> {
    let line = format!(
        "Extracted {} words from {} page{} of {}",
        text.word_count(),
        text.pages(),
        if text.pages() == 1 { "" } else { "s" },
        pdf_name
    );
    if color.enabled() {
        writeln!(w, "{}", line.green())?;
    } else {
        writeln!(w, "{}", line)?;
    }

    if text.exceeds_word_limit() {
        print_warning(w, &pdfsum_core::truncation_notice(), color)?;
    }
    Ok(())
}

pub fn print_warning(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Warning:".yellow().bold(), message.yellow())
    } else {
        writeln!(w, "Warning: {}", message)
    }
}

/// Print the extracted text under a heading.
pub fn print_extracted_text(
    w: &mut dyn Write,
    text: &ExtractedText,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "Extracted Text:".bold())?;
    } else {
        writeln!(w, "Extracted Text:")?;
    }
    writeln!(w, "{}", text.as_str().trim_end())
}

pub fn print_summary(
    w: &mut dyn Write,
    outcome: &SummaryOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(
            w,
            "{} {}",
            "Summary:".bold(),
            format!("({})", outcome.model).dimmed()
        )?;
    } else {
        writeln!(w, "Summary: ({})", outcome.model)?;
    }
    writeln!(w, "{}", outcome.summary)
}
