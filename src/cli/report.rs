//! Report formatting and printing utilities.
//!
//! Diagnostics are printed cargo-style, followed by the extracted fragments
//! and a one-line summary. Kept apart from the engine so quarry can be used
//! as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, ExtractSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::QueryFragment;
use crate::diagnostics::{Diagnostic, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Extract(summary) if summary.json => {
            print_json_to(summary, &mut io::stdout().lock());
        }
        CommandSummary::Extract(summary) => {
            report_to(summary, verbose, &mut io::stdout().lock());
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print an extraction run to a custom writer.
pub fn report_to<W: Write>(summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    for diagnostic in &summary.diagnostics {
        print_diagnostic(diagnostic, writer);
    }

    if verbose || summary.diagnostics.is_empty() {
        for fragment in &summary.fragments {
            print_fragment(fragment, writer);
        }
    }

    print_summary(summary, writer);
}

pub fn print_json_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    if let Err(err) = serde_json::to_writer_pretty(&mut *writer, summary) {
        eprintln!("{} failed to write JSON: {}", "error:".bold().red(), err);
        return;
    }
    let _ = writeln!(writer);
}

fn print_diagnostic<W: Write>(diagnostic: &Diagnostic, writer: &mut W) {
    let severity = match diagnostic.severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };
    let code = diagnostic
        .code
        .map(|code| format!("[{code}]"))
        .unwrap_or_default();

    let _ = writeln!(
        writer,
        "{}{}: {}  {}",
        severity,
        code.bold(),
        diagnostic.message,
        diagnostic.id.to_string().dimmed().cyan()
    );

    match diagnostic.location {
        Some(location) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                diagnostic.file_path,
                location.start.line,
                location.start.column
            );
        }
        None => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), diagnostic.file_path);
        }
    }

    if let Some(frame) = &diagnostic.code_frame {
        let _ = writeln!(writer, "{}", frame);
    }
    if let Some(source_message) = &diagnostic.source_message
        && diagnostic.code_frame.is_none()
    {
        let _ = writeln!(writer, "  {} {} {}", "=".blue(), "note:".bold(), source_message);
    }
    let _ = writeln!(writer);
}

fn print_fragment<W: Write>(fragment: &QueryFragment, writer: &mut W) {
    let kind = if fragment.is_hook {
        "hook".to_string()
    } else {
        fragment.query_type().to_string()
    };
    let start = fragment.template_loc.start;
    let _ = writeln!(
        writer,
        "{} {}  {}:{}:{}",
        format!("{kind:<6}").cyan(),
        fragment.name.bold(),
        fragment.file_path,
        start.line,
        start.column
    );
}

fn print_summary<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let errors = count(&summary.diagnostics, Severity::Error);
    let warnings = count(&summary.diagnostics, Severity::Warning);

    if errors + warnings > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            errors + warnings,
            errors,
            if errors == 1 { "error" } else { "errors" }.red(),
            warnings,
            if warnings == 1 { "warning" } else { "warnings" }.yellow()
        );
    }

    if summary.aborted {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            "Extraction aborted by a fatal error".red().bold()
        );
        return;
    }

    let extracted = summary.components.values().filter(|c| c.query_extracted).count();
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} {} from {} of {} {}",
            summary.fragments.len(),
            if summary.fragments.len() == 1 { "query" } else { "queries" },
            extracted,
            summary.files_scanned,
            if summary.files_scanned == 1 { "file" } else { "files" }
        )
        .green()
    );
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        eprintln!(
            "{} {} already exists",
            "error:".bold().red(),
            CONFIG_FILE_NAME
        );
    }
}
