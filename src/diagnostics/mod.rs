//! Structured, user-facing records for extraction failures and warnings.
//!
//! [`diagnose`] is the single place an [`ExtractError`] is turned into
//! something a reporter can show: an id from a fixed taxonomy, the file, an
//! optional source range and a rendered code frame.

pub mod code_frame;

use serde::Serialize;

use crate::core::data::{SourceRange, UnresolvedVariable};
use crate::core::error::ExtractError;

pub use code_frame::code_frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Kind of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorId {
    ReadFailed,
    SourceParseFailed,
    /// Every preprocessed variant failed to parse.
    VariantsParseFailed,
    InterpolationNotAllowed,
    EmptyFragment,
    FragmentSyntax,
    ExportNotAsync,
    DeprecatedAmbientTag,
    UnresolvedVariable,
}

impl ErrorId {
    /// Numeric code used by existing tooling, where one exists.
    pub fn code(self) -> Option<&'static str> {
        match self {
            ErrorId::SourceParseFailed => Some("85911"),
            ErrorId::VariantsParseFailed => Some("85912"),
            ErrorId::ReadFailed => Some("85913"),
            ErrorId::InterpolationNotAllowed => Some("85916"),
            ErrorId::EmptyFragment => Some("85917"),
            ErrorId::FragmentSyntax => Some("85918"),
            ErrorId::ExportNotAsync => Some("85929"),
            ErrorId::DeprecatedAmbientTag | ErrorId::UnresolvedVariable => None,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ErrorId::UnresolvedVariable => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for ErrorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            ErrorId::ReadFailed => "read-failed",
            ErrorId::SourceParseFailed => "source-parse-failed",
            ErrorId::VariantsParseFailed => "variants-parse-failed",
            ErrorId::InterpolationNotAllowed => "interpolation-not-allowed",
            ErrorId::EmptyFragment => "empty-fragment",
            ErrorId::FragmentSyntax => "fragment-syntax",
            ErrorId::ExportNotAsync => "export-not-async",
            ErrorId::DeprecatedAmbientTag => "deprecated-ambient-tag",
            ErrorId::UnresolvedVariable => "unresolved-variable",
        };
        f.write_str(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub id: ErrorId,
    pub code: Option<&'static str>,
    pub severity: Severity,
    pub file_path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_frame: Option<String>,
    /// Message of the underlying parser error, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_message: Option<String>,
}

impl Diagnostic {
    fn new(id: ErrorId, file_path: &str, message: String) -> Self {
        Self {
            id,
            code: id.code(),
            severity: id.severity(),
            file_path: file_path.to_string(),
            message,
            location: None,
            code_frame: None,
            source_message: None,
        }
    }

    fn at(mut self, location: SourceRange, text: Option<&str>, frame_message: Option<&str>, highlight: bool) -> Self {
        if let Some(text) = text {
            let end = (!location.is_empty()).then_some(location.end);
            self.code_frame = Some(code_frame(text, location.start, end, frame_message, highlight));
        }
        self.location = Some(location);
        self
    }
}

/// Turn an extraction error into a diagnostic for `file_path`.
///
/// `text` is the file contents the locations refer to; without it no code
/// frame is rendered.
pub fn diagnose(err: &ExtractError, file_path: &str, text: Option<&str>, highlight: bool) -> Diagnostic {
    let message = err.to_string();
    match err {
        ExtractError::Read { .. } => Diagnostic::new(ErrorId::ReadFailed, file_path, message),
        ExtractError::Parse {
            location,
            variants_tried,
            message: parser_message,
            ..
        } => {
            if *variants_tried > 0 {
                // Locations point into a preprocessed variant, not the file.
                let mut diagnostic = Diagnostic::new(ErrorId::VariantsParseFailed, file_path, message);
                diagnostic.source_message = Some(parser_message.clone());
                return diagnostic;
            }
            let mut diagnostic = Diagnostic::new(ErrorId::SourceParseFailed, file_path, message);
            diagnostic.source_message = Some(parser_message.clone());
            match location {
                Some(start) => diagnostic.at(SourceRange::point(*start), text, Some(parser_message.as_str()), highlight),
                None => diagnostic,
            }
        }
        ExtractError::InterpolationNotAllowed { start, end } => {
            Diagnostic::new(ErrorId::InterpolationNotAllowed, file_path, message).at(
                SourceRange::new(*start, *end),
                text,
                None,
                highlight,
            )
        }
        ExtractError::EmptyFragment { template } => {
            let diagnostic = Diagnostic::new(ErrorId::EmptyFragment, file_path, message);
            match template {
                Some(template) => diagnostic.at(*template, text, None, highlight),
                None => diagnostic,
            }
        }
        ExtractError::FragmentSyntax {
            message: grammar_message,
            template,
            location,
        } => {
            let mut diagnostic = Diagnostic::new(ErrorId::FragmentSyntax, file_path, message);
            diagnostic.source_message = Some(grammar_message.clone());
            let start = location.unwrap_or(template.start);
            diagnostic.at(SourceRange::point(start), text, Some(grammar_message.as_str()), highlight)
        }
        ExtractError::ExportNotAsync { export_start, .. } => {
            Diagnostic::new(ErrorId::ExportNotAsync, file_path, message).at(
                SourceRange::point(*export_start),
                text,
                None,
                highlight,
            )
        }
        ExtractError::DeprecatedAmbientTag { .. } => {
            Diagnostic::new(ErrorId::DeprecatedAmbientTag, file_path, message)
        }
    }
}

/// Warning diagnostic for a query variable that could not be resolved.
pub fn unresolved_variable(warning: &UnresolvedVariable) -> Diagnostic {
    Diagnostic::new(ErrorId::UnresolvedVariable, &warning.file_path, warning.message())
}
