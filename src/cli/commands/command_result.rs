use std::collections::BTreeMap;

use serde::Serialize;

use crate::cli::exit_status::ExitStatus;
use crate::core::QueryFragment;
use crate::core::sink::ComponentState;
use crate::diagnostics::{Diagnostic, Severity};

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Init(InitSummary),
}

/// Everything one `extract` run produced.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractSummary {
    pub fragments: Vec<QueryFragment>,
    pub components: BTreeMap<String, ComponentState>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
    /// The batch stopped on a fatal error.
    pub aborted: bool,
    #[serde(skip)]
    pub json: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running quarry commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
}

impl CommandResult {
    pub fn extract(summary: ExtractSummary) -> Self {
        let count = |severity: Severity| {
            summary
                .diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        Self {
            error_count: count(Severity::Error),
            warning_count: count(Severity::Warning),
            summary: CommandSummary::Extract(summary),
        }
    }

    pub fn init(created: bool) -> Self {
        Self {
            summary: CommandSummary::Init(InitSummary { created }),
            error_count: usize::from(!created),
            warning_count: 0,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        match &self.summary {
            CommandSummary::Extract(summary) if summary.aborted => ExitStatus::Error,
            _ if self.error_count > 0 => ExitStatus::Failure,
            _ => ExitStatus::Success,
        }
    }
}
