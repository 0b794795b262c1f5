use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Extraction completed without error diagnostics
/// - `Failure` (1): Extraction completed but reported error diagnostics
/// - `Error` (2): Internal error, invalid configuration or a fatal extraction error
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
