use thiserror::Error;

/// Top-level error taxonomy for an analysis run.
///
/// Fatal errors carry a three-part payload: what failed, why it failed and a
/// concrete remediation. Non-fatal conditions (unresolved references,
/// degraded semantic analysis) are not errors; they travel as warning lists
/// alongside stage outputs.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("configuration error in {what}: {why}. {remediation}")]
    Config {
        what: String,
        why: String,
        remediation: String,
    },
    #[error("input error in {what}: {why}. {remediation}")]
    Input {
        what: String,
        why: String,
        remediation: String,
    },
    /// The caller requested stop; no output files are produced.
    #[error("analysis cancelled before completion")]
    Cancelled,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    pub fn config(
        what: impl Into<String>,
        why: impl Into<String>,
        remediation: impl Into<String>,
    ) -> Self {
        Self::Config {
            what: what.into(),
            why: why.into(),
            remediation: remediation.into(),
        }
    }

    pub fn input(
        what: impl Into<String>,
        why: impl Into<String>,
        remediation: impl Into<String>,
    ) -> Self {
        Self::Input {
            what: what.into(),
            why: why.into(),
            remediation: remediation.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Distinguished exit conditions of a run, mapped to process exit codes by
/// the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCondition {
    Success,
    SuccessWithWarnings,
    ConfigError,
    InputError,
    Cancelled,
}

impl ExitCondition {
    pub fn code(self) -> u8 {
        match self {
            ExitCondition::Success | ExitCondition::SuccessWithWarnings => 0,
            ExitCondition::ConfigError => 2,
            ExitCondition::InputError => 3,
            ExitCondition::Cancelled => 130,
        }
    }

    pub fn from_error(err: &AnalyzerError) -> Self {
        match err {
            AnalyzerError::Config { .. } => ExitCondition::ConfigError,
            AnalyzerError::Input { .. } | AnalyzerError::Io(_) => ExitCondition::InputError,
            AnalyzerError::Cancelled => ExitCondition::Cancelled,
        }
    }
}
