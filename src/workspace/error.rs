use thiserror::Error;

use crate::error::AnalyzerError;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("solution parse error: {0}")]
    SolutionParse(String),
    #[error("project parse error: {0}")]
    ProjectParse(String),
    #[error("no solution or project found under {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;

impl From<WorkspaceError> for AnalyzerError {
    fn from(err: WorkspaceError) -> Self {
        AnalyzerError::input(
            "workspace loading",
            err.to_string(),
            "Point the tool at a .sln file, a .csproj file, or a directory containing either",
        )
    }
}
