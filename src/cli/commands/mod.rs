pub mod analyze;
pub mod cycles;
pub mod graph;
pub mod score;

use std::io;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::workspace::loader::{Workspace, WorkspaceLoader};

pub(crate) fn load_config(path: &Option<PathBuf>) -> Result<AnalyzerConfig> {
    match path {
        Some(p) => AnalyzerConfig::load(p),
        None => {
            let config = AnalyzerConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

pub(crate) fn load_workspace(input: &PathBuf) -> Result<Workspace> {
    Ok(WorkspaceLoader::from_path(input)?)
}

pub(crate) fn to_json<T: Serialize>(value: &T, format: &str) -> Result<String> {
    let json = if format == "json" {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.map_err(|e| AnalyzerError::Io(io::Error::other(e)))
}
