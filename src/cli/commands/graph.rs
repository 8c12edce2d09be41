use std::fs;
use std::path::PathBuf;

use log::info;

use crate::cancel::CancelToken;
use crate::cli::commands::{load_config, load_workspace};
use crate::emit::dot::{DotEmitter, DotOptions, output_filename};
use crate::error::{ExitCondition, Result};
use crate::pipeline::{AnalysisPipeline, PipelineOptions};

/// Writes only the DOT rendering: the filtered graph with cycle overlays,
/// no extraction scores.
pub fn execute(
    input: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<ExitCondition> {
    let config = load_config(&config)?;
    let workspace = load_workspace(&input)?;
    let cancel = CancelToken::new();
    let options = PipelineOptions { semantic: false };
    let output = AnalysisPipeline::run(&workspace.projects, &config, &options, &cancel)?;

    let out_dir = match out {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    fs::create_dir_all(&out_dir)?;

    let dot = DotEmitter::emit(
        &output.graph,
        &output.cycles,
        &output.suggestions,
        None,
        &DotOptions::default(),
    );
    let dot_path = out_dir.join(output_filename(&output.graph.solutions()));
    fs::write(&dot_path, dot.text)?;
    info!("wrote {}", dot_path.display());

    Ok(if output.warnings.is_empty() {
        ExitCondition::Success
    } else {
        ExitCondition::SuccessWithWarnings
    })
}
