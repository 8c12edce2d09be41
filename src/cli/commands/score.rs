use std::path::PathBuf;

use serde::Serialize;

use crate::cancel::CancelToken;
use crate::cli::commands::{load_config, load_workspace, to_json};
use crate::error::{ExitCondition, Result};
use crate::pipeline::{AnalysisPipeline, PipelineOptions};
use crate::scoring::{ExtractionScore, ScoreStatistics};

#[derive(Serialize)]
struct ScoreListing {
    /// Easiest first.
    scores: Vec<ExtractionScore>,
    easiest: Vec<ExtractionScore>,
    hardest: Vec<ExtractionScore>,
    statistics: ScoreStatistics,
    warnings: Vec<String>,
}

pub fn execute(input: PathBuf, config: Option<PathBuf>, format: String) -> Result<ExitCondition> {
    let config = load_config(&config)?;
    let workspace = load_workspace(&input)?;
    let cancel = CancelToken::new();
    let output = AnalysisPipeline::run(
        &workspace.projects,
        &config,
        &PipelineOptions::default(),
        &cancel,
    )?;

    let listing = ScoreListing {
        scores: output.ranked.ordered.clone(),
        easiest: output.ranked.easiest.clone(),
        hardest: output.ranked.hardest.clone(),
        statistics: output.score_stats,
        warnings: output.warnings.clone(),
    };
    println!("{}", to_json(&listing, &format)?);

    Ok(if listing.warnings.is_empty() {
        ExitCondition::Success
    } else {
        ExitCondition::SuccessWithWarnings
    })
}
