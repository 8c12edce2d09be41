use std::path::PathBuf;

use serde::Serialize;

use crate::cancel::CancelToken;
use crate::cli::commands::{load_config, load_workspace, to_json};
use crate::cycles::detector::CycleStatistics;
use crate::error::{ExitCondition, Result};
use crate::pipeline::{AnalysisPipeline, PipelineOptions};
use crate::report::{AnalysisReport, CycleReport, SuggestionReport};

#[derive(Serialize)]
struct CycleListing {
    statistics: CycleStatistics,
    cycles: Vec<CycleReport>,
    recommendations: Vec<SuggestionReport>,
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

    let report = AnalysisReport::from_output(&output);
    let listing = CycleListing {
        statistics: output.cycle_stats,
        cycles: report.cycles,
        recommendations: report.recommendations,
        warnings: report.warnings,
    };
    println!("{}", to_json(&listing, &format)?);

    Ok(if listing.warnings.is_empty() {
        ExitCondition::Success
    } else {
        ExitCondition::SuccessWithWarnings
    })
}
