use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::cancel::CancelToken;
use crate::cli::commands::{load_config, load_workspace, to_json};
use crate::emit::csv;
use crate::emit::dot::{DotEmitter, DotOptions, output_filename};
use crate::emit::render;
use crate::error::{ExitCondition, Result};
use crate::pipeline::{AnalysisPipeline, PipelineOptions};
use crate::report::AnalysisReport;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    input: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    format: String,
    score_labels: bool,
    render: bool,
    no_semantic: bool,
) -> Result<ExitCondition> {
    let config = load_config(&config)?;
    let workspace = load_workspace(&input)?;
    info!(
        "loaded {} projects from {} solution(s)",
        workspace.projects.len(),
        workspace.solutions.len().max(1)
    );

    let cancel = CancelToken::new();
    let options = PipelineOptions {
        semantic: !no_semantic,
    };
    let output = AnalysisPipeline::run(&workspace.projects, &config, &options, &cancel)?;

    let out_dir = match out {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    fs::create_dir_all(&out_dir)?;

    // No partial artefacts: emission starts only after the pipeline
    // completed un-cancelled.
    cancel.checkpoint()?;
    let mut dot = DotEmitter::emit(
        &output.graph,
        &output.cycles,
        &output.suggestions,
        Some(&output.ranked.ordered),
        &DotOptions { score_labels },
    );
    for warning in &dot.warnings {
        warn!("{warning}");
    }

    let dot_path = out_dir.join(output_filename(&output.graph.solutions()));
    fs::write(&dot_path, &dot.text)?;
    fs::write(
        out_dir.join("extraction-scores.csv"),
        csv::extraction_scores_csv(&output.scores),
    )?;
    fs::write(
        out_dir.join("cycles.csv"),
        csv::cycles_csv(&output.graph, &output.cycles, &output.suggestions),
    )?;
    fs::write(
        out_dir.join("dependency-matrix.csv"),
        csv::dependency_matrix_csv(&output.graph),
    )?;
    info!("artefacts written to {}", out_dir.display());

    if render {
        match render::render_svg(&dot_path) {
            Ok(svg) => info!("rendered {}", svg.display()),
            Err(e) => {
                let warning = format!("Graphviz rendering failed: {e}");
                warn!("{warning}");
                dot.warnings.push(warning);
            }
        }
    }

    let mut report = AnalysisReport::from_output(&output);
    report.warnings.append(&mut dot.warnings);
    println!("{}", to_json(&report, &format)?);

    Ok(if report.warnings.is_empty() {
        ExitCondition::Success
    } else {
        ExitCondition::SuccessWithWarnings
    })
}
