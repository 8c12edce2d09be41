//! Stage orchestration. Later stages consume earlier outputs but never
//! mutate them; the two mutable annotations (edge coupling, cycle weak
//! edges) are each written by exactly one stage.

use log::info;

use crate::cancel::CancelToken;
use crate::config::AnalyzerConfig;
use crate::coupling::annotator::CouplingAnnotator;
use crate::cycles::detector::{Cycle, CycleDetector, CycleStatistics};
use crate::error::Result;
use crate::graph::builder::GraphBuilder;
use crate::graph::filter::FrameworkFilter;
use crate::graph::model::DependencyGraph;
use crate::recommend::{BreakSuggestion, RecommendationEngine};
use crate::scoring::{ExtractionScore, ExtractionScorer, RankedCandidates, ScoreStatistics, rank};
use crate::semantic::SemanticModel;
use crate::workspace::model::ProjectInfo;

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// When false, every metric uses its documented fallback and no source
    /// file is read.
    pub semantic: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { semantic: true }
    }
}

#[derive(Debug)]
pub struct PipelineOutput {
    /// The filtered graph all overlays refer to.
    pub graph: DependencyGraph,
    pub cycles: Vec<Cycle>,
    pub cycle_stats: CycleStatistics,
    pub suggestions: Vec<BreakSuggestion>,
    pub scores: Vec<ExtractionScore>,
    pub ranked: RankedCandidates,
    pub score_stats: ScoreStatistics,
    pub warnings: Vec<String>,
}

pub struct AnalysisPipeline;

impl AnalysisPipeline {
    pub fn run(
        projects: &[ProjectInfo],
        config: &AnalyzerConfig,
        options: &PipelineOptions,
        cancel: &CancelToken,
    ) -> Result<PipelineOutput> {
        // Configuration errors surface before any stage runs.
        config.validate()?;
        cancel.checkpoint()?;

        let mut warnings: Vec<String> = projects
            .iter()
            .flat_map(|p| p.warnings.iter().map(move |w| format!("{}: {}", p.name, w)))
            .collect();

        let build = GraphBuilder::build(projects)?;
        warnings.extend(build.warnings);
        info!(
            "graph: {} vertices, {} edges",
            build.graph.vertex_count(),
            build.graph.edge_count()
        );

        let filter = FrameworkFilter::from_config(&config.framework_filters);
        let mut filtered = filter.apply(&build.graph);
        info!(
            "filtered graph: {} edges retained of {}",
            filtered.edge_count(),
            build.graph.edge_count()
        );
        cancel.checkpoint()?;

        let (mut cycles, cycle_stats) = CycleDetector::detect(&filtered);
        info!(
            "cycles: {} (largest {}, participation {:.1}%)",
            cycle_stats.total_cycles, cycle_stats.largest_cycle_size, cycle_stats.participation_rate
        );

        let semantic = if options.semantic {
            SemanticModel::analyze(projects, cancel)?
        } else {
            SemanticModel::disabled(projects)
        };

        let annotation = CouplingAnnotator::annotate(&mut filtered, &cycles, &semantic, cancel)?;
        warnings.extend(annotation.warnings);

        warnings.extend(RecommendationEngine::find_weak_edges(
            &filtered, &mut cycles, cancel,
        )?);
        let suggestions = RecommendationEngine::build_suggestions(&filtered, &cycles);

        let score_output =
            ExtractionScorer::score(&filtered, &semantic, &config.scoring_weights, cancel)?;
        warnings.extend(score_output.warnings);
        let (ranked, score_stats) = rank(&score_output.scores);

        cancel.checkpoint()?;
        Ok(PipelineOutput {
            graph: filtered,
            cycles,
            cycle_stats,
            suggestions,
            scores: score_output.scores,
            ranked,
            score_stats,
            warnings,
        })
    }
}
