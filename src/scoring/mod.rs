//! Extraction-difficulty scoring: four orthogonal metrics, normalised to
//! [0, 100] (higher is harder), combined with validated weights.

pub mod complexity;
pub mod coupling;
pub mod external_api;
pub mod ranking;
pub mod tech_debt;

use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::config::ScoringWeights;
use crate::error::Result;
use crate::graph::model::{DependencyGraph, identity_key};
use crate::semantic::{ProjectAnalysis, SemanticModel};

pub use complexity::ComplexityCalculator;
pub use coupling::CouplingCalculator;
pub use external_api::ExternalApiCalculator;
pub use ranking::{RankedCandidates, ScoreStatistics, rank};
pub use tech_debt::TechDebtCalculator;

/// Raw input plus the normalised [0, 100] score of one metric.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricScore {
    pub raw: f64,
    pub normalised: f64,
}

impl MetricScore {
    pub fn new(raw: f64, normalised: f64) -> Self {
        Self {
            raw,
            normalised: normalised.clamp(0.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectMetrics {
    pub coupling: MetricScore,
    pub complexity: MetricScore,
    pub tech_debt: MetricScore,
    pub api_exposure: MetricScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DifficultyCategory {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for DifficultyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            DifficultyCategory::Easy => "Easy",
            DifficultyCategory::Medium => "Medium",
            DifficultyCategory::Hard => "Hard",
        };
        f.write_str(text)
    }
}

impl DifficultyCategory {
    /// Categorisation works on the half-up-rounded final score, matching
    /// the rounding used for labels.
    pub fn from_score(final_score: f64) -> Self {
        let rounded = final_score.round() as i64;
        if rounded <= 33 {
            DifficultyCategory::Easy
        } else if rounded >= 67 {
            DifficultyCategory::Hard
        } else {
            DifficultyCategory::Medium
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionScore {
    pub project: String,
    #[serde(skip)]
    pub node: NodeIndex,
    pub final_score: f64,
    pub metrics: ProjectMetrics,
    pub category: DifficultyCategory,
}

/// Read-only inputs shared by the calculators.
pub struct ScoringContext<'a> {
    pub graph: &'a DependencyGraph,
    pub semantic: &'a SemanticModel,
    /// Maximum coupling raw value across scored vertices.
    pub max_coupling_raw: f64,
}

impl ScoringContext<'_> {
    pub fn analysis(&self, node: NodeIndex) -> Option<&ProjectAnalysis> {
        let key = identity_key(&self.graph.node(node).path);
        self.semantic.analysis(&key)
    }
}

/// Weighted combination of the four normalised metrics, clamped to [0, 100].
pub fn combine(weights: &ScoringWeights, metrics: &ProjectMetrics) -> f64 {
    (weights.coupling * metrics.coupling.normalised
        + weights.complexity * metrics.complexity.normalised
        + weights.tech_debt * metrics.tech_debt.normalised
        + weights.external_exposure * metrics.api_exposure.normalised)
        .clamp(0.0, 100.0)
}

/// One normalisation strategy; the scorer composes four of these.
pub trait MetricCalculator {
    fn metric(&self) -> &'static str;
    fn normalise(&self, node: NodeIndex, ctx: &ScoringContext<'_>) -> MetricScore;
}

#[derive(Debug, Default)]
pub struct ScoreOutput {
    pub scores: Vec<ExtractionScore>,
    pub warnings: Vec<String>,
}

pub struct ExtractionScorer;

impl ExtractionScorer {
    /// Scores every real (non-synthetic) project of the filtered graph.
    pub fn score(
        graph: &DependencyGraph,
        semantic: &SemanticModel,
        weights: &ScoringWeights,
        cancel: &CancelToken,
    ) -> Result<ScoreOutput> {
        weights.validate()?;

        let nodes: Vec<NodeIndex> = graph
            .sorted_vertices()
            .into_iter()
            .filter(|idx| !graph.node(*idx).synthetic)
            .collect();

        let max_coupling_raw = nodes
            .iter()
            .map(|n| CouplingCalculator::raw(graph, *n))
            .fold(0.0f64, f64::max);
        let ctx = ScoringContext {
            graph,
            semantic,
            max_coupling_raw,
        };

        let coupling = CouplingCalculator;
        let complexity = ComplexityCalculator;
        let tech_debt = TechDebtCalculator;
        let api = ExternalApiCalculator;

        let mut output = ScoreOutput::default();
        for node in nodes {
            cancel.checkpoint()?;
            let project = graph.node(node);
            if !matches!(ctx.analysis(node), Some(ProjectAnalysis::Analyzed(_))) {
                output.warnings.push(format!(
                    "{}: semantic analysis unavailable; complexity defaults to 50 and API exposure to 0",
                    project.name
                ));
            }
            let metrics = ProjectMetrics {
                coupling: coupling.normalise(node, &ctx),
                complexity: complexity.normalise(node, &ctx),
                tech_debt: tech_debt.normalise(node, &ctx),
                api_exposure: api.normalise(node, &ctx),
            };
            let final_score = combine(weights, &metrics);
            output.scores.push(ExtractionScore {
                project: project.name.clone(),
                node,
                final_score,
                metrics,
                category: DifficultyCategory::from_score(final_score),
            });
        }

        Ok(output)
    }
}
