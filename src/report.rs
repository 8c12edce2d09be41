//! Machine-readable summary of a run.

use serde::Serialize;

use crate::cycles::detector::CycleStatistics;
use crate::pipeline::PipelineOutput;
use crate::scoring::{ExtractionScore, ScoreStatistics};

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub name: String,
    pub solution: String,
    pub target_framework: String,
    pub dependencies: usize,
    pub dependents: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub id: usize,
    pub size: usize,
    pub projects: Vec<String>,
    pub weak_coupling_score: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionReport {
    pub rank: usize,
    pub cycle_id: usize,
    pub source: String,
    pub target: String,
    pub coupling_score: u32,
    pub cycle_size: usize,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub projects: Vec<ProjectReport>,
    pub cycle_statistics: CycleStatistics,
    pub cycles: Vec<CycleReport>,
    pub recommendations: Vec<SuggestionReport>,
    /// Easiest first.
    pub scores: Vec<ExtractionScore>,
    pub score_statistics: ScoreStatistics,
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    pub fn from_output(output: &PipelineOutput) -> Self {
        let graph = &output.graph;
        let mut projects: Vec<ProjectReport> = graph
            .graph
            .node_indices()
            .filter(|idx| !graph.node(*idx).synthetic)
            .map(|idx| {
                let node = graph.node(idx);
                ProjectReport {
                    name: node.name.clone(),
                    solution: node.solution.clone(),
                    target_framework: node.target_framework.clone(),
                    dependencies: graph.out_degree(idx),
                    dependents: graph.in_degree(idx),
                }
            })
            .collect();
        projects.sort_by(|a, b| {
            (a.name.to_lowercase(), &a.name).cmp(&(b.name.to_lowercase(), &b.name))
        });

        let cycles = output
            .cycles
            .iter()
            .map(|c| CycleReport {
                id: c.id,
                size: c.size(),
                projects: c
                    .members
                    .iter()
                    .map(|idx| graph.node(*idx).name.clone())
                    .collect(),
                weak_coupling_score: c.weak_coupling_score,
            })
            .collect();

        let recommendations = output
            .suggestions
            .iter()
            .map(|s| SuggestionReport {
                rank: s.rank,
                cycle_id: s.cycle_id,
                source: s.source.clone(),
                target: s.target.clone(),
                coupling_score: s.coupling_score,
                cycle_size: s.cycle_size,
                rationale: s.rationale.clone(),
            })
            .collect();

        AnalysisReport {
            projects,
            cycle_statistics: output.cycle_stats,
            cycles,
            recommendations,
            scores: output.ranked.ordered.clone(),
            score_statistics: output.score_stats,
            warnings: output.warnings.clone(),
        }
    }
}
