//! Weak-edge detection and cycle-break recommendations.

use petgraph::graph::EdgeIndex;

use crate::cancel::CancelToken;
use crate::cycles::detector::Cycle;
use crate::error::Result;
use crate::graph::model::DependencyGraph;

/// A weak edge surfaced as a candidate for removal.
#[derive(Debug, Clone)]
pub struct BreakSuggestion {
    pub cycle_id: usize,
    pub edge: EdgeIndex,
    pub source: String,
    pub target: String,
    pub coupling_score: u32,
    pub cycle_size: usize,
    pub rationale: String,
    /// 1-based after global ordering.
    pub rank: usize,
}

pub struct RecommendationEngine;

impl RecommendationEngine {
    /// For each cycle: collect the edges whose endpoints both belong to the
    /// cycle, record the minimum coupling score and every edge attaining it.
    pub fn find_weak_edges(
        graph: &DependencyGraph,
        cycles: &mut [Cycle],
        cancel: &CancelToken,
    ) -> Result<Vec<String>> {
        let mut warnings = Vec::new();
        for cycle in cycles.iter_mut() {
            cancel.checkpoint()?;
            let members = cycle.member_set();
            let mut inside: Vec<(EdgeIndex, u32)> = Vec::new();
            for edge in graph.graph.edge_indices() {
                let Some((source, target)) = graph.graph.edge_endpoints(edge) else {
                    continue;
                };
                if members.contains(&source) && members.contains(&target) {
                    inside.push((edge, graph.graph[edge].coupling_score));
                }
            }
            let Some(min) = inside.iter().map(|(_, score)| *score).min() else {
                warnings.push(format!(
                    "cycle {} has no internal edges; no break suggestion possible",
                    cycle.id
                ));
                continue;
            };
            cycle.weak_coupling_score = Some(min);
            cycle.weak_edges = inside
                .into_iter()
                .filter(|(_, score)| *score == min)
                .map(|(edge, _)| edge)
                .collect();
        }
        Ok(warnings)
    }

    /// Flatten every cycle's weak edges into globally ranked suggestions:
    /// coupling ascending, then cycle size descending, then source name
    /// (case-insensitive; target name settles exact ties).
    pub fn build_suggestions(graph: &DependencyGraph, cycles: &[Cycle]) -> Vec<BreakSuggestion> {
        let mut suggestions: Vec<BreakSuggestion> = Vec::new();
        for cycle in cycles {
            for &edge in &cycle.weak_edges {
                let Some((source, target)) = graph.graph.edge_endpoints(edge) else {
                    continue;
                };
                let score = graph.graph[edge].coupling_score;
                suggestions.push(BreakSuggestion {
                    cycle_id: cycle.id,
                    edge,
                    source: graph.node(source).name.clone(),
                    target: graph.node(target).name.clone(),
                    coupling_score: score,
                    cycle_size: cycle.size(),
                    rationale: rationale(score, cycle.size()),
                    rank: 0,
                });
            }
        }
        suggestions.sort_by(|a, b| {
            a.coupling_score
                .cmp(&b.coupling_score)
                .then(b.cycle_size.cmp(&a.cycle_size))
                .then_with(|| a.source.to_lowercase().cmp(&b.source.to_lowercase()))
                .then_with(|| a.target.to_lowercase().cmp(&b.target.to_lowercase()))
        });
        for (i, suggestion) in suggestions.iter_mut().enumerate() {
            suggestion.rank = i + 1;
        }
        suggestions
    }
}

/// Observable rationale text; phrasing is table-driven and stable.
pub fn rationale(score: u32, size: usize) -> String {
    let size_text = match size {
        s if s >= 10 => format!("critical {s}-project cycle"),
        6..=9 => format!("large {size}-project cycle"),
        4..=5 => format!("{size}-project cycle"),
        _ => format!("small {size}-project cycle"),
    };
    let call_text = match score {
        1 => "only 1 method call".to_string(),
        2 => "just 2 method calls".to_string(),
        3..=5 => format!("only {score} method calls"),
        _ => format!("{score} method calls"),
    };
    format!("{call_text} in {size_text}")
}
