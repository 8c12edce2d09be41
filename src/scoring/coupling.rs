//! Coupling metric: incoming references weigh double.

use petgraph::graph::NodeIndex;

use crate::graph::model::DependencyGraph;
use crate::scoring::{MetricCalculator, MetricScore, ScoringContext};

pub struct CouplingCalculator;

impl CouplingCalculator {
    pub fn raw(graph: &DependencyGraph, node: NodeIndex) -> f64 {
        (2 * graph.in_degree(node) + graph.out_degree(node)) as f64
    }
}

impl MetricCalculator for CouplingCalculator {
    fn metric(&self) -> &'static str {
        "coupling"
    }

    fn normalise(&self, node: NodeIndex, ctx: &ScoringContext<'_>) -> MetricScore {
        let raw = Self::raw(ctx.graph, node);
        let normalised = if ctx.max_coupling_raw <= 0.0 {
            0.0
        } else {
            100.0 * raw / ctx.max_coupling_raw
        };
        MetricScore::new(raw, normalised)
    }
}
