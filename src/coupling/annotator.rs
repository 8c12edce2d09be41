//! Edge annotation (the longest stage): replaces the default coupling of 1
//! with the aggregated cross-project call-site count.

use std::collections::{HashMap, HashSet};

use log::debug;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

#[cfg(feature = "parallel_analysis")]
use rayon::prelude::*;

use crate::cancel::CancelToken;
use crate::coupling::call_sites::count_call_sites;
use crate::cycles::detector::Cycle;
use crate::error::Result;
use crate::graph::model::{DependencyGraph, identity_key};
use crate::semantic::{ProjectAnalysis, SemanticModel};

#[derive(Debug, Default)]
pub struct AnnotationOutcome {
    pub warnings: Vec<String>,
    pub analyzed_projects: usize,
    pub degraded_projects: usize,
}

/// Annotates the outgoing edges of every project participating in a cycle.
///
/// Aggregation is per `(source, target assembly)`; edges whose target never
/// appears in the counts keep the default 1/Weak, as do all edges of a
/// project whose analysis is unavailable (recorded as a warning). Re-running
/// with the same inputs reproduces every score.
pub struct CouplingAnnotator;

impl CouplingAnnotator {
    pub fn annotate(
        graph: &mut DependencyGraph,
        cycles: &[Cycle],
        semantic: &SemanticModel,
        cancel: &CancelToken,
    ) -> Result<AnnotationOutcome> {
        let mut outcome = AnnotationOutcome::default();

        let in_cycle: HashSet<NodeIndex> = cycles
            .iter()
            .flat_map(|c| c.members.iter().copied())
            .collect();
        let mut nodes: Vec<NodeIndex> = graph
            .sorted_vertices()
            .into_iter()
            .filter(|idx| in_cycle.contains(idx))
            .collect();
        nodes.retain(|idx| !graph.node(*idx).synthetic);

        // Per-project accumulators, merged in a serial fold below.
        let counted = Self::count_projects(graph, &nodes, semantic, cancel)?;

        for (node, counts) in counted {
            cancel.checkpoint()?;
            match counts {
                Some(counts) => {
                    outcome.analyzed_projects += 1;
                    let targets: Vec<(petgraph::graph::EdgeIndex, String)> = graph
                        .graph
                        .edges_directed(node, Direction::Outgoing)
                        .map(|e| (e.id(), graph.node(e.target()).name.clone()))
                        .collect();
                    for (edge, target_name) in targets {
                        if let Some(&count) = counts.get(&target_name) {
                            graph.graph[edge].set_coupling(count);
                            debug!(
                                "{} -> {}: coupling {}",
                                graph.node(node).name,
                                target_name,
                                count
                            );
                        }
                    }
                }
                None => {
                    outcome.degraded_projects += 1;
                    outcome.warnings.push(format!(
                        "{}: semantic analysis unavailable; its edges keep coupling 1",
                        graph.node(node).name
                    ));
                }
            }
        }

        Ok(outcome)
    }

    /// Count call sites for each project; `None` marks a degraded project.
    /// Shared inputs are read-only here, so the per-project work may run in
    /// parallel; the fold back into the graph stays serial.
    #[allow(clippy::type_complexity)]
    fn count_projects(
        graph: &DependencyGraph,
        nodes: &[NodeIndex],
        semantic: &SemanticModel,
        cancel: &CancelToken,
    ) -> Result<Vec<(NodeIndex, Option<HashMap<String, u32>>)>> {
        let count_one = |node: &NodeIndex| -> Result<(NodeIndex, Option<HashMap<String, u32>>)> {
            cancel.checkpoint()?;
            let project = graph.node(*node);
            let key = identity_key(&project.path);
            match semantic.analysis(&key) {
                Some(ProjectAnalysis::Analyzed(scan)) => {
                    let mut total: HashMap<String, u32> = HashMap::new();
                    for model in &scan.models {
                        cancel.checkpoint()?;
                        for (assembly, count) in
                            count_call_sites(model, &project.name, &semantic.type_index)
                        {
                            *total.entry(assembly).or_insert(0) += count;
                        }
                    }
                    Ok((*node, Some(total)))
                }
                _ => Ok((*node, None)),
            }
        };

        #[cfg(feature = "parallel_analysis")]
        return nodes.par_iter().map(count_one).collect();
        #[cfg(not(feature = "parallel_analysis"))]
        nodes.iter().map(count_one).collect()
    }
}
