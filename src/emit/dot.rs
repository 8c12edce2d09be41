//! DOT emission with colour-coded overlays.
//!
//! Output is byte-for-byte deterministic for the same inputs: vertices and
//! edges are emitted in stable sorted order and every identifier is quoted.

use std::collections::{HashMap, HashSet};

use petgraph::graph::EdgeIndex;
use petgraph::visit::EdgeRef;

use crate::cycles::detector::Cycle;
use crate::graph::model::DependencyGraph;
use crate::recommend::BreakSuggestion;
use crate::scoring::{DifficultyCategory, ExtractionScore};
use crate::workspace::model::ReferenceKind;

/// Only the first 10 globally ranked suggestions are coloured yellow.
const BREAK_SUGGESTION_CAP: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct DotOptions {
    /// Append `\nScore: N` to node labels when scores are supplied.
    pub score_labels: bool,
}

#[derive(Debug, Default)]
pub struct DotOutput {
    pub text: String,
    pub warnings: Vec<String>,
}

pub struct DotEmitter;

impl DotEmitter {
    pub fn emit(
        graph: &DependencyGraph,
        cycles: &[Cycle],
        suggestions: &[BreakSuggestion],
        scores: Option<&[ExtractionScore]>,
        options: &DotOptions,
    ) -> DotOutput {
        let mut output = DotOutput::default();

        // Scores by project name; the first entry wins on duplicates.
        let score_map: Option<HashMap<&str, &ExtractionScore>> = scores.map(|list| {
            let mut map: HashMap<&str, &ExtractionScore> = HashMap::new();
            for score in list {
                if map.contains_key(score.project.as_str()) {
                    output.warnings.push(format!(
                        "duplicate extraction score for '{}'; keeping the first",
                        score.project
                    ));
                } else {
                    map.insert(score.project.as_str(), score);
                }
            }
            map
        });

        let top_breaks: HashSet<EdgeIndex> = suggestions
            .iter()
            .filter(|s| s.rank <= BREAK_SUGGESTION_CAP)
            .map(|s| s.edge)
            .collect();
        let cycle_edges = edges_within_cycles(graph, cycles);

        let text = &mut output.text;
        text.push_str("digraph dependencies {\n");
        text.push_str("    rankdir=LR;\n");
        text.push_str("    nodesep=0.5;\n");
        text.push_str("    ranksep=1.0;\n");
        text.push_str("    node [shape=box, style=filled];\n");
        text.push_str("    edge [arrowhead=normal];\n\n");

        // Nodes first: every declaration precedes the first referencing edge.
        let mut nodes: Vec<_> = graph.graph.node_indices().collect();
        nodes.sort_by(|a, b| {
            let (na, nb) = (graph.node(*a), graph.node(*b));
            (na.name.to_lowercase(), &na.name, &na.path)
                .cmp(&(nb.name.to_lowercase(), &nb.name, &nb.path))
        });
        for idx in &nodes {
            let node = graph.node(*idx);
            let score = score_map
                .as_ref()
                .and_then(|map| map.get(node.name.as_str()).copied());
            if score_map.is_some() && score.is_none() && !node.synthetic {
                output.warnings.push(format!(
                    "no extraction score for '{}'; using the default colour",
                    node.name
                ));
            }
            let (fill, font) = match score.map(|s| s.category) {
                Some(DifficultyCategory::Easy) => ("lightgreen", "black"),
                Some(DifficultyCategory::Medium) => ("yellow", "black"),
                Some(DifficultyCategory::Hard) => ("lightcoral", "white"),
                None => ("lightblue", "black"),
            };
            let name = escape(&node.name);
            match score {
                Some(s) if options.score_labels => {
                    text.push_str(&format!(
                        "    \"{name}\" [fillcolor={fill}, fontcolor={font}, label=\"{name}\\nScore: {}\"];\n",
                        s.final_score.round() as i64
                    ));
                }
                _ => {
                    text.push_str(&format!(
                        "    \"{name}\" [fillcolor={fill}, fontcolor={font}];\n"
                    ));
                }
            }
        }
        text.push('\n');

        // Edges in stable order.
        let mut edges: Vec<(String, String, u8, EdgeIndex)> = graph
            .graph
            .edge_references()
            .map(|e| {
                let kind = match e.weight().kind {
                    ReferenceKind::Project => 0u8,
                    ReferenceKind::Assembly => 1u8,
                };
                (
                    graph.node(e.source()).name.clone(),
                    graph.node(e.target()).name.clone(),
                    kind,
                    e.id(),
                )
            })
            .collect();
        edges.sort_by(|a, b| {
            (a.0.to_lowercase(), &a.0, a.1.to_lowercase(), &a.1, a.2).cmp(&(
                b.0.to_lowercase(),
                &b.0,
                b.1.to_lowercase(),
                &b.1,
                b.2,
            ))
        });
        for (source, target, _, edge) in &edges {
            let attrs = edge_attributes(graph, *edge, &top_breaks, &cycle_edges);
            text.push_str(&format!(
                "    \"{}\" -> \"{}\" [{attrs}];\n",
                escape(source),
                escape(target)
            ));
        }

        // Legend clusters trail the main content.
        if score_map.is_some() {
            text.push('\n');
            text.push_str("    subgraph cluster_difficulty {\n");
            text.push_str("        label=\"Extraction Difficulty\";\n");
            text.push_str(
                "        \"legend_easy\" [label=\"Easy (0-33)\", fillcolor=lightgreen, fontcolor=black];\n",
            );
            text.push_str(
                "        \"legend_medium\" [label=\"Medium (34-66)\", fillcolor=yellow, fontcolor=black];\n",
            );
            text.push_str(
                "        \"legend_hard\" [label=\"Hard (67-100)\", fillcolor=lightcoral, fontcolor=white];\n",
            );
            text.push_str("    }\n");
        }
        if !cycles.is_empty() || !suggestions.is_empty() {
            text.push('\n');
            text.push_str("    subgraph cluster_dependency_types {\n");
            text.push_str("        label=\"Dependency Types\";\n");
            if !cycles.is_empty() {
                text.push_str(
                    "        \"legend_cycles\" [label=\"Red: Circular Dependencies\", fillcolor=white, fontcolor=red];\n",
                );
            }
            if !suggestions.is_empty() {
                text.push_str(
                    "        \"legend_breaks\" [label=\"Yellow: Top 10 Suggested Break Points\", fillcolor=white, fontcolor=black];\n",
                );
            }
            text.push_str("    }\n");
        }
        let solutions = graph.solutions();
        if solutions.len() > 1 {
            text.push('\n');
            text.push_str("    subgraph cluster_solutions {\n");
            text.push_str("        label=\"Solutions\";\n");
            for solution in &solutions {
                let escaped = escape(solution);
                text.push_str(&format!(
                    "        \"legend_solution_{escaped}\" [label=\"{escaped}\", fillcolor=white, fontcolor=black];\n"
                ));
            }
            text.push_str("    }\n");
        }

        text.push_str("}\n");
        output
    }
}

/// Colour priority: break suggestion, then cycle, then cross-solution,
/// then default.
fn edge_attributes(
    graph: &DependencyGraph,
    edge: EdgeIndex,
    top_breaks: &HashSet<EdgeIndex>,
    cycle_edges: &HashSet<EdgeIndex>,
) -> String {
    if top_breaks.contains(&edge) {
        return "color=yellow, style=bold".to_string();
    }
    if cycle_edges.contains(&edge) {
        return "color=red, style=bold".to_string();
    }
    if let Some((source, target)) = graph.graph.edge_endpoints(edge) {
        let (s, t) = (graph.node(source), graph.node(target));
        if !s.solution.is_empty() && !t.solution.is_empty() && s.solution != t.solution {
            return "color=blue".to_string();
        }
    }
    "color=black".to_string()
}

fn edges_within_cycles(graph: &DependencyGraph, cycles: &[Cycle]) -> HashSet<EdgeIndex> {
    let mut inside = HashSet::new();
    for cycle in cycles {
        let members = cycle.member_set();
        for edge in graph.graph.edge_indices() {
            if let Some((source, target)) = graph.graph.edge_endpoints(edge)
                && members.contains(&source)
                && members.contains(&target)
            {
                inside.insert(edge);
            }
        }
    }
    inside
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

/// `{SolutionName}-dependencies.dot` for a single solution,
/// `Ecosystem-dependencies.dot` otherwise. Unsafe filesystem characters in
/// the solution name become underscores.
pub fn output_filename(solutions: &[String]) -> String {
    let mut distinct: Vec<&String> = solutions.iter().collect();
    distinct.sort();
    distinct.dedup();
    if distinct.len() == 1 {
        format!("{}-dependencies.dot", sanitize(distinct[0]))
    } else {
        "Ecosystem-dependencies.dot".to_string()
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}
