//! Tabular exports. UTF-8, comma-separated, CRLF line endings; fields with
//! commas, quotes or newlines are double-quoted with embedded quotes
//! doubled.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::cycles::detector::Cycle;
use crate::graph::model::DependencyGraph;
use crate::recommend::BreakSuggestion;
use crate::scoring::ExtractionScore;

fn field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_row(out: &mut String, fields: &[String]) {
    let quoted: Vec<String> = fields.iter().map(|f| field(f)).collect();
    out.push_str(&quoted.join(","));
    out.push_str("\r\n");
}

/// One row per project with the four normalised scores, the final score and
/// the category; rows sorted by project name.
pub fn extraction_scores_csv(scores: &[ExtractionScore]) -> String {
    let mut rows: Vec<&ExtractionScore> = scores.iter().collect();
    rows.sort_by(|a, b| {
        (a.project.to_lowercase(), &a.project).cmp(&(b.project.to_lowercase(), &b.project))
    });

    let mut out = String::new();
    push_row(
        &mut out,
        &[
            "Project".to_string(),
            "CouplingScore".to_string(),
            "ComplexityScore".to_string(),
            "TechDebtScore".to_string(),
            "ExternalApiScore".to_string(),
            "FinalScore".to_string(),
            "Category".to_string(),
        ],
    );
    for score in rows {
        push_row(
            &mut out,
            &[
                score.project.clone(),
                format!("{:.1}", score.metrics.coupling.normalised),
                format!("{:.1}", score.metrics.complexity.normalised),
                format!("{:.1}", score.metrics.tech_debt.normalised),
                format!("{:.1}", score.metrics.api_exposure.normalised),
                format!("{:.1}", score.final_score),
                score.category.to_string(),
            ],
        );
    }
    out
}

/// One row per cycle: id, size, members, weak score and the best-ranked
/// break suggestion.
pub fn cycles_csv(
    graph: &DependencyGraph,
    cycles: &[Cycle],
    suggestions: &[BreakSuggestion],
) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &[
            "CycleId".to_string(),
            "Size".to_string(),
            "Projects".to_string(),
            "WeakCouplingScore".to_string(),
            "SuggestedBreak".to_string(),
        ],
    );
    for cycle in cycles {
        let members: Vec<String> = cycle
            .members
            .iter()
            .map(|idx| graph.node(*idx).name.clone())
            .collect();
        let best_break = suggestions
            .iter()
            .filter(|s| s.cycle_id == cycle.id)
            .min_by_key(|s| s.rank)
            .map(|s| format!("{} -> {}", s.source, s.target))
            .unwrap_or_default();
        push_row(
            &mut out,
            &[
                cycle.id.to_string(),
                cycle.size().to_string(),
                members.join("; "),
                cycle
                    .weak_coupling_score
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                best_break,
            ],
        );
    }
    out
}

/// Project-by-project adjacency: row = source, column = target, 0/1.
pub fn dependency_matrix_csv(graph: &DependencyGraph) -> String {
    let mut projects: Vec<NodeIndex> = graph
        .graph
        .node_indices()
        .filter(|idx| !graph.node(*idx).synthetic)
        .collect();
    projects.sort_by(|a, b| {
        let (na, nb) = (graph.node(*a), graph.node(*b));
        (na.name.to_lowercase(), &na.name).cmp(&(nb.name.to_lowercase(), &nb.name))
    });

    let adjacency: HashSet<(NodeIndex, NodeIndex)> = graph
        .graph
        .edge_indices()
        .filter_map(|e| graph.graph.edge_endpoints(e))
        .collect();

    let mut out = String::new();
    let mut header = vec!["Project".to_string()];
    header.extend(projects.iter().map(|idx| graph.node(*idx).name.clone()));
    push_row(&mut out, &header);

    for source in &projects {
        let mut row = vec![graph.node(*source).name.clone()];
        for target in &projects {
            let connected = adjacency.contains(&(*source, *target));
            row.push(if connected { "1" } else { "0" }.to_string());
        }
        push_row(&mut out, &row);
    }
    out
}
