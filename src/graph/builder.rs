use log::debug;

use crate::error::{AnalyzerError, Result};
use crate::graph::model::{DependencyGraph, ProjectNode, identity_key};
use crate::workspace::model::{ProjectInfo, ReferenceKind};

#[derive(Debug, Default)]
pub struct BuildOutput {
    pub graph: DependencyGraph,
    pub warnings: Vec<String>,
}

/// Turns loaded projects into the typed dependency graph.
///
/// One vertex per distinct project identity; one edge per declared reference
/// whose target resolves. Unresolved assembly references become synthetic
/// vertices so the filter can still see (and usually drop) them; unresolved
/// project references are dropped with a warning.
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn build(projects: &[ProjectInfo]) -> Result<BuildOutput> {
        let mut output = BuildOutput::default();
        let graph = &mut output.graph;

        // Vertices first. Duplicate identities across solutions collapse to
        // the first occurrence, which also fixes the solution attribute.
        for info in projects {
            let key = identity_key(&info.path);
            if let Some(existing) = graph.lookup_path(&key) {
                let node = graph.node(existing);
                if node.name != info.name {
                    return Err(AnalyzerError::input(
                        "project set",
                        format!(
                            "projects '{}' and '{}' share the canonical path {}",
                            node.name,
                            info.name,
                            info.path.display()
                        ),
                        "Two distinct projects cannot live at one path; remove or rename one of them",
                    ));
                }
                debug!(
                    "project {} already present (first seen in solution '{}')",
                    node.name, node.solution
                );
                continue;
            }
            graph.add_vertex(ProjectNode::from_project(info));
        }

        // Edges. try_add_edge silently drops duplicates, so re-listed
        // projects do not double their references.
        for info in projects {
            let Some(source) = graph.lookup_path(&identity_key(&info.path)) else {
                continue;
            };
            for reference in &info.references {
                let target = match reference.kind {
                    ReferenceKind::Project => {
                        // Prefer the path; fall back to the name.
                        let by_path = reference
                            .target_path
                            .as_deref()
                            .and_then(|p| graph.lookup_path(&identity_key(p)));
                        match by_path.or_else(|| graph.lookup_name(&reference.target_name)) {
                            Some(idx) => idx,
                            None => {
                                output.warnings.push(format!(
                                    "{}: project reference '{}' does not resolve to a loaded project",
                                    info.name, reference.target_name
                                ));
                                continue;
                            }
                        }
                    }
                    ReferenceKind::Assembly => {
                        match graph.lookup_name(&reference.target_name) {
                            Some(idx) => idx,
                            None => {
                                let solution = graph.node(source).solution.clone();
                                graph.add_vertex(ProjectNode::synthetic(
                                    reference.target_name.clone(),
                                    solution,
                                ))
                            }
                        }
                    }
                };
                if target == source {
                    output.warnings.push(format!(
                        "{}: dropped self-referencing edge '{}'",
                        info.name, reference.target_name
                    ));
                    continue;
                }
                graph.try_add_edge(source, target, reference.kind);
            }
        }

        Ok(output)
    }
}
