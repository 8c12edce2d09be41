use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::Serialize;

use crate::workspace::model::{ProjectInfo, ReferenceKind};

/// Discretisation of a coupling score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CouplingStrength {
    Weak,
    Medium,
    Strong,
}

impl CouplingStrength {
    pub fn classify(score: u32) -> Self {
        match score {
            0..=5 => CouplingStrength::Weak,
            6..=20 => CouplingStrength::Medium,
            _ => CouplingStrength::Strong,
        }
    }
}

/// A graph vertex. Synthetic vertices are materialised for assembly
/// references that did not resolve to a loaded project; they have no path.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectNode {
    pub name: String,
    pub path: PathBuf,
    pub target_framework: String,
    pub language: String,
    pub solution: String,
    pub synthetic: bool,
}

impl ProjectNode {
    pub fn from_project(info: &ProjectInfo) -> Self {
        Self {
            name: info.name.clone(),
            path: info.path.clone(),
            target_framework: info.target_framework.clone(),
            language: info.language.clone(),
            solution: info.solution_name.clone(),
            synthetic: false,
        }
    }

    pub fn synthetic(name: impl Into<String>, solution: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: PathBuf::new(),
            target_framework: "unknown".to_string(),
            language: String::new(),
            solution: solution.into(),
            synthetic: true,
        }
    }
}

/// Edge payload. Coupling defaults to 1/Weak until the annotator runs.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DependencyEdge {
    pub kind: ReferenceKind,
    pub coupling_score: u32,
    pub strength: CouplingStrength,
}

impl DependencyEdge {
    pub fn new(kind: ReferenceKind) -> Self {
        Self {
            kind,
            coupling_score: 1,
            strength: CouplingStrength::Weak,
        }
    }

    /// Sets the semantic coupling weight; scores stay >= 1.
    pub fn set_coupling(&mut self, score: u32) {
        let score = score.max(1);
        self.coupling_score = score;
        self.strength = CouplingStrength::classify(score);
    }
}

/// Project identity: canonical absolute path, case-folded on platforms with
/// case-insensitive filesystems.
pub fn identity_key(path: &Path) -> String {
    let key = path.to_string_lossy().into_owned();
    if cfg!(windows) { key.to_lowercase() } else { key }
}

/// Directed dependency graph over an arena of [`ProjectNode`]s.
///
/// Vertices and edges are addressed by dense indices; cycles and
/// recommendations store indices, never owning references. Invariants: no
/// self-loops, at most one edge per `(source, target, kind)`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub graph: DiGraph<ProjectNode, DependencyEdge>,
    by_path: HashMap<String, NodeIndex>,
    by_name: HashMap<String, NodeIndex>,
    edge_keys: HashSet<(NodeIndex, NodeIndex, ReferenceKind)>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex and indexes it by path and name. The name index keeps
    /// the first vertex that claimed a name.
    pub fn add_vertex(&mut self, node: ProjectNode) -> NodeIndex {
        let path_key = if node.synthetic {
            None
        } else {
            Some(identity_key(&node.path))
        };
        let name = node.name.clone();
        let idx = self.graph.add_node(node);
        if let Some(key) = path_key {
            self.by_path.insert(key, idx);
        }
        self.by_name.entry(name).or_insert(idx);
        idx
    }

    pub fn lookup_path(&self, key: &str) -> Option<NodeIndex> {
        self.by_path.get(key).copied()
    }

    pub fn lookup_name(&self, name: &str) -> Option<NodeIndex> {
        self.by_name.get(name).copied()
    }

    /// Adds an edge with default coupling. Returns false (and leaves the
    /// graph unchanged) for self-loops and duplicate `(source, target,
    /// kind)` triples.
    pub fn try_add_edge(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        kind: ReferenceKind,
    ) -> bool {
        self.try_add_edge_weighted(source, target, DependencyEdge::new(kind))
    }

    /// Adds an edge carrying an existing payload (used by the filter to
    /// preserve annotations when deriving a graph).
    pub fn try_add_edge_weighted(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        edge: DependencyEdge,
    ) -> bool {
        if source == target {
            return false;
        }
        if !self.edge_keys.insert((source, target, edge.kind)) {
            return false;
        }
        self.graph.add_edge(source, target, edge);
        true
    }

    pub fn node(&self, idx: NodeIndex) -> &ProjectNode {
        &self.graph[idx]
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edge_endpoints(&self, edge: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(edge)
    }

    /// Vertices sorted by identity (path, then name): the deterministic
    /// visiting order used by the cycle detector and the emitters.
    pub fn sorted_vertices(&self) -> Vec<NodeIndex> {
        let mut vertices: Vec<NodeIndex> = self.graph.node_indices().collect();
        vertices.sort_by(|a, b| {
            let (na, nb) = (&self.graph[*a], &self.graph[*b]);
            (&na.path, &na.name).cmp(&(&nb.path, &nb.name))
        });
        vertices
    }

    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// Real (non-synthetic) vertices in insertion order.
    pub fn project_vertices(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|idx| !self.graph[*idx].synthetic)
            .collect()
    }

    /// Distinct solution names across real vertices, sorted.
    pub fn solutions(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .graph
            .node_indices()
            .filter(|idx| !self.graph[*idx].synthetic)
            .map(|idx| self.graph[idx].solution.clone())
            .filter(|s| !s.is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
