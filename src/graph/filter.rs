use crate::config::FilterConfig;
use crate::graph::model::DependencyGraph;

/// One filter pattern. Exactly two shapes: a trailing-wildcard prefix and an
/// exact name. Matching is case-insensitive; an interior `*` is a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Prefix(String),
    Exact(String),
}

impl Pattern {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.strip_suffix('*') {
            Some(prefix) => Pattern::Prefix(prefix.to_lowercase()),
            None => Pattern::Exact(text.to_lowercase()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        match self {
            Pattern::Prefix(prefix) => name.starts_with(prefix),
            Pattern::Exact(exact) => name == *exact,
        }
    }
}

/// Drops edges pointing at framework targets.
///
/// The derived graph keeps every vertex of the input; only edges whose
/// target name matches a block pattern (and no allow pattern) are removed.
/// Applying the same filter twice is a fixed point.
#[derive(Debug, Clone, Default)]
pub struct FrameworkFilter {
    block: Vec<Pattern>,
    allow: Vec<Pattern>,
}

impl FrameworkFilter {
    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            block: config.block_list.iter().map(|p| Pattern::parse(p)).collect(),
            allow: config.allow_list.iter().map(|p| Pattern::parse(p)).collect(),
        }
    }

    /// Allow short-circuits to retain; then block drops; otherwise retain.
    pub fn retains(&self, target_name: &str) -> bool {
        if self.allow.iter().any(|p| p.matches(target_name)) {
            return true;
        }
        !self.block.iter().any(|p| p.matches(target_name))
    }

    pub fn apply(&self, graph: &DependencyGraph) -> DependencyGraph {
        let mut filtered = DependencyGraph::new();
        // Same insertion order, so vertex indices carry over unchanged.
        for idx in graph.graph.node_indices() {
            filtered.add_vertex(graph.node(idx).clone());
        }
        for edge in graph.graph.edge_indices() {
            let Some((source, target)) = graph.graph.edge_endpoints(edge) else {
                continue;
            };
            if self.retains(&graph.node(target).name) {
                filtered.try_add_edge_weighted(source, target, graph.graph[edge]);
            }
        }
        filtered
    }
}
