use std::collections::{HashMap, HashSet};

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::Serialize;

use crate::graph::model::DependencyGraph;

/// A circular dependency: one strongly connected component of size >= 2.
///
/// `weak_coupling_score` and `weak_edges` stay empty until the
/// recommendation engine has run.
#[derive(Debug, Clone)]
pub struct Cycle {
    /// 1-based, assigned in discovery order.
    pub id: usize,
    /// Members in DFS discovery order.
    pub members: Vec<NodeIndex>,
    pub weak_coupling_score: Option<u32>,
    pub weak_edges: Vec<EdgeIndex>,
}

impl Cycle {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn member_set(&self) -> HashSet<NodeIndex> {
        self.members.iter().copied().collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CycleStatistics {
    pub total_cycles: usize,
    pub largest_cycle_size: usize,
    /// Set semantics over project identity: a project in several SCCs
    /// counts once.
    pub distinct_projects_in_cycles: usize,
    /// Percentage of vertices participating in any cycle; 0 for an empty
    /// graph.
    pub participation_rate: f64,
}

/// Tarjan's strongly-connected-components over the filtered graph.
///
/// Vertices are visited in project-path sort order and neighbour lists are
/// sorted the same way, so discovery order (and therefore cycle ids) is
/// stable across runs. Single vertices without self-loops are not cycles.
pub struct CycleDetector;

impl CycleDetector {
    pub fn detect(graph: &DependencyGraph) -> (Vec<Cycle>, CycleStatistics) {
        let order = graph.sorted_vertices();
        let n = order.len();
        let position: HashMap<NodeIndex, usize> = order
            .iter()
            .enumerate()
            .map(|(pos, idx)| (*idx, pos))
            .collect();

        // Adjacency in sorted-position space; parallel kinds collapse.
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in graph.graph.edge_indices() {
            if let Some((source, target)) = graph.graph.edge_endpoints(edge) {
                adjacency[position[&source]].push(position[&target]);
            }
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
            neighbours.dedup();
        }

        let components = tarjan(&adjacency);

        let cycles: Vec<Cycle> = components
            .into_iter()
            .filter(|(_, members)| members.len() >= 2)
            .enumerate()
            .map(|(i, (_, members))| Cycle {
                id: i + 1,
                members: members.into_iter().map(|pos| order[pos]).collect(),
                weak_coupling_score: None,
                weak_edges: Vec::new(),
            })
            .collect();

        let mut distinct: HashSet<NodeIndex> = HashSet::new();
        for cycle in &cycles {
            distinct.extend(cycle.members.iter().copied());
        }
        let stats = CycleStatistics {
            total_cycles: cycles.len(),
            largest_cycle_size: cycles.iter().map(Cycle::size).max().unwrap_or(0),
            distinct_projects_in_cycles: distinct.len(),
            participation_rate: if n == 0 {
                0.0
            } else {
                distinct.len() as f64 / n as f64 * 100.0
            },
        };

        (cycles, stats)
    }
}

/// Iterative Tarjan over a position-indexed adjacency list. Returns the
/// components ordered by the discovery index of their root, each listing
/// member positions in discovery order.
fn tarjan(adjacency: &[Vec<usize>]) -> Vec<(usize, Vec<usize>)> {
    let n = adjacency.len();
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut low: Vec<usize> = vec![0; n];
    let mut on_stack: Vec<bool> = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next_index = 0usize;
    let mut components: Vec<(usize, Vec<usize>)> = Vec::new();

    // (vertex, next neighbour offset)
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if index[start].is_some() {
            continue;
        }
        frames.push((start, 0));
        index[start] = Some(next_index);
        low[start] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack[start] = true;

        while let Some(frame) = frames.last_mut() {
            let v = frame.0;
            let next = if frame.1 < adjacency[v].len() {
                let w = adjacency[v][frame.1];
                frame.1 += 1;
                Some(w)
            } else {
                None
            };
            match next {
                Some(w) if index[w].is_none() => {
                    frames.push((w, 0));
                    index[w] = Some(next_index);
                    low[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                }
                Some(w) => {
                    if on_stack[w]
                        && let Some(w_index) = index[w]
                    {
                        low[v] = low[v].min(w_index);
                    }
                }
                None => {
                    frames.pop();
                    if let Some(&(parent, _)) = frames.last() {
                        low[parent] = low[parent].min(low[v]);
                    }
                    let v_index = index[v].unwrap_or(0);
                    if low[v] == v_index {
                        let mut members = Vec::new();
                        while let Some(w) = stack.pop() {
                            on_stack[w] = false;
                            members.push(w);
                            if w == v {
                                break;
                            }
                        }
                        // Pop order is reverse discovery order within the SCC.
                        members.sort_by_key(|w| index[*w]);
                        components.push((v_index, members));
                    }
                }
            }
        }
    }

    // SCC roots complete bottom-up; ids follow root discovery order instead.
    components.sort_by_key(|(root_index, _)| *root_index);
    components
}
