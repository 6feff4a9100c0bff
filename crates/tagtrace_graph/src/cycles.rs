//! Circular reference detection.
//!
//! Cycles are found per strongly connected component with Johnson's
//! algorithm. Within a component, each elementary cycle is enumerated exactly
//! once by rooting it at its smallest node and only extending paths through
//! larger nodes. Nodes that cannot currently reach the root stay blocked, so
//! the work between two reported cycles is linear in the component size.

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tagtrace_common::{TagKey, TagMatch};

use crate::graph::TagGraph;

/// One elementary cycle.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Cycle {
    /// The first occurrence of each participating node, in reference order,
    /// starting from the smallest `(category, identifier)`.
    pub nodes: Vec<TagMatch>,
}

impl Cycle {
    /// The participating node keys, in order.
    pub fn keys(&self) -> Vec<TagKey> {
        self.nodes.iter().map(TagMatch::key).collect()
    }

    /// Renders the cycle as `A:1 -> B:2 -> A:1`.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self.nodes.iter().map(|n| n.key().to_string()).collect();
        if let Some(first) = parts.first().cloned() {
            parts.push(first);
        }
        parts.join(" -> ")
    }
}

/// Cycles found, and whether enumeration stopped at the limit.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct CycleSearch {
    /// Cycles in report order.
    pub cycles: Vec<Cycle>,
    /// `true` if more cycles may exist than were returned.
    pub truncated: bool,
}

/// Returns every elementary cycle in the reference graph of `tags`.
pub fn detect_circular_references(tags: &[TagMatch]) -> Vec<Cycle> {
    find_cycles(&TagGraph::build(tags), usize::MAX).cycles
}

/// Enumerates up to `max_cycles` elementary cycles of `graph`.
pub fn find_cycles(graph: &TagGraph, max_cycles: usize) -> CycleSearch {
    let mut found: Vec<Vec<NodeIndex>> = Vec::new();
    let mut truncated = false;

    let mut components = tarjan_scc(graph.inner());
    for component in &mut components {
        component.sort();
    }
    components.sort();

    'components: for component in &components {
        let head = component[0];
        if component.len() == 1 && !graph.successors(head).contains(&head) {
            continue;
        }
        let members: HashSet<NodeIndex> = component.iter().copied().collect();
        for &start in component {
            let mut search = Search {
                graph,
                members: &members,
                start,
                path: Vec::new(),
                blocked: HashSet::new(),
                blocked_by: HashMap::new(),
                found: &mut found,
                limit: max_cycles,
                truncated: false,
            };
            search.circuit(start);
            if search.truncated {
                truncated = true;
                break 'components;
            }
        }
    }

    let mut cycles: Vec<Cycle> = found
        .into_iter()
        .map(|path| Cycle {
            nodes: path
                .into_iter()
                .filter_map(|n| graph.representative(graph.key(n)).cloned())
                .collect(),
        })
        .collect();
    cycles.sort_by(|a, b| {
        let by_location = match (a.nodes.first(), b.nodes.first()) {
            (Some(x), Some(y)) => x.cmp_location(y),
            _ => std::cmp::Ordering::Equal,
        };
        by_location.then_with(|| a.keys().cmp(&b.keys()))
    });

    CycleSearch { cycles, truncated }
}

struct Search<'a> {
    graph: &'a TagGraph,
    members: &'a HashSet<NodeIndex>,
    start: NodeIndex,
    path: Vec<NodeIndex>,
    blocked: HashSet<NodeIndex>,
    /// Johnson's B-lists: `w -> {v}` means unblocking `w` unblocks each `v`.
    blocked_by: HashMap<NodeIndex, HashSet<NodeIndex>>,
    found: &'a mut Vec<Vec<NodeIndex>>,
    limit: usize,
    truncated: bool,
}

impl Search<'_> {
    /// Successors that may extend a path rooted at `start`. Nodes below the
    /// root belong to cycles already reported.
    fn next_nodes(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .successors(node)
            .into_iter()
            .filter(|n| *n >= self.start && self.members.contains(n))
            .collect()
    }

    /// Extends the path through `node`. Returns whether some cycle back to
    /// the root was closed below it.
    fn circuit(&mut self, node: NodeIndex) -> bool {
        let mut closed = false;
        self.path.push(node);
        self.blocked.insert(node);

        let next_nodes = self.next_nodes(node);
        for &next in &next_nodes {
            if self.truncated {
                break;
            }
            if next == self.start {
                if self.found.len() >= self.limit {
                    self.truncated = true;
                    break;
                }
                self.found.push(self.path.clone());
                closed = true;
            } else if !self.blocked.contains(&next) && self.circuit(next) {
                closed = true;
            }
        }

        if closed {
            self.unblock(node);
        } else {
            for next in next_nodes {
                self.blocked_by.entry(next).or_default().insert(node);
            }
        }
        self.path.pop();
        closed
    }

    fn unblock(&mut self, node: NodeIndex) {
        let mut pending = vec![node];
        while let Some(n) = pending.pop() {
            if !self.blocked.remove(&n) {
                continue;
            }
            if let Some(waiting) = self.blocked_by.remove(&n) {
                pending.extend(waiting.into_iter().filter(|w| self.blocked.contains(w)));
            }
        }
    }
}
