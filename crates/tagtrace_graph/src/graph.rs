//! The reference graph over logical tag nodes.
//!
//! Each node is a [`TagKey`]: the union of every occurrence of one
//! `(category, identifier)` pair. Each edge is a reference that resolves to
//! an existing node. Unresolved references produce no edge.

use std::collections::BTreeMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tagtrace_common::{TagKey, TagMatch};

/// Directed reference graph built from one match snapshot.
///
/// Nodes are inserted in [`TagKey`] order, so comparing two `NodeIndex`
/// values compares their keys.
#[derive(Debug, Clone, Default)]
pub struct TagGraph {
    graph: DiGraph<TagKey, ()>,
    index: BTreeMap<TagKey, NodeIndex>,
    occurrences: BTreeMap<TagKey, Vec<TagMatch>>,
    categories_per_identifier: BTreeMap<String, usize>,
}

impl TagGraph {
    /// Builds the graph from a match set.
    pub fn build(tags: &[TagMatch]) -> Self {
        let mut occurrences: BTreeMap<TagKey, Vec<TagMatch>> = BTreeMap::new();
        for tag in tags {
            occurrences.entry(tag.key()).or_default().push(tag.clone());
        }
        for list in occurrences.values_mut() {
            list.sort_by(TagMatch::cmp_location);
        }

        let mut graph = DiGraph::with_capacity(occurrences.len(), 0);
        let mut index = BTreeMap::new();
        let mut categories_per_identifier: BTreeMap<String, usize> = BTreeMap::new();
        for key in occurrences.keys() {
            index.insert(key.clone(), graph.add_node(key.clone()));
            *categories_per_identifier
                .entry(key.identifier.clone())
                .or_default() += 1;
        }

        for tag in tags {
            let Some(&from) = index.get(&tag.key()) else {
                continue;
            };
            for target in tag.reference_keys() {
                if let Some(&to) = index.get(&target) {
                    graph.update_edge(from, to, ());
                }
            }
        }

        Self {
            graph,
            index,
            occurrences,
            categories_per_identifier,
        }
    }

    /// Number of logical nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct resolved edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether a node exists for `key`.
    pub fn contains(&self, key: &TagKey) -> bool {
        self.index.contains_key(key)
    }

    /// All node keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &TagKey> {
        self.index.keys()
    }

    /// The node index for `key`.
    pub fn node(&self, key: &TagKey) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    /// The key of a node.
    pub fn key(&self, node: NodeIndex) -> &TagKey {
        &self.graph[node]
    }

    /// All occurrences of a node, ordered by location.
    pub fn occurrences(&self, key: &TagKey) -> &[TagMatch] {
        self.occurrences.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first occurrence of a node by location.
    pub fn representative(&self, key: &TagKey) -> Option<&TagMatch> {
        self.occurrences(key).first()
    }

    /// Direct successors of a node, in key order.
    pub fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        next.sort();
        next.dedup();
        next
    }

    /// Whether any occurrence of `key` lists a reference, resolved or not.
    pub fn has_outgoing_references(&self, key: &TagKey) -> bool {
        self.occurrences(key).iter().any(|t| !t.references.is_empty())
    }

    /// Whether some other node has a resolved reference to this one.
    pub fn has_incoming_from_other(&self, node: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .any(|n| n != node)
    }

    /// Whether another category carries the same identifier, i.e. the node
    /// is linked into a chain by identifier.
    pub fn has_chain_sibling(&self, key: &TagKey) -> bool {
        let same_identifier = self
            .categories_per_identifier
            .get(&key.identifier)
            .copied()
            .unwrap_or(0);
        let own = usize::from(self.contains(key));
        same_identifier > own
    }

    /// Every identifier seen under `category`, sorted.
    pub fn identifiers_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.index
            .keys()
            .filter(move |k| k.category == category)
            .map(|k| k.identifier.as_str())
    }

    /// The underlying petgraph.
    pub fn inner(&self) -> &DiGraph<TagKey, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{tag, tag_at};

    #[test]
    fn occurrences_are_merged_per_key() {
        let graph = TagGraph::build(&[
            tag_at("TEST", "A-1", "tests/b.rs", 9, &[]),
            tag_at("TEST", "A-1", "tests/a.rs", 3, &[]),
            tag("TASK", "A-1", &[]),
        ]);
        assert_eq!(graph.node_count(), 2);
        let key = TagKey::new("TEST", "A-1");
        assert_eq!(graph.occurrences(&key).len(), 2);
        assert_eq!(graph.representative(&key).unwrap().location(), "tests/a.rs:3");
    }

    #[test]
    fn unresolved_references_add_no_edge() {
        let graph = TagGraph::build(&[
            tag("TASK", "A-1", &["DESIGN:A-1", "DESIGN:MISSING"]),
            tag("DESIGN", "A-1", &[]),
        ]);
        assert_eq!(graph.edge_count(), 1);
        let design = graph.node(&TagKey::new("DESIGN", "A-1")).unwrap();
        assert!(graph.has_incoming_from_other(design));
    }

    #[test]
    fn duplicate_references_collapse() {
        let graph = TagGraph::build(&[
            tag_at("TASK", "A-1", "a.rs", 1, &["DESIGN:A-1"]),
            tag_at("TASK", "A-1", "b.rs", 1, &["DESIGN:A-1"]),
            tag("DESIGN", "A-1", &[]),
        ]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn self_reference_is_not_incoming_from_other() {
        let graph = TagGraph::build(&[tag("TASK", "A-1", &["TASK:A-1"])]);
        let node = graph.node(&TagKey::new("TASK", "A-1")).unwrap();
        assert_eq!(graph.successors(node), vec![node]);
        assert!(!graph.has_incoming_from_other(node));
    }

    #[test]
    fn chain_siblings_and_identifiers() {
        let graph = TagGraph::build(&[
            tag("TASK", "A-1", &[]),
            tag("TEST", "A-1", &[]),
            tag("TEST", "B-2", &[]),
        ]);
        assert!(graph.has_chain_sibling(&TagKey::new("TASK", "A-1")));
        assert!(!graph.has_chain_sibling(&TagKey::new("TEST", "B-2")));
        assert_eq!(graph.identifiers_in("TEST").collect::<Vec<_>>(), vec!["A-1", "B-2"]);
    }
}
