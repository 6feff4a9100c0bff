//! Orphan detection.

use tagtrace_common::TagMatch;

use crate::graph::TagGraph;

/// Returns the tags in `tags` that are disconnected from everything else.
///
/// See [`orphans_in`].
pub fn find_orphaned_tags(tags: &[TagMatch]) -> Vec<TagMatch> {
    orphans_in(&TagGraph::build(tags))
}

/// Returns the orphaned nodes of a built graph.
///
/// A node is orphaned when none of its occurrences lists a reference, no
/// other node resolves a reference to it, and no other category shares its
/// identifier. One entry per node (its first occurrence), ordered by
/// location. Severity is the caller's decision.
pub fn orphans_in(graph: &TagGraph) -> Vec<TagMatch> {
    let mut orphans: Vec<TagMatch> = graph
        .keys()
        .filter(|key| {
            !graph.has_outgoing_references(key)
                && !graph.has_chain_sibling(key)
                && graph
                    .node(key)
                    .is_some_and(|n| !graph.has_incoming_from_other(n))
        })
        .filter_map(|key| graph.representative(key).cloned())
        .collect();
    orphans.sort_by(TagMatch::cmp_location);
    orphans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{tag, tag_at};
    use pretty_assertions::assert_eq;

    fn orphan_tokens(tags: &[TagMatch]) -> Vec<String> {
        find_orphaned_tags(tags)
            .iter()
            .map(TagMatch::token)
            .collect()
    }

    #[test]
    fn complete_chain_has_no_orphans() {
        let tags: Vec<TagMatch> = ["REQUIREMENT", "DESIGN", "TASK", "TEST"]
            .iter()
            .map(|c| tag(c, "AUTH-100", &[]))
            .collect();
        assert!(orphan_tokens(&tags).is_empty());
    }

    #[test]
    fn isolated_tag_is_orphan() {
        let tags = vec![
            tag("DOC", "README", &[]),
            tag("TASK", "A-1", &["DESIGN:A-2"]),
            tag("DESIGN", "A-2", &[]),
        ];
        assert_eq!(orphan_tokens(&tags), vec!["@DOC:README"]);
    }

    #[test]
    fn referencing_an_orphan_adopts_it() {
        let mut tags = vec![tag("DOC", "README", &[]), tag("TASK", "A-1", &[])];
        assert_eq!(orphan_tokens(&tags).len(), 2);
        tags[1].references.push("DOC:README".to_string());
        assert!(orphan_tokens(&tags).is_empty());
    }

    #[test]
    fn broken_outgoing_reference_is_not_orphan() {
        let tags = vec![tag("TASK", "A-1", &["DESIGN:NOPE"])];
        assert!(orphan_tokens(&tags).is_empty());
    }

    #[test]
    fn self_reference_only_counts_as_outgoing() {
        let tags = vec![tag("TASK", "A-1", &["TASK:A-1"])];
        assert!(orphan_tokens(&tags).is_empty());
    }

    #[test]
    fn idempotent_and_sorted() {
        let tags = vec![
            tag_at("DOC", "B", "z.md", 1, &[]),
            tag_at("DOC", "A", "a.md", 4, &[]),
        ];
        let first = orphan_tokens(&tags);
        assert_eq!(first, vec!["@DOC:A", "@DOC:B"]);
        assert_eq!(orphan_tokens(&tags), first);
    }
}
