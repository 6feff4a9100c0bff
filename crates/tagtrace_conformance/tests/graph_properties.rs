//! Properties of the validator checks over hand-built match sets.

use pretty_assertions::assert_eq;
use tagtrace_common::{TagKey, TagMatch};
use tagtrace_conformance::{chain, tag, tag_at};
use tagtrace_config::Taxonomy;
use tagtrace_graph::{
    detect_circular_references, find_orphaned_tags, validate_primary_chain,
    validate_reference_integrity, Validator,
};

const PRIMARY: [&str; 4] = ["REQUIREMENT", "DESIGN", "TASK", "TEST"];

fn keys(tags: &[TagMatch]) -> Vec<TagKey> {
    let mut keys: Vec<TagKey> = tags.iter().map(TagMatch::key).collect();
    keys.sort();
    keys
}

#[test]
fn every_single_missing_category_scores_three_quarters() {
    let primary = Taxonomy::default().primary;
    for missing in PRIMARY {
        let present: Vec<&str> = PRIMARY.iter().copied().filter(|c| *c != missing).collect();
        let tags = chain("PAY-7", "src/pay.rs", &present);
        let result = validate_primary_chain("PAY-7", &tags, &primary);
        assert!(!result.is_valid, "missing {missing}");
        assert_eq!(result.completeness_score, 0.75, "missing {missing}");
        assert_eq!(result.missing_links, vec![missing.to_string()]);
    }
}

#[test]
fn duplicate_occurrences_do_not_change_chain_result() {
    let primary = Taxonomy::default().primary;
    let mut tags = chain("PAY-7", "src/pay.rs", &PRIMARY);
    tags.extend(chain("PAY-7", "tests/pay.rs", &["TEST", "TEST"]));
    let result = validate_primary_chain("PAY-7", &tags, &primary);
    assert!(result.is_valid);
    assert_eq!(result.completeness_score, 1.0);
}

#[test]
fn cycle_round_trip() {
    let mut tags = vec![
        tag("TASK", "A", &["TASK:B"]),
        tag("TASK", "B", &["TASK:C"]),
        tag("TASK", "C", &[]),
    ];
    assert!(detect_circular_references(&tags).is_empty());

    tags[2].references.push("TASK:A".to_string());
    let cycles = detect_circular_references(&tags);
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        keys(&cycles[0].nodes),
        vec![
            TagKey::new("TASK", "A"),
            TagKey::new("TASK", "B"),
            TagKey::new("TASK", "C"),
        ]
    );

    tags[1].references.clear();
    assert!(detect_circular_references(&tags).is_empty());
}

#[test]
fn self_reference_is_a_cycle() {
    let tags = vec![tag("DESIGN", "LOOP-1", &["DESIGN:LOOP-1"])];
    let cycles = detect_circular_references(&tags);
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].nodes.len(), 1);
}

#[test]
fn cycle_search_is_order_independent() {
    let tags = vec![
        tag_at("TASK", "A", "a.rs", 1, &["TASK:B"]),
        tag_at("TASK", "B", "b.rs", 1, &["TASK:A"]),
        tag_at("TEST", "X", "c.rs", 1, &["TEST:Y"]),
        tag_at("TEST", "Y", "d.rs", 1, &["TEST:X"]),
    ];
    let mut reversed = tags.clone();
    reversed.reverse();
    let forward: Vec<String> = detect_circular_references(&tags)
        .iter()
        .map(|c| c.describe())
        .collect();
    let backward: Vec<String> = detect_circular_references(&reversed)
        .iter()
        .map(|c| c.describe())
        .collect();
    assert_eq!(forward.len(), 2);
    assert_eq!(forward, backward);
}

#[test]
fn orphans_are_idempotent() {
    let tags = vec![
        tag("TASK", "A-1", &["DESIGN:A-1"]),
        tag("DESIGN", "A-1", &[]),
        tag_at("DOC", "LONELY-1", "docs/notes.md", 4, &[]),
    ];
    let first = find_orphaned_tags(&tags);
    let second = find_orphaned_tags(&tags);
    assert_eq!(first, second);
    assert_eq!(keys(&first), vec![TagKey::new("DOC", "LONELY-1")]);
}

#[test]
fn reference_from_orphan_clears_it() {
    let mut tags = vec![
        tag("TASK", "A-1", &[]),
        tag_at("DOC", "LONELY-1", "docs/notes.md", 4, &[]),
    ];
    assert_eq!(find_orphaned_tags(&tags).len(), 2);
    tags[1].references.push("TASK:A-1".to_string());
    assert!(find_orphaned_tags(&tags).is_empty());
}

#[test]
fn reference_to_orphan_clears_it() {
    let mut tags = vec![
        tag("TASK", "A-1", &[]),
        tag_at("DOC", "LONELY-1", "docs/notes.md", 4, &[]),
    ];
    tags[0].references.push("DOC:LONELY-1".to_string());
    assert!(find_orphaned_tags(&tags).is_empty());
}

#[test]
fn chain_siblings_are_not_orphans() {
    let tags = chain("AUTH-1", "src/auth.rs", &["REQUIREMENT", "TEST"]);
    assert!(find_orphaned_tags(&tags).is_empty());
}

#[test]
fn one_violation_per_unresolved_pair() {
    let mut tags = vec![
        tag_at("TASK", "A-1", "a.rs", 1, &["DESIGN:A-1", "REQUIREMENT:A-1"]),
        tag_at("TEST", "A-1", "b.rs", 1, &["DESIGN:A-1"]),
    ];
    let violations = validate_reference_integrity(&tags);
    assert_eq!(violations.len(), 3);
    let pairs: Vec<(&str, &str)> = violations
        .iter()
        .map(|v| (v.source_category.as_str(), v.broken_reference.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("TASK", "DESIGN:A-1"),
            ("TASK", "REQUIREMENT:A-1"),
            ("TEST", "DESIGN:A-1"),
        ]
    );

    tags.push(tag_at("DESIGN", "A-1", "docs/design.md", 9, &[]));
    assert_eq!(validate_reference_integrity(&tags).len(), 1);
    tags.push(tag_at("REQUIREMENT", "A-1", "docs/req.md", 2, &[]));
    assert!(validate_reference_integrity(&tags).is_empty());
}

#[test]
fn validator_outcome_is_deterministic_under_shuffling() {
    let tags = vec![
        tag_at("TASK", "A-1", "src/a.rs", 3, &["DESIGN:A-2"]),
        tag_at("DESIGN", "A-1", "docs/a.md", 1, &["TASK:A-1"]),
        tag_at("TEST", "b_2", "tests/b.rs", 8, &[]),
        tag_at("REQUIREMENT", "A-1", "docs/a.md", 5, &[]),
    ];
    let mut shuffled = tags.clone();
    shuffled.rotate_left(2);

    let validator = Validator::new(Taxonomy::default(), 100);
    let a = validator.validate(&tags).unwrap();
    let b = validator.validate(&shuffled).unwrap();
    assert_eq!(a.chain_results, b.chain_results);
    assert_eq!(a.orphans, b.orphans);
    assert_eq!(a.reference_violations, b.reference_violations);
    assert_eq!(a.naming_violations, b.naming_violations);
    assert_eq!(a.coverage, b.coverage);
    assert_eq!(validator.suggestions(&a), validator.suggestions(&b));
}
