//! Finding engine that manages rule registration, policy, and execution.
//!
//! The `FindingEngine` accepts a `ReportConfig` to control which rules are
//! denied or allowed, then runs every enabled rule over a validation outcome.

use std::collections::{BTreeSet, HashSet};

use tagtrace_config::ReportConfig;
use tagtrace_diagnostics::{DiagnosticCode, DiagnosticSink, Severity};

use crate::rules::register_builtin_rules;
use crate::{ReportRule, RuleContext};

/// Orchestrates report rules under the configured deny/allow policy.
///
/// A rule is selected by its kebab-case name or its code, so both
/// `deny = ["orphaned-tag"]` and `deny = ["W202"]` work.
pub struct FindingEngine {
    rules: Vec<Box<dyn ReportRule>>,
    /// Rule names or codes promoted to error severity.
    denied: HashSet<String>,
    /// Rule names or codes that are not reported.
    allowed: HashSet<String>,
}

/// Codes are matched in canonical form so `w202` selects `W202`.
fn policy_key(entry: &str) -> String {
    entry
        .parse::<DiagnosticCode>()
        .map_or_else(|_| entry.trim().to_string(), |code| code.to_string())
}

impl FindingEngine {
    /// Creates an engine with all built-in rules, configured by `config`.
    pub fn new(config: &ReportConfig) -> Self {
        let mut engine = Self {
            rules: Vec::new(),
            denied: config.deny.iter().map(|e| policy_key(e)).collect(),
            allowed: config.allow.iter().map(|e| policy_key(e)).collect(),
        };
        register_builtin_rules(&mut engine);
        engine
    }

    /// Creates an engine with no policy overrides.
    pub fn with_defaults() -> Self {
        Self::new(&ReportConfig::default())
    }

    /// Registers a rule.
    pub fn register(&mut self, rule: Box<dyn ReportRule>) {
        self.rules.push(rule);
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the names of all registered rules.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Deny/allow entries that match no registered rule, sorted.
    pub fn unknown_policy_entries(&self) -> Vec<String> {
        let known: HashSet<String> = self
            .rules
            .iter()
            .flat_map(|r| [r.name().to_string(), r.code().to_string()])
            .collect();
        self.denied
            .iter()
            .chain(&self.allowed)
            .filter(|entry| !known.contains(*entry))
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    fn selects(set: &HashSet<String>, rule: &dyn ReportRule) -> bool {
        set.contains(rule.name()) || set.contains(&rule.code().to_string())
    }

    /// Runs every enabled rule and forwards its diagnostics to `sink`.
    ///
    /// Allowed rules are skipped. Diagnostics of denied rules are promoted
    /// to error severity. Returns the number of diagnostics emitted.
    pub fn run(&self, ctx: &RuleContext<'_>, sink: &DiagnosticSink) -> usize {
        let mut emitted = 0;
        for rule in &self.rules {
            if Self::selects(&self.allowed, rule.as_ref()) {
                continue;
            }
            let is_denied = Self::selects(&self.denied, rule.as_ref());

            let temp_sink = DiagnosticSink::new();
            rule.check(ctx, &temp_sink);
            for mut diag in temp_sink.take_sorted() {
                if is_denied {
                    diag.severity = Severity::Error;
                }
                sink.emit(diag);
                emitted += 1;
            }
        }
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::outcome;
    use crate::test_util::tag_at;
    use crate::FixIndex;
    use tagtrace_diagnostics::{Category, DiagnosticCode};

    fn run(config: &ReportConfig, sink: &DiagnosticSink) -> usize {
        let tags = vec![
            tag_at("DOC", "GUIDE", "docs/a.md", 1, &[]),
            tag_at("TASK", "A", "src/a.rs", 1, &["DESIGN:MISSING"]),
        ];
        let outcome = outcome(&tags);
        let fixes = FixIndex::default();
        let primary = tagtrace_config::Taxonomy::default().primary;
        let ctx = RuleContext {
            outcome: &outcome,
            primary: &primary,
            fixes: &fixes,
        };
        FindingEngine::new(config).run(&ctx, sink)
    }

    struct DummyRule;
    impl ReportRule for DummyRule {
        fn code(&self) -> DiagnosticCode {
            DiagnosticCode::new(Category::Chain, 999)
        }
        fn name(&self) -> &str {
            "dummy-rule"
        }
        fn description(&self) -> &str {
            "a test rule"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn check(&self, _ctx: &RuleContext<'_>, _sink: &DiagnosticSink) {}
    }

    #[test]
    fn builtin_rules_registered() {
        let engine = FindingEngine::with_defaults();
        assert_eq!(engine.rule_count(), 6);
        assert_eq!(
            engine.rule_names(),
            vec![
                "broken-reference",
                "circular-reference",
                "incomplete-chain",
                "orphaned-tag",
                "naming-violation",
                "low-coverage",
            ]
        );
    }

    #[test]
    fn register_custom_rule() {
        let mut engine = FindingEngine::with_defaults();
        engine.register(Box::new(DummyRule));
        assert_eq!(engine.rule_count(), 7);
    }

    #[test]
    fn default_policy() {
        let sink = DiagnosticSink::new();
        // E101 broken ref, W201 incomplete chain, W202 orphan (note), V401 coverage
        assert_eq!(run(&ReportConfig::default(), &sink), 4);
        assert_eq!(sink.count(Severity::Error), 1);
        assert_eq!(sink.count(Severity::Warning), 2);
    }

    #[test]
    fn allow_suppresses_by_name_or_code() {
        let config = ReportConfig {
            allow: vec!["orphaned-tag".to_string(), "V401".to_string()],
            ..ReportConfig::default()
        };
        let sink = DiagnosticSink::new();
        assert_eq!(run(&config, &sink), 2);
        let codes: Vec<String> = sink.take_sorted().iter().map(|d| d.code.to_string()).collect();
        assert!(!codes.contains(&"W202".to_string()));
        assert!(!codes.contains(&"V401".to_string()));
    }

    #[test]
    fn deny_promotes_to_error() {
        let config = ReportConfig {
            deny: vec!["orphaned-tag".to_string()],
            ..ReportConfig::default()
        };
        let sink = DiagnosticSink::new();
        run(&config, &sink);
        assert_eq!(sink.count(Severity::Error), 2);
    }

    #[test]
    fn policy_codes_ignore_case() {
        let config = ReportConfig {
            deny: vec!["w202".to_string()],
            ..ReportConfig::default()
        };
        let sink = DiagnosticSink::new();
        run(&config, &sink);
        assert_eq!(sink.count(Severity::Error), 2);
        assert!(FindingEngine::new(&config).unknown_policy_entries().is_empty());
    }

    #[test]
    fn unknown_policy_entries_reported() {
        let config = ReportConfig {
            deny: vec!["E101".to_string(), "no-such-rule".to_string()],
            allow: vec!["typo".to_string()],
            ..ReportConfig::default()
        };
        assert_eq!(
            FindingEngine::new(&config).unknown_policy_entries(),
            vec!["no-such-rule".to_string(), "typo".to_string()]
        );
    }
}
