//! Collects findings from report rules, possibly from several threads.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const LEVELS: usize = 4;

fn slot(severity: Severity) -> usize {
    match severity {
        Severity::Help => 0,
        Severity::Note => 1,
        Severity::Warning => 2,
        Severity::Error => 3,
    }
}

/// Shared collector for diagnostics. Per-severity tallies are atomics so
/// the run status can be read without taking the lock.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    tallies: [AtomicUsize; LEVELS],
}

impl DiagnosticSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            tallies: Default::default(),
        }
    }

    /// Records one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.tallies[slot(diag.severity)].fetch_add(1, Ordering::Relaxed);
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diag);
    }

    /// Diagnostics recorded so far at exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.tallies[slot(severity)].load(Ordering::Relaxed)
    }

    /// The heaviest severity recorded, if anything was recorded.
    pub fn worst(&self) -> Option<Severity> {
        [Severity::Error, Severity::Warning, Severity::Note, Severity::Help]
            .into_iter()
            .find(|s| self.count(*s) > 0)
    }

    /// Drains the sink. Located findings come first in `file:line` order,
    /// project-wide ones last; code then message break ties.
    pub fn take_sorted(&self) -> Vec<Diagnostic> {
        let mut drained = std::mem::take(
            &mut *self
                .diagnostics
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        drained.sort_by_cached_key(|d| {
            (
                d.location.is_none(),
                d.location.clone(),
                d.code.to_string(),
                d.message.clone(),
            )
        });
        drained
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
