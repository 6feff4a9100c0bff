//! Conformance test helpers for tagtrace.
//!
//! Provides tag constructors for the pure validator checks and a
//! [`Fixture`]: a throwaway project directory whose files are mirrored into
//! an in-memory searcher, so the full probe → cache → search → validate →
//! report pipeline can run without an external search binary.

#![warn(missing_docs)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use filetime::{set_file_mtime, FileTime};
use tagtrace_common::TagMatch;
use tagtrace_config::TraceConfig;
use tagtrace_engine::{EngineError, RunOptions, TraceEngine};
use tagtrace_parser::MemorySearcher;
use tagtrace_report::TraceReport;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Builds a tag occurrence at `file:line`.
pub fn tag_at(category: &str, identifier: &str, file: &str, line: u32, refs: &[&str]) -> TagMatch {
    TagMatch {
        category: category.to_string(),
        identifier: identifier.to_string(),
        description: String::new(),
        file: PathBuf::from(file),
        line,
        references: refs.iter().map(|r| r.to_string()).collect(),
    }
}

/// Builds a tag occurrence in `src/lib.rs`, one line per distinct tag.
pub fn tag(category: &str, identifier: &str, refs: &[&str]) -> TagMatch {
    tag_at(category, identifier, "src/lib.rs", 1, refs)
}

/// One occurrence of each given category for `identifier`, on consecutive
/// lines of `file`.
pub fn chain(identifier: &str, file: &str, categories: &[&str]) -> Vec<TagMatch> {
    categories
        .iter()
        .enumerate()
        .map(|(i, category)| tag_at(category, identifier, file, i as u32 + 1, &[]))
        .collect()
}

/// Source text with one `// @CATEGORY:IDENTIFIER` comment per line.
pub fn tag_lines(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("// {l}\n")).collect()
}

/// A project directory on disk with an in-memory searcher over its files.
///
/// Files written through the fixture exist on disk (so cache validation
/// sees real mtimes) and in the searcher (so no search binary is needed).
/// The directory is removed when the fixture is dropped.
pub struct Fixture {
    dir: TempDir,
    searcher: Arc<MemorySearcher>,
    /// Configuration used by [`Fixture::engine`]. Scans `src` and `docs`
    /// by default.
    pub config: TraceConfig,
}

impl Fixture {
    /// Creates an empty project named `conformance` with `src/` and
    /// `docs/` directories.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("src"))?;
        std::fs::create_dir_all(dir.path().join("docs"))?;
        let mut config = TraceConfig::default();
        config.project.name = "conformance".to_string();
        config.scan.scopes = vec!["src".to_string(), "docs".to_string()];
        Ok(Self {
            dir,
            searcher: Arc::new(MemorySearcher::new()),
            config,
        })
    }

    /// Swaps in another searcher. Call before writing files, since the
    /// files of the old searcher are not carried over.
    pub fn with_searcher(mut self, searcher: MemorySearcher) -> Self {
        self.searcher = Arc::new(searcher);
        self
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// The searcher the engine uses.
    pub fn searcher(&self) -> &MemorySearcher {
        &self.searcher
    }

    /// Number of searches run so far.
    pub fn searches(&self) -> usize {
        self.searcher.call_count()
    }

    /// Absolute path of a project-relative file.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Writes a file on disk and in the searcher.
    pub fn write(&self, rel: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        self.searcher.insert(path.clone(), content);
        Ok(path)
    }

    /// Removes a file from disk and from the searcher.
    pub fn remove(&self, rel: &str) -> io::Result<()> {
        let path = self.path(rel);
        std::fs::remove_file(&path)?;
        self.searcher.remove(&path);
        Ok(())
    }

    /// Moves a file's mtime `secs` seconds into the future without changing
    /// its content.
    pub fn touch(&self, rel: &str, secs: u64) -> io::Result<()> {
        let when = SystemTime::now() + Duration::from_secs(secs);
        set_file_mtime(self.path(rel), FileTime::from_system_time(when))
    }

    /// An engine over the current configuration.
    pub fn engine(&self) -> Result<TraceEngine, EngineError> {
        TraceEngine::new(self.config.clone(), self.searcher.clone())
    }

    /// Default options rooted at the fixture.
    pub fn options(&self) -> RunOptions {
        RunOptions::new(self.root())
    }

    /// Runs one scan with the given options.
    pub async fn run(&self, options: RunOptions) -> Result<TraceReport, EngineError> {
        self.engine()?.run(&options, &CancellationToken::new()).await
    }

    /// Runs one scan with default options.
    pub async fn scan(&self) -> Result<TraceReport, EngineError> {
        self.run(self.options()).await
    }
}

/// Diagnostic codes of a report, in report order.
pub fn codes(report: &TraceReport) -> Vec<String> {
    report.diagnostics.iter().map(|d| d.code.to_string()).collect()
}
