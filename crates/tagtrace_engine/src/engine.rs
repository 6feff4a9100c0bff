//! The run loop.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tagtrace_cache::{list_scope_paths, stat_all, ScanCache};
use tagtrace_common::{InternalError, Stage, TagMatch};
use tagtrace_config::{validate_config, TraceConfig};
use tagtrace_graph::{Suggestion, ValidationOutcome, Validator};
use tagtrace_parser::{Availability, SearchError, Searcher, TagGrammar, TagParser};
use tagtrace_report::{ReportGenerator, ReportInputs, TraceReport};
use tokio_util::sync::CancellationToken;

use crate::cancel::OrCancelExt;
use crate::error::EngineError;
use crate::io::blocking;
use crate::options::RunOptions;
use crate::plan::{resolve_scopes, ScanUnit};

/// Version recorded in the cache index. An index written by another version
/// is discarded.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs traceability scans for one project configuration.
pub struct TraceEngine {
    config: TraceConfig,
    searcher: Arc<dyn Searcher>,
}

/// Cache state and search plan produced before any search runs.
struct Prepared {
    cache: ScanCache,
    /// Every file and directory under each scope that could be listed.
    tracked: BTreeMap<PathBuf, Vec<PathBuf>>,
    /// Every file under the listed scopes.
    files: Vec<PathBuf>,
    /// Mtimes of the tracked paths, read before any search ran. Paths that
    /// could not be stat'ed are absent.
    stamps: BTreeMap<PathBuf, u64>,
    /// `false` if some scope could not be listed.
    listing_complete: bool,
    changed: BTreeSet<PathBuf>,
    cached: Vec<TagMatch>,
    pending: Vec<ScanUnit>,
    problems: Vec<String>,
}

impl Prepared {
    fn without_cache(cache_dir: &Path, tool_version: &str, units: Vec<ScanUnit>) -> Self {
        Self {
            cache: ScanCache::empty(cache_dir, tool_version),
            tracked: BTreeMap::new(),
            files: Vec::new(),
            stamps: BTreeMap::new(),
            listing_complete: false,
            changed: BTreeSet::new(),
            cached: Vec::new(),
            pending: units,
            problems: Vec::new(),
        }
    }
}

/// Results of the cancellable part of a run.
struct Analysis {
    root: PathBuf,
    search_tool: String,
    prepared: Prepared,
    fresh: Vec<(ScanUnit, Vec<TagMatch>)>,
    /// `false` if any search failed or timed out.
    searches_complete: bool,
    tags: Vec<TagMatch>,
    outcome: ValidationOutcome,
    suggestions: Vec<Suggestion>,
    warnings: Vec<String>,
}

enum Phase {
    Unavailable(String),
    Analysed(Box<Analysis>),
}

impl TraceEngine {
    /// Creates an engine. The configuration is validated here so that a bad
    /// taxonomy fails before anything is scanned.
    pub fn new(config: TraceConfig, searcher: Arc<dyn Searcher>) -> Result<Self, EngineError> {
        validate_config(&config)?;
        Ok(Self { config, searcher })
    }

    /// The configuration in use.
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.config.search.timeout_secs)
    }

    /// Runs one scan.
    ///
    /// Probing, searching, and validation are cancellable through `cancel`
    /// and bounded by `options.deadline`; if either fires, nothing is
    /// persisted and no report is produced. Once analysis completes, the
    /// cache and snapshot are written and the report is assembled.
    pub async fn run(
        &self,
        options: &RunOptions,
        cancel: &CancellationToken,
    ) -> Result<TraceReport, EngineError> {
        let started = Instant::now();
        let analysis = self.analyse(options).or_cancel(cancel);
        let phase = match options.deadline {
            Some(deadline) => tokio::time::timeout(deadline, analysis)
                .await
                .map_err(|_| EngineError::DeadlineExceeded(deadline))?,
            None => analysis.await,
        }
        .map_err(|_| EngineError::Cancelled)??;

        match phase {
            Phase::Unavailable(reason) => Ok(TraceReport::failed(
                self.config.project.name.clone(),
                reason,
                started.elapsed(),
            )),
            Phase::Analysed(analysis) => self.commit(*analysis, started).await,
        }
    }

    async fn analyse(&self, options: &RunOptions) -> Result<Phase, EngineError> {
        let root = options.root.clone();
        if !root.is_dir() {
            return Err(EngineError::InvalidRoot { path: root });
        }
        let scopes = match &options.scopes {
            Some(explicit) => resolve_scopes(&root, explicit, true)?,
            None => {
                let configured: Vec<PathBuf> =
                    self.config.scan.scopes.iter().map(PathBuf::from).collect();
                resolve_scopes(&root, &configured, false)?
            }
        };

        let taxonomy = &self.config.taxonomy;
        let parser = TagParser::new(
            Arc::clone(&self.searcher),
            TagGrammar::with_categories(taxonomy.all_categories()),
            Duration::from_secs(self.config.search.timeout_secs),
        )
        .with_root(root.clone());

        let search_tool = match parser.probe().await {
            Availability::Available { tool, version } => format!("{tool} {version}"),
            Availability::Unavailable { tool, reason } => {
                tracing::warn!(tool = %tool, "search tool unavailable: {reason}");
                return Ok(Phase::Unavailable(format!(
                    "search tool `{tool}` is not available: {reason}"
                )));
            }
        };
        tracing::debug!(tool = %search_tool, scopes = scopes.len(), "starting scan");

        let patterns = self.config.scan.expand_patterns(taxonomy);
        let units = ScanUnit::expand(&patterns, &scopes);
        let cache_dir = root.join(&self.config.cache.dir);
        let tool_version = format!("tagtrace {TOOL_VERSION}; {search_tool}");
        let ttl = options
            .ttl
            .unwrap_or(Duration::from_secs(self.config.cache.ttl_secs));

        let mut prepared = {
            let (dir, version, planned) = (cache_dir.clone(), tool_version.clone(), units.clone());
            let force = options.force;
            blocking("reading the scan cache", self.io_timeout(), move || {
                prepare(&dir, &version, &scopes, planned, force, ttl)
            })
            .await
            .unwrap_or_else(|reason| {
                tracing::warn!("{reason}; continuing without cache");
                let mut fallback = Prepared::without_cache(&cache_dir, &tool_version, units.clone());
                fallback.problems.push(reason);
                fallback
            })
        };
        let mut warnings = std::mem::take(&mut prepared.problems);
        tracing::debug!(
            cached = units.len() - prepared.pending.len(),
            pending = prepared.pending.len(),
            changed = prepared.changed.len(),
            "cache consulted"
        );

        let parser = &parser;
        let results: Vec<(ScanUnit, Result<Vec<TagMatch>, SearchError>)> =
            stream::iter(std::mem::take(&mut prepared.pending))
                .map(|unit| async move {
                    let result = parser.search_scope(&unit.pattern, &unit.scope).await;
                    (unit, result)
                })
                .buffer_unordered(self.config.search.max_parallel)
                .collect()
                .await;

        let mut tags = std::mem::take(&mut prepared.cached);
        let mut fresh = Vec::new();
        let mut searches_complete = true;
        for (unit, result) in results {
            match result {
                Ok(found) => {
                    tags.extend(found.iter().cloned());
                    fresh.push((unit, found));
                }
                Err(err) => {
                    tracing::warn!(
                        pattern = %unit.pattern,
                        scope = %unit.scope.display(),
                        "search failed: {err}"
                    );
                    warnings.push(err.to_string());
                    searches_complete = false;
                }
            }
        }
        tags.sort_by(TagMatch::cmp_location);
        tags.dedup();
        fresh.sort_by(|a, b| a.0.cmp(&b.0));

        let validator = Validator::new(taxonomy.clone(), self.config.graph.max_cycles);
        let (validated, tags) = tokio::task::spawn_blocking(move || {
            let validated = validator.validate(&tags).map(|outcome| {
                let suggestions = validator.suggestions(&outcome);
                (outcome, suggestions)
            });
            (validated, tags)
        })
        .await
        .map_err(|e| InternalError::task_failed(Stage::Validation, e))?;
        let (outcome, suggestions) = validated?;

        Ok(Phase::Analysed(Box::new(Analysis {
            root,
            search_tool,
            prepared,
            fresh,
            searches_complete,
            tags,
            outcome,
            suggestions,
            warnings,
        })))
    }

    async fn commit(&self, analysis: Analysis, started: Instant) -> Result<TraceReport, EngineError> {
        let Analysis {
            root,
            search_tool,
            prepared,
            fresh,
            searches_complete,
            tags,
            outcome,
            suggestions,
            mut warnings,
        } = analysis;
        let Prepared {
            cache,
            tracked,
            files,
            stamps,
            listing_complete,
            changed,
            ..
        } = prepared;
        let stamps = Stamps {
            tracked,
            files,
            mtimes: stamps,
            complete: listing_complete && searches_complete,
        };

        let cache_dir = cache.dir().to_path_buf();
        let tool_version = cache.index().tool_version.clone();
        let mut cache = match blocking("saving the scan cache", self.io_timeout(), move || {
            persist(cache, fresh, &stamps)
        })
        .await
        {
            Ok((cache, problems)) => {
                warnings.extend(problems);
                cache
            }
            Err(reason) => {
                tracing::warn!("{reason}");
                warnings.push(reason);
                ScanCache::empty(&cache_dir, &tool_version)
            }
        };

        let changed_files: Vec<PathBuf> = changed
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap_or(p).to_path_buf())
            .collect();
        let generator = ReportGenerator::new(&self.config.report, &self.config.taxonomy);
        let project = self.config.project.name.clone();

        let report = tokio::task::spawn_blocking(move || {
            let inputs = ReportInputs {
                project: &project,
                search_tool: Some(search_tool),
                total_tags: tags.len(),
                outcome: &outcome,
                suggestions: &suggestions,
                warnings,
                changed_files,
                elapsed: started.elapsed(),
            };
            generator.generate(inputs, |file, line| {
                let text = cache.read_content(&root.join(file))?;
                let index = usize::try_from(line.checked_sub(1)?).ok()?;
                text.lines().nth(index).map(str::to_string)
            })
        })
        .await
        .map_err(|e| InternalError::task_failed(Stage::Report, e))?;

        tracing::info!(
            status = report.status.label(),
            tags = report.total_tags,
            issues = report.total_issues,
            errors = report.error_count,
            warnings = report.warning_count,
            elapsed = report.elapsed_time,
            "scan finished"
        );
        Ok(report)
    }
}

/// Loads the cache, lists every scope, diffs against the last snapshot, and
/// serves whatever units the cache can answer.
fn prepare(
    cache_dir: &Path,
    tool_version: &str,
    scopes: &[PathBuf],
    units: Vec<ScanUnit>,
    force: bool,
    ttl: Duration,
) -> Prepared {
    let cache = ScanCache::load_or_create(cache_dir, tool_version);
    let mut prepared = Prepared::without_cache(cache_dir, tool_version, Vec::new());
    prepared.cache = cache;
    prepared.listing_complete = true;

    let mut files = BTreeSet::new();
    for scope in scopes {
        match list_scope_paths(scope) {
            Ok(paths) => {
                files.extend(paths.iter().filter(|p| p.is_file()).cloned());
                prepared.tracked.insert(scope.clone(), paths);
            }
            Err(err) => {
                prepared.listing_complete = false;
                prepared.problems.push(format!("could not list scope: {err}"));
            }
        }
    }
    prepared.files = files.into_iter().collect();
    let all_tracked: Vec<PathBuf> = prepared.tracked.values().flatten().cloned().collect();
    let (stamps, unreadable) = stat_all(&all_tracked);
    if !unreadable.is_empty() {
        tracing::debug!(unreadable = unreadable.len(), "some tracked paths could not be stat'ed");
    }
    prepared.stamps = stamps;
    prepared.changed = prepared.cache.changed_since_last_scan(&prepared.files);

    for unit in units {
        let hit = if force {
            None
        } else {
            prepared.cache.get(&unit.pattern, &unit.scope, ttl)
        };
        match hit {
            Some(matches) => prepared.cached.extend(matches),
            None => prepared.pending.push(unit),
        }
    }
    prepared
}

/// What the run saw on disk before searching.
struct Stamps {
    tracked: BTreeMap<PathBuf, Vec<PathBuf>>,
    files: Vec<PathBuf>,
    mtimes: BTreeMap<PathBuf, u64>,
    /// Every scope was listed and every search answered.
    complete: bool,
}

impl Stamps {
    /// Pre-search mtimes of everything under `scope`, or `None` if the scope
    /// was not listed or some path under it could not be stat'ed.
    fn for_scope(&self, scope: &Path) -> Option<BTreeMap<PathBuf, u64>> {
        self.tracked
            .get(scope)?
            .iter()
            .map(|p| self.mtimes.get(p).map(|ns| (p.clone(), *ns)))
            .collect()
    }

    fn for_files(&self) -> BTreeMap<PathBuf, u64> {
        self.files
            .iter()
            .filter_map(|f| self.mtimes.get(f).map(|ns| (f.clone(), *ns)))
            .collect()
    }
}

/// Stores fresh search results against the pre-search mtimes, then writes
/// the index and, if nothing was skipped, the snapshot. Returns the cache and
/// any write problems as warnings.
fn persist(
    mut cache: ScanCache,
    fresh: Vec<(ScanUnit, Vec<TagMatch>)>,
    stamps: &Stamps,
) -> (ScanCache, Vec<String>) {
    let mut problems = Vec::new();
    for (unit, matches) in fresh {
        match stamps.for_scope(&unit.scope) {
            Some(mtimes) => cache.put_stamped(&unit.pattern, &unit.scope, matches, mtimes),
            None => tracing::debug!(
                pattern = %unit.pattern,
                scope = %unit.scope.display(),
                "not caching search with unreadable paths"
            ),
        }
    }
    if let Err(err) = cache.save() {
        tracing::warn!("could not save scan cache: {err}");
        problems.push(format!("could not save scan cache: {err}"));
    }
    if !stamps.complete {
        tracing::debug!("scan incomplete; keeping the previous snapshot");
    } else if let Err(err) = cache.save_scan_snapshot_stamped(stamps.for_files()) {
        tracing::warn!("could not save scan snapshot: {err}");
        problems.push(format!("could not save scan snapshot: {err}"));
    }
    (cache, problems)
}
