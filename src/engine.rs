//! The copy engine.
//!
//! For every rule the engine expands patterns, resolves each source into
//! sorted entries, optionally minifies them, and writes them out. Writes
//! happen on the calling thread in resolution order, so when two entries
//! share a destination the later one wins on every run. With
//! `parallel > 1` only the read and minify steps fan out to a worker pool,
//! one bounded batch at a time.

use crate::config::CopyConfig;
use crate::error::{Error, Result, Warning};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::matcher::{FileMatcher, GlobMatcher};
use crate::minify::{MinifyError, minify_bytes};
use crate::options::CopyOptions;
use crate::resolve::{ResolveContext, ResourceEntry, resolve};
use crate::rule::MappingRule;
use crate::utils::path::join;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Entries read and minified per worker before the batch is written.
const PREPARE_BATCH_PER_WORKER: usize = 4;

/// Totals for one run.
///
/// # Example
///
/// ```no_run
/// use rescopy::{CopyEngine, CopyOptions, MappingRule};
///
/// let engine = CopyEngine::new(CopyOptions::default());
/// let totals = engine.run(&[MappingRule::new("assets/", ["*"], "dist")])?;
/// if let Some(line) = totals.summary() {
///     println!("{line}");
/// }
/// # Ok::<(), rescopy::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Files written
    pub files_copied: u64,
    /// Files left unwritten because minification failed
    pub files_skipped: u64,
    /// Every warning raised, in order
    pub warnings: Vec<Warning>,
    /// Wall time of the run
    pub duration: Duration,
}

impl RunTotals {
    /// `Total N files copied: [N]`, or `None` when nothing was copied.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        match self.files_copied {
            0 => None,
            1 => Some("Total 1 file copied: [1]".to_owned()),
            n => Some(format!("Total {n} files copied: [{n}]")),
        }
    }
}

/// One planned write, as reported by [`CopyEngine::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItem {
    /// Source path
    pub source: String,
    /// Final destination path
    pub destination: String,
    /// Whether the content would be minified
    pub compress: bool,
}

/// Content of one entry after the read (and minify) step.
enum Prepared {
    Raw(Vec<u8>),
    Minified(String),
    Rejected(MinifyError),
}

/// Runs mapping rules against a matcher and a file system.
///
/// The defaults are [`GlobMatcher`] and [`LocalFileSystem`]; tests and
/// embedders can swap either via [`CopyEngine::with_parts`].
#[derive(Debug, Clone)]
pub struct CopyEngine<M = GlobMatcher, F = LocalFileSystem> {
    matcher: M,
    fs: F,
    options: CopyOptions,
}

impl CopyEngine {
    /// Engine over the local disk, configured from `options`.
    #[must_use]
    pub fn new(options: CopyOptions) -> Self {
        Self {
            matcher: GlobMatcher::new(options.dot),
            fs: LocalFileSystem::new(options.fsync),
            options,
        }
    }
}

impl Default for CopyEngine {
    fn default() -> Self {
        Self::new(CopyOptions::default())
    }
}

impl<M: FileMatcher, F: FileSystem> CopyEngine<M, F> {
    /// Engine over a custom matcher and file system.
    pub fn with_parts(matcher: M, fs: F, options: CopyOptions) -> Self {
        Self {
            matcher,
            fs,
            options,
        }
    }

    /// The options this engine runs with.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Run `rules` in order and return the totals.
    ///
    /// A rule whose patterns do not compile is skipped with a
    /// [`Warning::Config`]. Unmatched patterns, unreadable directories and
    /// failed minification are warnings too.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] or [`Error::Write`] if a matched file cannot
    /// be read or its destination cannot be written. Files written before
    /// the failure stay in place.
    pub fn run(&self, rules: &[MappingRule]) -> Result<RunTotals> {
        let start_time = Instant::now();
        let mut totals = RunTotals::default();
        let pool = self.build_pool(&mut totals);

        for rule in rules {
            self.for_each_source(rule, &mut totals, |totals, entries| {
                self.copy_entries(rule, &entries, pool.as_ref(), totals)
            })?;
        }

        totals.duration = start_time.elapsed();
        Ok(totals)
    }

    /// Run a single rule.
    pub fn run_rule(&self, rule: &MappingRule) -> Result<RunTotals> {
        self.run(std::slice::from_ref(rule))
    }

    /// Run the target `name` of a task file.
    ///
    /// A target with an invalid option or rename is rejected with a
    /// [`Warning::Config`] and zero totals; nothing is written for it.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTarget`] if the task file has no such target, plus
    /// everything [`CopyEngine::run`] can return.
    pub fn run_task(&self, config: &CopyConfig, name: &str) -> Result<RunTotals> {
        match config.task(name) {
            Ok(task) => self.run(&task.rules),
            Err(e) if e.is_config_error() => {
                let mut totals = RunTotals::default();
                self.warn(
                    &mut totals,
                    Warning::Config {
                        scope: name.to_owned(),
                        message: e.to_string(),
                    },
                );
                Ok(totals)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve `rules` without reading or writing anything.
    ///
    /// Items come back in the order [`CopyEngine::run`] would write them.
    /// Warnings still go to the warning handler.
    pub fn plan(&self, rules: &[MappingRule]) -> Result<Vec<PlanItem>> {
        let mut items = Vec::new();
        let mut totals = RunTotals::default();
        for rule in rules {
            self.for_each_source(rule, &mut totals, |_, entries| {
                items.extend(entries.into_iter().map(|entry| PlanItem {
                    destination: entry.destination(),
                    source: entry.source,
                    compress: rule.compression,
                }));
                Ok(())
            })?;
        }
        Ok(items)
    }

    fn warn(&self, totals: &mut RunTotals, warning: Warning) {
        self.options.warn(&warning.to_string());
        totals.warnings.push(warning);
    }

    fn build_pool(&self, totals: &mut RunTotals) -> Option<rayon::ThreadPool> {
        if self.options.parallel <= 1 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.parallel)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                self.warn(totals, Warning::ThreadPool(e.to_string()));
                None
            }
        }
    }

    /// Expand `rule` and hand every non-empty source resolution to `handle`.
    fn for_each_source<H>(&self, rule: &MappingRule, totals: &mut RunTotals, mut handle: H) -> Result<()>
    where
        H: FnMut(&mut RunTotals, Vec<ResourceEntry>) -> Result<()>,
    {
        let matches = match self.matcher.matches(&rule.cwd, &rule.src) {
            Ok(matches) => matches,
            Err(e) if e.is_config_error() => {
                self.warn(
                    totals,
                    Warning::Config {
                        scope: rule.cwd.clone(),
                        message: e.to_string(),
                    },
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if matches.is_empty() {
            self.warn(
                totals,
                Warning::NoFilesFound {
                    source: join(&rule.cwd, &rule.src.join(", ")),
                },
            );
            return Ok(());
        }

        for group in rule.groups(matches) {
            let ctx = ResolveContext {
                cwd: &rule.cwd,
                dest_root: &rule.dest,
                dest: &group.dest,
                expanded: rule.expand,
                platform: self.options.platform,
            };
            for src in &group.src {
                let entries = match resolve(&self.fs, &ctx, src) {
                    Ok(entries) => entries,
                    Err(Error::Walk { path, message }) => {
                        self.warn(totals, Warning::ReadSource { source: path, message });
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                if entries.is_empty() {
                    self.warn(totals, Warning::NoFilesFound { source: src.clone() });
                    continue;
                }
                handle(totals, entries)?;
            }
        }
        Ok(())
    }

    fn prepare(&self, entry: &ResourceEntry, compression: bool) -> Result<Prepared> {
        let content = self.fs.read(&entry.source).map_err(|source| Error::Read {
            path: entry.source.clone(),
            source,
        })?;
        if !compression {
            return Ok(Prepared::Raw(content));
        }
        Ok(match minify_bytes(&entry.file_name, &content) {
            Ok(minified) => Prepared::Minified(minified),
            Err(e) => Prepared::Rejected(e),
        })
    }

    fn copy_entries(
        &self,
        rule: &MappingRule,
        entries: &[ResourceEntry],
        pool: Option<&rayon::ThreadPool>,
        totals: &mut RunTotals,
    ) -> Result<()> {
        match pool {
            Some(pool) if entries.len() > 1 => {
                // Bounds how many prepared files are held before commit.
                let batch = self.options.parallel * PREPARE_BATCH_PER_WORKER;
                for chunk in entries.chunks(batch) {
                    let prepared: Vec<Result<Prepared>> = pool.install(|| {
                        chunk
                            .par_iter()
                            .map(|entry| self.prepare(entry, rule.compression))
                            .collect()
                    });
                    for (entry, content) in chunk.iter().zip(prepared) {
                        self.commit(entry, content?, totals)?;
                    }
                }
            }
            _ => {
                for entry in entries {
                    let content = self.prepare(entry, rule.compression)?;
                    self.commit(entry, content, totals)?;
                }
            }
        }
        Ok(())
    }

    fn commit(&self, entry: &ResourceEntry, content: Prepared, totals: &mut RunTotals) -> Result<()> {
        let destination = entry.destination();
        self.options
            .log(&format!("copying: {} => {}", entry.file_name, destination));

        let bytes = match content {
            Prepared::Raw(bytes) => bytes,
            Prepared::Minified(text) => text.into_bytes(),
            Prepared::Rejected(e) => {
                self.warn(
                    totals,
                    Warning::Compression {
                        file_name: entry.file_name.clone(),
                        message: format!("{e} ({})", e.reason()),
                    },
                );
                totals.files_skipped += 1;
                return Ok(());
            }
        };

        self.fs
            .write(&destination, &bytes)
            .map_err(|source| Error::Write {
                path: destination.clone(),
                source,
            })?;
        totals.files_copied += 1;
        Ok(())
    }
}
