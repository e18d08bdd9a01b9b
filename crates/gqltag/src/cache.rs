//! The parse-once document cache.

use crate::error::{ParseError, Result};
use crate::normalize::normalize;
use crate::options::CacheOptions;
use crate::registry::{process_fragments, FragmentConflict, FragmentRegistry};
use crate::strip::strip_locations;
use crate::template::{assemble, Interpolation};
use gqltag_core::{diagnostics::codes, Diagnostic};
use gqltag_syntax::{ast::Document, ParseOptions};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

type ConflictHandler = Arc<dyn Fn(&FragmentConflict) + Send + Sync>;

#[derive(Default)]
struct CacheState {
    documents: FxHashMap<String, Arc<Document>>,
    fragments: FragmentRegistry,
}

/// Counters describing cache activity since construction or the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that invoked the parser, successful or not.
    pub misses: u64,
    /// Fragment conflicts detected, whether or not they were reported.
    pub conflicts: u64,
    /// Documents currently cached.
    pub documents: usize,
    /// Distinct fragment names registered.
    pub fragment_names: usize,
}

/// Maps normalized source text to parsed, location-free documents.
///
/// Each distinct source (up to whitespace, commas and comments) is parsed
/// at most once until [`reset`](Self::reset). Every fragment definition that
/// passes through the cache is registered by name, and a name that shows up
/// with two different bodies is reported to the conflict handler.
///
/// The cache is `Send + Sync`. A single lock guards the document map and the
/// fragment registry for the whole lookup, parse and insert sequence.
pub struct DocumentCache {
    state: Mutex<CacheState>,
    warn_on_fragment_conflicts: AtomicBool,
    allow_legacy_fragment_variables: AtomicBool,
    on_conflict: ConflictHandler,
    hits: AtomicU64,
    misses: AtomicU64,
    conflicts: AtomicU64,
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCache")
            .field("options", &self.options())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

pub(crate) fn conflict_diagnostic(conflict: &FragmentConflict) -> Diagnostic {
    Diagnostic::warning(
        codes::FRAGMENT_CONFLICT,
        format!("{conflict}; fragment names must be unique across the application"),
    )
}

fn log_conflict(conflict: &FragmentConflict) {
    let diagnostic = conflict_diagnostic(conflict);
    warn!(code = diagnostic.code, fragment = %conflict.name, "{}", diagnostic.title);
}

impl DocumentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(CacheOptions::default())
    }

    #[must_use]
    pub fn with_options(options: CacheOptions) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            warn_on_fragment_conflicts: AtomicBool::new(options.warn_on_fragment_conflicts),
            allow_legacy_fragment_variables: AtomicBool::new(
                options.allow_legacy_fragment_variables,
            ),
            on_conflict: Arc::new(log_conflict),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            conflicts: AtomicU64::new(0),
        }
    }

    /// Replaces the conflict notification, which logs a warning by default.
    ///
    /// The handler runs after the cache lock is released, so it may call back
    /// into the cache.
    #[must_use]
    pub fn with_conflict_handler(
        mut self,
        handler: impl Fn(&FragmentConflict) + Send + Sync + 'static,
    ) -> Self {
        self.on_conflict = Arc::new(handler);
        self
    }

    /// Returns the current toggle settings.
    #[must_use]
    pub fn options(&self) -> CacheOptions {
        CacheOptions {
            warn_on_fragment_conflicts: self.warn_on_fragment_conflicts.load(Ordering::Relaxed),
            allow_legacy_fragment_variables: self
                .allow_legacy_fragment_variables
                .load(Ordering::Relaxed),
        }
    }

    /// Returns the cached document for `source`, parsing it on first sight.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when `source` is not a valid GraphQL document.
    /// Failures are not cached.
    pub fn parse_document(&self, source: &str) -> Result<Arc<Document>, ParseError> {
        let key = normalize(source);

        let (document, conflicts) = {
            let mut state = self.state.lock();
            if let Some(document) = state.documents.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(key_len = key.len(), "document cache hit");
                return Ok(Arc::clone(document));
            }

            self.misses.fetch_add(1, Ordering::Relaxed);
            let options = ParseOptions {
                allow_legacy_fragment_variables: self
                    .allow_legacy_fragment_variables
                    .load(Ordering::Relaxed),
            };
            debug!(
                key_len = key.len(),
                legacy_fragment_variables = options.allow_legacy_fragment_variables,
                "document cache miss"
            );

            let parsed = gqltag_syntax::parse(source, options)
                .into_result()
                .map_err(|diagnostic| ParseError::from_diagnostic(&diagnostic, source))?;
            let (mut document, conflicts) = process_fragments(parsed, source, &mut state.fragments)?;
            strip_locations(&mut document);

            let document = Arc::new(document);
            state.documents.insert(key, Arc::clone(&document));
            (document, conflicts)
        };

        if !conflicts.is_empty() {
            self.conflicts.fetch_add(conflicts.len() as u64, Ordering::Relaxed);
            if self.warn_on_fragment_conflicts.load(Ordering::Relaxed) {
                for conflict in &conflicts {
                    (self.on_conflict)(conflict);
                }
            }
        }

        Ok(document)
    }

    /// Assembles a template and parses the result through the cache.
    ///
    /// # Errors
    ///
    /// Fails on a malformed template or when the assembled text does not parse.
    pub fn gql(&self, literals: &[&str], values: &[Interpolation]) -> Result<Arc<Document>> {
        let source = assemble(literals, values)?;
        Ok(self.parse_document(&source)?)
    }

    /// Clears every cached document, the fragment registry and the counters.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        let documents = state.documents.len();
        let fragment_names = state.fragments.len();
        state.documents.clear();
        state.fragments.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.conflicts.store(0, Ordering::Relaxed);
        debug!(documents, fragment_names, "document cache reset");
    }

    pub fn enable_fragment_warnings(&self) {
        self.warn_on_fragment_conflicts.store(true, Ordering::Relaxed);
    }

    pub fn disable_fragment_warnings(&self) {
        self.warn_on_fragment_conflicts.store(false, Ordering::Relaxed);
    }

    /// Accept legacy fragment variables on future cache misses.
    ///
    /// Documents already cached are unaffected.
    pub fn enable_legacy_fragment_variables(&self) {
        self.allow_legacy_fragment_variables.store(true, Ordering::Relaxed);
    }

    pub fn disable_legacy_fragment_variables(&self) {
        self.allow_legacy_fragment_variables.store(false, Ordering::Relaxed);
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            documents: state.documents.len(),
            fragment_names: state.fragments.len(),
        }
    }

    /// Returns every normalized body registered under a fragment name.
    #[must_use]
    pub fn fragment_bodies(&self, name: &str) -> Vec<String> {
        self.state
            .lock()
            .fragments
            .bodies(name)
            .map(str::to_string)
            .collect()
    }

    /// Whether `source` (after normalization) is already cached.
    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.state.lock().documents.contains_key(&normalize(source))
    }

    /// Number of cached documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
