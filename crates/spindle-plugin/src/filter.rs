//! Process-wide cache of compiled loader filters.
//!
//! Plugins typically register the same handful of patterns (`\.ya?ml$`,
//! `\.svg$`, ...) on every build. Compiled filters are shared across every
//! registration in the process, including registrations from later builds.
//!
//! The lock guards a single map access and is never held while a pattern
//! compiles. Two callers racing on the same new pattern may both compile it;
//! the first insert wins and both receive the same filter.

use parking_lot::Mutex;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

/// A compiled loader filter, matched against absolute file paths
pub type Filter = Arc<Regex>;

/// Errors produced while compiling a filter pattern
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Loaders must declare which paths they apply to
    #[error("filter pattern is empty")]
    Empty,

    /// The pattern is not a valid regular expression
    #[error("invalid filter pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

static GLOBAL: LazyLock<FilterCache> = LazyLock::new(FilterCache::new);

/// Pattern string to compiled filter, guarded by one mutex.
#[derive(Debug, Default)]
pub struct FilterCache {
    entries: Mutex<FxHashMap<String, Filter>>,
    compiles: AtomicUsize,
    hits: AtomicUsize,
}

impl FilterCache {
    /// Create an empty cache.
    ///
    /// Most callers want [`FilterCache::global`]; a private cache is useful
    /// when a host wants isolation between independent sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by every registration in this process
    pub fn global() -> &'static FilterCache {
        &GLOBAL
    }

    /// Return the cached filter for `pattern`, compiling it on a miss.
    ///
    /// Only successful compilations are cached; an invalid pattern is
    /// recompiled (and rejected again) on every call.
    pub fn lookup_or_compile(&self, pattern: &str) -> Result<Filter, FilterError> {
        if pattern.is_empty() {
            return Err(FilterError::Empty);
        }

        if let Some(filter) = self.entries.lock().get(pattern).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(pattern, "filter cache hit");
            return Ok(filter);
        }

        let compiled = Regex::new(pattern).map_err(|source| FilterError::Invalid {
            pattern: pattern.to_string(),
            source,
        })?;
        self.compiles.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(pattern, "compiled loader filter");

        let filter = Arc::new(compiled);
        let mut entries = self.entries.lock();
        Ok(Arc::clone(
            entries.entry(pattern.to_string()).or_insert(filter),
        ))
    }

    /// Number of successful pattern compilations performed by this cache
    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::Relaxed)
    }

    /// Number of lookups answered from the cache
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
