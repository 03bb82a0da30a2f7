//! Fetch-once wrapper for light-curve sources.

use std::cell::RefCell;
use std::collections::HashMap;

use astra_lightcurve::LightCurveSet;
use tracing::debug;

use crate::error::IoError;
use crate::source::{LightCurveSource, SearchFilters};

/// Memoizes [`LightCurveSource::fetch`] by target and filters.
///
/// Repeated queries for the same target and filters return the cached set
/// without touching the inner source. Errors are not cached.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    cache: RefCell<HashMap<(String, SearchFilters), LightCurveSet>>,
}

impl<S: LightCurveSource> CachedSource<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of cached queries.
    pub fn cached_queries(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Drops every cached result.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl<S: LightCurveSource> LightCurveSource for CachedSource<S> {
    fn fetch(&self, target: &str, filters: &SearchFilters) -> Result<LightCurveSet, IoError> {
        let key = (target.to_string(), filters.clone());
        if let Some(set) = self.cache.borrow().get(&key) {
            debug!(target_name = target, "light-curve cache hit");
            return Ok(set.clone());
        }
        let set = self.inner.fetch(target, filters)?;
        self.cache.borrow_mut().insert(key, set.clone());
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use astra_lightcurve::LightCurve;

    use super::*;
    use crate::source::Cadence;

    struct CountingSource {
        calls: Cell<usize>,
    }

    impl LightCurveSource for CountingSource {
        fn fetch(&self, target: &str, _filters: &SearchFilters) -> Result<LightCurveSet, IoError> {
            self.calls.set(self.calls.get() + 1);
            if target == "missing" {
                return Err(IoError::TargetNotFound {
                    target: target.to_string(),
                    reason: "test".to_string(),
                });
            }
            let lc = LightCurve::without_errors(vec![0.0, 1.0], vec![1.0, 1.0]).unwrap();
            Ok(LightCurveSet::new(vec![lc]))
        }
    }

    fn source() -> CachedSource<CountingSource> {
        CachedSource::new(CountingSource { calls: Cell::new(0) })
    }

    #[test]
    fn repeated_fetch_hits_cache() {
        let cached = source();
        let filters = SearchFilters::new().with_cadence(Cadence::Long);
        let a = cached.fetch("Kepler-17", &filters).unwrap();
        let b = cached.fetch("Kepler-17", &filters).unwrap();
        assert_eq!(a, b);
        assert_eq!(cached.inner().calls.get(), 1);
        assert_eq!(cached.cached_queries(), 1);
    }

    #[test]
    fn different_filters_are_separate_queries() {
        let cached = source();
        cached.fetch("Kepler-17", &SearchFilters::new()).unwrap();
        cached
            .fetch("Kepler-17", &SearchFilters::new().with_quarters(vec![1]))
            .unwrap();
        assert_eq!(cached.inner().calls.get(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let cached = source();
        assert!(cached.fetch("missing", &SearchFilters::new()).is_err());
        assert!(cached.fetch("missing", &SearchFilters::new()).is_err());
        assert_eq!(cached.inner().calls.get(), 2);
        assert_eq!(cached.cached_queries(), 0);
    }

    #[test]
    fn clear_forces_refetch() {
        let cached = source();
        cached.fetch("Kepler-17", &SearchFilters::new()).unwrap();
        cached.clear();
        cached.fetch("Kepler-17", &SearchFilters::new()).unwrap();
        assert_eq!(cached.inner().calls.get(), 2);
    }
}
