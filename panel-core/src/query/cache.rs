//! Memoized per-quarter category distributions.

use panel::{CategoryField, CategoryShare, QuarterLabel, Weighting};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type CacheKey = (QuarterLabel, CategoryField, Weighting);

/// A read-mostly map from `(quarter, field, weighting)` to the computed shares.
///
/// Entries are never evicted; the cache lives exactly as long as the façade
/// that owns it. Callers only insert quarters the panel actually holds, which
/// bounds the map by the panel's quarter count.
#[derive(Debug, Default)]
pub struct DistributionCache {
    entries: RwLock<HashMap<CacheKey, Arc<Vec<CategoryShare>>>>,
}

impl DistributionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(
        &self,
        quarter: &QuarterLabel,
        field: CategoryField,
        weighting: Weighting,
        compute: F,
    ) -> Arc<Vec<CategoryShare>>
    where
        F: FnOnce() -> Vec<CategoryShare>,
    {
        let key = (quarter.clone(), field, weighting);
        {
            let read = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = read.get(&key) {
                return Arc::clone(hit);
            }
        }

        let value = Arc::new(compute());
        let mut write = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(write.entry(key).or_insert(value))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
