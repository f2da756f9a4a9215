//! Per-segment filter result cache
//!
//! Filters compare structurally, so the cache key is the filter value itself
//! plus the segment it was evaluated on. Results are cached before the
//! acceptable-documents mask is applied, since deletions change between
//! searches while the segment's postings do not.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::trace;

use super::{DocIdSet, Filter};
use crate::bitset::DocBitSet;
use crate::segment::{LeafContext, SegmentId};
use crate::Result;

type CacheKey = (SegmentId, Arc<dyn Filter>);

/// Cache of unmasked filter results keyed by (segment, filter)
#[derive(Default)]
pub struct FilterCache {
    entries: RwLock<HashMap<CacheKey, Option<DocBitSet>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the filter's matches on this segment, computing them on a miss
    pub fn get_or_compute(
        &self,
        filter: &Arc<dyn Filter>,
        ctx: &LeafContext<'_>,
        accept_docs: Option<&DocBitSet>,
    ) -> Result<Option<DocBitSet>> {
        let key = (ctx.reader.segment_id(), Arc::clone(filter));

        if let Some(cached) = self.entries.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(segment = %key.0, filter = %filter, "filter cache hit");
            return Ok(cached.clone().map(|bits| bits.masked(accept_docs)));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(segment = %key.0, filter = %filter, "filter cache miss");
        let computed = match filter.doc_id_set(ctx, None)? {
            Some(set) => Some(set.into_bits(ctx.max_doc())?),
            None => None,
        };
        self.entries.write().insert(key, computed.clone());
        Ok(computed.map(|bits| bits.masked(accept_docs)))
    }

    /// Drop every entry computed on `segment`, e.g. after it was merged away
    pub fn evict_segment(&self, segment: SegmentId) {
        self.entries.write().retain(|(id, _), _| *id != segment);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for FilterCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCache")
            .field("entries", &self.len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

/// Filter whose per-segment results are served from a shared `FilterCache`
///
/// Equality and hashing ignore the cache and only consider the wrapped filter.
#[derive(Clone, Debug)]
pub struct CachedFilter {
    inner: Arc<dyn Filter>,
    cache: Arc<FilterCache>,
}

impl CachedFilter {
    pub fn new(inner: Arc<dyn Filter>, cache: Arc<FilterCache>) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &Arc<dyn Filter> {
        &self.inner
    }
}

impl PartialEq for CachedFilter {
    fn eq(&self, other: &Self) -> bool {
        *self.inner == *other.inner
    }
}

impl Eq for CachedFilter {}

impl Hash for CachedFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl fmt::Display for CachedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cached({})", self.inner)
    }
}

impl Filter for CachedFilter {
    fn doc_id_set<'a>(
        &self,
        ctx: &LeafContext<'a>,
        accept_docs: Option<&DocBitSet>,
    ) -> Result<Option<DocIdSet<'a>>> {
        Ok(self
            .cache
            .get_or_compute(&self.inner, ctx, accept_docs)?
            .map(DocIdSet::Bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{BooleanFilter, TermFilter};
    use crate::segment::{IndexReader, MemorySegment, SegmentReader};

    fn segment(id: u64) -> Arc<dyn SegmentReader> {
        let mut builder = MemorySegment::builder(SegmentId::new(id));
        builder.add_document(&[("lang", &["rust"])]);
        builder.add_document(&[("lang", &["go"])]);
        builder.add_document(&[("lang", &["rust"])]);
        Arc::new(builder.build())
    }

    #[test]
    fn test_cache_hit_on_equal_filter() {
        let reader = IndexReader::single(segment(1));
        let ctx = reader.leaf(0).unwrap();
        let cache = FilterCache::new();

        let first: Arc<dyn Filter> = Arc::new(TermFilter::new("lang", "rust"));
        let second: Arc<dyn Filter> = Arc::new(TermFilter::new("lang", "rust"));

        let a = cache.get_or_compute(&first, &ctx, None).unwrap().unwrap();
        let b = cache.get_or_compute(&second, &ctx, None).unwrap().unwrap();

        assert_eq!(a, b);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_applies_mask_after_lookup() {
        let reader = IndexReader::single(segment(1));
        let ctx = reader.leaf(0).unwrap();
        let cache = FilterCache::new();
        let filter: Arc<dyn Filter> = Arc::new(TermFilter::new("lang", "rust"));

        let accept = DocBitSet::from_docs(3, [0, 1]);
        let masked = cache.get_or_compute(&filter, &ctx, Some(&accept)).unwrap().unwrap();
        assert_eq!(masked.iter().collect::<Vec<_>>(), vec![0]);

        let unmasked = cache.get_or_compute(&filter, &ctx, None).unwrap().unwrap();
        assert_eq!(unmasked.iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_cache_remembers_no_match() {
        let reader = IndexReader::single(segment(1));
        let ctx = reader.leaf(0).unwrap();
        let cache = FilterCache::new();
        let filter: Arc<dyn Filter> = Arc::new(TermFilter::new("lang", "cobol"));

        assert!(cache.get_or_compute(&filter, &ctx, None).unwrap().is_none());
        assert!(cache.get_or_compute(&filter, &ctx, None).unwrap().is_none());
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_cache_is_per_segment() {
        let reader = IndexReader::new(vec![segment(1), segment(2)]);
        let cache = FilterCache::new();
        let filter: Arc<dyn Filter> = Arc::new(TermFilter::new("lang", "go"));

        for ctx in reader.leaves() {
            cache.get_or_compute(&filter, &ctx, None).unwrap();
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.misses(), 2);

        cache.evict_segment(SegmentId::new(1));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cached_filter_as_clause() {
        let reader = IndexReader::single(segment(1));
        let ctx = reader.leaf(0).unwrap();
        let cache = Arc::new(FilterCache::new());
        let cached = CachedFilter::new(Arc::new(TermFilter::new("lang", "rust")), Arc::clone(&cache));
        assert_eq!(cached.to_string(), "cached(lang:rust)");

        let filter = BooleanFilter::new()
            .must(cached.clone())
            .must_not(TermFilter::new("lang", "go"));

        for _ in 0..2 {
            let bits = filter
                .doc_id_set(&ctx, None)
                .unwrap()
                .unwrap()
                .into_bits(3)
                .unwrap();
            assert_eq!(bits.iter().collect::<Vec<_>>(), vec![0, 2]);
        }
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);

        let other = CachedFilter::new(Arc::new(TermFilter::new("lang", "rust")), Arc::new(FilterCache::new()));
        assert_eq!(cached, other);
    }
}
