//! Segment access boundary
//!
//! `SegmentReader` is the contract query evaluation consumes from the index:
//! per-field postings and term statistics for one immutable segment.
//! `IndexReader` groups the segments of a point-in-time view and exposes the
//! index-wide statistics some functions need.

use std::fmt;
use std::sync::Arc;

use super::postings::PostingsEnum;
use super::types::{DocId, SegmentId};
use crate::bitset::DocBitSet;
use crate::Result;

/// Read access to a single immutable segment
pub trait SegmentReader: Send + Sync + fmt::Debug {
    fn segment_id(&self) -> SegmentId;

    /// Size of the local doc id space, deleted documents included
    fn max_doc(&self) -> u32;

    /// Number of live (non-deleted) documents
    fn num_docs(&self) -> u32;

    /// Live documents, or `None` if the segment has no deletions
    fn live_docs(&self) -> Option<&DocBitSet>;

    /// Whether any term was indexed for `field` in this segment
    fn has_field(&self, field: &str) -> bool;

    /// Postings for `field:term`, or `None` if the term is absent
    ///
    /// Postings include deleted documents; callers mask with `live_docs`.
    fn postings(&self, field: &str, term: &str) -> Result<Option<Box<dyn PostingsEnum + '_>>>;

    /// Number of documents containing `field:term`
    fn doc_freq(&self, field: &str, term: &str) -> Result<u32>;

    /// Total occurrences of `field:term`, `None` when frequencies are not indexed
    fn total_term_freq(&self, field: &str, term: &str) -> Result<Option<u64>>;
}

/// Point-in-time view over the ordered segments of an index
#[derive(Clone, Debug, Default)]
pub struct IndexReader {
    segments: Vec<Arc<dyn SegmentReader>>,
    /// Global doc id of the first document of each segment
    doc_bases: Vec<u64>,
}

impl IndexReader {
    pub fn new(segments: Vec<Arc<dyn SegmentReader>>) -> Self {
        let mut doc_bases = Vec::with_capacity(segments.len());
        let mut base = 0u64;
        for segment in &segments {
            doc_bases.push(base);
            base += segment.max_doc() as u64;
        }
        Self {
            segments,
            doc_bases,
        }
    }

    /// View over a single segment
    pub fn single(segment: Arc<dyn SegmentReader>) -> Self {
        Self::new(vec![segment])
    }

    /// Live documents across the whole index
    pub fn num_docs(&self) -> u64 {
        self.segments.iter().map(|s| s.num_docs() as u64).sum()
    }

    /// Total doc id space across the whole index, deleted documents included
    pub fn max_doc(&self) -> u64 {
        self.segments.iter().map(|s| s.max_doc() as u64).sum()
    }

    /// Number of documents containing `field:term` across all segments
    pub fn doc_freq(&self, field: &str, term: &str) -> Result<u64> {
        let mut total = 0u64;
        for segment in &self.segments {
            total += segment.doc_freq(field, term)? as u64;
        }
        Ok(total)
    }

    /// Occurrences of `field:term` across all segments, `None` if any segment lacks frequencies
    pub fn total_term_freq(&self, field: &str, term: &str) -> Result<Option<u64>> {
        let mut total = 0u64;
        for segment in &self.segments {
            match segment.total_term_freq(field, term)? {
                Some(freq) => total += freq,
                None => return Ok(None),
            }
        }
        Ok(Some(total))
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Per-segment contexts in index order
    pub fn leaves(&self) -> impl Iterator<Item = LeafContext<'_>> + '_ {
        (0..self.segments.len()).filter_map(move |ord| self.leaf(ord))
    }

    pub fn leaf(&self, ord: usize) -> Option<LeafContext<'_>> {
        let segment = self.segments.get(ord)?;
        Some(LeafContext {
            reader: segment.as_ref(),
            ord,
            doc_base: self.doc_bases[ord],
            top: self,
        })
    }
}

/// One segment of an `IndexReader`, with a handle back to the whole index
#[derive(Clone, Copy, Debug)]
pub struct LeafContext<'a> {
    pub reader: &'a dyn SegmentReader,
    /// Position of the segment within the index
    pub ord: usize,
    /// Global doc id of this segment's document 0
    pub doc_base: u64,
    pub top: &'a IndexReader,
}

impl<'a> LeafContext<'a> {
    pub fn max_doc(&self) -> u32 {
        self.reader.max_doc()
    }

    /// Map a segment-local doc id to its index-wide id
    pub fn global_doc(&self, doc: DocId) -> u64 {
        self.doc_base + doc as u64
    }
}
