//! Doc ids, segment ids and postings entries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense document number within a segment (0..max_doc)
pub type DocId = u32;

/// Returned by doc id iterators once they are exhausted
pub const NO_MORE_DOCS: DocId = u32::MAX;

/// Identifies a segment; part of every filter cache key
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub u64);

impl SegmentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment_{}", self.0)
    }
}

/// A single posting entry within a posting list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Dense document number within the segment
    pub doc: DocId,
    /// Term frequency in this document, absent when the field omits frequencies
    pub term_frequency: Option<u32>,
}

impl Posting {
    pub fn new(doc: DocId, term_frequency: u32) -> Self {
        Self {
            doc,
            term_frequency: Some(term_frequency),
        }
    }

    pub fn doc_only(doc: DocId) -> Self {
        Self {
            doc,
            term_frequency: None,
        }
    }
}
