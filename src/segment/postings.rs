//! Forward-only iterators over document ids and postings

use std::sync::Arc;

use super::types::{DocId, Posting, NO_MORE_DOCS};
use crate::Result;

/// Iterator over ascending, distinct document ids
///
/// Iteration is fallible because postings may be decoded lazily from storage.
pub trait DocIdSetIterator: Send {
    /// Move to the next document, or `NO_MORE_DOCS` once exhausted
    fn next_doc(&mut self) -> Result<DocId>;

    /// Move to the first document `>= target`, or `NO_MORE_DOCS`
    ///
    /// `target` must be greater than the current document.
    fn advance(&mut self, target: DocId) -> Result<DocId>;

    /// Estimated number of documents this iterator yields
    fn cost(&self) -> u64;
}

/// Postings of a single term: document ids plus per-document statistics
pub trait PostingsEnum: DocIdSetIterator {
    /// In-document frequency of the current document
    ///
    /// `None` when the field was indexed without frequencies.
    fn freq(&self) -> Option<u32>;
}

impl<I: DocIdSetIterator + ?Sized> DocIdSetIterator for Box<I> {
    fn next_doc(&mut self) -> Result<DocId> {
        (**self).next_doc()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        (**self).advance(target)
    }

    fn cost(&self) -> u64 {
        (**self).cost()
    }
}

/// Postings iterator over a shared, already decoded posting list
#[derive(Clone, Debug)]
pub struct VecPostings {
    postings: Arc<[Posting]>,
    /// Index of the current posting; `None` before the first move
    pos: Option<usize>,
}

impl VecPostings {
    pub fn new(postings: Arc<[Posting]>) -> Self {
        Self {
            postings,
            pos: None,
        }
    }

    fn current(&self) -> Option<&Posting> {
        self.pos.and_then(|pos| self.postings.get(pos))
    }

    fn doc_at(&self, pos: usize) -> DocId {
        self.postings.get(pos).map(|p| p.doc).unwrap_or(NO_MORE_DOCS)
    }
}

impl DocIdSetIterator for VecPostings {
    fn next_doc(&mut self) -> Result<DocId> {
        let next = match self.pos {
            None => 0,
            Some(pos) => (pos + 1).min(self.postings.len()),
        };
        self.pos = Some(next);
        Ok(self.doc_at(next))
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        let start = self.pos.map(|pos| pos + 1).unwrap_or(0).min(self.postings.len());
        // Posting lists are sorted by doc, so binary search the remaining tail
        let offset = self.postings[start..].partition_point(|p| p.doc < target);
        let next = start + offset;
        self.pos = Some(next);
        Ok(self.doc_at(next))
    }

    fn cost(&self) -> u64 {
        self.postings.len() as u64
    }
}

impl PostingsEnum for VecPostings {
    fn freq(&self) -> Option<u32> {
        self.current().and_then(|p| p.term_frequency)
    }
}
