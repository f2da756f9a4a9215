//! Fixed-capacity document bitsets
//!
//! A `DocBitSet` holds one bit per document of a segment (`0..max_doc`). It is
//! backed by a roaring bitmap so that sparse and dense clause results are both
//! cheap to combine.

use roaring::RoaringBitmap;

use crate::segment::{DocId, DocIdSetIterator, NO_MORE_DOCS};
use crate::Result;

/// Set of document ids within a single segment
#[derive(Clone, Debug, PartialEq)]
pub struct DocBitSet {
    bits: RoaringBitmap,
    max_doc: u32,
}

impl DocBitSet {
    /// Create an empty bitset sized for `max_doc` documents
    pub fn new(max_doc: u32) -> Self {
        Self {
            bits: RoaringBitmap::new(),
            max_doc,
        }
    }

    /// Create a bitset with every document in `0..max_doc` set
    pub fn full(max_doc: u32) -> Self {
        let mut set = Self::new(max_doc);
        set.set_all();
        set
    }

    /// Create a bitset from explicit document ids
    pub fn from_docs(max_doc: u32, docs: impl IntoIterator<Item = DocId>) -> Self {
        let mut set = Self::new(max_doc);
        for doc in docs {
            set.set(doc);
        }
        set
    }

    /// Number of bits (the segment's max_doc)
    pub fn max_doc(&self) -> u32 {
        self.max_doc
    }

    /// Number of set bits
    pub fn cardinality(&self) -> u64 {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, doc: DocId) -> bool {
        self.bits.contains(doc)
    }

    pub fn set(&mut self, doc: DocId) {
        debug_assert!(doc < self.max_doc, "doc {} >= max_doc {}", doc, self.max_doc);
        if doc < self.max_doc {
            self.bits.insert(doc);
        }
    }

    pub fn clear(&mut self, doc: DocId) {
        self.bits.remove(doc);
    }

    /// Set every bit in `0..max_doc`
    pub fn set_all(&mut self) {
        self.bits.insert_range(0..self.max_doc);
    }

    /// Union with every document produced by `iter`
    pub fn or_iter(&mut self, iter: &mut dyn DocIdSetIterator) -> Result<()> {
        loop {
            let doc = iter.next_doc()?;
            // Ascending ids: nothing past max_doc can land in this set
            if doc == NO_MORE_DOCS || doc >= self.max_doc {
                return Ok(());
            }
            self.bits.insert(doc);
        }
    }

    /// Keep only documents also produced by `iter`
    pub fn and_iter(&mut self, iter: &mut dyn DocIdSetIterator) -> Result<()> {
        let mut other = RoaringBitmap::new();
        loop {
            let doc = iter.next_doc()?;
            if doc == NO_MORE_DOCS || doc >= self.max_doc {
                break;
            }
            other.insert(doc);
        }
        self.bits &= other;
        Ok(())
    }

    /// Remove every document produced by `iter`
    pub fn and_not_iter(&mut self, iter: &mut dyn DocIdSetIterator) -> Result<()> {
        loop {
            let doc = iter.next_doc()?;
            if doc == NO_MORE_DOCS || doc >= self.max_doc {
                return Ok(());
            }
            self.bits.remove(doc);
        }
    }

    /// Intersect in place with another bitset of the same segment
    pub fn intersect_with(&mut self, other: &DocBitSet) {
        self.bits &= &other.bits;
    }

    /// Apply an acceptable-documents mask; `None` accepts everything
    pub fn masked(mut self, accept_docs: Option<&DocBitSet>) -> DocBitSet {
        if let Some(accept) = accept_docs {
            self.intersect_with(accept);
        }
        self
    }

    /// Iterate set documents in ascending order
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.bits.iter()
    }

    /// Consume the bitset into a forward-only doc id iterator
    pub fn into_iterator(self) -> BitSetIterator {
        BitSetIterator {
            bits: self.bits,
            next_rank: 0,
        }
    }
}

/// Forward-only iterator over the set bits of a `DocBitSet`
#[derive(Debug)]
pub struct BitSetIterator {
    bits: RoaringBitmap,
    /// Rank of the next candidate bit
    next_rank: u64,
}

impl DocIdSetIterator for BitSetIterator {
    fn next_doc(&mut self) -> Result<DocId> {
        if self.next_rank >= self.bits.len() {
            self.next_rank = self.bits.len();
            return Ok(NO_MORE_DOCS);
        }
        let doc = self.bits.select(self.next_rank as u32).unwrap_or(NO_MORE_DOCS);
        self.next_rank += 1;
        Ok(doc)
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        let skip_to = if target == 0 {
            0
        } else {
            self.bits.rank(target - 1)
        };
        self.next_rank = self.next_rank.max(skip_to);
        self.next_doc()
    }

    fn cost(&self) -> u64 {
        self.bits.len()
    }
}
