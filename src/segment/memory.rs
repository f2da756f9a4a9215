//! In-memory segment
//!
//! A fully decoded segment kept in memory. Used for small indexes, tests and
//! benchmarks; disk-backed segments implement the same `SegmentReader` trait.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::postings::{PostingsEnum, VecPostings};
use super::reader::SegmentReader;
use super::types::{DocId, Posting, SegmentId};
use crate::bitset::DocBitSet;
use crate::config::IndexSettings;
use crate::Result;

#[derive(Debug, Default)]
struct FieldPostings {
    index_frequencies: bool,
    terms: BTreeMap<String, Arc<[Posting]>>,
}

/// Immutable segment held entirely in memory
#[derive(Debug)]
pub struct MemorySegment {
    id: SegmentId,
    max_doc: u32,
    fields: BTreeMap<String, FieldPostings>,
    live_docs: Option<DocBitSet>,
}

impl MemorySegment {
    /// Start building a segment with default field options
    pub fn builder(id: SegmentId) -> MemorySegmentBuilder {
        MemorySegmentBuilder::new(id, IndexSettings::default())
    }

    /// Start building a segment with explicit settings
    pub fn builder_with_settings(id: SegmentId, settings: IndexSettings) -> MemorySegmentBuilder {
        MemorySegmentBuilder::new(id, settings)
    }

    /// Mark a document as deleted; returns false if it was already deleted or out of range
    pub fn delete(&mut self, doc: DocId) -> bool {
        if doc >= self.max_doc {
            return false;
        }
        let max_doc = self.max_doc;
        let live = self.live_docs.get_or_insert_with(|| DocBitSet::full(max_doc));
        if !live.get(doc) {
            return false;
        }
        live.clear(doc);
        true
    }

    fn term_postings(&self, field: &str, term: &str) -> Option<(&FieldPostings, &Arc<[Posting]>)> {
        let postings = self.fields.get(field)?;
        let list = postings.terms.get(term)?;
        Some((postings, list))
    }
}

impl SegmentReader for MemorySegment {
    fn segment_id(&self) -> SegmentId {
        self.id
    }

    fn max_doc(&self) -> u32 {
        self.max_doc
    }

    fn num_docs(&self) -> u32 {
        match &self.live_docs {
            Some(live) => live.cardinality() as u32,
            None => self.max_doc,
        }
    }

    fn live_docs(&self) -> Option<&DocBitSet> {
        self.live_docs.as_ref()
    }

    fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    fn postings(&self, field: &str, term: &str) -> Result<Option<Box<dyn PostingsEnum + '_>>> {
        Ok(self
            .term_postings(field, term)
            .map(|(_, list)| Box::new(VecPostings::new(Arc::clone(list))) as Box<dyn PostingsEnum + '_>))
    }

    fn doc_freq(&self, field: &str, term: &str) -> Result<u32> {
        Ok(self
            .term_postings(field, term)
            .map(|(_, list)| list.len() as u32)
            .unwrap_or(0))
    }

    fn total_term_freq(&self, field: &str, term: &str) -> Result<Option<u64>> {
        let Some((field_postings, list)) = self.term_postings(field, term) else {
            return Ok(Some(0));
        };
        if !field_postings.index_frequencies {
            return Ok(None);
        }
        Ok(Some(
            list.iter()
                .map(|p| p.term_frequency.unwrap_or(1) as u64)
                .sum(),
        ))
    }
}

/// Accumulates documents into a `MemorySegment`
///
/// Documents receive ascending doc ids in insertion order, so every posting
/// list is sorted by construction.
pub struct MemorySegmentBuilder {
    id: SegmentId,
    settings: IndexSettings,
    next_doc: DocId,
    fields: BTreeMap<String, BTreeMap<String, Vec<Posting>>>,
    deleted: Vec<DocId>,
}

impl MemorySegmentBuilder {
    fn new(id: SegmentId, settings: IndexSettings) -> Self {
        Self {
            id,
            settings,
            next_doc: 0,
            fields: BTreeMap::new(),
            deleted: Vec::new(),
        }
    }

    /// Add a document given as analyzed tokens per field; returns its doc id
    pub fn add_document(&mut self, fields: &[(&str, &[&str])]) -> DocId {
        let doc = self.next_doc;
        self.next_doc += 1;

        // A field may be listed more than once; it still gets one posting per term
        let mut counts: BTreeMap<&str, BTreeMap<&str, u32>> = BTreeMap::new();
        for (field, tokens) in fields {
            let field_counts = counts.entry(*field).or_default();
            for token in tokens.iter() {
                *field_counts.entry(*token).or_insert(0) += 1;
            }
        }

        for (field, term_counts) in counts {
            let index_frequencies = self.settings.field_options(field).index_frequencies;
            let terms = self.fields.entry(field.to_string()).or_default();
            for (token, count) in term_counts {
                let posting = if index_frequencies {
                    Posting::new(doc, count)
                } else {
                    Posting::doc_only(doc)
                };
                terms.entry(token.to_string()).or_default().push(posting);
            }
        }

        doc
    }

    /// Add a document with no indexed content
    pub fn add_empty_document(&mut self) -> DocId {
        self.add_document(&[])
    }

    /// Mark a previously added document as deleted
    pub fn delete_document(&mut self, doc: DocId) -> &mut Self {
        if doc < self.next_doc {
            self.deleted.push(doc);
        }
        self
    }

    pub fn build(self) -> MemorySegment {
        let fields = self
            .fields
            .into_iter()
            .map(|(name, terms)| {
                let index_frequencies = self.settings.field_options(&name).index_frequencies;
                let terms: BTreeMap<String, Arc<[Posting]>> = terms
                    .into_iter()
                    .map(|(term, list)| (term, Arc::from(list)))
                    .collect();
                (
                    name,
                    FieldPostings {
                        index_frequencies,
                        terms,
                    },
                )
            })
            .collect();

        let mut segment = MemorySegment {
            id: self.id,
            max_doc: self.next_doc,
            fields,
            live_docs: None,
        };
        for doc in self.deleted {
            segment.delete(doc);
        }

        debug!(
            segment = %segment.id,
            max_doc = segment.max_doc,
            live = segment.num_docs(),
            "built in-memory segment"
        );
        segment
    }
}
