//! In-document frequency of a term

use tracing::trace;

use super::doc_freq::IndexedTerm;
use super::values::{FunctionValues, NumericValue};
use crate::error::QueriesError;
use crate::segment::{DocId, LeafContext, PostingsEnum, SegmentReader, NO_MORE_DOCS};
use crate::Result;

/// Frequency of a term in each document
///
/// Documents without the term have value 0. Fields indexed without
/// frequencies report 1 for every matching document, so "present but not
/// counted" is indistinguishable from a single occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TermFreqValueSource {
    pub term: IndexedTerm,
}

impl TermFreqValueSource {
    pub fn new(term: IndexedTerm) -> Self {
        Self { term }
    }

    pub fn name(&self) -> &'static str {
        "termfreq"
    }

    pub fn description(&self) -> String {
        format!("{}({})", self.name(), self.term)
    }

    pub fn bind<'a>(&self, ctx: &LeafContext<'a>) -> Result<Box<dyn FunctionValues + 'a>> {
        let values = TermFreqValues::new(
            ctx.reader,
            self.term.indexed_field.clone(),
            self.term.indexed_term.clone(),
            self.description(),
        )?;
        Ok(Box::new(values))
    }
}

enum PostingsState<'a> {
    Bound(Box<dyn PostingsEnum + 'a>),
    /// Term or field absent from the segment
    Unbound,
}

/// Cursor over the postings of one term in one segment
///
/// Probes are served by advancing the postings forward. A probe below the
/// previous one re-seeks the postings from the start.
pub struct TermFreqValues<'a> {
    reader: &'a dyn SegmentReader,
    field: String,
    term: String,
    description: String,
    postings: PostingsState<'a>,
    /// Current postings position; `None` before the first advance
    at_doc: Option<DocId>,
    last_doc_requested: Option<DocId>,
}

impl<'a> TermFreqValues<'a> {
    fn new(
        reader: &'a dyn SegmentReader,
        field: String,
        term: String,
        description: String,
    ) -> Result<Self> {
        let mut values = Self {
            reader,
            field,
            term,
            description,
            postings: PostingsState::Unbound,
            at_doc: None,
            last_doc_requested: None,
        };
        values.reset()?;
        Ok(values)
    }

    fn reset(&mut self) -> Result<()> {
        self.postings = if !self.reader.has_field(&self.field) {
            PostingsState::Unbound
        } else {
            match self.reader.postings(&self.field, &self.term)? {
                Some(postings) => PostingsState::Bound(postings),
                None => PostingsState::Unbound,
            }
        };
        self.at_doc = None;
        Ok(())
    }

    fn freq_at(&mut self, doc: DocId) -> Result<i64> {
        debug_assert!(doc < self.reader.max_doc(), "doc {} out of segment range", doc);

        if let Some(last) = self.last_doc_requested {
            if doc < last {
                trace!(
                    function = %self.description,
                    doc,
                    last,
                    "out-of-order access, resetting postings"
                );
                self.reset()?;
            }
        }
        self.last_doc_requested = Some(doc);

        if self.at_doc.map_or(true, |at| at < doc) {
            let next = match &mut self.postings {
                PostingsState::Bound(postings) => postings.advance(doc)?,
                PostingsState::Unbound => NO_MORE_DOCS,
            };
            self.at_doc = Some(next);
        }

        match (&self.postings, self.at_doc) {
            (PostingsState::Bound(postings), Some(at)) if at == doc => {
                Ok(postings.freq().map_or(1, i64::from))
            }
            // End of postings, or the next match lies after this doc
            _ => Ok(0),
        }
    }
}

impl FunctionValues for TermFreqValues<'_> {
    fn value_at(&mut self, doc: DocId) -> Result<NumericValue> {
        match self.freq_at(doc) {
            Ok(freq) => Ok(NumericValue::Int(freq)),
            Err(err) => Err(QueriesError::evaluation(self.description.clone(), doc, err)),
        }
    }

    fn value_string(&mut self, doc: DocId) -> Result<String> {
        let value = self.value_at(doc)?;
        Ok(format!("{}={}", self.description, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitset::DocBitSet;
    use crate::config::{FieldOptions, IndexSettings};
    use crate::segment::{DocIdSetIterator, IndexReader, MemorySegment, SegmentId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// maxDoc=5, "x" at {1: 2, 3: 5}
    fn reader() -> IndexReader {
        let mut builder = MemorySegment::builder(SegmentId::new(1));
        builder.add_document(&[("body", &["y"])]);
        builder.add_document(&[("body", &["x", "x"])]);
        builder.add_empty_document();
        builder.add_document(&[("body", &["x", "x", "x", "x", "x", "y"])]);
        builder.add_document(&[("body", &["y"])]);
        IndexReader::single(Arc::new(builder.build()))
    }

    fn source(term: &str) -> TermFreqValueSource {
        TermFreqValueSource::new(IndexedTerm::new("body", term))
    }

    #[test]
    fn test_ascending_probes() {
        let reader = reader();
        let ctx = reader.leaf(0).unwrap();
        let mut values = source("x").bind(&ctx).unwrap();
        let got: Vec<i32> = (0..5).map(|doc| values.int_val(doc).unwrap()).collect();
        assert_eq!(got, vec![0, 2, 0, 5, 0]);
    }

    #[test]
    fn test_repeated_probe_is_idempotent() {
        let reader = reader();
        let ctx = reader.leaf(0).unwrap();
        let mut values = source("x").bind(&ctx).unwrap();
        assert_eq!(values.int_val(3).unwrap(), 5);
        assert_eq!(values.int_val(3).unwrap(), 5);
        assert_eq!(values.int_val(2).unwrap(), 0);
        assert_eq!(values.int_val(2).unwrap(), 0);
    }

    #[test]
    fn test_out_of_order_probes_match_fresh_cursor() {
        let reader = reader();
        let ctx = reader.leaf(0).unwrap();
        let sequence = [4, 1, 3, 0, 3, 2, 1, 1, 4, 0];

        let mut shared = source("x").bind(&ctx).unwrap();
        for &doc in &sequence {
            let mut fresh = source("x").bind(&ctx).unwrap();
            assert_eq!(
                shared.int_val(doc).unwrap(),
                fresh.int_val(doc).unwrap(),
                "doc {}",
                doc
            );
        }
    }

    #[test]
    fn test_missing_term_is_zero() {
        let reader = reader();
        let ctx = reader.leaf(0).unwrap();
        let mut missing_term = source("z").bind(&ctx).unwrap();
        let mut missing_field = TermFreqValueSource::new(IndexedTerm::new("title", "x"))
            .bind(&ctx)
            .unwrap();
        for doc in [3, 0, 4] {
            assert_eq!(missing_term.int_val(doc).unwrap(), 0);
            assert_eq!(missing_field.int_val(doc).unwrap(), 0);
        }
    }

    #[test]
    fn test_omitted_frequencies_report_one() {
        let settings = IndexSettings::default().with_field("tags", FieldOptions::docs_only());
        let mut builder = MemorySegment::builder_with_settings(SegmentId::new(2), settings);
        builder.add_document(&[("tags", &["a", "a", "a"])]);
        builder.add_document(&[("tags", &["b"])]);
        let reader = IndexReader::single(Arc::new(builder.build()));
        let ctx = reader.leaf(0).unwrap();

        let mut values = TermFreqValueSource::new(IndexedTerm::new("tags", "a"))
            .bind(&ctx)
            .unwrap();
        assert_eq!(values.int_val(0).unwrap(), 1);
        assert_eq!(values.int_val(1).unwrap(), 0);
    }

    #[test]
    fn test_value_string() {
        let reader = reader();
        let ctx = reader.leaf(0).unwrap();
        let mut values = source("x").bind(&ctx).unwrap();
        assert_eq!(values.value_string(1).unwrap(), "termfreq(body,x)=2");
        assert_eq!(values.float_val(3).unwrap(), 5.0);
    }

    /// Segment whose postings fail once advanced past `fail_from`
    #[derive(Debug)]
    struct FlakySegment {
        fail_from: DocId,
        field_indexed: bool,
        seeks: Arc<AtomicUsize>,
    }

    struct FlakyPostings {
        fail_from: DocId,
        doc: DocId,
    }

    impl DocIdSetIterator for FlakyPostings {
        fn next_doc(&mut self) -> Result<DocId> {
            let target = self.doc.wrapping_add(1);
            self.advance(target)
        }

        fn advance(&mut self, target: DocId) -> Result<DocId> {
            if target >= self.fail_from {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "corrupt block").into());
            }
            self.doc = target;
            Ok(target)
        }

        fn cost(&self) -> u64 {
            self.fail_from as u64
        }
    }

    impl PostingsEnum for FlakyPostings {
        fn freq(&self) -> Option<u32> {
            Some(1)
        }
    }

    impl SegmentReader for FlakySegment {
        fn segment_id(&self) -> SegmentId {
            SegmentId::new(9)
        }

        fn max_doc(&self) -> u32 {
            10
        }

        fn num_docs(&self) -> u32 {
            10
        }

        fn live_docs(&self) -> Option<&DocBitSet> {
            None
        }

        fn has_field(&self, _field: &str) -> bool {
            self.field_indexed
        }

        fn postings(&self, _field: &str, _term: &str) -> Result<Option<Box<dyn PostingsEnum + '_>>> {
            self.seeks.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Box::new(FlakyPostings {
                fail_from: self.fail_from,
                doc: 0,
            })))
        }

        fn doc_freq(&self, _field: &str, _term: &str) -> Result<u32> {
            Ok(self.fail_from)
        }

        fn total_term_freq(&self, _field: &str, _term: &str) -> Result<Option<u64>> {
            Ok(None)
        }
    }

    #[test]
    fn test_adapter_fault_is_tagged() {
        let seeks = Arc::new(AtomicUsize::new(0));
        let reader = IndexReader::single(Arc::new(FlakySegment {
            fail_from: 6,
            field_indexed: true,
            seeks: Arc::clone(&seeks),
        }));
        let ctx = reader.leaf(0).unwrap();
        let mut values = source("x").bind(&ctx).unwrap();

        assert_eq!(values.int_val(2).unwrap(), 1);
        let err = values.int_val(7).unwrap_err();
        assert!(err.is_adapter_fault());
        match err {
            QueriesError::Evaluation { description, doc, .. } => {
                assert_eq!(description, "termfreq(body,x)");
                assert_eq!(doc, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_backward_probe_reseeks() {
        let seeks = Arc::new(AtomicUsize::new(0));
        let reader = IndexReader::single(Arc::new(FlakySegment {
            fail_from: 100,
            field_indexed: true,
            seeks: Arc::clone(&seeks),
        }));
        let ctx = reader.leaf(0).unwrap();
        let mut values = source("x").bind(&ctx).unwrap();
        assert_eq!(seeks.load(Ordering::SeqCst), 1);

        values.int_val(1).unwrap();
        values.int_val(5).unwrap();
        values.int_val(5).unwrap();
        assert_eq!(seeks.load(Ordering::SeqCst), 1);

        values.int_val(3).unwrap();
        assert_eq!(seeks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unindexed_field_skips_postings_lookup() {
        let seeks = Arc::new(AtomicUsize::new(0));
        let reader = IndexReader::single(Arc::new(FlakySegment {
            fail_from: 100,
            field_indexed: false,
            seeks: Arc::clone(&seeks),
        }));
        let ctx = reader.leaf(0).unwrap();
        let mut values = source("x").bind(&ctx).unwrap();

        assert_eq!(values.int_val(4).unwrap(), 0);
        assert_eq!(values.int_val(1).unwrap(), 0);
        assert_eq!(seeks.load(Ordering::SeqCst), 0);
    }
}
