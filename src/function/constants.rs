//! Leaves whose value is the same for every document of a segment

use ordered_float::OrderedFloat;

use super::values::{ConstValues, FunctionValues, NumericValue};
use crate::segment::LeafContext;

/// Fixed float constant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstValueSource {
    constant: OrderedFloat<f32>,
}

impl ConstValueSource {
    pub fn new(constant: f32) -> Self {
        Self {
            constant: OrderedFloat(constant),
        }
    }

    pub fn value(&self) -> f32 {
        self.constant.into_inner()
    }

    pub fn name(&self) -> &'static str {
        "const"
    }

    pub fn description(&self) -> String {
        format!("{}({:?})", self.name(), self.value())
    }

    pub fn bind<'a>(&self, _ctx: &LeafContext<'a>) -> Box<dyn FunctionValues + 'a> {
        Box::new(ConstValues::new(
            NumericValue::Float(self.value()),
            self.description(),
        ))
    }
}

/// Number of live documents in the whole index, not just the segment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NumDocsValueSource;

impl NumDocsValueSource {
    pub fn name(&self) -> &'static str {
        "numdocs"
    }

    pub fn description(&self) -> String {
        format!("{}()", self.name())
    }

    pub fn bind<'a>(&self, ctx: &LeafContext<'a>) -> Box<dyn FunctionValues + 'a> {
        let num_docs = ctx.top.num_docs() as i64;
        Box::new(ConstValues::new(NumericValue::Int(num_docs), self.description()))
    }
}

/// Size of the whole index's doc id space, deleted documents included
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaxDocValueSource;

impl MaxDocValueSource {
    pub fn name(&self) -> &'static str {
        "maxdoc"
    }

    pub fn description(&self) -> String {
        format!("{}()", self.name())
    }

    pub fn bind<'a>(&self, ctx: &LeafContext<'a>) -> Box<dyn FunctionValues + 'a> {
        let max_doc = ctx.top.max_doc() as i64;
        Box::new(ConstValues::new(NumericValue::Int(max_doc), self.description()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{IndexReader, MemorySegment, SegmentId, SegmentReader};
    use std::sync::Arc;

    fn segment(id: u64, docs: u32, deleted: &[u32]) -> Arc<dyn SegmentReader> {
        let mut builder = MemorySegment::builder(SegmentId::new(id));
        for _ in 0..docs {
            builder.add_empty_document();
        }
        for &doc in deleted {
            builder.delete_document(doc);
        }
        Arc::new(builder.build())
    }

    #[test]
    fn test_const_source() {
        let reader = IndexReader::single(segment(1, 3, &[]));
        let ctx = reader.leaf(0).unwrap();
        let source = ConstValueSource::new(2.5);
        assert_eq!(source.description(), "const(2.5)");

        let mut values = source.bind(&ctx);
        assert_eq!(values.float_val(0).unwrap(), 2.5);
        assert_eq!(values.float_val(2).unwrap(), 2.5);
    }

    #[test]
    fn test_num_docs_uses_whole_index() {
        let reader = IndexReader::new(vec![segment(1, 4, &[1]), segment(2, 3, &[])]);
        let source = NumDocsValueSource;
        assert_eq!(source.description(), "numdocs()");

        for ctx in reader.leaves() {
            let mut values = source.bind(&ctx);
            assert_eq!(values.int_val(0).unwrap(), 6);
            assert_eq!(values.value_string(0).unwrap(), "numdocs()=6");
        }
    }

    #[test]
    fn test_max_doc_counts_deleted() {
        let reader = IndexReader::new(vec![segment(1, 4, &[1, 2]), segment(2, 3, &[])]);
        let ctx = reader.leaf(1).unwrap();
        let mut values = MaxDocValueSource.bind(&ctx);
        assert_eq!(values.long_val(0).unwrap(), 7);
    }
}
