//! Function value sources
//!
//! A `ValueSource` is an immutable expression tree. Binding it to a segment
//! yields a `FunctionValues` cursor holding all mutable scan state, so one
//! source can be bound on many segments concurrently.

use std::fmt;

use super::constants::{ConstValueSource, MaxDocValueSource, NumDocsValueSource};
use super::doc_freq::{DocFreqValueSource, IndexedTerm, TotalTermFreqValueSource};
use super::dual_float::DualFloatFunction;
use super::term_freq::TermFreqValueSource;
use super::values::FunctionValues;
use crate::segment::LeafContext;
use crate::Result;

/// Node of a function expression tree
///
/// Equality and hashing are structural, so equal expressions built
/// independently share cache entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueSource {
    Const(ConstValueSource),
    NumDocs(NumDocsValueSource),
    MaxDoc(MaxDocValueSource),
    DocFreq(DocFreqValueSource),
    TotalTermFreq(TotalTermFreqValueSource),
    TermFreq(TermFreqValueSource),
    DualFloat(DualFloatFunction),
}

impl ValueSource {
    pub fn constant(value: f32) -> Self {
        ValueSource::Const(ConstValueSource::new(value))
    }

    pub fn num_docs() -> Self {
        ValueSource::NumDocs(NumDocsValueSource)
    }

    pub fn max_doc() -> Self {
        ValueSource::MaxDoc(MaxDocValueSource)
    }

    pub fn doc_freq(term: IndexedTerm) -> Self {
        ValueSource::DocFreq(DocFreqValueSource::new(term))
    }

    pub fn total_term_freq(term: IndexedTerm) -> Self {
        ValueSource::TotalTermFreq(TotalTermFreqValueSource::new(term))
    }

    pub fn term_freq(term: IndexedTerm) -> Self {
        ValueSource::TermFreq(TermFreqValueSource::new(term))
    }

    pub fn pow(base: ValueSource, exponent: ValueSource) -> Self {
        ValueSource::DualFloat(DualFloatFunction::pow(base, exponent))
    }

    pub fn div(dividend: ValueSource, divisor: ValueSource) -> Self {
        ValueSource::DualFloat(DualFloatFunction::div(dividend, divisor))
    }

    /// Short identifier of the node kind
    pub fn name(&self) -> &'static str {
        match self {
            ValueSource::Const(s) => s.name(),
            ValueSource::NumDocs(s) => s.name(),
            ValueSource::MaxDoc(s) => s.name(),
            ValueSource::DocFreq(s) => s.name(),
            ValueSource::TotalTermFreq(s) => s.name(),
            ValueSource::TermFreq(s) => s.name(),
            ValueSource::DualFloat(s) => s.name(),
        }
    }

    /// Name plus formatted operands, e.g. `pow(termfreq(body,x),const(2.0))`
    pub fn description(&self) -> String {
        match self {
            ValueSource::Const(s) => s.description(),
            ValueSource::NumDocs(s) => s.description(),
            ValueSource::MaxDoc(s) => s.description(),
            ValueSource::DocFreq(s) => s.description(),
            ValueSource::TotalTermFreq(s) => s.description(),
            ValueSource::TermFreq(s) => s.description(),
            ValueSource::DualFloat(s) => s.description(),
        }
    }

    /// Create a fresh cursor scoped to one segment
    pub fn bind<'a>(&self, ctx: &LeafContext<'a>) -> Result<Box<dyn FunctionValues + 'a>> {
        match self {
            ValueSource::Const(s) => Ok(s.bind(ctx)),
            ValueSource::NumDocs(s) => Ok(s.bind(ctx)),
            ValueSource::MaxDoc(s) => Ok(s.bind(ctx)),
            ValueSource::DocFreq(s) => s.bind(ctx),
            ValueSource::TotalTermFreq(s) => s.bind(ctx),
            ValueSource::TermFreq(s) => s.bind(ctx),
            ValueSource::DualFloat(s) => s.bind(ctx),
        }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl From<ConstValueSource> for ValueSource {
    fn from(source: ConstValueSource) -> Self {
        ValueSource::Const(source)
    }
}

impl From<DocFreqValueSource> for ValueSource {
    fn from(source: DocFreqValueSource) -> Self {
        ValueSource::DocFreq(source)
    }
}

impl From<TermFreqValueSource> for ValueSource {
    fn from(source: TermFreqValueSource) -> Self {
        ValueSource::TermFreq(source)
    }
}

impl From<DualFloatFunction> for ValueSource {
    fn from(source: DualFloatFunction) -> Self {
        ValueSource::DualFloat(source)
    }
}
