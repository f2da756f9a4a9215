//! Function values
//!
//! Per-document numeric functions over index statistics:
//! - Constant leaves (`const`, `numdocs`, `maxdoc`, `docfreq`, `totaltermfreq`)
//! - Term frequency leaf (`termfreq`), a lazy cursor over postings
//! - Binary float combinators (`pow`, `div`)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use squidex_queries::function::{IndexedTerm, ValueSource};
//! use squidex_queries::segment::{IndexReader, MemorySegment, SegmentId};
//!
//! let mut builder = MemorySegment::builder(SegmentId::new(1));
//! builder.add_document(&[("body", &["rust", "rust"])]);
//! let reader = IndexReader::single(Arc::new(builder.build()));
//!
//! let squared = ValueSource::pow(
//!     ValueSource::term_freq(IndexedTerm::new("body", "rust")),
//!     ValueSource::constant(2.0),
//! );
//! let ctx = reader.leaf(0).unwrap();
//! let mut values = squared.bind(&ctx).unwrap();
//! assert_eq!(values.float_val(0).unwrap(), 4.0);
//! ```

mod constants;
mod doc_freq;
mod dual_float;
mod source;
mod term_freq;
mod values;

pub use constants::{ConstValueSource, MaxDocValueSource, NumDocsValueSource};
pub use doc_freq::{DocFreqValueSource, IndexedTerm, TotalTermFreqValueSource};
pub use dual_float::{DualFloatFunction, DualFloatOp};
pub use source::ValueSource;
pub use term_freq::{TermFreqValueSource, TermFreqValues};
pub use values::{ConstValues, FunctionValues, NumericValue};
