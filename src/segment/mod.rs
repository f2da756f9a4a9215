//! Segment access for query evaluation
//!
//! Query evaluation never reads index files directly. It consumes segments
//! through the `SegmentReader` trait:
//!
//! - `DocIdSetIterator` / `PostingsEnum`: forward-only postings cursors
//! - `SegmentReader`: per-segment postings and term statistics
//! - `IndexReader` / `LeafContext`: the segments of one point-in-time view
//! - `MemorySegment`: in-memory reference implementation

mod memory;
mod postings;
mod reader;
mod types;

pub use memory::*;
pub use postings::*;
pub use reader::*;
pub use types::*;
