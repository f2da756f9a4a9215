pub mod bitset;
pub mod config;
pub mod error;
pub mod filter;
pub mod function;
pub mod segment;

pub use bitset::DocBitSet;
pub use config::{FieldOptions, IndexSettings};
pub use error::{QueriesError, Result};
pub use filter::{BooleanFilter, Filter, FilterClause, Occur};
pub use function::{FunctionValues, ValueSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
