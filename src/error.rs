use thiserror::Error;

use crate::segment::DocId;

/// Main error type for query evaluation
#[derive(Error, Debug)]
pub enum QueriesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised by segment adapters whose postings cannot be read or decoded
    #[error("Postings unavailable for {field}:{term}: {reason}")]
    Postings {
        field: String,
        term: String,
        reason: String,
    },

    #[error("caught error in function {description} : doc={doc}")]
    Evaluation {
        description: String,
        doc: DocId,
        #[source]
        source: Box<QueriesError>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for query evaluation
pub type Result<T> = std::result::Result<T, QueriesError>;

impl QueriesError {
    /// Wrap an error raised while a function resolved `doc`
    pub fn evaluation(description: impl Into<String>, doc: DocId, source: QueriesError) -> Self {
        QueriesError::Evaluation {
            description: description.into(),
            doc,
            source: Box::new(source),
        }
    }

    /// Whether the root cause is a storage or postings fault in the segment adapter
    pub fn is_adapter_fault(&self) -> bool {
        match self {
            QueriesError::Io(_) | QueriesError::Postings { .. } => true,
            QueriesError::Evaluation { source, .. } => source.is_adapter_fault(),
            QueriesError::InvalidConfig(_) | QueriesError::Serialization(_) => false,
        }
    }
}
