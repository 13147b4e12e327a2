//! Error types for normalization.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// A single raw record cannot be normalized. Scoped to that record.
    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },
}

impl NormalizeError {
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        NormalizeError::MalformedRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
