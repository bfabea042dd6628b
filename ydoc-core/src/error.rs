//! Error type shared by every document type.

use thiserror::Error;
use yrs::TransactionAcqError;

/// Errors raised by typed documents.
///
/// Failures that originate in `yrs` itself (lock acquisition, update
/// decoding, update integration) are carried through unchanged.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The stored content violates the document's encoding invariant.
    #[error("corrupted document content: {reason}")]
    CorruptedContent { reason: String },

    /// A dynamically typed value could not be turned into document content.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No document type is registered under this name.
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error(transparent)]
    Transaction(#[from] TransactionAcqError),

    /// A v1 update or state vector could not be decoded.
    #[error("failed to decode update: {0}")]
    Decode(String),

    /// A decoded update could not be integrated into the document.
    #[error("failed to apply update: {0}")]
    Update(String),
}

impl From<yrs::encoding::read::Error> for DocumentError {
    fn from(e: yrs::encoding::read::Error) -> Self {
        DocumentError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocumentError>;
