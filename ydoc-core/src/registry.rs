//! Lookup of document types by name.

use std::fmt;
use std::str::FromStr;

use yrs::Doc;

use crate::base::BaseDocument;
use crate::blob::{BlobDocument, BLOB_VERSION};
use crate::config::DocumentOptions;
use crate::error::DocumentError;

/// Registered document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Blob,
}

impl DocumentKind {
    pub const ALL: &'static [DocumentKind] = &[DocumentKind::Blob];

    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Blob => "blob",
        }
    }

    /// Schema version written by this document type.
    pub fn version(&self) -> &'static str {
        match self {
            DocumentKind::Blob => BLOB_VERSION,
        }
    }

    /// Build a document of this kind, over `doc` if given.
    pub fn create(&self, doc: Option<Doc>, options: DocumentOptions) -> AnyDocument {
        let doc = doc.unwrap_or_else(Doc::new);
        match self {
            DocumentKind::Blob => AnyDocument::Blob(BlobDocument::with_doc(doc, options)),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = DocumentError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        DocumentKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| DocumentError::UnknownDocumentType(name.to_string()))
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A document of any registered kind.
#[derive(Debug)]
pub enum AnyDocument {
    Blob(BlobDocument),
}

impl AnyDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            AnyDocument::Blob(_) => DocumentKind::Blob,
        }
    }

    pub fn version(&self) -> &'static str {
        self.kind().version()
    }

    pub fn base(&self) -> &BaseDocument {
        match self {
            AnyDocument::Blob(blob) => blob.base(),
        }
    }

    pub fn unobserve(&mut self) {
        match self {
            AnyDocument::Blob(blob) => blob.unobserve(),
        }
    }

    pub fn as_blob(&self) -> Option<&BlobDocument> {
        match self {
            AnyDocument::Blob(blob) => Some(blob),
        }
    }

    pub fn into_blob(self) -> Option<BlobDocument> {
        match self {
            AnyDocument::Blob(blob) => Some(blob),
        }
    }
}
