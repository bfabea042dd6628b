//! The binary blob document.
//!
//! Schema:
//!
//! ```text
//! {
//!     "state":  map,   // document metadata
//!     "source": map,   // { "base64": <payload as base64 text> }
//! }
//! ```
//!
//! The payload is stored as base64 text rather than a raw `yrs` buffer so
//! that Yjs peers sharing this schema read and write the same field.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;
use yrs::{Any, Doc, Map, MapRef, Out, Transact};

use crate::base::BaseDocument;
use crate::config::DocumentOptions;
use crate::document::{Change, DocumentNode, YDocument};
use crate::error::{DocumentError, Result};

pub const BLOB_VERSION: &str = "1.0.0";

const SOURCE: &str = "source";
const BASE64_KEY: &str = "base64";

/// Content accepted by [`BlobDocument::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobContent {
    /// Raw bytes, encoded before storage
    Bytes(Vec<u8>),
    /// Text already in base64, stored as-is
    Base64(String),
}

impl BlobContent {
    /// The base64 text to store for this content.
    pub fn into_base64(self) -> String {
        match self {
            BlobContent::Bytes(bytes) => STANDARD.encode(bytes),
            BlobContent::Base64(text) => text,
        }
    }
}

impl From<Vec<u8>> for BlobContent {
    fn from(bytes: Vec<u8>) -> Self {
        BlobContent::Bytes(bytes)
    }
}

impl From<&[u8]> for BlobContent {
    fn from(bytes: &[u8]) -> Self {
        BlobContent::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for BlobContent {
    fn from(bytes: &[u8; N]) -> Self {
        BlobContent::Bytes(bytes.to_vec())
    }
}

impl From<String> for BlobContent {
    fn from(text: String) -> Self {
        BlobContent::Base64(text)
    }
}

impl From<&str> for BlobContent {
    fn from(text: &str) -> Self {
        BlobContent::Base64(text.to_string())
    }
}

/// Conversion from a JSON model: a string is base64 text, an array of
/// integers in `0..=255` is raw bytes.
impl TryFrom<Value> for BlobContent {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(BlobContent::Base64(text)),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| {
                            DocumentError::InvalidArgument(format!("not a byte value: {item}"))
                        })
                })
                .collect::<Result<Vec<u8>>>()
                .map(BlobContent::Bytes),
            other => Err(DocumentError::InvalidArgument(format!(
                "expected bytes or base64 text, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A document whose content is an arbitrary byte sequence.
pub struct BlobDocument {
    base: BaseDocument,
    ysource: MapRef,
}

impl BlobDocument {
    /// Create a blob document over a fresh `yrs::Doc`.
    pub fn new() -> Self {
        Self::with_doc(Doc::new(), DocumentOptions::default())
    }

    /// Create a blob document over a shared `yrs::Doc`.
    pub fn with_doc(doc: Doc, options: DocumentOptions) -> Self {
        Self::from_base(BaseDocument::with_doc(doc, options))
    }

    pub fn from_base(mut base: BaseDocument) -> Self {
        let ysource = base.doc().get_or_insert_map(SOURCE);
        base.expand_undo_scope(&ysource);
        Self { base, ysource }
    }

    pub fn version(&self) -> &'static str {
        BLOB_VERSION
    }

    /// The `source` map.
    pub fn ysource(&self) -> &MapRef {
        &self.ysource
    }

    pub fn base(&self) -> &BaseDocument {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BaseDocument {
        &mut self.base
    }

    /// Decode and return the document content.
    pub fn get(&self) -> Result<Vec<u8>> {
        let txn = self.base.doc().try_transact()?;
        match self.ysource.get(&txn, BASE64_KEY) {
            None => Ok(Vec::new()),
            Some(Out::Any(Any::String(text))) => {
                log::trace!("Decoding {} bytes of base64", text.len());
                STANDARD.decode(text.as_bytes()).map_err(|e| {
                    log::warn!("Stored blob is not valid base64: {e}");
                    DocumentError::CorruptedContent {
                        reason: format!("invalid base64: {e}"),
                    }
                })
            }
            // Written by a peer storing raw binary instead of text
            Some(Out::Any(Any::Buffer(bytes))) => Ok(bytes.to_vec()),
            Some(other) => {
                log::warn!("Stored blob has unexpected type: {other:?}");
                Err(DocumentError::CorruptedContent {
                    reason: format!("expected base64 text, found {other:?}"),
                })
            }
        }
    }

    /// The stored base64 text, empty if nothing was ever set.
    pub fn get_base64(&self) -> Result<String> {
        let txn = self.base.doc().try_transact()?;
        Ok(match self.ysource.get(&txn, BASE64_KEY) {
            Some(Out::Any(Any::String(text))) => text.to_string(),
            _ => String::new(),
        })
    }

    /// Replace the document content.
    ///
    /// Bytes are base64-encoded first; text is assumed to already be base64
    /// and is stored unchanged.
    pub fn set(&self, value: impl Into<BlobContent>) -> Result<()> {
        let encoded = value.into().into_base64();
        let mut txn = self.base.doc().try_transact_mut()?;
        log::trace!("Storing {} bytes of base64", encoded.len());
        self.ysource.insert(&mut txn, BASE64_KEY, encoded);
        Ok(())
    }

    /// Call `callback` on every change to `state` or `source`.
    ///
    /// Any previous subscription of this document is released first, so
    /// repeated calls never stack handlers.
    pub fn observe<F>(&mut self, callback: F)
    where
        F: Fn(DocumentNode, &Change<'_, '_>) + Send + Sync + 'static,
    {
        self.base.unobserve();

        let callback = Arc::new(callback);
        let ystate = self.base.ystate().clone();
        let on_state = Arc::clone(&callback);
        self.base
            .observe_node(DocumentNode::State, &ystate, move |node, change| {
                on_state(node, change)
            });
        let on_source = callback;
        self.base
            .observe_node(DocumentNode::Source, &self.ysource, move |node, change| {
                on_source(node, change)
            });
    }

    /// Release all subscriptions made by [`BlobDocument::observe`].
    pub fn unobserve(&mut self) {
        self.base.unobserve();
    }
}

impl Default for BlobDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlobDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobDocument")
            .field("version", &BLOB_VERSION)
            .field("base", &self.base)
            .finish()
    }
}

impl YDocument for BlobDocument {
    type Content = Vec<u8>;
    type Input = BlobContent;

    fn version(&self) -> &'static str {
        BLOB_VERSION
    }

    fn base(&self) -> &BaseDocument {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseDocument {
        &mut self.base
    }

    fn get(&self) -> Result<Vec<u8>> {
        BlobDocument::get(self)
    }

    fn set(&self, value: BlobContent) -> Result<()> {
        BlobDocument::set(self, value)
    }

    fn observe<F>(&mut self, callback: F)
    where
        F: Fn(DocumentNode, &Change<'_, '_>) + Send + Sync + 'static,
    {
        BlobDocument::observe(self, callback)
    }
}
