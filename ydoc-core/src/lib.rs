//! # ydoc-core — typed documents on a shared `yrs` document
//!
//! A `yrs::Doc` only stores CRDT-safe values: text, maps, arrays and
//! JSON-like scalars. This crate layers application-facing document types
//! on top of it, each with a fixed schema of named root maps, a schema
//! version, scoped undo/redo and change notification.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ BlobDocument                 │  get / set / version / observe
//! │   "source" ── { base64 }     │
//! ├──────────────────────────────┤
//! │ BaseDocument                 │  metadata / undo / subscriptions
//! │   "state"  ── { dirty, ... } │
//! └──────────────┬───────────────┘
//!                ▼
//!         yrs::Doc (shared, replicated by the caller)
//! ```
//!
//! ## Modules
//!
//! - [`base`] — root handle, `state` map, undo manager, subscription table
//! - [`blob`] — binary content stored as base64 text
//! - [`document`] — the [`YDocument`] contract and change events
//! - [`registry`] — document types by name
//!
//! ```
//! use ydoc_core::BlobDocument;
//!
//! let blob = BlobDocument::new();
//! blob.set(b"\x00\x01\xff").unwrap();
//! assert_eq!(blob.get_base64().unwrap(), "AAH/");
//! assert_eq!(blob.get().unwrap(), vec![0x00, 0x01, 0xff]);
//! ```

pub mod base;
pub mod blob;
pub mod config;
pub mod document;
pub mod error;
pub mod registry;

pub use base::BaseDocument;
pub use blob::{BlobContent, BlobDocument, BLOB_VERSION};
pub use config::DocumentOptions;
pub use document::{Change, DocumentNode, YDocument};
pub use error::{DocumentError, Result};
pub use registry::{AnyDocument, DocumentKind};
