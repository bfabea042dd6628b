//! The contract every typed document implements, plus the pieces of the
//! change-notification protocol shared between document types.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use yrs::types::map::MapEvent;
use yrs::types::EntryChange;
use yrs::TransactionMut;

use crate::base::BaseDocument;
use crate::error::Result;

/// Root-level nodes a document reports changes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentNode {
    /// Document metadata (dirty flag, path, hash)
    State,
    /// Document content
    Source,
}

impl DocumentNode {
    /// Name of the root map backing this node.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentNode::State => "state",
            DocumentNode::Source => "source",
        }
    }
}

impl fmt::Display for DocumentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change notification as delivered by `yrs` for one observed map.
///
/// Only valid for the duration of the callback: it borrows the
/// transaction that produced it. Read the document through
/// [`Change::transaction`] rather than opening a new transaction, which
/// would fail while this one is still being committed.
pub struct Change<'a, 'doc> {
    txn: &'a TransactionMut<'doc>,
    event: &'a MapEvent,
}

impl<'a, 'doc> Change<'a, 'doc> {
    pub(crate) fn new(txn: &'a TransactionMut<'doc>, event: &'a MapEvent) -> Self {
        Self { txn, event }
    }

    /// The committing transaction.
    pub fn transaction(&self) -> &'a TransactionMut<'doc> {
        self.txn
    }

    /// The raw `yrs` map event.
    pub fn event(&self) -> &'a MapEvent {
        self.event
    }

    /// Per-key changes carried by this event.
    pub fn keys(&self) -> &'a HashMap<Arc<str>, EntryChange> {
        self.event.keys(self.txn)
    }

    /// Sorted names of the keys touched by this event.
    pub fn changed_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys().keys().map(|k| k.to_string()).collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for Change<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Change")
            .field("keys", &self.changed_keys())
            .finish()
    }
}

/// A strongly typed document living inside a shared `yrs::Doc`.
pub trait YDocument {
    /// What `get` returns.
    type Content;
    /// What `set` accepts.
    type Input;

    /// Schema version, independent of content.
    fn version(&self) -> &'static str;

    fn base(&self) -> &BaseDocument;

    fn base_mut(&mut self) -> &mut BaseDocument;

    /// Read the document content.
    fn get(&self) -> Result<Self::Content>;

    /// Replace the document content.
    fn set(&self, value: Self::Input) -> Result<()>;

    /// Subscribe to changes of every node of this document, replacing any
    /// previous subscription.
    fn observe<F>(&mut self, callback: F)
    where
        F: Fn(DocumentNode, &Change<'_, '_>) + Send + Sync + 'static;

    /// Drop all subscriptions. A no-op when there are none.
    fn unobserve(&mut self) {
        self.base_mut().unobserve();
    }

    fn source(&self) -> Result<Self::Content> {
        self.get()
    }

    fn set_source(&self, value: Self::Input) -> Result<()> {
        self.set(value)
    }
}
