//! Shared plumbing for typed documents.
//!
//! A [`BaseDocument`] owns the handle to the root `yrs::Doc`, the `state`
//! map holding document metadata, the table of active subscriptions and an
//! undo manager whose scope concrete document types extend with their own
//! content nodes.

use std::collections::HashMap;

use yrs::undo::Options;
use yrs::updates::decoder::Decode;
use yrs::updates::encoder::Encode;
use yrs::{
    Any, Doc, Map, MapRef, Observable, Out, ReadTxn, StateVector, Subscription, Transact,
    UndoManager, Update,
};

use crate::config::DocumentOptions;
use crate::document::{Change, DocumentNode};
use crate::error::{DocumentError, Result};

const STATE: &str = "state";
const DIRTY_KEY: &str = "dirty";
const PATH_KEY: &str = "path";
const HASH_KEY: &str = "hash";

pub struct BaseDocument {
    doc: Doc,
    ystate: MapRef,
    subscriptions: HashMap<DocumentNode, Subscription>,
    undo_manager: UndoManager,
    // Maps added to the undo scope, kept so a reset manager tracks the same nodes
    undo_scope: Vec<MapRef>,
    options: DocumentOptions,
}

impl BaseDocument {
    /// Create a document backed by a fresh `yrs::Doc`.
    pub fn new(options: DocumentOptions) -> Self {
        Self::with_doc(Doc::new(), options)
    }

    /// Wrap an existing `yrs::Doc`. The handle is shared, not copied: edits
    /// made through this document are visible to every other holder.
    pub fn with_doc(doc: Doc, options: DocumentOptions) -> Self {
        let ystate = doc.get_or_insert_map(STATE);
        let undo_manager = new_undo_manager(&doc, &options);

        let mut base = Self {
            doc,
            ystate,
            subscriptions: HashMap::new(),
            undo_manager,
            undo_scope: Vec::new(),
            options,
        };
        if base.options.track_state_in_undo {
            let ystate = base.ystate.clone();
            base.expand_undo_scope(&ystate);
        }

        log::debug!("Created base document (client id {:?})", base.doc.client_id());
        base
    }

    /// The root document handle.
    pub fn doc(&self) -> &Doc {
        &self.doc
    }

    /// The `state` map.
    pub fn ystate(&self) -> &MapRef {
        &self.ystate
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    // --- Metadata -----------------------------------------------------

    /// Whether the document has unsaved changes, if anyone has said so.
    pub fn dirty(&self) -> Result<Option<bool>> {
        let txn = self.doc.try_transact()?;
        Ok(match self.ystate.get(&txn, DIRTY_KEY) {
            Some(Out::Any(Any::Bool(dirty))) => Some(dirty),
            _ => None,
        })
    }

    pub fn set_dirty(&self, dirty: bool) -> Result<()> {
        let mut txn = self.doc.try_transact_mut()?;
        self.ystate.insert(&mut txn, DIRTY_KEY, dirty);
        Ok(())
    }

    /// Path of the document, as recorded by whoever persists it.
    pub fn path(&self) -> Result<Option<String>> {
        self.state_string(PATH_KEY)
    }

    pub fn set_path(&self, path: &str) -> Result<()> {
        self.set_state_string(PATH_KEY, path)
    }

    /// Content hash, as recorded by whoever persists the document.
    pub fn hash(&self) -> Result<Option<String>> {
        self.state_string(HASH_KEY)
    }

    pub fn set_hash(&self, hash: &str) -> Result<()> {
        self.set_state_string(HASH_KEY, hash)
    }

    fn state_string(&self, key: &str) -> Result<Option<String>> {
        let txn = self.doc.try_transact()?;
        Ok(match self.ystate.get(&txn, key) {
            Some(Out::Any(Any::String(value))) => Some(value.to_string()),
            _ => None,
        })
    }

    fn set_state_string(&self, key: &str, value: &str) -> Result<()> {
        let mut txn = self.doc.try_transact_mut()?;
        self.ystate.insert(&mut txn, key, value.to_string());
        Ok(())
    }

    // --- Undo ---------------------------------------------------------

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo_manager
    }

    pub fn undo_manager_mut(&mut self) -> &mut UndoManager {
        &mut self.undo_manager
    }

    /// Track edits to `map` in the undo history.
    pub fn expand_undo_scope(&mut self, map: &MapRef) {
        self.undo_manager.expand_scope(map);
        self.undo_scope.push(map.clone());
        log::debug!("Undo scope expanded to {} node(s)", self.undo_scope.len());
    }

    /// Replace the undo manager with an empty one tracking the same scope.
    pub fn reset_undo_manager(&mut self) {
        let mut undo_manager = new_undo_manager(&self.doc, &self.options);
        for map in &self.undo_scope {
            undo_manager.expand_scope(map);
        }
        self.undo_manager = undo_manager;
        log::debug!("Undo manager reset");
    }

    /// Revert the last tracked change. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        Ok(self.undo_manager.try_undo()?)
    }

    /// Reapply the last undone change. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool> {
        Ok(self.undo_manager.try_redo()?)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_manager.can_redo()
    }

    // --- Subscriptions --------------------------------------------------

    /// Register `callback` for changes of `map`, reported as `node`.
    ///
    /// Replaces (and thereby releases) a subscription previously stored
    /// for the same node.
    pub fn observe_node<F>(&mut self, node: DocumentNode, map: &MapRef, callback: F)
    where
        F: Fn(DocumentNode, &Change<'_, '_>) + Send + Sync + 'static,
    {
        let subscription = map.observe(move |txn, event| {
            log::trace!("Change on {node}");
            callback(node, &Change::new(txn, event));
        });
        if self.subscriptions.insert(node, subscription).is_some() {
            log::debug!("Replaced existing subscription on {node}");
        }
    }

    /// Drop every active subscription.
    pub fn unobserve(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        log::debug!("Releasing {} subscription(s)", self.subscriptions.len());
        self.subscriptions.clear();
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_observing(&self, node: DocumentNode) -> bool {
        self.subscriptions.contains_key(&node)
    }

    // --- Replication ----------------------------------------------------

    /// Encode the document as a v1 update.
    ///
    /// With a remote v1 state vector, only what the remote is missing is
    /// encoded; without one, the full state.
    pub fn encode_state_as_update(&self, state_vector: Option<&[u8]>) -> Result<Vec<u8>> {
        let state_vector = match state_vector {
            Some(bytes) => StateVector::decode_v1(bytes)?,
            None => StateVector::default(),
        };
        let txn = self.doc.try_transact()?;
        Ok(txn.encode_state_as_update_v1(&state_vector))
    }

    /// The local v1 state vector, for a remote to compute a diff against.
    pub fn state_vector(&self) -> Result<Vec<u8>> {
        let txn = self.doc.try_transact()?;
        Ok(txn.state_vector().encode_v1())
    }

    /// Integrate a v1 update produced by another replica.
    pub fn apply_update(&self, update: &[u8]) -> Result<()> {
        let update = Update::decode_v1(update)?;
        let mut txn = self.doc.try_transact_mut()?;
        txn.apply_update(update)
            .map_err(|e| DocumentError::Update(e.to_string()))?;
        Ok(())
    }
}

fn new_undo_manager(doc: &Doc, options: &DocumentOptions) -> UndoManager {
    let mut undo_options = Options::default();
    undo_options.capture_timeout_millis = options.undo_capture_timeout_millis;
    UndoManager::with_options(doc, undo_options)
}

impl std::fmt::Debug for BaseDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseDocument")
            .field("client_id", &self.doc.client_id())
            .field("subscriptions", &self.subscriptions.len())
            .field("undo_scope", &self.undo_scope.len())
            .finish()
    }
}
