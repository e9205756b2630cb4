//! In-memory collection of confirmed cards.
//!
//! Append-only and ordered oldest-first. Duplicates are allowed: scanning
//! the same card twice and confirming both gives two entries. Nothing is
//! persisted; the collection lives as long as the process.
//!
//! [`CollectionStore`] is a cheap handle (`Clone` shares the same storage),
//! so the scan driver and the presentation layer each hold one. Writes are
//! serialized by an `RwLock`; reads return owned snapshots, so a caller
//! iterating [`all`](CollectionStore::all) never observes a concurrent append
//! and cannot modify the store through the returned `Vec`.

use crate::types::CardRecord;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    cards: Arc<RwLock<Vec<CardRecord>>>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card at the end of the collection.
    pub fn append(&self, record: CardRecord) {
        let mut cards = self.cards.write().unwrap_or_else(PoisonError::into_inner);
        cards.push(record);
        tracing::debug!(count = cards.len(), "card added to collection");
    }

    /// Snapshot of every card in insertion order.
    pub fn all(&self) -> Vec<CardRecord> {
        self.cards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.cards.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Card at `index` (0-based, insertion order).
    pub fn get(&self, index: usize) -> Option<CardRecord> {
        self.cards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }
}
