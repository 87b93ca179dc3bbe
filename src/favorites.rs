//! Bookmarked hymns. The store keeps the set of favorite song numbers in
//! memory and writes the whole set back to the key-value store after every
//! change, so a toggle is never held back waiting for a batch.
//!
//! The in-memory set is the source of truth for the session: it is updated
//! before the write is issued, and a failed write is logged and dropped
//! rather than rolled back. Mutations go through `&mut self`, which keeps two
//! toggles from interleaving and losing one of them.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::db::KeyValueStore;

/// Key under which the serialized favorites live.
pub const FAVORITES_KEY: &str = "favorites";

pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
    /// Numbers present in the catalog; only these may be added.
    known: HashSet<u32>,
    /// Loaded on first access.
    entries: Option<HashSet<u32>>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(storage: S, catalog: &Catalog) -> Self {
        Self {
            storage,
            known: catalog.numbers().collect(),
            entries: None,
        }
    }

    /// Read the persisted set into memory, replacing whatever was loaded.
    /// A missing or undecodable value leaves the set empty.
    pub fn load(&mut self) {
        self.entries = Some(read_persisted(&self.storage));
    }

    pub fn is_favorite(&mut self, number: u32) -> bool {
        self.entries_mut().contains(&number)
    }

    /// Flip the membership of `number` and persist. Returns the new state.
    /// Numbers the catalog does not know can be removed but never added.
    pub fn toggle(&mut self, number: u32) -> bool {
        let known = self.known.contains(&number);
        let entries = self.entries_mut();

        let favorited = if entries.remove(&number) {
            false
        } else if known {
            entries.insert(number);
            true
        } else {
            warn!(number, "ignoring favorite for a song missing from the catalog");
            return false;
        };

        debug!(number, favorited, "favorite toggled");
        self.persist();
        favorited
    }

    /// Drop `number` from the set. Returns whether it was a favorite; the set
    /// is only persisted when something changed.
    pub fn remove(&mut self, number: u32) -> bool {
        let removed = self.entries_mut().remove(&number);
        if removed {
            debug!(number, "favorite removed");
            self.persist();
        }
        removed
    }

    /// Favorite numbers in ascending order.
    pub fn numbers(&mut self) -> Vec<u32> {
        sorted(self.entries_mut())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn entries_mut(&mut self) -> &mut HashSet<u32> {
        let storage = &self.storage;
        self.entries.get_or_insert_with(|| read_persisted(storage))
    }

    fn persist(&mut self) {
        let Some(entries) = &self.entries else {
            return;
        };
        let value = match encode(entries) {
            Ok(value) => value,
            Err(err) => {
                warn!("failed to encode favorites, keeping the stored value: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.set(FAVORITES_KEY, &value) {
            warn!("failed to persist favorites: {err:#}");
        }
    }
}

fn read_persisted<S: KeyValueStore>(storage: &S) -> HashSet<u32> {
    let raw = match storage.get(FAVORITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return HashSet::new(),
        Err(err) => {
            warn!("failed to read favorites: {err:#}");
            return HashSet::new();
        }
    };

    match serde_json::from_str::<Vec<u32>>(&raw) {
        Ok(numbers) => {
            info!(count = numbers.len(), "favorites loaded");
            numbers.into_iter().collect()
        }
        Err(err) => {
            warn!("discarding undecodable favorites {raw:?}: {err}");
            HashSet::new()
        }
    }
}

/// JSON array in ascending order so the stored text is stable.
fn encode(entries: &HashSet<u32>) -> serde_json::Result<String> {
    serde_json::to_string(&sorted(entries))
}

fn sorted(entries: &HashSet<u32>) -> Vec<u32> {
    let mut numbers: Vec<u32> = entries.iter().copied().collect();
    numbers.sort_unstable();
    numbers
}
