use crate::storage::KeyValueStore;
use climbate_protocol::Crag;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tokio::sync::broadcast;
use tracing::debug;
use tracing::warn;

/// Storage key holding the serialized saved set.
pub const SAVED_CRAGS_KEY: &str = "saved_crags";
const EVENT_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub enum SavedCatalogEvent {
    Added(Crag),
    Removed(Crag),
}

/// The user's saved crags: insertion-ordered, unique by id, persisted on
/// every mutation.
///
/// All mutations go through one lock that also covers the storage write, so
/// concurrent toggles can neither duplicate nor lose an entry and the stored
/// blob always matches some state the catalog actually held. Storage
/// failures never reach the caller; they are logged and counted (see
/// [`SavedCatalog::persistence_failures`]).
pub struct SavedCatalog {
    items: Mutex<Vec<Crag>>,
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<SavedCatalogEvent>,
    persistence_failures: AtomicU64,
    last_persistence_error: Mutex<Option<String>>,
}

impl SavedCatalog {
    /// Load the saved set from `store`. Missing data yields an empty catalog;
    /// unreadable data is logged and also yields an empty catalog.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let catalog = Self {
            items: Mutex::new(Vec::new()),
            store,
            events,
            persistence_failures: AtomicU64::new(0),
            last_persistence_error: Mutex::new(None),
        };
        let loaded = match catalog.store.load(SAVED_CRAGS_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<Crag>>(&bytes) {
                Ok(items) => dedupe(items),
                Err(err) => {
                    catalog.record_failure(format!("saved crags are unreadable: {err}"));
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                catalog.record_failure(format!("failed to load saved crags: {err}"));
                Vec::new()
            }
        };
        debug!("loaded {} saved crags", loaded.len());
        *catalog.lock_items() = loaded;
        catalog
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SavedCatalogEvent> {
        self.events.subscribe()
    }

    /// Snapshot in insertion order.
    pub fn items(&self) -> Vec<Crag> {
        self.lock_items().clone()
    }

    pub fn len(&self) -> usize {
        self.lock_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_items().is_empty()
    }

    pub fn contains(&self, crag: &Crag) -> bool {
        self.contains_id(&crag.id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.lock_items().iter().any(|item| item.id == id)
    }

    /// Saved crags currently reported safe; the usual known-good input to
    /// discovery.
    pub fn safe_crags(&self) -> Vec<Crag> {
        self.lock_items()
            .iter()
            .filter(|crag| crag.is_safe())
            .cloned()
            .collect()
    }

    /// Returns `true` if the crag was added, `false` if it was already saved.
    pub fn save(&self, crag: Crag) -> bool {
        let mut items = self.lock_items();
        if items.iter().any(|item| item.id == crag.id) {
            return false;
        }
        items.push(crag.clone());
        self.persist(&items);
        let _ = self.events.send(SavedCatalogEvent::Added(crag));
        true
    }

    /// Returns `true` if something was removed.
    pub fn remove(&self, crag: &Crag) -> bool {
        let mut items = self.lock_items();
        let Some(index) = items.iter().position(|item| item.id == crag.id) else {
            return false;
        };
        let removed = items.remove(index);
        self.persist(&items);
        let _ = self.events.send(SavedCatalogEvent::Removed(removed));
        true
    }

    /// Remove by position (as displayed). Out-of-range and repeated indices
    /// are ignored. Returns the removed crags in their former order.
    pub fn remove_at(&self, indices: &[usize]) -> Vec<Crag> {
        let mut items = self.lock_items();
        let targets: HashSet<usize> = indices
            .iter()
            .copied()
            .filter(|index| *index < items.len())
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }
        let mut removed = Vec::with_capacity(targets.len());
        let mut kept = Vec::with_capacity(items.len() - targets.len());
        for (index, item) in items.drain(..).enumerate() {
            if targets.contains(&index) {
                removed.push(item);
            } else {
                kept.push(item);
            }
        }
        *items = kept;
        self.persist(&items);
        for crag in &removed {
            let _ = self.events.send(SavedCatalogEvent::Removed(crag.clone()));
        }
        removed
    }

    /// Remove if saved, save if not. Returns whether the crag is saved
    /// afterwards.
    pub fn toggle(&self, crag: Crag) -> bool {
        let mut items = self.lock_items();
        if let Some(index) = items.iter().position(|item| item.id == crag.id) {
            let removed = items.remove(index);
            self.persist(&items);
            let _ = self.events.send(SavedCatalogEvent::Removed(removed));
            false
        } else {
            items.push(crag.clone());
            self.persist(&items);
            let _ = self.events.send(SavedCatalogEvent::Added(crag));
            true
        }
    }

    /// Number of load/store failures swallowed so far.
    pub fn persistence_failures(&self) -> u64 {
        self.persistence_failures.load(Ordering::Relaxed)
    }

    pub fn last_persistence_error(&self) -> Option<String> {
        match self.last_persistence_error.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn persist(&self, items: &[Crag]) {
        let bytes = match serde_json::to_vec(items) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.record_failure(format!("failed to serialize saved crags: {err}"));
                return;
            }
        };
        if let Err(err) = self.store.store(SAVED_CRAGS_KEY, &bytes) {
            self.record_failure(format!("failed to persist saved crags: {err}"));
        }
    }

    fn record_failure(&self, message: String) {
        warn!("{message}");
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
        let mut slot = match self.last_persistence_error.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(message);
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<Crag>> {
        match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn dedupe(items: Vec<Crag>) -> Vec<Crag> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|crag| seen.insert(crag.id.clone()))
        .collect()
}
