//! Generic in-memory entity store with change notifications.
//!
//! Backs the reminder, pantry, and chore collections. Readers that need to
//! react to mutations (the scheduler, a UI) subscribe to the broadcast
//! channel rather than polling.

use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use hearth_core::types::{Chore, PantryItem, Reminder};

/// Capacity of the change broadcast channel. Slow subscribers lag rather
/// than block writers.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Store-level failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no entity with id {0}")]
    NotFound(Uuid),
}

impl From<StoreError> for hearth_core::error::HearthError {
    fn from(err: StoreError) -> Self {
        hearth_core::error::HearthError::Store(err.to_string())
    }
}

/// What happened to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A mutation notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub id: Uuid,
}

/// Anything the generic store can hold.
pub trait Entity {
    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
}

impl Entity for Reminder {
    fn id(&self) -> Uuid {
        self.id
    }
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Entity for PantryItem {
    fn id(&self) -> Uuid {
        self.id
    }
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Entity for Chore {
    fn id(&self) -> Uuid {
        self.id
    }
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

pub type ReminderStore = Store<Reminder>;
pub type PantryStore = Store<PantryItem>;
pub type ChoreStore = Store<Chore>;

/// Thread-safe in-memory collection of one entity type.
///
/// Insertion order is preserved, so listings read back in the order items
/// were created.
pub struct Store<T: Entity + Clone + Send> {
    items: Mutex<Vec<T>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl<T: Entity + Clone + Send> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity + Clone + Send> Store<T> {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            items: Mutex::new(Vec::new()),
            changes,
        }
    }

    /// Subscribe to mutation notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Insert an entity, returning a clone of the stored value.
    pub fn create(&self, item: T) -> T {
        let id = item.id();
        let stored = item.clone();
        self.items.lock().expect("store mutex poisoned").push(item);
        self.notify(ChangeKind::Created, id);
        stored
    }

    /// Fetch one entity by id.
    pub fn get(&self, id: Uuid) -> Option<T> {
        self.items
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Apply a mutation to one entity, returning the updated value.
    pub fn update(&self, id: Uuid, mutate: impl FnOnce(&mut T)) -> Result<T, StoreError> {
        let updated = {
            let mut items = self.items.lock().expect("store mutex poisoned");
            let item = items
                .iter_mut()
                .find(|item| item.id() == id)
                .ok_or(StoreError::NotFound(id))?;
            mutate(item);
            item.clone()
        };
        self.notify(ChangeKind::Updated, id);
        Ok(updated)
    }

    /// Remove one entity by id.
    pub fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        {
            let mut items = self.items.lock().expect("store mutex poisoned");
            let index = items
                .iter()
                .position(|item| item.id() == id)
                .ok_or(StoreError::NotFound(id))?;
            items.remove(index);
        }
        self.notify(ChangeKind::Deleted, id);
        Ok(())
    }

    /// All entities owned by `owner_id`, in insertion order.
    pub fn list(&self, owner_id: Uuid) -> Vec<T> {
        self.items
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .filter(|item| item.owner_id() == owner_id)
            .cloned()
            .collect()
    }

    /// A copy of the full collection, regardless of owner.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().expect("store mutex poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn notify(&self, kind: ChangeKind, id: Uuid) {
        // No subscribers is fine.
        let _ = self.changes.send(ChangeEvent { kind, id });
    }
}

// =============================================================================
// Tests
// =============================================================================
