use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::activity::provisioning_activity::ProvisioningActivity;
use crate::domain::utils::id::ProvisioningActivityId;

new_key_type! {
    pub struct ActivityKey;
}

pub type ActivityHandle = Arc<RwLock<ProvisioningActivity>>;

/// Host-wide provisioning history.
pub trait ActivityHistoryStore: std::fmt::Debug + Send + Sync {
    /// Activity of a node that is still around. Completed activities are not returned.
    fn activity_for(&self, id: &ProvisioningActivityId) -> Option<ActivityHandle>;

    /// Like [`activity_for`](Self::activity_for) but also finds completed activities.
    fn activity_including_completed(&self, id: &ProvisioningActivityId) -> Option<ActivityHandle>;
}

#[derive(Debug, Default)]
struct StoreInner {
    slots: SlotMap<ActivityKey, ActivityHandle>,
    id_index: HashMap<ProvisioningActivityId, ActivityKey>,
}

/// Activity history kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityStore {
    /// Both maps are protected with a single lock.
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `activity`. An activity with the same id is replaced.
    pub fn register(&self, activity: ProvisioningActivity) -> ActivityHandle {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = activity.id.clone();
        let handle = Arc::new(RwLock::new(activity));

        if let Some(previous) = guard.id_index.remove(&id) {
            guard.slots.remove(previous);
        }
        let key = guard.slots.insert(handle.clone());
        guard.id_index.insert(id, key);

        handle
    }

    /// Forgets completed activities; returns how many were dropped.
    pub fn prune_completed(&self) -> usize {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let completed: Vec<ActivityKey> = guard
            .slots
            .iter()
            .filter(|(_, handle)| handle.read().unwrap_or_else(PoisonError::into_inner).is_completed())
            .map(|(key, _)| key)
            .collect();

        for key in &completed {
            if let Some(handle) = guard.slots.remove(*key) {
                let id = handle.read().unwrap_or_else(PoisonError::into_inner).id.clone();
                guard.id_index.remove(&id);
            }
        }

        completed.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, id: &ProvisioningActivityId) -> Option<ActivityHandle> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let key = guard.id_index.get(id)?;
        guard.slots.get(*key).cloned()
    }
}

impl ActivityHistoryStore for InMemoryActivityStore {
    fn activity_for(&self, id: &ProvisioningActivityId) -> Option<ActivityHandle> {
        self.lookup(id).filter(|handle| !handle.read().unwrap_or_else(PoisonError::into_inner).is_completed())
    }

    fn activity_including_completed(&self, id: &ProvisioningActivityId) -> Option<ActivityHandle> {
        self.lookup(id)
    }
}
