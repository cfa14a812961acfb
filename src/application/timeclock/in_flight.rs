//! Per-user duplicate submission guard

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Users with a clock action currently running
#[derive(Clone, Default)]
pub struct InFlightActions {
    active: Arc<DashMap<String, ()>>,
}

impl InFlightActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `user_id`. None if an action is already running.
    pub fn try_begin(&self, user_id: &str) -> Option<InFlightGuard> {
        match self.active.entry(user_id.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(InFlightGuard {
                    active: Arc::clone(&self.active),
                    user_id: user_id.to_string(),
                })
            }
        }
    }

    pub fn is_active(&self, user_id: &str) -> bool {
        self.active.contains_key(user_id)
    }
}

/// Releases the slot on drop
pub struct InFlightGuard {
    active: Arc<DashMap<String, ()>>,
    user_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.remove(&self.user_id);
    }
}
