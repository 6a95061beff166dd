use std::collections::HashMap;

/// Listener handles owned by the loader, one per `(selector, event)` key.
///
/// Rebinding a key drops the previous handle before the new one is
/// attached, so loading the same component twice never stacks handlers.
pub struct ListenerSlots<L> {
    slots: HashMap<String, L>,
}

impl<L> Default for ListenerSlots<L> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<L> ListenerSlots<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(selector: &str, event: &str) -> String {
        format!("{}::{}", selector, event)
    }

    /// Detach the handle stored under `key` (if any), then attach and store a new one.
    pub fn rebind(&mut self, key: String, attach: impl FnOnce() -> L) {
        drop(self.slots.remove(&key));
        let handle = attach();
        self.slots.insert(key, handle);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
