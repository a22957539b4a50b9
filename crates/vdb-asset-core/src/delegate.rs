//! Ordered callback lists.
//!
//! A [`Multicast`] keeps boxed callbacks in registration order and hands them
//! out for synchronous fan-out. Callers decide the call signature through the
//! unsized parameter, e.g. `Multicast<dyn FnMut(u32)>`.

use std::fmt;

/// Identifies one subscription within a [`Multicast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// An ordered list of callbacks.
pub struct Multicast<F: ?Sized> {
    entries: Vec<(SubscriptionId, Box<F>)>,
    next_id: u64,
}

impl<F: ?Sized> Default for Multicast<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<F: ?Sized> Multicast<F> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback and returns its id.
    pub fn add(&mut self, callback: Box<F>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Removes a callback. Returns `false` if `id` is not subscribed.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        match self.entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns whether `id` is subscribed.
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    /// Removes every callback. Ids handed out earlier are not reused.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no callback is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates callbacks in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<F>> + '_ {
        self.entries.iter_mut().map(|(_, callback)| callback)
    }
}

impl<F: ?Sized> fmt::Debug for Multicast<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multicast")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Listeners = Multicast<dyn FnMut(u32, &mut Vec<(u32, u32)>)>;

    fn recorder(tag: u32) -> Box<dyn FnMut(u32, &mut Vec<(u32, u32)>)> {
        Box::new(move |frame: u32, log: &mut Vec<(u32, u32)>| log.push((tag, frame)))
    }

    fn fire(listeners: &mut Listeners, frame: u32) -> Vec<(u32, u32)> {
        let mut log = Vec::new();
        for callback in listeners.iter_mut() {
            callback(frame, &mut log);
        }
        log
    }

    #[test]
    fn test_fires_in_registration_order() {
        let mut listeners = Listeners::new();
        listeners.add(recorder(1));
        listeners.add(recorder(2));
        listeners.add(recorder(3));

        assert_eq!(fire(&mut listeners, 7), vec![(1, 7), (2, 7), (3, 7)]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut listeners = Listeners::new();
        listeners.add(recorder(1));
        let second = listeners.add(recorder(2));
        listeners.add(recorder(3));

        assert!(listeners.remove(second));
        assert!(!listeners.remove(second));
        assert!(!listeners.contains(second));
        assert_eq!(fire(&mut listeners, 0), vec![(1, 0), (3, 0)]);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut listeners = Listeners::new();
        let first = listeners.add(recorder(1));
        listeners.clear();
        assert!(listeners.is_empty());

        let second = listeners.add(recorder(2));
        assert_ne!(first, second);
        assert!(second.get() > first.get());
    }
}
