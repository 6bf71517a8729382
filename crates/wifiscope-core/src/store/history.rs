// ── Bounded FIFO history ──

use std::collections::VecDeque;
use std::sync::Arc;

use crate::model::History;

/// Fixed-capacity ring buffer; the oldest entry is evicted first.
///
/// Contents live behind an `Arc` so [`shared`](Self::shared) is a
/// pointer copy. Appending while a shared view is alive clones the
/// buffer once (copy-on-write), leaving the view untouched.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T: Clone> {
    items: History<T>,
    capacity: usize,
}

impl<T: Clone> HistoryBuffer<T> {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Arc::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Append an entry, evicting from the front once full. Returns the
    /// evicted entry, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        let items = Arc::make_mut(&mut self.items);
        let evicted = if items.len() >= self.capacity {
            items.pop_front()
        } else {
            None
        };
        items.push_back(item);
        evicted
    }

    /// Read-only view suitable for embedding in a snapshot.
    pub fn shared(&self) -> History<T> {
        Arc::clone(&self.items)
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
