//! Dirty tracking
//!
//! Elements carry [`DirtyFlags`]. Content changes additionally queue the
//! element in [`DirtyContents`], a double-buffered queue drained once per
//! widget rebuild.

use crate::foundation::collections::ElementId;
use std::collections::BTreeSet;

bitflags::bitflags! {
    /// Pending work for an element
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        /// Content must regenerate its render elements
        const CONTENT = 1 << 0;
        /// Geometry or placement changed; owning group bounds are stale
        const MESH = 1 << 1;
    }
}

/// Double-buffered set of elements awaiting a content update
#[derive(Debug, Default)]
pub struct DirtyContents {
    pending: BTreeSet<ElementId>,
    draining: BTreeSet<ElementId>,
}

impl DirtyContents {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an element; returns false if it was already queued
    pub fn mark(&mut self, id: ElementId) -> bool {
        self.pending.insert(id)
    }

    /// Drop an element from the queue
    pub fn remove(&mut self, id: ElementId) -> bool {
        self.pending.remove(&id)
    }

    /// Whether an element is queued
    pub fn contains(&self, id: ElementId) -> bool {
        self.pending.contains(&id)
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of queued elements
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.pending.clear();
        self.draining.clear();
    }

    /// Drain the queue in id order
    ///
    /// The queue is swapped with a scratch set before `visit` runs, and `visit`
    /// receives the emptied queue. Ids it queues there, including the one being
    /// visited, wait for the next flush. Returns the number visited.
    pub fn flush(&mut self, mut visit: impl FnMut(ElementId, &mut BTreeSet<ElementId>)) -> usize {
        std::mem::swap(&mut self.pending, &mut self.draining);

        let count = self.draining.len();
        for &id in &self.draining {
            visit(id, &mut self.pending);
        }
        self.draining.clear();

        count
    }
}
