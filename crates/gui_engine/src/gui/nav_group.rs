//! Keyboard navigation groups
//!
//! Focusable elements are visited in tab-index order; equal tab indices keep
//! registration order. Focus wraps around at both ends.

use crate::foundation::collections::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NavEntry {
    element: ElementId,
    tab_index: i32,
    seq: u64,
}

/// Ordered set of focusable elements with a focus cursor
#[derive(Debug, Clone, Default)]
pub struct NavGroup {
    entries: Vec<NavEntry>,
    focused: Option<ElementId>,
}

impl NavGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element; re-adding updates its position
    pub fn add(&mut self, element: ElementId, tab_index: i32, seq: u64) {
        self.entries.retain(|entry| entry.element != element);

        let key = (tab_index, seq);
        let position = self
            .entries
            .partition_point(|entry| (entry.tab_index, entry.seq) <= key);
        self.entries.insert(
            position,
            NavEntry {
                element,
                tab_index,
                seq,
            },
        );
    }

    /// Remove an element, dropping focus if it had it
    pub fn remove(&mut self, element: ElementId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.element != element);
        if self.focused == Some(element) {
            self.focused = None;
        }
        before != self.entries.len()
    }

    /// Whether an element is part of the group
    pub fn contains(&self, element: ElementId) -> bool {
        self.entries.iter().any(|entry| entry.element == element)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Elements in navigation order
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.entries.iter().map(|entry| entry.element)
    }

    /// Currently focused element
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Focus a member; returns false for non-members
    pub fn set_focus(&mut self, element: ElementId) -> bool {
        if !self.contains(element) {
            return false;
        }
        self.focused = Some(element);
        true
    }

    /// Clear focus
    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    fn focused_index(&self) -> Option<usize> {
        let focused = self.focused?;
        self.entries.iter().position(|entry| entry.element == focused)
    }

    /// Move focus forward, wrapping; starts at the first element
    pub fn focus_next(&mut self) -> Option<ElementId> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.focused_index() {
            Some(index) => (index + 1) % self.entries.len(),
            None => 0,
        };
        self.focused = Some(self.entries[next].element);
        self.focused
    }

    /// Move focus backward, wrapping; starts at the last element
    pub fn focus_previous(&mut self) -> Option<ElementId> {
        if self.entries.is_empty() {
            return None;
        }
        let len = self.entries.len();
        let previous = match self.focused_index() {
            Some(index) => (index + len - 1) % len,
            None => len - 1,
        };
        self.focused = Some(self.entries[previous].element);
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::SlotMap;

    fn ids(count: usize) -> Vec<ElementId> {
        let mut map: SlotMap<ElementId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_order_by_tab_index_then_registration() {
        let ids = ids(3);
        let mut group = NavGroup::new();
        group.add(ids[0], 2, 0);
        group.add(ids[1], 1, 1);
        group.add(ids[2], 2, 2);

        let order: Vec<_> = group.elements().collect();
        assert_eq!(order, vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_focus_cycles_both_ways() {
        let ids = ids(3);
        let mut group = NavGroup::new();
        for (seq, id) in ids.iter().enumerate() {
            group.add(*id, 0, seq as u64);
        }

        assert_eq!(group.focus_next(), Some(ids[0]));
        assert_eq!(group.focus_next(), Some(ids[1]));
        assert_eq!(group.focus_next(), Some(ids[2]));
        assert_eq!(group.focus_next(), Some(ids[0]));
        assert_eq!(group.focus_previous(), Some(ids[2]));
    }

    #[test]
    fn test_remove_focused_clears_focus() {
        let ids = ids(2);
        let mut group = NavGroup::new();
        group.add(ids[0], 0, 0);
        group.add(ids[1], 0, 1);

        assert!(group.set_focus(ids[1]));
        assert!(group.remove(ids[1]));
        assert_eq!(group.focused(), None);
        assert!(!group.set_focus(ids[1]));
    }

    #[test]
    fn test_empty_group_has_no_focus() {
        let mut group = NavGroup::new();
        assert_eq!(group.focus_next(), None);
        assert_eq!(group.focus_previous(), None);
    }
}
