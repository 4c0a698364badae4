//! Element registry
//!
//! Owns the elements of one widget and remembers the order they were
//! registered in. That order breaks ties between elements at equal depth.

use super::element::GuiElement;
use crate::foundation::collections::{ElementId, SlotMap};

/// Element table of a widget
#[derive(Debug, Default)]
pub struct ElementRegistry {
    elements: SlotMap<ElementId, GuiElement>,
    order: Vec<ElementId>,
    next_seq: u64,
}

impl ElementRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an element and stamp its registration order
    pub fn insert(&mut self, mut element: GuiElement) -> ElementId {
        element.set_registration_seq(self.next_seq);
        self.next_seq += 1;

        let id = self.elements.insert(element);
        self.order.push(id);
        id
    }

    /// Remove an element and hand it back
    pub fn remove(&mut self, id: ElementId) -> Option<GuiElement> {
        let element = self.elements.remove(id)?;
        self.order.retain(|other| *other != id);
        Some(element)
    }

    /// Whether an element is registered
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Get an element
    pub fn get(&self, id: ElementId) -> Option<&GuiElement> {
        self.elements.get(id)
    }

    /// Get an element mutably
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut GuiElement> {
        self.elements.get_mut(id)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element ids in registration order
    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    /// Elements in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &GuiElement)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.elements.get(*id).map(|element| (*id, element)))
    }

    /// All elements, in arbitrary order
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut GuiElement> + '_ {
        self.elements.values_mut()
    }
}
