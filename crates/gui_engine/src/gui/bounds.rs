//! Draw group bounds
//!
//! A group's bounds are the smallest rectangle covering its visible members.
//! Cached groups size their off-screen texture from these bounds.

use super::draw_groups::DrawGroup;
use super::registry::ElementRegistry;
use crate::foundation::rect::Rect2I;

/// Smallest rectangle covering every visible element of the group
///
/// Empty groups, or groups whose members are all hidden, yield
/// [`Rect2I::EMPTY`].
pub fn calculate_bounds(group: &DrawGroup, elements: &ElementRegistry) -> Rect2I {
    group
        .cached_elements()
        .iter()
        .chain(group.non_cached_elements())
        .filter_map(|piece| elements.get(piece.element))
        .filter(|element| element.is_visible())
        .fold(Rect2I::EMPTY, |acc, element| acc.union(&element.bounds()))
}

/// Texture size to allocate for content of `width` x `height`
///
/// Rounds each edge up to a power of two, no smaller than `min_size`.
pub fn cache_texture_size(width: u32, height: u32, min_size: u32) -> (u32, u32) {
    let edge = |value: u32| value.max(min_size).max(1).next_power_of_two();
    (edge(width), edge(height))
}
