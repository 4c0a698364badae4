//! # Draw Groups
//!
//! Partitions a widget's render elements into depth-contiguous batches.
//!
//! Each group owns a half-open depth range `[min_depth, min_depth + depth_range)`.
//! Groups are kept sorted by `min_depth` and their ranges never overlap, so
//! every element depth maps to at most one group. Pieces of cache-eligible
//! elements are baked into a per-group texture and composited as one quad;
//! the remaining pieces are drawn natively on top of it.
//!
//! ## Ordering
//!
//! Lower depth renders in front. Inside a group, pieces are sorted by depth,
//! then registration order, then render element index. Because the cache quad
//! is drawn before any native piece, every non-cached piece of a group must
//! sit in front of every cached one. Inserts that would break this split the
//! group instead.
//!
//! ## Deferred work
//!
//! Removal never merges groups eagerly. A merge pass runs on the next
//! [`DrawGroups::rebuild_dirty`], together with bounds, cache texture and
//! mesh updates for the groups that were touched. The same pass moves
//! demoted pieces back into a cache once no native piece shares their depth,
//! and degraded groups retry their texture when budget was freed.

use super::bounds::{cache_texture_size, calculate_bounds};
use super::element::GuiElement;
use super::mesh_builder::{self, GroupGeometry, SharedMeshes};
use super::registry::ElementRegistry;
use crate::config::GuiConfig;
use crate::foundation::collections::{ElementId, SecondaryMap};
use crate::foundation::rect::Rect2I;
use crate::render::{
    CachePass, CacheTexture, GuiRenderBackend, MeshBuffer, MeshSegment, RenderError, TextureAllocator,
};
use log::{debug, trace, warn};

/// Largest depth an element can occupy; one past it must still be representable
pub const MAX_ELEMENT_DEPTH: u32 = u32::MAX - 1;

/// Reference to one render element of one element inside a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupElement {
    /// Element
    pub element: ElementId,
    /// Index into the element's render elements
    pub render_element: u32,
    depth: u32,
    seq: u64,
    demoted: bool,
}

impl GroupElement {
    /// Depth captured at insertion
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Registration order captured at insertion
    pub fn registration_seq(&self) -> u64 {
        self.seq
    }

    /// Whether a cache-eligible piece was placed natively to keep the cache ordering
    pub fn is_demoted(&self) -> bool {
        self.demoted
    }

    fn sort_key(&self) -> (u32, u64, u32) {
        (self.depth, self.seq, self.render_element)
    }
}

/// Counters describing one rebuild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Groups whose geometry was regenerated
    pub groups_rebuilt: usize,
    /// Groups absorbed by the merge pass
    pub groups_merged: usize,
    /// Cache textures created
    pub textures_allocated: usize,
    /// Cache textures handed back to the allocator
    pub textures_released: usize,
    /// Groups that fell back to uncached rendering
    pub degraded_groups: usize,
    /// Demoted elements moved back into a cache
    pub elements_promoted: usize,
}

/// A depth-contiguous batch of render pieces
#[derive(Debug)]
pub struct DrawGroup {
    pub(super) id: u32,
    pub(super) min_depth: u32,
    pub(super) depth_range: u32,
    pub(super) dirty_bounds: bool,
    pub(super) needs_redraw: bool,
    pub(super) bounds: Rect2I,
    pub(super) cached_elements: Vec<GroupElement>,
    pub(super) non_cached_elements: Vec<GroupElement>,
    pub(super) geometry: GroupGeometry,
    pub(super) output_texture: Option<CacheTexture>,
    pub(super) degraded: bool,
}

impl DrawGroup {
    fn new(id: u32, min_depth: u32, depth_range: u32) -> Self {
        Self {
            id,
            min_depth,
            depth_range,
            dirty_bounds: true,
            needs_redraw: true,
            bounds: Rect2I::EMPTY,
            cached_elements: Vec::new(),
            non_cached_elements: Vec::new(),
            geometry: GroupGeometry::default(),
            output_texture: None,
            degraded: false,
        }
    }

    /// Identifier, unique within the owning widget
    pub fn id(&self) -> u32 {
        self.id
    }

    /// First depth covered
    pub fn min_depth(&self) -> u32 {
        self.min_depth
    }

    /// Number of depths covered
    pub fn depth_range(&self) -> u32 {
        self.depth_range
    }

    /// One past the last depth covered
    pub fn end_depth(&self) -> u32 {
        self.min_depth + self.depth_range
    }

    /// Whether `depth` falls inside the group's range
    pub fn contains_depth(&self, depth: u32) -> bool {
        depth >= self.min_depth && depth < self.end_depth()
    }

    /// Cached bounds of the visible members
    pub fn bounds(&self) -> Rect2I {
        self.bounds
    }

    /// Whether bounds must be recomputed
    pub fn is_bounds_dirty(&self) -> bool {
        self.dirty_bounds
    }

    /// Whether geometry must be regenerated
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Pieces rendered into the cache texture, front to back
    pub fn cached_elements(&self) -> &[GroupElement] {
        &self.cached_elements
    }

    /// Pieces rendered natively, front to back
    pub fn non_cached_elements(&self) -> &[GroupElement] {
        &self.non_cached_elements
    }

    /// Whether the group holds cached pieces
    pub fn is_cached(&self) -> bool {
        !self.cached_elements.is_empty()
    }

    /// Whether the cache texture could not be allocated
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Cache texture, when allocated
    pub fn output_texture(&self) -> Option<&CacheTexture> {
        self.output_texture.as_ref()
    }

    /// Regenerated geometry of this group
    pub fn geometry(&self) -> &GroupGeometry {
        &self.geometry
    }

    /// Whether the group holds no pieces
    pub fn is_empty(&self) -> bool {
        self.cached_elements.is_empty() && self.non_cached_elements.is_empty()
    }

    /// Whether any piece of `id` lives in this group
    pub fn contains_element(&self, id: ElementId) -> bool {
        self.cached_elements
            .iter()
            .chain(&self.non_cached_elements)
            .any(|piece| piece.element == id)
    }

    fn is_dirty(&self) -> bool {
        self.dirty_bounds || self.needs_redraw
    }

    fn mark_dirty(&mut self) {
        self.dirty_bounds = true;
        self.needs_redraw = true;
    }

    /// Whether a piece at `depth` keeps the cache ordering intact
    fn accepts(&self, depth: u32, cached: bool) -> bool {
        if cached {
            self.non_cached_elements.last().map_or(true, |piece| piece.depth < depth)
        } else {
            self.cached_elements.first().map_or(true, |piece| depth <= piece.depth)
        }
    }

    fn insert(&mut self, piece: GroupElement, cached: bool) {
        let list = if cached {
            &mut self.cached_elements
        } else {
            &mut self.non_cached_elements
        };
        let position = list.partition_point(|other| other.sort_key() <= piece.sort_key());
        list.insert(position, piece);
    }

    fn remove_element(&mut self, id: ElementId) {
        self.cached_elements.retain(|piece| piece.element != id);
        self.non_cached_elements.retain(|piece| piece.element != id);
    }
}

/// Pieces at or behind `depth`, moved out of a depth-sorted list
fn split_off_from(list: &mut Vec<GroupElement>, depth: u32) -> Vec<GroupElement> {
    let position = list.partition_point(|piece| piece.depth < depth);
    list.split_off(position)
}

/// The draw groups of one widget and the batched meshes built from them
#[derive(Debug)]
pub struct DrawGroups {
    entries: Vec<DrawGroup>,
    members: SecondaryMap<ElementId, u32>,
    meshes: SharedMeshes,
    released_textures: Vec<CacheTexture>,
    next_draw_group_id: u32,
    caching_enabled: bool,
    min_cache_texture_size: u32,
    merge_pending: bool,
    layout_changed: bool,
}

impl DrawGroups {
    /// Create an empty partition
    pub fn new(config: &GuiConfig) -> Self {
        Self {
            entries: Vec::new(),
            members: SecondaryMap::new(),
            meshes: SharedMeshes::default(),
            released_textures: Vec::new(),
            next_draw_group_id: 0,
            caching_enabled: config.enable_caching,
            min_cache_texture_size: config.min_cache_texture_size,
            merge_pending: false,
            layout_changed: false,
        }
    }

    /// Groups sorted by depth, front to back
    pub fn groups(&self) -> &[DrawGroup] {
        &self.entries
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no groups
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an element has pieces in some group
    pub fn contains(&self, id: ElementId) -> bool {
        self.members.contains_key(id)
    }

    /// Group holding the pieces of `id`
    pub fn group_of(&self, id: ElementId) -> Option<&DrawGroup> {
        let depth = *self.members.get(id)?;
        self.find_group(depth).map(|index| &self.entries[index])
    }

    /// Whether cache-eligible elements are baked into textures
    pub fn caching_enabled(&self) -> bool {
        self.caching_enabled
    }

    /// Shared triangle buffer of all groups
    pub fn triangle_mesh(&self) -> &MeshBuffer {
        &self.meshes.triangle_mesh
    }

    /// Shared line buffer of all groups
    pub fn line_mesh(&self) -> &MeshBuffer {
        &self.meshes.line_mesh
    }

    /// Draw segments of the shared buffers, back to front
    pub fn segments(&self) -> &[MeshSegment] {
        &self.meshes.segments
    }

    /// Whether any group, merge or texture release is pending
    pub fn is_dirty(&self) -> bool {
        self.merge_pending
            || self.layout_changed
            || !self.released_textures.is_empty()
            || self.entries.iter().any(DrawGroup::is_dirty)
    }

    fn find_group(&self, depth: u32) -> Option<usize> {
        let index = self.entries.partition_point(|group| group.end_depth() <= depth);
        self.entries
            .get(index)
            .filter(|group| group.min_depth <= depth)
            .map(|_| index)
    }

    fn allocate_group_id(&mut self) -> u32 {
        let id = self.next_draw_group_id;
        self.next_draw_group_id = self.next_draw_group_id.wrapping_add(1);
        id
    }

    /// Insert every render element of `element`
    ///
    /// Re-adding an element that is already present moves it.
    pub fn add(&mut self, id: ElementId, element: &GuiElement) {
        if self.members.contains_key(id) {
            self.remove(id);
        }

        let count = element.render_element_count();
        if count == 0 {
            trace!("Element {:?} has no render elements, not grouped", id);
            return;
        }

        let depth = element.depth().min(MAX_ELEMENT_DEPTH);
        let seq = element.registration_seq();
        let eligible = self.caching_enabled && element.is_cacheable();

        let index = self.group_index_for(depth, eligible);
        let group = &mut self.entries[index];

        // Mixed cached/non-cached at one depth cannot be separated further
        let cached = eligible && group.accepts(depth, true);
        let demoted = eligible && !cached;

        for render_element in 0..count {
            group.insert(
                GroupElement {
                    element: id,
                    render_element,
                    depth,
                    seq,
                    demoted,
                },
                cached,
            );
        }
        group.mark_dirty();

        trace!(
            "Added element {:?} ({} pieces, depth {}, cached {}) to group {}",
            id,
            count,
            depth,
            cached,
            group.id
        );
        self.members.insert(id, depth);
    }

    fn group_index_for(&mut self, depth: u32, cached: bool) -> usize {
        if let Some(mut index) = self.find_group(depth) {
            if self.entries[index].is_cached() && depth > self.entries[index].min_depth {
                index = self.split_before(index, depth);
            }

            if !self.entries[index].accepts(depth, cached) {
                if depth > self.entries[index].min_depth {
                    index = self.split_before(index, depth);
                }
                if let Some(upper) = self.split(index, depth + 1) {
                    self.prune_if_empty(upper);
                }
            }

            return index;
        }

        // No group covers the depth: grow a compatible neighbour or start a new group
        let behind = self.entries.partition_point(|group| group.min_depth <= depth);

        if behind > 0 && self.entries[behind - 1].accepts(depth, cached) {
            let group = &mut self.entries[behind - 1];
            group.depth_range = depth + 1 - group.min_depth;
            self.layout_changed = true;
            return behind - 1;
        }

        if let Some(group) = self.entries.get_mut(behind) {
            if group.accepts(depth, cached) {
                group.depth_range += group.min_depth - depth;
                group.min_depth = depth;
                self.layout_changed = true;
                return behind;
            }
        }

        let id = self.allocate_group_id();
        self.entries.insert(behind, DrawGroup::new(id, depth, 1));
        self.layout_changed = true;
        debug!("Created draw group {} at depth {}", id, depth);
        behind
    }

    /// Split at `depth` and return the index of the half starting there
    fn split_before(&mut self, index: usize, depth: u32) -> usize {
        match self.split(index, depth) {
            Some(upper) if self.prune_if_empty(index) => upper - 1,
            Some(upper) => upper,
            None => index,
        }
    }

    /// Drop the group at `index` if a split left it without pieces
    fn prune_if_empty(&mut self, index: usize) -> bool {
        if !self.entries.get(index).is_some_and(DrawGroup::is_empty) {
            return false;
        }

        let group = self.entries.remove(index);
        trace!("Pruned empty draw group {}", group.id);
        if let Some(texture) = group.output_texture {
            self.released_textures.push(texture);
        }
        true
    }

    /// Divide a group into `[min, at_depth)` and `[at_depth, end)`
    ///
    /// Both halves keep their pieces in order and are marked dirty. The lower
    /// half keeps the id and cache texture. Returns the index of the upper
    /// half, or `None` if the group does not exist or `at_depth` is not
    /// strictly inside its range.
    pub fn split(&mut self, group_index: usize, at_depth: u32) -> Option<usize> {
        let group = self.entries.get(group_index)?;
        if at_depth <= group.min_depth || at_depth >= group.end_depth() {
            return None;
        }

        let id = self.allocate_group_id();
        let lower = &mut self.entries[group_index];
        let end = lower.end_depth();

        let mut upper = DrawGroup::new(id, at_depth, end - at_depth);
        upper.cached_elements = split_off_from(&mut lower.cached_elements, at_depth);
        upper.non_cached_elements = split_off_from(&mut lower.non_cached_elements, at_depth);

        lower.depth_range = at_depth - lower.min_depth;
        lower.mark_dirty();

        debug!(
            "Split draw group {} at depth {} (upper half is group {})",
            lower.id, at_depth, id
        );

        self.entries.insert(group_index + 1, upper);
        self.layout_changed = true;
        Some(group_index + 1)
    }

    /// Delete every piece of `id`; returns whether the element was present
    ///
    /// Emptied groups are dropped immediately. Merging neighbours waits for
    /// the next rebuild.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let Some(depth) = self.members.remove(id) else {
            return false;
        };

        if let Some(index) = self.find_group(depth) {
            let group = &mut self.entries[index];
            group.remove_element(id);
            group.mark_dirty();

            if group.is_empty() {
                let group = self.entries.remove(index);
                debug!("Removed empty draw group {}", group.id);
                if let Some(texture) = group.output_texture {
                    self.released_textures.push(texture);
                }
                self.layout_changed = true;
            }
        }

        self.merge_pending = true;
        true
    }

    /// Flag the group of `id` for redraw; returns whether the element is present
    pub fn notify_content_dirty(&mut self, id: ElementId) -> bool {
        match self.members.get(id).and_then(|depth| self.find_group(*depth)) {
            Some(index) => {
                self.entries[index].needs_redraw = true;
                true
            }
            None => false,
        }
    }

    /// Flag the group of `id` for bounds recomputation and redraw
    pub fn notify_mesh_dirty(&mut self, id: ElementId) -> bool {
        match self.members.get(id).and_then(|depth| self.find_group(*depth)) {
            Some(index) => {
                self.entries[index].mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Switch caching on or off, re-partitioning every element
    pub fn set_caching_enabled(&mut self, enabled: bool, elements: &ElementRegistry) {
        if self.caching_enabled == enabled {
            return;
        }
        self.caching_enabled = enabled;

        let members: Vec<ElementId> = self.members.keys().collect();
        self.discard_groups();
        for id in members {
            if let Some(element) = elements.get(id) {
                self.add(id, element);
            }
        }
    }

    fn discard_groups(&mut self) {
        for group in self.entries.drain(..) {
            if let Some(texture) = group.output_texture {
                self.released_textures.push(texture);
            }
        }
        self.members.clear();
        self.merge_pending = false;
        self.layout_changed = true;
    }

    /// Drop every group and return all cache textures to the allocator
    pub fn clear(&mut self, allocator: &mut dyn TextureAllocator) {
        self.discard_groups();
        for texture in self.released_textures.drain(..) {
            allocator.release(texture);
        }
        self.meshes.clear();
        self.layout_changed = false;
    }

    /// Bring every dirty group up to date
    ///
    /// Releases queued textures, merges adjacent uncached groups, recomputes
    /// bounds, resizes cache textures and regenerates geometry. Groups that
    /// are not dirty are left untouched.
    pub fn rebuild_dirty(
        &mut self,
        elements: &ElementRegistry,
        allocator: &mut dyn TextureAllocator,
    ) -> RebuildStats {
        let mut stats = RebuildStats::default();

        if self.merge_pending {
            stats.elements_promoted = self.promote_demoted(elements);
            stats.groups_merged = self.merge_adjacent();
            self.merge_pending = false;
        }

        for texture in self.released_textures.drain(..) {
            allocator.release(texture);
            stats.textures_released += 1;
        }
        let budget_freed = stats.textures_released > 0;

        for group in &mut self.entries {
            if group.dirty_bounds {
                group.bounds = calculate_bounds(group, elements);
                group.dirty_bounds = false;
                update_cache_texture(group, allocator, self.min_cache_texture_size, &mut stats);
            } else if group.degraded && group.is_cached() && (group.needs_redraw || budget_freed) {
                update_cache_texture(group, allocator, self.min_cache_texture_size, &mut stats);
            }
        }

        stats.groups_rebuilt = mesh_builder::rebuild_groups(&mut self.entries, elements);

        if stats.groups_rebuilt > 0 || self.layout_changed {
            mesh_builder::assemble(&self.entries, &mut self.meshes);
            self.layout_changed = false;
        }

        stats
    }

    /// Re-insert demoted elements whose depth no longer holds native pieces
    ///
    /// All demoted elements at one depth move together, in registration order,
    /// so they cannot block each other.
    fn promote_demoted(&mut self, elements: &ElementRegistry) -> usize {
        let mut promotable: Vec<(u64, ElementId)> = Vec::new();

        for group in &self.entries {
            for piece in group.non_cached_elements.iter().filter(|piece| piece.demoted) {
                let blocked = group
                    .non_cached_elements
                    .iter()
                    .any(|other| !other.demoted && other.depth == piece.depth);
                if !blocked && !promotable.iter().any(|(_, id)| *id == piece.element) {
                    promotable.push((piece.seq, piece.element));
                }
            }
        }

        if promotable.is_empty() {
            return 0;
        }
        promotable.sort_unstable();

        for (_, id) in &promotable {
            self.remove(*id);
        }
        for (_, id) in &promotable {
            if let Some(element) = elements.get(*id) {
                self.add(*id, element);
            }
        }

        debug!("Promoted {} demoted elements back into caches", promotable.len());
        promotable.len()
    }

    fn merge_adjacent(&mut self) -> usize {
        let mut merged = 0;
        let mut index = 0;

        while index + 1 < self.entries.len() {
            if self.entries[index].is_cached() || self.entries[index + 1].is_cached() {
                index += 1;
                continue;
            }

            let absorbed = self.entries.remove(index + 1);
            let group = &mut self.entries[index];
            group.depth_range = absorbed.end_depth() - group.min_depth;
            group.non_cached_elements.extend(absorbed.non_cached_elements);
            group.mark_dirty();

            trace!("Merged draw group {} into {}", absorbed.id, group.id);
            if let Some(texture) = absorbed.output_texture {
                self.released_textures.push(texture);
            }

            self.layout_changed = true;
            merged += 1;
        }

        merged
    }

    /// Render every stale cache texture through `backend`
    ///
    /// A pass stays pending if the backend fails, so it is retried next frame.
    pub fn submit_cache_passes(&mut self, backend: &mut dyn GuiRenderBackend) -> Result<usize, RenderError> {
        let mut submitted = 0;

        for group in &mut self.entries {
            let Some(texture) = group.output_texture.as_ref() else {
                continue;
            };
            let Some(cache) = group.geometry.cache_pass.as_mut().filter(|cache| cache.pending) else {
                continue;
            };

            backend.render_cache_pass(&CachePass {
                group_id: group.id,
                texture: texture.handle(),
                texture_size: texture.size(),
                triangles: &cache.triangles,
                lines: &cache.lines,
                segments: &cache.segments,
            })?;

            cache.pending = false;
            submitted += 1;
        }

        Ok(submitted)
    }
}

/// Make sure a cached group has a texture large enough for its bounds
///
/// Textures only grow. Uncached groups give theirs back.
fn update_cache_texture(
    group: &mut DrawGroup,
    allocator: &mut dyn TextureAllocator,
    min_size: u32,
    stats: &mut RebuildStats,
) {
    if !group.is_cached() {
        if let Some(texture) = group.output_texture.take() {
            allocator.release(texture);
            stats.textures_released += 1;
        }
        group.degraded = false;
        return;
    }

    let (width, height) = group.bounds.size();
    if width == 0 || height == 0 {
        return;
    }
    if group.output_texture.as_ref().is_some_and(|texture| texture.fits(width, height)) {
        return;
    }

    let (mut texture_width, mut texture_height) = cache_texture_size(width, height, min_size);
    if let Some(old) = group.output_texture.take() {
        texture_width = texture_width.max(old.width());
        texture_height = texture_height.max(old.height());
        allocator.release(old);
        stats.textures_released += 1;
    }

    match allocator.allocate(texture_width, texture_height) {
        Ok(texture) => {
            debug!(
                "Draw group {} cache texture {:?} ({}x{})",
                group.id,
                texture.handle(),
                texture_width,
                texture_height
            );
            group.output_texture = Some(texture);
            group.degraded = false;
            stats.textures_allocated += 1;
        }
        Err(err) => {
            warn!("Draw group {} falls back to uncached rendering: {}", group.id, err);
            group.degraded = true;
            stats.degraded_groups += 1;
        }
    }

    group.needs_redraw = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::tests::support::{element_at, QuadContent};
    use crate::render::BudgetTextureAllocator;

    struct Fixture {
        elements: ElementRegistry,
        groups: DrawGroups,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                elements: ElementRegistry::new(),
                groups: DrawGroups::new(&GuiConfig::default()),
            }
        }

        fn add(&mut self, depth: u32, cacheable: bool) -> ElementId {
            let id = self.elements.insert(element_at(depth, cacheable));
            let element = self.elements.get(id).unwrap();
            self.groups.add(id, element);
            id
        }

        fn remove(&mut self, id: ElementId) {
            self.groups.remove(id);
            self.elements.remove(id);
        }

        fn ranges(&self) -> Vec<(u32, u32)> {
            self.groups
                .groups()
                .iter()
                .map(|g| (g.min_depth(), g.end_depth()))
                .collect()
        }

        fn depths(&self, index: usize) -> Vec<u32> {
            let group = &self.groups.groups()[index];
            let mut depths: Vec<u32> = group
                .cached_elements()
                .iter()
                .chain(group.non_cached_elements())
                .map(GroupElement::depth)
                .collect();
            depths.sort_unstable();
            depths
        }

        fn assert_partition(&self) {
            let groups = self.groups.groups();
            for pair in groups.windows(2) {
                assert!(pair[0].end_depth() <= pair[1].min_depth(), "overlapping groups");
            }
            for (id, element) in self.elements.iter() {
                let holders: Vec<_> = groups.iter().filter(|g| g.contains_element(id)).collect();
                assert_eq!(holders.len(), 1, "element must live in exactly one group");
                assert!(holders[0].contains_depth(element.depth()));
            }
            for group in groups {
                assert!(!group.is_empty());
                if let (Some(front_cached), Some(back_native)) =
                    (group.cached_elements().first(), group.non_cached_elements().last())
                {
                    assert!(back_native.depth() <= front_cached.depth());
                }
            }
        }
    }

    #[test]
    fn test_first_add_creates_unit_group() {
        let mut fx = Fixture::new();
        fx.add(5, false);
        assert_eq!(fx.ranges(), vec![(5, 6)]);
        assert!(fx.groups.is_dirty());
    }

    #[test]
    fn test_cacheable_elements_extend_group() {
        let mut fx = Fixture::new();
        fx.add(5, true);
        fx.add(5, true);
        fx.add(10, true);

        assert_eq!(fx.ranges(), vec![(5, 11)]);
        assert_eq!(fx.depths(0), vec![5, 5, 10]);
        fx.assert_partition();
    }

    #[test]
    fn test_mid_range_insert_splits_cached_group() {
        let mut fx = Fixture::new();
        fx.add(5, true);
        fx.add(5, true);
        fx.add(10, true);
        let first_id = fx.groups.groups()[0].id();

        fx.add(7, true);

        assert_eq!(fx.ranges(), vec![(5, 7), (7, 11)]);
        assert_eq!(fx.depths(0), vec![5, 5]);
        assert_eq!(fx.depths(1), vec![7, 10]);
        assert_eq!(fx.groups.groups()[0].id(), first_id);
        assert_ne!(fx.groups.groups()[1].id(), first_id);
        assert!(fx.groups.groups().iter().all(|g| g.is_bounds_dirty() && g.needs_redraw()));
        fx.assert_partition();
    }

    #[test]
    fn test_split_preserves_order() {
        let mut fx = Fixture::new();
        let a = fx.add(2, false);
        let b = fx.add(2, false);
        let c = fx.add(8, false);
        let d = fx.add(8, false);

        let upper = fx.groups.split(0, 5).unwrap();
        assert_eq!(upper, 1);

        let lower_ids: Vec<_> = fx.groups.groups()[0].non_cached_elements().iter().map(|p| p.element).collect();
        let upper_ids: Vec<_> = fx.groups.groups()[1].non_cached_elements().iter().map(|p| p.element).collect();
        assert_eq!(lower_ids, vec![a, b]);
        assert_eq!(upper_ids, vec![c, d]);
    }

    #[test]
    fn test_split_then_merge_restores_order() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        let a = fx.add(2, false);
        let b = fx.add(2, false);
        let c = fx.add(8, false);
        let d = fx.add(8, false);
        let order = |fx: &Fixture| -> Vec<ElementId> {
            fx.groups.groups()[0].non_cached_elements().iter().map(|p| p.element).collect()
        };
        assert_eq!(order(&fx), vec![a, b, c, d]);

        fx.groups.split(0, 5).unwrap();
        let spare = fx.add(3, false);
        fx.remove(spare);

        let stats = fx.groups.rebuild_dirty(&fx.elements, &mut allocator);
        assert_eq!(stats.groups_merged, 1);
        assert_eq!(fx.ranges(), vec![(2, 9)]);
        assert_eq!(order(&fx), vec![a, b, c, d]);
        fx.assert_partition();
    }

    #[test]
    fn test_split_rejects_out_of_range() {
        let mut fx = Fixture::new();
        fx.add(2, false);
        fx.add(8, false);
        assert_eq!(fx.groups.split(0, 2), None);
        assert_eq!(fx.groups.split(0, 9), None);
        assert_eq!(fx.groups.split(3, 5), None);
    }

    #[test]
    fn test_cached_behind_native_is_compatible() {
        let mut fx = Fixture::new();
        fx.add(3, false);
        fx.add(9, true);
        assert_eq!(fx.groups.len(), 1);
        fx.assert_partition();
    }

    #[test]
    fn test_native_behind_cached_gets_own_group() {
        let mut fx = Fixture::new();
        fx.add(3, true);
        fx.add(9, false);
        assert_eq!(fx.ranges(), vec![(3, 4), (9, 10)]);
        fx.assert_partition();
    }

    #[test]
    fn test_incompatible_insert_isolates_depth() {
        let mut fx = Fixture::new();
        fx.add(2, false);
        fx.add(10, false);
        assert_eq!(fx.ranges(), vec![(2, 11)]);

        // cached at 6 would sit in front of the native piece at 10
        fx.add(6, true);

        assert_eq!(fx.ranges(), vec![(2, 6), (6, 7), (7, 11)]);
        assert!(fx.groups.groups()[1].is_cached());
        fx.assert_partition();
    }

    #[test]
    fn test_equal_depth_mixed_is_demoted() {
        let mut fx = Fixture::new();
        fx.add(4, false);
        let cached = fx.add(4, true);

        let group = fx.groups.group_of(cached).unwrap();
        assert!(!group.is_cached());
        fx.assert_partition();
    }

    #[test]
    fn test_demoted_element_returns_to_cache() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        let native = fx.add(4, false);
        let cached = fx.add(4, true);
        fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        let group = fx.groups.group_of(cached).unwrap();
        let piece = group.non_cached_elements().iter().find(|p| p.element == cached).unwrap();
        assert!(piece.is_demoted());
        assert_eq!(allocator.live_count(), 0);

        fx.remove(native);
        let stats = fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        assert_eq!(stats.elements_promoted, 1);
        let group = fx.groups.group_of(cached).unwrap();
        assert!(group.is_cached());
        assert_eq!(group.cached_elements().len(), 1);
        assert!(group.non_cached_elements().is_empty());
        assert!(!group.cached_elements()[0].is_demoted());
        assert!(group.output_texture().is_some());
        assert_eq!(allocator.live_count(), 1);
        assert!(!fx.groups.is_dirty());
        fx.assert_partition();
    }

    #[test]
    fn test_demoted_element_stays_native_while_blocked() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        fx.add(4, false);
        let cached = fx.add(4, true);
        let unrelated = fx.add(1, false);
        fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        fx.remove(unrelated);
        let stats = fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        assert_eq!(stats.elements_promoted, 0);
        let group = fx.groups.group_of(cached).unwrap();
        assert!(!group.is_cached());
        assert!(group.non_cached_elements().iter().any(|p| p.element == cached && p.is_demoted()));
        fx.assert_partition();
    }

    #[test]
    fn test_demoted_elements_at_one_depth_promote_together() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        let native = fx.add(4, false);
        let first = fx.add(4, true);
        let second = fx.add(4, true);
        fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        fx.remove(native);
        let stats = fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        assert_eq!(stats.elements_promoted, 2);
        let group = fx.groups.group_of(first).unwrap();
        let cached: Vec<_> = group.cached_elements().iter().map(|p| p.element).collect();
        assert_eq!(cached, vec![first, second]);
        fx.assert_partition();
    }

    #[test]
    fn test_degraded_group_recovers_when_budget_frees() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(64 * 64);
        let front = fx.add(2, true);
        fx.add(5, false);
        let back = fx.add(9, true);

        let stats = fx.groups.rebuild_dirty(&fx.elements, &mut allocator);
        assert_eq!(stats.degraded_groups, 1);
        let degraded: Vec<bool> = fx.groups.groups().iter().map(DrawGroup::is_degraded).collect();
        assert_eq!(degraded, vec![false, true]);

        // Still no budget: the redraw retries, stays degraded and settles
        assert!(fx.groups.notify_content_dirty(back));
        let stats = fx.groups.rebuild_dirty(&fx.elements, &mut allocator);
        assert_eq!(stats.degraded_groups, 1);
        assert!(fx.groups.group_of(back).unwrap().is_degraded());
        assert!(!fx.groups.is_dirty());

        fx.remove(front);
        let stats = fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        let group = fx.groups.group_of(back).unwrap();
        assert!(!group.is_degraded());
        assert!(group.output_texture().is_some());
        assert_eq!(stats.textures_allocated, 1);
        assert_eq!(allocator.live_count(), 1);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut fx = Fixture::new();
        let id = fx.add(1, false);
        fx.remove(id);
        assert!(!fx.groups.remove(id));
        assert!(!fx.groups.notify_content_dirty(id));
        assert!(!fx.groups.notify_mesh_dirty(id));
    }

    #[test]
    fn test_remove_last_element_drops_group() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        let id = fx.add(5, true);
        fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        fx.remove(id);
        assert!(fx.groups.is_empty());

        let stats = fx.groups.rebuild_dirty(&fx.elements, &mut allocator);
        assert_eq!(stats.groups_rebuilt, 0);
        assert_eq!(stats.textures_released, 1);
        assert!(fx.groups.segments().is_empty());
        assert!(!fx.groups.is_dirty());
    }

    #[test]
    fn test_merge_is_deferred_to_rebuild() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        fx.add(1, false);
        let cached = fx.add(5, true);
        fx.add(9, false);
        assert_eq!(fx.groups.len(), 2);
        fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        // The cached piece at 5 keeps the native piece at 9 out of the front group
        fx.add(7, false);
        fx.remove(cached);
        let before = fx.groups.len();
        assert!(before >= 2);

        let stats = fx.groups.rebuild_dirty(&fx.elements, &mut allocator);
        assert_eq!(fx.groups.len(), 1);
        assert_eq!(stats.groups_merged, before - 1);
        assert_eq!(fx.depths(0), vec![1, 7, 9]);
        fx.assert_partition();
    }

    #[test]
    fn test_rebuild_when_clean_touches_nothing() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        fx.add(1, false);
        fx.add(2, true);

        assert!(fx.groups.rebuild_dirty(&fx.elements, &mut allocator).groups_rebuilt > 0);
        assert!(!fx.groups.is_dirty());
        assert_eq!(fx.groups.rebuild_dirty(&fx.elements, &mut allocator), RebuildStats::default());
    }

    #[test]
    fn test_notify_content_dirty_only_redraws() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        let id = fx.add(3, false);
        fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        assert!(fx.groups.notify_content_dirty(id));
        assert!(fx.groups.notify_content_dirty(id));
        let group = fx.groups.group_of(id).unwrap();
        assert!(group.needs_redraw());
        assert!(!group.is_bounds_dirty());
    }

    #[test]
    fn test_caching_disabled_groups_everything_natively() {
        let mut fx = Fixture::new();
        fx.groups = DrawGroups::new(&GuiConfig {
            enable_caching: false,
            ..Default::default()
        });
        fx.add(3, true);
        fx.add(8, true);

        assert_eq!(fx.groups.len(), 1);
        assert!(!fx.groups.groups()[0].is_cached());
    }

    #[test]
    fn test_toggle_caching_repartitions() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        fx.add(3, true);
        fx.add(8, false);
        fx.groups.rebuild_dirty(&fx.elements, &mut allocator);
        assert_eq!(allocator.live_count(), 1);

        fx.groups.set_caching_enabled(false, &fx.elements);
        fx.groups.rebuild_dirty(&fx.elements, &mut allocator);

        assert!(fx.groups.groups().iter().all(|g| !g.is_cached()));
        assert_eq!(allocator.live_count(), 0);
        fx.assert_partition();
    }

    #[test]
    fn test_readd_moves_element() {
        let mut fx = Fixture::new();
        let id = fx.add(3, false);
        fx.elements.get_mut(id).unwrap().set_depth(20);
        let element = fx.elements.get(id).unwrap();
        fx.groups.add(id, element);

        assert!(fx.groups.group_of(id).unwrap().contains_depth(20));
        fx.assert_partition();
    }

    #[test]
    fn test_partition_invariants_over_sequence() {
        let mut fx = Fixture::new();
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        let mut live = Vec::new();

        // Deterministic pseudo-random walk over depths and cacheability
        let mut state: u32 = 0x2545_f491;
        for step in 0..200 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;

            let remove = !live.is_empty() && state % 3 == 0;
            if remove {
                let index = (state as usize / 3) % live.len();
                let id = live.swap_remove(index);
                fx.remove(id);
            } else {
                let depth = (state >> 4) % 24;
                let cacheable = (state >> 9) & 1 == 1;
                live.push(fx.add(depth, cacheable));
            }

            fx.assert_partition();
            if step % 10 == 0 {
                fx.groups.rebuild_dirty(&fx.elements, &mut allocator);
                fx.assert_partition();
            }
        }
    }

    #[test]
    fn test_multi_piece_element_occupies_one_group() {
        let mut fx = Fixture::new();
        let id = fx.elements.insert(
            crate::gui::GuiElement::new(QuadContent::new(3)).with_depth(4),
        );
        fx.groups.add(id, fx.elements.get(id).unwrap());

        let group = fx.groups.group_of(id).unwrap();
        let pieces: Vec<_> = group.non_cached_elements().iter().map(|p| p.render_element).collect();
        assert_eq!(pieces, vec![0, 1, 2]);
    }
}
