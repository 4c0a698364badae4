//! Mesh rebuilding
//!
//! Turns draw groups into draw-ready geometry. Each group keeps its own
//! triangle and line buffers so that only groups needing a redraw are
//! regenerated. The widget-wide buffers are then reassembled by concatenating
//! group geometry back to front.

use super::draw_groups::{DrawGroup, GroupElement};
use super::registry::ElementRegistry;
use crate::foundation::math::{Vec2, Vec2I, Vec4};
use crate::render::{MaterialId, MeshBuffer, MeshSegment, PrimitiveKind, SpriteMaterialInfo};

/// Geometry to be rendered into a group's cache texture
#[derive(Debug, Clone, Default)]
pub struct CacheGeometry {
    /// Triangle geometry in texture space
    pub triangles: MeshBuffer,
    /// Line geometry in texture space
    pub lines: MeshBuffer,
    /// Draw segments, back to front
    pub segments: Vec<MeshSegment>,
    /// Whether the texture content is stale
    pub pending: bool,
}

/// Geometry of one draw group
#[derive(Debug, Clone, Default)]
pub struct GroupGeometry {
    /// Triangle geometry in widget space
    pub triangles: MeshBuffer,
    /// Line geometry in widget space
    pub lines: MeshBuffer,
    /// Draw segments, back to front
    pub segments: Vec<MeshSegment>,
    /// Cache texture content, for groups composited from a texture
    pub cache_pass: Option<CacheGeometry>,
}

impl GroupGeometry {
    fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
        self.segments.clear();
    }
}

/// Widget-wide batched geometry
#[derive(Debug, Clone, Default)]
pub struct SharedMeshes {
    /// All triangle geometry
    pub triangle_mesh: MeshBuffer,
    /// All line geometry
    pub line_mesh: MeshBuffer,
    /// Draw segments into both buffers, back to front
    pub segments: Vec<MeshSegment>,
}

impl SharedMeshes {
    /// Remove all geometry
    pub fn clear(&mut self) {
        self.triangle_mesh.clear();
        self.line_mesh.clear();
        self.segments.clear();
    }
}

/// Appends geometry and folds it into the previous segment when possible
struct SegmentWriter<'a> {
    triangles: &'a mut MeshBuffer,
    lines: &'a mut MeshBuffer,
    segments: &'a mut Vec<MeshSegment>,
}

impl<'a> SegmentWriter<'a> {
    fn new(triangles: &'a mut MeshBuffer, lines: &'a mut MeshBuffer, segments: &'a mut Vec<MeshSegment>) -> Self {
        Self {
            triangles,
            lines,
            segments,
        }
    }

    fn push(
        &mut self,
        mesh: &MeshBuffer,
        offset: Vec2,
        material: MaterialId,
        info: SpriteMaterialInfo,
        primitive: PrimitiveKind,
    ) {
        if mesh.is_empty() {
            return;
        }

        let buffer = match primitive {
            PrimitiveKind::Triangles => &mut *self.triangles,
            PrimitiveKind::Lines => &mut *self.lines,
        };
        let index_offset = buffer.append(mesh, offset);
        push_segment(
            self.segments,
            MeshSegment {
                index_offset,
                index_count: mesh.index_count(),
                material,
                info,
                primitive,
            },
        );
    }

    /// Append one render element, placed relative to `origin`
    fn push_piece(&mut self, piece: &GroupElement, elements: &ElementRegistry, origin: Vec2I) {
        let Some(element) = elements.get(piece.element) else {
            return;
        };
        if !element.is_visible() {
            return;
        }
        let Some(render_element) = element.render_elements().get(piece.render_element as usize) else {
            return;
        };

        let bounds = element.bounds();
        let offset = Vec2::new((bounds.x - origin.x) as f32, (bounds.y - origin.y) as f32);
        self.push(
            &render_element.mesh,
            offset,
            render_element.material,
            render_element.info,
            render_element.primitive,
        );
    }
}

/// Add a segment, extending the last one if it is a contiguous continuation
fn push_segment(segments: &mut Vec<MeshSegment>, segment: MeshSegment) {
    if let Some(last) = segments.last_mut() {
        if last.can_extend(segment.material, &segment.info, segment.primitive, segment.index_offset) {
            last.index_count += segment.index_count;
            return;
        }
    }
    segments.push(segment);
}

/// Pieces ordered back to front, equal depth in registration order
fn back_to_front(pieces: &[GroupElement]) -> impl Iterator<Item = &GroupElement> {
    pieces
        .chunk_by(|a, b| a.depth() == b.depth())
        .rev()
        .flatten()
}

/// Regenerate the geometry of one group
pub fn rebuild_group(group: &mut DrawGroup, elements: &ElementRegistry) {
    let DrawGroup {
        cached_elements,
        non_cached_elements,
        geometry,
        output_texture,
        degraded,
        bounds,
        ..
    } = group;

    geometry.clear();
    let widget_origin = Vec2I::zeros();

    let cache_target = output_texture
        .as_ref()
        .filter(|_| !*degraded && !cached_elements.is_empty() && !bounds.is_empty());

    match cache_target {
        Some(texture) => {
            let mut cache = geometry.cache_pass.take().unwrap_or_default();
            cache.triangles.clear();
            cache.lines.clear();
            cache.segments.clear();

            let mut writer = SegmentWriter::new(&mut cache.triangles, &mut cache.lines, &mut cache.segments);
            for piece in back_to_front(cached_elements) {
                writer.push_piece(piece, elements, bounds.origin());
            }
            cache.pending = true;

            let min = Vec2::new(bounds.x as f32, bounds.y as f32);
            let max = Vec2::new(bounds.right() as f32, bounds.bottom() as f32);
            let uv_max = [
                bounds.width as f32 / texture.width() as f32,
                bounds.height as f32 / texture.height() as f32,
            ];
            let mut quad = MeshBuffer::new();
            quad.push_quad(min, max, [0.0, 0.0], uv_max);

            let mut writer = SegmentWriter::new(&mut geometry.triangles, &mut geometry.lines, &mut geometry.segments);
            writer.push(
                &quad,
                Vec2::zeros(),
                MaterialId::CACHED_GROUP,
                SpriteMaterialInfo::textured(texture.handle(), Vec4::new(1.0, 1.0, 1.0, 1.0)),
                PrimitiveKind::Triangles,
            );
            geometry.cache_pass = Some(cache);
        }
        None => {
            geometry.cache_pass = None;
            let mut writer = SegmentWriter::new(&mut geometry.triangles, &mut geometry.lines, &mut geometry.segments);
            for piece in back_to_front(cached_elements) {
                writer.push_piece(piece, elements, widget_origin);
            }
        }
    }

    let mut writer = SegmentWriter::new(&mut geometry.triangles, &mut geometry.lines, &mut geometry.segments);
    for piece in back_to_front(non_cached_elements) {
        writer.push_piece(piece, elements, widget_origin);
    }
}

/// Rebuild every group that needs a redraw; returns how many were rebuilt
pub fn rebuild_groups(groups: &mut [DrawGroup], elements: &ElementRegistry) -> usize {
    let mut rebuilt = 0;
    for group in groups.iter_mut().filter(|group| group.needs_redraw) {
        rebuild_group(group, elements);
        group.needs_redraw = false;
        rebuilt += 1;
    }

    if rebuilt > 0 {
        log::trace!("Rebuilt geometry of {} draw groups", rebuilt);
    }
    rebuilt
}

/// Concatenate group geometry into the shared buffers, back to front
pub fn assemble(groups: &[DrawGroup], out: &mut SharedMeshes) {
    out.clear();

    for group in groups.iter().rev() {
        let geometry = &group.geometry;
        let triangle_base = out.triangle_mesh.append(&geometry.triangles, Vec2::zeros());
        let line_base = out.line_mesh.append(&geometry.lines, Vec2::zeros());

        for segment in &geometry.segments {
            let base = match segment.primitive {
                PrimitiveKind::Triangles => triangle_base,
                PrimitiveKind::Lines => line_base,
            };
            push_segment(
                &mut out.segments,
                MeshSegment {
                    index_offset: segment.index_offset + base,
                    ..*segment
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuiConfig;
    use crate::foundation::collections::ElementId;
    use crate::foundation::rect::Rect2I;
    use crate::gui::draw_groups::DrawGroups;
    use crate::gui::tests::support::{element_at, QuadContent, WithBounds};
    use crate::gui::GuiElement;
    use crate::render::{BudgetTextureAllocator, TextureHandle};

    fn build(groups: &mut DrawGroups, elements: &ElementRegistry) {
        let mut allocator = BudgetTextureAllocator::new(u64::MAX);
        groups.rebuild_dirty(elements, &mut allocator);
    }

    fn add(groups: &mut DrawGroups, elements: &mut ElementRegistry, element: GuiElement) -> ElementId {
        let id = elements.insert(element);
        groups.add(id, elements.get(id).unwrap());
        id
    }

    fn tinted(depth: u32, red: f32) -> GuiElement {
        GuiElement::new(QuadContent::new(1).with_info(SpriteMaterialInfo::untextured(Vec4::new(red, 0.0, 0.0, 1.0))))
            .with_depth(depth)
            .tap_bounds(Rect2I::new(0, 0, 10, 10))
    }

    #[test]
    fn test_equal_material_pieces_share_segment() {
        let config = GuiConfig::default();
        let mut groups = DrawGroups::new(&config);
        let mut elements = ElementRegistry::new();
        add(&mut groups, &mut elements, element_at(1, false));
        add(&mut groups, &mut elements, element_at(2, false));
        add(&mut groups, &mut elements, element_at(3, false));
        build(&mut groups, &elements);

        assert_eq!(groups.segments().len(), 1);
        assert_eq!(groups.segments()[0].index_count, 18);
        assert_eq!(groups.triangle_mesh().index_count(), 18);
    }

    #[test]
    fn test_segments_ordered_back_to_front() {
        let config = GuiConfig::default();
        let mut groups = DrawGroups::new(&config);
        let mut elements = ElementRegistry::new();
        add(&mut groups, &mut elements, tinted(1, 0.1));
        add(&mut groups, &mut elements, tinted(9, 0.9));
        add(&mut groups, &mut elements, tinted(5, 0.5));
        build(&mut groups, &elements);

        let reds: Vec<f32> = groups.segments().iter().map(|s| s.info.tint.x).collect();
        assert_eq!(reds, vec![0.9, 0.5, 0.1]);
    }

    #[test]
    fn test_equal_depth_keeps_registration_order() {
        let config = GuiConfig::default();
        let mut groups = DrawGroups::new(&config);
        let mut elements = ElementRegistry::new();
        add(&mut groups, &mut elements, tinted(4, 0.1));
        add(&mut groups, &mut elements, tinted(4, 0.2));
        add(&mut groups, &mut elements, tinted(2, 0.3));
        add(&mut groups, &mut elements, tinted(4, 0.4));
        build(&mut groups, &elements);

        let reds: Vec<f32> = groups.segments().iter().map(|s| s.info.tint.x).collect();
        assert_eq!(reds, vec![0.1, 0.2, 0.4, 0.3]);
    }

    #[test]
    fn test_lines_and_triangles_use_separate_buffers() {
        let config = GuiConfig::default();
        let mut groups = DrawGroups::new(&config);
        let mut elements = ElementRegistry::new();
        add(
            &mut groups,
            &mut elements,
            GuiElement::new(QuadContent::new(1).with_lines())
                .with_depth(1)
                .tap_bounds(Rect2I::new(0, 0, 4, 4)),
        );
        add(&mut groups, &mut elements, element_at(2, false));
        build(&mut groups, &elements);

        let kinds: Vec<_> = groups.segments().iter().map(|s| s.primitive).collect();
        assert_eq!(kinds, vec![PrimitiveKind::Triangles, PrimitiveKind::Lines]);
        assert_eq!(groups.segments()[1].index_offset, 0);
        assert_eq!(groups.line_mesh().index_count(), 8);
    }

    #[test]
    fn test_cached_group_emits_quad_and_cache_pass() {
        let config = GuiConfig::default();
        let mut groups = DrawGroups::new(&config);
        let mut elements = ElementRegistry::new();
        add(&mut groups, &mut elements, element_at(3, true).tap_bounds(Rect2I::new(20, 30, 10, 10)));
        add(&mut groups, &mut elements, element_at(3, true).tap_bounds(Rect2I::new(40, 30, 10, 10)));
        add(&mut groups, &mut elements, element_at(1, false));
        build(&mut groups, &elements);

        let group = &groups.groups()[0];
        assert_eq!(group.bounds(), Rect2I::new(0, 0, 50, 40));

        let segments = groups.segments();
        assert_eq!(segments[0].material, MaterialId::CACHED_GROUP);
        assert_eq!(
            segments[0].info.texture,
            group.output_texture().map(|texture| texture.handle())
        );
        assert_eq!(segments.len(), 2);

        let cache = group.geometry().cache_pass.as_ref().unwrap();
        assert!(cache.pending);
        assert_eq!(cache.triangles.index_count(), 12);
        // Texture space: element at x=20 lands at texel 20 of a texture anchored at the group origin
        assert_eq!(cache.triangles.vertices[0].position, [20.0, 30.0]);
    }

    #[test]
    fn test_cache_quad_uv_covers_used_area() {
        let config = GuiConfig::default();
        let mut groups = DrawGroups::new(&config);
        let mut elements = ElementRegistry::new();
        add(&mut groups, &mut elements, element_at(3, true).tap_bounds(Rect2I::new(0, 0, 32, 16)));
        build(&mut groups, &elements);

        let quad = groups.triangle_mesh();
        assert_eq!(quad.vertices[2].uv, [0.5, 0.25]);
    }

    #[test]
    fn test_hidden_elements_emit_nothing() {
        let config = GuiConfig::default();
        let mut groups = DrawGroups::new(&config);
        let mut elements = ElementRegistry::new();
        add(&mut groups, &mut elements, element_at(1, false).visible(false));
        build(&mut groups, &elements);

        assert!(groups.segments().is_empty());
        assert!(groups.groups()[0].bounds().is_empty());
    }

    #[test]
    fn test_push_segment_folds_contiguous_ranges() {
        let segment = MeshSegment {
            index_offset: 0,
            index_count: 6,
            material: MaterialId::IMAGE_OPAQUE,
            info: SpriteMaterialInfo::textured(TextureHandle(1), Vec4::new(1.0, 1.0, 1.0, 1.0)),
            primitive: PrimitiveKind::Triangles,
        };

        let mut segments = Vec::new();
        push_segment(&mut segments, segment);
        push_segment(&mut segments, MeshSegment { index_offset: 6, ..segment });
        push_segment(&mut segments, MeshSegment { index_offset: 20, ..segment });

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].index_count, 12);
        assert_eq!(segments[1].index_offset, 20);
    }
}
