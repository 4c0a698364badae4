//! Sprite materials for GUI rendering
//!
//! Every render element is drawn with a sprite material plus a small block of
//! per-draw parameters ([`SpriteMaterialInfo`]). Two pieces can share a draw
//! segment only when both match.

use super::mesh::PrimitiveKind;
use super::texture::TextureHandle;
use crate::foundation::math::Vec4;
use std::collections::HashMap;

/// Identifier of a registered sprite material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Alpha-blended image
    pub const IMAGE_TRANSPARENT: Self = Self(1);
    /// Opaque image
    pub const IMAGE_OPAQUE: Self = Self(2);
    /// Glyph quads sampled from a font atlas
    pub const TEXT: Self = Self(3);
    /// Untextured lines
    pub const LINE: Self = Self(4);
    /// Composite of a cached draw group's texture
    pub const CACHED_GROUP: Self = Self(5);
}

/// Blending applied when a material is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// No blending
    Opaque,
    /// Straight alpha blending
    Transparent,
    /// Premultiplied alpha, used when compositing cache textures
    Premultiplied,
}

/// Per-draw material parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteMaterialInfo {
    /// Sampled texture, if any
    pub texture: Option<TextureHandle>,
    /// Multiplicative tint (RGBA)
    pub tint: Vec4,
}

impl SpriteMaterialInfo {
    /// Untextured, tinted
    pub fn untextured(tint: Vec4) -> Self {
        Self { texture: None, tint }
    }

    /// Textured, tinted
    pub fn textured(texture: TextureHandle, tint: Vec4) -> Self {
        Self {
            texture: Some(texture),
            tint,
        }
    }
}

impl Default for SpriteMaterialInfo {
    fn default() -> Self {
        Self::untextured(Vec4::new(1.0, 1.0, 1.0, 1.0))
    }
}

/// A registered sprite material
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteMaterial {
    /// Material identifier
    pub id: MaterialId,
    /// Debug name
    pub name: String,
    /// Blend mode
    pub blend: BlendMode,
    /// Primitive topology the material expects
    pub primitive: PrimitiveKind,
}

/// Registry of sprite materials, pre-populated with the built-in set
#[derive(Debug, Clone)]
pub struct SpriteMaterialRegistry {
    materials: HashMap<MaterialId, SpriteMaterial>,
    next_id: u32,
}

impl SpriteMaterialRegistry {
    /// Create a registry holding the built-in materials
    pub fn new() -> Self {
        let mut registry = Self {
            materials: HashMap::new(),
            next_id: 1,
        };

        registry.register("image_transparent", BlendMode::Transparent, PrimitiveKind::Triangles);
        registry.register("image_opaque", BlendMode::Opaque, PrimitiveKind::Triangles);
        registry.register("text", BlendMode::Transparent, PrimitiveKind::Triangles);
        registry.register("line", BlendMode::Transparent, PrimitiveKind::Lines);
        registry.register("cached_group", BlendMode::Premultiplied, PrimitiveKind::Triangles);

        registry
    }

    /// Register a new material and return its identifier
    pub fn register(&mut self, name: &str, blend: BlendMode, primitive: PrimitiveKind) -> MaterialId {
        let id = MaterialId(self.next_id);
        self.next_id += 1;

        self.materials.insert(
            id,
            SpriteMaterial {
                id,
                name: name.to_string(),
                blend,
                primitive,
            },
        );

        log::debug!("Registered sprite material '{}' as {:?}", name, id);
        id
    }

    /// Get a material by ID
    pub fn get(&self, id: MaterialId) -> Option<&SpriteMaterial> {
        self.materials.get(&id)
    }

    /// Get number of registered materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl Default for SpriteMaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_match_constants() {
        let registry = SpriteMaterialRegistry::new();
        assert_eq!(registry.get(MaterialId::TEXT).map(|m| m.name.as_str()), Some("text"));
        assert_eq!(
            registry.get(MaterialId::LINE).map(|m| m.primitive),
            Some(PrimitiveKind::Lines)
        );
        assert_eq!(
            registry.get(MaterialId::CACHED_GROUP).map(|m| m.blend),
            Some(BlendMode::Premultiplied)
        );
    }

    #[test]
    fn test_register_assigns_fresh_ids() {
        let mut registry = SpriteMaterialRegistry::new();
        let id = registry.register("custom", BlendMode::Opaque, PrimitiveKind::Triangles);
        assert_eq!(id, MaterialId(6));
        assert_eq!(registry.material_count(), 6);
    }

    #[test]
    fn test_info_equality_includes_texture() {
        let tint = Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(SpriteMaterialInfo::untextured(tint), SpriteMaterialInfo::untextured(tint));
        assert_ne!(
            SpriteMaterialInfo::untextured(tint),
            SpriteMaterialInfo::textured(TextureHandle(1), tint)
        );
    }
}
