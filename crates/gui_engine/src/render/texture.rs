//! Off-screen cache textures
//!
//! Draw groups that hold cacheable elements render them once into a texture
//! and composite that texture as a single quad. Textures are created through a
//! [`TextureAllocator`] and handed back to it when no longer needed.

use super::RenderError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Opaque handle to a GPU texture owned by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// A render-target texture exclusively owned by one draw group
///
/// Not `Clone`: ownership moves back to the allocator on release.
#[derive(Debug, PartialEq, Eq)]
pub struct CacheTexture {
    handle: TextureHandle,
    width: u32,
    height: u32,
}

impl CacheTexture {
    /// Wrap a texture created by an allocator
    pub fn new(handle: TextureHandle, width: u32, height: u32) -> Self {
        Self { handle, width, height }
    }

    /// Renderer handle
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether content of the given size fits without reallocation
    pub fn fits(&self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

/// Creates and reclaims cache textures
pub trait TextureAllocator {
    /// Create a render-target texture of at least the requested size
    fn allocate(&mut self, width: u32, height: u32) -> Result<CacheTexture, RenderError>;

    /// Return a texture to the allocator
    fn release(&mut self, texture: CacheTexture);
}

impl std::fmt::Debug for dyn TextureAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TextureAllocator")
    }
}

/// Allocator shared between the widgets of one GUI manager
pub type SharedTextureAllocator = Rc<RefCell<dyn TextureAllocator>>;

/// Reference allocator that enforces a total pixel budget
///
/// Hands out sequential handles and tracks live textures, which makes it
/// useful for headless operation and for verifying release behaviour.
#[derive(Debug, Clone)]
pub struct BudgetTextureAllocator {
    budget: u64,
    used: u64,
    next_handle: u64,
    live: HashMap<TextureHandle, (u32, u32)>,
    allocations: usize,
    releases: usize,
}

impl BudgetTextureAllocator {
    /// Create an allocator with a budget in pixels
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            used: 0,
            next_handle: 1,
            live: HashMap::new(),
            allocations: 0,
            releases: 0,
        }
    }

    /// Wrap the allocator for sharing between widgets
    pub fn into_shared(self) -> SharedTextureAllocator {
        Rc::new(RefCell::new(self))
    }

    /// Pixels currently allocated
    pub fn used_pixels(&self) -> u64 {
        self.used
    }

    /// Total pixel budget
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Number of textures currently alive
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Whether a handle refers to a live texture
    pub fn is_live(&self, handle: TextureHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Successful allocations since creation
    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    /// Releases since creation
    pub fn release_count(&self) -> usize {
        self.releases
    }
}

impl TextureAllocator for BudgetTextureAllocator {
    fn allocate(&mut self, width: u32, height: u32) -> Result<CacheTexture, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::TextureAllocationFailed {
                width,
                height,
                reason: "zero-sized texture".to_string(),
            });
        }

        let pixels = u64::from(width) * u64::from(height);
        if self.used + pixels > self.budget {
            return Err(RenderError::TextureAllocationFailed {
                width,
                height,
                reason: format!("budget exhausted ({} of {} pixels in use)", self.used, self.budget),
            });
        }

        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.used += pixels;
        self.allocations += 1;
        self.live.insert(handle, (width, height));

        log::trace!("Allocated cache texture {:?} ({}x{})", handle, width, height);
        Ok(CacheTexture::new(handle, width, height))
    }

    fn release(&mut self, texture: CacheTexture) {
        match self.live.remove(&texture.handle()) {
            Some((width, height)) => {
                self.used -= u64::from(width) * u64::from(height);
                self.releases += 1;
                log::trace!("Released cache texture {:?}", texture.handle());
            }
            None => log::warn!("Released unknown cache texture {:?}", texture.handle()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_within_budget() {
        let mut allocator = BudgetTextureAllocator::new(128 * 128);
        let texture = allocator.allocate(64, 64).unwrap();

        assert_eq!(texture.size(), (64, 64));
        assert_eq!(allocator.used_pixels(), 64 * 64);
        assert!(allocator.is_live(texture.handle()));
    }

    #[test]
    fn test_allocate_over_budget_fails() {
        let mut allocator = BudgetTextureAllocator::new(64 * 64);
        let result = allocator.allocate(128, 64);
        assert!(matches!(result, Err(RenderError::TextureAllocationFailed { width: 128, .. })));
        assert_eq!(allocator.live_count(), 0);
    }

    #[test]
    fn test_release_returns_budget() {
        let mut allocator = BudgetTextureAllocator::new(64 * 64);
        let texture = allocator.allocate(64, 64).unwrap();
        let handle = texture.handle();

        allocator.release(texture);
        assert_eq!(allocator.used_pixels(), 0);
        assert!(!allocator.is_live(handle));
        assert!(allocator.allocate(64, 64).is_ok());
        assert_eq!(allocator.release_count(), 1);
        assert_eq!(allocator.allocation_count(), 2);
    }

    #[test]
    fn test_fits() {
        let texture = CacheTexture::new(TextureHandle(1), 64, 32);
        assert!(texture.fits(64, 32));
        assert!(!texture.fits(65, 10));
    }
}
