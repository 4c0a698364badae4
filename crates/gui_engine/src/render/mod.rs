//! # Rendering Interfaces
//!
//! The GUI engine never talks to a graphics API directly. It produces CPU-side
//! geometry and hands it to collaborators defined here:
//!
//! - **Mesh**: vertex/index buffers and material-homogeneous draw segments
//! - **Material**: sprite materials and per-draw material info
//! - **Texture**: off-screen cache textures and the allocator that owns them
//! - **Camera**: viewport/render-target queries for widgets
//! - **Backend**: the trait a renderer implements to consume GUI draw data

pub mod backend;
pub mod camera;
pub mod material;
pub mod mesh;
pub mod texture;

pub use backend::{BackendResult, CachePass, GuiRenderBackend, WidgetDrawData};
pub use camera::{Camera, CameraSource, SharedCamera, Viewport};
pub use material::{BlendMode, MaterialId, SpriteMaterial, SpriteMaterialInfo, SpriteMaterialRegistry};
pub use mesh::{GuiVertex, MeshBuffer, MeshSegment, PrimitiveKind};
pub use texture::{BudgetTextureAllocator, CacheTexture, SharedTextureAllocator, TextureAllocator, TextureHandle};

use thiserror::Error;

/// Rendering errors
///
/// Raised by texture allocators and render backends. The GUI engine treats an
/// allocation failure as recoverable and falls back to uncached drawing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// An off-screen texture could not be created
    #[error("Texture allocation failed for {width}x{height}: {reason}")]
    TextureAllocationFailed {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Allocator-specific reason
        reason: String,
    },

    /// A rendering operation failed during execution
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
