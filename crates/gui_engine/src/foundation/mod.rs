//! Foundation module - Core utilities and types
//!
//! - Math types and operations
//! - Pixel rectangles
//! - Handle types and lazily computed caches
//! - Logging utilities

pub mod math;
pub mod rect;
pub mod collections;
pub mod logging;
