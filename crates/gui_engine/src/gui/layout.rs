//! GUI layout
//!
//! Elements are placed relative to the widget's root panel: an anchor picks a
//! normalized point of the panel, an offset moves from there, and a size gives
//! the extent. Resolving a layout yields the element's pixel bounds.

use crate::foundation::math::Vec2;
use crate::foundation::rect::Rect2I;
use serde::{Deserialize, Serialize};

/// Anchor point for GUI positioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    /// Top-left corner
    #[default]
    TopLeft,
    /// Top-center
    TopCenter,
    /// Top-right corner
    TopRight,
    /// Middle-left
    MiddleLeft,
    /// Center of the panel
    Center,
    /// Middle-right
    MiddleRight,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom-center
    BottomCenter,
    /// Bottom-right corner
    BottomRight,
}

impl Anchor {
    /// Get the normalized anchor position (0.0 to 1.0)
    pub fn to_normalized(self) -> (f32, f32) {
        match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopCenter => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::MiddleLeft => (0.0, 0.5),
            Anchor::Center => (0.5, 0.5),
            Anchor::MiddleRight => (1.0, 0.5),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomCenter => (0.5, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    /// Left-aligned text
    #[default]
    Left,
    /// Center-aligned text
    Center,
    /// Right-aligned text
    Right,
}

impl HorizontalAlign {
    /// Offset of content `content` wide inside `available`
    pub fn offset(self, available: f32, content: f32) -> f32 {
        match self {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => (available - content) * 0.5,
            HorizontalAlign::Right => available - content,
        }
    }
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    /// Top-aligned text
    #[default]
    Top,
    /// Middle-aligned text
    Middle,
    /// Bottom-aligned text
    Bottom,
}

impl VerticalAlign {
    /// Offset of content `content` tall inside `available`
    pub fn offset(self, available: f32, content: f32) -> f32 {
        match self {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => (available - content) * 0.5,
            VerticalAlign::Bottom => available - content,
        }
    }
}

/// Placement of an element inside its widget's root panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementLayout {
    /// Anchor point on the panel
    pub anchor: Anchor,
    /// Offset from the anchor point in pixels
    pub offset: Vec2,
    /// Size in pixels
    pub size: Vec2,
}

impl ElementLayout {
    /// Layout anchored at the panel's top-left corner
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            anchor: Anchor::TopLeft,
            offset: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Change the anchor
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Calculate the pixel bounds inside `parent`
    pub fn resolve(&self, parent: Rect2I) -> Rect2I {
        let (anchor_x, anchor_y) = self.anchor.to_normalized();

        let min = Vec2::new(
            parent.x as f32 + anchor_x * parent.width as f32 + self.offset.x,
            parent.y as f32 + anchor_y * parent.height as f32 + self.offset.y,
        );
        let size = Vec2::new(self.size.x.max(0.0), self.size.y.max(0.0));

        Rect2I::new(
            min.x.round() as i32,
            min.y.round() as i32,
            size.x.round() as u32,
            size.y.round() as u32,
        )
    }
}

impl Default for ElementLayout {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 50.0)
    }
}

/// Root container of a widget
///
/// Covers the viewport of the widget's camera and is the parent every element
/// layout resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RootPanel {
    area: Rect2I,
}

impl RootPanel {
    /// Create a panel covering `area`
    pub fn new(area: Rect2I) -> Self {
        Self { area }
    }

    /// Panel area in target pixels
    pub fn area(&self) -> Rect2I {
        self.area
    }

    /// Resize the panel; returns whether the area changed
    pub fn set_area(&mut self, area: Rect2I) -> bool {
        let changed = self.area != area;
        self.area = area;
        changed
    }
}
