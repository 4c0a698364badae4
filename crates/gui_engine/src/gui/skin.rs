//! GUI skin
//!
//! A skin is a named set of element styles. Elements pick a style by name and
//! fall back to the skin's default style. Skins are plain configuration and
//! load from TOML or RON through [`Config`](crate::config::Config).

use crate::config::Config;
use crate::foundation::math::Vec4;
use crate::render::TextureHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Visual parameters shared by the built-in element contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStyle {
    /// Background color (RGBA)
    pub background: Vec4,
    /// Background while hovered
    pub hover_background: Vec4,
    /// Background while pressed
    pub pressed_background: Vec4,
    /// Background while disabled
    pub disabled_background: Vec4,
    /// Optional background texture
    pub background_texture: Option<TextureHandle>,
    /// Border color (RGBA), drawn when `border_width > 0`
    pub border_color: Vec4,
    /// Border width in pixels
    pub border_width: f32,
    /// Text color (RGBA)
    pub text_color: Vec4,
    /// Font size in pixels
    pub font_size: f32,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            background: Vec4::new(0.3, 0.3, 0.3, 0.9),
            hover_background: Vec4::new(0.4, 0.4, 0.5, 1.0),
            pressed_background: Vec4::new(0.5, 0.5, 0.6, 1.0),
            disabled_background: Vec4::new(0.2, 0.2, 0.2, 0.5),
            background_texture: None,
            border_color: Vec4::new(0.6, 0.6, 0.6, 1.0),
            border_width: 0.0,
            text_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            font_size: 16.0,
        }
    }
}

/// Named collection of element styles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiSkin {
    /// Style used by elements without a style name, or with an unknown one
    pub default_style: ElementStyle,
    /// Styles by name
    pub styles: HashMap<String, ElementStyle>,
}

impl GuiSkin {
    /// Create a skin with only the default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named style
    pub fn with_style(mut self, name: impl Into<String>, style: ElementStyle) -> Self {
        self.styles.insert(name.into(), style);
        self
    }

    /// Add or replace a named style in place
    pub fn insert_style(&mut self, name: impl Into<String>, style: ElementStyle) {
        self.styles.insert(name.into(), style);
    }

    /// Look up a style, falling back to the default
    pub fn style(&self, name: Option<&str>) -> &ElementStyle {
        match name {
            Some(name) => self.styles.get(name).unwrap_or(&self.default_style),
            None => &self.default_style,
        }
    }
}

impl Config for GuiSkin {}
