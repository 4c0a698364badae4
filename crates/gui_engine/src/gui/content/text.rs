//! Text layout for GUI contents
//!
//! Converts strings into glyph quads using a fixed-grid glyph atlas. Each line
//! of text becomes its own mesh so contents can expose one render element per
//! line.

use crate::foundation::math::Vec2;
use crate::gui::layout::{HorizontalAlign, VerticalAlign};
use crate::render::{MeshBuffer, TextureHandle};

/// Monospaced glyph atlas laid out as a grid of equally sized cells
///
/// Cell `n` holds the character with code `first_char + n`, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphAtlas {
    /// Atlas texture
    pub texture: TextureHandle,
    /// Cells per row
    pub columns: u32,
    /// Number of rows
    pub rows: u32,
    /// Character stored in the first cell
    pub first_char: u32,
    /// Glyph advance as a fraction of font size
    pub advance_ratio: f32,
}

impl GlyphAtlas {
    /// 16x16 grid covering codes 0..256
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            columns: 16,
            rows: 16,
            first_char: 0,
            advance_ratio: 0.5,
        }
    }

    /// UV rectangle of a character; unknown characters map to `?`
    pub fn glyph_uv(&self, ch: char) -> ([f32; 2], [f32; 2]) {
        let cell_count = self.columns * self.rows;
        let cell = |code: u32| code.checked_sub(self.first_char).filter(|cell| *cell < cell_count);
        let index = cell(ch as u32).or_else(|| cell('?' as u32)).unwrap_or(0);

        let column = (index % self.columns) as f32;
        let row = (index / self.columns) as f32;
        let (cell_u, cell_v) = (1.0 / self.columns as f32, 1.0 / self.rows as f32);

        (
            [column * cell_u, row * cell_v],
            [(column + 1.0) * cell_u, (row + 1.0) * cell_v],
        )
    }

    /// Horizontal advance of one glyph at `font_size`
    pub fn advance(&self, font_size: f32) -> f32 {
        font_size * self.advance_ratio
    }
}

/// Width of a line of text in pixels
pub fn line_width(atlas: &GlyphAtlas, line: &str, font_size: f32) -> f32 {
    line.chars().count() as f32 * atlas.advance(font_size)
}

/// Lay out `text` inside an area of `size`, one mesh per line
///
/// Whitespace advances the cursor without emitting geometry. Empty lines
/// still produce an (empty) mesh so line indices stay stable.
pub fn layout_lines(
    atlas: &GlyphAtlas,
    text: &str,
    font_size: f32,
    size: Vec2,
    h_align: HorizontalAlign,
    v_align: VerticalAlign,
) -> Vec<MeshBuffer> {
    let lines: Vec<&str> = text.lines().collect();
    let block_height = lines.len() as f32 * font_size;
    let top = v_align.offset(size.y, block_height);
    let advance = atlas.advance(font_size);

    lines
        .iter()
        .enumerate()
        .map(|(row, line)| {
            let mut mesh = MeshBuffer::new();
            let mut cursor_x = h_align.offset(size.x, line_width(atlas, line, font_size));
            let y = top + row as f32 * font_size;

            for ch in line.chars() {
                if !ch.is_whitespace() {
                    let (uv_min, uv_max) = atlas.glyph_uv(ch);
                    mesh.push_quad(
                        Vec2::new(cursor_x, y),
                        Vec2::new(cursor_x + advance, y + font_size),
                        uv_min,
                        uv_max,
                    );
                }
                cursor_x += advance;
            }
            mesh
        })
        .collect()
}
