//! Built-in element contents
//!
//! - `PanelContent` - background quad with optional border
//! - `LabelContent` - text, one render element per line
//! - `ButtonContent` - state-colored background with a centered label

pub mod button;
pub mod label;
pub mod panel;
pub mod text;

pub use button::{ButtonContent, ButtonState};
pub use label::LabelContent;
pub use panel::PanelContent;
pub use text::GlyphAtlas;
