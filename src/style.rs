use std::path::PathBuf;

use crate::foundation::error::{CueburnError, CueburnResult};

/// Vertical placement of the caption block within the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// Style configuration shared by every cue of a video item.
///
/// Immutable per render pass; passed explicitly into every render call so
/// concurrently processed items cannot interfere. Colors are straight-alpha
/// RGB/RGBA byte tuples.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    /// Path to a .ttf/.otf font file; `None` selects a platform default.
    pub font_path: Option<PathBuf>,
    pub font_size: u32,
    pub font_color: [u8; 3],
    pub outline_color: [u8; 3],
    pub outline_width: u32,
    /// `None` means no background rectangle behind the text.
    pub background_color: Option<[u8; 4]>,
    pub background_padding: u32,
    pub position: Position,
    /// Distance from the frame edge for top/bottom placement.
    pub margin: u32,
    pub shadow: bool,
    pub shadow_offset: (i32, i32),
    pub shadow_color: [u8; 4],
    /// Maximum text width in pixels before wrapping.
    pub max_text_width: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: 48,
            font_color: [255, 255, 255],
            outline_color: [0, 0, 0],
            outline_width: 3,
            background_color: None,
            background_padding: 20,
            position: Position::Bottom,
            margin: 50,
            shadow: true,
            shadow_offset: (3, 3),
            shadow_color: [0, 0, 0, 128],
            max_text_width: 1800,
        }
    }
}

impl CaptionStyle {
    pub fn validate(&self) -> CueburnResult<()> {
        if self.font_size == 0 {
            return Err(CueburnError::validation("font_size must be non-zero"));
        }
        if self.max_text_width == 0 {
            return Err(CueburnError::validation("max_text_width must be non-zero"));
        }
        Ok(())
    }
}
