//! Cueburn turns word-level timestamps into styled, burned-in video captions.
//!
//! The pipeline has three stages, consumed in sequence per video item:
//!
//! 1. **Segment**: `WordToken[] + GroupingStrategy -> Cue[]` (non-overlapping,
//!    punctuation-aware caption cues)
//! 2. **Render**: `Cue + CaptionStyle -> RenderedCue` (deterministic RGBA raster
//!    with wrap, outline, shadow and optional background)
//! 3. **Composite**: rendered cues are overlaid on the source video, each one
//!    gated to its exact time window, and encoded via the system `ffmpeg` binary.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic rendering**: identical `(text, style, font bytes)` always
//!   produce byte-identical rasters.
//! - **Premultiplied RGBA8** inside the renderer; PNG export converts to
//!   straight alpha for the ffmpeg overlay inputs.
//! - **Per-item isolation**: style and working directories are passed
//!   explicitly; concurrent items never share mutable state.
#![forbid(unsafe_code)]

pub mod composite;
pub mod encode;
pub mod layout;
pub mod media;
pub mod segment;
pub mod style;
pub mod subtitle;

mod foundation;

pub use composite::burn::{BurnOptions, burn_captions};
pub use composite::position::anchor_for;
pub use encode::ffmpeg::{
    EncodeConfig, OverlayInput, build_overlay_filter, default_h264_config, encode_with_overlays,
    ensure_parent_dir, is_ffmpeg_on_path,
};
pub use foundation::error::{CueburnError, CueburnResult};
pub use layout::font::{ResolvedFont, resolve_font};
pub use layout::render::{CaptionRenderer, RenderedCue, save_png};
pub use layout::wrap::wrap_words;
pub use media::probe::{AudioSourceInfo, VideoSourceInfo, probe_audio, probe_video};
pub use segment::generate::{generate_srt, read_words_json};
pub use segment::segmenter::{PunctuationClasses, SegmenterConfig, WordToken, segment_words};
pub use segment::strategy::GroupingStrategy;
pub use style::{CaptionStyle, Position};
pub use subtitle::srt::{
    Cue, format_timestamp, parse_srt_file, parse_srt_str, parse_timestamp, serialize_cues,
    write_srt_file,
};
