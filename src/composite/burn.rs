use std::path::PathBuf;

use rayon::prelude::*;

use crate::composite::position::anchor_for;
use crate::encode::ffmpeg::{EncodeConfig, OverlayInput, encode_with_overlays};
use crate::foundation::error::{CueburnError, CueburnResult};
use crate::layout::font::resolve_font;
use crate::layout::render::{CaptionRenderer, save_png};
use crate::media::probe::probe_video;
use crate::style::CaptionStyle;
use crate::subtitle::srt::parse_srt_file;

/// Inputs for one caption burn.
#[derive(Clone, Debug)]
pub struct BurnOptions {
    pub video_path: PathBuf,
    pub srt_path: PathBuf,
    pub style: CaptionStyle,
    pub encode: EncodeConfig,
}

/// Render every cue of an SRT file and burn the images into the video.
///
/// Cues are rasterized in parallel into a temporary directory that lives
/// exactly as long as the ffmpeg pass needs it. An SRT with no cues is not an
/// error; the video is re-encoded without overlays so the caller still gets
/// an output file.
#[tracing::instrument(skip(opts), fields(video = %opts.video_path.display(), srt = %opts.srt_path.display()))]
pub fn burn_captions(opts: &BurnOptions) -> CueburnResult<()> {
    opts.style.validate()?;
    opts.encode.validate()?;

    if !opts.video_path.is_file() {
        return Err(CueburnError::validation(format!(
            "video file '{}' not found",
            opts.video_path.display()
        )));
    }
    if !opts.srt_path.is_file() {
        return Err(CueburnError::validation(format!(
            "subtitle file '{}' not found",
            opts.srt_path.display()
        )));
    }

    let video = probe_video(&opts.video_path)?;
    let cues = parse_srt_file(&opts.srt_path)?;

    if cues.is_empty() {
        tracing::warn!("subtitle file has no cues, re-encoding without captions");
        return encode_with_overlays(&opts.video_path, &[], &opts.encode);
    }

    let font = resolve_font(opts.style.font_path.as_deref())?;
    tracing::info!(cues = cues.len(), font = %font.origin, "rendering caption images");

    let staging = tempfile::tempdir()
        .map_err(|e| CueburnError::render(format!("failed to create staging directory: {e}")))?;

    let overlays = cues
        .par_iter()
        .enumerate()
        .map_init(
            || CaptionRenderer::new(&font),
            |renderer, (i, cue)| -> CueburnResult<OverlayInput> {
                let renderer = match renderer {
                    Ok(r) => r,
                    Err(e) => return Err(CueburnError::render(format!("renderer init: {e}"))),
                };

                let rendered = renderer.render_cue(&cue.text, &opts.style)?;
                let image_path = staging.path().join(format!("caption_{i:04}.png"));
                save_png(&rendered, &image_path)?;

                let (x, y) = anchor_for(
                    opts.style.position,
                    opts.style.margin,
                    video.width,
                    video.height,
                    rendered.width,
                    rendered.height,
                );
                Ok(OverlayInput {
                    image_path,
                    x,
                    y,
                    start_sec: cue.start_sec,
                    end_sec: cue.end_sec,
                })
            },
        )
        .collect::<CueburnResult<Vec<_>>>()?;

    encode_with_overlays(&opts.video_path, &overlays, &opts.encode)?;

    // `staging` drops here, after ffmpeg has consumed every PNG.
    drop(staging);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::ffmpeg::default_h264_config;

    #[test]
    fn missing_video_is_reported_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let srt = dir.path().join("subs.srt");
        std::fs::write(&srt, "1\n00:00:00,000 --> 00:00:01,000\nhi\n").unwrap();

        let opts = BurnOptions {
            video_path: dir.path().join("missing.mp4"),
            srt_path: srt,
            style: CaptionStyle::default(),
            encode: default_h264_config(dir.path().join("out.mp4")),
        };
        let err = burn_captions(&opts).unwrap_err();
        assert!(matches!(err, CueburnError::Validation(_)));
    }

    #[test]
    fn missing_srt_is_reported_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("in.mp4");
        std::fs::write(&video, b"stub").unwrap();

        let opts = BurnOptions {
            video_path: video,
            srt_path: dir.path().join("missing.srt"),
            style: CaptionStyle::default(),
            encode: default_h264_config(dir.path().join("out.mp4")),
        };
        let err = burn_captions(&opts).unwrap_err();
        assert!(matches!(err, CueburnError::Validation(_)));
    }

    #[test]
    fn invalid_style_is_rejected_first() {
        let opts = BurnOptions {
            video_path: PathBuf::from("in.mp4"),
            srt_path: PathBuf::from("subs.srt"),
            style: CaptionStyle {
                font_size: 0,
                ..CaptionStyle::default()
            },
            encode: default_h264_config("out.mp4"),
        };
        let err = burn_captions(&opts).unwrap_err();
        assert!(matches!(err, CueburnError::Validation(_)));
    }
}
