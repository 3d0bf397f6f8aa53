use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::{CueburnError, CueburnResult};

/// Output encoding parameters for the burn pass.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub codec: String,
    pub crf: u32,
    pub preset: String,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> CueburnResult<()> {
        if self.codec.is_empty() {
            return Err(CueburnError::validation("encode codec must be non-empty"));
        }
        if self.preset.is_empty() {
            return Err(CueburnError::validation("encode preset must be non-empty"));
        }
        if self.crf > 51 {
            return Err(CueburnError::validation(
                "encode crf must be in the x264 range 0..=51",
            ));
        }
        Ok(())
    }

    pub fn with_out_path(mut self, out_path: impl Into<PathBuf>) -> Self {
        self.out_path = out_path.into();
        self
    }
}

pub fn default_h264_config(out_path: impl Into<PathBuf>) -> EncodeConfig {
    EncodeConfig {
        codec: "libx264".to_string(),
        crf: 18,
        preset: "medium".to_string(),
        out_path: out_path.into(),
        overwrite: true,
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> CueburnResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// One caption image scheduled onto the video.
///
/// The overlay is active for `start_sec..end_sec`; ffmpeg's `between()` is
/// inclusive at both ends, which is why cue times are kept non-overlapping
/// upstream.
#[derive(Clone, Debug)]
pub struct OverlayInput {
    pub image_path: PathBuf,
    pub x: i64,
    pub y: i64,
    pub start_sec: f64,
    pub end_sec: f64,
}

/// Build the `-filter_complex` graph that chains every overlay onto the base
/// video stream. Input 0 is the video; input `i + 1` is overlay `i`.
pub fn build_overlay_filter(overlays: &[OverlayInput]) -> String {
    let mut filter = String::new();
    let mut current = "[0:v]".to_string();
    for (i, ov) in overlays.iter().enumerate() {
        let out_label = if i + 1 == overlays.len() {
            "[outv]".to_string()
        } else {
            format!("[v{}]", i + 1)
        };
        filter.push_str(&format!(
            "{current}[{input}:v]overlay={x}:{y}:enable='between(t,{start},{end})'{out_label}",
            input = i + 1,
            x = ov.x,
            y = ov.y,
            start = ov.start_sec,
            end = ov.end_sec,
        ));
        if i + 1 != overlays.len() {
            filter.push(';');
        }
        current = out_label;
    }
    filter
}

/// Re-encode `video_path` with the given overlays burned in.
///
/// With no overlays the video is re-encoded unchanged, so callers always get
/// a fresh output file with the configured codec settings. Audio is stream
/// copied when present and output stops at the shorter of video and audio.
#[tracing::instrument(skip(overlays, cfg), fields(overlays = overlays.len(), out = %cfg.out_path.display()))]
pub fn encode_with_overlays(
    video_path: &Path,
    overlays: &[OverlayInput],
    cfg: &EncodeConfig,
) -> CueburnResult<()> {
    cfg.validate()?;
    ensure_parent_dir(&cfg.out_path)?;

    if !cfg.overwrite && cfg.out_path.exists() {
        return Err(CueburnError::validation(format!(
            "output file '{}' already exists",
            cfg.out_path.display()
        )));
    }
    if !is_ffmpeg_on_path() {
        return Err(CueburnError::encode(
            "ffmpeg is required for caption burning, but was not found on PATH",
        ));
    }

    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    cmd.arg(if cfg.overwrite { "-y" } else { "-n" });
    cmd.args(["-loglevel", "error"]);
    cmd.arg("-i").arg(video_path);

    for ov in overlays {
        // `-loop 1` turns each still PNG into an endless stream so the
        // overlay filter can gate it by time.
        cmd.args(["-loop", "1", "-i"]).arg(&ov.image_path);
    }

    if overlays.is_empty() {
        cmd.args(["-map", "0:v"]);
    } else {
        let filter = build_overlay_filter(overlays);
        cmd.arg("-filter_complex").arg(filter);
        cmd.args(["-map", "[outv]"]);
    }

    cmd.args(["-map", "0:a?", "-c:a", "copy"]);
    cmd.args(["-c:v", &cfg.codec]);
    cmd.args(["-crf", &cfg.crf.to_string()]);
    cmd.args(["-preset", &cfg.preset]);
    cmd.arg("-shortest");
    cmd.arg(&cfg.out_path);

    let out = cmd
        .output()
        .map_err(|e| CueburnError::encode(format!("failed to run ffmpeg: {e}")))?;

    if !out.status.success() {
        // A failed run must not leave a truncated file behind.
        let _ = std::fs::remove_file(&cfg.out_path);
        return Err(CueburnError::encode(format!(
            "ffmpeg exited with status {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    tracing::info!("encoded output video");
    Ok(())
}
