use std::path::{Path, PathBuf};

use crate::foundation::error::{CueburnError, CueburnResult};

/// Properties of a video source as reported by ffprobe.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub duration_sec: f64,
    pub has_audio: bool,
}

impl VideoSourceInfo {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

/// Properties of an audio source as reported by ffprobe.
#[derive(Clone, Debug)]
pub struct AudioSourceInfo {
    pub source_path: PathBuf,
    pub duration_sec: f64,
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

fn run_ffprobe(source_path: &Path) -> CueburnResult<ProbeOut> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| CueburnError::probe(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(CueburnError::probe(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    serde_json::from_slice(&out.stdout)
        .map_err(|e| CueburnError::probe(format!("ffprobe json parse failed: {e}")))
}

/// Probe a video file for dimensions, frame rate, duration, and audio presence.
pub fn probe_video(source_path: &Path) -> CueburnResult<VideoSourceInfo> {
    let parsed = run_ffprobe(source_path)?;
    video_info_from_probe(parsed, source_path)
}

/// Probe an audio file for duration and stream parameters.
pub fn probe_audio(source_path: &Path) -> CueburnResult<AudioSourceInfo> {
    let parsed = run_ffprobe(source_path)?;
    audio_info_from_probe(parsed, source_path)
}

fn video_info_from_probe(parsed: ProbeOut, source_path: &Path) -> CueburnResult<VideoSourceInfo> {
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            CueburnError::probe(format!("no video stream in '{}'", source_path.display()))
        })?;
    let width = video_stream
        .width
        .ok_or_else(|| CueburnError::probe("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| CueburnError::probe("missing video height from ffprobe"))?;
    if width == 0 || height == 0 {
        return Err(CueburnError::probe(format!(
            "degenerate video dimensions {width}x{height} in '{}'",
            source_path.display()
        )));
    }

    let (fps_num, fps_den) = parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| CueburnError::probe("invalid video r_frame_rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
        has_audio,
    })
}

fn audio_info_from_probe(parsed: ProbeOut, source_path: &Path) -> CueburnResult<AudioSourceInfo> {
    let audio_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .ok_or_else(|| {
            CueburnError::probe(format!("no audio stream in '{}'", source_path.display()))
        })?;

    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(AudioSourceInfo {
        source_path: source_path.to_path_buf(),
        duration_sec,
        sample_rate: audio_stream
            .sample_rate
            .as_deref()
            .and_then(|s| s.parse::<u32>().ok()),
        channels: audio_stream.channels,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}
