use std::path::Path;

use anyhow::Context as _;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::foundation::error::{CueburnError, CueburnResult};

static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})")
        .expect("timestamp regex is valid")
});

static BLOCK_SPLIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("block split regex is valid"));

/// A timed caption entry, the atomic unit shown on screen.
///
/// Invariants maintained by the segmenter: indices are 1-based and strictly
/// increasing, cues are sorted by start, `start < end`, and adjacent cues are
/// separated by at least the configured minimum gap.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cue {
    pub index: u32,
    pub start_sec: f64,
    pub end_sec: f64,
    pub text: String,
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_timestamp(sec: f64) -> String {
    let total_ms = (sec.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Parse an SRT timestamp (`HH:MM:SS,mmm`) to seconds.
pub fn parse_timestamp(s: &str) -> CueburnResult<f64> {
    let parts: Vec<&str> = s.split([':', ',']).collect();
    if parts.len() != 4 {
        return Err(CueburnError::parse(format!("invalid timestamp '{s}'")));
    }
    let field = |i: usize, name: &str| -> CueburnResult<u64> {
        parts[i]
            .parse::<u64>()
            .map_err(|_| CueburnError::parse(format!("invalid {name} in timestamp '{s}'")))
    };
    let (h, m, sec, ms) = (
        field(0, "hours")?,
        field(1, "minutes")?,
        field(2, "seconds")?,
        field(3, "milliseconds")?,
    );
    if m >= 60 || sec >= 60 || ms >= 1000 {
        return Err(CueburnError::parse(format!(
            "timestamp field out of range in '{s}'"
        )));
    }
    Ok((h * 3_600_000 + m * 60_000 + sec * 1_000 + ms) as f64 / 1000.0)
}

/// Parse SRT content into cues.
///
/// Malformed blocks (fewer than 3 lines, unparsable index, timestamp line not
/// matching the `HH:MM:SS,mmm --> HH:MM:SS,mmm` pattern) are skipped, never
/// fatal; the remaining well-formed blocks are returned in file order.
pub fn parse_srt_str(content: &str) -> Vec<Cue> {
    let mut cues = Vec::new();

    for block in BLOCK_SPLIT_REGEX.split(content.trim()) {
        let lines: Vec<&str> = block.trim().lines().collect();
        if lines.len() < 3 {
            tracing::debug!(lines = lines.len(), "skipping short subtitle block");
            continue;
        }

        let Ok(index) = lines[0].trim().parse::<u32>() else {
            tracing::debug!(line = lines[0], "skipping block with unparsable index");
            continue;
        };

        let Some(caps) = TIMESTAMP_REGEX.captures(lines[1]) else {
            tracing::debug!(line = lines[1], "skipping block with unparsable timing");
            continue;
        };

        // The regex guarantees each field is a short digit run.
        let num = |i: usize| -> u64 { caps[i].parse().expect("digits per regex") };
        let start_sec =
            (num(1) * 3_600_000 + num(2) * 60_000 + num(3) * 1_000 + num(4)) as f64 / 1000.0;
        let end_sec =
            (num(5) * 3_600_000 + num(6) * 60_000 + num(7) * 1_000 + num(8)) as f64 / 1000.0;

        cues.push(Cue {
            index,
            start_sec,
            end_sec,
            text: lines[2..].join("\n"),
        });
    }

    cues
}

/// Serialize cues in the SRT block layout: index line, timing line, text,
/// blocks separated by one blank line.
pub fn serialize_cues(cues: &[Cue]) -> String {
    if cues.is_empty() {
        return String::new();
    }

    let blocks: Vec<String> = cues
        .iter()
        .map(|cue| {
            format!(
                "{}\n{} --> {}\n{}\n",
                cue.index,
                format_timestamp(cue.start_sec),
                format_timestamp(cue.end_sec),
                cue.text
            )
        })
        .collect();

    blocks.join("\n")
}

pub fn parse_srt_file(path: &Path) -> CueburnResult<Vec<Cue>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CueburnError::parse(format!("read '{}': {e}", path.display())))?;
    Ok(parse_srt_str(&content))
}

pub fn write_srt_file(path: &Path, cues: &[Cue]) -> CueburnResult<()> {
    std::fs::write(path, serialize_cues(cues))
        .with_context(|| format!("write subtitle file '{}'", path.display()))?;
    Ok(())
}
