use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CueburnError, CueburnResult};
use crate::segment::segmenter::{SegmenterConfig, WordToken, segment_words};
use crate::subtitle::srt::{Cue, write_srt_file};

/// Read a word-timestamp list from a JSON file (the externally produced ASR
/// output format: an array of `{text, start_sec, end_sec}` objects).
pub fn read_words_json(path: &Path) -> CueburnResult<Vec<WordToken>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read word timestamps from '{}'", path.display()))?;
    let words: Vec<WordToken> =
        serde_json::from_slice(&bytes).with_context(|| "parse word timestamp JSON")?;
    Ok(words)
}

/// Segment words and write the resulting cues as an SRT file.
///
/// Unlike [`segment_words`], which treats an empty token stream as an empty
/// result, this entry point requires cues: an input that produces none fails
/// with [`CueburnError::SegmentationEmpty`].
#[tracing::instrument(skip(words, cfg), fields(words = words.len()))]
pub fn generate_srt(
    words: &[WordToken],
    out_path: &Path,
    cfg: &SegmenterConfig,
) -> CueburnResult<Vec<Cue>> {
    if words.is_empty() {
        return Err(CueburnError::segmentation_empty(
            "word timestamp stream is empty",
        ));
    }

    let cues = segment_words(words, cfg)?;
    if cues.is_empty() {
        return Err(CueburnError::segmentation_empty(
            "no cues were produced from the word stream",
        ));
    }

    write_srt_file(out_path, &cues)?;
    tracing::info!(cues = cues.len(), out = %out_path.display(), "wrote subtitle file");
    Ok(cues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_word_stream_is_reported_as_segmentation_empty() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.srt");
        let err = generate_srt(&[], &out, &SegmenterConfig::default()).unwrap_err();
        assert!(matches!(err, CueburnError::SegmentationEmpty(_)));
        assert!(!out.exists());
    }

    #[test]
    fn generates_parseable_srt_from_words() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.srt");
        let words = vec![
            WordToken {
                text: "Hello".to_string(),
                start_sec: 0.0,
                end_sec: 0.4,
            },
            WordToken {
                text: "world.".to_string(),
                start_sec: 0.4,
                end_sec: 0.9,
            },
        ];

        let cues = generate_srt(&words, &out, &SegmenterConfig::default()).unwrap();
        assert_eq!(cues.len(), 1);

        let parsed = crate::subtitle::srt::parse_srt_file(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].text, "Hello world.");
    }
}
