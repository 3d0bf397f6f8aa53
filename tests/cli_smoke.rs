use std::path::PathBuf;
use std::process::Command;

#[test]
fn cli_segment_writes_srt() {
    let dir = tempfile::tempdir().unwrap();
    let words_path = dir.path().join("words.json");
    let out_path = dir.path().join("captions.srt");

    std::fs::write(
        &words_path,
        r#"[
            {"text": "Hello", "start_sec": 0.0, "end_sec": 0.4},
            {"text": "world.", "start_sec": 0.4, "end_sec": 0.9},
            {"text": "Goodbye", "start_sec": 1.2, "end_sec": 1.6},
            {"text": "now.", "start_sec": 1.6, "end_sec": 2.0}
        ]"#,
    )
    .unwrap();

    let exe = std::env::var_os("CARGO_BIN_EXE_cueburn")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target").join("debug").join("cueburn"));

    let status = Command::new(&exe)
        .arg("segment")
        .arg("--words")
        .arg(&words_path)
        .arg("--out")
        .arg(&out_path)
        .status()
        .expect("run cueburn segment");
    assert!(status.success());

    let cues = cueburn::parse_srt_file(&out_path).unwrap();
    assert!(!cues.is_empty());
    assert_eq!(cues[0].index, 1);
    assert!(cues[0].text.starts_with("Hello"));
}

#[test]
fn cli_segment_accepts_a_strategy_config() {
    let dir = tempfile::tempdir().unwrap();
    let words_path = dir.path().join("words.json");
    let out_path = dir.path().join("captions.srt");
    let cfg_path = dir.path().join("segmenter.json");

    std::fs::write(
        &words_path,
        r#"[
            {"text": "one", "start_sec": 0.0, "end_sec": 0.3},
            {"text": "two", "start_sec": 0.3, "end_sec": 0.6},
            {"text": "three", "start_sec": 0.6, "end_sec": 0.9},
            {"text": "four", "start_sec": 0.9, "end_sec": 1.2}
        ]"#,
    )
    .unwrap();
    std::fs::write(
        &cfg_path,
        r#"{"strategy": "fixed_word_count", "words_per_cue": 2}"#,
    )
    .unwrap();

    let exe = std::env::var_os("CARGO_BIN_EXE_cueburn")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target").join("debug").join("cueburn"));

    let status = Command::new(&exe)
        .arg("segment")
        .arg("--words")
        .arg(&words_path)
        .arg("--out")
        .arg(&out_path)
        .arg("--config")
        .arg(&cfg_path)
        .status()
        .expect("run cueburn segment");
    assert!(status.success());

    let cues = cueburn::parse_srt_file(&out_path).unwrap();
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text, "one two");
    assert_eq!(cues[1].text, "three four");
}
