use crate::foundation::error::{CueburnError, CueburnResult};
use crate::segment::strategy::{GroupingStrategy, StepDecision};
use crate::subtitle::srt::Cue;

/// A word with its spoken time span, produced externally (ASR) and consumed
/// read-only. `start_sec <= end_sec`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WordToken {
    pub text: String,
    pub start_sec: f64,
    pub end_sec: f64,
}

/// Punctuation classes driving cue-boundary heuristics.
///
/// Major marks end sentences and trigger the end-phrase extension; minor marks
/// end clauses. A word "ends with" a mark when its last character matches.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PunctuationClasses {
    pub major: Vec<char>,
    pub minor: Vec<char>,
}

impl Default for PunctuationClasses {
    fn default() -> Self {
        Self {
            major: vec!['.', '!', '?'],
            minor: vec![',', ';', ':'],
        }
    }
}

impl PunctuationClasses {
    pub fn ends_with_major(&self, word: &str) -> bool {
        word.chars().last().is_some_and(|c| self.major.contains(&c))
    }

    pub fn ends_with_minor(&self, word: &str) -> bool {
        word.chars().last().is_some_and(|c| self.minor.contains(&c))
    }

    pub fn ends_with_any(&self, word: &str) -> bool {
        self.ends_with_major(word) || self.ends_with_minor(word)
    }
}

/// Segmentation parameters shared by every strategy.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SegmenterConfig {
    #[serde(flatten)]
    pub strategy: GroupingStrategy,
    #[serde(default)]
    pub punctuation: PunctuationClasses,
    /// Seconds added to a cue's end when it closes on major punctuation.
    #[serde(default = "default_end_phrase_extension")]
    pub end_phrase_extension_sec: f64,
    /// Minimum silence enforced between adjacent cues by the overlap pass.
    #[serde(default = "default_min_gap")]
    pub min_gap_sec: f64,
}

fn default_end_phrase_extension() -> f64 {
    0.3
}

fn default_min_gap() -> f64 {
    0.1
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            strategy: GroupingStrategy::default(),
            punctuation: PunctuationClasses::default(),
            end_phrase_extension_sec: default_end_phrase_extension(),
            min_gap_sec: default_min_gap(),
        }
    }
}

impl SegmenterConfig {
    pub fn validate(&self) -> CueburnResult<()> {
        self.strategy.validate()?;
        if self.end_phrase_extension_sec < 0.0 {
            return Err(CueburnError::validation(
                "end_phrase_extension_sec must be non-negative",
            ));
        }
        if self.min_gap_sec < 0.0 {
            return Err(CueburnError::validation("min_gap_sec must be non-negative"));
        }
        Ok(())
    }
}

/// Group a word-timestamp stream into non-overlapping caption cues.
///
/// Single left-to-right walk; the strategy decides per candidate word whether
/// it joins the cue under construction. A cue that closes on major punctuation
/// gets `end_phrase_extension_sec` added to its end, and the overlap pass then
/// re-establishes the `end + min_gap <= next.start` invariant.
///
/// Empty input yields an empty cue list, not an error.
#[tracing::instrument(skip(words, cfg), fields(words = words.len()))]
pub fn segment_words(words: &[WordToken], cfg: &SegmenterConfig) -> CueburnResult<Vec<Cue>> {
    cfg.validate()?;

    let mut cues = Vec::new();
    let mut index: u32 = 1;
    let mut i = 0;

    while i < words.len() {
        let group_start = words[i].start_sec;
        let mut group_end = words[i].end_sec;
        let mut group: Vec<&str> = Vec::new();
        let mut joined_len = 0usize;

        while i + group.len() < words.len() {
            let candidate = &words[i + group.len()];
            let decision = cfg.strategy.decide(
                group.len(),
                joined_len,
                group_start,
                candidate,
                &cfg.punctuation,
            );
            if decision == StepDecision::Break {
                break;
            }

            let separator = if group.is_empty() { 0 } else { 1 };
            joined_len += separator + candidate.text.chars().count();
            group.push(&candidate.text);
            group_end = candidate.end_sec;

            if decision == StepDecision::TakeAndBreak {
                break;
            }
        }

        if group.is_empty() {
            // Guarantees forward progress for degenerate strategy parameters.
            i += 1;
            continue;
        }
        i += group.len();

        let last = group[group.len() - 1];
        if cfg.punctuation.ends_with_major(last) {
            group_end += cfg.end_phrase_extension_sec;
        }

        cues.push(Cue {
            index,
            start_sec: group_start,
            end_sec: group_end,
            text: group.join(" "),
        });
        index += 1;
    }

    prevent_overlaps(&mut cues, cfg.min_gap_sec);
    tracing::debug!(cues = cues.len(), "segmentation complete");
    Ok(cues)
}

/// Clamp cue end times so no two visible windows collide: whenever
/// `cue[i].end + min_gap > cue[i+1].start`, `cue[i].end` becomes
/// `cue[i+1].start - min_gap`.
pub(crate) fn prevent_overlaps(cues: &mut [Cue], min_gap_sec: f64) {
    for i in 0..cues.len().saturating_sub(1) {
        let next_start = cues[i + 1].start_sec;
        if cues[i].end_sec + min_gap_sec > next_start {
            cues[i].end_sec = next_start - min_gap_sec;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> WordToken {
        WordToken {
            text: text.to_string(),
            start_sec: start,
            end_sec: end,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn fixed(words_per_cue: usize) -> SegmenterConfig {
        SegmenterConfig {
            strategy: GroupingStrategy::FixedWordCount { words_per_cue },
            ..SegmenterConfig::default()
        }
    }

    #[test]
    fn fixed_count_joins_words_and_extends_on_major_punct() {
        // Scenario A: two words ending in a period, grouped as one cue whose
        // end is pushed out by the phrase extension.
        let words = vec![word("Hello", 0.0, 0.4), word("world.", 0.4, 0.9)];
        let cues = segment_words(&words, &fixed(2)).unwrap();

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].text, "Hello world.");
        assert!(approx(cues[0].start_sec, 0.0));
        assert!(approx(cues[0].end_sec, 1.2));
    }

    #[test]
    fn fixed_count_breaks_early_on_any_punctuation() {
        let words = vec![
            word("wait,", 0.0, 0.3),
            word("what", 0.4, 0.6),
            word("now", 0.7, 0.9),
        ];
        let cues = segment_words(&words, &fixed(3)).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "wait,");
        assert_eq!(cues[1].text, "what now");
    }

    #[test]
    fn empty_input_yields_empty_cue_list() {
        let cues = segment_words(&[], &SegmenterConfig::default()).unwrap();
        assert!(cues.is_empty());
    }

    #[test]
    fn run_on_stream_without_punctuation_terminates_under_every_strategy() {
        let words: Vec<WordToken> = (0..37)
            .map(|i| word("blah", i as f64 * 0.3, i as f64 * 0.3 + 0.25))
            .collect();

        let strategies = [
            GroupingStrategy::FixedWordCount { words_per_cue: 4 },
            GroupingStrategy::TimeBased {
                max_duration_sec: 1.0,
            },
            GroupingStrategy::CharacterCount { max_chars: 12 },
            GroupingStrategy::SmartPhrase {
                min_words_for_minor_punct: 3,
                max_words: 5,
            },
        ];

        for strategy in strategies {
            let cfg = SegmenterConfig {
                strategy,
                ..SegmenterConfig::default()
            };
            let cues = segment_words(&words, &cfg).unwrap();
            assert!(!cues.is_empty());
            let total_words: usize = cues
                .iter()
                .map(|c| c.text.split_whitespace().count())
                .sum();
            assert_eq!(total_words, words.len());
        }
    }

    #[test]
    fn indices_are_monotonic_from_one_without_gaps() {
        let words: Vec<WordToken> = (0..10)
            .map(|i| word("w", i as f64, i as f64 + 0.5))
            .collect();
        let cues = segment_words(&words, &fixed(3)).unwrap();
        for (pos, cue) in cues.iter().enumerate() {
            assert_eq!(cue.index, pos as u32 + 1);
        }
    }

    #[test]
    fn time_based_respects_duration_cap() {
        let words = vec![
            word("a", 0.0, 0.5),
            word("b", 0.6, 1.1),
            word("c", 1.2, 2.6),
            word("d", 2.7, 3.0),
        ];
        let cfg = SegmenterConfig {
            strategy: GroupingStrategy::TimeBased {
                max_duration_sec: 2.0,
            },
            ..SegmenterConfig::default()
        };
        let cues = segment_words(&words, &cfg).unwrap();
        // "c" would stretch the first cue to 2.6s, past the cap.
        assert_eq!(cues[0].text, "a b");
        assert_eq!(cues[1].text, "c d");
    }

    #[test]
    fn character_count_keeps_joined_text_under_cap() {
        let words = vec![
            word("alpha", 0.0, 0.4),
            word("beta", 0.5, 0.8),
            word("gamma", 0.9, 1.2),
        ];
        let cfg = SegmenterConfig {
            strategy: GroupingStrategy::CharacterCount { max_chars: 10 },
            ..SegmenterConfig::default()
        };
        let cues = segment_words(&words, &cfg).unwrap();
        assert_eq!(cues[0].text, "alpha beta");
        assert_eq!(cues[1].text, "gamma");
    }

    #[test]
    fn smart_phrase_breaks_on_major_then_minor_then_cap() {
        let words = vec![
            word("Stop.", 0.0, 0.3),
            word("so", 0.4, 0.5),
            word("then,", 0.6, 0.8),
            word("one", 0.9, 1.0),
            word("two", 1.1, 1.2),
            word("three", 1.3, 1.4),
            word("four", 1.5, 1.6),
        ];
        let cfg = SegmenterConfig {
            strategy: GroupingStrategy::SmartPhrase {
                min_words_for_minor_punct: 2,
                max_words: 3,
            },
            ..SegmenterConfig::default()
        };
        let cues = segment_words(&words, &cfg).unwrap();
        assert_eq!(cues[0].text, "Stop.");
        assert_eq!(cues[1].text, "so then,");
        assert_eq!(cues[2].text, "one two three");
        assert_eq!(cues[3].text, "four");
    }

    #[test]
    fn overlap_pass_clamps_end_to_next_start_minus_gap() {
        // Scenario B: a phrase extension pushed the first cue's end past the
        // next cue's window; the clamp pulls it back to 2.4 - 0.1.
        let mut cues = vec![
            Cue {
                index: 1,
                start_sec: 2.0,
                end_sec: 2.35,
                text: "one.".to_string(),
            },
            Cue {
                index: 2,
                start_sec: 2.4,
                end_sec: 3.0,
                text: "two".to_string(),
            },
        ];
        prevent_overlaps(&mut cues, 0.1);
        assert!(approx(cues[0].end_sec, 2.3));
        assert!(approx(cues[1].end_sec, 3.0));
    }

    #[test]
    fn adjacent_cues_keep_min_gap_after_segmentation() {
        // Dense words with trailing periods force extensions that would
        // otherwise overlap the following cue.
        let words = vec![
            word("one.", 0.0, 0.4),
            word("two.", 0.5, 0.9),
            word("three.", 1.0, 1.4),
        ];
        let cfg = fixed(1);
        let cues = segment_words(&words, &cfg).unwrap();
        assert_eq!(cues.len(), 3);
        for pair in cues.windows(2) {
            assert!(pair[0].end_sec + cfg.min_gap_sec <= pair[1].start_sec + 1e-9);
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = SegmenterConfig {
            strategy: GroupingStrategy::FixedWordCount { words_per_cue: 0 },
            ..SegmenterConfig::default()
        };
        assert!(segment_words(&[word("x", 0.0, 0.1)], &cfg).is_err());
    }
}
