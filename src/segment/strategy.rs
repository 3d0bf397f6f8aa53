use crate::foundation::error::{CueburnError, CueburnResult};
use crate::segment::segmenter::{PunctuationClasses, WordToken};

/// What the strategy wants done with the candidate word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StepDecision {
    /// Add the word to the current cue and keep going.
    Take,
    /// Add the word and close the cue.
    TakeAndBreak,
    /// Close the cue without the word; it starts the next cue.
    Break,
}

/// Rule set controlling how many words join the current cue.
///
/// A closed set of variants, each owning its parameters; the shared
/// accumulation skeleton in [`segment_words`](crate::segment_words) asks the
/// variant for a [`StepDecision`] per candidate word.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum GroupingStrategy {
    /// Up to N words per cue; any punctuation closes the cue early.
    FixedWordCount { words_per_cue: usize },
    /// Cap on `candidate.end - group_start`; the first word is always taken.
    TimeBased { max_duration_sec: f64 },
    /// Cap on the joined text length; the first word is always taken.
    CharacterCount { max_chars: usize },
    /// Major punctuation always closes; minor punctuation closes once the cue
    /// has at least `min_words_for_minor_punct` words; `max_words` is a hard cap.
    SmartPhrase {
        min_words_for_minor_punct: usize,
        max_words: usize,
    },
}

impl Default for GroupingStrategy {
    fn default() -> Self {
        Self::FixedWordCount { words_per_cue: 3 }
    }
}

impl GroupingStrategy {
    pub fn validate(&self) -> CueburnResult<()> {
        match *self {
            Self::FixedWordCount { words_per_cue } if words_per_cue == 0 => Err(
                CueburnError::validation("words_per_cue must be at least 1"),
            ),
            Self::TimeBased { max_duration_sec } if !(max_duration_sec > 0.0) => Err(
                CueburnError::validation("max_duration_sec must be positive"),
            ),
            Self::CharacterCount { max_chars } if max_chars == 0 => {
                Err(CueburnError::validation("max_chars must be at least 1"))
            }
            Self::SmartPhrase { max_words, .. } if max_words == 0 => {
                Err(CueburnError::validation("max_words must be at least 1"))
            }
            _ => Ok(()),
        }
    }

    /// Stopping rule: decide whether `candidate` joins the cue under
    /// construction.
    ///
    /// `taken` is the number of words already in the cue, `joined_len` the
    /// character length of their joined text, `group_start` the cue's start
    /// time.
    pub(crate) fn decide(
        &self,
        taken: usize,
        joined_len: usize,
        group_start: f64,
        candidate: &WordToken,
        punct: &PunctuationClasses,
    ) -> StepDecision {
        match *self {
            Self::FixedWordCount { words_per_cue } => {
                if taken >= words_per_cue {
                    StepDecision::Break
                } else if punct.ends_with_any(&candidate.text) {
                    StepDecision::TakeAndBreak
                } else {
                    StepDecision::Take
                }
            }
            Self::TimeBased { max_duration_sec } => {
                if taken > 0 && candidate.end_sec - group_start > max_duration_sec {
                    StepDecision::Break
                } else if punct.ends_with_any(&candidate.text) {
                    StepDecision::TakeAndBreak
                } else {
                    StepDecision::Take
                }
            }
            Self::CharacterCount { max_chars } => {
                let word_len = candidate.text.chars().count();
                let potential = if taken == 0 {
                    word_len
                } else {
                    joined_len + 1 + word_len
                };
                if taken > 0 && potential > max_chars {
                    StepDecision::Break
                } else if punct.ends_with_any(&candidate.text) {
                    StepDecision::TakeAndBreak
                } else {
                    StepDecision::Take
                }
            }
            Self::SmartPhrase {
                min_words_for_minor_punct,
                max_words,
            } => {
                let count_with_candidate = taken + 1;
                if punct.ends_with_major(&candidate.text) {
                    StepDecision::TakeAndBreak
                } else if punct.ends_with_minor(&candidate.text)
                    && count_with_candidate >= min_words_for_minor_punct
                {
                    StepDecision::TakeAndBreak
                } else if count_with_candidate >= max_words {
                    StepDecision::TakeAndBreak
                } else {
                    StepDecision::Take
                }
            }
        }
    }
}
