//! Frequency-based trigger policy
//!
//! Decides on every edit whether the flattened document justifies a
//! completion request. The check is a pure string match and never fails.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::flatten::cursor_count;

/// A letter, one whitespace, then the caret; or the caret opening a new line
static WORD_COMPLETE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{L}\s\[\[cursor\]\]|\n\[\[cursor\]\]").expect("valid word boundary pattern")
});

/// Sentence punctuation, one whitespace, then the caret
static SENTENCE_COMPLETE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[!.?]\s\[\[cursor\]\]").expect("valid sentence boundary pattern")
});

/// How often completions are requested relative to typing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FrequencyMode {
    /// Never request
    Disabled,
    /// Request on every edit while the caret placeholder exists
    OnKeyPress,
    /// Request after a finished word and a space, or at the start of a line
    #[default]
    OnWordComplete,
    /// Request after sentence punctuation and a space
    OnSentenceComplete,
}

impl FrequencyMode {
    pub const ALL: [FrequencyMode; 4] = [
        FrequencyMode::Disabled,
        FrequencyMode::OnKeyPress,
        FrequencyMode::OnWordComplete,
        FrequencyMode::OnSentenceComplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyMode::Disabled => "disabled",
            FrequencyMode::OnKeyPress => "onKeyPress",
            FrequencyMode::OnWordComplete => "onWordComplete",
            FrequencyMode::OnSentenceComplete => "onSentenceComplete",
        }
    }

    /// Parse a wire name; anything unrecognized fails closed to `Disabled`
    pub fn parse(value: &str) -> Self {
        match value {
            "onKeyPress" => FrequencyMode::OnKeyPress,
            "onWordComplete" => FrequencyMode::OnWordComplete,
            "onSentenceComplete" => FrequencyMode::OnSentenceComplete,
            _ => FrequencyMode::Disabled,
        }
    }
}

impl fmt::Display for FrequencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for FrequencyMode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FrequencyMode> for String {
    fn from(mode: FrequencyMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Whether `text` (flattened, with caret marker) should fire a request under `mode`
///
/// Text without exactly one caret marker never fires.
pub fn should_trigger(text: &str, mode: FrequencyMode) -> bool {
    let markers = cursor_count(text);
    if markers != 1 {
        trace!(markers, "Trigger skipped: caret marker count is not one");
        return false;
    }

    let fire = match mode {
        FrequencyMode::Disabled => false,
        FrequencyMode::OnKeyPress => true,
        FrequencyMode::OnWordComplete => WORD_COMPLETE.is_match(text),
        FrequencyMode::OnSentenceComplete => SENTENCE_COMPLETE.is_match(text),
    };

    if !fire {
        trace!(mode = %mode, "Trigger skipped by frequency policy");
    }
    fire
}
